use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Difficulty classification of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                format!(
                    "Experience level must be one of: {}",
                    Level::ALL.map(|l| l.as_str()).join(", ")
                )
            })
    }
}

/// Level selector of the catalog; `All` disables filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFilter {
    #[default]
    All,
    Beginner,
    Intermediate,
    Advanced,
}

impl LevelFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelFilter::All => "all",
            LevelFilter::Beginner => "beginner",
            LevelFilter::Intermediate => "intermediate",
            LevelFilter::Advanced => "advanced",
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self {
            LevelFilter::All => None,
            LevelFilter::Beginner => Some(Level::Beginner),
            LevelFilter::Intermediate => Some(Level::Intermediate),
            LevelFilter::Advanced => Some(Level::Advanced),
        }
    }

    pub fn matches(&self, course_level: &str) -> bool {
        match self.level() {
            None => true,
            Some(level) => level.as_str().eq_ignore_ascii_case(course_level),
        }
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Beginner => LevelFilter::Beginner,
            Level::Intermediate => LevelFilter::Intermediate,
            Level::Advanced => LevelFilter::Advanced,
        }
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LevelFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(LevelFilter::All);
        }
        s.parse::<Level>()
            .map(LevelFilter::from)
            .map_err(|_| format!("Unknown level filter '{}': expected all, beginner, intermediate or advanced", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// 後端原始字串，比對時不分大小寫
    pub level: String,
    #[serde(default)]
    pub duration: String,
    /// 只用於顯示，缺少時留空
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub features: Vec<String>,
}

/// `GET /courses` 回應外殼
#[derive(Debug, Clone, Deserialize)]
pub struct CoursesEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data: Vec<Course>,
    #[serde(default)]
    pub total_courses: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentForm {
    pub name: String,
    pub email: String,
    pub country: String,
    pub phone_number: String,
    pub experience_level: Option<Level>,
    pub course_interest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Which of the two forms a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Enrollment,
    Contact,
}

impl FormKind {
    pub fn endpoint(&self) -> &'static str {
        match self {
            FormKind::Enrollment => "/enroll",
            FormKind::Contact => "/contact",
        }
    }

    pub fn fallback_message(&self) -> &'static str {
        match self {
            FormKind::Enrollment => "Failed to submit enrollment. Please try again.",
            FormKind::Contact => "Failed to submit contact form. Please try again.",
        }
    }

    fn receipt_id_field(&self) -> &'static str {
        match self {
            FormKind::Enrollment => "enrollment_id",
            FormKind::Contact => "contact_id",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormKind::Enrollment => f.write_str("enrollment"),
            FormKind::Contact => f.write_str("contact"),
        }
    }
}

/// Successful submission reply: `{ status?, message, <form>_id? }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub message: String,
    pub submission_id: Option<String>,
}

impl SubmissionReceipt {
    pub fn from_body(kind: FormKind, body: &serde_json::Value) -> Option<Self> {
        let message = body.get("message")?.as_str()?.to_string();
        let submission_id = body
            .get(kind.receipt_id_field())
            .and_then(|v| v.as_str())
            .map(str::to_string);
        Some(Self {
            message,
            submission_id,
        })
    }
}

/// The single most recent outcome of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Success { message: String },
    Error { message: String },
}

impl SubmitStatus {
    pub fn message(&self) -> &str {
        match self {
            SubmitStatus::Success { message } | SubmitStatus::Error { message } => message,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<chrono::NaiveDateTime>,
    #[serde(default)]
    pub error: Option<String>,
    /// 其餘欄位，例如 database_status
    #[serde(flatten)]
    pub components: std::collections::BTreeMap<String, serde_json::Value>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
