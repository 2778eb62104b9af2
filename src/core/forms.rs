use crate::domain::feedback::derive_error_message;
use crate::domain::model::{ContactForm, Course, EnrollmentForm, FormKind, Level, SubmitStatus};
use crate::domain::ports::BackendApi;
use crate::utils::error::{PortalError, Result};
use crate::utils::validation::is_blank;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Field bag of one form: typed field names, assignment and the required-field check.
pub trait FormFields: Clone + Default + PartialEq + Serialize + Send + Sync + 'static {
    type Field: Copy + PartialEq + fmt::Debug + fmt::Display + FromStr<Err = PortalError> + Send;

    const KIND: FormKind;

    fn set_field(&mut self, field: Self::Field, value: &str) -> Result<()>;

    /// Required fields that are still empty, in form order.
    fn missing_fields(&self) -> Vec<Self::Field>;
}

fn unknown_field(kind: FormKind, name: &str) -> PortalError {
    PortalError::InvalidFieldValue {
        field: name.to_string(),
        value: String::new(),
        reason: format!("Unknown {} form field", kind),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentField {
    Name,
    Email,
    Country,
    PhoneNumber,
    ExperienceLevel,
    CourseInterest,
}

impl EnrollmentField {
    pub const ALL: [EnrollmentField; 6] = [
        EnrollmentField::Name,
        EnrollmentField::Email,
        EnrollmentField::Country,
        EnrollmentField::PhoneNumber,
        EnrollmentField::ExperienceLevel,
        EnrollmentField::CourseInterest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentField::Name => "name",
            EnrollmentField::Email => "email",
            EnrollmentField::Country => "country",
            EnrollmentField::PhoneNumber => "phone_number",
            EnrollmentField::ExperienceLevel => "experience_level",
            EnrollmentField::CourseInterest => "course_interest",
        }
    }
}

impl fmt::Display for EnrollmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentField {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        EnrollmentField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| unknown_field(FormKind::Enrollment, s))
    }
}

impl FormFields for EnrollmentForm {
    type Field = EnrollmentField;

    const KIND: FormKind = FormKind::Enrollment;

    fn set_field(&mut self, field: EnrollmentField, value: &str) -> Result<()> {
        match field {
            EnrollmentField::Name => self.name = value.to_string(),
            EnrollmentField::Email => self.email = value.to_string(),
            EnrollmentField::Country => self.country = value.to_string(),
            EnrollmentField::PhoneNumber => self.phone_number = value.to_string(),
            EnrollmentField::ExperienceLevel => {
                self.experience_level = if is_blank(value) {
                    None
                } else {
                    Some(value.parse::<Level>().map_err(|reason| PortalError::InvalidFieldValue {
                        field: field.to_string(),
                        value: value.to_string(),
                        reason,
                    })?)
                };
            }
            EnrollmentField::CourseInterest => self.course_interest = value.to_string(),
        }
        Ok(())
    }

    fn missing_fields(&self) -> Vec<EnrollmentField> {
        EnrollmentField::ALL
            .into_iter()
            .filter(|field| match field {
                EnrollmentField::Name => is_blank(&self.name),
                EnrollmentField::Email => is_blank(&self.email),
                EnrollmentField::Country => is_blank(&self.country),
                EnrollmentField::PhoneNumber => is_blank(&self.phone_number),
                EnrollmentField::ExperienceLevel => self.experience_level.is_none(),
                EnrollmentField::CourseInterest => is_blank(&self.course_interest),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl ContactField {
    pub const ALL: [ContactField; 3] = [ContactField::Name, ContactField::Email, ContactField::Message];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Message => "message",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactField {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self> {
        ContactField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| unknown_field(FormKind::Contact, s))
    }
}

impl FormFields for ContactForm {
    type Field = ContactField;

    const KIND: FormKind = FormKind::Contact;

    fn set_field(&mut self, field: ContactField, value: &str) -> Result<()> {
        match field {
            ContactField::Name => self.name = value.to_string(),
            ContactField::Email => self.email = value.to_string(),
            ContactField::Message => self.message = value.to_string(),
        }
        Ok(())
    }

    fn missing_fields(&self) -> Vec<ContactField> {
        ContactField::ALL
            .into_iter()
            .filter(|field| match field {
                ContactField::Name => is_blank(&self.name),
                ContactField::Email => is_blank(&self.email),
                ContactField::Message => is_blank(&self.message),
            })
            .collect()
    }
}

/// Immutable snapshot of one form. Every transition returns a new value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState<F: FormFields> {
    pub fields: F,
    pub status: Option<SubmitStatus>,
    pub is_submitting: bool,
}

impl<F: FormFields> FormState<F> {
    pub fn new(fields: F) -> Self {
        Self {
            fields,
            status: None,
            is_submitting: false,
        }
    }

    pub fn with_field(mut self, field: F::Field, value: &str) -> Result<Self> {
        self.fields.set_field(field, value)?;
        Ok(self)
    }

    pub fn submit_started(mut self) -> Self {
        self.is_submitting = true;
        self.status = None;
        self
    }

    pub fn submit_succeeded(self, message: String, blank: F) -> Self {
        Self {
            fields: blank,
            status: Some(SubmitStatus::Success { message }),
            is_submitting: false,
        }
    }

    /// Keeps the entered values so the user can retry.
    pub fn submit_failed(mut self, message: String) -> Self {
        self.status = Some(SubmitStatus::Error { message });
        self.is_submitting = false;
        self
    }

    /// The submitting future was dropped before a reply; fields stay, no status.
    pub fn submit_abandoned(mut self) -> Self {
        self.is_submitting = false;
        self
    }
}

fn lock_state<F: FormFields>(state: &Mutex<FormState<F>>) -> MutexGuard<'_, FormState<F>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn apply_to<F: FormFields>(state: &Mutex<FormState<F>>, reducer: impl FnOnce(FormState<F>) -> FormState<F>) {
    let mut guard = lock_state(state);
    let current = std::mem::take(&mut *guard);
    *guard = reducer(current);
}

/// Clears `is_submitting` if the submission future is dropped mid-flight.
struct SubmitGuard<'a, F: FormFields> {
    state: &'a Mutex<FormState<F>>,
    armed: bool,
}

impl<F: FormFields> SubmitGuard<'_, F> {
    fn finish(mut self, reducer: impl FnOnce(FormState<F>) -> FormState<F>) {
        self.armed = false;
        apply_to(self.state, reducer);
    }
}

impl<F: FormFields> Drop for SubmitGuard<'_, F> {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!("{} submission dropped before a reply", F::KIND);
            apply_to(self.state, FormState::submit_abandoned);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<Field> {
    /// One request went out; this is the status it produced.
    Completed(SubmitStatus),
    /// Required fields are empty; nothing was sent.
    Blocked { missing: Vec<Field> },
    /// A submission of this form is still in flight; nothing was sent.
    AlreadySubmitting,
}

/// Field state, status and submission for one form.
pub struct FormController<A: BackendApi, F: FormFields> {
    api: A,
    blank: F,
    state: Arc<Mutex<FormState<F>>>,
}

pub type EnrollmentController<A> = FormController<A, EnrollmentForm>;
pub type ContactController<A> = FormController<A, ContactForm>;

impl<A: BackendApi + Clone, F: FormFields> Clone for FormController<A, F> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            blank: self.blank.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<A: BackendApi> FormController<A, EnrollmentForm> {
    /// `default_course_interest` pre-fills the form and survives resets.
    pub fn enrollment(api: A, default_course_interest: Option<&str>) -> Self {
        let blank = EnrollmentForm {
            course_interest: default_course_interest.unwrap_or_default().to_string(),
            ..EnrollmentForm::default()
        };
        Self::with_blank(api, blank)
    }

    /// "Enroll now" on a course card.
    pub fn select_course(&self, course: &Course) {
        tracing::debug!("Course '{}' selected for enrollment", course.title);
        self.apply(|mut state| {
            state.fields.course_interest = course.title.clone();
            state
        });
    }
}

impl<A: BackendApi> FormController<A, ContactForm> {
    pub fn contact(api: A) -> Self {
        Self::with_blank(api, ContactForm::default())
    }
}

impl<A: BackendApi, F: FormFields> FormController<A, F> {
    pub fn with_blank(api: A, blank: F) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(FormState::new(blank.clone()))),
            blank,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormState<F>> {
        lock_state(&self.state)
    }

    fn apply(&self, reducer: impl FnOnce(FormState<F>) -> FormState<F>) {
        apply_to(&self.state, reducer);
    }

    pub fn update_field(&self, field: F::Field, value: &str) -> Result<()> {
        let mut guard = self.lock();
        let next = guard.clone().with_field(field, value)?;
        *guard = next;
        Ok(())
    }

    pub fn update_field_by_name(&self, name: &str, value: &str) -> Result<()> {
        let field: F::Field = name.parse()?;
        self.update_field(field, value)
    }

    pub fn snapshot(&self) -> FormState<F> {
        self.lock().clone()
    }

    pub fn fields(&self) -> F {
        self.lock().fields.clone()
    }

    pub fn status(&self) -> Option<SubmitStatus> {
        self.lock().status.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().is_submitting
    }

    /// Sends the current fields once. At most one submission per form is in flight.
    pub async fn submit(&self) -> SubmitOutcome<F::Field> {
        let payload = {
            let mut guard = self.lock();
            if guard.is_submitting {
                tracing::debug!("{} submission already in flight, ignoring", F::KIND);
                return SubmitOutcome::AlreadySubmitting;
            }

            let missing = guard.fields.missing_fields();
            if !missing.is_empty() {
                tracing::debug!("{} submission blocked, missing: {:?}", F::KIND, missing);
                return SubmitOutcome::Blocked { missing };
            }

            let payload = serde_json::to_value(&guard.fields);
            let next = std::mem::take(&mut *guard).submit_started();
            *guard = next;
            payload
        };
        let submission = SubmitGuard {
            state: &self.state,
            armed: true,
        };

        let result = match payload {
            Ok(payload) => self.api.submit(F::KIND, payload).await,
            Err(e) => Err(PortalError::from(e)),
        };

        let status = match result {
            Ok(receipt) => {
                tracing::info!(
                    "✅ {} submitted{}",
                    F::KIND,
                    receipt
                        .submission_id
                        .as_deref()
                        .map(|id| format!(" (id {})", id))
                        .unwrap_or_default()
                );
                SubmitStatus::Success {
                    message: receipt.message,
                }
            }
            Err(e) => {
                tracing::warn!("{} submission error: {}", F::KIND, e);
                SubmitStatus::Error {
                    message: derive_error_message(F::KIND, e.error_body()),
                }
            }
        };

        let blank = self.blank.clone();
        let reported = status.clone();
        submission.finish(|state| match status {
            SubmitStatus::Success { message } => state.submit_succeeded(message, blank),
            SubmitStatus::Error { message } => state.submit_failed(message),
        });

        SubmitOutcome::Completed(reported)
    }
}
