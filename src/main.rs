use anyhow::Context;
use bootcamp_portal::core::forms::{ContactField, EnrollmentField};
use bootcamp_portal::utils::{logger, validation::Validate};
use bootcamp_portal::{
    CatalogViewModel, CliConfig, Command, Course, FormController, HttpBackend, Settings,
    SubmitOutcome, SubmitStatus,
};
use clap::Parser;
use std::fmt::Display;

const EXIT_ERROR: i32 = 1;
const EXIT_BLOCKED: i32 = 2;
const EXIT_CONFIG: i32 = 3;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let settings = match cli.settings().and_then(|s| s.validate().map(|_| s)) {
        Ok(settings) => settings,
        Err(e) => {
            logger::init_cli_logger(cli.verbose, None, Default::default());
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(EXIT_CONFIG);
        }
    };

    logger::init_cli_logger(cli.verbose, settings.log_level.as_deref(), settings.log_format);
    tracing::debug!("Effective settings: {:?}", settings);

    let code = match run(cli.command, &settings).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("❌ {:#}", e);
            eprintln!("❌ {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(code);
}

async fn run(command: Command, settings: &Settings) -> anyhow::Result<i32> {
    let backend = HttpBackend::from_config(settings).context("building HTTP client")?;
    tracing::info!("Using backend at {}", backend.api_root());

    match command {
        Command::Courses {
            level,
            remote,
            duration,
        } => {
            let courses = if remote {
                backend
                    .fetch_filtered_courses(level.level(), duration.as_deref())
                    .await
                    .context("fetching filtered courses")?
            } else {
                let catalog = CatalogViewModel::new(backend);
                catalog.load_courses().await;
                catalog.set_level_filter(level);
                catalog.filtered_courses()
            };

            print_courses(&courses);
            Ok(0)
        }

        Command::Enroll {
            name,
            email,
            country,
            phone_number,
            experience_level,
            course_interest,
        } => {
            let controller = FormController::enrollment(backend, settings.default_course_interest.as_deref());
            let values = [
                (EnrollmentField::Name, name),
                (EnrollmentField::Email, email),
                (EnrollmentField::Country, country),
                (EnrollmentField::PhoneNumber, phone_number),
                (EnrollmentField::ExperienceLevel, experience_level),
                (EnrollmentField::CourseInterest, course_interest),
            ];
            for (field, value) in values {
                if let Some(value) = value {
                    if let Err(e) = controller.update_field(field, &value) {
                        eprintln!("❌ {}", e.user_friendly_message());
                        return Ok(EXIT_BLOCKED);
                    }
                }
            }
            Ok(report(controller.submit().await))
        }

        Command::Contact {
            name,
            email,
            message,
        } => {
            let controller = FormController::contact(backend);
            let values = [
                (ContactField::Name, name),
                (ContactField::Email, email),
                (ContactField::Message, message),
            ];
            for (field, value) in values {
                if let Some(value) = value {
                    controller.update_field(field, &value)?;
                }
            }
            Ok(report(controller.submit().await))
        }

        Command::Health => {
            let health = backend.health().await.context("checking backend health")?;
            println!("status: {}", health.status);
            if let Some(timestamp) = health.timestamp {
                println!("timestamp: {}", timestamp);
            }
            for (name, value) in &health.components {
                println!("{}: {}", name, value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string()));
            }
            if let Some(error) = &health.error {
                println!("error: {}", error);
            }
            Ok(if health.is_healthy() { 0 } else { EXIT_ERROR })
        }
    }
}

fn print_courses(courses: &[Course]) {
    if courses.is_empty() {
        println!("No courses available.");
        return;
    }

    for course in courses {
        println!("{}. {} [{} · {}]", course.id, course.title, course.level, course.duration);
        println!("   {}", course.description);
        for feature in &course.features {
            println!("   - {}", feature);
        }
    }
}

fn report<F: Display>(outcome: SubmitOutcome<F>) -> i32 {
    match outcome {
        SubmitOutcome::Completed(SubmitStatus::Success { message }) => {
            println!("✅ {}", message);
            0
        }
        SubmitOutcome::Completed(SubmitStatus::Error { message }) => {
            eprintln!("❌ {}", message);
            EXIT_ERROR
        }
        SubmitOutcome::Blocked { missing } => {
            let names: Vec<String> = missing.iter().map(|f| f.to_string()).collect();
            eprintln!("❌ Please fill in the required fields: {}", names.join(", "));
            EXIT_BLOCKED
        }
        SubmitOutcome::AlreadySubmitting => {
            eprintln!("A submission is already in progress.");
            EXIT_BLOCKED
        }
    }
}
