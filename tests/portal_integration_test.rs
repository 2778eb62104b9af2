use bootcamp_portal::core::forms::{ContactField, EnrollmentField};
use bootcamp_portal::{
    CatalogViewModel, EnrollmentController, FormController, HttpBackend, LevelFilter, SubmitOutcome, SubmitStatus,
};
use httpmock::prelude::*;
use serde_json::json;
use std::time::Duration;
use tokio_test::assert_ok;

fn catalog_body() -> serde_json::Value {
    json!({
        "status": "success",
        "data": [
            {
                "id": "1",
                "title": "Selenium WebDriver Fundamentals",
                "description": "Master the basics of Selenium WebDriver for web automation testing",
                "duration": "4 weeks",
                "level": "Beginner",
                "image": "https://images.example.com/1.png",
                "features": ["Element locators", "WebDriver commands"]
            },
            {
                "id": "2",
                "title": "Advanced Test Automation",
                "description": "Build robust automation frameworks with advanced testing patterns",
                "duration": "6 weeks",
                "level": "Advanced",
                "image": "https://images.example.com/2.png",
                "features": ["Page Object Model"]
            },
            {
                "id": "3",
                "title": "API Testing Mastery",
                "description": "Comprehensive API testing",
                "duration": "5 weeks",
                "level": "Intermediate",
                "image": "https://images.example.com/3.png",
                "features": []
            }
        ],
        "total_courses": 3
    })
}

fn filled_enrollment(server: &MockServer, default_interest: Option<&str>) -> EnrollmentController<HttpBackend> {
    let controller = FormController::enrollment(HttpBackend::new(&server.base_url()), default_interest);
    controller.update_field(EnrollmentField::Name, "Ada Lovelace").unwrap();
    controller.update_field(EnrollmentField::Email, "ada@example.com").unwrap();
    controller.update_field(EnrollmentField::Country, "United Kingdom").unwrap();
    controller.update_field(EnrollmentField::PhoneNumber, "+44 1234 567890").unwrap();
    controller.update_field(EnrollmentField::ExperienceLevel, "Beginner").unwrap();
    controller
        .update_field(EnrollmentField::CourseInterest, "Selenium WebDriver Fundamentals")
        .unwrap();
    controller
}

#[tokio::test]
async fn test_catalog_loads_and_filters_case_insensitively() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/courses");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(catalog_body());
    });

    let catalog = CatalogViewModel::new(HttpBackend::new(&server.base_url()));
    assert!(!catalog.is_loading());
    catalog.load_courses().await;

    api_mock.assert();
    assert_eq!(catalog.courses().len(), 3);
    assert_eq!(catalog.filtered_courses().len(), 3);

    catalog.set_level_filter("beginner".parse::<LevelFilter>().unwrap());
    let filtered = catalog.filtered_courses();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "1");

    assert_eq!(
        catalog.course_titles(),
        vec![
            "Selenium WebDriver Fundamentals",
            "Advanced Test Automation",
            "API Testing Mastery"
        ]
    );
}

#[tokio::test]
async fn test_catalog_missing_data_field_is_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/courses");
        then.status(200).json_body(json!({"status": "success"}));
    });

    let catalog = CatalogViewModel::new(HttpBackend::new(&server.base_url()));
    catalog.load_courses().await;
    assert!(catalog.courses().is_empty());
}

#[tokio::test]
async fn test_catalog_failure_replaces_stale_courses() {
    let server = MockServer::start();
    let mut ok_mock = server.mock(|when, then| {
        when.method(GET).path("/api/courses");
        then.status(200).json_body(catalog_body());
    });

    let catalog = CatalogViewModel::new(HttpBackend::new(&server.base_url()));
    catalog.load_courses().await;
    assert_eq!(catalog.courses().len(), 3);

    ok_mock.delete();
    server.mock(|when, then| {
        when.method(GET).path("/api/courses");
        then.status(500).json_body(json!({"detail": "boom"}));
    });

    catalog.load_courses().await;
    assert!(catalog.courses().is_empty());
    assert!(!catalog.is_loading());
}

#[tokio::test]
async fn test_catalog_malformed_body_is_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/courses");
        then.status(200).body("<html>not json</html>");
    });

    let catalog = CatalogViewModel::new(HttpBackend::new(&server.base_url()));
    catalog.load_courses().await;
    assert!(catalog.courses().is_empty());
}

#[tokio::test]
async fn test_loading_flag_only_while_outstanding() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/courses");
        then.status(200)
            .delay(Duration::from_millis(200))
            .json_body(catalog_body());
    });

    let catalog = CatalogViewModel::new(HttpBackend::new(&server.base_url()));
    let (_, seen_loading) = tokio::join!(catalog.load_courses(), async { catalog.is_loading() });

    assert!(seen_loading);
    assert!(!catalog.is_loading());
}

#[tokio::test]
async fn test_enrollment_success_resets_form() -> anyhow::Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/enroll")
            .json_body_partial(r#"{"experience_level": "Beginner", "phone_number": "+44 1234 567890"}"#);
        then.status(200).json_body(json!({
            "status": "success",
            "message": "Enrollment submitted successfully! Our team will contact you within 24 hours.",
            "enrollment_id": "7f9c"
        }));
    });

    let controller = filled_enrollment(&server, Some("API Testing Mastery"));
    let outcome = controller.submit().await;

    api_mock.assert();
    assert_eq!(
        outcome,
        SubmitOutcome::Completed(SubmitStatus::Success {
            message: "Enrollment submitted successfully! Our team will contact you within 24 hours."
                .to_string()
        })
    );

    let fields = controller.fields();
    assert!(fields.name.is_empty());
    assert!(fields.email.is_empty());
    assert!(fields.experience_level.is_none());
    assert_eq!(fields.course_interest, "API Testing Mastery");
    Ok(())
}

#[tokio::test]
async fn test_enrollment_validation_errors_are_joined() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/enroll");
        then.status(422).json_body(json!({
            "detail": [
                {"loc": ["body", "email"], "msg": "Invalid email", "type": "value_error"},
                {"loc": ["body", "phone_number"], "msg": "Phone required", "type": "value_error"}
            ]
        }));
    });

    let controller = filled_enrollment(&server, None);
    let outcome = controller.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Completed(SubmitStatus::Error {
            message: "Invalid email, Phone required".to_string()
        })
    );
    assert_eq!(controller.fields().name, "Ada Lovelace");
}

#[tokio::test]
async fn test_contact_string_detail_is_used_directly() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/contact");
        then.status(429).json_body(json!({"detail": "Rate limited"}));
    });

    let controller = FormController::contact(HttpBackend::new(&server.base_url()));
    assert_ok!(controller.update_field(ContactField::Name, "Grace"));
    assert_ok!(controller.update_field(ContactField::Email, "grace@example.com"));
    assert_ok!(controller.update_field_by_name("message", "When does the next cohort start?"));

    controller.submit().await;
    assert_eq!(
        controller.status(),
        Some(SubmitStatus::Error {
            message: "Rate limited".to_string()
        })
    );
}

#[tokio::test]
async fn test_contact_without_detail_uses_fallback() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/contact");
        then.status(500).body("Internal Server Error");
    });

    let controller = FormController::contact(HttpBackend::new(&server.base_url()));
    controller.update_field(ContactField::Name, "Grace").unwrap();
    controller.update_field(ContactField::Email, "grace@example.com").unwrap();
    controller.update_field(ContactField::Message, "Hello there, team!").unwrap();

    controller.submit().await;
    assert_eq!(
        controller.status().unwrap().message(),
        "Failed to submit contact form. Please try again."
    );
}

#[tokio::test]
async fn test_unreachable_backend_uses_fallback() {
    let unreachable = FormController::enrollment(HttpBackend::new("http://127.0.0.1:1"), None);
    for field in EnrollmentField::ALL {
        let value = match field {
            EnrollmentField::ExperienceLevel => "Advanced".to_string(),
            _ => format!("value for {}", field),
        };
        unreachable.update_field(field, &value).unwrap();
    }

    let outcome = unreachable.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Completed(SubmitStatus::Error {
            message: "Failed to submit enrollment. Please try again.".to_string()
        })
    );
}

#[tokio::test]
async fn test_second_submit_while_in_flight_sends_one_request() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/api/enroll");
        then.status(200)
            .delay(Duration::from_millis(300))
            .json_body(json!({"message": "Enrollment submitted successfully!"}));
    });

    let controller = filled_enrollment(&server, None);
    let (first, second) = tokio::join!(controller.submit(), controller.submit());

    assert!(matches!(first, SubmitOutcome::Completed(SubmitStatus::Success { .. })));
    assert_eq!(second, SubmitOutcome::AlreadySubmitting);
    assert_eq!(api_mock.hits(), 1);
}

#[tokio::test]
async fn test_abandoned_submit_allows_another_attempt() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/api/enroll");
        then.status(200)
            .delay(Duration::from_millis(300))
            .json_body(json!({"message": "Enrollment submitted successfully!"}));
    });

    let controller = filled_enrollment(&server, None);
    let abandoned = tokio::time::timeout(Duration::from_millis(50), controller.submit()).await;
    assert!(abandoned.is_err());
    assert!(!controller.is_submitting());

    let outcome = controller.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Completed(SubmitStatus::Success { .. })));
    assert!(controller.fields().name.is_empty());
    assert!(api_mock.hits() >= 1);
}

#[tokio::test]
async fn test_abandoned_load_clears_loading_flag() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/courses");
        then.status(200)
            .delay(Duration::from_millis(300))
            .json_body(catalog_body());
    });

    let catalog = CatalogViewModel::new(HttpBackend::new(&server.base_url()));
    let abandoned = tokio::time::timeout(Duration::from_millis(50), catalog.load_courses()).await;
    assert!(abandoned.is_err());
    assert!(!catalog.is_loading());

    catalog.load_courses().await;
    assert_eq!(catalog.courses().len(), 3);
    assert!(!catalog.is_loading());
}

#[tokio::test]
async fn test_blocked_submission_issues_no_request() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/api/contact");
        then.status(200).json_body(json!({"message": "ok"}));
    });

    let controller = FormController::contact(HttpBackend::new(&server.base_url()));
    controller.update_field(ContactField::Email, "grace@example.com").unwrap();

    let outcome = controller.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Blocked {
            missing: vec![ContactField::Name, ContactField::Message]
        }
    );
    assert_eq!(api_mock.hits(), 0);
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/health");
        then.status(200).json_body(json!({
            "status": "healthy",
            "timestamp": "2025-03-01T08:30:00.000001",
            "database_status": "connected"
        }));
    });

    let backend = HttpBackend::new(&server.base_url());
    let health = backend.health().await.unwrap();
    assert!(health.is_healthy());
    assert_eq!(health.components["database_status"], "connected");
}
