//! Integration tests for mailtemplates
//!
//! These tests drive the public API end to end: configuration, template
//! overrides, rendering and message assembly.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use mailtemplates::{
    Config, EmailError, EmailKind, Mailer, Recipient, TemplateError, TemplateOrigin, TemplateRegistry, render,
};
use serde_json::json;
use tempfile::TempDir;

fn config() -> Config {
    Config::default()
        .with_company_name("Acme Corp")
        .with_company_address("1 Main St, Springfield")
        .with_corporation("Acme, Inc.")
        .with_from_email("no-reply@acme.test")
        .with_support_email("support@acme.test")
        .with_logo_url("https://acme.test/logo.png")
        .with_product_domain("https://console.acme.test")
        .with_docs_domain("https://docs.acme.test")
        .with_verify_url("https://console.acme.test/verify")
        .with_invite_url("https://console.acme.test/invite")
        .with_reset_url("https://console.acme.test/password-reset")
        .with_verify_subscriber_url("https://acme.test/subscribe")
        .with_verify_billing_url("https://console.acme.test/billing/verify")
        .with_questionnaire_url("https://console.acme.test/questionnaire")
}

fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create template dir");
    }
    fs::write(path, content).expect("Failed to write template");
}

/// Payload with every field any default template refers to
fn full_payload() -> serde_json::Value {
    json!({
        "company_name": "Acme Corp",
        "company_address": "1 Main St, Springfield",
        "corporation": "Acme, Inc.",
        "from_email": "no-reply@acme.test",
        "support_email": "support@acme.test",
        "questionnaire_email": "",
        "logo_url": "",
        "urls": {"product": "https://console.acme.test", "docs": "https://docs.acme.test"},
        "subject": "",
        "recipient": {"email": "alice@example.com", "first_name": "Alice", "last_name": null},
        "organization": "Acme",
        "organization_name": "Acme",
        "inviter_name": "Jane Doe",
        "role": "org_admin",
        "assessment_name": "SOC 2",
        "verify_url": "https://console.acme.test/verify?token=t",
        "invite_url": "https://console.acme.test/invite?token=t",
        "reset_url": "https://console.acme.test/password-reset?token=t",
        "verify_subscriber_url": "https://acme.test/subscribe?token=t",
        "verify_billing_url": "https://console.acme.test/billing/verify?token=t",
        "nda_url": "https://trust.acme.test/nda?token=t",
        "trust_center_url": "https://trust.acme.test",
        "auth_url": "https://trust.acme.test/auth?token=t",
        "changed_at": "March 5, 2024 at 14:30 UTC",
        "old_billing_email": "old@acme.test",
        "new_billing_email": "new@acme.test"
    })
}

// =============================================================================
// Rendering Tests
// =============================================================================

#[test]
fn test_every_kind_renders_both_bodies() {
    let registry = TemplateRegistry::load_defaults().expect("Default templates should parse");
    let payload = full_payload();

    for kind in EmailKind::ALL {
        let rendered = render(&registry, kind.template_name(), &payload)
            .unwrap_or_else(|e| panic!("{} failed to render: {}", kind, e));

        for body in [&rendered.text, &rendered.html] {
            assert!(!body.trim().is_empty(), "{} rendered an empty body", kind);
            assert!(body.contains("alice@example.com"), "{} is missing the recipient", kind);
            assert!(body.contains("Acme Corp"), "{} is missing the company name", kind);
        }
    }
}

#[test]
fn test_unknown_name_is_missing_template() {
    let registry = TemplateRegistry::load_defaults().expect("Default templates should parse");
    let err = render(&registry, "newsletter", &full_payload()).unwrap_err();
    assert!(err.is_missing_template());
    assert!(err.to_string().contains("newsletter.txt"));
}

#[test]
fn test_missing_field_fails_render() {
    let registry = TemplateRegistry::load_defaults().expect("Default templates should parse");
    let mut payload = full_payload();
    payload.as_object_mut().unwrap().remove("verify_url");

    let err = render(&registry, "verify_email", &payload).unwrap_err();
    assert!(matches!(err, TemplateError::Render { ref name, .. } if name == "verify_email.txt"));
}

// =============================================================================
// Mailer Tests
// =============================================================================

#[test]
fn test_welcome_end_to_end() {
    let mailer = Mailer::new(config()).expect("Valid config");
    let message = mailer
        .welcome(Recipient::new("alice@example.com"), "Acme")
        .expect("Welcome should build");

    assert_eq!(message.subject, "Welcome to Acme Corp!");
    assert_eq!(message.to, vec!["alice@example.com".to_string()]);
    assert_eq!(message.from, "no-reply@acme.test");
    assert!(message.text.contains("https://console.acme.test"));
    assert!(message.html.contains("https://acme.test/logo.png"));
}

#[test]
fn test_invite_without_token_produces_no_message() {
    let mailer = Mailer::new(config()).expect("Valid config");
    let result = mailer.invite(Recipient::new("bob@example.com"), "Jane Doe", "Acme", "member", "");

    match result {
        Err(EmailError::MissingRequiredField { field }) => assert_eq!(field, "token"),
        other => panic!("expected missing token, got {:?}", other),
    }
}

#[test]
fn test_recipient_name_in_greeting() {
    let mailer = Mailer::new(config()).expect("Valid config");
    let message = mailer
        .password_reset_success(Recipient::new("carol@example.com").with_name("Carol", "Jones"))
        .expect("Should build");

    assert!(message.text.starts_with("Hi Carol,"));
    assert!(message.html.contains("Hi Carol,"));
}

#[test]
fn test_config_file_to_message() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("mailtemplates.yml");
    fs::write(
        &config_path,
        r#"
company-name: Acme Corp
company-address: 1 Main St
from-email: no-reply@acme.test
urls:
  password-reset: https://console.acme.test/password-reset
"#,
    )
    .expect("Failed to write config");

    let config = Config::load(Some(&config_path)).expect("Config should load");
    let mailer = Mailer::new(config).expect("Valid config");
    let message = mailer
        .password_reset_request(Recipient::new("alice@example.com"), "r3s3t")
        .expect("Should build");

    assert!(message.text.contains("https://console.acme.test/password-reset?token=r3s3t"));
}

// =============================================================================
// Override Tests
// =============================================================================

#[test]
fn test_override_welcome_only() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "welcome.txt", "Custom welcome for {{recipient.email}} from {{company_name}}");
    write(temp_dir.path(), "welcome.html", "<h1>Custom welcome from {{company_name}}</h1>");

    let mailer = Mailer::new(config().with_templates_path(temp_dir.path())).expect("Overrides should load");

    let welcome = mailer
        .welcome(Recipient::new("alice@example.com"), "Acme")
        .expect("Welcome should build");
    assert_eq!(welcome.text, "Custom welcome for alice@example.com from Acme Corp");
    assert_eq!(welcome.html, "<h1>Custom welcome from Acme Corp</h1>");

    let verify = mailer
        .verify_email(Recipient::new("alice@example.com"), "tok")
        .expect("Verify should build");
    assert!(!verify.text.contains("Custom welcome"));
    assert!(verify.text.contains("https://console.acme.test/verify?token=tok"));

    let registry = mailer.registry();
    assert!(matches!(
        registry.lookup("welcome.txt").unwrap().origin(),
        TemplateOrigin::Override(_)
    ));
    assert_eq!(
        registry.lookup("verify_email.txt").unwrap().origin(),
        &TemplateOrigin::Embedded
    );
}

#[test]
fn test_override_partial_scoped_to_override_templates() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "partials/footer.txt", "-- sent by {{company_name}} to {{recipient.email}}");
    write(temp_dir.path(), "welcome.txt", "{{> greeting}}\nWelcome aboard.\n{{> footer}}");

    let mailer = Mailer::new(config().with_templates_path(temp_dir.path())).expect("Overrides should load");

    let welcome = mailer
        .welcome(Recipient::new("alice@example.com").with_name("Alice", "Smith"), "Acme")
        .expect("Welcome should build");
    assert!(welcome.text.starts_with("Hi Alice,"));
    assert!(welcome.text.contains("-- sent by Acme Corp to alice@example.com"));
    assert!(!welcome.text.contains("This email was sent to"));

    let reset = mailer
        .password_reset_success(Recipient::new("alice@example.com"))
        .expect("Should build");
    assert!(reset.text.contains("This email was sent to alice@example.com"));
    assert!(!reset.text.contains("-- sent by"));
}

#[test]
fn test_broken_override_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write(temp_dir.path(), "welcome.txt", "{{#if company_name}}mismatched{{/each}}");

    let err = Mailer::new(config().with_templates_path(temp_dir.path())).unwrap_err();
    match err {
        EmailError::Configuration { source: Some(TemplateError::Parse { name, .. }), .. } => {
            assert_eq!(name, "welcome.txt");
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_shared_registry_loads_overrides_once() {
    let first = TempDir::new().expect("Failed to create temp dir");
    let second = TempDir::new().expect("Failed to create temp dir");
    write(first.path(), "welcome.txt", "first {{recipient.email}} {{company_name}}");
    write(second.path(), "welcome.txt", "second {{recipient.email}} {{company_name}}");

    let registry = Arc::new(TemplateRegistry::load_defaults().expect("Default templates should parse"));
    let a = Mailer::with_registry(config().with_templates_path(first.path()), Arc::clone(&registry))
        .expect("First override should load");
    let b = Mailer::with_registry(config().with_templates_path(second.path()), Arc::clone(&registry))
        .expect("Second load returns the first outcome");

    for mailer in [&a, &b] {
        let message = mailer
            .welcome(Recipient::new("alice@example.com"), "Acme")
            .expect("Welcome should build");
        assert!(message.text.starts_with("first "));
    }
    assert_eq!(registry.override_path(), Some(first.path()));
}

#[test]
fn test_concurrent_builds() {
    let mailer = Arc::new(Mailer::new(config()).expect("Valid config"));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let mailer = Arc::clone(&mailer);
            thread::spawn(move || {
                let email = format!("user{}@example.com", i);
                let message = mailer
                    .verify_email(Recipient::new(&email), &format!("token{}", i))
                    .expect("Verify should build");
                assert_eq!(message.to, vec![email]);
                assert!(message.text.contains(&format!("?token=token{}", i)));
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Builder thread panicked");
    }
}
