use models::{Failure, FieldKind, FormData, RuleOptions};
use validators::Validator;

fn strict_validator() -> Validator {
    Validator::from_options(&RuleOptions {
        strict_password: Some(true),
        ..Default::default()
    })
}

#[test]
fn test_register_rejects_every_bad_field() {
    let validator = Validator::default();
    let data = FormData::default()
        .with_username("ab")
        .with_email("bad")
        .with_password("abc");

    let result = validator.register(&data);
    assert!(!result.valid);
    assert_eq!(result.fields.len(), 3);
    assert!(result.fields.values().all(|field| !field.valid));

    assert_eq!(
        result.field("username").unwrap().message,
        "Nom d’utilisateur doit avoir au moins 3 caractères."
    );
    assert_eq!(
        result.field("email").unwrap().failure,
        Some(Failure::InvalidFormat)
    );
    assert_eq!(
        result.field("password").unwrap().failure,
        Some(Failure::TooShort { min: 6 })
    );
}

#[test]
fn test_register_accepts_good_data() {
    let validator = Validator::default();
    let data = FormData::default()
        .with_username("alice")
        .with_email("a@b.com")
        .with_password("abcdef");

    let result = validator.register(&data);
    assert!(result.valid);
    let keys: Vec<&str> = result.fields.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["username", "email", "password"]);
    assert!(result.fields.values().all(|field| field.message == "OK"));
}

#[test]
fn test_login_with_no_data_requires_both_fields() {
    let validator = Validator::default();
    let result = validator.login(&FormData::default());

    assert!(!result.valid);
    assert_eq!(result.fields.len(), 2);
    assert!(result.field("username").is_none());

    let email = result.field("email").unwrap();
    assert_eq!(email.failure, Some(Failure::FieldRequired));
    assert_eq!(email.message, "Email est requis.");

    let password = result.field("password").unwrap();
    assert_eq!(password.failure, Some(Failure::FieldRequired));
    assert_eq!(password.message, "Mot de passe est requis.");
}

#[test]
fn test_register_with_no_data_requires_every_field() {
    let validator = Validator::default();
    let result = validator.register(&FormData::default());

    assert!(!result.valid);
    let keys: Vec<&str> = result.fields.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["username", "email", "password"]);
    assert!(result
        .fields
        .values()
        .all(|field| field.failure == Some(Failure::FieldRequired)));
    assert_eq!(
        result.field("username").unwrap().message,
        "Nom d’utilisateur est requis."
    );
}

#[test]
fn test_login_ignores_username() {
    let validator = Validator::default();
    let data = FormData::default()
        .with_username("x")
        .with_email("a@b.com")
        .with_password("abcdef");
    assert!(validator.login(&data).valid);
}

#[test]
fn test_non_string_form_values_are_required() {
    let validator = Validator::default();
    let data: FormData =
        serde_json::from_str(r#"{"username": ["alice"], "email": 7, "password": true}"#).unwrap();

    let result = validator.register(&data);
    assert!(result
        .fields
        .values()
        .all(|field| field.failure == Some(Failure::FieldRequired)));
}

#[test]
fn test_strict_password_through_the_validator() {
    let validator = strict_validator();
    let check = |value: &str| validator.check_field(Some(value), &FieldKind::Password, "X");

    let result = check("abcdef");
    assert_eq!(result.failure, Some(Failure::MissingSpecialChar));
    assert_eq!(result.message, "Un caractère spécial (!@#$%^&*) est requis.");

    let result = check("abcdef!");
    assert_eq!(result.failure, Some(Failure::MissingDigit));
    assert_eq!(result.message, "Un chiffre est requis.");

    assert!(check("abcdef!1").valid);
}

#[test]
fn test_domain_restriction_through_the_validator() {
    let validator = Validator::from_options(&RuleOptions {
        allowed_email_domains: Some(vec!["example.com".to_string()]),
        ..Default::default()
    });

    let rejected = validator.check(Some("a@other.com"), "email", "X");
    assert_eq!(rejected.failure, Some(Failure::DomainNotAllowed));
    assert_eq!(rejected.message, "Domaine email non autorisé.");

    assert!(validator.check(Some("a@example.com"), "email", "X").valid);
}

#[test]
fn test_repeated_calls_give_identical_results() {
    let validator = strict_validator();
    let data = FormData::default()
        .with_username("bob")
        .with_email("bob@example.com")
        .with_password("hunter2");

    assert_eq!(validator.register(&data), validator.register(&data));
    assert_eq!(validator.login(&data), validator.login(&data));
    assert_eq!(
        validator.check(Some("x"), "username", "X"),
        validator.check(Some("x"), "username", "X")
    );
}

#[test]
fn test_concurrent_checks_share_one_validator() {
    let validator = std::sync::Arc::new(Validator::default());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let validator = validator.clone();
            std::thread::spawn(move || {
                let data = FormData::default()
                    .with_email(format!("user{}@example.com", i))
                    .with_password("abcdef");
                validator.login(&data).valid
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
