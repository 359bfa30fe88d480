use crate::{validate_email, validate_password, validate_username};
use models::{Failure, FieldKind, FieldResult, FormData, FormResult, Messages, RuleOptions, RuleSet};

const USERNAME_LABEL: &str = "Nom d’utilisateur";
const EMAIL_LABEL: &str = "Email";
const PASSWORD_LABEL: &str = "Mot de passe";

/// Checks usernames, emails and passwords against a fixed rule set.
///
/// Every check is a pure function of its inputs and the configuration, so a
/// single `Validator` can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: RuleSet,
    messages: Messages,
}

impl Validator {
    pub fn new(rules: RuleSet) -> Self {
        Self::with_messages(rules, Messages::default())
    }

    pub fn with_messages(rules: RuleSet, messages: Messages) -> Self {
        Validator { rules, messages }
    }

    /// Resolve raw options, clamping out-of-range values instead of failing
    pub fn from_options(options: &RuleOptions) -> Self {
        Self::from_options_with_messages(options, Messages::default())
    }

    pub fn from_options_with_messages(options: &RuleOptions, messages: Messages) -> Self {
        for adjustment in options.adjustments() {
            logging::warning(&adjustment);
        }
        Self::with_messages(RuleSet::from(options), messages)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Check a single value. A missing or empty value always fails, whatever
    /// the kind. `FieldKind::Other` passes without any further check, so
    /// callers guarding sensitive fields must pick a recognized kind.
    pub fn check_field(
        &self,
        value: Option<&str>,
        kind: &FieldKind,
        display_name: &str,
    ) -> FieldResult {
        let value = match value {
            Some(value) if !value.is_empty() => value,
            _ => {
                return self.failure(Failure::FieldRequired, kind, display_name);
            }
        };

        let outcome = match kind {
            FieldKind::Username => validate_username(value, &self.rules),
            FieldKind::Email => validate_email(value, &self.rules),
            FieldKind::Password => validate_password(value, &self.rules),
            FieldKind::Other(name) => {
                if logging::enabled(logging::LogLevel::Debug) {
                    logging::debug(&format!(
                        "No rules for field kind '{}' ({}), accepting value",
                        name, display_name
                    ));
                }
                Ok(())
            }
        };

        match outcome {
            Ok(()) => FieldResult::pass(self.messages.ok.as_str()),
            Err(failure) => self.failure(failure, kind, display_name),
        }
    }

    /// Like `check_field`, with the kind given as a string
    pub fn check(&self, value: Option<&str>, kind: &str, display_name: &str) -> FieldResult {
        self.check_field(value, &FieldKind::from(kind), display_name)
    }

    pub fn register(&self, data: &FormData) -> FormResult {
        let mut result = FormResult::new();
        result.add_field(
            "username",
            self.check_field(data.username.as_deref(), &FieldKind::Username, USERNAME_LABEL),
        );
        result.add_field(
            "email",
            self.check_field(data.email.as_deref(), &FieldKind::Email, EMAIL_LABEL),
        );
        result.add_field(
            "password",
            self.check_field(data.password.as_deref(), &FieldKind::Password, PASSWORD_LABEL),
        );

        log_outcome("register", &result);
        result
    }

    pub fn login(&self, data: &FormData) -> FormResult {
        let mut result = FormResult::new();
        result.add_field(
            "email",
            self.check_field(data.email.as_deref(), &FieldKind::Email, EMAIL_LABEL),
        );
        result.add_field(
            "password",
            self.check_field(data.password.as_deref(), &FieldKind::Password, PASSWORD_LABEL),
        );

        log_outcome("login", &result);
        result
    }

    fn failure(&self, failure: Failure, kind: &FieldKind, display_name: &str) -> FieldResult {
        let message = self.messages.render(&failure, kind, display_name);
        FieldResult::fail(failure, message)
    }
}

fn log_outcome(form: &str, result: &FormResult) {
    if !logging::enabled(logging::LogLevel::Debug) {
        return;
    }

    if result.valid {
        logging::debug(&format!("{} form is valid", form));
    } else {
        let invalid: Vec<&str> = result.invalid_fields().map(|(name, _)| name).collect();
        logging::debug(&format!(
            "{} form rejected, invalid fields: {}",
            form,
            invalid.join(", ")
        ));
    }
}
