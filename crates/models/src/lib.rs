use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_USERNAME_MIN: usize = 3;
pub const DEFAULT_PASSWORD_MIN: usize = 6;

/// Characters accepted by the strict password rule
pub const SPECIAL_CHARS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

/// Length of `value` in UTF-16 code units, the unit the minimum lengths are
/// expressed in
pub fn text_length(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Reason a field failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Failure {
    FieldRequired,
    TooShort { min: usize },
    InvalidFormat,
    DomainNotAllowed,
    MissingSpecialChar,
    MissingDigit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldResult {
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

impl FieldResult {
    pub fn pass(message: impl Into<String>) -> Self {
        FieldResult {
            valid: true,
            message: message.into(),
            failure: None,
        }
    }

    pub fn fail(failure: Failure, message: impl Into<String>) -> Self {
        FieldResult {
            valid: false,
            message: message.into(),
            failure: Some(failure),
        }
    }
}

/// Combined outcome of a form check, keyed by field name in check order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormResult {
    pub valid: bool,
    pub fields: IndexMap<String, FieldResult>,
}

impl Default for FormResult {
    fn default() -> Self {
        Self::new()
    }
}

impl FormResult {
    pub fn new() -> Self {
        FormResult {
            valid: true,
            fields: IndexMap::new(),
        }
    }

    pub fn add_field(&mut self, name: &str, result: FieldResult) {
        if !result.valid {
            self.valid = false;
        }
        self.fields.insert(name.to_string(), result);
    }

    pub fn field(&self, name: &str) -> Option<&FieldResult> {
        self.fields.get(name)
    }

    pub fn invalid_fields(&self) -> impl Iterator<Item = (&str, &FieldResult)> {
        self.fields
            .iter()
            .filter(|(_, result)| !result.valid)
            .map(|(name, result)| (name.as_str(), result))
    }
}

/// The kind of value a field holds.
///
/// Parsing never fails: any unrecognized string becomes `Other`, which the
/// validator accepts without checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Username,
    Email,
    Password,
    Other(String),
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            FieldKind::Username => "username",
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Other(kind) => kind,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, FieldKind::Other(_))
    }
}

impl From<&str> for FieldKind {
    fn from(kind: &str) -> Self {
        match kind {
            "username" => FieldKind::Username,
            "email" => FieldKind::Email,
            "password" => FieldKind::Password,
            other => FieldKind::Other(other.to_string()),
        }
    }
}

impl FromStr for FieldKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FieldKind::from(s))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw rule options as supplied by a caller or a configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOptions {
    #[serde(alias = "usernameMin", skip_serializing_if = "Option::is_none")]
    pub username_min: Option<i64>,

    #[serde(alias = "passwordMin", skip_serializing_if = "Option::is_none")]
    pub password_min: Option<i64>,

    #[serde(alias = "strictPassword", skip_serializing_if = "Option::is_none")]
    pub strict_password: Option<bool>,

    #[serde(
        alias = "allowedEmailDomains",
        alias = "allowed_emails",
        alias = "allowedEmails",
        skip_serializing_if = "Option::is_none"
    )]
    pub allowed_email_domains: Option<Vec<String>>,
}

impl RuleOptions {
    /// Layer `overrides` on top of `self`; set fields in `overrides` win
    pub fn merge(self, overrides: RuleOptions) -> RuleOptions {
        RuleOptions {
            username_min: overrides.username_min.or(self.username_min),
            password_min: overrides.password_min.or(self.password_min),
            strict_password: overrides.strict_password.or(self.strict_password),
            allowed_email_domains: overrides
                .allowed_email_domains
                .or(self.allowed_email_domains),
        }
    }

    /// Describe every option that will be clamped when resolved into a `RuleSet`
    pub fn adjustments(&self) -> Vec<String> {
        let mut adjustments = Vec::new();
        for (name, value) in [
            ("username_min", self.username_min),
            ("password_min", self.password_min),
        ] {
            if let Some(n) = value.filter(|n| *n < 0) {
                adjustments.push(format!("{} is negative ({}), clamping to 0", name, n));
            }
        }
        adjustments
    }
}

// Absent or zero falls back to the default, negative clamps to zero
fn resolve_min(value: Option<i64>, default: usize) -> usize {
    match value {
        None | Some(0) => default,
        Some(n) if n < 0 => 0,
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
    }
}

/// Validation rules, fixed once constructed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    username_min: usize,
    password_min: usize,
    strict_password: bool,
    allowed_email_domains: IndexSet<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::from(&RuleOptions::default())
    }
}

impl From<&RuleOptions> for RuleSet {
    fn from(options: &RuleOptions) -> Self {
        RuleSet {
            username_min: resolve_min(options.username_min, DEFAULT_USERNAME_MIN),
            password_min: resolve_min(options.password_min, DEFAULT_PASSWORD_MIN),
            strict_password: options.strict_password.unwrap_or(false),
            allowed_email_domains: options
                .allowed_email_domains
                .iter()
                .flatten()
                .cloned()
                .collect(),
        }
    }
}

impl From<RuleOptions> for RuleSet {
    fn from(options: RuleOptions) -> Self {
        RuleSet::from(&options)
    }
}

impl RuleSet {
    pub fn username_min(&self) -> usize {
        self.username_min
    }

    pub fn password_min(&self) -> usize {
        self.password_min
    }

    pub fn strict_password(&self) -> bool {
        self.strict_password
    }

    pub fn allowed_email_domains(&self) -> &IndexSet<String> {
        &self.allowed_email_domains
    }

    /// An empty allow-list places no restriction on the domain
    pub fn is_domain_allowed(&self, domain: &str) -> bool {
        self.allowed_email_domains.is_empty() || self.allowed_email_domains.contains(domain)
    }
}

/// Message templates. `{field}` expands to the display name and `{min}` to
/// the configured minimum length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub ok: String,
    pub field_required: String,
    pub username_too_short: String,
    pub password_too_short: String,
    pub invalid_email: String,
    pub domain_not_allowed: String,
    pub missing_special_char: String,
    pub missing_digit: String,
}

impl Default for Messages {
    fn default() -> Self {
        Messages {
            ok: "OK".to_string(),
            field_required: "{field} est requis.".to_string(),
            username_too_short: "{field} doit avoir au moins {min} caractères.".to_string(),
            password_too_short: "Le mot de passe doit avoir au moins {min} caractères."
                .to_string(),
            invalid_email: "L'email n'est pas valide.".to_string(),
            domain_not_allowed: "Domaine email non autorisé.".to_string(),
            missing_special_char: "Un caractère spécial (!@#$%^&*) est requis.".to_string(),
            missing_digit: "Un chiffre est requis.".to_string(),
        }
    }
}

impl Messages {
    pub fn render(&self, failure: &Failure, kind: &FieldKind, field: &str) -> String {
        let (template, min) = match failure {
            Failure::FieldRequired => (&self.field_required, None),
            Failure::TooShort { min } => match kind {
                FieldKind::Password => (&self.password_too_short, Some(*min)),
                _ => (&self.username_too_short, Some(*min)),
            },
            Failure::InvalidFormat => (&self.invalid_email, None),
            Failure::DomainNotAllowed => (&self.domain_not_allowed, None),
            Failure::MissingSpecialChar => (&self.missing_special_char, None),
            Failure::MissingDigit => (&self.missing_digit, None),
        };

        // The display name goes in last so it is never itself expanded
        let template = match min {
            Some(min) => template.replace("{min}", &min.to_string()),
            None => template.clone(),
        };
        template.replace("{field}", field)
    }
}

/// Field values submitted with a register or login form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormData {
    #[serde(
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub username: Option<String>,

    #[serde(
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<String>,

    #[serde(
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub password: Option<String>,
}

impl FormData {
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

// Non-string values are treated as missing rather than rejected
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Lenient::deserialize(deserializer)? {
        Lenient::Text(text) => Some(text),
        Lenient::Other(_) => None,
    })
}
