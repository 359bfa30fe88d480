use models::{text_length, Failure, RuleSet, SPECIAL_CHARS};

/// Length first, then (strict mode only) a special character, then a digit.
/// The first rule that fails is reported.
pub fn validate_password(password: &str, rules: &RuleSet) -> Result<(), Failure> {
    let min = rules.password_min();
    if text_length(password) < min {
        return Err(Failure::TooShort { min });
    }

    if rules.strict_password() {
        if !password.contains(SPECIAL_CHARS) {
            return Err(Failure::MissingSpecialChar);
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(Failure::MissingDigit);
        }
    }

    Ok(())
}
