use models::{text_length, Failure, RuleSet};

pub fn validate_username(username: &str, rules: &RuleSet) -> Result<(), Failure> {
    let min = rules.username_min();
    if text_length(username) < min {
        return Err(Failure::TooShort { min });
    }

    Ok(())
}
