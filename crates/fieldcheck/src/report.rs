use colored::*;
use models::{FieldResult, FormResult, RuleSet};
use serde::Serialize;

pub fn format_field(name: &str, result: &FieldResult) -> String {
    if result.valid {
        format!("{} {}: {}", "✅".green(), name, result.message.green())
    } else {
        format!("{} {}: {}", "❌".red(), name, result.message.red())
    }
}

pub fn format_form(form: &str, result: &FormResult) -> String {
    let mut lines = Vec::with_capacity(result.fields.len() + 1);
    for (name, field) in &result.fields {
        lines.push(format!("  {}", format_field(name, field)));
    }

    let summary = if result.valid {
        format!("{} {} form is valid", "✅".green(), form)
    } else {
        let count = result.invalid_fields().count();
        format!(
            "{} {} form has {} invalid field{}",
            "❌".red(),
            form,
            count,
            if count == 1 { "" } else { "s" }
        )
    };
    lines.push(summary);

    lines.join("\n")
}

pub fn format_rules(rules: &RuleSet) -> String {
    let domains = if rules.allowed_email_domains().is_empty() {
        "any".to_string()
    } else {
        rules
            .allowed_email_domains()
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "{}\n  username_min: {}\n  password_min: {}\n  strict_password: {}\n  allowed_email_domains: {}",
        "Rules".bold(),
        rules.username_min(),
        rules.password_min(),
        rules.strict_password(),
        domains
    )
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}
