use lazy_static::lazy_static;
use models::{Failure, RuleSet};
use regex::Regex;

// Whitespace as ECMAScript defines it. Unicode White_Space differs: it adds
// U+0085 and leaves out U+FEFF.
const WHITESPACE: &str = r"\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

lazy_static! {
    // local@domain.tld, no whitespace or extra '@' in any part
    static ref EMAIL_PATTERN: Regex = {
        let part = format!("[^{}@]+", WHITESPACE);
        Regex::new(&format!(r"^{0}@{0}\.{0}$", part)).unwrap()
    };
}

/// Everything after the first '@'
pub fn email_domain(email: &str) -> Option<&str> {
    email.split_once('@').map(|(_, domain)| domain)
}

pub fn validate_email(email: &str, rules: &RuleSet) -> Result<(), Failure> {
    if !EMAIL_PATTERN.is_match(email) {
        return Err(Failure::InvalidFormat);
    }

    if !rules.allowed_email_domains().is_empty() {
        let allowed = email_domain(email)
            .map(|domain| rules.is_domain_allowed(domain))
            .unwrap_or(false);
        if !allowed {
            return Err(Failure::DomainNotAllowed);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::RuleOptions;

    fn restricted(domains: &[&str]) -> RuleSet {
        RuleSet::from(RuleOptions {
            allowed_email_domains: Some(domains.iter().map(|d| d.to_string()).collect()),
            ..Default::default()
        })
    }

    #[test]
    fn test_email_format() {
        let rules = RuleSet::default();
        assert_eq!(validate_email("a@b.com", &rules), Ok(()));
        assert_eq!(
            validate_email("user.name+tag@mail.example.org", &rules),
            Ok(())
        );

        for bad in [
            "not-an-email",
            "a@b",
            "@b.com",
            "a@.com",
            "a@b.",
            "a b@c.com",
            "a@b@c.com",
            "a@b.com ",
        ] {
            assert_eq!(
                validate_email(bad, &rules),
                Err(Failure::InvalidFormat),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_email_whitespace_set() {
        let rules = RuleSet::default();
        for bad in [
            "a\u{FEFF}b@c.com",
            "a\u{A0}b@c.com",
            "a@b\u{3000}.com",
            "a@b.c\u{2028}om",
            "a\tb@c.com",
        ] {
            assert_eq!(
                validate_email(bad, &rules),
                Err(Failure::InvalidFormat),
                "{:?} should be rejected",
                bad
            );
        }

        // NEL is not whitespace in that set
        assert_eq!(validate_email("a\u{85}b@c.com", &rules), Ok(()));
    }

    #[test]
    fn test_domain_allow_list() {
        let rules = restricted(&["example.com"]);
        assert_eq!(validate_email("a@example.com", &rules), Ok(()));
        assert_eq!(
            validate_email("a@other.com", &rules),
            Err(Failure::DomainNotAllowed)
        );
        // Exact membership only, no subdomain or case folding
        assert_eq!(
            validate_email("a@mail.example.com", &rules),
            Err(Failure::DomainNotAllowed)
        );
        assert_eq!(
            validate_email("a@Example.com", &rules),
            Err(Failure::DomainNotAllowed)
        );
    }

    #[test]
    fn test_format_is_checked_before_domain() {
        let rules = restricted(&["example.com"]);
        assert_eq!(
            validate_email("bad@example", &rules),
            Err(Failure::InvalidFormat)
        );
    }

    #[test]
    fn test_email_domain() {
        assert_eq!(email_domain("a@example.com"), Some("example.com"));
        assert_eq!(email_domain("a@b@c"), Some("b@c"));
        assert_eq!(email_domain("nobody"), None);
    }
}
