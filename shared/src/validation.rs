use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static CODE_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s,;]+").unwrap());

/// Mirrors the scoring service's own check so obviously bad input is caught
/// before a round trip.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.len() < 3 || !email.contains('@') {
        return Err(ValidationError::new("invalid_email_format"));
    }
    Ok(())
}

/// Splits free-form code input into distinct codes, keeping the order they
/// were typed in.
pub fn parse_codes(input: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for code in CODE_SEPARATORS.split(input) {
        let code = code.trim();
        if !code.is_empty() && !codes.iter().any(|seen| seen.eq_ignore_ascii_case(code)) {
            codes.push(code.to_string());
        }
    }
    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b").is_ok());
        assert!(validate_email("  visitor@example.com ").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("@b").is_err());
        assert!(validate_email("visitor.example.com").is_err());
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!(
            parse_codes(" SUMMER10, winter5;;summer10\nspring "),
            vec!["SUMMER10", "winter5", "spring"]
        );
        assert!(parse_codes(" ,; ").is_empty());
    }
}
