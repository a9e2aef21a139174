//! Input rules for account fields and the contact form.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#,
    )
    .expect("email pattern is valid")
});

static INJECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\b(SELECT|INSERT|UPDATE|DELETE|DROP|EXEC|UNION|SLEEP|OUTFILE|SCRIPT|IFRAME|ALERT|ONERROR|ONLOAD)\b|--|/\*|\*/|;|\||`)",
    )
    .expect("injection pattern is valid")
});

static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

const PASSWORD_SPECIALS: &str = "@$!%*?&-";

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(&email.to_lowercase())
}

/// At least 8 characters with an uppercase letter, a digit and one of `@$!%*?&-`, and
/// nothing outside letters, digits and those specials.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
        && password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c))
}

/// Checks a username, returning the first violated rule.
pub fn check_username(username: &str) -> Result<(), &'static str> {
    if username.chars().count() < 4 {
        return Err("Min 4 characters");
    }
    if !username.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Must include a lowercase letter");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err("Only a-z, 0-9, _ , -");
    }
    Ok(())
}

pub fn is_injection_attempt(input: &str) -> bool {
    INJECTION_RE.is_match(input)
}

/// Removes every HTML tag, keeping the text content.
pub fn strip_html(input: &str) -> String {
    HTML_TAG_RE.replace_all(input, "").into_owned()
}
