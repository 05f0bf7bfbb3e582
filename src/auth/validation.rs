//! Client-side checks for the sign-in and sign-up forms.

use std::sync::LazyLock;

use derive_getters::Getters;
use regex::Regex;
use tracing::instrument;

/// Characters that satisfy the special-character rule.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Result of each password rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters)]
pub struct PasswordChecks {
    length: bool,
    uppercase: bool,
    lowercase: bool,
    number: bool,
    special_char: bool,
}

impl PasswordChecks {
    /// Evaluates every rule against `password`.
    #[instrument(skip(password))]
    pub fn evaluate(password: &str) -> Self {
        Self {
            length: password.chars().count() >= MIN_PASSWORD_LENGTH,
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            number: password.chars().any(|c| c.is_ascii_digit()),
            special_char: password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
        }
    }

    /// True when every rule passes.
    pub fn all_passed(&self) -> bool {
        self.length && self.uppercase && self.lowercase && self.number && self.special_char
    }

    /// Rule labels paired with their outcome, in display order.
    pub fn items(&self) -> [(&'static str, bool); 5] {
        [
            ("At least 8 characters", self.length),
            ("One uppercase letter", self.uppercase),
            ("One lowercase letter", self.lowercase),
            ("One number", self.number),
            ("One special character", self.special_char),
        ]
    }
}

/// Accepted shape of an account email: `local@domain.tld`, TLD 2 to 6 letters.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,6}$";

static EMAIL_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN));

/// Checks `local@domain.tld` where the TLD is 2 to 6 letters.
#[instrument(skip(email))]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_ok_and(|re| re.is_match(email))
}

/// A filled-in sign-in form.
#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl SignInForm {
    /// Password rule results for the current input.
    pub fn password_checks(&self) -> PasswordChecks {
        PasswordChecks::evaluate(&self.password)
    }

    /// True when the form may be submitted.
    pub fn can_submit(&self) -> bool {
        is_valid_email(&self.email) && self.password_checks().all_passed()
    }
}

/// A filled-in sign-up form.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    /// Display name.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl SignUpForm {
    /// Password rule results for the current input.
    pub fn password_checks(&self) -> PasswordChecks {
        PasswordChecks::evaluate(&self.password)
    }

    /// First problem with the form, if any.
    pub fn first_error(&self) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            Some("Name is required")
        } else if self.email.is_empty() {
            Some("Email is required")
        } else if !is_valid_email(&self.email) {
            Some("Invalid email format")
        } else if self.password.is_empty() {
            Some("Password is required")
        } else if !self.password_checks().all_passed() {
            Some("Password does not meet the requirements")
        } else {
            None
        }
    }

    /// True when the form may be submitted.
    pub fn can_submit(&self) -> bool {
        self.first_error().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_password_passes_all_rules() {
        let checks = PasswordChecks::evaluate("Passw0rd!");
        assert!(checks.all_passed());
    }

    #[test]
    fn test_each_rule_reported() {
        let checks = PasswordChecks::evaluate("short");
        assert!(!checks.length());
        assert!(!checks.uppercase());
        assert!(checks.lowercase());
        assert!(!checks.number());
        assert!(!checks.special_char());
        assert_eq!(checks.items().iter().filter(|(_, ok)| *ok).count(), 1);
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("jane.doe@example.com"));
        assert!(is_valid_email("a_b-c@mail.co.uk"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("jane@example.c"));
        assert!(!is_valid_email("jane@example.toolongtld"));
        assert!(!is_valid_email("jane@exa mple.com"));
        assert!(!is_valid_email("jane@@example.com"));
        assert!(!is_valid_email("jane@example.com "));
    }

    #[test]
    fn test_email_pattern_compiles() {
        assert!(EMAIL_RE.is_ok());
    }

    #[test]
    fn test_sign_up_requires_name() {
        let form = SignUpForm {
            name: "  ".to_string(),
            email: "jane@example.com".to_string(),
            password: "Passw0rd!".to_string(),
        };
        assert_eq!(form.first_error(), Some("Name is required"));
        let form = SignUpForm {
            name: "Jane".to_string(),
            ..form
        };
        assert!(form.can_submit());
    }
}
