//! Sign-in and sign-up form input and its validation rules.
//!
//! Validation runs before the auth service is contacted. It exists for early
//! feedback only: the auth service enforces its own rules on every call.
//! Each field reports the first rule it breaks, in declaration order.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::LazyLock};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const EMAIL_MAX_CHARS: usize = 100;
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const PASSWORD_MAX_CHARS: usize = 100;

const MSG_EMAIL_INVALID: &str = "Please enter a valid email";
const MSG_EMAIL_TOO_LONG: &str = "Email must be less than 100 characters";
const MSG_PASSWORD_REQUIRED: &str = "Password is required";
const MSG_PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
const MSG_PASSWORD_TOO_LONG: &str = "Password must be less than 100 characters";
const MSG_PASSWORD_WEAK: &str = "Password must contain uppercase, lowercase, and number";
const MSG_NAME_TOO_SHORT: &str = "Name must be at least 2 characters";
const MSG_NAME_TOO_LONG: &str = "Name must be less than 50 characters";

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// Per-field validation messages; `None` means the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

#[derive(Clone, Default, Deserialize, Serialize)]
pub struct SignInForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for SignInForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInForm")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl SignInForm {
    /// Check the sign-in rules.
    ///
    /// # Errors
    /// Returns the message for every field that breaks a rule.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let password = if self.password.is_empty() {
            Some(MSG_PASSWORD_REQUIRED)
        } else if char_len(&self.password) > PASSWORD_MAX_CHARS {
            Some(MSG_PASSWORD_TOO_LONG)
        } else {
            None
        };

        FieldErrors {
            name: None,
            email: check_email(&self.email).map(str::to_string),
            password: password.map(str::to_string),
        }
        .into_result()
    }
}

#[derive(Clone, Default, Deserialize, Serialize)]
pub struct SignUpForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for SignUpForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl SignUpForm {
    /// Check the sign-up rules, including password strength.
    ///
    /// # Errors
    /// Returns the message for every field that breaks a rule.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let name_len = char_len(&self.name);
        let name = if name_len < NAME_MIN_CHARS {
            Some(MSG_NAME_TOO_SHORT)
        } else if name_len > NAME_MAX_CHARS {
            Some(MSG_NAME_TOO_LONG)
        } else {
            None
        };

        let password_len = char_len(&self.password);
        let password = if password_len < PASSWORD_MIN_CHARS {
            Some(MSG_PASSWORD_TOO_SHORT)
        } else if password_len > PASSWORD_MAX_CHARS {
            Some(MSG_PASSWORD_TOO_LONG)
        } else if !strong_password(&self.password) {
            Some(MSG_PASSWORD_WEAK)
        } else {
            None
        };

        FieldErrors {
            name: name.map(str::to_string),
            email: check_email(&self.email).map(str::to_string),
            password: password.map(str::to_string),
        }
        .into_result()
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn check_email(email: &str) -> Option<&'static str> {
    if !valid_email(email) {
        Some(MSG_EMAIL_INVALID)
    } else if char_len(email) > EMAIL_MAX_CHARS {
        Some(MSG_EMAIL_TOO_LONG)
    } else {
        None
    }
}

/// Email format check: dotted local part without leading or doubled dots,
/// dotted domain ending in an alphabetic TLD of two or more letters.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    if email.starts_with('.') || email.contains("..") {
        return false;
    }

    EMAIL_REGEX.is_match(email)
}

/// At least one ASCII uppercase letter, one lowercase letter and one digit.
#[must_use]
pub fn strong_password(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}
