//! Credential checks and registration validation.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
    )
    .expect("valid email regex")
});

/// Recoverable registration input problems, shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    EmptyField,
    PasswordTooShort,
    InvalidEmail,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField => write!(f, "Please fill all fields"),
            Self::PasswordTooShort => write!(
                f,
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            ),
            Self::InvalidEmail => write!(f, "Please enter a valid email"),
        }
    }
}

impl Error for ValidationError {}

/// First screen shown on app start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchRoute {
    Onboarding,
    Login,
    Home,
}

/// Onboarding comes first, then authentication.
pub fn launch_route(onboarding_completed: bool, logged_in: bool) -> LaunchRoute {
    match (onboarding_completed, logged_in) {
        (false, _) => LaunchRoute::Onboarding,
        (true, false) => LaunchRoute::Login,
        (true, true) => LaunchRoute::Home,
    }
}

/// Trimmed, validated registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Exact, case-sensitive comparison of both fields.
pub fn authenticate(
    candidate_email: &str,
    candidate_password: &str,
    stored_email: &str,
    stored_password: &str,
) -> bool {
    candidate_email == stored_email && candidate_password == stored_password
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validates registration input in the order the form reports problems.
pub fn register(name: &str, email: &str, password: &str) -> Result<Registration, ValidationError> {
    let (name, email, password) = (name.trim(), email.trim(), password.trim());

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(ValidationError::EmptyField);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(Registration {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })
}
