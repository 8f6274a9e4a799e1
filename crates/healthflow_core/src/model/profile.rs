//! Local user profile and the login/registration screen mode.

use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_NAME: &str = "Health Enthusiast";
pub const DEFAULT_USER_EMAIL: &str = "user@healthflow.com";
pub const DEFAULT_AVATAR: &str = "😊";

/// Stored identity of the single on-device user.
///
/// `credential` is either an Argon2id PHC string or, for data written
/// by older app versions, the plaintext password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub credential: String,
    pub avatar: String,
    pub member_since: String,
}

/// Which form the auth screen currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    /// Switches between the login and registration forms.
    pub fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }

    pub fn requires_name(self) -> bool {
        matches!(self, Self::Register)
    }

    pub fn offers_remember_me(self) -> bool {
        matches!(self, Self::Login)
    }
}

#[cfg(test)]
mod tests {
    use super::AuthMode;

    #[test]
    fn toggling_twice_returns_to_login() {
        let mode = AuthMode::default();
        assert_eq!(mode, AuthMode::Login);
        assert_eq!(mode.toggled(), AuthMode::Register);
        assert_eq!(mode.toggled().toggled(), AuthMode::Login);
    }

    #[test]
    fn register_mode_asks_for_name_and_hides_remember_me() {
        assert!(AuthMode::Register.requires_name());
        assert!(!AuthMode::Register.offers_remember_me());
        assert!(AuthMode::Login.offers_remember_me());
        assert!(!AuthMode::Login.requires_name());
    }
}
