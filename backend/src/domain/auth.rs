//! Account credentials shared by signup and login.
//!
//! Both account endpoints carry a name and a password. [`LoginCredentials`]
//! checks them once at the edge so the identity ports only ever see a
//! trimmed, non-blank name and a password the hasher can take whole.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{DisplayName, UserValidationError};

/// Longest password accepted, in bytes.
///
/// bcrypt ignores everything past its 72nd input byte; longer passwords are
/// refused rather than silently truncated.
pub const PASSWORD_MAX_BYTES: usize = 72;

/// Raised when credential payload values are unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    EmptyUsername,
    EmptyPassword,
    PasswordTooLong { max: usize },
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} bytes")
            }
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Account name and password as submitted.
///
/// The name is trimmed; the password is kept byte for byte and wiped from
/// memory on drop.
///
/// # Examples
/// ```
/// use timers_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada ", "hunter2").unwrap();
/// assert_eq!(creds.username(), "ada");
/// assert_eq!(creds.display_name().unwrap().to_string(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        if password.len() > PASSWORD_MAX_BYTES {
            return Err(LoginValidationError::PasswordTooLong {
                max: PASSWORD_MAX_BYTES,
            });
        }
        Ok(Self {
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// The name a new account registers under.
    pub fn display_name(&self) -> Result<DisplayName, UserValidationError> {
        DisplayName::new(self.username.as_str())
    }
}
