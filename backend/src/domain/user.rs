//! User identity model.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyDisplayName,
    DisplayNameTooShort { min: usize },
    DisplayNameTooLong { max: usize },
    DisplayNameInvalidCharacters,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooShort { min } => {
                write!(f, "display name must be at least {min} characters")
            }
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::DisplayNameInvalidCharacters => write!(
                f,
                "display name may only contain letters, numbers, spaces, or underscores",
            ),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// The canonical string form is cached so session cookies and log fields can
/// borrow it without reformatting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id.to_owned()))
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value, value.to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Minimum allowed length for a display name.
pub const DISPLAY_NAME_MIN: usize = 3;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 32;

static DISPLAY_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn display_name_regex() -> &'static Regex {
    DISPLAY_NAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        Regex::new("^[A-Za-z0-9_ ]+$")
            .unwrap_or_else(|error| panic!("display name regex failed to compile: {error}"))
    })
}

/// Unique, immutable name a user signs up and logs in with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    ///
    /// # Examples
    /// ```
    /// use timers_backend::domain::DisplayName;
    ///
    /// assert!(DisplayName::new("ada_l").is_ok());
    /// assert!(DisplayName::new("a$").is_err());
    /// ```
    pub fn new(display_name: impl Into<String>) -> Result<Self, UserValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }

        let length = display_name.chars().count();
        if length < DISPLAY_NAME_MIN {
            return Err(UserValidationError::DisplayNameTooShort {
                min: DISPLAY_NAME_MIN,
            });
        }
        if length > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }

        if !display_name_regex().is_match(&display_name) {
            return Err(UserValidationError::DisplayNameInvalidCharacters);
        }

        Ok(Self(display_name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Registered user as seen by the timer core: an id and a name, nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    display_name: DisplayName,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, display_name: DisplayName) -> Self {
        Self { id, display_name }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Name chosen at signup.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
    #[case("not-a-uuid", UserValidationError::InvalidId)]
    fn rejects_invalid_user_ids(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
    }

    #[test]
    fn user_id_keeps_canonical_string() {
        let raw = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
        let id = UserId::new(raw).expect("valid id");
        assert_eq!(id.as_ref(), raw);
        assert_eq!(UserId::from(*id.as_uuid()), id);
    }

    #[rstest]
    #[case("   ", UserValidationError::EmptyDisplayName)]
    #[case("ab", UserValidationError::DisplayNameTooShort { min: DISPLAY_NAME_MIN })]
    #[case(
        "a_very_long_display_name_that_overflows",
        UserValidationError::DisplayNameTooLong { max: DISPLAY_NAME_MAX }
    )]
    #[case("bad$char", UserValidationError::DisplayNameInvalidCharacters)]
    fn rejects_invalid_display_names(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(DisplayName::new(raw).expect_err("invalid name"), expected);
    }

    #[rstest]
    #[case("ada")]
    #[case("Grace Hopper")]
    #[case("user_42")]
    fn accepts_valid_display_names(#[case] raw: &str) {
        let name = DisplayName::new(raw).expect("valid name");
        assert_eq!(name.as_ref(), raw);
    }
}
