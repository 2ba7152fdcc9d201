//! Field validation rules.
//!
//! Every rule is a pure, total function over its input: no side effects and
//! no panics. A rule returns `Ok(())` when the value is acceptable and the
//! user-facing reason otherwise.
//!
//! The forms do not agree with each other, so several fields have more than
//! one rule. They are kept apart on purpose and named after what they check:
//!
//! | Field | Rule | Used by |
//! |---|---|---|
//! | name | [`strict_name_check`] (20-60 chars) | admin "add user" |
//! | name | [`loose_name_check`] (at least 2 chars) | self-signup |
//! | password | [`bounded_password_check`] (8-16 chars, uppercase, special) | admin "add user", profile |
//! | password | [`signup_password_check`] (8+ chars, lower, upper, digit, special) | self-signup, password change |
//! | address | [`address_check`] (at most 400 chars) | admin forms |
//! | address | [`signup_address_check`] (10-400 chars) | self-signup |
//!
//! Lengths are counted in characters, not bytes.

use serde::Serialize;

use crate::types::{Email, EmailError};

/// Minimum name length accepted by [`strict_name_check`].
pub const STRICT_NAME_MIN: usize = 20;
/// Maximum name length accepted by [`strict_name_check`].
pub const STRICT_NAME_MAX: usize = 60;
/// Minimum name length accepted by [`loose_name_check`].
pub const LOOSE_NAME_MIN: usize = 2;
/// Minimum store name length.
pub const STORE_NAME_MIN: usize = 3;
/// Maximum address length.
pub const ADDRESS_MAX: usize = 400;
/// Minimum address length at signup.
pub const SIGNUP_ADDRESS_MIN: usize = 10;
/// Minimum password length (both password rules).
pub const PASSWORD_MIN: usize = 8;
/// Maximum password length for [`bounded_password_check`].
pub const PASSWORD_MAX: usize = 16;

/// Special characters accepted by [`bounded_password_check`].
pub const BOUNDED_PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";
/// Special characters accepted by [`signup_password_check`].
pub const SIGNUP_PASSWORD_SPECIALS: &str = "@$!%*?&";

/// The form field a validation failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Address,
    Password,
    ConfirmPassword,
    Role,
    Owner,
    Rating,
}

impl Field {
    /// Capitalised label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Address => "Address",
            Self::Password => "Password",
            Self::ConfirmPassword => "Password confirmation",
            Self::Role => "Role",
            Self::Owner => "Store owner",
            Self::Rating => "Rating",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A user-correctable, field-level validation failure.
///
/// The `Display` output is the message shown to the user.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: Field },

    #[error("Name must be between {min} and {max} characters")]
    NameLength { min: usize, max: usize },

    #[error("Name must be at least {min} characters long")]
    NameTooShort { min: usize },

    #[error("Store name must be at least {min} characters")]
    StoreNameTooShort { min: usize },

    #[error("Please enter a valid email address")]
    InvalidEmail(#[source] EmailError),

    #[error("Address must not exceed {max} characters")]
    AddressTooLong { max: usize },

    #[error("Address must be at least {min} characters long")]
    AddressTooShort { min: usize },

    #[error("Password must be between {min} and {max} characters")]
    PasswordLength { min: usize, max: usize },

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("Password must contain at least one uppercase letter")]
    PasswordMissingUppercase,

    #[error("Password must contain at least one special character")]
    PasswordMissingSpecial,

    #[error("Password must contain uppercase, lowercase, number, and special character")]
    PasswordComposition,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please select a role")]
    RoleRequired,

    #[error("Please select a store owner")]
    OwnerRequired,

    #[error("Please select a rating between {min} and {max} stars")]
    RatingOutOfRange { min: u8, max: u8 },
}

impl ValidationError {
    /// The field this failure belongs to.
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::Required { field } => *field,
            Self::NameLength { .. } | Self::NameTooShort { .. } | Self::StoreNameTooShort { .. } => {
                Field::Name
            }
            Self::InvalidEmail(_) => Field::Email,
            Self::AddressTooLong { .. } | Self::AddressTooShort { .. } => Field::Address,
            Self::PasswordLength { .. }
            | Self::PasswordTooShort { .. }
            | Self::PasswordMissingUppercase
            | Self::PasswordMissingSpecial
            | Self::PasswordComposition => Field::Password,
            Self::PasswordMismatch => Field::ConfirmPassword,
            Self::RoleRequired => Field::Role,
            Self::OwnerRequired => Field::Owner,
            Self::RatingOutOfRange { .. } => Field::Rating,
        }
    }
}

/// Result of a validation rule.
pub type Check = Result<(), ValidationError>;

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Reject blank (empty or whitespace-only) values.
///
/// # Errors
///
/// Returns [`ValidationError::Required`] for `field` when `value` is blank.
pub fn required(field: Field, value: &str) -> Check {
    if is_blank(value) {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

/// Name rule of the admin "add user" form: 20 to 60 characters.
///
/// # Errors
///
/// Returns [`ValidationError::NameLength`] outside `[20, 60]`.
pub fn strict_name_check(name: &str) -> Check {
    let len = char_len(name);
    if !(STRICT_NAME_MIN..=STRICT_NAME_MAX).contains(&len) {
        return Err(ValidationError::NameLength {
            min: STRICT_NAME_MIN,
            max: STRICT_NAME_MAX,
        });
    }
    Ok(())
}

/// Name rule of the signup form: non-blank and at least 2 characters.
///
/// # Errors
///
/// Returns [`ValidationError::Required`] or [`ValidationError::NameTooShort`].
pub fn loose_name_check(name: &str) -> Check {
    required(Field::Name, name)?;
    if char_len(name) < LOOSE_NAME_MIN {
        return Err(ValidationError::NameTooShort {
            min: LOOSE_NAME_MIN,
        });
    }
    Ok(())
}

/// Store name rule: at least 3 characters.
///
/// # Errors
///
/// Returns [`ValidationError::StoreNameTooShort`].
pub fn store_name_check(name: &str) -> Check {
    if char_len(name) < STORE_NAME_MIN {
        return Err(ValidationError::StoreNameTooShort {
            min: STORE_NAME_MIN,
        });
    }
    Ok(())
}

/// Email rule: the `local@domain.tld` shape.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEmail`] with the underlying parse error.
pub fn email_check(email: &str) -> Check {
    parse_email(email).map(|_| ())
}

/// Parse an email, mapping failures to a field-level error.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidEmail`] if the shape is wrong.
pub fn parse_email(email: &str) -> Result<Email, ValidationError> {
    Email::parse(email).map_err(ValidationError::InvalidEmail)
}

/// Address rule of the admin forms: at most 400 characters.
///
/// # Errors
///
/// Returns [`ValidationError::AddressTooLong`].
pub fn address_check(address: &str) -> Check {
    if char_len(address) > ADDRESS_MAX {
        return Err(ValidationError::AddressTooLong { max: ADDRESS_MAX });
    }
    Ok(())
}

/// Address rule of the signup form: non-blank, 10 to 400 characters.
///
/// # Errors
///
/// Returns [`ValidationError::Required`], [`ValidationError::AddressTooShort`]
/// or [`ValidationError::AddressTooLong`].
pub fn signup_address_check(address: &str) -> Check {
    required(Field::Address, address)?;
    if char_len(address) < SIGNUP_ADDRESS_MIN {
        return Err(ValidationError::AddressTooShort {
            min: SIGNUP_ADDRESS_MIN,
        });
    }
    address_check(address)
}

/// Password rule of the admin "add user" and profile forms.
///
/// 8 to 16 characters, at least one uppercase ASCII letter and at least one
/// character from [`BOUNDED_PASSWORD_SPECIALS`].
///
/// # Errors
///
/// Returns the first failing condition, in the order listed above.
pub fn bounded_password_check(password: &str) -> Check {
    let len = char_len(password);
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(ValidationError::PasswordLength {
            min: PASSWORD_MIN,
            max: PASSWORD_MAX,
        });
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::PasswordMissingUppercase);
    }
    if !password.chars().any(|c| BOUNDED_PASSWORD_SPECIALS.contains(c)) {
        return Err(ValidationError::PasswordMissingSpecial);
    }
    Ok(())
}

/// Password rule of self-signup and password change.
///
/// Non-blank, at least 8 characters with no upper bound, and at least one
/// lowercase ASCII letter, uppercase ASCII letter, ASCII digit and character
/// from [`SIGNUP_PASSWORD_SPECIALS`].
///
/// # Errors
///
/// Returns [`ValidationError::Required`], [`ValidationError::PasswordTooShort`]
/// or [`ValidationError::PasswordComposition`].
pub fn signup_password_check(password: &str) -> Check {
    required(Field::Password, password)?;
    if char_len(password) < PASSWORD_MIN {
        return Err(ValidationError::PasswordTooShort { min: PASSWORD_MIN });
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| SIGNUP_PASSWORD_SPECIALS.contains(c));
    if !(has_lower && has_upper && has_digit && has_special) {
        return Err(ValidationError::PasswordComposition);
    }
    Ok(())
}

/// The new password and its confirmation must be identical.
///
/// # Errors
///
/// Returns [`ValidationError::PasswordMismatch`].
pub fn password_confirmation_check(password: &str, confirmation: &str) -> Check {
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Rating rule: an integer number of stars in `[1, 5]`.
///
/// # Errors
///
/// Returns [`ValidationError::RatingOutOfRange`].
pub fn rating_value_check(value: i64) -> Check {
    crate::Stars::new(value).map(|_| ())
}
