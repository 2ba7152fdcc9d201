//! Run one validation rule from the command line.
//!
//! # Usage
//!
//! ```bash
//! sr-cli check strict-name "Short"
//! sr-cli check bounded-password 'Secret12!'
//! sr-cli check password-confirmation 'Secret12!' --confirm 'Secret12?'
//! ```

use clap::ValueEnum;
use thiserror::Error;

use store_ratings_core::validation::{
    self, Check, address_check, bounded_password_check, email_check, loose_name_check,
    password_confirmation_check, rating_value_check, signup_address_check,
    signup_password_check, store_name_check, strict_name_check,
};
use store_ratings_core::{Field, ValidationError};

/// The named validation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Rule {
    /// Admin form name: 20 to 60 characters
    StrictName,
    /// Signup name: at least 2 characters
    LooseName,
    /// Store name: at least 3 characters
    StoreName,
    /// Email shape
    Email,
    /// Admin form address: at most 400 characters
    Address,
    /// Signup address: 10 to 400 characters
    SignupAddress,
    /// Admin form password: 8 to 16 characters, uppercase and special
    BoundedPassword,
    /// Signup password: 8+ characters, mixed case, digit and special
    SignupPassword,
    /// Password must equal `--confirm`
    PasswordConfirmation,
    /// Rating: whole stars from 1 to 5
    Rating,
}

/// Errors that can occur in the check command.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The value failed the rule.
    #[error("{field}: {source}")]
    Failed {
        field: Field,
        #[source]
        source: ValidationError,
    },

    /// The value is not an integer (rating rule only).
    #[error("rating must be a whole number: {0}")]
    NotANumber(String),
}

impl From<ValidationError> for CheckError {
    fn from(source: ValidationError) -> Self {
        Self::Failed {
            field: source.field(),
            source,
        }
    }
}

/// Apply `rule` to `value`.
///
/// # Errors
///
/// Returns `CheckError::Failed` with the field and message when the value
/// is rejected.
pub fn run(rule: Rule, value: &str, confirm: Option<&str>) -> Result<(), CheckError> {
    let check: Check = match rule {
        Rule::StrictName => strict_name_check(value),
        Rule::LooseName => loose_name_check(value),
        Rule::StoreName => store_name_check(value),
        Rule::Email => email_check(value),
        Rule::Address => address_check(value),
        Rule::SignupAddress => signup_address_check(value),
        Rule::BoundedPassword => bounded_password_check(value),
        Rule::SignupPassword => signup_password_check(value),
        Rule::PasswordConfirmation => {
            validation::required(Field::ConfirmPassword, confirm.unwrap_or_default())
                .and_then(|()| password_confirmation_check(value, confirm.unwrap_or_default()))
        }
        Rule::Rating => {
            let stars = value
                .trim()
                .parse::<i64>()
                .map_err(|_| CheckError::NotANumber(value.to_string()))?;
            rating_value_check(stars)
        }
    };
    Ok(check?)
}
