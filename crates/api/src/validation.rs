//! Write-time validation of user input.
//!
//! Validation runs field by field in column order (username, first name, last
//! name, email, password) and collects every violation into an ordered
//! [`ValidationErrors`]. Uniqueness is not checked here; the store reports it
//! at write time as a [`ValidationRule::NotUnique`] error.
//!
//! Only the first error decides the client-facing message, see
//! [`ValidationErrors::client_message`].

use std::fmt;

use accounts_core::{Balance, Email};

use crate::services::password::PasswordPolicy;

/// The rule a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// Required value missing or blank.
    NotEmpty,
    /// Value is not a syntactically valid email address.
    IsEmail,
    /// Value shorter than the configured minimum.
    Len {
        /// Minimum number of characters.
        min: usize,
    },
    /// Another user already holds this value.
    NotUnique,
    /// Value refers to a row that does not exist.
    ForeignKey,
    /// Value outside the range the column can hold.
    Range,
}

/// A single violated rule on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: &'static str,
    /// The rule that failed, with its arguments.
    pub rule: ValidationRule,
    /// Lower-case description, e.g. `email must be unique`.
    pub message: String,
}

impl ValidationError {
    /// Build an error with the default message for `rule`.
    #[must_use]
    pub fn new(field: &'static str, rule: ValidationRule) -> Self {
        let message = match rule {
            ValidationRule::NotEmpty => format!("{field} cannot be empty"),
            ValidationRule::IsEmail => format!("{field} must be a valid email address"),
            ValidationRule::Len { min } => format!("{field} must be at least {min} characters"),
            ValidationRule::NotUnique => format!("{field} must be unique"),
            ValidationRule::ForeignKey => format!("{field} does not reference an existing record"),
            ValidationRule::Range => format!("{field} is out of range"),
        };

        Self {
            field,
            rule,
            message,
        }
    }
}

/// Ordered list of validation failures. Never empty when returned as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// A list holding a single error.
    #[must_use]
    pub fn single(error: ValidationError) -> Self {
        Self(vec![error])
    }

    fn push(&mut self, field: &'static str, rule: ValidationRule) {
        self.0.push(ValidationError::new(field, rule));
    }

    /// The first reported error.
    #[must_use]
    pub fn first(&self) -> Option<&ValidationError> {
        self.0.first()
    }

    /// All errors in the order they were reported.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// User-facing message derived from the first error only.
    ///
    /// | first rule   | message                                   |
    /// |--------------|-------------------------------------------|
    /// | `Len`        | `Password must be {min} or more characters.` |
    /// | `NotUnique`  | the error message, capitalized, with a `.`   |
    /// | `IsEmail`    | `Please enter a valid email.`               |
    /// | anything else| `Unable to post user data.`                 |
    #[must_use]
    pub fn client_message(&self) -> String {
        let Some(first) = self.first() else {
            return GENERIC_MESSAGE.to_owned();
        };

        match first.rule {
            ValidationRule::Len { min } => format!("Password must be {min} or more characters."),
            ValidationRule::NotUnique => sentence_case(&first.message),
            ValidationRule::IsEmail => "Please enter a valid email.".to_owned(),
            ValidationRule::NotEmpty | ValidationRule::ForeignKey | ValidationRule::Range => {
                GENERIC_MESSAGE.to_owned()
            }
        }
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

const GENERIC_MESSAGE: &str = "Unable to post user data.";

/// Upper-case the first character and end with a period. Empty stays empty.
fn sentence_case(message: &str) -> String {
    let mut chars = message.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut sentence: String = first.to_uppercase().chain(chars).collect();
    sentence.push('.');
    sentence
}

/// Fields of a new user that passed validation. Password still in plaintext.
#[derive(Clone)]
pub struct ValidNewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub password: String,
    pub balance: Balance,
}

impl fmt::Debug for ValidNewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidNewUser")
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("balance", &self.balance)
            .finish()
    }
}

/// Fields of an update that passed validation. Password still in plaintext.
#[derive(Clone, Default)]
pub struct ValidChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Email>,
    pub password: Option<String>,
}

impl fmt::Debug for ValidChanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidChanges")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Validate the user-supplied fields of a new account.
///
/// # Errors
///
/// Returns every violation found, in column order.
pub fn validate_new_user(
    username: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
    balance: Option<Balance>,
    policy: PasswordPolicy,
) -> Result<ValidNewUser, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let username = required(&mut errors, "username", username);
    let first_name = required(&mut errors, "first_name", first_name);
    let last_name = required(&mut errors, "last_name", last_name);
    let email = required(&mut errors, "email", email).and_then(|e| check_email(&mut errors, e));
    let password = check_password(&mut errors, password.unwrap_or_default(), policy);
    let balance = check_balance(&mut errors, balance.unwrap_or_default());

    errors.into_result()?;

    // Every field is Some once the error list is empty.
    match (username, first_name, last_name, email, password, balance) {
        (
            Some(username),
            Some(first_name),
            Some(last_name),
            Some(email),
            Some(password),
            Some(balance),
        ) => Ok(ValidNewUser {
            username,
            first_name,
            last_name,
            email,
            password,
            balance,
        }),
        _ => Err(ValidationErrors::single(ValidationError::new(
            "user",
            ValidationRule::NotEmpty,
        ))),
    }
}

/// Validate a partial update. Only provided fields are checked.
///
/// # Errors
///
/// Returns every violation found, in column order.
pub fn validate_changes(
    first_name: Option<&str>,
    last_name: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
    policy: PasswordPolicy,
) -> Result<ValidChanges, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let first_name = first_name.and_then(|v| required(&mut errors, "first_name", Some(v)));
    let last_name = last_name.and_then(|v| required(&mut errors, "last_name", Some(v)));
    let email = email.and_then(|v| {
        required(&mut errors, "email", Some(v)).and_then(|e| check_email(&mut errors, e))
    });
    let password = password.and_then(|v| check_password(&mut errors, v, policy));

    errors.into_result()?;

    Ok(ValidChanges {
        first_name,
        last_name,
        email,
        password,
    })
}

fn required(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_owned()),
        _ => {
            errors.push(field, ValidationRule::NotEmpty);
            None
        }
    }
}

fn check_email(errors: &mut ValidationErrors, value: String) -> Option<Email> {
    Email::parse(&value)
        .inspect_err(|_| errors.push("email", ValidationRule::IsEmail))
        .ok()
}

fn check_password(errors: &mut ValidationErrors, value: &str, policy: PasswordPolicy) -> Option<String> {
    if policy.accepts(value) {
        Some(value.to_owned())
    } else {
        errors.push(
            "password",
            ValidationRule::Len {
                min: policy.min_length,
            },
        );
        None
    }
}

fn check_balance(errors: &mut ValidationErrors, value: Balance) -> Option<Balance> {
    if value.fits_column() {
        Some(value)
    } else {
        errors.push("balance", ValidationRule::Range);
        None
    }
}
