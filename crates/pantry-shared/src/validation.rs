//! Field validation for item drafts and signup requests.
//!
//! Validation always runs before anything reaches the store. Errors are
//! collected per field so a caller can report all of them at once.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use chrono::Datelike;

use crate::constants::{
    MAX_CATEGORY_LEN, MAX_EXPIRY_YEAR, MAX_NAME_LEN, MAX_QUANTITY_LEN, MAX_USERNAME_LEN,
    MIN_EXPIRY_YEAR, MIN_PASSWORD_LEN,
};
use crate::types::FoodItemDraft;

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn check_required(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    max_len: usize,
) {
    if value.is_empty() {
        errors.add(field, "This field is required.");
    } else if value.chars().count() > max_len {
        errors.add(
            field,
            format!("Ensure this value has at most {max_len} characters."),
        );
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl FoodItemDraft {
    /// Normalize and validate the draft.
    ///
    /// Text fields are trimmed; blank optional fields become `None`.
    pub fn validate(mut self) -> Result<Self, ValidationErrors> {
        self.name = self.name.trim().to_string();
        self.quantity = self.quantity.trim().to_string();
        self.category = blank_to_none(self.category);
        self.notes = blank_to_none(self.notes);

        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "name", &self.name, MAX_NAME_LEN);
        check_required(&mut errors, "quantity", &self.quantity, MAX_QUANTITY_LEN);
        if let Some(category) = &self.category {
            if category.chars().count() > MAX_CATEGORY_LEN {
                errors.add(
                    "category",
                    format!("Ensure this value has at most {MAX_CATEGORY_LEN} characters."),
                );
            }
        }
        if !(MIN_EXPIRY_YEAR..=MAX_EXPIRY_YEAR).contains(&self.expiry_date.year()) {
            errors.add("expiry_date", "Enter a valid date.");
        }

        errors.into_result().map(|()| self)
    }
}

/// A signup request after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signup {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Validate the signup fields: username charset and length, a plausible
/// email address, and two matching passwords of acceptable strength.
pub fn validate_signup(
    username: &str,
    email: &str,
    password1: &str,
    password2: &str,
) -> Result<Signup, ValidationErrors> {
    let username = username.trim();
    let email = email.trim();
    let mut errors = ValidationErrors::new();

    check_required(&mut errors, "username", username, MAX_USERNAME_LEN);
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }

    if email.is_empty() {
        errors.add("email", "Required. Enter a valid email address.");
    } else if !is_plausible_email(email) {
        errors.add("email", "Enter a valid email address.");
    }

    if password1 != password2 {
        errors.add("password2", "The two password fields didn't match.");
    }
    if password1.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password1",
            format!("This password is too short. It must contain at least {MIN_PASSWORD_LEN} characters."),
        );
    }
    if !password1.is_empty() && password1.chars().all(|c| c.is_ascii_digit()) {
        errors.add("password1", "This password is entirely numeric.");
    }

    errors.into_result().map(|()| Signup {
        username: username.to_string(),
        email: email.to_string(),
        password: password1.to_string(),
    })
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split('.')
            .filter(|label| !label.is_empty())
            .count()
            >= 2
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(name: &str, quantity: &str) -> FoodItemDraft {
        FoodItemDraft {
            name: name.to_string(),
            quantity: quantity.to_string(),
            category: Some("   ".to_string()),
            expiry_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn draft_is_trimmed_and_blank_category_dropped() {
        let valid = draft("  Milk ", " 1L").validate().unwrap();
        assert_eq!(valid.name, "Milk");
        assert_eq!(valid.quantity, "1L");
        assert_eq!(valid.category, None);
    }

    #[test]
    fn draft_missing_fields_reported_together() {
        let errors = draft(" ", "").validate().unwrap_err();
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["name", "quantity"]);
    }

    #[test]
    fn draft_name_too_long() {
        let errors = draft(&"x".repeat(MAX_NAME_LEN + 1), "2kg")
            .validate()
            .unwrap_err();
        assert!(errors.get("name").is_some());
        assert!(errors.get("quantity").is_none());
    }

    #[test]
    fn draft_expiry_year_must_fit_four_digits() {
        let mut far = draft("Honey", "1 jar");
        far.expiry_date = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        let errors = far.validate().unwrap_err();
        assert_eq!(errors.get("expiry_date").unwrap(), ["Enter a valid date."]);

        let mut bce = draft("Honey", "1 jar");
        bce.expiry_date = NaiveDate::from_ymd_opt(0, 12, 31).unwrap();
        assert!(bce.validate().is_err());

        let mut last = draft("Honey", "1 jar");
        last.expiry_date = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        assert!(last.validate().is_ok());
    }

    #[test]
    fn signup_accepts_good_input() {
        let signup = validate_signup("alice", "alice@example.com", "s3cret-pass", "s3cret-pass")
            .unwrap();
        assert_eq!(signup.username, "alice");
    }

    #[test]
    fn signup_rejects_mismatch_and_bad_email() {
        let errors = validate_signup("bob smith", "bob@", "abcdefgh", "abcdefgx").unwrap_err();
        assert!(errors.get("username").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("password2").is_some());
    }

    #[test]
    fn signup_rejects_weak_passwords() {
        let errors = validate_signup("carol", "carol@example.org", "12345678", "12345678")
            .unwrap_err();
        assert_eq!(
            errors.get("password1").unwrap(),
            ["This password is entirely numeric."]
        );

        let errors = validate_signup("carol", "carol@example.org", "short", "short").unwrap_err();
        assert_eq!(errors.get("password1").unwrap().len(), 1);
    }
}
