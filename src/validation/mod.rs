//! Form validation for user-entered submissions.
//!
//! Validators never fail past their own boundary: they return the accepted
//! value or a `ValidationErrors` listing every field that broke a rule, with
//! a message the form can show inline.

pub mod materials;
pub mod profile;
pub mod request;

use serde::Serialize;

pub use materials::validate_materials;
pub use profile::{validate_profile, ProfileForm};
pub use request::{validate_request, RequestForm};

/// One broken rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// All violations collected from one submission, in rule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{} field(s) failed validation", .violations.len())]
pub struct ValidationErrors {
    pub violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Names of the offending fields, without duplicates.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = Vec::new();
        for violation in &self.violations {
            if !fields.contains(&violation.field) {
                fields.push(violation.field);
            }
        }
        fields
    }
}

/// Accumulates violations while a validator walks its rules.
#[derive(Debug, Default)]
pub(crate) struct Violations(Vec<FieldViolation>);

impl Violations {
    pub(crate) fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    /// Required text field with a minimum length in characters.
    pub(crate) fn require_min_chars(
        &mut self,
        field: &'static str,
        value: &str,
        min: usize,
        required_message: &str,
        too_short_message: &str,
    ) {
        if value.is_empty() {
            self.push(field, required_message);
        } else if value.chars().count() < min {
            self.push(field, too_short_message);
        }
    }

    pub(crate) fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors { violations: self.0 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_violations_accept_value() {
        let result = Violations::default().finish(42);
        assert_eq!(result, Ok(42));
    }

    #[test]
    fn required_and_min_length_are_distinct_messages() {
        let mut v = Violations::default();
        v.require_min_chars("a", "", 2, "required", "short");
        v.require_min_chars("b", "x", 2, "required", "short");
        v.require_min_chars("c", "ok", 2, "required", "short");
        let errors = v.finish(()).unwrap_err();
        assert_eq!(errors.violations.len(), 2);
        assert_eq!(errors.violations[0].message, "required");
        assert_eq!(errors.violations[1].message, "short");
        assert!(!errors.has_field("c"));
    }

    #[test]
    fn min_length_counts_characters_not_bytes() {
        let mut v = Violations::default();
        // "Jô" is two characters but three bytes.
        v.require_min_chars("name", "Jô", 2, "required", "short");
        v.require_min_chars("name", "Ã", 2, "required", "short");
        let errors = v.finish(()).unwrap_err();
        assert_eq!(errors.violations.len(), 1);
    }

    #[test]
    fn fields_are_deduplicated() {
        let mut v = Violations::default();
        v.push("email", "one");
        v.push("email", "two");
        v.push("crm", "three");
        let errors = v.finish(()).unwrap_err();
        assert_eq!(errors.fields(), vec!["email", "crm"]);
        assert_eq!(errors.to_string(), "3 field(s) failed validation");
    }
}
