//! Form binding results - field-level errors captured during submission.

use serde::Serialize;
use validator::ValidationErrors;

/// A single field-level form error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Outcome of binding and validating a submitted form.
///
/// Validation failures are collected here instead of rejecting the
/// request, so handlers can re-render the form with its errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingResult {
    errors: Vec<FieldError>,
}

impl BindingResult {
    /// A binding with no errors
    pub fn clean() -> Self {
        Self::default()
    }

    /// Collect field errors from a failed validation
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        let mut errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                })
            })
            .collect();

        // Field order is stable regardless of hash map iteration order
        errors.sort_by(|a, b| a.field.cmp(&b.field));

        Self { errors }
    }

    /// Record an additional error against a field
    pub fn reject(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Whether any field failed
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The collected field errors
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Consume the binding, returning its errors
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "Username is required"))]
        username: String,
        #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
        password: String,
    }

    #[test]
    fn clean_binding_has_no_errors() {
        let result = BindingResult::clean();
        assert!(!result.has_errors());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn collects_messages_per_field() {
        let probe = Probe {
            username: String::new(),
            password: "short".to_string(),
        };

        let result = BindingResult::from_validation(&probe.validate().unwrap_err());

        assert!(result.has_errors());
        assert_eq!(result.errors().len(), 2);
        assert_eq!(result.errors()[0].field, "password");
        assert_eq!(
            result.errors()[0].message,
            "Password must be at least 8 characters"
        );
        assert_eq!(result.errors()[1].field, "username");
        assert_eq!(result.errors()[1].message, "Username is required");
    }

    #[test]
    fn reject_appends_manual_error() {
        let mut result = BindingResult::clean();
        result.reject("username", "Username is not available");

        assert!(result.has_errors());
        assert_eq!(
            result.into_errors(),
            vec![FieldError {
                field: "username".to_string(),
                message: "Username is not available".to_string(),
            }]
        );
    }

    #[test]
    fn reject_preserves_existing_error_order() {
        let probe = Probe {
            username: String::new(),
            password: "short".to_string(),
        };

        let mut result = BindingResult::from_validation(&probe.validate().unwrap_err());
        result.reject("email", "Email is taken");

        let fields: Vec<&str> = result.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["password", "username", "email"]);
    }
}
