//! Validation results reported by request types.
//!
//! Nothing here decides whether input is valid. Request types implement
//! [`Validate`] and record what they find; the advice layer only reports it.

use std::fmt;

/// One rejected field, as recorded by a validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingFieldError {
    pub field: String,
    /// Stringified rejected value, `None` when the input was absent
    pub rejected_value: Option<String>,
    pub message: String,
}

/// Ordered collection of field failures for one bound object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingResult {
    pub object_name: String,
    field_errors: Vec<BindingFieldError>,
}

impl BindingResult {
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            field_errors: Vec::new(),
        }
    }

    /// Record a rejected field. Insertion order is kept.
    pub fn reject<V: ToString>(
        &mut self,
        field: impl Into<String>,
        rejected_value: Option<V>,
        message: impl Into<String>,
    ) -> &mut Self {
        self.field_errors.push(BindingFieldError {
            field: field.into(),
            rejected_value: rejected_value.map(|v| v.to_string()),
            message: message.into(),
        });
        self
    }

    pub fn has_errors(&self) -> bool {
        !self.field_errors.is_empty()
    }

    pub fn field_errors(&self) -> &[BindingFieldError] {
        &self.field_errors
    }

    /// `Ok(())` when nothing was rejected, otherwise the result itself
    pub fn into_result(self) -> Result<(), Self> {
        if self.has_errors() {
            Err(self)
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for BindingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} field error(s) on '{}'",
            self.field_errors.len(),
            self.object_name
        )?;
        for err in &self.field_errors {
            write!(f, "; {}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

/// A failed constraint on a method parameter or nested property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    /// Full dotted path, e.g. `create.request.email`
    pub property_path: String,
    pub message: String,
}

impl ConstraintViolation {
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_path: property_path.into(),
            message: message.into(),
        }
    }

    /// Last dot-separated segment of the property path.
    ///
    /// Indexed segments collapse too: `items[0].name` yields `name`.
    pub fn property_name(&self) -> &str {
        self.property_path
            .rsplit('.')
            .next()
            .unwrap_or(&self.property_path)
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property_path, self.message)
    }
}

/// Implemented by request types that check their own fields
pub trait Validate {
    fn validate(&self) -> BindingResult;
}
