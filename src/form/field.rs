use crate::form::value::Value;
use crate::validation::{ValidationErrors, Validator};

/// Keys accepted by numeric-only inputs besides the digits themselves.
const EDITING_KEYS: [&str; 7] = [
    "Backspace",
    "Tab",
    "End",
    "Home",
    "ArrowLeft",
    "ArrowRight",
    "Control",
];

/// Leaf value holder with its validators and interaction state.
#[derive(Debug, Clone)]
pub struct Field {
    value: Value,
    touched: bool,
    dirty: bool,
    enabled: bool,
    validators: Vec<Validator>,
    errors: ValidationErrors,
}

impl Field {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            touched: false,
            dirty: false,
            enabled: true,
            validators: Vec::new(),
            errors: ValidationErrors::new(),
        }
    }

    /// Empty text field, the default for most inputs.
    pub fn blank() -> Self {
        Self::new(Value::empty_text())
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn write_value(&mut self, value: Value) {
        self.value = value;
        self.dirty = true;
    }

    pub(crate) fn mark_touched(&mut self) {
        self.touched = true;
    }

    pub(crate) fn replace_validators(&mut self, validators: Vec<Validator>) {
        self.validators = validators;
    }

    pub(crate) fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub(crate) fn set_errors(&mut self, errors: ValidationErrors) {
        self.errors = errors;
    }

    /// Disabled fields carry no errors and keep their value for re-enabling.
    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.errors.clear();
        }
    }
}

/// Returns true for keys a numeric-only input lets through.
pub fn accepts_numeric_key(key: &str) -> bool {
    let is_digit = key.len() == 1 && key.chars().all(|ch| ch.is_ascii_digit());
    is_digit || EDITING_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabling_drops_errors_but_keeps_value() {
        let mut field = Field::new("kept");
        let mut errors = ValidationErrors::new();
        errors.insert(
            crate::validation::ErrorKind::Required,
            crate::validation::ValidationError::new(
                crate::validation::ErrorKind::Required,
                Value::text("kept"),
            ),
        );
        field.set_errors(errors);
        assert!(!field.is_valid());

        field.set_enabled(false);
        assert!(field.is_valid());
        assert_eq!(field.value(), &Value::text("kept"));
    }

    #[test]
    fn numeric_key_filter() {
        assert!(accepts_numeric_key("7"));
        assert!(accepts_numeric_key("Backspace"));
        assert!(accepts_numeric_key("ArrowLeft"));
        assert!(!accepts_numeric_key("a"));
        assert!(!accepts_numeric_key("-"));
        assert!(!accepts_numeric_key("12"));
    }
}
