//! Validator library.
//!
//! Every rule is a pure function of the target field's value plus a read-only
//! [`ValidationContext`] onto the containing group and the tree root. Conditional
//! rules whose precondition does not hold are inert and always pass.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde_json::{json, Value as JsonValue};

use crate::form::{FieldPath, Group, Value};

/// Identifies which rule produced an error; also the key in error maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    Required,
    ShouldBeTrue,
    RegexMismatch,
    RequiredSet,
    Pattern,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Required => "required",
            ErrorKind::ShouldBeTrue => "shouldBeTrue",
            ErrorKind::RegexMismatch => "regexMismatch",
            ErrorKind::RequiredSet => "requiredSet",
            ErrorKind::Pattern => "pattern",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failure carrying the offending value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub value: Value,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, value: Value) -> Self {
        Self { kind, value }
    }

    pub fn payload(&self) -> JsonValue {
        json!({ "value": self.value.to_json() })
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (value: `{}`)", self.kind, self.value)
    }
}

pub type ValidationErrors = BTreeMap<ErrorKind, ValidationError>;

/// Read access to the surroundings of the field being validated.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub root: &'a Group,
    pub parent: &'a Group,
    pub path: &'a FieldPath,
}

impl<'a> ValidationContext<'a> {
    pub fn new(root: &'a Group, parent: &'a Group, path: &'a FieldPath) -> Self {
        Self { root, parent, path }
    }

    /// Value of a field named relative to the containing group.
    pub fn sibling(&self, name: &str) -> Option<&'a Value> {
        let resolved = self.parent.value_of(&FieldPath::parse(name));
        if resolved.is_none() {
            tracing::warn!(
                field = %self.path,
                sibling = name,
                "sibling does not resolve, rule is inert"
            );
        }
        resolved
    }

    /// Value of a field addressed from the tree root.
    pub fn from_root(&self, path: &FieldPath) -> Option<&'a Value> {
        self.root.value_of(path)
    }
}

fn check(passed: bool, kind: ErrorKind, value: &Value) -> Option<ValidationError> {
    (!passed).then(|| ValidationError::new(kind, value.clone()))
}

/// Built-in validation rules.
#[derive(Debug, Clone)]
pub enum Validator {
    /// Value must be non-empty.
    Required,
    /// Value must be exactly `true`.
    RequiredTrue,
    /// Non-empty values must match; empty values pass.
    PatternMatch(Regex),
    /// Active only while the sibling's value is one of `trigger_values`.
    PatternIfSiblingEquals {
        pattern: Regex,
        sibling: String,
        trigger_values: Vec<Value>,
    },
    /// At least one named sibling must be `true`; the target's own value is ignored.
    AtLeastOneOfSiblings(Vec<String>),
    /// Value required while the sibling is `true`.
    RequiredIfSiblingBoolean(String),
    /// Value required while the sibling's value is in `values`.
    RequiredIfSiblingValueIn { sibling: String, values: Vec<Value> },
    /// Root-scoped: one of the named fields must be non-empty.
    AtLeastOneNonEmptyAmongRootFields(Vec<FieldPath>),
}

impl Validator {
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Validator::PatternMatch(Regex::new(pattern)?))
    }

    pub fn pattern_if_sibling_equals(
        pattern: &Regex,
        sibling: &str,
        trigger_values: &[&str],
    ) -> Self {
        Validator::PatternIfSiblingEquals {
            pattern: pattern.clone(),
            sibling: sibling.to_string(),
            trigger_values: trigger_values.iter().map(|v| Value::text(*v)).collect(),
        }
    }

    pub fn at_least_one_of(siblings: &[&str]) -> Self {
        Validator::AtLeastOneOfSiblings(siblings.iter().map(|s| s.to_string()).collect())
    }

    pub fn required_if(sibling: &str) -> Self {
        Validator::RequiredIfSiblingBoolean(sibling.to_string())
    }

    pub fn required_if_value_in(sibling: &str, values: Vec<Value>) -> Self {
        Validator::RequiredIfSiblingValueIn {
            sibling: sibling.to_string(),
            values,
        }
    }

    pub fn any_non_empty(fields: &[&str]) -> Self {
        Validator::AtLeastOneNonEmptyAmongRootFields(
            fields.iter().map(|f| FieldPath::parse(f)).collect(),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Validator::Required
            | Validator::RequiredIfSiblingBoolean(_)
            | Validator::RequiredIfSiblingValueIn { .. }
            | Validator::AtLeastOneNonEmptyAmongRootFields(_) => ErrorKind::Required,
            Validator::RequiredTrue => ErrorKind::ShouldBeTrue,
            Validator::PatternMatch(_) => ErrorKind::Pattern,
            Validator::PatternIfSiblingEquals { .. } => ErrorKind::RegexMismatch,
            Validator::AtLeastOneOfSiblings(_) => ErrorKind::RequiredSet,
        }
    }

    pub fn evaluate(&self, value: &Value, ctx: &ValidationContext<'_>) -> Option<ValidationError> {
        let kind = self.kind();
        match self {
            Validator::Required => check(!value.is_empty(), kind, value),
            Validator::RequiredTrue => check(value.is_true(), kind, value),
            Validator::PatternMatch(pattern) => {
                let passed = value.is_empty() || pattern.is_match(&value.to_match_string());
                check(passed, kind, value)
            }
            Validator::PatternIfSiblingEquals {
                pattern,
                sibling,
                trigger_values,
            } => match ctx.sibling(sibling) {
                Some(current) if trigger_values.contains(current) => {
                    let passed = pattern.is_match(&value.to_match_string());
                    check(passed, kind, value)
                }
                _ => None,
            },
            Validator::AtLeastOneOfSiblings(siblings) => {
                let any = siblings
                    .iter()
                    .any(|name| ctx.sibling(name).map(Value::is_true).unwrap_or(false));
                check(any, kind, value)
            }
            Validator::RequiredIfSiblingBoolean(sibling) => match ctx.sibling(sibling) {
                Some(current) if current.is_true() => {
                    check(!value.is_empty(), kind, value)
                }
                _ => None,
            },
            Validator::RequiredIfSiblingValueIn { sibling, values } => {
                match ctx.sibling(sibling) {
                    Some(current) if values.contains(current) => {
                        check(!value.is_empty(), kind, value)
                    }
                    _ => None,
                }
            }
            Validator::AtLeastOneNonEmptyAmongRootFields(fields) => {
                let resolved: Option<Vec<&Value>> =
                    fields.iter().map(|path| ctx.from_root(path)).collect();
                match resolved {
                    Some(values) => {
                        let any = values.iter().any(|candidate| !candidate.is_empty());
                        check(any, kind, value)
                    }
                    None => None,
                }
            }
        }
    }
}

/// Runs every validator and folds failures into an error map keyed by kind.
///
/// When two failing validators share a kind, the first one's error is kept.
pub fn evaluate_all(
    validators: &[Validator],
    value: &Value,
    ctx: &ValidationContext<'_>,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for error in validators.iter().filter_map(|validator| validator.evaluate(value, ctx)) {
        errors.entry(error.kind).or_insert(error);
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Field;

    fn contact_group() -> Group {
        Group::new()
            .with_field("haveOtherBenefits", Field::new(false))
            .with_field("otherSpecificBenefits", Field::blank())
            .with_field("country", Field::new("Canada"))
            .with_field("postalCode", Field::blank())
            .with_field("completingOnBehalfOf", Field::new(1))
    }

    fn run(
        validator: &Validator,
        group: &Group,
        root: &Group,
        target: &str,
    ) -> Option<ValidationError> {
        let path = FieldPath::parse(target);
        let value = group.value_of(&path).cloned().unwrap_or_default();
        validator.evaluate(&value, &ValidationContext::new(root, group, &path))
    }

    #[test]
    fn required_true_rejects_anything_but_true() {
        let group = Group::new().with_field("flag", Field::new("true"));
        let error = run(&Validator::RequiredTrue, &group, &group, "flag").unwrap();
        assert_eq!(error.kind, ErrorKind::ShouldBeTrue);

        let group = Group::new().with_field("flag", Field::new(true));
        assert!(run(&Validator::RequiredTrue, &group, &group, "flag").is_none());
    }

    #[test]
    fn postal_pattern_inert_outside_trigger_countries() {
        let pattern = Regex::new(r"^\d{5}$").unwrap();
        let rule = Validator::pattern_if_sibling_equals(&pattern, "country", &["Canada"]);
        let group = contact_group();
        assert!(run(&rule, &group, &group, "postalCode").is_some());

        let group = contact_group().with_field("country", Field::new("France"));
        assert!(run(&rule, &group, &group, "postalCode").is_none());
    }

    #[test]
    fn required_if_sibling_boolean_only_when_checked() {
        let rule = Validator::required_if("haveOtherBenefits");
        let group = contact_group();
        assert!(run(&rule, &group, &group, "otherSpecificBenefits").is_none());

        let group = contact_group().with_field("haveOtherBenefits", Field::new(true));
        let error = run(&rule, &group, &group, "otherSpecificBenefits").unwrap();
        assert_eq!(error.kind, ErrorKind::Required);
        assert_eq!(error.value, Value::empty_text());
    }

    #[test]
    fn required_if_value_in_uses_membership() {
        let rule = Validator::required_if_value_in(
            "completingOnBehalfOf",
            vec![Value::from(2), Value::from(3)],
        );
        let group = contact_group();
        assert!(run(&rule, &group, &group, "otherSpecificBenefits").is_none());

        let group = contact_group().with_field("completingOnBehalfOf", Field::new(3));
        assert!(run(&rule, &group, &group, "otherSpecificBenefits").is_some());
    }

    #[test]
    fn missing_sibling_makes_rule_inert() {
        let rule = Validator::required_if("doesNotExist");
        let group = contact_group();
        assert!(run(&rule, &group, &group, "otherSpecificBenefits").is_none());
    }

    #[test]
    fn root_scoped_rule_requires_every_path_to_resolve() {
        let root = Group::new().with_group(
            "personal",
            Group::new()
                .with_field("phone", Field::blank())
                .with_field("email", Field::new(Value::List(vec![]))),
        );
        let personal = root.group(&FieldPath::parse("personal")).unwrap();
        let rule = Validator::any_non_empty(&["personal.phone", "personal.email"]);
        let error = run(&rule, personal, &root, "phone").unwrap();
        assert_eq!(error.kind, ErrorKind::Required);

        let rule = Validator::any_non_empty(&["personal.phone", "personal.fax"]);
        assert!(run(&rule, personal, &root, "phone").is_none());
    }

    #[test]
    fn plain_pattern_skips_empty_values() {
        let rule = Validator::pattern(r"^\d+$").unwrap();
        let group = Group::new()
            .with_field("blank", Field::blank())
            .with_field("letters", Field::new("abc"));
        assert!(run(&rule, &group, &group, "blank").is_none());
        assert_eq!(
            run(&rule, &group, &group, "letters").unwrap().kind,
            ErrorKind::Pattern
        );
    }

    #[test]
    fn failures_of_different_kinds_accumulate() {
        let group = Group::new().with_field("consent", Field::blank());
        let path = FieldPath::parse("consent");
        let ctx = ValidationContext::new(&group, &group, &path);
        let errors = evaluate_all(
            &[Validator::Required, Validator::RequiredTrue],
            &Value::empty_text(),
            &ctx,
        );
        let kinds: Vec<ErrorKind> = errors.keys().copied().collect();
        assert_eq!(kinds, vec![ErrorKind::Required, ErrorKind::ShouldBeTrue]);
    }

    #[test]
    fn first_failure_wins_when_kinds_collide() {
        let group = contact_group().with_field("haveOtherBenefits", Field::new(true));
        let path = FieldPath::parse("otherSpecificBenefits");
        let ctx = ValidationContext::new(&group, &group, &path);
        let validators = [
            Validator::Required,
            Validator::required_if("haveOtherBenefits"),
            Validator::pattern(r"^x$").unwrap(),
        ];
        let errors = evaluate_all(&validators, &Value::text("abc"), &ctx);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[&ErrorKind::Pattern].value, Value::text("abc"));

        let errors = evaluate_all(&validators, &Value::empty_text(), &ctx);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[&ErrorKind::Required],
            ValidationError::new(ErrorKind::Required, Value::empty_text())
        );
    }
}
