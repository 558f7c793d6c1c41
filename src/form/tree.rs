use serde_json::Value as JsonValue;

use crate::cascade::{CascadeAction, CascadeRegistry, CascadeRule};
use crate::errors::{FormError, Result};
use crate::form::field::Field;
use crate::form::group::{Control, Group};
use crate::form::path::FieldPath;
use crate::form::value::Value;
use crate::validation::{evaluate_all, ValidationContext, ValidationErrors, Validator};

/// Owns a whole form: the control tree plus the cascades wired into it.
///
/// Every mutating call runs triggered cascades depth-first to completion and
/// then recomputes errors for the whole tree before returning, so
/// `field.is_valid() == field.errors().is_empty()` always reflects its
/// current validators. [`FormTree::clear_errors`] is the one exception: it
/// resets error state without re-running validators.
#[derive(Debug, Clone)]
pub struct FormTree {
    root: Group,
    cascades: CascadeRegistry,
}

impl FormTree {
    pub fn new(root: Group) -> Self {
        let mut tree = Self {
            root,
            cascades: CascadeRegistry::new(),
        };
        tree.revalidate();
        tree
    }

    pub fn with_cascades(root: Group, cascades: CascadeRegistry) -> Result<Self> {
        cascades.check_acyclic()?;
        let mut tree = Self { root, cascades };
        tree.revalidate();
        Ok(tree)
    }

    pub fn register_cascade(&mut self, rule: CascadeRule) -> Result<()> {
        self.cascades.register(rule)
    }

    pub fn cascades(&self) -> &CascadeRegistry {
        &self.cascades
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    pub fn get(&self, path: impl Into<FieldPath>) -> Result<&Control> {
        self.root.get(&path.into())
    }

    pub fn field(&self, path: impl Into<FieldPath>) -> Result<&Field> {
        self.root.field(&path.into())
    }

    pub fn group(&self, path: impl Into<FieldPath>) -> Result<&Group> {
        self.root.group(&path.into())
    }

    pub fn value(&self, path: impl Into<FieldPath>) -> Result<&Value> {
        Ok(self.field(path)?.value())
    }

    pub fn is_valid(&self) -> bool {
        self.root.is_valid()
    }

    /// UI convenience: unresolvable paths count as valid, untouched fields never show errors.
    pub fn is_field_valid(&self, path: impl Into<FieldPath>) -> bool {
        match self.root.lookup(&path.into()) {
            None => true,
            Some(Control::Field(field)) => field.is_valid() || !field.is_touched(),
            Some(other) => other.is_valid(),
        }
    }

    /// Lenient only about `parent`; a missing child under an existing parent is an error.
    pub fn is_child_field_valid(&self, parent: impl Into<FieldPath>, field: &str) -> Result<bool> {
        let parent = parent.into();
        let Some(control) = self.root.lookup(&parent) else {
            return Ok(true);
        };
        let group = control
            .as_group()
            .ok_or_else(|| FormError::wrong_kind(&parent, "group"))?;
        let field = group.field(&FieldPath::parse(field))?;
        Ok(field.is_valid() || !field.is_touched())
    }

    /// Errors are recomputed even when a cascade fails part way.
    pub fn set_value(&mut self, path: impl Into<FieldPath>, value: impl Into<Value>) -> Result<()> {
        let path = path.into();
        let result = self.write_and_cascade(&path, value.into());
        self.revalidate();
        result
    }

    /// Merges only the keys present in `partial`; unknown keys are ignored.
    pub fn patch_value(
        &mut self,
        group_path: impl Into<FieldPath>,
        partial: &JsonValue,
    ) -> Result<()> {
        let group_path = group_path.into();
        let result = self.patch_control(&group_path, partial);
        self.revalidate();
        result
    }

    pub fn mark_touched(&mut self, path: impl Into<FieldPath>, recursive: bool) -> Result<()> {
        let path = path.into();
        if path.is_root() {
            self.root.for_each_field_mut(&mut Field::mark_touched);
            return Ok(());
        }
        match self.root.get_mut(&path)? {
            Control::Field(field) => field.mark_touched(),
            control if recursive => control.for_each_field_mut(&mut Field::mark_touched),
            _ => {}
        }
        Ok(())
    }

    pub fn mark_all_touched(&mut self) {
        self.root.for_each_field_mut(&mut Field::mark_touched);
    }

    pub fn set_validators(
        &mut self,
        path: impl Into<FieldPath>,
        validators: Vec<Validator>,
    ) -> Result<()> {
        self.root.field_mut(&path.into())?.replace_validators(validators);
        self.revalidate();
        Ok(())
    }

    /// Resets error state without re-running validators.
    pub fn clear_errors(&mut self, path: impl Into<FieldPath>) -> Result<()> {
        self.root.field_mut(&path.into())?.clear_errors();
        Ok(())
    }

    pub fn enable(&mut self, path: impl Into<FieldPath>) -> Result<()> {
        self.set_enabled(&path.into(), true)?;
        self.revalidate();
        Ok(())
    }

    pub fn disable(&mut self, path: impl Into<FieldPath>) -> Result<()> {
        self.set_enabled(&path.into(), false)?;
        self.revalidate();
        Ok(())
    }

    /// Appends an element and applies the current state of cascades that
    /// target this repeated group. Returns the new element's index.
    pub fn append(&mut self, repeated_path: impl Into<FieldPath>, item: Group) -> Result<usize> {
        let repeated_path = repeated_path.into();
        let index = self.root.repeated_mut(&repeated_path)?.push(item);
        let rules = self.cascades.toggles_for_repeated(&repeated_path);
        let result = rules
            .iter()
            .try_for_each(|rule| self.apply_toggle(rule, Some((&repeated_path, index))));
        tracing::debug!(path = %repeated_path, index, "appended repeated element");
        self.revalidate();
        result.map(|()| index)
    }

    pub fn remove_at(
        &mut self,
        repeated_path: impl Into<FieldPath>,
        index: usize,
    ) -> Result<Group> {
        let repeated_path = repeated_path.into();
        let removed = self
            .root
            .repeated_mut(&repeated_path)?
            .remove(index)
            .ok_or_else(|| FormError::IndexOutOfRange {
                path: repeated_path.to_string(),
                index,
            })?;
        self.revalidate();
        Ok(removed)
    }

    pub fn trim_value(&mut self, path: impl Into<FieldPath>) -> Result<()> {
        let path = path.into();
        let trimmed = match self.root.field(&path)?.value() {
            Value::Text(text) => text.trim().to_string(),
            _ => return Ok(()),
        };
        self.set_value(path, Value::Text(trimmed))
    }

    /// Copies an address group into another and locks the copy while the toggle is set.
    pub fn copy_address_toggle(
        &mut self,
        source: impl Into<FieldPath>,
        target: impl Into<FieldPath>,
        toggle: impl Into<FieldPath>,
    ) -> Result<()> {
        let action = CascadeAction::CopyFields {
            source: source.into(),
            target: target.into(),
            fields: crate::cascade::ADDRESS_FIELDS
                .iter()
                .map(|field| field.to_string())
                .collect(),
        };
        let result = self.apply_copy(&action, &toggle.into());
        self.revalidate();
        result
    }

    /// Recomputes every enabled field's errors. All rules are evaluated
    /// against the current tree before any field's errors are written.
    pub fn revalidate(&mut self) {
        let mut computed: Vec<(FieldPath, ValidationErrors)> = Vec::new();
        {
            let root = &self.root;
            root.for_each_field(&FieldPath::root(), &mut |path, parent, field| {
                if !field.is_enabled() {
                    computed.push((path.clone(), ValidationErrors::new()));
                    return;
                }
                let ctx = ValidationContext::new(root, parent, path);
                let errors = evaluate_all(field.validators(), field.value(), &ctx);
                computed.push((path.clone(), errors));
            });
        }

        for (path, errors) in computed {
            if let Ok(field) = self.root.field_mut(&path) {
                field.set_errors(errors);
            }
        }
    }

    fn set_enabled(&mut self, path: &FieldPath, enabled: bool) -> Result<()> {
        let mut toggle = |field: &mut Field| field.set_enabled(enabled);
        if path.is_root() {
            self.root.for_each_field_mut(&mut toggle);
        } else {
            self.root.get_mut(path)?.for_each_field_mut(&mut toggle);
        }
        Ok(())
    }

    /// Writes a value, then runs triggered cascades depth-first. The registry
    /// is acyclic so recursion is bounded by the trigger graph's depth.
    fn write_and_cascade(&mut self, path: &FieldPath, value: Value) -> Result<()> {
        self.root.field_mut(path)?.write_value(value);
        for rule in self.cascades.triggered_by(path) {
            tracing::debug!(rule = %rule.name, trigger = %path, "running cascade");
            match &rule.action {
                CascadeAction::ToggleValidators { .. } => self.apply_toggle(&rule, None)?,
                CascadeAction::ComputeGate {
                    sources,
                    gate,
                    sentinel,
                } => {
                    let any_checked = sources.iter().any(|source| {
                        self.root.value_of(source).map(Value::is_true).unwrap_or(false)
                    });
                    let gate_value = if any_checked { sentinel.clone() } else { String::new() };
                    self.write_and_cascade(gate, Value::Text(gate_value))?;
                }
                CascadeAction::CopyFields { .. } => {
                    self.apply_copy(&rule.action, &rule.trigger)?
                }
            }
        }
        Ok(())
    }

    /// Clears then conditionally re-attaches validators. With `only_item`
    /// set, touches just that repeated element (used on append). Every
    /// target must resolve before any of them is reset.
    fn apply_toggle(
        &mut self,
        rule: &CascadeRule,
        only_item: Option<(&FieldPath, usize)>,
    ) -> Result<()> {
        let CascadeAction::ToggleValidators {
            targets,
            repeated,
            activation,
            validators,
        } = &rule.action
        else {
            return Ok(());
        };
        let active = activation.matches(self.root.field(&rule.trigger)?.value());
        let next = if active { validators.clone() } else { Vec::new() };

        let mut paths: Vec<FieldPath> = Vec::new();
        if only_item.is_none() {
            paths.extend(targets.iter().cloned());
        }
        for group_targets in repeated {
            let indices: Vec<usize> = match only_item {
                Some((path, index)) if *path == group_targets.group => vec![index],
                Some(_) => continue,
                None => (0..self.root.repeated(&group_targets.group)?.len()).collect(),
            };
            for index in indices {
                let item = group_targets.group.join_index(index);
                paths.extend(group_targets.fields.iter().map(|name| item.join(name)));
            }
        }
        for path in &paths {
            self.root.field(path)?;
        }

        for path in &paths {
            let field = self.root.field_mut(path)?;
            field.replace_validators(next.clone());
            field.clear_errors();
        }
        Ok(())
    }

    fn apply_copy(&mut self, action: &CascadeAction, toggle: &FieldPath) -> Result<()> {
        let CascadeAction::CopyFields {
            source,
            target,
            fields,
        } = action
        else {
            return Ok(());
        };
        let copying = self.root.field(toggle)?.value().is_true();
        for name in fields {
            let target_path = target.join(name);
            if copying {
                let copied = self.root.field(&source.join(name))?.value().clone();
                self.write_and_cascade(&target_path, copied)?;
                self.root.field_mut(&target_path)?.set_enabled(false);
            } else {
                self.root.field_mut(&target_path)?.set_enabled(true);
            }
        }
        tracing::debug!(%source, %target, copying, "address copy toggled");
        Ok(())
    }

    fn patch_control(&mut self, path: &FieldPath, partial: &JsonValue) -> Result<()> {
        let kind = if path.is_root() {
            PatchTarget::Group
        } else {
            match self.root.get(path)? {
                Control::Field(_) => PatchTarget::Field,
                Control::Group(_) => PatchTarget::Group,
                Control::Repeated(_) => PatchTarget::Repeated,
            }
        };
        match (kind, partial) {
            (PatchTarget::Field, json) => self.write_and_cascade(path, Value::from_json(json)),
            (PatchTarget::Group, JsonValue::Object(entries)) => {
                let names: Vec<String> =
                    self.root.group(path)?.names().map(str::to_string).collect();
                for (key, json) in entries {
                    if names.iter().any(|name| name == key) {
                        self.patch_control(&path.join(key), json)?;
                    }
                }
                Ok(())
            }
            (PatchTarget::Repeated, JsonValue::Array(items)) => {
                let len = self.root.repeated(path)?.len();
                for (index, json) in items.iter().enumerate().take(len) {
                    self.patch_control(&path.join_index(index), json)?;
                }
                Ok(())
            }
            (_, other) => Err(FormError::InvalidInput(format!(
                "cannot patch `{}` with {}",
                path, other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum PatchTarget {
    Field,
    Group,
    Repeated,
}
