use serde_json::{Map, Value as JsonValue};

use crate::errors::{FormError, Result};
use crate::form::field::Field;
use crate::form::path::FieldPath;
use crate::form::value::Value;

/// Closed set of node kinds in a form tree.
#[derive(Debug, Clone)]
pub enum Control {
    Field(Field),
    Group(Group),
    Repeated(RepeatedGroup),
}

impl Control {
    /// Disabled fields are skipped; groups aggregate their children.
    pub fn is_valid(&self) -> bool {
        match self {
            Control::Field(field) => !field.is_enabled() || field.is_valid(),
            Control::Group(group) => group.is_valid(),
            Control::Repeated(repeated) => repeated.is_valid(),
        }
    }

    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Control::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Control::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_repeated(&self) -> Option<&RepeatedGroup> {
        match self {
            Control::Repeated(repeated) => Some(repeated),
            _ => None,
        }
    }

    fn materialize(&self, include_disabled: bool) -> Option<JsonValue> {
        match self {
            Control::Field(field) => {
                (include_disabled || field.is_enabled()).then(|| field.value().to_json())
            }
            Control::Group(group) => Some(group.materialize(include_disabled)),
            Control::Repeated(repeated) => Some(JsonValue::Array(
                repeated
                    .items()
                    .map(|item| item.materialize(include_disabled))
                    .collect(),
            )),
        }
    }

    fn errors_tree(&self) -> JsonValue {
        match self {
            Control::Field(field) => {
                if field.errors().is_empty() {
                    JsonValue::Null
                } else {
                    let mut map = Map::new();
                    for (kind, error) in field.errors() {
                        map.insert(kind.as_str().to_string(), error.payload());
                    }
                    JsonValue::Object(map)
                }
            }
            Control::Group(group) => group.errors_tree(),
            Control::Repeated(repeated) => {
                JsonValue::Array(repeated.items().map(Group::errors_tree).collect())
            }
        }
    }

    fn for_each_field<'a>(
        &'a self,
        path: &FieldPath,
        parent: &'a Group,
        visit: &mut dyn FnMut(&FieldPath, &'a Group, &'a Field),
    ) {
        match self {
            Control::Field(field) => visit(path, parent, field),
            Control::Group(group) => group.for_each_field(path, visit),
            Control::Repeated(repeated) => {
                for (index, item) in repeated.items().enumerate() {
                    item.for_each_field(&path.join_index(index), visit);
                }
            }
        }
    }

    pub(crate) fn for_each_field_mut(&mut self, visit: &mut dyn FnMut(&mut Field)) {
        match self {
            Control::Field(field) => visit(field),
            Control::Group(group) => group.for_each_field_mut(visit),
            Control::Repeated(repeated) => {
                for item in repeated.items_mut() {
                    item.for_each_field_mut(visit);
                }
            }
        }
    }
}

/// Ordered mapping of names to child controls.
#[derive(Debug, Clone, Default)]
pub struct Group {
    children: Vec<(String, Control)>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(self, name: impl Into<String>, field: Field) -> Self {
        self.with_control(name, Control::Field(field))
    }

    pub fn with_group(self, name: impl Into<String>, group: Group) -> Self {
        self.with_control(name, Control::Group(group))
    }

    pub fn with_repeated(self, name: impl Into<String>, repeated: RepeatedGroup) -> Self {
        self.with_control(name, Control::Repeated(repeated))
    }

    /// Adding an existing name replaces that child in place.
    pub fn with_control(mut self, name: impl Into<String>, control: Control) -> Self {
        let name = name.into();
        match self.children.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = control,
            None => self.children.push((name, control)),
        }
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(name, _)| name.as_str())
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &Control)> {
        self.children
            .iter()
            .map(|(name, control)| (name.as_str(), control))
    }

    pub fn child(&self, name: &str) -> Option<&Control> {
        self.children
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, control)| control)
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.children
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, control)| control)
    }

    pub fn is_valid(&self) -> bool {
        self.children.iter().all(|(_, control)| control.is_valid())
    }

    /// Resolves a path relative to this group; fails loudly when it does not resolve.
    pub fn get(&self, path: &FieldPath) -> Result<&Control> {
        let mut segments = path.segments().iter();
        let first = segments
            .next()
            .ok_or_else(|| FormError::NotFound(path.to_string()))?;
        let mut current = self
            .child(first)
            .ok_or_else(|| FormError::NotFound(path.to_string()))?;
        for segment in segments {
            current = match current {
                Control::Group(group) => group.child(segment),
                Control::Repeated(repeated) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| repeated.items.get(index)),
                Control::Field(_) => None,
            }
            .ok_or_else(|| FormError::NotFound(path.to_string()))?;
        }
        Ok(current)
    }

    /// Lenient variant of [`Group::get`] for callers that treat missing as absent.
    pub fn lookup(&self, path: &FieldPath) -> Option<&Control> {
        self.get(path).ok()
    }

    pub fn field(&self, path: &FieldPath) -> Result<&Field> {
        self.get(path)?
            .as_field()
            .ok_or_else(|| FormError::wrong_kind(path, "field"))
    }

    pub fn group(&self, path: &FieldPath) -> Result<&Group> {
        if path.is_root() {
            return Ok(self);
        }
        self.get(path)?
            .as_group()
            .ok_or_else(|| FormError::wrong_kind(path, "group"))
    }

    pub fn repeated(&self, path: &FieldPath) -> Result<&RepeatedGroup> {
        self.get(path)?
            .as_repeated()
            .ok_or_else(|| FormError::wrong_kind(path, "repeated group"))
    }

    pub(crate) fn get_mut(&mut self, path: &FieldPath) -> Result<&mut Control> {
        let not_found = || FormError::NotFound(path.to_string());
        let (first, rest) = path.segments().split_first().ok_or_else(not_found)?;
        let mut current = self.child_mut(first).ok_or_else(not_found)?;
        for segment in rest {
            current = match current {
                Control::Group(group) => group.child_mut(segment),
                Control::Repeated(repeated) => match segment.parse::<usize>() {
                    Ok(index) => repeated.items.get_mut(index),
                    Err(_) => None,
                },
                Control::Field(_) => None,
            }
            .ok_or_else(not_found)?;
        }
        Ok(current)
    }

    pub(crate) fn field_mut(&mut self, path: &FieldPath) -> Result<&mut Field> {
        match self.get_mut(path)? {
            Control::Field(field) => Ok(field),
            _ => Err(FormError::wrong_kind(path, "field")),
        }
    }

    pub(crate) fn group_mut(&mut self, path: &FieldPath) -> Result<&mut Group> {
        if path.is_root() {
            return Ok(self);
        }
        match self.get_mut(path)? {
            Control::Group(group) => Ok(group),
            _ => Err(FormError::wrong_kind(path, "group")),
        }
    }

    pub(crate) fn repeated_mut(&mut self, path: &FieldPath) -> Result<&mut RepeatedGroup> {
        match self.get_mut(path)? {
            Control::Repeated(repeated) => Ok(repeated),
            _ => Err(FormError::wrong_kind(path, "repeated group")),
        }
    }

    /// Materialized value tree; disabled fields are left out.
    pub fn value(&self) -> JsonValue {
        self.materialize(false)
    }

    /// Materialized value tree including disabled fields.
    pub fn raw_value(&self) -> JsonValue {
        self.materialize(true)
    }

    fn materialize(&self, include_disabled: bool) -> JsonValue {
        let mut map = Map::new();
        for (name, control) in &self.children {
            if let Some(value) = control.materialize(include_disabled) {
                map.insert(name.clone(), value);
            }
        }
        JsonValue::Object(map)
    }

    /// Nested map of every field's errors, null where a field has none.
    pub fn errors_tree(&self) -> JsonValue {
        let mut map = Map::new();
        for (name, control) in &self.children {
            map.insert(name.clone(), control.errors_tree());
        }
        JsonValue::Object(map)
    }

    /// Visits every field depth-first with its path and containing group.
    pub(crate) fn for_each_field<'a>(
        &'a self,
        base: &FieldPath,
        visit: &mut dyn FnMut(&FieldPath, &'a Group, &'a Field),
    ) {
        for (name, control) in &self.children {
            control.for_each_field(&base.join(name), self, visit);
        }
    }

    pub(crate) fn for_each_field_mut(&mut self, visit: &mut dyn FnMut(&mut Field)) {
        for (_, control) in self.children.iter_mut() {
            control.for_each_field_mut(visit);
        }
    }

    /// Paths of every invalid enabled field under this group.
    pub fn invalid_fields(&self, base: &FieldPath) -> Vec<FieldPath> {
        let mut invalid = Vec::new();
        self.for_each_field(base, &mut |path, _, field| {
            if field.is_enabled() && !field.is_valid() {
                invalid.push(path.clone());
            }
        });
        invalid
    }

    /// Current value of a direct or nested field, if it resolves to one.
    pub fn value_of(&self, path: &FieldPath) -> Option<&Value> {
        self.lookup(path)
            .and_then(Control::as_field)
            .map(Field::value)
    }
}

/// Ordered sequence of structurally identical groups.
///
/// Items are held as `Control::Group` so paths can step through them.
#[derive(Debug, Clone, Default)]
pub struct RepeatedGroup {
    items: Vec<Control>,
}

impl RepeatedGroup {
    pub fn new(items: Vec<Group>) -> Self {
        Self {
            items: items.into_iter().map(Control::Group).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &Group> {
        self.items.iter().filter_map(Control::as_group)
    }

    pub fn get(&self, index: usize) -> Option<&Group> {
        self.items.get(index).and_then(Control::as_group)
    }

    /// Vacuously valid when empty.
    pub fn is_valid(&self) -> bool {
        self.items.iter().all(Control::is_valid)
    }

    pub(crate) fn push(&mut self, item: Group) -> usize {
        self.items.push(Control::Group(item));
        self.items.len() - 1
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<Group> {
        if index >= self.items.len() {
            return None;
        }
        match self.items.remove(index) {
            Control::Group(group) => Some(group),
            _ => None,
        }
    }

    pub(crate) fn items_mut(&mut self) -> impl Iterator<Item = &mut Group> {
        self.items.iter_mut().filter_map(|item| match item {
            Control::Group(group) => Some(group),
            _ => None,
        })
    }
}
