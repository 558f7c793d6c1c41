//! Cascade rules: reactions registered against a trigger field.
//!
//! Actions are declarative so the registry can enumerate every path a rule
//! writes and reject registrations that would close an update cycle.

use std::collections::{BTreeMap, BTreeSet};

use crate::errors::{FormError, Result};
use crate::form::{FieldPath, Value};
use crate::validation::Validator;

/// Sub-field names of an address group.
pub const ADDRESS_FIELDS: [&str; 6] =
    ["line1", "line2", "city", "postalCode", "province", "country"];

/// Predicate over the trigger's new value.
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    IsTrue,
    Equals(Value),
    AnyOf(Vec<Value>),
}

impl Activation {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Activation::IsTrue => value.is_true(),
            Activation::Equals(expected) => value == expected,
            Activation::AnyOf(candidates) => candidates.contains(value),
        }
    }
}

/// Fields inside every element of a repeated group.
#[derive(Debug, Clone)]
pub struct RepeatedTargets {
    pub group: FieldPath,
    pub fields: Vec<String>,
}

impl RepeatedTargets {
    pub fn new(group: &str, fields: &[&str]) -> Self {
        Self {
            group: FieldPath::parse(group),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum CascadeAction {
    /// Clears the targets' validators and errors, then attaches `validators`
    /// when the trigger satisfies `activation`.
    ToggleValidators {
        targets: Vec<FieldPath>,
        repeated: Vec<RepeatedTargets>,
        activation: Activation,
        validators: Vec<Validator>,
    },
    /// Writes `sentinel` into `gate` when any source is `true`, else `""`.
    ComputeGate {
        sources: Vec<FieldPath>,
        gate: FieldPath,
        sentinel: String,
    },
    /// Copies `fields` from `source` into `target` and disables them while the
    /// trigger is `true`; re-enables them otherwise.
    CopyFields {
        source: FieldPath,
        target: FieldPath,
        fields: Vec<String>,
    },
}

impl CascadeAction {
    /// Paths whose values this action writes.
    pub fn writes(&self) -> Vec<FieldPath> {
        match self {
            CascadeAction::ToggleValidators { .. } => Vec::new(),
            CascadeAction::ComputeGate { gate, .. } => vec![gate.clone()],
            CascadeAction::CopyFields { target, fields, .. } => {
                fields.iter().map(|field| target.join(field)).collect()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CascadeRule {
    pub name: String,
    pub trigger: FieldPath,
    pub action: CascadeAction,
}

impl CascadeRule {
    pub fn new(
        name: impl Into<String>,
        trigger: impl Into<FieldPath>,
        action: CascadeAction,
    ) -> Self {
        Self {
            name: name.into(),
            trigger: trigger.into(),
            action,
        }
    }

    /// One gate rule per source so any checkbox change recomputes the gate.
    pub fn gate(name: &str, sources: &[&str], gate: &str, sentinel: &str) -> Vec<Self> {
        let source_paths: Vec<FieldPath> = sources.iter().map(|s| FieldPath::parse(s)).collect();
        source_paths
            .iter()
            .map(|trigger| {
                CascadeRule::new(
                    name,
                    trigger.clone(),
                    CascadeAction::ComputeGate {
                        sources: source_paths.clone(),
                        gate: FieldPath::parse(gate),
                        sentinel: sentinel.to_string(),
                    },
                )
            })
            .collect()
    }
}

/// Enumerable set of cascade rules, kept acyclic on every registration.
#[derive(Debug, Clone, Default)]
pub struct CascadeRegistry {
    rules: Vec<CascadeRule>,
}

impl CascadeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: CascadeRule) -> Result<()> {
        self.rules.push(rule);
        if let Err(err) = self.check_acyclic() {
            self.rules.pop();
            return Err(err);
        }
        Ok(())
    }

    /// All or nothing: on a cycle the registry keeps none of the batch.
    pub fn register_all(&mut self, rules: impl IntoIterator<Item = CascadeRule>) -> Result<()> {
        let mut scratch = self.clone();
        for rule in rules {
            scratch.register(rule)?;
        }
        *self = scratch;
        Ok(())
    }

    pub fn rules(&self) -> &[CascadeRule] {
        &self.rules
    }

    pub fn triggered_by(&self, trigger: &FieldPath) -> Vec<CascadeRule> {
        self.rules
            .iter()
            .filter(|rule| &rule.trigger == trigger)
            .cloned()
            .collect()
    }

    /// Validator toggles whose repeated targets live under `group`.
    pub fn toggles_for_repeated(&self, group: &FieldPath) -> Vec<CascadeRule> {
        self.rules
            .iter()
            .filter(|rule| match &rule.action {
                CascadeAction::ToggleValidators { repeated, .. } => {
                    repeated.iter().any(|targets| &targets.group == group)
                }
                _ => false,
            })
            .cloned()
            .collect()
    }

    /// Fails with the first path found on a trigger -> written-path cycle.
    pub fn check_acyclic(&self) -> Result<()> {
        let mut edges: BTreeMap<FieldPath, BTreeSet<FieldPath>> = BTreeMap::new();
        for rule in &self.rules {
            edges
                .entry(rule.trigger.clone())
                .or_default()
                .extend(rule.action.writes());
        }

        let mut finished = BTreeSet::new();
        for start in edges.keys() {
            let mut on_stack = BTreeSet::new();
            visit(start, &edges, &mut on_stack, &mut finished)?;
        }
        Ok(())
    }
}

fn visit(
    node: &FieldPath,
    edges: &BTreeMap<FieldPath, BTreeSet<FieldPath>>,
    on_stack: &mut BTreeSet<FieldPath>,
    finished: &mut BTreeSet<FieldPath>,
) -> Result<()> {
    if finished.contains(node) {
        return Ok(());
    }
    if !on_stack.insert(node.clone()) {
        return Err(FormError::CascadeCycle(node.to_string()));
    }
    if let Some(next) = edges.get(node) {
        for target in next {
            visit(target, edges, on_stack, finished)?;
        }
    }
    on_stack.remove(node);
    finished.insert(node.clone());
    Ok(())
}
