//! Step sequencing over the top-level sections of a [`FormTree`].

use crate::errors::{FormError, Result};
use crate::form::{FieldPath, FormTree};

/// One wizard page, mapped 1:1 to a top-level group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardStep {
    pub index: usize,
    pub group_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    AtStep(usize),
    Completed,
}

/// Outcome of a navigation request, for the hosting view to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    Advanced { from: usize, to: usize },
    Jumped { to: usize },
    Completed,
    /// Forward navigation refused; `invalid` lists the offending fields.
    Blocked { step: usize, invalid: Vec<FieldPath> },
    NoOp,
}

impl WizardEvent {
    /// Whether the view should scroll back to the top.
    pub fn scrolls_to_top(&self) -> bool {
        matches!(
            self,
            WizardEvent::Advanced { .. } | WizardEvent::Jumped { .. } | WizardEvent::Completed
        )
    }
}

#[derive(Debug, Clone)]
pub struct WizardController {
    steps: Vec<WizardStep>,
    state: WizardState,
    show_validation_message: bool,
    form_fully_validated: bool,
}

impl WizardController {
    pub fn new(group_names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let steps = group_names
            .into_iter()
            .enumerate()
            .map(|(index, name)| WizardStep {
                index,
                group_name: name.into(),
            })
            .collect::<Vec<_>>();
        let state = if steps.is_empty() {
            WizardState::Completed
        } else {
            WizardState::AtStep(0)
        };
        Self {
            steps,
            state,
            show_validation_message: false,
            form_fully_validated: false,
        }
    }

    /// One step per top-level group, in declaration order.
    pub fn from_tree(tree: &FormTree) -> Self {
        Self::new(tree.root().names().map(str::to_string).collect::<Vec<_>>())
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            WizardState::AtStep(index) => Some(index),
            WizardState::Completed => None,
        }
    }

    pub fn current_step(&self) -> Option<&WizardStep> {
        self.current_index().and_then(|index| self.steps.get(index))
    }

    pub fn show_validation_message(&self) -> bool {
        self.show_validation_message
    }

    /// Whole-tree validity as of the last `next` attempt.
    pub fn form_fully_validated(&self) -> bool {
        self.form_fully_validated
    }

    /// Unconditional jump, used by review links. Keeps the validation message flag.
    pub fn goto(&mut self, target: usize) -> Result<WizardEvent> {
        if target >= self.steps.len() {
            return Err(FormError::StepOutOfRange(target));
        }
        self.state = WizardState::AtStep(target);
        tracing::debug!(step = target, "wizard jumped");
        Ok(WizardEvent::Jumped { to: target })
    }

    /// Step-header selection: jumps and hides the validation message.
    pub fn select(&mut self, target: usize) -> Result<WizardEvent> {
        let event = self.goto(target)?;
        self.show_validation_message = false;
        Ok(event)
    }

    /// Advances past the current step only if its section is valid; otherwise
    /// touches every control in it and raises the validation message flag.
    pub fn next(&mut self, tree: &mut FormTree) -> Result<WizardEvent> {
        self.form_fully_validated = tree.is_valid();

        let WizardState::AtStep(index) = self.state else {
            return Ok(WizardEvent::NoOp);
        };
        let Some(step) = self.steps.get(index) else {
            return Err(FormError::StepOutOfRange(index));
        };
        let section_path = FieldPath::parse(&step.group_name);
        let section = tree.group(section_path.clone())?;

        if section.is_valid() {
            self.show_validation_message = false;
            let event = if index + 1 < self.steps.len() {
                self.state = WizardState::AtStep(index + 1);
                WizardEvent::Advanced {
                    from: index,
                    to: index + 1,
                }
            } else {
                self.state = WizardState::Completed;
                WizardEvent::Completed
            };
            tracing::debug!(step = index, ?event, "wizard advanced");
            Ok(event)
        } else {
            let invalid = section.invalid_fields(&section_path);
            tree.mark_touched(section_path, true)?;
            self.show_validation_message = true;
            tracing::debug!(step = index, invalid = invalid.len(), "wizard blocked");
            Ok(WizardEvent::Blocked {
                step: index,
                invalid,
            })
        }
    }
}
