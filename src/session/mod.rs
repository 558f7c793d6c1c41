//! One user's pass through an application: tree, wizard, dialogs and submit.

use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

use crate::application::{build_application_form, paths, sections, ApplicationType};
use crate::config::EngineConfig;
use crate::errors::{FormError, Result};
use crate::form::{FieldPath, FormTree, Group, Value};
use crate::projection::Projector;
use crate::submission::{assemble, ApplicationPayload, SubmissionClient, SubmissionReceipt};
use crate::wizard::{WizardController, WizardEvent};

/// Navigation targets the session can request from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ApplicationSuccess,
    ApplicationCancelled,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::ApplicationSuccess => "/application-success",
            Route::ApplicationCancelled => "/application-cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Signature,
    CancelApplication,
    SummaryOfBenefits,
}

/// How the host should open a modal dialog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DialogConfig {
    /// Background clicks do not dismiss the dialog.
    pub disable_close: bool,
    pub auto_focus: bool,
    pub data: Option<String>,
    pub max_width: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Payload is ready for the submission collaborator.
    Ready(ApplicationPayload),
    /// Tree was invalid; every control is now touched.
    NotValidated,
    /// Retryable failure, shown to the user as `message`.
    Failed { message: String },
    Navigate(Route),
}

pub struct ApplicationSession {
    id: Uuid,
    variant: ApplicationType,
    config: EngineConfig,
    tree: FormTree,
    wizard: WizardController,
    submitting: bool,
}

impl ApplicationSession {
    /// `on_behalf_of` is the raw query-string value; anything that does not
    /// parse as an integer leaves `completingOnBehalfOf` empty.
    pub fn new(
        variant: ApplicationType,
        config: EngineConfig,
        on_behalf_of: Option<&str>,
    ) -> Result<Self> {
        let mut tree = build_application_form(variant, &config)?;
        let code = on_behalf_of
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(Value::from)
            .unwrap_or(Value::Null);
        let (group, name) = split_path(paths::COMPLETING_ON_BEHALF_OF)?;
        tree.patch_value(group, &single_entry(&name, code.to_json()))?;

        let wizard = WizardController::from_tree(&tree);
        let id = Uuid::new_v4();
        tracing::info!(%id, %variant, steps = wizard.steps().len(), "application session started");
        Ok(Self {
            id,
            variant,
            config,
            tree,
            wizard,
            submitting: false,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn variant(&self) -> ApplicationType {
        self.variant
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tree(&self) -> &FormTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut FormTree {
        &mut self.tree
    }

    pub fn wizard(&self) -> &WizardController {
        &self.wizard
    }

    pub fn projector(&self) -> Projector<'_> {
        Projector::new(self.tree.root(), &self.config)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn next(&mut self) -> Result<WizardEvent> {
        self.wizard.next(&mut self.tree)
    }

    pub fn goto(&mut self, step: usize) -> Result<WizardEvent> {
        self.wizard.goto(step)
    }

    pub fn select(&mut self, step: usize) -> Result<WizardEvent> {
        self.wizard.select(step)
    }

    pub fn add_employer(&mut self) -> Result<usize> {
        self.tree.append(paths::EMPLOYERS, sections::employer_item())
    }

    pub fn remove_employer(&mut self, index: usize) -> Result<Group> {
        self.tree.remove_at(paths::EMPLOYERS, index)
    }

    pub fn dialog_config(&self, kind: DialogKind) -> DialogConfig {
        let tag = Some(self.variant.dialog_tag().to_string());
        match kind {
            DialogKind::Signature => DialogConfig {
                disable_close: true,
                auto_focus: true,
                ..DialogConfig::default()
            },
            DialogKind::CancelApplication => DialogConfig {
                disable_close: true,
                auto_focus: true,
                data: tag,
                max_width: None,
            },
            DialogKind::SummaryOfBenefits => DialogConfig {
                data: tag,
                max_width: Some("800px".into()),
                ..DialogConfig::default()
            },
        }
    }

    /// Stores the signature dialog's result into `group.control`.
    pub fn apply_signature(&mut self, group: &str, control: &str, data: &str) -> Result<()> {
        self.tree.patch_value(group, &single_entry(control, json!(data)))
    }

    pub fn resolve_cancellation(&self, confirmed: bool) -> Option<Route> {
        confirmed.then_some(Route::ApplicationCancelled)
    }

    /// First half of a submit. Refuses re-entry while a submission is pending.
    pub fn begin_submit(&mut self) -> Result<SubmitOutcome> {
        if self.submitting {
            return Err(FormError::SubmissionInProgress);
        }
        self.submitting = true;

        if !self.tree.is_valid() {
            self.submitting = false;
            self.tree.mark_all_touched();
            tracing::info!(id = %self.id, "form not validated");
            return Ok(SubmitOutcome::NotValidated);
        }

        match assemble(&self.tree, self.variant) {
            Ok(payload) => Ok(SubmitOutcome::Ready(payload)),
            Err(err) => Ok(self.fail(&err)),
        }
    }

    /// Second half of a submit: reacts to the collaborator's answer.
    pub fn complete_submit(&mut self, response: Result<SubmissionReceipt>) -> SubmitOutcome {
        match response {
            Ok(receipt) if receipt.is_success => {
                tracing::info!(id = %self.id, "application submitted");
                SubmitOutcome::Navigate(Route::ApplicationSuccess)
            }
            Ok(_) => self.fail(&FormError::SubmissionTransport("endpoint reported failure".into())),
            Err(err) => self.fail(&err),
        }
    }

    /// Assembles whatever has been entered so far, without validity gating.
    pub fn begin_partial_submit(&self) -> Result<ApplicationPayload> {
        assemble(&self.tree, self.variant)
    }

    /// Any answer from the endpoint counts as saved.
    pub fn complete_partial_submit(
        &mut self,
        response: Result<SubmissionReceipt>,
    ) -> SubmitOutcome {
        match response {
            Ok(_) => SubmitOutcome::Navigate(Route::ApplicationSuccess),
            Err(err) => self.fail(&err),
        }
    }

    /// Runs both phases against a synchronous client.
    pub fn submit_with(&mut self, client: &dyn SubmissionClient) -> Result<SubmitOutcome> {
        match self.begin_submit()? {
            SubmitOutcome::Ready(payload) => {
                let response = client.submit(&payload);
                Ok(self.complete_submit(response))
            }
            other => Ok(other),
        }
    }

    fn fail(&mut self, err: &FormError) -> SubmitOutcome {
        self.submitting = false;
        tracing::warn!(id = %self.id, error = %err, "error submitting application");
        SubmitOutcome::Failed {
            message: self.config.submission_failure_message.clone(),
        }
    }
}

fn single_entry(name: &str, value: JsonValue) -> JsonValue {
    let mut partial = serde_json::Map::new();
    partial.insert(name.to_string(), value);
    JsonValue::Object(partial)
}

fn split_path(path: &str) -> Result<(FieldPath, String)> {
    let parsed = FieldPath::parse(path);
    let (parent, last) = parsed
        .split_last()
        .ok_or_else(|| FormError::InvalidInput(format!("`{}` has no leaf segment", path)))?;
    Ok((parent, last.to_string()))
}
