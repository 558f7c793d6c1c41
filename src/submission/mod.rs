//! Wire-shape assembly and the remote submission seam.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::application::{ApplicationType, Section};
use crate::errors::{FormError, Result};
use crate::form::{FieldPath, FormTree};

/// Object handed to the submission collaborator. Sections that do not apply
/// to the variant serialize as explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct ApplicationPayload {
    pub introduction: Option<JsonValue>,
    pub personal_information: Option<JsonValue>,
    pub victim_information: Option<JsonValue>,
    pub crime_information: Option<JsonValue>,
    pub medical_information: Option<JsonValue>,
    pub expense_information: Option<JsonValue>,
    pub employment_income_information: Option<JsonValue>,
    pub representative_information: Option<JsonValue>,
    pub declaration_information: Option<JsonValue>,
    pub authorization_information: Option<JsonValue>,
}

impl ApplicationPayload {
    pub fn section(&self, section: Section) -> Option<&JsonValue> {
        self.slot(section).as_ref()
    }

    fn slot(&self, section: Section) -> &Option<JsonValue> {
        match section {
            Section::Introduction => &self.introduction,
            Section::PersonalInformation => &self.personal_information,
            Section::VictimInformation => &self.victim_information,
            Section::CrimeInformation => &self.crime_information,
            Section::MedicalInformation => &self.medical_information,
            Section::ExpenseInformation => &self.expense_information,
            Section::EmploymentIncomeInformation => &self.employment_income_information,
            Section::RepresentativeInformation => &self.representative_information,
            Section::DeclarationInformation => &self.declaration_information,
            Section::AuthorizationInformation => &self.authorization_information,
        }
    }

    fn slot_mut(&mut self, section: Section) -> &mut Option<JsonValue> {
        match section {
            Section::Introduction => &mut self.introduction,
            Section::PersonalInformation => &mut self.personal_information,
            Section::VictimInformation => &mut self.victim_information,
            Section::CrimeInformation => &mut self.crime_information,
            Section::MedicalInformation => &mut self.medical_information,
            Section::ExpenseInformation => &mut self.expense_information,
            Section::EmploymentIncomeInformation => &mut self.employment_income_information,
            Section::RepresentativeInformation => &mut self.representative_information,
            Section::DeclarationInformation => &mut self.declaration_information,
            Section::AuthorizationInformation => &mut self.authorization_information,
        }
    }

    pub fn to_json(&self) -> Result<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Reads every applicable section's materialized value.
///
/// A section the variant includes but the tree lacks is `IncompleteTree`;
/// inapplicable sections stay `None`.
pub fn assemble(tree: &FormTree, variant: ApplicationType) -> Result<ApplicationPayload> {
    let mut payload = ApplicationPayload::default();
    for section in variant.sections() {
        let group = tree
            .group(FieldPath::parse(section.key()))
            .map_err(|_| FormError::IncompleteTree(section.key().to_string()))?;
        *payload.slot_mut(section) = Some(group.value());
    }
    tracing::debug!(%variant, "application payload assembled");
    Ok(payload)
}

/// Response discriminant returned by the remote endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(rename = "isSuccess")]
    pub is_success: bool,
}

impl SubmissionReceipt {
    pub fn success() -> Self {
        Self { is_success: true }
    }

    pub fn rejected() -> Self {
        Self { is_success: false }
    }
}

/// Remote submission endpoint. Transport failures surface as
/// [`FormError::SubmissionTransport`].
pub trait SubmissionClient {
    fn submit(&self, payload: &ApplicationPayload) -> Result<SubmissionReceipt>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::build_application_form;
    use crate::config::EngineConfig;
    use crate::form::{Group, Field};

    #[test]
    fn inapplicable_section_serializes_as_null() {
        let tree =
            build_application_form(ApplicationType::Witness, &EngineConfig::default()).unwrap();
        let json = assemble(&tree, ApplicationType::Witness).unwrap().to_json().unwrap();
        assert_eq!(json["EmploymentIncomeInformation"], JsonValue::Null);
        assert!(json["ExpenseInformation"].is_object());
        assert_eq!(json.as_object().unwrap().len(), 10);
    }

    #[test]
    fn missing_applicable_section_is_incomplete() {
        let tree = FormTree::new(
            Group::new().with_group(
                "introduction",
                Group::new().with_field("understoodInformation", Field::new(true)),
            ),
        );
        assert_eq!(
            assemble(&tree, ApplicationType::Victim),
            Err(FormError::IncompleteTree("personalInformation".into()))
        );
    }

    #[test]
    fn receipt_reads_camel_case_discriminant() {
        let receipt: SubmissionReceipt = serde_json::from_str(r#"{"isSuccess":false}"#).unwrap();
        assert_eq!(receipt, SubmissionReceipt::rejected());
    }
}
