//! Concrete benefits application: section layout, variants and wiring.

pub mod sections;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cascade::{
    Activation, CascadeAction, CascadeRegistry, CascadeRule, RepeatedTargets, ADDRESS_FIELDS,
};
use crate::config::EngineConfig;
use crate::errors::Result;
use crate::form::{FieldPath, FormTree, Group};
use crate::validation::Validator;

/// Well-known paths the session and cascades address directly.
pub mod paths {
    pub const COMPLETING_ON_BEHALF_OF: &str = "representativeInformation.completingOnBehalfOf";
    pub const MISSED_WORK: &str = "expenseInformation.missedWorkDueToDeathOfVictim";
    pub const EMPLOYERS: &str = "expenseInformation.employers";
    pub const MINIMUM_BENEFITS: &str = "expenseInformation.minimumBenefitsSelected";
    pub const MINIMUM_ADDITIONAL_BENEFITS: &str =
        "expenseInformation.minimumAdditionalBenefitsSelected";
    pub const MINIMUM_OTHER_BENEFITS: &str = "expenseInformation.minimumOtherBenefitsSelected";
    pub const PERSONAL_ADDRESS: &str = "personalInformation.primaryAddress";
    pub const VICTIM_ADDRESS: &str = "victimInformation.primaryAddress";
    pub const VICTIM_ADDRESS_SAME_AS_PERSONAL: &str =
        "victimInformation.mostRecentMailingAddressSameAsPersonal";
}

pub const BENEFIT_SOURCES: [&str; 3] = [
    "expenseInformation.haveCounsellingExpenses",
    "expenseInformation.haveCounsellingTransportation",
    "expenseInformation.havePrescriptionDrugExpenses",
];

pub const ADDITIONAL_BENEFIT_SOURCES: [&str; 2] = [
    "expenseInformation.haveCrimeSceneCleaningExpenses",
    "expenseInformation.noneOfTheAboveExpenses",
];

pub const OTHER_BENEFIT_SOURCES: [&str; 8] = [
    "expenseInformation.haveDisabilityPlanBenefits",
    "expenseInformation.haveEmploymentInsuranceBenefits",
    "expenseInformation.haveIncomeAssistanceBenefits",
    "expenseInformation.haveCanadaPensionPlanBenefits",
    "expenseInformation.haveAboriginalAffairsAndNorthernDevelopmentCanadaBenefits",
    "expenseInformation.haveCivilActionBenefits",
    "expenseInformation.haveOtherBenefits",
    "expenseInformation.noneOfTheAboveBenefits",
];

/// Application variant, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApplicationType {
    Victim,
    ImmediateFamilyMember,
    Witness,
}

impl ApplicationType {
    pub fn includes(&self, section: Section) -> bool {
        match section {
            Section::EmploymentIncomeInformation => !matches!(self, ApplicationType::Witness),
            _ => true,
        }
    }

    /// Wizard step order for this variant.
    pub fn sections(&self) -> Vec<Section> {
        Section::ALL
            .iter()
            .copied()
            .filter(|section| self.includes(*section))
            .collect()
    }

    /// Data sent with cancel and summary dialogs.
    pub fn dialog_tag(&self) -> &'static str {
        match self {
            ApplicationType::Victim => "victim",
            ApplicationType::ImmediateFamilyMember => "ifm",
            ApplicationType::Witness => "witness",
        }
    }
}

impl fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ApplicationType::Victim => "Victim Application",
            ApplicationType::ImmediateFamilyMember => "Immediate Family Member Application",
            ApplicationType::Witness => "Witness Application",
        };
        f.write_str(label)
    }
}

/// Top-level sections in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Introduction,
    PersonalInformation,
    VictimInformation,
    CrimeInformation,
    MedicalInformation,
    ExpenseInformation,
    EmploymentIncomeInformation,
    RepresentativeInformation,
    DeclarationInformation,
    AuthorizationInformation,
}

impl Section {
    pub const ALL: [Section; 10] = [
        Section::Introduction,
        Section::PersonalInformation,
        Section::VictimInformation,
        Section::CrimeInformation,
        Section::MedicalInformation,
        Section::ExpenseInformation,
        Section::EmploymentIncomeInformation,
        Section::RepresentativeInformation,
        Section::DeclarationInformation,
        Section::AuthorizationInformation,
    ];

    /// Group name in the form tree.
    pub fn key(&self) -> &'static str {
        match self {
            Section::Introduction => "introduction",
            Section::PersonalInformation => "personalInformation",
            Section::VictimInformation => "victimInformation",
            Section::CrimeInformation => "crimeInformation",
            Section::MedicalInformation => "medicalInformation",
            Section::ExpenseInformation => "expenseInformation",
            Section::EmploymentIncomeInformation => "employmentIncomeInformation",
            Section::RepresentativeInformation => "representativeInformation",
            Section::DeclarationInformation => "declarationInformation",
            Section::AuthorizationInformation => "authorizationInformation",
        }
    }

    fn build(&self) -> Group {
        match self {
            Section::Introduction => sections::introduction(),
            Section::PersonalInformation => sections::personal_information(),
            Section::VictimInformation => sections::victim_information(),
            Section::CrimeInformation => sections::crime_information(),
            Section::MedicalInformation => sections::medical_information(),
            Section::ExpenseInformation => sections::expense_information(),
            Section::EmploymentIncomeInformation => sections::employment_income_information(),
            Section::RepresentativeInformation => sections::representative_information(),
            Section::DeclarationInformation => sections::declaration_information(),
            Section::AuthorizationInformation => sections::authorization_information(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Builds the full application tree for `variant` with its cascades registered.
pub fn build_application_form(variant: ApplicationType, config: &EngineConfig) -> Result<FormTree> {
    let root = variant
        .sections()
        .into_iter()
        .fold(Group::new(), |root, section| root.with_group(section.key(), section.build()));

    let mut cascades = CascadeRegistry::new();
    cascades.register_all(application_cascades(config))?;
    tracing::debug!(%variant, rules = cascades.rules().len(), "application form built");
    FormTree::with_cascades(root, cascades)
}

/// Every cascade the application wires between its fields.
pub fn application_cascades(config: &EngineConfig) -> Vec<CascadeRule> {
    let sentinel = config.gate_sentinel.as_str();
    let mut rules = vec![CascadeRule::new(
        "missed work requires wage details",
        paths::MISSED_WORK,
        CascadeAction::ToggleValidators {
            targets: [
                "expenseInformation.didYouLoseWages",
                "expenseInformation.daysWorkMissedStart",
                "expenseInformation.mayContactEmployer",
                paths::MINIMUM_OTHER_BENEFITS,
            ]
            .iter()
            .map(|path| FieldPath::parse(path))
            .collect(),
            repeated: vec![RepeatedTargets::new(
                paths::EMPLOYERS,
                &["employerName", "employerPhoneNumber"],
            )],
            activation: Activation::IsTrue,
            validators: vec![Validator::Required],
        },
    )];
    rules.extend(CascadeRule::gate(
        "minimum benefits",
        &BENEFIT_SOURCES,
        paths::MINIMUM_BENEFITS,
        sentinel,
    ));
    rules.extend(CascadeRule::gate(
        "minimum additional benefits",
        &ADDITIONAL_BENEFIT_SOURCES,
        paths::MINIMUM_ADDITIONAL_BENEFITS,
        sentinel,
    ));
    rules.extend(CascadeRule::gate(
        "minimum other benefits",
        &OTHER_BENEFIT_SOURCES,
        paths::MINIMUM_OTHER_BENEFITS,
        sentinel,
    ));
    rules.push(CascadeRule::new(
        "victim address same as personal",
        paths::VICTIM_ADDRESS_SAME_AS_PERSONAL,
        CascadeAction::CopyFields {
            source: FieldPath::parse(paths::PERSONAL_ADDRESS),
            target: FieldPath::parse(paths::VICTIM_ADDRESS),
            fields: ADDRESS_FIELDS.iter().map(|field| field.to_string()).collect(),
        },
    ));
    rules
}
