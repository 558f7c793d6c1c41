#![allow(dead_code)]

use std::cell::RefCell;

use benefits_core::{
    config::EngineConfig,
    errors::{FormError, Result},
    session::ApplicationSession,
    submission::{ApplicationPayload, SubmissionClient, SubmissionReceipt},
    ApplicationType, FormTree, Value,
};

pub fn new_session(variant: ApplicationType) -> ApplicationSession {
    ApplicationSession::new(variant, EngineConfig::default(), Some("1")).expect("build session")
}

/// Session whose tree satisfies every validator for `variant`.
pub fn filled_session(variant: ApplicationType) -> ApplicationSession {
    let mut session = new_session(variant);
    fill_required(session.tree_mut());
    assert!(session.tree().is_valid(), "filled tree should be valid");
    session
}

pub fn fill_required(tree: &mut FormTree) {
    let entries: Vec<(&str, Value)> = vec![
        ("introduction.understoodInformation", true.into()),
        ("personalInformation.firstName", "Ada".into()),
        ("personalInformation.lastName", "Lovelace".into()),
        ("personalInformation.birthDate", "1990-12-10".into()),
        ("personalInformation.phoneNumber", "250-555-0100".into()),
        ("personalInformation.primaryAddress.line1", "1 Main St".into()),
        ("personalInformation.primaryAddress.city", "Victoria".into()),
        ("personalInformation.primaryAddress.postalCode", "V8V 1V1".into()),
        ("victimInformation.firstName", "Grace".into()),
        ("victimInformation.lastName", "Hopper".into()),
        ("victimInformation.birthDate", "1985-06-01".into()),
        ("victimInformation.primaryAddress.postalCode", "V9A 2B3".into()),
        ("crimeInformation.typeOfCrime", "Assault".into()),
        ("crimeInformation.crimePeriodStart", "2024-01-05".into()),
        ("crimeInformation.crimeLocation", "Victoria".into()),
        ("crimeInformation.crimeDetails", "Details of the incident".into()),
        ("expenseInformation.haveCounsellingExpenses", true.into()),
        ("declarationInformation.declaredAndSigned", true.into()),
        ("declarationInformation.signature", "data:image/png;base64,AAA".into()),
        ("authorizationInformation.approvedAuthorityNotification", true.into()),
        (
            "authorizationInformation.readAndUnderstoodTermsAndConditions",
            true.into(),
        ),
        ("authorizationInformation.signature", "data:image/png;base64,BBB".into()),
    ];
    for (path, value) in entries {
        tree.set_value(path, value).expect("set required field");
    }
}

/// Records each payload and answers with a canned response.
pub struct RecordingClient {
    pub response: Result<SubmissionReceipt>,
    pub received: RefCell<Vec<ApplicationPayload>>,
}

impl RecordingClient {
    pub fn answering(response: Result<SubmissionReceipt>) -> Self {
        Self {
            response,
            received: RefCell::new(Vec::new()),
        }
    }

    pub fn transport_failure() -> Self {
        Self::answering(Err(FormError::SubmissionTransport("connection reset".into())))
    }
}

impl SubmissionClient for RecordingClient {
    fn submit(&self, payload: &ApplicationPayload) -> Result<SubmissionReceipt> {
        self.received.borrow_mut().push(payload.clone());
        self.response.clone()
    }
}
