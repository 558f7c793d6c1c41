mod common;

use benefits_core::{
    errors::FormError,
    session::{Route, SubmitOutcome},
    submission::{assemble, SubmissionReceipt},
    ApplicationType, Section,
};
use common::RecordingClient;
use insta::assert_json_snapshot;
use serde_json::{json, Value as JsonValue};

#[test]
fn witness_payload_nulls_employment_section_and_fills_the_rest() {
    let session = common::filled_session(ApplicationType::Witness);
    let payload = assemble(session.tree(), ApplicationType::Witness).unwrap();
    let json = payload.to_json().unwrap();

    assert_eq!(json["EmploymentIncomeInformation"], JsonValue::Null);
    for section in ApplicationType::Witness.sections() {
        assert!(payload.section(section).is_some(), "{section}");
    }
    assert_json_snapshot!(json["Introduction"], @r###"
    {
      "understoodInformation": true
    }
    "###);
    assert_eq!(json["PersonalInformation"]["firstName"], json!("Ada"));
    assert_eq!(
        json["PersonalInformation"]["primaryAddress"]["postalCode"],
        json!("V8V 1V1")
    );
    assert_eq!(json["ExpenseInformation"]["minimumBenefitsSelected"], json!("yes"));
    assert_eq!(json["RepresentativeInformation"]["completingOnBehalfOf"], json!(1));
}

#[test]
fn victim_payload_includes_employment_section() {
    let session = common::filled_session(ApplicationType::Victim);
    let payload = session.begin_partial_submit().unwrap();
    assert!(payload.section(Section::EmploymentIncomeInformation).is_some());
}

#[test]
fn successful_submission_navigates_to_success() {
    let mut session = common::filled_session(ApplicationType::Victim);
    let client = RecordingClient::answering(Ok(SubmissionReceipt::success()));

    let outcome = session.submit_with(&client).unwrap();
    assert_eq!(outcome, SubmitOutcome::Navigate(Route::ApplicationSuccess));
    assert_eq!(Route::ApplicationSuccess.path(), "/application-success");
    assert_eq!(client.received.borrow().len(), 1);
}

#[test]
fn rejected_and_transport_failures_look_the_same() {
    let rejected = RecordingClient::answering(Ok(SubmissionReceipt::rejected()));
    let broken = RecordingClient::transport_failure();

    let mut first = common::filled_session(ApplicationType::Victim);
    let mut second = common::filled_session(ApplicationType::Victim);
    let a = first.submit_with(&rejected).unwrap();
    let b = second.submit_with(&broken).unwrap();

    assert_eq!(a, b);
    assert_eq!(
        a,
        SubmitOutcome::Failed {
            message: "Error submitting application".into()
        }
    );
    assert!(!first.is_submitting());
    assert!(!second.is_submitting());

    // Failure re-enables submit; retry goes through.
    let ok = RecordingClient::answering(Ok(SubmissionReceipt::success()));
    assert_eq!(
        first.submit_with(&ok).unwrap(),
        SubmitOutcome::Navigate(Route::ApplicationSuccess)
    );
}

#[test]
fn second_submit_while_pending_is_refused() {
    let mut session = common::filled_session(ApplicationType::Witness);
    let SubmitOutcome::Ready(_) = session.begin_submit().unwrap() else {
        panic!("valid tree should be ready to send");
    };
    assert!(session.is_submitting());
    assert_eq!(session.begin_submit(), Err(FormError::SubmissionInProgress));

    let outcome = session.complete_submit(Ok(SubmissionReceipt::success()));
    assert_eq!(outcome, SubmitOutcome::Navigate(Route::ApplicationSuccess));
}

#[test]
fn invalid_tree_is_never_sent() {
    let mut session = common::new_session(ApplicationType::Victim);
    let client = RecordingClient::answering(Ok(SubmissionReceipt::success()));

    assert_eq!(session.submit_with(&client).unwrap(), SubmitOutcome::NotValidated);
    assert!(client.received.borrow().is_empty());
    assert!(!session.is_submitting());
    assert!(!session.tree().is_field_valid("personalInformation.firstName"));
}

#[test]
fn partial_submit_skips_validation() {
    let mut session = common::new_session(ApplicationType::Witness);
    let payload = session.begin_partial_submit().unwrap();
    assert!(payload.section(Section::EmploymentIncomeInformation).is_none());

    let outcome = session.complete_partial_submit(Ok(SubmissionReceipt::rejected()));
    assert_eq!(outcome, SubmitOutcome::Navigate(Route::ApplicationSuccess));
}
