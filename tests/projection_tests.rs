mod common;

use benefits_core::{
    application::paths, config::EngineConfig, projection::Projector, ApplicationType, Field,
    FormTree, Group,
};
use insta::{assert_json_snapshot, assert_snapshot};

#[test]
fn review_values_fall_back_to_placeholder() {
    let session = common::filled_session(ApplicationType::Victim);
    let view = session.projector();
    assert_eq!(view.value_or_placeholder("personalInformation.middleName"), "--");
    assert_eq!(view.value_or_placeholder("personalInformation.gender"), "--");
    assert_eq!(
        view.value_or_placeholder("personalInformation.permissionToContactViaMethod"),
        "No"
    );
    assert_eq!(view.value_or_placeholder("introduction.understoodInformation"), "Yes");
    assert_eq!(view.value_or_placeholder("personalInformation.firstName"), "Ada");
    assert_eq!(
        view.multi_value(&[
            "personalInformation.firstName",
            "personalInformation.middleName",
            "personalInformation.lastName",
        ]),
        "Ada Lovelace"
    );
    assert_eq!(
        view.format_date_range(&[
            "crimeInformation.crimePeriodStart",
            "crimeInformation.crimePeriodEnd",
        ]),
        "Jan 5th, 2024"
    );
}

#[test]
fn personal_address_block_renders_present_lines() {
    let mut session = common::filled_session(ApplicationType::Victim);
    session
        .tree_mut()
        .set_value(format!("{}.province", paths::PERSONAL_ADDRESS), "BC")
        .unwrap();
    let block = session.projector().format_address_block(paths::PERSONAL_ADDRESS);
    assert_snapshot!(block, @"1 Main St<br />Victoria<br />BC<br />Canada<br />V8V 1V1");
}

// line1 is emitted with its separator even when empty; every other line is dropped.
#[test]
fn address_block_keeps_empty_first_line() {
    let tree = FormTree::new(
        Group::new().with_group(
            "address",
            Group::new()
                .with_field("line1", Field::blank())
                .with_field("line2", Field::blank())
                .with_field("city", Field::new("Victoria"))
                .with_field("postalCode", Field::blank()),
        ),
    );
    let config = EngineConfig::default();
    let view = Projector::new(tree.root(), &config);
    assert_eq!(view.format_address_block("address"), "<br />Victoria<br />");
    assert_eq!(view.format_address_block("nowhere"), "--");
}

#[test]
fn projections_follow_configured_separators() {
    let tree = FormTree::new(
        Group::new().with_group(
            "address",
            Group::new()
                .with_field("line1", Field::new("9 Fort St"))
                .with_field("country", Field::new("Canada")),
        ),
    );
    let config = EngineConfig {
        placeholder: "n/a".into(),
        address_separator: "\n".into(),
        ..EngineConfig::default()
    };
    let view = Projector::new(tree.root(), &config);
    assert_eq!(view.format_address_block("address"), "9 Fort St\nCanada\n");
    assert_eq!(view.value_or_placeholder("address.city"), "n/a");
}

#[test]
fn untouched_field_errors_are_reported_but_hidden() {
    let session = common::new_session(ApplicationType::Witness);
    let errors = session.tree().group("introduction").unwrap().errors_tree();
    assert_json_snapshot!(errors, @r###"
    {
      "understoodInformation": {
        "shouldBeTrue": {
          "value": ""
        }
      }
    }
    "###);
    assert!(session.tree().is_field_valid("introduction.understoodInformation"));
}
