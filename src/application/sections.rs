//! Field-group builders, one per top-level section.

use crate::form::{Field, Group, RepeatedGroup, Value};
use crate::reference::{self, DEFAULT_COUNTRY, DEFAULT_PROVINCE, POSTAL_CHECKED_COUNTRIES};
use crate::validation::Validator;

/// `completingOnBehalfOf` codes that require representative details.
pub const REPRESENTATIVE_REQUIRED_CODES: [i32; 2] = [2, 3];

fn required() -> Field {
    Field::blank().with_validator(Validator::Required)
}

fn checkbox() -> Field {
    Field::new(false)
}

fn must_be_checked() -> Field {
    Field::blank().with_validator(Validator::RequiredTrue)
}

fn required_if(sibling: &str) -> Field {
    Field::blank().with_validator(Validator::required_if(sibling))
}

/// Address block; `checked_postal` enforces the postal pattern for Canada/USA.
pub fn address_group(checked_postal: bool) -> Group {
    let postal = if checked_postal {
        Field::blank().with_validator(Validator::pattern_if_sibling_equals(
            &reference::POSTAL_CODE_REGEX,
            "country",
            &POSTAL_CHECKED_COUNTRIES,
        ))
    } else {
        Field::blank()
    };
    Group::new()
        .with_field("line1", Field::blank())
        .with_field("line2", Field::blank())
        .with_field("city", Field::blank())
        .with_field("postalCode", postal)
        .with_field("province", Field::new(DEFAULT_PROVINCE))
        .with_field("country", Field::new(DEFAULT_COUNTRY))
}

pub fn introduction() -> Group {
    Group::new().with_field("understoodInformation", must_be_checked())
}

pub fn personal_information() -> Group {
    let contact_any = || {
        Field::blank().with_validator(Validator::any_non_empty(&[
            "personalInformation.phoneNumber",
            "personalInformation.alternatePhoneNumber",
            "personalInformation.email",
        ]))
    };
    Group::new()
        .with_field("firstName", required())
        .with_field("middleName", Field::blank())
        .with_field("lastName", required())
        .with_field("otherFirstName", Field::blank())
        .with_field("otherLastName", Field::blank())
        .with_field("dateOfNameChange", Field::blank())
        .with_field("gender", Field::new(0))
        .with_field("birthDate", required())
        .with_field("sinPart1", Field::blank())
        .with_field("sinPart2", Field::blank())
        .with_field("sinPart3", Field::blank())
        .with_field("occupation", Field::blank())
        .with_field("preferredMethodOfContact", Field::new(1))
        .with_field("permissionToContactViaMethod", checkbox())
        .with_field("phoneNumber", contact_any())
        .with_field("alternatePhoneNumber", contact_any())
        .with_field("email", contact_any())
        .with_group("primaryAddress", address_group(true))
}

pub fn victim_information() -> Group {
    Group::new()
        .with_field("firstName", required())
        .with_field("middleName", Field::blank())
        .with_field("lastName", required())
        .with_field("gender", Field::new(0))
        .with_field("birthDate", required())
        .with_field("phoneNumber", Field::blank())
        .with_field("email", Field::blank())
        .with_field("mostRecentMailingAddressSameAsPersonal", checkbox())
        .with_group("primaryAddress", address_group(true))
}

pub fn crime_information() -> Group {
    Group::new()
        .with_field("typeOfCrime", required())
        .with_field("unsureOfCrimeDates", checkbox())
        .with_field("whenDidCrimeOccur", checkbox())
        .with_field("crimePeriodStart", required())
        .with_field("crimePeriodEnd", Field::blank())
        .with_field("crimeLocation", required())
        .with_field("crimeDetails", required())
        .with_field("crimeInjuries", Field::blank())
        .with_field("wasReportMadeToPolice", checkbox())
        .with_field("policeReportedWhichPolice", required_if("wasReportMadeToPolice"))
        .with_field("policeReportedDate", required_if("wasReportMadeToPolice"))
        .with_field("policeFileNumber", Field::blank())
}

pub fn medical_information() -> Group {
    Group::new()
        .with_field("doYouHaveMedicalServicesCoverage", checkbox())
        .with_field("haveMedicalCoverageProvince", Field::new(DEFAULT_PROVINCE))
        .with_field(
            "personalHealthNumber",
            required_if("doYouHaveMedicalServicesCoverage"),
        )
        .with_field("wereYouTreatedAtHospital", checkbox())
        .with_field("treatedAtHospitalName", required_if("wereYouTreatedAtHospital"))
        .with_field("treatedAtHospitalDate", required_if("wereYouTreatedAtHospital"))
}

pub fn employer_item() -> Group {
    Group::new()
        .with_field("employerName", Field::blank())
        .with_field("employerPhoneNumber", Field::blank())
        .with_field("employerFirstName", Field::blank())
        .with_field("employerLastName", Field::blank())
        .with_group("employerAddress", address_group(false))
}

pub fn expense_information() -> Group {
    Group::new()
        .with_field("haveCounsellingExpenses", checkbox())
        .with_field("haveCounsellingTransportation", checkbox())
        .with_field("havePrescriptionDrugExpenses", checkbox())
        .with_field(
            "minimumBenefitsSelected",
            Field::blank().with_validator(Validator::at_least_one_of(&[
                "haveCounsellingExpenses",
                "haveCounsellingTransportation",
                "havePrescriptionDrugExpenses",
            ])),
        )
        .with_field("haveCrimeSceneCleaningExpenses", checkbox())
        .with_field("noneOfTheAboveExpenses", checkbox())
        .with_field("minimumAdditionalBenefitsSelected", Field::blank())
        .with_field("missedWorkDueToDeathOfVictim", Field::blank())
        .with_field("didYouLoseWages", Field::blank())
        .with_field("daysWorkMissedStart", Field::blank())
        .with_field("daysWorkMissedEnd", Field::blank())
        .with_repeated("employers", RepeatedGroup::new(vec![employer_item()]))
        .with_field("mayContactEmployer", Field::blank())
        .with_field("additionalBenefitsDetails", Field::blank())
        .with_field("haveDisabilityPlanBenefits", checkbox())
        .with_field("haveEmploymentInsuranceBenefits", checkbox())
        .with_field("haveIncomeAssistanceBenefits", checkbox())
        .with_field("haveCanadaPensionPlanBenefits", checkbox())
        .with_field(
            "haveAboriginalAffairsAndNorthernDevelopmentCanadaBenefits",
            checkbox(),
        )
        .with_field("haveCivilActionBenefits", checkbox())
        .with_field("haveOtherBenefits", checkbox())
        .with_field("otherSpecificBenefits", required_if("haveOtherBenefits"))
        .with_field("noneOfTheAboveBenefits", checkbox())
        .with_field("minimumOtherBenefitsSelected", Field::blank())
}

pub fn employment_income_information() -> Group {
    Group::new()
        .with_field("wereYouEmployedAtTimeOfCrime", checkbox())
        .with_field("wereYouAtWorkAtTimeOfIncident", checkbox())
        .with_field("haveYouAppliedForWorkersCompensation", checkbox())
        .with_field(
            "workersCompensationClaimNumber",
            required_if("haveYouAppliedForWorkersCompensation"),
        )
        .with_field("didYouMissWork", checkbox())
        .with_field("daysWorkMissedStart", required_if("didYouMissWork"))
        .with_field("daysWorkMissedEnd", Field::blank())
        .with_field("didYouLoseWages", checkbox())
        .with_field("mayContactEmployer", Field::blank())
}

pub fn representative_information() -> Group {
    let codes: Vec<Value> = REPRESENTATIVE_REQUIRED_CODES
        .iter()
        .map(|code| Value::from(*code))
        .collect();
    let when_representing = || {
        Field::blank().with_validator(Validator::required_if_value_in(
            "completingOnBehalfOf",
            codes.clone(),
        ))
    };
    Group::new()
        .with_field(
            "completingOnBehalfOf",
            Field::new(Value::Null).with_validator(Validator::Required),
        )
        .with_field("representativeFirstName", when_representing())
        .with_field("representativeLastName", when_representing())
        .with_field("representativePreferredMethodOfContact", Field::new(1))
        .with_field("representativePhoneNumber", Field::blank())
        .with_field("representativeEmail", Field::blank())
        .with_group("representativeAddress", address_group(false))
}

pub fn declaration_information() -> Group {
    Group::new()
        .with_field("declaredAndSigned", must_be_checked())
        .with_field("signature", required())
}

pub fn authorization_information() -> Group {
    Group::new()
        .with_field("approvedAuthorityNotification", must_be_checked())
        .with_field("readAndUnderstoodTermsAndConditions", must_be_checked())
        .with_field("signature", required())
        .with_field("allowCvapStaffSharing", checkbox())
        .with_field("authorizedPersonFullName", required_if("allowCvapStaffSharing"))
        .with_field("authorizedPersonPhoneNumber", Field::blank())
        .with_field("authorizedPersonRelationship", Field::blank())
}
