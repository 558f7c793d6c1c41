//! Static reference lists consumed read-only by validators and rendering.

use once_cell::sync::Lazy;
use regex::Regex;

pub const CANADA: &str = "Canada";
pub const USA: &str = "United States of America";

/// Countries whose postal codes are pattern-checked.
pub const POSTAL_CHECKED_COUNTRIES: [&str; 2] = [CANADA, USA];

/// Canadian postal code or US ZIP / ZIP+4.
pub const POSTAL_CODE: &str = r"^(?:[A-Za-z]\d[A-Za-z][ -]?\d[A-Za-z]\d|\d{5}(?:-\d{4})?)$";

pub static POSTAL_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(POSTAL_CODE).expect("POSTAL_CODE is a valid pattern"));

pub const COUNTRIES: &[&str] = &[
    CANADA,
    USA,
    "Australia",
    "France",
    "Germany",
    "India",
    "Ireland",
    "Mexico",
    "New Zealand",
    "Philippines",
    "United Kingdom",
];

pub const CANADIAN_PROVINCES: &[&str] = &[
    "Alberta",
    "British Columbia",
    "Manitoba",
    "New Brunswick",
    "Newfoundland and Labrador",
    "Northwest Territories",
    "Nova Scotia",
    "Nunavut",
    "Ontario",
    "Prince Edward Island",
    "Quebec",
    "Saskatchewan",
    "Yukon",
];

pub const US_STATES: &[&str] = &[
    "Alaska",
    "California",
    "Idaho",
    "Montana",
    "New York",
    "Oregon",
    "Texas",
    "Washington",
];

pub const HOSPITALS: &[&str] = &[
    "Abbotsford Regional Hospital",
    "Burnaby Hospital",
    "Kelowna General Hospital",
    "Lions Gate Hospital",
    "Nanaimo Regional General Hospital",
    "Royal Columbian Hospital",
    "Royal Inland Hospital",
    "St. Paul's Hospital",
    "Surrey Memorial Hospital",
    "Vancouver General Hospital",
    "Victoria General Hospital",
];

pub const DEFAULT_PROVINCE: &str = "British Columbia";
pub const DEFAULT_COUNTRY: &str = CANADA;

pub fn contains(list: &[&str], value: &str) -> bool {
    list.iter().any(|entry| *entry == value)
}

/// Province or state choices for a country, empty when free text is expected.
pub fn provinces_for(country: &str) -> &'static [&'static str] {
    match country {
        CANADA => CANADIAN_PROVINCES,
        USA => US_STATES,
        _ => &[],
    }
}
