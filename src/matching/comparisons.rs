use chrono::NaiveDate;
use strsim::{jaro, jaro_winkler};

use super::normalize::normalize_field;

// Similarity cutoffs per field. Two levels each for the name fields, the
// winkler variant favoring shared prefixes on first names.
const FIRST_NAME_STRONG: f64 = 0.9;
const FIRST_NAME_WEAK: f64 = 0.8;
const SURNAME_STRONG: f64 = 0.9;
const SURNAME_WEAK: f64 = 0.7;

// Date-of-birth proximity bands in days
const DOB_SAME_MONTH: i64 = 31;
const DOB_SAME_YEAR: i64 = 366;

/// Agreement level for one field of a record pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAgreement {
    Exact,
    Strong,
    Weak,
    Disagree,
    /// The field is absent on at least one side and carries no signal.
    Missing,
}

impl FieldAgreement {
    /// Scale factor applied to the field's weight when combining scores.
    pub fn factor(self) -> f64 {
        match self {
            FieldAgreement::Exact => 1.0,
            FieldAgreement::Strong => 0.85,
            FieldAgreement::Weak => 0.55,
            FieldAgreement::Disagree => 0.0,
            FieldAgreement::Missing => 0.0,
        }
    }
}

/// Compare first names with Jaro-Winkler at two cutoffs.
pub fn compare_first_name(left: Option<&str>, right: Option<&str>) -> FieldAgreement {
    let (left, right) = match normalized_pair(left, right) {
        Some(pair) => pair,
        None => return FieldAgreement::Missing,
    };

    if left == right {
        return FieldAgreement::Exact;
    }
    match jaro_winkler(&left, &right) {
        similarity if similarity >= FIRST_NAME_STRONG => FieldAgreement::Strong,
        similarity if similarity >= FIRST_NAME_WEAK => FieldAgreement::Weak,
        _ => FieldAgreement::Disagree,
    }
}

/// Compare surnames with plain Jaro at two cutoffs.
pub fn compare_surname(left: Option<&str>, right: Option<&str>) -> FieldAgreement {
    let (left, right) = match normalized_pair(left, right) {
        Some(pair) => pair,
        None => return FieldAgreement::Missing,
    };

    if left == right {
        return FieldAgreement::Exact;
    }
    match jaro(&left, &right) {
        similarity if similarity >= SURNAME_STRONG => FieldAgreement::Strong,
        similarity if similarity >= SURNAME_WEAK => FieldAgreement::Weak,
        _ => FieldAgreement::Disagree,
    }
}

/// Compare dates of birth by proximity: exact, within a month, within a
/// year. Unparseable dates carry no signal.
pub fn compare_dob(left: Option<&str>, right: Option<&str>) -> FieldAgreement {
    let left = match parse_dob(left) {
        Some(date) => date,
        None => return FieldAgreement::Missing,
    };
    let right = match parse_dob(right) {
        Some(date) => date,
        None => return FieldAgreement::Missing,
    };

    let days_apart = (left - right).num_days().abs();
    if days_apart == 0 {
        FieldAgreement::Exact
    } else if days_apart <= DOB_SAME_MONTH {
        FieldAgreement::Strong
    } else if days_apart <= DOB_SAME_YEAR {
        FieldAgreement::Weak
    } else {
        FieldAgreement::Disagree
    }
}

/// Compare cities for exact agreement after normalization.
pub fn compare_city(left: Option<&str>, right: Option<&str>) -> FieldAgreement {
    let (left, right) = match normalized_pair(left, right) {
        Some(pair) => pair,
        None => return FieldAgreement::Missing,
    };

    if left == right {
        FieldAgreement::Exact
    } else {
        FieldAgreement::Disagree
    }
}

/// Compare email addresses: exact agreement, or matching local parts when
/// only the domain differs.
pub fn compare_email(left: Option<&str>, right: Option<&str>) -> FieldAgreement {
    let (left, right) = match normalized_pair(left, right) {
        Some(pair) => pair,
        None => return FieldAgreement::Missing,
    };

    if left == right {
        return FieldAgreement::Exact;
    }

    let left_local = left.split('@').next().unwrap_or("");
    let right_local = right.split('@').next().unwrap_or("");
    if !left_local.is_empty() && left_local == right_local {
        FieldAgreement::Strong
    } else {
        FieldAgreement::Disagree
    }
}

fn normalized_pair(left: Option<&str>, right: Option<&str>) -> Option<(String, String)> {
    let left = normalize_field(left?);
    let right = normalize_field(right?);
    if left.is_empty() || right.is_empty() {
        return None;
    }
    Some((left, right))
}

fn parse_dob(value: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value?.trim(), "%Y-%m-%d").ok()
}
