use serde::{Deserialize, Serialize};

/// One person record in the demo dataset shape: a unique id plus a handful
/// of identity fields that may be missing or misspelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub unique_id: i64,
    pub first_name: Option<String>,
    pub surname: Option<String>,
    pub dob: Option<String>,
    pub city: Option<String>,
    pub email: Option<String>,
    /// Ground-truth entity id carried by the synthetic dataset; absent on
    /// real inputs.
    pub cluster: Option<i64>,
}

impl PersonRecord {
    /// Trim surrounding whitespace and drop fields that are left empty,
    /// the same cleanup the seeding path applies.
    pub fn tidy(mut self) -> Self {
        self.first_name = tidy_field(self.first_name);
        self.surname = tidy_field(self.surname);
        self.dob = tidy_field(self.dob);
        self.city = tidy_field(self.city);
        self.email = tidy_field(self.email);
        self
    }
}

fn tidy_field(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::PersonRecord;

    #[test]
    fn tidy_trims_and_drops_empty_fields() {
        let record = PersonRecord {
            unique_id: 1,
            first_name: Some(" Ana ".into()),
            surname: Some("   ".into()),
            dob: None,
            city: Some("lisbon".into()),
            email: Some("".into()),
            cluster: Some(7),
        }
        .tidy();

        assert_eq!(record.first_name.as_deref(), Some("Ana"));
        assert_eq!(record.surname, None);
        assert_eq!(record.city.as_deref(), Some("lisbon"));
        assert_eq!(record.email, None);
        assert_eq!(record.cluster, Some(7));
    }
}
