use std::collections::HashSet;

use serde::Serialize;

use super::types::PersonRecord;

/// Column-level profile of a record set.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetProfile {
    pub total_records: usize,
    pub distinct_ids: usize,
    pub missing_first_name: usize,
    pub missing_surname: usize,
    pub missing_dob: usize,
    pub missing_city: usize,
    pub missing_email: usize,
    /// Distinct ground-truth entities, when the dataset carries them.
    pub ground_truth_entities: Option<usize>,
}

/// Profile a record set: totals, missing values per column, ground truth.
pub fn profile(records: &[PersonRecord]) -> DatasetProfile {
    let distinct_ids = records
        .iter()
        .map(|record| record.unique_id)
        .collect::<HashSet<_>>()
        .len();

    let entities: HashSet<i64> = records.iter().filter_map(|record| record.cluster).collect();

    DatasetProfile {
        total_records: records.len(),
        distinct_ids,
        missing_first_name: missing(records, |record| record.first_name.as_deref()),
        missing_surname: missing(records, |record| record.surname.as_deref()),
        missing_dob: missing(records, |record| record.dob.as_deref()),
        missing_city: missing(records, |record| record.city.as_deref()),
        missing_email: missing(records, |record| record.email.as_deref()),
        ground_truth_entities: if entities.is_empty() {
            None
        } else {
            Some(entities.len())
        },
    }
}

fn missing(records: &[PersonRecord], field: impl Fn(&PersonRecord) -> Option<&str>) -> usize {
    records.iter().filter(|record| field(record).is_none()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_counts_missing_fields_and_entities() {
        let records = vec![
            PersonRecord {
                unique_id: 1,
                first_name: Some("Ana".into()),
                surname: Some("Silva".into()),
                dob: None,
                city: Some("lisbon".into()),
                email: None,
                cluster: Some(0),
            },
            PersonRecord {
                unique_id: 2,
                first_name: None,
                surname: Some("Silva".into()),
                dob: Some("1990-01-01".into()),
                city: None,
                email: None,
                cluster: Some(0),
            },
        ];

        let profile = profile(&records);
        assert_eq!(profile.total_records, 2);
        assert_eq!(profile.distinct_ids, 2);
        assert_eq!(profile.missing_first_name, 1);
        assert_eq!(profile.missing_dob, 1);
        assert_eq!(profile.missing_email, 2);
        assert_eq!(profile.ground_truth_entities, Some(1));
    }

    #[test]
    fn no_ground_truth_column_yields_none() {
        let records = vec![PersonRecord {
            unique_id: 1,
            first_name: None,
            surname: None,
            dob: None,
            city: None,
            email: None,
            cluster: None,
        }];
        assert_eq!(profile(&records).ground_truth_entities, None);
    }
}
