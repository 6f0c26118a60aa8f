use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::records::PersonRecord;

use super::normalize::normalize_field;
use super::TARGET_MATCH;

/// A blocking rule names the fields that must agree exactly (after
/// normalization) for a record pair to be scored at all. Rules keep the
/// candidate set tractable; they never decide matches on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingRule {
    FirstNameSurname,
    SurnameDob,
    Email,
    FirstNameCity,
}

/// The rule set the demo pipeline blocks on.
pub const DEFAULT_BLOCKING_RULES: [BlockingRule; 4] = [
    BlockingRule::FirstNameSurname,
    BlockingRule::SurnameDob,
    BlockingRule::Email,
    BlockingRule::FirstNameCity,
];

impl BlockingRule {
    /// Blocking key for a record, or None when a required field is missing.
    fn key(&self, record: &PersonRecord) -> Option<String> {
        match self {
            BlockingRule::FirstNameSurname => compound_key(&[
                record.first_name.as_deref(),
                record.surname.as_deref(),
            ]),
            BlockingRule::SurnameDob => {
                compound_key(&[record.surname.as_deref(), record.dob.as_deref()])
            }
            BlockingRule::Email => compound_key(&[record.email.as_deref()]),
            BlockingRule::FirstNameCity => compound_key(&[
                record.first_name.as_deref(),
                record.city.as_deref(),
            ]),
        }
    }
}

/// Generate candidate pairs: every two records sharing a blocking key under
/// any of the rules. Pairs are deduplicated across rules and returned with
/// the smaller id on the left.
pub fn candidate_pairs(records: &[PersonRecord], rules: &[BlockingRule]) -> Vec<(i64, i64)> {
    let mut seen: HashSet<(i64, i64)> = HashSet::new();
    let mut pairs = Vec::new();

    for rule in rules {
        let mut blocks: HashMap<String, Vec<i64>> = HashMap::new();
        for record in records {
            if let Some(key) = rule.key(record) {
                blocks.entry(key).or_default().push(record.unique_id);
            }
        }

        let before = pairs.len();
        for members in blocks.values() {
            for i in 0..members.len() {
                for j in (i + 1)..members.len() {
                    let pair = if members[i] < members[j] {
                        (members[i], members[j])
                    } else {
                        (members[j], members[i])
                    };
                    if pair.0 != pair.1 && seen.insert(pair) {
                        pairs.push(pair);
                    }
                }
            }
        }
        debug!(
            target: TARGET_MATCH,
            "Rule {:?} contributed {} new pairs",
            rule,
            pairs.len() - before
        );
    }

    pairs
}

fn compound_key(fields: &[Option<&str>]) -> Option<String> {
    let mut parts = Vec::with_capacity(fields.len());
    for field in fields {
        let normalized = normalize_field((*field)?);
        if normalized.is_empty() {
            return None;
        }
        parts.push(normalized);
    }
    Some(parts.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::PersonRecord;

    fn record(
        unique_id: i64,
        first_name: &str,
        surname: &str,
        dob: &str,
        city: &str,
        email: &str,
    ) -> PersonRecord {
        let opt = |s: &str| {
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        };
        PersonRecord {
            unique_id,
            first_name: opt(first_name),
            surname: opt(surname),
            dob: opt(dob),
            city: opt(city),
            email: opt(email),
            cluster: None,
        }
    }

    #[test]
    fn same_full_name_lands_in_one_block() {
        let records = vec![
            record(1, "Ana", "Silva", "1990-01-01", "lisbon", ""),
            record(2, "ana", "silva", "1985-05-05", "porto", ""),
            record(3, "Ben", "Okafor", "1990-01-01", "lisbon", ""),
        ];

        let pairs = candidate_pairs(&records, &[BlockingRule::FirstNameSurname]);
        assert_eq!(pairs, vec![(1, 2)]);
    }

    #[test]
    fn pairs_are_deduplicated_across_rules() {
        let records = vec![
            record(1, "Ana", "Silva", "1990-01-01", "lisbon", "ana@x.com"),
            record(2, "Ana", "Silva", "1990-01-01", "lisbon", "ana@x.com"),
        ];

        // The pair qualifies under all four rules but is reported once
        let pairs = candidate_pairs(&records, &DEFAULT_BLOCKING_RULES);
        assert_eq!(pairs, vec![(1, 2)]);
    }

    #[test]
    fn missing_fields_block_nothing() {
        let records = vec![
            record(1, "", "Silva", "", "", ""),
            record(2, "", "Silva", "", "", ""),
        ];

        // Surname alone is not a blocking key in any rule
        let pairs = candidate_pairs(&records, &DEFAULT_BLOCKING_RULES);
        assert!(pairs.is_empty());
    }

    #[test]
    fn smaller_id_is_always_on_the_left() {
        let records = vec![
            record(9, "Ana", "Silva", "", "", ""),
            record(3, "Ana", "Silva", "", "", ""),
        ];

        let pairs = candidate_pairs(&records, &[BlockingRule::FirstNameSurname]);
        assert_eq!(pairs, vec![(3, 9)]);
    }
}
