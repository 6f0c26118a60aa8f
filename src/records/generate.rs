use rand::prelude::*;
use rand::rngs::StdRng;

use super::types::PersonRecord;

/// Seed used by the demo commands when none is given.
pub const DEFAULT_DEMO_SEED: u64 = 42;

const FIRST_NAMES: &[&str] = &[
    "oliver", "amelia", "jack", "isla", "harry", "ava", "george", "grace", "noah", "freya",
    "leo", "sofia", "arthur", "ivy", "oscar", "willow", "henry", "elsie", "theo", "daisy",
];

const SURNAMES: &[&str] = &[
    "smith", "jones", "taylor", "brown", "williams", "wilson", "johnson", "davies", "patel",
    "wright", "thompson", "evans", "walker", "white", "roberts", "green", "hall", "wood",
    "martin", "hughes",
];

const CITIES: &[&str] = &[
    "london", "birmingham", "leeds", "glasgow", "sheffield", "bradford", "liverpool",
    "edinburgh", "manchester", "bristol",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "mail.net", "post.org"];

struct Identity {
    first_name: String,
    surname: String,
    dob: String,
    city: String,
    email: Option<String>,
}

/// Generate a synthetic person dataset with duplicated identities.
///
/// Produces `size` records: base identities plus up to three corrupted
/// variants each (typos, nearby birth dates, missing fields, changed email
/// domains). The `cluster` column carries the ground-truth identity id, so
/// resolution output can be checked against it. Same seed, same dataset.
pub fn generate_demo_records(size: usize, seed: u64) -> Vec<PersonRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(size);
    let mut next_id = 0i64;
    let mut entity = 0i64;

    while records.len() < size {
        let identity = sample_identity(&mut rng);

        records.push(base_record(&mut next_id, entity, &identity));
        let variants = rng.random_range(0..=3);
        for _ in 0..variants {
            if records.len() >= size {
                break;
            }
            records.push(variant_record(&mut next_id, entity, &identity, &mut rng));
        }

        entity += 1;
    }

    records.truncate(size);
    records
}

fn sample_identity(rng: &mut StdRng) -> Identity {
    let first_name = FIRST_NAMES.choose(rng).unwrap().to_string();
    let surname = SURNAMES.choose(rng).unwrap().to_string();
    let year: u32 = rng.random_range(1950..=2005);
    let month = rng.random_range(1..=12);
    let day = rng.random_range(1..=28);
    // Year suffix keeps distinct people with the same name apart
    let email = if rng.random_bool(0.8) {
        Some(format!(
            "{}.{}{}@{}",
            first_name,
            surname,
            year % 100,
            EMAIL_DOMAINS[0]
        ))
    } else {
        None
    };

    Identity {
        first_name,
        surname,
        dob: format!("{:04}-{:02}-{:02}", year, month, day),
        city: CITIES.choose(rng).unwrap().to_string(),
        email,
    }
}

fn base_record(next_id: &mut i64, entity: i64, identity: &Identity) -> PersonRecord {
    let unique_id = *next_id;
    *next_id += 1;
    PersonRecord {
        unique_id,
        first_name: Some(identity.first_name.clone()),
        surname: Some(identity.surname.clone()),
        dob: Some(identity.dob.clone()),
        city: Some(identity.city.clone()),
        email: identity.email.clone(),
        cluster: Some(entity),
    }
}

/// A corrupted copy of the identity, the way duplicate rows show up in real
/// source systems.
fn variant_record(
    next_id: &mut i64,
    entity: i64,
    identity: &Identity,
    rng: &mut StdRng,
) -> PersonRecord {
    let mut record = base_record(next_id, entity, identity);

    if rng.random_bool(0.3) {
        record.first_name = record.first_name.map(|name| typo(&name, rng));
    }
    if rng.random_bool(0.2) {
        record.surname = record.surname.map(|name| typo(&name, rng));
    }
    if rng.random_bool(0.15) {
        record.dob = record.dob.map(|dob| shift_day(&dob, rng));
    }
    if rng.random_bool(0.1) {
        record.city = None;
    }
    if let Some(email) = record.email.take() {
        record.email = match rng.random_range(0..10) {
            // Same inbox, different provider
            0..=1 => email
                .split('@')
                .next()
                .map(|local| format!("{}@{}", local, EMAIL_DOMAINS.choose(rng).unwrap())),
            2 => None,
            _ => Some(email),
        };
    }

    record
}

/// Swap two adjacent characters somewhere in the value.
fn typo(value: &str, rng: &mut StdRng) -> String {
    let mut chars: Vec<char> = value.chars().collect();
    if chars.len() < 3 {
        return value.to_string();
    }
    let at = rng.random_range(0..chars.len() - 1);
    chars.swap(at, at + 1);
    chars.into_iter().collect()
}

/// Nudge the day-of-month by one, keeping the string well-formed.
fn shift_day(dob: &str, rng: &mut StdRng) -> String {
    let (prefix, day) = dob.split_at(8);
    let day: u32 = day.parse().unwrap_or(15);
    let shifted = if day == 1 || (day < 28 && rng.random_bool(0.5)) {
        day + 1
    } else {
        day - 1
    };
    format!("{}{:02}", prefix, shifted)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn same_seed_same_dataset() {
        let first = generate_demo_records(200, 7);
        let second = generate_demo_records(200, 7);
        assert_eq!(first, second);
    }

    #[test]
    fn requested_size_and_unique_ids() {
        let records = generate_demo_records(150, 3);
        assert_eq!(records.len(), 150);

        let ids: HashSet<i64> = records.iter().map(|record| record.unique_id).collect();
        assert_eq!(ids.len(), records.len());
    }

    #[test]
    fn ground_truth_clusters_contain_duplicates() {
        let records = generate_demo_records(300, DEFAULT_DEMO_SEED);
        let entities: HashSet<i64> = records.iter().filter_map(|record| record.cluster).collect();

        // Every record carries ground truth, and duplicates exist
        assert!(records.iter().all(|record| record.cluster.is_some()));
        assert!(entities.len() < records.len());
    }

    #[test]
    fn dob_fields_stay_well_formed() {
        let records = generate_demo_records(300, 11);
        for record in records {
            let dob = record.dob.expect("generator always sets dob");
            assert_eq!(dob.len(), 10, "unexpected dob shape: {}", dob);
            assert!(chrono::NaiveDate::parse_from_str(&dob, "%Y-%m-%d").is_ok());
        }
    }
}
