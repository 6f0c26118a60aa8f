use std::env;

use crate::clustering::DEFAULT_THRESHOLDS;

/// Database file path from `DATABASE_PATH`, defaulting to a file in the
/// working directory.
pub fn database_path() -> String {
    env::var("DATABASE_PATH").unwrap_or_else(|_| "linkage.db".to_string())
}

/// Retrieves an environment variable and splits it into a vector of strings based on a delimiter.
///
/// # Arguments
/// - `var`: The name of the environment variable.
/// - `delimiter`: The character to split the environment variable's value by.
///
/// # Returns
/// - `Vec<String>`
pub fn get_env_var_as_vec(var: &str, delimiter: char) -> Vec<String> {
    env::var(var)
        .unwrap_or_default()
        .split(delimiter)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Clustering thresholds from `LINKAGE_THRESHOLDS` (semicolon separated),
/// falling back to the built-in defaults. Values that do not parse as
/// floats are skipped.
pub fn cluster_thresholds() -> Vec<f64> {
    let configured: Vec<f64> = get_env_var_as_vec("LINKAGE_THRESHOLDS", ';')
        .iter()
        .filter_map(|value| value.parse().ok())
        .collect();

    if configured.is_empty() {
        DEFAULT_THRESHOLDS.to_vec()
    } else {
        configured
    }
}
