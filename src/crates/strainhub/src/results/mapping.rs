//! Name-mapping table loading
//!
//! Per-(algorithm, species) tables remap decoder lookup keys to curated
//! display names. A missing table is an expected "not present" case and
//! yields an empty mapping, never an error.

use std::collections::HashMap;
use std::path::Path;

/// Parse a two-column tab-delimited mapping table
///
/// Rows without exactly two columns are ignored; a trailing carriage return
/// on the value column is stripped.
pub fn parse_name_map(content: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in content.split('\n') {
        let mut columns = line.split('\t');
        let (Some(key), Some(value), None) = (columns.next(), columns.next(), columns.next())
        else {
            continue;
        };
        if key.is_empty() {
            continue;
        }
        map.insert(key.to_string(), value.trim_end_matches('\r').to_string());
    }
    map
}

/// Load the name-mapping table for an algorithm/species pair
///
/// Table location: `{algorithm_dir}/{algorithm}/mapping/{algorithm}_{species}.tsv`.
pub async fn load_name_map(
    algorithm_dir: &Path,
    algorithm: &str,
    species: &str,
) -> HashMap<String, String> {
    let path = algorithm_dir
        .join(algorithm)
        .join("mapping")
        .join(format!("{}_{}.tsv", algorithm, species));

    match tokio::fs::read_to_string(&path).await {
        Ok(content) => parse_name_map(&content),
        Err(_) => {
            tracing::debug!("No mapping table at {}", path.display());
            HashMap::new()
        }
    }
}
