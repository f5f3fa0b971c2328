//! StrainEst result decoder
//!
//! StrainEst emits a tab-delimited abundance table: a header row, one row per
//! reference strain, and a trailing artifact row. Strain names follow the
//! RefSeq convention `GCF_<accession>_<strain name>_genomic.fna`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::results::mapping::load_name_map;
use crate::results::{Abundances, ResultDecoder};

/// Fixed-length suffix on strain file names (`_genomic.fna`)
const NAME_SUFFIX_LEN: usize = 12;

/// Decoder for StrainEst abundance tables
pub struct StrainEstDecoder {
    algorithm_dir: PathBuf,
}

impl StrainEstDecoder {
    pub fn new(algorithm_dir: impl Into<PathBuf>) -> Self {
        Self {
            algorithm_dir: algorithm_dir.into(),
        }
    }
}

#[async_trait]
impl ResultDecoder for StrainEstDecoder {
    async fn decode(&self, raw: &str, species: &str) -> Abundances {
        let name_map = load_name_map(&self.algorithm_dir, "StrainEst", species).await;
        parse_abundances(raw, &name_map)
    }
}

/// Parse a StrainEst abundance table
///
/// Drops the header and trailing rows, discards strains with exactly zero
/// abundance, and maps strain file names to display names: the lookup key is
/// the first two underscore-delimited tokens, the default display name is the
/// remainder with the fixed suffix stripped, and the name-mapping table
/// overrides the default when it knows the key.
pub fn parse_abundances(raw: &str, name_map: &HashMap<String, String>) -> Abundances {
    let mut lines: Vec<&str> = raw.split('\n').collect();
    if lines.len() <= 2 {
        return Abundances::new();
    }
    lines.remove(0);
    lines.pop();

    let mut abundances = Abundances::new();
    for line in lines {
        let Some((name, value)) = line.split_once('\t') else {
            continue;
        };
        let Ok(abundance) = value.trim().parse::<f64>() else {
            continue;
        };
        if abundance == 0.0 {
            continue;
        }

        let mut tokens = name.split('_');
        let (Some(first), Some(second)) = (tokens.next(), tokens.next()) else {
            continue;
        };
        let lookup_key = format!("{}_{}", first, second);

        let display = match name_map.get(&lookup_key) {
            Some(mapped) => mapped.clone(),
            None => {
                let start = lookup_key.len() + 1;
                let end = name.len().saturating_sub(NAME_SUFFIX_LEN);
                if end <= start {
                    continue;
                }
                // Byte offsets can land inside a multi-byte char when the blob
                // is not clean ASCII (lossy decoding injects replacements).
                let Some(display) = name.get(start..end) else {
                    continue;
                };
                display.to_string()
            }
        };

        // Collisions take the last-processed row's value.
        abundances.insert(display, abundance);
    }

    abundances
}
