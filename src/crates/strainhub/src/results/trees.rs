//! Phylogenetic tree lookup
//!
//! Trees are plain-text Newick files shipped per species and returned
//! verbatim for frontend display; this system never parses them. Absence is
//! an expected case and yields an empty string.

use std::path::PathBuf;

/// Read-only lookup of stored phylogenetic trees
#[derive(Clone)]
pub struct TreeLookup {
    algorithm_dir: PathBuf,
}

impl TreeLookup {
    pub fn new(algorithm_dir: impl Into<PathBuf>) -> Self {
        Self {
            algorithm_dir: algorithm_dir.into(),
        }
    }

    /// Tree for a species, or an empty string when none is stored
    pub async fn tree_for(&self, species: &str) -> String {
        let path = self
            .algorithm_dir
            .join("phylotrees")
            .join(format!("{}.nwk", species));

        match tokio::fs::read_to_string(&path).await {
            Ok(tree) => tree,
            Err(_) => {
                tracing::debug!("No phylogenetic tree for species {}", species);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_tree_is_empty_string() {
        let dir = tempfile::tempdir().unwrap();
        let lookup = TreeLookup::new(dir.path());
        assert_eq!(lookup.tree_for("ecoli").await, "");
    }

    #[tokio::test]
    async fn test_tree_returned_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let trees = dir.path().join("phylotrees");
        std::fs::create_dir_all(&trees).unwrap();
        std::fs::write(trees.join("ecoli.nwk"), "(A:0.1,B:0.2);").unwrap();

        let lookup = TreeLookup::new(dir.path());
        assert_eq!(lookup.tree_for("ecoli").await, "(A:0.1,B:0.2);");
    }
}
