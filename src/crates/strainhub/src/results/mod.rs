//! Algorithm result decoding
//!
//! Raw result blobs are turned into name → abundance mappings by an
//! algorithm-specific decoder, selected from a registry populated at startup.
//! An unknown algorithm decodes to an empty mapping: the request still
//! succeeds, the gap is logged. "Can't parse" is deliberately not an error.

pub mod mapping;
pub mod strainest;
pub mod trees;

pub use strainest::StrainEstDecoder;
pub use trees::TreeLookup;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Abundances keyed by display name
pub type Abundances = HashMap<String, f64>;

/// Algorithm-specific result decoder
#[async_trait]
pub trait ResultDecoder: Send + Sync {
    /// Decode a raw result blob for the given reference species
    async fn decode(&self, raw: &str, species: &str) -> Abundances;
}

/// Registry mapping algorithm identifiers to their decoders
#[derive(Clone, Default)]
pub struct DecoderRegistry {
    decoders: HashMap<String, Arc<dyn ResultDecoder>>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoder under an algorithm identifier
    pub fn register(mut self, algorithm: impl Into<String>, decoder: Arc<dyn ResultDecoder>) -> Self {
        self.decoders.insert(algorithm.into(), decoder);
        self
    }

    /// Decode a result for an algorithm; unknown algorithms yield an empty
    /// mapping rather than failing the request
    pub async fn decode(&self, algorithm: &str, raw: &str, species: &str) -> Abundances {
        match self.decoders.get(algorithm) {
            Some(decoder) => decoder.decode(raw, species).await,
            None => {
                tracing::warn!("No result decoder registered for algorithm {}", algorithm);
                Abundances::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDecoder;

    #[async_trait]
    impl ResultDecoder for FixedDecoder {
        async fn decode(&self, _raw: &str, _species: &str) -> Abundances {
            let mut out = Abundances::new();
            out.insert("strain".to_string(), 0.5);
            out
        }
    }

    #[tokio::test]
    async fn test_unknown_algorithm_decodes_empty() {
        let registry = DecoderRegistry::new();
        let out = registry.decode("NoSuchAlgo", "raw data", "ecoli").await;
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_registered_decoder_is_dispatched() {
        let registry = DecoderRegistry::new().register("Fixed", Arc::new(FixedDecoder));
        let out = registry.decode("Fixed", "raw data", "ecoli").await;
        assert_eq!(out.get("strain"), Some(&0.5));
    }
}
