//! Algorithm identity
//!
//! Every prediction row carries the identity of the algorithm that produced
//! it. Identities are a closed enum with a canonical string form used in the
//! database; query code never branches on ad hoc strings.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Identity of a tagging algorithm.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlgorithmId {
    /// Zero-shot SigLIP tagging
    Siglip,
    /// Zero-shot CLIP tagging
    Clip,
    /// Per-tenant trained classifier heads
    Trained,
    /// Face recognition pipeline
    FaceRecognition,
    /// Embedding-similarity propagation (audit-only source)
    Similarity,
}

impl AlgorithmId {
    /// Canonical database string for this algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmId::Siglip => "siglip",
            AlgorithmId::Clip => "clip",
            AlgorithmId::Trained => "trained",
            AlgorithmId::FaceRecognition => "face_recognition",
            AlgorithmId::Similarity => "similarity",
        }
    }

    /// Look up an algorithm by its stored string form.
    pub fn lookup(value: &str) -> Option<Self> {
        value.parse().ok()
    }
}

impl Default for AlgorithmId {
    fn default() -> Self {
        AlgorithmId::Siglip
    }
}
