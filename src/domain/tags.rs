//! Tag domain types
//!
//! A ground-truth decision is a human approve/reject for one (image, keyword)
//! pair and always overrides predictions. The effective tag set is derived at
//! read time and never persisted.

use serde::{Deserialize, Serialize};

use crate::domain::AlgorithmId;

/// Confidence recorded for a keyword included by an approve decision.
pub const APPROVED_CONFIDENCE: f32 = 1.0;

/// Tenant-wide default prediction confidence threshold.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.15;

/// Sign of a ground-truth decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagSign {
    Approve,
    Reject,
}

impl TagSign {
    /// Stored integer form: +1 approve, -1 reject.
    pub fn signum(self) -> i16 {
        match self {
            TagSign::Approve => 1,
            TagSign::Reject => -1,
        }
    }

    pub fn from_signum(value: i16) -> Option<Self> {
        match value {
            1 => Some(TagSign::Approve),
            -1 => Some(TagSign::Reject),
            _ => None,
        }
    }
}

/// One resolved tag on an image: ground truth merged with predictions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectiveTag {
    pub keyword: String,
    pub category: String,
    pub confidence: f32,
}

impl EffectiveTag {
    pub fn new(keyword: impl Into<String>, category: impl Into<String>, confidence: f32) -> Self {
        Self {
            keyword: keyword.into(),
            category: category.into(),
            confidence,
        }
    }
}

/// Reported by ground-truth writes: did the effective set change, and is the
/// keyword present afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveTagDelta {
    pub changed: bool,
    pub now_present: bool,
}

/// Resolution parameters, loaded fresh per request from tenant settings.
/// Never cached as process-global state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolveParams {
    pub algorithm: AlgorithmId,
    pub threshold: f32,
}

impl ResolveParams {
    pub fn new(algorithm: AlgorithmId, threshold: f32) -> Self {
        Self {
            algorithm,
            threshold,
        }
    }
}
