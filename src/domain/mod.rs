//! Domain types shared across the catalog core
//!
//! These carry no persistence concerns; the entity definitions live in
//! `infra::db::entities`.

pub mod algorithm;
pub mod tags;

pub use algorithm::AlgorithmId;
pub use tags::{EffectiveTag, EffectiveTagDelta, ResolveParams, TagSign};
