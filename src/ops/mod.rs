//! Catalog operations
//!
//! `search` compiles filter criteria into composed queries; `tags` resolves
//! effective tag sets and owns the write paths for decisions and predictions.

pub mod search;
pub mod tags;
