//! Per-(tenant, algorithm) confidence threshold override
//!
//! Falls back to `tenant_settings.tag_confidence_threshold` when no row
//! exists for the algorithm.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "algorithm_thresholds")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tenant_id: String,

    #[sea_orm(primary_key, auto_increment = false)]
    pub algorithm: String,

    pub threshold: f32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
