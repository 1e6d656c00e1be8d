//! Predicted tag entity
//!
//! One typed relation for all algorithms, discriminated by the `algorithm`
//! column (string form of `AlgorithmId`). Unique per
//! (tenant, image, keyword, algorithm, model_name); refreshed by an
//! idempotent upsert that preserves `created_at`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::AlgorithmId;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "predicted_tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: String,
    pub image_id: i32,
    pub keyword: String,
    pub category: String,
    pub confidence: f32,
    pub algorithm: String,
    pub model_name: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::image::Entity",
        from = "Column::ImageId",
        to = "super::image::Column::Id",
        on_delete = "Cascade"
    )]
    Image,
}

impl Related<super::image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Image.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Typed view of the stored algorithm discriminator.
    pub fn algorithm_id(&self) -> Option<AlgorithmId> {
        AlgorithmId::lookup(&self.algorithm)
    }
}
