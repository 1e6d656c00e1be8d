//! Ground-truth decision entity
//!
//! The sole authoritative human-verified layer. At most one active decision
//! per (tenant, image, keyword); writes replace the prior decision
//! (last-write-wins upsert). Never written by the tagging pipeline.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::TagSign;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ground_truth_decisions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub tenant_id: String,
    pub image_id: i32,
    pub keyword: String,
    pub category: String,
    /// +1 approve, -1 reject
    pub sign: i16,
    pub author: String,
    pub decided_at: DateTimeUtc,
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
    /// Typed view of the stored sign column.
    pub fn tag_sign(&self) -> Option<TagSign> {
        TagSign::from_signum(self.sign)
    }
}
