//! Image entity
//!
//! Rows are created by ingestion (an external collaborator); this core only
//! mutates `rating` and `reviewed`. `rating` is nullable on purpose: NULL
//! means never rated and is distinct from a zero rating.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub uuid: Uuid,
    pub tenant_id: String,
    pub file_name: String,
    pub rating: Option<i16>,
    pub reviewed: bool,
    pub captured_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::photo_list_entry::Entity")]
    PhotoListEntries,
    #[sea_orm(has_many = "super::ground_truth_decision::Entity")]
    GroundTruthDecisions,
    #[sea_orm(has_many = "super::predicted_tag::Entity")]
    PredictedTags,
}

impl Related<super::photo_list_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PhotoListEntries.def()
    }
}

impl Related<super::ground_truth_decision::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroundTruthDecisions.def()
    }
}

impl Related<super::predicted_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PredictedTags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
