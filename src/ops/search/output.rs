//! Listing output types

use std::collections::HashMap;

use sea_orm::prelude::DateTimeUtc;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::EffectiveTag;
use crate::infra::db::entities::image;

/// One image row in a listing, with its resolved effective tags.
#[derive(Clone, Debug, Serialize)]
pub struct ImageItem {
    pub id: i32,
    pub uuid: Uuid,
    pub file_name: String,
    pub rating: Option<i16>,
    pub reviewed: bool,
    pub captured_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub tags: Vec<EffectiveTag>,
}

impl ImageItem {
    pub(crate) fn from_model(model: image::Model, tags: Vec<EffectiveTag>) -> Self {
        Self {
            id: model.id,
            uuid: model.uuid,
            file_name: model.file_name,
            rating: model.rating,
            reviewed: model.reviewed,
            captured_at: model.captured_at,
            created_at: model.created_at,
            tags,
        }
    }
}

/// One page of a filter query: total matches, the page itself, and optional
/// per-keyword facet counts over the same composed state.
#[derive(Clone, Debug, Serialize)]
pub struct ImageListing {
    pub total: u64,
    pub items: Vec<ImageItem>,
    pub facets: Option<HashMap<String, u64>>,
}
