//! Filter query engine
//!
//! Turns a `FilterCriteria` into one composed database query over a tenant's
//! images: validate, compile each dimension to a predicate fragment,
//! intersect, then count and page from the same composed state. Effective
//! tags for the page and optional facet counts ride along.

pub mod facets;
pub mod input;
pub mod output;
pub mod predicate;
pub mod query;

pub use input::{
    FilterCriteria, GroundTruthFilter, KeywordOperator, OrderBy, OrderDirection, RatingFilter,
    RatingOp, MAX_PAGE_SIZE,
};
pub use output::{ImageItem, ImageListing};
pub use predicate::Predicate;
pub use query::ComposedQuery;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::instrument;

use crate::error::{Error, Result};
use crate::infra::db::entities::photo_list;
use crate::ops::tags::resolver;

/// Fail with `NotFound` when a referenced list is absent in tenant scope.
/// A bad list reference is an error, never an empty page.
pub(crate) async fn ensure_list(
    db: &DatabaseConnection,
    tenant: &str,
    list_id: i32,
) -> Result<()> {
    photo_list::Entity::find_by_id(list_id)
        .filter(photo_list::Column::TenantId.eq(tenant))
        .one(db)
        .await?
        .map(|_| ())
        .ok_or_else(|| Error::not_found("list", list_id))
}

/// Run a filter query for one tenant: count, page, per-image effective tags,
/// and facets when requested. Resolve parameters are loaded fresh from
/// tenant settings, so a threshold or algorithm change applies to the next
/// call with no cache to invalidate.
#[instrument(skip_all, fields(tenant = %tenant))]
pub async fn list_images(
    db: &DatabaseConnection,
    tenant: &str,
    criteria: &FilterCriteria,
) -> Result<ImageListing> {
    if let Some(list_id) = criteria.list_id {
        ensure_list(db, tenant, list_id).await?;
    }

    let params = resolver::load_resolve_params(db, tenant, None).await?;
    let composed = ComposedQuery::build(tenant, criteria, &params)?;

    let (total, models) = futures::try_join!(
        composed.count(db),
        composed.page(db, criteria.offset, criteria.limit)
    )?;

    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let mut tags = resolver::resolve_effective_tags(db, tenant, &ids, &params).await?;

    let items = models
        .into_iter()
        .map(|model| {
            let resolved = tags.remove(&model.id).unwrap_or_default();
            ImageItem::from_model(model, resolved)
        })
        .collect();

    let facets = if criteria.with_facets {
        Some(facets::aggregate(db, tenant, criteria, &params).await?)
    } else {
        None
    };

    Ok(ImageListing {
        total,
        items,
        facets,
    })
}
