//! Phototag core
//!
//! Tag resolution and filter-query engine for per-tenant photo collections.
//! Ground-truth decisions merge with algorithm predictions into effective
//! tags at read time; filter criteria compile into one composed database
//! query that counts, pages and facets from the same state.

pub mod domain;
pub mod error;
pub mod infra;
pub mod ops;

pub use domain::{AlgorithmId, EffectiveTag, EffectiveTagDelta, ResolveParams, TagSign};
pub use error::{Error, Result};
pub use ops::search::{
    FilterCriteria, GroundTruthFilter, ImageItem, ImageListing, KeywordOperator, OrderBy,
    OrderDirection, RatingFilter, RatingOp,
};

use std::collections::HashMap;
use std::path::Path;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::infra::db::Database;

/// Handle to one catalog database. All operations take the tenant
/// explicitly; no tenant state is held on the handle.
pub struct Catalog {
    db: Database,
}

impl Catalog {
    /// Create a new catalog database at `path` and run migrations.
    pub async fn create(path: &Path) -> Result<Self> {
        let db = Database::create(path).await?;
        db.migrate().await?;
        info!(path = %path.display(), "catalog created");
        Ok(Self { db })
    }

    /// Open an existing catalog database, applying pending migrations.
    pub async fn open(path: &Path) -> Result<Self> {
        let db = Database::open(path).await?;
        db.migrate().await?;
        Ok(Self { db })
    }

    /// In-memory catalog, for tests and scratch sessions.
    pub async fn in_memory() -> Result<Self> {
        let db = Database::in_memory().await?;
        db.migrate().await?;
        Ok(Self { db })
    }

    /// Raw connection, for callers composing their own queries.
    pub fn conn(&self) -> &DatabaseConnection {
        self.db.conn()
    }

    /// Run a filter query: count, page, effective tags per image, optional
    /// facet counts.
    pub async fn list_images(
        &self,
        tenant: &str,
        criteria: &FilterCriteria,
    ) -> Result<ImageListing> {
        ops::search::list_images(self.conn(), tenant, criteria).await
    }

    /// Effective tags for one image under the tenant's active algorithm, or
    /// an explicit one.
    pub async fn effective_tags(
        &self,
        tenant: &str,
        image_id: i32,
        algorithm: Option<AlgorithmId>,
    ) -> Result<Vec<EffectiveTag>> {
        ops::tags::get_effective_tags(self.conn(), tenant, image_id, algorithm).await
    }

    /// Comparison view merging predictions from every algorithm. Never feeds
    /// filtering or facets.
    pub async fn effective_tags_all_algorithms(
        &self,
        tenant: &str,
        image_id: i32,
        threshold: f32,
    ) -> Result<Vec<EffectiveTag>> {
        ops::tags::ensure_image(self.conn(), tenant, image_id).await?;
        let mut resolved =
            ops::tags::resolve_all_algorithms(self.conn(), tenant, &[image_id], threshold).await?;
        Ok(resolved.remove(&image_id).unwrap_or_default())
    }

    /// Record an approve/reject decision for one (image, keyword) pair.
    pub async fn set_ground_truth(
        &self,
        tenant: &str,
        image_id: i32,
        keyword: &str,
        category: &str,
        sign: TagSign,
        author: &str,
    ) -> Result<EffectiveTagDelta> {
        ops::tags::set_ground_truth(self.conn(), tenant, image_id, keyword, category, sign, author)
            .await
    }

    /// Clear a decision; membership falls back to predictions.
    pub async fn remove_ground_truth(
        &self,
        tenant: &str,
        image_id: i32,
        keyword: &str,
    ) -> Result<EffectiveTagDelta> {
        ops::tags::remove_ground_truth(self.conn(), tenant, image_id, keyword).await
    }

    /// Idempotent prediction upsert for the tagging pipeline.
    #[allow(clippy::too_many_arguments)]
    pub async fn upsert_predicted_tag(
        &self,
        tenant: &str,
        image_id: i32,
        keyword: &str,
        category: &str,
        confidence: f32,
        algorithm: AlgorithmId,
        model_name: &str,
    ) -> Result<()> {
        ops::tags::upsert_predicted_tag(
            self.conn(),
            tenant,
            image_id,
            keyword,
            category,
            confidence,
            algorithm,
            model_name,
        )
        .await
    }

    /// Set or clear an image rating. NULL (never rated) and 0 are distinct.
    pub async fn set_rating(&self, tenant: &str, image_id: i32, rating: Option<u8>) -> Result<()> {
        ops::tags::set_rating(self.conn(), tenant, image_id, rating).await
    }

    /// Flag an image as reviewed / not reviewed.
    pub async fn set_reviewed(&self, tenant: &str, image_id: i32, reviewed: bool) -> Result<()> {
        ops::tags::set_reviewed(self.conn(), tenant, image_id, reviewed).await
    }

    /// Whether an image exists in tenant scope.
    pub async fn image_exists(&self, tenant: &str, image_id: i32) -> Result<bool> {
        ops::tags::image_exists(self.conn(), tenant, image_id).await
    }

    /// Stored settings for a tenant, if configured.
    pub async fn tenant_settings(
        &self,
        tenant: &str,
    ) -> Result<Option<infra::db::entities::tenant_settings::Model>> {
        ops::tags::tenant_settings(self.conn(), tenant).await
    }

    /// Switch the tenant's active algorithm.
    pub async fn set_active_algorithm(&self, tenant: &str, algorithm: AlgorithmId) -> Result<()> {
        ops::tags::set_active_algorithm(self.conn(), tenant, algorithm).await
    }

    /// Set a confidence threshold: the tenant default, or a per-algorithm
    /// override.
    pub async fn set_threshold(
        &self,
        tenant: &str,
        algorithm: Option<AlgorithmId>,
        threshold: f32,
    ) -> Result<()> {
        ops::tags::set_threshold(self.conn(), tenant, algorithm, threshold).await
    }

    /// Per-keyword facet counts over the criteria's scope, minus its
    /// keyword/category dimensions.
    pub async fn facet_counts(
        &self,
        tenant: &str,
        criteria: &FilterCriteria,
    ) -> Result<HashMap<String, u64>> {
        let params = ops::tags::load_resolve_params(self.conn(), tenant, None).await?;
        ops::search::facets::aggregate(self.conn(), tenant, criteria, &params).await
    }
}
