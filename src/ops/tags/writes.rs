//! Write paths for the tag ledger and the two filterable image fields
//!
//! All writes are single-row upserts keyed by the unique indexes, so retries
//! are idempotent and concurrent writers resolve last-write-wins through the
//! storage engine's conflict path. No application-level locking.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tracing::debug;

use crate::domain::{AlgorithmId, EffectiveTagDelta, TagSign};
use crate::error::{Error, Result};
use crate::infra::db::entities::{ground_truth_decision, image, predicted_tag};
use crate::ops::tags::resolver;

/// Record a ground-truth decision, replacing any prior decision for the same
/// (tenant, image, keyword). Reports whether the effective tag set changed.
pub async fn set_ground_truth(
    db: &DatabaseConnection,
    tenant: &str,
    image_id: i32,
    keyword: &str,
    category: &str,
    sign: TagSign,
    author: &str,
) -> Result<EffectiveTagDelta> {
    super::ensure_image(db, tenant, image_id).await?;

    let was_present = keyword_present(db, tenant, image_id, keyword).await?;

    let now = Utc::now();
    let decision = ground_truth_decision::ActiveModel {
        tenant_id: Set(tenant.to_owned()),
        image_id: Set(image_id),
        keyword: Set(keyword.to_owned()),
        category: Set(category.to_owned()),
        sign: Set(sign.signum()),
        author: Set(author.to_owned()),
        decided_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    ground_truth_decision::Entity::insert(decision)
        .on_conflict(
            OnConflict::columns([
                ground_truth_decision::Column::TenantId,
                ground_truth_decision::Column::ImageId,
                ground_truth_decision::Column::Keyword,
            ])
            .update_columns([
                ground_truth_decision::Column::Category,
                ground_truth_decision::Column::Sign,
                ground_truth_decision::Column::Author,
                ground_truth_decision::Column::DecidedAt,
                ground_truth_decision::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec(db)
        .await?;

    // A decision decides membership absolutely, so the post-state follows
    // directly from the sign.
    let now_present = sign == TagSign::Approve;

    debug!(tenant, image_id, keyword, ?sign, "ground truth recorded");

    Ok(EffectiveTagDelta {
        changed: was_present != now_present,
        now_present,
    })
}

/// Clear a ground-truth decision; membership falls back to predictions.
pub async fn remove_ground_truth(
    db: &DatabaseConnection,
    tenant: &str,
    image_id: i32,
    keyword: &str,
) -> Result<EffectiveTagDelta> {
    super::ensure_image(db, tenant, image_id).await?;

    let was_present = keyword_present(db, tenant, image_id, keyword).await?;

    ground_truth_decision::Entity::delete_many()
        .filter(ground_truth_decision::Column::TenantId.eq(tenant))
        .filter(ground_truth_decision::Column::ImageId.eq(image_id))
        .filter(ground_truth_decision::Column::Keyword.eq(keyword))
        .exec(db)
        .await?;

    let now_present = keyword_present(db, tenant, image_id, keyword).await?;

    Ok(EffectiveTagDelta {
        changed: was_present != now_present,
        now_present,
    })
}

/// Idempotent prediction upsert for the tagging pipeline. Preserves
/// `created_at` on refresh; only `confidence`, `category` and `updated_at`
/// move.
pub async fn upsert_predicted_tag(
    db: &DatabaseConnection,
    tenant: &str,
    image_id: i32,
    keyword: &str,
    category: &str,
    confidence: f32,
    algorithm: AlgorithmId,
    model_name: &str,
) -> Result<()> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(Error::invalid(
            "confidence",
            format!("{confidence} outside [0, 1]"),
        ));
    }

    super::ensure_image(db, tenant, image_id).await?;

    let now = Utc::now();
    let prediction = predicted_tag::ActiveModel {
        tenant_id: Set(tenant.to_owned()),
        image_id: Set(image_id),
        keyword: Set(keyword.to_owned()),
        category: Set(category.to_owned()),
        confidence: Set(confidence),
        algorithm: Set(algorithm.as_str().to_owned()),
        model_name: Set(model_name.to_owned()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    predicted_tag::Entity::insert(prediction)
        .on_conflict(
            OnConflict::columns([
                predicted_tag::Column::TenantId,
                predicted_tag::Column::ImageId,
                predicted_tag::Column::Keyword,
                predicted_tag::Column::Algorithm,
                predicted_tag::Column::ModelName,
            ])
            .update_columns([
                predicted_tag::Column::Category,
                predicted_tag::Column::Confidence,
                predicted_tag::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec(db)
        .await?;

    debug!(tenant, image_id, keyword, %algorithm, confidence, "prediction upserted");

    Ok(())
}

/// Set or clear an image rating. NULL (never rated) and 0 are distinct.
pub async fn set_rating(
    db: &DatabaseConnection,
    tenant: &str,
    image_id: i32,
    rating: Option<u8>,
) -> Result<()> {
    if let Some(value) = rating {
        if value > 5 {
            return Err(Error::invalid("rating", format!("{value} outside 0..=5")));
        }
    }

    let image = super::ensure_image(db, tenant, image_id).await?;
    let mut image: image::ActiveModel = image.into();
    image.rating = Set(rating.map(i16::from));
    image.updated_at = Set(Utc::now());
    image.update(db).await?;
    Ok(())
}

/// Flag an image as reviewed / not reviewed.
pub async fn set_reviewed(
    db: &DatabaseConnection,
    tenant: &str,
    image_id: i32,
    reviewed: bool,
) -> Result<()> {
    let image = super::ensure_image(db, tenant, image_id).await?;
    let mut image: image::ActiveModel = image.into();
    image.reviewed = Set(reviewed);
    image.updated_at = Set(Utc::now());
    image.update(db).await?;
    Ok(())
}

/// Whether an image exists in tenant scope.
pub async fn image_exists(db: &DatabaseConnection, tenant: &str, image_id: i32) -> Result<bool> {
    let count = image::Entity::find()
        .filter(image::Column::TenantId.eq(tenant))
        .filter(image::Column::Id.eq(image_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

async fn keyword_present(
    db: &DatabaseConnection,
    tenant: &str,
    image_id: i32,
    keyword: &str,
) -> Result<bool> {
    let params = resolver::load_resolve_params(db, tenant, None).await?;
    let resolved = resolver::resolve_effective_tags(db, tenant, &[image_id], &params).await?;
    Ok(resolved
        .get(&image_id)
        .map(|tags| tags.iter().any(|t| t.keyword == keyword))
        .unwrap_or(false))
}
