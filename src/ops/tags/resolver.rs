//! Tag resolver
//!
//! Computes the effective tag set per image by merging ground-truth decisions
//! with algorithm predictions. A decision decides membership absolutely:
//! approve includes the keyword at the sentinel confidence even with no
//! prediction, reject suppresses it no matter how many algorithms still
//! predict it. Without a decision, membership follows the confidence
//! threshold. Pure function of stored state plus resolve parameters.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::{debug, warn};

use crate::domain::tags::{APPROVED_CONFIDENCE, DEFAULT_CONFIDENCE_THRESHOLD};
use crate::domain::{AlgorithmId, EffectiveTag, ResolveParams, TagSign};
use crate::error::{Error, Result};
use crate::infra::db::entities::{
    algorithm_threshold, ground_truth_decision, predicted_tag, tenant_settings,
};

/// Load resolve parameters for a request: the requested algorithm (or the
/// tenant's active one) plus its confidence threshold. Loaded fresh per
/// request; the per-algorithm override wins over the tenant default.
pub async fn load_resolve_params(
    db: &DatabaseConnection,
    tenant: &str,
    algorithm: Option<AlgorithmId>,
) -> Result<ResolveParams> {
    let settings = tenant_settings::Entity::find_by_id(tenant.to_owned())
        .one(db)
        .await?;

    let (active, default_threshold) = match &settings {
        Some(s) => {
            let active = AlgorithmId::lookup(&s.active_algorithm).unwrap_or_else(|| {
                warn!(
                    tenant,
                    stored = %s.active_algorithm,
                    "unrecognized active algorithm in tenant settings, using default"
                );
                AlgorithmId::default()
            });
            (active, s.tag_confidence_threshold)
        }
        None => (AlgorithmId::default(), DEFAULT_CONFIDENCE_THRESHOLD),
    };

    let algorithm = algorithm.unwrap_or(active);

    // The active algorithm is acknowledged even before its first prediction
    // row (a freshly configured pipeline). Anything else must have produced
    // at least one prediction for this tenant.
    if algorithm != active {
        let produced = predicted_tag::Entity::find()
            .filter(predicted_tag::Column::TenantId.eq(tenant))
            .filter(predicted_tag::Column::Algorithm.eq(algorithm.as_str()))
            .count(db)
            .await?;
        if produced == 0 {
            return Err(Error::UnknownAlgorithm(algorithm));
        }
    }

    let threshold = algorithm_threshold::Entity::find_by_id((
        tenant.to_owned(),
        algorithm.as_str().to_owned(),
    ))
    .one(db)
    .await?
    .map(|row| row.threshold)
    .unwrap_or(default_threshold);

    Ok(ResolveParams::new(algorithm, threshold))
}

/// Resolve effective tags for a set of images under one algorithm.
pub async fn resolve_effective_tags(
    db: &DatabaseConnection,
    tenant: &str,
    image_ids: &[i32],
    params: &ResolveParams,
) -> Result<HashMap<i32, Vec<EffectiveTag>>> {
    resolve_internal(db, tenant, image_ids, Some(params.algorithm), params.threshold).await
}

/// Comparison view: merge predictions from every algorithm. Rejects still
/// mask, approves still win; this never feeds filtering or facets.
pub async fn resolve_all_algorithms(
    db: &DatabaseConnection,
    tenant: &str,
    image_ids: &[i32],
    threshold: f32,
) -> Result<HashMap<i32, Vec<EffectiveTag>>> {
    resolve_internal(db, tenant, image_ids, None, threshold).await
}

/// Public single-image variant. `NotFound` when the image is absent in
/// tenant scope; output sorted by descending confidence, then keyword.
pub async fn get_effective_tags(
    db: &DatabaseConnection,
    tenant: &str,
    image_id: i32,
    algorithm: Option<AlgorithmId>,
) -> Result<Vec<EffectiveTag>> {
    super::ensure_image(db, tenant, image_id).await?;
    let params = load_resolve_params(db, tenant, algorithm).await?;
    let mut resolved = resolve_effective_tags(db, tenant, &[image_id], &params).await?;
    Ok(resolved.remove(&image_id).unwrap_or_default())
}

async fn resolve_internal(
    db: &DatabaseConnection,
    tenant: &str,
    image_ids: &[i32],
    algorithm: Option<AlgorithmId>,
    threshold: f32,
) -> Result<HashMap<i32, Vec<EffectiveTag>>> {
    if image_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let decisions = ground_truth_decision::Entity::find()
        .filter(ground_truth_decision::Column::TenantId.eq(tenant))
        .filter(ground_truth_decision::Column::ImageId.is_in(image_ids.iter().copied()))
        .all(db)
        .await?;

    let mut prediction_query = predicted_tag::Entity::find()
        .filter(predicted_tag::Column::TenantId.eq(tenant))
        .filter(predicted_tag::Column::ImageId.is_in(image_ids.iter().copied()));
    if let Some(algorithm) = algorithm {
        prediction_query =
            prediction_query.filter(predicted_tag::Column::Algorithm.eq(algorithm.as_str()));
    }
    let predictions = prediction_query.all(db).await?;

    debug!(
        images = image_ids.len(),
        decisions = decisions.len(),
        predictions = predictions.len(),
        "resolving effective tags"
    );

    let mut merged: HashMap<i32, HashMap<String, EffectiveTag>> = HashMap::new();
    for id in image_ids {
        merged.entry(*id).or_default();
    }

    // Predictions first: thresholded, deduplicated per keyword keeping the
    // highest confidence (multiple models may predict the same keyword).
    for p in predictions {
        if p.confidence < threshold {
            continue;
        }
        let tags = merged.entry(p.image_id).or_default();
        match tags.entry(p.keyword.clone()) {
            Entry::Occupied(mut slot) => {
                if p.confidence > slot.get().confidence {
                    slot.insert(EffectiveTag::new(p.keyword, p.category, p.confidence));
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(EffectiveTag::new(p.keyword.clone(), p.category, p.confidence));
            }
        }
    }

    // Decisions override unconditionally.
    for d in decisions {
        let tags = merged.entry(d.image_id).or_default();
        match d.tag_sign() {
            Some(TagSign::Approve) => {
                tags.insert(
                    d.keyword.clone(),
                    EffectiveTag::new(d.keyword, d.category, APPROVED_CONFIDENCE),
                );
            }
            Some(TagSign::Reject) => {
                tags.remove(&d.keyword);
            }
            None => {
                debug!(id = d.id, sign = d.sign, "skipping decision with invalid sign");
            }
        }
    }

    Ok(merged
        .into_iter()
        .map(|(image_id, tags)| {
            let mut tags: Vec<EffectiveTag> = tags.into_values().collect();
            tags.sort_by(|a, b| {
                b.confidence
                    .partial_cmp(&a.confidence)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.keyword.cmp(&b.keyword))
            });
            (image_id, tags)
        })
        .collect())
}
