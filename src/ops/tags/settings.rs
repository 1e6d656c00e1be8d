//! Tenant configuration surface
//!
//! Persists the active algorithm, the tenant-wide default confidence
//! threshold, and per-algorithm overrides. All writes are upserts keyed by
//! the primary keys, same as the tag ledger write paths.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use tracing::info;

use crate::domain::tags::DEFAULT_CONFIDENCE_THRESHOLD;
use crate::domain::AlgorithmId;
use crate::error::{Error, Result};
use crate::infra::db::entities::{algorithm_threshold, tenant_settings};

/// Stored settings for a tenant, if configured.
pub async fn tenant_settings(
    db: &DatabaseConnection,
    tenant: &str,
) -> Result<Option<tenant_settings::Model>> {
    Ok(tenant_settings::Entity::find_by_id(tenant.to_owned())
        .one(db)
        .await?)
}

/// Switch the tenant's active algorithm. Creates the settings row with the
/// default threshold on first use; an existing threshold is left untouched.
pub async fn set_active_algorithm(
    db: &DatabaseConnection,
    tenant: &str,
    algorithm: AlgorithmId,
) -> Result<()> {
    let now = Utc::now();
    let settings = tenant_settings::ActiveModel {
        tenant_id: Set(tenant.to_owned()),
        active_algorithm: Set(algorithm.as_str().to_owned()),
        tag_confidence_threshold: Set(DEFAULT_CONFIDENCE_THRESHOLD),
        created_at: Set(now),
        updated_at: Set(now),
    };

    tenant_settings::Entity::insert(settings)
        .on_conflict(
            OnConflict::column(tenant_settings::Column::TenantId)
                .update_columns([
                    tenant_settings::Column::ActiveAlgorithm,
                    tenant_settings::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec(db)
        .await?;

    info!(tenant, %algorithm, "active algorithm changed");
    Ok(())
}

/// Set a confidence threshold: the tenant default when `algorithm` is
/// `None`, a per-algorithm override otherwise.
pub async fn set_threshold(
    db: &DatabaseConnection,
    tenant: &str,
    algorithm: Option<AlgorithmId>,
    threshold: f32,
) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(Error::invalid(
            "threshold",
            format!("{threshold} outside [0, 1]"),
        ));
    }

    match algorithm {
        Some(algorithm) => {
            let row = algorithm_threshold::ActiveModel {
                tenant_id: Set(tenant.to_owned()),
                algorithm: Set(algorithm.as_str().to_owned()),
                threshold: Set(threshold),
            };
            algorithm_threshold::Entity::insert(row)
                .on_conflict(
                    OnConflict::columns([
                        algorithm_threshold::Column::TenantId,
                        algorithm_threshold::Column::Algorithm,
                    ])
                    .update_columns([algorithm_threshold::Column::Threshold])
                    .to_owned(),
                )
                .exec(db)
                .await?;
            info!(tenant, %algorithm, threshold, "algorithm threshold override set");
        }
        None => {
            let now = Utc::now();
            let settings = tenant_settings::ActiveModel {
                tenant_id: Set(tenant.to_owned()),
                active_algorithm: Set(AlgorithmId::default().as_str().to_owned()),
                tag_confidence_threshold: Set(threshold),
                created_at: Set(now),
                updated_at: Set(now),
            };
            tenant_settings::Entity::insert(settings)
                .on_conflict(
                    OnConflict::column(tenant_settings::Column::TenantId)
                        .update_columns([
                            tenant_settings::Column::TagConfidenceThreshold,
                            tenant_settings::Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec(db)
                .await?;
            info!(tenant, threshold, "tenant default threshold set");
        }
    }

    Ok(())
}
