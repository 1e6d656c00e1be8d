//! Shared setup for integration tests: an in-memory catalog plus seed
//! helpers for tenants, images, lists and the tag ledger.

#![allow(dead_code)]

use chrono::{Duration, Utc};
use phototag_core::infra::db::entities::{
    algorithm_threshold, image, photo_list, photo_list_entry, tenant_settings,
};
use phototag_core::{AlgorithmId, Catalog, TagSign};
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

pub const TENANT: &str = "tenant-a";
pub const OTHER_TENANT: &str = "tenant-b";

/// Route crate logs through the test harness; `RUST_LOG` filters apply.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub async fn catalog() -> Catalog {
    init_tracing();
    Catalog::in_memory().await.expect("in-memory catalog")
}

pub async fn seed_tenant(catalog: &Catalog, tenant: &str, active: AlgorithmId, threshold: f32) {
    let now = Utc::now();
    tenant_settings::ActiveModel {
        tenant_id: Set(tenant.to_owned()),
        active_algorithm: Set(active.as_str().to_owned()),
        tag_confidence_threshold: Set(threshold),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(catalog.conn())
    .await
    .expect("seed tenant settings");
}

pub async fn seed_threshold_override(
    catalog: &Catalog,
    tenant: &str,
    algorithm: AlgorithmId,
    threshold: f32,
) {
    algorithm_threshold::ActiveModel {
        tenant_id: Set(tenant.to_owned()),
        algorithm: Set(algorithm.as_str().to_owned()),
        threshold: Set(threshold),
    }
    .insert(catalog.conn())
    .await
    .expect("seed threshold override");
}

/// Insert one image. `age_hours` pushes `captured_at`/`created_at` into the
/// past so ordering tests get distinct timestamps.
pub async fn seed_image(
    catalog: &Catalog,
    tenant: &str,
    file_name: &str,
    rating: Option<i16>,
    reviewed: bool,
    age_hours: i64,
) -> i32 {
    let at = Utc::now() - Duration::hours(age_hours);
    let inserted = image::ActiveModel {
        uuid: Set(Uuid::new_v4()),
        tenant_id: Set(tenant.to_owned()),
        file_name: Set(file_name.to_owned()),
        rating: Set(rating),
        reviewed: Set(reviewed),
        captured_at: Set(Some(at)),
        created_at: Set(at),
        updated_at: Set(at),
        ..Default::default()
    }
    .insert(catalog.conn())
    .await
    .expect("seed image");
    inserted.id
}

pub async fn seed_list(catalog: &Catalog, tenant: &str, name: &str, members: &[i32]) -> i32 {
    let list = photo_list::ActiveModel {
        uuid: Set(Uuid::new_v4()),
        tenant_id: Set(tenant.to_owned()),
        name: Set(name.to_owned()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(catalog.conn())
    .await
    .expect("seed list");

    for image_id in members {
        photo_list_entry::ActiveModel {
            list_id: Set(list.id),
            image_id: Set(*image_id),
            added_at: Set(Utc::now()),
        }
        .insert(catalog.conn())
        .await
        .expect("seed list entry");
    }

    list.id
}

pub async fn predict(
    catalog: &Catalog,
    tenant: &str,
    image_id: i32,
    keyword: &str,
    confidence: f32,
    algorithm: AlgorithmId,
) {
    catalog
        .upsert_predicted_tag(
            tenant,
            image_id,
            keyword,
            "general",
            confidence,
            algorithm,
            "model-v1",
        )
        .await
        .expect("seed prediction");
}

pub async fn approve(catalog: &Catalog, tenant: &str, image_id: i32, keyword: &str) {
    catalog
        .set_ground_truth(tenant, image_id, keyword, "general", TagSign::Approve, "tester")
        .await
        .expect("approve");
}

pub async fn reject(catalog: &Catalog, tenant: &str, image_id: i32, keyword: &str) {
    catalog
        .set_ground_truth(tenant, image_id, keyword, "general", TagSign::Reject, "tester")
        .await
        .expect("reject");
}
