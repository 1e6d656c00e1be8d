//! Tag resolution and the tag ledger write paths

pub mod resolver;
pub mod settings;
pub mod writes;

pub use resolver::{
    get_effective_tags, load_resolve_params, resolve_all_algorithms, resolve_effective_tags,
};
pub use settings::{set_active_algorithm, set_threshold, tenant_settings};
pub use writes::{
    image_exists, remove_ground_truth, set_ground_truth, set_rating, set_reviewed,
    upsert_predicted_tag,
};

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::error::{Error, Result};
use crate::infra::db::entities::image;

/// Load an image in tenant scope, or fail with `NotFound`.
pub(crate) async fn ensure_image(
    db: &DatabaseConnection,
    tenant: &str,
    image_id: i32,
) -> Result<image::Model> {
    image::Entity::find_by_id(image_id)
        .filter(image::Column::TenantId.eq(tenant))
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("image", image_id))
}
