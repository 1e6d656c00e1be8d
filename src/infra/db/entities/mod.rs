//! Sea-ORM entity definitions
//!
//! These map the catalog relations to database tables. All rows are
//! tenant-scoped; every query must filter on `tenant_id`.

pub mod algorithm_threshold;
pub mod ground_truth_decision;
pub mod image;
pub mod photo_list;
pub mod photo_list_entry;
pub mod predicted_tag;
pub mod tenant_settings;

// Re-export all entities
pub use algorithm_threshold::Entity as AlgorithmThreshold;
pub use ground_truth_decision::Entity as GroundTruthDecision;
pub use image::Entity as Image;
pub use photo_list::Entity as PhotoList;
pub use photo_list_entry::Entity as PhotoListEntry;
pub use predicted_tag::Entity as PredictedTag;
pub use tenant_settings::Entity as TenantSettings;
