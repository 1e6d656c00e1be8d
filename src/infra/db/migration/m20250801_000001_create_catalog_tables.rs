//! Initial migration to create all catalog tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create images table
        manager
            .create_table(
                Table::create()
                    .table(Images::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Images::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Images::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Images::TenantId).string().not_null())
                    .col(ColumnDef::new(Images::FileName).string().not_null())
                    // Nullable: NULL means never rated, distinct from 0
                    .col(ColumnDef::new(Images::Rating).small_integer())
                    .col(ColumnDef::new(Images::Reviewed).boolean().not_null().default(false))
                    .col(ColumnDef::new(Images::CapturedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Images::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Images::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_images_tenant")
                    .table(Images::Table)
                    .col(Images::TenantId)
                    .to_owned(),
            )
            .await?;

        // Create photo_lists table
        manager
            .create_table(
                Table::create()
                    .table(PhotoLists::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PhotoLists::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(PhotoLists::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(PhotoLists::TenantId).string().not_null())
                    .col(ColumnDef::new(PhotoLists::Name).string().not_null())
                    .col(ColumnDef::new(PhotoLists::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        // Create photo_list_entries junction table
        manager
            .create_table(
                Table::create()
                    .table(PhotoListEntries::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PhotoListEntries::ListId).integer().not_null())
                    .col(ColumnDef::new(PhotoListEntries::ImageId).integer().not_null())
                    .col(ColumnDef::new(PhotoListEntries::AddedAt).timestamp_with_time_zone().not_null())
                    .primary_key(
                        Index::create()
                            .col(PhotoListEntries::ListId)
                            .col(PhotoListEntries::ImageId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PhotoListEntries::Table, PhotoListEntries::ListId)
                            .to(PhotoLists::Table, PhotoLists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PhotoListEntries::Table, PhotoListEntries::ImageId)
                            .to(Images::Table, Images::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create ground_truth_decisions table
        manager
            .create_table(
                Table::create()
                    .table(GroundTruthDecisions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GroundTruthDecisions::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(GroundTruthDecisions::TenantId).string().not_null())
                    .col(ColumnDef::new(GroundTruthDecisions::ImageId).integer().not_null())
                    .col(ColumnDef::new(GroundTruthDecisions::Keyword).string().not_null())
                    .col(ColumnDef::new(GroundTruthDecisions::Category).string().not_null())
                    .col(ColumnDef::new(GroundTruthDecisions::Sign).small_integer().not_null())
                    .col(ColumnDef::new(GroundTruthDecisions::Author).string().not_null())
                    .col(ColumnDef::new(GroundTruthDecisions::DecidedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(GroundTruthDecisions::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(GroundTruthDecisions::Table, GroundTruthDecisions::ImageId)
                            .to(Images::Table, Images::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One active decision per (tenant, image, keyword); drives the
        // last-write-wins upsert conflict path
        manager
            .create_index(
                Index::create()
                    .name("ux_gtd_tenant_image_keyword")
                    .table(GroundTruthDecisions::Table)
                    .col(GroundTruthDecisions::TenantId)
                    .col(GroundTruthDecisions::ImageId)
                    .col(GroundTruthDecisions::Keyword)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_gtd_tenant_keyword_sign")
                    .table(GroundTruthDecisions::Table)
                    .col(GroundTruthDecisions::TenantId)
                    .col(GroundTruthDecisions::Keyword)
                    .col(GroundTruthDecisions::Sign)
                    .to_owned(),
            )
            .await?;

        // Create predicted_tags table (one relation for all algorithms,
        // discriminated by the algorithm column)
        manager
            .create_table(
                Table::create()
                    .table(PredictedTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PredictedTags::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(PredictedTags::TenantId).string().not_null())
                    .col(ColumnDef::new(PredictedTags::ImageId).integer().not_null())
                    .col(ColumnDef::new(PredictedTags::Keyword).string().not_null())
                    .col(ColumnDef::new(PredictedTags::Category).string().not_null())
                    .col(ColumnDef::new(PredictedTags::Confidence).float().not_null())
                    .col(ColumnDef::new(PredictedTags::Algorithm).string().not_null())
                    .col(ColumnDef::new(PredictedTags::ModelName).string().not_null())
                    .col(ColumnDef::new(PredictedTags::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(PredictedTags::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(PredictedTags::Table, PredictedTags::ImageId)
                            .to(Images::Table, Images::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Drives the idempotent upsert conflict path
        manager
            .create_index(
                Index::create()
                    .name("ux_pt_tenant_image_keyword_algorithm_model")
                    .table(PredictedTags::Table)
                    .col(PredictedTags::TenantId)
                    .col(PredictedTags::ImageId)
                    .col(PredictedTags::Keyword)
                    .col(PredictedTags::Algorithm)
                    .col(PredictedTags::ModelName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Covering index for keyword/facet queries over one algorithm
        manager
            .create_index(
                Index::create()
                    .name("ix_pt_tenant_algorithm_keyword_confidence")
                    .table(PredictedTags::Table)
                    .col(PredictedTags::TenantId)
                    .col(PredictedTags::Algorithm)
                    .col(PredictedTags::Keyword)
                    .col(PredictedTags::Confidence)
                    .to_owned(),
            )
            .await?;

        // Create tenant_settings table
        manager
            .create_table(
                Table::create()
                    .table(TenantSettings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TenantSettings::TenantId).string().not_null().primary_key())
                    .col(ColumnDef::new(TenantSettings::ActiveAlgorithm).string().not_null())
                    .col(ColumnDef::new(TenantSettings::TagConfidenceThreshold).float().not_null().default(0.15))
                    .col(ColumnDef::new(TenantSettings::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(TenantSettings::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        // Create algorithm_thresholds override table
        manager
            .create_table(
                Table::create()
                    .table(AlgorithmThresholds::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AlgorithmThresholds::TenantId).string().not_null())
                    .col(ColumnDef::new(AlgorithmThresholds::Algorithm).string().not_null())
                    .col(ColumnDef::new(AlgorithmThresholds::Threshold).float().not_null())
                    .primary_key(
                        Index::create()
                            .col(AlgorithmThresholds::TenantId)
                            .col(AlgorithmThresholds::Algorithm),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlgorithmThresholds::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TenantSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PredictedTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GroundTruthDecisions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PhotoListEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PhotoLists::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Images::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Images {
    Table,
    Id,
    Uuid,
    TenantId,
    FileName,
    Rating,
    Reviewed,
    CapturedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PhotoLists {
    Table,
    Id,
    Uuid,
    TenantId,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum PhotoListEntries {
    Table,
    ListId,
    ImageId,
    AddedAt,
}

#[derive(Iden)]
enum GroundTruthDecisions {
    Table,
    Id,
    TenantId,
    ImageId,
    Keyword,
    Category,
    Sign,
    Author,
    DecidedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PredictedTags {
    Table,
    Id,
    TenantId,
    ImageId,
    Keyword,
    Category,
    Confidence,
    Algorithm,
    ModelName,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum TenantSettings {
    Table,
    TenantId,
    ActiveAlgorithm,
    TagConfidenceThreshold,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AlgorithmThresholds {
    Table,
    TenantId,
    Algorithm,
    Threshold,
}
