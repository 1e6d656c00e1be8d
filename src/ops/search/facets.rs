//! Facet aggregation
//!
//! Per-keyword effective-tag counts over the composed scope, minus the
//! keyword/category dimensions themselves. Two grouped queries, one over
//! approve decisions and one over undecided thresholded predictions; the two
//! sets are disjoint by construction (a decided pair is masked out of the
//! prediction side), so summing them counts each image once per keyword.
//! Built from the same fragments as direct keyword selection, so a facet
//! count always equals the total of the matching keyword query.

use std::collections::HashMap;

use sea_orm::sea_query::{Alias, Condition, Expr, Func, JoinType, Query};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QuerySelect,
};

use crate::domain::ResolveParams;
use crate::error::Result;
use crate::infra::db::entities::{ground_truth_decision, predicted_tag};
use crate::ops::search::input::FilterCriteria;
use crate::ops::search::query::ComposedQuery;

#[derive(Debug, FromQueryResult)]
struct KeywordCount {
    keyword: String,
    cnt: i64,
}

/// Compute per-keyword counts over the scoped identity set.
pub async fn aggregate(
    db: &DatabaseConnection,
    tenant: &str,
    criteria: &FilterCriteria,
    params: &ResolveParams,
) -> Result<HashMap<String, u64>> {
    if let Some(list_id) = criteria.list_id {
        super::ensure_list(db, tenant, list_id).await?;
    }

    let scoped = criteria.without_keyword_dimension();
    let composed = ComposedQuery::build(tenant, &scoped, params)?;
    let scope = composed.scope_subquery();

    let approved = ground_truth_decision::Entity::find()
        .select_only()
        .column(ground_truth_decision::Column::Keyword)
        .column_as(ground_truth_decision::Column::Id.count(), "cnt")
        .filter(ground_truth_decision::Column::TenantId.eq(tenant))
        .filter(ground_truth_decision::Column::Sign.eq(1))
        .filter(ground_truth_decision::Column::ImageId.in_subquery(scope.clone()))
        .group_by(ground_truth_decision::Column::Keyword)
        .into_model::<KeywordCount>()
        .all(db)
        .await?;

    let pt = Alias::new("pt");
    let d = Alias::new("d");
    let mut predicted = Query::select();
    predicted
        .column((pt.clone(), predicted_tag::Column::Keyword))
        .expr_as(
            Func::count_distinct(Expr::col((pt.clone(), predicted_tag::Column::ImageId))),
            Alias::new("cnt"),
        )
        .from_as(predicted_tag::Entity, pt.clone())
        .join_as(
            JoinType::LeftJoin,
            ground_truth_decision::Entity,
            d.clone(),
            Condition::all()
                .add(
                    Expr::col((d.clone(), ground_truth_decision::Column::TenantId))
                        .equals((pt.clone(), predicted_tag::Column::TenantId)),
                )
                .add(
                    Expr::col((d.clone(), ground_truth_decision::Column::ImageId))
                        .equals((pt.clone(), predicted_tag::Column::ImageId)),
                )
                .add(
                    Expr::col((d.clone(), ground_truth_decision::Column::Keyword))
                        .equals((pt.clone(), predicted_tag::Column::Keyword)),
                ),
        )
        .and_where(Expr::col((pt.clone(), predicted_tag::Column::TenantId)).eq(tenant))
        .and_where(
            Expr::col((pt.clone(), predicted_tag::Column::Algorithm))
                .eq(params.algorithm.as_str()),
        )
        .and_where(Expr::col((pt.clone(), predicted_tag::Column::Confidence)).gte(params.threshold))
        .and_where(Expr::col((d, ground_truth_decision::Column::Id)).is_null())
        .and_where(Expr::col((pt.clone(), predicted_tag::Column::ImageId)).in_subquery(scope))
        .group_by_col((pt, predicted_tag::Column::Keyword));

    let backend = db.get_database_backend();
    let predicted = KeywordCount::find_by_statement(backend.build(&predicted))
        .all(db)
        .await?;

    let mut counts: HashMap<String, u64> = HashMap::new();
    for row in approved.into_iter().chain(predicted) {
        *counts.entry(row.keyword).or_default() += row.cnt.max(0) as u64;
    }

    Ok(counts)
}
