//! Predicate compiler
//!
//! Each filter dimension compiles to one opaque `Predicate` fragment over
//! image identities. Fragments combine only through `Predicate::all` /
//! `Predicate::any`; membership dimensions compile to `IN (subquery)` with
//! reject masking as a `LEFT JOIN ... IS NULL`, so identity sets are never
//! materialized into process memory. Never re-select from a finished
//! fragment and never extract a raw column out of one; both silently break
//! set composition.

use sea_orm::sea_query::{Alias, Condition, Expr, JoinType, Query, SelectStatement};
use sea_orm::ColumnTrait;

use crate::domain::ResolveParams;
use crate::infra::db::entities::{ground_truth_decision, image, photo_list_entry, predicted_tag};
use crate::ops::search::input::{GroundTruthFilter, RatingFilter, RatingOp};

/// One composable query fragment selecting image identities.
#[derive(Clone, Debug)]
pub struct Predicate(Condition);

impl Predicate {
    fn new(condition: Condition) -> Self {
        Self(condition)
    }

    /// Intersection of fragments.
    pub fn all(fragments: impl IntoIterator<Item = Predicate>) -> Self {
        let mut condition = Condition::all();
        for fragment in fragments {
            condition = condition.add(fragment.0);
        }
        Self(condition)
    }

    /// Union of fragments.
    pub fn any(fragments: impl IntoIterator<Item = Predicate>) -> Self {
        let mut condition = Condition::any();
        for fragment in fragments {
            condition = condition.add(fragment.0);
        }
        Self(condition)
    }

    /// Consume into the underlying condition. Only the query composer calls
    /// this, exactly once per composed query.
    pub(crate) fn into_condition(self) -> Condition {
        self.0
    }
}

/// Everything in the tenant's identity space.
pub fn tenant_scope(tenant: &str) -> Predicate {
    Predicate::new(Condition::all().add(image::Column::TenantId.eq(tenant)))
}

/// Members of one list.
pub fn list_membership(list_id: i32) -> Predicate {
    let mut members = Query::select();
    members
        .column(photo_list_entry::Column::ImageId)
        .from(photo_list_entry::Entity)
        .and_where(Expr::col(photo_list_entry::Column::ListId).eq(list_id));

    Predicate::new(Condition::all().add(image::Column::Id.in_subquery(members)))
}

/// Rating comparison.
pub fn rating(filter: &RatingFilter) -> Predicate {
    let value = i16::from(filter.value);
    let expr = match filter.op {
        RatingOp::Eq => image::Column::Rating.eq(value),
        RatingOp::Gte => image::Column::Rating.gte(value),
        RatingOp::Gt => image::Column::Rating.gt(value),
        RatingOp::Lte => image::Column::Rating.lte(value),
        RatingOp::Lt => image::Column::Rating.lt(value),
    };
    Predicate::new(Condition::all().add(expr))
}

/// `rating <> 0 OR rating IS NULL`. Unrated images are always retained;
/// a bare `rating <> 0` would silently drop every NULL row.
pub fn hide_zero_rating() -> Predicate {
    Predicate::new(
        Condition::any()
            .add(image::Column::Rating.ne(0i16))
            .add(image::Column::Rating.is_null()),
    )
}

/// The separate, explicit opt-out for never-rated images.
pub fn exclude_unrated() -> Predicate {
    Predicate::new(Condition::all().add(image::Column::Rating.is_not_null()))
}

/// Reviewed flag equality.
pub fn reviewed(flag: bool) -> Predicate {
    Predicate::new(Condition::all().add(image::Column::Reviewed.eq(flag)))
}

/// Ground-truth decision dimension. Signum +1/-1 match the decision sign,
/// 0 matches images with no decision in the keyword/category scope, unset
/// matches any decision. `missing` additionally requires no prediction at
/// all (any algorithm) for the keyword.
pub fn ground_truth(tenant: &str, filter: &GroundTruthFilter) -> Predicate {
    let mut decisions = Query::select();
    decisions
        .column(ground_truth_decision::Column::ImageId)
        .from(ground_truth_decision::Entity)
        .and_where(Expr::col(ground_truth_decision::Column::TenantId).eq(tenant));
    if let Some(keyword) = &filter.keyword {
        decisions.and_where(Expr::col(ground_truth_decision::Column::Keyword).eq(keyword.as_str()));
    }
    if let Some(category) = &filter.category {
        decisions
            .and_where(Expr::col(ground_truth_decision::Column::Category).eq(category.as_str()));
    }

    let mut condition = Condition::all();

    match filter.signum {
        Some(sign @ (1 | -1)) => {
            decisions.and_where(Expr::col(ground_truth_decision::Column::Sign).eq(sign));
            condition = condition.add(image::Column::Id.in_subquery(decisions));
        }
        Some(_) => {
            // signum 0: no decision in scope
            condition = condition.add(
                Expr::col((image::Entity, image::Column::Id)).not_in_subquery(decisions),
            );
        }
        None if filter.missing => {
            condition = condition.add(
                Expr::col((image::Entity, image::Column::Id)).not_in_subquery(decisions),
            );
        }
        None => {
            condition = condition.add(image::Column::Id.in_subquery(decisions));
        }
    }

    if filter.missing {
        // True absence: no prediction from any algorithm either. Validation
        // guarantees a keyword is present.
        let mut predictions = Query::select();
        predictions
            .column(predicted_tag::Column::ImageId)
            .from(predicted_tag::Entity)
            .and_where(Expr::col(predicted_tag::Column::TenantId).eq(tenant));
        if let Some(keyword) = &filter.keyword {
            predictions.and_where(Expr::col(predicted_tag::Column::Keyword).eq(keyword.as_str()));
        }
        condition = condition
            .add(Expr::col((image::Entity, image::Column::Id)).not_in_subquery(predictions));
    }

    Predicate::new(condition)
}

/// Effective-tag membership for one keyword: approved, or predicted above
/// the threshold by the resolved algorithm with no decision masking it.
pub fn keyword(tenant: &str, keyword: &str, params: &ResolveParams) -> Predicate {
    let mut approved = Query::select();
    approved
        .column(ground_truth_decision::Column::ImageId)
        .from(ground_truth_decision::Entity)
        .and_where(Expr::col(ground_truth_decision::Column::TenantId).eq(tenant))
        .and_where(Expr::col(ground_truth_decision::Column::Keyword).eq(keyword))
        .and_where(Expr::col(ground_truth_decision::Column::Sign).eq(1));

    let predicted = predicted_undecided(tenant, params, Some(keyword), None);

    Predicate::new(
        Condition::any()
            .add(image::Column::Id.in_subquery(approved))
            .add(image::Column::Id.in_subquery(predicted)),
    )
}

/// Effective-tag membership for a category: union over matching approve
/// decisions and matching undecided predictions.
pub fn category(tenant: &str, category: &str, params: &ResolveParams) -> Predicate {
    let mut approved = Query::select();
    approved
        .column(ground_truth_decision::Column::ImageId)
        .from(ground_truth_decision::Entity)
        .and_where(Expr::col(ground_truth_decision::Column::TenantId).eq(tenant))
        .and_where(Expr::col(ground_truth_decision::Column::Category).eq(category))
        .and_where(Expr::col(ground_truth_decision::Column::Sign).eq(1));

    let predicted = predicted_undecided(tenant, params, None, Some(category));

    Predicate::new(
        Condition::any()
            .add(image::Column::Id.in_subquery(approved))
            .add(image::Column::Id.in_subquery(predicted)),
    )
}

/// Identity subquery over predictions above the threshold whose
/// (image, keyword) pair carries no ground-truth decision. The decision
/// mask is a per-keyword LEFT JOIN, so a reject on one keyword never
/// bleeds into another.
pub(crate) fn predicted_undecided(
    tenant: &str,
    params: &ResolveParams,
    keyword: Option<&str>,
    category: Option<&str>,
) -> SelectStatement {
    let pt = Alias::new("pt");
    let d = Alias::new("d");

    let mut query = Query::select();
    query
        .column((pt.clone(), predicted_tag::Column::ImageId))
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
        .and_where(Expr::col((d, ground_truth_decision::Column::Id)).is_null());

    if let Some(keyword) = keyword {
        query.and_where(Expr::col((pt.clone(), predicted_tag::Column::Keyword)).eq(keyword));
    }
    if let Some(category) = category {
        query.and_where(Expr::col((pt, predicted_tag::Column::Category)).eq(category));
    }

    query
}
