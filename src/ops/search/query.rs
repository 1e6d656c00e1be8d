//! Query composer
//!
//! Composes the per-dimension predicate fragments into one filter state and
//! runs count and page against it. Both read paths execute over the same
//! composed condition, so a page and its total can never disagree about
//! which images match.

use sea_orm::sea_query::{Query, SelectStatement};
use sea_orm::{
    Condition, DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use tracing::debug;

use crate::domain::ResolveParams;
use crate::error::Result;
use crate::infra::db::entities::image;
use crate::ops::search::input::{FilterCriteria, KeywordOperator, OrderBy, OrderDirection};
use crate::ops::search::predicate::{self, Predicate};

/// A validated, compiled filter state for one tenant.
pub struct ComposedQuery {
    condition: Condition,
    order_column: image::Column,
    direction: Order,
}

impl ComposedQuery {
    /// Validate the criteria and compile every requested dimension into one
    /// intersected condition.
    pub fn build(tenant: &str, criteria: &FilterCriteria, params: &ResolveParams) -> Result<Self> {
        criteria.validate()?;

        let mut fragments = vec![predicate::tenant_scope(tenant)];

        if let Some(list_id) = criteria.list_id {
            fragments.push(predicate::list_membership(list_id));
        }
        if let Some(rating) = &criteria.rating {
            fragments.push(predicate::rating(rating));
        }
        if criteria.hide_zero_rating {
            fragments.push(predicate::hide_zero_rating());
        }
        if criteria.exclude_unrated {
            fragments.push(predicate::exclude_unrated());
        }
        if let Some(reviewed) = criteria.reviewed {
            fragments.push(predicate::reviewed(reviewed));
        }
        if let Some(ground_truth) = &criteria.ground_truth {
            fragments.push(predicate::ground_truth(tenant, ground_truth));
        }
        if let Some(category) = &criteria.category {
            fragments.push(predicate::category(tenant, category, params));
        }
        if !criteria.keywords.is_empty() {
            let per_keyword = criteria
                .keywords
                .iter()
                .map(|keyword| predicate::keyword(tenant, keyword, params));
            fragments.push(match criteria.keyword_operator {
                KeywordOperator::And => Predicate::all(per_keyword),
                KeywordOperator::Or => Predicate::any(per_keyword),
            });
        }

        debug!(
            tenant,
            keywords = criteria.keywords.len(),
            algorithm = %params.algorithm,
            threshold = params.threshold,
            "composed filter query"
        );

        let order_column = match criteria.order_by {
            OrderBy::CapturedAt => image::Column::CapturedAt,
            OrderBy::CreatedAt => image::Column::CreatedAt,
            OrderBy::Rating => image::Column::Rating,
            OrderBy::FileName => image::Column::FileName,
        };
        let direction = match criteria.order_direction {
            OrderDirection::Asc => Order::Asc,
            OrderDirection::Desc => Order::Desc,
        };

        Ok(Self {
            condition: Predicate::all(fragments).into_condition(),
            order_column,
            direction,
        })
    }

    /// Total matching images, from the same composed state as `page`.
    pub async fn count(&self, db: &DatabaseConnection) -> Result<u64> {
        Ok(image::Entity::find()
            .filter(self.condition.clone())
            .count(db)
            .await?)
    }

    /// One ordered page of matching images. The primary key tie-break keeps
    /// pagination a stable partition when the sort column holds duplicates.
    pub async fn page(
        &self,
        db: &DatabaseConnection,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<image::Model>> {
        Ok(image::Entity::find()
            .filter(self.condition.clone())
            .order_by(self.order_column, self.direction.clone())
            .order_by(image::Column::Id, self.direction.clone())
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?)
    }

    /// Identity subquery over the composed state, for facet aggregation.
    pub(crate) fn scope_subquery(&self) -> SelectStatement {
        let mut query = Query::select();
        query
            .column((image::Entity, image::Column::Id))
            .from(image::Entity)
            .cond_where(self.condition.clone());
        query
    }
}
