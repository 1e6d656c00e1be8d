//! Filter criteria
//!
//! An immutable request value describing every filter dimension. Validated
//! before compilation; contradictory input fails with `InvalidCriteria` and
//! is never converted into a zero-match result.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Rating comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingOp {
    Eq,
    Gte,
    Gt,
    Lte,
    Lt,
}

/// A rating comparison against a 0..=5 value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingFilter {
    pub op: RatingOp,
    pub value: u8,
}

/// How multiple keyword fragments combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordOperator {
    #[default]
    And,
    Or,
}

/// Ground-truth filter dimension.
///
/// `signum` semantics: +1 matches approve decisions, -1 matches rejects,
/// 0 matches images with no decision at all for the keyword. With `signum`
/// unset, any decision matches. `missing` additionally requires that no
/// algorithm has a prediction for the keyword (true absence, for audit
/// workflows).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundTruthFilter {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub signum: Option<i8>,
    pub missing: bool,
}

/// Sort column for listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    #[default]
    CapturedAt,
    CreatedAt,
    Rating,
    FileName,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    Asc,
    #[default]
    Desc,
}

/// Maximum page size accepted by `validate`.
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Immutable filter request over one tenant's image collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Restrict to members of this list
    pub list_id: Option<i32>,
    /// Rating comparison
    pub rating: Option<RatingFilter>,
    /// Keep images rated non-zero, retaining unrated (NULL) images
    pub hide_zero_rating: bool,
    /// Drop images that were never rated (explicit opt-in, separate from
    /// `hide_zero_rating`)
    pub exclude_unrated: bool,
    /// Reviewed flag equality
    pub reviewed: Option<bool>,
    /// Ground-truth decision dimension
    pub ground_truth: Option<GroundTruthFilter>,
    /// Effective-tag keywords, combined per `keyword_operator`
    pub keywords: Vec<String>,
    pub keyword_operator: KeywordOperator,
    /// Effective-tag category dimension (union over matching tags)
    pub category: Option<String>,
    pub order_by: OrderBy,
    pub order_direction: OrderDirection,
    pub offset: u64,
    pub limit: u64,
    /// Recompute per-keyword facet counts alongside the page
    pub with_facets: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            list_id: None,
            rating: None,
            hide_zero_rating: false,
            exclude_unrated: false,
            reviewed: None,
            ground_truth: None,
            keywords: Vec::new(),
            keyword_operator: KeywordOperator::default(),
            category: None,
            order_by: OrderBy::default(),
            order_direction: OrderDirection::default(),
            offset: 0,
            limit: 100,
            with_facets: false,
        }
    }
}

impl FilterCriteria {
    /// Reject malformed or contradictory criteria before any compilation.
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(Error::invalid("limit", "must be at least 1"));
        }
        if self.limit > MAX_PAGE_SIZE {
            return Err(Error::invalid(
                "limit",
                format!("must be at most {MAX_PAGE_SIZE}"),
            ));
        }

        if let Some(rating) = &self.rating {
            if rating.value > 5 {
                return Err(Error::invalid(
                    "rating.value",
                    format!("{} outside 0..=5", rating.value),
                ));
            }
        }

        if let Some(gt) = &self.ground_truth {
            if let Some(signum) = gt.signum {
                if !(-1..=1).contains(&signum) {
                    return Err(Error::invalid(
                        "ground_truth.signum",
                        format!("{signum} outside -1..=1"),
                    ));
                }
            }
            if gt.missing && gt.keyword.is_none() {
                return Err(Error::invalid(
                    "ground_truth.missing",
                    "requires a keyword",
                ));
            }
            if gt.keyword.is_none() && gt.category.is_none() && gt.signum.is_none() && !gt.missing
            {
                return Err(Error::invalid(
                    "ground_truth",
                    "at least one of keyword, category, signum or missing is required",
                ));
            }
        }

        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(Error::invalid("keywords", "empty keyword"));
        }

        if let Some(category) = &self.category {
            if category.trim().is_empty() {
                return Err(Error::invalid("category", "empty category"));
            }
        }

        Ok(())
    }

    /// Copy of these criteria without the keyword/category dimensions, used
    /// by facet aggregation.
    pub fn without_keyword_dimension(&self) -> Self {
        Self {
            keywords: Vec::new(),
            category: None,
            ..self.clone()
        }
    }
}
