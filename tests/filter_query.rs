//! Filter query behavior: dimension composition, rating NULL handling,
//! keyword membership consistency with tag resolution, pagination.

mod helpers;

use helpers::*;
use phototag_core::{
    AlgorithmId, Error, FilterCriteria, GroundTruthFilter, KeywordOperator, OrderBy,
    OrderDirection, RatingFilter, RatingOp,
};

fn ids(listing: &phototag_core::ImageListing) -> Vec<i32> {
    listing.items.iter().map(|i| i.id).collect()
}

#[tokio::test]
async fn keyword_filter_matches_effective_membership() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;

    let approved_only = seed_image(&catalog, TENANT, "a.jpg", None, false, 1).await;
    let predicted = seed_image(&catalog, TENANT, "b.jpg", None, false, 2).await;
    let rejected = seed_image(&catalog, TENANT, "c.jpg", None, false, 3).await;
    let below = seed_image(&catalog, TENANT, "d.jpg", None, false, 4).await;

    approve(&catalog, TENANT, approved_only, "dog").await;
    predict(&catalog, TENANT, predicted, "dog", 0.9, AlgorithmId::Siglip).await;
    predict(&catalog, TENANT, rejected, "dog", 0.9, AlgorithmId::Siglip).await;
    reject(&catalog, TENANT, rejected, "dog").await;
    predict(&catalog, TENANT, below, "dog", 0.3, AlgorithmId::Siglip).await;

    let listing = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                keywords: vec!["dog".into()],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(listing.total, 2);
    let matched = ids(&listing);
    assert!(matched.contains(&approved_only));
    assert!(matched.contains(&predicted));
    assert!(!matched.contains(&rejected));
    assert!(!matched.contains(&below));
}

#[tokio::test]
async fn keyword_operator_and_intersects_or_unions() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;

    let both = seed_image(&catalog, TENANT, "a.jpg", None, false, 1).await;
    let dog_only = seed_image(&catalog, TENANT, "b.jpg", None, false, 2).await;
    let cat_only = seed_image(&catalog, TENANT, "c.jpg", None, false, 3).await;

    predict(&catalog, TENANT, both, "dog", 0.9, AlgorithmId::Siglip).await;
    predict(&catalog, TENANT, both, "cat", 0.9, AlgorithmId::Siglip).await;
    predict(&catalog, TENANT, dog_only, "dog", 0.9, AlgorithmId::Siglip).await;
    predict(&catalog, TENANT, cat_only, "cat", 0.9, AlgorithmId::Siglip).await;

    let and = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                keywords: vec!["dog".into(), "cat".into()],
                keyword_operator: KeywordOperator::And,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ids(&and), vec![both]);

    let or = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                keywords: vec!["dog".into(), "cat".into()],
                keyword_operator: KeywordOperator::Or,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(or.total, 3);
}

#[tokio::test]
async fn hide_zero_rating_keeps_unrated_images() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;

    let unrated = seed_image(&catalog, TENANT, "a.jpg", None, false, 1).await;
    let zero = seed_image(&catalog, TENANT, "b.jpg", Some(0), false, 2).await;
    let rated = seed_image(&catalog, TENANT, "c.jpg", Some(4), false, 3).await;

    let listing = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                hide_zero_rating: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let matched = ids(&listing);
    assert!(matched.contains(&unrated), "NULL rating must survive");
    assert!(!matched.contains(&zero));
    assert!(matched.contains(&rated));
}

#[tokio::test]
async fn exclude_unrated_is_a_separate_dimension() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;

    let unrated = seed_image(&catalog, TENANT, "a.jpg", None, false, 1).await;
    let zero = seed_image(&catalog, TENANT, "b.jpg", Some(0), false, 2).await;

    let listing = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                exclude_unrated: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let matched = ids(&listing);
    assert!(!matched.contains(&unrated));
    assert!(matched.contains(&zero), "zero is rated, not unrated");
}

#[tokio::test]
async fn rating_comparison_excludes_null() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;

    seed_image(&catalog, TENANT, "a.jpg", None, false, 1).await;
    let three = seed_image(&catalog, TENANT, "b.jpg", Some(3), false, 2).await;
    let five = seed_image(&catalog, TENANT, "c.jpg", Some(5), false, 3).await;
    seed_image(&catalog, TENANT, "d.jpg", Some(1), false, 4).await;

    let listing = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                rating: Some(RatingFilter {
                    op: RatingOp::Gte,
                    value: 3,
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let mut matched = ids(&listing);
    matched.sort_unstable();
    let mut expected = vec![three, five];
    expected.sort_unstable();
    assert_eq!(matched, expected);
}

#[tokio::test]
async fn list_membership_restricts_the_scope() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;

    let in_list = seed_image(&catalog, TENANT, "a.jpg", None, false, 1).await;
    let outside = seed_image(&catalog, TENANT, "b.jpg", None, false, 2).await;
    let list_id = seed_list(&catalog, TENANT, "favorites", &[in_list]).await;

    let listing = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                list_id: Some(list_id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(ids(&listing), vec![in_list]);
    assert!(!ids(&listing).contains(&outside));
}

#[tokio::test]
async fn unknown_or_foreign_list_is_not_found() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;
    seed_tenant(&catalog, OTHER_TENANT, AlgorithmId::Siglip, 0.5).await;
    seed_image(&catalog, TENANT, "a.jpg", None, false, 1).await;

    let err = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                list_id: Some(9999),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { entity: "list", .. }));

    // A real list, but owned by another tenant.
    let theirs = seed_image(&catalog, OTHER_TENANT, "b.jpg", None, false, 2).await;
    let list_id = seed_list(&catalog, OTHER_TENANT, "theirs", &[theirs]).await;
    let err = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                list_id: Some(list_id),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { entity: "list", .. }));
}

#[tokio::test]
async fn ground_truth_signum_dimensions() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;

    let approved = seed_image(&catalog, TENANT, "a.jpg", None, false, 1).await;
    let rejected = seed_image(&catalog, TENANT, "b.jpg", None, false, 2).await;
    let undecided = seed_image(&catalog, TENANT, "c.jpg", None, false, 3).await;

    approve(&catalog, TENANT, approved, "dog").await;
    reject(&catalog, TENANT, rejected, "dog").await;
    predict(&catalog, TENANT, undecided, "dog", 0.9, AlgorithmId::Siglip).await;

    let gt = |signum: i8| FilterCriteria {
        ground_truth: Some(GroundTruthFilter {
            keyword: Some("dog".into()),
            signum: Some(signum),
            ..Default::default()
        }),
        ..Default::default()
    };

    let approves = catalog.list_images(TENANT, &gt(1)).await.unwrap();
    assert_eq!(ids(&approves), vec![approved]);

    let rejects = catalog.list_images(TENANT, &gt(-1)).await.unwrap();
    assert_eq!(ids(&rejects), vec![rejected]);

    let none = catalog.list_images(TENANT, &gt(0)).await.unwrap();
    assert_eq!(ids(&none), vec![undecided]);
}

#[tokio::test]
async fn ground_truth_and_rating_dimensions_compose() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;

    let a = seed_image(&catalog, TENANT, "a.jpg", None, false, 1).await;
    let b = seed_image(&catalog, TENANT, "b.jpg", None, false, 2).await;
    let zero_rated = seed_image(&catalog, TENANT, "c.jpg", Some(0), false, 3).await;
    seed_image(&catalog, TENANT, "d.jpg", None, false, 4).await;

    approve(&catalog, TENANT, a, "dog").await;
    approve(&catalog, TENANT, b, "dog").await;
    approve(&catalog, TENANT, zero_rated, "dog").await;

    let listing = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                ground_truth: Some(GroundTruthFilter {
                    keyword: Some("dog".into()),
                    signum: Some(1),
                    ..Default::default()
                }),
                hide_zero_rating: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(listing.total, 2, "NULL-rated approves survive, zero drops");
    let matched = ids(&listing);
    assert!(matched.contains(&a));
    assert!(matched.contains(&b));
}

#[tokio::test]
async fn category_filter_unions_effective_tags() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;

    let animal_predicted = seed_image(&catalog, TENANT, "a.jpg", None, false, 1).await;
    let animal_approved = seed_image(&catalog, TENANT, "b.jpg", None, false, 2).await;
    let animal_rejected = seed_image(&catalog, TENANT, "c.jpg", None, false, 3).await;
    let place = seed_image(&catalog, TENANT, "d.jpg", None, false, 4).await;

    catalog
        .upsert_predicted_tag(TENANT, animal_predicted, "dog", "animals", 0.9, AlgorithmId::Siglip, "m")
        .await
        .unwrap();
    catalog
        .set_ground_truth(TENANT, animal_approved, "cat", "animals", phototag_core::TagSign::Approve, "tester")
        .await
        .unwrap();
    catalog
        .upsert_predicted_tag(TENANT, animal_rejected, "dog", "animals", 0.9, AlgorithmId::Siglip, "m")
        .await
        .unwrap();
    reject(&catalog, TENANT, animal_rejected, "dog").await;
    catalog
        .upsert_predicted_tag(TENANT, place, "beach", "places", 0.9, AlgorithmId::Siglip, "m")
        .await
        .unwrap();

    let listing = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                category: Some("animals".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let mut matched = ids(&listing);
    matched.sort_unstable();
    let mut expected = vec![animal_predicted, animal_approved];
    expected.sort_unstable();
    assert_eq!(matched, expected);
}

#[tokio::test]
async fn missing_requires_no_prediction_from_any_algorithm() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;

    let truly_missing = seed_image(&catalog, TENANT, "a.jpg", None, false, 1).await;
    let predicted_elsewhere = seed_image(&catalog, TENANT, "b.jpg", None, false, 2).await;

    // A prediction from a non-active algorithm still disqualifies.
    predict(&catalog, TENANT, predicted_elsewhere, "dog", 0.9, AlgorithmId::Clip).await;

    let listing = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                ground_truth: Some(GroundTruthFilter {
                    keyword: Some("dog".into()),
                    missing: true,
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(ids(&listing), vec![truly_missing]);
}

#[tokio::test]
async fn listing_never_crosses_tenants() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;
    seed_tenant(&catalog, OTHER_TENANT, AlgorithmId::Siglip, 0.5).await;

    let mine = seed_image(&catalog, TENANT, "a.jpg", None, false, 1).await;
    predict(&catalog, TENANT, mine, "dog", 0.9, AlgorithmId::Siglip).await;
    let theirs = seed_image(&catalog, OTHER_TENANT, "b.jpg", None, false, 2).await;
    predict(&catalog, OTHER_TENANT, theirs, "dog", 0.9, AlgorithmId::Siglip).await;

    let listing = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                keywords: vec!["dog".into()],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(ids(&listing), vec![mine]);
}

#[tokio::test]
async fn pages_partition_the_result_set() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;

    // Identical timestamps force the primary-key tie-break.
    let mut all = Vec::new();
    for i in 0..7 {
        all.push(seed_image(&catalog, TENANT, &format!("img{i}.jpg"), None, false, 1).await);
    }

    let mut seen = Vec::new();
    for page in 0u64..3 {
        let listing = catalog
            .list_images(
                TENANT,
                &FilterCriteria {
                    offset: page * 3,
                    limit: 3,
                    order_by: OrderBy::CapturedAt,
                    order_direction: OrderDirection::Asc,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(listing.total, 7);
        seen.extend(ids(&listing));
    }

    let mut sorted = seen.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 7, "no duplicates or gaps across pages");
}

#[tokio::test]
async fn ordering_is_stable_and_directional() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;

    let old = seed_image(&catalog, TENANT, "old.jpg", None, false, 10).await;
    let new = seed_image(&catalog, TENANT, "new.jpg", None, false, 1).await;

    let desc = catalog
        .list_images(TENANT, &FilterCriteria::default())
        .await
        .unwrap();
    assert_eq!(ids(&desc), vec![new, old]);

    let asc = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                order_direction: OrderDirection::Asc,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ids(&asc), vec![old, new]);
}

#[tokio::test]
async fn invalid_criteria_surface_as_errors_not_empty_results() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;

    let err = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                rating: Some(RatingFilter {
                    op: RatingOp::Eq,
                    value: 6,
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCriteria { .. }));

    let err = catalog
        .list_images(
            TENANT,
            &FilterCriteria {
                limit: 0,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCriteria { field: "limit", .. }));
}

#[tokio::test]
async fn page_items_carry_resolved_tags() {
    let catalog = catalog().await;
    seed_tenant(&catalog, TENANT, AlgorithmId::Siglip, 0.5).await;

    let img = seed_image(&catalog, TENANT, "a.jpg", None, false, 1).await;
    predict(&catalog, TENANT, img, "dog", 0.9, AlgorithmId::Siglip).await;
    approve(&catalog, TENANT, img, "sunset").await;

    let listing = catalog
        .list_images(TENANT, &FilterCriteria::default())
        .await
        .unwrap();
    assert_eq!(listing.items.len(), 1);
    let keywords: Vec<&str> = listing.items[0]
        .tags
        .iter()
        .map(|t| t.keyword.as_str())
        .collect();
    assert_eq!(keywords, vec!["sunset", "dog"]);
}
