//! Integration tests for the PostgREST gateway.
//!
//! A fake PostgREST server runs on a local port; the real `RestGateway`
//! talks to it over HTTP.

use axum::http::StatusCode;
use serde_json::json;
use vegore_core::{DietPlan, HealthArticle, Order, PlanCategory};
use vegore_integration_tests::{ANON_KEY, FakePostgrest, fixtures, gateway_for, seeded_service};
use vegore_storefront::gateway::{
    Collection, DataGateway, GatewayError, MemoryGateway, OrderBy, Query, fetch,
};

// ============================================================================
// Queries
// ============================================================================

#[tokio::test]
async fn test_query_sends_postgrest_parameters_and_headers() {
    let service = seeded_service().await.expect("spawn service");
    let gateway = gateway_for(&service, ANON_KEY).expect("gateway");

    let query = Query::new(Collection::DietPlans)
        .eq("category", PlanCategory::MuscleGain)
        .order_by(OrderBy::descending("created_at"))
        .limit(3);
    let plans: Vec<DietPlan> = fetch(&gateway, &query).await.expect("fetch plans");

    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].name, "Lean Muscle");

    let requests = service.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "GET");
    assert_eq!(request.table, "diet_plans");
    assert_eq!(
        request.query.as_deref(),
        Some("select=*&category=eq.muscle-gain&order=created_at.desc&limit=3")
    );
    assert_eq!(request.api_key.as_deref(), Some(ANON_KEY));
    assert_eq!(
        request.authorization.as_deref(),
        Some(format!("Bearer {ANON_KEY}").as_str())
    );
}

#[tokio::test]
async fn test_query_orders_newest_first() {
    let service = seeded_service().await.expect("spawn service");
    let gateway = gateway_for(&service, ANON_KEY).expect("gateway");

    let query =
        Query::new(Collection::HealthArticles).order_by(OrderBy::descending("published_at"));
    let articles: Vec<HealthArticle> = fetch(&gateway, &query).await.expect("fetch articles");

    let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        ["Protein Myths", "Fiber, Explained", "Sleep and Recovery", "Walking Counts"]
    );
}

#[tokio::test]
async fn test_empty_table_is_empty_vec() {
    let service = FakePostgrest::spawn(MemoryGateway::new(), ANON_KEY)
        .await
        .expect("spawn service");
    let gateway = gateway_for(&service, ANON_KEY).expect("gateway");

    let rows = gateway
        .query(&Query::new(Collection::DietPlans))
        .await
        .expect("query");
    assert!(rows.is_empty());
}

// ============================================================================
// Inserts
// ============================================================================

#[tokio::test]
async fn test_insert_asks_for_representation() {
    let service = seeded_service().await.expect("spawn service");
    let gateway = gateway_for(&service, ANON_KEY).expect("gateway");

    let row = gateway
        .insert(
            Collection::Orders,
            json!({
                "diet_plan_id": fixtures::PLAN_IDS[0],
                "customer_name": "Jane Doe",
                "customer_email": "jane@example.com",
                "total_amount": 49.99,
                "status": "pending",
            }),
        )
        .await
        .expect("insert");

    let order: Order = serde_json::from_value(row).expect("decode order");
    assert_eq!(order.customer_name, "Jane Doe");

    let request = service.requests().pop().expect("request recorded");
    assert_eq!(request.method, "POST");
    assert_eq!(request.table, "orders");
    assert_eq!(request.prefer.as_deref(), Some("return=representation"));
    assert_eq!(service.backend().rows(Collection::Orders).len(), 1);
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_api_error_uses_postgrest_message() {
    let service = seeded_service().await.expect("spawn service");
    let gateway = gateway_for(&service, ANON_KEY).expect("gateway");
    service.fail_with(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"code":"XX000","message":"database is shutting down","details":null,"hint":null}"#,
    );

    let err = gateway
        .query(&Query::new(Collection::DietPlans))
        .await
        .expect_err("query should fail");

    match err {
        GatewayError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database is shutting down");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_wrong_key_is_rejected() {
    let service = seeded_service().await.expect("spawn service");
    let gateway = gateway_for(&service, "k9Xv2LmQ7rT4wZ8pN3bH6dF1sJ5yC0aE").expect("gateway");

    let err = gateway
        .query(&Query::new(Collection::DietPlans))
        .await
        .expect_err("query should fail");

    assert!(matches!(err, GatewayError::Api { status: 401, ref message } if message.starts_with("Invalid API key")));
}

#[tokio::test]
async fn test_unavailable_status() {
    let service = seeded_service().await.expect("spawn service");
    let gateway = gateway_for(&service, ANON_KEY).expect("gateway");
    service.fail_with(StatusCode::SERVICE_UNAVAILABLE, "");

    let err = gateway
        .insert(Collection::Orders, json!({}))
        .await
        .expect_err("insert should fail");
    assert!(matches!(err, GatewayError::Unavailable(_)));
}

#[tokio::test]
async fn test_unknown_category_fails_to_decode() {
    let backend = MemoryGateway::new().with_rows(
        Collection::DietPlans,
        [fixtures::plan(
            fixtures::PLAN_IDS[0],
            "Paleo Power",
            "paleo",
            45.0,
            "2024-01-01T00:00:00Z",
        )],
    );
    let service = FakePostgrest::spawn(backend, ANON_KEY)
        .await
        .expect("spawn service");
    let gateway = gateway_for(&service, ANON_KEY).expect("gateway");

    let err = fetch::<DietPlan>(&gateway, &Query::new(Collection::DietPlans))
        .await
        .expect_err("decode should fail");
    assert!(matches!(
        err,
        GatewayError::Decode {
            collection: Collection::DietPlans,
            ..
        }
    ));
}
