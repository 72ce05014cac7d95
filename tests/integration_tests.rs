// Integration tests for Vendor Recs

use actix_web::{http::StatusCode, test, web, App};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};
use std::sync::Arc;
use vendor_recs::core::{score_vendor, Ranker};
use vendor_recs::models::{Category, UserProfile};
use vendor_recs::routes::{self, recommendations::AppState};
use vendor_recs::services::{
    DataStore, RecommendError, RecommendationFeed, Recommender, RestClient, RestTables,
    SessionContext, SessionVerifier, VendorQuery, VendorSource,
};

const API_KEY: &str = "test_key";
const JWT_SECRET: &str = "integration-secret";

fn vendor_rows() -> Value {
    json!([
        {
            "id": "v-venue-plain",
            "name": "Plain Hall",
            "category": "venue",
            "region": "north",
            "starting_price_usd": 8000,
            "portfolio_images": [],
            "shortlist_count": 1,
            "description": null,
            "is_featured": false,
            "subscription_plan": "none",
            "status": "approved"
        },
        {
            "id": "v-venue-featured",
            "name": "Featured Garden",
            "category": "venue",
            "region": "beirut",
            "starting_price_usd": 2000,
            "portfolio_images": ["garden.jpg"],
            "shortlist_count": 12,
            "description": "A garden venue overlooking the sea with space for four hundred guests.",
            "is_featured": true,
            "subscription_plan": "pro",
            "status": "approved"
        },
        {
            "id": "v-unknown-region",
            "category": "venue",
            "region": "atlantis",
            "status": "approved"
        },
        {
            "id": "v-dj",
            "category": "dj",
            "region": "south",
            "starting_price_usd": 600,
            "shortlist_count": 3,
            "status": "approved"
        }
    ])
}

fn rest_client(server: &ServerGuard) -> RestClient {
    RestClient::new(server.url(), API_KEY.to_string(), RestTables::default()).unwrap()
}

async fn mock_vendors(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("GET", Matcher::Regex(r"^/rest/v1/vendors".to_string()))
        .match_query(Matcher::UrlEncoded("status".into(), "eq.approved".into()))
        .match_header("apikey", API_KEY)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(vendor_rows().to_string())
        .create_async()
        .await
}

async fn mock_profile(server: &mut ServerGuard, budget: f64) -> mockito::Mock {
    server
        .mock("GET", Matcher::Regex(r"^/rest/v1/profiles".to_string()))
        .match_query(Matcher::UrlEncoded("id".into(), "eq.user-1".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([{ "id": "user-1", "estimated_budget_usd": budget }]).to_string())
        .create_async()
        .await
}

fn app_state(server: &ServerGuard, verifier: Option<SessionVerifier>) -> AppState {
    let store = Arc::new(DataStore::Rest(rest_client(server)));
    AppState {
        store: Arc::clone(&store),
        recommender: Recommender::new(store, Ranker::default()),
        verifier: verifier.map(Arc::new),
        default_categories: vec![Category::Venue, Category::Dj, Category::Flowers],
    }
}

fn bearer_for(sub: &str) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let exp = chrono::Utc::now().timestamp() + 3600;
    let token = encode(
        &Header::default(),
        &json!({ "sub": sub, "exp": exp, "aud": "authenticated" }),
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

#[tokio::test]
async fn test_rest_client_keeps_vendor_with_unknown_region() {
    let mut server = Server::new_async().await;
    let mock = mock_vendors(&mut server).await;

    let vendors = rest_client(&server).fetch_approved_vendors(&[]).await.unwrap();

    mock.assert_async().await;
    assert_eq!(vendors.len(), 4);

    let unknown = vendors.iter().find(|v| v.id == "v-unknown-region").unwrap();
    assert_eq!(unknown.region, None);
    assert_eq!(unknown.category, Some(Category::Venue));

    // no adjacency bonus even with a profile
    let profile = UserProfile::with_budget(20_000.0);
    assert_eq!(score_vendor(unknown, Some(&profile)), 0);
}

#[tokio::test]
async fn test_rest_client_skips_rows_with_unknown_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/vendors".to_string()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                { "id": "v-ok", "subscription_plan": "basic", "shortlist_count": -2, "status": "approved" },
                { "id": "v-bad", "status": "archived" },
                { "status": "approved" }
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let vendors = rest_client(&server).fetch_approved_vendors(&[]).await.unwrap();

    assert_eq!(vendors.len(), 1);
    assert_eq!(vendors[0].id, "v-ok");
    assert_eq!(vendors[0].subscription_plan, None);
    assert_eq!(vendors[0].shortlist_count, 0);
}

#[tokio::test]
async fn test_rest_client_sends_category_filter() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/vendors".to_string()))
        .match_query(Matcher::UrlEncoded("category".into(), "in.(venue,dj)".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let vendors = rest_client(&server)
        .fetch_approved_vendors(&[Category::Venue, Category::Dj])
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(vendors.is_empty());
}

#[tokio::test]
async fn test_rest_client_profile_absent() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/profiles".to_string()))
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let profile = rest_client(&server).fetch_user_profile("nobody").await.unwrap();
    assert!(profile.is_none());
}

#[tokio::test]
async fn test_recommender_reports_fetch_failure() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/vendors".to_string()))
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let recommender = Recommender::new(Arc::new(rest_client(&server)), Ranker::default());
    let result = recommender
        .recommend(&SessionContext::anonymous(), &VendorQuery::default())
        .await;

    assert!(matches!(result, Err(RecommendError::FetchFailed { resource: "vendors", .. })));
}

#[tokio::test]
async fn test_feed_keeps_ranking_when_store_goes_down() {
    let mut server = Server::new_async().await;
    let healthy = mock_vendors(&mut server).await;

    let recommender = Recommender::new(Arc::new(rest_client(&server)), Ranker::default());
    let mut feed = RecommendationFeed::new(recommender, VendorQuery::default());
    let session = SessionContext::anonymous();

    let first: Vec<String> = feed
        .refresh(&session)
        .await
        .unwrap()
        .iter()
        .map(|s| s.vendor.id.clone())
        .collect();
    assert_eq!(first[0], "v-venue-featured");

    healthy.remove_async().await;
    let _down = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/vendors".to_string()))
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    assert!(feed.refresh(&session).await.is_err());

    let kept: Vec<String> = feed
        .current()
        .unwrap()
        .iter()
        .map(|s| s.vendor.id.clone())
        .collect();
    assert_eq!(kept, first);
}

#[actix_web::test]
async fn test_route_anonymous_recommendations() {
    let mut server = Server::new_async().await;
    let _mock = mock_vendors(&mut server).await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(&server, None)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations/vendors")
        .set_json(json!({ "category": "venue", "excludeIds": ["v-venue-plain"] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let vendors = body["vendors"].as_array().unwrap();
    assert_eq!(vendors.len(), 2);
    assert_eq!(vendors[0]["id"], "v-venue-featured");
    assert_eq!(vendors[0]["score"], 175);
    assert_eq!(vendors[1]["id"], "v-unknown-region");
    assert_eq!(vendors[1]["score"], 0);
    assert_eq!(body["total"], 2);
}

#[actix_web::test]
async fn test_route_signed_in_recommendations_use_profile() {
    let mut server = Server::new_async().await;
    let _vendors = mock_vendors(&mut server).await;
    let _profile = mock_profile(&mut server, 20_000.0).await;

    let verifier = SessionVerifier::new(JWT_SECRET, Some("authenticated"));
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(&server, Some(verifier))))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations/vendors")
        .insert_header(("Authorization", bearer_for("user-1")))
        .set_json(json!({ "limit": 2 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let vendors = body["vendors"].as_array().unwrap();
    assert_eq!(vendors.len(), 2);
    assert_eq!(vendors[0]["id"], "v-venue-featured");
    assert_eq!(vendors[0]["score"], 210);
}

#[actix_web::test]
async fn test_route_rejects_bad_token() {
    let server = Server::new_async().await;

    let verifier = SessionVerifier::new("another-secret", None);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(&server, Some(verifier))))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations/vendors")
        .insert_header(("Authorization", bearer_for("user-1")))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_route_fetch_failure_is_bad_gateway() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", Matcher::Regex(r"^/rest/v1/vendors".to_string()))
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(&server, None)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations/vendors")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "fetch_failed");
}

#[actix_web::test]
async fn test_route_by_category_keeps_empty_categories() {
    let mut server = Server::new_async().await;
    let _mock = mock_vendors(&mut server).await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(&server, None)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations/by-category")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let categories = body["categories"].as_object().unwrap();
    assert_eq!(categories.len(), 3);
    assert_eq!(categories["venue"].as_array().unwrap().len(), 3);
    assert_eq!(categories["dj"].as_array().unwrap().len(), 1);
    assert!(categories["flowers"].as_array().unwrap().is_empty());
    // category policy: 50 + 20 + 20 + 10 + 5
    assert_eq!(categories["venue"][0]["score"], 105);
}

#[actix_web::test]
async fn test_route_rejects_invalid_limit() {
    let server = Server::new_async().await;

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(app_state(&server, None)))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations/vendors")
        .set_json(json!({ "limit": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_route_rejects_limit_above_cap() {
    let mut server = Server::new_async().await;
    let _mock = mock_vendors(&mut server).await;

    let mut state = app_state(&server, None);
    state.recommender = Recommender::new(Arc::clone(&state.store), Ranker::new(10, 3, 2));

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations/vendors")
        .set_json(json!({ "limit": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations/by-category")
        .set_json(json!({ "limit": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations/vendors")
        .set_json(json!({ "limit": 2 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
