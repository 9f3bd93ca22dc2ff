use axum::routing::{get, post};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{auth_handlers, health_handlers, record_handlers, stats_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handlers::health))
        .route("/auth/login", post(auth_handlers::login))
        .route("/auth/me", get(auth_handlers::current_session))
        .route("/stats", get(stats_handlers::get_stats))
        .route("/bans", get(record_handlers::list_bans))
        .route("/mutes", get(record_handlers::list_mutes))
        .route("/kicks", get(record_handlers::list_kicks))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use backend_application::testing::{
        moderation_row, FakeDirectory, FakeHistory, FakeRecords, Harness, ADMIN_PASS, ADMIN_USER,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const STEVE: &str = "069a79f4-44e9-4726-a5be-fca90e38aaf5";

    fn seeded_records() -> FakeRecords {
        let bans = (1..=12)
            .map(|id| {
                let uuid = if id % 3 == 0 { STEVE } else { "61699b2e-d327-4a01-9f1e-0ea8c3f06bc6" };
                moderation_row(id, uuid, "player", "x-ray")
            })
            .collect();
        let mutes = vec![moderation_row(1, STEVE, "Steve", "spam")];
        FakeRecords::default()
            .with_rows("litebans_bans", bans)
            .with_rows("litebans_mutes", mutes)
            .with_rows("litebans_kicks", Vec::new())
    }

    fn harness() -> Harness {
        Harness::new(
            seeded_records(),
            FakeHistory::default(),
            FakeDirectory::default().with_player("Steve", "069a79f444e94726a5befca90e38aaf5"),
        )
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.expect("response");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("json body")
        };
        (status, value)
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).expect("request")
    }

    fn login_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn token_for(router: &Router) -> String {
        let (status, body) = send(
            router.clone(),
            login_request(json!({ "username": ADMIN_USER, "password": ADMIN_PASS })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().expect("token").to_string()
    }

    fn ids(body: &Value) -> Vec<i64> {
        body["rows"]
            .as_array()
            .expect("rows")
            .iter()
            .filter_map(|row| row["id"].as_i64())
            .collect()
    }

    #[tokio::test]
    async fn health_reports_database_state() {
        let router = build_router(harness().state);
        let (status, body) = send(router, get("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));

        let down = Harness::new(
            FakeRecords::default().failing_ping(),
            FakeHistory::default(),
            FakeDirectory::default(),
        );
        let (status, body) = send(build_router(down.state), get("/health", None)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "ok": false, "error": "db" }));
    }

    #[tokio::test]
    async fn login_then_me_returns_claims() {
        let router = build_router(harness().state);
        let token = token_for(&router).await;

        let (status, body) = send(router, get("/auth/me", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["user"]["role"], json!("staff"));
        assert_eq!(body["user"]["username"], json!(ADMIN_USER));
        assert!(body["user"]["exp"].as_i64().is_some());
    }

    #[tokio::test]
    async fn bad_login_is_unauthorized_without_token() {
        let router = build_router(harness().state);
        let (status, body) = send(
            router.clone(),
            login_request(json!({ "username": ADMIN_USER, "password": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Bad credentials" }));

        let garbage = Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .expect("request");
        let (status, body) = send(router, garbage).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.get("token").is_none());
    }

    #[tokio::test]
    async fn protected_routes_require_a_valid_token() {
        let router = build_router(harness().state);
        for uri in ["/auth/me", "/stats", "/bans", "/mutes", "/kicks"] {
            let (status, body) = send(router.clone(), get(uri, None)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
            assert_eq!(body, json!({ "error": "Missing token" }));

            let (status, body) = send(router.clone(), get(uri, Some("forged.token.value"))).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
            assert_eq!(body, json!({ "error": "Invalid token" }));
        }
    }

    #[tokio::test]
    async fn token_stops_working_after_twelve_hours() {
        let harness = harness();
        let router = build_router(harness.state.clone());
        let token = token_for(&router).await;

        harness.clock.advance(chrono::Duration::hours(12));
        let (status, _) = send(router, get("/bans", Some(&token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn bans_are_paged_newest_first() {
        let router = build_router(harness().state);
        let token = token_for(&router).await;

        let (status, body) = send(router.clone(), get("/bans?limit=4&offset=1", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec![11, 10, 9, 8]);

        let (_, body) = send(router, get("/bans?limit=abc&offset=-5", Some(&token))).await;
        assert_eq!(ids(&body), (1..=12).rev().collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn repeated_query_keys_are_checked_after_auth() {
        let router = build_router(harness().state);
        let (status, body) = send(router.clone(), get("/bans?limit=1&limit=2", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Missing token" }));

        let token = token_for(&router).await;
        let (status, body) = send(router, get("/bans?limit=2&limit=50", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec![12, 11]);
    }

    #[tokio::test]
    async fn name_search_resolves_through_directory() {
        let harness = harness();
        let router = build_router(harness.state.clone());
        let token = token_for(&router).await;

        let (status, body) = send(router, get("/bans?q=Steve&limit=5", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec![12, 9, 6, 3]);
        let last = harness.records.calls().pop().expect("list call");
        assert_eq!(last.filter.as_deref(), Some(STEVE));
        assert_eq!(last.page.limit, 5);
    }

    #[tokio::test]
    async fn unknown_name_yields_empty_rows() {
        let router = build_router(harness().state);
        let token = token_for(&router).await;

        let (status, body) = send(router, get("/mutes?q=Ghost", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "rows": [] }));
    }

    #[tokio::test]
    async fn stats_counts_all_tables() {
        let router = build_router(harness().state);
        let token = token_for(&router).await;

        let (status, body) = send(router, get("/stats", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "bans": 12, "mutes": 1, "kicks": 0 }));
    }

    #[tokio::test]
    async fn stats_fail_as_a_whole() {
        let harness = Harness::new(
            seeded_records().failing_table("litebans_mutes"),
            FakeHistory::default(),
            FakeDirectory::default(),
        );
        let router = build_router(harness.state);
        let token = token_for(&router).await;

        let (status, body) = send(router, get("/stats", Some(&token))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.get("bans").is_none());
        assert_eq!(
            body,
            json!({ "error": "Failed to query stats. Check table names in config." })
        );
    }

    #[tokio::test]
    async fn listing_failure_returns_generic_message() {
        let harness = Harness::new(
            seeded_records().failing_table("litebans_kicks"),
            FakeHistory::default(),
            FakeDirectory::default(),
        );
        let router = build_router(harness.state);
        let token = token_for(&router).await;

        let (status, body) = send(router, get("/kicks", Some(&token))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["error"].as_str().expect("message");
        assert!(message.starts_with("Query failed"));
        assert!(!message.contains("doesn't exist"));
    }
}
