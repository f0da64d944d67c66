//! Integration tests for the HTTP surface
//!
//! Drives the axum router end to end against an in-memory upstream:
//! - number windows across successive requests
//! - ranking endpoints, caching and failure mapping
//! - client vs server error status codes

#[cfg(test)]
mod server_integration_tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use std::collections::HashSet;
    use std::sync::Arc;
    use tallyflow::server::{router, AppState};
    use tallyflow::source::MemoryFetcher;
    use tallyflow::AggregatorConfig;
    use tower::ServiceExt;

    fn config(window_size: usize) -> AggregatorConfig {
        let window_size = window_size.to_string();
        AggregatorConfig::from_lookup(|key| match key {
            "API_BASE_URL" => Some("http://upstream.test".to_string()),
            "WINDOW_SIZE" => Some(window_size.clone()),
            _ => None,
        })
        .expect("config")
    }

    fn app(fetcher: Arc<MemoryFetcher>, window_size: usize) -> Router {
        router(AppState::new(&config(window_size), fetcher))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");
        let payload: Value = serde_json::from_slice(&body).expect("json body");
        (status, payload)
    }

    fn social_upstream() -> Arc<MemoryFetcher> {
        let fetcher = Arc::new(MemoryFetcher::new());
        fetcher
            .respond("users", json!({"users": {"1": "Ann", "2": "Bo", "3": "Cy"}}))
            .respond("users/1/posts", json!({"posts": [{"id": 10, "content": "a"}]}))
            .respond(
                "users/2/posts",
                json!({"posts": [{"id": 11, "content": "b"}, {"id": 14, "content": "c"}]}),
            )
            .respond("users/3/posts", json!({"posts": [{"id": 12, "content": "d"}]}))
            .respond("posts/10/comments", json!({"comments": [1, 2]}))
            .respond("posts/11/comments", json!({"comments": []}))
            .respond("posts/12/comments", json!({"comments": [1, 2]}))
            .respond("posts/14/comments", json!({"comments": [1]}));
        fetcher
    }

    #[tokio::test]
    async fn test_numbers_window_across_requests() {
        let fetcher = Arc::new(MemoryFetcher::new());
        let app = app(fetcher.clone(), 5);

        fetcher.respond("primes", json!({"numbers": [2, 3, 5]}));
        let (status, first) = get_json(app.clone(), "/numbers/p").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            first,
            json!({
                "windowPrevState": [],
                "windowCurrState": [2, 3, 5],
                "numbers": [2, 3, 5],
                "avg": 3.33
            })
        );

        fetcher.respond("primes", json!({"numbers": [3, 7]}));
        let (_, second) = get_json(app, "/numbers/p").await;
        assert_eq!(second["windowPrevState"], json!([2, 3, 5]));
        assert_eq!(second["windowCurrState"], json!([2, 3, 5, 7]));
        assert_eq!(second["avg"], json!(4.25));
    }

    #[tokio::test]
    async fn test_invalid_category_is_bad_request() {
        let fetcher = Arc::new(MemoryFetcher::new());
        let (status, payload) = get_json(app(fetcher.clone(), 5), "/numbers/z").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(payload["error"].as_str().unwrap().contains("'z'"));
        assert_eq!(fetcher.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_number_upstream_down_still_ok() {
        let fetcher = Arc::new(MemoryFetcher::new());
        fetcher.fail("even");

        let (status, payload) = get_json(app(fetcher, 5), "/numbers/e").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["numbers"], json!([]));
        assert_eq!(payload["avg"], json!(0.0));
    }

    #[tokio::test]
    async fn test_concurrent_number_requests_keep_window_invariants() {
        let fetcher = Arc::new(MemoryFetcher::new());
        fetcher.respond("rand", json!({"numbers": [4, 8, 15, 16, 23, 42, 4, 8]}));
        let app = app(fetcher.clone(), 4);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let app = app.clone();
                tokio::spawn(async move { get_json(app, "/numbers/r").await })
            })
            .collect();

        for handle in handles {
            let (status, payload) = handle.await.expect("task");
            assert_eq!(status, StatusCode::OK);

            let state: Vec<i64> = serde_json::from_value(payload["windowCurrState"].clone()).unwrap();
            assert!(state.len() <= 4);
            let unique: HashSet<i64> = state.iter().copied().collect();
            assert_eq!(unique.len(), state.len());
        }
        assert_eq!(fetcher.calls("rand"), 16);
    }

    #[tokio::test]
    async fn test_top_users_endpoint() {
        let fetcher = social_upstream();
        let app = app(fetcher.clone(), 10);

        let (status, payload) = get_json(app.clone(), "/users").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            payload,
            json!([
                {"userId": "2", "userName": "Bo", "postCount": 2},
                {"userId": "1", "userName": "Ann", "postCount": 1},
                {"userId": "3", "userName": "Cy", "postCount": 1}
            ])
        );

        let calls = fetcher.total_calls();
        let (_, cached) = get_json(app, "/users").await;
        assert_eq!(cached, payload);
        assert_eq!(fetcher.total_calls(), calls);
    }

    #[tokio::test]
    async fn test_popular_posts_endpoint() {
        let (status, payload) = get_json(app(social_upstream(), 10), "/posts?type=popular").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            payload,
            json!([
                {"id": 10, "content": "a", "commentCount": 2},
                {"id": 12, "content": "d", "commentCount": 2}
            ])
        );
    }

    #[tokio::test]
    async fn test_latest_posts_endpoint() {
        let (status, payload) = get_json(app(social_upstream(), 10), "/posts?type=latest").await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<u64> = payload
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![14, 12, 11, 10]);
    }

    #[tokio::test]
    async fn test_posts_type_validation() {
        let fetcher = social_upstream();

        let (missing, _) = get_json(app(fetcher.clone(), 10), "/posts").await;
        assert_eq!(missing, StatusCode::BAD_REQUEST);

        let (bad, payload) = get_json(app(fetcher.clone(), 10), "/posts?type=hot").await;
        assert_eq!(bad, StatusCode::BAD_REQUEST);
        assert!(payload["error"].as_str().unwrap().contains("popular"));

        assert_eq!(fetcher.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_ranking_upstream_failure_is_server_error() {
        let fetcher = social_upstream();
        fetcher.fail("users/3/posts");

        let (status, payload) = get_json(app(fetcher, 10), "/users").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(payload, json!({"error": "Failed to fetch top users"}));
    }

    #[tokio::test]
    async fn test_healthz() {
        let (status, payload) = get_json(app(Arc::new(MemoryFetcher::new()), 10), "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload, json!({"status": "ok"}));
    }
}
