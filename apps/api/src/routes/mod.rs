pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::advisor::handlers as advisor;
use crate::jobs::handlers as jobs;
use crate::profile::handlers as profile;
use crate::session::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route("/api/v1/sessions/:id", get(sessions::handle_get_session))
        // Advisor
        .route(
            "/api/v1/sessions/:id/chat",
            post(advisor::handle_chat).delete(sessions::handle_clear_chat),
        )
        .route(
            "/api/v1/sessions/:id/recommendations/refresh",
            post(advisor::handle_refresh_recommendations),
        )
        .route(
            "/api/v1/sessions/:id/roadmap/refresh",
            post(advisor::handle_refresh_roadmap),
        )
        .route(
            "/api/v1/sessions/:id/news",
            get(advisor::handle_get_news).post(advisor::handle_generate_news),
        )
        // Profile
        .route("/api/v1/sessions/:id/profile", post(profile::handle_save_profile))
        // Jobs
        .route("/api/v1/jobs/search", get(jobs::handle_search))
        .route("/api/v1/jobs/link", get(jobs::handle_link))
        .route("/api/v1/jobs/parse", post(jobs::handle_parse))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{test_state, FakeIndex, FakeLlm};

    const RECOMMENDATIONS: &str = "Here are your matches:\n\
        • Data Scientist at Acme | Python, SQL | Great fit\n\
        • Analytics Engineer | dbt | Growing field\n\
        • Something without structure";

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn new_session(router: &Router) -> String {
        let (status, body) = send(router, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let router = build_router(test_state(
            Arc::new(FakeLlm::with_reply("")),
            Arc::new(FakeIndex::default()),
        ));
        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_chat_accumulates_history() {
        let llm = Arc::new(FakeLlm::with_reply("Learn SQL."));
        let router = build_router(test_state(llm.clone(), Arc::new(FakeIndex::default())));
        let id = new_session(&router).await;
        let uri = format!("/api/v1/sessions/{id}/chat");

        send(&router, Method::POST, &uri, Some(json!({"message": "First?"}))).await;
        let (status, body) =
            send(&router, Method::POST, &uri, Some(json!({"message": "Second?"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "Learn SQL.");
        assert_eq!(body["messages"].as_array().unwrap().len(), 4);

        // system + 2 prior turns + new question
        let (messages, _) = llm.last_call().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].content, "First?");
    }

    #[tokio::test]
    async fn test_chat_failure_is_ok_with_apology() {
        let router = build_router(test_state(
            Arc::new(FakeLlm::failing("service unavailable")),
            Arc::new(FakeIndex::default()),
        ));
        let id = new_session(&router).await;

        let (status, body) = send(
            &router,
            Method::POST,
            &format!("/api/v1/sessions/{id}/chat"),
            Some(json!({"message": "Hello"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let reply = body["reply"].as_str().unwrap();
        assert!(reply.starts_with("I apologize"));
        assert!(reply.contains("service unavailable"));
        assert_eq!(body["error"]["kind"], "chat");
    }

    #[tokio::test]
    async fn test_empty_chat_message_rejected_before_remote_call() {
        let llm = Arc::new(FakeLlm::with_reply("unused"));
        let router = build_router(test_state(llm.clone(), Arc::new(FakeIndex::default())));
        let id = new_session(&router).await;

        let (status, body) = send(
            &router,
            Method::POST,
            &format!("/api/v1/sessions/{id}/chat"),
            Some(json!({"message": "   "})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_clear_chat() {
        let router = build_router(test_state(
            Arc::new(FakeLlm::with_reply("A")),
            Arc::new(FakeIndex::default()),
        ));
        let id = new_session(&router).await;
        let uri = format!("/api/v1/sessions/{id}/chat");
        send(&router, Method::POST, &uri, Some(json!({"message": "Q"}))).await;

        let (status, _) = send(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, session) = send(&router, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert!(session["messages"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let router = build_router(test_state(
            Arc::new(FakeLlm::with_reply("")),
            Arc::new(FakeIndex::default()),
        ));
        let (status, _) = send(
            &router,
            Method::GET,
            "/api/v1/sessions/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_save_profile_generates_recommendations_and_roadmap() {
        let llm = Arc::new(FakeLlm::with_reply(RECOMMENDATIONS));
        let index = Arc::new(FakeIndex::default());
        let router = build_router(test_state(llm.clone(), index.clone()));
        let id = new_session(&router).await;

        let (status, body) = send(
            &router,
            Method::POST,
            &format!("/api/v1/sessions/{id}/profile"),
            Some(json!({"skills": "Python, SQL", "interests": "Data Scientist"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let profile_id = body["profile"]["profile_id"].as_str().unwrap();
        assert!(profile_id.starts_with("user_"));
        assert_eq!(index.records()[profile_id].values.len(), 8);

        let listings = body["recommendations"]["listings"].as_array().unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0]["company"], "Acme");
        assert_eq!(listings[1]["company"], "Various Companies");
        assert_eq!(body["recommendations"]["dropped_lines"], 1);
        assert_eq!(body["roadmap"]["text"], RECOMMENDATIONS);

        let (_, session) = send(&router, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(session["profile_saved"], true);
        assert_eq!(session["show_recommendations"], true);
        assert_eq!(session["current_jobs"], RECOMMENDATIONS);
    }

    #[tokio::test]
    async fn test_save_profile_requires_both_fields() {
        let index = Arc::new(FakeIndex::default());
        let router = build_router(test_state(Arc::new(FakeLlm::with_reply("")), index.clone()));
        let id = new_session(&router).await;

        let (status, body) = send(
            &router,
            Method::POST,
            &format!("/api/v1/sessions/{id}/profile"),
            Some(json!({"skills": "Python", "interests": ""})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Please enter both skills and interests");
        assert_eq!(index.upsert_calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_upsert_leaves_profile_unsaved() {
        let llm = Arc::new(FakeLlm::with_reply("unused"));
        let router = build_router(test_state(llm.clone(), Arc::new(FakeIndex::failing("down"))));
        let id = new_session(&router).await;

        let (status, body) = send(
            &router,
            Method::POST,
            &format!("/api/v1/sessions/{id}/profile"),
            Some(json!({"skills": "Go", "interests": "SRE"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to save profile to database"));
        assert_eq!(llm.call_count(), 0);

        let (_, session) = send(&router, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        assert_eq!(session["profile_saved"], false);
        assert_eq!(session["user_skills"], "Go");
    }

    #[tokio::test]
    async fn test_news_requires_saved_profile() {
        let router = build_router(test_state(
            Arc::new(FakeLlm::with_reply("news")),
            Arc::new(FakeIndex::default()),
        ));
        let id = new_session(&router).await;

        let (status, _) =
            send(&router, Method::POST, &format!("/api/v1/sessions/{id}/news"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) =
            send(&router, Method::GET, &format!("/api/v1/sessions/{id}/news"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_news_after_profile_is_kept_as_last_update() {
        let llm = Arc::new(FakeLlm::with_reply("• Big week for AI | hiring up"));
        let router = build_router(test_state(llm.clone(), Arc::new(FakeIndex::default())));
        let id = new_session(&router).await;
        send(
            &router,
            Method::POST,
            &format!("/api/v1/sessions/{id}/profile"),
            Some(json!({"skills": "Python", "interests": "AI"})),
        )
        .await;

        let (status, generated) =
            send(&router, Method::POST, &format!("/api/v1/sessions/{id}/news"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (messages, _) = llm.last_call().unwrap();
        assert_eq!(
            messages[1].content,
            "Generate a weekly industry news digest for: AI"
        );

        let (status, last) =
            send(&router, Method::GET, &format!("/api/v1/sessions/{id}/news"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(last["text"], generated["text"]);
        assert!(last["updated_label"].as_str().unwrap().starts_with("Last updated: "));
    }

    #[tokio::test]
    async fn test_refresh_requires_profile_inputs() {
        let router = build_router(test_state(
            Arc::new(FakeLlm::with_reply("x")),
            Arc::new(FakeIndex::default()),
        ));
        let id = new_session(&router).await;
        let (status, _) = send(
            &router,
            Method::POST,
            &format!("/api/v1/sessions/{id}/roadmap/refresh"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_job_search_links() {
        let router = build_router(test_state(
            Arc::new(FakeLlm::with_reply("")),
            Arc::new(FakeIndex::default()),
        ));
        let (status, body) = send(
            &router,
            Method::GET,
            "/api/v1/jobs/search?q=Python%20Developer",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let links = body["links"].as_array().unwrap();
        assert_eq!(links.len(), 4);
        assert_eq!(links[1]["platform"], "Indeed");
        assert_eq!(links[1]["url"], "https://www.indeed.com/jobs?q=Python+Developer");
    }

    #[tokio::test]
    async fn test_job_link_for_platform_key() {
        let router = build_router(test_state(
            Arc::new(FakeLlm::with_reply("")),
            Arc::new(FakeIndex::default()),
        ));
        let (_, indeed) = send(
            &router,
            Method::GET,
            "/api/v1/jobs/link?title=ML%20Engineer&company=Acme%20Corp&platform=Indeed",
            None,
        )
        .await;
        assert_eq!(indeed["url"], "https://www.indeed.com/jobs?q=ML+Engineer+Acme+Corp");

        let (_, fallback) = send(
            &router,
            Method::GET,
            "/api/v1/jobs/link?title=ML%20Engineer&platform=UnknownPlatform",
            None,
        )
        .await;
        assert_eq!(
            fallback["url"],
            "https://www.linkedin.com/jobs/search/?keywords=ML+Engineer"
        );
    }

    #[tokio::test]
    async fn test_job_search_rejects_blank_query() {
        let router = build_router(test_state(
            Arc::new(FakeLlm::with_reply("")),
            Arc::new(FakeIndex::default()),
        ));
        let (status, _) = send(&router, Method::GET, "/api/v1/jobs/search?q=%20", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
