pub mod approvals;
pub mod auth;
pub mod cache;
pub mod client_emails;
pub mod feedback;
pub mod feeds;
pub mod health;
pub mod metrics;
pub mod scheduler;
pub mod swagger;

use crate::{middleware, utils::AppError};
use actix_web::web;

/// JSON extractor settings: body size limit, malformed bodies answered as 400.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default().limit(limit).error_handler(|err, req| {
        log::warn!("⚠️ Rejected JSON body on {}: {}", req.path(), err);
        AppError::InvalidRequest(format!("Invalid JSON body: {}", err)).into()
    })
}

/// Every API route. Static files and Swagger UI are mounted by `main`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Auth endpoints
        .service(
            web::scope("/auth")
                .route("/google", web::get().to(auth::google_auth))
                .route("/google/callback", web::get().to(auth::google_callback))
                .route("/status", web::get().to(auth::auth_status))
                .route("/logout", web::post().to(auth::logout)),
        )
        // ==================== EDITOR (session required) ====================
        .service(
            web::scope("/api/feeds")
                .wrap(middleware::auth::AuthMiddleware)
                .route("", web::get().to(feeds::list_feeds))
                .route("", web::post().to(feeds::create_feed))
                .route("/{id}", web::get().to(feeds::get_feed))
                .route("/{id}", web::delete().to(feeds::delete_feed)),
        )
        .service(
            web::scope("/api/presets")
                .route("", web::get().to(feeds::list_presets))
                .route("", web::post().to(feeds::save_presets)),
        )
        // ==================== CLIENT REVIEW (open) ====================
        .route("/api/public/feeds/{id}", web::get().to(feeds::get_public_feed))
        .service(
            web::scope("/api/client-email")
                .route("", web::post().to(client_emails::log_email))
                .route("/{feedId}", web::get().to(client_emails::list_emails)),
        )
        .service(
            web::scope("/api/feedback")
                .route("", web::post().to(feedback::save_feedback))
                .route("/like", web::patch().to(feedback::set_like))
                .route("/comment", web::patch().to(feedback::add_comment))
                .route("/comment", web::delete().to(feedback::delete_comment))
                .route("/{feedId}", web::get().to(feedback::get_feedback)),
        )
        .service(
            web::scope("/api/approvals")
                .route("", web::post().to(approvals::submit_approval))
                .route("/{feedId}", web::get().to(approvals::list_approvals)),
        )
        // ==================== SCHEDULER ====================
        .service(
            web::scope("/api/scheduler")
                .route("", web::post().to(scheduler::create_plan))
                .route("/feed/{feedId}", web::get().to(scheduler::list_feed_plans))
                .route("/{schedulerId}", web::get().to(scheduler::get_plan))
                .route("/{schedulerId}/post/{postId}", web::patch().to(scheduler::update_post)),
        )
        // ==================== MEDIA CACHE ====================
        .service(
            web::scope("/api/cache")
                .route("/download", web::post().to(cache::download))
                .route("/delete", web::post().to(cache::delete)),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{test_config, AppConfig},
        database::{collections, JsonStore},
        models::{User, UsersFile},
        services::{auth_service, MediaCache, MediaFetcher},
        utils::ids,
    };
    use actix_web::{
        http::{header, Method, StatusCode},
        test, App,
    };
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    struct FixedBytes;

    #[async_trait]
    impl MediaFetcher for FixedBytes {
        async fn fetch(&self, _url: &str) -> Result<Vec<u8>, AppError> {
            Ok(vec![0xff, 0xd8, 0xff])
        }
    }

    struct Harness {
        _data: tempfile::TempDir,
        _cache: tempfile::TempDir,
        store: JsonStore,
        config: AppConfig,
        cache: MediaCache,
    }

    impl Harness {
        async fn new() -> Self {
            let data = tempfile::tempdir().unwrap();
            let cache_dir = tempfile::tempdir().unwrap();
            let config = test_config(data.path(), cache_dir.path());
            let store = JsonStore::new(data.path());
            let cache = MediaCache::new(cache_dir.path(), Arc::new(FixedBytes), Duration::from_secs(3600));
            cache.initialize().await.unwrap();
            Harness { _data: data, _cache: cache_dir, store, config, cache }
        }

        async fn sign_in(&self, google_id: &str) -> String {
            let user = User {
                id: format!("google_{}", google_id),
                google_id: google_id.to_string(),
                email: format!("{}@example.com", google_id),
                name: String::new(),
                picture: String::new(),
                created_at: ids::now_iso(),
                last_login: ids::now_iso(),
            };
            self.store
                .update(collections::USERS, |file: &mut UsersFile| {
                    file.users.push(user.clone());
                    Ok(())
                })
                .await
                .unwrap();
            auth_service::issue_session_token(&self.config.jwt, &user).unwrap()
        }
    }

    macro_rules! app {
        ($h:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($h.store.clone()))
                    .app_data(web::Data::new($h.config.clone()))
                    .app_data(web::Data::new($h.cache.clone()))
                    .app_data(json_config($h.config.json_limit))
                    .wrap(middleware::RequestMetrics)
                    .configure(routes),
            )
            .await
        };
    }

    /// Sends a request and returns the status with the JSON body (`null` when empty).
    macro_rules! call {
        ($app:expr, $req:expr $(,)?) => {{
            let resp = test::call_service(&$app, $req).await;
            let status = resp.status();
            let body = test::read_body(resp).await;
            let json: Value = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap() };
            (status, json)
        }};
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> test::TestRequest {
        let mut req = test::TestRequest::default().method(method).uri(uri);
        if let Some(token) = token {
            req = req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)));
        }
        match body {
            Some(body) => req.set_json(body),
            None => req,
        }
    }

    #[actix_web::test]
    async fn test_feed_routes_require_session_and_ownership() {
        let h = Harness::new().await;
        let ana = h.sign_in("1").await;
        let bia = h.sign_in("2").await;
        let app = app!(h);

        let (status, body) = call!(app, request(Method::GET, "/api/feeds", None, None).to_request());
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Authentication required" }));

        let (status, body) = call!(app, request(Method::GET, "/api/feeds", Some("garbage"), None).to_request());
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authentication required");

        let new_feed = json!({
            "name": "Launch week",
            "state": {
                "accountInfo": { "name": "acme", "pfp": "", "followers": "1k", "following": "10", "bio": "" },
                "posts": [{ "id": "p1", "type": "post", "caption": "hi", "url": "https://x/a.jpg" }],
                "activeTab": "grid"
            }
        });
        let (status, created) = call!(app, request(Method::POST, "/api/feeds", Some(ana.as_str()), Some(new_feed)).to_request());
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["type"], "Grid");
        assert_eq!(created["userId"], "google_1");
        assert_eq!(created["state"]["activeTab"], "grid");
        let id = created["id"].as_i64().unwrap();

        let (_, mine) = call!(app, request(Method::GET, "/api/feeds", Some(ana.as_str()), None).to_request());
        assert_eq!(mine.as_array().unwrap().len(), 1);
        let (_, theirs) = call!(app, request(Method::GET, "/api/feeds", Some(bia.as_str()), None).to_request());
        assert_eq!(theirs, json!([]));

        let uri = format!("/api/feeds/{}", id);
        let (status, body) = call!(app, request(Method::GET, &uri, Some(bia.as_str()), None).to_request());
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Access denied");
        let (status, _) = call!(app, request(Method::DELETE, &uri, Some(bia.as_str()), None).to_request());
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, public) = call!(app, request(Method::GET, &format!("/api/public/feeds/{}", id), None, None).to_request());
        assert_eq!(status, StatusCode::OK);
        assert_eq!(public["name"], "Launch week");

        let (status, body) = call!(app, request(Method::DELETE, &uri, Some(ana.as_str()), None).to_request());
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Feed deleted successfully");
        let (status, _) = call!(app, request(Method::GET, &uri, Some(ana.as_str()), None).to_request());
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_review_cycle_ends_in_frozen_approval() {
        let h = Harness::new().await;
        let app = app!(h);
        let client = json!({ "feedId": 1714567890123_i64, "email": "client@brand.co" });

        let (status, _) = call!(app, request(Method::POST, "/api/client-email", None, Some(client.clone())).to_request());
        assert_eq!(status, StatusCode::CREATED);
        let (status, again) = call!(app, request(Method::POST, "/api/client-email", None, Some(client)).to_request());
        assert_eq!(status, StatusCode::OK);
        assert_eq!(again["alreadyExists"], true);

        let (status, _) = call!(
            app,
            request(Method::POST, "/api/client-email", None, Some(json!({ "feedId": 1, "email": "nope" }))).to_request(),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // The review page sends the id back as a string.
        let who = |extra: Value| {
            let mut body = json!({ "feedId": "1714567890123", "clientEmail": "client@brand.co" });
            body.as_object_mut().unwrap().extend(extra.as_object().unwrap().clone());
            body
        };

        let (status, _) = call!(app, request(Method::POST, "/api/approvals", None, Some(who(json!({})))).to_request());
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, liked) = call!(
            app,
            request(Method::PATCH, "/api/feedback/like", None, Some(who(json!({ "postId": "p1", "liked": true })))).to_request(),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(liked["feedback"]["posts"][0]["liked"], true);

        let (_, commented) = call!(
            app,
            request(Method::PATCH, "/api/feedback/comment", None, Some(who(json!({ "postId": "p1", "text": "Love it" })))).to_request(),
        );
        assert_eq!(commented["message"], "Comment added");
        let comment_id = commented["comment"]["id"].as_str().unwrap().to_string();

        let (status, submitted) = call!(app, request(Method::POST, "/api/approvals", None, Some(who(json!({})))).to_request());
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(submitted["approval"]["payload"]["posts"][0]["comments"], json!(["Love it"]));

        let (status, _) = call!(
            app,
            request(
                Method::DELETE,
                "/api/feedback/comment",
                None,
                Some(who(json!({ "postId": "p1", "commentId": comment_id }))),
            )
            .to_request(),
        );
        assert_eq!(status, StatusCode::OK);

        let (_, approvals) = call!(app, request(Method::GET, "/api/approvals/1714567890123", None, None).to_request());
        assert_eq!(approvals[0]["payload"]["posts"][0]["comments"], json!(["Love it"]));

        let (_, draft) = call!(
            app,
            request(Method::GET, "/api/feedback/1714567890123?email=client@brand.co", None, None).to_request(),
        );
        assert_eq!(draft["posts"][0]["comments"], json!([]));

        let (status, _) = call!(app, request(Method::GET, "/api/feedback/1714567890123", None, None).to_request());
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_scheduler_flags() {
        let h = Harness::new().await;
        let app = app!(h);

        let (status, _) = call!(app, request(Method::POST, "/api/scheduler", None, Some(json!({}))).to_request());
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, plan) = call!(app, request(Method::POST, "/api/scheduler", None, Some(json!({ "feedId": 9 }))).to_request());
        assert_eq!(status, StatusCode::OK);
        let id = plan["schedulerId"].as_i64().unwrap();

        let uri = format!("/api/scheduler/{}/post/p1", id);
        let update = json!({ "scheduled": true, "scheduledDate": "2026-11-02", "scheduledTime": "" });
        let (_, updated) = call!(app, request(Method::PATCH, &uri, None, Some(update)).to_request());
        assert_eq!(updated["posts"][0]["scheduled"], true);
        assert_eq!(updated["posts"][0]["scheduledDate"], "2026-11-02");
        assert!(updated["posts"][0].get("scheduledTime").is_none());

        let (_, plans) = call!(app, request(Method::GET, "/api/scheduler/feed/9", None, None).to_request());
        assert_eq!(plans.as_array().unwrap().len(), 1);

        let (status, _) = call!(app, request(Method::GET, "/api/scheduler/404", None, None).to_request());
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_cache_and_preset_endpoints() {
        let h = Harness::new().await;
        let app = app!(h);

        let (status, body) = call!(
            app,
            request(Method::POST, "/api/cache/download", None, Some(json!({ "type": "post", "id": 3 }))).to_request(),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required parameters");

        let download = json!({ "googleDriveUrl": "https://drive.google.com/file/d/abc/view", "type": "post", "id": 3 });
        let (status, cached) = call!(app, request(Method::POST, "/api/cache/download", None, Some(download)).to_request());
        assert_eq!(status, StatusCode::OK);
        let local_path = cached["localPath"].as_str().unwrap().to_string();
        assert!(local_path.starts_with("/CachedImages/posts/post_3_"));

        let (status, _) = call!(
            app,
            request(Method::POST, "/api/cache/delete", None, Some(json!({ "paths": "not-a-list" }))).to_request(),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, deleted) = call!(
            app,
            request(Method::POST, "/api/cache/delete", None, Some(json!({ "paths": [local_path] }))).to_request(),
        );
        assert_eq!(deleted, json!({ "deleted": 1, "message": "Cache files deleted" }));

        let (status, _) = call!(app, request(Method::POST, "/api/presets", None, Some(json!({ "name": "x" }))).to_request());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let presets = json!([{ "name": "Acme", "data": { "name": "acme", "pfp": "", "followers": "1", "following": "2", "bio": "" } }]);
        let (status, _) = call!(app, request(Method::POST, "/api/presets", None, Some(presets)).to_request());
        assert_eq!(status, StatusCode::OK);
        let (_, listed) = call!(app, request(Method::GET, "/api/presets", None, None).to_request());
        assert_eq!(listed[0]["name"], "Acme");
    }

    #[actix_web::test]
    async fn test_malformed_json_is_a_bad_request() {
        let h = Harness::new().await;
        let app = app!(h);

        let req = test::TestRequest::post()
            .uri("/api/feedback")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{ not json")
            .to_request();
        let (status, body) = call!(app, req);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    }
}
