use crate::middleware::auth::SESSION_COOKIE;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Feed Mockup Service API",
        version = "1.0.0",
        description = "Backend for the social feed mockup builder.\n\n**Authentication:** editor endpoints need the `session` cookie set by Google sign-in (or the same token as a Bearer header). Review, scheduler and cache endpoints are open so client links work without an account.\n\n**Features:**\n- Feed storage per user\n- Client review drafts and approval snapshots\n- Scheduler flags per post\n- Local cache of Drive-hosted media"
    ),
    paths(
        // Auth
        crate::api::auth::google_auth,
        crate::api::auth::google_callback,
        crate::api::auth::auth_status,
        crate::api::auth::logout,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Feeds & presets
        crate::api::feeds::list_feeds,
        crate::api::feeds::get_feed,
        crate::api::feeds::get_public_feed,
        crate::api::feeds::create_feed,
        crate::api::feeds::delete_feed,
        crate::api::feeds::list_presets,
        crate::api::feeds::save_presets,

        // Review
        crate::api::client_emails::log_email,
        crate::api::client_emails::list_emails,
        crate::api::feedback::get_feedback,
        crate::api::feedback::save_feedback,
        crate::api::feedback::set_like,
        crate::api::feedback::add_comment,
        crate::api::feedback::delete_comment,
        crate::api::approvals::submit_approval,
        crate::api::approvals::list_approvals,

        // Scheduler
        crate::api::scheduler::create_plan,
        crate::api::scheduler::get_plan,
        crate::api::scheduler::list_feed_plans,
        crate::api::scheduler::update_post,

        // Media cache
        crate::api::cache::download,
        crate::api::cache::delete,
    ),
    components(
        schemas(
            crate::api::auth::AuthStatusResponse,
            crate::api::health::HealthResponse,
            crate::models::SessionUser,
            crate::models::CreateFeedRequest,
            crate::models::ClientEmail,
            crate::models::ClientEmailRequest,
            crate::models::SaveFeedbackRequest,
            crate::models::LikeRequest,
            crate::models::AddCommentRequest,
            crate::models::DeleteCommentRequest,
            crate::models::Approval,
            crate::models::ApprovalPayload,
            crate::models::ApprovedPost,
            crate::models::SubmitApprovalRequest,
            crate::models::SchedulerPlan,
            crate::models::ScheduledPost,
            crate::models::CreateSchedulerRequest,
            crate::models::UpdateScheduledPostRequest,
            crate::models::CacheDownloadRequest,
            crate::models::CacheDownloadResponse,
            crate::models::CacheDeleteRequest,
            crate::models::CacheDeleteResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Google sign-in and session status."),
        (name = "Health", description = "Health check and request counters."),
        (name = "Feeds", description = "Saved mockups. Owner endpoints need a session; the public endpoint backs client review links."),
        (name = "Presets", description = "Reusable account headers."),
        (name = "Review", description = "Client email log, feedback drafts and approval snapshots."),
        (name = "Scheduler", description = "Per-post publish readiness flags."),
        (name = "Media Cache", description = "Local copies of Drive-hosted media, served under /CachedImages."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token issued at sign-in"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_review_and_cache_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/api/feeds", "/api/feedback/like", "/api/approvals", "/api/cache/download", "/auth/status"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_request_bodies_have_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().unwrap().schemas;
        for name in ["CreateFeedRequest", "SaveFeedbackRequest", "LikeRequest", "AddCommentRequest", "DeleteCommentRequest"] {
            assert!(schemas.contains_key(name), "missing schema {}", name);
        }
    }
}
