use crate::{
    database::JsonStore,
    models::{CreateFeedRequest, Preset},
    services::{auth_service::Claims, feed_service},
    utils::AppError,
};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    get,
    path = "/api/feeds",
    tag = "Feeds",
    responses(
        (status = 200, description = "Feeds owned by the signed-in user"),
        (status = 401, description = "Authentication required")
    ),
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
pub async fn list_feeds(store: web::Data<JsonStore>, claims: web::ReqData<Claims>) -> HttpResponse {
    log::info!("📋 GET /api/feeds - user {}", claims.sub);
    HttpResponse::Ok().json(feed_service::list_user_feeds(&store, &claims.sub).await)
}

#[utoipa::path(
    get,
    path = "/api/feeds/{id}",
    tag = "Feeds",
    params(("id" = String, Path, description = "Feed id")),
    responses(
        (status = 200, description = "The feed"),
        (status = 403, description = "Feed belongs to another user"),
        (status = 404, description = "Feed not found")
    ),
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
pub async fn get_feed(
    store: web::Data<JsonStore>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let feed = feed_service::get_owned_feed(&store, &path, &claims.sub).await?;
    Ok(HttpResponse::Ok().json(feed))
}

#[utoipa::path(
    get,
    path = "/api/public/feeds/{id}",
    tag = "Feeds",
    params(("id" = String, Path, description = "Feed id")),
    responses(
        (status = 200, description = "The feed, for client review links"),
        (status = 404, description = "Feed not found")
    )
)]
pub async fn get_public_feed(
    store: web::Data<JsonStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let feed = feed_service::get_public_feed(&store, &path).await?;
    Ok(HttpResponse::Ok().json(feed))
}

#[utoipa::path(
    post,
    path = "/api/feeds",
    tag = "Feeds",
    responses(
        (status = 201, description = "Feed created"),
        (status = 400, description = "Malformed body")
    ),
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
pub async fn create_feed(
    store: web::Data<JsonStore>,
    claims: web::ReqData<Claims>,
    body: web::Json<CreateFeedRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("💾 POST /api/feeds - user {}", claims.sub);
    let feed = feed_service::create_feed(&store, &claims.sub, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(feed))
}

#[utoipa::path(
    delete,
    path = "/api/feeds/{id}",
    tag = "Feeds",
    params(("id" = String, Path, description = "Feed id")),
    responses(
        (status = 200, description = "Feed deleted"),
        (status = 403, description = "Feed belongs to another user"),
        (status = 404, description = "Feed not found")
    ),
    security(("session_cookie" = []), ("bearer_auth" = []))
)]
pub async fn delete_feed(
    store: web::Data<JsonStore>,
    claims: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    feed_service::delete_feed(&store, &path, &claims.sub).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Feed deleted successfully" })))
}

#[utoipa::path(
    get,
    path = "/api/presets",
    tag = "Presets",
    responses((status = 200, description = "Saved account presets"))
)]
pub async fn list_presets(store: web::Data<JsonStore>) -> HttpResponse {
    HttpResponse::Ok().json(feed_service::list_presets(&store).await)
}

#[utoipa::path(
    post,
    path = "/api/presets",
    tag = "Presets",
    responses(
        (status = 200, description = "Presets replaced"),
        (status = 400, description = "Body is not an array of presets")
    )
)]
pub async fn save_presets(
    store: web::Data<JsonStore>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    if !body.is_array() {
        return Err(AppError::InvalidRequest("Presets must be an array".to_string()));
    }
    let presets: Vec<Preset> = serde_json::from_value(body)
        .map_err(|e| AppError::InvalidRequest(format!("Invalid preset: {}", e)))?;

    feed_service::replace_presets(&store, &presets).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Presets saved successfully" })))
}
