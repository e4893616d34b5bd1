use crate::{
    models::{CacheDeleteRequest, CacheDeleteResponse, CacheDownloadRequest, CacheDownloadResponse},
    services::MediaCache,
    utils::AppError,
};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    post,
    path = "/api/cache/download",
    tag = "Media Cache",
    request_body = CacheDownloadRequest,
    responses(
        (status = 200, description = "Local copy of the media", body = CacheDownloadResponse),
        (status = 400, description = "Missing required parameters"),
        (status = 502, description = "Download failed")
    )
)]
pub async fn download(
    cache: web::Data<MediaCache>,
    body: web::Json<CacheDownloadRequest>,
) -> Result<HttpResponse, AppError> {
    let CacheDownloadRequest { google_drive_url, kind, id, index } = body.into_inner();
    let response = cache.download(google_drive_url, kind, id, index).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[utoipa::path(
    post,
    path = "/api/cache/delete",
    tag = "Media Cache",
    request_body = CacheDeleteRequest,
    responses(
        (status = 200, description = "Files removed", body = CacheDeleteResponse),
        (status = 400, description = "Missing or invalid paths")
    )
)]
pub async fn delete(
    cache: web::Data<MediaCache>,
    body: web::Json<CacheDeleteRequest>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();
    let paths: Vec<String> = match request.paths {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => return Err(AppError::InvalidRequest("Missing or invalid paths".to_string())),
    };

    if let (Some(kind), Some(id)) = (&request.kind, &request.id) {
        log::info!("🗑️ POST /api/cache/delete - {} {} ({} paths)", kind, id, paths.len());
    }

    let deleted = cache.delete_paths(&paths).await;
    Ok(HttpResponse::Ok().json(CacheDeleteResponse {
        deleted,
        message: "Cache files deleted".to_string(),
    }))
}
