use crate::{
    database::JsonStore,
    models::{AddCommentRequest, DeleteCommentRequest, FeedbackQuery, LikeRequest, SaveFeedbackRequest},
    services::feedback_service,
    utils::{validation, AppError},
};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    get,
    path = "/api/feedback/{feedId}",
    tag = "Review",
    params(
        ("feedId" = String, Path, description = "Feed id"),
        ("email" = String, Query, description = "Client email")
    ),
    responses(
        (status = 200, description = "Stored draft, or an empty one"),
        (status = 400, description = "Email parameter required")
    )
)]
pub async fn get_feedback(
    store: web::Data<JsonStore>,
    path: web::Path<String>,
    query: web::Query<FeedbackQuery>,
) -> Result<HttpResponse, AppError> {
    let email = validation::non_blank(&query.email)
        .ok_or_else(|| AppError::InvalidRequest("Email parameter required".to_string()))?;

    Ok(HttpResponse::Ok().json(feedback_service::get_draft(&store, &path, email).await))
}

#[utoipa::path(
    post,
    path = "/api/feedback",
    tag = "Review",
    responses(
        (status = 200, description = "Draft saved"),
        (status = 400, description = "Missing feedId or clientEmail")
    )
)]
pub async fn save_feedback(
    store: web::Data<JsonStore>,
    body: web::Json<SaveFeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    let feedback = feedback_service::save_draft(&store, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Feedback saved", "feedback": feedback })))
}

#[utoipa::path(
    patch,
    path = "/api/feedback/like",
    tag = "Review",
    responses(
        (status = 200, description = "Like updated"),
        (status = 400, description = "Missing required parameters")
    )
)]
pub async fn set_like(
    store: web::Data<JsonStore>,
    body: web::Json<LikeRequest>,
) -> Result<HttpResponse, AppError> {
    let feedback = feedback_service::set_like(&store, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Like updated", "feedback": feedback })))
}

#[utoipa::path(
    patch,
    path = "/api/feedback/comment",
    tag = "Review",
    responses(
        (status = 200, description = "Comment added"),
        (status = 400, description = "Missing required parameters")
    )
)]
pub async fn add_comment(
    store: web::Data<JsonStore>,
    body: web::Json<AddCommentRequest>,
) -> Result<HttpResponse, AppError> {
    let (comment, feedback) = feedback_service::add_comment(&store, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Comment added",
        "comment": comment,
        "feedback": feedback
    })))
}

#[utoipa::path(
    delete,
    path = "/api/feedback/comment",
    tag = "Review",
    responses(
        (status = 200, description = "Comment deleted"),
        (status = 400, description = "Missing required parameters"),
        (status = 404, description = "Draft, post entry or comment not found")
    )
)]
pub async fn delete_comment(
    store: web::Data<JsonStore>,
    body: web::Json<DeleteCommentRequest>,
) -> Result<HttpResponse, AppError> {
    let feedback = feedback_service::delete_comment(&store, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Comment deleted", "feedback": feedback })))
}
