use crate::{
    database::JsonStore,
    models::{Approval, SubmitApprovalRequest},
    services::approval_service,
    utils::AppError,
};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    post,
    path = "/api/approvals",
    tag = "Review",
    request_body = SubmitApprovalRequest,
    responses(
        (status = 201, description = "Approval submitted"),
        (status = 400, description = "Missing feedId or clientEmail"),
        (status = 404, description = "No feedback found to submit")
    )
)]
pub async fn submit_approval(
    store: web::Data<JsonStore>,
    body: web::Json<SubmitApprovalRequest>,
) -> Result<HttpResponse, AppError> {
    let SubmitApprovalRequest { feed_id, client_email } = body.into_inner();
    let approval = approval_service::submit_approval(&store, feed_id, client_email).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Approval submitted successfully",
        "approval": approval
    })))
}

#[utoipa::path(
    get,
    path = "/api/approvals/{feedId}",
    tag = "Review",
    params(("feedId" = String, Path, description = "Feed id")),
    responses((status = 200, description = "Approvals in submission order", body = [Approval]))
)]
pub async fn list_approvals(store: web::Data<JsonStore>, path: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().json(approval_service::list_approvals(&store, &path).await)
}
