use crate::{
    database::JsonStore,
    models::{ClientEmail, ClientEmailRequest},
    services::client_email_service::{self, LogOutcome},
    utils::AppError,
};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    post,
    path = "/api/client-email",
    tag = "Review",
    request_body = ClientEmailRequest,
    responses(
        (status = 201, description = "Email logged"),
        (status = 200, description = "Email was already logged for this feed"),
        (status = 400, description = "Missing feedId/email or invalid email")
    )
)]
pub async fn log_email(
    store: web::Data<JsonStore>,
    body: web::Json<ClientEmailRequest>,
) -> Result<HttpResponse, AppError> {
    let ClientEmailRequest { feed_id, email } = body.into_inner();

    match client_email_service::log_client_email(&store, feed_id, email).await? {
        LogOutcome::Logged(entry) => Ok(HttpResponse::Created().json(serde_json::json!({
            "message": "Email logged successfully",
            "entry": entry
        }))),
        LogOutcome::AlreadyLogged => Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Email already logged",
            "alreadyExists": true
        }))),
    }
}

#[utoipa::path(
    get,
    path = "/api/client-email/{feedId}",
    tag = "Review",
    params(("feedId" = String, Path, description = "Feed id")),
    responses((status = 200, description = "Emails logged for the feed", body = [ClientEmail]))
)]
pub async fn list_emails(store: web::Data<JsonStore>, path: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().json(client_email_service::list_client_emails(&store, &path).await)
}
