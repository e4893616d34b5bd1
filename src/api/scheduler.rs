use crate::{
    database::JsonStore,
    models::{CreateSchedulerRequest, SchedulerPlan, UpdateScheduledPostRequest},
    services::scheduler_service,
    utils::AppError,
};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    post,
    path = "/api/scheduler",
    tag = "Scheduler",
    request_body = CreateSchedulerRequest,
    responses(
        (status = 200, description = "Empty plan created", body = SchedulerPlan),
        (status = 400, description = "feedId required")
    )
)]
pub async fn create_plan(
    store: web::Data<JsonStore>,
    body: web::Json<CreateSchedulerRequest>,
) -> Result<HttpResponse, AppError> {
    let CreateSchedulerRequest { feed_id, scheduler_email } = body.into_inner();
    let plan = scheduler_service::create_plan(&store, feed_id, scheduler_email).await?;
    Ok(HttpResponse::Ok().json(plan))
}

#[utoipa::path(
    get,
    path = "/api/scheduler/{schedulerId}",
    tag = "Scheduler",
    params(("schedulerId" = String, Path, description = "Plan id")),
    responses(
        (status = 200, description = "The plan", body = SchedulerPlan),
        (status = 404, description = "Scheduler not found")
    )
)]
pub async fn get_plan(store: web::Data<JsonStore>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(scheduler_service::get_plan(&store, &path).await?))
}

#[utoipa::path(
    get,
    path = "/api/scheduler/feed/{feedId}",
    tag = "Scheduler",
    params(("feedId" = String, Path, description = "Feed id")),
    responses((status = 200, description = "Plans for the feed", body = [SchedulerPlan]))
)]
pub async fn list_feed_plans(store: web::Data<JsonStore>, path: web::Path<String>) -> HttpResponse {
    HttpResponse::Ok().json(scheduler_service::list_feed_plans(&store, &path).await)
}

#[utoipa::path(
    patch,
    path = "/api/scheduler/{schedulerId}/post/{postId}",
    tag = "Scheduler",
    params(
        ("schedulerId" = String, Path, description = "Plan id"),
        ("postId" = String, Path, description = "Post id")
    ),
    request_body = UpdateScheduledPostRequest,
    responses(
        (status = 200, description = "Updated plan", body = SchedulerPlan),
        (status = 404, description = "Scheduler not found")
    )
)]
pub async fn update_post(
    store: web::Data<JsonStore>,
    path: web::Path<(String, String)>,
    body: web::Json<UpdateScheduledPostRequest>,
) -> Result<HttpResponse, AppError> {
    let (scheduler_id, post_id) = path.into_inner();
    let plan = scheduler_service::update_post(&store, &scheduler_id, &post_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(plan))
}
