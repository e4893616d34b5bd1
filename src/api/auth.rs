use crate::{
    config::AppConfig,
    database::JsonStore,
    middleware::auth::{session_token, SESSION_COOKIE},
    models::SessionUser,
    services::auth_service,
    utils::AppError,
};
use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    http::header,
    web, HttpRequest, HttpResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const STATE_COOKIE: &str = "oauth_state";
const STATE_TTL_MINUTES: i64 = 10;

#[derive(Serialize, utoipa::ToSchema)]
pub struct AuthStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

fn cookie<'c>(config: &AppConfig, name: &'c str, value: String, path: &'c str) -> Cookie<'c> {
    let same_site = if config.production { SameSite::None } else { SameSite::Lax };
    Cookie::build(name, value)
        .path(path)
        .http_only(true)
        .secure(config.production)
        .same_site(same_site)
        .finish()
}

fn expired(config: &AppConfig, name: &'static str, path: &'static str) -> Cookie<'static> {
    let mut c = cookie(config, name, String::new(), path);
    c.make_removal();
    c
}

fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .append_header((header::LOCATION, location))
        .finish()
}

/// Where the browser lands after sign-in. Relative to this server unless a
/// separate client origin is configured.
fn client_page(config: &AppConfig, page: &str) -> String {
    match &config.client_url {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), page),
        None => format!("/{}", page),
    }
}

#[utoipa::path(
    get,
    path = "/auth/google",
    tag = "Auth",
    responses(
        (status = 302, description = "Redirect to Google's consent page"),
        (status = 500, description = "Google OAuth not configured")
    )
)]
pub async fn google_auth(config: web::Data<AppConfig>) -> Result<HttpResponse, AppError> {
    log::info!("🔐 GET /auth/google");

    let state = Uuid::new_v4().to_string();
    let url = auth_service::google_consent_url(&config.google, &state)?;

    let mut state_cookie = cookie(&config, STATE_COOKIE, state, "/auth");
    state_cookie.set_max_age(CookieDuration::minutes(STATE_TTL_MINUTES));

    Ok(HttpResponse::Found()
        .append_header((header::LOCATION, url))
        .cookie(state_cookie)
        .finish())
}

#[utoipa::path(
    get,
    path = "/auth/google/callback",
    tag = "Auth",
    params(
        ("code" = Option<String>, Query, description = "Authorization code"),
        ("state" = Option<String>, Query, description = "State issued by /auth/google"),
        ("error" = Option<String>, Query, description = "Error reported by Google")
    ),
    responses(
        (status = 302, description = "Session cookie set and redirect to /index.html, or redirect to /login.html on failure")
    )
)]
pub async fn google_callback(
    req: HttpRequest,
    store: web::Data<JsonStore>,
    config: web::Data<AppConfig>,
    query: web::Query<CallbackQuery>,
) -> HttpResponse {
    log::info!("🔐 GET /auth/google/callback - Processing Google OAuth");

    let failure = |reason: &str| {
        log::warn!("❌ Google sign-in failed: {}", reason);
        HttpResponse::Found()
            .append_header((header::LOCATION, client_page(&config, "login.html")))
            .cookie(expired(&config, STATE_COOKIE, "/auth"))
            .finish()
    };

    if let Some(error) = &query.error {
        return failure(error);
    }
    let Some(code) = query.code.as_deref() else {
        return failure("no authorization code");
    };

    let expected_state = req.cookie(STATE_COOKIE).map(|c| c.value().to_string());
    if expected_state.is_none() || expected_state != query.state {
        return failure("state mismatch");
    }

    let profile = match auth_service::fetch_google_profile(&config.google, code).await {
        Ok(profile) => profile,
        Err(e) => return failure(&e.to_string()),
    };
    let user = match auth_service::find_or_create_user(&store, &profile).await {
        Ok(user) => user,
        Err(e) => return failure(&e.to_string()),
    };
    let token = match auth_service::issue_session_token(&config.jwt, &user) {
        Ok(token) => token,
        Err(e) => return failure(&e.to_string()),
    };

    let mut session = cookie(&config, SESSION_COOKIE, token, "/");
    session.set_max_age(CookieDuration::days(config.jwt.ttl_days));

    log::info!("✅ Google OAuth successful for {}", user.email);
    let mut response = redirect(client_page(&config, "index.html"));
    for c in [session, expired(&config, STATE_COOKIE, "/auth")] {
        if let Err(e) = response.add_cookie(&c) {
            log::error!("❌ Failed to set cookie {}: {}", c.name(), e);
        }
    }
    response
}

#[utoipa::path(
    get,
    path = "/auth/status",
    tag = "Auth",
    responses(
        (status = 200, description = "Current session", body = AuthStatusResponse)
    )
)]
pub async fn auth_status(
    req: HttpRequest,
    store: web::Data<JsonStore>,
    config: web::Data<AppConfig>,
) -> HttpResponse {
    let claims = session_token(&req).and_then(|token| auth_service::verify_token(&config.jwt, &token).ok());

    let user = match claims {
        Some(claims) => auth_service::find_user(&store, &claims.sub).await,
        None => None,
    };

    HttpResponse::Ok().json(AuthStatusResponse {
        authenticated: user.is_some(),
        user: user.as_ref().map(SessionUser::from),
    })
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cookie cleared")
    )
)]
pub async fn logout(config: web::Data<AppConfig>) -> HttpResponse {
    log::info!("👋 POST /auth/logout");
    HttpResponse::Ok()
        .cookie(expired(&config, SESSION_COOKIE, "/"))
        .json(serde_json::json!({ "success": true }))
}
