use crate::{config::AppConfig, database::JsonStore, services::auth_service, utils::AppError};
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    web, Error, HttpMessage, HttpRequest, ResponseError,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

pub const SESSION_COOKIE: &str = "session";

/// Session token from the `session` cookie, falling back to `Authorization: Bearer`.
pub fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Rejects requests without a valid session and attaches the verified
/// [`auth_service::Claims`] to the ones that pass. A token whose user no
/// longer exists is rejected too.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service: Rc::new(service) }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let config = req.app_data::<web::Data<AppConfig>>().cloned();
        let store = req.app_data::<web::Data<JsonStore>>().cloned();
        let token = session_token(req.request());

        Box::pin(async move {
            let claims = match (config, store, token) {
                (Some(config), Some(store), Some(token)) => match auth_service::verify_token(&config.jwt, &token) {
                    Ok(claims) => {
                        let known = auth_service::find_user(&store, &claims.sub).await.is_some();
                        if !known {
                            log::warn!("⚠️ Session for unknown user {}", claims.sub);
                        }
                        known.then_some(claims)
                    }
                    Err(_) => None,
                },
                (None, _, _) | (_, None, _) => {
                    log::error!("❌ AuthMiddleware: AppConfig or JsonStore not registered");
                    None
                }
                _ => None,
            };

            match claims {
                Some(claims) => {
                    req.extensions_mut().insert(claims);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                None => {
                    log::debug!("🔒 Rejected unauthenticated request to {}", req.path());
                    let response = AppError::Unauthorized("Authentication required".to_string()).error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
