use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{self, HeaderValue},
    Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::extractors::AuthenticatedUserId;
use crate::auth::token::TokenService;
use crate::error::AppError;

/// Paths reachable without a bearer token.
pub const PUBLIC_PATHS: &[&str] = &["/health", "/auth/register", "/auth/login"];

/// Resolves an `Authorization` header value to the caller's user id.
///
/// The header must be exactly `Bearer <token>`: two parts separated by a single space.
pub fn authenticate(
    header: Option<&HeaderValue>,
    tokens: &TokenService,
) -> Result<AuthenticatedUserId, AppError> {
    let header = header.ok_or_else(|| AppError::Unauthenticated("No token provided".into()))?;
    let value = header
        .to_str()
        .map_err(|_| AppError::MalformedCredential("Invalid token format".into()))?;

    let parts: Vec<&str> = value.split(' ').collect();
    let [scheme, token] = parts.as_slice() else {
        return Err(AppError::MalformedCredential("Invalid token format".into()));
    };
    if *scheme != "Bearer" {
        return Err(AppError::MalformedCredential(
            "Invalid authorization scheme".into(),
        ));
    }

    let claims = tokens.verify_token(token)?;
    Ok(AuthenticatedUserId(claims.sub))
}

/// Rejects every non-public request that does not carry a valid bearer token,
/// and stores the caller's `AuthenticatedUserId` in the request extensions.
/// Rejections are answered here with the `AppError` response; the wrapped
/// service is never called.
pub struct AuthMiddleware {
    tokens: TokenService,
}

impl AuthMiddleware {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    tokens: TokenService,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if !PUBLIC_PATHS.contains(&req.path()) {
            match authenticate(req.headers().get(header::AUTHORIZATION), &self.tokens) {
                Ok(user_id) => {
                    req.extensions_mut().insert(user_id);
                }
                Err(err) => {
                    log::debug!("Rejected {} {}: {}", req.method(), req.path(), err);
                    let response = req.into_response(err.error_response()).map_into_right_body();
                    return Box::pin(async move { Ok(response) });
                }
            }
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
