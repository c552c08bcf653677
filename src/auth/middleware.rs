use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;

use crate::{app_state::AppState, auth::IdentityContext, errors::AppError};

/// Resolves the caller of every request. A request without an
/// `Authorization` header proceeds as anonymous; a header that is present but
/// malformed or fails verification is rejected with 401.
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
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
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

        Box::pin(async move {
            let identity = match resolve_identity(&req) {
                Ok(identity) => identity,
                Err(err) => return Ok(req.error_response(err).map_into_right_body()),
            };
            log::debug!(
                "Request {} {} by {} ({})",
                req.method(),
                req.path(),
                identity.display_name(),
                identity.role
            );

            req.extensions_mut().insert(identity);

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn resolve_identity(req: &ServiceRequest) -> Result<IdentityContext, AppError> {
    let Some(header) = req.headers().get(AUTHORIZATION) else {
        return Ok(IdentityContext::anonymous());
    };

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::InternalError("Identity provider not configured".to_string()))?;

    let token = header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            AppError::Unauthorized("Invalid authorization header format".to_string())
        })?;

    state.identity_provider.verify(token).map_err(|err| {
        log::warn!("Rejected bearer credential on {}: {}", req.path(), err);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })
}

/// Extractor for the caller resolved by [`AuthMiddleware`].
pub struct CallerIdentity(pub IdentityContext);

impl FromRequest for CallerIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let identity = req
            .extensions()
            .get::<IdentityContext>()
            .cloned()
            .unwrap_or_else(IdentityContext::anonymous);

        ready(Ok(CallerIdentity(identity)))
    }
}
