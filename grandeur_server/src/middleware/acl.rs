//! Access control middleware for the Grandeur server.
//! This middleware can be placed on any route or service.
//!
//! It validates the bearer token in the Authorization header, stores the resulting claims on the request for
//! handlers to extract, and then checks the claims against the required roles for the route. If the token is missing
//! or invalid a 401 is returned; if the roles do not suffice, a 403.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web,
    Error,
    HttpMessage,
};
use futures::{
    future::{ok, Ready},
    Future,
};
use grandeur_engine::db_types::Role;

use crate::{
    auth::{extract_bearer_token, TokenIssuer},
    errors::ServerError,
};

pub struct AclMiddlewareFactory {
    required_roles: Vec<Role>,
}

impl AclMiddlewareFactory {
    pub fn new(required_roles: &[Role]) -> Self {
        AclMiddlewareFactory { required_roles: required_roles.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = AclMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { required_roles: self.required_roles.clone(), service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    required_roles: Vec<Role>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let required_roles = self.required_roles.clone();
        Box::pin(async move {
            let issuer = req.app_data::<web::Data<TokenIssuer>>().cloned().ok_or_else(|| {
                log::error!("🔑️ No TokenIssuer found in app data. This is a server wiring bug.");
                Error::from(ServerError::Unspecified("Token issuer is not configured".to_string()))
            })?;
            let token = extract_bearer_token(req.headers()).map_err(ServerError::AuthenticationError)?;
            let claims = issuer.check_token(&token).map_err(|e| {
                log::debug!("🔑️ Token verification failed: {e}");
                ServerError::AuthenticationError(e)
            })?;
            if !required_roles.iter().all(|role| claims.roles.contains(role)) {
                log::warn!("🔑️ User {} lacks the required roles for {}", claims.email, req.path());
                return Err(ServerError::InsufficientPermissions(
                    "Access denied. Admin privileges required.".to_string(),
                )
                .into());
            }
            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}
