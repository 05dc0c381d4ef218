//! Webhook signature middleware for Actix Web.
//!
//! The gateway authenticates its webhook calls by sending a pre-shared secret hash in a request header
//! (`verif-hash` for Flutterwave). This middleware compares the header against the configured secret in constant
//! time, before any of the body is parsed or processed. Requests that fail the check are rejected with 401 and never
//! reach the handler, so a forged "charge completed" payload can never create or modify an order.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    Error,
};
use futures::future::LocalBoxFuture;
use grandeur_common::Secret;
use log::{trace, warn};
use subtle::ConstantTimeEq;

pub struct SignatureMiddlewareFactory {
    signature_header: String,
    secret: Secret<String>,
}

impl SignatureMiddlewareFactory {
    pub fn new(signature_header: &str, secret: Secret<String>) -> Self {
        SignatureMiddlewareFactory { signature_header: signature_header.into(), secret }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SignatureMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = SignatureMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SignatureMiddlewareService {
            signature_header: self.signature_header.clone(),
            secret: self.secret.clone(),
            service: Rc::new(service),
        }))
    }
}

pub struct SignatureMiddlewareService<S> {
    signature_header: String,
    secret: Secret<String>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SignatureMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let secret = self.secret.reveal().clone();
        let signature_header = self.signature_header.clone();
        Box::pin(async move {
            trace!("🔐️ Checking webhook signature for request");
            if secret.is_empty() {
                warn!("🔐️ No webhook secret is configured. Denying access.");
                return Err(ErrorUnauthorized("Webhook signature could not be verified."));
            }
            let provided = req.headers().get(&signature_header).and_then(|v| v.to_str().ok()).ok_or_else(|| {
                warn!("🔐️ No webhook signature found in request. Denying access.");
                ErrorUnauthorized("No webhook signature found.")
            })?;
            let validated = provided.as_bytes().ct_eq(secret.as_bytes()).unwrap_u8() == 1;
            if validated {
                trace!("🔐️ Webhook signature check ✅️");
                service.call(req).await
            } else {
                warn!("🔐️ Invalid webhook signature found in request. Denying access.");
                Err(ErrorUnauthorized("Invalid webhook signature."))
            }
        })
    }
}
