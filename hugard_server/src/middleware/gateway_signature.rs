//! Request signing for the command surface.
//!
//! The chat gateway signs the raw body of every command with the shared `HUGARD_GATEWAY_HMAC_SECRET` and sends the
//! base64 HMAC-SHA256 in the [`SIGNATURE_HEADER`] header. [`GatewaySignature`] buffers the body, checks the signature,
//! and then hands the untouched body on to the wrapped service.
use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_http::h1;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    error::{ErrorBadRequest, ErrorForbidden},
    http::header::HeaderMap,
    web::Bytes,
    Error,
};
use futures::future::LocalBoxFuture;
use hugard_common::Secret;
use log::*;
use thiserror::Error;

use crate::helpers::verify_hmac;

pub const SIGNATURE_HEADER: &str = "X-Hugard-Hmac-Sha256";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("No HMAC signature found.")]
    Missing,
    #[error("Invalid HMAC signature.")]
    Invalid,
}

/// Checks the gateway signature in `headers` against the raw request `body`.
pub fn check_signature(secret: &Secret<String>, headers: &HeaderMap, body: &[u8]) -> Result<(), SignatureError> {
    let signature = headers.get(SIGNATURE_HEADER).ok_or(SignatureError::Missing)?;
    let signature = signature.to_str().map_err(|_| SignatureError::Invalid)?;
    if verify_hmac(secret.reveal(), body, signature) {
        Ok(())
    } else {
        Err(SignatureError::Invalid)
    }
}

/// Rejects command requests that were not signed by the chat gateway.
pub struct GatewaySignature {
    // None means checks are switched off and every request is let through
    secret: Option<Secret<String>>,
}

impl GatewaySignature {
    pub fn new(secret: Secret<String>, enabled: bool) -> Self {
        Self { secret: enabled.then_some(secret) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for GatewaySignature
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = GatewaySignatureService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        let secret = self.secret.clone().map(Rc::new);
        ready(Ok(GatewaySignatureService { secret, service: Rc::new(service) }))
    }
}

pub struct GatewaySignatureService<S> {
    secret: Option<Rc<Secret<String>>>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for GatewaySignatureService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let Some(secret) = self.secret.clone() else {
            trace!("🔐️ Signature checks are off. Passing {} through.", req.path());
            return Box::pin(self.service.call(req));
        };
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let body = req.extract::<Bytes>().await.map_err(|e| {
                warn!("🔐️ Could not read the body of a command to {}. {e}", req.path());
                ErrorBadRequest("Failed to extract request data.")
            })?;
            if let Err(e) = check_signature(&secret, req.headers(), &body) {
                warn!("🔐️ Rejected a command to {}. {e}", req.path());
                return Err(ErrorForbidden(e));
            }
            trace!("🔐️ Gateway signature verified for {}", req.path());
            req.set_payload(replay(body));
            service.call(req).await
        })
    }
}

/// The body has already been consumed by the check, so it is put back for the extractors further down.
fn replay(body: Bytes) -> Payload {
    let (_, mut payload) = h1::Payload::create(true);
    payload.unread_data(body);
    Payload::from(payload)
}
