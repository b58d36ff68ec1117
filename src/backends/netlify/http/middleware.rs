use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use axum::{
    body::{Body, HttpBody},
    http::{Method, Request},
    response::{IntoResponse, Response},
};

use tower::{Layer, Service};

use crate::{crypto::is_valid_netlify_signature, error::ErrorCode};

pub const NETLIFY_SIGNATURE_HEADER: &str = "X-Webhook-Signature";

/// Rejects Netlify deploy notifications whose JWS does not match the
/// configured secret. Without a secret every request passes through.
pub struct VerifyNetlifySignatureLayer {
    secret: Option<String>,
}

impl VerifyNetlifySignatureLayer {
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }
}

impl<S> Layer<S> for VerifyNetlifySignatureLayer {
    type Service = VerifyNetlifySignatureMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        VerifyNetlifySignatureMiddleware::new(self.secret.clone(), inner)
    }
}

#[derive(Clone)]
pub struct VerifyNetlifySignatureMiddleware<S> {
    secret: Option<String>,
    inner: S,
}

impl<S> VerifyNetlifySignatureMiddleware<S> {
    pub fn new(secret: Option<String>, inner: S) -> Self {
        Self { secret, inner }
    }
}

type BoxFuture<'a, Output> = Pin<Box<dyn Future<Output = Output> + Send + 'a>>;

impl<S> Service<Request<Body>> for VerifyNetlifySignatureMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Send + 'static + Clone,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let mut inner = self.inner.clone();
        let secret = self.secret.clone();
        let fut = async move {
            if let Some(secret) = secret.filter(|_| request.method() == Method::POST) {
                let token = match request
                    .headers()
                    .get(NETLIFY_SIGNATURE_HEADER)
                    .and_then(|v| v.to_str().ok())
                {
                    Some(token) => token.to_owned(),
                    None => {
                        tracing::warn!(message = "Missing Netlify signature header");
                        return Ok(ErrorCode::InvalidDeploySignature.into_response());
                    }
                };

                let mut body = Vec::<u8>::new();
                let request_body = request.body_mut();
                while let Some(chunk) = request_body.data().await {
                    match chunk {
                        Ok(bytes) => body.extend(bytes),
                        Err(e) => {
                            tracing::error!(message = "Could not read request body", error = %e);
                            return Ok(ErrorCode::InvalidDeploySignature.into_response());
                        }
                    }
                }

                if !is_valid_netlify_signature(&token, &body, &secret) {
                    tracing::warn!(message = "Invalid Netlify signature");
                    return Ok(ErrorCode::InvalidDeploySignature.into_response());
                }

                *request.body_mut() = body.into();
            }

            let future = inner.call(request);
            let response: Response = future.await?;
            Ok(response)
        };

        Box::pin(fut)
    }
}
