use serde_json::Value;

use crate::{
    config::Config,
    crypto::{is_valid_rsa_sha1_signature, parse_public_key},
    fetch::{FetchRequest, HttpFetch},
};

const PUBLIC_KEY_POINTERS: [&str; 2] = ["/config/notifications/webhook/public_key", "/public_key"];

/// Notification payload together with its detached signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedPayload {
    pub payload: String,
    pub signature: String,
}

impl SignedPayload {
    pub fn new<T: Into<String>>(payload: T, signature: T) -> Self {
        Self {
            payload: payload.into(),
            signature: signature.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified,
    Failed,
    NetworkError(String),
}

/// Verifies Travis notifications against the key published on `/config`.
///
/// The key is fetched on every call and never cached.
pub struct SignatureVerifier<'a> {
    config: &'a Config,
    fetcher: &'a dyn HttpFetch,
}

impl<'a> SignatureVerifier<'a> {
    pub fn new(config: &'a Config, fetcher: &'a dyn HttpFetch) -> Self {
        Self { config, fetcher }
    }

    #[tracing::instrument(skip_all)]
    pub async fn verify(&self, signed: &SignedPayload) -> VerificationOutcome {
        let url = self.config.travis_config_url();
        let resp = match self.fetcher.send(FetchRequest::get(&url)).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(message = "Could not fetch Travis config", url = %url, error = %e);
                return VerificationOutcome::NetworkError(e.to_string());
            }
        };

        if !resp.is_success() {
            tracing::error!(message = "Travis config unavailable", url = %url, status = resp.status);
            return VerificationOutcome::NetworkError(format!(
                "status code {} from '{}'",
                resp.status, url
            ));
        }

        let pem = match extract_public_key(&resp.body) {
            Some(pem) => pem,
            None => {
                tracing::error!(message = "No public key in Travis config", body = %resp.body);
                return VerificationOutcome::Failed;
            }
        };

        let public_key = match parse_public_key(&pem) {
            Ok(key) => key,
            Err(e) => {
                tracing::error!(message = "Unusable Travis public key", error = %e);
                return VerificationOutcome::Failed;
            }
        };

        if is_valid_rsa_sha1_signature(&public_key, signed.payload.as_bytes(), &signed.signature)
        {
            VerificationOutcome::Verified
        } else {
            tracing::warn!(message = "Signature mismatch", payload = %signed.payload);
            VerificationOutcome::Failed
        }
    }
}

fn extract_public_key(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    PUBLIC_KEY_POINTERS
        .iter()
        .find_map(|pointer| value.pointer(pointer).and_then(Value::as_str))
        .map(str::to_owned)
}
