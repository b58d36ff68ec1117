use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use hmac::{Hmac, Mac};
use rsa::{pkcs1::DecodeRsaPublicKey, pkcs8::DecodePublicKey, Pkcs1v15Sign, RsaPublicKey};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use thiserror::Error;

const NETLIFY_ISSUER: &str = "netlify";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("malformed public key: {0}")]
    MalformedPublicKey(String),
}

/// Parses a PEM public key, either SPKI (`BEGIN PUBLIC KEY`) or PKCS#1
/// (`BEGIN RSA PUBLIC KEY`).
pub fn parse_public_key(pem: &str) -> Result<RsaPublicKey, CryptoError> {
    let pem = pem.trim();
    RsaPublicKey::from_public_key_pem(pem)
        .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
        .map_err(|e| CryptoError::MalformedPublicKey(e.to_string()))
}

/// Checks an RSA PKCS#1 v1.5 / SHA-1 signature over `payload`.
///
/// The signature is accepted base64 or hex encoded; any decoding that
/// verifies is enough.
pub fn is_valid_rsa_sha1_signature(
    public_key: &RsaPublicKey,
    payload: &[u8],
    signature: &str,
) -> bool {
    let hashed = Sha1::digest(payload);
    let signature = signature.trim();

    [STANDARD.decode(signature).ok(), hex::decode(signature).ok()]
        .into_iter()
        .flatten()
        .any(|decoded| {
            public_key
                .verify(Pkcs1v15Sign::new::<Sha1>(), &hashed, &decoded)
                .is_ok()
        })
}

#[derive(Deserialize)]
struct NetlifyClaims {
    iss: String,
    sha256: String,
}

/// Checks a Netlify `X-Webhook-Signature` JWS (HS256) against the raw body.
pub fn is_valid_netlify_signature(token: &str, body: &[u8], secret: &str) -> bool {
    let mut parts = token.trim().split('.');
    let (header, claims, signature) = match (parts.next(), parts.next(), parts.next(), parts.next())
    {
        (Some(h), Some(c), Some(s), None) => (h, c, s),
        _ => return false,
    };

    let mut mac = match Hmac::<Sha256>::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    mac.update(header.as_bytes());
    mac.update(b".");
    mac.update(claims.as_bytes());

    let signature_ok = URL_SAFE_NO_PAD
        .decode(signature)
        .map(|decoded| mac.verify_slice(&decoded).is_ok())
        .unwrap_or(false);
    if !signature_ok {
        return false;
    }

    let claims: NetlifyClaims = match URL_SAFE_NO_PAD
        .decode(claims)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    {
        Some(c) => c,
        None => return false,
    };

    claims.iss == NETLIFY_ISSUER && claims.sha256 == hex::encode(Sha256::digest(body))
}
