use axum::{extract::Extension, http::HeaderMap};

use crate::{
    backends::github::{self, CommitStatus},
    config::Config,
    error::ErrorCode,
    http::RelayResponse,
    repository_path::RepositoryPath,
    server_info::APP_NAME,
    service::ServiceHandler,
};

use super::{
    apiclient::Client, normalize, SignatureVerifier, SignedPayload, StatusEvent,
    VerificationOutcome,
};

pub const SIGNATURE_HEADER: &str = "Signature";
pub const REPO_SLUG_HEADER: &str = "Travis-Repo-Slug";
const PAYLOAD_FIELD: &str = "payload";

#[tracing::instrument(skip(config, services, body), fields(body_len = body.len()))]
pub async fn webhook(
    headers: HeaderMap,
    body: String,
    config: Extension<Config>,
    services: Extension<ServiceHandler>,
) -> Result<RelayResponse, ErrorCode> {
    relay_status(&config, &services, &headers, &body).await
}

/// Relays a Travis build notification to GitHub as a commit status.
///
/// Steps run strictly in order and stop at the first failure.
pub async fn relay_status(
    config: &Config,
    services: &ServiceHandler,
    headers: &HeaderMap,
    body: &str,
) -> Result<RelayResponse, ErrorCode> {
    let signed = extract_signed_payload(headers, body)?;

    match SignatureVerifier::new(config, services.fetcher())
        .verify(&signed)
        .await
    {
        VerificationOutcome::Verified => {}
        VerificationOutcome::Failed => return Err(ErrorCode::InvalidSignature),
        VerificationOutcome::NetworkError(e) => return Err(ErrorCode::SignatureKeyUnavailable(e)),
    }

    let event: StatusEvent = serde_json::from_str(&signed.payload).map_err(|e| {
        tracing::error!(message = "Malformed notification payload", error = %e, payload = %signed.payload);
        ErrorCode::MalformedEventBody(e)
    })?;
    let build_id = event.id.as_ref().ok_or_else(|| {
        tracing::error!(message = "Notification without build id", payload = %signed.payload);
        ErrorCode::MalformedEventBodyField("id".into(), "missing build identifier".into())
    })?;

    let build_info = Client::new(config, services.fetcher())
        .get_build_info(build_id)
        .await
        .map_err(|e| {
            tracing::error!(message = "Could not fetch build info", build_id = %build_id, error = %e);
            ErrorCode::BuildInfoUnavailable(e.to_string())
        })?;

    let gated_stage = config.gated_stage();
    if !build_info.has_stage(gated_stage) {
        tracing::info!(message = "Build has no gated stage", build_id = %build_id, stage = gated_stage);
        return Ok(RelayResponse::ok(format!(
            "Build {build_id} has no '{gated_stage}' stage, nothing to relay"
        )));
    }

    let commit = event.target_commit().ok_or_else(|| {
        tracing::error!(message = "Notification without commit", build_id = %build_id, payload = %signed.payload);
        ErrorCode::MalformedEventBodyField("head_commit".into(), "missing commit".into())
    })?;

    let status = normalize(&event.status_message).map_err(|e| {
        tracing::error!(
            message = "Received unknown status_message",
            status_message = %event.status_message,
            payload = %signed.payload
        );
        ErrorCode::UnknownStatusMessage(e.0)
    })?;

    let repository = resolve_repository(config, headers, &event)?;
    let commit_status = CommitStatus {
        state: status.state,
        target_url: event.build_url.clone(),
        context: APP_NAME.into(),
        description: status.description,
    };

    github::Client::new(config, services.fetcher())
        .create_status(&repository, commit, &commit_status)
        .await
        .map_err(|e| {
            tracing::error!(
                message = "Could not create commit status",
                repository = %repository,
                commit = commit,
                error = %e
            );
            ErrorCode::StatusUpdateFailed(e.to_string())
        })?;

    Ok(RelayResponse::created(format!(
        "Status '{}' created for commit {commit}",
        commit_status.state
    )))
}

/// Raw JSON bodies are taken as is, anything else is read as a form with a
/// `payload` field.
fn extract_signed_payload(headers: &HeaderMap, body: &str) -> Result<SignedPayload, ErrorCode> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            tracing::error!(message = "Missing signature header", headers = ?headers);
            ErrorCode::MissingSignature
        })?;

    let payload = if body.trim_start().starts_with('{') {
        body.to_owned()
    } else {
        url::form_urlencoded::parse(body.as_bytes())
            .find(|(key, _)| key == PAYLOAD_FIELD)
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| {
                tracing::error!(message = "Missing payload field", body = %body);
                ErrorCode::MissingPayload
            })?
    };

    Ok(SignedPayload::new(payload, signature.to_owned()))
}

fn resolve_repository(
    config: &Config,
    headers: &HeaderMap,
    event: &StatusEvent,
) -> Result<RepositoryPath, ErrorCode> {
    let header_slug = headers
        .get(REPO_SLUG_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_owned);

    let (source, slug) = if let Some(slug) = header_slug {
        (REPO_SLUG_HEADER, slug)
    } else if let Some(slug) = event.repository_slug() {
        ("repository", slug)
    } else if let Some(slug) = config.target_repo() {
        ("NTP_TARGET_REPO", slug.to_owned())
    } else {
        tracing::error!(message = "No repository slug available", headers = ?headers);
        return Err(ErrorCode::MissingRepositorySlug);
    };

    RepositoryPath::new(&slug).map_err(|e| {
        tracing::error!(message = "Malformed repository slug", source = source, slug = %slug, error = %e);
        ErrorCode::MalformedEventBodyField(source.into(), e.to_string())
    })
}
