pub mod middleware;

use axum::extract::Extension;

use crate::{
    backends::travis::{self, BuildRequest},
    config::Config,
    error::ErrorCode,
    fetch::HttpFetch,
    http::RelayResponse,
    repository_path::RepositoryPath,
    server_info::APP_NAME,
    service::ServiceHandler,
};

use super::DeployEvent;

#[tracing::instrument(skip(config, services, body), fields(body_len = body.len()))]
pub async fn webhook(
    body: String,
    config: Extension<Config>,
    services: Extension<ServiceHandler>,
) -> Result<RelayResponse, ErrorCode> {
    let event: DeployEvent = serde_json::from_str(&body).map_err(|e| {
        tracing::error!(message = "Malformed deploy notification", error = %e, body = %body);
        ErrorCode::MalformedEventBody(e)
    })?;

    trigger_preview_build(&config, services.fetcher(), &event).await
}

/// Requests a Travis build testing a deploy preview. Other deploy contexts
/// are acknowledged without any outbound call.
#[tracing::instrument(skip(config, fetcher))]
pub async fn trigger_preview_build(
    config: &Config,
    fetcher: &dyn HttpFetch,
    event: &DeployEvent,
) -> Result<RelayResponse, ErrorCode> {
    if !event.is_deploy_preview() {
        tracing::info!(message = "Ignoring deploy", context = %event.context());
        return Ok(RelayResponse::ok(format!(
            "Wont trigger Travis build upon {}",
            event.context()
        )));
    }

    let repository = match config.target_repo() {
        Some(repo) => RepositoryPath::new(repo).map_err(|e| {
            tracing::error!(message = "Malformed target repository", target_repo = repo, error = %e);
            ErrorCode::MalformedEventBodyField("NTP_TARGET_REPO".into(), e.to_string())
        })?,
        None => {
            tracing::error!(message = "No target repository configured", branch = event.branch());
            return Err(ErrorCode::MissingRepositorySlug);
        }
    };

    let request = BuildRequest::new(
        format!("{}: {}", APP_NAME, event.title()),
        event.branch().to_owned(),
        config.gated_stage().to_owned(),
        event.deploy_ssl_url().to_owned(),
    );

    travis::Client::new(config, fetcher)
        .trigger_build(&repository, &request)
        .await
        .map_err(|e| {
            tracing::error!(
                message = "Could not trigger Travis build",
                repository = %repository,
                branch = event.branch(),
                error = %e
            );
            ErrorCode::BuildTriggerFailed(e.to_string())
        })?;

    Ok(RelayResponse::created(format!(
        "Travis build triggered for branch '{}'",
        event.branch()
    )))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request, Router};
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::{
        config::Config,
        crypto::test_keys,
        error::ErrorCode,
        fetch::{fake::FakeFetcher, FetchError, FetchMethod, FetchResponse},
        http::{
            build_http_router,
            test_utils::{assert_response_is_error, response_to_json},
        },
        service::ServiceHandler,
    };

    fn create_test_config() -> Config {
        let mut config = Config::empty();
        config.set_travis_api_url("https://api.travis-ci.org");
        config.set_travis_access_token("secret-token");
        config.set_target_repo("org/repo");
        config
    }

    fn create_test_app(config: Config, fetcher: FakeFetcher) -> (Router, ServiceHandler) {
        let services = ServiceHandler::new(Arc::new(fetcher));
        (build_http_router(config, services.clone()), services)
    }

    fn extract_fake_fetcher(services: &ServiceHandler) -> &FakeFetcher {
        services
            .fetcher()
            .as_any()
            .downcast_ref::<FakeFetcher>()
            .unwrap()
    }

    fn deploy_request(body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhook/netlify")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn preview_event() -> serde_json::Value {
        json!({
            "deploy_ssl_url": "https://deploy.to.this",
            "branch": "preview-branch",
            "title": "commit message",
            "context": "deploy-preview"
        })
    }

    #[tokio::test]
    async fn test_ignores_other_contexts() {
        let (app, services) = create_test_app(create_test_config(), FakeFetcher::new());

        let response = app
            .oneshot(deploy_request(&json!({ "context": "deploy" })))
            .await
            .unwrap();

        let status = response.status();
        let data = response_to_json(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(data, json!({"message": "Wont trigger Travis build upon deploy"}));
        assert!(!extract_fake_fetcher(&services).travis_requests.called());
    }

    #[tokio::test]
    async fn test_triggers_build_for_deploy_preview() {
        let (app, services) = create_test_app(create_test_config(), FakeFetcher::new());

        let response = app.oneshot(deploy_request(&preview_event())).await.unwrap();

        let status = response.status();
        let data = response_to_json(response).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            data,
            json!({"message": "Travis build triggered for branch 'preview-branch'"})
        );

        let calls = extract_fake_fetcher(&services).travis_requests.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, FetchMethod::Post);
        assert_eq!(
            calls[0].url,
            "https://api.travis-ci.org/repo/org%2Frepo/requests"
        );
        assert_eq!(calls[0].header_value("Travis-API-Version"), Some("3"));
        assert_eq!(
            calls[0].header_value("Authorization"),
            Some("token secret-token")
        );
        assert_eq!(
            calls[0].body,
            Some(json!({
                "message": "netlify-travis-proxy: commit message",
                "request": {
                    "branch": "preview-branch",
                    "config": {
                        "env": {
                            "TEST": "e2e",
                            "SITE_URL": "https://deploy.to.this"
                        }
                    }
                }
            }))
        );
    }

    #[tokio::test]
    async fn test_ignores_other_contexts_with_null_fields() {
        let (app, services) = create_test_app(create_test_config(), FakeFetcher::new());

        let response = app
            .oneshot(deploy_request(&json!({
                "context": "production",
                "branch": "main",
                "deploy_ssl_url": null,
                "title": null
            })))
            .await
            .unwrap();

        let status = response.status();
        let data = response_to_json(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(data, json!({"message": "Wont trigger Travis build upon production"}));
        assert!(!extract_fake_fetcher(&services).travis_requests.called());
    }

    #[tokio::test]
    async fn test_deploy_preview_with_bare_body_still_posts() {
        let (app, services) = create_test_app(create_test_config(), FakeFetcher::new());

        let response = app
            .oneshot(deploy_request(&json!({ "context": "deploy-preview" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(extract_fake_fetcher(&services).travis_requests.called());
    }

    #[tokio::test]
    async fn test_trigger_failure() {
        let fetcher = FakeFetcher::new().with_travis_requests(Err(FetchError::RequestFailed(
            "https://api.travis-ci.org/repo/org%2Frepo/requests".into(),
            "connection reset".into(),
        )));
        let (app, _) = create_test_app(create_test_config(), fetcher);

        let response = app.oneshot(deploy_request(&preview_event())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_trigger_rejected_by_travis() {
        let fetcher =
            FakeFetcher::new().with_travis_requests(Ok(FetchResponse::new(403, "forbidden")));
        let (app, _) = create_test_app(create_test_config(), fetcher);

        let response = app.oneshot(deploy_request(&preview_event())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_missing_target_repo() {
        let mut config = Config::empty();
        config.set_travis_api_url("https://api.travis-ci.org");
        let (app, services) = create_test_app(config, FakeFetcher::new());

        let response = app.oneshot(deploy_request(&preview_event())).await.unwrap();

        let status = response.status();
        assert_response_is_error(response, ErrorCode::MissingRepositorySlug).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!extract_fake_fetcher(&services).travis_requests.called());
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (app, _) = create_test_app(create_test_config(), FakeFetcher::new());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook/netlify")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let data = response_to_json(response).await;
        assert_eq!(
            data,
            json!({
                "internal_code": 5,
                "message": "Malformed event body: 'EOF while parsing a value at line 1 column 0'"
            })
        );
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_signature_required_when_secret_configured() {
        let mut config = create_test_config();
        config.set_netlify_webhook_secret("jws-secret");
        let (app, services) = create_test_app(config, FakeFetcher::new());

        let response = app.oneshot(deploy_request(&preview_event())).await.unwrap();

        let status = response.status();
        assert_response_is_error(response, ErrorCode::InvalidDeploySignature).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(!extract_fake_fetcher(&services).travis_requests.called());
    }

    #[tokio::test]
    async fn test_valid_signature_passes_through() {
        let mut config = create_test_config();
        config.set_netlify_webhook_secret("jws-secret");
        let (app, services) = create_test_app(config, FakeFetcher::new());
        let body = preview_event().to_string();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook/netlify")
                    .header(
                        "X-Webhook-Signature",
                        test_keys::netlify_token("jws-secret", "netlify", &body),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(extract_fake_fetcher(&services).travis_requests.called());
    }

    #[tokio::test]
    async fn test_signature_for_other_body_rejected() {
        let mut config = create_test_config();
        config.set_netlify_webhook_secret("jws-secret");
        let (app, _) = create_test_app(config, FakeFetcher::new());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook/netlify")
                    .header(
                        "X-Webhook-Signature",
                        test_keys::netlify_token("jws-secret", "netlify", "{}"),
                    )
                    .body(Body::from(preview_event().to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
