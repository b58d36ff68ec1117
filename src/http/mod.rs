mod response;

#[cfg(test)]
pub(crate) mod test_utils;

use std::{net::SocketAddr, str::FromStr};

use axum::{
    extract::Extension,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use tower::ServiceBuilder;
use tower_http::{trace::TraceLayer, ServiceBuilderExt};

use crate::{
    backends::{netlify, netlify::middleware::VerifyNetlifySignatureLayer, travis},
    config::Config,
    error::{ErrorCode, ErrorCodeDetail},
    server_info::ServerInfo,
    service::ServiceHandler,
};

pub use self::response::RelayResponse;

impl IntoResponse for ErrorCode {
    fn into_response(self) -> Response {
        let details: ErrorCodeDetail = (&self).into();
        let status_code = details.status_code();
        let mut response = Json(details).into_response();
        *response.status_mut() = status_code;
        response
    }
}

#[tracing::instrument]
async fn root() -> Json<ServerInfo> {
    Json(ServerInfo::new())
}

#[tracing::instrument(skip(config, services))]
pub async fn start_server(config: Config, services: ServiceHandler) -> color_eyre::Result<()> {
    let addr = SocketAddr::from_str(config.bind_ip())?;
    let app = build_http_router(config, services);
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

pub(crate) fn build_http_router(config: Config, services: ServiceHandler) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .insert_response_header_if_not_present(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

    Router::new()
        .route("/", get(root))
        .route("/webhook/travis", post(travis::webhook))
        .route(
            "/webhook/netlify",
            post(netlify::webhook).layer(VerifyNetlifySignatureLayer::new(
                config.netlify_webhook_secret().map(|x| x.to_owned()),
            )),
        )
        .layer(middleware.into_inner())
        .layer(Extension(config))
        .layer(Extension(services))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request};
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    use super::{build_http_router, test_utils::response_to_json};
    use crate::{config::Config, fetch::fake::FakeFetcher, service::ServiceHandler};

    #[tokio::test]
    async fn test_root() {
        let services = ServiceHandler::new(Arc::new(FakeFetcher::new()));
        let app = build_http_router(Config::empty(), services);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let data = response_to_json(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            data,
            json!({
                "message": "netlify-travis-proxy, relaying builds!",
                "version": env!("CARGO_PKG_VERSION")
            })
        );
    }
}
