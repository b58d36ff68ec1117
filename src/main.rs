use clap::Parser;

use netlify_travis_proxy::backends::netlify::{
    trigger_preview_build, DeployEvent, DEPLOY_PREVIEW_CONTEXT,
};
use netlify_travis_proxy::cmdargs::{Args, SubCommand};
use netlify_travis_proxy::config::{Config, ConfigError};
use netlify_travis_proxy::http::start_server;
use netlify_travis_proxy::logging::TracingSetup;
use netlify_travis_proxy::service::ServiceHandler;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> color_eyre::Result<()> {
    dotenv::dotenv().ok();
    color_eyre::install().ok();

    let args = Args::parse();
    let config = build_configuration(&args)?;
    let services = ServiceHandler::new_defaults()?;

    TracingSetup::with_setup(config, |config| async move {
        match args.command {
            SubCommand::Serve(_) => start_server(config, services).await?,
            SubCommand::Trigger(trigger_args) => {
                let event = DeployEvent {
                    deploy_ssl_url: Some(trigger_args.site_url),
                    branch: Some(trigger_args.branch),
                    context: Some(DEPLOY_PREVIEW_CONTEXT.into()),
                    title: trigger_args.title,
                };

                let response =
                    trigger_preview_build(&config, services.fetcher(), &event).await?;
                tracing::info!(
                    message = response.message(),
                    status = %response.status_code()
                );
            }
        }

        Ok(())
    })
    .await
}

fn build_configuration(args: &Args) -> Result<Config, ConfigError> {
    let mut config = Config::from_env();

    if let Some(t) = &args.telemetry_url {
        config.set_telemetry_url(t.clone());
    }

    if let Some(u) = &args.travis_api_url {
        config.set_travis_api_url(u.clone());
    }

    if let Some(u) = &args.github_api_url {
        config.set_github_api_url(u.clone());
    }

    if let Some(r) = &args.target_repo {
        config.set_target_repo(r.clone());
    }

    if let Some(s) = &args.gated_stage {
        config.set_gated_stage(s.clone());
    }

    if let SubCommand::Serve(serve_args) = &args.command {
        if let Some(b) = &serve_args.bind_ip {
            config.set_bind_ip(b.clone());
        }
    }

    match &args.command {
        SubCommand::Serve(_) => config.validate_server_configuration()?,
        SubCommand::Trigger(_) => config.validate_configuration()?,
    }

    Ok(config)
}
