use clap::Parser;

/// Relay Travis CI results to GitHub and trigger builds from Netlify deploys
#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Args {
    /// Telemetry URL (disabled as default)
    #[clap(long)]
    pub telemetry_url: Option<String>,

    /// Travis API URL (https://api.travis-ci.org as default)
    #[clap(long)]
    pub travis_api_url: Option<String>,

    /// GitHub API URL (https://api.github.com as default)
    #[clap(long)]
    pub github_api_url: Option<String>,

    /// Target repository slug, e.g. org/repo
    #[clap(long)]
    pub target_repo: Option<String>,

    /// Name of the pipeline stage gating status relay (e2e as default)
    #[clap(long)]
    pub gated_stage: Option<String>,

    /// Command
    #[clap(subcommand)]
    pub command: SubCommand,
}

#[derive(Parser, Debug)]
pub enum SubCommand {
    /// Run server
    Serve(ServeCommand),
    /// Trigger a Travis build against a deployed site
    Trigger(TriggerCommand),
}

#[derive(Parser, Debug)]
pub struct ServeCommand {
    /// Bind IP
    #[clap(long)]
    pub bind_ip: Option<String>,
}

#[derive(Parser, Debug)]
pub struct TriggerCommand {
    /// Branch to build
    #[clap(long)]
    pub branch: String,

    /// URL of the deployed site under test
    #[clap(long)]
    pub site_url: String,

    /// Title used in the build message
    #[clap(long)]
    pub title: Option<String>,
}
