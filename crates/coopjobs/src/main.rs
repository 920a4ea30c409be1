use crate::prelude::*;
use clap::Parser;

mod error;
mod jobs;
mod prelude;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Search, filter and sort the Co-op Job Repository listing"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Base URL of the job listing backend (default: VERCEL_URL, then http://localhost:3000)
    #[clap(long, env = "COOPJOBS_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[clap(long, env = "COOPJOBS_TIMEOUT", global = true, default_value = "30")]
    timeout: u64,

    /// Whether to display additional information.
    #[clap(long, env = "COOPJOBS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Fetch the job listing and print it as a table
    List(crate::jobs::list::ListOptions),

    /// Serve the job listing as an HTML page
    Serve(crate::jobs::serve::ServeOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::List(options) => crate::jobs::list::run(options, app.global).await,
        SubCommands::Serve(options) => crate::jobs::serve::run(options, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
