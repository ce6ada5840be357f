use std::{path::PathBuf, time::Duration};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use artistdl::{
    cli, config, error,
    retry::RetryPolicy,
    utils::{ReleaseKind, ReleaseKinds},
    warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Download the releases of every artist in the list
    Download(DownloadOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct DownloadOptions {
    /// File with one artist name per line
    #[clap(long, default_value = "artists.txt")]
    pub artists: PathBuf,

    /// Directory in which the per-artist directories are created
    #[clap(long, default_value = ".")]
    pub output: PathBuf,

    /// Attempts per catalog request (search, album listing)
    #[clap(long, default_value_t = 3)]
    pub retries: u32,

    /// Initial catalog backoff in seconds, doubled after every retry
    #[clap(long, default_value_t = 10)]
    pub delay: u64,

    /// Attempts per album download
    #[clap(long, default_value_t = 3)]
    pub download_retries: u32,

    /// Initial download backoff in seconds, doubled after every retry
    #[clap(long, default_value_t = 5)]
    pub download_delay: u64,

    /// Release type(s) to download; can be repeated or comma-separated
    #[clap(
        long = "type",
        value_enum,
        value_delimiter = ',',
        default_values_t = [ReleaseKind::Album, ReleaseKind::Single]
    )]
    pub release_types: Vec<ReleaseKind>,

    /// External downloader, invoked as `<downloader> download <album-url>`
    #[clap(long, env = "ARTISTDL_DOWNLOADER", default_value = config::DEFAULT_DOWNLOADER)]
    pub downloader: String,

    /// HTTP request timeout in seconds
    #[clap(long, default_value_t = 30)]
    pub request_timeout: u64,

    /// Exit with status 0 even if some artists or albums failed
    #[clap(long)]
    pub lenient: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Download(opt) => {
            let settings = cli::RunSettings {
                artists_file: opt.artists,
                output_dir: opt.output,
                catalog_policy: RetryPolicy::new(opt.retries, Duration::from_secs(opt.delay)),
                download_policy: RetryPolicy::new(
                    opt.download_retries,
                    Duration::from_secs(opt.download_delay),
                ),
                release_kinds: ReleaseKinds::new(&opt.release_types),
                downloader: opt.downloader,
                request_timeout: Duration::from_secs(opt.request_timeout),
            };

            let report = match cli::download(&settings).await {
                Ok(report) => report,
                Err(e) => {
                    error!("Cannot start download. Err: {}", e);
                }
            };

            if report.has_failures() && !opt.lenient {
                warning!("Some artists or albums could not be downloaded.");
                std::process::exit(1);
            }
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
