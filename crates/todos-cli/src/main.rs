mod collect;
mod output;

use clap::Parser;
use std::path::PathBuf;
use todos_core::config::DEFAULT_OUTPUT_FILE;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(
    name = "get-todos",
    about = "Collect the open `* [ ]` todos from a folder of Markdown notes into one file",
    version
)]
struct Cli {
    /// Notes folder to scan recursively
    path: PathBuf,

    /// Destination file, relative to the current directory
    #[arg(long, short = 'o', env = "GET_TODOS_OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Heading used for notes that sit directly in the scanned folder
    /// (default: the folder's own name)
    #[arg(long, env = "GET_TODOS_ROOT_LABEL")]
    root_label: Option<String>,

    /// Output as JSON
    #[arg(long, short = 'j')]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = collect::CollectArgs {
        root: cli.path,
        output: cli.output,
        root_label: cli.root_label,
    };

    if let Err(e) = collect::run(args, cli.json) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
