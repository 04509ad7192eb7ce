use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "sky-migrate",
    version,
    about = "Rewrite schemaVersion 2 sky documents under <ROOT>/assets/*/sky/ in place"
)]
struct Cli {
    /// Resource pack or mod root containing an `assets/` directory.
    root: Option<PathBuf>,

    /// Report what would change without writing any file.
    #[arg(long)]
    dry_run: bool,

    /// Also log per-step debug output.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings.
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Usage goes to stdout and the exit status is 1 for every argument problem.
fn usage_and_exit() -> ! {
    println!("{}", Cli::command().render_usage());
    std::process::exit(1);
}

fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            usage_and_exit();
        }
    };
    let Some(root) = cli.root.clone() else {
        usage_and_exit();
    };

    init_tracing(&cli);

    let opts = skymigrate::RunOpts {
        dry_run: cli.dry_run,
    };
    let report = skymigrate::run(&root, &opts);

    let mut out = std::io::stdout().lock();
    write!(out, "{report}").context("write report")?;
    out.flush().context("flush report")?;
    Ok(())
}
