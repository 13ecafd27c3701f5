use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mermaid_cli::{
    BrowserOpts, ChromeEngine, MermaidLibrary, RenderSession, RunMode, SessionOpts, WatchOpts,
};

/// Render MermaidJS documents to SVG files next to them.
#[derive(Parser, Debug)]
#[command(name = "mermaid-cli", version)]
struct Cli {
    /// MermaidJS documents to render; each must end with `.mmd`.
    #[arg(required = true, value_name = "FILE.mmd")]
    inputs: Vec<PathBuf>,

    /// Log lifecycle events to stderr (also accepted as `-log`).
    #[arg(short, long)]
    log: bool,

    /// Keep running and re-render files whenever they change (also accepted as `-watch`).
    #[arg(short, long)]
    watch: bool,

    /// Write every SVG into this directory instead of next to its source (also `-outdir=DIR`).
    #[arg(long = "outdir", value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// MermaidJS bundle to load into the browser.
    #[arg(long, env = "MERMAID_JS", default_value = "mermaid.min.js")]
    mermaid_js: PathBuf,

    /// MermaidJS theme.
    #[arg(long, default_value = "default")]
    theme: String,

    /// Chrome/Chromium executable (auto-detected when unset).
    #[arg(long, env = "CHROME")]
    chrome: Option<PathBuf>,

    /// Launch the browser without its sandbox (needed when running as root in containers).
    #[arg(long)]
    no_sandbox: bool,
}

// Single-dash long flags that must not be read as clusters of short ones (`-log` is not
// `-l -o g`).
const SINGLE_DASH_LONG: [&str; 3] = ["log", "watch", "outdir"];

/// Rewrite `-log`, `-watch`, `-outdir DIR` and `-outdir=DIR` to their `--` forms.
///
/// Arguments after a `--` terminator are left alone.
fn normalize_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut rest_positional = false;
    args.into_iter()
        .map(|arg| {
            if rest_positional {
                return arg;
            }
            if arg == "--" {
                rest_positional = true;
                return arg;
            }
            if !is_single_dash_long(&arg) {
                return arg;
            }
            let mut long = OsString::from("-");
            long.push(&arg);
            long
        })
        .collect()
}

fn is_single_dash_long(arg: &OsString) -> bool {
    let Some(flag) = arg.as_encoded_bytes().strip_prefix(b"-") else {
        return false;
    };
    let name = flag.split(|&b| b == b'=').next().unwrap_or(flag);
    SINGLE_DASH_LONG.iter().any(|long| name == long.as_bytes())
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    init_logging(cli.log);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Always shown, whether or not --log was given.
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(enabled: bool) {
    let filter = if enabled {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::new("off")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let pairs = mermaid_cli::resolve_pairs(&cli.inputs, cli.out_dir.as_deref())?;

    // Installed before the browser starts so an early Ctrl-C still goes through teardown.
    let interrupt = if cli.watch {
        let (tx, rx) = mpsc::channel();
        ctrlc::set_handler(move || {
            let _ = tx.send(());
        })
        .context("install interrupt handler")?;
        Some(rx)
    } else {
        None
    };

    let library = MermaidLibrary::from_path(&cli.mermaid_js)?;
    let browser = BrowserOpts {
        executable: cli.chrome,
        sandbox: !cli.no_sandbox,
    };
    let session_opts = SessionOpts { theme: cli.theme };

    let engine = ChromeEngine::launch(&browser)?;
    let session = RenderSession::start(engine, &library, &session_opts)?;

    let mode = match interrupt.as_ref() {
        Some(interrupt) => RunMode::Watch {
            opts: WatchOpts::default(),
            interrupt,
        },
        None => RunMode::Once,
    };
    mermaid_cli::run(session, &pairs, mode)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/bin/cli.rs"]
mod tests;
