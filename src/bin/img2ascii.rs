//! CLI binary for img2ascii-client.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ClientConfig`/`ConvertParams`, converts each image in order and prints
//! a report for each.

use anyhow::{Context, Result};
use clap::Parser;
use img2ascii_client::{
    about, convert, save_to, write_report, ClientConfig, ConversionOutput, ConvertParams,
    DEFAULT_CHARSET, DEFAULT_ENDPOINT, DEFAULT_OUTPUT_FILE,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}

const AFTER_HELP: &str = r##"EXAMPLES:
  # Convert two images; the last result is saved to temp.txt
  img2ascii images.jpg images.png

  # Smaller output with a custom charset, no file written
  img2ascii --size 80 --charset "#+-. " --no-save photo.png

  # Talk to a remote server
  img2ascii --endpoint http://10.0.0.5:8080 photo.jpg -o art.txt

  # Ask the server about itself
  img2ascii --about

SERVER LIMITS:
  size     1–300        (out of range → server uses 100)
  charset  2–32 chars   (out of range → server uses "@%#*+=-:. ")
  Values outside these limits are still sent; a warning is logged.

ENVIRONMENT VARIABLES:
  IMG2ASCII_ENDPOINT   Server base URL
  IMG2ASCII_SIZE       Target size
  IMG2ASCII_CHARSET    Charset, darkest first
  IMG2ASCII_OUTPUT     File receiving the last result
  IMG2ASCII_TIMEOUT    Request timeout in seconds
  RUST_LOG             Override log filter (e.g. img2ascii_client=debug)
"##;

/// Convert images to ASCII art through a conversion server.
#[derive(Parser, Debug)]
#[command(
    name = "img2ascii",
    version,
    about = "Convert images to ASCII art through an img2ascii conversion server",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Images to convert, in order.
    #[arg(required_unless_present = "about")]
    images: Vec<PathBuf>,

    /// Target size of the longer image side, in characters.
    #[arg(short, long, env = "IMG2ASCII_SIZE", default_value_t = 300)]
    size: u32,

    /// Characters ordered darkest to lightest.
    #[arg(short, long, env = "IMG2ASCII_CHARSET", default_value = DEFAULT_CHARSET)]
    charset: String,

    /// Conversion server base URL.
    #[arg(short, long, env = "IMG2ASCII_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// File receiving the last conversion's ASCII art.
    #[arg(short, long, env = "IMG2ASCII_OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    /// Do not write the output file.
    #[arg(long, env = "IMG2ASCII_NO_SAVE")]
    no_save: bool,

    /// Request timeout in seconds. Unbounded when unset.
    #[arg(long, env = "IMG2ASCII_TIMEOUT")]
    timeout: Option<u64>,

    /// Print the server's /about message and exit.
    #[arg(long)]
    about: bool,

    /// Print each result as JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// Disable the spinner.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all logs except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner owns stderr while a request is in flight; keep INFO logs
    // from tearing through it.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.verbose;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    // ── About mode ───────────────────────────────────────────────────────
    if cli.about {
        let info = about(&config)
            .await
            .context("Failed to query the server's /about route")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info).context("Failed to serialise /about")?
            );
        } else {
            println!("{}", info.about);
            if let Some(tip) = info.tip {
                println!("Tip: {tip}");
            }
        }
        return Ok(());
    }

    let params = ConvertParams::new(cli.size, cli.charset.clone());
    for violation in params.server_limit_violations() {
        warn!("{violation}");
        if show_progress {
            eprintln!("warning: {violation}");
        }
    }

    // ── Convert each image, failing fast ─────────────────────────────────
    let mut last: Option<ConversionOutput> = None;
    for image in &cli.images {
        let spinner = show_progress.then(|| spinner_for(image));

        let result = convert(image, &params, &config).await;
        if let Some(sp) = spinner {
            sp.finish_and_clear();
        }
        let output = result.with_context(|| format!("Conversion of {} failed", image.display()))?;

        print_output(&cli, image, &params, &output)?;
        last = Some(output);
    }

    // ── Save the last result ─────────────────────────────────────────────
    if let Some(output) = last.filter(|_| !cli.no_save) {
        save_to(&cli.output, &output.ascii)
            .with_context(|| format!("Failed to save to {}", cli.output.display()))?;
        if !cli.quiet {
            eprintln!(
                "{} saved {} rows  →  {}",
                green("✔"),
                output.rows().count(),
                cli.output.display()
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ClientConfig`.
fn build_config(cli: &Cli) -> Result<ClientConfig> {
    let mut builder = ClientConfig::builder().endpoint(cli.endpoint.clone());
    if let Some(secs) = cli.timeout {
        builder = builder.timeout_secs(secs);
    }
    builder.build().context("Invalid configuration")
}

fn spinner_for(image: &Path) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("Converting");
    bar.set_message(image.display().to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn print_output(
    cli: &Cli,
    image: &Path,
    params: &ConvertParams,
    output: &ConversionOutput,
) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if cli.json {
        let json = serde_json::to_string_pretty(output).context("Failed to serialise output")?;
        writeln!(handle, "{json}").context("Failed to write to stdout")?;
    } else {
        write_report(&mut handle, image, params, output).context("Failed to write to stdout")?;
    }

    if !cli.quiet {
        eprintln!("{}", dim(&format!("{}ms", output.duration_ms)));
    }
    Ok(())
}
