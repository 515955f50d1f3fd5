use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use jxml::Config;

#[derive(Debug, Parser)]
#[command(name = "jxml", version, about = "Convert between JSON and XML")]
struct Args {
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Input format (json, xml); inferred from the file extension or from --to
    #[arg(short, long, value_enum)]
    from: Option<FormatArg>,
    /// Output format (json, xml)
    #[arg(short, long, value_enum)]
    to: FormatArg,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Drop namespace prefixes from element names
    #[arg(long)]
    strip_namespaces: bool,
    /// Attribute marker; the text key is the marker doubled plus "text"
    #[arg(short, long, default_value = jxml::naming::DEFAULT_DELIMITER)]
    delimiter: String,
    /// Maximum nesting depth (0 = unlimited)
    #[arg(long, value_name = "N", default_value_t = Config::default().max_depth)]
    max_depth: u16,
    /// Maximum input size in bytes (0 = unlimited)
    #[arg(long, value_name = "N", default_value_t = Config::default().max_size)]
    max_size: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Json,
    Xml,
}

impl From<FormatArg> for jxml::Format {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => Self::Json,
            FormatArg::Xml => Self::Xml,
        }
    }
}

impl FormatArg {
    const fn other(self) -> Self {
        match self {
            Self::Json => Self::Xml,
            Self::Xml => Self::Json,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let from = args
        .from
        .or_else(|| infer_format(args.input.as_ref()))
        .unwrap_or_else(|| args.to.other());
    let config = Config::default()
        .with_keep_namespace(!args.strip_namespaces)
        .with_delimiter(args.delimiter.as_str())
        .with_max_depth(args.max_depth)
        .with_max_size(args.max_size);
    debug!(?from, to = ?args.to, ?config, "starting conversion");

    let input = read_input(args.input.as_ref())?;
    let output = jxml::convert_with_config(input.as_deref(), from.into(), args.to.into(), &config)?;

    write_output(args.output.as_ref(), output.as_bytes())?;
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

/// Read the whole input; empty stdin yields `None`
fn read_input(path: Option<&PathBuf>) -> Result<Option<String>> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map(Some)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.trim().is_empty() {
                return Ok(None);
            }
            Ok(Some(buffer))
        }
    }
}

fn write_output(path: Option<&PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data)
            .with_context(|| format!("failed to write output file {}", path.display())),
        None => {
            let mut stdout = io::stdout();
            stdout.write_all(data).context("failed to write stdout")?;
            stdout.write_all(b"\n").context("failed to write stdout")?;
            Ok(())
        }
    }
}

fn infer_format(path: Option<&PathBuf>) -> Option<FormatArg> {
    let ext = path?.extension().and_then(|s| s.to_str())?;
    match ext {
        "json" => Some(FormatArg::Json),
        "xml" => Some(FormatArg::Xml),
        _ => None,
    }
}
