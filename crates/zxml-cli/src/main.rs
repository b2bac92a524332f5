use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use zxml::{Config, Tag};

#[derive(Debug, Parser)]
#[command(
    name = "zxml",
    version,
    about = "Parse an XML document and query it by path"
)]
struct Args {
    /// Input file (defaults to stdin)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,
    /// Slash-separated path; numeric segments select by index (e.g. root/item/0/$id)
    #[arg(short, long, value_name = "PATH")]
    path: Option<String>,
    /// What to print for the selection
    #[arg(short, long, value_enum, default_value_t = FormatArg::Value)]
    format: FormatArg,
    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,
    /// Maximum element nesting depth (0 means unlimited)
    #[arg(long, value_name = "DEPTH", default_value_t = Config::default().max_depth)]
    max_depth: u32,
    /// Maximum input size in bytes (0 means unlimited)
    #[arg(long, value_name = "BYTES", default_value_t = Config::default().max_size)]
    max_size: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Text of the selection
    Value,
    /// Child tag names, one per line
    Tags,
    /// Attribute keys, one per line
    Attributes,
    /// The selection as JSON
    Json,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let args = Args::parse();
    let input_data = read_input(args.input.as_ref())?;
    let config = Config::new(args.max_depth, args.max_size);

    let document = zxml::from_bytes_with_config(&input_data, config).with_context(|| {
        match &args.input {
            Some(path) => format!("failed to parse {}", path.display()),
            None => "failed to parse stdin".to_string(),
        }
    })?;

    let selection = select(document.tag(), args.path.as_deref().unwrap_or_default());
    debug!("selected {} value(s)", selection.count());

    let Some(rendered) = render(&selection, args.format)? else {
        return Ok(ExitCode::FAILURE);
    };
    write_output(args.output.as_ref(), rendered.as_bytes())?;
    Ok(ExitCode::SUCCESS)
}

/// Walk a `/`-separated path; all-digit segments are indices
fn select<'a>(root: Tag<'a>, path: &str) -> Tag<'a> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root, |tag, segment| match segment.parse::<usize>() {
            Ok(index) => tag.get(index),
            Err(_) => tag.get(segment),
        })
}

/// Render the selection, `None` when a value was asked for and there is none
fn render(selection: &Tag<'_>, format: FormatArg) -> Result<Option<String>> {
    let rendered = match format {
        FormatArg::Value => match selection.value() {
            Some(value) => format!("{value}\n"),
            None => return Ok(None),
        },
        FormatArg::Tags => lines(selection.tags()),
        FormatArg::Attributes => lines(selection.attributes()),
        FormatArg::Json => {
            let mut json =
                serde_json::to_string_pretty(selection).context("failed to encode JSON")?;
            json.push('\n');
            json
        }
    };
    Ok(Some(rendered))
}

fn lines<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items.into_iter().fold(String::new(), |mut out, item| {
        out.push_str(item);
        out.push('\n');
        out
    })
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("failed to read stdin")?;
            if buffer.iter().all(u8::is_ascii_whitespace) {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
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
            Ok(())
        }
    }
}
