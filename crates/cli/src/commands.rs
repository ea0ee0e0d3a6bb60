//! CLI command definitions, routing, and tracing setup.

use std::fmt::Write as _;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pipeline::{Output, OutputData, RawResponse};
use tracing::info;

use crate::config::load_pipeline;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// skillchain: rebuild and query annotation service output trees.
#[derive(Parser)]
#[command(
    name = "skillchain",
    version,
    about = "Rebuild annotation service responses into output trees and query them.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// List the standard skill types.
    Skills,

    /// Rebuild the output tree for a response and print it.
    Inspect {
        #[command(flatten)]
        tree: TreeArgs,

        /// Print the tree as JSON instead of an outline.
        #[arg(long)]
        json: bool,
    },

    /// Resolve a dotted name path (e.g. `summarize.keywords`) and print it as JSON.
    Get {
        #[command(flatten)]
        tree: TreeArgs,

        /// Names to resolve, one per tree level, separated by dots.
        path: String,
    },
}

/// Inputs needed to rebuild an output tree.
#[derive(Args)]
pub(crate) struct TreeArgs {
    /// Pipeline config (TOML).
    #[arg(short, long, env = "SKILLCHAIN_PIPELINE")]
    pub pipeline: PathBuf,

    /// Raw service response (JSON); `-` reads stdin.
    #[arg(short, long, default_value = "-")]
    pub response: PathBuf,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match cli.verbose {
        0 => "warn,cli=info",
        1 => "info,pipeline=debug,skills=debug,cli=debug",
        _ => "debug,pipeline=trace,skills=trace,cli=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    // Logs go to stderr so stdout stays clean for command output.
    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Skills => {
            print!("{}", render_catalogue());
            Ok(())
        }
        Command::Inspect { tree, json } => {
            let root = build_tree(&tree)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&root)?);
            } else {
                print!("{}", render_outline(&root));
            }
            Ok(())
        }
        Command::Get { tree, path } => {
            let root = build_tree(&tree)?;
            let names: Vec<&str> = path.split('.').collect();
            let data = root
                .resolve_path(&names)
                .with_context(|| format!("failed to resolve '{path}'"))?;
            println!("{}", serde_json::to_string_pretty(data)?);
            Ok(())
        }
    }
}

fn build_tree(args: &TreeArgs) -> Result<Output> {
    let pipeline = load_pipeline(&args.pipeline)?;
    let response = read_response(&args.response)?;
    let root = Output::build(&pipeline, &response).with_context(|| {
        format!(
            "response does not fit pipeline `{pipeline}` ({} records, {} expected)",
            response.output.len(),
            pipeline.expected_records()
        )
    })?;
    info!(%pipeline, records = response.output.len(), "Rebuilt output tree");
    Ok(root)
}

fn read_response(path: &Path) -> Result<RawResponse> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read response from stdin")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read response {}", path.display()))?
    };
    Ok(RawResponse::from_json(&text)?)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_catalogue() -> String {
    let mut out = String::new();
    for entry in skills::catalogue() {
        let d = &entry.descriptor;
        let kind = if d.is_generator { "generator" } else { "annotator" };
        let _ = write!(out, "{:<22} {:<18} {:<9}", d.type_name, d.service_name, kind);
        if !d.label_type.is_empty() {
            let _ = write!(out, " labels={}", d.label_type);
        }
        if !d.param_fields.is_empty() {
            let _ = write!(out, " params={}", d.param_fields.join(","));
        }
        out.push('\n');
    }
    out
}

/// Renders a node and its descendants as an indented outline.
fn render_outline(root: &Output) -> String {
    let mut out = String::new();
    write_node(&mut out, root, 0);
    out
}

fn write_node(out: &mut String, node: &Output, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{indent}{:?}", node.text());
    for (skill, data) in node.iter() {
        match data {
            OutputData::Labels(labels) => {
                let _ = writeln!(out, "{indent}- {}: {} label(s)", skill.key(), labels.len());
                for label in labels {
                    let fragment = label.fragment(node.text()).unwrap_or("");
                    let _ = writeln!(
                        out,
                        "{indent}    {} {:?} {} {}",
                        label.name, fragment, label.span, label.value
                    );
                }
            }
            OutputData::Output(child) => {
                let _ = writeln!(out, "{indent}- {}:", skill.key());
                write_node(out, child, depth + 1);
            }
        }
    }
}
