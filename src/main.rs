use std::env;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use depgraph::view::json;
use depgraph::{
    parse, Coordinates, GraphBuilder, GraphView, GraphWriter, RenderFormat, ResolutionResult,
    SourceKind, Variant, ROOT_BUILD_PATH,
};

#[derive(Parser)]
#[command(name = "depgraph")]
#[command(version)]
#[command(about = "Dependency graph builder and renderer for multi-project builds", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a graph view from a resolution result
    Build {
        /// Resolution result (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Variant name, e.g. "debug" or "main"
        #[arg(long, default_value = "main")]
        variant: String,

        /// Source set kind (main, test, android-test, test-fixtures, custom)
        #[arg(long, default_value = "main")]
        kind: SourceKind,

        /// Name of the resolved configuration
        #[arg(short, long)]
        configuration: String,

        /// Keep only edges between projects of the current build
        #[arg(long)]
        local_only: bool,

        /// Direct dependency of the root not backed by metadata (repeatable)
        #[arg(long = "flat-file", value_name = "COORDINATES")]
        flat_files: Vec<String>,

        /// Where to write the graph view (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render a graph view as DOT or topological text
    Render {
        /// Graph view (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "dot")]
        format: RenderFormat,

        /// Build the graph is rendered from
        #[arg(long, default_value = ROOT_BUILD_PATH)]
        build_path: String,

        /// Where to write the rendering (defaults to stdout). A directory gets
        /// `<input stem>.<gv|txt>` inside it.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the file-system-safe name of a coordinate
    FileName {
        /// Coordinates such as "com.google:guava:1.0" or ":app"
        coordinates: String,
    },
    /// Show version information
    Version,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Build {
            input,
            variant,
            kind,
            configuration,
            local_only,
            flat_files,
            output,
        }) => {
            let flat_files = flat_files
                .iter()
                .map(|raw| parse(raw))
                .collect::<Result<Vec<Coordinates>, _>>()
                .context("Invalid --flat-file coordinates")?;

            let file = File::open(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let resolution: ResolutionResult = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse resolution result {}", input.display()))?;

            let graph = GraphBuilder::new()
                .local_only(local_only)
                .with_flat_files(flat_files)
                .build(&resolution)
                .with_context(|| format!("Failed to build graph from {}", input.display()))?;
            info!(
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                "built dependency graph"
            );

            let view = GraphView::new(Variant::new(variant, kind), configuration, graph);
            let mut buffer = Vec::new();
            json::write_to(&view, &mut buffer).context("Failed to encode graph view")?;
            emit(&buffer, output.as_deref())?;
        }
        Some(Commands::Render {
            input,
            format,
            build_path,
            output,
        }) => {
            let file = File::open(&input)
                .with_context(|| format!("Failed to open {}", input.display()))?;
            let view = json::read_from(BufReader::new(file))
                .with_context(|| format!("Failed to read graph view {}", input.display()))?;

            let writer = GraphWriter::new(build_path);
            let text = writer
                .render_to_string(format, view.graph())
                .with_context(|| format!("Failed to render {} as {}", input.display(), format))?;
            let output = output.map(|path| render_target(path, &input, format));
            emit(text.as_bytes(), output.as_deref())?;
        }
        Some(Commands::FileName { coordinates }) => {
            let coordinates = parse(&coordinates)?;
            println!("{}", coordinates.to_file_name());
        }
        Some(Commands::Version) => {
            println!("depgraph v{}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("depgraph - Dependency graph builder and renderer");
            println!("Run 'depgraph build' to build a graph view from a resolution result");
            println!("Run 'depgraph render' to render a graph view");
            println!("Run 'depgraph --help' for more information");
        }
    }

    Ok(())
}

/// Resolves a directory output to a file named after the input view.
fn render_target(output: PathBuf, input: &Path, format: RenderFormat) -> PathBuf {
    if !output.is_dir() {
        return output;
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "graph".to_string());
    output.join(format!("{}.{}", stem, format.extension()))
}

/// Writes `bytes` to `path` as a whole, or to stdout.
fn emit(bytes: &[u8], path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), "wrote output");
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            out.write_all(bytes)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DEPGRAPH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "depgraph=debug,info"
        } else {
            "depgraph=info,warn"
        })
    });

    let format = env::var("DEPGRAPH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}
