use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use floorplan_core::{
    DEFAULT_OUTPUT_NAME, LayoutConfig, Orientation, PaperSize, assemble, discover_csv_files,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Directory scanned when neither `--data-dir` nor files are given.
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(name = "floorplan", version, about = "Draw room tables as floor plans to scale")]
struct Cli {
    /// More log output (`-v` debug, `-vv` trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render CSV room tables, one page per file.
    Render(RenderArgs),
    /// Print the effective layout configuration as JSON.
    Config(LayoutArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Pdf,
    Svg,
    Png,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Paper {
    A3,
    A4,
    A5,
    Letter,
}

impl From<Paper> for PaperSize {
    fn from(p: Paper) -> Self {
        match p {
            Paper::A3 => PaperSize::A3,
            Paper::A4 => PaperSize::A4,
            Paper::A5 => PaperSize::A5,
            Paper::Letter => PaperSize::Letter,
        }
    }
}

#[derive(Args, Debug)]
struct LayoutArgs {
    /// JSON layout configuration; missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Paper preset.
    #[arg(long, value_enum)]
    page: Option<Paper>,

    /// Turn the page to landscape.
    #[arg(long, default_value_t = false)]
    landscape: bool,

    /// Scale denominator (100 means 1:100).
    #[arg(long)]
    scale: Option<f64>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Render every `*.csv` in this directory, in file name order.
    #[arg(long, conflicts_with = "files")]
    data_dir: Option<PathBuf>,

    /// Explicit CSV files, rendered in the given order.
    files: Vec<PathBuf>,

    /// Output file (pdf) or directory (svg, png).
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Pdf)]
    format: Format,

    /// Raster resolution for `--format png`.
    #[arg(long, default_value_t = 150.0)]
    dpi: f32,

    #[command(flatten)]
    layout: LayoutArgs,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn load_layout(args: &LayoutArgs) -> anyhow::Result<LayoutConfig> {
    let mut cfg = match &args.config {
        Some(path) => LayoutConfig::from_json_file(path)?,
        None => LayoutConfig::default(),
    };
    let orientation = if args.landscape {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    };
    if let Some(paper) = args.page {
        cfg = cfg.with_paper(paper.into(), orientation);
    } else if args.landscape && cfg.page.width_mm < cfg.page.height_mm {
        std::mem::swap(&mut cfg.page.width_mm, &mut cfg.page.height_mm);
    }
    if let Some(scale) = args.scale {
        cfg.scale = scale;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_config(args: LayoutArgs) -> anyhow::Result<()> {
    let cfg = load_layout(&args)?;
    let json = serde_json::to_string_pretty(&cfg).context("serialize configuration")?;
    println!("{json}");
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_layout(&args.layout)?;
    if args.format == Format::Png && !(args.dpi.is_finite() && args.dpi > 0.0) {
        bail!("--dpi must be a positive number, got {}", args.dpi);
    }

    let (sources, out_dir) = if args.files.is_empty() {
        let dir = args
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let files = discover_csv_files(&dir)
            .with_context(|| format!("scan data directory '{}'", dir.display()))?;
        if files.is_empty() {
            bail!("no CSV files found in '{}'", dir.display());
        }
        (files, dir)
    } else {
        (args.files.clone(), PathBuf::from("."))
    };
    info!(sources = sources.len(), format = ?args.format, "rendering floor plans");

    let doc = assemble(&sources, &cfg).context("failed to render floor plans")?;
    if !doc.skipped().is_empty() {
        warn!(skipped = doc.skipped().len(), "some dataset sources were not rendered");
    }

    match args.format {
        Format::Pdf => {
            let out = args
                .out
                .unwrap_or_else(|| out_dir.join(DEFAULT_OUTPUT_NAME));
            doc.write_pdf(&out)
                .with_context(|| format!("write pdf '{}'", out.display()))?;
            eprintln!("wrote {} ({} pages)", out.display(), doc.pages().len());
        }
        Format::Svg => {
            let dir = args.out.unwrap_or(out_dir);
            let written = doc
                .write_svg_pages(&dir)
                .with_context(|| format!("write svg pages to '{}'", dir.display()))?;
            report(&written);
        }
        Format::Png => {
            let dir = args.out.unwrap_or(out_dir);
            let written = doc
                .write_png_pages(&dir, args.dpi)
                .with_context(|| format!("write png pages to '{}'", dir.display()))?;
            report(&written);
        }
    }
    Ok(())
}

fn report(paths: &[PathBuf]) {
    for p in paths {
        eprintln!("wrote {}", p.display());
    }
}
