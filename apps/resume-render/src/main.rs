//! resume-render: turns a resume JSON file into a one-page PDF.
//!
//! Usage:
//!   resume-render --json data/ada.json --template classic
//!   resume-render --list-templates
//!   resume-render --check-env

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_render::compile::{check_environment, LatexCompiler, PdfInfoCounter};
use resume_render::config::Config;
use resume_render::fit::{FitOptions, TracingObserver, DEFAULT_HEIGHT_INCREMENT, DEFAULT_MAX_ATTEMPTS};
use resume_render::templates::DEFAULT_TEMPLATE;
use resume_render::{FitVerdict, GenerateRequest, RenderError, Renderer, TemplateRegistry};

#[derive(Parser, Debug)]
#[command(name = "resume-render")]
#[command(version, about = "Render resume JSON to a single-page PDF via LaTeX")]
struct Args {
    /// Resume JSON file
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Template variant
    #[arg(short, long, default_value = DEFAULT_TEMPLATE)]
    template: String,

    /// Output file stem; a sequence number is appended
    #[arg(short, long, default_value = "resume")]
    output: String,

    /// Output directory (overrides RENDER_OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Starting page height in inches
    #[arg(long)]
    page_height: Option<f64>,

    /// Compile once without measuring or resizing
    #[arg(long)]
    no_auto_size: bool,

    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,

    /// Inches added to the page height per retry
    #[arg(long, default_value_t = DEFAULT_HEIGHT_INCREMENT)]
    height_increment: f64,

    /// Do not copy the input JSON next to the outputs
    #[arg(long)]
    no_save_json: bool,

    /// Print the fit report as JSON on stdout
    #[arg(long)]
    report: bool,

    #[arg(long)]
    list_templates: bool,

    /// List *.json files in the data directory
    #[arg(long)]
    list_data_files: bool,

    /// Check that the typesetting toolchain is installed
    #[arg(long)]
    check_env: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::registry()
        .with(log_filter(args.verbose, &config.rust_log))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(args, config).await {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<RenderError>() {
                Some(render) => eprintln!("error[{}]: {render}", render.code()),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// `--verbose` beats `RUST_LOG`, which beats the configured level.
fn log_filter(verbose: bool, configured: &str) -> EnvFilter {
    let crate_directive = |level: &str| format!("{}={level}", env!("CARGO_CRATE_NAME"));
    if verbose {
        return EnvFilter::new(crate_directive("debug"));
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(crate_directive(configured)))
}

async fn run(args: Args, config: Config) -> Result<ExitCode> {
    let registry = TemplateRegistry::builtin();

    if args.list_templates {
        for name in registry.names() {
            println!("{name}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    if args.list_data_files {
        for file in list_data_files(&config.data_dir)? {
            println!("{}", file.display());
        }
        return Ok(ExitCode::SUCCESS);
    }

    if args.check_env {
        let statuses = check_environment(&config).await;
        let mut ok = true;
        for status in &statuses {
            let state = if status.available { "ok" } else { "missing" };
            println!(
                "{:<8} {:<10} {:<8} {}",
                status.tool,
                status.binary,
                state,
                status.version.as_deref().unwrap_or("")
            );
            if status.required && !status.available {
                ok = false;
            }
        }
        return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    let Some(json_path) = args.json.as_deref() else {
        anyhow::bail!("--json <PATH> is required unless a listing or --check-env is requested");
    };
    let raw = read_json(json_path).await?;

    let request = GenerateRequest {
        template: args.template.clone(),
        output_dir: args.output_dir.clone().unwrap_or_else(|| config.output_dir.clone()),
        base_name: args.output.clone(),
        save_json: !args.no_save_json,
        fit: FitOptions {
            requested_page_height: args.page_height,
            auto_size: !args.no_auto_size,
            max_attempts: args.max_attempts,
            height_increment: args.height_increment,
        },
    };

    let compiler = LatexCompiler::from_config(&config);
    let counter = PdfInfoCounter::from_config(&config);
    let renderer = Renderer {
        registry: &registry,
        compiler: &compiler,
        counter: &counter,
        observer: &TracingObserver,
    };

    info!(input = %json_path.display(), "Generating resume");
    let report = renderer.generate(&raw, &request).await?;

    match report.verdict {
        FitVerdict::SinglePage => info!(pdf = %report.pdf_path, "Resume fits on one page"),
        FitVerdict::NotMeasured => info!(pdf = %report.pdf_path, "Resume compiled"),
        FitVerdict::BudgetExhausted { pages } => warn!(
            pdf = %report.pdf_path,
            pages,
            "Resume still spans more than one page after all attempts"
        ),
    }

    if args.report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.pdf_path);
    }
    Ok(ExitCode::SUCCESS)
}

async fn read_json(path: &Path) -> Result<Value> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let value = serde_json::from_str(&text).map_err(RenderError::from)?;
    Ok(value)
}

fn list_data_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}
