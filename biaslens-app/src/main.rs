use anyhow::{Context, Result, bail};
use biaslens_app::pipeline::{PipelineRun, PipelineStatus};
use biaslens_app::tether::{CaptureMode, build_capturer, build_from_config};
use biaslens_common::observability::{LogConfig, init_logging};
use biaslens_config::{BiasLensConfig, BiasLensConfigLoader};
use biaslens_extract::{Document, Orchestrator, Site};
use biaslens_web::PageCapturer;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Parser)]
#[command(name = "biaslens", about = "Flag biased passages in news articles")]
struct Cli {
    /// Configuration file; missing files fall back to defaults and env
    #[arg(long, global = true, default_value = "biaslens.yaml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print which supported outlet an address belongs to
    Detect { url: String },
    /// Extract content and metadata as JSON without classifying
    Extract {
        url: String,
        /// Read page source from a saved file instead of fetching
        #[arg(long)]
        html: Option<PathBuf>,
        /// Render the page in a WebDriver browser
        #[arg(long)]
        browser: bool,
    },
    /// Extract, classify and annotate an article
    Analyze {
        url: String,
        #[arg(long)]
        html: Option<PathBuf>,
        #[arg(long)]
        browser: bool,
        /// Write the annotated page here
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Skip the related-coverage lookup
        #[arg(long)]
        no_similar: bool,
        /// Print the full run as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg: BiasLensConfig = BiasLensConfigLoader::new()
        .with_optional_file(&cli.config)
        .load()
        .with_context(|| format!("loading {}", cli.config.display()))?;

    // 2) Logging from the config's logging section
    let log_path = init_logging(LogConfig {
        log_dir: cfg.logging.dir.clone(),
        emit_stderr: cfg.logging.stderr,
        format: cfg.logging.format,
        ..LogConfig::default()
    })?;
    tracing::debug!(log = %log_path.display(), "logging initialised");

    match cli.command {
        Commands::Detect { url } => {
            let site = Site::detect(&url);
            println!("{site}");
            if !site.is_known() {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Extract { url, html, browser } => {
            let site = Site::detect(&url);
            if !site.is_known() {
                bail!("{url} is not on a supported news site");
            }
            let parsed = Url::parse(&url).with_context(|| format!("invalid url {url}"))?;
            let mode = CaptureMode::choose(html, browser, &cfg);
            let page = build_capturer(&mode, &cfg)?.capture(&parsed).await?;
            let mut doc = Document::parse(&page.html);
            let extraction = Orchestrator::default().extract(&mut doc, site);
            for issue in &extraction.issues {
                tracing::warn!(step = %issue.step, error = %issue.error, "extraction issue");
            }
            println!("{}", serde_json::to_string_pretty(&extraction)?);
            Ok(())
        }
        Commands::Analyze {
            url,
            html,
            browser,
            out,
            no_similar,
            json,
        } => {
            let mode = CaptureMode::choose(html, browser, &cfg);
            let pipeline = build_from_config(&cfg, &mode, !no_similar).await?;
            let run = pipeline.run(&url).await;
            if let Some(path) = &out {
                write_annotated(&run, path)?;
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&run)?);
            } else {
                print_summary(&run);
            }
            match run.status {
                PipelineStatus::Done { .. } => Ok(()),
                status => bail!("{status}"),
            }
        }
    }
}

fn write_annotated(run: &PipelineRun, path: &Path) -> Result<()> {
    let Some(doc) = &run.document else {
        tracing::warn!("no page captured; nothing written");
        return Ok(());
    };
    std::fs::write(path, doc.to_html()).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "annotated page written");
    Ok(())
}

fn print_summary(run: &PipelineRun) {
    println!("{} [{}]", run.address, run.site);
    if let Some(extraction) = &run.extraction {
        let meta = &extraction.metadata;
        println!("  {} by {} ({})", meta.title, meta.author, meta.date_published);
        println!(
            "  {} blocks, {} classified{}",
            extraction.content.len(),
            extraction.units.len(),
            if extraction.used_fallback { ", generic extraction" } else { "" }
        );
    }
    println!("  {}", run.status);
    for annotation in &run.annotations {
        println!("  [{}] {}", annotation.index, annotation.tooltip());
    }
    if !run.similar.is_empty() {
        println!("  Related coverage:");
        for hit in &run.similar {
            println!("    {} - {}", hit.title, hit.url);
        }
    }
}
