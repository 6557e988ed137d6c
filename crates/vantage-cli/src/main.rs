//! Command-line interface for vantage-rs

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use futures::StreamExt;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use vantage_analysis::{
    AnalysisPipeline, EngineConfig, FileDocumentSource, PerspectiveEngine, PipelineRequest,
};
use vantage_llm::providers::{self, ProviderKind};
use vantage_persona::{PersonaRegistry, PersonaSummary, RiskTolerance};
use vantage_utils::Config;

#[derive(Parser, Debug)]
#[command(name = "vantage")]
#[command(about = "Multi-perspective investment analysis", long_about = None)]
struct Cli {
    /// LLM backend (deepseek, qwen, zhipu, openai, siliconflow, anthropic)
    #[arg(long, global = true)]
    provider: Option<String>,

    /// Model override for the chosen backend
    #[arg(long, global = true)]
    model: Option<String>,

    /// Persona catalog path
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List, search, or recommend personas
    Personas {
        #[command(subcommand)]
        action: PersonasAction,
    },

    /// Analyze material from one persona's perspective
    Analyze {
        /// Persona id
        #[arg(long)]
        persona: String,

        /// Material text (falls back to --material-file, then stdin)
        #[arg(long)]
        material: Option<String>,

        /// Read material from a file
        #[arg(long)]
        material_file: Option<PathBuf>,

        /// Additional context appended to the material
        #[arg(long)]
        context: Option<String>,

        /// Print the analysis as it streams in chunks
        #[arg(long)]
        stream: bool,
    },

    /// Compare perspectives across several personas
    Compare {
        /// Comma-separated persona ids
        #[arg(long, value_delimiter = ',')]
        personas: Vec<String>,

        #[arg(long)]
        material: Option<String>,

        #[arg(long)]
        material_file: Option<PathBuf>,

        #[arg(long)]
        context: Option<String>,

        #[arg(long)]
        stream: bool,
    },

    /// Run the full analysis pipeline and print the Markdown report
    Run {
        /// Persona id
        #[arg(long)]
        persona: String,

        #[arg(long)]
        material: Option<String>,

        #[arg(long)]
        material_file: Option<PathBuf>,

        /// Analyze a stored document instead of raw material
        #[arg(long)]
        document: Option<String>,

        /// Directory the document ids resolve against
        #[arg(long, default_value = "documents")]
        documents_dir: PathBuf,

        #[arg(long)]
        context: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum PersonasAction {
    /// List loaded personas
    List {
        /// Filter by risk tier (very low, low, medium, high)
        #[arg(long)]
        risk: Option<String>,

        /// Filter by holding-period substring
        #[arg(long)]
        period: Option<String>,
    },

    /// Search personas by keyword
    Search { keyword: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vantage_utils::init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env();

    let provider_flag = cli.provider.clone();
    let model_flag = cli.model.clone();

    let personas_path = cli.catalog.clone().unwrap_or(config.personas_path.clone());
    let registry = Arc::new(
        PersonaRegistry::load(&personas_path)
            .with_context(|| format!("loading persona catalog from {}", personas_path.display()))?,
    );

    match cli.command {
        Command::Personas { action } => run_personas(&registry, action),
        Command::Analyze {
            persona,
            material,
            material_file,
            context,
            stream,
        } => {
            let engine = build_engine(
                provider_flag.as_deref(),
                model_flag.as_deref(),
                &config,
                registry,
            )?;
            let material = read_material(material, material_file)?;

            if stream {
                let mut chunks = engine
                    .analyze_one_stream(&material, &persona, context.as_deref())
                    .await?;
                while let Some(chunk) = chunks.next().await {
                    print!("{chunk}");
                    std::io::stdout().flush()?;
                }
                println!();
            } else {
                let result = engine
                    .analyze_one(&material, &persona, context.as_deref())
                    .await?;
                println!("## {} ({})\n", result.persona_name, result.persona_title);
                println!("{}", result.analysis);
                if !result.success {
                    bail!("analysis did not complete successfully");
                }
            }
            Ok(())
        }
        Command::Compare {
            personas,
            material,
            material_file,
            context,
            stream,
        } => {
            if personas.is_empty() {
                bail!("--personas requires at least one persona id");
            }
            let engine = build_engine(
                provider_flag.as_deref(),
                model_flag.as_deref(),
                &config,
                registry,
            )?;
            let material = read_material(material, material_file)?;

            if stream {
                let mut chunks = engine
                    .compare_stream(&material, &personas, context.as_deref())
                    .await?;
                while let Some(chunk) = chunks.next().await {
                    print!("{chunk}");
                    std::io::stdout().flush()?;
                }
                println!();
            } else {
                let comparison = engine
                    .compare(&material, &personas, context.as_deref())
                    .await?;
                println!(
                    "{}",
                    vantage_analysis::stream::format_comparison_markdown(&comparison)
                );
                info!(
                    succeeded = comparison.success_count(),
                    requested = comparison.persona_ids.len(),
                    "Comparison finished"
                );
            }
            Ok(())
        }
        Command::Run {
            persona,
            material,
            material_file,
            document,
            documents_dir,
            context,
        } => {
            let engine = build_engine(
                provider_flag.as_deref(),
                model_flag.as_deref(),
                &config,
                registry,
            )?;
            let pipeline = AnalysisPipeline::new(engine)
                .with_document_source(Arc::new(FileDocumentSource::new(documents_dir)));

            let mut request = if let Some(document_id) = document {
                PipelineRequest::from_document(document_id, &persona)
            } else {
                PipelineRequest::from_material(read_material(material, material_file)?, &persona)
            };
            if let Some(context) = context {
                request = request.with_context(context);
            }

            let state = pipeline.run(request).await;
            if let Some(error) = &state.error {
                bail!("pipeline failed: {error}");
            }
            match &state.report {
                Some(report) => println!("{}", report.markdown),
                None => bail!("pipeline produced no report"),
            }
            Ok(())
        }
    }
}

fn run_personas(registry: &PersonaRegistry, action: PersonasAction) -> anyhow::Result<()> {
    let summaries: Vec<PersonaSummary> = match action {
        PersonasAction::List { risk, period } => {
            let risk = risk
                .map(|r| r.parse::<RiskTolerance>())
                .transpose()
                .map_err(|e| anyhow::anyhow!("{e}"))?;
            registry.recommend(risk, period.as_deref(), None)
        }
        PersonasAction::Search { keyword } => registry.recommend(None, None, Some(&keyword)),
    };

    if summaries.is_empty() {
        println!("No matching personas.");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "ID",
        "Name",
        "Title",
        "Risk",
        "Holding Period",
    ]);
    for summary in &summaries {
        table.add_row(vec![
            summary.id.clone(),
            format!("{} ({})", summary.name, summary.name_local),
            summary.title.clone(),
            summary.risk_tolerance.to_string(),
            summary.holding_period.clone(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn build_engine(
    provider_flag: Option<&str>,
    model_flag: Option<&str>,
    config: &Config,
    registry: Arc<PersonaRegistry>,
) -> anyhow::Result<Arc<PerspectiveEngine>> {
    let provider_name = provider_flag.unwrap_or(&config.llm_provider);
    let kind: ProviderKind = provider_name.parse()?;
    let provider = providers::from_env(kind)?;

    let mut engine_config = EngineConfig::for_provider(kind);
    if let Some(model) = model_flag.map(str::to_string).or_else(|| config.model.clone()) {
        engine_config.model = model;
    }
    engine_config.validate()?;

    info!(provider = %kind, model = %engine_config.model, "Initialized LLM backend");
    Ok(Arc::new(PerspectiveEngine::new(
        registry,
        provider,
        engine_config,
    )))
}

fn read_material(
    material: Option<String>,
    material_file: Option<PathBuf>,
) -> anyhow::Result<String> {
    if let Some(material) = material {
        return Ok(material);
    }
    if let Some(path) = material_file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("reading material from {}", path.display()));
    }
    // Fall back to stdin so material can be piped in
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("reading material from stdin")?;
    if buffer.trim().is_empty() {
        bail!("no material provided (use --material, --material-file, or pipe via stdin)");
    }
    Ok(buffer)
}
