use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use niche_scout::clients::{GenerationApi, HttpGenerationClient};
use niche_scout::config::{Config, RuntimeConfig};
use niche_scout::controller::ScoutController;
use niche_scout::export::ExportFormat;
use niche_scout::form::{self, FormCommand};
use niche_scout::orchestrator::{FailureClassifier, RequestOrchestrator};
use niche_scout::render::ResultRenderer;
use niche_scout::schemas::QueryParams;

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate niche-research questions and export them", long_about = None)]
struct Cli {
    /// Base URL of the generation server (overrides config)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory exports are written to (overrides config)
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Disable ANSI styling
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one generation from flags, optionally exporting the result
    Generate(GenerateArgs),
    /// Prompt for the form repeatedly; Enter submits
    Interactive,
    /// Check that the server is reachable and report its model
    Health,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long)]
    niche: String,
    #[arg(long)]
    audience: String,
    #[arg(long, default_value = "")]
    location: String,
    #[arg(long, default_value = "")]
    platform: String,
    /// Export formats to write after a successful generation (repeatable)
    #[arg(long, value_enum)]
    export: Vec<ExportFormat>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Subscriber first so config warnings are not dropped
    niche_scout::config::load_env();
    niche_scout::init_tracing(&RuntimeConfig::load_from_env().log_level);
    let mut config = Config::load().context("failed to load configuration")?;

    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate()?;
    }
    if let Some(dir) = cli.out_dir {
        config.export.output_dir = dir;
    }
    info!("Using generation server at {}", config.api.base_url);
    let styled = config.runtime.color && !cli.no_color && std::io::stdout().is_terminal();

    let client = HttpGenerationClient::new(config.api.clone())?;
    let classifier = FailureClassifier::new(config.api.fallback_triggers.clone());
    let orchestrator = RequestOrchestrator::new(client, classifier);
    let mut controller =
        ScoutController::new(orchestrator, ResultRenderer::new(styled), config.export.clone());

    match cli.command {
        Command::Generate(args) => run_generate(&mut controller, args).await,
        Command::Interactive => run_interactive(&mut controller).await,
        Command::Health => run_health(controller.orchestrator()).await,
    }
}

async fn run_generate<A: GenerationApi>(
    controller: &mut ScoutController<A>,
    args: GenerateArgs,
) -> Result<ExitCode> {
    let params = QueryParams::new(args.niche, args.audience)
        .with_location(args.location)
        .with_platform(args.platform);

    let ok = controller.submit(&params).await;
    print!("{}", controller.renderer().to_text());
    if !ok {
        return Ok(ExitCode::FAILURE);
    }

    for format in args.export {
        match controller.export(format).await {
            Ok(path) => println!("Saved {}", path.display()),
            Err(message) => {
                eprintln!("{message}");
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_interactive<A: GenerationApi>(
    controller: &mut ScoutController<A>,
) -> Result<ExitCode> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut params = QueryParams::default();

    println!("{}", form::HELP);
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match form::parse_line(&mut params, &line) {
            Ok(FormCommand::Quit) => break,
            Ok(FormCommand::Help) => println!("{}", form::HELP),
            Ok(FormCommand::Show) => println!(
                "niche={}; audience={}; location={}; platform={}",
                params.niche, params.audience, params.location, params.platform
            ),
            Ok(FormCommand::Submit) => {
                controller.submit(&params).await;
                print!("{}", controller.renderer().to_text());
            }
            Ok(FormCommand::Export(format)) => {
                if !controller.view().exports_enabled {
                    println!("Exports are available after a successful generation.");
                    continue;
                }
                match controller.export(format).await {
                    Ok(path) => println!("Saved {}", path.display()),
                    Err(message) => println!("{message}"),
                }
            }
            Err(e) => println!("{e}"),
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_health<A: GenerationApi>(orchestrator: &RequestOrchestrator<A>) -> Result<ExitCode> {
    match orchestrator.check_liveness().await {
        Ok(status) => {
            println!("Server online. Model: {}", status.model_info);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Ok(ExitCode::from(2))
        }
    }
}
