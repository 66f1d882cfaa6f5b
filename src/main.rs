use anyhow::Result;
use clap::{Parser, Subcommand};
use image_flashcards::{
    AddOutcome, CommandScheduler, Config, ImageViewer, RegionCapture, ReviewOutcome, Session,
    config, logger, prompt,
};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "image-flashcards",
    about = "Screenshot flashcards backed by a spaced-repetition scheduler",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Capture a question region and an answer region as a new card
    Add,
    /// Review the next due card, or a new one if nothing is due
    Review,
    /// Edit an existing card
    Edit,
    /// Show how many cards are due and new
    Status,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logger::init(&config::log_path());

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    let binary = match config.resolve_scheduler() {
        Ok(binary) => binary,
        Err(e) => {
            logger::log(logger::Level::Error, &e.to_string());
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    logger::debug(&format!("using scheduler {}", binary.display()));

    let scheduler = CommandScheduler::new(config.scheduler_tool(&binary));
    let capture = RegionCapture::from_config(&config);
    let presenter = ImageViewer::new(config.viewer.clone());
    let prompt = prompt::from_config(&config);
    let session = Session::new(&scheduler, &capture, &presenter, prompt.as_ref());

    match cli.command {
        Command::Add => {
            if let AddOutcome::Aborted { stage } = session.add().await {
                logger::debug(&format!("add aborted at {:?}", stage));
            }
        }
        Command::Review => match session.review().await {
            ReviewOutcome::Graded { response, .. } => println!("{}", response),
            ReviewOutcome::NothingDue => prompt.info("nothing to review").await,
            other => logger::debug(&format!("review ended: {:?}", other)),
        },
        Command::Edit => prompt.error("not implemented yet").await,
        Command::Status => match session.counts().await {
            Ok(counts) => {
                println!("due: {}", counts.due);
                println!("new: {}", counts.new);
            }
            Err(e) => {
                prompt
                    .error(&format!("could not query the scheduler: {}", e))
                    .await
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
