//! narrate - natural-language questions over SQLite, with explained SQL.

use std::io::Write;
use std::sync::Arc;

use db_narrate::cli::{Cli, Mode};
use db_narrate::config::Config;
use db_narrate::db::{self, DatabaseClient};
use db_narrate::error::{NarrateError, Result};
use db_narrate::explain::Phrasebook;
use db_narrate::llm::create_client;
use db_narrate::logging::{init_file_logging, init_stderr_logging};
use db_narrate::query::{Assistant, Pipeline};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    if cli.log_file {
        init_file_logging();
    } else {
        init_stderr_logging();
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_to(&mut config);

    let db = db::connect(&config.database).await?;
    let result = dispatch(&cli, &config, Arc::clone(&db)).await;
    db.close().await?;
    result
}

async fn dispatch(cli: &Cli, config: &Config, db: Arc<dyn DatabaseClient>) -> Result<()> {
    let pipeline = Pipeline::new(db, config.language, config.format_rules());

    match cli.mode() {
        Mode::Sql(sql) => {
            println!("{}", pipeline.run(&sql).await);
            Ok(())
        }
        Mode::Question(question) => {
            let assistant = Assistant::new(create_client(&config.llm)?, pipeline);
            println!("{}", assistant.ask(&question).await?);
            Ok(())
        }
        Mode::Interactive => {
            let assistant = Assistant::new(create_client(&config.llm)?, pipeline);
            interactive(&assistant, config.language.phrasebook()).await
        }
    }
}

/// Reads questions from stdin until `exit`, `quit` or end of input.
///
/// A failed translation is reported and the session continues.
async fn interactive(assistant: &Assistant, phrases: &Phrasebook) -> Result<()> {
    for line in phrases.welcome {
        println!("{line}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n{}", phrases.input_prompt);
        std::io::stdout()
            .flush()
            .map_err(|e| NarrateError::internal(format!("Failed to write prompt: {e}")))?;

        let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| NarrateError::internal(format!("Failed to read input: {e}")))?
        else {
            println!();
            break;
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("{}", phrases.goodbye);
            break;
        }

        match assistant.ask(input).await {
            Ok(output) => println!("{output}"),
            Err(e) => {
                warn!("Question failed: {e}");
                eprintln!("{e}");
            }
        }
    }

    Ok(())
}
