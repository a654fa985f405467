use churnshield::assistant::ChurnAssistant;
use churnshield::config::{AppConfig, UploadValidation};
use churnshield::loader::{DataLoader, DataSource};
use churnshield::presenter::{present, ConsolePresenter, Presenter};
use churnshield::server;
use churnshield::view::{Notice, View};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "churnshield")]
#[command(about = "Churn analysis assistant for customer churn prediction data")]
#[command(version)]
struct Args {
    /// Where the dataset comes from
    #[arg(long, value_enum, default_value_t = Mode::Default, global = true)]
    mode: Mode,

    /// CSV file to use in upload mode
    #[arg(long, global = true)]
    upload: Option<PathBuf>,

    /// Bundled default file (or set CHURNSHIELD_DATA_FILE)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    /// Accept uploads without a Risk Level column and derive it
    #[arg(long, global = true)]
    allow_derived_risk: bool,

    /// Print views as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Use the bundled default file
    Default,
    /// Use a CSV supplied with --upload
    Upload,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question
    Ask {
        /// The question, e.g. "Who are the high risk customers?"
        query: String,
    },
    /// Ask questions interactively
    Chat,
    /// List the sample questions
    Questions,
    /// Serve the assistant over HTTP
    Serve {
        /// Address to bind (or set CHURNSHIELD_BIND)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("churnshield=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(data_file) = &args.data_file {
        config.data_file = data_file.clone();
    }
    if args.allow_derived_risk {
        config.upload_validation = UploadValidation::Derive;
    }

    if let Commands::Questions = args.command {
        for (idx, question) in ChurnAssistant::sample_questions().iter().enumerate() {
            println!("{:>2}. {}", idx + 1, question);
        }
        return Ok(());
    }

    let source = match args.mode {
        Mode::Default => DataSource::Default(config.data_file.clone()),
        Mode::Upload => DataSource::Upload(args.upload.clone()),
    };

    // Status lines stay off stdout when it carries JSON.
    let mut status: Box<dyn Presenter> = if args.json {
        Box::new(ConsolePresenter::new(io::stderr()))
    } else {
        Box::new(ConsolePresenter::stdout())
    };

    let loader = DataLoader::new(config.upload_validation);
    let assistant = match ChurnAssistant::load(&loader, &source, status.as_mut()) {
        Ok(assistant) => assistant,
        Err(e) => {
            status.render_notice(&Notice::from_error(&e))?;
            if e.is_informational() {
                return Ok(());
            }
            error!("Failed to load dataset: {}", e);
            std::process::exit(1);
        }
    };

    match args.command {
        Commands::Ask { query } => {
            let view = assistant.ask(&query)?;
            emit(view.as_ref(), args.json)?;
        }
        Commands::Chat => chat(&assistant, args.json)?,
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or(config.bind);
            info!("Serving {} rows", assistant.dataset().height());
            server::serve(Arc::new(assistant), &addr).await?;
        }
        Commands::Questions => {}
    }

    Ok(())
}

fn emit(view: Option<&View>, json: bool) -> Result<()> {
    let view = match view {
        Some(view) => view,
        None => return Ok(()),
    };
    if json {
        println!("{}", serde_json::to_string(view)?);
    } else {
        present(view, &mut ConsolePresenter::stdout())?;
    }
    Ok(())
}

fn chat(assistant: &ChurnAssistant, json: bool) -> Result<()> {
    println!("Need suggestions? Pick a question by number or type your own (empty line to quit):");
    for (idx, question) in ChurnAssistant::sample_questions().iter().enumerate() {
        println!("{:>2}. {}", idx + 1, question);
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\nAsk your churn-related question: ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let input = line.trim();
        if input.is_empty() {
            break;
        }

        let query = input
            .parse::<usize>()
            .ok()
            .and_then(ChurnAssistant::sample_question)
            .unwrap_or(input);
        if query != input {
            println!("> {}", query);
        }

        match assistant.ask(query) {
            Ok(view) => emit(view.as_ref(), json)?,
            Err(e) => {
                error!("Query failed: {}", e);
                println!("[ERROR] {}", e);
            }
        }
    }
    Ok(())
}
