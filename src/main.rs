use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use salvage::app::services::analytics::{TranslationStats, explain_changes};
use salvage::app::{AppError, AppState, Command, FileStore, GeminiClient, Settings, TranslationState};

#[derive(Parser)]
#[command(name = "salvage", version, about = "Write C, get Rust back, keep both")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the token issued by the identity provider
    Login {
        #[arg(long)]
        token: String,
    },
    /// Forget the stored identity
    Logout,
    /// Show login and buffer state
    Status,
    /// List saved and translated files
    List,
    /// Start a new, empty buffer
    New,
    /// Load a local file into the original buffer
    Add { path: PathBuf },
    /// Replace buffer text from a file or stdin
    Edit {
        /// Edit the translated buffer instead of the original
        #[arg(long)]
        translated: bool,
        /// Read the text from this file instead of stdin
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Save the original buffer and export it
    Save {
        /// File name; required when the buffer has none
        #[arg(long)]
        name: Option<String>,
    },
    /// Translate the original buffer
    Translate,
    /// Open a saved or translated file
    Open { name: String },
    /// Delete a file from the registry
    Delete { name: String },
    /// Print buffer contents
    Show {
        #[arg(long)]
        translated: bool,
    },
    /// Compare the original and translated buffers
    Stats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load();
    if let Err(e) = settings.validate() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let store = Rc::new(FileStore::new(settings.data_dir()));
    let translator = Arc::new(GeminiClient::from_settings(&settings));
    let mut state = AppState::new(settings, store, translator);

    let result = run(&mut state, cli.command);
    for notice in state.take_notices() {
        println!("{}", notice);
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::TranslationFailed(message)) => {
            eprintln!("Transpilation failed:\n{}", message);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(state: &mut AppState, command: Commands) -> Result<(), AppError> {
    match command {
        Commands::Login { token } => state.dispatch(Command::Login(token))?,
        Commands::Logout => state.dispatch(Command::Logout)?,
        Commands::Status => print_status(state),
        Commands::List => {
            state.identity.require()?;
            for artifact in state.session.registry().list() {
                match &artifact.derived_from {
                    Some(source) => println!("{}\t{}\t<- {}", artifact.name, artifact.kind.label(), source),
                    None => println!("{}\t{}", artifact.name, artifact.kind.label()),
                }
            }
        }
        Commands::New => state.dispatch(Command::NewBuffer)?,
        Commands::Add { path } => state.dispatch(Command::Import(path))?,
        Commands::Edit { translated, from } => {
            let text = match from {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut text = String::new();
                    std::io::stdin().read_to_string(&mut text)?;
                    text
                }
            };
            let command = if translated {
                Command::EditTranslated(text)
            } else {
                Command::EditOriginal(text)
            };
            state.dispatch(command)?;
        }
        Commands::Save { name } => state.dispatch(Command::Save(name))?,
        Commands::Translate => {
            state.dispatch(Command::Translate)?;
            state.wait_for_translations()?;
        }
        Commands::Open { name } => state.dispatch(Command::Open(name))?,
        Commands::Delete { name } => state.dispatch(Command::Delete(name))?,
        Commands::Show { translated } => {
            state.identity.require()?;
            let buffer = state.session.buffer();
            if translated {
                if buffer.translation_visible {
                    print!("{}", buffer.translated_text);
                } else {
                    eprintln!("Nothing translated yet");
                }
            } else {
                print!("{}", buffer.original_text);
            }
        }
        Commands::Stats => {
            state.identity.require()?;
            let buffer = state.session.buffer();
            println!("{}", TranslationStats::compute(&buffer.original_text, &buffer.translated_text));
            println!();
            for change in explain_changes(&buffer.translated_text) {
                println!("- {}", change);
            }
        }
    }
    Ok(())
}

fn print_status(state: &AppState) {
    if !state.identity.is_authenticated() {
        println!("Not logged in");
        return;
    }
    let buffer = state.session.buffer();
    let name = if buffer.active_file_name.is_empty() {
        "(unnamed)"
    } else {
        buffer.active_file_name.as_str()
    };
    let translation = match buffer.translation_state {
        TranslationState::Idle => "idle",
        TranslationState::InFlight => "in flight",
        TranslationState::Completed => "completed",
    };
    println!("File: {}", name);
    println!("Translation: {}", translation);
    println!("Saved files: {}", state.session.registry().len());
}
