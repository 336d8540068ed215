mod config;
mod render;
mod repl;
mod transfer;

use anyhow::{bail, Context};
use chatlog_reply::{build_source, ChatRunner, ReplyMode};
use chatlog_session::{FileStore, SessionManager};
use clap::{Parser, Subcommand, ValueEnum};
use config::ChatlogConfig;
use render::{format_message, render_full, resolve_id};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chatlog", about = "Chatlog: a persistent terminal chat log")]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "chatlog.toml")]
    config: PathBuf,

    /// Reply source (overrides config)
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Eliza,
    Llm,
}

impl From<ModeArg> for ReplyMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Eliza => ReplyMode::Eliza,
            ModeArg::Llm => ReplyMode::Llm,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session (default)
    Chat,
    /// Send one message and print the reply
    Send { text: String },
    /// Print the transcript
    List,
    /// Replace the text of one of your messages
    Edit {
        /// Full id or unique prefix of a user message
        id: String,
        text: String,
    },
    /// Delete one of your messages
    Delete {
        /// Full id or unique prefix of a user message
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every message
    Clear {
        #[arg(short, long)]
        yes: bool,
    },
    /// Write the log as JSON
    Export {
        /// Output file, or "-" for stdout
        #[arg(short, long, default_value = transfer::DEFAULT_EXPORT_FILE)]
        out: PathBuf,
    },
    /// Replace the log with a JSON export
    Import { path: PathBuf },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn lookup(runner: &ChatRunner, input: &str) -> anyhow::Result<String> {
    match resolve_id(runner.session().messages(), input) {
        Some(id) => Ok(id.to_string()),
        None => bail!("No user message matches '{input}'"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = ChatlogConfig::load(&cli.config)?;
    if let Some(mode) = cli.mode {
        config.reply.mode = mode.into();
    }
    config.resolve_api_key();

    let store = FileStore::new(&config.data_dir).with_context(|| {
        format!(
            "Failed to open data directory '{}'",
            config.data_dir.display()
        )
    })?;
    let session = SessionManager::new(Box::new(store), config.storage_key.as_str());
    let mut runner = ChatRunner::new(session, build_source(&config.reply));
    info!(
        source = %runner.source_name(),
        messages = runner.session().len(),
        "Chatlog ready"
    );

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => repl::run(runner, config.reply).await?,
        Commands::Send { text } => match runner.send(&text).await {
            Some(exchange) => {
                println!("{}", format_message(&exchange.user));
                println!("{}", format_message(&exchange.bot));
            }
            None => bail!("Nothing to send"),
        },
        Commands::List => print!("{}", render_full(&runner.session().snapshot())),
        Commands::Edit { id, text } => {
            if text.trim().is_empty() {
                bail!("Edit text must not be empty");
            }
            let id = lookup(&runner, &id)?;
            runner.edit(&id, &text);
            if let Some(msg) = runner.session().get(&id) {
                println!("{}", format_message(msg));
            }
        }
        Commands::Delete { id, yes } => {
            let id = lookup(&runner, &id)?;
            if yes || confirm("Are you sure you want to delete?")? {
                runner.delete(&id);
                println!("Deleted");
            }
        }
        Commands::Clear { yes } => {
            if yes || confirm("Clear all messages?")? {
                runner.clear();
                println!("Cleared");
            }
        }
        Commands::Export { out } => {
            if out.as_os_str() == "-" {
                println!("{}", runner.export());
            } else {
                let written = transfer::export_to(&runner, Some(&out))?;
                println!("Exported to {}", written.display());
            }
        }
        Commands::Import { path } => {
            if !transfer::import_from(&mut runner, &path)? {
                eprintln!("Import text not found.");
                std::process::exit(1);
            }
            println!("Imported {} message(s)", runner.session().len());
        }
    }

    Ok(())
}
