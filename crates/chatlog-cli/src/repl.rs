//! Interactive chat loop.

use crate::render::{render_full, resolve_id, TerminalView};
use crate::transfer::{export_to, import_from};
use chatlog_reply::{build_source, ChatRunner, ReplyConfig, ReplyMode};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

const HELP: &str = "\
Commands:
  <text>                send a message
  /edit <id> <text>     replace the text of one of your messages
  /delete <id>          delete one of your messages
  /clear                delete every message
  /export [file]        write the log as JSON (default textExport.json)
  /import <file>        replace the log with a JSON export
  /mode <eliza|llm>     switch the reply source
  /list                 redraw the transcript
  /help                 show this help
  /quit                 leave";

#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand {
    Send(String),
    Edit { id: String, text: String },
    Delete(String),
    Clear,
    Export(Option<PathBuf>),
    Import(PathBuf),
    Mode(ReplyMode),
    List,
    Help,
    Quit,
    Nothing,
}

pub fn parse_line(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ReplCommand::Nothing);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(ReplCommand::Send(line.to_string()));
    };

    let (name, args) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(n, a)| (n, a.trim()));

    match name {
        "edit" => {
            let (id, text) = args
                .split_once(char::is_whitespace)
                .map(|(id, text)| (id, text.trim()))
                .filter(|(_, text)| !text.is_empty())
                .ok_or("usage: /edit <id> <text>")?;
            Ok(ReplCommand::Edit {
                id: id.to_string(),
                text: text.to_string(),
            })
        }
        "delete" if !args.is_empty() => Ok(ReplCommand::Delete(args.to_string())),
        "delete" => Err("usage: /delete <id>".to_string()),
        "clear" => Ok(ReplCommand::Clear),
        "export" => Ok(ReplCommand::Export(
            (!args.is_empty()).then(|| PathBuf::from(args)),
        )),
        "import" if !args.is_empty() => Ok(ReplCommand::Import(PathBuf::from(args))),
        "import" => Err("usage: /import <file>".to_string()),
        "mode" => match args {
            "eliza" => Ok(ReplCommand::Mode(ReplyMode::Eliza)),
            "llm" => Ok(ReplCommand::Mode(ReplyMode::Llm)),
            _ => Err("usage: /mode <eliza|llm>".to_string()),
        },
        "list" => Ok(ReplCommand::List),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        other => Err(format!("unknown command '/{other}', try /help")),
    }
}

async fn confirm(lines: &mut Lines<BufReader<Stdin>>, prompt: &str) -> anyhow::Result<bool> {
    println!("{prompt} [y/N]");
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Runs until `/quit` or end of input.
pub async fn run(mut runner: ChatRunner, mut reply_config: ReplyConfig) -> anyhow::Result<()> {
    let mut view = TerminalView::new(std::io::stdout());
    runner.subscribe(move |state| {
        if let Err(e) = view.render(&state) {
            debug!(error = %e, "Failed to draw transcript");
        }
    });
    println!("Reply source: {}. Type /help for commands.", runner.source_name());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(usage) => {
                eprintln!("{usage}");
                continue;
            }
        };

        match command {
            ReplCommand::Nothing => {}
            ReplCommand::Send(text) => {
                runner.send(&text).await;
            }
            ReplCommand::Edit { id, text } => {
                let resolved = resolve_id(runner.session().messages(), &id).map(str::to_string);
                match resolved {
                    Some(id) => {
                        runner.edit(&id, &text);
                    }
                    None => eprintln!("No user message matches '{id}'"),
                }
            }
            ReplCommand::Delete(id) => {
                let resolved = resolve_id(runner.session().messages(), &id).map(str::to_string);
                match resolved {
                    Some(id) => {
                        if confirm(&mut lines, "Are you sure you want to delete?").await? {
                            runner.delete(&id);
                        }
                    }
                    None => eprintln!("No user message matches '{id}'"),
                }
            }
            ReplCommand::Clear => {
                if confirm(&mut lines, "Clear all messages?").await? {
                    runner.clear();
                }
            }
            ReplCommand::Export(path) => match export_to(&runner, path.as_deref()) {
                Ok(written) => println!("Exported to {}", written.display()),
                Err(e) => eprintln!("Export failed: {e:#}"),
            },
            ReplCommand::Import(path) => match import_from(&mut runner, &path) {
                Ok(true) => {}
                Ok(false) => eprintln!("Import text not found."),
                Err(e) => eprintln!("Import failed: {e:#}"),
            },
            ReplCommand::Mode(mode) => {
                reply_config.mode = mode;
                runner.set_source(build_source(&reply_config));
                println!("Reply source: {}", runner.source_name());
            }
            ReplCommand::List => print!("{}", render_full(&runner.session().snapshot())),
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => break,
        }
    }
    Ok(())
}
