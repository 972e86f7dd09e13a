//! Line-oriented command parsing.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use pollen_engine::{Language, Theme};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Send(String),
    Models,
    Model(String),
    Temperature(f32),
    Private(bool),
    Theme(Theme),
    Language(Language),
    Attach(PathBuf),
    /// Zero-based index into the staged files.
    Detach(usize),
    Files,
    Clear,
    Save,
    Copy,
    Help,
    Quit,
}

pub const HELP: &str = "\
Type a message and press Enter to send it.

  /models             list available models
  /model <name>       select a model
  /temp <0-2>         set temperature
  /private on|off     keep requests out of the public feed
  /theme <name>       dark, light, blue or green
  /lang <en|ru>       interface language
  /attach <path>      stage a file for the next message
  /detach <n>         unstage file number n
  /files              list staged files
  /clear              clear the chat history
  /save               save the chat to a text file
  /copy               copy the last reply to the clipboard
  /help               show this help
  /quit               exit";

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Some(Command::Send(line.to_string())));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match name {
        "models" => Command::Models,
        "model" => Command::Model(required(arg, "/model <name>")?.to_string()),
        "temp" | "temperature" => {
            let raw = required(arg, "/temp <0-2>")?;
            let value = raw
                .parse::<f32>()
                .with_context(|| format!("invalid temperature '{raw}'"))?;
            Command::Temperature(value)
        }
        "private" => Command::Private(parse_switch(required(arg, "/private on|off")?)?),
        "theme" => Command::Theme(Theme::parse(required(arg, "/theme <name>")?)?),
        "lang" | "language" => Command::Language(Language::parse(required(arg, "/lang <en|ru>")?)?),
        "attach" => Command::Attach(PathBuf::from(required(arg, "/attach <path>")?)),
        "detach" => {
            let raw = required(arg, "/detach <n>")?;
            let number = raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow!("file number must be 1 or greater, got '{raw}'"))?;
            Command::Detach(number - 1)
        }
        "files" => Command::Files,
        "clear" => Command::Clear,
        "save" => Command::Save,
        "copy" => Command::Copy,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '/{other}'; try /help"),
    };
    Ok(Some(command))
}

fn required<'a>(arg: &'a str, usage: &str) -> Result<&'a str> {
    if arg.is_empty() {
        bail!("usage: {usage}");
    }
    Ok(arg)
}

fn parse_switch(raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => bail!("expected on or off, got '{raw}'"),
    }
}
