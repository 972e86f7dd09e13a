//! Pollen CLI - interactive terminal front end.
//!
//! # Architecture
//!
//! The CLI owns one [`pollen_engine::ChatSession`] and feeds it lines from
//! stdin. Everything it prints comes from [`pollen_engine::SessionView`]
//! projections, except the streamed reply, which is written fragment by
//! fragment as it arrives.
//!
//! ```text
//! main() -> ChatSession::open -> load_models (+ timeout prompt) -> read loop
//!                                                                  |
//!                                                                  v
//!                                                     Command -> session op
//! ```
//!
//! Logs go to `~/.pollen/logs/pollen.log`, never to the terminal.

mod commands;
mod render;

use anyhow::Result;
use std::{
    env,
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
    sync::Mutex,
    time::Instant,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use pollen_engine::{
    CatalogState, ChatSession, ClearConfirmation, Localizer, PollenConfig, Role, SessionConfig,
    TextKey, TimeoutChoice, log_dir,
};

use commands::{Command, HELP};

type InputLines = Lines<BufReader<Stdin>>;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Without a log file, no logs at all rather than interleaving them with
    // the chat on stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let candidates = [
        log_dir().join("pollen.log"),
        PathBuf::from(".pollen").join("logs").join("pollen.log"),
    ];
    let mut warnings = Vec::new();

    for candidate in candidates {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn load_config() -> SessionConfig {
    match PollenConfig::load() {
        Ok(Some(config)) => config.resolve(),
        Ok(None) => PollenConfig::default().resolve(),
        Err(e) => {
            tracing::warn!(path = %e.path().display(), "Config unusable, using defaults: {e}");
            eprintln!("Warning: {e}; using defaults");
            PollenConfig::default().resolve()
        }
    }
}

async fn read_line(lines: &mut InputLines) -> Result<Option<String>> {
    Ok(lines.next_line().await?)
}

fn print_status(session: &mut ChatSession) {
    session.tick(Instant::now());
    println!("{}", render::status(&session.view()));
}

/// Keep asking until the catalog is no longer waiting on the user.
async fn settle_catalog(session: &mut ChatSession, lines: &mut InputLines) -> Result<()> {
    while session.catalog().state() == CatalogState::AwaitingTimeoutChoice {
        if let Some(prompt) = session.view().timeout_prompt {
            println!("\n{}\n{}", prompt.title, prompt.message);
            print!("[r] {} / [c] {} > ", prompt.retry_label, prompt.cancel_label);
            std::io::stdout().flush()?;
        }
        let choice = match read_line(lines).await?.as_deref().map(str::trim) {
            Some("r" | "R" | "retry") => TimeoutChoice::Retry,
            Some("c" | "C" | "cancel") => TimeoutChoice::Cancel,
            _ => TimeoutChoice::Dismiss,
        };
        session.resolve_timeout(choice).await?;
    }
    Ok(())
}

async fn send(session: &mut ChatSession, text: &str) {
    let mut printed = 0;
    let mut stdout = std::io::stdout();
    let result = session
        .send(text, |reply| {
            if printed == 0 {
                print!("ai> ");
            }
            print!("{}", &reply[printed..]);
            let _ = stdout.flush();
            printed = reply.len();
        })
        .await;
    if printed > 0 {
        println!();
    }
    if let Err(e) = result {
        tracing::debug!("Send returned error: {e}");
        if let Some(entry) = session.transcript().entries().last()
            && entry.role == Role::Error
        {
            println!("error> {}", entry.text);
        }
    }
    print_status(session);
}

async fn confirm_clear(session: &mut ChatSession, lines: &mut InputLines) -> Result<()> {
    print!(
        "{} [y/N] ",
        session.localizer().text(TextKey::ConfirmClearChat)
    );
    std::io::stdout().flush()?;
    if matches!(read_line(lines).await?.as_deref().map(str::trim), Some("y" | "Y" | "yes")) {
        if let Err(e) = session.clear(ClearConfirmation::confirmed()) {
            tracing::debug!("Clear returned error: {e}");
        }
    }
    print_status(session);
    Ok(())
}

async fn run(session: &mut ChatSession, lines: &mut InputLines) -> Result<()> {
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = read_line(lines).await? else {
            return Ok(());
        };

        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Send(text) => send(session, &text).await,
            Command::Models => print!("{}", render::models(&session.view())),
            Command::Model(name) => match session.select_model(&name) {
                Ok(()) => println!("{}", render::header(&session.view())),
                Err(e) => println!("{e}"),
            },
            Command::Temperature(value) => {
                let applied = session.set_temperature(value);
                println!("temperature: {applied}");
            }
            Command::Private(private) => session.set_private(private),
            Command::Theme(theme) => session.set_theme(theme),
            Command::Language(language) => {
                session.set_language(language);
                print_status(session);
            }
            Command::Attach(path) => {
                if session.stage_path(&path).is_err() {
                    print_status(session);
                } else {
                    print!("{}", render::staged(&session.view()));
                }
            }
            Command::Detach(index) => {
                if session.remove_staged(index).is_none() {
                    println!("no staged file number {}", index + 1);
                }
                print!("{}", render::staged(&session.view()));
            }
            Command::Files => print!("{}", render::staged(&session.view())),
            Command::Clear => confirm_clear(session, lines).await?,
            Command::Save => {
                let dir = env::current_dir()?;
                if let Ok(path) = session.save_transcript(&dir).await {
                    println!("{}", path.display());
                }
                print_status(session);
            }
            Command::Copy => {
                session.copy_last_response(|text| {
                    arboard::Clipboard::new()
                        .and_then(|mut clipboard| clipboard.set_text(text.to_owned()))
                });
                print_status(session);
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = load_config();
    let mut session = ChatSession::open(config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", render::header(&session.view()));
    print!("{}", render::transcript(session.transcript().entries()));

    session.load_models().await;
    settle_catalog(&mut session, &mut lines).await?;
    println!("{}", render::header(&session.view()));
    print_status(&mut session);

    run(&mut session, &mut lines).await
}
