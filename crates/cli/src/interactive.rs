//! `ripdash watch`: live redraw plus operator commands read from stdin.

use std::io::{IsTerminal, Write as _};
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use ripdash_core::Tier;
use ripdash_dashboard::theme::ThemeStore;
use ripdash_dashboard::{
    Action, Confirm, Dashboard, RefreshIntervals, RefreshScheduler, Severity,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info};

use crate::config::parse_tier;
use crate::present::Presenter;

/// Line-oriented stdin shared between the command loop and prompts.
#[derive(Clone)]
pub struct Input {
    lines: Arc<Mutex<Lines<BufReader<Stdin>>>>,
}

impl Input {
    pub fn stdin() -> Self {
        Self {
            lines: Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines())),
        }
    }

    /// Next line, or `None` at end of input.
    pub async fn next_line(&self) -> std::io::Result<Option<String>> {
        self.lines.lock().await.next_line().await
    }
}

/// Confirmer that prints the prompt and reads the answer from stdin.
pub struct StdinConfirm {
    input: Input,
}

impl StdinConfirm {
    pub fn new(input: Input) -> Self {
        Self { input }
    }
}

#[async_trait::async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [y/N] ");
        let _ = std::io::stdout().flush();
        match self.input.next_line().await {
            Ok(Some(answer)) => is_yes(&answer),
            _ => false,
        }
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    Eject(String),
    Cancel(String),
    Rip(Tier),
    Refresh,
    Theme,
    Help,
    Quit,
}

pub const HELP: &str = "commands: eject <path> | cancel <job_id> | rip <cd|dvd|bluray> \
                        | refresh | theme | help | quit";

pub fn parse_command(line: &str) -> Result<Option<OperatorCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("too many arguments for {verb}"));
    }
    let verb = verb.to_ascii_lowercase();
    let command = match (verb.as_str(), arg) {
        ("eject", Some(path)) => OperatorCommand::Eject(path.to_string()),
        ("cancel", Some(id)) => OperatorCommand::Cancel(id.to_string()),
        ("rip", Some(tier)) => OperatorCommand::Rip(parse_tier(tier)?),
        ("refresh", None) => OperatorCommand::Refresh,
        ("theme", None) => OperatorCommand::Theme,
        ("help" | "?", None) => OperatorCommand::Help,
        ("quit" | "exit" | "q", None) => OperatorCommand::Quit,
        ("eject" | "cancel" | "rip", None) => return Err(format!("{verb} needs an argument")),
        ("refresh" | "theme" | "help" | "?" | "quit" | "exit" | "q", Some(_)) => {
            return Err(format!("{verb} takes no arguments"));
        }
        _ => return Err(format!("unknown command: {verb}")),
    };
    Ok(Some(command))
}

pub struct Watch {
    pub dashboard: Arc<Dashboard>,
    pub intervals: RefreshIntervals,
    pub presenter: Presenter,
    pub themes: ThemeStore,
    pub colorfgbg: Option<String>,
}

impl Watch {
    pub async fn run(mut self) -> anyhow::Result<()> {
        let scheduler = RefreshScheduler::start(self.dashboard.clone(), self.intervals);
        let mut events = self.dashboard.subscribe();
        let input = Input::stdin();
        let confirm = StdinConfirm::new(input.clone());
        let clear = std::io::stdout().is_terminal();

        self.draw(clear, None).await;
        let result = loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(event) => {
                        debug!(?event, "redraw");
                        self.draw(clear, None).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "event receiver lagged");
                        self.draw(clear, None).await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break Ok(()),
                },
                line = input.next_line() => {
                    let line = match line.context("reading stdin") {
                        Ok(Some(line)) => line,
                        Ok(None) => break Ok(()),
                        Err(e) => break Err(e),
                    };
                    match parse_command(&line) {
                        Ok(Some(OperatorCommand::Quit)) => break Ok(()),
                        Ok(Some(command)) => {
                            let note = self.execute(command, &confirm).await;
                            self.draw(clear, note.as_deref()).await;
                        }
                        Ok(None) => {}
                        Err(message) => self.draw(clear, Some(&message)).await,
                    }
                },
                _ = tokio::signal::ctrl_c() => break Ok(()),
            }
        };

        scheduler.shutdown().await;
        info!("watch stopped");
        result
    }

    /// Run one operator command. Returns a status note for the footer.
    async fn execute(&mut self, command: OperatorCommand, confirm: &dyn Confirm) -> Option<String> {
        let view = self.dashboard.view().await;
        match command {
            OperatorCommand::Eject(path) => {
                let Some(Action::Eject {
                    requires_confirmation,
                    ..
                }) = view.drives.eject_action(&path)
                else {
                    return Some(format!("no drive {path} on the dashboard"));
                };
                let requires_confirmation = *requires_confirmation;
                if let Err(e) = self.dashboard.eject(&path, requires_confirmation, confirm).await {
                    debug!(path, code = e.code(), "eject not completed");
                }
                None
            }
            OperatorCommand::Cancel(job_id) => {
                if view.jobs.cancel_action(&job_id).is_none() {
                    return Some(format!("job {job_id} cannot be cancelled"));
                }
                if let Err(e) = self.dashboard.cancel_job(&job_id, confirm).await {
                    debug!(job_id, code = e.code(), "cancel not completed");
                }
                None
            }
            OperatorCommand::Rip(tier) => {
                if let Err(e) = self.dashboard.eject_for_type(tier).await {
                    debug!(%tier, code = e.code(), "rip request not completed");
                }
                None
            }
            OperatorCommand::Refresh => {
                self.dashboard.refresh_all().await;
                None
            }
            OperatorCommand::Theme => {
                match self.themes.toggle(Utc::now(), self.colorfgbg.as_deref()) {
                    Ok(theme) => {
                        self.presenter.theme = theme;
                        Some(format!("theme: {theme}"))
                    }
                    Err(e) => {
                        self.dashboard
                            .notify(format!("Could not save theme: {e}"), Severity::Error)
                            .await;
                        None
                    }
                }
            }
            OperatorCommand::Help => Some(HELP.to_string()),
            OperatorCommand::Quit => None,
        }
    }

    async fn draw(&self, clear: bool, note: Option<&str>) {
        let view = self.dashboard.view().await;
        let toasts = self.dashboard.toasts().await;
        let mut out = std::io::stdout().lock();
        if clear {
            let _ = write!(out, "\x1b[2J\x1b[H");
        }
        let _ = write!(out, "{}", self.presenter.render(&view, &toasts));
        if let Some(note) = note {
            let _ = writeln!(out, "{note}");
        }
        let _ = write!(out, "> ");
        let _ = out.flush();
    }
}
