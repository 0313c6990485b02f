mod config;
mod interactive;
mod present;

use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::Utc;
use clap::Parser;
use ripdash_client::HttpBackend;
use ripdash_dashboard::theme::{Theme, ThemeStore};
use ripdash_dashboard::{Action, AutoConfirm, CommandError, Confirm, Dashboard};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Cli, Command, ThemeMode};
use interactive::{Input, StdinConfirm, Watch};
use present::Presenter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they stay out of the rendered dashboard.
    let fallback = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config();
    if !config.color {
        colored::control::set_override(false);
    }

    let colorfgbg = std::env::var("COLORFGBG").ok();
    let themes = ThemeStore::new(&config.theme_file);

    if let Command::Theme(args) = &cli.command {
        let now = Utc::now();
        let theme = match args.mode {
            None => themes.resolve(now, colorfgbg.as_deref()),
            Some(ThemeMode::Toggle) => themes
                .toggle(now, colorfgbg.as_deref())
                .context("failed to save theme")?,
            Some(mode) => {
                let theme = if mode == ThemeMode::Light { Theme::Light } else { Theme::Dark };
                themes.save(theme, now).context("failed to save theme")?;
                theme
            }
        };
        println!("{theme}");
        return Ok(());
    }

    let backend = HttpBackend::new(config.backend.clone()).context("invalid backend url")?;
    let link_base = backend.base_url().to_string();
    info!(url = %link_base, "using backend");
    let dashboard = Arc::new(Dashboard::new(Arc::new(backend)));
    let presenter = Presenter::new(
        themes.resolve(Utc::now(), colorfgbg.as_deref()),
        config.color,
        &link_base,
    );

    match cli.command {
        Command::Watch => {
            Watch {
                dashboard,
                intervals: config.intervals,
                presenter,
                themes,
                colorfgbg,
            }
            .run()
            .await
        }
        Command::Status => {
            dashboard.refresh_all().await;
            print_dashboard(&dashboard, &presenter).await;
            Ok(())
        }
        Command::Eject(args) => {
            dashboard.refresh_drives().await;
            let view = dashboard.view().await;
            let requires_confirmation = match view.drives.eject_action(&args.path) {
                Some(Action::Eject {
                    requires_confirmation,
                    ..
                }) => *requires_confirmation,
                _ => bail!("no drive {} reported by the backend", args.path),
            };
            let confirm = confirmer(args.yes);
            let result = dashboard
                .eject(&args.path, requires_confirmation, confirm.as_ref())
                .await;
            finish(&dashboard, &presenter, result).await
        }
        Command::Cancel(args) => {
            dashboard.refresh_jobs().await;
            if dashboard.view().await.jobs.cancel_action(&args.job_id).is_none() {
                bail!("job {} is not running or queued", args.job_id);
            }
            let confirm = confirmer(args.yes);
            let result = dashboard.cancel_job(&args.job_id, confirm.as_ref()).await;
            finish(&dashboard, &presenter, result).await
        }
        Command::Rip(args) => {
            let result = dashboard.eject_for_type(args.tier).await;
            finish(&dashboard, &presenter, result).await
        }
        Command::Theme(_) => Ok(()),
    }
}

fn confirmer(yes: bool) -> Box<dyn Confirm> {
    if yes {
        Box::new(AutoConfirm(true))
    } else {
        Box::new(StdinConfirm::new(Input::stdin()))
    }
}

async fn print_dashboard(dashboard: &Dashboard, presenter: &Presenter) {
    let view = dashboard.view().await;
    let toasts = dashboard.toasts().await;
    print!("{}", presenter.render(&view, &toasts));
}

/// Print the outcome of a one-shot command and turn failures into a non-zero exit.
async fn finish(
    dashboard: &Dashboard,
    presenter: &Presenter,
    result: Result<(), CommandError>,
) -> anyhow::Result<()> {
    match result {
        Ok(()) => {
            print_dashboard(dashboard, presenter).await;
            Ok(())
        }
        Err(CommandError::Declined) => {
            println!("aborted");
            Ok(())
        }
        Err(e) => {
            print_dashboard(dashboard, presenter).await;
            Err(anyhow::Error::new(e).context("command failed"))
        }
    }
}
