use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ripdash_client::BackendConfig;
use ripdash_client::http::DEFAULT_BASE_URL;
use ripdash_core::Tier;
use ripdash_dashboard::RefreshIntervals;

/// Live status dashboard for an optical-media ripping backend.
#[derive(Debug, Parser)]
#[command(name = "ripdash", version, arg_required_else_help = true)]
pub struct Cli {
    /// Backend base URL.
    #[arg(long, global = true, env = "RIPDASH_URL", default_value = DEFAULT_BASE_URL)]
    pub url: String,
    /// HTTP basic auth username.
    #[arg(long, global = true, env = "RIPDASH_USERNAME")]
    pub username: Option<String>,
    /// HTTP basic auth password.
    #[arg(long, global = true, env = "RIPDASH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// Poll interval in seconds for system info, drives and jobs.
    #[arg(
        long,
        global = true,
        env = "RIPDASH_POLL_SECS",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval: u64,
    /// Theme preference file.
    #[arg(long, global = true, env = "RIPDASH_THEME_FILE", value_name = "PATH")]
    pub theme_file: Option<PathBuf>,
    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Poll continuously and accept operator commands on stdin.
    Watch,
    /// Fetch everything once and print it.
    Status,
    /// Eject a drive by device path.
    Eject(EjectArgs),
    /// Cancel a running or queued job.
    Cancel(CancelArgs),
    /// Eject the best idle drive for a disc type.
    Rip(RipArgs),
    /// Show or change the color theme.
    Theme(ThemeArgs),
}

#[derive(Debug, Clone, Args)]
pub struct EjectArgs {
    pub path: String,
    /// Do not ask before cancelling the drive's job.
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CancelArgs {
    pub job_id: String,
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Debug, Clone, Args)]
pub struct RipArgs {
    /// cd, dvd or bluray (bd).
    #[arg(value_parser = parse_tier)]
    pub tier: Tier,
}

#[derive(Debug, Clone, Args)]
pub struct ThemeArgs {
    #[arg(value_enum)]
    pub mode: Option<ThemeMode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeMode {
    Light,
    Dark,
    Toggle,
}

pub fn parse_tier(s: &str) -> Result<Tier, String> {
    s.parse::<Tier>().map_err(|e| e.to_string())
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub intervals: RefreshIntervals,
    pub theme_file: PathBuf,
    pub color: bool,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            backend: BackendConfig {
                base_url: self.url.clone(),
                username: self.username.clone(),
                password: self.password.clone(),
            },
            intervals: RefreshIntervals::uniform(Duration::from_secs(self.interval)),
            theme_file: self.theme_file.clone().unwrap_or_else(|| {
                default_theme_file(std::env::var_os("XDG_CONFIG_HOME"), std::env::var_os("HOME"))
            }),
            color: !self.no_color,
        }
    }
}

fn default_theme_file(
    xdg_config_home: Option<std::ffi::OsString>,
    home: Option<std::ffi::OsString>,
) -> PathBuf {
    let config_dir = xdg_config_home
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    config_dir.join("ripdash").join("theme")
}
