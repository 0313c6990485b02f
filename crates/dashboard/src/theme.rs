//! Persisted light/dark preference.
//!
//! Stored as a single cookie-style line, `theme=dark; expires=<RFC 3339>`,
//! valid for one year from the last change.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::debug;

pub const COOKIE_NAME: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Terminal's preference from `COLORFGBG` (`fg;bg`). Dark unless the
    /// background is a light palette entry.
    pub fn from_colorfgbg(value: Option<&str>) -> Self {
        let bg = value
            .and_then(|v| v.rsplit(';').next())
            .and_then(|bg| bg.trim().parse::<u8>().ok());
        match bg {
            Some(7) | Some(9..=15) => Self::Light,
            _ => Self::Dark,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ThemeError::Unknown(other.to_string())),
        }
    }
}

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("unknown theme: {0}")]
    Unknown(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ThemeError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unknown(_) => "unknown_theme",
            Self::Io(_) => "io",
        }
    }
}

/// File-backed theme preference.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved preference, if present and not expired.
    pub fn load(&self, now: DateTime<Utc>) -> Option<Theme> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let parsed = parse_cookie(&raw);
        match parsed {
            Some((theme, expires)) if expires > now => Some(theme),
            Some((_, expires)) => {
                debug!(path = %self.path.display(), %expires, "theme preference expired");
                None
            }
            None => {
                debug!(path = %self.path.display(), "unreadable theme preference");
                None
            }
        }
    }

    /// Saved preference, falling back to the terminal's.
    pub fn resolve(&self, now: DateTime<Utc>, colorfgbg: Option<&str>) -> Theme {
        self.load(now)
            .unwrap_or_else(|| Theme::from_colorfgbg(colorfgbg))
    }

    pub fn save(&self, theme: Theme, now: DateTime<Utc>) -> Result<(), ThemeError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let expires = now + Duration::days(365);
        std::fs::write(&self.path, format_cookie(theme, expires))?;
        Ok(())
    }

    /// Flip the current theme, persist and return it.
    pub fn toggle(&self, now: DateTime<Utc>, colorfgbg: Option<&str>) -> Result<Theme, ThemeError> {
        let next = self.resolve(now, colorfgbg).toggled();
        self.save(next, now)?;
        Ok(next)
    }
}

fn format_cookie(theme: Theme, expires: DateTime<Utc>) -> String {
    format!("{COOKIE_NAME}={theme}; expires={}\n", expires.to_rfc3339())
}

fn parse_cookie(raw: &str) -> Option<(Theme, DateTime<Utc>)> {
    let mut theme = None;
    let mut expires = None;
    for part in raw.trim().split(';') {
        let (key, value) = part.trim().split_once('=')?;
        match key.trim() {
            COOKIE_NAME => theme = value.parse::<Theme>().ok(),
            "expires" => {
                expires = DateTime::parse_from_rfc3339(value.trim())
                    .ok()
                    .map(|d| d.with_timezone(&Utc))
            }
            _ => {}
        }
    }
    Some((theme?, expires?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn save_then_load_within_a_year() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path().join("ripdash/theme"));

        assert_eq!(store.load(now()), None);
        store.save(Theme::Light, now()).unwrap();
        assert_eq!(store.load(now() + Duration::days(364)), Some(Theme::Light));
        assert_eq!(store.load(now() + Duration::days(366)), None);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.starts_with("theme=light; expires=2027-10-16"));
    }

    #[test]
    fn toggle_starts_from_terminal_preference() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path().join("theme"));

        assert_eq!(store.toggle(now(), Some("0;15")).unwrap(), Theme::Dark);
        assert_eq!(store.toggle(now(), Some("0;15")).unwrap(), Theme::Light);
    }

    #[test]
    fn colorfgbg_detection() {
        assert_eq!(Theme::from_colorfgbg(None), Theme::Dark);
        assert_eq!(Theme::from_colorfgbg(Some("15;0")), Theme::Dark);
        assert_eq!(Theme::from_colorfgbg(Some("0;15")), Theme::Light);
        assert_eq!(Theme::from_colorfgbg(Some("12;8")), Theme::Dark);
        assert_eq!(Theme::from_colorfgbg(Some("0;default;7")), Theme::Light);
        assert_eq!(Theme::from_colorfgbg(Some("garbage")), Theme::Dark);
    }

    #[test]
    fn parses_theme_names() {
        assert_eq!(" dark ".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        let err = "purple".parse::<Theme>().unwrap_err();
        assert_eq!(err.code(), "unknown_theme");
    }

    #[test]
    fn corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = ThemeStore::new(dir.path().join("theme"));
        std::fs::write(store.path(), "theme=purple").unwrap();
        assert_eq!(store.resolve(now(), Some("0;15")), Theme::Light);
    }
}
