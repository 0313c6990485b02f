//! Text rendering of the dashboard view for a terminal.

use std::fmt::Write as _;

use colored::{Color, ColoredString, Colorize};
use ripdash_dashboard::theme::Theme;
use ripdash_dashboard::view::{Line, PLACEHOLDER, Tile, Tone};
use ripdash_dashboard::{Action, DashboardView, Phase, Region, Severity, Toast};

#[derive(Debug, Clone)]
pub struct Presenter {
    pub theme: Theme,
    color: bool,
    link_base: String,
}

struct Palette {
    heading: Color,
    good: Color,
    bad: Color,
    muted: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                heading: Color::BrightCyan,
                good: Color::BrightGreen,
                bad: Color::BrightRed,
                muted: Color::BrightBlack,
            },
            Theme::Light => Self {
                heading: Color::Blue,
                good: Color::Green,
                bad: Color::Red,
                muted: Color::BrightBlack,
            },
        }
    }
}

impl Presenter {
    pub fn new(theme: Theme, color: bool, link_base: &str) -> Self {
        Self {
            theme,
            color,
            link_base: link_base.trim_end_matches('/').to_string(),
        }
    }

    fn paint(&self, text: &str, color: Color) -> ColoredString {
        if self.color {
            text.color(color)
        } else {
            ColoredString::from(text)
        }
    }

    fn bold(&self, text: &str, color: Color) -> ColoredString {
        if self.color {
            text.color(color).bold()
        } else {
            ColoredString::from(text)
        }
    }

    pub fn render(&self, view: &DashboardView, toasts: &[(Toast, Phase)]) -> String {
        let mut out = String::new();
        self.region(&mut out, "System", &view.system);
        self.region(&mut out, "Drives", &view.drives);
        self.region(&mut out, "Jobs", &view.jobs);
        self.toasts(&mut out, toasts);
        out
    }

    fn region(&self, out: &mut String, title: &str, region: &Region) {
        let palette = Palette::for_theme(self.theme);
        let _ = writeln!(out, "{}", self.bold(&format!("== {title} =="), palette.heading));
        if !region.is_rendered() {
            let _ = writeln!(out, "  {}", self.paint(PLACEHOLDER, palette.muted));
            return;
        }
        for tile in region.tiles() {
            self.tile(out, tile, &palette);
        }
        out.push('\n');
    }

    fn tile(&self, out: &mut String, tile: &Tile, palette: &Palette) {
        let _ = writeln!(out, "[{}]", self.bold(&tile.heading, palette.heading));
        for line in &tile.lines {
            let _ = writeln!(out, "  {}", self.line(line, palette));
        }
        let actions: Vec<String> = tile.actions.iter().map(describe_action).collect();
        if !actions.is_empty() {
            let _ = writeln!(out, "  > {}", self.paint(&actions.join(" | "), palette.muted));
        }
    }

    fn line(&self, line: &Line, palette: &Palette) -> String {
        let value = match line.tone {
            Tone::Normal => line.value.clone(),
            Tone::Good => self.paint(&line.value, palette.good).to_string(),
            Tone::Bad => self.paint(&line.value, palette.bad).to_string(),
            Tone::Muted => self.paint(&line.value, palette.muted).to_string(),
        };
        let mut text = match &line.label {
            Some(label) => format!("{label}: {value}"),
            None => value,
        };
        if let Some(href) = &line.link {
            let _ = write!(text, " <{}{}>", self.link_base, href);
        }
        text
    }

    fn toasts(&self, out: &mut String, toasts: &[(Toast, Phase)]) {
        if toasts.is_empty() {
            return;
        }
        let palette = Palette::for_theme(self.theme);
        for (toast, phase) in toasts {
            let (mark, color) = match toast.severity {
                Severity::Success => ("ok", palette.good),
                Severity::Error => ("!!", palette.bad),
            };
            let color = match phase {
                Phase::Visible => color,
                Phase::Fading => palette.muted,
            };
            let _ = writeln!(out, "{}", self.paint(&format!("[{mark}] {}", toast.message), color));
        }
    }
}

fn describe_action(action: &Action) -> String {
    match action {
        Action::Eject {
            path,
            requires_confirmation,
        } => {
            if *requires_confirmation {
                format!("eject {path} (cancels job)")
            } else {
                format!("eject {path}")
            }
        }
        Action::CancelJob { job_id } => format!("cancel {job_id}"),
        Action::RipType { tier, enabled } => {
            let name = tier.as_str().to_ascii_lowercase();
            if *enabled {
                format!("rip {name}")
            } else {
                format!("rip {name} (no drive)")
            }
        }
    }
}
