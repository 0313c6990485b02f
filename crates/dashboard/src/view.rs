//! Renderable view model.
//!
//! A [`Region`] is one identified container on the dashboard. Renderers never
//! patch a region in place: they build a fresh list of tiles and hand it to
//! [`Region::replace`].

use ripdash_core::Tier;

pub const PLACEHOLDER: &str = "loading...";

/// The three polled resources, which are also the three region ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    SystemInfo,
    Drives,
    Jobs,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::SystemInfo, Resource::Drives, Resource::Jobs];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SystemInfo => "system-info",
            Self::Drives => "drives",
            Self::Jobs => "jobs",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tone {
    #[default]
    Normal,
    Good,
    Bad,
    Muted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub label: Option<String>,
    pub value: String,
    pub tone: Tone,
    pub link: Option<String>,
}

impl Line {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            label: None,
            value: value.into(),
            tone: Tone::Normal,
            link: None,
        }
    }

    pub fn field(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::text(value)
        }
    }

    /// Labelled field whose value falls back to the placeholder when absent.
    pub fn maybe(label: impl Into<String>, value: Option<String>) -> Self {
        Self::field(label, value.unwrap_or_else(|| PLACEHOLDER.to_string()))
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn link(mut self, href: impl Into<String>) -> Self {
        self.link = Some(href.into());
        self
    }
}

/// Operator actions exposed by a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Eject {
        path: String,
        requires_confirmation: bool,
    },
    CancelJob {
        job_id: String,
    },
    RipType {
        tier: Tier,
        enabled: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tile {
    pub heading: String,
    pub classes: Vec<String>,
    pub lines: Vec<Line>,
    pub actions: Vec<Action>,
}

impl Tile {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            classes: vec!["tile".to_string()],
            ..Default::default()
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: Resource,
    tiles: Vec<Tile>,
    /// Number of times the region has been rebuilt.
    generation: u64,
}

impl Region {
    pub fn new(id: Resource) -> Self {
        Self {
            id,
            tiles: Vec::new(),
            generation: 0,
        }
    }

    /// Clear the region and rebuild it from `tiles`.
    pub fn replace(&mut self, tiles: Vec<Tile>) {
        self.tiles = tiles;
        self.generation += 1;
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Has the region been rendered at least once.
    pub fn is_rendered(&self) -> bool {
        self.generation > 0
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.tiles.iter().flat_map(|t| t.actions.iter())
    }

    pub fn eject_action(&self, path: &str) -> Option<&Action> {
        self.actions()
            .find(|a| matches!(a, Action::Eject { path: p, .. } if p == path))
    }

    pub fn cancel_action(&self, job_id: &str) -> Option<&Action> {
        self.actions()
            .find(|a| matches!(a, Action::CancelJob { job_id: j } if j == job_id))
    }
}
