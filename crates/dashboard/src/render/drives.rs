use ripdash_core::{CapabilitySummary, DriveSnapshot, Tier, classify};

use crate::view::{Action, Line, Region, Tile, Tone};

pub fn render(region: &mut Region, drives: &[DriveSnapshot]) {
    let summary = classify(drives);
    let mut tiles = Vec::with_capacity(drives.len() + 1);
    tiles.push(overview_tile(&summary));
    tiles.extend(drives.iter().map(drive_tile));
    region.replace(tiles);
}

fn overview_tile(summary: &CapabilitySummary<'_>) -> Tile {
    let mut tile = Tile::new("Drive Overview");

    for tier in Tier::ALL {
        let a = summary.get(tier);
        let tone = if a.available > 0 { Tone::Good } else { Tone::Bad };
        tile = tile.line(
            Line::field(tier.short_label(), format!("{} / {}", a.available, a.total)).tone(tone),
        );
    }

    if !summary.blacklisted.is_empty() {
        let models: Vec<&str> = summary
            .blacklisted
            .iter()
            .map(|d| d.model.as_str())
            .collect();
        tile = tile.line(Line::field("Blacklisted Drives", models.join(", ")).tone(Tone::Bad));
    }

    for tier in Tier::ALL {
        tile = tile.action(Action::RipType {
            tier,
            enabled: summary.get(tier).available > 0,
        });
    }
    tile
}

fn drive_tile(drive: &DriveSnapshot) -> Tile {
    let status = if drive.job_id.is_some() {
        Line::field("Status", "Ripping").tone(Tone::Good)
    } else if drive.blacklisted {
        Line::field("Status", "Blacklisted").tone(Tone::Bad)
    } else {
        Line::field("Status", "Idle")
    };
    let types: Vec<&str> = drive.capability.iter().map(|c| c.as_str()).collect();

    let mut tile = Tile::new(drive.model.clone())
        .line(Line::field("Path", drive.path.clone()))
        .line(Line::field("Type", types.join(", ")))
        .line(status);

    if let Some(label) = &drive.disc_label {
        tile = tile.line(Line::field("Disc Label", label.clone()));
    }
    if let Some(job_id) = &drive.job_id {
        tile = tile.line(Line::field("Job ID", job_id.clone()).link(format!("/jobs/{job_id}")));
    }

    tile.action(Action::Eject {
        path: drive.path.clone(),
        requires_confirmation: drive.job_id.is_some(),
    })
}
