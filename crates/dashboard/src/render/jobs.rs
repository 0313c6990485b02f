use ripdash_core::{JobSnapshot, JobStatus};

use crate::view::{Action, Line, Region, Tile, Tone};

pub fn render(region: &mut Region, jobs: &[JobSnapshot]) {
    if jobs.is_empty() {
        region.replace(vec![
            Tile::new("No jobs running").line(Line::text("Everything's idle.").tone(Tone::Muted)),
        ]);
        return;
    }
    region.replace(jobs.iter().map(job_tile).collect());
}

fn status_tone(status: &JobStatus) -> Tone {
    match status {
        JobStatus::Running | JobStatus::Queued => Tone::Normal,
        JobStatus::Completed | JobStatus::Finished => Tone::Good,
        JobStatus::Failed => Tone::Bad,
        JobStatus::Cancelled | JobStatus::Other(_) => Tone::Muted,
    }
}

fn job_tile(job: &JobSnapshot) -> Tile {
    let mut tile = Tile::new(job.disc_label.clone())
        .class("job-card")
        .class(job.status.as_str().to_lowercase())
        .line(Line::field("Status", job.status.as_str()).tone(status_tone(&job.status)))
        .line(Line::field("Type", job.disc_type.as_str()))
        .line(Line::field("Progress", format!("{}%", job.progress.clamp(0.0, 100.0))))
        .line(Line::field("Drive", job.drive.clone()));

    if let (Some(step), Some(total)) = (job.step, job.steps_total) {
        let mut value = format!("{step}/{total}");
        if let Some(desc) = &job.step_description {
            value.push_str(": ");
            value.push_str(desc);
        }
        tile = tile.line(Line::field("Step", value));
    }

    tile = tile.line(Line::text("View").link(job.detail_href()));

    if job.status.is_cancellable() {
        tile = tile.action(Action::CancelJob {
            job_id: job.job_id.clone(),
        });
    }
    tile
}
