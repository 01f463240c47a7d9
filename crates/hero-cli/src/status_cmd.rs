//! `holiday-hero status` and `holiday-hero day` commands.

use std::io::IsTerminal;

use anyhow::{Result, bail};

use hero_core::presentation::presentation;
use hero_core::store::Store;
use hero_db::plan::PLAN_DAYS;

const NO_PLAN_HINT: &str =
    "No plan yet. Run `holiday-hero onboard --name NAME --age AGE --level LEVEL` to create one.\n";

/// Greeting, overall progress and one line per day.
pub fn render_status(store: &Store) -> String {
    let Some(snapshot) = store.snapshot() else {
        return NO_PLAN_HINT.to_string();
    };

    let mut out = String::new();
    if let Some(profile) = &snapshot.profile {
        out.push_str(&format!(
            "Hello, {}! ({})\n",
            profile.name,
            profile.level.arabic_label()
        ));
    }
    out.push_str(&format!("Started: {}\n", snapshot.start_date.format("%Y-%m-%d")));

    let progress = store.progress();
    out.push_str(&format!(
        "Progress: {}/{} ({}%)\n\n",
        progress.completed, progress.total, progress.percent
    ));

    for day in snapshot.plan.days() {
        let marker = if day.is_complete() { "+" } else { "." };
        let glyphs: String = day
            .tasks
            .iter()
            .map(|t| {
                if t.is_completed {
                    presentation(t.task_type).glyph
                } else {
                    '-'
                }
            })
            .collect();
        out.push_str(&format!(
            "  [{marker}] Day {:>2}  {glyphs}  {}/{}\n",
            day.day_number,
            day.completed_count(),
            day.tasks.len()
        ));
    }

    if !snapshot.generated_images.is_empty() {
        out.push_str(&format!(
            "\n{} inspiration image(s) saved.\n",
            snapshot.generated_images.len()
        ));
    }

    out
}

/// Whether stdout should receive ANSI colour codes.
pub fn color_enabled() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Terminal foreground colour for a category accent.
fn ansi_code(accent: &str) -> &'static str {
    match accent {
        "yellow" => "33",
        "blue" => "34",
        "indigo" => "94",
        "purple" => "35",
        _ => "39",
    }
}

/// The four tasks of day `day_number`. With `color`, each task heading is
/// tinted with its category accent.
pub fn render_day(store: &Store, day_number: u32, color: bool) -> Result<String> {
    if store.snapshot().is_none() {
        return Ok(NO_PLAN_HINT.to_string());
    }
    let Some(day) = store.day(day_number) else {
        bail!("day {day_number} is out of range (1-{PLAN_DAYS})");
    };

    let mut out = format!(
        "Day {} ({}/{} done)\n",
        day.day_number,
        day.completed_count(),
        day.tasks.len()
    );
    for task in &day.tasks {
        let look = presentation(task.task_type);
        let check = if task.is_completed { "x" } else { " " };
        let heading = format!("{} [{check}] {}", look.glyph, task.title);
        let heading = if color {
            format!("\x1b[{}m{heading}\x1b[0m", ansi_code(look.accent))
        } else {
            heading
        };
        out.push_str(&format!(
            "\n{heading}  ({}, {})\n      {}\n      id: {}\n",
            look.label, look.icon, task.description, task.id
        ));
    }
    Ok(out)
}
