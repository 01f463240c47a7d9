//! `holiday-hero done` / `holiday-hero undo` commands.

use anyhow::{Result, bail};

use hero_core::store::Store;

/// Set a task's completion flag and describe the outcome.
///
/// A reference that does not resolve is reported, not treated as an error.
pub fn run_set_completion(
    store: &mut Store,
    day_number: u32,
    task_id: &str,
    completed: bool,
) -> Result<String> {
    if !store.is_onboarded() {
        bail!("no plan yet; run `holiday-hero onboard` first");
    }

    let Some(task) = store.day(day_number).and_then(|d| d.task(task_id)) else {
        return Ok(format!(
            "No task {task_id} on day {day_number}; nothing changed. \
             Run `holiday-hero day {day_number}` to list task ids."
        ));
    };
    let title = task.title.clone();

    // `day` resolved, so day_number >= 1.
    let day_index = day_number as usize - 1;
    let changed = store.set_task_completion(day_index, task_id, completed);

    let progress = store.progress();
    let state = if completed { "done" } else { "not done" };
    let prefix = if changed { "Marked" } else { "Already" };
    Ok(format!(
        "{prefix} {state}: {title} ({task_id}). Progress {}/{} ({}%).",
        progress.completed, progress.total, progress.percent
    ))
}
