//! Pure snapshot transitions and derived views.
//!
//! Every function here maps an old snapshot (plus an action) to a new one
//! without touching storage. Persisting the result is the caller's job; see
//! [`super::Store`].

use chrono::{DateTime, Utc};

use hero_db::models::{AppData, ImageRef, MAX_IMAGES, Profile};
use hero_db::plan::Plan;

/// Outcome of [`set_task_completion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskUpdate {
    /// The task's flag flipped; the snapshot must be persisted.
    Changed(AppData),
    /// Nothing changed: the flag already had the requested value, or the
    /// day/task reference did not resolve.
    Unchanged(AppData),
}

impl TaskUpdate {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }

    pub fn snapshot(&self) -> &AppData {
        match self {
            Self::Changed(s) | Self::Unchanged(s) => s,
        }
    }

    pub fn into_snapshot(self) -> AppData {
        match self {
            Self::Changed(s) | Self::Unchanged(s) => s,
        }
    }
}

/// Build a fresh snapshot started now. Images beyond [`MAX_IMAGES`] are dropped.
pub fn initialize(profile: Profile, plan: Plan, images: Vec<ImageRef>) -> AppData {
    initialize_at(profile, plan, images, Utc::now())
}

/// [`initialize`] with an explicit start date.
pub fn initialize_at(
    profile: Profile,
    plan: Plan,
    mut images: Vec<ImageRef>,
    start_date: DateTime<Utc>,
) -> AppData {
    if images.len() > MAX_IMAGES {
        tracing::debug!(received = images.len(), "dropping surplus images");
        images.truncate(MAX_IMAGES);
    }
    AppData {
        profile: Some(profile),
        plan,
        start_date,
        generated_images: images,
    }
}

/// Set the completion flag of `task_id` within the day at zero-based
/// `day_index`.
///
/// An out-of-range day or unknown task id leaves the snapshot untouched; the
/// miss is logged but not reported as an error.
pub fn set_task_completion(
    mut snapshot: AppData,
    day_index: usize,
    task_id: &str,
    completed: bool,
) -> TaskUpdate {
    match snapshot
        .plan
        .set_task_completion(day_index, task_id, completed)
    {
        Some(previous) if previous != completed => TaskUpdate::Changed(snapshot),
        Some(_) => TaskUpdate::Unchanged(snapshot),
        None => {
            tracing::warn!(day_index, task_id, "ignoring update for unknown task reference");
            TaskUpdate::Unchanged(snapshot)
        }
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Completion summary over the whole plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// `round(100 * completed / total)`, 0 when there are no tasks.
    pub percent: u8,
}

impl Progress {
    pub fn new(completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            ((completed.min(total) * 100 + total / 2) / total) as u8
        };
        Self {
            completed,
            total,
            percent,
        }
    }
}

pub fn progress(snapshot: &AppData) -> Progress {
    Progress::new(snapshot.plan.completed_tasks(), snapshot.plan.total_tasks())
}

/// `true` when all tasks of the day at `day_index` are completed.
/// Out-of-range days are never complete.
pub fn is_day_complete(snapshot: &AppData, day_index: usize) -> bool {
    snapshot
        .plan
        .day(day_index)
        .is_some_and(|d| d.is_complete())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_rounds_half_up() {
        assert_eq!(Progress::new(0, 60).percent, 0);
        assert_eq!(Progress::new(1, 60).percent, 2);
        assert_eq!(Progress::new(30, 60).percent, 50);
        assert_eq!(Progress::new(59, 60).percent, 98);
        assert_eq!(Progress::new(60, 60).percent, 100);
        assert_eq!(Progress::new(1, 8).percent, 13);
    }

    #[test]
    fn progress_with_no_tasks_is_zero() {
        assert_eq!(Progress::new(0, 0), Progress::default());
    }

    #[test]
    fn percent_is_always_within_bounds() {
        for completed in 0..=60 {
            let p = Progress::new(completed, 60);
            assert!(p.percent <= 100);
            let expected = (100.0 * completed as f64 / 60.0).round() as u8;
            assert_eq!(p.percent, expected, "completed = {completed}");
        }
    }
}
