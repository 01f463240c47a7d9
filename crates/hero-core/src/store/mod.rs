//! Profile and plan state store.
//!
//! [`transitions`] holds the pure functions from (snapshot, action) to a new
//! snapshot. [`Store`] is the session holder kept at the application root:
//! it owns the current snapshot (if any), applies transitions, and then
//! persists the result as a fire-and-forget side effect. A persistence
//! failure never fails or rolls back a transition.

pub mod transitions;

use hero_db::PersistenceGateway;
use hero_db::models::{AppData, DayPlan, ImageRef, Profile};
use hero_db::plan::Plan;

pub use transitions::{Progress, TaskUpdate, initialize, is_day_complete, progress, set_task_completion};

/// Holds the current snapshot and the gateway it is persisted through.
#[derive(Debug)]
pub struct Store {
    data: Option<AppData>,
    gateway: PersistenceGateway,
}

impl Store {
    /// Open a store, loading whatever snapshot the gateway holds.
    ///
    /// Missing or malformed data yields an empty (pre-onboarding) store.
    pub fn open(gateway: PersistenceGateway) -> Self {
        let data = gateway.load();
        tracing::debug!(onboarded = data.is_some(), "store opened");
        Self { data, gateway }
    }

    /// The current snapshot, or `None` before onboarding.
    pub fn snapshot(&self) -> Option<&AppData> {
        self.data.as_ref()
    }

    pub fn is_onboarded(&self) -> bool {
        self.data.is_some()
    }

    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    /// Replace any prior snapshot with a new one and persist it.
    pub fn initialize(&mut self, profile: Profile, plan: Plan, images: Vec<ImageRef>) -> &AppData {
        self.commit(transitions::initialize(profile, plan, images))
    }

    /// Set a task's completion flag. Returns `true` when the snapshot changed
    /// (and was therefore persisted).
    pub fn set_task_completion(&mut self, day_index: usize, task_id: &str, completed: bool) -> bool {
        let Some(current) = self.data.take() else {
            tracing::warn!(day_index, task_id, "ignoring task update before onboarding");
            return false;
        };

        match transitions::set_task_completion(current, day_index, task_id, completed) {
            TaskUpdate::Changed(next) => {
                self.commit(next);
                true
            }
            TaskUpdate::Unchanged(same) => {
                self.data = Some(same);
                false
            }
        }
    }

    /// Drop the snapshot and erase the durable slot.
    pub fn reset(&mut self) {
        self.data = None;
        self.gateway.clear();
        tracing::info!("store reset");
    }

    /// Progress over the whole plan; all zeros before onboarding.
    pub fn progress(&self) -> Progress {
        self.data.as_ref().map(progress).unwrap_or_default()
    }

    /// The day with one-based `day_number`.
    pub fn day(&self, day_number: u32) -> Option<&DayPlan> {
        let index = (day_number as usize).checked_sub(1)?;
        self.data.as_ref()?.plan.day(index)
    }

    fn commit(&mut self, snapshot: AppData) -> &AppData {
        self.gateway.save(&snapshot);
        self.data.insert(snapshot)
    }
}
