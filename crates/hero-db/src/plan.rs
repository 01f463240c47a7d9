//! The validated 15-day plan.
//!
//! A [`Plan`] can only be built through [`Plan::try_from`], which checks:
//! - exactly [`PLAN_DAYS`] days, numbered `1..=15` in order;
//! - exactly [`TASKS_PER_DAY`] tasks per day, one of each [`TaskType`] in daily order;
//! - task ids unique across the whole plan.
//!
//! Deserialization goes through the same check, so a stored snapshot whose
//! plan is out of shape fails to load.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{DayPlan, TaskType};

pub const PLAN_DAYS: usize = 15;
pub const TASKS_PER_DAY: usize = TaskType::ALL.len();
pub const TOTAL_TASKS: usize = PLAN_DAYS * TASKS_PER_DAY;

/// Shape violations detected while validating a plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanShapeError {
    #[error("plan must have exactly {} days, got {}", PLAN_DAYS, .0)]
    DayCount(usize),

    #[error("day at position {position} is numbered {day_number} (expected {})", .position + 1)]
    DayOutOfOrder { position: usize, day_number: u32 },

    #[error("day {day_number} must have exactly {} tasks, got {actual}", TASKS_PER_DAY)]
    TaskCount { day_number: u32, actual: usize },

    #[error("day {day_number} slot {position} has type {actual} (expected {expected})")]
    TaskTypeOutOfOrder {
        day_number: u32,
        position: usize,
        expected: TaskType,
        actual: TaskType,
    },

    #[error("duplicate task id: {0:?}")]
    DuplicateTaskId(String),
}

/// Fifteen days of four typed tasks each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<DayPlan>", into = "Vec<DayPlan>")]
pub struct Plan(Vec<DayPlan>);

impl Plan {
    pub fn days(&self) -> &[DayPlan] {
        &self.0
    }

    /// The day at zero-based `index`.
    pub fn day(&self, index: usize) -> Option<&DayPlan> {
        self.0.get(index)
    }

    pub fn total_tasks(&self) -> usize {
        self.0.iter().map(|d| d.tasks.len()).sum()
    }

    pub fn completed_tasks(&self) -> usize {
        self.0.iter().map(DayPlan::completed_count).sum()
    }

    /// Set the completion flag of `task_id` on the day at `day_index`.
    ///
    /// Returns the previous flag, or `None` when the reference does not
    /// resolve. This is the only mutation a plan allows.
    pub fn set_task_completion(
        &mut self,
        day_index: usize,
        task_id: &str,
        completed: bool,
    ) -> Option<bool> {
        let task = self
            .0
            .get_mut(day_index)?
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)?;
        Some(std::mem::replace(&mut task.is_completed, completed))
    }

    pub fn into_days(self) -> Vec<DayPlan> {
        self.0
    }
}

impl TryFrom<Vec<DayPlan>> for Plan {
    type Error = PlanShapeError;

    fn try_from(days: Vec<DayPlan>) -> Result<Self, Self::Error> {
        validate(&days)?;
        Ok(Self(days))
    }
}

impl From<Plan> for Vec<DayPlan> {
    fn from(plan: Plan) -> Self {
        plan.0
    }
}

fn validate(days: &[DayPlan]) -> Result<(), PlanShapeError> {
    if days.len() != PLAN_DAYS {
        return Err(PlanShapeError::DayCount(days.len()));
    }

    let mut seen_ids = HashSet::new();
    for (position, day) in days.iter().enumerate() {
        if day.day_number as usize != position + 1 {
            return Err(PlanShapeError::DayOutOfOrder {
                position,
                day_number: day.day_number,
            });
        }

        if day.tasks.len() != TASKS_PER_DAY {
            return Err(PlanShapeError::TaskCount {
                day_number: day.day_number,
                actual: day.tasks.len(),
            });
        }

        for (slot, (task, expected)) in day.tasks.iter().zip(TaskType::ALL).enumerate() {
            if task.task_type != expected {
                return Err(PlanShapeError::TaskTypeOutOfOrder {
                    day_number: day.day_number,
                    position: slot,
                    expected,
                    actual: task.task_type,
                });
            }
            if !seen_ids.insert(task.id.as_str()) {
                return Err(PlanShapeError::DuplicateTaskId(task.id.clone()));
            }
        }
    }

    Ok(())
}
