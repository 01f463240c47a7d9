//! Data model and durable storage for holiday-hero.
//!
//! - [`models`]: profile, tasks, day plans and the persisted [`models::AppData`] snapshot.
//! - [`plan`]: the validated 15-day [`plan::Plan`] and its shape rules.
//! - [`slot`]: key-value backends that hold the serialized snapshot.
//! - [`gateway`]: the fail-soft persistence gateway over a slot backend.
//! - [`config`]: where the file-backed slot lives.

pub mod config;
pub mod gateway;
pub mod models;
pub mod plan;
pub mod slot;

pub use gateway::{PersistenceGateway, STORAGE_KEY, StorageError};
pub use models::{AppData, DayPlan, EducationLevel, ImageRef, Profile, Task, TaskType};
pub use plan::{Plan, PlanShapeError};
