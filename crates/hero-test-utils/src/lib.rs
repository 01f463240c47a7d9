//! Shared test fixtures for holiday-hero integration tests.
//!
//! Provides a sample profile, a well-formed 15-day plan stub, the raw AI
//! response it would come from, and slot backends that fail on demand.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use hero_db::models::{AppData, DayPlan, EducationLevel, ImageRef, Profile, Task, TaskType};
use hero_db::plan::{PLAN_DAYS, Plan};
use hero_db::slot::{FileSlot, SlotBackend};
use hero_db::PersistenceGateway;

/// Profile used by the reference scenarios: Sara, 9, primary, learning English.
pub fn sample_profile() -> Profile {
    Profile::new("Sara", 9, EducationLevel::Primary, ["English"]).expect("valid sample profile")
}

/// Fifteen well-formed days with placeholder titles.
pub fn stub_days() -> Vec<DayPlan> {
    (1..=PLAN_DAYS as u32)
        .map(|n| DayPlan {
            day_number: n,
            tasks: TaskType::ALL
                .iter()
                .map(|t| Task::new(n, *t, format!("{t} day {n}"), format!("Do the {t} activity")))
                .collect(),
        })
        .collect()
}

/// [`stub_days`] as a validated [`Plan`].
pub fn stub_plan() -> Plan {
    Plan::try_from(stub_days()).expect("stub plan is well formed")
}

/// The raw generated-plan JSON (array of day objects) that parses into a
/// plan equivalent to [`stub_plan`] when `days` is 15.
pub fn stub_plan_response_json(days: u32) -> String {
    let slot = |kind: &str, n: u32| {
        serde_json::json!({
            "title": format!("{kind} day {n}"),
            "description": format!("Do the {kind} activity"),
        })
    };
    let days: Vec<_> = (1..=days)
        .map(|n| {
            serde_json::json!({
                "dayNumber": n,
                "morningTask": slot("quran_morning", n),
                "afternoonTask": slot("language", n),
                "eveningTask": slot("quran_evening", n),
                "funTask": slot("fun", n),
            })
        })
        .collect();
    serde_json::Value::Array(days).to_string()
}

/// A tiny inline image.
pub fn sample_image(tag: u8) -> ImageRef {
    ImageRef::from_bytes("image/png", &[0x89, b'P', b'N', b'G', tag])
}

/// A fixed timestamp so snapshots compare equal across runs.
pub fn fixed_start_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// A complete snapshot built from the fixtures above.
pub fn sample_snapshot() -> AppData {
    AppData {
        profile: Some(sample_profile()),
        plan: stub_plan(),
        start_date: fixed_start_date(),
        generated_images: vec![sample_image(1), sample_image(2)],
    }
}

/// A gateway writing into a fresh temporary directory.
///
/// Keep the returned [`TempDir`] alive for as long as the gateway is used.
pub fn temp_gateway() -> (PersistenceGateway, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let gateway = PersistenceGateway::new(FileSlot::new(dir.path()));
    (gateway, dir)
}

// ---------------------------------------------------------------------------
// Failing backend
// ---------------------------------------------------------------------------

/// Shared switches and counters for a [`FlakySlot`].
#[derive(Debug, Default)]
pub struct FlakyControls {
    pub fail_writes: AtomicBool,
    pub fail_reads: AtomicBool,
    pub fail_removes: AtomicBool,
    pub writes_attempted: AtomicUsize,
}

/// An in-memory slot whose operations can be made to fail, e.g. to simulate
/// an exceeded storage quota.
#[derive(Debug, Default, Clone)]
pub struct FlakySlot {
    pub controls: Arc<FlakyControls>,
    entries: Arc<Mutex<Option<String>>>,
}

impl FlakySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that rejects every write.
    pub fn failing_writes() -> Self {
        let slot = Self::new();
        slot.controls.fail_writes.store(true, Ordering::SeqCst);
        slot
    }

    /// A slot whose stored text is `contents`, regardless of key.
    pub fn with_contents(contents: &str) -> Self {
        let slot = Self::new();
        *slot.entries.lock().expect("fresh mutex") = Some(contents.to_owned());
        slot
    }

    pub fn writes_attempted(&self) -> usize {
        self.controls.writes_attempted.load(Ordering::SeqCst)
    }

    /// The last successfully written text.
    pub fn contents(&self) -> Option<String> {
        self.entries.lock().ok().and_then(|e| e.clone())
    }
}

impl SlotBackend for FlakySlot {
    fn read(&self, _key: &str) -> io::Result<Option<String>> {
        if self.controls.fail_reads.load(Ordering::SeqCst) {
            return Err(io::Error::other("simulated read failure"));
        }
        Ok(self.contents())
    }

    fn write(&self, _key: &str, value: &str) -> io::Result<()> {
        self.controls.writes_attempted.fetch_add(1, Ordering::SeqCst);
        if self.controls.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::other("simulated quota exceeded"));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::other("poisoned"))?;
        *entries = Some(value.to_owned());
        Ok(())
    }

    fn remove(&self, _key: &str) -> io::Result<()> {
        if self.controls.fail_removes.load(Ordering::SeqCst) {
            return Err(io::Error::other("simulated remove failure"));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::other("poisoned"))?;
        *entries = None;
        Ok(())
    }
}
