//! Shared setup for scheduler unit tests.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use crate::db::connection::open_in_memory;
use crate::db::task_repo::{self, TaskRecord};
use crate::db::{new_id, pattern_repo};
use crate::location::ensure_default_states;
use crate::models::{IntervalType, PatternSettings, RecurrenceType, RecurringPattern, Task};

pub const LOC: i64 = 1;

pub fn setup() -> Connection {
    let conn = open_in_memory().unwrap();
    ensure_default_states(&conn, LOC).unwrap();
    conn
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

pub fn add_pattern(conn: &Connection, name: &str, interval_type: IntervalType, days: u32) -> RecurringPattern {
    let settings = PatternSettings {
        name: name.to_string(),
        interval_type,
        interval_days: days,
        lead_time_days: 0,
        enabled: true,
    };
    let id = pattern_repo::upsert_pattern(conn, LOC, &settings).unwrap();
    pattern_repo::get_pattern_by_id(conn, &id).unwrap()
}

pub fn add_task(
    conn: &Connection,
    name: &str,
    recurrence_type: RecurrenceType,
    pattern: Option<&RecurringPattern>,
) -> Task {
    let record = TaskRecord {
        name: name.to_string(),
        description: None,
        recurrence_type,
        pattern_id: pattern.map(|p| p.id.clone()),
        department_id: None,
        area_id: None,
        checklist_items: vec!["Empty".into(), "Sanitise".into(), "Refill".into()],
        reference_photos: vec![],
        require_completion_photo: false,
        completion_reminder: None,
        is_active: true,
    };
    task_repo::create_task(conn, &new_id(), LOC, &record, Some("tester")).unwrap()
}
