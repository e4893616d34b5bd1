//! Millisecond-based identifiers.
//!
//! Feeds, approvals, scheduler plans and comments are keyed by the creation
//! time in milliseconds, which the browser also uses to display when a feed
//! was saved. Two requests landing in the same millisecond must still get
//! distinct ids, so the generator never hands out a value twice.

use chrono::{SecondsFormat, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// ISO-8601 UTC timestamp with millisecond precision (`2024-05-01T10:20:30.123Z`).
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time in millis, bumped past the last issued id when needed.
pub fn next_id() -> i64 {
    let now = now_millis();
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = if now > last { now } else { last + 1 };
        match LAST_ID.compare_exchange_weak(last, candidate, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}
