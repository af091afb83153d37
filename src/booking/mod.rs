//! Reservation interval arithmetic and conflict detection.
//!
//! A reservation claims the half-open interval `[start, start + duration)`
//! on one resource for one calendar day. Two reservations conflict when
//! their intervals intersect; touching endpoints do not intersect, so
//! back-to-back bookings are allowed.

use anyhow::{Context, Result};
use chrono::{NaiveTime, Timelike};

use crate::db::{DbPool, Reservation};

/// Half-open interval in minutes since midnight on the reservation's date.
///
/// Durations are rounded to whole minutes so adjacency comparisons are
/// exact integer arithmetic. An interval may extend past 24:00; it is still
/// attributed to its reservation's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    start: i64,
    end: i64,
}

impl Slot {
    pub fn new(start: NaiveTime, duration_hours: f64) -> Self {
        let start_min = (start.hour() * 60 + start.minute()) as i64;
        let length_min = (duration_hours * 60.0).round() as i64;
        Self {
            start: start_min,
            end: start_min + length_min,
        }
    }

    /// Build a slot from the stored `HH:MM` / fractional-hours form.
    pub fn parse(start_time: &str, duration_hours: f64) -> Result<Self> {
        let start = NaiveTime::parse_from_str(start_time, "%H:%M")
            .with_context(|| format!("Invalid start time: {}", start_time))?;
        Ok(Self::new(start, duration_hours))
    }

    /// Full interval intersection; touching endpoints are not an overlap.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Scan a resource's reservations on one date for an interval intersecting
/// the candidate. Callers must hold the (resource, date) booking lock so
/// the scan and the subsequent insert are atomic with respect to other
/// creation attempts for the same bucket.
pub async fn find_conflict(
    pool: &DbPool,
    resource_id: &str,
    date: &str,
    candidate: &Slot,
) -> Result<Option<Reservation>> {
    let existing: Vec<Reservation> =
        sqlx::query_as("SELECT * FROM reservations WHERE resource_id = ? AND date = ?")
            .bind(resource_id)
            .bind(date)
            .fetch_all(pool)
            .await
            .context("Failed to load reservations for conflict check")?;

    for reservation in existing {
        let slot = Slot::parse(&reservation.start_time, reservation.duration)?;
        if slot.overlaps(candidate) {
            return Ok(Some(reservation));
        }
    }

    Ok(None)
}
