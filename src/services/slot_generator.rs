use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde_json::json;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::availability::CoachAvailability;
use crate::models::recommendation::{SlotAvailability, TimeSlot};
use crate::models::session::ExistingSession;
use crate::services::schedule_utils;

/// Enumerates candidate slots over `[range_start, range_end]`, one lattice per
/// calendar day in the coach's time zone. A day contributes candidates only
/// when its weekday template is available and the date is not blacked out;
/// every emitted slot spans exactly `duration_minutes` and closes no later
/// than the weekday's end time. Empty or inverted ranges yield an empty list.
pub fn generate_slots(
    availability: &CoachAvailability,
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    duration_minutes: i64,
    granularity_minutes: i64,
) -> AppResult<Vec<TimeSlot>> {
    if duration_minutes <= 0 {
        return Err(AppError::validation_with_details(
            "slot duration must be positive",
            json!({"durationMinutes": duration_minutes}),
        ));
    }
    if granularity_minutes <= 0 {
        return Err(AppError::validation_with_details(
            "slot granularity must be positive",
            json!({"granularityMinutes": granularity_minutes}),
        ));
    }

    let tz = availability.tz();
    let first_day = range_start.with_timezone(&tz).date_naive();
    let last_day = range_end.with_timezone(&tz).date_naive();

    let mut slots = Vec::new();
    let mut day = first_day;
    while day <= last_day {
        if availability.is_blackout(day) {
            day += Duration::days(1);
            continue;
        }

        let hours = match availability.hours_for(day.weekday()) {
            Some(entry) if entry.available => entry,
            _ => {
                day += Duration::days(1);
                continue;
            }
        };

        let open = minutes_of(schedule_utils::parse_time_of_day(&hours.start)?);
        let close = minutes_of(schedule_utils::parse_time_of_day(&hours.end)?);
        if close <= open {
            return Err(AppError::validation_with_details(
                "working hours end before they start",
                json!({"coachId": availability.coach_id, "date": day.to_string()}),
            ));
        }

        let mut cursor = open;
        while cursor + duration_minutes <= close {
            if let Some(start) = local_instant(tz, day, cursor) {
                let end = start + Duration::minutes(duration_minutes);
                slots.push(TimeSlot {
                    start_at: start.to_rfc3339(),
                    end_at: end.to_rfc3339(),
                    availability: SlotAvailability::Available,
                    coach_id: availability.coach_id.clone(),
                    conflict_reason: None,
                });
            }
            cursor += granularity_minutes;
        }

        day += Duration::days(1);
    }

    debug!(
        target: "app::scheduling",
        coach_id = %availability.coach_id,
        candidates = slots.len(),
        "generated candidate slots"
    );

    Ok(slots)
}

/// Marks every candidate that strictly intersects an existing session as busy,
/// carrying a reason identifying the collision. Pure in its two inputs.
pub fn detect_conflicts(
    slots: Vec<TimeSlot>,
    sessions: &[ExistingSession],
) -> AppResult<Vec<TimeSlot>> {
    let parsed: Vec<(DateTime<FixedOffset>, DateTime<FixedOffset>, String)> = sessions
        .iter()
        .map(|session| {
            let start = schedule_utils::parse_datetime(&session.scheduled_start_at)?;
            let end = schedule_utils::parse_datetime(&session.scheduled_end_at)?;
            schedule_utils::ensure_window(start, end)?;
            let label = session
                .id
                .clone()
                .unwrap_or_else(|| format!("{} - {}", session.scheduled_start_at, session.scheduled_end_at));
            Ok((start, end, label))
        })
        .collect::<AppResult<Vec<_>>>()?;

    let mut tagged = Vec::with_capacity(slots.len());
    for mut slot in slots {
        let slot_start = schedule_utils::parse_datetime(&slot.start_at)?;
        let slot_end = schedule_utils::parse_datetime(&slot.end_at)?;

        for (session_start, session_end, label) in &parsed {
            if schedule_utils::overlaps(slot_start, slot_end, *session_start, *session_end)? {
                slot.availability = SlotAvailability::Busy;
                slot.conflict_reason = Some(format!("Conflicts with existing session {label}"));
                break;
            }
        }

        tagged.push(slot);
    }

    Ok(tagged)
}

fn minutes_of(time: NaiveTime) -> i64 {
    (time.hour() as i64) * 60 + (time.minute() as i64)
}

/// Resolves a local wall-clock candidate to an instant. Ambiguous local times
/// (DST fall-back) take the earliest mapping; skipped local times (DST
/// spring-forward) produce no candidate.
fn local_instant(tz: Tz, day: chrono::NaiveDate, minutes: i64) -> Option<DateTime<FixedOffset>> {
    let time = NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0)?;
    tz.from_local_datetime(&day.and_time(time))
        .earliest()
        .map(|dt| dt.fixed_offset())
}
