//! Availability schedule queries: a user's own schedules, schedules
//! inherited through team memberships, and the default-schedule reference.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use diesel_async::AsyncPgConnection;
use shared_types::{Availability, ScheduleListResponse, TimeRange, WeekAvailability};

use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::models::ScheduleRow;

/// All schedules visible to the user: owned ones (id ascending) followed by
/// team-inherited ones, deduplicated by schedule id, each annotated with
/// whether it is the user's default.
///
/// When the user record has no stored default yet, the resolved default is
/// persisted here. The read and the write are separate statements; a
/// concurrent call may also write, but both resolve the same id, so
/// last-write-wins is harmless.
pub async fn list_schedules(
    conn: &mut AsyncPgConnection,
    user_id: i32,
) -> ApiResult<ScheduleListResponse> {
    let owned = db::schedules::list_for_user(conn, user_id).await?;
    let team = get_team_schedules(conn, user_id).await?;
    let merged = merge_unique(owned, team);

    let stored = db::users::default_schedule_ref(conn, user_id).await?;
    let default_id = get_default_schedule_id(conn, user_id).await?;
    if stored.is_none() {
        db::users::set_default_schedule(conn, user_id, default_id).await?;
    }

    let schedules = merged
        .into_iter()
        .map(|(row, availability)| {
            let is_default = row.id == default_id;
            row.into_response(availability, is_default)
        })
        .collect();

    Ok(ScheduleListResponse { schedules })
}

/// The user's default schedule id: the stored reference when present,
/// otherwise the user's first schedule in store order. Fails with NotFound
/// when the user owns no schedule at all; callers must not swallow that.
pub async fn get_default_schedule_id(
    conn: &mut AsyncPgConnection,
    user_id: i32,
) -> ApiResult<i32> {
    let stored = db::users::default_schedule_ref(conn, user_id).await?;
    let first = if stored.is_none() {
        db::schedules::first_for_user(conn, user_id).await?
    } else {
        None
    };

    resolve_default(stored, first).ok_or_else(|| ApiError::not_found("Schedule for user"))
}

/// Whether the user has a stored default or owns at least one schedule.
pub async fn has_default_schedule(
    conn: &mut AsyncPgConnection,
    user_id: i32,
) -> ApiResult<bool> {
    let stored = db::users::default_schedule_ref(conn, user_id).await?;
    if stored.is_some() {
        return Ok(true);
    }

    Ok(db::schedules::first_for_user(conn, user_id).await?.is_some())
}

/// Unconditionally persist `schedule_id` as the user's default.
pub async fn setup_default_schedule(
    conn: &mut AsyncPgConnection,
    user_id: i32,
    schedule_id: i32,
) -> ApiResult<()> {
    db::users::set_default_schedule(conn, user_id, schedule_id).await?;
    Ok(())
}

/// Schedules inherited through the user's team memberships, with their
/// availability rows.
pub async fn get_team_schedules(
    conn: &mut AsyncPgConnection,
    user_id: i32,
) -> ApiResult<Vec<(ScheduleRow, Vec<Availability>)>> {
    let ids = db::memberships::team_schedule_ids_for_user(conn, user_id).await?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    Ok(db::schedules::get_by_ids(conn, &ids).await?)
}

/// Whether `schedule_id` matches any of the user's team-derived schedules.
pub async fn is_team_schedule(
    conn: &mut AsyncPgConnection,
    user_id: i32,
    schedule_id: i32,
) -> ApiResult<bool> {
    let ids = db::memberships::team_schedule_ids_for_user(conn, user_id).await?;
    Ok(ids.contains(&schedule_id))
}

/// Expand flat availability rows into the fixed Sunday→Saturday weekly
/// structure, normalizing start/end onto the current UTC calendar date.
pub fn convert_schedule_to_availability(rows: &[Availability]) -> WeekAvailability {
    convert_on(Utc::now().date_naive(), rows)
}

fn convert_on(date: NaiveDate, rows: &[Availability]) -> WeekAvailability {
    let mut week = WeekAvailability::default();
    for row in rows {
        for &day in &row.days {
            // weekday numbers outside 0..=6 are ignored
            if !(0..7).contains(&day) {
                continue;
            }
            week[day as usize].push(TimeRange {
                start: at_minute(date, row.start_time),
                end: at_minute(date, row.end_time),
            });
        }
    }
    week
}

/// Place a time of day on `date` in UTC, keeping only hour and minute.
fn at_minute(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
        + Duration::hours(i64::from(time.hour()))
        + Duration::minutes(i64::from(time.minute()))
}

/// Stored default wins; otherwise the user's first schedule, if any.
fn resolve_default(stored: Option<i32>, first_owned: Option<i32>) -> Option<i32> {
    stored.or(first_owned)
}

/// Append team schedules to the owned list, skipping any schedule id that
/// has already been seen. The creator of a team schedule has it among
/// their own schedules, so the team copy must not appear twice.
fn merge_unique(
    owned: Vec<(ScheduleRow, Vec<Availability>)>,
    team: Vec<(ScheduleRow, Vec<Availability>)>,
) -> Vec<(ScheduleRow, Vec<Availability>)> {
    let mut seen: Vec<i32> = owned.iter().map(|(row, _)| row.id).collect();
    let mut merged = owned;
    for entry in team {
        if seen.contains(&entry.0.id) {
            continue;
        }
        seen.push(entry.0.id);
        merged.push(entry);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(id: i32, user_id: i32) -> (ScheduleRow, Vec<Availability>) {
        (
            ScheduleRow {
                id,
                user_id,
                name: format!("Working Hours {}", id),
                time_zone: Some("Europe/London".to_string()),
            },
            Vec::new(),
        )
    }

    fn availability(days: Vec<i32>, start: (u32, u32, u32), end: (u32, u32, u32)) -> Availability {
        Availability {
            id: 1,
            schedule_id: 1,
            days,
            start_time: NaiveTime::from_hms_opt(start.0, start.1, start.2).unwrap(),
            end_time: NaiveTime::from_hms_opt(end.0, end.1, end.2).unwrap(),
        }
    }

    #[test]
    fn merge_skips_team_schedules_already_owned() {
        let owned = vec![schedule(1, 7), schedule(2, 7)];
        let team = vec![schedule(2, 7), schedule(9, 3)];

        let merged = merge_unique(owned, team);
        let ids: Vec<i32> = merged.iter().map(|(row, _)| row.id).collect();
        assert_eq!(ids, vec![1, 2, 9]);
    }

    #[test]
    fn merge_dedupes_schedules_shared_between_teams() {
        let owned = vec![schedule(1, 7)];
        let team = vec![schedule(9, 3), schedule(9, 3)];

        let merged = merge_unique(owned, team);
        let ids: Vec<i32> = merged.iter().map(|(row, _)| row.id).collect();
        assert_eq!(ids, vec![1, 9]);
    }

    #[test]
    fn stored_default_wins_over_first_schedule() {
        assert_eq!(resolve_default(Some(4), Some(1)), Some(4));
    }

    #[test]
    fn missing_default_falls_back_to_first_schedule() {
        assert_eq!(resolve_default(None, Some(1)), Some(1));
    }

    #[test]
    fn user_without_schedules_has_no_default() {
        assert_eq!(resolve_default(None, None), None);
        // the service maps this to a NotFound error
    }

    #[test]
    fn week_always_has_seven_slots_sunday_first() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let rows = vec![availability(vec![3, 1], (9, 0, 0), (17, 0, 0))];

        let week = convert_on(date, &rows);
        assert_eq!(week.len(), 7);
        assert!(week[0].is_empty());
        assert_eq!(week[1].len(), 1);
        assert!(week[2].is_empty());
        assert_eq!(week[3].len(), 1);
        assert_eq!(
            week[1][0].start,
            date.and_hms_opt(9, 0, 0).unwrap().and_utc()
        );
        assert_eq!(week[1][0].end, date.and_hms_opt(17, 0, 0).unwrap().and_utc());
    }

    #[test]
    fn slot_order_is_independent_of_input_grouping() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let forwards = vec![
            availability(vec![1], (9, 0, 0), (12, 0, 0)),
            availability(vec![5], (13, 0, 0), (18, 0, 0)),
        ];
        let backwards = vec![
            availability(vec![5], (13, 0, 0), (18, 0, 0)),
            availability(vec![1], (9, 0, 0), (12, 0, 0)),
        ];

        assert_eq!(convert_on(date, &forwards), convert_on(date, &backwards));
    }

    #[test]
    fn conversion_keeps_only_hour_and_minute() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let rows = vec![availability(vec![0], (8, 45, 59), (16, 15, 30))];

        let week = convert_on(date, &rows);
        assert_eq!(
            week[0][0].start,
            date.and_hms_opt(8, 45, 0).unwrap().and_utc()
        );
        assert_eq!(week[0][0].end, date.and_hms_opt(16, 15, 0).unwrap().and_utc());
    }

    #[test]
    fn out_of_range_weekdays_are_ignored() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let rows = vec![availability(vec![-1, 7, 2], (9, 0, 0), (17, 0, 0))];

        let week = convert_on(date, &rows);
        let filled: usize = week.iter().map(Vec::len).sum();
        assert_eq!(filled, 1);
        assert_eq!(week[2].len(), 1);
    }
}
