use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Availability row matching database column order exactly.
///
/// `days` holds weekday numbers 0 (Sunday) through 6 (Saturday);
/// `start_time`/`end_time` are times of day, there is no date component
/// in the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "diesel", derive(diesel::Queryable))]
pub struct Availability {
    pub id: i32,
    pub schedule_id: i32,
    pub days: Vec<i32>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// A schedule as returned by the availability list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub id: i32,
    pub name: String,
    pub availability: Vec<Availability>,
    pub time_zone: Option<String>,
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleListResponse {
    pub schedules: Vec<ScheduleResponse>,
}

/// A concrete start/end window on the current UTC date, produced by
/// expanding availability rows into per-weekday slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Fixed weekly structure, one slot per weekday, Sunday first.
pub type WeekAvailability = [Vec<TimeRange>; 7];

/// Which party an SMS workflow step notifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowAction {
    SmsAttendee,
    SmsOrganizer,
}

/// Clock style used when rendering event times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeFormat {
    TwelveHour,
    TwentyFourHour,
}

impl TimeFormat {
    /// chrono format string for this clock style ("h:mmA" / "HH:mm").
    pub fn as_chrono_format(&self) -> &'static str {
        match self {
            TimeFormat::TwelveHour => "%-I:%M%p",
            TimeFormat::TwentyFourHour => "%H:%M",
        }
    }
}

impl Default for TimeFormat {
    fn default() -> Self {
        TimeFormat::TwelveHour
    }
}

// API request/response types for the schedule endpoints

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDefaultScheduleRequest {
    pub schedule_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultScheduleResponse {
    pub id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasDefaultScheduleResponse {
    pub has_default_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsReminderPreviewRequest {
    #[serde(default)]
    pub is_editing_mode: bool,
    pub action: WorkflowAction,
    #[serde(default)]
    pub time_format: TimeFormat,
    pub start_time: Option<DateTime<Utc>>,
    pub event_name: Option<String>,
    pub time_zone: Option<String>,
    pub attendee: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsReminderPreviewResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn schedule_response_uses_camel_case_on_the_wire() {
        let response = ScheduleResponse {
            id: 12,
            name: "Working Hours".to_string(),
            availability: vec![Availability {
                id: 1,
                schedule_id: 12,
                days: vec![1, 2, 3],
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            }],
            time_zone: Some("Europe/London".to_string()),
            is_default: true,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["timeZone"], "Europe/London");
        assert_eq!(json["isDefault"], true);
        assert_eq!(json["availability"][0]["startTime"], "09:00:00");
    }

    #[test]
    fn workflow_action_round_trips_its_wire_names() {
        let json = serde_json::to_string(&WorkflowAction::SmsAttendee).unwrap();
        assert_eq!(json, "\"SMS_ATTENDEE\"");

        let parsed: WorkflowAction = serde_json::from_str("\"SMS_ORGANIZER\"").unwrap();
        assert_eq!(parsed, WorkflowAction::SmsOrganizer);
    }
}
