//! SMS reminder message rendering for workflow steps.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use shared_types::{TimeFormat, WorkflowAction};

// Twilio recommends messages no longer than 320 characters
const SMS_RECOMMENDED_MAX: usize = 320;
// Twilio supports up to 1600 characters
const SMS_HARD_MAX: usize = 1600;

/// Render the SMS reminder text for a booking.
///
/// In editing mode every variable field is replaced by its placeholder
/// token, and the attendee/name roles flip depending on which party the
/// action notifies. Otherwise `start_time` is converted into the target
/// time zone and formatted.
///
/// Tries the full message first; if it exceeds the recommended SMS length
/// falls back to a shorter variant without the recipient's name; if even
/// that exceeds the hard limit, returns `None`. There is no error path
/// besides the absent result.
#[allow(clippy::too_many_arguments)]
pub fn sms_reminder_template(
    is_editing_mode: bool,
    action: WorkflowAction,
    time_format: TimeFormat,
    start_time: Option<DateTime<Utc>>,
    event_name: Option<&str>,
    time_zone: Option<&str>,
    attendee: &str,
    name: Option<&str>,
) -> Option<String> {
    let (event_name, time_zone, event_date, event_time, attendee, name) = if is_editing_mode {
        let (attendee, name) = match action {
            WorkflowAction::SmsAttendee => ("{ORGANIZER}", "{ATTENDEE}"),
            WorkflowAction::SmsOrganizer => ("{ATTENDEE}", "{ORGANIZER}"),
        };
        (
            "{EVENT_NAME}".to_string(),
            "{TIMEZONE}".to_string(),
            "{EVENT_DATE_YYYY MMM D}".to_string(),
            "{EVENT_TIME_h:mmA}".to_string(),
            attendee.to_string(),
            Some(name.to_string()),
        )
    } else {
        let tz: Tz = time_zone
            .and_then(|zone| zone.parse().ok())
            .unwrap_or(chrono_tz::UTC);
        let local = start_time.unwrap_or_else(Utc::now).with_timezone(&tz);

        (
            event_name.unwrap_or_default().to_string(),
            time_zone.unwrap_or_default().to_string(),
            local.format("%Y %b %-d").to_string(),
            local.format(time_format.as_chrono_format()).to_string(),
            attendee.to_string(),
            name.map(str::to_string),
        )
    };

    let greeting = match name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => format!(" {}", name),
        None => String::new(),
    };

    let full = format!(
        "Hi{}, this is a reminder that your meeting ({}) with {} is on {} at {} {}.",
        greeting, event_name, attendee, event_date, event_time, time_zone
    );
    if full.chars().count() <= SMS_RECOMMENDED_MAX {
        return Some(full);
    }

    let short = format!(
        "Hi, this is a reminder that your meeting with {} is on {} at {} {}",
        attendee, event_date, event_time, time_zone
    );
    if short.chars().count() <= SMS_HARD_MAX {
        return Some(short);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2026, 3, 2, 21, 30, 0).unwrap())
    }

    fn render(attendee: &str, name: Option<&str>) -> Option<String> {
        sms_reminder_template(
            false,
            WorkflowAction::SmsAttendee,
            TimeFormat::TwelveHour,
            start(),
            Some("Demo call"),
            Some("Europe/Rome"),
            attendee,
            name,
        )
    }

    #[test]
    fn renders_full_message_within_recommended_length() {
        let message = render("Alice Doe", Some("Pro")).unwrap();
        assert_eq!(
            message,
            "Hi Pro, this is a reminder that your meeting (Demo call) with Alice Doe \
             is on 2026 Mar 2 at 10:30PM Europe/Rome."
        );
    }

    #[test]
    fn omits_greeting_name_when_absent() {
        let message = render("Alice Doe", None).unwrap();
        assert!(message.starts_with("Hi, this is a reminder"));
    }

    #[test]
    fn twenty_four_hour_clock_is_respected() {
        let message = sms_reminder_template(
            false,
            WorkflowAction::SmsAttendee,
            TimeFormat::TwentyFourHour,
            start(),
            Some("Demo call"),
            Some("Europe/Rome"),
            "Alice Doe",
            Some("Pro"),
        )
        .unwrap();
        assert!(message.contains("at 22:30 Europe/Rome"));
    }

    #[test]
    fn full_message_is_kept_up_to_exactly_the_recommended_length() {
        let base_len = render("Alice Doe", Some("X")).unwrap().chars().count();
        let padding = SMS_RECOMMENDED_MAX - base_len;
        let name = format!("X{}", "y".repeat(padding));

        let message = render("Alice Doe", Some(&name)).unwrap();
        assert_eq!(message.chars().count(), SMS_RECOMMENDED_MAX);
        assert!(message.contains(&name));
    }

    #[test]
    fn over_recommended_length_falls_back_to_short_variant() {
        let base_len = render("Alice Doe", Some("X")).unwrap().chars().count();
        let name = format!("X{}", "y".repeat(SMS_RECOMMENDED_MAX - base_len + 1));

        let message = render("Alice Doe", Some(&name)).unwrap();
        assert_eq!(
            message,
            "Hi, this is a reminder that your meeting with Alice Doe \
             is on 2026 Mar 2 at 10:30PM Europe/Rome"
        );
        assert!(!message.contains(&name));
        assert!(!message.contains("(Demo call)"));
    }

    #[test]
    fn over_hard_limit_yields_nothing() {
        let attendee = "a".repeat(SMS_HARD_MAX + 1);
        assert_eq!(render(&attendee, Some("Pro")), None);
    }

    #[test]
    fn editing_mode_uses_placeholders_only() {
        let message = sms_reminder_template(
            true,
            WorkflowAction::SmsAttendee,
            TimeFormat::TwelveHour,
            start(),
            Some("Demo call"),
            Some("Europe/Rome"),
            "Alice Doe",
            Some("Pro"),
        )
        .unwrap();

        assert_eq!(
            message,
            "Hi {ATTENDEE}, this is a reminder that your meeting ({EVENT_NAME}) \
             with {ORGANIZER} is on {EVENT_DATE_YYYY MMM D} at {EVENT_TIME_h:mmA} {TIMEZONE}."
        );
        assert!(!message.contains("Alice Doe"));
        assert!(!message.contains("Pro"));
        assert!(!message.contains("Demo call"));
    }

    #[test]
    fn editing_mode_flips_roles_for_organizer_actions() {
        let message = sms_reminder_template(
            true,
            WorkflowAction::SmsOrganizer,
            TimeFormat::TwelveHour,
            None,
            None,
            None,
            "",
            None,
        )
        .unwrap();

        assert!(message.starts_with("Hi {ORGANIZER},"));
        assert!(message.contains("with {ATTENDEE}"));
    }

    #[test]
    fn unknown_time_zone_falls_back_to_utc() {
        let message = sms_reminder_template(
            false,
            WorkflowAction::SmsAttendee,
            TimeFormat::TwelveHour,
            start(),
            Some("Demo call"),
            Some("Not/AZone"),
            "Alice Doe",
            None,
        )
        .unwrap();
        assert!(message.contains("at 9:30PM Not/AZone"));
    }
}
