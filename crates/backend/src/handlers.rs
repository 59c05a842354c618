use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
};
use shared_types::{
    DefaultScheduleResponse, HasDefaultScheduleResponse, ScheduleListResponse,
    SetDefaultScheduleRequest, SmsReminderPreviewRequest, SmsReminderPreviewResponse,
};

use crate::availability;
use crate::db::{self, DbPool};
use crate::error::{ApiError, ApiResult};
use crate::reminders;

// Schedule handlers

pub async fn list_schedules(
    State(pool): State<DbPool>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<ScheduleListResponse>> {
    let mut conn = pool.get().await?;

    let schedules = availability::list_schedules(&mut conn, user_id).await?;

    Ok(Json(schedules))
}

pub async fn get_default_schedule(
    State(pool): State<DbPool>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<DefaultScheduleResponse>> {
    let mut conn = pool.get().await?;

    let id = availability::get_default_schedule_id(&mut conn, user_id).await?;

    Ok(Json(DefaultScheduleResponse { id }))
}

pub async fn has_default_schedule(
    State(pool): State<DbPool>,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<HasDefaultScheduleResponse>> {
    let mut conn = pool.get().await?;

    let has_default_schedule = availability::has_default_schedule(&mut conn, user_id).await?;

    Ok(Json(HasDefaultScheduleResponse {
        has_default_schedule,
    }))
}

pub async fn set_default_schedule(
    State(pool): State<DbPool>,
    Path(user_id): Path<i32>,
    Json(payload): Json<SetDefaultScheduleRequest>,
) -> ApiResult<StatusCode> {
    let mut conn = pool.get().await?;

    // The default must be one of the user's own schedules or one inherited
    // through a team
    let owned = db::schedules::is_owned_by(&mut conn, payload.schedule_id, user_id).await?;
    if !owned && !availability::is_team_schedule(&mut conn, user_id, payload.schedule_id).await? {
        return Err(ApiError::bad_request(
            "Schedule does not belong to the user or their teams",
        ));
    }

    availability::setup_default_schedule(&mut conn, user_id, payload.schedule_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

// Workflow template handlers

pub async fn preview_sms_reminder(
    Json(payload): Json<SmsReminderPreviewRequest>,
) -> ApiResult<Json<SmsReminderPreviewResponse>> {
    let message = reminders::sms_reminder_template(
        payload.is_editing_mode,
        payload.action,
        payload.time_format,
        payload.start_time,
        payload.event_name.as_deref(),
        payload.time_zone.as_deref(),
        payload.attendee.as_deref().unwrap_or_default(),
        payload.name.as_deref(),
    )
    .ok_or_else(|| ApiError::unprocessable("Rendered message exceeds the SMS length limit"))?;

    Ok(Json(SmsReminderPreviewResponse { message }))
}
