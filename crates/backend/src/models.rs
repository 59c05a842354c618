// Database models for Diesel
use diesel::prelude::*;
use shared_types::{Availability, ScheduleResponse};

/// Database representation of a schedule row, without its availability
/// entries (those live in the `availability` table).
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScheduleRow {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub time_zone: Option<String>,
}

impl ScheduleRow {
    /// Assemble the API shape, attaching availability and the default flag.
    pub fn into_response(self, availability: Vec<Availability>, is_default: bool) -> ScheduleResponse {
        ScheduleResponse {
            id: self.id,
            name: self.name,
            availability,
            time_zone: self.time_zone,
            is_default,
        }
    }
}
