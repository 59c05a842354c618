use diesel::prelude::*;
use diesel_async::{
    pooled_connection::{deadpool::Pool, AsyncDieselConnectionManager, ManagerConfig},
    AsyncPgConnection, RunQueryDsl,
};
use shared_types::Availability;

use crate::models::ScheduleRow;

pub type DbPool = Pool<AsyncPgConnection>;

async fn establish_tls_connection(config: String) -> diesel::ConnectionResult<AsyncPgConnection> {
    // Set up rustls TLS configuration
    let root_store =
        rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);

    let (client, connection) = tokio_postgres::connect(&config, tls)
        .await
        .map_err(|e| diesel::ConnectionError::BadConnection(e.to_string()))?;

    // Spawn the connection task
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            tracing::error!("Connection error: {}", e);
        }
    });

    // Build the async connection from the tokio-postgres client
    AsyncPgConnection::try_from(client).await
}

pub fn establish_connection_pool() -> anyhow::Result<DbPool> {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let mut manager_config = ManagerConfig::default();
    manager_config.custom_setup =
        Box::new(|url| Box::pin(establish_tls_connection(url.to_string())));

    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(
        database_url,
        manager_config,
    );
    let pool = Pool::builder(config).build()?;

    Ok(pool)
}

// User database operations
pub mod users {
    use super::*;

    /// Read the stored default schedule reference, if any. Returns `None`
    /// both when the user row is missing and when the column is NULL.
    pub async fn default_schedule_ref(
        conn: &mut AsyncPgConnection,
        user_id: i32,
    ) -> anyhow::Result<Option<i32>> {
        use crate::schema::users::dsl::*;

        let stored: Option<Option<i32>> = users
            .filter(id.eq(user_id))
            .select(default_schedule_id)
            .first(conn)
            .await
            .optional()?;

        Ok(stored.flatten())
    }

    pub async fn set_default_schedule(
        conn: &mut AsyncPgConnection,
        user_id: i32,
        schedule_id: i32,
    ) -> anyhow::Result<()> {
        use crate::schema::users::dsl::*;

        diesel::update(users.filter(id.eq(user_id)))
            .set(default_schedule_id.eq(Some(schedule_id)))
            .execute(conn)
            .await?;

        Ok(())
    }
}

// Schedule database operations
pub mod schedules {
    use super::*;

    /// All schedules owned by the user, ordered by id ascending, each with
    /// its availability rows.
    pub async fn list_for_user(
        conn: &mut AsyncPgConnection,
        owner_id: i32,
    ) -> anyhow::Result<Vec<(ScheduleRow, Vec<Availability>)>> {
        use crate::schema::schedules::dsl::*;

        let rows = schedules
            .filter(user_id.eq(owner_id))
            .order_by(id.asc())
            .load::<ScheduleRow>(conn)
            .await?;

        attach_availability(conn, rows).await
    }

    /// Id of the user's first schedule in store order, if any.
    pub async fn first_for_user(
        conn: &mut AsyncPgConnection,
        owner_id: i32,
    ) -> anyhow::Result<Option<i32>> {
        use crate::schema::schedules::dsl::*;

        let first = schedules
            .filter(user_id.eq(owner_id))
            .select(id)
            .first::<i32>(conn)
            .await
            .optional()?;

        Ok(first)
    }

    pub async fn is_owned_by(
        conn: &mut AsyncPgConnection,
        schedule_id: i32,
        owner_id: i32,
    ) -> anyhow::Result<bool> {
        use crate::schema::schedules::dsl::*;

        let found = schedules
            .filter(id.eq(schedule_id))
            .filter(user_id.eq(owner_id))
            .select(id)
            .first::<i32>(conn)
            .await
            .optional()?;

        Ok(found.is_some())
    }

    pub async fn get_by_ids(
        conn: &mut AsyncPgConnection,
        schedule_ids: &[i32],
    ) -> anyhow::Result<Vec<(ScheduleRow, Vec<Availability>)>> {
        use crate::schema::schedules::dsl::*;

        let rows = schedules
            .filter(id.eq_any(schedule_ids))
            .load::<ScheduleRow>(conn)
            .await?;

        attach_availability(conn, rows).await
    }

    async fn attach_availability(
        conn: &mut AsyncPgConnection,
        rows: Vec<ScheduleRow>,
    ) -> anyhow::Result<Vec<(ScheduleRow, Vec<Availability>)>> {
        use crate::schema::availability::dsl as avail;

        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let entries = avail::availability
            .filter(avail::schedule_id.eq_any(&ids))
            .order_by(avail::id.asc())
            .load::<Availability>(conn)
            .await?;

        let mut grouped: Vec<(ScheduleRow, Vec<Availability>)> =
            rows.into_iter().map(|row| (row, Vec::new())).collect();
        for entry in entries {
            if let Some((_, list)) = grouped.iter_mut().find(|(row, _)| row.id == entry.schedule_id)
            {
                list.push(entry);
            }
        }

        Ok(grouped)
    }
}

// Membership database operations
pub mod memberships {
    use super::*;

    /// Schedule ids reachable through the user's team memberships: for each
    /// team the user belongs to, the schedule configured on the team's first
    /// event type. A team event type links to exactly one schedule.
    pub async fn team_schedule_ids_for_user(
        conn: &mut AsyncPgConnection,
        member_id: i32,
    ) -> anyhow::Result<Vec<i32>> {
        use crate::schema::event_types::dsl as et;
        use crate::schema::memberships::dsl as m;

        let team_ids: Vec<i32> = m::memberships
            .filter(m::user_id.eq(member_id))
            .select(m::team_id)
            .load::<i32>(conn)
            .await?;

        if team_ids.is_empty() {
            return Ok(Vec::new());
        }

        let wrapped: Vec<Option<i32>> = team_ids.iter().map(|t| Some(*t)).collect();
        let event_rows: Vec<(Option<i32>, Option<i32>)> = et::event_types
            .filter(et::team_id.eq_any(wrapped))
            .order_by(et::id.asc())
            .select((et::team_id, et::schedule_id))
            .load(conn)
            .await?;

        // Keep only the first event type per team
        let mut seen_teams = Vec::new();
        let mut schedule_ids = Vec::new();
        for (team, schedule) in event_rows {
            let Some(team) = team else { continue };
            if seen_teams.contains(&team) {
                continue;
            }
            seen_teams.push(team);
            if let Some(schedule) = schedule {
                schedule_ids.push(schedule);
            }
        }

        Ok(schedule_ids)
    }
}
