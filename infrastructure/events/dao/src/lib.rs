use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dao_utils::query_helpers::{
    WhereClause, create_param_refs, first_row_or_not_found,
};
use database_traits::dao::GenericDao;
use events_errors::EventError;
use events_models::{Event, NewEvent};
use events_queries::ListEventsQuery;
use events_responses::EventResponse;
use sql_connection::{Migration, Row, SqlConnect};
use tracing::instrument;
use uuid::Uuid;

pub const MIGRATIONS: &[Migration] = &[Migration::new(
    "0001_create_events",
    include_str!("../migrations/0001_create_events.sql"),
)];

const SELECT_EVENTS: &str =
    "SELECT id, name, date, event_type, created_at FROM events";
const RETURNING: &str = "RETURNING id, name, date, event_type, created_at";

/// Store accessor for events, as seen by the handlers.
pub trait EventStore:
    GenericDao<
        Model = Event,
        Response = EventResponse,
        Filter = ListEventsQuery,
        CreateRequest = NewEvent,
        UpdateRequest = NewEvent,
        Error = EventError,
        ID = Uuid,
    > + Send
    + Sync
{
}

impl<T> EventStore for T where
    T: GenericDao<
            Model = Event,
            Response = EventResponse,
            Filter = ListEventsQuery,
            CreateRequest = NewEvent,
            UpdateRequest = NewEvent,
            Error = EventError,
            ID = Uuid,
        > + Send
        + Sync
{
}

pub type SharedEventStore = Arc<dyn EventStore>;

#[derive(Clone)]
pub struct EventDao {
    db: SqlConnect,
}

impl EventDao {
    pub fn new(db: SqlConnect) -> Self { Self { db } }

    pub fn db(&self) -> &SqlConnect { &self.db }

    fn map_row(&self, row: &Row) -> Event {
        Event {
            id: row.get(0),
            name: row.get(1),
            date: row.get(2),
            kind: row.get(3),
            created_at: row.get(4),
        }
    }
}

fn list_sql(filter: &ListEventsQuery) -> (String, Vec<String>) {
    WhereClause::new()
        .eq("date", filter.date.as_deref())
        .eq("event_type", filter.kind.as_deref())
        .build(SELECT_EVENTS, "ORDER BY created_at, id")
}

#[async_trait]
impl GenericDao for EventDao {
    type CreateRequest = NewEvent;
    type Error = EventError;
    type Filter = ListEventsQuery;
    type ID = Uuid;
    type Model = Event;
    type Response = EventResponse;
    type UpdateRequest = NewEvent;

    #[instrument(skip(self))]
    async fn find(
        &self, filter: &Self::Filter,
    ) -> Result<Vec<Self::Response>, Self::Error> {
        let client = self.db.get_client().await?;
        let (sql, params) = list_sql(filter);
        let rows = client
            .query(sql.as_str(), &create_param_refs(&params))
            .await?;

        Ok(rows.iter().map(|row| self.map_row(row).into()).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(
        &self, id: Self::ID,
    ) -> Result<Self::Response, Self::Error> {
        let client = self.db.get_client().await?;
        let rows = client
            .query(format!("{SELECT_EVENTS} WHERE id = $1").as_str(), &[&id])
            .await?;

        let event = first_row_or_not_found(
            &rows,
            |row| self.map_row(row),
            EventError::NotFound {
                event_id: id.to_string(),
            },
        )?;

        Ok(event.into())
    }

    #[instrument(skip(self))]
    async fn create(
        &self, req: Self::CreateRequest,
    ) -> Result<Self::Response, Self::Error> {
        let client = self.db.get_client().await?;
        let id = Uuid::now_v7();
        let created_at = Utc::now();

        let row = client
            .query_one(
                format!(
                    "INSERT INTO events (id, name, date, event_type, \
                     created_at) VALUES ($1, $2, $3, $4, $5) {RETURNING}"
                )
                .as_str(),
                &[&id, &req.name, &req.date, &req.kind, &created_at],
            )
            .await?;

        Ok(self.map_row(&row).into())
    }

    #[instrument(skip(self))]
    async fn update(
        &self, id: Self::ID, req: Self::UpdateRequest,
    ) -> Result<Self::Response, Self::Error> {
        let client = self.db.get_client().await?;
        let rows = client
            .query(
                format!(
                    "UPDATE events SET name = $1, date = $2, event_type = $3 \
                     WHERE id = $4 {RETURNING}"
                )
                .as_str(),
                &[&req.name, &req.date, &req.kind, &id],
            )
            .await?;

        let event = first_row_or_not_found(
            &rows,
            |row| self.map_row(row),
            EventError::NotFound {
                event_id: id.to_string(),
            },
        )?;

        Ok(event.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Self::ID) -> Result<(), Self::Error> {
        let client = self.db.get_client().await?;
        let deleted = client
            .execute("DELETE FROM events WHERE id = $1", &[&id])
            .await?;

        if deleted == 0 {
            return Err(EventError::NotFound {
                event_id: id.to_string(),
            });
        }

        Ok(())
    }
}
