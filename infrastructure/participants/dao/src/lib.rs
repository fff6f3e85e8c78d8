use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dao_utils::query_helpers::{
    WhereClause, create_param_refs, first_row_or_not_found,
};
use database_traits::dao::GenericDao;
use participants_errors::ParticipantError;
use participants_models::{NewParticipant, Participant};
use participants_queries::ListParticipantsQuery;
use participants_responses::ParticipantResponse;
use sql_connection::{Migration, Row, SqlConnect};
use tracing::instrument;
use uuid::Uuid;

pub const MIGRATIONS: &[Migration] = &[Migration::new(
    "0001_create_participants",
    include_str!("../migrations/0001_create_participants.sql"),
)];

const SELECT_PARTICIPANTS: &str =
    "SELECT id, name, event_id, created_at FROM participants";

pub trait ParticipantStore:
    GenericDao<
        Model = Participant,
        Response = ParticipantResponse,
        Filter = ListParticipantsQuery,
        CreateRequest = NewParticipant,
        UpdateRequest = NewParticipant,
        Error = ParticipantError,
        ID = Uuid,
    > + Send
    + Sync
{
}

impl<T> ParticipantStore for T where
    T: GenericDao<
            Model = Participant,
            Response = ParticipantResponse,
            Filter = ListParticipantsQuery,
            CreateRequest = NewParticipant,
            UpdateRequest = NewParticipant,
            Error = ParticipantError,
            ID = Uuid,
        > + Send
        + Sync
{
}

pub type SharedParticipantStore = Arc<dyn ParticipantStore>;

#[derive(Clone)]
pub struct ParticipantDao {
    db: SqlConnect,
}

impl ParticipantDao {
    pub fn new(db: SqlConnect) -> Self { Self { db } }

    fn map_row(&self, row: &Row) -> Participant {
        Participant {
            id: row.get(0),
            name: row.get(1),
            event_id: row.get(2),
            created_at: row.get(3),
        }
    }

    fn not_found(id: Uuid) -> ParticipantError {
        ParticipantError::NotFound {
            participant_id: id.to_string(),
        }
    }
}

#[async_trait]
impl GenericDao for ParticipantDao {
    type CreateRequest = NewParticipant;
    type Error = ParticipantError;
    type Filter = ListParticipantsQuery;
    type ID = Uuid;
    type Model = Participant;
    type Response = ParticipantResponse;
    type UpdateRequest = NewParticipant;

    #[instrument(skip(self))]
    async fn find(
        &self, filter: &Self::Filter,
    ) -> Result<Vec<Self::Response>, Self::Error> {
        let client = self.db.get_client().await?;
        let (sql, params) = WhereClause::new()
            .eq("event_id", filter.event_id.as_deref())
            .build(SELECT_PARTICIPANTS, "ORDER BY created_at, id");
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
            .query(
                format!("{SELECT_PARTICIPANTS} WHERE id = $1").as_str(),
                &[&id],
            )
            .await?;

        let participant = first_row_or_not_found(
            &rows,
            |row| self.map_row(row),
            Self::not_found(id),
        )?;

        Ok(participant.into())
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
                "INSERT INTO participants (id, name, event_id, created_at) \
                 VALUES ($1, $2, $3, $4) RETURNING id, name, event_id, \
                 created_at",
                &[&id, &req.name, &req.event_id, &created_at],
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
                "UPDATE participants SET name = $1, event_id = $2 WHERE id = \
                 $3 RETURNING id, name, event_id, created_at",
                &[&req.name, &req.event_id, &id],
            )
            .await?;

        let participant = first_row_or_not_found(
            &rows,
            |row| self.map_row(row),
            Self::not_found(id),
        )?;

        Ok(participant.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Self::ID) -> Result<(), Self::Error> {
        let client = self.db.get_client().await?;
        let deleted = client
            .execute("DELETE FROM participants WHERE id = $1", &[&id])
            .await?;

        if deleted == 0 {
            return Err(Self::not_found(id));
        }

        Ok(())
    }
}
