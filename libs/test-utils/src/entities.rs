//! [`InMemoryEntity`] for the three stored entities, mirroring the SQL
//! filters of their DAOs.

use async_trait::async_trait;
use chrono::Utc;
use events_errors::EventError;
use events_models::{Event, NewEvent};
use events_queries::ListEventsQuery;
use events_responses::EventResponse;
use participants_errors::ParticipantError;
use participants_models::{NewParticipant, Participant};
use participants_queries::ListParticipantsQuery;
use participants_responses::ParticipantResponse;
use user_dao::UserStore;
use user_errors::UserError;
use user_models::{NewUser, User, UserUpdate};
use user_queries::ListUsersQuery;
use user_responses::UserResponse;
use uuid::Uuid;

use crate::{InMemoryDao, InMemoryEntity};

fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn eq(filter: &Option<String>, actual: &str) -> bool {
    supplied(filter).is_none_or(|wanted| wanted == actual)
}

fn contains(filter: &Option<String>, actual: Option<&str>) -> bool {
    supplied(filter)
        .is_none_or(|wanted| actual.is_some_and(|a| a.contains(wanted)))
}

impl InMemoryEntity for Event {
    type CreateRequest = NewEvent;
    type Error = EventError;
    type Filter = ListEventsQuery;
    type Response = EventResponse;
    type UpdateRequest = NewEvent;

    fn id(&self) -> Uuid { self.id }

    fn matches(&self, filter: &ListEventsQuery) -> bool {
        eq(&filter.date, &self.date) && eq(&filter.kind, &self.kind)
    }

    fn create(id: Uuid, req: NewEvent) -> Self {
        Self {
            id,
            name: req.name,
            date: req.date,
            kind: req.kind,
            created_at: Utc::now(),
        }
    }

    fn apply(&mut self, req: NewEvent) {
        self.name = req.name;
        self.date = req.date;
        self.kind = req.kind;
    }

    fn not_found(id: Uuid) -> EventError {
        EventError::NotFound {
            event_id: id.to_string(),
        }
    }
}

impl InMemoryEntity for Participant {
    type CreateRequest = NewParticipant;
    type Error = ParticipantError;
    type Filter = ListParticipantsQuery;
    type Response = ParticipantResponse;
    type UpdateRequest = NewParticipant;

    fn id(&self) -> Uuid { self.id }

    fn matches(&self, filter: &ListParticipantsQuery) -> bool {
        eq(&filter.event_id, &self.event_id)
    }

    fn create(id: Uuid, req: NewParticipant) -> Self {
        Self {
            id,
            name: req.name,
            event_id: req.event_id,
            created_at: Utc::now(),
        }
    }

    fn apply(&mut self, req: NewParticipant) {
        self.name = req.name;
        self.event_id = req.event_id;
    }

    fn not_found(id: Uuid) -> ParticipantError {
        ParticipantError::NotFound {
            participant_id: id.to_string(),
        }
    }
}

impl InMemoryEntity for User {
    type CreateRequest = NewUser;
    type Error = UserError;
    type Filter = ListUsersQuery;
    type Response = UserResponse;
    type UpdateRequest = UserUpdate;

    fn id(&self) -> Uuid { self.id }

    fn matches(&self, filter: &ListUsersQuery) -> bool {
        contains(&filter.name, self.name.as_deref())
            && contains(&filter.email, Some(&self.email))
    }

    fn create(id: Uuid, req: NewUser) -> Self {
        Self {
            id,
            name: req.name,
            email: req.email,
            password_hash: req.password_hash,
            created_at: Utc::now(),
        }
    }

    fn apply(&mut self, req: UserUpdate) { self.name = Some(req.name); }

    fn not_found(id: Uuid) -> UserError {
        UserError::NotFound {
            user_id: id.to_string(),
        }
    }

    fn conflicts(&self, req: &NewUser) -> Option<UserError> {
        (self.email == req.email).then_some(UserError::EmailInUse)
    }
}

#[async_trait]
impl UserStore for InMemoryDao<User> {
    async fn find_by_email(
        &self, email: &str,
    ) -> Result<Option<User>, UserError> {
        Ok(self
            .snapshot()
            .await
            .into_iter()
            .find(|user| user.email == email))
    }
}
