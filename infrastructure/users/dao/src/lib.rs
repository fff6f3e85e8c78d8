use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dao_utils::{
    error_handling::is_unique_violation,
    query_helpers::{WhereClause, create_param_refs, first_row_or_not_found},
};
use database_traits::dao::GenericDao;
use sql_connection::{Migration, Row, SqlConnect};
use tracing::instrument;
use user_errors::UserError;
use user_models::{NewUser, User, UserUpdate};
use user_queries::ListUsersQuery;
use user_responses::UserResponse;
use uuid::Uuid;

pub const MIGRATIONS: &[Migration] = &[Migration::new(
    "0001_create_users",
    include_str!("../migrations/0001_create_users.sql"),
)];

const SELECT_USERS: &str =
    "SELECT id, name, email, password_hash, created_at FROM users";
const RETURNING: &str =
    "RETURNING id, name, email, password_hash, created_at";

#[async_trait]
pub trait UserStore:
    GenericDao<
        Model = User,
        Response = UserResponse,
        Filter = ListUsersQuery,
        CreateRequest = NewUser,
        UpdateRequest = UserUpdate,
        Error = UserError,
        ID = Uuid,
    > + Send
    + Sync
{
    /// Full record including the password hash, for credential checks.
    async fn find_by_email(
        &self, email: &str,
    ) -> Result<Option<User>, UserError>;
}

pub type SharedUserStore = Arc<dyn UserStore>;

#[derive(Clone)]
pub struct UserDao {
    db: SqlConnect,
}

impl UserDao {
    pub fn new(db: SqlConnect) -> Self { Self { db } }

    fn map_row(&self, row: &Row) -> User {
        User {
            id: row.get(0),
            name: row.get(1),
            email: row.get(2),
            password_hash: row.get(3),
            created_at: row.get(4),
        }
    }

    fn not_found(id: Uuid) -> UserError {
        UserError::NotFound {
            user_id: id.to_string(),
        }
    }
}

#[async_trait]
impl UserStore for UserDao {
    #[instrument(skip(self))]
    async fn find_by_email(
        &self, email: &str,
    ) -> Result<Option<User>, UserError> {
        let client = self.db.get_client().await?;
        let rows = client
            .query(format!("{SELECT_USERS} WHERE email = $1").as_str(), &[
                &email,
            ])
            .await?;

        Ok(rows.first().map(|row| self.map_row(row)))
    }
}

#[async_trait]
impl GenericDao for UserDao {
    type CreateRequest = NewUser;
    type Error = UserError;
    type Filter = ListUsersQuery;
    type ID = Uuid;
    type Model = User;
    type Response = UserResponse;
    type UpdateRequest = UserUpdate;

    #[instrument(skip(self))]
    async fn find(
        &self, filter: &Self::Filter,
    ) -> Result<Vec<Self::Response>, Self::Error> {
        let client = self.db.get_client().await?;
        let (sql, params) = WhereClause::new()
            .contains("name", filter.name.as_deref())
            .contains("email", filter.email.as_deref())
            .build(SELECT_USERS, "ORDER BY created_at, id");
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
            .query(format!("{SELECT_USERS} WHERE id = $1").as_str(), &[&id])
            .await?;

        let user = first_row_or_not_found(
            &rows,
            |row| self.map_row(row),
            Self::not_found(id),
        )?;

        Ok(user.into())
    }

    #[instrument(skip_all)]
    async fn create(
        &self, req: Self::CreateRequest,
    ) -> Result<Self::Response, Self::Error> {
        let client = self.db.get_client().await?;
        let id = Uuid::now_v7();
        let created_at = Utc::now();

        let row = client
            .query_one(
                format!(
                    "INSERT INTO users (id, name, email, password_hash, \
                     created_at) VALUES ($1, $2, $3, $4, $5) {RETURNING}"
                )
                .as_str(),
                &[&id, &req.name, &req.email, &req.password_hash, &created_at],
            )
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    UserError::EmailInUse
                }
                else {
                    UserError::Database(e)
                }
            })?;

        Ok(self.map_row(&row).into())
    }

    #[instrument(skip(self))]
    async fn update(
        &self, id: Self::ID, req: Self::UpdateRequest,
    ) -> Result<Self::Response, Self::Error> {
        let client = self.db.get_client().await?;
        let rows = client
            .query(
                format!("UPDATE users SET name = $1 WHERE id = $2 {RETURNING}")
                    .as_str(),
                &[&req.name, &id],
            )
            .await?;

        let user = first_row_or_not_found(
            &rows,
            |row| self.map_row(row),
            Self::not_found(id),
        )?;

        Ok(user.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Self::ID) -> Result<(), Self::Error> {
        let client = self.db.get_client().await?;
        let deleted = client
            .execute("DELETE FROM users WHERE id = $1", &[&id])
            .await?;

        if deleted == 0 {
            return Err(Self::not_found(id));
        }

        Ok(())
    }
}
