//! PostgreSQL-backed `ActionRepository` implementation using Diesel ORM.
//!
//! Appending an action also touches the owning contact's interaction stamps,
//! and both writes share one transaction.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel_async::RunQueryDsl;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::overview::DailyActionCount;
use crate::domain::ports::{ActionRepository, ActionRepositoryError};
use crate::domain::{Action, ActionStatus, ActionType};

use super::error_mapping::{
    ConstraintViolation, constraint_violation, map_diesel_error, map_pool_error,
};
use super::models::{ActionRow, NewActionRow};
use super::pool::{DbPool, PoolError};
use super::schema::{actions, contacts, relationships};

/// Grouped per-day counts, newest day first.
const DAILY_COUNTS_SQL: &str = "SELECT date(timestamp) AS day, COUNT(*) AS count \
     FROM actions GROUP BY date(timestamp) ORDER BY day DESC LIMIT $1";

/// Diesel-backed implementation of the action repository port.
#[derive(Clone)]
pub struct DieselActionRepository {
    pool: DbPool,
}

impl DieselActionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> ActionRepositoryError {
    map_pool_error(error, ActionRepositoryError::connection)
}

/// Map Diesel errors, surfacing foreign-key violations as `MissingContact`.
fn map_write_error(error: diesel::result::Error) -> ActionRepositoryError {
    match constraint_violation(&error) {
        Some(ConstraintViolation::ForeignKey(message)) => {
            ActionRepositoryError::missing_contact(message)
        }
        Some(ConstraintViolation::Unique(message)) => ActionRepositoryError::query(message),
        None => map_read_error(error),
    }
}

fn map_read_error(error: diesel::result::Error) -> ActionRepositoryError {
    map_diesel_error(
        error,
        ActionRepositoryError::query,
        ActionRepositoryError::connection,
    )
}

fn decode_object(value: Value, field_name: &str) -> Result<serde_json::Map<String, Value>, ActionRepositoryError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ActionRepositoryError::query(format!(
            "decode {field_name}: expected object, got {other}"
        ))),
    }
}

/// Convert a database row into a domain action.
fn row_to_action(row: ActionRow) -> Result<Action, ActionRepositoryError> {
    let action_type: ActionType = row
        .action_type
        .parse()
        .map_err(|err: crate::domain::action::ParseActionTypeError| {
            ActionRepositoryError::query(err.to_string())
        })?;
    let status: ActionStatus = row
        .status
        .parse()
        .map_err(|err: crate::domain::action::ParseActionStatusError| {
            ActionRepositoryError::query(err.to_string())
        })?;

    Ok(Action {
        id: row.id,
        contact_id: row.contact_id,
        action_type,
        details: decode_object(row.details, "details")?,
        status,
        timestamp: row.timestamp,
        metadata: decode_object(row.metadata, "metadata")?,
        scheduled_for: row.scheduled_for,
        completed_at: row.completed_at,
    })
}

#[derive(QueryableByName)]
struct DailyCountRow {
    #[diesel(sql_type = diesel::sql_types::Date)]
    day: NaiveDate,
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[async_trait]
impl ActionRepository for DieselActionRepository {
    async fn log(&self, action: &Action) -> Result<Action, ActionRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        // Values borrowed into the row must outlive the connection holding
        // the transaction future.
        let now = Utc::now();
        let details = Value::Object(action.details.clone());
        let metadata = Value::Object(action.metadata.clone());
        let new_row = NewActionRow {
            id: action.id,
            contact_id: action.contact_id,
            action_type: action.action_type.as_str(),
            details: &details,
            status: action.status.as_str(),
            timestamp: action.timestamp,
            metadata: &metadata,
            scheduled_for: action.scheduled_for,
            completed_at: action.completed_at,
            created_at: now,
        };
        let contact_id = action.contact_id;
        let timestamp = action.timestamp;

        let mut conn = self.pool.get().await.map_err(map_pool)?;

        // The interaction stamps on the contact and its relationship follow
        // the action timestamp, last write wins.
        let row = conn
            .transaction::<ActionRow, diesel::result::Error, _>(|conn| {
                async move {
                    let row = diesel::insert_into(actions::table)
                        .values(&new_row)
                        .returning(ActionRow::as_returning())
                        .get_result::<ActionRow>(conn)
                        .await?;

                    diesel::update(contacts::table.filter(contacts::id.eq(contact_id)))
                        .set((
                            contacts::last_interaction_at.eq(timestamp),
                            contacts::updated_at.eq(now),
                        ))
                        .execute(conn)
                        .await?;

                    diesel::update(
                        relationships::table.filter(relationships::contact_id.eq(contact_id)),
                    )
                    .set((
                        relationships::last_interaction.eq(timestamp),
                        relationships::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .await?;

                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_write_error)?;

        row_to_action(row)
    }

    async fn list(
        &self,
        contact_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<Action>, ActionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let mut query = actions::table.into_boxed();
        if let Some(contact_id) = contact_id {
            query = query.filter(actions::contact_id.eq(contact_id));
        }

        let rows: Vec<ActionRow> = query
            .order((actions::timestamp.desc(), actions::id.desc()))
            .limit(limit)
            .select(ActionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;

        rows.into_iter().map(row_to_action).collect()
    }

    async fn daily_counts(
        &self,
        days: i64,
    ) -> Result<Vec<DailyActionCount>, ActionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<DailyCountRow> = diesel::sql_query(DAILY_COUNTS_SQL)
            .bind::<BigInt, _>(days)
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;

        Ok(rows
            .into_iter()
            .map(|row| DailyActionCount {
                day: row.day,
                count: row.count,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use chrono::Utc;
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;

    #[fixture]
    fn valid_row() -> ActionRow {
        let now = Utc::now();
        ActionRow {
            id: Uuid::new_v4(),
            contact_id: Uuid::new_v4(),
            action_type: "message_sent".to_owned(),
            details: json!({ "message": "hello" }),
            status: "completed".to_owned(),
            timestamp: now,
            metadata: json!({}),
            scheduled_for: None,
            completed_at: None,
            created_at: now,
        }
    }

    #[rstest]
    fn row_conversion_parses_type_and_status(valid_row: ActionRow) {
        let action = row_to_action(valid_row).expect("valid row converts");
        assert_eq!(action.action_type, ActionType::MessageSent);
        assert_eq!(action.status, ActionStatus::Completed);
        assert_eq!(
            action.details.get("message").and_then(Value::as_str),
            Some("hello")
        );
    }

    #[rstest]
    fn row_conversion_rejects_unknown_action_types(mut valid_row: ActionRow) {
        valid_row.action_type = "telegram_sent".to_owned();

        let error = row_to_action(valid_row).expect_err("unknown type fails");
        assert!(matches!(error, ActionRepositoryError::Query { .. }));
    }

    #[rstest]
    fn row_conversion_rejects_non_object_details(mut valid_row: ActionRow) {
        valid_row.details = json!([1, 2, 3]);

        let error = row_to_action(valid_row).expect_err("array details fail");
        assert!(error.to_string().contains("decode details"));
    }

    #[rstest]
    fn foreign_key_violations_map_to_missing_contact() {
        let diesel_err = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ForeignKeyViolation,
            Box::new("violates foreign key \"fk_actions_contact_id\"".to_owned()),
        );

        let mapped = map_write_error(diesel_err);
        assert!(matches!(mapped, ActionRepositoryError::MissingContact { .. }));
    }
}
