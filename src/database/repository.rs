use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::marker::PhantomData;
use tracing::debug;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::schema::Entity;

/// CRUD and prefix-query gateway for one entity type
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<E>, DatabaseError>;

    async fn find_all(&self) -> Result<Vec<E>, DatabaseError>;

    /// Case-insensitive starts-with match on `field`
    async fn find_by_prefix(&self, field: &str, text: &str) -> Result<Vec<E>, DatabaseError>;

    /// Insert when the entity has no id, update otherwise. Returns the stored entity.
    async fn save(&self, entity: E) -> Result<E, DatabaseError>;

    async fn delete(&self, entity: &E) -> Result<(), DatabaseError>;
}

/// Reject field names the entity schema does not know before they reach SQL
pub(crate) fn ensure_known_field<E: Entity>(field: &str) -> Result<(), DatabaseError> {
    match E::schema().field(field) {
        Some(_) => Ok(()),
        None => Err(DatabaseError::QueryError(format!(
            "Unknown field '{}' for {}",
            field,
            E::TABLE
        ))),
    }
}

/// PostgreSQL repository; columns and binds come from the entity schema
pub struct PgRepository<E> {
    pool: PgPool,
    log_queries: bool,
    _phantom: PhantomData<E>,
}

impl<E: Entity> PgRepository<E> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            log_queries: false,
            _phantom: PhantomData,
        }
    }

    pub fn with_query_logging(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    fn table() -> String {
        DatabaseManager::quote_identifier(E::TABLE)
    }

    fn column_names() -> Vec<&'static str> {
        E::schema().describe_fields().iter().map(|d| d.name).collect()
    }

    fn select_sql(where_clause: Option<&str>) -> String {
        let columns: Vec<String> = Self::column_names()
            .into_iter()
            .map(DatabaseManager::quote_identifier)
            .collect();
        let mut sql = format!("SELECT \"id\", {} FROM {}", columns.join(", "), Self::table());
        if let Some(clause) = where_clause {
            sql.push_str(" WHERE ");
            sql.push_str(clause);
        }
        sql.push_str(" ORDER BY \"id\"");
        sql
    }

    fn log(&self, sql: &str) {
        if self.log_queries {
            debug!(table = E::TABLE, "{}", sql);
        }
    }

    fn from_row(row: &PgRow) -> Result<E, DatabaseError> {
        let schema = E::schema();
        let mut entity = E::default();
        entity.assign_id(row.try_get::<i64, _>("id")?);
        for name in Self::column_names() {
            if let Some(value) = row.try_get::<Option<String>, _>(name)? {
                schema.set(&mut entity, name, &value)?;
            }
        }
        Ok(entity)
    }

    fn bind_values(entity: &E) -> Vec<Option<String>> {
        let schema = E::schema();
        Self::column_names()
            .into_iter()
            .map(|name| schema.get(entity, name))
            .collect()
    }

    async fn fetch(&self, sql: &str, params: Vec<String>) -> Result<Vec<E>, DatabaseError> {
        self.log(sql);
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(param);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(Self::from_row).collect()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for PgRepository<E> {
    async fn find_by_id(&self, id: i64) -> Result<Option<E>, DatabaseError> {
        let sql = Self::select_sql(Some("\"id\" = $1"));
        self.log(&sql);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(Self::from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<E>, DatabaseError> {
        self.fetch(&Self::select_sql(None), vec![]).await
    }

    async fn find_by_prefix(&self, field: &str, text: &str) -> Result<Vec<E>, DatabaseError> {
        ensure_known_field::<E>(field)?;
        let clause = format!(
            "starts_with(lower({}), lower($1))",
            DatabaseManager::quote_identifier(field)
        );
        self.fetch(&Self::select_sql(Some(&clause)), vec![text.to_string()])
            .await
    }

    async fn save(&self, mut entity: E) -> Result<E, DatabaseError> {
        let columns = Self::column_names();
        let values = Self::bind_values(&entity);

        match entity.id() {
            None => {
                let quoted: Vec<String> = columns
                    .iter()
                    .map(|c| DatabaseManager::quote_identifier(c))
                    .collect();
                let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();
                let sql = format!(
                    "INSERT INTO {} ({}) VALUES ({}) RETURNING \"id\"",
                    Self::table(),
                    quoted.join(", "),
                    placeholders.join(", ")
                );
                self.log(&sql);

                let mut query = sqlx::query(&sql);
                for value in values {
                    query = query.bind(value);
                }
                let row = query.fetch_one(&self.pool).await?;
                entity.assign_id(row.try_get::<i64, _>("id")?);
                Ok(entity)
            }
            Some(id) => {
                let assignments: Vec<String> = columns
                    .iter()
                    .enumerate()
                    .map(|(i, c)| format!("{} = ${}", DatabaseManager::quote_identifier(c), i + 1))
                    .collect();
                let sql = format!(
                    "UPDATE {} SET {} WHERE \"id\" = ${}",
                    Self::table(),
                    assignments.join(", "),
                    columns.len() + 1
                );
                self.log(&sql);

                let mut query = sqlx::query(&sql);
                for value in values {
                    query = query.bind(value);
                }
                let result = query.bind(id).execute(&self.pool).await?;
                if result.rows_affected() == 0 {
                    return Err(DatabaseError::NotFound(format!("{} {}", E::TABLE, id)));
                }
                Ok(entity)
            }
        }
    }

    async fn delete(&self, entity: &E) -> Result<(), DatabaseError> {
        let Some(id) = entity.id() else {
            return Ok(());
        };
        let sql = format!("DELETE FROM {} WHERE \"id\" = $1", Self::table());
        self.log(&sql);
        sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{Role, User};

    #[test]
    fn select_sql_lists_schema_columns() {
        let sql = PgRepository::<User>::select_sql(None);
        assert_eq!(
            sql,
            "SELECT \"id\", \"username\", \"display_name\", \"email\", \"password_hash\" FROM \"users\" ORDER BY \"id\""
        );
    }

    #[test]
    fn select_sql_with_where_clause() {
        let sql = PgRepository::<Role>::select_sql(Some("\"id\" = $1"));
        assert!(sql.ends_with("FROM \"roles\" WHERE \"id\" = $1 ORDER BY \"id\""));
    }

    #[test]
    fn unknown_prefix_field_is_rejected() {
        assert!(ensure_known_field::<User>("username").is_ok());
        let err = ensure_known_field::<User>("id; DROP TABLE users").unwrap_err();
        assert!(matches!(err, DatabaseError::QueryError(_)));
    }

    #[test]
    fn bind_values_follow_schema_order() {
        let mut user = User::new("alice", "alice@example.com");
        user.password_hash = "h".to_string();
        assert_eq!(
            PgRepository::<User>::bind_values(&user),
            vec![
                Some("alice".to_string()),
                None,
                Some("alice@example.com".to_string()),
                Some("h".to_string())
            ]
        );
    }
}
