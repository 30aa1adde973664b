use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::{Expr, ExprTrait, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{NewUser, User, UserFilters, UserUpdate},
    pagination::{MAX_SQL_BOUND, contains_pattern},
    repository::{UserRepository, parse_id},
};

/// PostgreSQL implementation of UserRepository
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `LOWER(column) LIKE '%value%'`, with the pattern bound as a parameter
fn lower_contains(column: entity::Column, value: &str) -> Condition {
    Condition::all()
        .add(Expr::expr(Func::lower(Expr::col(column))).like(contains_pattern(value)))
}

/// The predicate set shared by `count` and `get_all`
fn filter_condition(filters: &UserFilters) -> Condition {
    let mut condition = Condition::all();

    if let Some(first_name) = filters.first_name_filter() {
        condition = condition.add(lower_contains(entity::Column::FirstName, first_name));
    }

    if let Some(last_name) = filters.last_name_filter() {
        condition = condition.add(lower_contains(entity::Column::LastName, last_name));
    }

    condition
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, input: NewUser) -> UserResult<User> {
        let active_model: entity::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model.into())
    }

    async fn get(&self, id: &str) -> UserResult<User> {
        let uuid = parse_id(id)?;

        entity::Entity::find_by_id(uuid)
            .one(&self.db)
            .await?
            .map(Into::into)
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    async fn get_all(
        &self,
        filters: &UserFilters,
        offset: u64,
        limit: u64,
    ) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .filter(filter_condition(filters))
            .order_by_desc(entity::Column::CreatedAt)
            .order_by_desc(entity::Column::Id)
            .limit(Ord::min(limit, MAX_SQL_BOUND))
            .offset(Ord::min(offset, MAX_SQL_BOUND))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filters: &UserFilters) -> UserResult<u64> {
        let total = entity::Entity::find()
            .filter(filter_condition(filters))
            .count(&self.db)
            .await?;

        Ok(total)
    }

    async fn update(&self, id: &str, update: UserUpdate) -> UserResult<()> {
        let uuid = parse_id(id)?;
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        let mut query =
            entity::Entity::update_many().col_expr(entity::Column::UpdatedAt, Expr::value(now));

        if let Some(first_name) = update.first_name {
            query = query.col_expr(entity::Column::FirstName, Expr::value(first_name));
        }
        if let Some(last_name) = update.last_name {
            query = query.col_expr(entity::Column::LastName, Expr::value(last_name));
        }
        if let Some(email) = update.email {
            query = query.col_expr(entity::Column::Email, Expr::value(email));
        }
        if let Some(phone) = update.phone {
            query = query.col_expr(entity::Column::Phone, Expr::value(phone));
        }

        let result = query
            .filter(entity::Column::Id.eq(uuid))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        tracing::info!(user_id = %uuid, "Updated user");
        Ok(())
    }

    async fn delete(&self, id: &str) -> UserResult<()> {
        let uuid = parse_id(id)?;

        let result = entity::Entity::delete_by_id(uuid).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        tracing::info!(user_id = %uuid, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn model(first_name: &str) -> entity::Model {
        let now = chrono::Utc::now().into();
        entity::Model {
            id: Uuid::now_v7(),
            first_name: first_name.to_string(),
            last_name: "Doe".to_string(),
            email: None,
            phone: Some("555-0100".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
        [("num_items", Value::from(n))].into_iter().collect()
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    /// Debug-formatted statements with the quote escaping undone
    fn log_of(repo: PgUserRepository) -> String {
        format!("{:?}", repo.db.into_transaction_log()).replace("\\\"", "\"")
    }

    #[tokio::test]
    async fn test_count_and_get_all_use_the_same_parametrized_filter() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(1)]])
            .append_query_results([vec![model("Joanna")]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let filters = UserFilters {
            first_name: Some("AnN".to_string()),
            last_name: None,
        };

        assert_eq!(repo.count(&filters).await.unwrap(), 1);
        let users = repo.get_all(&filters, 20, 10).await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].first_name, "Joanna");

        let log = log_of(repo);
        assert_eq!(log.matches("LOWER(\"first_name\") LIKE $1").count(), 2);
        assert_eq!(log.matches("%ann%").count(), 2);
        assert!(!log.contains("last_name\") LIKE"));
        assert!(log.contains("ORDER BY \"users\".\"created_at\" DESC, \"users\".\"id\" DESC"));
    }

    #[tokio::test]
    async fn test_get_all_binds_out_of_range_bounds_as_bigint() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let users = repo
            .get_all(&UserFilters::default(), u64::MAX, u64::MAX)
            .await
            .unwrap();
        assert!(users.is_empty());

        let log = log_of(repo);
        assert!(log.contains("LIMIT $1 OFFSET $2"));
        assert_eq!(log.matches(&i64::MAX.to_string()).count(), 2);
        assert!(!log.contains(&u64::MAX.to_string()));
    }

    #[tokio::test]
    async fn test_filter_value_is_never_inlined() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(0)]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let filters = UserFilters {
            first_name: None,
            last_name: Some("o'brien%".to_string()),
        };
        repo.count(&filters).await.unwrap();

        let log = log_of(repo);
        assert!(log.contains("LOWER(\"last_name\") LIKE $1"));
        assert!(log.contains("%o'brien\\\\%%"));
    }

    #[tokio::test]
    async fn test_empty_filters_add_no_predicate() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(4)]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let filters = UserFilters {
            first_name: Some(String::new()),
            last_name: None,
        };
        assert_eq!(repo.count(&filters).await.unwrap(), 4);

        assert!(!log_of(repo).contains("LIKE"));
    }

    #[tokio::test]
    async fn test_get_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let id = Uuid::now_v7().to_string();
        assert!(matches!(repo.get(&id).await, Err(UserError::NotFound(got)) if got == id));
    }

    #[tokio::test]
    async fn test_malformed_id_never_reaches_the_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgUserRepository::new(db);

        assert!(matches!(repo.get("42").await, Err(UserError::NotFound(_))));
        assert!(matches!(
            repo.update("42", UserUpdate::default()).await,
            Err(UserError::NotFound(_))
        ));
        assert!(matches!(repo.delete("42").await, Err(UserError::NotFound(_))));

        assert_eq!(log_of(repo), "[]");
    }

    #[tokio::test]
    async fn test_update_writes_only_supplied_columns() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1)])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let update = UserUpdate {
            email: Some("jane@new.example".to_string()),
            ..Default::default()
        };
        repo.update(&Uuid::now_v7().to_string(), update).await.unwrap();

        let log = log_of(repo);
        assert!(log.contains("UPDATE \"users\" SET"));
        assert!(log.contains("\"email\" = "));
        assert!(log.contains("\"updated_at\" = "));
        assert!(!log.contains("\"first_name\" = "));
        assert!(!log.contains("\"last_name\" = "));
        assert!(!log.contains("\"phone\" = "));
        assert!(!log.contains("SELECT"));
    }

    #[tokio::test]
    async fn test_update_zero_rows_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let update = UserUpdate {
            first_name: Some("Jane".to_string()),
            ..Default::default()
        };
        let result = repo.update(&Uuid::now_v7().to_string(), update).await;

        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_zero_rows_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1), exec(0)])
            .into_connection();
        let repo = PgUserRepository::new(db);
        let id = Uuid::now_v7().to_string();

        assert!(repo.delete(&id).await.is_ok());
        assert!(matches!(repo.delete(&id).await, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_returns_inserted_row() {
        let inserted = model("Jane");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![inserted.clone()]])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let user = repo
            .create(NewUser {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: None,
                phone: Some("555-0100".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(user.id, inserted.id);
        assert_eq!(user.phone.as_deref(), Some("555-0100"));
        assert!(log_of(repo).contains("INSERT INTO \"users\""));
    }

    #[tokio::test]
    async fn test_query_error_maps_to_storage() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let result = repo.count(&UserFilters::default()).await;
        assert!(matches!(result, Err(UserError::Storage(msg)) if msg.contains("connection reset")));
    }
}
