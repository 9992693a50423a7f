use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::users::application::domain::{NewUser, User};
use crate::modules::users::application::ports::outgoing::{UserRepository, UserRepositoryError};

use super::sea_orm_entity::users::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as UserEntity, Model as UserModel,
};

#[derive(Clone, Debug)]
pub struct UserRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl UserRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, user_id: Uuid) -> Result<UserModel, UserRepositoryError> {
        UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?
            .ok_or(UserRepositoryError::UserNotFound)
    }

    async fn save(&self, active_user: UserActiveModel) -> Result<User, UserRepositoryError> {
        let updated = active_user.update(&*self.db).await.map_err(map_write_error)?;
        Ok(User::from(updated))
    }
}

/// Unique violations on username/email surface as `UserAlreadyExists`.
fn map_write_error(e: DbErr) -> UserRepositoryError {
    let err_str = e.to_string().to_lowercase();
    if err_str.contains("23505")
        || err_str.contains("duplicate key")
        || err_str.contains("unique constraint")
    {
        return UserRepositoryError::UserAlreadyExists;
    }
    UserRepositoryError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for UserRepositoryPostgres {
    async fn create(&self, user: NewUser) -> Result<User, UserRepositoryError> {
        let active_user = UserActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(user.username),
            email: Set(user.email),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            password_hash: Set(user.password_hash),
            is_active: Set(false),
            is_staff: Set(false),
            is_superuser: Set(false),
            date_joined: Set(Utc::now().into()),
            last_login: Set(None),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let inserted = active_user.insert(&*self.db).await.map_err(map_write_error)?;
        Ok(User::from(inserted))
    }

    async fn set_active(&self, user_id: Uuid, is_active: bool) -> Result<User, UserRepositoryError> {
        let mut active_user: UserActiveModel = self.find_model(user_id).await?.into();
        active_user.is_active = Set(is_active);
        self.save(active_user).await
    }

    async fn record_login(
        &self,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<User, UserRepositoryError> {
        let mut active_user: UserActiveModel = self.find_model(user_id).await?.into();
        active_user.last_login = Set(Some(at.into()));
        self.save(active_user).await
    }

    async fn update_email(&self, user_id: Uuid, email: String) -> Result<User, UserRepositoryError> {
        let mut active_user: UserActiveModel = self.find_model(user_id).await?.into();
        active_user.email = Set(email);
        self.save(active_user).await
    }

    async fn update_username(
        &self,
        user_id: Uuid,
        username: String,
    ) -> Result<User, UserRepositoryError> {
        let mut active_user: UserActiveModel = self.find_model(user_id).await?.into();
        active_user.username = Set(username);
        self.save(active_user).await
    }

    async fn update_password(
        &self,
        user_id: Uuid,
        password_hash: String,
    ) -> Result<(), UserRepositoryError> {
        let mut active_user: UserActiveModel = self.find_model(user_id).await?.into();
        active_user.password_hash = Set(password_hash);
        self.save(active_user).await?;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid) -> Result<(), UserRepositoryError> {
        let result = UserEntity::delete_by_id(user_id)
            .exec(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(UserRepositoryError::UserNotFound);
        }
        Ok(())
    }

    async fn delete_unactivated_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, UserRepositoryError> {
        let cutoff: sea_orm::prelude::DateTimeWithTimeZone = cutoff.into();

        let result = UserEntity::delete_many()
            .filter(UserColumn::IsActive.eq(false))
            .filter(UserColumn::LastLogin.is_null())
            .filter(UserColumn::DateJoined.lt(cutoff))
            .exec(&*self.db)
            .await
            .map_err(|e| UserRepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_mock_user_model(id: Uuid) -> UserModel {
        let now = Utc::now();
        UserModel {
            id,
            username: "johndoe".to_string(),
            email: "john@example.com".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            password_hash: "hashed_password".to_string(),
            is_active: false,
            is_staff: false,
            is_superuser: false,
            date_joined: now.into(),
            last_login: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn create_new_user() -> NewUser {
        NewUser {
            username: "johndoe".to_string(),
            email: "john@example.com".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            password_hash: "hashed_password".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let model = create_mock_user_model(Uuid::new_v4());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));
        let user = repository.create(create_new_user()).await.unwrap();

        assert_eq!(user.id, model.id);
        assert_eq!(user.username, "johndoe");
        assert!(!user.is_active);
        assert!(user.last_login.is_none());
    }

    #[tokio::test]
    async fn test_create_user_duplicate_key_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom(
                "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
            )])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));
        let result = repository.create(create_new_user()).await;

        assert!(matches!(result, Err(UserRepositoryError::UserAlreadyExists)));
    }

    #[tokio::test]
    async fn test_create_user_database_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection timeout".to_string())])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));

        match repository.create(create_new_user()).await.unwrap_err() {
            UserRepositoryError::DatabaseError(msg) => assert!(msg.contains("connection timeout")),
            other => panic!("Expected DatabaseError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_set_active_updates_flag() {
        let user_id = Uuid::new_v4();
        let existing = create_mock_user_model(user_id);
        let activated = UserModel {
            is_active: true,
            ..existing.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![existing], vec![activated]])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));
        let user = repository.set_active(user_id, true).await.unwrap();

        assert!(user.is_active);
    }

    #[tokio::test]
    async fn test_set_active_user_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<UserModel>::new()])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));
        let result = repository.set_active(Uuid::new_v4(), true).await;

        assert!(matches!(result, Err(UserRepositoryError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_record_login_sets_timestamp() {
        let user_id = Uuid::new_v4();
        let at = Utc::now();
        let existing = UserModel {
            is_active: true,
            ..create_mock_user_model(user_id)
        };
        let logged_in = UserModel {
            last_login: Some(at.into()),
            ..existing.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![existing], vec![logged_in]])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));
        let user = repository.record_login(user_id, at).await.unwrap();

        assert_eq!(
            user.last_login.map(|t| t.timestamp()),
            Some(at.timestamp())
        );
    }

    #[tokio::test]
    async fn test_update_email_conflict() {
        let user_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![create_mock_user_model(user_id)]])
            .append_query_errors([DbErr::Custom(
                "error returned from database: 23505".to_string(),
            )])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));
        let result = repository
            .update_email(user_id, "taken@example.com".to_string())
            .await;

        assert!(matches!(result, Err(UserRepositoryError::UserAlreadyExists)));
    }

    #[tokio::test]
    async fn test_update_username_success() {
        let user_id = Uuid::new_v4();
        let existing = create_mock_user_model(user_id);
        let renamed = UserModel {
            username: "janedoe".to_string(),
            ..existing.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![existing], vec![renamed]])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));
        let user = repository
            .update_username(user_id, "janedoe".to_string())
            .await
            .unwrap();

        assert_eq!(user.username, "janedoe");
    }

    #[tokio::test]
    async fn test_update_password_success() {
        let user_id = Uuid::new_v4();
        let existing = create_mock_user_model(user_id);
        let updated = UserModel {
            password_hash: "new_hash".to_string(),
            ..existing.clone()
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![existing], vec![updated]])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));
        let result = repository
            .update_password(user_id, "new_hash".to_string())
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));

        assert!(repository.delete(Uuid::new_v4()).await.is_ok());
        assert!(matches!(
            repository.delete(Uuid::new_v4()).await,
            Err(UserRepositoryError::UserNotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_unactivated_before_returns_count() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            }])
            .into_connection();

        let repository = UserRepositoryPostgres::new(Arc::new(db));
        let cutoff = Utc::now() - chrono::Duration::minutes(30);

        assert_eq!(repository.delete_unactivated_before(cutoff).await.unwrap(), 3);
    }
}
