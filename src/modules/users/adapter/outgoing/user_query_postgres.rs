use async_trait::async_trait;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;
use uuid::Uuid;

use super::sea_orm_entity::users::{Column as UserColumn, Entity as UserEntity};
use crate::modules::users::application::domain::User;
use crate::modules::users::application::ports::outgoing::{UserQuery, UserQueryError};

#[derive(Clone, Debug)]
pub struct UserQueryPostgres {
    db: Arc<DatabaseConnection>,
}

impl UserQueryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn exists(&self, column: UserColumn, value: &str) -> Result<bool, UserQueryError> {
        let found = UserEntity::find()
            .filter(column.eq(value))
            .one(&*self.db)
            .await
            .map_err(|e| UserQueryError::DatabaseError(e.to_string()))?;

        Ok(found.is_some())
    }
}

#[async_trait]
impl UserQuery for UserQueryPostgres {
    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>, UserQueryError> {
        let user = UserEntity::find_by_id(user_id)
            .one(&*self.db)
            .await
            .map_err(|e| UserQueryError::DatabaseError(e.to_string()))?;

        Ok(user.map(User::from))
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, UserQueryError> {
        let user = UserEntity::find()
            .filter(
                Condition::any()
                    .add(UserColumn::Username.eq(identifier))
                    .add(UserColumn::Email.eq(identifier)),
            )
            .one(&*self.db)
            .await
            .map_err(|e| UserQueryError::DatabaseError(e.to_string()))?;

        Ok(user.map(User::from))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, UserQueryError> {
        self.exists(UserColumn::Username, username).await
    }

    async fn email_exists(&self, email: &str) -> Result<bool, UserQueryError> {
        self.exists(UserColumn::Email, email).await
    }
}
