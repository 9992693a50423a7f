use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use std::sync::Arc;
use uuid::Uuid;

use super::sea_orm_entity::user_social_auth::{
    ActiveModel as SocialActiveModel, Column as SocialColumn, Entity as SocialEntity,
};
use crate::modules::users::application::domain::OAuthBackend;
use crate::modules::users::application::ports::outgoing::{
    SocialAccountStore, UserQueryError, UserRepositoryError,
};

#[derive(Clone, Debug)]
pub struct SocialAccountPostgres {
    db: Arc<DatabaseConnection>,
}

impl SocialAccountPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SocialAccountStore for SocialAccountPostgres {
    async fn find_user_id(
        &self,
        backend: OAuthBackend,
        uid: &str,
    ) -> Result<Option<Uuid>, UserQueryError> {
        let link = SocialEntity::find()
            .filter(SocialColumn::Provider.eq(backend.as_str()))
            .filter(SocialColumn::Uid.eq(uid))
            .one(&*self.db)
            .await
            .map_err(|e| UserQueryError::DatabaseError(e.to_string()))?;

        Ok(link.map(|link| link.user_id))
    }

    async fn is_linked(&self, user_id: Uuid) -> Result<bool, UserQueryError> {
        let links = SocialEntity::find()
            .filter(SocialColumn::UserId.eq(user_id))
            .count(&*self.db)
            .await
            .map_err(|e| UserQueryError::DatabaseError(e.to_string()))?;

        Ok(links > 0)
    }

    async fn link(
        &self,
        user_id: Uuid,
        backend: OAuthBackend,
        uid: &str,
    ) -> Result<(), UserRepositoryError> {
        let link = SocialActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            provider: Set(backend.as_str().to_string()),
            uid: Set(uid.to_string()),
            created_at: Set(Utc::now().into()),
        };

        link.insert(&*self.db).await.map_err(|e| {
            let message = e.to_string();
            if message.contains("23505") || message.to_lowercase().contains("duplicate key") {
                UserRepositoryError::UserAlreadyExists
            } else {
                UserRepositoryError::DatabaseError(message)
            }
        })?;

        tracing::info!(user_id = %user_id, backend = %backend, "Social account linked");
        Ok(())
    }
}
