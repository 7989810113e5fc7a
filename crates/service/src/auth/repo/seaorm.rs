use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::auth::domain::{NewUser, User, UserPatch, UserRole};
use crate::auth::errors::AuthError;
use crate::auth::repository::UserDirectory;

/// Production directory backed by the `users` table. Each `update` is a
/// single UPDATE statement, so a patch lands atomically at row granularity.
pub struct SeaOrmUserDirectory {
    pub db: DatabaseConnection,
}

fn to_domain(m: models::user::Model) -> User {
    User {
        id: m.id,
        name: m.name,
        email: m.email,
        password_hash: m.password,
        status: m.status,
        role: m.role,
        recuperation_code: m.recuperation_code,
        verification_code: m.verification_code,
        created_at: m.created_at.with_timezone(&Utc),
        updated_at: m.updated_at.with_timezone(&Utc),
    }
}

fn db_err(e: sea_orm::DbErr) -> AuthError {
    AuthError::Directory(e.to_string())
}

#[async_trait::async_trait]
impl UserDirectory for SeaOrmUserDirectory {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        let res = models::user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(res.map(to_domain))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let res = models::user::Entity::find()
            .filter(models::user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(res.map(to_domain))
    }

    async fn find_by_email_and_recuperation_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<User>, AuthError> {
        let res = models::user::Entity::find()
            .filter(models::user::Column::Email.eq(email))
            .filter(models::user::Column::RecuperationCode.eq(code))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(res.map(to_domain))
    }

    async fn find_by_id_and_verification_code(
        &self,
        id: Uuid,
        code: &str,
    ) -> Result<Option<User>, AuthError> {
        let res = models::user::Entity::find()
            .filter(models::user::Column::Id.eq(id))
            .filter(models::user::Column::VerificationCode.eq(code))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(res.map(to_domain))
    }

    async fn list(&self, roles: &[UserRole]) -> Result<Vec<User>, AuthError> {
        let rows = models::user::Entity::find()
            .filter(models::user::Column::Role.is_in(roles.to_vec()))
            .order_by_desc(models::user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn create(&self, fields: NewUser) -> Result<User, AuthError> {
        let now = Utc::now().into();
        let am = models::user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(fields.name),
            email: Set(fields.email),
            password: Set(fields.password_hash),
            status: Set(fields.status),
            role: Set(fields.role),
            recuperation_code: Set(None),
            verification_code: Set(fields.verification_code),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let created = am.insert(&self.db).await.map_err(db_err)?;
        Ok(to_domain(created))
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AuthError> {
        let found = models::user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(AuthError::UserNotFound)?;
        let mut am: models::user::ActiveModel = found.into();
        if let Some(name) = patch.name {
            am.name = Set(name);
        }
        if let Some(email) = patch.email {
            am.email = Set(email);
        }
        if let Some(hash) = patch.password_hash {
            am.password = Set(hash);
        }
        if let Some(status) = patch.status {
            am.status = Set(status);
        }
        if let Some(role) = patch.role {
            am.role = Set(role);
        }
        if let Some(code) = patch.recuperation_code {
            am.recuperation_code = Set(code);
        }
        if let Some(code) = patch.verification_code {
            am.verification_code = Set(code);
        }
        am.updated_at = Set(Utc::now().into());
        let updated = am.update(&self.db).await.map_err(db_err)?;
        Ok(to_domain(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AuthError> {
        let res = models::user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if res.rows_affected == 0 {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }
}
