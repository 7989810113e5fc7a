use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewUser, User, UserPatch, UserRole};
use super::errors::AuthError;

/// Persistence abstraction over user records, the only component allowed
/// to mutate rows. Storage/transport failures surface as
/// `AuthError::Directory`, distinct from the domain not-found errors.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;
    async fn find_by_email_and_recuperation_code(
        &self,
        email: &str,
        code: &str,
    ) -> Result<Option<User>, AuthError>;
    async fn find_by_id_and_verification_code(
        &self,
        id: Uuid,
        code: &str,
    ) -> Result<Option<User>, AuthError>;

    /// Users whose role is in `roles`, newest first.
    async fn list(&self, roles: &[UserRole]) -> Result<Vec<User>, AuthError>;

    async fn create(&self, fields: NewUser) -> Result<User, AuthError>;

    /// Apply a partial merge atomically in a single row write.
    /// Fails with `UserNotFound` when the row is absent.
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AuthError>;

    async fn delete(&self, id: Uuid) -> Result<(), AuthError>;
}

/// In-memory directory for tests and doc examples.
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockUserDirectory {
        users: Mutex<HashMap<Uuid, User>>,
    }

    impl MockUserDirectory {
        /// Insert a fully-formed user, bypassing `create` defaults.
        pub fn seed(&self, user: User) {
            self.users.lock().unwrap().insert(user.id, user);
        }

        pub fn get(&self, id: Uuid) -> Option<User> {
            self.users.lock().unwrap().get(&id).cloned()
        }
    }

    fn apply(patch: UserPatch, user: &mut User) {
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(hash) = patch.password_hash {
            user.password_hash = hash;
        }
        if let Some(status) = patch.status {
            user.status = status;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        if let Some(code) = patch.recuperation_code {
            user.recuperation_code = code;
        }
        if let Some(code) = patch.verification_code {
            user.verification_code = code;
        }
        user.updated_at = Utc::now();
    }

    #[async_trait]
    impl UserDirectory for MockUserDirectory {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
            Ok(self.users.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn find_by_email_and_recuperation_code(
            &self,
            email: &str,
            code: &str,
        ) -> Result<Option<User>, AuthError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email == email && u.recuperation_code.as_deref() == Some(code))
                .cloned())
        }

        async fn find_by_id_and_verification_code(
            &self,
            id: Uuid,
            code: &str,
        ) -> Result<Option<User>, AuthError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .get(&id)
                .filter(|u| u.verification_code.as_deref() == Some(code))
                .cloned())
        }

        async fn list(&self, roles: &[UserRole]) -> Result<Vec<User>, AuthError> {
            let mut users: Vec<User> = self
                .users
                .lock()
                .unwrap()
                .values()
                .filter(|u| roles.contains(&u.role))
                .cloned()
                .collect();
            users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(users)
        }

        async fn create(&self, fields: NewUser) -> Result<User, AuthError> {
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4(),
                name: fields.name,
                email: fields.email,
                password_hash: fields.password_hash,
                status: fields.status,
                role: fields.role,
                recuperation_code: None,
                verification_code: fields.verification_code,
                created_at: now,
                updated_at: now,
            };
            self.users.lock().unwrap().insert(user.id, user.clone());
            Ok(user)
        }

        async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AuthError> {
            let mut users = self.users.lock().unwrap();
            let user = users.get_mut(&id).ok_or(AuthError::UserNotFound)?;
            apply(patch, user);
            Ok(user.clone())
        }

        async fn delete(&self, id: Uuid) -> Result<(), AuthError> {
            self.users
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or(AuthError::UserNotFound)
        }
    }
}
