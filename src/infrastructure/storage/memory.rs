//! In-memory storage implementation

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::RwLock;

use crate::domain::{
    DomainError, DomainResult, GlobalOptions, GlobalOptionsRepository, NewUser, User,
    UserChanges, UserRepositoryInterface, UserRole,
};

/// In-memory user store for development and testing
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
    // Serializes the uniqueness check, role decision and insert
    insert_lock: Mutex<()>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            insert_lock: Mutex::new(()),
        }
    }

    fn email_taken(&self, email: &str, except_id: Option<&str>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id.as_str()) != except_id)
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn create_user(&self, new_user: NewUser) -> DomainResult<User> {
        let _guard = self
            .insert_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if self.email_taken(&new_user.email, None) {
            return Err(DomainError::Conflict("Email already exists".to_string()));
        }

        let role = if self.users.is_empty() {
            UserRole::Admin
        } else {
            UserRole::User
        };

        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            email: new_user.email,
            name: new_user.name,
            password_hash: Some(new_user.password_hash),
            role,
            last_login_at: now,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn count_users(&self) -> DomainResult<u64> {
        Ok(self.users.len() as u64)
    }

    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn list_admins(&self) -> DomainResult<Vec<User>> {
        let mut admins: Vec<User> = self
            .users
            .iter()
            .filter(|u| u.role == UserRole::Admin)
            .map(|u| u.clone())
            .collect();
        admins.sort_by_key(|u| u.created_at);
        Ok(admins)
    }

    async fn update_user(&self, id: &str, changes: UserChanges) -> DomainResult<Option<User>> {
        let _guard = self
            .insert_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(ref email) = changes.email {
            if self.email_taken(email, Some(id)) {
                return Err(DomainError::Conflict("Email already exists".to_string()));
            }
        }

        let Some(mut user) = self.users.get_mut(id) else {
            return Ok(None);
        };

        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = Some(hash);
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        let mut user = self
            .users
            .get_mut(id)
            .ok_or_else(|| DomainError::user_not_found("id", id))?;
        user.last_login_at = at;
        Ok(())
    }
}

/// In-memory global options, administered through [`set`](Self::set).
#[derive(Default)]
pub struct InMemoryOptionsRepository {
    options: RwLock<GlobalOptions>,
}

impl InMemoryOptionsRepository {
    pub fn new(options: GlobalOptions) -> Self {
        Self {
            options: RwLock::new(options),
        }
    }

    pub async fn set(&self, options: GlobalOptions) {
        *self.options.write().await = options;
    }
}

#[async_trait]
impl GlobalOptionsRepository for InMemoryOptionsRepository {
    async fn get_options(&self) -> DomainResult<GlobalOptions> {
        Ok(self.options.read().await.clone())
    }
}
