use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{NewUser, User, UserChanges};
use crate::support::DomainResult;

#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Insert a user. The first user ever stored becomes `Admin`, every
    /// later one `User`; the count and the insert must be one atomic step.
    async fn create_user(&self, new_user: NewUser) -> DomainResult<User>;

    async fn count_users(&self) -> DomainResult<u64>;
    async fn get_user_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    async fn get_user_by_id(&self, id: &str) -> DomainResult<Option<User>>;
    async fn list_admins(&self) -> DomainResult<Vec<User>>;

    async fn update_user(&self, id: &str, changes: UserChanges) -> DomainResult<Option<User>>;
    async fn touch_last_login(&self, id: &str, at: DateTime<Utc>) -> DomainResult<()>;
}
