use async_trait::async_trait;

use super::GlobalOptions;
use crate::support::DomainResult;

#[async_trait]
pub trait GlobalOptionsRepository: Send + Sync {
    /// Fetch the singleton, falling back to defaults when none is stored.
    async fn get_options(&self) -> DomainResult<GlobalOptions>;
}
