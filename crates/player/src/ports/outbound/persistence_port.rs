//! Persistence Port - records a finished play-through.

use async_trait::async_trait;
use mindgrowth_shared::SaveRequest;

use super::ApiError;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PersistencePort: Send + Sync {
    async fn save(&self, request: SaveRequest) -> Result<(), ApiError>;
}
