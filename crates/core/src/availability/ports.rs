//! Port interface for weekly availability storage

use async_trait::async_trait;
use slotwise_domain::{Result, WeeklyAvailability};

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// `None` when the owner never configured a schedule.
    async fn get_weekly_availability(&self, owner_id: &str) -> Result<Option<WeeklyAvailability>>;

    /// Delete and reinsert every rule for the owner as one unit.
    async fn replace_weekly_availability(&self, availability: &WeeklyAvailability) -> Result<()>;
}
