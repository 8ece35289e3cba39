//! Availability commands

use slotwise_domain::{AvailabilityUpdate, EventAvailability, Result, WeeklyAvailability};
use tracing::info;

use crate::utils::command_helpers::execute_command;
use crate::AppContext;

/// Public seven-day slot view for a bookable event.
pub async fn get_event_availability(ctx: &AppContext, event_id: &str) -> Result<EventAvailability> {
    execute_command("availability::get_event_availability", || async {
        ctx.availability_service.event_availability(event_id).await
    })
    .await
}

/// The caller's own weekly schedule.
pub async fn get_my_availability(ctx: &AppContext, owner_id: &str) -> Result<WeeklyAvailability> {
    execute_command("availability::get_my_availability", || async {
        ctx.availability_service.owner_availability(owner_id).await
    })
    .await
}

pub async fn update_my_availability(
    ctx: &AppContext,
    owner_id: &str,
    update: AvailabilityUpdate,
) -> Result<WeeklyAvailability> {
    execute_command("availability::update_my_availability", || async {
        ctx.availability_service.update_availability(owner_id, update).await
    })
    .await
}

/// Registration hook: store Mon-Fri 09:00-17:00 with a 30 minute gap.
pub async fn provision_default_availability(
    ctx: &AppContext,
    owner_id: &str,
) -> Result<WeeklyAvailability> {
    execute_command("availability::provision_default_availability", || async {
        let availability = ctx.availability_service.provision_defaults(owner_id).await?;
        info!(owner_id, "default availability provisioned");
        Ok(availability)
    })
    .await
}
