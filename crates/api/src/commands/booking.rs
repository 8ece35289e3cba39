//! Booking commands

use slotwise_domain::{BookingRequest, Meeting, MeetingFilter, Result};
use slotwise_infra::PendingReconciliation;
use tracing::{info, warn};

use crate::utils::command_helpers::execute_command;
use crate::AppContext;

/// Reserve a slot on a public event for a guest.
pub async fn create_booking(ctx: &AppContext, request: BookingRequest) -> Result<Meeting> {
    execute_command("booking::create_booking", || async {
        let meeting = ctx.booking_service.create_booking(request).await?;
        info!(meeting_id = %meeting.id, owner_id = %meeting.owner_id, "meeting booked");
        Ok(meeting)
    })
    .await
}

pub async fn cancel_booking(ctx: &AppContext, meeting_id: &str) -> Result<Meeting> {
    execute_command("booking::cancel_booking", || async {
        ctx.booking_service.cancel_booking(meeting_id).await
    })
    .await
}

/// Meetings of an owner split by `filter`, ordered by start time.
pub async fn list_my_meetings(
    ctx: &AppContext,
    owner_id: &str,
    filter: MeetingFilter,
) -> Result<Vec<Meeting>> {
    execute_command("booking::list_my_meetings", || async {
        ctx.booking_service.list_meetings(owner_id, filter).await
    })
    .await
}

/// Unresolved local/remote divergences, oldest first.
pub async fn list_pending_reconciliations(ctx: &AppContext) -> Result<Vec<PendingReconciliation>> {
    execute_command("booking::list_pending_reconciliations", || async {
        ctx.reconciliation.pending().await
    })
    .await
}

/// Returns false when the entry was unknown or already resolved.
pub async fn resolve_reconciliation(ctx: &AppContext, id: &str) -> Result<bool> {
    execute_command("booking::resolve_reconciliation", || async {
        let resolved = ctx.reconciliation.resolve(id, ctx.clock.now()).await?;
        if !resolved {
            warn!(id, "reconciliation entry not pending");
        }
        Ok(resolved)
    })
    .await
}
