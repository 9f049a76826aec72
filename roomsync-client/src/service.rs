//! The seam between reconciliation logic and the remote rooms API.

use async_trait::async_trait;

use roomsync_core::{Member, PersonId, RoomId};

use crate::error::TransportError;

/// Operations the reconciler needs from the rooms service.
///
/// [`RoomsClient`](crate::RoomsClient) is the HTTP implementation; tests
/// substitute in-memory fakes.
#[async_trait]
pub trait RoomService: Send + Sync {
    /// Fetch the member list of `room` in a single bounded request.
    async fn list_memberships(&self, room: &RoomId) -> Result<Vec<Member>, TransportError>;

    /// Add `person` to `room`. The service rejects existing members.
    async fn create_membership(
        &self,
        room: &RoomId,
        person: &PersonId,
    ) -> Result<(), TransportError>;

    /// Send a direct Markdown message to `to_person_email`.
    async fn create_message(
        &self,
        to_person_email: &str,
        markdown: &str,
    ) -> Result<(), TransportError>;
}
