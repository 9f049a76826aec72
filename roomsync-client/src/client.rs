//! Rooms API HTTP client (reqwest-based).
//!
//! | Operation            | Request                                      |
//! |----------------------|----------------------------------------------|
//! | list memberships     | `GET  {base}/memberships?roomId=..&max=1000` |
//! | create membership    | `POST {base}/memberships`                    |
//! | create message       | `POST {base}/messages`                       |
//!
//! Every request carries `Authorization: Bearer <token>`. No request is
//! retried and membership listing never follows pagination links.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use roomsync_core::{Member, PersonId, RoomId, SyncConfig};

use crate::error::TransportError;
use crate::service::RoomService;

/// Upper bound on members returned by one membership listing.
///
/// Rooms with more members than this are only partially synced.
pub const MAX_PAGE_SIZE: usize = 1000;

#[derive(Debug, Deserialize)]
struct MembershipList {
    #[serde(default)]
    items: Vec<Member>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateMembership<'a> {
    room_id: &'a str,
    person_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateMessage<'a> {
    to_person_email: &'a str,
    markdown: &'a str,
}

/// Rooms API client holding the read-only access credential.
#[derive(Clone)]
pub struct RoomsClient {
    /// Base URL without a trailing slash, e.g. `https://webexapis.com/v1`.
    base_url: String,
    access_token: String,
    http_client: Client,
}

impl std::fmt::Debug for RoomsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomsClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RoomsClient {
    /// Create a client. `timeout` of `None` leaves requests unbounded.
    pub fn new(
        base_url: &str,
        access_token: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(concat!(
            "roomsync/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().map_err(|e| {
            TransportError::InvalidConfig(format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self::with_http_client(base_url, access_token, http_client))
    }

    /// Create a client from resolved run configuration.
    pub fn from_config(config: &SyncConfig) -> Result<Self, TransportError> {
        Self::new(&config.api_base, &config.access_token, config.timeout)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_http_client(base_url: &str, access_token: &str, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn check(response: Response) -> Result<Response, TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                debug!(status = status.as_u16(), error = %err, "failed to read error body");
                String::new()
            }
        };
        Err(TransportError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RoomService for RoomsClient {
    async fn list_memberships(&self, room: &RoomId) -> Result<Vec<Member>, TransportError> {
        let url = format!("{}/memberships", self.base_url);
        let max = MAX_PAGE_SIZE.to_string();
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("roomId", room.0.as_str()), ("max", max.as_str())])
            .send()
            .await?;
        let response = Self::check(response).await?;
        let list: MembershipList = response.json().await?;

        if list.items.len() >= MAX_PAGE_SIZE {
            warn!(
                room = %room,
                members = list.items.len(),
                "membership page is full; members beyond the first page are not synced",
            );
        }
        debug!(room = %room, members = list.items.len(), "fetched roster");
        Ok(list.items)
    }

    async fn create_membership(
        &self,
        room: &RoomId,
        person: &PersonId,
    ) -> Result<(), TransportError> {
        let url = format!("{}/memberships", self.base_url);
        let body = CreateMembership {
            room_id: &room.0,
            person_id: &person.0,
        };
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        debug!(room = %room, person_id = %person, "membership created");
        Ok(())
    }

    async fn create_message(
        &self,
        to_person_email: &str,
        markdown: &str,
    ) -> Result<(), TransportError> {
        let url = format!("{}/messages", self.base_url);
        let body = CreateMessage {
            to_person_email,
            markdown,
        };
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
