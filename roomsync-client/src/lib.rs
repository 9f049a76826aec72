//! # roomsync-client
//!
//! HTTP access to the rooms API: membership listing, membership creation and
//! direct messages. [`RoomService`] is the trait the reconciler depends on;
//! [`RoomsClient`] implements it over `reqwest`.

pub mod client;
pub mod error;
pub mod service;

pub use client::{RoomsClient, MAX_PAGE_SIZE};
pub use error::TransportError;
pub use service::RoomService;
