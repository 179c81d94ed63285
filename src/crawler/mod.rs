//! Network access to the timetable host
//!
//! This module owns everything that talks to the upstream site: the shared
//! browser identity, the retrying connection manager, and the entity
//! directory built from the index pages.

pub mod directory;
pub mod fetcher;
pub mod headers;

pub use directory::{build_directory, EntityLinks, LinkDirectory};
pub use fetcher::{
    decode_body, status_description, ConnectionManager, HttpTransport, PingReport, RawResponse,
    Transport, TransportError,
};
pub use headers::{Identity, USER_AGENTS};
