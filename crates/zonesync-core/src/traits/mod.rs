//! Core traits for zonesync
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`ZoneProvider`]: Read zones and apply plans against a provider API
//! - [`Transport`]: Perform single HTTP requests for a provider

pub mod transport;
pub mod zone_provider;

pub use transport::{Method, Transport, TransportRequest, TransportResponse};
pub use zone_provider::{ZoneProvider, ZoneProviderFactory};
