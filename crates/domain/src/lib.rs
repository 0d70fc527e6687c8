//! Domain layer for the probe dashboard.
//!
//! This crate contains the records exchanged with the sniffer backend
//! (devices, sightings, identities, fingerprints, statistics), the request
//! bodies and query parameters for its endpoints, and the dashboard filter
//! types.

pub mod models;
