//! Shared record schemas and request payloads for the ALANT Lite backend.
//!
//! Every persisted record serialises with camelCase field names, which is the
//! layout documents have in the store and the shape clients receive.

pub mod model;
pub mod requests;
