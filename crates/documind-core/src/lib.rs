//! Client library for the DocuMind document chat service.
//!
//! [`client::ApiClient`] talks to the service and owns a [`session::Session`];
//! [`workspace`] holds the local, partly simulated state behind the
//! documents, chat and dashboard views.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod session;
pub mod workspace;
