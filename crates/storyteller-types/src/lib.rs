//! Types shared by the storyteller crates.
//!
//! `api` holds the request/response shapes seen on the wire, `models` the
//! records passed between the generator, the database layer and the handlers.
pub mod api;
pub mod models;
