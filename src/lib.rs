//! vanban - official document register.
//!
//! Upload documents with their number, type, name and issue date, then
//! browse, filter and delete them from a web page or the command line.
//! Metadata for new uploads is guessed from the filename by [`extract`].

pub mod cli;
pub mod config;
pub mod extract;
pub mod listing;
pub mod models;
pub mod repository;
pub mod schema;
pub mod server;
pub mod storage;
