//! Bookshelf application library
//!
//! Application modules plus the bootstrap that wires them to the database and HTTP server.

pub mod bootstrap;
pub mod modules;
