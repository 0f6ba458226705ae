//! Keystone HTTP client
//!
//! Typed access to the console backend: the signed-in user, resource CRUD and
//! the membership rows that link users to customers, properties, projects and
//! licensings.

pub mod client;

pub use client::{ConsoleClient, ConsoleClientBuilder, error::ClientError};
