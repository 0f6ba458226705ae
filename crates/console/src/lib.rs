//! Keystone console: permission-aware user-details coordination
//!
//! [`view::UserDetailView`] decides which relation tabs and actions a session
//! may use and drives a [`loader::RelationTabLoader`] that fetches each tab's
//! memberships through a [`source::DataAccess`] collaborator.

pub mod commands;
pub mod error;
pub mod loader;
pub mod settings;
pub mod source;
pub mod view;

pub use error::{ConsoleError, Result};
pub use loader::{RelationTabLoader, TabUpdate};
pub use settings::ConsoleSettings;
pub use source::DataAccess;
pub use view::UserDetailView;
