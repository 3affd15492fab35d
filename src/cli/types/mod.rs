//! Type-safe wrappers for Discord identifiers.

pub mod ids;

pub use ids::{GuildId, RoleId, UserId};
