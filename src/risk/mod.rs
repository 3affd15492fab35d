//! College Football Risk stats API: payload types and the caching client.

pub mod http;
pub mod types;

pub use http::{RiskClient, MAX_BATCH_SIZE};
pub use types::{Mercenary, PlayerInfo, PlayerStars, RosterPlayer, Stars, Turn};
