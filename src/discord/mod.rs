//! Discord guild API: payload types and the rate-limit-aware client.

pub mod http;
pub mod types;

pub use http::{authorize_url, DiscordClient, MEMBERS_PAGE_LIMIT};
pub use types::{DiscordUser, GuildMember, Role};
