//! Client for the Discord guild REST API.
//!
//! Every call goes through [`DiscordClient::send`], which implements the
//! platform's error contract:
//!
//! - `retry_after` in an error body: wait that long and repeat the request.
//! - `message` naming a configuration problem ([`FatalKind`]): stop the run.
//! - anything else: log it and hand it back as [`StarsError::Api`].
//!
//! Writes additionally honor the `x-ratelimit-*` bucket headers: when the
//! bucket is empty after a response, the call waits out the reset window
//! before returning so the next write is not rejected.

use std::sync::Arc;

use reqwest::{header::HeaderMap, Client, Method};
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use crate::{
    cli::types::{GuildId, RoleId, UserId},
    config::Settings,
    core::{
        build_client,
        http::{bot_auth_headers, header_f64, seconds},
        AppendList, Sleeper, TokioSleeper,
    },
    error::{FatalKind, StarsError},
    Result,
};

use super::types::{DiscordUser, ErrorBody, GuildMember, Role};


/// Page size for the member list; also the largest page Discord allows.
pub const MEMBERS_PAGE_LIMIT: usize = 1000;
pub const RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const RATELIMIT_RESET_AFTER: &str = "x-ratelimit-reset-after";

/// Permission bits requested by the authorization link (Manage Nicknames).
pub const MANAGE_NICKNAMES: u64 = 134_217_728;

pub struct DiscordClient {
    http: Client,
    base_url: String,
    headers: HeaderMap,
    guild_id: GuildId,
    max_retries: Option<u32>,
    sleeper: Arc<dyn Sleeper>,
    bot_id: OnceCell<UserId>,
    members: OnceCell<AppendList<GuildMember>>,
    roles: OnceCell<Vec<Role>>,
}

impl DiscordClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        bot_token: &str,
        guild_id: GuildId,
    ) -> Result<Self> {
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headers: bot_auth_headers(bot_token)?,
            guild_id,
            max_retries: None,
            sleeper: Arc::new(TokioSleeper),
            bot_id: OnceCell::new(),
            members: OnceCell::new(),
            roles: OnceCell::new(),
        })
    }

    /// Client for the production guild when `prod`, else the test guild.
    pub fn from_settings(settings: &Settings, prod: bool) -> Result<Self> {
        let http = build_client(settings.request_timeout)?;
        Ok(Self::new(
            http,
            &settings.discord_base_url,
            &settings.secrets.bot_token,
            settings.guild_id(prod).clone(),
        )?
        .with_max_retries(settings.max_retries))
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Cap on consecutive rate-limited retries of one request. `None` never
    /// gives up.
    pub fn with_max_retries(mut self, max_retries: Option<u32>) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn guild_id(&self) -> &GuildId {
        &self.guild_id
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let is_write = method != Method::GET;
        let mut rate_limited: u32 = 0;

        loop {
            debug!(%method, %url, "Discord request");
            let mut request = self
                .http
                .request(method.clone(), &url)
                .headers(self.headers.clone())
                .query(query);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let payload = parse_body(&response.text().await?);

            if status.is_success() {
                if is_write {
                    self.respect_bucket(&headers).await;
                }
                return Ok(payload);
            }

            let error_body: ErrorBody = serde_json::from_value(payload.clone()).unwrap_or_default();

            if let Some(retry_after) = error_body.retry_after {
                rate_limited += 1;
                if let Some(max) = self.max_retries {
                    if rate_limited > max {
                        return Err(StarsError::RetriesExhausted {
                            attempts: rate_limited,
                        });
                    }
                }
                warn!(
                    %method,
                    %url,
                    retry_after,
                    attempt = rate_limited,
                    "Rate limited by Discord; retrying"
                );
                self.sleeper.sleep(seconds(retry_after)).await;
                continue;
            }

            if let Some(kind) = error_body
                .message
                .as_deref()
                .and_then(FatalKind::from_message)
            {
                error!(%kind, "{}", kind.remedy());
                return Err(StarsError::Fatal { kind });
            }

            warn!(%method, %url, %status, body = %payload, "Discord API error");
            if is_write {
                self.respect_bucket(&headers).await;
            }
            return Err(StarsError::Api {
                status,
                body: payload,
            });
        }
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        self.send(Method::GET, path, query, None).await
    }

    /// Wait out the reset window when the write bucket is empty.
    async fn respect_bucket(&self, headers: &HeaderMap) {
        let remaining = header_f64(headers, RATELIMIT_REMAINING);
        if remaining.is_some_and(|r| r <= 0.0) {
            let reset_after = header_f64(headers, RATELIMIT_RESET_AFTER).unwrap_or(0.0);
            info!(reset_after, "Rate limit bucket empty; waiting");
            self.sleeper.sleep(seconds(reset_after)).await;
        }
    }

    /// Id of the bot account the token belongs to.
    pub async fn bot_id(&self) -> Result<&UserId> {
        self.bot_id
            .get_or_try_init(|| async {
                let me: DiscordUser = serde_json::from_value(self.get("/users/@me", &[]).await?)?;
                Ok::<_, StarsError>(me.id)
            })
            .await
    }

    async fn member_cache(&self) -> Result<&AppendList<GuildMember>> {
        self.members
            .get_or_try_init(|| async {
                let members = self.fetch_all_members().await?;
                Ok::<_, StarsError>(AppendList::new(members))
            })
            .await
    }

    async fn fetch_all_members(&self) -> Result<Vec<GuildMember>> {
        let path = format!("/guilds/{}/members", self.guild_id);
        let mut after = "0".to_string();
        let mut members = Vec::new();

        loop {
            let query = [
                ("limit", MEMBERS_PAGE_LIMIT.to_string()),
                ("after", after.clone()),
            ];
            let page: Vec<GuildMember> = serde_json::from_value(self.get(&path, &query).await?)?;
            let full_page = page.len() == MEMBERS_PAGE_LIMIT;
            if let Some(last) = page.last() {
                after = last.id().to_string();
            }
            members.extend(page);

            if !full_page {
                break;
            }
        }

        info!(count = members.len(), guild = %self.guild_id, "Fetched guild members");
        Ok(members)
    }

    /// Every member of the guild, following the `after` cursor to the end.
    pub async fn guild_members(&self) -> Result<Vec<GuildMember>> {
        Ok(self.member_cache().await?.to_vec())
    }

    pub async fn guild_member_ids(&self) -> Result<Vec<UserId>> {
        Ok(self
            .guild_members()
            .await?
            .into_iter()
            .map(|m| m.user.id)
            .collect())
    }

    /// One member by id, fetching it directly if the list doesn't have it.
    ///
    /// Only payloads that contain a `user` object are cached; an error
    /// response yields `None`.
    pub async fn guild_member(&self, id: &UserId) -> Result<Option<GuildMember>> {
        let cache = self.member_cache().await?;
        if let Some(member) = cache.find(|m| m.id() == id) {
            return Ok(Some(member));
        }

        let path = format!("/guilds/{}/members/{}", self.guild_id, id);
        let body = match self.get(&path, &[]).await {
            Ok(body) => body,
            Err(StarsError::Api { status, .. }) => {
                debug!(%id, %status, "Guild member lookup failed");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if !body.get("user").is_some_and(Value::is_object) {
            return Ok(None);
        }

        let member: GuildMember = serde_json::from_value(body)?;
        cache.push(member.clone());
        Ok(Some(member))
    }

    pub async fn guild_roles(&self) -> Result<&[Role]> {
        self.roles
            .get_or_try_init(|| async {
                let path = format!("/guilds/{}/roles", self.guild_id);
                let roles: Vec<Role> = serde_json::from_value(self.get(&path, &[]).await?)?;
                Ok::<_, StarsError>(roles)
            })
            .await
            .map(Vec::as_slice)
    }

    /// Id of the role named `name` (case-insensitive).
    pub async fn role_id_by_name(&self, name: &str) -> Result<RoleId> {
        self.guild_roles()
            .await?
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
            .map(|r| r.id.clone())
            .ok_or_else(|| StarsError::RoleNotFound {
                name: name.to_string(),
            })
    }

    /// Change a member's nickname in the guild.
    pub async fn set_nickname(&self, id: &UserId, nickname: &str) -> Result<()> {
        info!("Setting nickname of {} to \"{}\"", id, nickname);
        let path = format!("/guilds/{}/members/{}", self.guild_id, id);
        let body = json!({ "nick": nickname });
        self.send(Method::PATCH, &path, &[], Some(&body)).await?;
        Ok(())
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Link an admin opens to add the bot to `guild_id` with nickname rights.
pub fn authorize_url(base_url: &str, client_id: &str, guild_id: &GuildId) -> String {
    format!(
        "{}/oauth2/authorize?client_id={}&scope=bot&permissions={}&guild_id={}&disable_guild_select=true",
        base_url.trim_end_matches('/'),
        client_id,
        MANAGE_NICKNAMES,
        guild_id
    )
}
