use std::env;

/// Number of file buttons per listing page.
pub const FILES_PER_PAGE: usize = 5;

/// Maximum number of buttons returned by a search.
pub const SEARCH_RESULT_LIMIT: usize = 50;

/// Runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot API credential. The only value that is fatal when missing.
    pub api_token: String,

    /// Administrator user id. Zero disables admin forwarding and approval.
    pub admin_id: i64,

    /// Shared PIN granting access to special files.
    pub special_pin: String,

    /// Database connection string.
    pub database_url: String,

    /// Seconds a delivered document stays before auto-deletion.
    pub delete_delay: u64,

    /// Port for the liveness status page.
    pub status_port: u16,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            admin_id: 0,
            special_pin: "2762".to_string(),
            database_url: "sqlite:bookdrop.db?mode=rwc".to_string(),
            delete_delay: 60,
            status_port: 8080,
        }
    }
}

impl BotConfig {
    /// Load configuration from environment variables.
    ///
    /// Fails only when `API_TOKEN` is absent; everything else falls back to
    /// defaults. An unset `ADMIN_ID` leaves admin routing disabled.
    pub fn from_env() -> anyhow::Result<Self> {
        let default = Self::default();

        let api_token = env::var("API_TOKEN")
            .map_err(|_| anyhow::anyhow!("API_TOKEN must be set"))?;

        Ok(Self {
            api_token,

            admin_id: env::var("ADMIN_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.admin_id),

            special_pin: env::var("SPECIAL_PIN").unwrap_or(default.special_pin),

            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            delete_delay: env::var("DELETE_DELAY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.delete_delay),

            status_port: env::var("STATUS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.status_port),
        })
    }

    /// Whether an administrator chat is configured.
    pub fn has_admin(&self) -> bool {
        self.admin_id != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BotConfig::default();
        assert_eq!(config.special_pin, "2762");
        assert_eq!(config.delete_delay, 60);
        assert_eq!(config.status_port, 8080);
        assert!(!config.has_admin());
    }

    #[test]
    fn test_admin_detection() {
        let config = BotConfig {
            admin_id: 42,
            ..BotConfig::default()
        };
        assert!(config.has_admin());
    }
}
