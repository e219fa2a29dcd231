//! Configuration for the order desk.
//!
//! Read from a TOML file whose sections all have defaults, so an empty file
//! (or no file) gives a configuration pointing at a local backend.
//! Environment variables override the file for deployment secrets.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::domain::{ListQuery, OrderItemStatus, MAX_PAGE_SIZE};
use crate::error::ConfigError;

pub const ENV_API_URL: &str = "ORDER_DESK_API_URL";
pub const ENV_API_TOKEN: &str = "ORDER_DESK_API_TOKEN";
pub const ENV_ORG_ID: &str = "ORDER_DESK_ORG_ID";

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub orders: OrdersConfig,
    pub actor: ActorConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix every endpoint path is appended to, e.g. `https://host/api/v1`.
    pub base_url: String,
    /// Bearer token sent on every request.
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Listing defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OrdersConfig {
    pub page_size: u32,
    pub default_statuses: Vec<OrderItemStatus>,
    pub organization_id: Option<String>,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            default_statuses: OrderItemStatus::open(),
            organization_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Capacity of the view actor's request channel.
    pub buffer_size: usize,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self { buffer_size: 32 }
    }
}

impl AppConfig {
    /// Loads and validates a TOML file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        content.parse()
    }

    /// Applies `ORDER_DESK_*` variables from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`, then re-validates.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|t| !t.is_empty()) {
            self.api.token = Some(token);
        }
        if let Some(org) = lookup(ENV_ORG_ID).filter(|o| !o.is_empty()) {
            self.orders.organization_id = Some(org);
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.api.base_url).map_err(|e| {
            ConfigError::Validation(format!("api.base_url {:?}: {}", self.api.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "api.base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be greater than zero".into(),
            ));
        }
        if self.orders.page_size == 0 || self.orders.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Validation(format!(
                "orders.page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.orders.page_size
            )));
        }
        if let Some(unknown) = self
            .orders
            .default_statuses
            .iter()
            .find(|s| matches!(s, OrderItemStatus::Unknown(_)))
        {
            return Err(ConfigError::Validation(format!(
                "orders.default_statuses contains unknown status {:?}",
                unknown.as_str()
            )));
        }
        if self.actor.buffer_size == 0 {
            return Err(ConfigError::Validation(
                "actor.buffer_size must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// The listing query the desk starts from.
    pub fn list_query(&self) -> ListQuery {
        ListQuery {
            statuses: self.orders.default_statuses.clone(),
            search: None,
            org_id: self.orders.organization_id.clone(),
            cursor: None,
            limit: self.orders.page_size,
        }
    }
}

impl FromStr for AppConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = "".parse().unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.list_query(), ListQuery::default());
    }

    #[test]
    fn test_sections_parse() {
        let config: AppConfig = r#"
            [api]
            base_url = "https://parts.example.com/api/v1"
            token = "secret"
            timeout_secs = 5

            [orders]
            page_size = 50
            default_statuses = ["pending", "shipped"]
            organization_id = "org-7"
        "#
        .parse()
        .unwrap();

        assert_eq!(config.api.timeout(), Duration::from_secs(5));
        let query = config.list_query();
        assert_eq!(query.limit, 50);
        assert_eq!(
            query.statuses,
            vec![OrderItemStatus::Pending, OrderItemStatus::Shipped]
        );
        assert_eq!(query.org_id.as_deref(), Some("org-7"));
        assert_eq!(config.actor.buffer_size, 32);
    }

    #[test]
    fn test_shipped_example_parses() {
        let config: AppConfig = include_str!("../config/order-desk.toml").parse().unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_page_size_bounds() {
        for size in [0, 101] {
            let result = format!("[orders]\npage_size = {}", size).parse::<AppConfig>();
            assert!(matches!(result, Err(ConfigError::Validation(_))), "size {}", size);
        }
        assert!("[orders]\npage_size = 100".parse::<AppConfig>().is_ok());
    }

    #[test]
    fn test_rejects_bad_base_url_and_statuses() {
        let bad_url = "[api]\nbase_url = \"not a url\"".parse::<AppConfig>();
        assert!(matches!(bad_url, Err(ConfigError::Validation(_))));

        let bad_scheme = "[api]\nbase_url = \"ftp://host/api\"".parse::<AppConfig>();
        assert!(matches!(bad_scheme, Err(ConfigError::Validation(_))));

        let bad_status = "[orders]\ndefault_statuses = [\"paid\"]".parse::<AppConfig>();
        assert!(matches!(bad_status, Err(ConfigError::Validation(_))));

        let bad_type = "[orders]\npage_size = \"many\"".parse::<AppConfig>();
        assert!(matches!(bad_type, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "https://staging.example.com/api/v1"),
            (ENV_API_TOKEN, "tok"),
            (ENV_ORG_ID, ""),
        ]);
        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api.base_url, "https://staging.example.com/api/v1");
        assert_eq!(config.api.token.as_deref(), Some("tok"));
        assert_eq!(config.orders.organization_id, None);
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[actor]\nbuffer_size = 8").unwrap();

        let config = AppConfig::from_file(file.path()).await.unwrap();
        assert_eq!(config.actor.buffer_size, 8);

        let missing = AppConfig::from_file("/definitely/not/here.toml").await;
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
