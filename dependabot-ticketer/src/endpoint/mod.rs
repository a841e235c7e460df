//! Jira gateway resolution.
//!
//! Jira Cloud can be addressed either directly through the site
//! (`https://<site>.atlassian.net/rest/api/3/...`) or through the Atlassian API
//! gateway using the site's cloud id
//! (`https://api.atlassian.com/ex/jira/<cloud-id>/rest/api/3/...`). The rest of
//! the crate only deals in logical paths such as `/issue`; [`Endpoint`] turns
//! them into request URLs.

use crate::config::ConfigError;
use tracing::debug;

/// Fixed REST API version prefix shared by both gateway shapes.
pub const API_PREFIX: &str = "/rest/api/3";

/// Which gateway shape is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMode {
    /// Direct site API.
    Site,
    /// Cloud-id proxy gateway.
    Proxy,
}

impl GatewayMode {
    /// Parses an explicit mode override.
    ///
    /// Empty and `auto` values mean "no override".
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for anything else.
    pub fn parse_override(value: Option<&str>) -> Result<Option<Self>, ConfigError> {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(None);
        };
        match value.to_ascii_lowercase().as_str() {
            "site" => Ok(Some(Self::Site)),
            "proxy" => Ok(Some(Self::Proxy)),
            "auto" => Ok(None),
            other => Err(ConfigError::InvalidValue {
                variable: "JIRA_MODE",
                message: format!("expected 'site', 'proxy' or 'auto', got '{other}'"),
            }),
        }
    }

    /// Returns the mode name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Proxy => "proxy",
        }
    }
}

/// Inputs for endpoint resolution.
#[derive(Debug, Clone, Default)]
pub struct EndpointSettings<'a> {
    /// Site root, e.g. `https://acme.atlassian.net`.
    pub site_url: Option<&'a str>,
    /// Gateway root, e.g. `https://api.atlassian.com`.
    pub gateway_url: Option<&'a str>,
    /// Cloud id used by the gateway.
    pub cloud_id: Option<&'a str>,
    /// Explicit mode override.
    pub mode: Option<GatewayMode>,
}

/// A resolved Jira REST endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Direct site API.
    Site {
        /// Site root without trailing slash.
        host: String,
    },
    /// Gateway addressed by cloud id.
    Proxy {
        /// Gateway root without trailing slash.
        host: String,
        /// Cloud id path segment.
        cloud_id: String,
    },
}

impl Endpoint {
    /// Selects a gateway shape from configuration.
    ///
    /// 1. An explicit override wins.
    /// 2. Gateway root plus cloud id selects proxy mode.
    /// 3. A site root selects site mode.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the chosen (or any) mode lacks its inputs.
    pub fn resolve(settings: &EndpointSettings<'_>) -> Result<Self, ConfigError> {
        let site = non_empty(settings.site_url);
        let gateway = non_empty(settings.gateway_url);
        let cloud_id = non_empty(settings.cloud_id);

        let endpoint = match settings.mode {
            Some(GatewayMode::Proxy) => Self::proxy(
                gateway.ok_or(ConfigError::Missing {
                    variable: "JIRA_GATEWAY_URL",
                })?,
                cloud_id.ok_or(ConfigError::Missing {
                    variable: "JIRA_CLOUD_ID",
                })?,
            ),
            Some(GatewayMode::Site) => Self::site(site.ok_or(ConfigError::Missing {
                variable: "JIRA_BASE_URL",
            })?),
            None => match (gateway, cloud_id, site) {
                (Some(gateway), Some(cloud_id), _) => Self::proxy(gateway, cloud_id),
                (_, _, Some(site)) => Self::site(site),
                _ => return Err(ConfigError::EndpointUnresolved),
            },
        };

        debug!(mode = endpoint.mode().as_str(), "Resolved Jira endpoint");
        Ok(endpoint)
    }

    fn site(host: &str) -> Self {
        Self::Site {
            host: host.trim_end_matches('/').to_string(),
        }
    }

    fn proxy(host: &str, cloud_id: &str) -> Self {
        Self::Proxy {
            host: host.trim_end_matches('/').to_string(),
            cloud_id: cloud_id.trim_matches('/').to_string(),
        }
    }

    /// Returns the active gateway mode.
    #[must_use]
    pub fn mode(&self) -> GatewayMode {
        match self {
            Self::Site { .. } => GatewayMode::Site,
            Self::Proxy { .. } => GatewayMode::Proxy,
        }
    }

    /// Maps a logical resource path (e.g. `/issue`) to the physical request path.
    #[must_use]
    pub fn path(&self, logical: &str) -> String {
        let logical = logical.trim_start_matches('/');
        match self {
            Self::Site { .. } => format!("{API_PREFIX}/{logical}"),
            Self::Proxy { cloud_id, .. } => format!("/ex/jira/{cloud_id}{API_PREFIX}/{logical}"),
        }
    }

    /// Returns the absolute URL for a logical resource path.
    #[must_use]
    pub fn url(&self, logical: &str) -> String {
        let host = match self {
            Self::Site { host } | Self::Proxy { host, .. } => host,
        };
        format!("{host}{}", self.path(logical))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
