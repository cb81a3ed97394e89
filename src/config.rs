//! Application configuration loaded from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Deserializer};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP listen port. Falls back to 8000 when unset or not a valid port.
    #[serde(default = "default_port", deserialize_with = "lenient_port")]
    pub port: u16,

    /// Bind address, read from `SUM_SERVICE_HOST`. Falls back to all
    /// interfaces when unset or not an IP address.
    #[serde(
        rename = "sum_service_host",
        default = "default_host",
        deserialize_with = "lenient_host"
    )]
    pub host: IpAddr,

    /// Name reported by the health endpoint.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    // === Logging ===
    /// Log filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log output format: `text` or `json`.
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_port() -> u16 {
    8000
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_service_name() -> String {
    "sum-service".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn lenient_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_port(&raw).unwrap_or_else(default_port))
}

fn lenient_host<'de, D>(deserializer: D) -> Result<IpAddr, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_host(&raw).unwrap_or_else(default_host))
}

/// Parse a bind address. Surrounding whitespace is ignored.
pub fn parse_host(raw: &str) -> Option<IpAddr> {
    raw.trim().parse::<IpAddr>().ok()
}

/// Parse a port value. Surrounding whitespace is ignored.
pub fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Raw `PORT` value from the environment when it was present but unusable.
    ///
    /// Config loading runs before logging is set up, so the fallback is
    /// reported through this afterwards.
    pub fn ignored_port_value() -> Option<String> {
        std::env::var("PORT")
            .ok()
            .filter(|raw| parse_port(raw).is_none())
    }

    /// Raw `SUM_SERVICE_HOST` value when it was present but not an IP address.
    pub fn ignored_host_value() -> Option<String> {
        std::env::var("SUM_SERVICE_HOST")
            .ok()
            .filter(|raw| parse_host(raw).is_none())
    }

    /// Load configuration from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.service_name.trim().is_empty() {
            return Err("SERVICE_NAME must not be empty".to_string());
        }

        if !self.is_json_logging() && !self.log_format.eq_ignore_ascii_case("text") {
            return Err(format!(
                "LOG_FORMAT must be `text` or `json`, got {:?}",
                self.log_format
            ));
        }

        Ok(())
    }

    /// Socket address to bind the HTTP listener on.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether logs should be emitted as JSON.
    pub fn is_json_logging(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            service_name: default_service_name(),
            rust_log: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::from_vars(vars(&[])).unwrap();

        assert_eq!(config.port, 8000);
        assert!(config.host.is_unspecified());
        assert_eq!(config.service_name, "sum-service");
        assert_eq!(config.rust_log, "info");
        assert!(!config.is_json_logging());
    }

    #[test]
    fn port_is_read_from_environment() {
        let config = Config::from_vars(vars(&[("PORT", "9001")])).unwrap();
        assert_eq!(config.port, 9001);
        assert_eq!(config.bind_addr().port(), 9001);
    }

    #[test]
    fn unparseable_port_falls_back_to_default() {
        for raw in ["abc", "", "-1", "70000", "80.5"] {
            let config = Config::from_vars(vars(&[("PORT", raw)])).unwrap();
            assert_eq!(config.port, 8000, "PORT={raw:?}");
        }
    }

    #[test]
    fn port_tolerates_surrounding_whitespace() {
        assert_eq!(parse_port(" 8081 "), Some(8081));
        assert_eq!(parse_port("port"), None);
    }

    #[test]
    fn bind_addr_uses_all_interfaces_by_default() {
        let addr = Config::default().bind_addr();
        assert!(addr.ip().is_unspecified());
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn validate_rejects_empty_service_name() {
        let config = Config {
            service_name: "  ".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn shell_host_variable_is_ignored() {
        let config = Config::from_vars(vars(&[("HOST", "myhost"), ("PORT", "9001")])).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.bind_addr(), "0.0.0.0:9001".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn bind_host_is_namespaced_and_lenient() {
        let config = Config::from_vars(vars(&[("SUM_SERVICE_HOST", "127.0.0.1")])).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8000".parse::<SocketAddr>().unwrap());

        let config = Config::from_vars(vars(&[("SUM_SERVICE_HOST", "myhost")])).unwrap();
        assert!(config.host.is_unspecified());
        assert_eq!(parse_host(" ::1 "), Some(IpAddr::V6(std::net::Ipv6Addr::LOCALHOST)));
    }

    #[test]
    fn validate_rejects_bad_log_format() {
        let bad_format = Config {
            log_format: "xml".to_string(),
            ..Config::default()
        };
        assert!(bad_format.validate().is_err());
    }

    #[test]
    fn json_log_format_is_case_insensitive() {
        let config = Config::from_vars(vars(&[("LOG_FORMAT", "JSON")])).unwrap();
        assert!(config.is_json_logging());
        assert!(config.validate().is_ok());
    }
}
