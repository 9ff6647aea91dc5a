use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    pub node_ip: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_token: Option<String>,
    /// Base request timeout in seconds.
    pub timeout: Option<u64>,
    pub no_verify_ssl: Option<bool>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

impl Settings {
    pub fn new(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut s = Config::builder();

        // An explicit path must exist, the default 'config' file is optional.
        if let Some(path) = config_path {
            if Path::new(path).exists() {
                s = s.add_source(File::with_name(path));
            } else {
                s = s.add_source(File::with_name(path).required(true));
            }
        } else {
            s = s.add_source(File::with_name("config").required(false));
        }

        // RUBRIK_CDM_NODE_IP -> node_ip, RUBRIK_CDM_API_TOKEN -> api_token, ...
        s = s.add_source(Environment::with_prefix("RUBRIK_CDM"));

        s.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if is_blank(&self.node_ip) {
            return Err("Node IP is required".to_string());
        }
        if !is_blank(&self.api_token) {
            return Ok(());
        }
        if is_blank(&self.username) {
            return Err("Username is required when no API token is set".to_string());
        }
        if is_blank(&self.password) {
            return Err("Password is required when no API token is set".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_load_from_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "node_ip = '10.0.0.5'\nusername = 'admin'\npassword = 'pw'\ntimeout = 30\nno_verify_ssl = true"
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let settings = Settings::new(Some(path)).unwrap();

        assert_eq!(settings.node_ip, Some("10.0.0.5".to_string()));
        assert_eq!(settings.username, Some("admin".to_string()));
        assert_eq!(settings.password, Some("pw".to_string()));
        assert_eq!(settings.timeout, Some(30));
        assert_eq!(settings.no_verify_ssl, Some(true));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(Settings::new(Some("/nonexistent/rubrik.toml")).is_err());
    }

    #[test]
    fn test_validation() {
        let s = Settings {
            node_ip: None,
            username: Some("u".into()),
            password: Some("p".into()),
            ..Default::default()
        };
        assert!(s.validate().is_err());

        let s = Settings {
            node_ip: Some("10.0.0.5".into()),
            username: Some("u".into()),
            password: Some(String::new()),
            ..Default::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_token_replaces_username_and_password() {
        let s = Settings {
            node_ip: Some("10.0.0.5".into()),
            api_token: Some("secret".into()),
            ..Default::default()
        };
        assert!(s.validate().is_ok());
    }
}
