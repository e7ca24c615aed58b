use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub credentials: Credentials,
    #[serde(default)]
    pub session: Session,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Api {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub backend: String, // "explicit" or "transport"
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct Session {
    #[serde(default = "default_login_route")]
    pub login_route: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            login_route: default_login_route(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_login_route() -> String {
    "/login".to_string()
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "http://localhost:9000/api"
timeout_secs = 5

[credentials]
backend = "transport"
path = "creds.json"

[session]
login_route = "/signin"

[log]
filter = "debug"
"#,
        )
        .unwrap();

        let settings = parse_settings(path.to_str()).unwrap();
        assert_eq!(settings.api.base_url, "http://localhost:9000/api");
        assert_eq!(settings.api.timeout_secs, 5);
        assert_eq!(settings.credentials.backend, "transport");
        assert_eq!(settings.session.login_route, "/signin");
    }

    #[test]
    fn optional_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minimal.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "http://localhost:9000/api"

[credentials]
backend = "explicit"
path = "creds.json"

[log]
filter = "info"
"#,
        )
        .unwrap();

        let settings = parse_settings(path.to_str()).unwrap();
        assert_eq!(settings.api.timeout_secs, 30);
        assert_eq!(settings.session.login_route, "/login");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_settings(Some("does/not/exist.toml")).is_err());
    }
}
