use rocket::figment::providers::Env;
use rocket::figment::Figment;
use serde::Deserialize;
use std::path::PathBuf;

/// Rocket's usual sources (`Rocket.toml`, `ROCKET_*`) plus the bare variables
/// hosting platforms set: `PORT`, `SHEET_ID`, `SHEET_NAME`.
pub fn figment() -> Figment {
    rocket::Config::figment().merge(Env::raw().only(&["port", "sheet_id", "sheet_name"]))
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub sheet_id: String,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub relay: String,
    pub username: String,
    /// Falls back to `SMTP_PASSWORD` when absent.
    #[serde(default)]
    pub password: Option<String>,
    pub from: String,
    pub to: String,
}

fn default_sheet_name() -> String {
    "Arkusz1".to_string()
}

fn default_credentials_file() -> PathBuf {
    PathBuf::from("credentials.json")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}
