use serde::Deserialize;
use std::fmt;
use std::path::Path;
use time::macros::format_description;
use time::UtcOffset;
use tokio::fs;

/// Clés d'environnement obligatoires (connexion base)
pub const REQUIRED_ENV_VARS: [&str; 3] = ["DB_HOST", "DB_PASSWORD", "DB_USERNAME"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("A configuration key is missing: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct KernelConfig {
    pub http: HttpConf,
    pub database: DatabaseConf,
    pub dashboard: DashboardConf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConf {
    pub port: u16,
}

#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConf {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub name: String,
}

// jamais de mot de passe dans les logs
impl fmt::Debug for DatabaseConf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConf")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConf {
    /// Service jamais affiché (service_id 3 par convention)
    pub excluded_service_id: i64,
    /// Décalage horaire des dates absolues de l'historique
    pub utc_offset: UtcOffset,
}

/// Contenu optionnel de vigie.yaml (tout est surchargeable par l'environnement)
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub http: FileHttp,
    pub database: FileDatabase,
    pub dashboard: FileDashboard,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileHttp {
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileDatabase {
    pub name: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileDashboard {
    pub excluded_service_id: Option<i64>,
    pub utc_offset: Option<String>,
}

pub const DEFAULT_HTTP_PORT: u16 = 3000;
pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_DB_NAME: &str = "centreon_storage";
pub const DEFAULT_EXCLUDED_SERVICE_ID: i64 = 3;

/// Charge vigie.yaml (optionnel) puis applique les variables d'environnement.
/// Le `.env` doit déjà avoir été chargé par l'appelant (dotenvy).
pub async fn load_config() -> Result<KernelConfig, ConfigError> {
    let path = std::env::var("VIGIE_KERNEL_CONFIG").unwrap_or_else(|_| "vigie.yaml".into());
    let file = read_file_config(&path).await?;
    KernelConfig::resolve(file, |key| std::env::var(key).ok())
}

pub async fn read_file_config<P: AsRef<Path>>(path: P) -> Result<FileConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!("no {} found, using environment only", path.display());
        return Ok(FileConfig::default());
    }
    let txt = fs::read_to_string(path).await?;
    if txt.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    Ok(serde_yaml::from_str(&txt)?)
}

impl KernelConfig {
    /// Fusionne fichier + environnement, l'environnement gagne
    pub fn resolve<F>(file: FileConfig, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| var(key).ok_or(ConfigError::Missing(key));

        for key in REQUIRED_ENV_VARS {
            required(key)?;
        }

        let http_port = match var("PORT") {
            Some(raw) => parse_number("PORT", &raw)?,
            None => file.http.port.unwrap_or(DEFAULT_HTTP_PORT),
        };
        let db_port = match var("DB_PORT") {
            Some(raw) => parse_number("DB_PORT", &raw)?,
            None => file.database.port.unwrap_or(DEFAULT_DB_PORT),
        };
        let excluded_service_id = match var("EXCLUDED_SERVICE_ID") {
            Some(raw) => parse_number("EXCLUDED_SERVICE_ID", &raw)?,
            None => file
                .dashboard
                .excluded_service_id
                .unwrap_or(DEFAULT_EXCLUDED_SERVICE_ID),
        };
        let utc_offset = match var("DISPLAY_UTC_OFFSET").or(file.dashboard.utc_offset) {
            Some(raw) => parse_offset(&raw)?,
            None => UtcOffset::UTC,
        };

        Ok(Self {
            http: HttpConf { port: http_port },
            database: DatabaseConf {
                host: required("DB_HOST")?,
                port: db_port,
                username: required("DB_USERNAME")?,
                password: required("DB_PASSWORD")?,
                name: var("DB_NAME")
                    .or(file.database.name)
                    .unwrap_or_else(|| DEFAULT_DB_NAME.into()),
            },
            dashboard: DashboardConf {
                excluded_service_id,
                utc_offset,
            },
        })
    }
}

fn parse_number<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

/// "+02:00", "-05:30", "UTC" ou "Z"
pub fn parse_offset(raw: &str) -> Result<UtcOffset, ConfigError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("utc") || raw == "Z" {
        return Ok(UtcOffset::UTC);
    }
    UtcOffset::parse(
        raw,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .map_err(|e| ConfigError::Invalid {
        key: "DISPLAY_UTC_OFFSET",
        reason: e.to_string(),
    })
}
