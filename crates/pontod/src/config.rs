use std::path::PathBuf;

use chrono_tz::Tz;

/// Acceptance threshold applied to the best-match distance.
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.45;

const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Sao_Paulo;

/// Daemon configuration, loaded from environment variables.
pub struct Config {
    /// Path to the SQLite database file.
    pub db_path: PathBuf,
    /// Maximum Euclidean distance at which a punch is accepted.
    pub match_threshold: f32,
    /// IANA timezone every punch timestamp is evaluated in.
    pub timezone: Tz,
}

impl Config {
    /// Load configuration from `PONTO_*` environment variables with defaults.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
                PathBuf::from(home).join(".local/share")
            })
            .join("ponto");

        let db_path = std::env::var("PONTO_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("ponto.db"));

        Self {
            db_path,
            match_threshold: env_threshold("PONTO_MATCH_THRESHOLD", DEFAULT_MATCH_THRESHOLD),
            timezone: env_timezone("PONTO_TIMEZONE", DEFAULT_TIMEZONE),
        }
    }
}

/// Threshold must be a finite non-negative real; anything else keeps the default.
fn env_threshold(key: &str, default: f32) -> f32 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<f32>().ok())
        .filter(|t| t.is_finite() && *t >= 0.0)
        .unwrap_or(default)
}

/// A wrong zone misdates every punch, so an unparseable name is worth a
/// warning before falling back.
fn env_timezone(key: &str, default: Tz) -> Tz {
    match std::env::var(key) {
        Ok(name) => match name.parse() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!(value = %name, "unrecognized timezone, using {default}");
                default
            }
        },
        Err(_) => default,
    }
}
