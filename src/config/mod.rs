use std::env;
use std::str::FromStr;

/// Which report family a service process mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deployment {
    /// Revised drawing reports over `status_revised_drawing`.
    Drawing,
    /// Design change reports over `request_design_change`.
    DesignChange,
    #[default]
    Combined,
}

impl Deployment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drawing => "drawing",
            Self::DesignChange => "design-change",
            Self::Combined => "combined",
        }
    }

    pub fn serves_drawing(self) -> bool {
        matches!(self, Self::Drawing | Self::Combined)
    }

    pub fn serves_design_change(self) -> bool {
        matches!(self, Self::DesignChange | Self::Combined)
    }
}

impl FromStr for Deployment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drawing" => Ok(Self::Drawing),
            "design-change" | "design_change" => Ok(Self::DesignChange),
            "combined" | "all" => Ok(Self::Combined),
            other => Err(format!("unknown deployment: {other}")),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout_secs: u64,
    pub host: String,
    pub port: u16,
    pub deployment: Deployment,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        let deployment = match env::var("DASHBOARD_DEPLOYMENT") {
            Ok(raw) => raw.parse().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "Falling back to combined deployment");
                Deployment::Combined
            }),
            Err(_) => Deployment::default(),
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            database_acquire_timeout_secs: env::var("DATABASE_ACQUIRE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3030".to_string())
                .parse()
                .unwrap_or(3030),
            deployment,
        })
    }
}

/// Dashboard client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("DASHBOARD_API_URL")
                .unwrap_or_else(|_| "http://localhost:3030".to_string()),
        }
    }
}
