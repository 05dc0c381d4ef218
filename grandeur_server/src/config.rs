use std::{env, io::Write};

use chrono::Duration;
use flutterwave_tools::FlutterwaveConfig;
use grandeur_common::{helpers::parse_boolean_flag, Secret};
use log::*;
use rand::RngCore;
use tempfile::NamedTempFile;

const DEFAULT_GRANDEUR_HOST: &str = "127.0.0.1";
const DEFAULT_GRANDEUR_PORT: u16 = 5000;
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::hours(2);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// Gateway API access (secret key, base url, redirect url, currency).
    pub flutterwave: FlutterwaveConfig,
    /// The pre-shared value the gateway sends in the `verif-hash` header of every webhook call. Requests that do not
    /// carry it are rejected before any processing.
    pub webhook_secret: Secret<String>,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_forwarded: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_GRANDEUR_HOST.to_string(),
            port: DEFAULT_GRANDEUR_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            flutterwave: FlutterwaveConfig::default(),
            webhook_secret: Secret::default(),
            use_x_forwarded_for: false,
            use_forwarded: false,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("GRANDEUR_HOST").ok().unwrap_or_else(|| DEFAULT_GRANDEUR_HOST.into());
        let port = env::var("GRANDEUR_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for GRANDEUR_PORT. {e} Using the default, \
                         {DEFAULT_GRANDEUR_PORT}, instead."
                    );
                    DEFAULT_GRANDEUR_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_GRANDEUR_PORT);
        let database_url = env::var("GRANDEUR_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ GRANDEUR_DATABASE_URL is not set. Please set it to the URL for the store database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to \
                 the default configuration."
            );
            AuthConfig::default()
        });
        let flutterwave = FlutterwaveConfig::new_from_env_or_default();
        let webhook_secret = Secret::new(env::var("GRANDEUR_FLW_WEBHOOK_SECRET").unwrap_or_else(|_| {
            error!(
                "🪛️ GRANDEUR_FLW_WEBHOOK_SECRET is not set. Incoming webhook calls cannot be authenticated and \
                 will all be rejected."
            );
            String::default()
        }));
        let use_x_forwarded_for = parse_boolean_flag(env::var("GRANDEUR_USE_X_FORWARDED_FOR").ok(), false);
        let use_forwarded = parse_boolean_flag(env::var("GRANDEUR_USE_FORWARDED").ok(), false);
        Self { host, port, database_url, auth, flutterwave, webhook_secret, use_x_forwarded_for, use_forwarded }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HS256 secret used to sign and verify access tokens.
    pub jwt_secret: Secret<String>,
    /// How long an issued token stays valid. Tokens do not refresh.
    pub token_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The JWT signing secret has not been set. I'm using a random value for this session. DO NOT \
             operate on production like this since every restart will invalidate all issued tokens. 🚨️🚨️🚨️"
        );
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let secret = bytes.iter().map(|b| format!("{b:02x}")).collect::<String>();
        match &mut tmpfile {
            Some((f, p)) => match writeln!(f, "GRANDEUR_JWT_SECRET={secret}") {
                Ok(()) => warn!(
                    "🚨️🚨️🚨️ The JWT secret for this session was written to {}. If this is a production instance, \
                     you are doing it wrong! Set the GRANDEUR_JWT_SECRET environment variable instead. 🚨️🚨️🚨️",
                    p.to_str().unwrap_or("???")
                ),
                Err(e) => warn!("🪛️ Could not write the JWT secret to the temporary file. {e}"),
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the JWT secret.");
            },
        }
        Self { jwt_secret: Secret::new(secret), token_lifetime: DEFAULT_TOKEN_LIFETIME }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, crate::errors::ServerError> {
        let secret = env::var("GRANDEUR_JWT_SECRET").map_err(|e| {
            crate::errors::ServerError::ConfigurationError(format!("{e} [GRANDEUR_JWT_SECRET]"))
        })?;
        if secret.len() < 32 {
            return Err(crate::errors::ServerError::ConfigurationError(
                "GRANDEUR_JWT_SECRET must be at least 32 characters long.".to_string(),
            ));
        }
        let token_lifetime = env::var("GRANDEUR_TOKEN_LIFETIME_HOURS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Duration::hours)
            .unwrap_or(DEFAULT_TOKEN_LIFETIME);
        Ok(Self { jwt_secret: Secret::new(secret), token_lifetime })
    }
}
