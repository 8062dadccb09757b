use dotenv::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
    pub max_connections: u32,
    /// Polling fallback interval handed to clients; the push channel only
    /// delivers new-message events, so the inbox re-fetches on this timer.
    pub inbox_refresh_secs: u64,
    /// Credentials for the admin account seeded when none exists yet.
    pub bootstrap_admin_username: String,
    pub bootstrap_admin_password: String,
    pub app_env: String,
}

impl Config {
    /// Load configuration from environment variables, reading `.env` first.
    pub fn from_env() -> Result<Self, String> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://storefront.db".to_string());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            eprintln!("WARNING: JWT_SECRET not set, using default (not secure for production!)");
            "development-only-secret".to_string()
        });

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "Invalid SERVER_PORT: must be a number between 0-65535".to_string())?;

        let max_connections = env::var("MAX_DB_CONNECTIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .map_err(|_| "Invalid MAX_DB_CONNECTIONS: must be a positive number".to_string())?;

        let inbox_refresh_secs = env::var("INBOX_REFRESH_SECS")
            .unwrap_or_else(|_| "15".to_string())
            .parse::<u64>()
            .map_err(|_| "Invalid INBOX_REFRESH_SECS: must be a positive number".to_string())?;

        let bootstrap_admin_username =
            env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string());

        let bootstrap_admin_password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
            eprintln!("WARNING: ADMIN_PASSWORD not set, using default (change it!)");
            "change-me-now".to_string()
        });

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            database_url,
            jwt_secret,
            server_host,
            server_port,
            max_connections,
            inbox_refresh_secs,
            bootstrap_admin_username,
            bootstrap_admin_password,
            app_env,
        })
    }

    /// Print the configuration, hiding secrets.
    pub fn print_info(&self) {
        println!("   Server Configuration:");
        println!("   Environment: {}", self.app_env);
        println!("   Server Address: {}:{}", self.server_host, self.server_port);
        println!("   Database: {}", Self::mask_url(&self.database_url));
        println!("   Max DB Connections: {}", self.max_connections);
        println!("   Inbox Refresh Interval: {}s", self.inbox_refresh_secs);
    }

    /// Mask credentials embedded in the database URL for logging.
    fn mask_url(url: &str) -> String {
        if let Some(at_pos) = url.find('@') {
            if let Some(scheme_end) = url.find("://") {
                let scheme = &url[..scheme_end + 3];
                let after_at = &url[at_pos..];
                return format!("{}***{}", scheme, after_at);
            }
        }
        url.to_string()
    }
}
