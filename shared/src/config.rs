use anyhow::Result;

pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let database = DatabaseConfig {
            host: env_or("DATABASE_HOST", "localhost"),
            port: env_or("DATABASE_PORT", "5432").parse()?,
            username: env_or("DATABASE_USERNAME", "app"),
            password: env_or("DATABASE_PASSWORD", "passwd"),
            database: env_or("DATABASE_NAME", "app"),
        };
        let server = ServerConfig {
            port: env_or("PORT", "8080").parse()?,
        };
        Ok(Self { database, server })
    }
}

pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

pub struct ServerConfig {
    pub port: u16,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}
