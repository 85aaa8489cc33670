/// Storage configuration, resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
}

impl Config {
    /// `RANKINGS_DATABASE_URL` when set, otherwise a database file in the
    /// working directory.
    pub fn from_env() -> Self {
        let database_url = std::env::var("RANKINGS_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://rankings.db".to_string());
        Self { database_url }
    }
}
