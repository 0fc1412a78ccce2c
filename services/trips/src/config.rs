/// Trips service configuration loaded from environment variables.
#[derive(Debug)]
pub struct TripsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `TRIPS_PORT`.
    pub trips_port: u16,
}

impl TripsConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            trips_port: std::env::var("TRIPS_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3114),
        }
    }
}
