/// Process configuration, read once in `main` from the environment with
/// sane defaults. There is no `DATABASE_URL` here: this service keeps
/// everything in memory and has no persistence layer to point at.
pub struct Config {
    pub bind_address: String,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "0.0.0.0:8001".to_string()),
            log_filter: std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "docstore_server=info,tower_http=info".to_string()),
        }
    }
}
