use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_hours: u32,
    pub host: String,
    pub port: u16,
    pub upload_dir: String,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|s| !s.is_empty());
        let required = |key: &str| {
            var(key).ok_or_else(|| anyhow::anyhow!("Missing required env var: {}", key))
        };

        let token_ttl_hours: u32 = var("TOKEN_TTL_HOURS")
            .unwrap_or_else(|| "1000".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid TOKEN_TTL_HOURS: {e}"))?;
        if token_ttl_hours == 0 {
            anyhow::bail!("TOKEN_TTL_HOURS must be greater than zero");
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            token_ttl_hours,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: var("PORT")
                .unwrap_or_else(|| "8080".into())
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid PORT: {e}"))?,
            upload_dir: var("UPLOAD_DIR").unwrap_or_else(|| "./.tmp".into()),
            bcrypt_cost: match var("BCRYPT_COST") {
                Some(v) => v
                    .parse()
                    .map_err(|e| anyhow::anyhow!("Invalid BCRYPT_COST: {e}"))?,
                None => bcrypt::DEFAULT_COST,
            },
        })
    }
}
