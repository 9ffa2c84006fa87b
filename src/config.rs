use serde::Deserialize;

/// Which resolution flow this deployment runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionFlow {
    /// Enumerate political divisions for the address, then query the
    /// directory once per state-tier division.
    DivisionEnumeration,
    /// Geocode the address once and issue a single coordinate query.
    PointQuery,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub resolution_flow: ResolutionFlow,
    pub google_civic_base_url: String,
    pub google_maps_base_url: String,
    pub openstates_base_url: String,
    /// Credential-provider parameter paths for each collaborator key.
    pub google_civic_key_param: String,
    pub google_maps_key_param: String,
    pub openstates_key_param: String,
    /// Request timeout for the divisions and directory collaborators.
    pub directory_timeout_secs: u64,
    /// Request timeout for geocoding.
    pub geocode_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            resolution_flow: match std::env::var("RESOLUTION_FLOW")
                .unwrap_or_else(|_| "divisions".to_string())
                .as_str()
            {
                "divisions" => ResolutionFlow::DivisionEnumeration,
                "geo" => ResolutionFlow::PointQuery,
                other => anyhow::bail!(
                    "RESOLUTION_FLOW must be 'divisions' or 'geo' (got '{}')",
                    other
                ),
            },
            google_civic_base_url: base_url_from_env(
                "GOOGLE_CIVIC_BASE_URL",
                "https://www.googleapis.com/civicinfo/v2",
            )?,
            google_maps_base_url: base_url_from_env(
                "GOOGLE_MAPS_BASE_URL",
                "https://maps.googleapis.com",
            )?,
            openstates_base_url: base_url_from_env(
                "OPENSTATES_BASE_URL",
                "https://v3.openstates.org",
            )?,
            google_civic_key_param: param_from_env(
                "GOOGLE_CIVIC_KEY_PARAM",
                "/represent-app/google-civic-api-key",
            )?,
            google_maps_key_param: param_from_env(
                "GOOGLE_MAPS_KEY_PARAM",
                "/represent-app/google-maps-api-key",
            )?,
            openstates_key_param: param_from_env(
                "OPENSTATES_KEY_PARAM",
                "/represent-app/openstates-api-key",
            )?,
            directory_timeout_secs: timeout_from_env("DIRECTORY_TIMEOUT_SECS", 10)?,
            geocode_timeout_secs: timeout_from_env("GEOCODE_TIMEOUT_SECS", 5)?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Resolution flow: {:?}", config.resolution_flow);
        tracing::debug!("Google Civic Base URL: {}", config.google_civic_base_url);
        tracing::debug!("Google Maps Base URL: {}", config.google_maps_base_url);
        tracing::debug!("OpenStates Base URL: {}", config.openstates_base_url);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

fn base_url_from_env(name: &str, default: &str) -> anyhow::Result<String> {
    let url = std::env::var(name).unwrap_or_else(|_| default.to_string());
    if url.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", name);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", name);
    }
    Ok(url.trim_end_matches('/').to_string())
}

fn param_from_env(name: &str, default: &str) -> anyhow::Result<String> {
    let param = std::env::var(name).unwrap_or_else(|_| default.to_string());
    if param.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", name);
    }
    Ok(param)
}

fn timeout_from_env(name: &str, default: u64) -> anyhow::Result<u64> {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| anyhow::anyhow!("{} must be a positive number of seconds", name)),
        Err(_) => Ok(default),
    }
}
