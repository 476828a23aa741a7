use secrecy::SecretString;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub gateway_url: String,
    pub gateway_api_key: SecretString,
    pub questions_table: String,
    pub results_table: String,
    pub gateway_timeout_secs: u64,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            gateway_url: env::var("GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:54321".to_string()),
            gateway_api_key: SecretString::from(
                env::var("GATEWAY_API_KEY").unwrap_or_else(|_| "dev_anon_key".to_string()),
            ),
            questions_table: env::var("QUESTIONS_TABLE")
                .unwrap_or_else(|_| "questions".to_string()),
            results_table: env::var("RESULTS_TABLE")
                .unwrap_or_else(|_| "quiz_results".to_string()),
            gateway_timeout_secs: env::var("GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(10),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN").ok(),
        }
    }

    /// Validate that production-critical configuration is set.
    /// Panics if required settings are using dev defaults.
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        if self.gateway_api_key.expose_secret() == "dev_anon_key" {
            panic!(
                "FATAL: GATEWAY_API_KEY is using default value! Set GATEWAY_API_KEY environment variable to the project API key."
            );
        }

        if self.gateway_url.starts_with("http://localhost") {
            panic!(
                "FATAL: GATEWAY_URL points at localhost! Set GATEWAY_URL environment variable to the remote gateway URL."
            );
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            gateway_url: "http://localhost:54321".to_string(),
            gateway_api_key: SecretString::from("test_anon_key".to_string()),
            questions_table: "questions".to_string(),
            results_table: "quiz_results".to_string(),
            gateway_timeout_secs: 2,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            cors_allowed_origin: None,
        }
    }
}
