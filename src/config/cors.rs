use serde::Deserialize;

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API (`["*"]` allows any origin)
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Whether any origin is accepted
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }

    /// Validate CORS configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.allowed_origins.is_empty() {
            return Err("ALLOWED_ORIGINS must list at least one origin".to_string());
        }

        Ok(())
    }
}
