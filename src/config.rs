use anyhow::{Context, Result};

/// Default model for both planning and writing
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Folder that published reports are placed in when none is configured
pub const DEFAULT_REPORTS_FOLDER_NAME: &str = "Research-Agent Reports";

/// Process-wide settings, read once at startup and passed by reference
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Language model credentials (OPENAI_API_KEY)
    pub openai_api_key: Option<String>,
    /// Model name (OPENAI_MODEL)
    pub model: String,
    /// Search credentials (TAVILY_API_KEY)
    pub tavily_api_key: Option<String>,
    /// Document store OAuth client (GOOGLE_CLIENT_ID)
    pub google_client_id: Option<String>,
    /// Document store OAuth secret (GOOGLE_CLIENT_SECRET)
    pub google_client_secret: Option<String>,
    /// Document store OAuth redirect target (GOOGLE_OAUTH_REDIRECT_URI)
    pub google_oauth_redirect_uri: Option<String>,
    /// Folder name for published reports (GOOGLE_DRIVE_REPORTS_FOLDER_NAME)
    pub reports_folder_name: String,
}

impl Settings {
    /// Load a local `.env` if present, then read the process environment
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            openai_api_key: get("OPENAI_API_KEY"),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            tavily_api_key: get("TAVILY_API_KEY"),
            google_client_id: get("GOOGLE_CLIENT_ID"),
            google_client_secret: get("GOOGLE_CLIENT_SECRET"),
            google_oauth_redirect_uri: get("GOOGLE_OAUTH_REDIRECT_URI"),
            reports_folder_name: get("GOOGLE_DRIVE_REPORTS_FOLDER_NAME")
                .unwrap_or_else(|| DEFAULT_REPORTS_FOLDER_NAME.to_string()),
        }
    }

    pub fn require_openai_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .context("OPENAI_API_KEY environment variable not set")
    }

    pub fn require_tavily_key(&self) -> Result<&str> {
        self.tavily_api_key
            .as_deref()
            .context("TAVILY_API_KEY environment variable not set")
    }

    /// Whether OAuth credentials for the document store are fully configured
    pub fn has_document_store_credentials(&self) -> bool {
        self.google_client_id.is_some()
            && self.google_client_secret.is_some()
            && self.google_oauth_redirect_uri.is_some()
    }
}
