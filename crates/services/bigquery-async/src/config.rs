use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::BigQueryError;

/// Default BigQuery REST API base URL
pub const BIGQUERY_DEFAULT_BASE: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Configuration for the BigQuery client
///
/// Debug output automatically redacts `access_token` via [`SecretString`].
#[derive(Clone, Debug)]
pub struct BigQueryConfig {
    api_base: String,
    access_token: Option<SecretString>,
    project_id: Option<String>,
    location: Option<String>,
}

fn env_trimmed(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Default for BigQueryConfig {
    fn default() -> Self {
        let access_token = env_trimmed("BIGQUERY_ACCESS_TOKEN")
            .or_else(|| env_trimmed("GOOGLE_OAUTH_ACCESS_TOKEN"))
            .map(SecretString::from);

        let project_id =
            env_trimmed("BIGQUERY_PROJECT_ID").or_else(|| env_trimmed("GOOGLE_CLOUD_PROJECT"));

        let api_base =
            env_trimmed("BIGQUERY_BASE_URL").unwrap_or_else(|| BIGQUERY_DEFAULT_BASE.into());

        Self {
            api_base,
            access_token,
            project_id,
            location: env_trimmed("BIGQUERY_LOCATION"),
        }
    }
}

impl BigQueryConfig {
    /// Creates a new configuration from the environment
    ///
    /// Reads:
    /// - `BIGQUERY_ACCESS_TOKEN` (or `GOOGLE_OAUTH_ACCESS_TOKEN`) for bearer authentication
    /// - `BIGQUERY_PROJECT_ID` (or `GOOGLE_CLOUD_PROJECT`) for the billing project
    /// - `BIGQUERY_LOCATION` for the job location
    /// - `BIGQUERY_BASE_URL` for a custom API base URL
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Sets the OAuth access token
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::from(token.into()));
        self
    }

    /// Sets the project that queries run (and are billed) in
    #[must_use]
    pub fn with_project_id(mut self, project: impl Into<String>) -> Self {
        self.project_id = Some(project.into());
        self
    }

    /// Sets the job location (e.g. `US`, `EU`)
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Returns the configured API base URL
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

/// Configuration trait for the BigQuery client
pub trait Config: Send + Sync {
    /// Returns HTTP headers to include in requests
    ///
    /// # Errors
    ///
    /// Returns an error if header values contain invalid characters.
    fn headers(&self) -> Result<HeaderMap, BigQueryError>;

    /// Constructs the full URL for an API endpoint
    fn url(&self, path: &str) -> String;

    /// Project that jobs are created in
    ///
    /// # Errors
    ///
    /// Returns an error if no project is configured.
    fn project_id(&self) -> Result<&str, BigQueryError>;

    /// Optional job location
    fn location(&self) -> Option<&str>;

    /// Validates that authentication credentials are present.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication is not properly configured.
    fn validate_auth(&self) -> Result<(), BigQueryError>;
}

impl Config for BigQueryConfig {
    fn headers(&self) -> Result<HeaderMap, BigQueryError> {
        let mut h = HeaderMap::new();

        if let Some(secret) = &self.access_token {
            let token = secret.expose_secret().trim();
            if !token.is_empty() {
                h.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {token}"))
                        .map_err(|_| BigQueryError::Config("Invalid access token value".into()))?,
                );
            }
        }

        Ok(h)
    }

    fn url(&self, path: &str) -> String {
        let base = self.api_base.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    fn project_id(&self) -> Result<&str, BigQueryError> {
        self.project_id.as_deref().ok_or_else(|| {
            BigQueryError::Config(
                "Missing BigQuery project: set BIGQUERY_PROJECT_ID or GOOGLE_CLOUD_PROJECT".into(),
            )
        })
    }

    fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    fn validate_auth(&self) -> Result<(), BigQueryError> {
        match &self.access_token {
            Some(secret) if !secret.expose_secret().trim().is_empty() => Ok(()),
            _ => Err(BigQueryError::Config(
                "Missing BigQuery credentials: set BIGQUERY_ACCESS_TOKEN environment variable"
                    .into(),
            )),
        }
    }
}
