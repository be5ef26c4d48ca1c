use serde::{Serialize, de::DeserializeOwned};

use crate::config::{BigQueryConfig, Config};
use crate::error::BigQueryError;
use crate::rows::{QueryRows, decode_rows};
use crate::types::{JobReference, QueryRequest, QueryResponse};

/// Server-side wait per `queries` call before the job is polled again
const DEFAULT_WAIT_MS: u64 = 10_000;

/// BigQuery API client
///
/// The client is generic over a [`Config`] implementation that provides authentication,
/// the billing project and the API base URL. It never retries; callers bound total
/// latency with their own timeout.
#[derive(Debug, Clone)]
pub struct Client<C: Config> {
    http: reqwest::Client,
    config: C,
    wait_ms: u64,
}

impl Client<BigQueryConfig> {
    /// Creates a new client configured from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self, BigQueryError> {
        Self::with_config(BigQueryConfig::new())
    }
}

impl<C: Config> Client<C> {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_config(config: C) -> Result<Self, BigQueryError> {
        let http = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()?;
        Ok(Self {
            http,
            config,
            wait_ms: DEFAULT_WAIT_MS,
        })
    }

    /// Replaces the HTTP client with a custom one
    #[must_use]
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Sets how long each `queries` call waits server-side for completion
    #[must_use]
    pub const fn with_wait_ms(mut self, wait_ms: u64) -> Self {
        self.wait_ms = wait_ms;
        self
    }

    /// Returns a reference to the client's configuration
    #[must_use]
    pub const fn config(&self) -> &C {
        &self.config
    }

    /// Estimate the bytes `sql` would scan without running it.
    ///
    /// # Errors
    ///
    /// Returns [`BigQueryError::Api`] for invalid SQL, missing tables or permission
    /// problems, and [`BigQueryError::Config`] when project or credentials are missing.
    pub async fn dry_run(&self, sql: &str) -> Result<u64, BigQueryError> {
        let project = self.config.project_id()?;
        let req = QueryRequest::new(sql)
            .dry_run()
            .with_location(self.config.location());

        let resp: QueryResponse = self.post(&format!("projects/{project}/queries"), &req).await?;

        let raw = resp.total_bytes_processed.ok_or_else(|| {
            BigQueryError::Serde("dry run response missing totalBytesProcessed".into())
        })?;
        let bytes = raw.parse::<u64>().map_err(|e| {
            BigQueryError::Serde(format!("invalid totalBytesProcessed '{raw}': {e}"))
        })?;

        tracing::debug!(project, bytes, "BigQuery dry run");
        Ok(bytes)
    }

    /// Run `sql` and collect every result row.
    ///
    /// Polls the job until it completes, then follows page tokens until exhausted.
    ///
    /// # Errors
    ///
    /// Returns the first API, transport or decoding error encountered.
    pub async fn query(&self, sql: &str) -> Result<QueryRows, BigQueryError> {
        let project = self.config.project_id()?;
        let req = QueryRequest::new(sql)
            .with_timeout_ms(self.wait_ms)
            .with_location(self.config.location());

        let mut page: QueryResponse =
            self.post(&format!("projects/{project}/queries"), &req).await?;

        let job = page.job_reference.clone();

        while !page.job_complete.unwrap_or(false) {
            let job = job.as_ref().ok_or_else(|| {
                BigQueryError::Serde("incomplete query response missing jobReference".into())
            })?;
            tracing::debug!(job_id = %job.job_id, "BigQuery job still running; polling");
            page = self.get_query_results(job, None).await?;
        }

        let schema = page.schema.clone().unwrap_or_default();
        let total_rows = page.total_rows.as_deref().and_then(|s| s.parse().ok());
        let mut rows = decode_rows(&schema, &page.rows);
        let mut token = page.page_token.take();

        while let Some(t) = token {
            let job = job.as_ref().ok_or_else(|| {
                BigQueryError::Serde("paged query response missing jobReference".into())
            })?;
            let next = self.get_query_results(job, Some(&t)).await?;
            rows.extend(decode_rows(&schema, &next.rows));
            token = next.page_token;
        }

        tracing::debug!(project, rows = rows.len(), "BigQuery query finished");
        Ok(QueryRows { rows, total_rows })
    }

    async fn get_query_results(
        &self,
        job: &JobReference,
        page_token: Option<&str>,
    ) -> Result<QueryResponse, BigQueryError> {
        let mut params = vec![("timeoutMs", self.wait_ms.to_string())];
        if let Some(loc) = job.location.as_deref().or_else(|| self.config.location()) {
            params.push(("location", loc.to_string()));
        }
        if let Some(t) = page_token {
            params.push(("pageToken", t.to_string()));
        }

        let path = format!("projects/{}/queries/{}", job.project_id, job.job_id);
        let request = self
            .http
            .get(self.config.url(&path))
            .headers(self.config.headers()?)
            .query(&params)
            .build()?;
        self.execute(request).await
    }

    async fn post<I, O>(&self, path: &str, body: &I) -> Result<O, BigQueryError>
    where
        I: Serialize + Sync,
        O: DeserializeOwned,
    {
        let request = self
            .http
            .post(self.config.url(path))
            .headers(self.config.headers()?)
            .json(body)
            .build()?;
        self.execute(request).await
    }

    async fn execute<O>(&self, request: reqwest::Request) -> Result<O, BigQueryError>
    where
        O: DeserializeOwned,
    {
        // Validate auth before any request
        self.config.validate_auth()?;

        let response = self.http.execute(request).await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(crate::error::deserialize_api_error(status, &bytes));
        }

        serde_json::from_slice(&bytes).map_err(|e| crate::error::map_deser(&e, &bytes))
    }
}
