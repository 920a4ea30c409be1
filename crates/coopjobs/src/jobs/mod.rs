use crate::prelude::*;
use coopjobs_core::jobs::{decode_jobs, jobs_endpoint, resolve_base_url, FetchError, JobRecord};
use coopjobs_core::view::ListView;
use std::time::Duration;

pub mod list;
pub mod serve;

/// Sort columns accepted on the command line
#[derive(Debug, Clone, Copy, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Role,
    Company,
    Salary,
    Location,
    #[value(name = "start_date", alias = "start-date")]
    StartDate,
    Duration,
    Program,
    Notes,
}

impl From<SortKey> for coopjobs_core::jobs::SortKey {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Role => coopjobs_core::jobs::SortKey::Role,
            SortKey::Company => coopjobs_core::jobs::SortKey::Company,
            SortKey::Salary => coopjobs_core::jobs::SortKey::Salary,
            SortKey::Location => coopjobs_core::jobs::SortKey::Location,
            SortKey::StartDate => coopjobs_core::jobs::SortKey::StartDate,
            SortKey::Duration => coopjobs_core::jobs::SortKey::Duration,
            SortKey::Program => coopjobs_core::jobs::SortKey::Program,
            SortKey::Notes => coopjobs_core::jobs::SortKey::Notes,
        }
    }
}

/// Where and how to reach the job listing backend
#[derive(Debug, Clone)]
pub struct JobsConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl JobsConfig {
    /// Deployment-provided host name, used when no explicit base URL is given
    pub const DEPLOYMENT_HOST_VAR: &'static str = "VERCEL_URL";

    /// Resolve the configuration once at startup
    pub fn from_global(global: &crate::Global) -> Result<Self> {
        let host = std::env::var(Self::DEPLOYMENT_HOST_VAR).ok();
        Self::resolve(global.base_url.as_deref(), host.as_deref(), global.timeout)
    }

    pub fn resolve(
        explicit: Option<&str>,
        deployment_host: Option<&str>,
        timeout_secs: u64,
    ) -> Result<Self> {
        if timeout_secs == 0 {
            return Err(Error::InvalidTimeout.into());
        }

        let base_url = resolve_base_url(explicit, deployment_host);
        reqwest::Url::parse(&base_url)
            .map_err(|e| Error::InvalidBaseUrl(base_url.clone(), e.to_string()))?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn endpoint(&self) -> String {
        jobs_endpoint(&self.base_url)
    }
}

/// Create the HTTP client used for every page load
pub fn create_client(config: &JobsConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

/// GET the job listing and decode it
///
/// Every failure is folded into a [`FetchError`]; nothing here is retried.
pub async fn fetch_jobs(
    client: &reqwest::Client,
    endpoint: &str,
) -> std::result::Result<Vec<JobRecord>, FetchError> {
    let response = client
        .get(endpoint)
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    decode_jobs(&body)
}

/// One page load: fetch, then hand the result to a fresh [`ListView`]
pub async fn load_view(client: &reqwest::Client, config: &JobsConfig) -> ListView {
    let endpoint = config.endpoint();
    let result = fetch_jobs(client, &endpoint).await;

    match &result {
        Ok(records) => log::debug!("GET {endpoint}: {} jobs", records.len()),
        Err(err) => log::warn!("GET {endpoint} failed: {err}"),
    }

    ListView::from_fetch(result)
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use std::sync::{Mutex, Once};

    static CAPTURED: Mutex<Vec<(log::Level, String)>> = Mutex::new(Vec::new());
    static INSTALL_LOGGER: Once = Once::new();

    struct CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut captured) = CAPTURED.lock() {
                captured.push((record.level(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    /// Route `log` records into memory for the rest of the test run
    pub fn capture_logs() {
        INSTALL_LOGGER.call_once(|| {
            log::set_logger(&CaptureLogger).unwrap();
            log::set_max_level(log::LevelFilter::Trace);
        });
    }

    /// Captured records at `level` whose message contains `needle`
    pub fn captured_logs(level: log::Level, needle: &str) -> Vec<String> {
        CAPTURED
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, message)| *l == level && message.contains(needle))
            .map(|(_, message)| message.clone())
            .collect()
    }

    /// Serve `router` on an ephemeral local port and return its base URL
    pub async fn spawn_router(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Base URL nothing is listening on
    pub async fn closed_base_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    pub fn jobs_fixture() -> serde_json::Value {
        serde_json::json!([
            {"id": 1, "role": "Backend Developer", "company": "Shopify", "salary": 60000,
             "location": "Ottawa, ON", "start_date": "May 2024", "duration": "4 months",
             "program": "Computer Science", "notes": "Remote friendly"},
            {"id": 2, "role": "Data Analyst", "company": "RBC", "salary": "50000",
             "location": "Toronto, ON", "start_date": "May 2024", "duration": "8 months",
             "program": "Statistics"},
            {"id": 3, "job_title": "Firmware Intern", "company": "Tesla", "salary": 70000,
             "location": "Palo Alto, CA", "start_date": "Sept 2024", "duration": "4 months",
             "program": "Electrical Engineering", "notes": ""}
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{
        capture_logs, captured_logs, closed_base_url, jobs_fixture, spawn_router,
    };
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use coopjobs_core::view::ViewOutcome;

    fn create_test_config(base_url: &str) -> JobsConfig {
        JobsConfig::resolve(Some(base_url), None, 5).unwrap()
    }

    #[test]
    fn test_config_resolution_order() {
        let config = JobsConfig::resolve(Some("http://api.local:9000/"), Some("x.vercel.app"), 30)
            .unwrap();
        assert_eq!(config.base_url, "http://api.local:9000");
        assert_eq!(config.endpoint(), "http://api.local:9000/api/jobs");

        let config = JobsConfig::resolve(None, Some("x.vercel.app"), 30).unwrap();
        assert_eq!(config.endpoint(), "https://x.vercel.app/api/jobs");

        let config = JobsConfig::resolve(None, None, 30).unwrap();
        assert_eq!(config.endpoint(), "http://localhost:3000/api/jobs");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_from_global_reads_deployment_host() {
        std::env::set_var(JobsConfig::DEPLOYMENT_HOST_VAR, "coop.vercel.app");

        let config = JobsConfig::from_global(&crate::Global {
            base_url: None,
            timeout: 30,
            verbose: false,
        })
        .unwrap();
        assert_eq!(config.endpoint(), "https://coop.vercel.app/api/jobs");

        let config = JobsConfig::from_global(&crate::Global {
            base_url: Some("http://api.local:9000".to_string()),
            timeout: 10,
            verbose: false,
        })
        .unwrap();
        assert_eq!(config.endpoint(), "http://api.local:9000/api/jobs");
        assert_eq!(config.timeout, Duration::from_secs(10));

        std::env::remove_var(JobsConfig::DEPLOYMENT_HOST_VAR);
    }

    #[test]
    fn test_config_rejects_invalid_values() {
        assert!(JobsConfig::resolve(Some("not a url"), None, 30).is_err());
        assert!(JobsConfig::resolve(None, None, 0).is_err());
    }

    #[tokio::test]
    async fn test_fetch_jobs_success() {
        let base = spawn_router(
            Router::new().route("/api/jobs", get(|| async { Json(jobs_fixture()) })),
        )
        .await;
        let config = create_test_config(&base);
        let client = create_client(&config).unwrap();

        let jobs = fetch_jobs(&client, &config.endpoint()).await.unwrap();

        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[2].title(), Some("Firmware Intern"));
    }

    #[tokio::test]
    async fn test_fetch_jobs_status_error() {
        let base = spawn_router(Router::new().route(
            "/api/jobs",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await;
        let config = create_test_config(&base);
        let client = create_client(&config).unwrap();

        let result = fetch_jobs(&client, &config.endpoint()).await;

        assert_eq!(result, Err(FetchError::Status(500)));
    }

    #[tokio::test]
    async fn test_fetch_jobs_not_found_route() {
        let base = spawn_router(Router::new()).await;
        let config = create_test_config(&base);
        let client = create_client(&config).unwrap();

        let result = fetch_jobs(&client, &config.endpoint()).await;

        assert_eq!(result, Err(FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_fetch_jobs_not_an_array() {
        let base = spawn_router(Router::new().route(
            "/api/jobs",
            get(|| async { Json(serde_json::json!("not an array")) }),
        ))
        .await;
        let config = create_test_config(&base);
        let client = create_client(&config).unwrap();

        let result = fetch_jobs(&client, &config.endpoint()).await;

        assert_eq!(result, Err(FetchError::InvalidFormat));
    }

    #[tokio::test]
    async fn test_fetch_jobs_transport_error() {
        let config = create_test_config(&closed_base_url().await);
        let client = create_client(&config).unwrap();

        let result = fetch_jobs(&client, &config.endpoint()).await;

        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn test_load_view_failure_renders_error() {
        let base = spawn_router(Router::new().route(
            "/api/jobs",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await;
        let config = create_test_config(&base);
        let client = create_client(&config).unwrap();

        let view = load_view(&client, &config).await;

        assert!(view.records().is_empty());
        assert_eq!(
            view.render(),
            ViewOutcome::Error {
                message: "Failed to fetch jobs, status: 500".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_load_view_logs_failure() {
        capture_logs();
        let base = spawn_router(Router::new().route(
            "/logs-failure/api/jobs",
            get(|| async { StatusCode::BAD_GATEWAY }),
        ))
        .await;
        let config = create_test_config(&format!("{base}/logs-failure"));
        let client = create_client(&config).unwrap();

        load_view(&client, &config).await;

        let warnings = captured_logs(log::Level::Warn, &config.endpoint());
        assert_eq!(
            warnings,
            vec![format!(
                "GET {} failed: Failed to fetch jobs, status: 502",
                config.endpoint()
            )]
        );
    }

    #[tokio::test]
    async fn test_load_view_success_logs_no_warning() {
        capture_logs();
        let base = spawn_router(Router::new().route(
            "/logs-success/api/jobs",
            get(|| async { Json(jobs_fixture()) }),
        ))
        .await;
        let config = create_test_config(&format!("{base}/logs-success"));
        let client = create_client(&config).unwrap();

        let view = load_view(&client, &config).await;

        assert_eq!(view.records().len(), 3);
        assert!(captured_logs(log::Level::Warn, &config.endpoint()).is_empty());
        assert_eq!(
            captured_logs(log::Level::Debug, &config.endpoint()),
            vec![format!("GET {}: 3 jobs", config.endpoint())]
        );
    }

    #[test]
    fn test_sort_key_conversion() {
        assert_eq!(
            coopjobs_core::jobs::SortKey::from(SortKey::StartDate),
            coopjobs_core::jobs::SortKey::StartDate
        );
        assert_eq!(
            coopjobs_core::jobs::SortKey::from(SortKey::Salary),
            coopjobs_core::jobs::SortKey::Salary
        );
    }
}
