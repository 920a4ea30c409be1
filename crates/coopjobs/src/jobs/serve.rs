use crate::prelude::{eprintln, *};
use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use coopjobs_core::html::render_page;
use coopjobs_core::jobs::{SortDirection, SortKey, SortState};
use coopjobs_core::view::ListView;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::{create_client, load_view, JobsConfig};

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "COOPJOBS_PORT", default_value = "8080")]
    port: u16,

    /// Host to bind to
    #[arg(long, env = "COOPJOBS_HOST", default_value = "127.0.0.1")]
    host: String,
}

/// Shared by every request; never mutated after startup
#[derive(Debug)]
pub struct ServeState {
    client: reqwest::Client,
    config: JobsConfig,
}

/// Query string of `GET /`
#[derive(Debug, Default, serde::Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    search: String,
    sort: Option<String>,
    dir: Option<String>,
}

impl PageQuery {
    /// Sort state named by the query; an unknown column means no sort and an
    /// unknown direction means ascending
    fn sort_state(&self) -> Option<SortState> {
        let key = self.sort.as_deref()?.parse::<SortKey>().ok()?;
        let direction = self
            .dir
            .as_deref()
            .and_then(|dir| dir.parse::<SortDirection>().ok())
            .unwrap_or_default();
        Some(SortState::new(key, direction))
    }
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    let config = JobsConfig::from_global(&global)?;
    let client = create_client(&config)?;
    let addr = format!("{}:{}", options.host, options.port);

    if global.verbose {
        eprintln!("Fetching jobs from {}", config.endpoint());
    }

    let app_router = router(Arc::new(ServeState { client, config }));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    log::info!("listening on http://{addr}");

    axum::serve(listener, app_router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

pub fn router(state: Arc<ServeState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(page_handler))
        .layer(cors)
        .with_state(state)
}

fn apply_query(view: &mut ListView, query: &PageQuery) {
    view.set_search(query.search.clone());
    view.set_sort(query.sort_state());
}

/// One page load per request: fetch, then filter, sort and render
async fn page_handler(
    State(state): State<Arc<ServeState>>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let mut view = load_view(&state.client, &state.config).await;
    apply_query(&mut view, &query);
    Html(render_page(&view))
}
