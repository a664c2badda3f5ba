//! Service wiring and the headless list session.

use clap::Parser;
use repofeed_client::{HttpTransport, RepoService, RetryPolicy};
use repofeed_config::AppConfig;
use repofeed_pager::{PageFeed, PageOutcome};
use repofeed_store::RepoStore;
use repofeed_view::{RepositoryViewModel, Toast};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::error::{AppError, AppResult};
use crate::logging;

/// Parse flags, wire the services, and run the list session to completion.
///
/// # Errors
///
/// Returns [`AppError`] when configuration, logging, or service construction
/// fails. Page-fetch failures are not errors; they surface as toasts and the
/// session keeps scrolling.
pub async fn run_app() -> AppResult<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().map_err(|err| AppError::config("config.from_env", err))?;
    if let Some(base_url) = cli.base_url.clone() {
        config.api_base_url = base_url;
        config
            .validate()
            .map_err(|err| AppError::config("config.validate", err))?;
    }
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }

    logging::init_logging(&config.log_level)?;
    info!(endpoint = %config.api_base_url, pages = cli.pages, "starting list session");

    let transport = HttpTransport::new(config.api_base_url.clone(), config.request_timeout())
        .map_err(|err| AppError::transport("transport.new", err))?;
    let service = RepoService::with_retry(
        transport,
        RetryPolicy {
            attempts: config.retry_attempts,
            backoff: config.retry_backoff(),
        },
    );
    let store = RepoStore::with_eviction(config.eviction);
    let feed = PageFeed::with_dispatch_delay(service, store.clone(), config.dispatch_delay());

    let mut rows: Vec<RepositoryViewModel> = Vec::new();
    for page in 0..cli.pages {
        // The loop is the batch-fetch source; it only asks again after the
        // previous completion signal, so the gate is always open here.
        if !feed.should_fetch() {
            continue;
        }

        match feed.request_more().await {
            Some(PageOutcome::Loaded { ids, reload }) => {
                if reload {
                    rows.clear();
                }
                for id in ids {
                    let Some(snapshot) = store.latest(id) else {
                        continue;
                    };
                    let row = RepositoryViewModel::new(snapshot, store.clone())
                        .map_err(|err| AppError::store("view_model.new", err))?;
                    rows.push(row);
                }
                info!(page, rows = rows.len(), "page materialized");
            }
            Some(PageOutcome::Failed) => {
                let toast = Toast::failure_with_duration(config.toast_duration());
                warn!(text = toast.text(), "page fetch failed; showing toast");
                sleep(toast.duration()).await;
            }
            None => {}
        }
    }

    render(&rows);

    if cli.demo_edit {
        demo_edit(rows.first(), &store);
    }

    Ok(())
}

/// Print one line per visible row from its derived card fields.
fn render(rows: &[RepositoryViewModel]) {
    for row in rows {
        let username = row.username().unwrap_or_default();
        let description = row.description().unwrap_or_default();
        let status = row
            .status()
            .map(|status| format!(" [{status}]"))
            .unwrap_or_default();
        println!("{:>12}  {username:<24} {description}{status}", row.id());
    }
}

/// Feed an edit through the store and show the re-derived row.
fn demo_edit(row: Option<&RepositoryViewModel>, store: &RepoStore) {
    let Some(row) = row else {
        warn!("no rows loaded; skipping edit demo");
        return;
    };

    row.submit_description(Some("edited from the repofeed demo".to_string()));
    let edited = store.latest(row.id());
    info!(
        id = row.id(),
        description = ?edited.and_then(|repo| repo.description),
        "edit written back through the store"
    );
    render(std::slice::from_ref(row));
}
