//! End-to-end list session: mock HTTP endpoint through pager, store, and
//! view models.

use std::time::Duration;

use anyhow::Result;
use httpmock::MockServer;
use httpmock::prelude::*;
use repofeed_client::{HttpTransport, RepoService, RetryPolicy};
use repofeed_pager::{PageFeed, PageOutcome};
use repofeed_store::RepoStore;
use repofeed_view::RepositoryViewModel;

const TIMEOUT: Duration = Duration::from_secs(2);
const SINGLE_ATTEMPT: RetryPolicy = RetryPolicy {
    attempts: 1,
    backoff: Duration::from_millis(1),
};

fn feed_for(server: &MockServer, store: &RepoStore) -> Result<PageFeed<HttpTransport>> {
    let endpoint = format!("{}/repositories", server.base_url()).parse()?;
    let transport = HttpTransport::new(endpoint, TIMEOUT)?;
    Ok(PageFeed::with_dispatch_delay(
        RepoService::with_retry(transport, SINGLE_ATTEMPT),
        store.clone(),
        Duration::ZERO,
    ))
}

#[tokio::test]
async fn two_page_session_builds_rows_and_accepts_edits() -> Result<()> {
    let server = MockServer::start_async().await;
    let mut first_page = server.mock(|when, then| {
        when.method(GET).path("/repositories");
        then.status(200).body(
            r#"[
                {"id": 1, "owner": {"login": "bob", "avatar_url": "https://example.com/bob.png"},
                 "full_name": "bob/one", "description": "first", "private": false, "fork": true},
                {"id": 2, "private": true, "fork": false}
            ]"#,
        );
    });

    let store = RepoStore::new();
    let feed = feed_for(&server, &store)?;

    let first = feed.request_more().await.expect("first fetch runs");
    assert!(matches!(first, PageOutcome::Loaded { reload: true, .. }));
    first_page.assert();
    first_page.delete();

    let second_page = server.mock(|when, then| {
        when.method(GET)
            .path("/repositories")
            .query_param("since", "2");
        then.status(200)
            .body(r#"[{"id": 3, "private": false, "fork": false}]"#);
    });

    let second = feed.request_more().await.expect("second fetch runs");
    assert!(matches!(second, PageOutcome::Loaded { reload: false, .. }));
    second_page.assert();
    assert_eq!(feed.ordered_ids(), vec![1, 2, 3]);
    assert_eq!(feed.cursor(), Some(3));

    // Materialize rows the way the presentation layer would.
    let rows: Vec<RepositoryViewModel> = feed
        .ordered_ids()
        .into_iter()
        .filter_map(|id| store.latest(id))
        .map(|snapshot| RepositoryViewModel::new(snapshot, store.clone()))
        .collect::<Result<_, _>>()?;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].username().as_deref(), Some("bob"));
    assert_eq!(rows[0].status().as_deref(), Some("Forked"));
    assert_eq!(rows[1].username().as_deref(), Some("Unknown"));
    assert_eq!(rows[1].status().as_deref(), Some("Private"));

    // Edit feedback loop: a subscriber to row 1 sees the write-back.
    let mut cards = rows[0].cards()?;
    assert_eq!(cards.next().await.expect("replayed card").description.as_deref(), Some("first"));

    rows[0].submit_description(Some("rewritten".to_string()));
    assert_eq!(
        cards.next().await.expect("updated card").description.as_deref(),
        Some("rewritten")
    );
    assert_eq!(
        store.latest(1).and_then(|repo| repo.description).as_deref(),
        Some("rewritten")
    );

    Ok(())
}

#[tokio::test]
async fn failed_page_keeps_the_session_alive() -> Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/repositories");
        then.status(500);
    });

    let store = RepoStore::new();
    let feed = feed_for(&server, &store)?;

    let outcome = feed.request_more().await.expect("fetch runs");
    assert_eq!(outcome, PageOutcome::Failed);
    assert!(feed.ordered_ids().is_empty());
    assert!(store.is_empty());
    assert!(feed.should_fetch(), "session can scroll to retry");

    Ok(())
}
