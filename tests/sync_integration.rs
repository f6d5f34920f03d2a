//! End-to-end sync tests: controller + HTTP store against the loopback mock.

use snipdeck::collaborators::PreConfirmed;
use snipdeck::{
    filter_snippets, spawn_sync, Config, Draft, HttpStore, Lifecycle, StoreError, SyncEvent,
    SyncHandle, SyncOp,
};
use snipdeck_client::test_support::MockStoreServer;
use std::sync::Arc;
use std::time::Duration;

fn spawn_against(server: &MockStoreServer) -> SyncHandle {
    let config = Config {
        api_base_url: server.base_url(),
        timeout: Duration::from_secs(5),
        sync_perf_log: false,
    };
    let store = HttpStore::new(&config).expect("http store");
    spawn_sync(Arc::new(store), &config)
}

async fn next_event(handle: &mut SyncHandle) -> SyncEvent {
    tokio::time::timeout(Duration::from_secs(5), handle.next_event())
        .await
        .expect("timed out waiting for sync event")
        .expect("sync controller stopped")
}

#[tokio::test]
async fn empty_store_create_then_refresh_yields_one_entry() {
    let server = MockStoreServer::start().await;
    let mut sync = spawn_against(&server);

    sync.trigger_refresh();
    assert_eq!(next_event(&mut sync).await, SyncEvent::Refreshed { items: 0 });
    let view = sync.settled().await;
    assert!(view.cache.is_empty());
    assert_eq!(view.lifecycle, Lifecycle::Ready);

    sync.trigger_create(Draft::new("Hello", "JS", "console.log(1)"));
    let created = match next_event(&mut sync).await {
        SyncEvent::Created { snippet } => snippet,
        other => panic!("unexpected event: {:?}", other),
    };
    assert_eq!(next_event(&mut sync).await, SyncEvent::Refreshed { items: 1 });

    sync.trigger_refresh();
    assert_eq!(next_event(&mut sync).await, SyncEvent::Refreshed { items: 1 });
    let view = sync.settled().await;
    assert_eq!(view.cache.len(), 1);
    let entry = &view.cache[0];
    assert!(!entry.id.is_empty());
    assert_eq!(entry.id, created.id);
    assert_eq!(
        (entry.title.as_str(), entry.language.as_str(), entry.code.as_str()),
        ("Hello", "JS", "console.log(1)")
    );
    assert!(view.draft.is_empty());

    sync.shutdown().await;
}

#[tokio::test]
async fn confirmed_delete_then_refresh_drops_only_that_id() {
    let server = MockStoreServer::start().await;
    server.store().use_document_ids();
    let quick = server.store().insert("Quick Sort", "Python", "def qs(): pass");
    let binary = server.store().insert("Binary Search", "Go", "func search() {}");
    let mut sync = spawn_against(&server);

    sync.trigger_refresh();
    assert_eq!(next_event(&mut sync).await, SyncEvent::Refreshed { items: 2 });

    assert!(sync.trigger_delete(&quick.id, &PreConfirmed));
    assert_eq!(
        next_event(&mut sync).await,
        SyncEvent::Deleted {
            id: quick.id.clone()
        }
    );
    assert_eq!(next_event(&mut sync).await, SyncEvent::Refreshed { items: 1 });

    let view = sync.settled().await;
    assert!(view.cached(&quick.id).is_none());
    assert_eq!(view.cache.as_slice(), &[binary]);
    sync.shutdown().await;
}

#[tokio::test]
async fn deleting_absent_id_is_a_server_error_and_cache_survives() {
    let server = MockStoreServer::start().await;
    server.store().insert("Quick Sort", "Python", "def qs(): pass");
    let mut sync = spawn_against(&server);

    sync.trigger_refresh();
    next_event(&mut sync).await;
    let before = sync.settled().await.cache;

    sync.trigger_delete("does-not-exist", &PreConfirmed);
    match next_event(&mut sync).await {
        SyncEvent::Failed {
            op: SyncOp::Delete,
            error: StoreError::Server { status, .. },
        } => assert_eq!(status, 404),
        other => panic!("unexpected event: {:?}", other),
    }

    let view = sync.settled().await;
    assert_eq!(view.lifecycle, Lifecycle::Error);
    assert_eq!(view.cache, before);
    sync.shutdown().await;
}

#[tokio::test]
async fn search_query_matches_title_or_language_over_fetched_cache() {
    let server = MockStoreServer::start().await;
    server.store().insert("Quick Sort", "Python", "def qs(): pass");
    server.store().insert("Binary Search", "Go", "func search() {}");
    let mut sync = spawn_against(&server);

    sync.trigger_refresh();
    next_event(&mut sync).await;

    for (query, expected) in [("go", vec!["Binary Search"]), ("sort", vec!["Quick Sort"])] {
        sync.set_search_query(query);
        let view = sync.settled().await;
        let titles: Vec<&str> = view.visible.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, expected, "query {:?}", query);
        assert_eq!(view.visible, filter_snippets(&view.cache, query));
    }
    sync.shutdown().await;
}
