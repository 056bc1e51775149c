//! End-to-end runs of the background process against a fake host and
//! in-memory storage.

#[path = "../support/fake_host.rs"]
mod fake_host;

use std::sync::Arc;

use fake_host::FakeHost;
use tabkeeper::app::App;
use tabkeeper::database::{KeyValueStorage, MemoryStorage};
use tabkeeper::types::event::BrowserEvent;
use tabkeeper::types::group::{Color, TabGroup};
use tabkeeper::types::settings::KeeperSettings;
use tabkeeper::types::snapshot::PersistedGroup;
use tabkeeper::types::tab::Tab;

fn saved(title: &str, urls: &[&str]) -> Vec<PersistedGroup> {
    vec![PersistedGroup {
        title: Some(title.to_string()),
        color: Some(Color::Blue),
        tab_urls: urls.iter().map(|u| Some(u.to_string())).collect(),
    }]
}

fn group_event(id: i32, window_id: i32, title: &str) -> BrowserEvent {
    BrowserEvent::GroupCreated {
        group: TabGroup {
            id,
            window_id,
            title: Some(title.to_string()),
            color: Color::Cyan,
            collapsed: false,
        },
    }
}

fn tab_event(id: i32, window_id: i32, group_id: i32, url: &str) -> BrowserEvent {
    BrowserEvent::TabCreated {
        tab: Tab {
            id: Some(id),
            window_id,
            group_id,
            index: 0,
            url: Some(url.to_string()),
            title: None,
        },
    }
}

#[tokio::test]
async fn test_start_restores_and_consumes_saved_layouts() {
    let storage = Arc::new(MemoryStorage::with_entries([
        ("0", saved("Work", &["https://a", "https://b"])),
        ("1", saved("Home", &["https://c"])),
    ]));
    let host = Arc::new(FakeHost::new());

    let mut app = App::start(&KeeperSettings::default(), storage.clone(), host.clone()).await;
    let report = app.wait_for_restoration().await.expect("restoration ran");

    assert_eq!(report.groups_restored, 2);
    assert_eq!(report.tabs_created, 3);
    assert_eq!(host.group_calls().len(), 2);
    // New closed windows must not reuse the consumed keys.
    assert_eq!(app.keeper().next_sequence(), 2);

    app.shutdown().await;
    let stored = storage.entries();
    assert!(!stored.contains_key("0"));
    assert!(!stored.contains_key("1"));
}

#[tokio::test]
async fn test_disabled_restoration_leaves_storage_alone() {
    let storage = Arc::new(MemoryStorage::with_entries([("4", saved("Work", &["https://a"]))]));
    let host = Arc::new(FakeHost::new());
    let mut settings = KeeperSettings::default();
    settings.restoration.enabled = false;

    let app = App::start(&settings, storage.clone(), host.clone()).await;
    assert!(app.shutdown().await.is_none());

    assert!(host.created_urls().is_empty());
    assert!(storage.entries().contains_key("4"));
}

#[tokio::test]
async fn test_closed_window_is_persisted_for_next_start() {
    let storage = Arc::new(MemoryStorage::new());
    let host = Arc::new(FakeHost::new());

    let mut app = App::start(&KeeperSettings::default(), storage.clone(), host.clone()).await;
    app.handle_event(group_event(10, 1, "Research"));
    app.handle_event(tab_event(1, 1, 10, "https://paper"));
    app.handle_event(BrowserEvent::WindowRemoved { window_id: 1 });
    app.shutdown().await;

    let stored = storage.entries();
    assert_eq!(
        stored.get("0"),
        Some(&vec![PersistedGroup {
            title: Some("Research".to_string()),
            color: Some(Color::Cyan),
            tab_urls: vec![Some("https://paper".to_string())],
        }])
    );
    assert_eq!(stored.get("current"), Some(&Vec::new()));

    // The next run brings the window's group back.
    let next_host = Arc::new(FakeHost::new());
    let mut next = App::start(&KeeperSettings::default(), storage.clone(), next_host.clone()).await;
    next.wait_for_restoration().await;
    assert_eq!(next_host.created_urls(), vec![Some("https://paper".to_string())]);
    assert_eq!(next_host.update_calls()[0].1.title.as_deref(), Some("Research"));
    next.shutdown().await;
}

#[tokio::test]
async fn test_live_layout_recovers_after_crash() {
    // A previous run that never saw its window close left only "current".
    let storage = Arc::new(MemoryStorage::with_entries([(
        "current",
        saved("Unsaved", &["https://draft"]),
    )]));
    let host = Arc::new(FakeHost::new());

    let mut app = App::start(&KeeperSettings::default(), storage.clone(), host.clone()).await;
    let report = app.wait_for_restoration().await.unwrap();
    assert_eq!(report.groups_restored, 1);
    app.shutdown().await;

    let mut settings = KeeperSettings::default();
    settings.restoration.restore_live_snapshot = false;
    storage.set("current", &saved("Unsaved", &["https://draft"])).await.unwrap();
    let quiet_host = Arc::new(FakeHost::new());
    let mut quiet = App::start(&settings, storage.clone(), quiet_host.clone()).await;
    assert!(quiet.wait_for_restoration().await.is_none());
    assert!(quiet_host.created_urls().is_empty());
    quiet.shutdown().await;
}

#[tokio::test]
async fn test_seeded_state_is_written_as_current() {
    let host = Arc::new(FakeHost::new().with_existing(
        vec![TabGroup {
            id: 3,
            window_id: 1,
            title: Some("Open".to_string()),
            color: Color::Red,
            collapsed: true,
        }],
        vec![Tab {
            id: Some(8),
            window_id: 1,
            group_id: 3,
            index: 0,
            url: Some("https://open".to_string()),
            title: Some("Open tab".to_string()),
        }],
    ));
    let storage = Arc::new(MemoryStorage::new());

    let app = App::start(&KeeperSettings::default(), storage.clone(), host).await;
    assert_eq!(app.keeper().index().tab_count(), 1);
    app.shutdown().await;

    assert_eq!(
        storage.entries().get("current").map(|s| s[0].title.clone()),
        Some(Some("Open".to_string()))
    );
}

fn open_work_host() -> FakeHost {
    FakeHost::new().with_existing(
        vec![TabGroup {
            id: 10,
            window_id: 1,
            title: Some("Work".to_string()),
            color: Color::Blue,
            collapsed: false,
        }],
        vec![Tab {
            id: Some(1),
            window_id: 1,
            group_id: 10,
            index: 0,
            url: Some("https://a".to_string()),
            title: None,
        }],
    )
}

#[tokio::test]
async fn test_restart_under_open_browser_does_not_duplicate_groups() {
    let storage = Arc::new(MemoryStorage::new());
    let host = Arc::new(open_work_host());
    let first = App::start(&KeeperSettings::default(), storage.clone(), host).await;
    first.shutdown().await;
    assert_eq!(storage.entries().get("current"), Some(&saved("Work", &["https://a"])));

    let host = Arc::new(open_work_host());
    let mut restarted = App::start(&KeeperSettings::default(), storage.clone(), host.clone()).await;
    assert!(restarted.wait_for_restoration().await.is_none());
    assert!(host.created_urls().is_empty());
    assert!(host.group_calls().is_empty());
    restarted.shutdown().await;
}

#[tokio::test]
async fn test_restart_replays_only_groups_that_are_gone() {
    let mut live = saved("Work", &["https://a"]);
    live.extend(saved("Gone", &["https://g"]));
    let storage = Arc::new(MemoryStorage::with_entries([("current", live)]));
    let host = Arc::new(open_work_host());

    let mut app = App::start(&KeeperSettings::default(), storage.clone(), host.clone()).await;
    let report = app.wait_for_restoration().await.unwrap();
    assert_eq!(report.groups_restored, 1);
    assert_eq!(host.created_urls(), vec![Some("https://g".to_string())]);
    assert_eq!(host.update_calls()[0].1.title.as_deref(), Some("Gone"));
    app.shutdown().await;
}
