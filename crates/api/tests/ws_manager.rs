//! Tests for `WsManager` connection bookkeeping, without HTTP upgrades.

use axum::extract::ws::Message;
use foyer_api::ws::WsManager;

#[tokio::test]
async fn add_and_remove_track_connection_count() {
    let manager = WsManager::new();
    assert_eq!(manager.connection_count().await, 0);

    let _conn = manager.add("conn-1".to_string()).await;
    assert_eq!(manager.connection_count().await, 1);

    manager.remove("nonexistent").await;
    assert_eq!(manager.connection_count().await, 1);

    manager.remove("conn-1").await;
    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn session_sender_reaches_connection_receiver() {
    let manager = WsManager::new();
    let (tx, mut rx) = manager.add("conn-1".to_string()).await;

    tx.send(Message::Text("hello".into())).unwrap();

    assert!(matches!(rx.recv().await, Some(Message::Text(t)) if t.as_str() == "hello"));
}

#[tokio::test]
async fn ping_all_reaches_every_connection() {
    let manager = WsManager::new();
    let (_tx1, mut rx1) = manager.add("conn-1".to_string()).await;
    let (_tx2, mut rx2) = manager.add("conn-2".to_string()).await;

    manager.ping_all().await;

    assert!(matches!(rx1.recv().await, Some(Message::Ping(_))));
    assert!(matches!(rx2.recv().await, Some(Message::Ping(_))));
}

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let manager = WsManager::new();
    let (_tx1, mut rx1) = manager.add("conn-1".to_string()).await;
    let (_tx2, mut rx2) = manager.add("conn-2".to_string()).await;

    manager.shutdown_all().await;

    assert_eq!(manager.connection_count().await, 0);
    assert!(matches!(rx1.recv().await, Some(Message::Close(None))));
    assert!(matches!(rx2.recv().await, Some(Message::Close(None))));
}
