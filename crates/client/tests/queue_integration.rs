use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use wiremock::matchers::{body_partial_json, method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockbook_client::store::SYNC_QUEUE;
use stockbook_client::{
    LocalStore, MAX_ATTEMPTS, NoopHooks, RemoteConfig, RemoteGateway, SharedHooks, StockClient,
    SyncAction, SyncEntry, SyncQueueService, UiHooks,
};

// -- Helpers ------------------------------------------------------------------

async fn service_for(url: &str) -> (Arc<SyncQueueService>, LocalStore) {
    stockbook_observability::init();
    let store = LocalStore::in_memory().await.unwrap();
    let gateway = RemoteGateway::new(RemoteConfig::new(url));
    let service = SyncQueueService::new(store.clone(), gateway, Arc::new(NoopHooks));
    (service, store)
}

fn reset_entry(email: &str) -> SyncEntry {
    SyncEntry {
        id: uuid::Uuid::now_v7(),
        action: SyncAction::ResetPassword {
            email: email.to_string(),
            new_password: "pw2".to_string(),
        },
        attempts: 0,
        ts: 0,
    }
}

/// Poll until the queue is empty or the deadline passes.
async fn wait_for_drain(service: &SyncQueueService) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
    while tokio::time::Instant::now() < deadline {
        if service.pending().await.is_empty() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("queue did not drain in time");
}

#[derive(Default)]
struct ToastRecorder {
    toasts: Mutex<Vec<String>>,
}

impl UiHooks for ToastRecorder {
    fn toast(&self, message: &str) {
        self.toasts.lock().unwrap().push(message.to_string());
    }
}

// -- Delivery -----------------------------------------------------------------

#[tokio::test]
async fn reset_password_delivers_as_query_encoded_get() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("action", "resetPassword"))
        .and(query_param("email", "a@x.com"))
        .and(query_param("newPassword", "pw2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let (service, _store) = service_for(&server.uri()).await;
    service
        .enqueue(SyncAction::ResetPassword {
            email: "a@x.com".to_string(),
            new_password: "pw2".to_string(),
        })
        .await
        .unwrap();

    wait_for_drain(&service).await;
}

#[tokio::test]
async fn register_delivers_as_opaque_post_of_the_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({
            "action": "register",
            "email": "a@x.com"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (service, _store) = service_for(&server.uri()).await;
    service
        .enqueue(SyncAction::Register {
            payload: serde_json::json!({
                "action": "register",
                "name": "Ana",
                "email": "a@x.com",
                "password": "pw1"
            }),
        })
        .await
        .unwrap();

    wait_for_drain(&service).await;
}

// -- Retry bounds -------------------------------------------------------------

#[tokio::test]
async fn failing_entry_is_attempted_four_times_then_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("action", "resetPassword"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (service, store) = service_for(&server.uri()).await;
    store.put(SYNC_QUEUE, &[reset_entry("a@x.com")]).await.unwrap();

    // Passes 1..=3 keep the entry with an incremented counter.
    for expected_attempts in 1..=MAX_ATTEMPTS {
        service.process().await;
        let pending = service.pending().await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].attempts, expected_attempts);
    }

    // Pass 4 exceeds the bound and removes the entry.
    service.process().await;
    assert!(service.pending().await.is_empty());

    // A further pass never retries it again.
    service.process().await;
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn unknown_actions_are_dropped_without_any_network_call() {
    let server = MockServer::start().await;

    let (service, store) = service_for(&server.uri()).await;
    store
        .put(
            SYNC_QUEUE,
            &[serde_json::json!({
                "id": "019028c2-0000-7000-8000-000000000000",
                "action": "compactSheets",
                "attempts": 0,
                "ts": 0
            })],
        )
        .await
        .unwrap();

    service.process().await;
    assert!(service.pending().await.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

// -- Single flight ------------------------------------------------------------

#[tokio::test]
async fn concurrent_triggers_run_exactly_one_drain_pass() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("action", "resetPassword"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("OK")
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let (service, store) = service_for(&server.uri()).await;
    store.put(SYNC_QUEUE, &[reset_entry("a@x.com")]).await.unwrap();

    // The second trigger must observe the in-flight pass and no-op.
    tokio::join!(service.process(), service.process());

    assert!(service.pending().await.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn entry_persisted_mid_drain_is_lost_to_the_final_rewrite() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("action", "resetPassword"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("OK")
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (service, store) = service_for(&server.uri()).await;
    store.put(SYNC_QUEUE, &[reset_entry("a@x.com")]).await.unwrap();

    let runner = Arc::clone(&service);
    let pass = tokio::spawn(async move { runner.process().await });

    // While the first delivery is mid-flight, persist a second entry behind
    // the drain's back. Last write wins: the pass's final re-persist erases
    // it, and no later pass ever delivers it.
    tokio::time::sleep(Duration::from_millis(100)).await;
    store.put(SYNC_QUEUE, &[reset_entry("b@x.com")]).await.unwrap();

    pass.await.unwrap();
    assert!(service.pending().await.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

// -- Notifications and startup ------------------------------------------------

#[tokio::test]
async fn enqueue_and_successful_drain_notify_the_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let recorder = Arc::new(ToastRecorder::default());
    let hooks: SharedHooks = recorder.clone();
    let store = LocalStore::in_memory().await.unwrap();
    let gateway = RemoteGateway::new(RemoteConfig::new(server.uri()));
    let service = SyncQueueService::new(store, gateway, hooks);

    service
        .enqueue(SyncAction::ResetPassword {
            email: "a@x.com".to_string(),
            new_password: "pw2".to_string(),
        })
        .await
        .unwrap();
    wait_for_drain(&service).await;

    let toasts = recorder.toasts.lock().unwrap().clone();
    assert!(toasts.iter().any(|t| t.contains("background")));
    assert!(toasts.iter().any(|t| t.contains("succeeded")));
}

#[tokio::test]
async fn exhausted_entry_notifies_before_disappearing() {
    let recorder = Arc::new(ToastRecorder::default());
    let hooks: SharedHooks = recorder.clone();
    let store = LocalStore::in_memory().await.unwrap();
    // Nothing listens on port 1; every delivery fails fast.
    let gateway = RemoteGateway::new(RemoteConfig::new("http://127.0.0.1:1"));
    let service = SyncQueueService::new(store.clone(), gateway, hooks);

    store.put(SYNC_QUEUE, &[reset_entry("a@x.com")]).await.unwrap();
    for _ in 0..=MAX_ATTEMPTS {
        service.process().await;
    }

    assert!(service.pending().await.is_empty());
    let toasts = recorder.toasts.lock().unwrap().clone();
    assert!(toasts.iter().any(|t| t.contains("dropped")));
}

#[tokio::test]
async fn startup_flush_delivers_leftovers_from_a_previous_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("action", "resetPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let store = LocalStore::in_memory().await.unwrap();
    store.put(SYNC_QUEUE, &[reset_entry("a@x.com")]).await.unwrap();

    // Constructing the client schedules the flush.
    let client = StockClient::new(store, RemoteConfig::new(server.uri()), Arc::new(NoopHooks));
    wait_for_drain(client.queue()).await;
}
