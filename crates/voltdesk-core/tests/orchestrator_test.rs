// Integration tests for the orchestrators against a mocked backend.
#![allow(clippy::unwrap_used)]

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voltdesk_api::{ApiClient, TransportConfig};
use voltdesk_core::{
    Console, DeviceDraft, EntityId, EntityTransition, FORBIDDEN_MESSAGE, InsertPolicy,
    NotificationKind, PowerSet, RolePowerTransition,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Console) {
    let server = MockServer::start().await;
    let url = url::Url::parse(&server.uri()).unwrap();
    let api = ApiClient::new(url, &TransportConfig::default()).unwrap();
    let console = Console::with_api(api, &InsertPolicy::default());
    (server, console)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": data }))
}

fn device_json(id: i64, sn: &str) -> serde_json::Value {
    json!({ "id": id, "sn": sn, "status": "online" })
}

fn power_json(id: i64, name: &str) -> serde_json::Value {
    json!({ "id": id, "name": name, "code": format!("p:{id}") })
}

async fn seed_devices(server: &MockServer, console: &Console, devices: serde_json::Value) {
    let guard = Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ok(devices))
        .mount_as_scoped(server)
        .await;
    console.devices().fetch_all().await.unwrap();
    drop(guard);
}

// ── Fetch ───────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_replaces_collection() {
    let (server, console) = setup().await;
    seed_devices(&server, &console, json!([device_json(1, "A"), device_json(2, "B")])).await;

    let state = console.devices().state();
    assert_eq!(state.len(), 2);
    assert!(!state.is_loading());
    assert!(!state.status.notification.visible);
}

#[tokio::test]
async fn fetch_failure_uses_fallback_message() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/meters"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let outcome = console.meters().fetch_all().await.unwrap();
    assert!(outcome.is_failure());

    let status = console.meters().state().status;
    assert_eq!(status.error.as_deref(), Some("Failed to load meters"));
    assert!(!status.loading);
}

#[tokio::test]
async fn forbidden_gets_distinct_message() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "message": "Access denied"
        })))
        .mount(&server)
        .await;

    console.users().fetch_all().await.unwrap();
    let status = console.users().state().status;
    assert_eq!(status.notification.message, FORBIDDEN_MESSAGE);
    assert_eq!(status.notification.kind, NotificationKind::Error);
}

// ── Create / update / delete ────────────────────────────────────────

#[tokio::test]
async fn create_device_prepends_and_notifies() {
    let (server, console) = setup().await;
    seed_devices(&server, &console, json!([device_json(1, "A")])).await;

    Mock::given(method("POST"))
        .and(path("/devices"))
        .and(body_json(json!({ "sn": "SN-001" })))
        .respond_with(ok(device_json(7, "SN-001")))
        .mount(&server)
        .await;

    let draft = DeviceDraft {
        sn: "SN-001".into(),
        ..DeviceDraft::default()
    };
    let outcome = console.devices().create(draft).await.unwrap();
    assert!(matches!(outcome, EntityTransition::CreateSucceeded(_)));

    let state = console.devices().state();
    let ids: Vec<i64> = state.get_all().iter().map(|d| d.id.get()).collect();
    assert_eq!(ids, vec![7, 1]);
    assert_eq!(state.status.notification.message, "Device created successfully");
    assert_eq!(state.status.notification.kind, NotificationKind::Success);
    assert!(!state.is_loading());
}

#[tokio::test]
async fn delete_rejected_leaves_collection_unchanged() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/powers"))
        .respond_with(ok(json!([power_json(3, "view"), power_json(4, "edit")])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/powers/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "in use"
        })))
        .mount(&server)
        .await;

    console.powers().fetch_all().await.unwrap();
    let before = console.powers().get_all();

    console.powers().delete(EntityId::new(3)).await.unwrap();
    let state = console.powers().state();
    assert_eq!(state.len(), 2);
    assert!(std::sync::Arc::ptr_eq(&before, &state.get_all()));
    assert_eq!(state.status.notification.message, "in use");
    assert!(!state.is_loading());
}

#[tokio::test]
async fn delete_success_removes_record() {
    let (server, console) = setup().await;
    seed_devices(&server, &console, json!([device_json(1, "A"), device_json(2, "B")])).await;
    Mock::given(method("DELETE"))
        .and(path("/devices/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    console.devices().delete(EntityId::new(1)).await.unwrap();
    let state = console.devices().state();
    assert_eq!(state.get_all()[0].id, EntityId::new(2));
    assert_eq!(state.status.notification.message, "Device deleted successfully");
}

#[tokio::test]
async fn update_replaces_matching_record() {
    let (server, console) = setup().await;
    seed_devices(&server, &console, json!([device_json(1, "A"), device_json(2, "B")])).await;
    Mock::given(method("PUT"))
        .and(path("/devices/2"))
        .respond_with(ok(device_json(2, "B-2")))
        .mount(&server)
        .await;

    let draft = DeviceDraft {
        sn: "B-2".into(),
        ..DeviceDraft::default()
    };
    console
        .devices()
        .update(EntityId::new(2), draft)
        .await
        .unwrap();
    let state = console.devices().state();
    assert_eq!(state.get(EntityId::new(2)).unwrap().sn, "B-2");
    assert_eq!(state.get(EntityId::new(1)).unwrap().sn, "A");
}

#[tokio::test]
async fn create_then_refresh_applies_both() {
    let (server, console) = setup().await;
    Mock::given(method("POST"))
        .and(path("/devices"))
        .respond_with(ok(device_json(7, "SN-001")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ok(json!([device_json(1, "A"), device_json(7, "SN-001")])))
        .mount(&server)
        .await;

    let mut log = console.devices().slice().transitions();
    let draft = DeviceDraft {
        sn: "SN-001".into(),
        ..DeviceDraft::default()
    };
    console.devices().create_then_refresh(draft).await.unwrap();

    let mut kinds = Vec::new();
    while let Ok(t) = log.try_recv() {
        kinds.push(serde_json::to_value(&*t).unwrap()["type"].clone());
    }
    assert_eq!(
        kinds,
        vec![
            json!("create_requested"),
            json!("create_succeeded"),
            json!("fetch_succeeded")
        ]
    );

    let state = console.devices().state();
    let ids: Vec<i64> = state.get_all().iter().map(|d| d.id.get()).collect();
    assert_eq!(ids, vec![1, 7]);
    assert_eq!(state.status.notification.message, "Device created successfully");
}

#[tokio::test]
async fn create_then_refresh_keeps_notification_when_refresh_fails() {
    let (server, console) = setup().await;
    Mock::given(method("POST"))
        .and(path("/roles"))
        .respond_with(ok(json!({ "id": 5, "name": "auditor" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/roles"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    console
        .roles()
        .create_then_refresh(voltdesk_core::RoleDraft {
            name: "auditor".into(),
            description: None,
        })
        .await
        .unwrap();

    let state = console.roles().state();
    assert_eq!(state.len(), 1);
    assert_eq!(state.status.notification.message, "Role created successfully");
    assert!(state.status.error.is_none());
}

#[tokio::test]
async fn fetch_one_does_not_touch_slice() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/devices/9"))
        .respond_with(ok(device_json(9, "SN-009")))
        .mount(&server)
        .await;

    let device = console.devices().fetch_one(EntityId::new(9)).await.unwrap();
    assert_eq!(device.sn, "SN-009");
    assert!(console.devices().state().is_empty());
}

// ── Latest-wins ─────────────────────────────────────────────────────

#[tokio::test]
async fn latest_fetch_wins_over_slower_earlier_fetch() {
    let (server, console) = setup().await;

    // First matching request is slow and returns the stale list.
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ok(json!([device_json(1, "stale")])).set_delay(Duration::from_millis(400)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ok(json!([device_json(2, "fresh")])))
        .mount(&server)
        .await;

    let a = console.devices().dispatch(voltdesk_core::Request::Fetch);
    tokio::time::sleep(Duration::from_millis(50)).await;
    let b = console.devices().dispatch(voltdesk_core::Request::Fetch);

    let b = b.await.unwrap();
    let a = a.await.unwrap();
    assert!(b.is_some());
    assert!(a.is_none(), "superseded completion must be discarded");

    let state = console.devices().state();
    assert_eq!(state.get_all()[0].sn, "fresh");
    assert_eq!(state.len(), 1);
}

#[tokio::test]
async fn superseded_fetch_resolving_first_is_still_discarded() {
    let (server, console) = setup().await;

    // A answers first, but B has already been issued by then.
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ok(json!([device_json(1, "stale")])).set_delay(Duration::from_millis(100)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ok(json!([device_json(2, "fresh")])).set_delay(Duration::from_millis(400)))
        .mount(&server)
        .await;

    let a = console.devices().dispatch(voltdesk_core::Request::Fetch);
    tokio::time::sleep(Duration::from_millis(20)).await;
    let b = console.devices().dispatch(voltdesk_core::Request::Fetch);

    assert!(a.await.unwrap().is_none());
    let pending = console.devices().state();
    assert!(pending.is_empty(), "stale records must not land while B is in flight");
    assert!(pending.is_loading());

    assert!(b.await.unwrap().is_some());
    let state = console.devices().state();
    assert_eq!(state.len(), 1);
    assert_eq!(state.get_all()[0].sn, "fresh");
    assert!(!state.is_loading());
}

#[tokio::test]
async fn latest_update_wins_over_slower_earlier_update() {
    let (server, console) = setup().await;
    seed_devices(&server, &console, json!([device_json(1, "A")])).await;

    Mock::given(method("PUT"))
        .and(path("/devices/1"))
        .and(body_json(json!({ "sn": "first" })))
        .respond_with(ok(device_json(1, "first")).set_delay(Duration::from_millis(400)))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/devices/1"))
        .and(body_json(json!({ "sn": "second" })))
        .respond_with(ok(device_json(1, "second")))
        .mount(&server)
        .await;

    let draft = |sn: &str| DeviceDraft {
        sn: sn.into(),
        ..DeviceDraft::default()
    };
    let a = console.devices().dispatch(voltdesk_core::Request::Update {
        id: EntityId::new(1),
        draft: draft("first"),
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    let b = console.devices().dispatch(voltdesk_core::Request::Update {
        id: EntityId::new(1),
        draft: draft("second"),
    });

    assert!(matches!(b.await.unwrap(), Some(EntityTransition::UpdateSucceeded(_))));
    assert!(a.await.unwrap().is_none());
    assert_eq!(
        console.devices().state().get(EntityId::new(1)).unwrap().sn,
        "second"
    );
}

#[tokio::test]
async fn requests_of_other_kinds_do_not_supersede_each_other() {
    let (server, console) = setup().await;
    seed_devices(&server, &console, json!([device_json(1, "A")])).await;

    Mock::given(method("PUT"))
        .and(path("/devices/1"))
        .respond_with(ok(device_json(1, "A-2")).set_delay(Duration::from_millis(200)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ok(json!([device_json(1, "A")])))
        .mount(&server)
        .await;

    let update = console.devices().dispatch(voltdesk_core::Request::Update {
        id: EntityId::new(1),
        draft: DeviceDraft {
            sn: "A-2".into(),
            ..DeviceDraft::default()
        },
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    let fetch = console.devices().dispatch(voltdesk_core::Request::Fetch);

    assert!(fetch.await.unwrap().is_some());
    assert!(update.await.unwrap().is_some());
    assert_eq!(
        console.devices().state().get(EntityId::new(1)).unwrap().sn,
        "A-2"
    );
}

#[tokio::test]
async fn shutdown_discards_in_flight_work() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/menus"))
        .respond_with(ok(json!([])).set_delay(Duration::from_millis(300)))
        .mount(&server)
        .await;

    let handle = console.menus().dispatch(voltdesk_core::Request::Fetch);
    tokio::time::sleep(Duration::from_millis(20)).await;
    console.shutdown();

    assert!(handle.await.unwrap().is_none());
    assert!(console.is_shut_down());
}

// ── Role powers ─────────────────────────────────────────────────────

#[tokio::test]
async fn role_powers_load_and_save_replace() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/roles/2/powers"))
        .respond_with(ok(json!([1, 2, 3])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/roles/2/powers"))
        .and(body_json(json!({ "power_ids": [3, 4] })))
        .respond_with(ok(json!([3, 4])))
        .mount(&server)
        .await;

    let role = EntityId::new(2);
    let loaded = console.role_powers().load(role).await.unwrap();
    assert!(matches!(loaded, RolePowerTransition::LoadSucceeded { .. }));
    assert_eq!(console.role_powers().powers_of(role).unwrap().len(), 3);

    let next: PowerSet = [3, 4].into_iter().map(EntityId::new).collect();
    console.role_powers().save(role, next.clone()).await.unwrap();

    let state = console.role_powers().state();
    assert_eq!(*state.powers_of(role).unwrap(), next);
    assert_eq!(
        state.status.notification.message,
        "Role permissions saved successfully"
    );
}

#[tokio::test]
async fn role_powers_forbidden() {
    let (server, console) = setup().await;
    Mock::given(method("GET"))
        .and(path("/roles/8/powers"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    console.role_powers().load(EntityId::new(8)).await.unwrap();
    let state = console.role_powers().state();
    assert_eq!(state.status.error.as_deref(), Some(FORBIDDEN_MESSAGE));
    assert!(!state.is_loaded(EntityId::new(8)));
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn login_installs_bearer_token() {
    let (server, console) = setup().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ok(json!({
            "token": "jwt-abc",
            "user": { "id": 11, "username": "ops", "role_id": 2 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/menus"))
        .and(header("authorization", "Bearer jwt-abc"))
        .respond_with(ok(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let session = console
        .login("ops", &SecretString::from("pw".to_owned()))
        .await
        .unwrap();
    assert_eq!(session.user.role_id, Some(EntityId::new(2)));

    console.menus().fetch_all().await.unwrap();

    assert!(console.logout().is_some());
    assert!(!console.api().has_token());
    assert!(console.require_session().is_err());
}

#[tokio::test]
async fn login_rejected_is_authentication_failure() {
    let (server, console) = setup().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "bad credentials"
        })))
        .mount(&server)
        .await;

    let err = console
        .login("ops", &SecretString::from("nope".to_owned()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        voltdesk_core::CoreError::AuthenticationFailed { ref message } if message == "bad credentials"
    ));
    assert!(!console.session().is_authenticated());
}
