//! Port and chassis manager tests against the recording fake transport

use ironic_client::client::{Call, FakeTransport, Headers, Method};
use ironic_client::v1::{ChassisCreate, Client, Patch, PortCreate};
use serde_json::{json, Value};
use std::sync::Arc;

const PORT_UUID: &str = "11111111-2222-3333-4444-555555555555";
const CHASSIS_UUID: &str = "e74c40e0-d825-11e2-a28f-0800200c9a66";

fn port() -> Value {
    json!({
        "id": 456,
        "uuid": PORT_UUID,
        "node_id": 123,
        "address": "AA:AA:AA:AA:AA:AA",
        "extra": {}
    })
}

fn chassis() -> Value {
    json!({
        "id": 42,
        "uuid": CHASSIS_UUID,
        "description": "data-center-1-chassis",
        "extra": {}
    })
}

fn client_with(fake: FakeTransport) -> (Arc<FakeTransport>, Client) {
    let fake = Arc::new(fake);
    let client = Client::new(fake.clone());
    (fake, client)
}

#[tokio::test]
async fn test_port_list_and_show() {
    let port_path = format!("/v1/ports/{}", PORT_UUID);
    let (api, client) = client_with(
        FakeTransport::default()
            .with_fixture(
                "/v1/ports",
                Method::Get,
                Headers::new(),
                Some(json!({"ports": [port()]})),
            )
            .with_fixture(port_path.clone(), Method::Get, Headers::new(), Some(port())),
    );

    let ports = client.port().list().await.unwrap();
    let shown = client.port().get(PORT_UUID).await.unwrap();

    assert_eq!(
        api.calls(),
        vec![
            Call::new(Method::Get, "/v1/ports", Headers::new(), None),
            Call::new(Method::Get, port_path, Headers::new(), None),
        ]
    );
    assert_eq!(ports, vec![shown.clone()]);
    assert_eq!(shown.address, "AA:AA:AA:AA:AA:AA");
}

#[tokio::test]
async fn test_port_create_sends_only_given_fields() {
    let mut created = port();
    created["extra"] = json!({});
    let (api, client) = client_with(FakeTransport::default().with_fixture(
        "/v1/ports",
        Method::Post,
        Headers::new(),
        Some(created),
    ));

    let fields = PortCreate {
        node_id: Some(123),
        address: "AA:AA:AA:AA:AA:AA".to_string(),
        extra: None,
    };
    let port = client.port().create(&fields).await.unwrap();

    assert_eq!(
        api.calls()[0].body,
        Some(json!({"node_id": 123, "address": "AA:AA:AA:AA:AA:AA"}))
    );
    assert_eq!(port.id, Some(456));
}

#[tokio::test]
async fn test_port_update_and_delete() {
    let port_path = format!("/v1/ports/{}", PORT_UUID);
    let mut updated = port();
    updated["address"] = json!("BB:BB:BB:BB:BB:BB");
    let (api, client) = client_with(
        FakeTransport::default()
            .with_fixture(port_path.clone(), Method::Patch, Headers::new(), Some(updated))
            .with_fixture(port_path.clone(), Method::Delete, Headers::new(), None),
    );

    let patch = Patch::replace("/address", "BB:BB:BB:BB:BB:BB");
    let port = client.port().update(PORT_UUID, &patch).await.unwrap();
    client.port().delete(PORT_UUID).await.unwrap();

    assert_eq!(port.address, "BB:BB:BB:BB:BB:BB");
    assert_eq!(
        api.calls(),
        vec![
            Call::new(
                Method::Patch,
                port_path.clone(),
                Headers::new(),
                Some(json!({"op": "replace", "path": "/address", "value": "BB:BB:BB:BB:BB:BB"}))
            ),
            Call::new(Method::Delete, port_path, Headers::new(), None),
        ]
    );
}

#[tokio::test]
async fn test_chassis_list_uses_chassis_key() {
    let (api, client) = client_with(FakeTransport::default().with_fixture(
        "/v1/chassis",
        Method::Get,
        Headers::new(),
        Some(json!({"chassis": [chassis()]})),
    ));

    let all = client.chassis().list().await.unwrap();

    assert_eq!(api.calls().len(), 1);
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].description.as_deref(), Some("data-center-1-chassis"));
}

#[tokio::test]
async fn test_chassis_create_and_list_nodes() {
    let nodes_path = format!("/v1/chassis/{}/nodes", CHASSIS_UUID);
    let (api, client) = client_with(
        FakeTransport::default()
            .with_fixture("/v1/chassis", Method::Post, Headers::new(), Some(chassis()))
            .with_fixture(
                nodes_path.clone(),
                Method::Get,
                Headers::new(),
                Some(json!({"nodes": [{"id": 123, "driver": "fake", "chassis_id": 42}]})),
            ),
    );

    let fields = ChassisCreate {
        description: Some("data-center-1-chassis".to_string()),
        extra: None,
    };
    let created = client.chassis().create(&fields).await.unwrap();
    let nodes = client.chassis().list_nodes(CHASSIS_UUID).await.unwrap();

    assert_eq!(created.id, Some(42));
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].chassis_id, created.id);
    assert_eq!(
        api.calls(),
        vec![
            Call::new(
                Method::Post,
                "/v1/chassis",
                Headers::new(),
                Some(json!({"description": "data-center-1-chassis"}))
            ),
            Call::new(Method::Get, nodes_path, Headers::new(), None),
        ]
    );
}

#[tokio::test]
async fn test_chassis_delete_missing_is_not_found() {
    let (api, client) = client_with(FakeTransport::default());

    let err = client.chassis().delete(CHASSIS_UUID).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_chassis_show_and_update() {
    let chassis_path = format!("/v1/chassis/{}", CHASSIS_UUID);
    let mut updated = chassis();
    updated["extra"] = json!({"rack": "r12"});
    let (api, client) = client_with(
        FakeTransport::default()
            .with_fixture(chassis_path.clone(), Method::Get, Headers::new(), Some(chassis()))
            .with_fixture(chassis_path.clone(), Method::Patch, Headers::new(), Some(updated)),
    );

    let shown = client.chassis().get(CHASSIS_UUID).await.unwrap();
    let patched = client
        .chassis()
        .update(CHASSIS_UUID, &Patch::add("/extra/rack", "r12"))
        .await
        .unwrap();

    assert_eq!(shown.uuid.map(|u| u.to_string()).as_deref(), Some(CHASSIS_UUID));
    assert_eq!(patched.extra.get("rack"), Some(&json!("r12")));
    assert_eq!(
        api.calls()[1],
        Call::new(
            Method::Patch,
            chassis_path,
            Headers::new(),
            Some(json!({"op": "add", "path": "/extra/rack", "value": "r12"}))
        )
    );
}
