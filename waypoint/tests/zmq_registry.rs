//! End-to-end lookups against an in-process ZeroMQ registry.

use std::time::Duration;

use futures::StreamExt;
use serde_json::{Value, json};
use tmq::Multipart;
use waypoint::{ClientConfig, RegistryClient, ResponseEnvelope, ServiceRecord, ZmqTransport};

fn frames(message: Multipart) -> Vec<u8> {
    message.into_iter().flat_map(|frame| frame.to_vec()).collect()
}

/// Answer `count` find requests, echoing each request id.
fn spawn_registry(context: &tmq::Context, endpoint: &str, count: usize) -> tokio::task::JoinHandle<Vec<Value>> {
    let mut receiver = tmq::reply(context).set_linger(0).bind(endpoint).unwrap();

    tokio::spawn(async move {
        let mut seen = Vec::new();
        for _ in 0..count {
            let (request, sender) = receiver.recv().await.unwrap();
            let request: Value = serde_json::from_slice(&frames(request)).unwrap();

            let service = request["params"].as_str().unwrap().to_string();
            let id = request["id"].as_str().unwrap().to_string();
            let reply = ResponseEnvelope::new(id, ServiceRecord::new(json!({"name": service, "port": 8080})))
                .to_bytes()
                .unwrap();

            receiver = sender.send(Multipart::from(vec![reply])).await.unwrap();
            seen.push(request);
        }
        seen
    })
}

#[tokio::test]
async fn test_whereis_and_invalidate_over_zmq() {
    let transport = ZmqTransport::new();
    let config = ClientConfig::default().scheme("inproc");

    // inproc endpoints are only reachable from sockets on the same context.
    let registry = spawn_registry(transport.context(), &config.resolution_endpoint("registry1"), 2);
    let mut invalidations = tmq::pull(transport.context())
        .set_linger(0)
        .bind(&config.invalidation_endpoint("registry1"))
        .unwrap();

    let client = RegistryClient::with_config(transport, config);

    let record = client.whereis("orders-service", "registry1").await.unwrap();
    assert_eq!(record.as_value(), &json!({"name": "orders-service", "port": 8080}));

    // Served from cache: the registry only ever sees two requests in total.
    let cached = client.whereis("orders-service", "registry1").await.unwrap();
    assert_eq!(cached, record);

    client.invalidate("orders-service", "registry1").await;
    let notification = tokio::time::timeout(Duration::from_secs(5), invalidations.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    let notification: Value = serde_json::from_slice(&frames(notification)).unwrap();
    assert_eq!(notification["method"], "invalidate");
    assert_eq!(notification["params"], json!({"name": "orders-service"}));

    client.whereis("orders-service", "registry1").await.unwrap();

    let seen = registry.await.unwrap();
    assert_eq!(seen.len(), 2);
    assert_ne!(seen[0]["id"], seen[1]["id"]);
    assert!(seen.iter().all(|request| request["method"] == "find"));
}
