//! Integration tests for the advisory service.
//!
//! Each test serves the real router on a loopback port and points it at
//! stub bitcoind and LND servers.

use std::net::SocketAddr;
use std::time::Duration;

use brixa_advisor::api::{create_router, AppState};
use brixa_advisor::{Advisor, Config};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Serve the API in the background and return its address.
async fn spawn_service(bitcoind: &str, lnd: &str, timeout_ms: u64) -> SocketAddr {
    let config = Config {
        bitcoin_rpc_url: bitcoind.to_string(),
        lnd_rest_url: lnd.to_string(),
        upstream_timeout_ms: timeout_ms,
        ..Config::default()
    };
    let state = AppState::new(Advisor::new(&config).unwrap());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, create_router(state)).await });
    addr
}

async fn get_json(addr: SocketAddr, path_and_query: &str) -> (u16, Value) {
    let response = reqwest::get(format!("http://{}{}", addr, path_and_query))
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

fn estimate(feerate: f64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "result": {"feerate": feerate, "blocks": 2},
        "error": null,
        "id": "ai"
    }))
}

#[tokio::test]
async fn fee_advice_converts_upstream_estimate() {
    let bitcoind = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "estimatesmartfee", "params": [6]})))
        .respond_with(estimate(0.0001))
        .expect(1)
        .mount(&bitcoind)
        .await;

    let addr = spawn_service(&bitcoind.uri(), UNREACHABLE, 2000).await;
    let (status, body) = get_json(addr, "/ai/fee?target_blocks=6").await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"target_blocks": 6, "sats_per_vb": 10.0, "rationale": "bitcoind estimatesmartfee"})
    );
}

#[tokio::test]
async fn fee_advice_never_drops_below_one_sat() {
    let bitcoind = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(estimate(0.0000001))
        .mount(&bitcoind)
        .await;

    let addr = spawn_service(&bitcoind.uri(), UNREACHABLE, 2000).await;

    for target in [-1, 0, 1, 3, 144, 1008] {
        let (status, body) = get_json(addr, &format!("/ai/fee?target_blocks={}", target)).await;
        assert_eq!(status, 200);
        assert_eq!(body["target_blocks"], json!(target));
        assert!(body["sats_per_vb"].as_f64().unwrap() >= 1.0);
    }
}

#[tokio::test]
async fn fee_advice_falls_back_on_slow_upstream() {
    let bitcoind = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(estimate(0.0005).set_delay(Duration::from_millis(800)))
        .mount(&bitcoind)
        .await;

    let addr = spawn_service(&bitcoind.uri(), UNREACHABLE, 100).await;
    let (status, body) = get_json(addr, "/ai/fee").await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"target_blocks": 3, "sats_per_vb": 15.0, "rationale": "default heuristic"})
    );
}

#[tokio::test]
async fn fee_advice_falls_back_when_bitcoind_is_down() {
    let addr = spawn_service(UNREACHABLE, UNREACHABLE, 2000).await;
    let (status, body) = get_json(addr, "/ai/fee?target_blocks=2").await;

    assert_eq!(status, 200);
    assert_eq!(body["sats_per_vb"], json!(15.0));
    assert_eq!(body["rationale"], json!("default heuristic"));
}

#[tokio::test]
async fn fee_advice_stays_populated_for_overflowing_estimate() {
    let bitcoind = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(estimate(1e306))
        .mount(&bitcoind)
        .await;

    let addr = spawn_service(&bitcoind.uri(), UNREACHABLE, 2000).await;
    let (status, body) = get_json(addr, "/ai/fee").await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({"target_blocks": 3, "sats_per_vb": 15.0, "rationale": "default heuristic"})
    );
}

#[tokio::test]
async fn route_advice_without_pubkey_is_unprocessable() {
    let addr = spawn_service(UNREACHABLE, UNREACHABLE, 2000).await;
    let (status, body) = get_json(addr, "/ai/route").await;

    assert_eq!(status, 422);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn concurrent_fee_requests_do_not_interfere() {
    let bitcoind = MockServer::start().await;
    for (target, feerate) in [(1, 0.0004), (2, 0.0002), (3, 0.0001)] {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"params": [target]})))
            .respond_with(estimate(feerate))
            .mount(&bitcoind)
            .await;
    }

    let addr = spawn_service(&bitcoind.uri(), UNREACHABLE, 2000).await;

    let requests = (0..30).map(|i| {
        let target = i % 3 + 1;
        async move {
            let (_, body) = get_json(addr, &format!("/ai/fee?target_blocks={}", target)).await;
            (target, body)
        }
    });

    for (target, body) in spawn_all(requests).await {
        let expected = match target {
            1 => 40.0,
            2 => 20.0,
            _ => 10.0,
        };
        assert_eq!(body["target_blocks"], json!(target));
        assert_eq!(body["sats_per_vb"].as_f64().unwrap(), expected);
    }
}

#[tokio::test]
async fn route_advice_echoes_pubkey_across_calls() {
    let addr = spawn_service(UNREACHABLE, UNREACHABLE, 2000).await;

    for _ in 0..3 {
        let (status, body) = get_json(addr, "/ai/route?dest_pubkey=anypubkey").await;
        assert_eq!(status, 200);
        assert_eq!(body["dest_pubkey"], json!("anypubkey"));
        assert_eq!(body["score"], json!(0.5));
    }
}

#[tokio::test]
async fn health_is_ok_when_lnd_is_unreachable() {
    let addr = spawn_service(UNREACHABLE, UNREACHABLE, 2000).await;
    let (status, body) = get_json(addr, "/health").await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn health_calls_lnd_getinfo() {
    let lnd = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/getinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"synced_to_chain": true})))
        .expect(2)
        .mount(&lnd)
        .await;

    let addr = spawn_service(UNREACHABLE, &lnd.uri(), 2000).await;

    let (status, body) = get_json(addr, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"ok": true}));

    let (status, body) = get_json(addr, "/ready").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"ready": true, "lnd": true}));
}

/// Spawn every future and collect the outputs in order.
async fn spawn_all<F, T>(futures: impl IntoIterator<Item = F>) -> Vec<T>
where
    F: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = futures.into_iter().map(tokio::spawn).collect();
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}
