// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! RPC and price directory clients against a local HTTP server

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use stakewatch_upstream::{
    ChainDirectoryClient, PriceSource, StatusSource, TendermintRpcClient, UpstreamError,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn rpc_client(addr: SocketAddr) -> TendermintRpcClient {
    TendermintRpcClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_block_height_from_status() {
    let app = Router::new().route(
        "/status",
        get(|| async {
            Json(json!({
                "jsonrpc": "2.0",
                "id": -1,
                "result": {
                    "node_info": {"network": "cosmoshub-4", "moniker": "sentry"},
                    "sync_info": {
                        "latest_block_hash": "7A1C",
                        "latest_block_height": "23456789",
                        "catching_up": false
                    },
                    "validator_info": {"voting_power": "0"}
                }
            }))
        }),
    );
    let addr = spawn(app).await;

    let height = rpc_client(addr).latest_block_height().await.unwrap();
    assert_eq!(height, 23_456_789);
}

#[tokio::test]
async fn test_json_rpc_error_reported() {
    let app = Router::new().route(
        "/status",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "jsonrpc": "2.0",
                    "id": -1,
                    "error": {"code": -32603, "message": "Internal error", "data": "stopping"}
                })),
            )
        }),
    );
    let addr = spawn(app).await;

    let err = rpc_client(addr).latest_block_height().await.unwrap_err();
    match err {
        UpstreamError::JsonRpc { code, message } => {
            assert_eq!(code, -32603);
            assert_eq!(message, "Internal error: stopping");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_non_json_failure_is_transport_error() {
    let app = Router::new().route(
        "/status",
        get(|| async { (StatusCode::BAD_GATEWAY, "upstream down").into_response() }),
    );
    let addr = spawn(app).await;

    let err = rpc_client(addr).latest_block_height().await.unwrap_err();
    assert!(matches!(err, UpstreamError::Transport(_)), "{err}");
}

#[tokio::test]
async fn test_malformed_height_is_decode_error() {
    let app = Router::new().route(
        "/status",
        get(|| async {
            Json(json!({"result": {"sync_info": {"latest_block_height": "tall"}}}))
        }),
    );
    let addr = spawn(app).await;

    let err = rpc_client(addr).latest_block_height().await.unwrap_err();
    assert!(matches!(err, UpstreamError::Decode(_)));
}

#[tokio::test]
async fn test_slow_node_times_out() {
    let app = Router::new().route(
        "/status",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"result": {"sync_info": {"latest_block_height": "1"}}}))
        }),
    );
    let addr = spawn(app).await;

    let client =
        TendermintRpcClient::new(&format!("http://{addr}"), Duration::from_millis(200)).unwrap();
    let err = client.latest_block_height().await.unwrap_err();
    assert!(matches!(err, UpstreamError::Http(ref e) if e.is_timeout()), "{err}");
}

#[tokio::test]
async fn test_price_lookup_by_chain_id() {
    let app = Router::new().route(
        "/",
        get(|| async {
            Json(json!({
                "chains": [
                    {
                        "chain_id": "juno-1",
                        "display": "juno",
                        "prices": {"coingecko": {"juno": {"usd": 0.21}}}
                    },
                    {
                        "chain_id": "cosmoshub-4",
                        "display": "atom",
                        "prices": {"coingecko": {"atom": {"usd": 8.75}}}
                    }
                ]
            }))
        }),
    );
    let addr = spawn(app).await;

    let client =
        ChainDirectoryClient::new(&format!("http://{addr}"), "atom", Duration::from_secs(2))
            .unwrap();
    assert_eq!(client.price_usd("cosmoshub-4").await.unwrap(), 8.75);
    assert!(matches!(
        client.price_usd("stargaze-1").await,
        Err(UpstreamError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_price_directory_http_error() {
    let app = Router::new().route(
        "/",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let addr = spawn(app).await;

    let client =
        ChainDirectoryClient::new(&format!("http://{addr}"), "atom", Duration::from_secs(2))
            .unwrap();
    assert!(matches!(
        client.price_usd("cosmoshub-4").await,
        Err(UpstreamError::Http(_))
    ));
}
