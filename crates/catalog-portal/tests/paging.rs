//! Record fetches against a local search endpoint that caps its page size.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use catalog_core::ReloadMode;
use catalog_portal::{PortalClient, PortalConfig, RecordSource, SourceError};

/// Serves `total` gene records, never more than `cap` per response.
/// Returns the base URL and the request targets received so far.
async fn capped_portal(total: usize, cap: usize) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let targets = Arc::new(Mutex::new(Vec::new()));
    let seen = targets.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let seen = seen.clone();
            tokio::spawn(async move {
                let mut head = Vec::new();
                let mut chunk = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => head.extend_from_slice(&chunk[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&head).to_string();
                let target = head.split_whitespace().nth(1).unwrap_or("/").to_string();
                seen.lock().unwrap().push(target.clone());

                let from = query_number(&target, "from").unwrap_or(0);
                let limit = query_number(&target, "limit").unwrap_or(total);
                let end = (from + limit.min(cap)).min(total);
                let graph: Vec<Value> = (from.min(end)..end)
                    .map(|i| json!({"@id": format!("/genes/G{i}/"), "@type": ["Gene"]}))
                    .collect();
                let body = json!({"@graph": graph, "total": total}).to_string();
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{addr}"), targets)
}

fn query_number(target: &str, key: &str) -> Option<usize> {
    let (_, query) = target.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k == key {
            v.parse().ok()
        } else {
            None
        }
    })
}

fn client(base_url: String, page_size: Option<usize>) -> PortalClient {
    PortalClient::new(PortalConfig {
        base_url,
        page_size,
        timeout_secs: 10,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn capped_pages_still_yield_every_record() {
    let (base_url, targets) = capped_portal(5, 2).await;
    let records = client(base_url, Some(3))
        .fetch_records(ReloadMode::Full)
        .await
        .unwrap();

    assert_eq!(records.len(), 5);
    assert_eq!(records[4].id, "/genes/G4/");
    assert_eq!(targets.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn short_single_response_is_rejected() {
    let (base_url, _) = capped_portal(5, 2).await;
    let err = client(base_url, None)
        .fetch_records(ReloadMode::Full)
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::MalformedResponse(_)));
}

#[tokio::test]
async fn quick_mode_sends_encoded_type_exclusion() {
    let (base_url, targets) = capped_portal(1, 10).await;
    client(base_url, None)
        .fetch_records(ReloadMode::Quick)
        .await
        .unwrap();

    let targets = targets.lock().unwrap();
    assert_eq!(targets.len(), 1);
    assert!(targets[0].starts_with("/search/?"));
    assert!(targets[0].contains("type=Item"));
    assert!(targets[0].contains("type%21=Gene"));
    assert!(targets[0].contains("limit=all"));
}
