//! Integration tests for the HTTP backend against a real HTTP store.
//!
//! Each test starts a small axum server on a background tokio runtime and
//! drives it through the registry-built backend, so the full reqwest path is
//! exercised.
//!
//! Run with: `cargo test --test http_store`

#![cfg(feature = "http-cache")]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use parking_lot::Mutex;

use tilecache::{BackendRegistry, CacheError, CacheOptions, TileCache, TileKey};

// ============================================================================
// Test store
// ============================================================================

/// A request as seen by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Seen {
    method: String,
    path: String,
    content_type: Option<String>,
}

#[derive(Clone, Default)]
struct Store {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Store {
    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().clone()
    }
}

/// Key/value store keyed by path. Paths under `/broken` always answer 500.
async fn handle(
    State(store): State<Store>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Vec<u8>) {
    let path = uri.path().to_string();
    store.seen.lock().push(Seen {
        method: method.to_string(),
        path: path.clone(),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    if path.starts_with("/broken") {
        return (StatusCode::INTERNAL_SERVER_ERROR, Vec::new());
    }

    let mut objects = store.objects.lock();
    match method {
        Method::GET => match objects.get(&path) {
            Some(data) => (StatusCode::OK, data.clone()),
            None => (StatusCode::NOT_FOUND, Vec::new()),
        },
        Method::POST => {
            objects.insert(path, body.to_vec());
            (StatusCode::CREATED, Vec::new())
        }
        Method::DELETE => match objects.remove(&path) {
            Some(_) => (StatusCode::NO_CONTENT, Vec::new()),
            None => (StatusCode::NOT_FOUND, Vec::new()),
        },
        _ => (StatusCode::METHOD_NOT_ALLOWED, Vec::new()),
    }
}

/// Start a server that answers every connection with a 200 whose
/// `Content-Length` promises more bytes than it sends, then hangs up.
fn spawn_truncating_server() -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1024\r\n\r\nshort")
                    .await;
                let _ = socket.shutdown().await;
            }
        });
    });

    format!("http://{}", addr)
}

/// Start a store on an ephemeral port and return its base URL.
fn spawn_store() -> (String, Store) {
    let store = Store::default();
    let app = Router::new().fallback(handle).with_state(store.clone());

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    (format!("http://{}", addr), store)
}

fn http_cache(options: CacheOptions) -> Box<dyn TileCache> {
    BackendRegistry::with_builtin_backends()
        .lookup("http", &options)
        .unwrap_or_else(|e| panic!("failed to build http cache: {}", e))
}

// ============================================================================
// Integration Tests
// ============================================================================

#[test]
fn test_example_scenario_against_live_store() {
    let (base, store) = spawn_store();
    let cache = http_cache(
        CacheOptions::new()
            .with("url", &base)
            .with("max_zoom", 10),
    );

    cache.set(&TileKey::new(12, 4, 7), &[0x01, 0x02]).unwrap();
    assert!(store.seen().is_empty(), "write above max_zoom hit the store");

    cache.set(&TileKey::new(5, 1, 1), &[0xAA]).unwrap();
    assert_eq!(
        store.seen(),
        vec![Seen {
            method: "POST".to_string(),
            path: "/5/1/1".to_string(),
            content_type: Some("binary/octet-stream".to_string()),
        }]
    );

    let value = cache.get(&TileKey::new(5, 1, 1)).unwrap();
    assert_eq!(value, Some(vec![0xAA]));

    let seen = store.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1].method, "GET");
    assert_eq!(seen[1].path, "/5/1/1");
}

#[test]
fn test_miss_then_purge_cycle() {
    let (base, _store) = spawn_store();
    let cache = http_cache(CacheOptions::new().with("url", &base));
    let key = TileKey::new(8, 130, 85);

    assert_eq!(cache.get(&key).unwrap(), None);

    let payload: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
    cache.set(&key, &payload).unwrap();
    assert_eq!(cache.get(&key).unwrap(), Some(payload));

    cache.purge(&key).unwrap();
    assert_eq!(cache.get(&key).unwrap(), None);

    // Purging again answers 404, which still counts as success.
    cache.purge(&key).unwrap();
}

#[test]
fn test_base_url_with_path_prefix() {
    let (base, store) = spawn_store();
    let cache = http_cache(CacheOptions::new().with("url", format!("{}/tiles/", base)));

    cache.set(&TileKey::new(3, 2, 1), &[9]).unwrap();
    assert_eq!(store.seen()[0].path, "/tiles/3/2/1");
}

#[test]
fn test_server_errors() {
    let (base, _store) = spawn_store();
    let key = TileKey::new(4, 4, 4);

    let lenient = http_cache(CacheOptions::new().with("url", format!("{}/broken", base)));
    assert_eq!(lenient.get(&key), Ok(None));
    assert!(lenient.set(&key, &[1]).is_ok());
    assert!(lenient.purge(&key).is_ok());

    let strict = http_cache(
        CacheOptions::new()
            .with("url", format!("{}/broken", base))
            .with("strict_writes", true),
    );
    assert!(matches!(
        strict.set(&key, &[1]),
        Err(CacheError::Status {
            method: "POST",
            status: 500,
            ..
        })
    ));
    assert!(strict.purge(&key).is_err());
}

#[test]
fn test_truncated_body_is_error() {
    let base = spawn_truncating_server();
    let cache = http_cache(
        CacheOptions::new()
            .with("url", &base)
            .with("timeout_secs", 5),
    );

    let err = cache.get(&TileKey::new(5, 1, 1)).unwrap_err();
    assert!(
        matches!(err, CacheError::BodyRead { ref url, .. } if url == &format!("{}/5/1/1", base)),
        "expected BodyRead, got {:?}",
        err
    );
}

#[test]
fn test_unreachable_store() {
    // Bind then drop to get a port with nothing listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let cache = http_cache(
        CacheOptions::new()
            .with("url", format!("http://127.0.0.1:{}", port))
            .with("timeout_secs", 5),
    );
    let key = TileKey::new(1, 0, 0);

    assert!(matches!(cache.get(&key), Err(CacheError::Transport { .. })));
    assert!(matches!(cache.set(&key, &[1]), Err(CacheError::Transport { .. })));
    assert!(matches!(cache.purge(&key), Err(CacheError::Transport { .. })));
}
