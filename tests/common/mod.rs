#![allow(dead_code)]

use axum::{
    Router,
    extract::Path,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect},
    routing::get,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

pub const SAMPLE_PLAYLIST: &str = "#EXTM3U\r\n\
#EXTINF:-1 tvg-id=\"one\" tvg-logo=\"http://x/a.png\" group-title=\"News\",Channel One\r\n\
http://stream/1.m3u8\r\n\
#EXTINF:-1 tvg-name=\"Deux\",Channel Two \u{2013} Été\r\n\
http://stream/2.m3u8\r\n\
#EXTINF:-1,Orphan\r\n";

pub const BIG_BODY_SIZE: usize = 4096;

/// A local origin server for fetcher tests
pub struct Upstream {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl Upstream {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn authority(&self) -> &str {
        self.base_url.trim_start_matches("http://")
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn status(Path(code): Path<u16>) -> impl IntoResponse {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, format!("status {code}"))
}

async fn echo_headers(headers: HeaderMap) -> impl IntoResponse {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    format!("ua={user_agent}\ncookie={cookie}")
}

pub async fn spawn_upstream() -> Upstream {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    let router = Router::new()
        .route("/playlist.m3u", get(|| async { SAMPLE_PLAYLIST }))
        .route("/status/{code}", get(status))
        .route(
            "/redirect",
            get(|| async { Redirect::temporary("/playlist.m3u") }),
        )
        .route("/loop", get(|| async { Redirect::temporary("/loop") }))
        .route("/headers", get(echo_headers))
        .route(
            "/set-cookie",
            get(|| async {
                (
                    [(header::SET_COOKIE, "session=abc123; Path=/")],
                    "cookie set",
                )
            }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "too late"
            }),
        )
        .route("/big", get(|| async { "x".repeat(BIG_BODY_SIZE) }))
        .route(
            "/latin1",
            get(|| async { vec![b'#', b'E', b'X', b'T', b'M', b'3', b'U', b'\n', 0xE9] }),
        )
        .layer(axum::middleware::from_fn(
            move |request: axum::extract::Request, next: axum::middleware::Next| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    next.run(request).await
                }
            },
        ));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind upstream");
    let addr = listener.local_addr().expect("upstream address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("upstream server");
    });

    Upstream {
        base_url: format!("http://{addr}"),
        hits,
    }
}

/// An address nothing is listening on
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}/playlist.m3u")
}
