//! Test HTTP server that holds every request open and records how many were
//! in flight at once.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Default)]
struct Stats {
    current: AtomicUsize,
    peak: AtomicUsize,
    served: AtomicUsize,
}

pub(crate) struct SlowServer {
    addr: SocketAddr,
    stats: Arc<Stats>,
}

impl SlowServer {
    /// Answer every request with `body` after holding it for `hold`
    pub(crate) async fn start(content_type: &'static str, body: &'static str, hold: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let stats = Arc::new(Stats::default());

        let shared = Arc::clone(&stats);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, Arc::clone(&shared), content_type, body, hold));
            }
        });
        Self { addr, stats }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Most requests held at the same time
    pub(crate) fn peak(&self) -> usize {
        self.stats.peak.load(Ordering::SeqCst)
    }

    pub(crate) fn served(&self) -> usize {
        self.stats.served.load(Ordering::SeqCst)
    }
}

async fn serve(
    mut stream: TcpStream,
    stats: Arc<Stats>,
    content_type: &'static str,
    body: &'static str,
    hold: Duration,
) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }

    let now = stats.current.fetch_add(1, Ordering::SeqCst) + 1;
    stats.peak.fetch_max(now, Ordering::SeqCst);
    tokio::time::sleep(hold).await;
    stats.current.fetch_sub(1, Ordering::SeqCst);
    stats.served.fetch_add(1, Ordering::SeqCst);

    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        content_type,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
