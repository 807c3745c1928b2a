//! End-to-end over a loopback socket.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use postboard::{MemoryStore, app, serve_listener};

async fn roundtrip(addr: std::net::SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn serves_posts_over_http1_and_shuts_down() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let server = tokio::spawn(serve_listener(
        listener,
        app::router(Arc::new(MemoryStore::new())),
        async {
            let _ = stopped.await;
        },
    ));

    let body = r#"{"name":"wire","content":"over tcp"}"#;
    let created = roundtrip(
        addr,
        &format!(
            "POST /posts HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\
             content-type: application/json\r\ncontent-length: {}\r\n\r\n{body}",
            body.len()
        ),
    )
    .await;
    assert!(created.starts_with("HTTP/1.1 200 OK\r\n"), "{created}");
    let lower = created.to_ascii_lowercase();
    assert!(lower.contains("access-control-allow-origin: *\r\n"));
    assert!(lower.contains("content-type: application/json\r\n"));
    assert!(created.contains(r#""content":"over tcp""#));

    let listed = roundtrip(addr, "GET /posts HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n").await;
    assert!(listed.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(listed.contains(r#""name":"wire""#));

    let missing = roundtrip(addr, "PUT /posts HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n").await;
    assert!(missing.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(missing.ends_with(r#"{"status":"false","message":"no such route"}"#));

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
}
