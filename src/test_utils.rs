//! Test utilities for scanbook tests.
//!
//! Provides a one-shot local HTTP server so catalog clients can be tested
//! against real sockets: status mapping, body decoding and timeouts.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::respond_with;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (base_url, requests) = respond_with(200, r#"{"title": "x"}"#);
//!     // ... point a client at base_url
//!     assert_eq!(requests.recv().unwrap(), "GET /isbn/978.json HTTP/1.1");
//! }
//! ```

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver};

/// How long a stalled response keeps the connection open
const STALL: Duration = Duration::from_secs(10);

/// Serve one request with the given status and JSON body.
///
/// Returns the base URL and a receiver for the request line
/// (e.g. `GET /volumes?q=... HTTP/1.1`).
pub fn respond_with(status: u16, body: &str) -> (String, Receiver<String>) {
    let body = body.to_string();
    serve_once(move |mut stream| {
        let response = format!(
            "HTTP/1.1 {status} {}\r\n\
             Content-Type: application/json\r\n\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{body}",
            reason(status),
            body.len()
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
    })
}

/// Send `200` headers and part of the body, then go silent.
///
/// Models a read timeout: the connection succeeds and the body never
/// completes.
pub fn stall_body() -> String {
    let (base_url, _requests) = serve_once(|mut stream| {
        let head = "HTTP/1.1 200 OK\r\n\
                    Content-Type: application/json\r\n\
                    Content-Length: 100\r\n\r\n{\"ti";
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.flush();
        thread::sleep(STALL);
    });
    base_url
}

/// A URL on a port nothing listens on.
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read test listener address");
    drop(listener);
    format!("http://{addr}")
}

fn serve_once(respond: impl FnOnce(TcpStream) + Send + 'static) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read test server address");
    let (tx, rx) = bounded(1);

    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let _ = tx.send(read_request_line(&mut stream));
        respond(stream);
    });

    (format!("http://{addr}"), rx)
}

/// Read the request head and return its first line
fn read_request_line(stream: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&head)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
