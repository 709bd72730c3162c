//! Minimal HTTP/1.1 stub server for wire-level tests.
//!
//! Answers a fixed sequence of canned 200 responses on an ephemeral
//! loopback port and records each request's target, `Dropbox-API-Arg`
//! header and body, so tests can assert on the exact wire traffic.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};

/// What one request to the stub carried.
pub struct StubRequest {
    /// Request target, e.g. `/2/files/upload_session/start`.
    pub target: String,
    /// Raw `Dropbox-API-Arg` header value; empty for RPC routes.
    pub api_arg: String,
    pub body: Vec<u8>,
}

/// Serve `responses` in order, one connection each, then hand back the
/// recorded requests through the join handle.
pub fn spawn_stub(responses: Vec<String>) -> (String, JoinHandle<Vec<StubRequest>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
    let base = format!("http://{}/2", listener.local_addr().expect("stub addr"));
    let handle = thread::spawn(move || {
        let mut seen = Vec::with_capacity(responses.len());
        for body in &responses {
            let (mut stream, _) = listener.accept().expect("accept stub connection");
            seen.push(read_request(&mut stream));
            let resp = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(resp.as_bytes()).expect("write stub response");
        }
        seen
    });
    (base, handle)
}

fn read_request(stream: &mut TcpStream) -> StubRequest {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        stream.read_exact(&mut byte).expect("read request head");
        head.push(byte[0]);
    }
    let head = String::from_utf8_lossy(&head);
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split(' ').nth(1))
        .unwrap_or_default()
        .to_string();

    let mut api_arg = String::new();
    let mut content_length = 0usize;
    for line in head.lines().skip(1) {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "dropbox-api-arg" => api_arg = value.trim().to_string(),
            "content-length" => content_length = value.trim().parse().unwrap_or(0),
            _ => {}
        }
    }

    let mut body = vec![0u8; content_length];
    stream.read_exact(&mut body).expect("read request body");
    StubRequest {
        target,
        api_arg,
        body,
    }
}
