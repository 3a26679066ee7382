//! Throwaway HTTP server for geometry fixtures.
//!
//! Answers every GET with a canned response, enough for the loader's
//! reqwest client without pulling in a web framework.

use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// What the server answers with
#[derive(Debug, Clone)]
pub enum Reply {
    /// 200 with a JSON body
    Json(String),
    /// Bare status line and an empty body
    Status(u16, &'static str),
    /// Accept the connection and never answer
    Hang,
}

/// Start a server on an ephemeral port; it lives until the runtime shuts down
pub async fn serve(reply: Reply) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fixture server");
    let addr = listener.local_addr().expect("Fixture server has no address");

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let reply = reply.clone();
            tokio::spawn(async move {
                let _ = respond(stream, reply).await;
            });
        }
    });

    addr
}

/// URL of `path` on a fixture server
pub fn url(addr: &SocketAddr, path: &str) -> String {
    format!("http://{}{}", addr, path)
}

async fn respond(mut stream: TcpStream, reply: Reply) -> std::io::Result<()> {
    read_request_head(&mut stream).await?;

    let response = match reply {
        Reply::Json(body) => format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        ),
        Reply::Status(code, reason) => format!(
            "HTTP/1.1 {} {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            code, reason
        ),
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(60)).await;
            return Ok(());
        }
    };

    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

async fn read_request_head(stream: &mut TcpStream) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    Ok(())
}
