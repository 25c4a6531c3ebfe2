//! Integration tests exercising the real TCP transport against a local
//! mock ExaPlay server.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use tcp_client::{ClientConfig, ClientError, ExaPlayClient};

/// Spawn a one-shot mock device that reads a CR-terminated command and
/// answers with the given reply line (already CRLF-terminated).
async fn spawn_mock_device(reply: &'static str) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        let mut command = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            let n = stream.read(&mut byte).await.unwrap();
            if n == 0 || byte[0] == b'\r' {
                break;
            }
            command.push(byte[0]);
        }

        stream.write_all(reply.as_bytes()).await.unwrap();
        stream.flush().await.unwrap();
    });

    addr
}

fn config_for(addr: std::net::SocketAddr) -> ClientConfig {
    ClientConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        timeout: Duration::from_secs(2),
        max_retries: 0,
        retry_backoff: Duration::from_millis(10),
    }
}

#[tokio::test]
async fn round_trip_ok_reply() {
    let addr = spawn_mock_device("OK\r\n").await;
    let client = ExaPlayClient::new(config_for(addr));

    let reply = client.send_command("play,comp1").await.unwrap();
    assert_eq!(reply, "OK");
}

#[tokio::test]
async fn round_trip_status_reply() {
    let addr = spawn_mock_device("1,15.65,939,2,300.0\r\n").await;
    let client = ExaPlayClient::new(config_for(addr));

    let reply = client.send_command("get:status,comp1").await.unwrap();
    assert_eq!(reply, "1,15.65,939,2,300.0");
}

#[tokio::test]
async fn err_reply_surfaces_as_protocol_error() {
    let addr = spawn_mock_device("ERR unknown composition\r\n").await;
    let client = ExaPlayClient::new(config_for(addr));

    let error = client.send_command("play,nosuch").await.unwrap_err();
    assert!(matches!(error, ClientError::Protocol { .. }));
    assert_eq!(error.command(), "play,nosuch");
}

#[tokio::test]
async fn silent_device_times_out() {
    // Accepts the connection but never replies.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
    });

    let client = ExaPlayClient::new(ClientConfig {
        timeout: Duration::from_millis(100),
        ..config_for(addr)
    });

    let error = client.send_command("get:ver").await.unwrap_err();
    assert!(matches!(error, ClientError::Timeout { .. }));
}

#[tokio::test]
async fn unreachable_device_is_connection_failure() {
    // Bind and immediately drop to find a port with no listener.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let client = ExaPlayClient::new(ClientConfig {
        timeout: Duration::from_millis(500),
        ..config_for(addr)
    });

    let error = client.send_command("get:ver").await.unwrap_err();
    assert!(matches!(error, ClientError::Connection { .. }));
}
