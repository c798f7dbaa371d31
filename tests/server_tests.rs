//! Process-level tests against the built binary.
//!
//! Each test starts its own server on a free port with explicit environment
//! overrides, talks to it over real sockets, and kills it on drop.
//!
//! Run with: cargo test --test server_tests
use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

const BINARY: &str = env!("CARGO_BIN_EXE_statusd");

/// Ask the OS for a port that is free right now.
fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind ephemeral port")
        .local_addr()
        .unwrap()
        .port()
}

fn server_command(port: u16) -> Command {
    let mut command = Command::new(BINARY);
    command
        .env("PORT", port.to_string())
        .env_remove("SERVICE_NAME")
        .env_remove("HOST")
        .env_remove("LOG_FORMAT")
        .env("RUST_LOG", "off")
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

/// Wait for a child to exit, giving up after `timeout`.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Option<ExitStatus> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if let Some(status) = child.try_wait().expect("Failed to poll server process") {
            return Some(status);
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    None
}

/// Manages a running server process
struct ServerProcess {
    process: Child,
    port: u16,
}

impl ServerProcess {
    fn start(envs: &[(&str, &str)]) -> Self {
        let port = free_port();
        let mut command = server_command(port);
        command.envs(envs.iter().copied());
        let process = command.spawn().expect("Failed to start server binary");

        let server = Self { process, port };
        server.wait_for_ready();
        server
    }

    fn wait_for_ready(&self) {
        let max_attempts = 100;
        let delay = Duration::from_millis(50);

        for _ in 0..max_attempts {
            if TcpStream::connect(("127.0.0.1", self.port)).is_ok() {
                return;
            }
            std::thread::sleep(delay);
        }

        panic!("server did not start listening on port {}", self.port);
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

/// Fetch `path` and return status, Content-Length header and body.
async fn fetch(server: &ServerProcess, path: &str) -> (u16, usize, Vec<u8>) {
    let response = reqwest::get(server.url(path)).await.expect("Request failed");
    let status = response.status().as_u16();
    assert_eq!(
        response.headers()[reqwest::header::CONTENT_TYPE],
        "application/json"
    );
    let declared = response.headers()[reqwest::header::CONTENT_LENGTH]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    let body = response.bytes().await.unwrap().to_vec();
    (status, declared, body)
}

#[tokio::test]
async fn test_root_with_default_service_name() {
    let server = ServerProcess::start(&[]);
    let (status, length, body) = fetch(&server, "/").await;
    assert_eq!(status, 200);
    assert_eq!(body, br#"{"service": "python-microservice", "ok": true}"#);
    assert_eq!(length, body.len());
}

#[tokio::test]
async fn test_root_with_service_name_override() {
    let server = ServerProcess::start(&[("SERVICE_NAME", "foo")]);
    let (status, length, body) = fetch(&server, "/").await;
    assert_eq!(status, 200);
    assert_eq!(body, br#"{"service": "foo", "ok": true}"#);
    assert_eq!(length, body.len());
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = ServerProcess::start(&[]);
    let (status, length, body) = fetch(&server, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, br#"{"status": "healthy"}"#);
    assert_eq!(length, body.len());
}

#[tokio::test]
async fn test_unknown_path() {
    let server = ServerProcess::start(&[]);
    let (status, length, body) = fetch(&server, "/nope").await;
    assert_eq!(status, 404);
    assert_eq!(body, br#"{"error": "not found"}"#);
    assert_eq!(length, body.len());
}

#[tokio::test]
async fn test_repeated_requests_return_identical_bodies() {
    let server = ServerProcess::start(&[("SERVICE_NAME", "foo")]);
    for path in ["/", "/health", "/nope"] {
        let first = fetch(&server, path).await;
        let second = fetch(&server, path).await;
        assert_eq!(first, second, "path {path}");
    }
}

#[test]
fn test_occupied_port_fails_startup() {
    let occupied = TcpListener::bind("0.0.0.0:0").expect("Failed to bind ephemeral port");
    let port = occupied.local_addr().unwrap().port();

    let mut child = server_command(port)
        .spawn()
        .expect("Failed to start server binary");

    let status = wait_with_timeout(&mut child, Duration::from_secs(10));
    if status.is_none() {
        let _ = child.kill();
        let _ = child.wait();
    }
    let status = status.expect("server kept running on an occupied port");
    assert!(!status.success(), "expected non-zero exit, got {status}");
}

#[test]
fn test_invalid_port_fails_startup() {
    let mut child = server_command(0)
        .env("PORT", "not-a-port")
        .spawn()
        .expect("Failed to start server binary");

    let status = wait_with_timeout(&mut child, Duration::from_secs(10))
        .expect("server did not exit on an invalid PORT");
    assert!(!status.success());
}

#[cfg(unix)]
#[test]
fn test_sigterm_stops_server_and_releases_port() {
    let mut server = ServerProcess::start(&[]);
    let port = server.port;

    let sent = Command::new("kill")
        .arg("-TERM")
        .arg(server.process.id().to_string())
        .status()
        .expect("Failed to run kill");
    assert!(sent.success());

    let status = wait_with_timeout(&mut server.process, Duration::from_secs(10))
        .expect("server did not stop after SIGTERM");
    assert!(status.success(), "expected clean exit, got {status}");

    TcpListener::bind(("0.0.0.0", port)).expect("port was not released");
}

#[cfg(unix)]
#[test]
fn test_sigterm_exits_despite_stalled_request() {
    let mut server = ServerProcess::start(&[]);

    // Headers never terminated: the connection stays mid-request
    let mut stalled = TcpStream::connect(("127.0.0.1", server.port)).unwrap();
    stalled
        .write_all(b"GET / HTTP/1.1\r\nHost: x\r\n")
        .unwrap();
    std::thread::sleep(Duration::from_millis(200));

    let sent = Command::new("kill")
        .arg("-TERM")
        .arg(server.process.id().to_string())
        .status()
        .expect("Failed to run kill");
    assert!(sent.success());

    let status = wait_with_timeout(&mut server.process, Duration::from_secs(20))
        .expect("server kept running with a stalled connection after SIGTERM");
    assert!(status.success(), "expected clean exit, got {status}");

    drop(stalled);
}
