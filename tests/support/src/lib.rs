//! test-support: helpers for robust, nextest-friendly tests.
//!
//! Add as a dev-dependency in your top-level `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test_support = { path = "tests/support", features = ["serde"] }
//! ```
//!
//! Then in tests:
//! ```rust
//! use test_support::{init_tracing, fixtures_dir, MockServer, MockRoute};
//!
//! #[test]
//! fn example() {
//!     init_tracing();
//!     let server = MockServer::start(vec![MockRoute::json("/dash/summary", 200, "{}")]);
//!     let _base = server.url();
//!     let _root = fixtures_dir();
//! }
//! ```

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use std::collections::HashMap;
use std::env;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Initialize `tracing` once, honoring `RUST_LOG` and writing via the test writer.
///
/// Safe to call from multiple tests; only the first call configures the global subscriber.
pub fn init_tracing() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn,test=info"))
            .unwrap();
        // with_test_writer() causes logs to appear alongside failing tests only (cargo/nextest)
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
    Lazy::force(&INIT);
}

/// Initialize insta snapshot settings once per test process.
///
/// - Centralizes snapshot files in `tests/snapshots` (relative to the test binary's CWD)
/// - Omits `Expression:` in snapshot headers for cleaner diffs
pub fn init_insta() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let mut settings = insta::Settings::clone_current();
        settings.set_snapshot_path("../snapshots");
        settings.set_omit_expression(true);
        // Bind settings to the thread for the remainder of the test process by leaking the guard
        let guard = settings.bind_to_scope();
        std::mem::forget(guard);
    });
    Lazy::force(&INIT);
}

/// Return the path to the repository's `tests/fixtures` directory.
///
/// `tests/support` lives next to `tests/fixtures`, so the path is stable regardless
/// of the runner's working directory (cargo vs nextest).
pub fn fixtures_dir() -> PathBuf {
    let support_manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    support_manifest_dir
        .parent()
        .map(|tests_dir| tests_dir.join("fixtures"))
        .unwrap_or_else(|| support_manifest_dir.join("fixtures"))
}

/// Read a UTF-8 text fixture into a string.
pub fn read_fixture_text<P: AsRef<Path>>(rel_path: P) -> String {
    let path = fixtures_dir().join(rel_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

/// Deserialize a JSON fixture into `T` (enable `serde` feature).
#[cfg(feature = "serde")]
pub fn read_fixture_json<T, P>(rel_path: P) -> T
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = fixtures_dir().join(rel_path);
    let file = std::fs::File::open(&path)
        .unwrap_or_else(|e| panic!("failed to open fixture {}: {e}", path.display()));
    serde_json::from_reader::<_, T>(file)
        .unwrap_or_else(|e| panic!("failed to parse JSON fixture {}: {e}", path.display()))
}

/// Set multiple environment variables for the duration of the returned guard.
pub fn with_env(vars: &[(&str, &str)]) -> EnvGuard {
    EnvGuard::set_many(vars)
}

/// Run a binary target with `assert_cmd`, returning the ready-to-run `Command`.
///
/// Fixture and credential variables from the outer environment are removed so
/// each test states exactly what it feeds the binary.
pub fn cmd_bin(bin: &str) -> assert_cmd::Command {
    init_tracing();
    let mut cmd = assert_cmd::Command::cargo_bin(bin).expect("binary target not found");
    cmd.env_remove("CSR_TEST_TESTGRID_JSON")
        .env_remove("CSR_TEST_BOARD_PAGES_JSON")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

/// Guard for temporarily setting environment variables.
pub struct EnvGuard {
    prev: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn set_many(kv: &[(&str, &str)]) -> Self {
        let mut prev = Vec::with_capacity(kv.len());
        for (k, v) in kv {
            let k_owned = k.to_string();
            prev.push((k_owned.clone(), env::var(k).ok()));
            env::set_var(k, v);
        }
        Self { prev }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (k, old) in self.prev.drain(..) {
            match old {
                Some(v) => env::set_var(&k, v),
                None => env::remove_var(&k),
            }
        }
    }
}

// --- Local HTTP server for exercising real clients ---

/// A canned response for one request path.
#[derive(Debug, Clone)]
pub struct MockRoute {
    pub path: String,
    pub status: u16,
    pub body: String,
}

impl MockRoute {
    pub fn json(path: &str, status: u16, body: &str) -> Self {
        Self {
            path: path.to_string(),
            status,
            body: body.to_string(),
        }
    }
}

/// A request as received by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }
}

struct MockState {
    routes: Vec<MockRoute>,
    served: HashMap<String, usize>,
}

impl MockState {
    /// The n-th request to a path gets the n-th route registered for it; the last one repeats.
    fn respond(&mut self, path: &str) -> (u16, String) {
        let candidates: Vec<&MockRoute> = self.routes.iter().filter(|r| r.path == path).collect();
        if candidates.is_empty() {
            return (404, "{\"error\":\"not found\"}".to_string());
        }

        let n = self.served.entry(path.to_string()).or_insert(0);
        let route = candidates[(*n).min(candidates.len() - 1)];
        *n += 1;

        (route.status, route.body.clone())
    }
}

/// Minimal HTTP/1.1 server on 127.0.0.1 serving canned JSON bodies.
///
/// Every connection is answered once and closed. The accept thread is detached and
/// lives until the test process exits.
pub struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockServer {
    pub fn start(routes: Vec<MockRoute>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = Arc::new(Mutex::new(MockState {
            routes,
            served: HashMap::new(),
        }));

        let recorded = requests.clone();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let state = state.clone();
                let recorded = recorded.clone();
                std::thread::spawn(move || {
                    if let Err(e) = handle_connection(stream, &state, &recorded) {
                        tracing::debug!("mock server connection error: {e}");
                    }
                });
            }
        });

        Self { addr, requests }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Status",
    }
}

fn handle_connection(
    stream: TcpStream,
    state: &Mutex<MockState>,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default();
    let path = target.split('?').next().unwrap_or_default().to_string();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line)?;
        if n == 0 || line.trim_end().is_empty() {
            break;
        }
        if let Some((k, v)) = line.split_once(':') {
            headers.push((k.trim().to_string(), v.trim().to_string()));
        }
    }

    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;

    tracing::debug!(%method, %path, "mock server request");
    recorded.lock().expect("requests lock").push(RecordedRequest {
        method,
        path: path.clone(),
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
    });

    let (status, payload) = state.lock().expect("state lock").respond(&path);

    let mut stream = stream;
    write!(
        stream,
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        payload.len(),
        payload
    )?;
    stream.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_repeat_last_response_per_path() {
        let mut state = MockState {
            routes: vec![
                MockRoute::json("/p", 200, "first"),
                MockRoute::json("/p", 500, "second"),
            ],
            served: HashMap::new(),
        };

        assert_eq!(state.respond("/p"), (200, "first".to_string()));
        assert_eq!(state.respond("/p"), (500, "second".to_string()));
        assert_eq!(state.respond("/p"), (500, "second".to_string()));
        assert_eq!(state.respond("/other").0, 404);
    }
}
