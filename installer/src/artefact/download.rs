//! Archive download for release artefacts.
//!
//! Provides a trait-based abstraction for retrieving archive bytes from a
//! URL, so tests can substitute canned responses without network access.
//! The fetcher returns the complete body in memory; nothing touches disk
//! until the bytes have been verified.

use std::io::Read;
use std::time::Duration;

/// Default network timeout for archive downloads.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for fetching archive bytes.
///
/// # Examples
///
/// ```
/// use gh_flow_installer::artefact::download::HttpFetcher;
///
/// let fetcher = HttpFetcher::default();
/// // Use fetcher.fetch(url) in production
/// # let _ = fetcher;
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveFetcher {
    /// Retrieve the full body served at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] for a 404 response and
    /// [`FetchError::Http`] for any other transport or status failure.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Errors arising from archive downloads.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested archive was not found (HTTP 404).
    #[error("archive not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// Reading the response body failed.
    #[error("I/O error reading download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP fetcher using a `ureq` agent with a global request timeout.
pub struct HttpFetcher {
    agent: ureq::Agent,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            timeout,
        }
    }

    /// Return the configured request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }
}

impl ArchiveFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        log::debug!("requesting {url} (timeout {:?})", self.timeout);
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut body = Vec::new();
        response
            .into_body()
            .as_reader()
            .read_to_end(&mut body)
            .map_err(FetchError::Io)?;
        log::debug!("received {} bytes from {url}", body.len());
        Ok(body)
    }
}

/// Map a ureq error to a [`FetchError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        other => FetchError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response on a loopback port and return its URL.
    fn serve_once(status_line: &'static str, body: &'static [u8]) -> (String, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut line = String::new();
            loop {
                line.clear();
                let read = reader.read_line(&mut line).expect("read request");
                if read == 0 || line == "\r\n" {
                    break;
                }
            }
            let head = format!(
                "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).expect("write head");
            stream.write_all(body).expect("write body");
        });
        (format!("http://{addr}/gh-flow.tar.gz"), handle)
    }

    #[test]
    fn fetch_returns_body_bytes() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", b"archive-bytes");
        let body = HttpFetcher::default().fetch(&url).expect("fetch");
        server.join().expect("server thread");
        assert_eq!(body, b"archive-bytes");
    }

    #[test]
    fn fetch_maps_404_to_not_found() {
        let (url, server) = serve_once("HTTP/1.1 404 Not Found", b"");
        let err = HttpFetcher::default().fetch(&url).expect_err("expected 404");
        server.join().expect("server thread");
        assert!(
            matches!(err, FetchError::NotFound { url: ref u } if *u == url),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn map_ureq_error_maps_other_status_to_http_error() {
        let err = ureq::Error::StatusCode(500);
        let mapped = map_ureq_error("https://example.test/archive", &err);
        assert!(matches!(mapped, FetchError::Http { .. }));
        assert!(mapped.to_string().contains("https://example.test/archive"));
    }

    #[test]
    fn with_timeout_records_timeout() {
        let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5));
        assert_eq!(fetcher.timeout(), Duration::from_secs(5));
        assert_eq!(HttpFetcher::default().timeout(), DEFAULT_FETCH_TIMEOUT);
    }
}
