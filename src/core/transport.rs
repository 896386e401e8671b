use crate::error::{Result, ShimError};
use std::collections::HashMap;
use std::io::Read;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Downloads are capped well above any realistic release archive.
const MAX_ARCHIVE_SIZE: u64 = 512 * 1024 * 1024;

const USER_AGENT: &str = concat!("binshim/", env!("CARGO_PKG_VERSION"));

/// Caller-supplied request parameters, passed through to the fetch opaquely.
#[derive(Debug, Clone, Default)]
pub struct TransportOptions {
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

/// Source of release archives.
///
/// The primary implementation is [`HttpTransport`]; [`MemoryTransport`]
/// serves canned responses for tests without network access.
pub trait Transport {
    /// Fetch `url` and return the response body as a streaming reader.
    fn fetch(&self, url: &Url, options: &TransportOptions) -> Result<Box<dyn Read + '_>>;
}

/// Blocking HTTP transport backed by a ureq agent.
#[derive(Debug, Default)]
pub struct HttpTransport;

impl HttpTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &Url, options: &TransportOptions) -> Result<Box<dyn Read + '_>> {
        let mut config = ureq::Agent::config_builder().user_agent(USER_AGENT);
        if let Some(timeout) = options.timeout {
            config = config.timeout_global(Some(timeout));
        }
        let agent = config.build().new_agent();

        let mut request = agent.get(url.as_str());
        for (name, value) in &options.headers {
            request = request.header(name, value);
        }

        // Non-2xx statuses surface as ureq::Error::StatusCode here.
        let response = request.call()?;

        let reader = response
            .into_body()
            .into_with_config()
            .limit(MAX_ARCHIVE_SIZE)
            .reader();
        Ok(Box::new(reader))
    }
}

/// In-memory transport for testing without network access.
///
/// Responses are keyed by URL; every fetch is counted so tests can assert
/// how often the network was touched.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    responses: Arc<Mutex<HashMap<String, CannedResponse>>>,
    fetches: Arc<Mutex<usize>>,
}

#[derive(Debug, Clone)]
enum CannedResponse {
    Body(Vec<u8>),
    Failure { message: String, status: Option<u16> },
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn add_archive(&self, url: &str, body: Vec<u8>) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), CannedResponse::Body(body));
    }

    /// Fail fetches of `url` with a transport error.
    pub fn add_failure(&self, url: &str, message: &str, status: Option<u16>) {
        self.responses.lock().unwrap().insert(
            url.to_string(),
            CannedResponse::Failure {
                message: message.to_string(),
                status,
            },
        );
    }

    /// Number of fetches performed so far.
    pub fn fetch_count(&self) -> usize {
        *self.fetches.lock().unwrap()
    }
}

impl Transport for MemoryTransport {
    fn fetch(&self, url: &Url, _options: &TransportOptions) -> Result<Box<dyn Read + '_>> {
        *self.fetches.lock().unwrap() += 1;

        let responses = self.responses.lock().unwrap();
        match responses.get(url.as_str()) {
            Some(CannedResponse::Body(body)) => Ok(Box::new(std::io::Cursor::new(body.clone()))),
            Some(CannedResponse::Failure { message, status }) => Err(ShimError::Transport {
                message: message.clone(),
                status: *status,
            }),
            None => Err(ShimError::transport(format!(
                "connection refused: {url}"
            ))),
        }
    }
}
