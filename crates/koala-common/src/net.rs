//! Asynchronous resource loading for the Koala CSS core.
//!
//! Provides the [`ResourceLoader`] seam used to fetch imported stylesheets,
//! a default [`HttpLoader`] backed by `reqwest`, `data:` URL decoding, and
//! the cooperative cancellation pair ([`CancelHandle`] / [`CancelSignal`])
//! threaded through every fetch.
//!
//! TODO: Implement proper Fetch Standard (<https://fetch.spec.whatwg.org/>)

use std::time::Duration;

use base64::Engine;
use futures::FutureExt;
use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::watch;
use url::Url;

/// User-Agent header sent with all requests.
const USER_AGENT: &str = concat!("koala-css/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Errors produced while fetching a resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the connection failed.
    #[error("request for {url} failed: {source}")]
    Http {
        /// The requested URL.
        url: String,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("request for {url} returned status {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body could not be read or decoded.
    #[error("could not read body of {url}: {message}")]
    Body {
        /// The requested URL.
        url: String,
        /// What went wrong.
        message: String,
    },

    /// A `data:` URL was malformed.
    #[error("invalid data URL: {0}")]
    DataUrl(String),

    /// The loader does not know how to fetch this scheme.
    #[error("unsupported URL scheme `{0}`")]
    UnsupportedScheme(String),

    /// The fetch was abandoned because its cancel signal fired.
    #[error("fetch cancelled")]
    Cancelled,
}

/// [RFC 2397](https://www.rfc-editor.org/rfc/rfc2397) `data:` URL.
///
/// "dataurl := "data:" [ mediatype ] [ ";base64" ] "," data"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl<'a> {
    /// Everything between `data:` and the comma.
    pub metadata: &'a str,
    /// The raw (still encoded) payload after the comma.
    pub data: &'a str,
}

impl<'a> DataUrl<'a> {
    /// Split a raw `data:` URL into metadata and payload.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DataUrl`] if the scheme is not `data:` or the
    /// comma separator is missing.
    pub fn parse(raw: &'a str) -> Result<Self, FetchError> {
        let Some(rest) = raw.strip_prefix("data:") else {
            return Err(FetchError::DataUrl(format!("not a data URL: {raw}")));
        };
        let Some((metadata, data)) = rest.split_once(',') else {
            return Err(FetchError::DataUrl("missing comma".to_string()));
        };
        Ok(Self { metadata, data })
    }

    /// Whether the payload is base64 encoded.
    #[must_use]
    pub fn is_base64(&self) -> bool {
        self.metadata
            .rsplit(';')
            .next()
            .is_some_and(|last| last.eq_ignore_ascii_case("base64"))
    }

    /// Decode the payload into raw bytes.
    ///
    /// Base64 payloads are decoded with the standard alphabet, everything
    /// else is percent-decoded.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DataUrl`] if decoding fails.
    pub fn decode(&self) -> Result<Vec<u8>, FetchError> {
        if self.is_base64() {
            base64::engine::general_purpose::STANDARD
                .decode(self.data)
                .map_err(|e| FetchError::DataUrl(format!("base64 decode error: {e}")))
        } else {
            Ok(urlencoding::decode_binary(self.data.as_bytes()).into_owned())
        }
    }

    /// Decode the payload as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DataUrl`] if decoding fails or the payload is not UTF-8.
    pub fn decode_text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.decode()?)
            .map_err(|e| FetchError::DataUrl(format!("payload is not UTF-8: {e}")))
    }
}

/// Owner side of a cancellation pair. Dropping it does not cancel.
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

/// Observer side of a cancellation pair, cloned into every fetch.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    receiver: watch::Receiver<bool>,
}

impl CancelHandle {
    /// Create a new cancellation pair.
    #[must_use]
    pub fn pair() -> (Self, CancelSignal) {
        let (sender, receiver) = watch::channel(false);
        (Self { sender }, CancelSignal { receiver })
    }

    /// Signal cancellation to every observer.
    pub fn cancel(&self) {
        let _ = self.sender.send_replace(true);
    }
}

impl CancelSignal {
    /// A signal that never fires.
    #[must_use]
    pub fn never() -> Self {
        let (sender, receiver) = watch::channel(false);
        // A closed channel reads as "never cancelled".
        drop(sender);
        Self { receiver }
    }

    /// Whether cancellation has already been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolve once cancellation is requested. Pends forever if the handle
    /// was dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        loop {
            if *receiver.borrow_and_update() {
                return;
            }
            if receiver.changed().await.is_err() {
                futures::future::pending::<()>().await;
            }
        }
    }
}

/// The loader collaborator: fetch a URL and hand back its text.
///
/// Implementations must honour `cancel` cooperatively; callers additionally
/// race every fetch against the signal.
pub trait ResourceLoader: Send + Sync {
    /// Fetch `url` and return the response body as text.
    fn fetch<'a>(
        &'a self,
        url: &'a Url,
        cancel: &'a CancelSignal,
    ) -> BoxFuture<'a, Result<String, FetchError>>;
}

/// Fetch `url` through `loader`, giving up as soon as `cancel` fires.
///
/// # Errors
///
/// Returns the loader's error, or [`FetchError::Cancelled`].
pub async fn fetch_with_cancel(
    loader: &dyn ResourceLoader,
    url: &Url,
    cancel: &CancelSignal,
) -> Result<String, FetchError> {
    if cancel.is_cancelled() {
        return Err(FetchError::Cancelled);
    }
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(FetchError::Cancelled),
        result = loader.fetch(url, cancel) => result,
    }
}

/// Default loader: `http`/`https` through `reqwest`, `file` through
/// `tokio::fs`, and inline `data:` URLs.
#[derive(Debug, Clone)]
pub struct HttpLoader {
    client: reqwest::Client,
}

impl HttpLoader {
    /// Create a loader with the default timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the HTTP client cannot be created.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| FetchError::Http {
                url: String::new(),
                source,
            })?;
        Ok(Self { client })
    }

    async fn fetch_http(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn fetch_file(url: &Url) -> Result<String, FetchError> {
        let path = url.to_file_path().map_err(|()| FetchError::Body {
            url: url.to_string(),
            message: "not a local file path".to_string(),
        })?;
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FetchError::Body {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

impl ResourceLoader for HttpLoader {
    fn fetch<'a>(
        &'a self,
        url: &'a Url,
        _cancel: &'a CancelSignal,
    ) -> BoxFuture<'a, Result<String, FetchError>> {
        async move {
            log::debug!(target: "net", "fetching {url}");
            match url.scheme() {
                "http" | "https" => self.fetch_http(url).await,
                "file" => Self::fetch_file(url).await,
                "data" => DataUrl::parse(url.as_str())?.decode_text(),
                other => Err(FetchError::UnsupportedScheme(other.to_string())),
            }
        }
        .boxed()
    }
}
