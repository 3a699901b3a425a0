//! HTTP client for the Gotenberg API
//!
//! [`Client`] turns any [`ConversionRequest`] into a `multipart/form-data`
//! POST. [`Client::post`] hands back the raw response; [`Client::store`]
//! requires a synchronous result and streams it to disk.

use crate::document::DocumentReader;
use crate::error::{GotenbergError, Result};
use crate::request::ConversionRequest;
use crate::{Document, DEFAULT_HOSTNAME, DEFAULT_USER_AGENT};
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Response, StatusCode};
use std::error::Error as _;
use std::future::{pending, Future};
use std::io;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, warn};
use url::Url;

/// Multipart field name shared by every file part
const FILES_FIELD: &str = "files";

/// Content type of every file part
const FILE_MIME: &str = "application/octet-stream";

/// Read size when streaming a document into the body
const READ_CHUNK: usize = 64 * 1024;

/// Document read failure, carried through the transport while streaming
#[derive(Debug, Error)]
#[error("Failed to read {filename}")]
struct DocumentReadError {
    filename: String,
    #[source]
    source: io::Error,
}

/// Client options, configured through [`Client::builder`]
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    hostname: Option<String>,
    user_agent: Option<String>,
    connect_timeout: Option<Duration>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base URL of the Gotenberg server, e.g. `http://localhost:3000`
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Bound on establishing the connection
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Bound on the whole call, body transfer included
    ///
    /// Unset by default: conversions can legitimately take long, and the
    /// server enforces its own `waitTimeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured transport; user agent and timeouts are then ignored
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> Result<Client> {
        let hostname =
            normalize_hostname(self.hostname.as_deref().unwrap_or(DEFAULT_HOSTNAME))?;

        let http = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder()
                    .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT));
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build().map_err(GotenbergError::ClientBuildError)?
            }
        };

        Ok(Client { hostname, http })
    }
}

/// Gotenberg API client
///
/// Cheap to clone; clones share the underlying connection pool, so one
/// client can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct Client {
    hostname: String,
    http: reqwest::Client,
}

impl Client {
    /// Create a client with default options
    pub fn new(hostname: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().hostname(hostname).build()
    }

    /// Create a client over an existing transport
    pub fn with_http_client(hostname: impl Into<String>, http: reqwest::Client) -> Result<Self> {
        ClientBuilder::new()
            .hostname(hostname)
            .http_client(http)
            .build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Base URL requests are sent to, without trailing slash
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Submit a request and return the raw response
    ///
    /// Any status is returned as is; the caller decides what counts as
    /// success. With a webhook configured the server typically answers 204.
    pub async fn post<R>(&self, request: &R) -> Result<Response>
    where
        R: ConversionRequest + ?Sized,
    {
        self.post_with_cancel(request, pending()).await
    }

    /// [`post`](Self::post), aborted when `cancel` completes first
    ///
    /// `cancel` can be any future: a `tokio::time::sleep_until` deadline,
    /// a oneshot receiver, a shutdown signal.
    pub async fn post_with_cancel<R, C>(&self, request: &R, cancel: C) -> Result<Response>
    where
        R: ConversionRequest + ?Sized,
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                debug!(path = request.target_path(), "Conversion request cancelled");
                Err(GotenbergError::Cancelled)
            }
            result = self.send(request) => result,
        }
    }

    /// Submit a request and write the resulting file to `dest`
    ///
    /// Parent directories are created as needed. Fails with
    /// [`ConflictingMode`](GotenbergError::ConflictingMode) before any I/O
    /// when a webhook URL is set, and with
    /// [`UnexpectedStatus`](GotenbergError::UnexpectedStatus) without creating
    /// `dest` when the server does not answer 200. A failure while writing
    /// may leave a truncated file behind.
    pub async fn store<R>(&self, request: &R, dest: impl AsRef<Path>) -> Result<()>
    where
        R: ConversionRequest + ?Sized,
    {
        self.store_with_cancel(request, dest, pending()).await
    }

    /// [`store`](Self::store), aborted when `cancel` completes first
    pub async fn store_with_cancel<R, C>(
        &self,
        request: &R,
        dest: impl AsRef<Path>,
        cancel: C,
    ) -> Result<()>
    where
        R: ConversionRequest + ?Sized,
        C: Future<Output = ()>,
    {
        let dest = dest.as_ref();

        if let Some(url) = request.delivery().webhook_url() {
            warn!(webhook = url, "Refusing to store a request that uses a webhook");
            return Err(GotenbergError::ConflictingMode);
        }

        tokio::select! {
            biased;
            _ = cancel => {
                debug!(dest = %dest.display(), "Store cancelled");
                Err(GotenbergError::Cancelled)
            }
            result = self.download(request, dest) => result,
        }
    }

    async fn send<R>(&self, request: &R) -> Result<Response>
    where
        R: ConversionRequest + ?Sized,
    {
        let form = multipart_form(request).await?;
        let url = format!("{}{}", self.hostname, request.target_path());
        let headers = request.headers();

        debug!(url = %url, headers = headers.len(), "Posting conversion request");

        let mut http_request = self.http.post(&url).multipart(form);
        for (name, value) in headers {
            http_request = http_request.header(name, value);
        }

        http_request.send().await.map_err(request_error)
    }

    async fn download<R>(&self, request: &R, dest: &Path) -> Result<()>
    where
        R: ConversionRequest + ?Sized,
    {
        let response = self.send(request).await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(
                        status = status.as_u16(),
                        error = %e,
                        "Failed to read error response body"
                    );
                    Bytes::new()
                }
            };
            warn!(status = status.as_u16(), "Server did not return the converted file");
            return Err(GotenbergError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let written = write_new_file(dest, response).await?;
        debug!(dest = %dest.display(), bytes = written, "Stored conversion result");
        Ok(())
    }
}

/// Validate the hostname and strip its trailing slash
fn normalize_hostname(hostname: &str) -> Result<String> {
    let url = Url::parse(hostname)
        .map_err(|_| GotenbergError::InvalidHostname(hostname.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(GotenbergError::InvalidHostname(hostname.to_string()));
    }
    Ok(hostname.trim_end_matches('/').to_string())
}

/// Build the multipart body: file parts first, then text fields
pub(crate) async fn multipart_form<R>(request: &R) -> Result<Form>
where
    R: ConversionRequest + ?Sized,
{
    let mut form = Form::new();

    let files = request.form_files();
    let fields = request.form_fields();
    debug!(
        path = request.target_path(),
        files = files.len(),
        fields = fields.len(),
        "Building multipart body"
    );

    for (filename, document) in files {
        form = form.part(FILES_FIELD, document_part(filename, document).await?);
    }

    for (name, value) in fields {
        form = form.text(name, value);
    }

    Ok(form)
}

/// Open a fresh reader on the document and stream it as a file part
///
/// Open failures are reported here; read failures surface from the send.
async fn document_part(filename: String, document: &Document) -> Result<Part> {
    let reader = match document.reader().await {
        Ok(reader) => reader,
        Err(source) => return Err(GotenbergError::Serialization { filename, source }),
    };

    let body = Body::wrap_stream(document_stream(filename.clone(), reader));
    Part::stream(body)
        .file_name(filename)
        .mime_str(FILE_MIME)
        .map_err(GotenbergError::Transport)
}

/// Chunks of a document; the reader is dropped at end of stream or on error
fn document_stream(
    filename: String,
    reader: DocumentReader,
) -> impl Stream<Item = std::result::Result<Bytes, DocumentReadError>> + Send + 'static {
    futures::stream::unfold(Some(reader), move |state| {
        let filename = filename.clone();
        async move {
            let mut reader = state?;
            let mut chunk = BytesMut::with_capacity(READ_CHUNK);
            match reader.read_buf(&mut chunk).await {
                Ok(0) => None,
                Ok(_) => Some((Ok(chunk.freeze()), Some(reader))),
                Err(source) => Some((Err(DocumentReadError { filename, source }), None)),
            }
        }
    })
}

/// Map a send failure, recovering document read errors from the source chain
fn request_error(err: reqwest::Error) -> GotenbergError {
    let mut cause = err.source();
    while let Some(current) = cause {
        if let Some(read) = current.downcast_ref::<DocumentReadError>() {
            return GotenbergError::Serialization {
                filename: read.filename.clone(),
                source: io::Error::new(read.source.kind(), read.source.to_string()),
            };
        }
        cause = current.source();
    }
    GotenbergError::Transport(err)
}

/// Stream the response body into a new file, returning bytes written
async fn write_new_file(path: &Path, response: Response) -> Result<u64> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| GotenbergError::filesystem(parent, e))?;
    }

    let mut file = File::create(path)
        .await
        .map_err(|e| GotenbergError::filesystem(path, e))?;
    set_standard_permissions(&file)
        .await
        .map_err(|e| GotenbergError::filesystem(path, e))?;

    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(GotenbergError::Transport)?;
        file.write_all(&chunk)
            .await
            .map_err(|e| GotenbergError::filesystem(path, e))?;
        written += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| GotenbergError::filesystem(path, e))?;
    Ok(written)
}

#[cfg(unix)]
async fn set_standard_permissions(file: &File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o644))
        .await
}

#[cfg(not(unix))]
async fn set_standard_permissions(_file: &File) -> std::io::Result<()> {
    Ok(())
}
