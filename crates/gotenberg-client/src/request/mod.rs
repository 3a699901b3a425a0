//! Conversion request model
//!
//! Design: every endpoint request owns a [`Delivery`] (transport directives
//! sent as HTTP headers) and, where the endpoint takes options, a
//! [`FormValues`] keyed by a closed enum of that endpoint's field names.
//! The [`Client`](crate::Client) only sees requests through
//! [`ConversionRequest`], so all endpoints share one transport path.

mod html;
mod merge;
mod office;

pub use html::{ChromiumField, HtmlRequest, MediaType};
pub use merge::MergeRequest;
pub use office::{OfficeField, OfficeRequest};

use crate::document::Document;
use crate::error::{GotenbergError, Result};
use crate::format;
use reqwest::Method;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Prefix for headers the server forwards to the webhook
pub const WEBHOOK_FORWARD_PREFIX: &str = "Gotenberg-Webhookurl-";

/// Contract shared by every endpoint request
///
/// The client serializes [`form_files`](Self::form_files) first, then
/// [`form_fields`](Self::form_fields), and sends [`headers`](Self::headers)
/// as HTTP headers.
pub trait ConversionRequest: Send + Sync {
    /// Endpoint path appended to the client hostname
    fn target_path(&self) -> &'static str;

    /// Transport directives of this request
    fn delivery(&self) -> &Delivery;

    /// HTTP headers to send, with their wire names
    fn headers(&self) -> BTreeMap<String, String> {
        self.delivery().to_headers()
    }

    /// Conversion options as multipart text fields
    fn form_fields(&self) -> BTreeMap<&'static str, String>;

    /// Files to attach, keyed by the filename sent on the wire
    fn form_files(&self) -> BTreeMap<String, &Document>;
}

/// Setters for transport directives, available on every request
pub trait DeliveryOptions: ConversionRequest + Sized {
    fn delivery_mut(&mut self) -> &mut Delivery;

    /// Filename the server gives the result
    fn result_filename(mut self, filename: impl Into<String>) -> Self {
        self.delivery_mut()
            .set(DeliveryHeader::ResultFilename, filename.into());
        self
    }

    /// Server-side processing budget, in seconds
    ///
    /// This does not bound the client call itself.
    fn wait_timeout(mut self, seconds: f64) -> Self {
        self.delivery_mut()
            .set(DeliveryHeader::WaitTimeout, format::seconds(seconds));
        self
    }

    /// Deliver the result to this URL instead of the response body
    fn webhook_url(mut self, url: impl Into<String>) -> Self {
        self.delivery_mut().set(DeliveryHeader::WebhookUrl, url.into());
        self
    }

    /// HTTP method the server uses to call the webhook
    fn webhook_method(mut self, method: Method) -> Self {
        self.delivery_mut()
            .set(DeliveryHeader::WebhookMethod, method.as_str().to_string());
        self
    }

    /// URL the server calls when the conversion fails
    fn webhook_error_url(mut self, url: impl Into<String>) -> Self {
        self.delivery_mut()
            .set(DeliveryHeader::WebhookErrorUrl, url.into());
        self
    }

    /// HTTP method the server uses to call the error webhook
    fn webhook_error_method(mut self, method: Method) -> Self {
        self.delivery_mut()
            .set(DeliveryHeader::WebhookErrorMethod, method.as_str().to_string());
        self
    }

    /// Extra headers for the webhook call, as a JSON object string
    fn webhook_extra_headers(mut self, json: impl Into<String>) -> Self {
        self.delivery_mut()
            .set(DeliveryHeader::WebhookExtraHeaders, json.into());
        self
    }

    /// Extra headers for the webhook call, encoded to JSON
    fn webhook_extra_headers_map<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.webhook_extra_headers(json_object(headers))
    }

    /// Forward a custom header to the webhook
    ///
    /// Sent as `Gotenberg-Webhookurl-<key>`.
    fn webhook_url_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.delivery_mut()
            .set(DeliveryHeader::Forwarded(key.into()), value.into());
        self
    }
}

/// Transport directive understood by the server
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeliveryHeader {
    ResultFilename,
    WaitTimeout,
    WebhookUrl,
    WebhookMethod,
    WebhookErrorUrl,
    WebhookErrorMethod,
    WebhookExtraHeaders,
    /// Caller header forwarded to the webhook, without its prefix
    Forwarded(String),
}

impl DeliveryHeader {
    /// Header name on the wire
    pub fn name(&self) -> Cow<'static, str> {
        match self {
            DeliveryHeader::ResultFilename => Cow::Borrowed("resultFilename"),
            DeliveryHeader::WaitTimeout => Cow::Borrowed("waitTimeout"),
            DeliveryHeader::WebhookUrl => Cow::Borrowed("Gotenberg-Webhook-Url"),
            DeliveryHeader::WebhookMethod => Cow::Borrowed("Gotenberg-Webhook-Method"),
            DeliveryHeader::WebhookErrorUrl => Cow::Borrowed("Gotenberg-Webhook-Error-Url"),
            DeliveryHeader::WebhookErrorMethod => Cow::Borrowed("Gotenberg-Webhook-Error-Method"),
            DeliveryHeader::WebhookExtraHeaders => {
                Cow::Borrowed("Gotenberg-Webhook-Extra-Http-Headers")
            }
            DeliveryHeader::Forwarded(key) => {
                Cow::Owned(format!("{}{}", WEBHOOK_FORWARD_PREFIX, key))
            }
        }
    }
}

impl fmt::Display for DeliveryHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Transport directives of a request
#[derive(Debug, Clone, Default)]
pub struct Delivery {
    headers: BTreeMap<DeliveryHeader, String>,
}

impl Delivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, header: DeliveryHeader, value: String) {
        self.headers.insert(header, value);
    }

    pub fn get(&self, header: &DeliveryHeader) -> Option<&str> {
        self.headers.get(header).map(String::as_str)
    }

    /// Webhook URL, if one is set and non-empty
    ///
    /// Only the webhook URL itself decides whether the result is delivered
    /// out of band; other webhook headers do not.
    pub fn webhook_url(&self) -> Option<&str> {
        self.get(&DeliveryHeader::WebhookUrl)
            .filter(|url| !url.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Headers keyed by wire name
    pub fn to_headers(&self) -> BTreeMap<String, String> {
        self.headers
            .iter()
            .map(|(header, value)| (header.name().into_owned(), value.clone()))
            .collect()
    }
}

/// Closed set of multipart field names for one endpoint
pub trait FormField: Copy + Ord + fmt::Debug + Send + Sync + 'static {
    /// Field name on the wire
    fn name(self) -> &'static str;
}

/// Conversion options keyed by an endpoint's field enum
#[derive(Debug, Clone)]
pub struct FormValues<F> {
    values: BTreeMap<F, String>,
}

impl<F> Default for FormValues<F> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl<F: FormField> FormValues<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: F, value: String) {
        self.values.insert(field, value);
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values keyed by wire name
    pub fn to_fields(&self) -> BTreeMap<&'static str, String> {
        self.values
            .iter()
            .map(|(field, value)| (field.name(), value.clone()))
            .collect()
    }
}

/// Reject documents that would collide on the same multipart filename
pub(crate) fn ensure_unique_filenames(documents: &[Document]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for document in documents {
        if !seen.insert(document.filename()) {
            return Err(GotenbergError::InvalidRequest(format!(
                "duplicate filename {}",
                document.filename()
            )));
        }
    }
    Ok(())
}

/// Encode key/value pairs as a JSON object string
pub(crate) fn json_object<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let map: Map<String, Value> = pairs
        .into_iter()
        .map(|(key, value)| (key.into(), Value::String(value.into())))
        .collect();
    Value::Object(map).to_string()
}
