//! Gotenberg client - async client for the Gotenberg document conversion API
//!
//! This crate builds `multipart/form-data` conversion requests and submits
//! them to a Gotenberg server, either returning the raw response or storing
//! the resulting PDF on disk.
//!
//! ## Request model
//!
//! Each endpoint has its own request type. They share one transport path
//! through the [`ConversionRequest`] trait and one set of delivery setters
//! (result filename, wait timeout, webhooks) through [`DeliveryOptions`]:
//! - [`HtmlRequest`] - HTML page with optional header, footer and assets
//! - [`OfficeRequest`] - office documents converted by LibreOffice
//! - [`MergeRequest`] - two or more PDFs concatenated
//!
//! ```no_run
//! use gotenberg_client::{Client, DeliveryOptions, Document, HtmlRequest, PaperSize, NO_MARGINS};
//!
//! # async fn run() -> gotenberg_client::Result<()> {
//! let client = Client::new("http://localhost:3000")?;
//! let index = Document::from_string("index.html", "<html>Hello</html>")?;
//! let request = HtmlRequest::new(index)
//!     .paper_size(PaperSize::A4)
//!     .margins(NO_MARGINS)
//!     .result_filename("hello.pdf");
//! client.store(&request, "out/hello.pdf").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
mod document;
mod error;
mod format;
mod page;
pub mod request;

pub use client::{Client, ClientBuilder};
pub use document::{Document, DocumentReader};
pub use error::{GotenbergError, Result};
pub use page::{
    Margins, PaperSize, LARGE_MARGINS, NORMAL_MARGINS, NO_MARGINS, PDF_A_1A, PDF_A_2B, PDF_A_3B,
    PDF_UA,
};
pub use request::{
    ChromiumField, ConversionRequest, Delivery, DeliveryHeader, DeliveryOptions, FormField,
    FormValues, HtmlRequest, MediaType, MergeRequest, OfficeField, OfficeRequest,
};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = concat!("gotenberg-client/", env!("CARGO_PKG_VERSION"));

/// Hostname used when none is configured
pub const DEFAULT_HOSTNAME: &str = "http://localhost:3000";
