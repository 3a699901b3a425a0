//! PDF merge through the PDF engines route

use super::{ensure_unique_filenames, ConversionRequest, Delivery, DeliveryOptions};
use crate::document::Document;
use crate::error::{GotenbergError, Result};
use std::collections::BTreeMap;

/// Request concatenating PDFs server-side
///
/// The server merges files in the alphanumeric order of their filenames.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pdfs: Vec<Document>,
    delivery: Delivery,
}

impl MergeRequest {
    pub const PATH: &'static str = "/forms/pdfengines/merge";

    /// Create a request for two or more PDFs with distinct filenames
    pub fn new(pdfs: impl IntoIterator<Item = Document>) -> Result<Self> {
        let pdfs: Vec<Document> = pdfs.into_iter().collect();
        if pdfs.len() < 2 {
            return Err(GotenbergError::InvalidRequest(format!(
                "merge needs at least two PDFs, got {}",
                pdfs.len()
            )));
        }
        ensure_unique_filenames(&pdfs)?;

        Ok(Self {
            pdfs,
            delivery: Delivery::new(),
        })
    }
}

impl ConversionRequest for MergeRequest {
    fn target_path(&self) -> &'static str {
        Self::PATH
    }

    fn delivery(&self) -> &Delivery {
        &self.delivery
    }

    fn form_fields(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::new()
    }

    fn form_files(&self) -> BTreeMap<String, &Document> {
        self.pdfs
            .iter()
            .map(|pdf| (pdf.filename().to_string(), pdf))
            .collect()
    }
}

impl DeliveryOptions for MergeRequest {
    fn delivery_mut(&mut self) -> &mut Delivery {
        &mut self.delivery
    }
}
