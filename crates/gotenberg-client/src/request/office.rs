//! Office document to PDF conversion through LibreOffice

use super::{
    ensure_unique_filenames, ConversionRequest, Delivery, DeliveryOptions, FormField, FormValues,
};
use crate::document::Document;
use crate::error::{GotenbergError, Result};
use crate::format;
use std::collections::BTreeMap;

/// Options of the LibreOffice route
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OfficeField {
    /// Landscape orientation (default false)
    Landscape,
    /// Pages to print, e.g. `1-4`; empty means all
    NativePageRanges,
    /// PDF format applied by LibreOffice's own export
    NativePdfFormat,
    /// PDF format of the resulting PDF
    PdfFormat,
    /// Merge all outputs into one PDF
    Merge,
}

impl FormField for OfficeField {
    fn name(self) -> &'static str {
        match self {
            OfficeField::Landscape => "landscape",
            OfficeField::NativePageRanges => "nativePageRanges",
            OfficeField::NativePdfFormat => "nativePdfFormat",
            OfficeField::PdfFormat => "pdfFormat",
            OfficeField::Merge => "merge",
        }
    }
}

/// Request converting office documents (docx, xlsx, odt, ...) to PDF
#[derive(Debug, Clone)]
pub struct OfficeRequest {
    documents: Vec<Document>,
    delivery: Delivery,
    values: FormValues<OfficeField>,
}

impl OfficeRequest {
    pub const PATH: &'static str = "/forms/libreoffice/convert";

    /// Create a request for one or more documents with distinct filenames
    pub fn new(documents: impl IntoIterator<Item = Document>) -> Result<Self> {
        let documents: Vec<Document> = documents.into_iter().collect();
        if documents.is_empty() {
            return Err(GotenbergError::InvalidRequest(
                "office conversion needs at least one document".to_string(),
            ));
        }
        ensure_unique_filenames(&documents)?;

        Ok(Self {
            documents,
            delivery: Delivery::new(),
            values: FormValues::new(),
        })
    }

    fn set(mut self, field: OfficeField, value: String) -> Self {
        self.values.set(field, value);
        self
    }

    /// Value set for a field, as sent on the wire
    pub fn field(&self, field: OfficeField) -> Option<&str> {
        self.values.get(field)
    }

    pub fn landscape(self, landscape: bool) -> Self {
        self.set(OfficeField::Landscape, format::bool_value(landscape))
    }

    pub fn native_page_ranges(self, ranges: impl Into<String>) -> Self {
        self.set(OfficeField::NativePageRanges, ranges.into())
    }

    /// Format applied during LibreOffice's export pass
    pub fn native_pdf_format(self, format: impl Into<String>) -> Self {
        self.set(OfficeField::NativePdfFormat, format.into())
    }

    /// Format the resulting PDF is converted to
    pub fn pdf_format(self, format: impl Into<String>) -> Self {
        self.set(OfficeField::PdfFormat, format.into())
    }

    /// Return a single PDF instead of one per input document
    pub fn merge(self, merge: bool) -> Self {
        self.set(OfficeField::Merge, format::bool_value(merge))
    }
}

impl ConversionRequest for OfficeRequest {
    fn target_path(&self) -> &'static str {
        Self::PATH
    }

    fn delivery(&self) -> &Delivery {
        &self.delivery
    }

    fn form_fields(&self) -> BTreeMap<&'static str, String> {
        self.values.to_fields()
    }

    fn form_files(&self) -> BTreeMap<String, &Document> {
        self.documents
            .iter()
            .map(|doc| (doc.filename().to_string(), doc))
            .collect()
    }
}

impl DeliveryOptions for OfficeRequest {
    fn delivery_mut(&mut self) -> &mut Delivery {
        &mut self.delivery
    }
}
