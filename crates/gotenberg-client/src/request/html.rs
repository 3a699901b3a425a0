//! HTML to PDF conversion through Chromium

use super::{json_object, ConversionRequest, Delivery, DeliveryOptions, FormField, FormValues};
use crate::document::Document;
use crate::format;
use crate::page::{Margins, PaperSize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Options of the Chromium HTML route
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChromiumField {
    /// Paper width, in inches (default 8.5)
    PaperWidth,
    /// Paper height, in inches (default 11)
    PaperHeight,
    /// Margins, in inches (default 0.39)
    MarginTop,
    MarginBottom,
    MarginLeft,
    MarginRight,
    /// Prefer the page size defined by CSS (default false)
    PreferCssPageSize,
    /// Print background graphics (default false)
    PrintBackground,
    /// Hide the default white background, allowing transparency (default false)
    OmitBackground,
    Landscape,
    /// Page rendering scale (default 1.0)
    Scale,
    /// Pages to print, e.g. `1-5, 8, 11-13`; empty means all
    NativePageRanges,
    WaitDelay,
    /// JavaScript expression polled until it returns true
    WaitForExpression,
    UserAgent,
    /// Headers Chromium sends while loading the page, as JSON
    ExtraHttpHeaders,
    /// Answer 409 Conflict on exceptions in the Chromium console
    FailOnConsoleExceptions,
    EmulatedMediaType,
    PdfFormat,
}

impl FormField for ChromiumField {
    fn name(self) -> &'static str {
        match self {
            ChromiumField::PaperWidth => "paperWidth",
            ChromiumField::PaperHeight => "paperHeight",
            ChromiumField::MarginTop => "marginTop",
            ChromiumField::MarginBottom => "marginBottom",
            ChromiumField::MarginLeft => "marginLeft",
            ChromiumField::MarginRight => "marginRight",
            ChromiumField::PreferCssPageSize => "preferCssPageSize",
            ChromiumField::PrintBackground => "printBackground",
            ChromiumField::OmitBackground => "omitBackground",
            ChromiumField::Landscape => "landscape",
            ChromiumField::Scale => "scale",
            ChromiumField::NativePageRanges => "nativePageRanges",
            ChromiumField::WaitDelay => "waitDelay",
            ChromiumField::WaitForExpression => "waitForExpression",
            ChromiumField::UserAgent => "userAgent",
            ChromiumField::ExtraHttpHeaders => "extraHttpHeaders",
            ChromiumField::FailOnConsoleExceptions => "failOnConsoleExceptions",
            ChromiumField::EmulatedMediaType => "emulatedMediaType",
            ChromiumField::PdfFormat => "pdfFormat",
        }
    }
}

/// CSS media type Chromium emulates while rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MediaType {
    Screen,
    #[default]
    Print,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Screen => "screen",
            MediaType::Print => "print",
        }
    }
}

/// Request converting an HTML page, with its assets, to PDF
///
/// The main document is always sent as `index.html`, header and footer as
/// `header.html` and `footer.html`. Assets keep their own filenames so the
/// page can reference them relatively.
#[derive(Debug, Clone)]
pub struct HtmlRequest {
    index: Document,
    header: Option<Document>,
    footer: Option<Document>,
    assets: Vec<Document>,
    delivery: Delivery,
    values: FormValues<ChromiumField>,
}

impl HtmlRequest {
    pub const PATH: &'static str = "/forms/chromium/convert/html";

    pub fn new(index: Document) -> Self {
        Self {
            index,
            header: None,
            footer: None,
            assets: Vec::new(),
            delivery: Delivery::new(),
            values: FormValues::new(),
        }
    }

    fn set(mut self, field: ChromiumField, value: String) -> Self {
        self.values.set(field, value);
        self
    }

    /// Value set for a field, as sent on the wire
    pub fn field(&self, field: ChromiumField) -> Option<&str> {
        self.values.get(field)
    }

    /// HTML repeated at the top of every page
    pub fn header(mut self, header: Document) -> Self {
        self.header = Some(header);
        self
    }

    /// HTML repeated at the bottom of every page
    pub fn footer(mut self, footer: Document) -> Self {
        self.footer = Some(footer);
        self
    }

    /// Replace the assets (fonts, images, stylesheets) sent with the page
    pub fn assets(mut self, assets: impl IntoIterator<Item = Document>) -> Self {
        self.assets = assets.into_iter().collect();
        self
    }

    /// Add one asset
    pub fn asset(mut self, asset: Document) -> Self {
        self.assets.push(asset);
        self
    }

    pub fn paper_size(self, size: PaperSize) -> Self {
        self.set(ChromiumField::PaperWidth, format::decimal(size.width))
            .set(ChromiumField::PaperHeight, format::decimal(size.height))
    }

    pub fn margins(self, margins: Margins) -> Self {
        self.set(ChromiumField::MarginTop, format::decimal(margins.top))
            .set(ChromiumField::MarginBottom, format::decimal(margins.bottom))
            .set(ChromiumField::MarginLeft, format::decimal(margins.left))
            .set(ChromiumField::MarginRight, format::decimal(margins.right))
    }

    pub fn prefer_css_page_size(self, prefer: bool) -> Self {
        self.set(ChromiumField::PreferCssPageSize, format::bool_value(prefer))
    }

    pub fn print_background(self, print: bool) -> Self {
        self.set(ChromiumField::PrintBackground, format::bool_value(print))
    }

    pub fn omit_background(self, omit: bool) -> Self {
        self.set(ChromiumField::OmitBackground, format::bool_value(omit))
    }

    pub fn landscape(self, landscape: bool) -> Self {
        self.set(ChromiumField::Landscape, format::bool_value(landscape))
    }

    pub fn scale(self, factor: f64) -> Self {
        self.set(ChromiumField::Scale, format::decimal(factor))
    }

    pub fn native_page_ranges(self, ranges: impl Into<String>) -> Self {
        self.set(ChromiumField::NativePageRanges, ranges.into())
    }

    /// Fixed delay before rendering
    pub fn wait_delay(self, delay: Duration) -> Self {
        self.set(ChromiumField::WaitDelay, format::go_duration(delay))
    }

    /// Delay rendering until this JavaScript expression returns true
    pub fn wait_for_expression(self, expression: impl Into<String>) -> Self {
        self.set(ChromiumField::WaitForExpression, expression.into())
    }

    pub fn user_agent(self, agent: impl Into<String>) -> Self {
        self.set(ChromiumField::UserAgent, agent.into())
    }

    /// Headers Chromium sends while loading the page, as a JSON object string
    pub fn extra_http_headers(self, json: impl Into<String>) -> Self {
        self.set(ChromiumField::ExtraHttpHeaders, json.into())
    }

    /// Headers Chromium sends while loading the page, encoded to JSON
    pub fn extra_http_headers_map<I, K, V>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.extra_http_headers(json_object(headers))
    }

    pub fn fail_on_console_exceptions(self, fail: bool) -> Self {
        self.set(ChromiumField::FailOnConsoleExceptions, format::bool_value(fail))
    }

    pub fn emulated_media_type(self, media: MediaType) -> Self {
        self.set(ChromiumField::EmulatedMediaType, media.as_str().to_string())
    }

    /// PDF/A or PDF/UA output, e.g. [`PDF_A_1A`](crate::PDF_A_1A)
    pub fn pdf_format(self, format: impl Into<String>) -> Self {
        self.set(ChromiumField::PdfFormat, format.into())
    }
}

impl ConversionRequest for HtmlRequest {
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
        let mut files: BTreeMap<String, &Document> = self
            .assets
            .iter()
            .map(|asset| (asset.filename().to_string(), asset))
            .collect();
        // Reserved names always resolve to the page documents, never an asset
        files.insert("index.html".to_string(), &self.index);
        if let Some(header) = &self.header {
            files.insert("header.html".to_string(), header);
        }
        if let Some(footer) = &self.footer {
            files.insert("footer.html".to_string(), footer);
        }
        files
    }
}

impl DeliveryOptions for HtmlRequest {
    fn delivery_mut(&mut self) -> &mut Delivery {
        &mut self.delivery
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{NORMAL_MARGINS, NO_MARGINS, PDF_A_1A};

    fn index() -> Document {
        Document::from_string("page.html", "<html>Foo</html>").unwrap()
    }

    #[test]
    fn test_target_path() {
        let req = HtmlRequest::new(index());
        assert_eq!(req.target_path(), "/forms/chromium/convert/html");
    }

    #[test]
    fn test_a4_without_margins() {
        let req = HtmlRequest::new(index())
            .paper_size(PaperSize::A4)
            .margins(NO_MARGINS);

        let fields = req.form_fields();
        assert_eq!(fields["paperWidth"], "8.270000");
        assert_eq!(fields["paperHeight"], "11.700000");
        assert_eq!(fields["marginTop"], "0.000000");
        assert_eq!(fields["marginBottom"], "0.000000");
        assert_eq!(fields["marginLeft"], "0.000000");
        assert_eq!(fields["marginRight"], "0.000000");
        assert_eq!(fields.len(), 6);
    }

    #[test]
    fn test_all_options() {
        let req = HtmlRequest::new(index())
            .paper_size(PaperSize::LETTER)
            .margins(NORMAL_MARGINS)
            .prefer_css_page_size(false)
            .print_background(true)
            .omit_background(false)
            .landscape(true)
            .scale(1.5)
            .native_page_ranges("1-5, 8")
            .wait_delay(Duration::from_millis(1500))
            .wait_for_expression("window.status === 'ready'")
            .user_agent("Mozilla")
            .extra_http_headers(r#"{"MyHeader":"MyValue"}"#)
            .fail_on_console_exceptions(true)
            .emulated_media_type(MediaType::Screen)
            .pdf_format(PDF_A_1A);

        let fields = req.form_fields();
        assert_eq!(fields.len(), 19);
        assert_eq!(fields["paperWidth"], "8.500000");
        assert_eq!(fields["paperHeight"], "11.000000");
        assert_eq!(fields["marginTop"], "1.000000");
        assert_eq!(fields["preferCssPageSize"], "false");
        assert_eq!(fields["printBackground"], "true");
        assert_eq!(fields["omitBackground"], "false");
        assert_eq!(fields["landscape"], "true");
        assert_eq!(fields["scale"], "1.500000");
        assert_eq!(fields["nativePageRanges"], "1-5, 8");
        assert_eq!(fields["waitDelay"], "1.5s");
        assert_eq!(fields["waitForExpression"], "window.status === 'ready'");
        assert_eq!(fields["userAgent"], "Mozilla");
        assert_eq!(fields["extraHttpHeaders"], r#"{"MyHeader":"MyValue"}"#);
        assert_eq!(fields["failOnConsoleExceptions"], "true");
        assert_eq!(fields["emulatedMediaType"], "screen");
        assert_eq!(fields["pdfFormat"], "PDF/A-1a");
        assert!(req.headers().is_empty());
    }

    #[test]
    fn test_form_files_fixed_names() {
        let header = Document::from_string("my-header.html", "<p>h</p>").unwrap();
        let footer = Document::from_string("my-footer.html", "<p>f</p>").unwrap();
        let font = Document::from_bytes("font.woff", b"woff".to_vec()).unwrap();
        let style = Document::from_string("style.css", "body{}").unwrap();

        let req = HtmlRequest::new(index())
            .header(header)
            .footer(footer)
            .assets([font, style]);

        let files = req.form_files();
        let names: Vec<&str> = files.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["font.woff", "footer.html", "header.html", "index.html", "style.css"]
        );
        assert_eq!(files["index.html"].filename(), "page.html");
        assert_eq!(files["header.html"].filename(), "my-header.html");
    }

    #[test]
    fn test_index_only() {
        let req = HtmlRequest::new(index());
        let files = req.form_files();
        assert_eq!(files.len(), 1);
        assert!(files.contains_key("index.html"));
    }

    #[test]
    fn test_assets_replace_and_append() {
        let img = Document::from_bytes("img.gif", b"GIF89a".to_vec()).unwrap();
        let font = Document::from_bytes("font.woff", b"woff".to_vec()).unwrap();
        let style = Document::from_string("style.css", "body{}").unwrap();

        let req = HtmlRequest::new(index())
            .asset(img)
            .assets([font])
            .asset(style);

        let files = req.form_files();
        assert!(!files.contains_key("img.gif"));
        assert!(files.contains_key("font.woff"));
        assert!(files.contains_key("style.css"));
    }

    #[test]
    fn test_asset_cannot_shadow_page_documents() {
        let footer = Document::from_string("my-footer.html", "<p>f</p>").unwrap();
        let shadow_index = Document::from_string("index.html", "<p>asset</p>").unwrap();
        let shadow_footer = Document::from_string("footer.html", "<p>asset</p>").unwrap();
        let req = HtmlRequest::new(index())
            .footer(footer)
            .assets([shadow_index, shadow_footer]);

        let files = req.form_files();
        assert_eq!(files.len(), 2);
        assert_eq!(files["index.html"].filename(), "page.html");
        assert_eq!(files["footer.html"].filename(), "my-footer.html");
    }

    #[test]
    fn test_extra_http_headers_map() {
        let req = HtmlRequest::new(index()).extra_http_headers_map([("X-Token", "abc")]);
        assert_eq!(req.field(ChromiumField::ExtraHttpHeaders), Some(r#"{"X-Token":"abc"}"#));
    }

    #[test]
    fn test_media_type_default() {
        assert_eq!(MediaType::default().as_str(), "print");
    }
}
