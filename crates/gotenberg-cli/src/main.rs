//! Gotenberg CLI - convert documents through a Gotenberg server

use clap::{Args, Parser, Subcommand, ValueEnum};
use gotenberg_client::{
    Client, ConversionRequest, DeliveryOptions, Document, GotenbergError, HtmlRequest, Margins,
    MediaType, MergeRequest, OfficeRequest, PaperSize, DEFAULT_HOSTNAME,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Gotenberg - convert HTML, office documents and PDFs to PDF
#[derive(Parser, Debug)]
#[command(name = "gotenberg")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gotenberg server URL
    #[arg(long, env = "GOTENBERG_URL", default_value = DEFAULT_HOSTNAME, global = true)]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an HTML page and its assets to PDF
    Html(HtmlArgs),
    /// Convert office documents to PDF with LibreOffice
    Office(OfficeArgs),
    /// Merge PDFs into one
    Merge(MergeArgs),
}

/// Where and how the result is delivered
#[derive(Args, Debug)]
struct DeliveryArgs {
    /// File to write the result to
    #[arg(long, short, required_unless_present = "webhook_url")]
    output: Option<PathBuf>,

    /// Filename the server gives the result
    #[arg(long)]
    result_filename: Option<String>,

    /// Server-side processing budget, in seconds
    #[arg(long)]
    wait_timeout: Option<f64>,

    /// Deliver the result to this URL instead of writing it locally
    #[arg(long)]
    webhook_url: Option<String>,

    /// URL called when the conversion fails
    #[arg(long, requires = "webhook_url")]
    webhook_error_url: Option<String>,
}

/// Media type to emulate
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Media {
    Screen,
    Print,
}

impl From<Media> for MediaType {
    fn from(media: Media) -> Self {
        match media {
            Media::Screen => MediaType::Screen,
            Media::Print => MediaType::Print,
        }
    }
}

#[derive(Args, Debug)]
struct HtmlArgs {
    /// Main HTML page, sent as index.html
    index: PathBuf,

    /// HTML header repeated on every page
    #[arg(long)]
    header: Option<PathBuf>,

    /// HTML footer repeated on every page
    #[arg(long)]
    footer: Option<PathBuf>,

    /// Asset referenced by the page (font, image, stylesheet)
    #[arg(long = "asset")]
    assets: Vec<PathBuf>,

    /// Paper size: a0-a6, letter, legal, tabloid, ledger, or WIDTHxHEIGHT in inches
    #[arg(long, value_parser = parse_paper)]
    paper: Option<PaperSize>,

    /// Margins: none, normal, large, or a uniform size in inches
    #[arg(long, value_parser = parse_margins)]
    margins: Option<Margins>,

    /// Landscape orientation
    #[arg(long)]
    landscape: bool,

    /// Page rendering scale
    #[arg(long)]
    scale: Option<f64>,

    /// Pages to print, e.g. 1-5
    #[arg(long)]
    page_ranges: Option<String>,

    /// Delay before rendering, in milliseconds
    #[arg(long)]
    wait_delay_ms: Option<u64>,

    /// JavaScript expression to wait for before rendering
    #[arg(long)]
    wait_for_expression: Option<String>,

    /// Print background graphics
    #[arg(long)]
    print_background: bool,

    /// Media type to emulate
    #[arg(long, value_enum)]
    media: Option<Media>,

    /// PDF/A or PDF/UA output format
    #[arg(long)]
    pdf_format: Option<String>,

    #[command(flatten)]
    delivery: DeliveryArgs,
}

#[derive(Args, Debug)]
struct OfficeArgs {
    /// Documents to convert
    #[arg(required = true)]
    documents: Vec<PathBuf>,

    /// Landscape orientation
    #[arg(long)]
    landscape: bool,

    /// Pages to print, e.g. 1-4
    #[arg(long)]
    page_ranges: Option<String>,

    /// PDF format of the resulting PDF
    #[arg(long)]
    pdf_format: Option<String>,

    /// PDF format applied by LibreOffice's export
    #[arg(long)]
    native_pdf_format: Option<String>,

    /// Return one PDF instead of one per document
    #[arg(long)]
    merge: bool,

    #[command(flatten)]
    delivery: DeliveryArgs,
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// PDFs to merge, at least two
    #[arg(required = true, num_args = 2..)]
    pdfs: Vec<PathBuf>,

    #[command(flatten)]
    delivery: DeliveryArgs,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(message) => println!("{}", message),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<String, GotenbergError> {
    let client = Client::new(&cli.url)?;
    tracing::debug!(url = %client.hostname(), "Using Gotenberg server");

    match cli.command {
        Commands::Html(args) => {
            let request = build_html_request(&args)?;
            submit(&client, request, &args.delivery).await
        }
        Commands::Office(args) => {
            let request = build_office_request(&args)?;
            submit(&client, request, &args.delivery).await
        }
        Commands::Merge(args) => {
            let pdfs = open_all(&args.pdfs)?;
            let request = MergeRequest::new(pdfs)?;
            submit(&client, request, &args.delivery).await
        }
    }
}

fn open_all(paths: &[PathBuf]) -> Result<Vec<Document>, GotenbergError> {
    paths.iter().map(Document::from_path_named).collect()
}

fn build_html_request(args: &HtmlArgs) -> Result<HtmlRequest, GotenbergError> {
    let mut request = HtmlRequest::new(Document::from_path("index.html", &args.index)?)
        .assets(open_all(&args.assets)?);

    if let Some(header) = &args.header {
        request = request.header(Document::from_path("header.html", header)?);
    }
    if let Some(footer) = &args.footer {
        request = request.footer(Document::from_path("footer.html", footer)?);
    }
    if let Some(paper) = args.paper {
        request = request.paper_size(paper);
    }
    if let Some(margins) = args.margins {
        request = request.margins(margins);
    }
    if args.landscape {
        request = request.landscape(true);
    }
    if let Some(scale) = args.scale {
        request = request.scale(scale);
    }
    if let Some(ranges) = &args.page_ranges {
        request = request.native_page_ranges(ranges.as_str());
    }
    if let Some(ms) = args.wait_delay_ms {
        request = request.wait_delay(Duration::from_millis(ms));
    }
    if let Some(expression) = &args.wait_for_expression {
        request = request.wait_for_expression(expression.as_str());
    }
    if args.print_background {
        request = request.print_background(true);
    }
    if let Some(media) = args.media {
        request = request.emulated_media_type(media.into());
    }
    if let Some(format) = &args.pdf_format {
        request = request.pdf_format(format.as_str());
    }

    Ok(request)
}

fn build_office_request(args: &OfficeArgs) -> Result<OfficeRequest, GotenbergError> {
    let mut request = OfficeRequest::new(open_all(&args.documents)?)?;

    if args.landscape {
        request = request.landscape(true);
    }
    if let Some(ranges) = &args.page_ranges {
        request = request.native_page_ranges(ranges.as_str());
    }
    if let Some(format) = &args.pdf_format {
        request = request.pdf_format(format.as_str());
    }
    if let Some(format) = &args.native_pdf_format {
        request = request.native_pdf_format(format.as_str());
    }
    if args.merge {
        request = request.merge(true);
    }

    Ok(request)
}

fn apply_delivery<R: DeliveryOptions>(mut request: R, delivery: &DeliveryArgs) -> R {
    if let Some(filename) = &delivery.result_filename {
        request = request.result_filename(filename.as_str());
    }
    if let Some(timeout) = delivery.wait_timeout {
        request = request.wait_timeout(timeout);
    }
    if let Some(url) = &delivery.webhook_url {
        request = request.webhook_url(url.as_str());
    }
    if let Some(url) = &delivery.webhook_error_url {
        request = request.webhook_error_url(url.as_str());
    }
    request
}

/// Post with a webhook, store otherwise
async fn submit<R: DeliveryOptions>(
    client: &Client,
    request: R,
    delivery: &DeliveryArgs,
) -> Result<String, GotenbergError> {
    let request = apply_delivery(request, delivery);

    if request.delivery().webhook_url().is_some() {
        let response = client.post(&request).await?;
        return Ok(format!(
            "Submitted to {}: server answered {}",
            request.target_path(),
            response.status()
        ));
    }

    // clap requires --output whenever --webhook-url is absent
    let output = delivery.output.as_deref().unwrap_or(Path::new("result.pdf"));
    client.store(&request, output).await?;
    Ok(format!("Wrote {}", output.display()))
}

/// Parse a paper preset name or `WIDTHxHEIGHT` in inches
fn parse_paper(value: &str) -> Result<PaperSize, String> {
    if let Some(size) = PaperSize::from_name(value) {
        return Ok(size);
    }

    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("unknown paper size: {}", value))?;
    let width: f64 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid paper width: {}", width))?;
    let height: f64 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid paper height: {}", height))?;
    Ok(PaperSize::new(width, height))
}

/// Parse a margin preset name or a uniform size in inches
fn parse_margins(value: &str) -> Result<Margins, String> {
    if let Some(margins) = Margins::from_name(value) {
        return Ok(margins);
    }

    value
        .trim()
        .parse::<f64>()
        .map(Margins::uniform)
        .map_err(|_| format!("unknown margins: {}", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gotenberg_client::{ChromiumField, OfficeField, NO_MARGINS};

    #[test]
    fn test_parse_paper() {
        assert_eq!(parse_paper("a4").unwrap(), PaperSize::A4);
        assert_eq!(parse_paper("Letter").unwrap(), PaperSize::LETTER);
        assert_eq!(parse_paper("8.5x14").unwrap(), PaperSize::new(8.5, 14.0));
        assert!(parse_paper("huge").is_err());
        assert!(parse_paper("8.5xwide").is_err());
    }

    #[test]
    fn test_parse_margins() {
        assert_eq!(parse_margins("none").unwrap(), NO_MARGINS);
        assert_eq!(parse_margins("0.5").unwrap(), Margins::uniform(0.5));
        assert!(parse_margins("wide").is_err());
    }

    #[test]
    fn test_output_required_without_webhook() {
        let result = Cli::try_parse_from(["gotenberg", "merge", "a.pdf", "b.pdf"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "gotenberg",
            "merge",
            "a.pdf",
            "b.pdf",
            "--webhook-url",
            "https://example.com/hook",
        ])
        .unwrap();
        match cli.command {
            Commands::Merge(args) => {
                assert_eq!(args.pdfs.len(), 2);
                assert!(args.delivery.output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_merge_needs_two_pdfs() {
        let result = Cli::try_parse_from(["gotenberg", "merge", "a.pdf", "-o", "out.pdf"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_build_html_request() {
        let dir = tempfile::tempdir().unwrap();
        let index = dir.path().join("page.html");
        let style = dir.path().join("style.css");
        std::fs::write(&index, "<html></html>").unwrap();
        std::fs::write(&style, "body{}").unwrap();

        let cli = Cli::try_parse_from([
            "gotenberg",
            "--url",
            "http://gotenberg:3000",
            "html",
            index.to_str().unwrap(),
            "--asset",
            style.to_str().unwrap(),
            "--paper",
            "a4",
            "--margins",
            "none",
            "--wait-delay-ms",
            "1500",
            "--media",
            "screen",
            "-o",
            "out.pdf",
            "--result-filename",
            "report.pdf",
        ])
        .unwrap();
        assert_eq!(cli.url, "http://gotenberg:3000");

        let Commands::Html(args) = cli.command else {
            panic!("expected html command");
        };
        let request = apply_delivery(build_html_request(&args).unwrap(), &args.delivery);

        let files = request.form_files();
        assert!(files.contains_key("index.html"));
        assert!(files.contains_key("style.css"));

        assert_eq!(request.field(ChromiumField::PaperWidth), Some("8.270000"));
        assert_eq!(request.field(ChromiumField::MarginLeft), Some("0.000000"));
        assert_eq!(request.field(ChromiumField::WaitDelay), Some("1.5s"));
        assert_eq!(request.field(ChromiumField::EmulatedMediaType), Some("screen"));
        assert_eq!(request.field(ChromiumField::Landscape), None);
        assert_eq!(request.headers()["resultFilename"], "report.pdf");
    }

    #[test]
    fn test_build_office_request() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("document.docx");
        std::fs::write(&doc, "docx").unwrap();

        let cli = Cli::try_parse_from([
            "gotenberg",
            "office",
            doc.to_str().unwrap(),
            "--landscape",
            "--merge",
            "-o",
            "out.pdf",
        ])
        .unwrap();

        let Commands::Office(args) = cli.command else {
            panic!("expected office command");
        };
        let request = build_office_request(&args).unwrap();
        assert!(request.form_files().contains_key("document.docx"));
        assert_eq!(request.field(OfficeField::Landscape), Some("true"));
        assert_eq!(request.field(OfficeField::Merge), Some("true"));
    }

    #[test]
    fn test_missing_document_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.docx");
        let args = OfficeArgs {
            documents: vec![missing],
            landscape: false,
            page_ranges: None,
            pdf_format: None,
            native_pdf_format: None,
            merge: false,
            delivery: DeliveryArgs {
                output: Some(PathBuf::from("out.pdf")),
                result_filename: None,
                wait_timeout: None,
                webhook_url: None,
                webhook_error_url: None,
            },
        };

        let err = build_office_request(&args).unwrap_err();
        assert!(matches!(err, GotenbergError::InvalidDocument { .. }));
    }
}
