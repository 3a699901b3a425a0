//! Page geometry presets
//!
//! Paper sizes and margins are expressed in inches, the unit the Chromium
//! route expects.

/// Paper width and height, in inches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperSize {
    pub width: f64,
    pub height: f64,
}

impl PaperSize {
    pub const A0: PaperSize = PaperSize::new(33.1, 46.8);
    pub const A1: PaperSize = PaperSize::new(23.4, 33.1);
    pub const A2: PaperSize = PaperSize::new(16.54, 23.4);
    pub const A3: PaperSize = PaperSize::new(11.7, 16.5);
    pub const A4: PaperSize = PaperSize::new(8.27, 11.7);
    pub const A5: PaperSize = PaperSize::new(5.8, 8.3);
    pub const A6: PaperSize = PaperSize::new(4.1, 5.8);
    pub const LETTER: PaperSize = PaperSize::new(8.5, 11.0);
    pub const LEGAL: PaperSize = PaperSize::new(8.5, 14.0);
    pub const TABLOID: PaperSize = PaperSize::new(11.0, 17.0);
    pub const LEDGER: PaperSize = PaperSize::new(17.0, 11.0);

    /// Named presets, lowercase
    pub const PRESETS: &'static [(&'static str, PaperSize)] = &[
        ("a0", Self::A0),
        ("a1", Self::A1),
        ("a2", Self::A2),
        ("a3", Self::A3),
        ("a4", Self::A4),
        ("a5", Self::A5),
        ("a6", Self::A6),
        ("letter", Self::LETTER),
        ("legal", Self::LEGAL),
        ("tabloid", Self::TABLOID),
        ("ledger", Self::LEDGER),
    ];

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Look up a preset by name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::PRESETS
            .iter()
            .find(|(preset, _)| *preset == name)
            .map(|(_, size)| *size)
    }
}

/// Four-sided page margins, in inches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// No margins at all
pub const NO_MARGINS: Margins = Margins::uniform(0.0);
/// 1 inch on every side
pub const NORMAL_MARGINS: Margins = Margins::uniform(1.0);
/// 2 inches on every side
pub const LARGE_MARGINS: Margins = Margins::uniform(2.0);

impl Margins {
    pub const fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub const fn uniform(inches: f64) -> Self {
        Self::new(inches, inches, inches, inches)
    }

    /// Look up a preset by name: `none`, `normal` or `large`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "none" => Some(NO_MARGINS),
            "normal" => Some(NORMAL_MARGINS),
            "large" => Some(LARGE_MARGINS),
            _ => None,
        }
    }
}

/// PDF/A-1a output
pub const PDF_A_1A: &str = "PDF/A-1a";
/// PDF/A-2b output
pub const PDF_A_2B: &str = "PDF/A-2b";
/// PDF/A-3b output
pub const PDF_A_3B: &str = "PDF/A-3b";
/// PDF/UA output
pub const PDF_UA: &str = "PDF/UA";
