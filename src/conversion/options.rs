//! Option resolution.
//!
//! Maps the loosely-typed request into a fully defaulted configuration.
//! Enumerated fields are whitelisted: anything unrecognised falls back to
//! the default instead of failing the request.

use std::fmt;

use crate::conversion::request::ConversionRequest;

/// Output DPI used when the request does not set one.
pub const DEFAULT_DPI: u32 = 350;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Case-insensitive match; `None` for anything outside the closed set.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "portrait" => Some(Self::Portrait),
            "landscape" => Some(Self::Landscape),
            _ => None,
        }
    }

    /// Spelling understood by the engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portrait => "Portrait",
            Self::Landscape => "Landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! page_sizes {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Named paper sizes accepted by the engine.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub enum PageSize {
            #[default]
            A4,
            $($variant),+
        }

        impl PageSize {
            pub const ALL: &'static [PageSize] = &[PageSize::A4, $(PageSize::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    PageSize::A4 => "A4",
                    $(PageSize::$variant => $name),+
                }
            }
        }
    };
}

page_sizes! {
    A0 => "A0", A1 => "A1", A2 => "A2", A3 => "A3",
    A5 => "A5", A6 => "A6", A7 => "A7", A8 => "A8", A9 => "A9",
    B0 => "B0", B1 => "B1", B2 => "B2", B3 => "B3", B4 => "B4", B5 => "B5",
    B6 => "B6", B7 => "B7", B8 => "B8", B9 => "B9", B10 => "B10",
    C5E => "C5E", Comm10E => "Comm10E", Custom => "Custom", DLE => "DLE",
    Executive => "Executive", Folio => "Folio", Ledger => "Ledger",
    Legal => "Legal", Letter => "Letter", Tabloid => "Tabloid",
}

impl PageSize {
    /// Case-insensitive match; `None` for anything outside the closed set.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|size| size.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the right margin comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarginPolicy {
    /// Right margin copies the top margin; `margin_right` is ignored.
    #[default]
    MirrorTop,
    /// Right margin is read from `margin_right`.
    Independent,
}

/// Fully resolved engine configuration. `None` leaves the engine default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRenderOptions {
    pub orientation: Orientation,
    pub page_size: PageSize,
    pub no_collate: bool,
    pub grayscale: Option<bool>,
    pub dpi: u32,
    pub image_dpi: Option<u32>,
    pub image_quality: Option<u32>,
    pub margin_top: Option<u32>,
    pub margin_bottom: Option<u32>,
    pub margin_left: Option<u32>,
    pub margin_right: Option<u32>,
}

impl Default for ResolvedRenderOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            page_size: PageSize::default(),
            no_collate: false,
            grayscale: None,
            dpi: DEFAULT_DPI,
            image_dpi: None,
            image_quality: None,
            margin_top: None,
            margin_bottom: None,
            margin_left: None,
            margin_right: None,
        }
    }
}

fn positive(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v > 0)
}

impl ResolvedRenderOptions {
    pub fn resolve(request: &ConversionRequest, margins: MarginPolicy) -> Self {
        let orientation = request
            .orientation
            .as_deref()
            .and_then(Orientation::parse_lenient)
            .unwrap_or_default();

        let page_size = request
            .page_size
            .as_deref()
            .and_then(PageSize::parse_lenient)
            .unwrap_or_default();

        let margin_top = positive(request.margin_top);
        let margin_right = match margins {
            MarginPolicy::MirrorTop => margin_top,
            MarginPolicy::Independent => positive(request.margin_right),
        };

        Self {
            orientation,
            page_size,
            no_collate: request.nocollate.unwrap_or(false),
            grayscale: request.grayscale,
            dpi: positive(request.dpi).unwrap_or(DEFAULT_DPI),
            image_dpi: positive(request.image_dpi),
            image_quality: positive(request.image_quality),
            margin_top,
            margin_bottom: positive(request.margin_bottom),
            margin_left: positive(request.margin_left),
            margin_right,
        }
    }
}
