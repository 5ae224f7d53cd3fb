//! Target output formats.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Raw format name used for LaTeX markers in `RawBlock`/`RawInline` nodes.
pub const RAW_TEX: &str = "tex";

/// Output format the document is being converted to.
///
/// Parsed from the format name a host passes to the filter. Pandoc
/// extensions (`markdown+smart`, `html-native_divs`) are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TargetFormat {
    Latex,
    Beamer,
    #[default]
    Html,
    Html5,
    Markdown,
    Docx,
    Epub,
    /// Any other format; treated as structured output.
    Other(String),
}

impl TargetFormat {
    /// Check whether rules must emit literal LaTeX instead of container nodes.
    #[must_use]
    pub fn is_raw_markup(&self) -> bool {
        matches!(self, Self::Latex | Self::Beamer)
    }

    /// Check whether the format is the slide backend that understands columns.
    #[must_use]
    pub fn is_slides(&self) -> bool {
        matches!(self, Self::Beamer)
    }

    /// Format name as given to the host.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Latex => "latex",
            Self::Beamer => "beamer",
            Self::Html => "html",
            Self::Html5 => "html5",
            Self::Markdown => "markdown",
            Self::Docx => "docx",
            Self::Epub => "epub",
            Self::Other(name) => name,
        }
    }
}

impl FromStr for TargetFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let base = s
            .split(['+', '-'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        Ok(match base.as_str() {
            "latex" => Self::Latex,
            "beamer" => Self::Beamer,
            "html" | "html4" => Self::Html,
            "html5" => Self::Html5,
            "markdown" => Self::Markdown,
            "docx" => Self::Docx,
            "epub" | "epub2" | "epub3" => Self::Epub,
            _ => Self::Other(base),
        })
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
