use std::str::FromStr;

use crate::error::Error;

/// What to do with a link whose URL (or closing `]`) has not arrived yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LinkMode {
    /// Point the link at [`INCOMPLETE_LINK_URL`](crate::INCOMPLETE_LINK_URL) and stop completing.
    #[default]
    Protocol,
    /// Render only the link text.
    TextOnly,
}

impl FromStr for LinkMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "protocol" => Ok(LinkMode::Protocol),
            "text-only" | "text_only" | "textonly" => Ok(LinkMode::TextOnly),
            _ => Err(Error::UnknownLinkMode(s.to_string())),
        }
    }
}

/// Toggles for the built-in completion handlers. Everything is on by default.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Options {
    pub links: bool,
    pub images: bool,
    pub bold: bool,
    pub italic: bool,
    pub bold_italic: bool,
    pub inline_code: bool,
    pub strikethrough: bool,
    #[cfg_attr(feature = "serde", serde(alias = "katex"))]
    pub block_math: bool,
    pub setext_headings: bool,
    pub comparison_operators: bool,
    pub html_tags: bool,
    pub link_mode: LinkMode,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            links: true,
            images: true,
            bold: true,
            italic: true,
            bold_italic: true,
            inline_code: true,
            strikethrough: true,
            block_math: true,
            setext_headings: true,
            comparison_operators: true,
            html_tags: true,
            link_mode: LinkMode::Protocol,
        }
    }
}

impl Options {
    /// All handlers disabled; useful as a base when only one repair is wanted.
    pub fn none() -> Self {
        Self {
            links: false,
            images: false,
            bold: false,
            italic: false,
            bold_italic: false,
            inline_code: false,
            strikethrough: false,
            block_math: false,
            setext_headings: false,
            comparison_operators: false,
            html_tags: false,
            link_mode: LinkMode::Protocol,
        }
    }

    pub fn with_link_mode(mut self, mode: LinkMode) -> Self {
        self.link_mode = mode;
        self
    }
}
