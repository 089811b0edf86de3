//! Completion, segmentation and probes wired together for a renderer.

use std::str::FromStr;

use crate::complete::Completer;
use crate::error::Error;
use crate::probe::{IncompleteCheck, is_incomplete};
use crate::segment::segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RenderMode {
    /// Text is still arriving: complete it and flag the trailing block.
    #[default]
    Streaming,
    /// Text is final: render it as-is.
    Static,
}

impl FromStr for RenderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "streaming" => Ok(RenderMode::Streaming),
            "static" => Ok(RenderMode::Static),
            _ => Err(Error::UnknownRenderMode(s.to_string())),
        }
    }
}

/// One block ready for a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedBlock {
    pub text: String,
    /// Only ever set on the last block while streaming.
    pub incomplete: bool,
}

#[derive(Debug)]
pub struct Pipeline {
    pub completer: Completer,
    pub mode: RenderMode,
    /// Flag a trailing table as incomplete (more rows may follow).
    pub flag_tables: bool,
    /// Run completion before segmenting in streaming mode.
    pub complete_incomplete: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            completer: Completer::default(),
            mode: RenderMode::Streaming,
            flag_tables: false,
            complete_incomplete: true,
        }
    }
}

impl Pipeline {
    pub fn new(completer: Completer) -> Self {
        Self {
            completer,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_flag_tables(mut self, flag_tables: bool) -> Self {
        self.flag_tables = flag_tables;
        self
    }

    pub fn prepare(&self, text: &str) -> Vec<PreparedBlock> {
        self.prepare_as(text, self.mode)
    }

    /// As [`Pipeline::prepare`], overriding the configured mode for one call.
    pub fn prepare_as(&self, text: &str, mode: RenderMode) -> Vec<PreparedBlock> {
        let streaming = mode == RenderMode::Streaming;
        let completed;
        let source = if streaming && self.complete_incomplete {
            completed = self.completer.complete(text);
            completed.as_str()
        } else {
            text
        };

        let blocks = segment(source);
        let last = blocks.len().saturating_sub(1);
        let check = IncompleteCheck {
            tables: self.flag_tables,
        };
        blocks
            .into_iter()
            .enumerate()
            .map(|(i, block)| PreparedBlock {
                text: block.to_string(),
                incomplete: streaming && i == last && is_incomplete(block, check),
            })
            .collect()
    }
}
