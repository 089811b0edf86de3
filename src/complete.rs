//! Incremental completion: close or drop markdown constructs left open by truncation.
//!
//! [`complete`] runs a fixed set of built-in stages plus any user [`Handler`]s, ordered by
//! priority. Every stage is a pure function of the current text, so the whole pipeline can be
//! re-run on each new streamed prefix.

mod delimiters;
mod emphasis;
mod html;
mod lines;
mod links;

use tracing::{debug, trace};

use crate::handler::{Handler, Step};
use crate::options::{LinkMode, Options};
use crate::scan::{trim_trailing_single_space, whitespace_or_markers_only};

pub use links::INCOMPLETE_LINK_URL;

/// Built-in completion stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    ComparisonOperators,
    HtmlTags,
    SetextHeadings,
    Links,
    BoldItalic,
    Bold,
    DoubleUnderscoreItalic,
    SingleAsteriskItalic,
    SingleUnderscoreItalic,
    InlineCode,
    Strikethrough,
    BlockMath,
}

impl Builtin {
    pub const ALL: [Builtin; 12] = [
        Builtin::ComparisonOperators,
        Builtin::HtmlTags,
        Builtin::SetextHeadings,
        Builtin::Links,
        Builtin::BoldItalic,
        Builtin::Bold,
        Builtin::DoubleUnderscoreItalic,
        Builtin::SingleAsteriskItalic,
        Builtin::SingleUnderscoreItalic,
        Builtin::InlineCode,
        Builtin::Strikethrough,
        Builtin::BlockMath,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::ComparisonOperators => "comparison_operators",
            Builtin::HtmlTags => "html_tags",
            Builtin::SetextHeadings => "setext_headings",
            Builtin::Links => "links",
            Builtin::BoldItalic => "bold_italic",
            Builtin::Bold => "bold",
            Builtin::DoubleUnderscoreItalic => "double_underscore_italic",
            Builtin::SingleAsteriskItalic => "single_asterisk_italic",
            Builtin::SingleUnderscoreItalic => "single_underscore_italic",
            Builtin::InlineCode => "inline_code",
            Builtin::Strikethrough => "strikethrough",
            Builtin::BlockMath => "block_math",
        }
    }

    pub fn priority(self) -> i32 {
        match self {
            Builtin::ComparisonOperators => 0,
            Builtin::HtmlTags => 5,
            Builtin::SetextHeadings => 10,
            Builtin::Links => 20,
            Builtin::BoldItalic => 30,
            Builtin::Bold => 35,
            Builtin::DoubleUnderscoreItalic => 40,
            Builtin::SingleAsteriskItalic => 41,
            Builtin::SingleUnderscoreItalic => 42,
            Builtin::InlineCode => 50,
            Builtin::Strikethrough => 60,
            Builtin::BlockMath => 70,
        }
    }

    fn enabled(self, opts: &Options) -> bool {
        match self {
            Builtin::ComparisonOperators => opts.comparison_operators,
            Builtin::HtmlTags => opts.html_tags,
            Builtin::SetextHeadings => opts.setext_headings,
            Builtin::Links => opts.links || opts.images,
            Builtin::BoldItalic => opts.bold_italic,
            Builtin::Bold => opts.bold,
            Builtin::DoubleUnderscoreItalic
            | Builtin::SingleAsteriskItalic
            | Builtin::SingleUnderscoreItalic => opts.italic,
            Builtin::InlineCode => opts.inline_code,
            Builtin::Strikethrough => opts.strikethrough,
            Builtin::BlockMath => opts.block_math,
        }
    }

    /// Run this stage alone. `None` means the text needs no change.
    pub fn apply(self, text: &str, opts: &Options) -> Option<String> {
        match self {
            Builtin::ComparisonOperators => lines::escape_list_comparisons(text),
            Builtin::HtmlTags => html::strip_incomplete_tag(text),
            Builtin::SetextHeadings => lines::protect_setext_marker(text),
            Builtin::Links => links::fix_incomplete_link_or_image(text, opts),
            Builtin::BoldItalic => emphasis::close_bold_italic(text),
            Builtin::Bold => emphasis::close_bold(text),
            Builtin::DoubleUnderscoreItalic => emphasis::close_double_underscore(text),
            Builtin::SingleAsteriskItalic => emphasis::close_single_asterisk(text),
            Builtin::SingleUnderscoreItalic => emphasis::close_single_underscore(text),
            Builtin::InlineCode => delimiters::close_inline_code(text),
            Builtin::Strikethrough => delimiters::close_strikethrough(text),
            Builtin::BlockMath => delimiters::close_block_math(text),
        }
    }

    fn halts(self, output: &str, opts: &Options) -> bool {
        self == Builtin::Links
            && opts.link_mode == LinkMode::Protocol
            && links::ends_with_placeholder(output)
    }
}

#[derive(Clone, Copy)]
enum Stage<'a> {
    Builtin(Builtin),
    Custom(&'a dyn Handler),
}

impl<'a> Stage<'a> {
    fn name(&self) -> &'a str {
        match *self {
            Stage::Builtin(b) => b.name(),
            Stage::Custom(h) => h.name(),
        }
    }

    fn priority(&self) -> i32 {
        match self {
            Stage::Builtin(b) => b.priority(),
            Stage::Custom(h) => h.priority(),
        }
    }

    fn run(&self, text: String, opts: &Options) -> Step {
        let applied = match self {
            Stage::Builtin(b) => b.apply(&text, opts),
            Stage::Custom(h) => h.apply(&text),
        };
        let out = match applied {
            Some(out) => {
                trace!(
                    stage = self.name(),
                    before = text.len(),
                    after = out.len(),
                    "completion rewrote text"
                );
                out
            }
            None => text,
        };
        let halts = match self {
            Stage::Builtin(b) => b.halts(&out, opts),
            Stage::Custom(h) => h.halts(&out),
        };
        if halts { Step::Halt(out) } else { Step::Continue(out) }
    }
}

/// Completion pipeline: built-in stages selected by [`Options`] plus user handlers.
pub struct Completer {
    options: Options,
    handlers: Vec<Box<dyn Handler>>,
}

impl Default for Completer {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl std::fmt::Debug for Completer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completer")
            .field("options", &self.options)
            .field(
                "handlers",
                &self.handlers.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Completer {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            handlers: Vec::new(),
        }
    }

    pub fn with_handler(mut self, handler: impl Handler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn push_handler(&mut self, handler: Box<dyn Handler>) {
        self.handlers.push(handler);
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages().iter().map(|s| s.name()).collect()
    }

    fn stages(&self) -> Vec<Stage<'_>> {
        let mut stages: Vec<Stage<'_>> = Builtin::ALL
            .into_iter()
            .filter(|b| b.enabled(&self.options))
            .map(Stage::Builtin)
            .chain(self.handlers.iter().map(|h| Stage::Custom(h.as_ref())))
            .collect();
        // Stable: equal priorities keep built-in then registration order.
        stages.sort_by_key(|s| s.priority());
        stages
    }

    pub fn complete(&self, text: &str) -> String {
        let mut state = trim_trailing_single_space(text).to_string();
        if state.is_empty() {
            return state;
        }
        for stage in self.stages() {
            match stage.run(state, &self.options) {
                Step::Continue(next) => state = next,
                Step::Halt(out) => {
                    debug!(stage = stage.name(), "completion halted early");
                    return out;
                }
            }
        }
        state
    }
}

/// Complete `text` with the built-in handlers selected by `options`.
pub fn complete(text: &str, options: &Options) -> String {
    Completer::new(options.clone()).complete(text)
}

/// Position of a trailing emphasis-like marker found by [`tail_match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TailMatch {
    pub(crate) start: usize,
    /// The text already ends with one closing marker character.
    pub(crate) half_closed: bool,
}

/// Find the marker run of `run` bytes of `ch` that has no further `ch` after it.
///
/// Positions where `skip` holds are invisible. With `allow_half`, a single `ch` as the final
/// byte is treated as a partial closer and the run before it is returned.
pub(crate) fn tail_match(
    text: &str,
    ch: u8,
    run: usize,
    allow_half: bool,
    skip: impl Fn(usize) -> bool,
) -> Option<TailMatch> {
    let bytes = text.as_bytes();
    let mut visible = (0..bytes.len()).rev().filter(|&i| bytes[i] == ch && !skip(i));
    let ends_run = |end: usize| end + 1 >= run && bytes[end + 1 - run..=end].iter().all(|b| *b == ch);

    let last = visible.next()?;
    if ends_run(last) {
        return Some(TailMatch {
            start: last + 1 - run,
            half_closed: false,
        });
    }
    if !allow_half || last + 1 != bytes.len() {
        return None;
    }
    let prev = visible.next()?;
    ends_run(prev).then(|| TailMatch {
        start: prev + 1 - run,
        half_closed: true,
    })
}

/// Content after a marker that is worth closing.
pub(crate) fn is_meaningful(content: &str) -> bool {
    !content.is_empty() && !whitespace_or_markers_only(content)
}

pub(crate) fn appended(text: &str, suffix: &str) -> String {
    let mut out = String::with_capacity(text.len() + suffix.len());
    out.push_str(text);
    out.push_str(suffix);
    out
}
