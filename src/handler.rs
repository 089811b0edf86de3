/// Priority given to user handlers that do not pick one. Built-ins occupy `0..=70`.
pub const DEFAULT_PRIORITY: i32 = 100;

/// Outcome of one completion stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue(String),
    /// Stop the pipeline and return this text as the final result.
    Halt(String),
}

impl Step {
    pub fn into_text(self) -> String {
        match self {
            Step::Continue(text) | Step::Halt(text) => text,
        }
    }
}

/// A completion stage supplied by the caller.
///
/// Handlers run after (or between) the built-ins according to [`Handler::priority`], lowest
/// first. Ties keep registration order.
pub trait Handler: Send + Sync {
    fn name(&self) -> &str;

    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// Return `Some(new_text)` to replace the text, or `None` to leave it unchanged.
    fn apply(&self, text: &str) -> Option<String>;

    /// Checked on this handler's output; `true` ends the pipeline.
    fn halts(&self, _output: &str) -> bool {
        false
    }
}

/// Adapts a closure into a [`Handler`].
pub struct FnHandler<F> {
    name: String,
    priority: i32,
    f: F,
}

impl<F> FnHandler<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            priority: DEFAULT_PRIORITY,
            f,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn apply(&self, text: &str) -> Option<String> {
        (self.f)(text)
    }
}
