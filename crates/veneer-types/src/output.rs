//! Output lines produced by the shell for the surrounding UI.

use serde::Serialize;

/// How a line should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputKind {
    /// Regular command output.
    System,
    /// A failure report.
    Error,
    /// The echoed command line, prefixed with `<cwd> $ `.
    CommandEcho,
    /// The echoed answer to a pending prompt (masked in password mode).
    InputEcho,
}

/// A single rendered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputLine {
    pub kind: OutputKind,
    pub text: String,
}

impl OutputLine {
    pub fn new(kind: OutputKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(OutputKind::System, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(OutputKind::Error, text)
    }

    pub fn command_echo(text: impl Into<String>) -> Self {
        Self::new(OutputKind::CommandEcho, text)
    }

    pub fn input_echo(text: impl Into<String>) -> Self {
        Self::new(OutputKind::InputEcho, text)
    }
}

/// Ordered lines produced by one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OutputBatch(Vec<OutputLine>);

impl OutputBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// A batch holding a single system line.
    pub fn line(text: impl Into<String>) -> Self {
        Self(vec![OutputLine::system(text)])
    }

    /// A batch holding a single error line.
    pub fn error(text: impl Into<String>) -> Self {
        Self(vec![OutputLine::error(text)])
    }

    /// Split multi-line text into one system line per `\n`-separated segment.
    ///
    /// The line structure of `text` is preserved as-is; nothing is re-wrapped.
    pub fn from_text(text: &str) -> Self {
        Self(text.split('\n').map(OutputLine::system).collect())
    }

    pub fn push(&mut self, line: OutputLine) {
        self.0.push(line);
    }

    pub fn push_system(&mut self, text: impl Into<String>) {
        self.0.push(OutputLine::system(text));
    }

    pub fn push_error(&mut self, text: impl Into<String>) {
        self.0.push(OutputLine::error(text));
    }

    /// Append every line of `other`, keeping its order.
    pub fn append(&mut self, other: OutputBatch) {
        self.0.extend(other.0);
    }

    pub fn lines(&self) -> &[OutputLine] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OutputLine> {
        self.0.iter()
    }

    /// Lines of the given kind, as text.
    pub fn texts_of(&self, kind: OutputKind) -> Vec<&str> {
        self.0
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.text.as_str())
            .collect()
    }

    /// Whether any line is an error.
    pub fn has_error(&self) -> bool {
        self.0.iter().any(|l| l.kind == OutputKind::Error)
    }
}

impl From<Vec<OutputLine>> for OutputBatch {
    fn from(lines: Vec<OutputLine>) -> Self {
        Self(lines)
    }
}

impl FromIterator<OutputLine> for OutputBatch {
    fn from_iter<I: IntoIterator<Item = OutputLine>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for OutputBatch {
    type Item = OutputLine;
    type IntoIter = std::vec::IntoIter<OutputLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a OutputBatch {
    type Item = &'a OutputLine;
    type IntoIter = std::slice::Iter<'a, OutputLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
