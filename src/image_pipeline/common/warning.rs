//! Non-fatal conditions reported alongside a successful conversion.

use std::fmt;

/// The input held a different number of samples than `width * height`.
///
/// The loader recovers by zero-padding or truncating; the warning is kept so
/// the caller can correct the dimensions if the mismatch was unintended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeMismatch {
    pub expected: usize,
    pub actual: usize,
}

impl SizeMismatch {
    /// Number of zero samples appended at the end of the frame.
    pub fn padded(&self) -> usize {
        self.expected.saturating_sub(self.actual)
    }

    /// Number of trailing samples discarded from the input.
    pub fn truncated(&self) -> usize {
        self.actual.saturating_sub(self.expected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineWarning {
    SizeMismatch(SizeMismatch),
    /// The image encoder was unavailable and the raw array was persisted instead.
    DegradedOutput { encoder: &'static str, fallback: &'static str },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineWarning::SizeMismatch(m) if m.actual < m.expected => write!(
                f,
                "file too small ({} < {} samples), padded {} zero samples",
                m.actual,
                m.expected,
                m.padded()
            ),
            PipelineWarning::SizeMismatch(m) => write!(
                f,
                "file too large ({} > {} samples), truncated {} samples",
                m.actual,
                m.expected,
                m.truncated()
            ),
            PipelineWarning::DegradedOutput { encoder, fallback } => write!(
                f,
                "{encoder} encoder unavailable, saved raw {fallback} array instead of an image"
            ),
        }
    }
}
