// src/capture.rs

//! Creation-descriptor capture.
//!
//! Every registered node carries an opaque [`Descriptor`] snapshotted at
//! construction time. It is purely diagnostic: the reachability algorithm
//! never looks inside it. Capture is a pluggable [`CaptureStrategy`] so hosts
//! can swap in whatever notion of "where am I" fits their runtime.

use std::fmt;

/// Identifier used to recognise this library's own frames in a backtrace.
///
/// The default capture strategy drops any frame whose rendered form contains
/// this string, so that diagnostics show the user's code rather than the
/// bookkeeping that produced them.
pub const SELF_IDENT: &str = "asyncbreak";

/// Immutable snapshot of an execution position, as a list of frame strings.
///
/// Captured once at node construction and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Descriptor {
    frames: Vec<String>,
}

impl Descriptor {
    pub fn new(frames: Vec<String>) -> Self {
        Self { frames }
    }

    /// A descriptor with no frames (used for the root node and by hosts that
    /// opt out of capture).
    pub fn empty() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.frames.join("\n"))
    }
}

/// Strategy for producing a [`Descriptor`] at node-creation time.
pub trait CaptureStrategy: Send + Sync {
    fn capture(&self) -> Descriptor;
}

/// Captures a resolved backtrace and renders one string per frame.
///
/// By default, frames belonging to this library (or to the backtrace
/// machinery itself) are filtered out with a containment test against
/// [`SELF_IDENT`]. Setting `keep_internal_frames` disables the filter, which
/// is mostly useful when debugging the tracking itself.
pub struct BacktraceCapture {
    keep_internal_frames: bool,
}

impl BacktraceCapture {
    pub fn new(keep_internal_frames: bool) -> Self {
        Self {
            keep_internal_frames,
        }
    }
}

impl CaptureStrategy for BacktraceCapture {
    fn capture(&self) -> Descriptor {
        let bt = backtrace::Backtrace::new();
        let mut frames = Vec::new();

        for frame in bt.frames() {
            for symbol in frame.symbols() {
                let name = symbol
                    .name()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());

                let rendered = match (symbol.filename(), symbol.lineno()) {
                    (Some(file), Some(line)) => {
                        format!("{name} ({}:{line})", file.display())
                    }
                    _ => name,
                };

                if self.keep_internal_frames || !frame_is_internal(&rendered) {
                    frames.push(rendered);
                }
            }
        }

        Descriptor::new(frames)
    }
}

/// Produces empty descriptors. Useful for tests that assert on structure and
/// for hosts that do not want the capture cost.
pub struct NullCapture;

impl CaptureStrategy for NullCapture {
    fn capture(&self) -> Descriptor {
        Descriptor::empty()
    }
}

fn frame_is_internal(frame: &str) -> bool {
    frame.contains(SELF_IDENT) || frame.contains("backtrace::")
}
