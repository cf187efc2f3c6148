//! Tooltip requests and the content they produce.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Identity of a hoverable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl TargetId {
    /// Allocate a process-unique id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap a caller-chosen id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value.
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target-{}", self.0)
    }
}

/// Placement hint for a tooltip, in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipPosition {
    pub x: f32,
    pub y: f32,
}

impl TooltipPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Text and optional placement of a tooltip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipContent {
    /// Display text.
    pub text: String,
    /// Where to place the tooltip. `None` lets the sink choose.
    pub position: Option<TooltipPosition>,
}

impl TooltipContent {
    /// Content with text only.
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), position: None }
    }

    /// Set the placement.
    pub fn at(mut self, position: TooltipPosition) -> Self {
        self.position = Some(position);
        self
    }
}

impl From<String> for TooltipContent {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<&str> for TooltipContent {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

/// Lazily computes tooltip content. Only called when the tooltip is shown.
pub type ContentFn = Arc<dyn Fn() -> TooltipContent + Send + Sync>;

/// Wrap a closure returning anything convertible into [`TooltipContent`].
pub fn content_fn<F, C>(f: F) -> ContentFn
where
    F: Fn() -> C + Send + Sync + 'static,
    C: Into<TooltipContent>,
{
    Arc::new(move || f().into())
}

/// A hovered element waiting for its tooltip.
#[derive(Clone)]
pub struct TooltipRequest {
    target: TargetId,
    content: ContentFn,
}

impl TooltipRequest {
    /// Create a request for `target`.
    pub fn new(target: TargetId, content: ContentFn) -> Self {
        Self { target, content }
    }

    /// The element this request belongs to.
    pub fn target(&self) -> TargetId {
        self.target
    }

    /// Compute the content.
    pub fn content(&self) -> TooltipContent {
        (self.content)()
    }
}

impl fmt::Debug for TooltipRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TooltipRequest").field("target", &self.target).finish_non_exhaustive()
    }
}
