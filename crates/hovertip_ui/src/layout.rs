//! Layout constants for consistent spacing.

/// Standard spacing constants for UI layout.
pub mod spacing {
    use gpui::{px, Pixels};

    /// Extra small spacing: 4px
    pub const XS: Pixels = px(4.0);
    /// Small spacing: 8px
    pub const SM: Pixels = px(8.0);
    /// Medium spacing: 12px
    pub const MD: Pixels = px(12.0);
    /// Large spacing: 16px
    pub const LG: Pixels = px(16.0);
    /// Extra large spacing: 24px
    pub const XL: Pixels = px(24.0);
}

/// Standard border radius constants.
pub mod radius {
    use gpui::{px, Pixels};

    /// Medium radius: 4px
    pub const MD: Pixels = px(4.0);
    /// Extra large radius: 8px
    pub const XL: Pixels = px(8.0);
}

/// Tooltip sizing.
pub mod sizes {
    use gpui::{px, Pixels};

    /// Offset of a tooltip from the pointer, horizontally.
    pub const TOOLTIP_OFFSET_X: Pixels = px(12.0);
    /// Offset of a tooltip from the pointer, vertically (below the cursor).
    pub const TOOLTIP_OFFSET_Y: Pixels = px(18.0);
    /// Widest a tooltip may grow before wrapping.
    pub const TOOLTIP_MAX_WIDTH: Pixels = px(400.0);
    /// Queue row height.
    pub const ROW_HEIGHT: Pixels = px(32.0);
}
