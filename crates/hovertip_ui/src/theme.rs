//! Theme definitions for Hovertip.

use gpui::{hsla, Global, Hsla, WindowAppearance};

/// Color palette for UI rendering.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Window background color.
    pub background: Hsla,
    /// Card and row background.
    pub surface: Hsla,
    /// Row background under the pointer.
    pub surface_hover: Hsla,
    /// Primary text color.
    pub text: Hsla,
    /// Secondary/dimmed text.
    pub text_muted: Hsla,
    /// Accent for the currently playing track.
    pub accent: Hsla,
    /// Divider between rows.
    pub border: Hsla,
    /// Tooltip box background.
    pub tooltip_background: Hsla,
    /// Tooltip box border.
    pub tooltip_border: Hsla,
    /// Tooltip text.
    pub tooltip_text: Hsla,
}

impl ThemeColors {
    /// Dark palette (Nord Polar Night with Snow Storm text).
    pub fn dark() -> Self {
        Self {
            // #2e3440
            background: hsla(220.0 / 360.0, 0.16, 0.22, 1.0),
            // #3b4252
            surface: hsla(222.0 / 360.0, 0.16, 0.28, 1.0),
            // #434c5e
            surface_hover: hsla(220.0 / 360.0, 0.17, 0.32, 1.0),
            // #eceff4
            text: hsla(219.0 / 360.0, 0.28, 0.94, 1.0),
            // #d8dee9 at reduced lightness
            text_muted: hsla(219.0 / 360.0, 0.14, 0.70, 1.0),
            // #88c0d0
            accent: hsla(193.0 / 360.0, 0.43, 0.67, 1.0),
            // #4c566a
            border: hsla(220.0 / 360.0, 0.16, 0.36, 1.0),
            // #242933
            tooltip_background: hsla(220.0 / 360.0, 0.17, 0.17, 0.96),
            // #4c566a
            tooltip_border: hsla(220.0 / 360.0, 0.16, 0.36, 1.0),
            // #e5e9f0
            tooltip_text: hsla(219.0 / 360.0, 0.28, 0.92, 1.0),
        }
    }

    /// Light palette (Nord Snow Storm with Polar Night text).
    pub fn light() -> Self {
        Self {
            // #eceff4
            background: hsla(219.0 / 360.0, 0.28, 0.94, 1.0),
            // #e5e9f0
            surface: hsla(219.0 / 360.0, 0.28, 0.92, 1.0),
            // #d8dee9
            surface_hover: hsla(219.0 / 360.0, 0.28, 0.88, 1.0),
            // #2e3440
            text: hsla(220.0 / 360.0, 0.16, 0.22, 1.0),
            // #4c566a
            text_muted: hsla(220.0 / 360.0, 0.16, 0.36, 1.0),
            // #5e81ac
            accent: hsla(213.0 / 360.0, 0.32, 0.52, 1.0),
            // #d8dee9
            border: hsla(219.0 / 360.0, 0.28, 0.88, 1.0),
            // #3b4252
            tooltip_background: hsla(222.0 / 360.0, 0.16, 0.28, 0.96),
            // #2e3440
            tooltip_border: hsla(220.0 / 360.0, 0.16, 0.22, 1.0),
            // #eceff4
            tooltip_text: hsla(219.0 / 360.0, 0.28, 0.94, 1.0),
        }
    }
}

/// Theme configuration for application styling.
#[derive(Debug, Clone)]
pub struct HovertipTheme {
    /// Theme identifier.
    pub name: String,
    /// GPUI appearance (Light/Dark).
    pub appearance: WindowAppearance,
    /// Color palette.
    pub colors: ThemeColors,
}

impl HovertipTheme {
    /// Create a new dark theme.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            appearance: WindowAppearance::Dark,
            colors: ThemeColors::dark(),
        }
    }

    /// Create a new light theme.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            appearance: WindowAppearance::Light,
            colors: ThemeColors::light(),
        }
    }

    /// Pick the theme matching the window's appearance.
    pub fn for_appearance(appearance: WindowAppearance) -> Self {
        match appearance {
            WindowAppearance::Light | WindowAppearance::VibrantLight => Self::light(),
            WindowAppearance::Dark | WindowAppearance::VibrantDark => Self::dark(),
        }
    }
}

impl Default for HovertipTheme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Global for HovertipTheme {}
