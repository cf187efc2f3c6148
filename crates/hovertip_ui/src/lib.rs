//! GPUI integration for Hovertip.
//!
//! - [`Tooltippable`] reports an element's hover to the scheduler
//! - [`TooltipLayer`] draws the scheduler's output above the window content

pub mod key_bindings;
pub mod layout;
pub mod theme;
pub mod tooltip;
pub mod tooltippable;

pub use theme::{HovertipTheme, ThemeColors};
pub use tooltip::TooltipLayer;
pub use tooltippable::Tooltippable;
