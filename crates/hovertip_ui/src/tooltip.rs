//! Tooltip layer.
//!
//! The scheduler renders into a [`TooltipSlot`] from its waiter thread. The
//! layer watches the slot on the UI thread and repaints when it changes. Stack
//! it above the window content so tooltips draw over everything else.

use gpui::{
    div, point, prelude::*, px, Context, IntoElement, Pixels, Point, Render, SharedString, Task,
    Window,
};
use hovertip_core::{TooltipContent, TooltipSlot};
use std::sync::Arc;

use crate::layout::{radius, sizes, spacing};
use crate::HovertipTheme;

/// Renders whatever the [`TooltipSlot`] currently holds.
pub struct TooltipLayer {
    slot: Arc<TooltipSlot>,
    content: Option<TooltipContent>,
    _watch_task: Task<()>,
}

impl TooltipLayer {
    /// Create a layer bound to `slot`.
    pub fn new(slot: Arc<TooltipSlot>, cx: &mut Context<Self>) -> Self {
        let mut changes = slot.subscribe();
        let content = changes.borrow_and_update().clone();

        let watch_task = cx.spawn(async move |this, cx| {
            while changes.changed().await.is_ok() {
                let content = changes.borrow_and_update().clone();
                let result = this.update(cx, |layer: &mut TooltipLayer, cx| {
                    layer.content = content;
                    cx.notify();
                });
                if result.is_err() {
                    break;
                }
            }
            tracing::debug!("Tooltip layer stopped watching");
        });

        Self { slot, content, _watch_task: watch_task }
    }

    /// The slot this layer displays.
    pub fn slot(&self) -> &Arc<TooltipSlot> {
        &self.slot
    }

    /// Whether a tooltip is on screen.
    pub fn is_visible(&self) -> bool {
        self.content.is_some()
    }
}

/// Top-left corner of the tooltip box.
pub fn tooltip_origin(content: &TooltipContent, pointer: Point<Pixels>) -> Point<Pixels> {
    match content.position {
        Some(position) => point(px(position.x), px(position.y)),
        None => point(pointer.x + sizes::TOOLTIP_OFFSET_X, pointer.y + sizes::TOOLTIP_OFFSET_Y),
    }
}

impl Render for TooltipLayer {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let Some(content) = &self.content else {
            return div();
        };

        let theme = cx.global::<HovertipTheme>();
        // Only a slot change repaints this layer, so an unpositioned tooltip
        // stays anchored where the pointer was when it appeared.
        let origin = tooltip_origin(content, window.mouse_position());

        div().absolute().size_full().top_0().left_0().child(
            div()
                .absolute()
                .left(origin.x)
                .top(origin.y)
                .bg(theme.colors.tooltip_background)
                .border_1()
                .border_color(theme.colors.tooltip_border)
                .rounded(radius::MD)
                .shadow_sm()
                .py(spacing::XS)
                .px(spacing::SM)
                .text_xs()
                .text_color(theme.colors.tooltip_text)
                .max_w(sizes::TOOLTIP_MAX_WIDTH)
                .child(SharedString::from(content.text.clone())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hovertip_core::TooltipPosition;

    #[test]
    fn test_origin_follows_pointer() {
        let content = TooltipContent::text("x");
        let origin = tooltip_origin(&content, point(px(100.0), px(50.0)));
        assert_eq!(origin, point(px(112.0), px(68.0)));
    }

    #[test]
    fn test_origin_uses_explicit_position() {
        let content = TooltipContent::text("x").at(TooltipPosition::new(10.0, 20.0));
        let origin = tooltip_origin(&content, point(px(100.0), px(50.0)));
        assert_eq!(origin, point(px(10.0), px(20.0)));
    }
}
