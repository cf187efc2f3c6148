//! Hover adapter that gives any element a delayed tooltip.
//!
//! ```ignore
//! let handle = state.scheduler().handle(TargetId::next(), move || track.title.clone());
//! Tooltippable::new("queue-row-3", handle).child(row)
//! ```

use gpui::{div, prelude::*, AnyElement, App, ElementId, IntoElement, RenderOnce, Window};
use hovertip_core::{HoverTarget, TooltipHandle};

/// Wraps a child element and forwards its hover events to a scheduler.
#[derive(IntoElement)]
pub struct Tooltippable {
    id: ElementId,
    handle: TooltipHandle,
    children: Vec<AnyElement>,
}

impl Tooltippable {
    /// Create a wrapper reporting hover for `handle`'s element.
    pub fn new(id: impl Into<ElementId>, handle: TooltipHandle) -> Self {
        Self { id: id.into(), handle, children: Vec::new() }
    }

    /// Add a child element.
    pub fn child(mut self, child: impl IntoElement) -> Self {
        self.children.push(child.into_any_element());
        self
    }
}

impl RenderOnce for Tooltippable {
    fn render(self, _window: &mut Window, _cx: &mut App) -> impl IntoElement {
        let hover = self.handle.clone();
        let moved = self.handle;

        div()
            .id(self.id)
            .on_hover(move |hovered, _window, _cx| {
                if *hovered {
                    hover.on_enter();
                } else {
                    hover.on_leave();
                }
            })
            .on_mouse_move(move |_event, _window, _cx| moved.on_move())
            .children(self.children)
    }
}
