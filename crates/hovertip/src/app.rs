//! Now-playing page: a track card next to the play queue.
//!
//! Queue rows truncate long titles, so each row and the card are
//! tooltippable and reveal the full track details on hover.

use gpui::{div, prelude::*, px, Context, Entity, IntoElement, Render, SharedString, Window};
use hovertip_core::{HovertipState, TargetId, TooltipHandle, TooltipScheduler};
use hovertip_ui::layout::{radius, sizes, spacing};
use hovertip_ui::{HovertipTheme, TooltipLayer, Tooltippable};
use std::sync::Arc;

/// A track in the play queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub artists: Vec<String>,
    pub album: String,
    pub duration_secs: u32,
}

impl Track {
    fn new(title: &str, artists: &[&str], album: &str, duration_secs: u32) -> Self {
        Self {
            title: title.to_string(),
            artists: artists.iter().map(|a| a.to_string()).collect(),
            album: album.to_string(),
            duration_secs,
        }
    }

    /// Artist names joined for display.
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }

    /// Full description shown in the tooltip.
    pub fn tooltip_text(&self) -> String {
        format!(
            "{}\n{} - {} ({})",
            self.title,
            self.artist_line(),
            self.album,
            format_duration(self.duration_secs)
        )
    }
}

/// Format seconds as `m:ss`, or `h:mm:ss` past an hour.
pub fn format_duration(secs: u32) -> String {
    let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

fn demo_queue() -> Vec<Track> {
    vec![
        Track::new("Windowlicker", &["Aphex Twin"], "Windowlicker", 367),
        Track::new(
            "Everything In Its Right Place",
            &["Radiohead"],
            "Kid A",
            251,
        ),
        Track::new(
            "Svefn-g-englar",
            &["Sigur Rós"],
            "Ágætis byrjun",
            604,
        ),
        Track::new(
            "Roygbiv",
            &["Boards of Canada"],
            "Music Has the Right to Children",
            151,
        ),
        Track::new(
            "Teardrop",
            &["Massive Attack", "Elizabeth Fraser"],
            "Mezzanine",
            330,
        ),
        Track::new(
            "The Great Gig in the Sky",
            &["Pink Floyd", "Clare Torry"],
            "The Dark Side of the Moon",
            283,
        ),
        Track::new(
            "An Ending (Ascent)",
            &["Brian Eno"],
            "Apollo: Atmospheres and Soundtracks",
            264,
        ),
    ]
}

/// A queue entry bound to its tooltip.
struct QueueRow {
    track: Arc<Track>,
    tooltip: TooltipHandle,
}

impl QueueRow {
    fn new(track: Track, scheduler: &TooltipScheduler) -> Self {
        let track = Arc::new(track);
        let for_tooltip = track.clone();
        let tooltip = scheduler.handle(TargetId::next(), move || for_tooltip.tooltip_text());
        Self { track, tooltip }
    }
}

/// Root view: now-playing card, queue list and the tooltip layer above both.
pub struct NowPlayingApp {
    queue: Vec<QueueRow>,
    now_playing: usize,
    card_tooltip: TooltipHandle,
    tooltip_layer: Entity<TooltipLayer>,
}

impl NowPlayingApp {
    /// Build the page from the global [`HovertipState`].
    pub fn new(_window: &mut Window, cx: &mut Context<Self>) -> Self {
        let (scheduler, slot) = {
            let state = cx.global::<HovertipState>();
            (state.scheduler().clone(), state.slot().clone())
        };

        let queue: Vec<QueueRow> =
            demo_queue().into_iter().map(|track| QueueRow::new(track, &scheduler)).collect();
        let now_playing = 0;

        let current = queue[now_playing].track.clone();
        let card_tooltip = scheduler.handle(TargetId::next(), move || {
            format!("Now playing: {}", current.tooltip_text())
        });

        let tooltip_layer = cx.new(|cx| TooltipLayer::new(slot, cx));
        tracing::debug!(tracks = queue.len(), "Now playing page loaded");

        Self { queue, now_playing, card_tooltip, tooltip_layer }
    }

    fn render_card(&self, theme: &HovertipTheme) -> impl IntoElement {
        let track = &self.queue[self.now_playing].track;

        Tooltippable::new("now-playing-card", self.card_tooltip.clone()).child(
            div()
                .flex()
                .flex_col()
                .gap(spacing::SM)
                .p(spacing::XL)
                .w(px(320.0))
                .rounded(radius::XL)
                .bg(theme.colors.surface)
                .child(div().text_xs().text_color(theme.colors.text_muted).child("NOW PLAYING"))
                .child(
                    div()
                        .text_xl()
                        .text_color(theme.colors.text)
                        .overflow_hidden()
                        .whitespace_nowrap()
                        .text_ellipsis()
                        .child(SharedString::from(track.title.clone())),
                )
                .child(
                    div()
                        .text_sm()
                        .text_color(theme.colors.accent)
                        .child(SharedString::from(track.artist_line())),
                )
                .child(
                    div()
                        .text_sm()
                        .text_color(theme.colors.text_muted)
                        .child(SharedString::from(track.album.clone())),
                ),
        )
    }

    fn render_row(&self, ix: usize, row: &QueueRow, theme: &HovertipTheme) -> impl IntoElement {
        let is_current = ix == self.now_playing;
        let title_color = if is_current { theme.colors.accent } else { theme.colors.text };
        let hover_bg = theme.colors.surface_hover;

        Tooltippable::new(SharedString::from(format!("queue-row-{ix}")), row.tooltip.clone())
            .child(
                div()
                    .flex()
                    .flex_row()
                    .items_center()
                    .gap(spacing::MD)
                    .h(sizes::ROW_HEIGHT)
                    .px(spacing::MD)
                    .border_b_1()
                    .border_color(theme.colors.border)
                    .hover(move |style| style.bg(hover_bg))
                    .child(
                        div()
                            .w(px(24.0))
                            .text_xs()
                            .text_color(theme.colors.text_muted)
                            .child(SharedString::from(format!("{}", ix + 1))),
                    )
                    .child(
                        div()
                            .flex_1()
                            .overflow_hidden()
                            .whitespace_nowrap()
                            .text_ellipsis()
                            .text_sm()
                            .text_color(title_color)
                            .child(SharedString::from(row.track.title.clone())),
                    )
                    .child(
                        div()
                            .w(px(140.0))
                            .overflow_hidden()
                            .whitespace_nowrap()
                            .text_ellipsis()
                            .text_sm()
                            .text_color(theme.colors.text_muted)
                            .child(SharedString::from(row.track.artist_line())),
                    )
                    .child(
                        div()
                            .w(px(48.0))
                            .text_xs()
                            .text_color(theme.colors.text_muted)
                            .child(SharedString::from(format_duration(row.track.duration_secs))),
                    ),
            )
    }
}

impl Render for NowPlayingApp {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.global::<HovertipTheme>();
        let colors = &theme.colors;

        let queue = div()
            .flex()
            .flex_col()
            .flex_1()
            .rounded(radius::XL)
            .bg(colors.surface)
            .overflow_hidden()
            .children(
                self.queue.iter().enumerate().map(|(ix, row)| self.render_row(ix, row, theme)),
            );

        div()
            .relative()
            .size_full()
            .bg(colors.background)
            .text_color(colors.text)
            .child(
                div()
                    .flex()
                    .flex_row()
                    .size_full()
                    .gap(spacing::XL)
                    .p(spacing::XL)
                    .child(self.render_card(theme))
                    .child(queue),
            )
            .child(self.tooltip_layer.clone())
    }
}
