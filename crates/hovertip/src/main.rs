//! Hovertip - adaptive tooltips for a GPUI now-playing page.

mod app;
mod app_menus;

use app::NowPlayingApp;
use gpui::{
    px, size, App, AppContext, Application, Bounds, PromptLevel, Size, WindowBounds, WindowOptions,
};
use hovertip_core::logging::{init_logging, LogConfig};
use hovertip_core::HovertipState;
use hovertip_ui::key_bindings::{register_key_bindings, About, CloseWindow, Minimize, Quit};
use hovertip_ui::HovertipTheme;

fn main() {
    let log_config = LogConfig::detect(hovertip_core::logging::log_dir());
    let _logging_guard = init_logging(log_config);

    tracing::info!("Starting Hovertip");

    Application::new().run(|cx: &mut App| {
        // Tooltips cannot work without the scheduler, so there is nothing to fall back to
        match HovertipState::new() {
            Ok(state) => {
                cx.set_global(state);
            }
            Err(e) => {
                tracing::error!(error = %e, hint = ?e.hint(), "Failed to initialize HovertipState");
                cx.quit();
                return;
            }
        }

        cx.set_global(HovertipTheme::default());

        let menus = app_menus::app_menus(cx);
        cx.set_menus(menus);

        register_key_bindings(cx);
        register_global_actions(cx);

        let window_size = size(px(960.0), px(640.0));
        let bounds = Bounds::centered(None, window_size, cx);

        let window_options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            window_min_size: Some(Size { width: px(480.0), height: px(320.0) }),
            focus: true,
            show: true,
            ..Default::default()
        };

        let opened = cx.open_window(window_options, |window, cx| {
            // Close manually to avoid the Windows WM_ACTIVATE race during destruction
            window.on_window_should_close(cx, |window, cx| {
                window.remove_window();
                cx.quit();
                false
            });

            cx.new(|cx| NowPlayingApp::new(window, cx))
        });
        if let Err(e) = opened {
            tracing::error!(error = %e, "Failed to open window");
            cx.quit();
            return;
        }

        cx.activate(true);
    });
}

/// Register handlers for global application actions.
fn register_global_actions(cx: &mut App) {
    cx.on_action(|_: &Quit, cx| {
        cx.quit();
    });

    cx.on_action(|_: &About, cx| {
        // Defer to run after current dispatch completes (window may be borrowed during menu action)
        cx.defer(|cx| {
            if let Some(window_handle) = cx.windows().first().copied() {
                let result = window_handle.update(cx, |_, window, cx| {
                    let version = env!("CARGO_PKG_VERSION");
                    let message = format!("Hovertip {version}");
                    let detail = "Delayed, adaptive tooltips for GPUI.";
                    let prompt =
                        window.prompt(PromptLevel::Info, &message, Some(detail), &["OK"], cx);
                    cx.background_executor()
                        .spawn(async move {
                            let _ = prompt.await;
                        })
                        .detach();
                });
                if let Err(e) = result {
                    tracing::error!("About dialog failed: {e}");
                }
            }
        });
    });

    cx.on_action(|_: &Minimize, cx| {
        cx.defer(|cx| {
            if let Some(window_handle) = cx.windows().first().copied() {
                window_handle
                    .update(cx, |_, window, _cx| {
                        window.minimize_window();
                    })
                    .ok();
            }
        });
    });

    cx.on_action(|_: &CloseWindow, cx| {
        cx.defer(|cx| {
            if let Some(window_handle) = cx.windows().first().copied() {
                window_handle
                    .update(cx, |_, window, _cx| {
                        window.remove_window();
                    })
                    .ok();
            }
        });
    });
}
