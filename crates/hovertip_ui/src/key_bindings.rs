//! Application actions and their key bindings.

use gpui::{actions, App, KeyBinding};

actions!(hovertip, [Quit, About, CloseWindow, Minimize]);

/// Register the global key bindings.
pub fn register_key_bindings(cx: &mut App) {
    #[cfg(target_os = "macos")]
    cx.bind_keys([
        KeyBinding::new("cmd-q", Quit, None),
        KeyBinding::new("cmd-w", CloseWindow, None),
        KeyBinding::new("cmd-m", Minimize, None),
    ]);

    #[cfg(not(target_os = "macos"))]
    cx.bind_keys([
        KeyBinding::new("ctrl-q", Quit, None),
        KeyBinding::new("ctrl-w", CloseWindow, None),
    ]);
}
