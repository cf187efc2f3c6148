//! Application menu definitions for Hovertip.

use gpui::{App, Menu, MenuItem};
use hovertip_ui::key_bindings::{About, CloseWindow, Minimize, Quit};

/// Build the application menu structure.
pub fn app_menus(_cx: &mut App) -> Vec<Menu> {
    vec![
        Menu {
            name: "Hovertip".into(),
            items: vec![
                MenuItem::action("About Hovertip", About),
                MenuItem::separator(),
                MenuItem::action("Quit Hovertip", Quit),
            ],
        },
        Menu {
            name: "Window".into(),
            items: vec![
                MenuItem::action("Minimize", Minimize),
                MenuItem::action("Close Window", CloseWindow),
            ],
        },
    ]
}
