//! Trellis headless demo
//!
//! Builds a small settings window, opens a message dialog and an on-screen
//! keyboard, then drives them with synthetic input and prints the widget
//! tree. Nothing is rendered; draw calls are recorded and counted.
//!
//! Run with: RUST_LOG=trellis=debug cargo run -p trellis --example headless_demo

use std::cell::RefCell;
use std::rc::Rc;

use trellis::prelude::*;
use trellis::widget::WidgetTreeDebug;
use trellis_core::{TreeFormatOptions, TreeStyle};

fn click(screen: &mut Screen, at: Vector2i) {
    screen.handle_event(InputEvent::PointerMove { x: at.x, y: at.y });
    for pressed in [true, false] {
        screen.handle_event(InputEvent::PointerButton {
            button: MouseButton::Left,
            pressed,
            modifiers: KeyboardModifiers::NONE,
        });
    }
}

fn center_of(screen: &Screen, id: WidgetId) -> Vector2i {
    let size = screen.tree().node(id).map_or(Vector2i::ZERO, |n| n.size());
    screen.tree().absolute_position(id) + size / 2
}

fn main() -> trellis::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let surface = RecordingSurface::new();
    let commands = surface.commands_handle();
    let config = ScreenConfig::new("Trellis demo", (800, 480));
    let mut screen = Screen::new(NativeWindowHandle::unique(), &config, surface);
    let root = screen.root();

    // Settings window with a group layout.
    let window = screen.add_window(root, "Settings")?;
    screen.tree_mut().set_layout(window, GroupLayout::new(15, 6, 14, 20))?;
    screen.tree_mut().add_label(window, "Network")?;
    let typed = Rc::new(RefCell::new(String::new()));
    let address = screen.tree_mut().add_label(window, "address: ")?;

    let keyboard_text = Rc::clone(&typed);
    let open_keyboard = screen.tree_mut().add_button(window, "Edit address", move |screen, _| {
        let text = Rc::clone(&keyboard_text);
        let keyboard = Keyboard::create(screen, window, KeyboardType::NumberIP, move |screen, key| {
            match key {
                VirtualKey::Char(c) => text.borrow_mut().push(c),
                VirtualKey::Backspace => {
                    text.borrow_mut().pop();
                }
                VirtualKey::Enter => tracing::info!(address = %text.borrow(), "address entered"),
            }
            let caption = format!("address: {}", text.borrow());
            if let Some(WidgetKind::Label(label)) = screen.tree_mut().node_mut(address).map(|n| n.kind_mut()) {
                label.caption = caption;
            }
        });
        match keyboard {
            Ok(keyboard) => {
                // Open to the right of the settings window.
                let width = screen.tree().node(window).map_or(0, |n| n.size().x);
                if let Err(err) = screen.set_popup_anchor(keyboard, (width + 20, 60)) {
                    tracing::warn!(%err, "could not anchor keyboard");
                }
            }
            Err(err) => tracing::warn!(%err, "could not open keyboard"),
        }
    })?;

    screen.tree_mut().add_label(window, "Danger zone")?;
    let reset = screen.tree_mut().add_button(window, "Reset", |screen, _| {
        let dialog = MessageDialog::builder(MessageDialogKind::Warning, "Reset", "Restore factory settings?")
            .confirm_text("Reset")
            .callback(|_, response| tracing::info!(?response, "reset dialog closed"))
            .build(screen);
        if let Err(err) = dialog {
            tracing::warn!(%err, "could not open dialog");
        }
    })?;

    screen.center_window(window)?;
    screen.perform_layout()?;
    screen.draw_all();

    // Open the keyboard and type an address.
    let at = center_of(&screen, open_keyboard);
    click(&mut screen, at);
    screen.draw_all();
    if let Some(&keyboard) = screen.tree().children(root).last() {
        for caption in ["1", "9", "2", ".", "1"] {
            let key = screen.tree().children(keyboard).iter().copied().find(|&id| {
                screen.tree().behavior::<Button>(id).map(Button::caption) == Some(caption)
            });
            if let Some(key) = key {
                let at = center_of(&screen, key);
                click(&mut screen, at);
            }
        }
    }
    println!("typed: {}", typed.borrow());

    // Open the reset dialog and confirm it.
    let at = center_of(&screen, reset);
    click(&mut screen, at);
    if let Some(dialog) = screen.tree().find_global_by_id("Reset") {
        println!("dialog open, focus path depth {}", screen.focus_path().len());
        let confirm = screen
            .tree()
            .depth_first_preorder(dialog)?
            .into_iter()
            .find(|&id| screen.tree().behavior::<Button>(id).map(Button::caption) == Some("Reset"));
        if let Some(confirm) = confirm {
            let at = center_of(&screen, confirm);
            click(&mut screen, at);
        }
    }

    commands.lock().clear();
    screen.draw_all();
    println!("draw commands in last frame: {}", commands.lock().len());

    let options = TreeFormatOptions {
        style: TreeStyle::Unicode,
        show_geometry: true,
        ..TreeFormatOptions::default()
    };
    println!("{}", WidgetTreeDebug::with_options(screen.tree(), root, options));
    Ok(())
}
