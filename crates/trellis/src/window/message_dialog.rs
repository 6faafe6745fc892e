//! Modal message dialogs.

use std::fmt;

use trellis_core::logging::targets;
use trellis_core::{Alignment, Orientation};

use crate::error::Result;
use crate::screen::Screen;
use crate::widget::{BoxLayout, Widget, WidgetId, WidgetKind, WidgetNode};

/// The icon shown next to the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageDialogKind {
    #[default]
    Information,
    Question,
    Warning,
    /// A question with an extra action, usually paired with a set button.
    Choose,
}

impl MessageDialogKind {
    /// Glyph in the theme's icon font.
    pub fn icon(self) -> char {
        match self {
            MessageDialogKind::Information => '\u{e705}',
            MessageDialogKind::Question | MessageDialogKind::Choose => '\u{e704}',
            MessageDialogKind::Warning => '\u{26a0}',
        }
    }
}

/// Which dialog button was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum DialogResponse {
    Cancel = 0,
    Confirm = 1,
    /// The optional set button. It leaves the dialog open.
    Set = 2,
}

impl DialogResponse {
    /// Numeric code: 0 cancel, 1 confirm, 2 set.
    pub fn code(self) -> i32 {
        self as i32
    }

    fn closes_dialog(self) -> bool {
        !matches!(self, DialogResponse::Set)
    }
}

/// Response handler.
pub type DialogCallback = Box<dyn FnMut(&mut Screen, DialogResponse)>;

/// Builder for a [`MessageDialog`].
///
/// # Example
///
/// ```ignore
/// let dialog = MessageDialog::builder(MessageDialogKind::Question, "Quit", "Discard changes?")
///     .confirm_text("Discard")
///     .callback(|screen, response| {
///         if response == DialogResponse::Confirm {
///             screen.set_process_events(false);
///         }
///     })
///     .build(&mut screen)?;
/// ```
pub struct MessageDialogBuilder {
    kind: MessageDialogKind,
    title: String,
    message: String,
    confirm_text: String,
    cancel_text: String,
    set_text: Option<String>,
    callback: Option<DialogCallback>,
}

impl MessageDialogBuilder {
    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = text.into();
        self
    }

    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = text.into();
        self
    }

    /// Add a set button between cancel and confirm.
    pub fn set_button(mut self, text: impl Into<String>) -> Self {
        self.set_text = Some(text.into());
        self
    }

    pub fn callback(mut self, callback: impl FnMut(&mut Screen, DialogResponse) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    /// Add the dialog to the screen's root, center it and focus it.
    ///
    /// The dialog's lookup id is its title.
    pub fn build(self, screen: &mut Screen) -> Result<WidgetId> {
        let root = screen.root();
        let icon_font = screen.tree().theme(root).font_icons.clone();
        let tree = screen.tree_mut();

        let dialog = tree.insert(
            root,
            WidgetNode::window(self.title.clone())
                .modal()
                .with_id(self.title.clone())
                .with_layout(BoxLayout::new(Orientation::Vertical, Alignment::Middle, 10, 10)),
        )?;

        let content = tree.insert(
            dialog,
            WidgetNode::new().with_layout(BoxLayout::new(Orientation::Horizontal, Alignment::Middle, 10, 15)),
        )?;
        tree.insert(
            content,
            WidgetNode::label(self.kind.icon().to_string())
                .with_font(icon_font)
                .with_font_size(50),
        )?;
        let message_label = tree.add_label(content, self.message)?;

        let buttons = tree.insert(
            dialog,
            WidgetNode::new().with_layout(BoxLayout::new(Orientation::Horizontal, Alignment::Middle, 0, 15)),
        )?;
        tree.add_button(buttons, self.cancel_text, respond_with(dialog, DialogResponse::Cancel))?;
        if let Some(set_text) = self.set_text {
            tree.add_button(buttons, set_text, respond_with(dialog, DialogResponse::Set))?;
        }
        tree.add_button(buttons, self.confirm_text, respond_with(dialog, DialogResponse::Confirm))?;

        tree.set_behavior(
            dialog,
            MessageDialog {
                kind: self.kind,
                message_label,
                callback: self.callback,
            },
        )?;

        screen.center_window(dialog)?;
        screen.request_focus(dialog);
        tracing::debug!(target: targets::WINDOW, ?dialog, title = %self.title, "message dialog shown");
        Ok(dialog)
    }
}

fn respond_with(dialog: WidgetId, response: DialogResponse) -> impl FnMut(&mut Screen, WidgetId) + 'static {
    move |screen, _| MessageDialog::respond(screen, dialog, response)
}

/// Behavior of a message dialog window.
pub struct MessageDialog {
    kind: MessageDialogKind,
    message_label: WidgetId,
    callback: Option<DialogCallback>,
}

impl MessageDialog {
    /// Start building a dialog with English button captions.
    pub fn builder(
        kind: MessageDialogKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> MessageDialogBuilder {
        MessageDialogBuilder {
            kind,
            title: title.into(),
            message: message.into(),
            confirm_text: "Confirm".to_owned(),
            cancel_text: "Cancel".to_owned(),
            set_text: None,
            callback: None,
        }
    }

    pub fn kind(&self) -> MessageDialogKind {
        self.kind
    }

    /// The label holding the message text.
    pub fn message_label(&self) -> WidgetId {
        self.message_label
    }

    /// Replace the message text of `dialog`.
    pub fn set_message(screen: &mut Screen, dialog: WidgetId, message: impl Into<String>) {
        let Some(label) = screen.tree().behavior::<MessageDialog>(dialog).map(|d| d.message_label) else {
            return;
        };
        if let Some(WidgetKind::Label(data)) = screen.tree_mut().node_mut(label).map(|n| n.kind_mut()) {
            data.caption = message.into();
        }
    }

    /// Report `response` to the dialog's callback, then close the dialog
    /// unless the set button was pressed.
    pub fn respond(screen: &mut Screen, dialog: WidgetId, response: DialogResponse) {
        tracing::debug!(target: targets::WINDOW, ?dialog, code = response.code(), "dialog response");
        let callback = screen
            .tree_mut()
            .behavior_mut::<MessageDialog>(dialog)
            .and_then(|d| d.callback.take());
        if let Some(mut callback) = callback {
            callback(screen, response);
            if let Some(d) = screen.tree_mut().behavior_mut::<MessageDialog>(dialog)
                && d.callback.is_none()
            {
                d.callback = Some(callback);
            }
        }
        if response.closes_dialog() && screen.tree().contains(dialog) {
            // Only fails for a stale handle, checked above.
            let _ = screen.dispose_window(dialog);
        }
    }
}

impl Widget for MessageDialog {}

impl fmt::Debug for MessageDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageDialog")
            .field("kind", &self.kind)
            .field("message_label", &self.message_label)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::screen::ScreenConfig;
    use crate::widget::{Button, KeyboardModifiers, MouseButton};

    fn setup(with_set: bool) -> (Screen, WidgetId, Rc<RefCell<Vec<DialogResponse>>>) {
        let mut screen = Screen::headless(&ScreenConfig::new("dialogs", (640, 480)));
        let responses = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&responses);
        let mut builder = MessageDialog::builder(MessageDialogKind::Question, "Save", "Save changes?")
            .callback(move |_, response| log.borrow_mut().push(response));
        if with_set {
            builder = builder.set_button("Settings");
        }
        let dialog = builder.build(&mut screen).unwrap();
        (screen, dialog, responses)
    }

    fn click_button(screen: &mut Screen, dialog: WidgetId, caption: &str) {
        let button = screen
            .tree()
            .depth_first_preorder(dialog)
            .unwrap()
            .into_iter()
            .find(|&id| screen.tree().behavior::<Button>(id).map(Button::caption) == Some(caption))
            .unwrap();
        let center = screen.tree().absolute_position(button) + screen.tree().node(button).unwrap().size() / 2;
        screen.on_pointer_move(center.x, center.y);
        screen.on_pointer_button(MouseButton::Left, true, KeyboardModifiers::NONE);
        screen.on_pointer_button(MouseButton::Left, false, KeyboardModifiers::NONE);
    }

    #[test]
    fn test_dialog_is_modal_centered_and_focused() {
        let (screen, dialog, _) = setup(false);
        let node = screen.tree().node(dialog).unwrap();
        assert!(node.window_data().unwrap().modal);
        assert_eq!(node.id(), Some("Save"));
        assert_eq!(node.position(), (screen.size() - node.size()) / 2);
        assert_eq!(screen.focus_path(), &[dialog]);
        assert_eq!(screen.tree().find_global_by_id("Save"), Some(dialog));
    }

    #[test]
    fn test_icon_uses_icon_font() {
        let (screen, dialog, _) = setup(false);
        let content = screen.tree().children(dialog)[0];
        let icon = screen.tree().children(content)[0];
        match screen.tree().node(icon).unwrap().kind() {
            WidgetKind::Label(label) => {
                assert_eq!(label.caption, "\u{e704}");
                assert_eq!(label.font.as_deref(), Some("icons"));
            }
            other => panic!("expected a label, got {}", other.name()),
        }
    }

    #[test]
    fn test_confirm_reports_and_disposes() {
        let (mut screen, dialog, responses) = setup(false);
        click_button(&mut screen, dialog, "Confirm");
        assert_eq!(*responses.borrow(), vec![DialogResponse::Confirm]);
        assert!(!screen.tree().contains(dialog));
        assert!(screen.focus_path().is_empty());
    }

    #[test]
    fn test_cancel_reports_zero() {
        let (mut screen, dialog, responses) = setup(false);
        click_button(&mut screen, dialog, "Cancel");
        assert_eq!(responses.borrow().first().map(|r| r.code()), Some(0));
        assert!(!screen.tree().contains(dialog));
    }

    #[test]
    fn test_set_button_keeps_dialog_open() {
        let (mut screen, dialog, responses) = setup(true);
        click_button(&mut screen, dialog, "Settings");
        click_button(&mut screen, dialog, "Settings");
        assert_eq!(*responses.borrow(), vec![DialogResponse::Set, DialogResponse::Set]);
        assert!(screen.tree().contains(dialog));
    }

    #[test]
    fn test_set_message() {
        let (mut screen, dialog, _) = setup(false);
        MessageDialog::set_message(&mut screen, dialog, "Saved.");
        let label = screen.tree().behavior::<MessageDialog>(dialog).unwrap().message_label();
        match screen.tree().node(label).unwrap().kind() {
            WidgetKind::Label(data) => assert_eq!(data.caption, "Saved."),
            other => panic!("expected a label, got {}", other.name()),
        }
    }
}
