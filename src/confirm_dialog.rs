//! Confirmation prompt backed by an `AlertDialog`.

use crate::confirm::ConfirmPrompt;
use gtk4::prelude::*;
use libadwaita::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

const RESPONSE_CANCEL: &str = "cancel";
const RESPONSE_CONFIRM: &str = "confirm";

type AnswerHandler = Rc<dyn Fn(bool)>;

/// Shows one alert dialog per request and reports the answer.
///
/// Cancel, Escape and closing the dialog all answer `false`.
pub struct DialogPrompt {
    parent: glib::WeakRef<gtk4::Widget>,
    dialog: RefCell<Option<libadwaita::AlertDialog>>,
    on_answer: RefCell<Option<AnswerHandler>>,
}

impl DialogPrompt {
    pub fn new(parent: &impl IsA<gtk4::Widget>) -> Self {
        Self {
            parent: parent.upcast_ref::<gtk4::Widget>().downgrade(),
            dialog: RefCell::new(None),
            on_answer: RefCell::new(None),
        }
    }

    /// Set where answers go (normally `ConfirmationGate::resolve`)
    pub fn connect_answer<F>(&self, handler: F)
    where
        F: Fn(bool) + 'static,
    {
        *self.on_answer.borrow_mut() = Some(Rc::new(handler));
    }
}

impl ConfirmPrompt for DialogPrompt {
    fn show(&self, message: &str) {
        let dialog = libadwaita::AlertDialog::new(Some("Are you sure?"), Some(message));
        dialog.add_response(RESPONSE_CANCEL, "Cancel");
        dialog.add_response(RESPONSE_CONFIRM, "Delete");
        dialog.set_response_appearance(RESPONSE_CONFIRM, libadwaita::ResponseAppearance::Destructive);
        dialog.set_default_response(Some(RESPONSE_CANCEL));
        dialog.set_close_response(RESPONSE_CANCEL);

        let on_answer = self.on_answer.borrow().clone();
        dialog.connect_response(None, move |_, response| {
            match &on_answer {
                Some(handler) => handler(response == RESPONSE_CONFIRM),
                None => log::warn!("Confirmation answered with no handler connected"),
            }
        });

        let parent = self.parent.upgrade();
        dialog.present(parent.as_ref());
        *self.dialog.borrow_mut() = Some(dialog);
    }

    fn hide(&self) {
        if let Some(dialog) = self.dialog.borrow_mut().take() {
            dialog.close();
        }
    }
}
