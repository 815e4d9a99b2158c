//! Single-slot yes/no confirmation used before destructive actions.

use std::cell::RefCell;

/// Returned when a confirmation is requested while another is still open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateBusy;

impl std::fmt::Display for GateBusy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "A confirmation is already pending")
    }
}

impl std::error::Error for GateBusy {}

/// The visible side of the gate (a dialog in the desktop shell)
pub trait ConfirmPrompt {
    /// Show the prompt. The answer comes back through [`ConfirmationGate::resolve`].
    fn show(&self, message: &str);

    fn hide(&self);
}

type Resolver = Box<dyn FnOnce(bool)>;

/// Holds at most one outstanding yes/no request.
///
/// Every accepted request is resolved exactly once. Requests made while one
/// is outstanding are rejected with [`GateBusy`] and their callback dropped.
pub struct ConfirmationGate<P: ConfirmPrompt> {
    prompt: P,
    pending: RefCell<Option<Resolver>>,
}

impl<P: ConfirmPrompt> ConfirmationGate<P> {
    pub fn new(prompt: P) -> Self {
        Self {
            prompt,
            pending: RefCell::new(None),
        }
    }

    /// Ask the user. `on_resolve` receives `true` only on explicit confirmation.
    pub fn request<F>(&self, message: &str, on_resolve: F) -> Result<(), GateBusy>
    where
        F: FnOnce(bool) + 'static,
    {
        {
            let mut pending = self.pending.borrow_mut();
            if pending.is_some() {
                log::warn!("Rejected confirmation '{}': another one is pending", message);
                return Err(GateBusy);
            }
            *pending = Some(Box::new(on_resolve));
        }

        self.prompt.show(message);
        Ok(())
    }

    /// Deliver the user's answer. Returns `false` if nothing was pending.
    pub fn resolve(&self, confirmed: bool) -> bool {
        // Take the resolver out first so the callback may issue a new request
        let resolver = self.pending.borrow_mut().take();
        let Some(resolver) = resolver else {
            log::debug!("Ignoring confirmation answer with no pending request");
            return false;
        };

        self.prompt.hide();
        resolver(confirmed);
        true
    }

    /// Cancel, close and click-outside all resolve to `false`
    pub fn dismiss(&self) -> bool {
        self.resolve(false)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Prompt that records what it was asked to show
    #[derive(Default)]
    pub(crate) struct RecordingPrompt {
        pub shown: RefCell<Vec<String>>,
        pub visible: Cell<bool>,
    }

    impl ConfirmPrompt for RecordingPrompt {
        fn show(&self, message: &str) {
            self.shown.borrow_mut().push(message.to_string());
            self.visible.set(true);
        }

        fn hide(&self) {
            self.visible.set(false);
        }
    }

    fn answers() -> (Rc<RefCell<Vec<bool>>>, impl Fn() -> Box<dyn FnOnce(bool)>) {
        let answers = Rc::new(RefCell::new(Vec::new()));
        let sink = answers.clone();
        let make = move || {
            let sink = sink.clone();
            Box::new(move |answer: bool| sink.borrow_mut().push(answer)) as Box<dyn FnOnce(bool)>
        };
        (answers, make)
    }

    #[test]
    fn test_confirm_resolves_true() {
        let gate = ConfirmationGate::new(RecordingPrompt::default());
        let (answers, make) = answers();

        gate.request("Delete \"A\"?", make()).unwrap();
        assert!(gate.is_pending());
        assert!(gate.prompt().visible.get());
        assert_eq!(gate.prompt().shown.borrow().as_slice(), ["Delete \"A\"?"]);

        assert!(gate.resolve(true));
        assert!(!gate.is_pending());
        assert!(!gate.prompt().visible.get());
        assert_eq!(answers.borrow().as_slice(), [true]);
    }

    #[test]
    fn test_dismiss_resolves_false() {
        let gate = ConfirmationGate::new(RecordingPrompt::default());
        let (answers, make) = answers();

        gate.request("Delete?", make()).unwrap();
        assert!(gate.dismiss());
        assert_eq!(answers.borrow().as_slice(), [false]);
    }

    #[test]
    fn test_second_request_rejected() {
        let gate = ConfirmationGate::new(RecordingPrompt::default());
        let (answers, make) = answers();

        gate.request("first", make()).unwrap();
        assert_eq!(gate.request("second", make()), Err(GateBusy));
        assert_eq!(gate.prompt().shown.borrow().len(), 1);

        gate.resolve(true);
        // Only the first callback ever runs, exactly once
        assert!(!gate.resolve(false));
        assert_eq!(answers.borrow().as_slice(), [true]);
    }

    #[test]
    fn test_resolve_without_request() {
        let gate = ConfirmationGate::new(RecordingPrompt::default());
        assert!(!gate.resolve(true));
        assert!(!gate.prompt().visible.get());
    }

    #[test]
    fn test_callback_can_chain_request() {
        let gate = Rc::new(ConfirmationGate::new(RecordingPrompt::default()));
        let (answers, make) = answers();
        let second = make();

        let chained = gate.clone();
        gate.request("first", move |_| {
            chained.request("second", second).unwrap();
        })
        .unwrap();

        gate.resolve(true);
        assert!(gate.is_pending());
        gate.resolve(false);
        assert_eq!(answers.borrow().as_slice(), [false]);
        assert_eq!(gate.prompt().shown.borrow().as_slice(), ["first", "second"]);
    }
}
