//! Thin open/close controller around an [`UploadSession`].
//!
//! Presentation layers call [`IntakeDialog::set_open`] from their own
//! visibility handler. Closing always resets the session, so reopening starts
//! from [`crate::session::Phase::Empty`].

use crate::session::UploadSession;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct IntakeDialog {
    session: UploadSession,
    open: bool,
}

impl IntakeDialog {
    /// A closed dialog driving `session`.
    pub fn new(session: UploadSession) -> Self {
        Self {
            session,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    pub fn open(&mut self) {
        self.set_open(true);
    }

    pub fn close(&mut self) {
        self.set_open(false);
    }

    /// Visibility change from the presentation layer.
    pub fn set_open(&mut self, open: bool) {
        if !open {
            self.session.reset();
        }
        if self.open != open {
            debug!("Intake dialog {}", if open { "opened" } else { "closed" });
        }
        self.open = open;
    }
}
