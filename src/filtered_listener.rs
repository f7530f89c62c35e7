use crate::event::Notification;
use crate::eventbus::InputListener;

/// Wraps a listener and forwards only notifications accepted by a predicate.
pub struct FilteredListener {
    predicate: Box<dyn Fn(&Notification) -> bool>,
    inner: Box<dyn InputListener>,
}

impl FilteredListener {
    pub fn new(
        predicate: impl Fn(&Notification) -> bool + 'static,
        inner: impl InputListener + 'static,
    ) -> Self {
        Self {
            predicate: Box::new(predicate),
            inner: Box::new(inner),
        }
    }
}

impl InputListener for FilteredListener {
    fn on_notification(&mut self, notification: &Notification) {
        if (self.predicate)(notification) {
            self.inner.on_notification(notification);
        }
    }
}
