use std::cell::Cell;

/// Marks a widget as having a request outstanding until dropped.
pub(crate) struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    pub(crate) fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
