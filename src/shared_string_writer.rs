use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// A `fmt::Write` sink whose clones all append to the same buffer.
///
/// Hand one clone to a tree as its debug writer and keep the other to read
/// the trace back.
#[derive(Clone, Default)]
pub struct SharedStringWriter(Rc<RefCell<String>>);

impl std::fmt::Write for SharedStringWriter {
    fn write_str(&mut self, s: &str) -> Result<(), std::fmt::Error> {
        self.0.borrow_mut().write_str(s)
    }
}

impl SharedStringWriter {
    pub fn new() -> Self {
        SharedStringWriter(Rc::new(RefCell::new(String::new())))
    }

    pub fn borrow(&self) -> Ref<'_, String> {
        self.0.borrow()
    }

    /// Returns everything written so far and empties the buffer.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}
