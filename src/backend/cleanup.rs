// Ordered teardown for acquired handles.

/// Stack of teardown actions, flushed in reverse push order.
///
/// Each handle pushes its destroy action right after acquisition. Flushing
/// pops last-in-first-out, so nothing is destroyed before the resources
/// created from it. Dropping an unflushed stack flushes it, which also
/// covers teardown when bootstrap fails partway through.
pub struct CleanupStack {
    stack: Vec<Box<dyn FnOnce()>>,
}

impl CleanupStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Push the teardown action for a just-acquired resource.
    pub fn push<F: FnOnce() + 'static>(&mut self, action: F) {
        self.stack.push(Box::new(action));
    }

    /// Run all pending actions, most recently pushed first.
    pub fn flush(&mut self) {
        while let Some(action) = self.stack.pop() {
            action();
        }
    }
}

impl Default for CleanupStack {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CleanupStack {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(order: &Rc<RefCell<Vec<&'static str>>>, label: &'static str) -> impl FnOnce() {
        let order = Rc::clone(order);
        move || order.borrow_mut().push(label)
    }

    #[test]
    fn flush_runs_in_reverse_push_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut stack = CleanupStack::new();
        stack.push(recorder(&order, "instance"));
        stack.push(recorder(&order, "messenger"));

        stack.flush();

        assert_eq!(*order.borrow(), ["messenger", "instance"]);
    }

    #[test]
    fn flush_twice_runs_each_action_once() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut stack = CleanupStack::new();
        stack.push(recorder(&order, "only"));

        stack.flush();
        stack.flush();

        assert_eq!(*order.borrow(), ["only"]);
    }

    #[test]
    fn drop_flushes_pending_actions() {
        let order = Rc::new(RefCell::new(Vec::new()));
        {
            let mut stack = CleanupStack::new();
            stack.push(recorder(&order, "first"));
            stack.push(recorder(&order, "second"));
        }
        assert_eq!(*order.borrow(), ["second", "first"]);
    }

    #[test]
    fn empty_stack_flushes_cleanly() {
        let mut stack = CleanupStack::new();
        stack.flush();
    }
}
