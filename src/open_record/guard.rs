use std::cell::RefCell;
use std::thread::LocalKey;

// ─── Recursion Guards ───────────────────────────────────────────────────────
//
// One stack per operation that walks nested records. Stacks are per thread:
// two renders on different threads never see each other's entries, while
// nested calls on one thread share the stack of the outermost call.

pub(crate) type GuardStack<T> = LocalKey<RefCell<Vec<T>>>;

thread_local! {
    /// Records currently being rendered.
    pub(crate) static INSPECT_IDS: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
    /// Records currently being hashed.
    pub(crate) static HASH_IDS: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
    /// Record pairs currently being compared.
    pub(crate) static COMPARE_PAIRS: RefCell<Vec<(usize, usize)>> = const { RefCell::new(Vec::new()) };
    /// Records currently being serialized.
    pub(crate) static SERIALIZE_IDS: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks `entry` as in progress on one stack. Dropping the guard pops the
/// entry, so the stack is restored on every exit path, including `?` and
/// unwinding.
pub(crate) struct RecursionGuard<T: PartialEq + 'static> {
    stack: &'static GuardStack<T>,
}

impl<T: PartialEq + 'static> RecursionGuard<T> {
    /// `None` if `entry` is already in progress on this thread.
    pub(crate) fn enter(stack: &'static GuardStack<T>, entry: T) -> Option<Self> {
        stack.with(|ids| {
            let mut ids = ids.borrow_mut();
            if ids.contains(&entry) {
                return None;
            }
            ids.push(entry);
            Some(Self { stack })
        })
    }
}

impl<T: PartialEq + 'static> Drop for RecursionGuard<T> {
    fn drop(&mut self) {
        self.stack.with(|ids| {
            ids.borrow_mut().pop();
        });
    }
}

#[cfg(test)]
pub(crate) fn depth<T: PartialEq + 'static>(stack: &'static GuardStack<T>) -> usize {
    stack.with(|ids| ids.borrow().len())
}
