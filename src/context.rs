//! Per-thread `getStack()` resolution.
//!
//! Resolving "the stack for the current computation" is the job of
//! external collaborators: a continuation host, a fiber scheduler, or
//! (failing both) a plain per-thread default. Those collaborators are
//! out of scope for this crate, so this module exposes only the static
//! resolver and the hooks they register themselves into: a small
//! thread-local registry rather than a global lock.

use std::cell::RefCell;
use std::rc::Rc;

use crate::stack::Stack;

type SharedStack = Rc<RefCell<Stack>>;
type Hook = Box<dyn Fn() -> Option<SharedStack>>;

thread_local! {
    static CONTINUATION_HOOK: RefCell<Option<Hook>> = const { RefCell::new(None) };
    static FIBER_HOOK: RefCell<Option<Hook>> = const { RefCell::new(None) };
    static DEFAULT_STACK: RefCell<Option<SharedStack>> = const { RefCell::new(None) };
}

/// Installs the hook consulted first by [`get_stack`]: "is there a
/// currently-running continuation on this thread, and if so what is its
/// stack?" Call with `None` to uninstall.
pub fn set_continuation_hook(hook: Option<impl Fn() -> Option<SharedStack> + 'static>) {
    CONTINUATION_HOOK.with(|cell| *cell.borrow_mut() = hook.map(|f| Box::new(f) as Hook));
}

/// Installs the hook consulted second by [`get_stack`], for "is there a
/// currently-running fiber on this thread?" Call with `None` to
/// uninstall.
pub fn set_fiber_hook(hook: Option<impl Fn() -> Option<SharedStack> + 'static>) {
    FIBER_HOOK.with(|cell| *cell.borrow_mut() = hook.map(|f| Box::new(f) as Hook));
}

/// Sets this thread's default stack, consulted when neither a
/// continuation nor a fiber claims the thread.
pub fn set_default_stack(stack: Option<SharedStack>) {
    DEFAULT_STACK.with(|cell| *cell.borrow_mut() = stack);
}

/// Resolves "the stack for the current computation" by consulting, in
/// order: the current continuation, the current fiber, the per-thread
/// default. Returns `None` if nothing is registered.
pub fn get_stack() -> Option<SharedStack> {
    if let Some(stack) = CONTINUATION_HOOK.with(|h| h.borrow().as_ref().and_then(|f| f())) {
        return Some(stack);
    }
    if let Some(stack) = FIBER_HOOK.with(|h| h.borrow().as_ref().and_then(|f| f())) {
        return Some(stack);
    }
    DEFAULT_STACK.with(|cell| cell.borrow().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Stack;

    fn fresh_shared() -> SharedStack {
        Rc::new(RefCell::new(Stack::new(4, None).unwrap()))
    }

    #[test]
    fn resolution_order_is_continuation_then_fiber_then_default() {
        set_continuation_hook(None::<fn() -> Option<SharedStack>>);
        set_fiber_hook(None::<fn() -> Option<SharedStack>>);
        set_default_stack(None);
        assert!(get_stack().is_none());

        let default = fresh_shared();
        set_default_stack(Some(default.clone()));
        assert!(Rc::ptr_eq(&get_stack().unwrap(), &default));

        let fiber = fresh_shared();
        let fiber_for_hook = fiber.clone();
        set_fiber_hook(Some(move || Some(fiber_for_hook.clone())));
        assert!(Rc::ptr_eq(&get_stack().unwrap(), &fiber));

        let continuation = fresh_shared();
        let continuation_for_hook = continuation.clone();
        set_continuation_hook(Some(move || Some(continuation_for_hook.clone())));
        assert!(Rc::ptr_eq(&get_stack().unwrap(), &continuation));

        // Clean up thread-local state so other tests in this process see a
        // pristine resolution chain.
        set_continuation_hook(None::<fn() -> Option<SharedStack>>);
        set_fiber_hook(None::<fn() -> Option<SharedStack>>);
        set_default_stack(None);
    }
}
