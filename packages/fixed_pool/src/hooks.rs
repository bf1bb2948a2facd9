use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generating unique hook IDs.
static HOOK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies one hook subscribed to a [`FixedPool`][crate::FixedPool].
///
/// Returned when a hook is subscribed and used to unsubscribe that same hook later. Identifiers
/// are unique across all hook lists of all pools in the process, so an identifier only ever
/// removes the hook it was issued for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct HookId(u64);

impl HookId {
    fn generate() -> Self {
        Self(HOOK_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

type Hook<T> = Box<dyn FnMut(&mut T)>;

/// An ordered list of mutation hooks that all run when an item crosses one transition.
pub(crate) struct Hooks<T> {
    entries: Vec<(HookId, Hook<T>)>,
}

impl<T> Hooks<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn subscribe(&mut self, hook: Hook<T>) -> HookId {
        let id = HookId::generate();

        self.entries.push((id, hook));
        id
    }

    /// Returns whether a hook with the given identifier was removed.
    pub(crate) fn unsubscribe(&mut self, id: HookId) -> bool {
        let Some(index) = self.entries.iter().position(|(entry_id, _)| *entry_id == id) else {
            return false;
        };

        // Not swap_remove, the remaining hooks must keep their subscription order.
        self.entries.remove(index);
        true
    }

    /// Runs every hook against the item, in subscription order.
    pub(crate) fn invoke(&mut self, item: &mut T) {
        for (_, hook) in &mut self.entries {
            hook(item);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<T> fmt::Debug for Hooks<T> {
    #[cfg_attr(test, mutants::skip)] // No API contract.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field(
                "ids",
                &self.entries.iter().map(|(id, _)| id).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn empty_invoke_is_noop() {
        let mut hooks = Hooks::<u32>::new();
        let mut item = 5;

        hooks.invoke(&mut item);

        assert_eq!(item, 5);
        assert_eq!(hooks.len(), 0);
    }

    #[test]
    fn invokes_in_subscription_order() {
        let mut hooks = Hooks::<Vec<&'static str>>::new();

        hooks.subscribe(Box::new(|item: &mut Vec<_>| item.push("first")));
        hooks.subscribe(Box::new(|item: &mut Vec<_>| item.push("second")));
        hooks.subscribe(Box::new(|item: &mut Vec<_>| item.push("third")));

        let mut item = Vec::new();
        hooks.invoke(&mut item);

        assert_eq!(item, ["first", "second", "third"]);
    }

    #[test]
    fn unsubscribe_keeps_order_of_remaining() {
        let mut hooks = Hooks::<Vec<u32>>::new();

        let _a = hooks.subscribe(Box::new(|item: &mut Vec<_>| item.push(1)));
        let b = hooks.subscribe(Box::new(|item: &mut Vec<_>| item.push(2)));
        let _c = hooks.subscribe(Box::new(|item: &mut Vec<_>| item.push(3)));

        assert!(hooks.unsubscribe(b));
        assert_eq!(hooks.len(), 2);

        let mut item = Vec::new();
        hooks.invoke(&mut item);

        assert_eq!(item, [1, 3]);
    }

    #[test]
    fn unsubscribe_twice_reports_missing() {
        let mut hooks = Hooks::<u32>::new();

        let id = hooks.subscribe(Box::new(|item: &mut u32| *item = 1));

        assert!(hooks.unsubscribe(id));
        assert!(!hooks.unsubscribe(id));
    }

    #[test]
    fn ids_are_not_reused() {
        let mut hooks = Hooks::<u32>::new();

        let first = hooks.subscribe(Box::new(|_: &mut u32| {}));
        hooks.unsubscribe(first);
        let second = hooks.subscribe(Box::new(|_: &mut u32| {}));

        assert_ne!(first, second);

        // The stale identifier must not remove the newer hook.
        assert!(!hooks.unsubscribe(first));
        assert_eq!(hooks.len(), 1);
    }

    #[test]
    fn id_from_other_list_removes_nothing() {
        let mut first = Hooks::<u32>::new();
        let mut second = Hooks::<u32>::new();

        let from_first = first.subscribe(Box::new(|_: &mut u32| {}));
        let from_second = second.subscribe(Box::new(|_: &mut u32| {}));

        assert_ne!(from_first, from_second);

        assert!(!second.unsubscribe(from_first));
        assert_eq!(second.len(), 1);

        assert!(!first.unsubscribe(from_second));
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn hooks_run_once_per_invoke() {
        let calls = Rc::new(RefCell::new(0_u32));
        let mut hooks = Hooks::<u32>::new();

        let counter = Rc::clone(&calls);
        hooks.subscribe(Box::new(move |_: &mut u32| *counter.borrow_mut() += 1));

        let mut item = 0;
        hooks.invoke(&mut item);
        hooks.invoke(&mut item);

        assert_eq!(*calls.borrow(), 2);
    }
}
