//! Walks over containers that may contain themselves.
//!
//! Lists, maps and sets are mutable and shared, so a script can put a list
//! inside itself. Rendering, hashing and comparing such a value would
//! recurse forever. Each walk registers the container (or, for equality,
//! the pair being compared) for as long as it is in progress; meeting the
//! same key again further down means the walk has come full circle.

use std::cell::{Ref, RefCell};

use super::Heap;

/// What a walk is doing, so rendering a key does not collide with hashing
/// the same container.
#[derive(Copy, Clone, PartialEq, Eq)]
pub(crate) enum Walk {
    Display,
    Hash,
    Eq(usize),
}

thread_local! {
    static ACTIVE: RefCell<Vec<(usize, Walk)>> = const { RefCell::new(Vec::new()) };
}

/// An in-progress walk; leaving it unregisters the key.
pub(crate) struct Visit(());

impl Visit {
    /// Register `(addr, walk)`, or `None` when that walk is already under
    /// way further up the stack.
    pub(crate) fn enter(addr: usize, walk: Walk) -> Option<Visit> {
        ACTIVE.with(|active| {
            let mut active = active.borrow_mut();
            if active.contains(&(addr, walk)) {
                None
            } else {
                active.push((addr, walk));
                Some(Visit(()))
            }
        })
    }
}

impl Drop for Visit {
    fn drop(&mut self) {
        ACTIVE.with(|active| {
            active.borrow_mut().pop();
        });
    }
}

/// Enter `walk` over `cell` and borrow its contents, or `None` when the walk
/// already passes through it or the container is being written to.
pub(crate) fn visit<T>(cell: &Heap<RefCell<T>>, walk: Walk) -> Option<(Visit, Ref<'_, T>)> {
    let visit = Visit::enter(cell.addr(), walk)?;
    let contents = cell.try_borrow().ok()?;
    Some((visit, contents))
}
