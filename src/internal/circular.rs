//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};
use crate::key::Key;

/// Implementing types currently under construction, outermost first.
pub(crate) struct CreationStack {
    entries: RefCell<Vec<Key>>,
    max_depth: usize,
}

impl CreationStack {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            max_depth,
        }
    }

    /// Marks `implementation` as in creation until the guard is dropped.
    ///
    /// Fails without pushing if the type is already on the stack (a cycle) or
    /// the stack has reached the configured depth.
    pub(crate) fn enter(&self, implementation: Key) -> DiResult<CreationGuard<'_>> {
        let mut entries = self.entries.borrow_mut();

        // Circular detection BEFORE pushing the new key
        if let Some(start) = entries.iter().position(|k| *k == implementation) {
            let mut path: Vec<&'static str> =
                entries[start..].iter().map(|k| k.display_name()).collect();
            path.push(implementation.display_name());
            return Err(DiError::Circular {
                bean: implementation.display_name(),
                path,
            });
        }

        if entries.len() >= self.max_depth {
            return Err(DiError::DepthExceeded(entries.len()));
        }

        entries.push(implementation);
        Ok(CreationGuard {
            stack: self,
            key: implementation,
        })
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Pops its entry from the creation stack on every exit path
pub(crate) struct CreationGuard<'a> {
    stack: &'a CreationStack,
    key: Key,
}

impl Drop for CreationGuard<'_> {
    fn drop(&mut self) {
        let popped = self.stack.entries.borrow_mut().pop();
        debug_assert_eq!(popped, Some(self.key));
    }
}
