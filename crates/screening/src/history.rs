use tracing::trace;

/// Undo/redo stacks of immutable snapshots, with a marker for the last saved snapshot.
///
/// Snapshots are compared by value, a transform that produces an equal snapshot is not recorded.
#[derive(Debug, Clone)]
pub struct HistoryStore<S> {
    current: S,
    undo_stack: Vec<S>,
    redo_stack: Vec<S>,
    saved: Option<S>,
}

impl<S: Clone + PartialEq> HistoryStore<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            undo_stack: vec![],
            redo_stack: vec![],
            saved: None,
        }
    }

    pub fn current(&self) -> &S {
        &self.current
    }

    /// Applies the transform to the current snapshot.
    ///
    /// Returns `Ok(true)` when the snapshot changed. On error nothing is modified.
    pub fn apply<E, F>(&mut self, transform: F) -> Result<bool, E>
    where
        F: FnOnce(&S) -> Result<S, E>,
    {
        let next = transform(&self.current)?;
        if next == self.current {
            trace!("Unchanged snapshot, not recorded");
            return Ok(false);
        }

        let previous = std::mem::replace(&mut self.current, next);
        self.undo_stack.push(previous);
        self.redo_stack.clear();

        Ok(true)
    }

    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                let current = std::mem::replace(&mut self.current, previous);
                self.redo_stack.push(current);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                let current = std::mem::replace(&mut self.current, next);
                self.undo_stack.push(current);
                true
            }
            None => false,
        }
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn mark_saved(&mut self) {
        self.saved = Some(self.current.clone());
    }

    /// Replaces the current snapshot with a loaded one, which is recorded and marked as saved.
    pub fn install_loaded(&mut self, loaded: S) {
        if loaded != self.current {
            let previous = std::mem::replace(&mut self.current, loaded);
            self.undo_stack.push(previous);
            self.redo_stack.clear();
        }
        self.mark_saved();
    }

    pub fn is_saved(&self) -> bool {
        self.saved.as_ref() == Some(&self.current)
    }
}

impl<S: Clone + PartialEq + Default> Default for HistoryStore<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
