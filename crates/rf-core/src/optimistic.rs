//! Optimistic local edits.
//!
//! 乐观更新：先改本地可见状态，失败时恢复原值。

/// A visible-state change applied before the backend confirmed it.
///
/// Created by [`OptimisticEdit::apply`], which writes the new value into the
/// caller's state and keeps the previous one. Exactly one of
/// [`commit`](OptimisticEdit::commit) or [`rollback`](OptimisticEdit::rollback)
/// ends its life.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an optimistic edit must be committed or rolled back"]
pub struct OptimisticEdit<T> {
    previous_value: T,
    applied_value: T,
    committed: bool,
}

impl<T: Clone> OptimisticEdit<T> {
    /// Snapshot `*target`, then overwrite it with `next`.
    pub fn apply(target: &mut T, next: T) -> Self {
        let previous_value = std::mem::replace(target, next.clone());
        Self {
            previous_value,
            applied_value: next,
            committed: false,
        }
    }

    /// Record an edit whose value has already been written elsewhere.
    pub fn record(previous_value: T, applied_value: T) -> Self {
        Self {
            previous_value,
            applied_value,
            committed: false,
        }
    }

    pub fn previous_value(&self) -> &T {
        &self.previous_value
    }

    pub fn applied_value(&self) -> &T {
        &self.applied_value
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Keep the applied value. A committed edit can no longer be rolled back.
    pub fn commit(&mut self) -> &T {
        self.committed = true;
        &self.applied_value
    }

    /// Restore the snapshot into `target`. Returns `false` (and leaves
    /// `target` alone) when the edit was already committed.
    pub fn rollback(self, target: &mut T) -> bool {
        if self.committed {
            return false;
        }
        *target = self.previous_value;
        true
    }

    /// Consume the edit and hand back the snapshot.
    pub fn into_previous(self) -> T {
        self.previous_value
    }
}
