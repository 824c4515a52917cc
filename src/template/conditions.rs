//! Bounded stack of nested `If` conditions.

/// Deepest `If` nesting that is tracked.
pub const MAX_CONDITION_DEPTH: usize = 32;

/// Conditional nesting state for one document expansion.
///
/// Output is visible only while every stored level is `true`. Levels pushed
/// past [`MAX_CONDITION_DEPTH`] are counted but not stored, so the matching
/// `EndIf`s still line up with the levels that were.
#[derive(Debug, Clone, Default)]
pub struct ConditionStack {
    levels: Vec<bool>,
    overflow: usize,
}

impl ConditionStack {
    pub fn new() -> Self {
        Self {
            levels: Vec::with_capacity(MAX_CONDITION_DEPTH),
            overflow: 0,
        }
    }

    pub fn push(&mut self, value: bool) {
        if self.levels.len() < MAX_CONDITION_DEPTH {
            self.levels.push(value);
        } else {
            self.overflow += 1;
        }
    }

    /// Invert the innermost level. No-op on an empty stack.
    pub fn flip(&mut self) {
        if self.overflow > 0 {
            return;
        }
        if let Some(top) = self.levels.last_mut() {
            *top = !*top;
        }
    }

    /// Drop the innermost level. No-op on an empty stack.
    pub fn pop(&mut self) {
        if self.overflow > 0 {
            self.overflow -= 1;
        } else {
            self.levels.pop();
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.levels.iter().all(|&level| level)
    }

    pub fn depth(&self) -> usize {
        self.levels.len() + self.overflow
    }

    pub fn is_empty(&self) -> bool {
        self.depth() == 0
    }
}
