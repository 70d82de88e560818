//! Loop context stack: (continue-target, break-target) pairs pushed on entry
//! to `while`/`do-while`/`for` and popped on exit. `break`/`continue` consult
//! only the top entry; empty outside a loop is the authority for rejecting
//! `break`/`continue` at top level (deferred here from parsing, per spec's
//! "break/continue outside a loop" error condition).

use crate::ids::BlockId;

/// `continue_target` is `None` for a `switch`'s own context (switch has no
/// loop of its own to continue; a `continue` inside one falls through to
/// whatever loop, if any, encloses it — see the entry `switch` pushes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTargets {
    pub continue_target: Option<BlockId>,
    pub break_target: BlockId,
}

#[derive(Debug, Default)]
pub struct LoopContext {
    stack: Vec<LoopTargets>,
}

impl LoopContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushed on entry to `while`/`do-while`/`for`.
    pub fn push_loop(&mut self, continue_target: BlockId, break_target: BlockId) {
        self.stack.push(LoopTargets { continue_target: Some(continue_target), break_target });
    }

    /// Pushed on entry to `switch`: establishes a break target without its
    /// own continue target, inheriting whatever loop (if any) already
    /// encloses it for `continue`.
    pub fn push_switch(&mut self, break_target: BlockId) {
        let continue_target = self.current().and_then(|t| t.continue_target);
        self.stack.push(LoopTargets { continue_target, break_target });
    }

    pub fn pop(&mut self) {
        self.stack.pop();
    }

    pub fn current(&self) -> Option<LoopTargets> {
        self.stack.last().copied()
    }
}

#[cfg(test)]
mod loop_ctx_tests {
    use super::*;

    #[test]
    fn empty_outside_any_loop() {
        let ctx = LoopContext::new();
        assert!(ctx.current().is_none());
    }

    #[test]
    fn nested_loops_restore_the_outer_targets_on_pop() {
        let mut ctx = LoopContext::new();
        ctx.push_loop(BlockId(1), BlockId(2));
        ctx.push_loop(BlockId(3), BlockId(4));
        assert_eq!(ctx.current().unwrap().break_target, BlockId(4));
        ctx.pop();
        assert_eq!(ctx.current().unwrap().break_target, BlockId(2));
        ctx.pop();
        assert!(ctx.current().is_none());
    }
}
