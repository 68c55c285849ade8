//! Usage-context flags threaded through expression traversal.

use crate::types::RefKind;
use bitflags::bitflags;

bitflags! {
    /// The syntactic role the expression currently being visited plays.
    ///
    /// The `READ` flag matters mostly for lvalues; rvalues are assumed to
    /// be read even without it, which is why a discarded sub-expression
    /// carries no flags at all.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ExprContext: u8 {
        /// The value is read only to be called.
        const CALLED = 0x01;
        /// The value is read for any other use.
        const READ = 0x02;
        /// The lvalue's address escapes.
        const ADDRESS_TAKEN = 0x04;
        /// The lvalue is assigned to.
        const ASSIGNED = 0x08;
        /// The lvalue is updated (compound assignment, increment).
        const MODIFIED = 0x10;
    }
}

impl ExprContext {
    /// Derive the single reference kind recorded for an occurrence reached
    /// under this context.
    ///
    /// Precedence (highest first): Modified, Assigned, AddressTaken,
    /// Called, Read, then the generic Use fallback. This is a policy
    /// choice: an occurrence that is both read and written (`x += 1`) is
    /// reported once as Modify, not as two rows.
    pub fn ref_kind(self) -> RefKind {
        if self.contains(ExprContext::MODIFIED) {
            RefKind::Modify
        } else if self.contains(ExprContext::ASSIGNED) {
            RefKind::Write
        } else if self.contains(ExprContext::ADDRESS_TAKEN) {
            RefKind::AddressTaken
        } else if self.contains(ExprContext::CALLED) {
            RefKind::Call
        } else if self.contains(ExprContext::READ) {
            RefKind::Read
        } else {
            RefKind::Use
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flags() {
        assert_eq!(ExprContext::CALLED.ref_kind(), RefKind::Call);
        assert_eq!(ExprContext::READ.ref_kind(), RefKind::Read);
        assert_eq!(ExprContext::ASSIGNED.ref_kind(), RefKind::Write);
        assert_eq!(ExprContext::MODIFIED.ref_kind(), RefKind::Modify);
        assert_eq!(
            ExprContext::ADDRESS_TAKEN.ref_kind(),
            RefKind::AddressTaken
        );
        assert_eq!(ExprContext::empty().ref_kind(), RefKind::Use);
    }

    #[test]
    fn test_precedence_over_combined_flags() {
        // Read-then-write wins over everything else.
        let all = ExprContext::all();
        assert_eq!(all.ref_kind(), RefKind::Modify);

        let addr_and_read = ExprContext::ADDRESS_TAKEN | ExprContext::READ;
        assert_eq!(addr_and_read.ref_kind(), RefKind::AddressTaken);

        let called_and_read = ExprContext::CALLED | ExprContext::READ;
        assert_eq!(called_and_read.ref_kind(), RefKind::Call);

        let assigned_and_addr = ExprContext::ASSIGNED | ExprContext::ADDRESS_TAKEN;
        assert_eq!(assigned_and_addr.ref_kind(), RefKind::Write);
    }
}
