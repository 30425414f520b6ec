use crate::reference::Ref;
use crate::utils::{pairing3, MyHash};

/// A decision node: "if `variable` then `high` else `low`".
///
/// `variable` is the index of the variable in the manager's registry.
/// Leaves are stored as nodes too, with `variable == Node::TERMINAL`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Node {
    pub variable: u32,
    pub low: Ref,
    pub high: Ref,
}

impl Node {
    pub const TERMINAL: u32 = u32::MAX;

    pub(crate) fn terminal() -> Self {
        Self {
            variable: Self::TERMINAL,
            low: Ref::ZERO,
            high: Ref::ZERO,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.variable == Self::TERMINAL
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        pairing3(self.variable as u64, self.low.get() as u64, self.high.get() as u64)
    }
}
