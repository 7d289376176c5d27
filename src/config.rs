use crate::avl_tree::AvlTree;

/// Static knobs for an [`AvlTree`], resolved at compile time.
pub trait ConfigT {
    /// Emit a line for every structural event (insert, rotation, splice).
    const DEBUG: bool;
    /// Audit the whole tree after every public mutation and panic on a violation.
    const CHECK_INVARIANTS: bool;
}

/// Writes to the tree's debug writer if it has one, otherwise to `tracing`.
macro_rules! debug {
    ($writer:expr, $($arg:tt)+) => {
        if Config::DEBUG {
            match $writer {
                Some(ref w) => {
                    use std::fmt::Write as _;
                    let _ = writeln!(w.borrow_mut(), $($arg)+);
                }
                None => {
                    ::tracing::debug!($($arg)+);
                }
            }
        }
    };
}

pub(crate) use debug;

#[derive(Debug, Clone, Copy)]
pub struct DefaultConfig;

#[derive(Debug, Clone, Copy)]
pub struct DebugConfig;

impl ConfigT for DefaultConfig {
    const DEBUG: bool = false;
    const CHECK_INVARIANTS: bool = false;
}

impl ConfigT for DebugConfig {
    const DEBUG: bool = true;
    const CHECK_INVARIANTS: bool = true;
}

pub type Default<K, V> = AvlTree<K, V, DefaultConfig>;
pub type DefaultDebug<K, V> = AvlTree<K, V, DebugConfig>;
