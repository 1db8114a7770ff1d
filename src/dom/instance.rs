//! Instance numbers: a process-wide creation counter for nodes.
//!
//! Every node receives an [`InstanceNo`] when it is created. Generated ids are
//! derived from it with [`element_id`], so sibling nodes built from one spec
//! still get distinct ids.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Creation number of a node. Strictly increasing across the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceNo(u64);

impl InstanceNo {
    /// Mint the next instance number.
    pub fn next() -> Self {
        Self(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build an element id from a prefix and the owning node's instance number.
pub fn element_id(prefix: &str, instance: InstanceNo) -> String {
    format!("{prefix}{instance}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_is_strictly_increasing() {
        let a = InstanceNo::next();
        let b = InstanceNo::next();
        let c = InstanceNo::next();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn element_id_appends_instance() {
        let n = InstanceNo(42);
        assert_eq!(element_id("ce-age", n), "ce-age42");
        assert_eq!(element_id("", n), "42");
    }

    #[test]
    fn display_is_raw_number() {
        assert_eq!(InstanceNo(7).to_string(), "7");
        assert_eq!(InstanceNo(7).get(), 7);
    }
}
