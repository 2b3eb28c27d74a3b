use std::hash::{Hash, Hasher};

/// Compares and hashes a reference by address instead of by value. Used to
/// key side-tables on syntax tree nodes: two structurally equal nodes at
/// different places in the tree are different keys.
#[derive(Debug, Clone, Copy)]
pub struct RefEq<T>(pub T);

impl<'a, T> Hash for RefEq<&'a T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        (self.0 as *const T).hash(state)
    }
}

impl<'a, T> PartialEq for RefEq<&'a T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl<'a, T> Eq for RefEq<&'a T> {}
