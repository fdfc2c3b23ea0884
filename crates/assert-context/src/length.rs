//! Container length.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Anything with a length.
pub trait HasLen {
    /// Number of elements (bytes for strings).
    fn len(&self) -> usize;

    /// Whether the length is zero.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! has_len {
    ($([$($generics:tt)*] $ty:ty),+ $(,)?) => {
        $(
            impl<$($generics)*> HasLen for $ty {
                fn len(&self) -> usize {
                    <$ty>::len(self)
                }
            }
        )+
    };
}

has_len!(
    [] str,
    [] String,
    [T] [T],
    [T] Vec<T>,
    [T] VecDeque<T>,
    [K, V, S] HashMap<K, V, S>,
    [K, V] BTreeMap<K, V>,
    [T, S] HashSet<T, S>,
    [T] BTreeSet<T>,
);

impl<T, const N: usize> HasLen for [T; N] {
    fn len(&self) -> usize {
        N
    }
}

impl<C: HasLen + ?Sized> HasLen for &C {
    fn len(&self) -> usize {
        (**self).len()
    }
}

impl<C: HasLen + ?Sized> HasLen for Box<C> {
    fn len(&self) -> usize {
        (**self).len()
    }
}
