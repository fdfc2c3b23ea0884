//! Nil detection.
//!
//! A value is nil when it is `None` or a null pointer, and also when a
//! non-nil wrapper holds a nil payload: `Some(None)`, `Box::new(None)` and
//! `Arc::new(None)` are all nil.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// Values that may be nil.
pub trait Nullable {
    /// Whether the value is nil, looking through wrappers.
    fn is_nil(&self) -> bool;
}

/// Implement [`Nullable`] for types that are never nil.
#[macro_export]
macro_rules! never_nil {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Nullable for $ty {
                fn is_nil(&self) -> bool {
                    false
                }
            }
        )+
    };
}

never_nil!(
    (), bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
    str, String, std::time::Duration, std::path::PathBuf, std::path::Path,
    dyn std::error::Error,
    dyn std::error::Error + Send + Sync,
    dyn std::any::Any,
    dyn std::any::Any + Send
);

impl<T> Nullable for [T] {
    fn is_nil(&self) -> bool {
        false
    }
}

impl<T, const N: usize> Nullable for [T; N] {
    fn is_nil(&self) -> bool {
        false
    }
}

impl<T> Nullable for Vec<T> {
    fn is_nil(&self) -> bool {
        false
    }
}

impl<T> Nullable for VecDeque<T> {
    fn is_nil(&self) -> bool {
        false
    }
}

impl<K, V, S> Nullable for HashMap<K, V, S> {
    fn is_nil(&self) -> bool {
        false
    }
}

impl<K, V> Nullable for BTreeMap<K, V> {
    fn is_nil(&self) -> bool {
        false
    }
}

impl<T, S> Nullable for HashSet<T, S> {
    fn is_nil(&self) -> bool {
        false
    }
}

impl<T> Nullable for BTreeSet<T> {
    fn is_nil(&self) -> bool {
        false
    }
}

impl<T, E> Nullable for Result<T, E> {
    fn is_nil(&self) -> bool {
        false
    }
}

impl<T: Nullable> Nullable for Option<T> {
    fn is_nil(&self) -> bool {
        self.as_ref().is_none_or(Nullable::is_nil)
    }
}

impl<T: Nullable + ?Sized> Nullable for Box<T> {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

impl<T: Nullable + ?Sized> Nullable for Rc<T> {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

impl<T: Nullable + ?Sized> Nullable for Arc<T> {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

impl<T: Nullable + ?Sized> Nullable for &T {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

impl<T: ?Sized> Nullable for *const T {
    fn is_nil(&self) -> bool {
        self.is_null()
    }
}

impl<T: ?Sized> Nullable for *mut T {
    fn is_nil(&self) -> bool {
        self.is_null()
    }
}
