//! Deep equality that treats empty and absent values alike.
//!
//! [`Equivalent`] is `PartialEq` with one extra rule: an empty container and
//! an absent one compare equal. `None::<Vec<T>>` matches `Some(vec![])`,
//! and an empty map in a struct field matches a missing one when the struct
//! compares field by field through [`equivalent_fields!`](crate::equivalent_fields).

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::Arc;

/// Structural equality with empty/absent equivalence.
pub trait Equivalent {
    /// Whether `self` and `other` are equal, ignoring the difference between
    /// empty and absent values.
    fn equivalent(&self, other: &Self) -> bool;

    /// Whether this value is empty or absent.
    fn is_empty_value(&self) -> bool {
        false
    }
}

/// Implement [`Equivalent`] through `PartialEq` for types with no notion of
/// emptiness.
///
/// ```
/// use assert_context::{equivalent_by_eq, Equivalent};
///
/// #[derive(Debug, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// equivalent_by_eq!(Point);
///
/// assert!(Point { x: 1, y: 2 }.equivalent(&Point { x: 1, y: 2 }));
/// ```
#[macro_export]
macro_rules! equivalent_by_eq {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Equivalent for $ty {
                fn equivalent(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )+
    };
}

/// Implement [`Equivalent`] field by field, so empty and absent fields
/// match.
///
/// ```
/// use assert_context::{equivalent_fields, Equivalent};
///
/// #[derive(Debug)]
/// struct Order {
///     id: u32,
///     notes: Option<Vec<String>>,
/// }
///
/// equivalent_fields!(Order { id, notes });
///
/// let a = Order { id: 7, notes: None };
/// let b = Order { id: 7, notes: Some(vec![]) };
/// assert!(a.equivalent(&b));
/// ```
#[macro_export]
macro_rules! equivalent_fields {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Equivalent for $ty {
            fn equivalent(&self, other: &Self) -> bool {
                true $(&& $crate::Equivalent::equivalent(&self.$field, &other.$field))*
            }
        }
    };
}

equivalent_by_eq!(
    bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
    std::time::Duration, std::path::PathBuf, std::path::Path, std::ffi::OsString
);

impl Equivalent for () {
    fn equivalent(&self, _other: &Self) -> bool {
        true
    }
}

impl Equivalent for str {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl Equivalent for String {
    fn equivalent(&self, other: &Self) -> bool {
        self.as_str().equivalent(other.as_str())
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Equivalent> Equivalent for [T] {
    fn equivalent(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.equivalent(b))
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Equivalent, const N: usize> Equivalent for [T; N] {
    fn equivalent(&self, other: &Self) -> bool {
        self.as_slice().equivalent(other.as_slice())
    }

    fn is_empty_value(&self) -> bool {
        N == 0
    }
}

impl<T: Equivalent> Equivalent for Vec<T> {
    fn equivalent(&self, other: &Self) -> bool {
        self.as_slice().equivalent(other.as_slice())
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Equivalent> Equivalent for VecDeque<T> {
    fn equivalent(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.equivalent(b))
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> Equivalent for HashMap<K, V, S>
where
    K: Eq + Hash,
    V: Equivalent,
    S: BuildHasher,
{
    fn equivalent(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|o| v.equivalent(o)))
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K: Ord, V: Equivalent> Equivalent for BTreeMap<K, V> {
    fn equivalent(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|((ka, va), (kb, vb))| ka == kb && va.equivalent(vb))
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Eq + Hash, S: BuildHasher> Equivalent for HashSet<T, S> {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Ord> Equivalent for BTreeSet<T> {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Equivalent> Equivalent for Option<T> {
    fn equivalent(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.equivalent(b),
            (None, None) => true,
            (Some(v), None) | (None, Some(v)) => v.is_empty_value(),
        }
    }

    fn is_empty_value(&self) -> bool {
        self.as_ref().is_none_or(Equivalent::is_empty_value)
    }
}

impl<T: Equivalent, E: Equivalent> Equivalent for Result<T, E> {
    fn equivalent(&self, other: &Self) -> bool {
        match (self, other) {
            (Ok(a), Ok(b)) => a.equivalent(b),
            (Err(a), Err(b)) => a.equivalent(b),
            _ => false,
        }
    }
}

macro_rules! equivalent_through_deref {
    ($($wrapper:ident),+) => {
        $(
            impl<T: Equivalent + ?Sized> Equivalent for $wrapper<T> {
                fn equivalent(&self, other: &Self) -> bool {
                    (**self).equivalent(&**other)
                }

                fn is_empty_value(&self) -> bool {
                    (**self).is_empty_value()
                }
            }
        )+
    };
}

equivalent_through_deref!(Box, Rc, Arc);

impl<T: Equivalent + ?Sized> Equivalent for &T {
    fn equivalent(&self, other: &Self) -> bool {
        (**self).equivalent(&**other)
    }

    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

macro_rules! equivalent_tuple {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: Equivalent),+> Equivalent for ($($name,)+) {
            fn equivalent(&self, other: &Self) -> bool {
                $(self.$idx.equivalent(&other.$idx))&&+
            }
        }
    };
}

equivalent_tuple!(A 0);
equivalent_tuple!(A 0, B 1);
equivalent_tuple!(A 0, B 1, C 2);
equivalent_tuple!(A 0, B 1, C 2, D 3);
equivalent_tuple!(A 0, B 1, C 2, D 3, E 4);
equivalent_tuple!(A 0, B 1, C 2, D 3, E 4, F 5);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        assert!(1_i32.equivalent(&1));
        assert!(!1_i32.equivalent(&2));
        assert!("a".equivalent("a"));
        assert!(!String::from("a").equivalent(&String::from("b")));
    }

    #[test]
    fn test_none_matches_empty() {
        let absent: Option<Vec<i32>> = None;
        assert!(absent.equivalent(&Some(Vec::new())));
        assert!(Some(Vec::<i32>::new()).equivalent(&absent));
        assert!(!absent.equivalent(&Some(vec![1])));
        assert!(None::<String>.equivalent(&Some(String::new())));
    }

    #[test]
    fn test_nested_empty_in_collections() {
        let a: Vec<Option<Vec<u8>>> = vec![None, Some(vec![1])];
        let b: Vec<Option<Vec<u8>>> = vec![Some(vec![]), Some(vec![1])];
        assert!(a.equivalent(&b));

        let mut m1: HashMap<&str, Option<String>> = HashMap::new();
        let mut m2 = HashMap::new();
        m1.insert("k", None);
        m2.insert("k", Some(String::new()));
        assert!(m1.equivalent(&m2));
        m2.insert("other", None);
        assert!(!m1.equivalent(&m2));
    }

    #[test]
    fn test_btree_map_and_sets() {
        let a: BTreeMap<u8, Vec<u8>> = [(1, vec![]), (2, vec![3])].into_iter().collect();
        let b: BTreeMap<u8, Vec<u8>> = [(1, vec![]), (2, vec![3])].into_iter().collect();
        assert!(a.equivalent(&b));
        let s1: HashSet<u8> = [1, 2].into_iter().collect();
        let s2: HashSet<u8> = [2, 1].into_iter().collect();
        assert!(s1.equivalent(&s2));
    }

    #[test]
    fn test_tuples_and_results() {
        assert!((1, "a", vec![2]).equivalent(&(1, "a", vec![2])));
        assert!(!(1, "a").equivalent(&(1, "b")));
        let ok: Result<Option<Vec<u8>>, String> = Ok(None);
        assert!(ok.equivalent(&Ok(Some(vec![]))));
        assert!(!ok.equivalent(&Err(String::new())));
    }

    #[test]
    fn test_smart_pointers() {
        assert!(Box::new(vec![1]).equivalent(&Box::new(vec![1])));
        assert!(Arc::new(None::<Vec<u8>>).equivalent(&Arc::new(Some(vec![]))));
        assert!(Rc::new(3).equivalent(&Rc::new(3)));
    }

    #[derive(Debug, PartialEq)]
    struct Reading {
        id: u32,
    }

    equivalent_by_eq!(Reading);

    #[derive(Debug)]
    struct Batch {
        name: String,
        readings: Option<Vec<Reading>>,
    }

    equivalent_fields!(Batch { name, readings });

    #[test]
    fn test_struct_fields_equate_empty() {
        let a = Batch {
            name: "b1".to_string(),
            readings: None,
        };
        let b = Batch {
            name: "b1".to_string(),
            readings: Some(vec![]),
        };
        let c = Batch {
            name: "b1".to_string(),
            readings: Some(vec![Reading { id: 4 }]),
        };
        assert!(a.equivalent(&b));
        assert!(!a.equivalent(&c));
    }

    #[test]
    fn test_user_type_via_macro() {
        assert!(Reading { id: 1 }.equivalent(&Reading { id: 1 }));
        assert!(!vec![Reading { id: 1 }].equivalent(&vec![Reading { id: 2 }]));
    }
}
