//! Field-level merge combinators shared by the table strategies
//!
//! Numeric aggregate tables reduce each schema field with `max` or, for the
//! named min-field sets, `min`. Version-gated attributes only some inputs
//! define go through `max_defined`. Mapping tables use `union_overwrite`,
//! where later inputs win on key collision.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::{MergeError, Result};

/// Return the maximum value
pub fn max<T: Ord + Clone>(values: &[T]) -> Result<T> {
    values.iter().max().cloned().ok_or(MergeError::NoFonts)
}

/// Return the minimum value
pub fn min<T: Ord + Clone>(values: &[T]) -> Result<T> {
    values.iter().min().cloned().ok_or(MergeError::NoFonts)
}

/// Maximum over the inputs that define the field.
///
/// Returns None when no input defines it, in which case the field is absent
/// from the merged attribute set as well.
pub fn max_defined<T: Ord + Clone>(values: &[Option<T>]) -> Option<T> {
    values.iter().flatten().max().cloned()
}

/// Union of mappings in input order; a later input overwrites the value of
/// an already-seen key. First-seen keys keep their insertion position.
pub fn union_overwrite<K, V>(maps: &[&IndexMap<K, V>]) -> IndexMap<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    let mut merged = IndexMap::new();
    for map in maps {
        for (key, value) in map.iter() {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max() {
        let values = vec![1, 5, 3];
        assert_eq!(max(&values).unwrap(), 5);
    }

    #[test]
    fn test_min() {
        let values = vec![1, 5, 3];
        assert_eq!(min(&values).unwrap(), 1);
    }

    #[test]
    fn test_max_min_empty() {
        let values: Vec<i32> = vec![];
        assert!(max(&values).is_err());
        assert!(min(&values).is_err());
    }

    #[test]
    fn test_max_defined() {
        assert_eq!(max_defined(&[Some(1), None, Some(7)]), Some(7));
        assert_eq!(max_defined::<u16>(&[None, None]), None);
    }

    #[test]
    fn test_union_overwrite_later_wins() {
        let mut a = IndexMap::new();
        a.insert("x", 1);
        a.insert("y", 2);
        let mut b = IndexMap::new();
        b.insert("y", 20);
        b.insert("z", 30);

        let merged = union_overwrite(&[&a, &b]);
        assert_eq!(merged.get("x"), Some(&1));
        assert_eq!(merged.get("y"), Some(&20));
        assert_eq!(merged.get("z"), Some(&30));
        // "y" keeps its first-seen position
        let keys: Vec<_> = merged.keys().copied().collect();
        assert_eq!(keys, ["x", "y", "z"]);
    }
}
