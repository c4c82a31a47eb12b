//! Foreign ordered arrays

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use super::ForeignValue;

/// Key of a foreign array entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    /// Integer key
    Int(i64),

    /// String key that is not a canonical decimal integer
    Str(Rc<str>),
}

impl ArrayKey {
    /// Build a key from a string, normalizing canonical decimal integers
    /// (`"5"`, `"-12"`) to integer keys as the foreign runtime does.
    /// `"05"`, `"-0"` and `"+5"` stay strings.
    pub fn normalize(s: &str) -> ArrayKey {
        match canonical_int(s) {
            Some(n) => ArrayKey::Int(n),
            None => ArrayKey::Str(Rc::from(s)),
        }
    }
}

fn canonical_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.starts_with('0') && (digits.len() > 1 || s.starts_with('-')) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Int(n) => write!(f, "{}", n),
            ArrayKey::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ArrayKey {
    fn from(n: i64) -> Self {
        ArrayKey::Int(n)
    }
}

impl From<&str> for ArrayKey {
    fn from(s: &str) -> Self {
        ArrayKey::normalize(s)
    }
}

impl From<String> for ArrayKey {
    fn from(s: String) -> Self {
        ArrayKey::normalize(&s)
    }
}

/// An insertion-ordered map with an append cursor.
///
/// Appending uses one past the largest integer key ever inserted, so
/// removing the last element does not make its index reusable. Once
/// `i64::MAX` is used as a key there is no next index and appends fail.
#[derive(Clone)]
pub struct ForeignArray {
    entries: IndexMap<ArrayKey, ForeignValue>,
    next_index: Option<i64>,
}

impl Default for ForeignArray {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl ForeignArray {
    /// Create an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty array with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
            next_index: Some(0),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the array has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry.
    pub fn get(&self, key: &ArrayKey) -> Option<&ForeignValue> {
        self.entries.get(key)
    }

    /// Mutable access to an entry.
    pub fn get_mut(&mut self, key: &ArrayKey) -> Option<&mut ForeignValue> {
        self.entries.get_mut(key)
    }

    /// Insert or overwrite an entry. Overwriting keeps the entry's position.
    pub fn insert(&mut self, key: ArrayKey, value: ForeignValue) -> Option<ForeignValue> {
        if let (ArrayKey::Int(n), Some(next)) = (&key, self.next_index) {
            if *n >= next {
                self.next_index = n.checked_add(1);
            }
        }
        self.entries.insert(key, value)
    }

    /// Append at the next integer index and return the key used.
    ///
    /// Returns `None`, leaving the array unchanged, when the next index
    /// would pass `i64::MAX`.
    #[must_use = "a full array rejects the append"]
    pub fn push(&mut self, value: ForeignValue) -> Option<ArrayKey> {
        let key = ArrayKey::Int(self.next_index?);
        self.insert(key.clone(), value);
        Some(key)
    }

    /// Remove an entry, preserving the order of the rest.
    pub fn remove(&mut self, key: &ArrayKey) -> Option<ForeignValue> {
        self.entries.shift_remove(key)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ArrayKey, &ForeignValue)> {
        self.entries.iter()
    }

    /// Iterate values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &ForeignValue> {
        self.entries.values()
    }

    /// True when the keys are exactly `0..len` in order.
    pub fn is_list(&self) -> bool {
        self.entries
            .keys()
            .enumerate()
            .all(|(i, key)| matches!(key, ArrayKey::Int(n) if *n == i as i64))
    }
}

impl fmt::Debug for ForeignArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl FromIterator<ForeignValue> for ForeignArray {
    fn from_iter<I: IntoIterator<Item = ForeignValue>>(iter: I) -> Self {
        iter.into_iter()
            .zip(0..)
            .map(|(value, index)| (ArrayKey::Int(index), value))
            .collect()
    }
}

impl FromIterator<(ArrayKey, ForeignValue)> for ForeignArray {
    fn from_iter<I: IntoIterator<Item = (ArrayKey, ForeignValue)>>(iter: I) -> Self {
        let mut array = ForeignArray::new();
        for (key, value) in iter {
            array.insert(key, value);
        }
        array
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_canonical_integers() {
        assert_eq!(ArrayKey::normalize("5"), ArrayKey::Int(5));
        assert_eq!(ArrayKey::normalize("-12"), ArrayKey::Int(-12));
        assert_eq!(ArrayKey::normalize("0"), ArrayKey::Int(0));
    }

    #[test]
    fn test_normalize_keeps_non_canonical_strings() {
        assert_eq!(ArrayKey::normalize("05"), ArrayKey::Str(Rc::from("05")));
        assert_eq!(ArrayKey::normalize("-0"), ArrayKey::Str(Rc::from("-0")));
        assert_eq!(ArrayKey::normalize("+5"), ArrayKey::Str(Rc::from("+5")));
        assert_eq!(ArrayKey::normalize(""), ArrayKey::Str(Rc::from("")));
        assert_eq!(ArrayKey::normalize("x"), ArrayKey::Str(Rc::from("x")));
        assert_eq!(
            ArrayKey::normalize("99999999999999999999"),
            ArrayKey::Str(Rc::from("99999999999999999999"))
        );
    }

    #[test]
    fn test_push_continues_after_largest_int_key() {
        let mut array = ForeignArray::new();
        array.insert(ArrayKey::Int(7), ForeignValue::Null);
        array.insert(ArrayKey::from("x"), ForeignValue::Null);
        assert_eq!(array.push(ForeignValue::Null), Some(ArrayKey::Int(8)));
    }

    #[test]
    fn test_removed_index_is_not_reused() {
        let mut array: ForeignArray = [ForeignValue::Int(1), ForeignValue::Int(2)]
            .into_iter()
            .collect();
        array.remove(&ArrayKey::Int(1));
        assert_eq!(array.push(ForeignValue::Int(3)), Some(ArrayKey::Int(2)));
        assert!(!array.is_list());
    }

    #[test]
    fn test_push_after_max_key_is_refused() {
        let mut array = ForeignArray::new();
        array.insert(ArrayKey::Int(i64::MAX), ForeignValue::string("last"));

        assert_eq!(array.push(ForeignValue::string("next")), None);
        assert_eq!(array.len(), 1);
        assert_eq!(
            array.get(&ArrayKey::Int(i64::MAX)).and_then(|v| v.as_str()),
            Some("last")
        );

        // Smaller integer keys can still be set explicitly.
        array.insert(ArrayKey::Int(0), ForeignValue::Null);
        assert_eq!(array.push(ForeignValue::Null), None);
    }

    #[test]
    fn test_is_list() {
        let list: ForeignArray = [ForeignValue::Int(1), ForeignValue::Int(2)]
            .into_iter()
            .collect();
        assert!(list.is_list());
        assert!(ForeignArray::new().is_list());

        let mut map = ForeignArray::new();
        map.insert(ArrayKey::from("x"), ForeignValue::string("x"));
        assert!(!map.is_list());

        let mut out_of_order = ForeignArray::new();
        out_of_order.insert(ArrayKey::Int(1), ForeignValue::Null);
        out_of_order.insert(ArrayKey::Int(0), ForeignValue::Null);
        assert!(!out_of_order.is_list());
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut array = ForeignArray::new();
        array.insert(ArrayKey::from("a"), ForeignValue::Int(1));
        array.insert(ArrayKey::from("b"), ForeignValue::Int(2));
        array.insert(ArrayKey::from("a"), ForeignValue::Int(3));
        let keys: Vec<String> = array.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
