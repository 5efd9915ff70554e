//! `CoordinateMap` — an expandable separate-chaining hash map.
//!
//! # Layout
//!
//! ```text
//! buckets: [ chain₀ | chain₁ | … | chainₙ₋₁ ]     n = power of two, starts at 8
//!              │
//!              └─▶ Entry ─▶ Entry ─▶ None          newest entry at the head
//! ```
//!
//! A key lands in bucket `hash_key(key) & (n - 1)`.  After every insertion
//! that adds a new key, the load factor `len / n` is compared against the
//! configured maximum; when exceeded, `n` doubles and every entry is relinked
//! into the new table.  Entries are moved, never cloned, so growth preserves
//! every key→value pair (but not the order within a bucket).
//!
//! # Hashing
//!
//! The bucket hash is a capability of the key type, supplied through the
//! [`Hashable`] bound rather than `std::hash::Hash` + a `BuildHasher`.  For
//! [`GeoCoord`] it hashes the exact latitude/longitude **text**, matching
//! `GeoCoord`'s textual equality.

use std::hash::Hasher;

use rustc_hash::FxHasher;

use courier_core::GeoCoord;

/// Load factor used when none is configured.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.5;

const INITIAL_BUCKETS: usize = 8;

// ── Hashable ──────────────────────────────────────────────────────────────────

/// Bucket hash for [`CoordinateMap`] keys.
///
/// Must agree with `Eq`: keys that compare equal must return the same value.
pub trait Hashable {
    fn hash_key(&self) -> u64;
}

impl Hashable for GeoCoord {
    fn hash_key(&self) -> u64 {
        let mut h = FxHasher::default();
        h.write(self.lat_text().as_bytes());
        // Separator so ("1.2", "34") and ("1.23", "4") don't share a stream.
        h.write_u8(0xff);
        h.write(self.lon_text().as_bytes());
        h.finish()
    }
}

impl Hashable for str {
    fn hash_key(&self) -> u64 {
        let mut h = FxHasher::default();
        h.write(self.as_bytes());
        h.finish()
    }
}

impl Hashable for String {
    fn hash_key(&self) -> u64 {
        self.as_str().hash_key()
    }
}

impl Hashable for u64 {
    fn hash_key(&self) -> u64 {
        let mut h = FxHasher::default();
        h.write_u64(*self);
        h.finish()
    }
}

impl Hashable for u32 {
    fn hash_key(&self) -> u64 {
        u64::from(*self).hash_key()
    }
}

// ── CoordinateMap ─────────────────────────────────────────────────────────────

type Chain<K, V> = Option<Box<Entry<K, V>>>;

struct Entry<K, V> {
    key:   K,
    value: V,
    next:  Chain<K, V>,
}

/// Expandable hash map keyed by any [`Hashable`] type (in practice
/// [`GeoCoord`]).
///
/// Owns its storage exclusively and is deliberately not `Clone`.  There is
/// no removal; use [`reset`](Self::reset) to start over.
///
/// # Example
///
/// ```
/// use courier_spatial::CoordinateMap;
///
/// let mut gpa: CoordinateMap<String, f64> = CoordinateMap::with_max_load_factor(0.3);
/// gpa.associate("Carey".to_string(), 3.5);
/// gpa.associate("David".to_string(), 3.99);
/// gpa.associate("Abe".to_string(), 3.2); // 3 / 8 > 0.3 → grows to 16 buckets
/// assert_eq!(gpa.bucket_count(), 16);
///
/// gpa.associate("Carey".to_string(), 4.0); // overwrite, size unchanged
/// assert_eq!(gpa.size(), 3);
/// assert_eq!(gpa.find(&"Carey".to_string()), Some(&4.0));
/// assert!(gpa.find(&"Linda".to_string()).is_none());
/// ```
pub struct CoordinateMap<K, V> {
    buckets:         Vec<Chain<K, V>>,
    len:             usize,
    max_load_factor: f64,
}

impl<K: Hashable + Eq, V> CoordinateMap<K, V> {
    /// Empty map with 8 buckets and the default 0.5 maximum load factor.
    pub fn new() -> Self {
        Self::with_max_load_factor(DEFAULT_MAX_LOAD_FACTOR)
    }

    /// Empty map that grows once `size / bucket_count` exceeds
    /// `max_load_factor`.
    ///
    /// Non-finite or non-positive values fall back to
    /// [`DEFAULT_MAX_LOAD_FACTOR`].
    pub fn with_max_load_factor(max_load_factor: f64) -> Self {
        let max_load_factor = if max_load_factor.is_finite() && max_load_factor > 0.0 {
            max_load_factor
        } else {
            log::warn!(
                "ignoring max load factor {max_load_factor}; using {DEFAULT_MAX_LOAD_FACTOR}"
            );
            DEFAULT_MAX_LOAD_FACTOR
        };

        Self {
            buckets: empty_table(INITIAL_BUCKETS),
            len: 0,
            max_load_factor,
        }
    }

    /// Insert `key → value`, or replace the value if `key` is already present.
    ///
    /// Replacing never changes [`size`](Self::size) and never triggers growth.
    pub fn associate(&mut self, key: K, value: V) {
        let idx = self.bucket_of(&key);

        let mut cursor = self.buckets[idx].as_deref_mut();
        while let Some(entry) = cursor {
            if entry.key == key {
                entry.value = value;
                return;
            }
            cursor = entry.next.as_deref_mut();
        }

        let head = self.buckets[idx].take();
        self.buckets[idx] = Some(Box::new(Entry { key, value, next: head }));
        self.len += 1;

        if self.load_factor() > self.max_load_factor {
            self.grow();
        }
    }

    /// Shared reference to the value for `key`, if present.
    pub fn find(&self, key: &K) -> Option<&V> {
        let mut cursor = self.buckets[self.bucket_of(key)].as_deref();
        while let Some(entry) = cursor {
            if entry.key == *key {
                return Some(&entry.value);
            }
            cursor = entry.next.as_deref();
        }
        None
    }

    /// Mutable reference to the value for `key`, if present.
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = self.bucket_of(key);
        let mut cursor = self.buckets[idx].as_deref_mut();
        while let Some(entry) = cursor {
            if entry.key == *key {
                return Some(&mut entry.value);
            }
            cursor = entry.next.as_deref_mut();
        }
        None
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    #[inline]
    fn bucket_of(&self, key: &K) -> usize {
        // Bucket count is always a power of two.
        (key.hash_key() as usize) & (self.buckets.len() - 1)
    }

    /// Double the bucket count and relink every entry.
    fn grow(&mut self) {
        let new_count = self.buckets.len() * 2;
        let mut fresh = empty_table(new_count);

        for slot in &mut self.buckets {
            let mut chain = slot.take();
            while let Some(mut entry) = chain {
                chain = entry.next.take();
                let idx = (entry.key.hash_key() as usize) & (new_count - 1);
                entry.next = fresh[idx].take();
                fresh[idx] = Some(entry);
            }
        }

        self.buckets = fresh;
    }
}

impl<K, V> CoordinateMap<K, V> {
    /// Number of distinct keys.
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.buckets.len() as f64
    }

    #[inline]
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Drop every entry and shrink back to 8 buckets.  The configured
    /// maximum load factor is kept.
    pub fn reset(&mut self) {
        self.unlink_all();
        self.buckets = empty_table(INITIAL_BUCKETS);
        self.len = 0;
    }

    /// Iterate over all `(key, value)` pairs in unspecified order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets:   self.buckets.iter(),
            chain:     None,
            remaining: self.len,
        }
    }

    /// Tear chains down one entry at a time so a degenerate hash (every key
    /// in one bucket) cannot recurse through `Box` drops.
    fn unlink_all(&mut self) {
        for slot in &mut self.buckets {
            let mut chain = slot.take();
            while let Some(mut entry) = chain {
                chain = entry.next.take();
            }
        }
    }
}

impl<K: Hashable + Eq, V> Default for CoordinateMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for CoordinateMap<K, V> {
    fn drop(&mut self) {
        self.unlink_all();
    }
}

impl<'a, K, V> IntoIterator for &'a CoordinateMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

fn empty_table<K, V>(buckets: usize) -> Vec<Chain<K, V>> {
    (0..buckets).map(|_| None).collect()
}

// ── Iter ──────────────────────────────────────────────────────────────────────

/// Borrowing iterator returned by [`CoordinateMap::iter`].
pub struct Iter<'a, K, V> {
    buckets:   std::slice::Iter<'a, Chain<K, V>>,
    chain:     Option<&'a Entry<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain {
                self.chain = entry.next.as_deref();
                self.remaining -= 1;
                return Some((&entry.key, &entry.value));
            }
            self.chain = self.buckets.next()?.as_deref();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
