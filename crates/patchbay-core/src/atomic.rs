//! Reader/writer-locked container for shared mutable state.

use core::fmt;

use parking_lot::RwLock;

/// Thread-safe cell giving many concurrent readers or one writer.
///
/// [`modify`](Self::modify) holds the write lock across a whole
/// get-then-set, so compound updates (inserting into a map, incrementing a
/// counter) never lose writes to a concurrent writer.
///
/// Intended for state owned by a module, an instance or the process, usually
/// behind an `Arc` or in a `static`. A function-local `Atomic` protects
/// nothing that a plain local variable would not.
///
/// # Example
///
/// ```
/// use patchbay_core::Atomic;
/// use std::collections::HashMap;
///
/// let cache: Atomic<HashMap<u32, &str>> = Atomic::default();
/// cache.modify(|map| map.insert(1, "Port 1"));
/// assert_eq!(cache.read(|map| map.get(&1).copied()), Some("Port 1"));
/// ```
pub struct Atomic<T> {
    value: RwLock<T>,
}

impl<T> Atomic<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Clone of the current value, taken under a shared lock.
    #[inline]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.read().clone()
    }

    /// Shared access; any number of readers may run at once.
    #[inline]
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read())
    }

    #[inline]
    pub fn set(&self, value: T) {
        *self.value.write() = value;
    }

    /// Stores `value` and returns the previous one.
    #[inline]
    pub fn replace(&self, value: T) -> T {
        core::mem::replace(&mut *self.value.write(), value)
    }

    /// Exclusive read-modify-write.
    #[inline]
    pub fn modify<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.value.write())
    }

    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

impl<T: Default> Default for Atomic<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for Atomic<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Atomic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|value| f.debug_tuple("Atomic").field(value).finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_get_set_replace() {
        let cell = Atomic::new(1u32);
        assert_eq!(cell.get(), 1);
        cell.set(2);
        assert_eq!(cell.get(), 2);
        assert_eq!(cell.replace(3), 2);
        assert_eq!(cell.into_inner(), 3);
    }

    #[test]
    fn test_modify_returns_value() {
        let cell = Atomic::new(vec![1, 2]);
        let len = cell.modify(|v| {
            v.push(3);
            v.len()
        });
        assert_eq!(len, 3);
        assert_eq!(cell.read(|v| v.iter().sum::<i32>()), 6);
    }

    #[test]
    fn test_debug() {
        let cell = Atomic::new(5u8);
        assert_eq!(format!("{cell:?}"), "Atomic(5)");
    }

    #[test]
    fn test_concurrent_map_increments_not_lost() {
        const THREADS: usize = 8;
        const ITERATIONS: usize = 1000;

        let cache: Arc<Atomic<HashMap<&'static str, usize>>> = Arc::new(Atomic::default());

        thread::scope(|s| {
            for i in 0..THREADS {
                let cache = Arc::clone(&cache);
                s.spawn(move || {
                    let key = if i % 2 == 0 { "even" } else { "odd" };
                    for _ in 0..ITERATIONS {
                        cache.modify(|map| *map.entry(key).or_insert(0) += 1);
                        cache.modify(|map| *map.entry("all").or_insert(0) += 1);
                    }
                });
            }
        });

        let map = cache.get();
        assert_eq!(map["all"], THREADS * ITERATIONS);
        assert_eq!(map["even"], THREADS / 2 * ITERATIONS);
        assert_eq!(map["odd"], THREADS / 2 * ITERATIONS);
    }

    #[test]
    fn test_readers_never_see_partial_writes() {
        // Writers always store a pair whose halves match; a torn write would
        // show up as a mismatched pair.
        let cell = Arc::new(Atomic::new((0u64, 0u64)));

        thread::scope(|s| {
            for w in 0..2u64 {
                let cell = Arc::clone(&cell);
                s.spawn(move || {
                    for i in 0..2000u64 {
                        let v = i * 2 + w;
                        cell.set((v, v));
                    }
                });
            }
            for _ in 0..4 {
                let cell = Arc::clone(&cell);
                s.spawn(move || {
                    for _ in 0..2000 {
                        let (a, b) = cell.get();
                        assert_eq!(a, b);
                    }
                });
            }
        });
    }
}
