//! Thread-safe memo table with compute-once semantics

use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// A memo table shared between threads.
///
/// Each key is published through its own `OnceCell`: the map lock is only
/// held while looking up the cell, and concurrent requests for a key that is
/// being computed wait for that computation instead of repeating it.
pub struct MemoTable<K, V> {
    name: &'static str,
    capacity: Option<usize>,
    cells: Mutex<HashMap<K, Arc<OnceCell<V>>>>,
}

impl<K, V> MemoTable<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create an unbounded table
    pub fn new(name: &'static str) -> Self {
        Self::with_capacity(name, None)
    }

    /// Create a table that is cleared once it holds more than `capacity` keys
    pub fn with_capacity(name: &'static str, capacity: Option<usize>) -> Self {
        MemoTable {
            name,
            capacity,
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// Return the value for `key`, computing it with `compute` if absent.
    ///
    /// `compute` may recurse into this table for other keys.
    pub fn get_or_compute<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        let cell = {
            let mut cells = self.lock();
            if let Some(cell) = cells.get(&key) {
                cell.clone()
            } else {
                if let Some(capacity) = self.capacity {
                    if cells.len() >= capacity {
                        debug!(
                            table = self.name,
                            entries = cells.len(),
                            "memo table full, clearing"
                        );
                        cells.clear();
                    }
                }
                let cell = Arc::new(OnceCell::new());
                cells.insert(key, cell.clone());
                cell
            }
        };
        cell.get_or_init(compute).clone()
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the table holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every memoized value
    pub fn clear(&self) {
        let mut cells = self.lock();
        debug!(table = self.name, entries = cells.len(), "clearing memo table");
        cells.clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Arc<OnceCell<V>>>> {
        // A panic inside `compute` never happens under the lock, so a
        // poisoned map is still consistent.
        self.cells.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_computes_once() {
        let table: MemoTable<u32, u64> = MemoTable::new("test");
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let v = table.get_or_compute(7, || {
                calls.fetch_add(1, Ordering::SeqCst);
                49
            });
            assert_eq!(v, 49);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_recursive_compute() {
        fn fib(table: &MemoTable<u64, u64>, n: u64) -> u64 {
            table.get_or_compute(n, || {
                if n < 2 {
                    n
                } else {
                    fib(table, n - 1) + fib(table, n - 2)
                }
            })
        }

        let table = MemoTable::new("fib");
        assert_eq!(fib(&table, 80), 23_416_728_348_467_685);
        assert_eq!(table.len(), 81);
    }

    #[test]
    fn test_capacity_clears_table() {
        let table: MemoTable<usize, usize> = MemoTable::with_capacity("bounded", Some(4));
        for k in 0..10 {
            table.get_or_compute(k, || k * k);
        }
        assert!(table.len() <= 4);
        assert_eq!(table.get_or_compute(3, || 9), 9);

        table.clear();
        assert!(table.is_empty());
    }

    #[test]
    fn test_concurrent_compute_once() {
        let table: Arc<MemoTable<u8, u8>> = Arc::new(MemoTable::new("shared"));
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let table = table.clone();
                let calls = calls.clone();
                std::thread::spawn(move || {
                    table.get_or_compute(1, || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        std::thread::sleep(std::time::Duration::from_millis(5));
                        42
                    })
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
