//! Synchronization utilities for handling poisoned locks.

use std::sync::{Mutex, MutexGuard};

/// Extension trait for `Mutex` that ignores lock poisoning.
pub trait IgnoreLock<T> {
    /// Lock the mutex, ignoring any poison error.
    fn lock_ignore_poison(&self) -> MutexGuard<'_, T>;
}

impl<T> IgnoreLock<T> for Mutex<T> {
    fn lock_ignore_poison(&self) -> MutexGuard<'_, T> {
        match self.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_lock_survives_poison() {
        let shared = Arc::new(Mutex::new(1_u32));
        let cloned = Arc::clone(&shared);

        let joined = thread::spawn(move || {
            let _guard = cloned.lock_ignore_poison();
            panic!("poison the lock");
        })
        .join();
        assert!(joined.is_err());
        assert!(shared.is_poisoned());

        *shared.lock_ignore_poison() += 1;
        assert_eq!(*shared.lock_ignore_poison(), 2);
    }
}
