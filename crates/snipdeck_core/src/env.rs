//! Process-global environment mutation helpers.

use std::sync::{Mutex, MutexGuard, OnceLock};

/// Return the global lock used to serialize environment mutations in tests.
pub fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

#[allow(unused_unsafe)]
fn set_env_var(key: &str, value: &str) {
    // SAFETY: Callers must hold `env_lock` when test threads may run in parallel.
    unsafe {
        std::env::set_var(key, value);
    }
}

#[allow(unused_unsafe)]
fn remove_env_var(key: &str) {
    // SAFETY: Callers must hold `env_lock` when test threads may run in parallel.
    unsafe {
        std::env::remove_var(key);
    }
}

/// Set of environment overrides restored in reverse order on drop.
///
/// Holds the global env lock for its whole lifetime, so overrides from two
/// tests never interleave.
pub struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// Acquire the env lock with no overrides applied yet.
    pub fn new() -> Self {
        let lock = env_lock()
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Self {
            saved: Vec::new(),
            _lock: lock,
        }
    }

    /// Set `key=value` until this scope ends.
    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.saved.push((key.to_string(), std::env::var(key).ok()));
        set_env_var(key, value);
        self
    }

    /// Remove `key` until this scope ends.
    pub fn unset(mut self, key: &str) -> Self {
        self.saved.push((key.to_string(), std::env::var(key).ok()));
        remove_env_var(key);
        self
    }
}

impl Default for ScopedEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        while let Some((key, previous)) = self.saved.pop() {
            match previous {
                Some(value) => set_env_var(&key, &value),
                None => remove_env_var(&key),
            }
        }
    }
}
