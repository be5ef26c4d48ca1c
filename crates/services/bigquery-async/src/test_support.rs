//! Test-only helpers for tests that mutate process environment.

/// Restores an environment variable to its previous value on drop.
pub struct EnvGuard {
    key: &'static str,
    prev: Option<String>,
}

impl EnvGuard {
    /// Set `key` for the lifetime of the guard.
    ///
    /// Callers must serialize env-mutating tests with `#[serial(env)]`.
    #[must_use]
    pub fn set(key: &'static str, val: &str) -> Self {
        let prev = std::env::var(key).ok();
        // SAFETY: env-mutating tests are serialized
        unsafe { std::env::set_var(key, val) };
        Self { key, prev }
    }

    /// Unset `key` for the lifetime of the guard.
    #[must_use]
    pub fn remove(key: &'static str) -> Self {
        let prev = std::env::var(key).ok();
        // SAFETY: env-mutating tests are serialized
        unsafe { std::env::remove_var(key) };
        Self { key, prev }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.prev {
            // SAFETY: the guard lives inside a serialized test
            Some(v) => unsafe { std::env::set_var(self.key, v) },
            // SAFETY: the guard lives inside a serialized test
            None => unsafe { std::env::remove_var(self.key) },
        }
    }
}
