//! Environment variable management for testing
//!
//! Tests in one binary share a single process environment, so every guard
//! holds a process-wide lock for its whole lifetime. Two guards alive in the
//! same test must therefore be created through [`EnvVarGuard::with_vars`].

use std::env;
use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
  // A panicking test must not wedge every later test.
  ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// RAII guard that overrides environment variables and restores their
/// original values when dropped.
pub struct EnvVarGuard {
  saved: Vec<(String, Option<String>)>,
  _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
  /// Take ownership of several variables at once. Their values are left
  /// untouched until one of the setters is called.
  pub fn with_vars(names: &[&str]) -> Self {
    let lock = lock_env();
    let saved = names
      .iter()
      .map(|name| ((*name).to_string(), env::var(name).ok()))
      .collect();
    Self { saved, _lock: lock }
  }

  /// Set any guarded variable by name.
  pub fn set_var(&self, name: &str, value: &str) {
    assert!(self.guards(name), "variable {name} is not guarded");
    // SAFETY: ENV_LOCK serialises every mutation made through this crate.
    unsafe {
      env::set_var(name, value);
    }
  }

  /// Remove any guarded variable by name.
  pub fn remove_var(&self, name: &str) {
    assert!(self.guards(name), "variable {name} is not guarded");
    // SAFETY: ENV_LOCK serialises every mutation made through this crate.
    unsafe {
      env::remove_var(name);
    }
  }

  /// Remove every guarded variable.
  pub fn clear_all(&self) {
    for (name, _) in &self.saved {
      self.remove_var(name);
    }
  }

  fn guards(&self, name: &str) -> bool {
    self.saved.iter().any(|(saved, _)| saved == name)
  }
}

impl Drop for EnvVarGuard {
  fn drop(&mut self) {
    for (name, original) in &self.saved {
      // SAFETY: the lock is still held; it is released after this body runs.
      match original {
        Some(value) => unsafe {
          env::set_var(name, value);
        },
        None => unsafe {
          env::remove_var(name);
        },
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_guard_restores_previous_value() {
    const NAME: &str = "ATLAS_TEST_UTILS_RESTORE";
    {
      let guard = EnvVarGuard::with_vars(&[NAME]);
      guard.set_var(NAME, "temporary");
      assert_eq!(env::var(NAME).as_deref(), Ok("temporary"));
    }
    assert!(env::var(NAME).is_err());
  }

  #[test]
  fn test_guard_handles_multiple_variables() {
    let guard = EnvVarGuard::with_vars(&["ATLAS_TEST_UTILS_A", "ATLAS_TEST_UTILS_B"]);
    guard.set_var("ATLAS_TEST_UTILS_A", "a");
    guard.set_var("ATLAS_TEST_UTILS_B", "b");
    assert_eq!(env::var("ATLAS_TEST_UTILS_B").as_deref(), Ok("b"));

    guard.clear_all();
    assert!(env::var("ATLAS_TEST_UTILS_A").is_err());
    assert!(env::var("ATLAS_TEST_UTILS_B").is_err());
  }
}
