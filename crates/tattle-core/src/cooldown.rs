use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Per-key gate with timed auto-reset.
///
/// Reactions that call slow external services check the gate before firing:
/// the first caller for a key within the window proceeds, every later caller
/// is told to skip until the window elapses. Expiry is deadline-based and
/// reclaimed lazily under the same lock as the check-and-set, so no
/// background timer is needed and exactly one caller can win a gating cycle.
pub struct CooldownTracker {
    gated: Mutex<HashMap<String, Instant>>,
    window: Duration,
}

impl CooldownTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            gated: Mutex::new(HashMap::new()),
            window,
        }
    }

    /// Returns `true` if the caller may proceed for `key`, gating it for the
    /// configured window. Returns `false` if the key is already gated; the
    /// existing deadline is left untouched.
    pub fn try_gate(&self, key: &str) -> bool {
        let mut gated = self.gated.lock().expect("cooldown lock poisoned");
        let now = Instant::now();
        gated.retain(|_, deadline| *deadline > now);
        if gated.contains_key(key) {
            tracing::debug!(key, "gated, skipping");
            return false;
        }
        gated.insert(key.to_string(), now + self.window);
        true
    }

    /// Whether `key` is currently gated, without altering any state.
    pub fn is_gated(&self, key: &str) -> bool {
        let gated = self.gated.lock().expect("cooldown lock poisoned");
        gated
            .get(key)
            .is_some_and(|deadline| *deadline > Instant::now())
    }
}
