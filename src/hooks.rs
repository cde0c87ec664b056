//! Failure callbacks handed to the embedding application.
//!
//! Hooks are plain configuration: set them on [`crate::ConnectionOptionsBuilder`] (or
//! [`crate::Connection::set_hooks`]) and every statement prepared afterwards gets a copy.

use std::fmt;
use std::sync::Arc;

pub type UsageHook = Arc<dyn Fn(&str) + Send + Sync>;
pub type EngineHook = Arc<dyn Fn(i32, &str) + Send + Sync>;

/// Optional usage-failure and engine-failure callbacks. Unset hooks are no-ops.
#[derive(Clone, Default)]
pub struct FailureHooks {
    usage: Option<UsageHook>,
    engine: Option<EngineHook>,
}

impl FailureHooks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with a message whenever the caller breaks the statement protocol.
    #[must_use]
    pub fn with_usage<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.usage = Some(Arc::new(hook));
        self
    }

    /// Called with `(engine_code, message)` whenever the engine reports a failure.
    #[must_use]
    pub fn with_engine<F>(mut self, hook: F) -> Self
    where
        F: Fn(i32, &str) + Send + Sync + 'static,
    {
        self.engine = Some(Arc::new(hook));
        self
    }

    pub(crate) fn usage_failure(&self, message: &str) {
        if let Some(hook) = &self.usage {
            hook(message);
        }
    }

    pub(crate) fn engine_failure(&self, code: i32, message: &str) {
        if let Some(hook) = &self.engine {
            hook(code, message);
        }
    }

    #[must_use]
    pub fn has_usage_hook(&self) -> bool {
        self.usage.is_some()
    }

    #[must_use]
    pub fn has_engine_hook(&self) -> bool {
        self.engine.is_some()
    }
}

impl fmt::Debug for FailureHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailureHooks")
            .field("usage", &self.usage.is_some())
            .field("engine", &self.engine.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn unset_hooks_are_noops() {
        let hooks = FailureHooks::new();
        hooks.usage_failure("ignored");
        hooks.engine_failure(1, "ignored");
        assert!(!hooks.has_usage_hook());
        assert!(!hooks.has_engine_hook());
    }

    #[test]
    fn clones_share_the_same_callbacks() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let hooks = FailureHooks::new().with_engine(move |code, msg| {
            sink.lock().unwrap().push((code, msg.to_owned()));
        });
        let copy = hooks.clone();
        hooks.engine_failure(1, "first");
        copy.engine_failure(21, "second");
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(1, "first".to_owned()), (21, "second".to_owned())]
        );
    }
}
