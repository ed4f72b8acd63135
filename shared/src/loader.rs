use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The load was superseded or torn down. Callers drop it silently.
    #[error("load cancelled")]
    Cancelled,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("unreadable body: {0}")]
    Body(String),
}

type CancelHook = Box<dyn FnOnce()>;

#[derive(Default)]
struct TokenState {
    cancelled: Cell<bool>,
    hooks: RefCell<Vec<CancelHook>>,
}

/// Single-threaded cancellation flag shared between the coordinator and a loader.
#[derive(Clone, Default)]
pub struct CancelToken {
    state: Rc<TokenState>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.get()
    }

    /// Flip the flag and run registered hooks once. Repeated calls are no-ops.
    pub fn cancel(&self) {
        if self.state.cancelled.replace(true) {
            return;
        }
        let hooks = std::mem::take(&mut *self.state.hooks.borrow_mut());
        for hook in hooks {
            hook();
        }
    }

    /// Run `hook` on cancellation, or right away if already cancelled.
    pub fn on_cancel(&self, hook: impl FnOnce() + 'static) {
        if self.is_cancelled() {
            hook();
            return;
        }
        self.state.hooks.borrow_mut().push(Box::new(hook));
    }

    /// `Err(Cancelled)` once cancelled, for `?` at await points.
    pub fn check(&self) -> Result<(), LoadError> {
        if self.is_cancelled() {
            Err(LoadError::Cancelled)
        } else {
            Ok(())
        }
    }

    pub fn same_as(&self, other: &CancelToken) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Fetches the region image as text.
///
/// Implementations issue exactly one request per call and must return
/// [`LoadError::Cancelled`] when `token` fires before the body is read.
#[allow(async_fn_in_trait)]
pub trait AssetLoader {
    async fn load(&self, source: &str, token: &CancelToken) -> Result<String, LoadError>;
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn cancel_runs_hooks_once() {
        let token = CancelToken::new();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        token.on_cancel(move || c.set(c.get() + 1));

        token.cancel();
        token.cancel();

        assert!(token.is_cancelled());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn hook_after_cancel_runs_immediately() {
        let token = CancelToken::new();
        token.cancel();
        let ran = Rc::new(Cell::new(false));
        let r = ran.clone();
        token.on_cancel(move || r.set(true));
        assert!(ran.get());
    }

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(token.same_as(&clone));
        assert!(!token.same_as(&CancelToken::new()));
        clone.cancel();
        assert_eq!(token.check(), Err(LoadError::Cancelled));
    }
}
