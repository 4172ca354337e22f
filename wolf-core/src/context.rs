//! Explicit runtime configuration.
//!
//! There is no library-wide mutable state. Anything which would otherwise be global (the device
//! identifier, the pending operation budget, a label for log events) lives in a [`Context`]
//! which the caller creates, passes to the `*_ex` constructors, and tears down.
use core::fmt;
use crate::error::Error;

/// Device identifier meaning "software implementation".
pub const INVALID_DEVID: i32 = -2;

/// Default number of times [`Context::wait`] re-polls a pending operation.
pub const DEFAULT_PENDING_POLLS: u32 = 1024;

/// Per-caller configuration.
///
/// # Example
///
/// ```
/// use wolf_core::{Context, Error};
/// use wolf_core::hash::{Hash, HashType};
///
/// let ctx = Context::init().with_label("file-hasher");
/// let mut h = Hash::new_ex(HashType::Sha256, &ctx).unwrap();
/// h.update(HashType::Sha256, b"data").unwrap();
///
/// // software primitives never report `Pending`, so `wait` returns immediately.
/// let mut out = [0u8; 32];
/// assert_eq!(ctx.wait(|| h.finalize_into(HashType::Sha256, &mut out)), Ok(32));
///
/// ctx.teardown();
/// ```
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Context {
    dev_id: i32,
    max_pending_polls: u32,
    label: &'static str
}

impl Default for Context {
    #[inline]
    fn default() -> Self {
        Self::init()
    }
}

impl Context {
    /// A software context with the default pending budget.
    pub const fn init() -> Self {
        Self { dev_id: INVALID_DEVID, max_pending_polls: DEFAULT_PENDING_POLLS, label: "wolf-core" }
    }

    /// Release the context. Nothing is held beyond the value itself, this exists so that the
    /// lifetime of a context is explicit at the call site.
    #[inline]
    pub fn teardown(self) {
        log_debug!(label = self.label, "context teardown");
    }

    /// Select a device. [`INVALID_DEVID`] selects the software implementation.
    #[must_use]
    pub const fn with_dev_id(mut self, dev_id: i32) -> Self {
        self.dev_id = dev_id;
        self
    }

    /// How many times [`wait`](Self::wait) polls a pending operation before giving up.
    #[must_use]
    pub const fn with_max_pending_polls(mut self, polls: u32) -> Self {
        self.max_pending_polls = polls;
        self
    }

    /// Label attached to log events emitted under this context.
    #[must_use]
    pub const fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    #[inline]
    pub const fn dev_id(&self) -> i32 {
        self.dev_id
    }

    #[inline]
    pub const fn max_pending_polls(&self) -> u32 {
        self.max_pending_polls
    }

    #[inline]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// `true` if this context selects the software implementation.
    #[inline]
    pub const fn is_software(&self) -> bool {
        self.dev_id == INVALID_DEVID
    }

    /// Invoke `op` until it returns something other than [`Error::Pending`].
    ///
    /// # Errors
    ///
    /// Any terminal error of `op`, or [`Error::Timeout`] once `op` has reported
    /// [`Error::Pending`] `max_pending_polls + 1` times.
    pub fn wait<T, F>(&self, mut op: F) -> Result<T, Error>
        where F: FnMut() -> Result<T, Error>
    {
        let mut polls = 0u32;
        loop {
            match op() {
                Err(Error::Pending) if polls < self.max_pending_polls => polls += 1,
                Err(Error::Pending) => {
                    log_warn!(label = self.label, polls, "pending operation timed out");
                    return Err(Error::Timeout);
                },
                other => return other
            }
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("dev_id", &self.dev_id)
            .field("max_pending_polls", &self.max_pending_polls)
            .field("label", &self.label)
            .finish()
    }
}
