//! Type-states of a [`Poly1305`](super::Poly1305) computation.
//!
//! `Init` only offers the constructor, `Ready` holds a keyed accumulator which has seen no
//! input, `Streaming` has absorbed at least one update.

use crate::sealed::Sealed;

/// A state of a `Poly1305` instance. Sealed.
pub trait Poly1305State : Sealed {}

use Poly1305State as State;

define_state! {
    /// Before keying.
    Init,
    /// Keyed, no input absorbed.
    Ready,
    /// Input is being absorbed.
    Streaming
}
