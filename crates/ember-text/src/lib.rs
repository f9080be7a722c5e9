//! Text effects for the ember headline.

mod typewriter;

pub use typewriter::{DEFAULT_PHRASES, Typewriter, TypewriterTiming};
