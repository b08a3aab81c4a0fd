//! Layered translation resolution
//!
//! One field-level translation decision is composed from three layers:
//!
//! 1. [`EffectPatterns`] - ordered substring rewriting for semi-structured
//!    battle-effect notation (never sent to memory or a provider),
//! 2. [`TranslationMemory`] - exact-match source/target cache merged from
//!    dictionary files,
//! 3. [`TranslationProvider`] - a delegated machine-translation capability,
//!    routed per table and guarded by a [`RetryPolicy`].
//!
//! [`Resolver`] ties the layers together.

mod effects;
mod memory;
mod provider;
mod resolver;

pub use effects::EffectPatterns;
pub use memory::TranslationMemory;
pub use provider::{ProviderError, RetryPolicy, TranslationProvider};
pub use resolver::Resolver;
