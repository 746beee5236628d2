//! Stat model.
//!
//! ```text
//! [ BaseStats + Attributes ]   stored on every actor
//!      ↓
//! [ StatModifiers ]            folded from status effects and gear
//!      ↓
//! [ EffectiveStats ]           read-only view, never stored
//! ```
//!
//! Every mutation of health or resource goes through [`BaseStats`] methods,
//! which clamp into `[0, max]` so no operation can leave a pool out of range.

pub mod core;
pub mod modifiers;
pub mod snapshot;

pub use core::{Attributes, BaseStats};
pub use modifiers::StatModifiers;
pub use snapshot::{EffectiveStats, compute_effective_stats};
