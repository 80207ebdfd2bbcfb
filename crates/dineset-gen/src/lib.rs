//! Stage builders for the dineset fixture dataset.
//!
//! Three sequential batch stages, each a pure function from a
//! [`GeneratorConfig`](dineset_model::GeneratorConfig) plus the previous
//! stage's tables to a new output bundle:
//!
//! - [`stage1`]: cities, acquisition channels, users (+ referral edges),
//!   restaurants, menu items
//! - [`stage2`]: orders, order items, delivery tracking, reviews
//! - [`stage3`]: user sessions, cart items (converted + abandoned)
//!
//! Every random draw goes through one explicitly-passed `StdRng`, seeded
//! once at the top level. Reproducibility depends on the seed *and* the
//! call order: reordering draws changes all downstream values, so the
//! builders keep a strictly linear generation sequence.

pub mod persona;
pub mod sampling;
pub mod stage1;
pub mod stage2;
pub mod stage3;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// The pipeline RNG. One instance per stage invocation, threaded `&mut`
/// through every builder.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
