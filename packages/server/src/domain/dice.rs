//! Dice Engine.
//!
//! Outcomes come from the thread-local generator of `rand`, which is seeded
//! from the operating system; clients never see or influence the seed.

use rand::Rng;

use super::{error::ValueObjectError, value_object::DieSize};

/// Roll one die with `die_size` faces.
///
/// # Errors
///
/// Returns `ValueObjectError::InvalidDieSize` when `die_size < 2`.
pub fn roll(die_size: i64) -> Result<u32, ValueObjectError> {
    let size = DieSize::new(die_size)?;
    Ok(roll_die(size))
}

/// Roll an already validated die.
pub fn roll_die(size: DieSize) -> u32 {
    roll_with(&mut rand::rng(), size)
}

/// Uniform outcome in `[1, size]` drawn from `rng`.
pub fn roll_with<R: Rng + ?Sized>(rng: &mut R, size: DieSize) -> u32 {
    rng.random_range(1..=size.value())
}
