use stowage_core::{PricedItem, StowageError};

/// Scales a volume to an integer number of `10^-significant_digits` units.
/// Every item occupies at least 1 scaled unit, so zero-volume (or, from an
/// unconstrained estimate, negative-volume) items cannot be added for free.
/// The floor is a known rounding bias: with d digits an item can be
/// overweighted by up to half a unit, and `significant_digits` trades that
/// accuracy against state-space size.
pub(crate) fn scaled_weight(volume: f64, significant_digits: u32) -> u64 {
    let scaled = (volume * 10f64.powi(significant_digits as i32)).round();
    // Float-to-int casts saturate, so an absurdly large estimate becomes an
    // unselectable weight rather than wrapping.
    (scaled as i64).max(1) as u64
}

/// Validates and scales the capacity. Rejects non-finite or non-positive
/// capacities, and scalings that leave the representable range.
pub(crate) fn scaled_capacity(capacity: f64, significant_digits: u32) -> Result<u64, StowageError> {
    if !capacity.is_finite() || capacity <= 0.0 {
        return Err(StowageError::InvalidCapacity { capacity });
    }
    let scaled = (capacity * 10f64.powi(significant_digits as i32)).round();
    if !scaled.is_finite() || scaled >= i64::MAX as f64 {
        return Err(StowageError::InvalidCapacity { capacity });
    }
    Ok(scaled as i64 as u64)
}

/// Sum of the winners' original (unscaled) volume estimates. Reported
/// totals come from here, not from de-scaling, so quantization error does
/// not compound into the answer.
pub(crate) fn true_volume(items: &[PricedItem], chosen: &[usize]) -> f64 {
    chosen.iter().map(|&i| items[i].volume).sum()
}
