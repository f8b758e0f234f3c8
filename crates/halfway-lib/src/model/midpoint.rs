use crate::{
    error::{ModelError, ModelResult},
    series::{CumulativeSeries, Midpoint},
};

/// Find the first sample whose running total reaches half of the final total.
///
/// Ties at exactly half resolve to the earliest index; nothing is interpolated.
/// The reported age is the end of that sample's slice, i.e. the age by which
/// `cumulative_value` has been accrued.
pub fn locate_midpoint(cumulative: &CumulativeSeries) -> ModelResult<Midpoint> {
    let total = cumulative.total().ok_or(ModelError::EmptySeries)?;
    if !total.is_finite() || total <= 0.0 {
        return Err(ModelError::DegenerateTotal { total });
    }
    let half = total / 2.0;
    // Monotone input, so the crossing is a partition point.
    let index = cumulative.values.partition_point(|&v| v < half);
    let (Some(&sample_age), Some(&cumulative_value)) =
        (cumulative.ages.get(index), cumulative.values.get(index))
    else {
        return Err(ModelError::EmptySeries);
    };
    Ok(Midpoint {
        age: sample_age + cumulative.step,
        sample_age,
        index,
        cumulative_value,
    })
}
