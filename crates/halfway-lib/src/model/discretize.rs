use crate::{
    error::{ModelError, ModelResult},
    series::{Sample, SampleSeries},
};

/// Sample the age axis `[1, max_age]` at `resolution` samples per year.
///
/// Sample `i` starts at `1 + i / resolution` and spans `1 / resolution` years.
/// The grid includes both endpoints, so it holds `(max_age - 1) * resolution + 1`
/// samples; the first is exactly 1 and the last exactly `max_age`.
pub fn discretize(max_age: u32, resolution: u32) -> ModelResult<SampleSeries> {
    if max_age == 0 || resolution == 0 {
        return Err(ModelError::InvalidConfiguration {
            max_age,
            resolution,
        });
    }
    let count = (max_age as usize - 1) * resolution as usize + 1;
    let res = resolution as f64;
    let step = 1.0 / res;
    // Dividing the integer index keeps every age exact at whole years.
    let samples = (0..count)
        .map(|i| Sample {
            age: 1.0 + i as f64 / res,
            step,
        })
        .collect();
    Ok(SampleSeries {
        max_age,
        resolution,
        samples,
    })
}
