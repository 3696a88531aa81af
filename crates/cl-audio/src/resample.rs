use anyhow::{Context, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Resample mono `samples` from `from_rate` to `to_rate` with sinc interpolation.
///
/// Identity when the rates match or the input is empty.
///
/// # Errors
/// Returns an error if either rate is zero or rubato rejects the ratio.
///
/// # Example
/// ```
/// use cl_audio::resample::resample;
/// let out = resample(&vec![0.0f32; 4410], 44100, 22050).unwrap();
/// assert!(out.len() > 2000 && out.len() < 2300);
/// ```
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == 0 || to_rate == 0 {
        anyhow::bail!("Cannot resample {from_rate} Hz -> {to_rate} Hz");
    }
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 128,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 128,
        window: WindowFunction::BlackmanHarris2,
    };
    let ratio = f64::from(to_rate) / f64::from(from_rate);

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, samples.len(), 1)
        .context("Failed to create resampler")?;
    let mut output = resampler
        .process(&[samples], None)
        .context("Resampling failed")?;

    let out = output.pop().unwrap_or_default();
    log::info!(
        "Resampled {} samples @ {from_rate}Hz -> {} samples @ {to_rate}Hz",
        samples.len(),
        out.len()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_rate_is_identity() {
        let input = vec![0.1, 0.2, 0.3];
        assert_eq!(resample(&input, 22050, 22050).unwrap(), input);
    }

    #[test]
    fn zero_rate_is_an_error() {
        assert!(resample(&[0.0; 8], 0, 22050).is_err());
    }

    #[test]
    fn halving_rate_roughly_halves_length() {
        let input = vec![0.0f32; 44100];
        let out = resample(&input, 44100, 22050).unwrap();
        assert!(out.len() > 21000 && out.len() < 22100, "{}", out.len());
    }
}
