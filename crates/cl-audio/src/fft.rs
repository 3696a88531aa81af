use realfft::RealFftPlanner;

/// FFT pipeline: Hann-windowed real FFT using realfft.
///
/// Pre-allocates the FFT plan and scratch buffers; `power_spectrum` reuses
/// them on every call.
///
/// # Example
/// ```
/// use cl_audio::fft::FftPipeline;
/// let fft = FftPipeline::new(2048);
/// assert_eq!(fft.num_bins(), 1025);
/// ```
pub struct FftPipeline {
    fft_size: usize,
    input_buf: Vec<f32>,
    spectrum_buf: Vec<realfft::num_complex::Complex<f32>>,
    scratch: Vec<realfft::num_complex::Complex<f32>>,
    power: Vec<f32>,
    plan: std::sync::Arc<dyn realfft::RealToComplex<f32>>,
    /// Hann window coefficients.
    window: Vec<f32>,
}

impl FftPipeline {
    /// Create a new FFT pipeline with the given window size.
    ///
    /// # Panics
    /// Panics if `size` is 0.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "FFT size must be > 0");

        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(size);

        let input_buf = plan.make_input_vec();
        let spectrum_buf = plan.make_output_vec();
        let scratch = plan.make_scratch_vec();
        let power = vec![0.0; spectrum_buf.len()];

        // Periodic Hann window, as used for STFT analysis.
        let window: Vec<f32> = (0..size)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos()))
            .collect();

        Self {
            fft_size: size,
            input_buf,
            spectrum_buf,
            scratch,
            power,
            plan,
            window,
        }
    }

    /// Window `samples` and return the power spectrum (N/2+1 bins).
    ///
    /// Input shorter than the FFT size is zero-padded; longer input is
    /// truncated.
    ///
    /// # Example
    /// ```
    /// use cl_audio::fft::FftPipeline;
    /// let mut fft = FftPipeline::new(256);
    /// let samples = vec![0.0f32; 100];
    /// let spectrum = fft.power_spectrum(&samples);
    /// assert_eq!(spectrum.len(), 129); // N/2 + 1
    /// ```
    pub fn power_spectrum(&mut self, samples: &[f32]) -> &[f32] {
        let n = self.fft_size.min(samples.len());

        for (i, slot) in self.input_buf.iter_mut().enumerate() {
            *slot = if i < n {
                samples[i] * self.window[i]
            } else {
                0.0
            };
        }

        if self
            .plan
            .process_with_scratch(
                &mut self.input_buf,
                &mut self.spectrum_buf,
                &mut self.scratch,
            )
            .is_err()
        {
            self.power.fill(0.0);
            return &self.power;
        }

        let scale = 1.0 / self.fft_size as f32;
        for (p, c) in self.power.iter_mut().zip(&self.spectrum_buf) {
            let re = c.re * scale;
            let im = c.im * scale;
            *p = re * re + im * im;
        }
        &self.power
    }

    /// FFT window size.
    #[must_use]
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of spectrum bins (N/2 + 1).
    #[must_use]
    pub fn num_bins(&self) -> usize {
        self.power.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_peaks_at_its_bin() {
        let size = 1024;
        let sr = 8000.0f32;
        // Bin 64 → 64 * 8000 / 1024 = 500 Hz.
        let samples: Vec<f32> = (0..size)
            .map(|i| (2.0 * std::f32::consts::PI * 500.0 * i as f32 / sr).sin())
            .collect();
        let mut fft = FftPipeline::new(size);
        let power = fft.power_spectrum(&samples);
        let peak = power
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 64);
    }

    #[test]
    fn silence_has_no_power() {
        let mut fft = FftPipeline::new(512);
        assert!(fft.power_spectrum(&[0.0; 512]).iter().all(|&p| p == 0.0));
    }
}
