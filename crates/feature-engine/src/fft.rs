//! FFT-based Linear Convolution

use rustfft::{num_complex::Complex, FftPlanner};

/// Full linear convolution through the frequency domain
pub struct FftConvolver {
    /// FFT planner for efficient computation
    planner: FftPlanner<f64>,
}

impl Default for FftConvolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FftConvolver {
    /// Create a new convolver
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Full convolution of `signal` with `kernel`, length `n + m - 1`.
    ///
    /// Returns an empty vector when either input is empty.
    pub fn convolve(&mut self, signal: &[f64], kernel: &[f64]) -> Vec<f64> {
        if signal.is_empty() || kernel.is_empty() {
            return Vec::new();
        }

        let out_len = signal.len() + kernel.len() - 1;
        let size = out_len.next_power_of_two();

        let mut a = Self::zero_padded(signal, size);
        let mut b = Self::zero_padded(kernel, size);

        let forward = self.planner.plan_fft_forward(size);
        forward.process(&mut a);
        forward.process(&mut b);

        for (x, y) in a.iter_mut().zip(b.iter()) {
            *x *= *y;
        }

        let inverse = self.planner.plan_fft_inverse(size);
        inverse.process(&mut a);

        // rustfft leaves the inverse unnormalized
        let scale = 1.0 / size as f64;
        a.iter().take(out_len).map(|c| c.re * scale).collect()
    }

    fn zero_padded(values: &[f64], size: usize) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> = values.iter().map(|&v| Complex::new(v, 0.0)).collect();
        buffer.resize(size, Complex::new(0.0, 0.0));
        buffer
    }
}

/// Direct O(n·m) full convolution
pub(crate) fn convolve_direct(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }

    let mut out = vec![0.0; signal.len() + kernel.len() - 1];
    for (i, &s) in signal.iter().enumerate() {
        for (j, &k) in kernel.iter().enumerate() {
            out[i + j] += s * k;
        }
    }
    out
}
