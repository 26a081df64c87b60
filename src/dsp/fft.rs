use std::collections::HashMap;
use std::sync::Arc;

use crate::dsp::window::{self, WindowShape};
use crate::error::SpectrogramError;

/// Magnitudes of the first `size / 2` frequency bins of one segment, plus the
/// peak observed while converting. Returning the peak alongside the bins keeps
/// `FftPlan::transform` free of interior mutability, so one plan can be shared
/// across rayon workers.
#[derive(Debug)]
pub struct MagnitudeSpectrum {
    pub bins: Vec<f32>,
    pub peak_bin: usize,
    pub peak: f32,
}

/// Precomputed tables for a fixed power-of-two FFT size.
///
/// Immutable once built; `transform` takes `&self` and allocates only its
/// scratch buffers.
#[derive(Debug)]
pub struct FftPlan {
    size: usize,
    sample_rate: u32,
    window_values: Vec<f32>,
    sin_table: Vec<f32>,
    cos_table: Vec<f32>,
    reverse_table: Vec<usize>,
}

impl FftPlan {
    pub fn build(
        size: usize,
        sample_rate: u32,
        shape: WindowShape,
        alpha: Option<f32>,
    ) -> Result<Self, SpectrogramError> {
        if size < 2 || !size.is_power_of_two() {
            return Err(SpectrogramError::NonPowerOfTwoSize(size));
        }

        let window_values = window::coefficients(shape, size, alpha);

        // Reverse-bit-order table by iterative doubling: each pass copies the
        // filled prefix, offset by the next-lower high bit.
        let mut reverse_table = vec![0usize; size];
        let mut limit = 1;
        let mut bit = size >> 1;
        while limit < size {
            for i in 0..limit {
                reverse_table[i + limit] = reverse_table[i] + bit;
            }
            limit <<= 1;
            bit >>= 1;
        }

        // Twiddle tables, indexed by the per-stage half size. Only the
        // power-of-two entries >= 1 are ever read; entry 0 stays zero.
        let mut sin_table = vec![0.0f32; size];
        let mut cos_table = vec![0.0f32; size];
        for k in 1..size {
            sin_table[k] = (-std::f32::consts::PI / k as f32).sin();
            cos_table[k] = (-std::f32::consts::PI / k as f32).cos();
        }

        Ok(Self {
            size,
            sample_rate,
            window_values,
            sin_table,
            cos_table,
            reverse_table,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Width of one frequency bin in Hz. Used for labels and logging only.
    pub fn bin_resolution(&self) -> f32 {
        self.sample_rate as f32 / self.size as f32
    }

    /// Windowed radix-2 decimation-in-time FFT of one segment.
    ///
    /// The segment must be exactly `size` samples long.
    pub fn transform(&self, segment: &[f32]) -> Result<MagnitudeSpectrum, SpectrogramError> {
        if segment.len() != self.size {
            return Err(SpectrogramError::SegmentSizeMismatch {
                size: self.size,
                len: segment.len(),
            });
        }

        let size = self.size;
        let mut real = vec![0.0f32; size];
        let mut imag = vec![0.0f32; size];

        // Bit-reversal reordering fused with windowing.
        for i in 0..size {
            let src = self.reverse_table[i];
            real[i] = segment[src] * self.window_values[src];
        }

        let mut half_size = 1;
        while half_size < size {
            let phase_step_real = self.cos_table[half_size];
            let phase_step_imag = self.sin_table[half_size];

            let mut phase_real = 1.0f32;
            let mut phase_imag = 0.0f32;

            for group in 0..half_size {
                let mut i = group;
                while i < size {
                    let off = i + half_size;
                    let tr = phase_real * real[off] - phase_imag * imag[off];
                    let ti = phase_real * imag[off] + phase_imag * real[off];

                    real[off] = real[i] - tr;
                    imag[off] = imag[i] - ti;
                    real[i] += tr;
                    imag[i] += ti;

                    i += half_size << 1;
                }

                let tmp = phase_real;
                phase_real = tmp * phase_step_real - phase_imag * phase_step_imag;
                phase_imag = tmp * phase_step_imag + phase_imag * phase_step_real;
            }

            half_size <<= 1;
        }

        let scale = 2.0 / size as f32;
        let mut bins = Vec::with_capacity(size / 2);
        let mut peak_bin = 0;
        let mut peak = 0.0f32;

        for i in 0..size / 2 {
            let magnitude = scale * (real[i] * real[i] + imag[i] * imag[i]).sqrt();
            if magnitude > peak {
                peak_bin = i;
                peak = magnitude;
            }
            bins.push(magnitude);
        }

        Ok(MagnitudeSpectrum {
            bins,
            peak_bin,
            peak,
        })
    }
}

#[derive(PartialEq, Eq, Hash)]
struct PlanKey {
    size: usize,
    sample_rate: u32,
    shape: WindowShape,
    alpha_bits: Option<u32>,
}

/// Cache of built plans keyed by their defining parameters.
///
/// Plans are stored behind `Arc` and handed out read-shared; a cached plan is
/// never mutated, only replaced by dropping the cache.
#[derive(Default)]
pub struct PlanCache {
    plans: HashMap<PlanKey, Arc<FftPlan>>,
}

impl PlanCache {
    pub fn get_or_build(
        &mut self,
        size: usize,
        sample_rate: u32,
        shape: WindowShape,
        alpha: Option<f32>,
    ) -> Result<Arc<FftPlan>, SpectrogramError> {
        let key = PlanKey {
            size,
            sample_rate,
            shape,
            alpha_bits: alpha.map(f32::to_bits),
        };
        if let Some(plan) = self.plans.get(&key) {
            return Ok(Arc::clone(plan));
        }
        let plan = Arc::new(FftPlan::build(size, sample_rate, shape, alpha)?);
        self.plans.insert(key, Arc::clone(&plan));
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(cycles: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * cycles * i as f32 / len as f32).sin())
            .collect()
    }

    #[test]
    fn rejects_non_power_of_two_size() {
        let err = FftPlan::build(500, 44100, WindowShape::Hann, None).unwrap_err();
        assert!(matches!(err, SpectrogramError::NonPowerOfTwoSize(500)));
    }

    #[test]
    fn rejects_size_one() {
        assert!(FftPlan::build(1, 44100, WindowShape::Hann, None).is_err());
    }

    #[test]
    fn rejects_segment_of_wrong_length() {
        let plan = FftPlan::build(64, 44100, WindowShape::Hann, None).unwrap();
        let err = plan.transform(&[0.0; 63]).unwrap_err();
        assert!(matches!(
            err,
            SpectrogramError::SegmentSizeMismatch { size: 64, len: 63 }
        ));
    }

    #[test]
    fn sine_at_bin_eight_peaks_at_bin_eight() {
        // Amplitude-1 sine completing exactly 8 cycles in 512 samples. With a
        // rectangular window the bin magnitude is exact: 2/N * N/2 = 1.
        let plan = FftPlan::build(512, 44100, WindowShape::Rectangular, None).unwrap();
        let spectrum = plan.transform(&sine(8.0, 512)).unwrap();

        assert_eq!(spectrum.bins.len(), 256);
        assert_eq!(spectrum.peak_bin, 8);
        assert!(
            (spectrum.peak - 1.0).abs() < 1e-3,
            "peak = {}",
            spectrum.peak
        );
    }

    #[test]
    fn hann_window_halves_the_peak() {
        // Hann coherent gain is 0.5.
        let plan = FftPlan::build(512, 44100, WindowShape::Hann, None).unwrap();
        let spectrum = plan.transform(&sine(8.0, 512)).unwrap();

        assert_eq!(spectrum.peak_bin, 8);
        assert!(
            (spectrum.peak - 0.5).abs() < 0.05,
            "peak = {}",
            spectrum.peak
        );
    }

    #[test]
    fn transform_is_repeatable() {
        let plan = FftPlan::build(128, 8000, WindowShape::Hamming, None).unwrap();
        let segment = sine(3.0, 128);
        let a = plan.transform(&segment).unwrap();
        let b = plan.transform(&segment).unwrap();
        assert_eq!(a.bins, b.bins);
        assert_eq!(a.peak_bin, b.peak_bin);
    }

    #[test]
    fn bin_resolution_is_rate_over_size() {
        let plan = FftPlan::build(512, 44100, WindowShape::Hann, None).unwrap();
        assert!((plan.bin_resolution() - 44100.0 / 512.0).abs() < 1e-3);
    }

    #[test]
    fn cache_shares_plans_with_equal_parameters() {
        let mut cache = PlanCache::default();
        let a = cache
            .get_or_build(256, 44100, WindowShape::Hann, None)
            .unwrap();
        let b = cache
            .get_or_build(256, 44100, WindowShape::Hann, None)
            .unwrap();
        let c = cache
            .get_or_build(256, 44100, WindowShape::Gauss, Some(0.3))
            .unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
