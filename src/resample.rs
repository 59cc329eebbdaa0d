//! FFT-based resampling to an exact output length.
//!
//! This is the classic frequency-domain method: forward FFT, keep (or
//! zero-pad) the low-frequency bins, inverse FFT, rescale. Unlike a
//! streaming polyphase resampler it produces exactly the requested number
//! of output samples, which the converters rely on.

use rustfft::{num_complex::Complex, FftPlanner};

/// Output length when resampling `len` samples from `source_fs` to
/// `target_fs`: floor(len * target_fs / source_fs).
pub fn resampled_len(len: usize, source_fs: f64, target_fs: f64) -> usize {
    (len as f64 * target_fs / source_fs).floor() as usize
}

/// Resample `signal` to exactly `num` output samples.
///
/// Spectrum handling matches the textbook treatment: the retained half
/// spectra keep min(num, len) bins, and the Nyquist bin is folded (on
/// downsampling) or split (on upsampling) when that count is even.
pub fn resample_to(signal: &[f32], num: usize) -> Vec<f32> {
    let nx = signal.len();
    if num == 0 || nx == 0 {
        return Vec::new();
    }
    if num == nx {
        return signal.to_vec();
    }

    let mut planner = FftPlanner::<f64>::new();

    let mut spectrum: Vec<Complex<f64>> = signal
        .iter()
        .map(|&s| Complex::new(s as f64, 0.0))
        .collect();
    planner.plan_fft_forward(nx).process(&mut spectrum);

    let mut out_spectrum = vec![Complex::new(0.0, 0.0); num];
    let n = nx.min(num);
    let nyq = n / 2 + 1;

    // Positive frequencies (and the Nyquist bin when n is even).
    out_spectrum[..nyq].copy_from_slice(&spectrum[..nyq]);
    // Negative frequencies.
    if n > 2 {
        let tail = n - nyq;
        out_spectrum[num - tail..].copy_from_slice(&spectrum[nx - tail..]);
    }
    if n % 2 == 0 {
        if num < nx {
            // Downsampling: fold the conjugate Nyquist bin into the kept one.
            let folded = spectrum[nx - n / 2];
            out_spectrum[num - n / 2] += folded;
        } else {
            // Upsampling: split the Nyquist bin across +/- Nyquist.
            out_spectrum[n / 2] *= 0.5;
            let half = out_spectrum[n / 2];
            out_spectrum[num - n / 2] = half;
        }
    }

    planner.plan_fft_inverse(num).process(&mut out_spectrum);

    // Inverse FFT is unnormalized (1/num), and amplitude scales by num/nx;
    // together that is a single 1/nx factor.
    let scale = 1.0 / nx as f64;
    out_spectrum.iter().map(|c| (c.re * scale) as f32).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resampled_len_floors() {
        assert_eq!(200, resampled_len(100, 22050.0, 44100.0));
        assert_eq!(50, resampled_len(100, 44100.0, 22050.0));
        assert_eq!(36, resampled_len(100, 44100.0, 16000.0));
        assert_eq!(0, resampled_len(0, 44100.0, 16000.0));
    }

    #[test]
    fn constant_signal_survives_upsampling() {
        let value = 100.0 / 32768.0;
        let signal = vec![value; 100];
        let out = resample_to(&signal, 200);
        assert_eq!(200, out.len());
        for &s in &out {
            assert!((s - value).abs() < 1e-6, "expected {value}, got {s}");
        }
    }

    #[test]
    fn constant_signal_survives_downsampling() {
        let signal = vec![0.25f32; 200];
        let out = resample_to(&signal, 73);
        assert_eq!(73, out.len());
        for &s in &out {
            assert!((s - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn identity_when_lengths_match() {
        let signal: Vec<f32> = (0..64).map(|i| (i as f32 / 64.0).sin()).collect();
        assert_eq!(signal, resample_to(&signal, 64));
    }

    #[test]
    fn sine_tone_is_preserved_by_upsampling() {
        // A 4-cycle sine over 64 samples is well below Nyquist at both rates,
        // so doubling the rate reproduces the same tone at 128 samples.
        let n = 64;
        let signal: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f64::consts::PI * 4.0 * i as f64 / n as f64).sin() as f32)
            .collect();
        let out = resample_to(&signal, 2 * n);
        assert_eq!(2 * n, out.len());
        for (i, &s) in out.iter().enumerate() {
            let expected =
                (2.0 * std::f64::consts::PI * 4.0 * i as f64 / (2 * n) as f64).sin() as f32;
            assert!((s - expected).abs() < 1e-5, "sample {i}: {s} vs {expected}");
        }
    }

    #[test]
    fn empty_requests_yield_empty_output() {
        assert!(resample_to(&[], 10).is_empty());
        assert!(resample_to(&[1.0, 2.0], 0).is_empty());
    }
}
