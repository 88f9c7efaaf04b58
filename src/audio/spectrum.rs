//! Spectrum analysis for the visualizer feed.
//!
//! `SpectrumTap` wraps a decoded source and copies samples into a bounded
//! ring as they flow to the mixer; the engine thread periodically runs an
//! FFT over the ring and emits a 64-band magnitude frame. The tap uses
//! `try_lock` so the audio path never blocks on the analysis side.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rodio::Source;
use rustfft::{FftPlanner, num_complex::Complex};

use super::types::{DB_FLOOR, SPECTRUM_BANDS, SpectrumFrame};

pub type SampleRing = Arc<Mutex<VecDeque<f32>>>;

const RING_CAPACITY: usize = 4096;
const FFT_SIZE: usize = 1024;

pub fn new_ring() -> SampleRing {
    Arc::new(Mutex::new(VecDeque::with_capacity(RING_CAPACITY)))
}

/// Source wrapper that captures samples for analysis while passing them
/// through unchanged.
pub struct SpectrumTap<S> {
    inner: S,
    ring: SampleRing,
}

impl<S> SpectrumTap<S>
where
    S: Source<Item = f32>,
{
    pub fn new(inner: S, ring: SampleRing) -> Self {
        Self { inner, ring }
    }
}

impl<S> Iterator for SpectrumTap<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.inner.next()?;
        if let Ok(mut ring) = self.ring.try_lock() {
            if ring.len() >= RING_CAPACITY {
                ring.pop_front();
            }
            ring.push_back(sample);
        }
        Some(sample)
    }
}

impl<S> Source for SpectrumTap<S>
where
    S: Source<Item = f32>,
{
    fn current_span_len(&self) -> Option<usize> {
        self.inner.current_span_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}

/// Snapshot the ring and compute a frame from it. `None` until enough
/// samples accumulated.
pub fn analyze(ring: &SampleRing) -> Option<SpectrumFrame> {
    let samples: Vec<f32> = match ring.lock() {
        Ok(ring) => ring.iter().copied().collect(),
        Err(_) => return None,
    };
    compute_frame(&samples)
}

/// FFT the most recent window of (interleaved) samples into `SPECTRUM_BANDS`
/// dB-like magnitudes clamped to `[DB_FLOOR, 0]`.
pub fn compute_frame(samples: &[f32]) -> Option<SpectrumFrame> {
    let mono = to_mono(samples);
    if mono.len() < FFT_SIZE {
        return None;
    }

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(FFT_SIZE);

    // Hann window over the newest FFT_SIZE samples.
    let start = mono.len() - FFT_SIZE;
    let mut buffer: Vec<Complex<f32>> = mono[start..]
        .iter()
        .enumerate()
        .map(|(i, &s)| {
            let window = 0.5
                * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (FFT_SIZE - 1) as f32).cos());
            Complex::new(s * window, 0.0)
        })
        .collect();

    fft.process(&mut buffer);

    // Positive-frequency bins, grouped evenly into bands; each band is the
    // mean bin magnitude in dB.
    let half = FFT_SIZE / 2;
    let bins_per_band = half / SPECTRUM_BANDS;
    let norm = 1.0 / FFT_SIZE as f32;

    let mut magnitudes = [DB_FLOOR; SPECTRUM_BANDS];
    for (band, value) in magnitudes.iter_mut().enumerate() {
        let start = band * bins_per_band;
        // Per-bin dB is floored before averaging so silent bins cannot
        // drown a real tone within the band.
        let db_sum: f32 = buffer[start..start + bins_per_band]
            .iter()
            .map(|c| (20.0 * (c.norm() * norm).max(1e-10).log10()).max(DB_FLOOR))
            .sum();
        *value = (db_sum / bins_per_band as f32).min(0.0);
    }

    Some(SpectrumFrame { magnitudes })
}

fn to_mono(interleaved: &[f32]) -> Vec<f32> {
    if interleaved.len() < 2 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(2)
        .map(|ch| (ch[0] + ch.get(1).copied().unwrap_or(ch[0])) * 0.5)
        .collect()
}
