use std::time::Duration;

use rodio::Source;
use rodio::source::SineWave;

use super::spectrum::{SpectrumTap, compute_frame, new_ring};
use super::types::{DB_FLOOR, SPECTRUM_BANDS};

#[test]
fn compute_frame_needs_a_full_window() {
    assert!(compute_frame(&[]).is_none());
    assert!(compute_frame(&vec![0.0; 100]).is_none());
}

#[test]
fn silence_maps_to_the_floor_in_every_band() {
    let frame = compute_frame(&vec![0.0; 8192]).unwrap();
    assert_eq!(frame.magnitudes.len(), SPECTRUM_BANDS);
    assert!(frame.magnitudes.iter().all(|&m| m == DB_FLOOR));
}

#[test]
fn a_tone_raises_its_band_above_the_floor() {
    // A tone centered on FFT bin 20 at 44.1 kHz, interleaved stereo.
    let rate = 44_100.0_f32;
    let freq = 20.0 * rate / 1024.0;
    let mut samples = Vec::with_capacity(16_384);
    for i in 0..8_192 {
        let s = (2.0 * std::f32::consts::PI * freq * i as f32 / rate).sin() * 0.8;
        samples.push(s);
        samples.push(s);
    }

    let frame = compute_frame(&samples).unwrap();
    assert!(frame.magnitudes.iter().any(|&m| m > DB_FLOOR + 5.0));
    // All values stay on the clamped scale.
    assert!(
        frame
            .magnitudes
            .iter()
            .all(|&m| (DB_FLOOR..=0.0).contains(&m))
    );
}

#[test]
fn spectrum_tap_passes_samples_through_and_fills_the_ring() {
    let ring = new_ring();
    let source = SineWave::new(440.0).take_duration(Duration::from_millis(10));
    let mut tap = SpectrumTap::new(source, ring.clone());

    let mut direct = Vec::new();
    for _ in 0..64 {
        direct.push(tap.next().unwrap());
    }

    let captured: Vec<f32> = ring.lock().unwrap().iter().copied().collect();
    assert_eq!(captured, direct);
    assert!(tap.channels() >= 1);
    assert!(tap.sample_rate() > 0);
}
