use super::{clamp, round2};
use crate::model::{Device, EfficiencyData, EfficiencyFactors};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::{HashMap, VecDeque};

/// Score the next sample starts from when the history is empty
pub const DEFAULT_SCORE: f64 = 75.0;

/// Fraction of a device's range used as the step size
const VARIANCE_FRACTION: f64 = 0.1;

/// Period divisor of the sine drift term, in milliseconds
const DRIFT_PERIOD_MS: f64 = 10_000.0;

const EFFICIENCY_JITTER: f64 = 2.5;
const SCORE_JITTER: f64 = 1.5;

/// Next reading for a device: previous value plus a slow sine drift plus noise,
/// clamped to the device bounds and rounded to two decimals
pub fn next_reading<R: Rng + ?Sized>(device: &Device, rng: &mut R, now: DateTime<Utc>) -> f64 {
    let variance = (device.max_value - device.min_value) * VARIANCE_FRACTION;
    let drift = (now.timestamp_millis() as f64 / DRIFT_PERIOD_MS).sin() * variance;
    let noise = rng.gen_range(-0.5..=0.5) * variance;

    let next = clamp(
        device.current_value + drift + noise,
        device.min_value,
        device.max_value,
    );
    // Rounding may step past a fractional bound
    clamp(round2(next), device.min_value, device.max_value)
}

/// Advance a single device by one tick
pub fn update_device<R: Rng + ?Sized>(device: &mut Device, rng: &mut R, now: DateTime<Utc>) {
    device.current_value = next_reading(device, rng, now);
    device.efficiency = clamp(
        device.efficiency + rng.gen_range(-EFFICIENCY_JITTER..=EFFICIENCY_JITTER),
        0.0,
        100.0,
    );
    device.last_update = now;
}

/// Advance every device by one tick
pub fn update_devices<R: Rng + ?Sized>(devices: &mut [Device], rng: &mut R, now: DateTime<Utc>) {
    for device in devices.iter_mut() {
        update_device(device, rng, now);
    }
}

/// Build the sample that follows `previous`
///
/// Sub-factors are resampled over the full range and are not derived from the
/// overall score.
pub fn next_efficiency_sample<R: Rng + ?Sized>(
    previous: Option<&EfficiencyData>,
    rng: &mut R,
    now: DateTime<Utc>,
) -> EfficiencyData {
    let last_score = previous.map(|s| s.overall_score).unwrap_or(DEFAULT_SCORE);
    let overall_score = clamp(
        last_score + rng.gen_range(-SCORE_JITTER..=SCORE_JITTER),
        0.0,
        100.0,
    );

    EfficiencyData {
        timestamp: now,
        overall_score,
        device_scores: HashMap::new(),
        factors: EfficiencyFactors {
            uptime: rng.gen_range(0.0..=100.0),
            performance: rng.gen_range(0.0..=100.0),
            energy: rng.gen_range(0.0..=100.0),
            maintenance: rng.gen_range(0.0..=100.0),
        },
    }
}

/// Append to a FIFO window of at most `capacity` items, evicting the oldest
/// first; returns how many items were evicted
pub fn push_bounded<T>(window: &mut VecDeque<T>, item: T, capacity: usize) -> usize {
    let capacity = capacity.max(1);
    let mut evicted = 0;

    while window.len() >= capacity {
        window.pop_front();
        evicted += 1;
    }
    window.push_back(item);

    evicted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::generate_devices;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_device_bounds_hold_over_many_ticks() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut now = Utc::now();
        let mut devices = generate_devices(&mut rng, now, 12);

        for _ in 0..500 {
            now = now + Duration::seconds(3);
            update_devices(&mut devices, &mut rng, now);

            for device in &devices {
                assert!(device.current_value >= device.min_value);
                assert!(device.current_value <= device.max_value);
                assert!(device.efficiency >= 0.0 && device.efficiency <= 100.0);
                assert_eq!(device.last_update, now);
            }
        }
    }

    #[test]
    fn test_reading_rounded_to_two_decimals() {
        let mut rng = StdRng::seed_from_u64(2);
        let now = Utc::now();
        let devices = generate_devices(&mut rng, now, 5);

        for device in &devices {
            let reading = next_reading(device, &mut rng, now);
            let scaled = reading * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_reading_pinned_at_bound_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let now = Utc::now();
        let mut device = generate_devices(&mut rng, now, 1).remove(0);
        device.current_value = device.max_value;

        for _ in 0..100 {
            let reading = next_reading(&device, &mut rng, now);
            assert!(reading <= device.max_value);
            assert!(reading >= device.min_value);
        }
    }

    #[test]
    fn test_next_sample_defaults_to_75() {
        let mut rng = StdRng::seed_from_u64(4);
        let sample = next_efficiency_sample(None, &mut rng, Utc::now());

        assert!(sample.overall_score >= DEFAULT_SCORE - SCORE_JITTER);
        assert!(sample.overall_score <= DEFAULT_SCORE + SCORE_JITTER);
        assert!(sample.device_scores.is_empty());
    }

    #[test]
    fn test_next_sample_walks_from_previous() {
        let mut rng = StdRng::seed_from_u64(5);
        let now = Utc::now();
        let mut previous = next_efficiency_sample(None, &mut rng, now);
        previous.overall_score = 99.5;

        for _ in 0..50 {
            let next = next_efficiency_sample(Some(&previous), &mut rng, now);
            assert!(next.overall_score <= 100.0);
            assert!((next.overall_score - previous.overall_score).abs() <= SCORE_JITTER);
            assert!(next.factors.values().iter().all(|v| (0.0..=100.0).contains(v)));
            previous = next;
        }
    }

    #[test]
    fn test_push_bounded_fifo() {
        let mut window = VecDeque::new();

        for i in 0..60 {
            push_bounded(&mut window, i, 50);
            assert!(window.len() <= 50);
        }

        assert_eq!(window.len(), 50);
        assert_eq!(window.front(), Some(&10));
        assert_eq!(window.back(), Some(&59));
        assert!(window.iter().zip(window.iter().skip(1)).all(|(a, b)| a < b));
    }

    #[test]
    fn test_push_bounded_reports_evictions() {
        let mut window: VecDeque<u32> = (0..55).collect();
        // Oversized window (e.g. capacity lowered at runtime) shrinks in one push
        let evicted = push_bounded(&mut window, 99, 50);

        assert_eq!(evicted, 6);
        assert_eq!(window.len(), 50);
        assert_eq!(window.back(), Some(&99));
    }
}
