use serde::{Deserialize, Serialize};

const SENSORY_WEIGHT: f64 = 1.0;
const MODULATORY_WEIGHT: f64 = 1.0;
const SENSITIZATION_GAIN: f64 = 10.0;
const ADAPTATION_DIVISOR: f64 = 10.0;
const GAIN_MIN: f64 = 0.1;
const GAIN_MAX: f64 = 1.0;
const DRIVE_EPSILON: f64 = 1e-6;

/// Adaptive-gain filter on conspecific odor, sensitized by pain.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HabituationCircuit {
    gain: f64,
    output: f64,
    baseline: f64,
}

impl HabituationCircuit {
    pub fn new(size: f64) -> Self {
        Self {
            gain: GAIN_MAX,
            output: 0.0,
            baseline: size / 4.0,
        }
    }

    /// Process one tick of conspecific odor and pain input, returning the output `M`.
    pub fn update(&mut self, conspecific: f64, pain: f64, size: f64) -> f64 {
        self.baseline = size / 4.0;
        let sensory = SENSORY_WEIGHT * conspecific;
        let modulatory = MODULATORY_WEIGHT * pain;
        self.output = self.gain * sensory;
        let denom = sensory + DRIVE_EPSILON;
        let delta = (self.baseline / denom - self.output / denom
            + SENSITIZATION_GAIN * modulatory)
            / ADAPTATION_DIVISOR;
        self.gain = (self.gain + delta).clamp(GAIN_MIN, GAIN_MAX);
        self.output
    }

    /// Current synaptic gain `W3`.
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Processed odor `M`.
    pub fn output(&self) -> f64 {
        self.output
    }

    /// Size-scaled reference level `M0`.
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Output in excess of the reference level, floored at zero.
    pub fn arousal(&self) -> f64 {
        (self.output - self.baseline).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_conspecific_odor_habituates() {
        let mut h = HabituationCircuit::new(16.0);
        for _ in 0..200 {
            h.update(10.0, 0.0, 16.0);
        }
        assert!(h.gain() < 1.0);
        // M settles near M0 = 4.
        assert!((h.output() - 4.0).abs() < 0.5);
    }

    #[test]
    fn pain_sensitizes() {
        let mut h = HabituationCircuit::new(16.0);
        for _ in 0..200 {
            h.update(10.0, 0.0, 16.0);
        }
        let habituated = h.gain();
        h.update(10.0, 1.0, 16.0);
        assert!(h.gain() > habituated);
    }

    #[test]
    fn gain_stays_clamped() {
        let mut h = HabituationCircuit::new(16.0);
        h.update(0.0, 0.0, 16.0);
        assert_eq!(h.gain(), GAIN_MAX);
        for _ in 0..500 {
            h.update(1e4, 0.0, 16.0);
        }
        assert!(h.gain() >= GAIN_MIN);
        assert!(h.gain() < 0.2);
    }

    #[test]
    fn baseline_tracks_size() {
        let mut h = HabituationCircuit::new(16.0);
        assert_eq!(h.baseline(), 4.0);
        h.update(0.0, 0.0, 20.0);
        assert_eq!(h.baseline(), 5.0);
        assert_eq!(h.arousal(), 0.0);
    }
}
