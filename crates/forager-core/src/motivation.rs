use serde::{Deserialize, Serialize};

use crate::config::ForagerConfig;
use crate::constants::{CH_BETAINE, CH_CONSPECIFIC, CH_FLAB, CH_HERMI, ODOR_CHANNELS};
use crate::learning::logistic;
use crate::nociception::PainReading;
use crate::sensor::SensorReading;

const SOMATIC_CHANNELS: usize = 4;

/// Learned synaptic weights read by the motivation engine.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LearnedWeights {
    pub hermi_positive: f64,
    pub flab_positive: f64,
    pub hermi_negative: f64,
    pub flab_negative: f64,
    /// R+ activation from the previous tick.
    pub prior_reward: f64,
}

/// Everything the engine reads in one tick.
#[derive(Clone, Copy, Debug)]
pub struct MotivationInput<'a> {
    pub reading: &'a SensorReading,
    pub pain: PainReading,
    pub learned: LearnedWeights,
    /// Habituation gain `W3`, scales the conspecific channel.
    pub habituation_gain: f64,
    /// `max(M - M0, 0)` from the habituation circuit.
    pub arousal: f64,
}

#[derive(Clone, Copy, Debug)]
struct MotivationParams {
    nutrition_decay: f64,
    spontaneous_pain: f64,
    switch_threshold: f64,
    turn_scale: f64,
}

/// Highest computed satiation; large nutrition would otherwise round to exactly 1.
const SATIATION_CEILING: f64 = 1.0 - f64::EPSILON;

/// Satiation as a logistic-squared function of nutrition, kept inside `(0, 1)`.
pub fn satiation_of(nutrition: f64) -> f64 {
    let s = 1.0 + 0.7 * (-4.0 * nutrition + 2.0).exp();
    (1.0 / (s * s)).min(SATIATION_CEILING)
}

/// Approach/avoid switch in `[-1, 1]`, positive for approach.
pub fn switch_of(appetitive_state: f64, threshold: f64) -> f64 {
    2.0 * logistic(appetitive_state - threshold, 100.0, 0.0) - 1.0
}

/// Signed left/right steering drive; positive means the favourable side is on the left.
///
/// Odor channels attract toward the side their relative dominance favours,
/// the pain channel repels.
pub fn somatic_map(
    left: [f64; SOMATIC_CHANNELS],
    right: [f64; SOMATIC_CHANNELS],
    processed_pain: f64,
) -> f64 {
    let senses: [f64; SOMATIC_CHANNELS] = std::array::from_fn(|i| (left[i] + right[i]) / 2.0);
    let total: f64 = senses.iter().sum();
    let pain_idx = SOMATIC_CHANNELS - 1;
    (0..SOMATIC_CHANNELS)
        .map(|i| {
            let diff = left[i] - right[i];
            if i == pain_idx {
                -diff * logistic(processed_pain, 50.0, 0.0)
            } else {
                diff * logistic(2.0 * senses[i] - total, 50.0, 0.0)
            }
        })
        .sum()
}

#[derive(Clone, Debug)]
pub struct MotivationEngine {
    params: MotivationParams,
    nutrition: f64,
    pinned_satiation: Option<f64>,
    satiation: f64,
    pain: f64,
    pain_switch: f64,
    reward_positive: f64,
    reward_negative: f64,
    incentive: f64,
    appetitive_state: f64,
    switch: f64,
    somatic_map: f64,
    turn_angle: f64,
}

impl MotivationEngine {
    pub fn new(config: &ForagerConfig) -> Self {
        let satiation = config
            .pinned_satiation
            .unwrap_or_else(|| satiation_of(config.initial_nutrition));
        Self {
            params: MotivationParams {
                nutrition_decay: config.nutrition_decay,
                spontaneous_pain: config.spontaneous_pain,
                switch_threshold: config.switch_threshold,
                turn_scale: config.turn_scale,
            },
            nutrition: config.initial_nutrition,
            pinned_satiation: config.pinned_satiation,
            satiation,
            pain: 0.0,
            pain_switch: 0.0,
            reward_positive: 0.0,
            reward_negative: 0.0,
            incentive: 0.0,
            appetitive_state: 0.0,
            switch: 0.0,
            somatic_map: 0.0,
            turn_angle: 0.0,
        }
    }

    pub fn feed(&mut self, amount: f64) {
        self.nutrition += amount;
    }

    pub fn set_pinned_satiation(&mut self, pinned: Option<f64>) {
        self.pinned_satiation = pinned;
        self.satiation = self.current_satiation();
    }

    fn current_satiation(&self) -> f64 {
        self.pinned_satiation
            .unwrap_or_else(|| satiation_of(self.nutrition))
    }

    /// Run one tick of the motivational pipeline and return the turn command.
    pub fn update(&mut self, input: &MotivationInput<'_>) -> f64 {
        let p = self.params;
        let reading = input.reading;
        let w = input.learned;

        self.nutrition -= p.nutrition_decay * self.nutrition;
        self.satiation = self.current_satiation();

        let sensed_pain = input.pain.overall();
        self.pain = 10.0 / (1.0 + (-2.0 * (sensed_pain + p.spontaneous_pain) + 10.0).exp());
        self.pain_switch = 1.0 - 2.0 / (1.0 + (-10.0 * (sensed_pain - 0.2)).exp());

        let betaine = reading.bilateral(CH_BETAINE);
        let hermi = reading.bilateral(CH_HERMI);
        let flab = reading.bilateral(CH_FLAB);
        self.reward_positive = betaine
            / (1.0 + 0.05 * w.hermi_positive * hermi - 0.006 / self.satiation)
            + 3.0 * (w.hermi_positive * hermi + w.flab_positive * flab);
        self.reward_negative =
            0.59 * (w.flab_negative * flab + w.hermi_negative * hermi) + 0.5 * sensed_pain;
        self.incentive = self.reward_positive - self.reward_negative;

        self.appetitive_state = 0.01
            + logistic(
                self.incentive
                    - 8.0 * self.satiation
                    - 0.1 * self.pain
                    - 0.1 * self.pain_switch * w.prior_reward
                    + 0.1 * input.arousal,
                1.0,
                0.0,
            )
            + 0.1 * ((self.switch - 1.0) * 0.5);
        self.switch = switch_of(self.appetitive_state, p.switch_threshold);

        let somatic_side = |r: &[f64; ODOR_CHANNELS], pain: f64| {
            [
                r[CH_HERMI],
                r[CH_FLAB],
                r[CH_CONSPECIFIC] * input.habituation_gain,
                pain,
            ]
        };
        self.somatic_map = somatic_map(
            somatic_side(&reading.left, input.pain.left),
            somatic_side(&reading.right, input.pain.right),
            self.pain,
        );
        self.turn_angle =
            self.switch * p.turn_scale * (logistic(self.somatic_map, 3.0, 0.0) - 0.5);
        self.turn_angle
    }

    pub fn nutrition(&self) -> f64 {
        self.nutrition
    }

    pub fn satiation(&self) -> f64 {
        self.satiation
    }

    /// Processed pain level.
    pub fn pain(&self) -> f64 {
        self.pain
    }

    pub fn pain_switch(&self) -> f64 {
        self.pain_switch
    }

    pub fn reward_positive(&self) -> f64 {
        self.reward_positive
    }

    pub fn reward_negative(&self) -> f64 {
        self.reward_negative
    }

    pub fn incentive(&self) -> f64 {
        self.incentive
    }

    pub fn appetitive_state(&self) -> f64 {
        self.appetitive_state
    }

    pub fn switch(&self) -> f64 {
        self.switch
    }

    pub fn somatic_map(&self) -> f64 {
        self.somatic_map
    }

    pub fn turn_angle(&self) -> f64 {
        self.turn_angle
    }
}

/// Level-triggered feeding organ: phase 0 is retracted, 1..=19 cycles while extended.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proboscis {
    phase: u8,
}

impl Proboscis {
    pub const CYCLE: u8 = 19;

    pub fn update(&mut self, extend: bool) {
        self.phase = if extend {
            self.phase % Self::CYCLE + 1
        } else {
            0
        };
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn is_extended(&self) -> bool {
        self.phase > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn engine() -> MotivationEngine {
        MotivationEngine::new(&ForagerConfig::default())
    }

    fn input(reading: &SensorReading) -> MotivationInput<'_> {
        MotivationInput {
            reading,
            pain: PainReading::default(),
            learned: LearnedWeights::default(),
            habituation_gain: 1.0,
            arousal: 0.0,
        }
    }

    #[test]
    fn silent_world_gives_zero_turn() {
        let mut m = engine();
        let reading = SensorReading::default();
        let turn = m.update(&input(&reading));
        assert_eq!(m.somatic_map(), 0.0);
        assert_eq!(turn, 0.0);
    }

    #[test]
    fn betaine_switches_to_approach_and_turns_toward_odor() {
        let mut m = engine();
        let reading = SensorReading {
            left: [6.0, 6.0, 0.0, 0.0],
            right: [5.0, 5.0, 0.0, 0.0],
        };
        let turn = m.update(&input(&reading));
        assert!(m.switch() > 0.99);
        assert!(m.somatic_map() > 0.0);
        assert!(turn > 0.0);
    }

    #[test]
    fn avoiding_forager_turns_away() {
        let mut m = engine();
        m.feed(10.0);
        let reading = SensorReading {
            left: [0.0, 6.0, 0.0, 0.0],
            right: [0.0, 5.0, 0.0, 0.0],
        };
        let turn = m.update(&input(&reading));
        assert!(m.satiation() > 0.99);
        assert!(m.satiation() < 1.0);
        assert!(m.switch() < -0.99);
        assert!(turn < 0.0);
    }

    #[test]
    fn pinned_satiation_overrides_nutrition() {
        let config = ForagerConfig {
            pinned_satiation: Some(1.0),
            ..ForagerConfig::default()
        };
        let mut m = MotivationEngine::new(&config);
        let reading = SensorReading::default();
        for _ in 0..20 {
            m.update(&input(&reading));
            m.feed(0.3);
            assert_eq!(m.satiation(), 1.0);
        }
        m.set_pinned_satiation(None);
        assert!(m.satiation() < 1.0);
    }

    #[test]
    fn nutrition_decays_each_tick() {
        let mut m = engine();
        let reading = SensorReading::default();
        m.update(&input(&reading));
        assert!((m.nutrition() - 0.5 * 0.995).abs() < 1e-12);
    }

    #[test]
    fn pain_on_one_side_pushes_somatic_map_away() {
        let left = [0.0, 0.0, 0.0, 3.0];
        let right = [0.0; 4];
        assert!(somatic_map(left, right, 1.0) < 0.0);
        assert!(somatic_map(right, left, 1.0) > 0.0);
    }

    #[test]
    fn hysteresis_holds_avoidance_near_threshold() {
        // Just above threshold a neutral switch would approach, a prior avoid does not.
        let state = 0.25;
        assert!(switch_of(state, 0.245) > 0.0);
        assert!(switch_of(state + 0.1 * ((-1.0 - 1.0) * 0.5), 0.245) < 0.0);
    }

    #[test]
    fn previous_switch_decides_a_near_threshold_tick() {
        let config = ForagerConfig {
            pinned_satiation: Some(1.0),
            ..ForagerConfig::default()
        };
        let strong = SensorReading {
            left: [10.0, 0.0, 0.0, 0.0],
            right: [10.0, 0.0, 0.0, 0.0],
        };
        let silent = SensorReading::default();
        let marginal = SensorReading {
            left: [7.0, 0.0, 0.0, 0.0],
            right: [7.0, 0.0, 0.0, 0.0],
        };

        let mut approaching = MotivationEngine::new(&config);
        approaching.update(&input(&strong));
        assert!(approaching.switch() > 0.99);
        approaching.update(&input(&marginal));

        let mut avoiding = MotivationEngine::new(&config);
        avoiding.update(&input(&silent));
        assert!(avoiding.switch() < -0.99);
        avoiding.update(&input(&marginal));

        assert_eq!(approaching.incentive(), avoiding.incentive());
        assert!(approaching.appetitive_state() - avoiding.appetitive_state() > 0.09);
        assert!(approaching.switch() > 0.9);
        assert!(avoiding.switch() < -0.9);
    }

    #[test]
    fn proboscis_cycles_while_triggered() {
        let mut p = Proboscis::default();
        assert!(!p.is_extended());
        for expected in 1..=19 {
            p.update(true);
            assert_eq!(p.phase(), expected);
        }
        p.update(true);
        assert_eq!(p.phase(), 1);
        p.update(false);
        assert_eq!(p.phase(), 0);
    }

    proptest! {
        #[test]
        fn satiation_is_open_unit(nutrition in 0.0f64..1e6) {
            let s = satiation_of(nutrition);
            prop_assert!(s > 0.0 && s < 1.0);
        }

        #[test]
        fn switch_is_bounded(state in -100.0f64..100.0) {
            let s = switch_of(state, 0.245);
            prop_assert!((-1.0..=1.0).contains(&s));
        }
    }
}
