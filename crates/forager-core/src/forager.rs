use tracing::debug;

use crate::body::{Pose, Positionable};
use crate::config::ForagerConfig;
use crate::constants::{CH_CONSPECIFIC, CH_FLAB, CH_HERMI};
use crate::encounter::Encounter;
use crate::field::FieldSampler;
use crate::habituation::HabituationCircuit;
use crate::kinematics::advance;
use crate::learning::{LearningCircuit, Odor, Pathway};
use crate::metrics::{EncounterCounters, ForagerSnapshot, OdorAssociations};
use crate::motivation::{LearnedWeights, MotivationEngine, MotivationInput, Proboscis};
use crate::nociception::{BodySide, NociceptorArray, PainReading};
use crate::prey::PreyKind;
use crate::sensor::{SensorArray, SensorReading};
use crate::spatial::Torus;

/// Pose after a tick, plus the prey eaten on it (if any).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    pub heading_deg: f64,
    pub position: [f64; 2],
    pub consumed: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct Forager {
    pub id: usize,
    config: ForagerConfig,
    torus: Torus,
    pose: Pose,
    sensors: SensorArray,
    nociceptors: NociceptorArray,
    learning: LearningCircuit,
    habituation: HabituationCircuit,
    motivation: MotivationEngine,
    proboscis: Proboscis,
    reading: SensorReading,
    pain: PainReading,
    encounter_cooldown: u32,
    bite_cooldown: u32,
    is_biting: bool,
    immobilized: bool,
    counters: EncounterCounters,
}

impl Forager {
    pub fn new(
        id: usize,
        config: &ForagerConfig,
        position: [f64; 2],
        heading_deg: f64,
        torus: Torus,
    ) -> Self {
        let pose = Pose {
            position: torus.wrap(position),
            heading_deg,
            size: config.initial_size,
        };
        let mut nociceptors = NociceptorArray::new(
            config.nociceptor_layout,
            config.pain_retention,
            config.pain_range_factor,
        );
        nociceptors.place(&pose, torus);
        Self {
            id,
            config: config.clone(),
            torus,
            pose,
            sensors: SensorArray::from_config(config),
            nociceptors,
            learning: LearningCircuit::new(config),
            habituation: HabituationCircuit::new(config.initial_size),
            motivation: MotivationEngine::new(config),
            proboscis: Proboscis::default(),
            reading: SensorReading::default(),
            pain: PainReading::default(),
            encounter_cooldown: 0,
            bite_cooldown: 0,
            is_biting: false,
            immobilized: false,
            counters: EncounterCounters::default(),
        }
    }

    /// Run the full sense, learn, motivate, move pipeline once.
    pub fn tick<S: FieldSampler + ?Sized>(
        &mut self,
        sampler: &S,
        encounter: Encounter,
    ) -> StepOutcome {
        self.is_biting = false;
        self.bite_cooldown = self.bite_cooldown.saturating_sub(1);

        self.nociceptors.place(&self.pose, self.torus);
        self.reading = self.sensors.read(&self.pose, sampler);
        self.pain = self.nociceptors.read();
        self.nociceptors.decay();

        let consumed = self.consume(encounter);

        let prior_reward = self.learning.neurons().positive;
        let hermi = self.reading.bilateral(CH_HERMI);
        let flab = self.reading.bilateral(CH_FLAB);
        for (odor, pathway) in self.learning.update([hermi, flab]) {
            debug!(forager = self.id, ?odor, ?pathway, "association saturated");
        }

        let conspecific = self.reading.bilateral(CH_CONSPECIFIC);
        let m = self
            .habituation
            .update(conspecific, self.pain.overall(), self.pose.size);
        let threshold = self.config.proboscis_odor_threshold;
        self.proboscis.update(
            hermi > threshold
                || flab > threshold
                || m > self.config.proboscis_habituation_multiple * self.habituation.baseline(),
        );

        let input = MotivationInput {
            reading: &self.reading,
            pain: self.pain,
            learned: LearnedWeights {
                hermi_positive: self.learning.weight(Odor::Hermi, Pathway::Positive),
                flab_positive: self.learning.weight(Odor::Flab, Pathway::Positive),
                hermi_negative: self.learning.weight(Odor::Hermi, Pathway::Negative),
                flab_negative: self.learning.weight(Odor::Flab, Pathway::Negative),
                prior_reward,
            },
            habituation_gain: self.habituation.gain(),
            arousal: self.habituation.arousal(),
        };
        let turn = self.motivation.update(&input);

        self.pose = advance(
            self.pose,
            turn,
            self.config.turn_gain,
            self.config.speed,
            !self.immobilized,
            self.torus,
        );
        self.encounter_cooldown = self.encounter_cooldown.saturating_sub(1);

        StepOutcome {
            heading_deg: self.pose.heading_deg,
            position: self.pose.position,
            consumed,
        }
    }

    /// Eat the captured prey, if any. Returns the eaten prey index.
    ///
    /// Reward input, nutrition and growth apply on every capture; the cooldown
    /// only stops repeated detections from being counted more than once.
    fn consume(&mut self, encounter: Encounter) -> Option<usize> {
        let Encounter::Captured { prey, kind } = encounter else {
            return None;
        };

        let magnitude = self.config.reward_input_magnitude;
        match kind {
            PreyKind::Hermi => self.learning.reinforce(Pathway::Positive, magnitude),
            PreyKind::Flab => self.learning.reinforce(Pathway::Negative, magnitude),
            PreyKind::FauxFlab if self.config.nonnutritive_prey_rewards => {
                self.learning.reinforce(Pathway::Positive, magnitude)
            }
            PreyKind::FauxFlab => {}
        }
        if kind.is_nutritive() {
            self.motivation.feed(self.config.feeding_nutrition);
            self.pose.size = (self.pose.size + self.config.size_growth).min(self.config.max_size);
        }

        if self.encounter_cooldown == 0 {
            let counter = match kind {
                PreyKind::Hermi => &mut self.counters.hermi,
                PreyKind::Flab => &mut self.counters.flab,
                PreyKind::FauxFlab => &mut self.counters.fauxflab,
            };
            *counter += 1;
            let count = *counter;
            self.encounter_cooldown = self.config.encounter_cooldown;
            debug!(forager = self.id, prey, ?kind, count, "prey captured");
        }
        Some(prey)
    }

    /// Whether guarding arousal, cooldown and the biting switch all allow a bite now.
    pub fn ready_to_bite(&self) -> bool {
        self.config.biting
            && self.bite_cooldown == 0
            && self.habituation.output()
                > self.config.guarding_multiple * self.habituation.baseline()
    }

    pub(crate) fn record_bite(&mut self) {
        self.counters.bites_given += 1;
        self.bite_cooldown = self.config.bite_cooldown;
        self.is_biting = true;
    }

    /// Take a bite delivered at `point`.
    pub fn receive_bite(&mut self, point: [f64; 2], magnitude: f64) {
        self.apply_stimulus(point, magnitude);
        self.counters.bites_received += 1;
    }

    /// Inject inverse-distance pain into receptors near `point`; returns how many were hit.
    pub fn apply_stimulus(&mut self, point: [f64; 2], magnitude: f64) -> usize {
        self.nociceptors.place(&self.pose, self.torus);
        self.nociceptors
            .inject(point, magnitude, self.pose.size, self.torus)
    }

    /// Add pain directly to the receptors of one body side.
    pub fn inject_pain(&mut self, side: BodySide, amount: f64) {
        self.nociceptors.inject_side(side, amount);
    }

    pub fn reset_odor(&mut self, odor: Odor) {
        self.learning.reset_odor(odor);
    }

    pub(crate) fn apply_live_config(&mut self, config: &ForagerConfig, immobilized: bool) {
        self.config.biting = config.biting;
        self.config.pinned_satiation = config.pinned_satiation;
        self.motivation.set_pinned_satiation(config.pinned_satiation);
        self.immobilized = immobilized;
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn heading_deg(&self) -> f64 {
        self.pose.heading_deg
    }

    pub fn size(&self) -> f64 {
        self.pose.size
    }

    pub fn reading(&self) -> &SensorReading {
        &self.reading
    }

    pub fn pain(&self) -> PainReading {
        self.pain
    }

    pub fn learning(&self) -> &LearningCircuit {
        &self.learning
    }

    pub fn motivation(&self) -> &MotivationEngine {
        &self.motivation
    }

    pub fn habituation(&self) -> &HabituationCircuit {
        &self.habituation
    }

    pub fn nociceptors(&self) -> &NociceptorArray {
        &self.nociceptors
    }

    pub fn proboscis(&self) -> Proboscis {
        self.proboscis
    }

    pub fn counters(&self) -> EncounterCounters {
        self.counters
    }

    pub fn encounter_cooldown(&self) -> u32 {
        self.encounter_cooldown
    }

    pub fn is_biting(&self) -> bool {
        self.is_biting
    }

    pub fn snapshot(&self) -> ForagerSnapshot {
        let odor = |odor: Odor| OdorAssociations {
            cs_trace: self.learning.cs_trace(odor),
            positive: self.learning.association(odor, Pathway::Positive),
            negative: self.learning.association(odor, Pathway::Negative),
        };
        let m = &self.motivation;
        ForagerSnapshot {
            id: self.id,
            position: self.pose.position,
            heading_deg: self.pose.heading_deg,
            size: self.pose.size,
            nutrition: m.nutrition(),
            satiation: m.satiation(),
            incentive: m.incentive(),
            reward_positive: m.reward_positive(),
            reward_negative: m.reward_negative(),
            appetitive_state: m.appetitive_state(),
            switch: m.switch(),
            somatic_map: m.somatic_map(),
            turn_angle: m.turn_angle(),
            pain: self.pain,
            pain_level: m.pain(),
            neurons: self.learning.neurons(),
            hermi: odor(Odor::Hermi),
            flab: odor(Odor::Flab),
            habituation_output: self.habituation.output(),
            habituation_baseline: self.habituation.baseline(),
            habituation_gain: self.habituation.gain(),
            proboscis_phase: self.proboscis.phase(),
            encounter_cooldown: self.encounter_cooldown,
            is_biting: self.is_biting,
            counters: self.counters,
        }
    }
}

impl Positionable for Forager {
    fn position(&self) -> [f64; 2] {
        self.pose.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ODOR_CHANNELS;

    /// Same concentration everywhere.
    struct Uniform([f64; ODOR_CHANNELS]);

    impl FieldSampler for Uniform {
        fn channels(&self) -> usize {
            ODOR_CHANNELS
        }

        fn sample(&self, _x: f64, _y: f64) -> Vec<f64> {
            self.0.to_vec()
        }
    }

    /// Two identical point sources mirrored about the line y = 100.
    struct TwinSources;

    impl FieldSampler for TwinSources {
        fn channels(&self) -> usize {
            ODOR_CHANNELS
        }

        fn sample(&self, x: f64, y: f64) -> Vec<f64> {
            let source = |sy: f64| {
                let d = ((x - 120.0).powi(2) + (y - sy).powi(2)).sqrt();
                0.5 / (1.0 + d)
            };
            let c = source(80.0) + source(120.0);
            vec![c, c, 0.0, 0.0]
        }
    }

    fn torus() -> Torus {
        Torus::new(600.0, 600.0)
    }

    fn forager(config: &ForagerConfig) -> Forager {
        Forager::new(0, config, [100.0, 100.0], 0.0, torus())
    }

    fn hermi_capture(prey: usize) -> Encounter {
        Encounter::Captured {
            prey,
            kind: PreyKind::Hermi,
        }
    }

    #[test]
    fn symmetric_sources_give_zero_turn() {
        let mut f = forager(&ForagerConfig::default());
        let out = f.tick(&TwinSources, Encounter::None);
        let r = f.reading();
        assert!((r.left[CH_HERMI] - r.right[CH_HERMI]).abs() < 1e-9);
        assert!(f.motivation().somatic_map().abs() < 1e-9);
        assert!(f.motivation().turn_angle().abs() < 1e-9);
        assert!(out.heading_deg.abs() < 1e-6 || (out.heading_deg - 360.0).abs() < 1e-6);
    }

    #[test]
    fn repeated_captures_saturate_the_positive_pathway() {
        let mut f = forager(&ForagerConfig::default());
        let field = Uniform([0.5, 0.5, 0.0, 0.0]);
        let mut prev_strength = f
            .learning()
            .association(Odor::Hermi, Pathway::Positive)
            .strength;
        let mut saturated_at = None;
        let mut captures = 0;
        let mut tick = 0;
        while captures < 10 {
            let encounter = if f.encounter_cooldown() == 0 {
                hermi_capture(tick)
            } else {
                Encounter::None
            };
            let out = f.tick(&field, encounter);
            if out.consumed.is_some() {
                captures += 1;
                let a = f.learning().association(Odor::Hermi, Pathway::Positive);
                assert!(a.strength >= prev_strength - 1e-12);
                prev_strength = a.strength;
            }
            let a = f.learning().association(Odor::Hermi, Pathway::Positive);
            if a.saturated && saturated_at.is_none() {
                saturated_at = Some(tick);
            }
            if saturated_at.is_some() {
                assert!(a.saturated);
            }
            tick += 1;
        }
        assert_eq!(f.counters().hermi, 10);
        let a = f.learning().association(Odor::Hermi, Pathway::Positive);
        assert!(a.weight > 0.83);
        assert!(saturated_at.is_some());
        assert!(f.size() > 16.0);
    }

    #[test]
    fn captures_during_cooldown_feed_but_count_once() {
        let mut f = forager(&ForagerConfig::default());
        let field = Uniform([0.0; ODOR_CHANNELS]);
        assert_eq!(f.tick(&field, hermi_capture(1)).consumed, Some(1));
        assert_eq!(f.counters().hermi, 1);
        assert_eq!(f.encounter_cooldown(), 9);

        for tick in 2..11 {
            let nutrition = f.motivation().nutrition();
            let size = f.size();
            assert_eq!(f.tick(&field, hermi_capture(tick)).consumed, Some(tick));
            assert!(f.motivation().nutrition() > nutrition);
            assert!(f.size() > size);
            assert!(f.learning().reward_input(Pathway::Positive) > 1.5);
            assert_eq!(f.counters().hermi, 1);
        }
        assert_eq!(f.encounter_cooldown(), 0);

        assert_eq!(f.tick(&field, hermi_capture(11)).consumed, Some(11));
        assert_eq!(f.counters().hermi, 2);
    }

    #[test]
    fn pinned_satiation_holds_regardless_of_feeding() {
        let config = ForagerConfig {
            pinned_satiation: Some(1.0),
            ..ForagerConfig::default()
        };
        let mut f = forager(&config);
        let field = Uniform([0.5, 0.5, 0.5, 0.0]);
        for tick in 0..60 {
            f.tick(&field, hermi_capture(tick));
            assert_eq!(f.motivation().satiation(), 1.0);
        }
        assert!(f.counters().hermi > 1);
    }

    #[test]
    fn one_sided_pain_shows_in_the_somatic_map() {
        let mut f = forager(&ForagerConfig::default());
        f.inject_pain(BodySide::Left, 2.0);
        f.tick(&Uniform([0.0; ODOR_CHANNELS]), Encounter::None);
        assert!(f.pain().asymmetry() > 0.0);
        assert!(f.motivation().somatic_map() < 0.0);

        let mut g = forager(&ForagerConfig::default());
        g.inject_pain(BodySide::Right, 2.0);
        g.tick(&Uniform([0.0; ODOR_CHANNELS]), Encounter::None);
        assert!(g.motivation().somatic_map() > 0.0);
    }

    #[test]
    fn nonnutritive_reward_follows_configuration() {
        let faux = Encounter::Captured {
            prey: 0,
            kind: PreyKind::FauxFlab,
        };
        let field = Uniform([0.0; ODOR_CHANNELS]);

        let mut rewarded = forager(&ForagerConfig::default());
        rewarded.tick(&field, faux);
        assert!(rewarded.learning().neurons().positive > 0.99);
        assert!((rewarded.motivation().nutrition() - 0.5 * 0.995).abs() < 1e-12);

        let config = ForagerConfig {
            nonnutritive_prey_rewards: false,
            ..ForagerConfig::default()
        };
        let mut plain = forager(&config);
        plain.tick(&field, faux);
        assert!(plain.learning().neurons().positive < 0.01);
        assert_eq!(plain.counters().fauxflab, 1);
        assert_eq!(plain.size(), 16.0);
    }

    #[test]
    fn immobilized_forager_stays_put() {
        let mut f = forager(&ForagerConfig::default());
        f.apply_live_config(&ForagerConfig::default(), true);
        let out = f.tick(&Uniform([0.5, 0.5, 0.0, 0.0]), Encounter::None);
        assert_eq!(out.position, [100.0, 100.0]);
    }

    #[test]
    fn stimulus_near_the_tail_registers_caudally() {
        let mut f = forager(&ForagerConfig::default());
        let hit = f.apply_stimulus([92.0, 100.0], 1.0);
        assert!(hit > 0);
        f.tick(&Uniform([0.0; ODOR_CHANNELS]), Encounter::None);
        let pain = f.pain();
        assert!(pain.caudal > pain.left.min(pain.right));
    }

    #[test]
    fn strong_conspecific_odor_arms_biting() {
        let field = Uniform([0.0, 0.0, 0.0, 0.5]);
        let mut f = forager(&ForagerConfig::default());
        assert!(!f.ready_to_bite());
        f.tick(&field, Encounter::None);
        assert!(f.habituation().output() > 1.5 * f.habituation().baseline());
        assert!(f.ready_to_bite());
        f.record_bite();
        assert!(f.is_biting());
        assert!(!f.ready_to_bite());
        assert_eq!(f.counters().bites_given, 1);

        let config = ForagerConfig {
            biting: false,
            ..ForagerConfig::default()
        };
        let mut calm = forager(&config);
        calm.tick(&field, Encounter::None);
        assert!(!calm.ready_to_bite());
    }

    #[test]
    fn conspecific_odor_alone_extends_the_proboscis() {
        let crowd = Uniform([0.0, 0.0, 0.0, 0.5]);
        let mut f = forager(&ForagerConfig::default());
        f.tick(&crowd, Encounter::None);
        assert_eq!(f.reading().bilateral(CH_HERMI), 0.0);
        assert!(f.habituation().output() > 1.3 * f.habituation().baseline());
        assert_eq!(f.proboscis().phase(), 1);
        f.tick(&crowd, Encounter::None);
        assert_eq!(f.proboscis().phase(), 2);

        f.tick(&Uniform([0.0; ODOR_CHANNELS]), Encounter::None);
        assert!(!f.proboscis().is_extended());
        assert_eq!(f.proboscis().phase(), 0);
    }

    #[test]
    fn received_bite_hurts_and_counts() {
        let mut f = forager(&ForagerConfig::default());
        f.receive_bite([100.0, 106.0], 5.0);
        assert_eq!(f.counters().bites_received, 1);
        f.tick(&Uniform([0.0; ODOR_CHANNELS]), Encounter::None);
        assert!(f.pain().left > f.pain().right);
    }

    #[test]
    fn snapshot_copies_state() {
        let mut f = forager(&ForagerConfig::default());
        f.tick(&Uniform([0.5, 0.5, 0.0, 0.0]), hermi_capture(4));
        let snap = f.snapshot();
        assert_eq!(snap.counters.hermi, 1);
        assert_eq!(snap.position, f.position());
        assert_eq!(snap.encounter_cooldown, 9);
        assert!(snap.hermi.cs_trace > 0.0);
        assert_eq!(snap.proboscis_phase, 1);
    }
}
