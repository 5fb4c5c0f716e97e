use serde::{Deserialize, Serialize};

use crate::constants::ODOR_CHANNELS;

/// Order in which the world visits entities inside one tick.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleOrder {
    /// Construction order: prey first, then foragers.
    Fixed,
    /// Reshuffled every tick from the world RNG.
    #[default]
    Shuffled,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SensorLayout {
    /// One sample point per side.
    #[default]
    Bilateral,
    /// Weighted oral-veil and body points per side.
    OralVeil,
}

/// Body-frame placement of a single nociceptor.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct NociceptorSite {
    /// Offset from heading in degrees, counter-clockwise positive (left side).
    pub angle_deg: f64,
    /// Distance from the body centre as a fraction of forager size.
    pub radial_fraction: f64,
}

impl NociceptorSite {
    pub const fn new(angle_deg: f64, radial_fraction: f64) -> Self {
        Self {
            angle_deg,
            radial_fraction,
        }
    }
}

/// Default receptor layout: front-left, left, rear-left, front-right, right,
/// rear-right, tail.
pub const DEFAULT_NOCICEPTOR_LAYOUT: [NociceptorSite; 7] = [
    NociceptorSite::new(30.0, 0.5),
    NociceptorSite::new(90.0, 0.4),
    NociceptorSite::new(150.0, 0.5),
    NociceptorSite::new(-30.0, 0.5),
    NociceptorSite::new(-90.0, 0.4),
    NociceptorSite::new(-150.0, 0.5),
    NociceptorSite::new(180.0, 0.5),
];

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForagerConfig {
    /// Body size at spawn (world units).
    pub initial_size: f64,
    /// Upper bound for growth from feeding.
    pub max_size: f64,
    /// Size added per nutritive capture.
    pub size_growth: f64,
    /// Forward distance covered per tick.
    pub speed: f64,
    /// Degrees of heading change per unit of turn command.
    pub turn_gain: f64,
    /// Amplitude of the turn command produced by the somatic map.
    pub turn_scale: f64,
    pub sensor_layout: SensorLayout,
    /// Sensor distance from the body centre as a fraction of size.
    pub sensor_distance_factor: f64,
    /// Half-angle between heading and each sensor (degrees).
    pub sensor_half_angle_deg: f64,
    /// Association learning rate.
    pub learning_rate: f64,
    /// Constant decrement applied to every association strength each tick.
    pub forgetting_rate: f64,
    /// Weight above which a pathway latches saturated.
    pub saturation_threshold: f64,
    /// CS decay applied before the reward neurons read the trace.
    pub cs_decay_early: f64,
    /// CS decay applied at the end of the learning update.
    pub cs_decay_late: f64,
    /// Reward input added on a reinforcing capture.
    pub reward_input_magnitude: f64,
    /// Per-tick retention of reward inputs.
    pub reward_input_decay: f64,
    /// Weight of R+/R- mutual inhibition.
    pub lateral_inhibition: f64,
    /// Constant drive of the non-reward neuron.
    pub nr_spontaneous: f64,
    /// Weight of the previous R+ activity inhibiting the non-reward neuron.
    pub nr_inhibition: f64,
    pub initial_nutrition: f64,
    /// Fraction of nutrition lost per tick.
    pub nutrition_decay: f64,
    /// Nutrition gained per nutritive capture.
    pub feeding_nutrition: f64,
    /// Fixes satiation to this value for controlled experiments.
    pub pinned_satiation: Option<f64>,
    /// Background drive of the pain readout.
    pub spontaneous_pain: f64,
    /// Appetitive-state level where the approach/avoid switch flips.
    pub switch_threshold: f64,
    /// Ticks after a counted capture in which further captures feed but are not counted.
    pub encounter_cooldown: u32,
    pub capture_half_angle_deg: f64,
    /// Capture reach as a fraction of size (prey radius is added on top).
    pub capture_radius_factor: f64,
    /// Whether eating the non-nutritive mimic drives the positive-reward input.
    pub nonnutritive_prey_rewards: bool,
    pub nociceptor_layout: [NociceptorSite; 7],
    /// Fraction of receptor pain retained each tick.
    pub pain_retention: f64,
    /// Stimulus reach around a receptor as a fraction of size.
    pub pain_range_factor: f64,
    pub biting: bool,
    pub bite_cooldown: u32,
    pub bite_half_angle_deg: f64,
    pub bite_radius_factor: f64,
    pub bite_magnitude: f64,
    /// Bites happen when the habituation output exceeds this multiple of its baseline.
    pub guarding_multiple: f64,
    /// Log-compressed prey odor level that extends the proboscis.
    pub proboscis_odor_threshold: f64,
    pub proboscis_habituation_multiple: f64,
}

impl Default for ForagerConfig {
    fn default() -> Self {
        Self {
            initial_size: 16.0,
            max_size: 30.0,
            size_growth: 0.5,
            speed: 1.0,
            turn_gain: 2.0,
            turn_scale: 6.0,
            sensor_layout: SensorLayout::Bilateral,
            sensor_distance_factor: 0.75,
            sensor_half_angle_deg: 45.0,
            learning_rate: 0.1,
            forgetting_rate: 0.08,
            saturation_threshold: 0.83,
            cs_decay_early: 0.8,
            cs_decay_late: 0.9,
            reward_input_magnitude: 2.0,
            reward_input_decay: 0.8,
            lateral_inhibition: 0.5,
            nr_spontaneous: 1.0,
            nr_inhibition: 4.0,
            initial_nutrition: 0.5,
            nutrition_decay: 0.005,
            feeding_nutrition: 0.3,
            pinned_satiation: None,
            spontaneous_pain: 2.0,
            switch_threshold: 0.245,
            encounter_cooldown: 10,
            capture_half_angle_deg: 45.0,
            capture_radius_factor: 0.4,
            nonnutritive_prey_rewards: true,
            nociceptor_layout: DEFAULT_NOCICEPTOR_LAYOUT,
            pain_retention: 0.2,
            pain_range_factor: 1.0,
            biting: true,
            bite_cooldown: 50,
            bite_half_angle_deg: 45.0,
            bite_radius_factor: 0.75,
            bite_magnitude: 5.0,
            guarding_multiple: 1.5,
            proboscis_odor_threshold: 5.5,
            proboscis_habituation_multiple: 1.3,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible simulation runs.
    pub seed: u64,
    /// Width of the toroidal world in world units.
    pub world_width: f64,
    /// Height of the toroidal world in world units.
    pub world_height: f64,
    /// Odor grid cells along x.
    pub grid_width: usize,
    /// Odor grid cells along y.
    pub grid_height: usize,
    /// Fraction of each cell's mass mixed with its Moore neighbours, per channel.
    pub diffusion_rates: Vec<f64>,
    /// Fraction of odor mass retained after each field step.
    pub evaporation: f64,
    pub schedule: ScheduleOrder,
    pub num_foragers: usize,
    pub hermi_population: usize,
    pub flab_population: usize,
    pub fauxflab_population: usize,
    pub prey_speed: f64,
    pub prey_radius: f64,
    /// Maximum random heading change of prey per tick (degrees).
    pub prey_turn_jitter_deg: f64,
    /// Respawn prey around a per-kind cluster centre instead of uniformly.
    pub clustering: bool,
    pub cluster_radius: f64,
    /// Disables odor emission by every entity.
    pub odor_null: bool,
    /// Freezes forager translation; heading still updates.
    pub immobilize: bool,
    /// Conspecific-channel amount deposited by each forager per tick.
    pub conspecific_odor: f64,
    pub forager: ForagerConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            world_width: 600.0,
            world_height: 600.0,
            grid_width: 200,
            grid_height: 200,
            diffusion_rates: vec![0.5; ODOR_CHANNELS],
            evaporation: 0.95,
            schedule: ScheduleOrder::Shuffled,
            num_foragers: 2,
            hermi_population: 15,
            flab_population: 15,
            fauxflab_population: 15,
            prey_speed: 0.1,
            prey_radius: 4.0,
            prey_turn_jitter_deg: 1.0,
            clustering: false,
            cluster_radius: 10.0,
            odor_null: false,
            immobilize: false,
            conspecific_odor: 0.5,
            forager: ForagerConfig::default(),
        }
    }
}

macro_rules! define_sim_config_error {
    (
        $(
            $variant:ident $( { $($field:ident : $type:ty),* } )? => $fmt:literal $(, $arg:expr)*
        );* $(;)?
    ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum SimConfigError {
            $(
                $variant $( { $($field : $type),* } )?,
            )*
        }

        impl std::fmt::Display for SimConfigError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$variant $( { $($field),* } )? => write!(f, $fmt $(, $arg)*),
                    )*
                }
            }
        }
    };
}

define_sim_config_error! {
    InvalidWorldSize => "world_width and world_height must be positive and finite";
    WorldSizeTooLarge { max: f64, actual: f64 } => "world dimension ({actual}) exceeds supported maximum ({max})";
    InvalidGridSize => "grid_width and grid_height must be positive";
    GridSizeTooLarge { max: usize, actual: usize } => "grid dimension ({actual}) exceeds supported maximum ({max})";
    EmptyChannels => "diffusion_rates must name at least one channel";
    InvalidDiffusionRate { channel: usize } => "diffusion rate for channel {channel} must be finite and within [0,1]";
    InvalidEvaporation => "evaporation must be finite and within [0,1)";
    InvalidNumForagers => "num_foragers must be greater than 0";
    InvalidPreySpeed => "prey_speed must be finite and non-negative";
    InvalidPreyRadius => "prey_radius must be finite and non-negative";
    InvalidPreyTurnJitter => "prey_turn_jitter_deg must be finite and non-negative";
    InvalidClusterRadius => "cluster_radius must be finite and non-negative";
    InvalidConspecificOdor => "conspecific_odor must be finite and non-negative";
    InvalidSize => "initial_size must be positive and not exceed max_size; size_growth must be non-negative";
    InvalidSpeed => "speed must be finite and non-negative";
    InvalidTurnGain => "turn_gain and turn_scale must be finite and non-negative";
    InvalidSensorGeometry => "sensor_distance_factor must be non-negative and sensor_half_angle_deg within [0,180]";
    InvalidLearningRate => "learning_rate must be finite and non-negative";
    InvalidForgettingRate => "forgetting_rate must be finite and non-negative";
    InvalidSaturationThreshold => "saturation_threshold must be within (0,1)";
    InvalidTraceDecay => "cs_decay_early, cs_decay_late and reward_input_decay must be within [0,1]";
    InvalidRewardInput => "reward_input_magnitude must be finite and non-negative";
    InvalidInhibition => "lateral_inhibition, nr_spontaneous and nr_inhibition must be finite and non-negative";
    InvalidNutrition => "initial_nutrition and feeding_nutrition must be finite and non-negative";
    InvalidNutritionDecay => "nutrition_decay must be within [0,1)";
    InvalidPinnedSatiation => "pinned_satiation must be within [0.01,1]";
    InvalidSpontaneousPain => "spontaneous_pain must be finite and non-negative";
    InvalidSwitchThreshold => "switch_threshold must be finite";
    InvalidCaptureGeometry => "capture_half_angle_deg must be within [0,180] and capture_radius_factor non-negative";
    InvalidNociceptorSite { index: usize } => "nociceptor site {index} must have a finite angle and non-negative radial fraction";
    InvalidPainRetention => "pain_retention must be within [0,1)";
    InvalidPainRange => "pain_range_factor must be finite and positive";
    InvalidBiteGeometry => "bite_half_angle_deg must be within [0,180] and bite_radius_factor non-negative";
    InvalidBiteMagnitude => "bite_magnitude must be finite and non-negative";
    InvalidGuardingMultiple => "guarding_multiple must be finite and positive";
    InvalidProboscisThreshold => "proboscis thresholds must be finite and non-negative";
}

impl std::error::Error for SimConfigError {}

fn finite_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

fn half_angle(value: f64) -> bool {
    value.is_finite() && (0.0..=180.0).contains(&value)
}

impl SimConfig {
    pub const MAX_WORLD_SIZE: f64 = crate::constants::MAX_WORLD_SIZE;

    pub const MAX_GRID_SIZE: usize = crate::constants::MAX_GRID_SIZE;

    /// Number of odor channels carried by the field.
    pub fn channel_count(&self) -> usize {
        self.diffusion_rates.len()
    }

    pub fn total_prey(&self) -> usize {
        self.hermi_population + self.flab_population + self.fauxflab_population
    }

    pub fn validate(&self) -> Result<(), SimConfigError> {
        self.validate_world()?;
        self.validate_field()?;
        self.validate_population()?;
        self.forager.validate()?;
        Ok(())
    }

    fn validate_world(&self) -> Result<(), SimConfigError> {
        for size in [self.world_width, self.world_height] {
            if !(size.is_finite() && size > 0.0) {
                return Err(SimConfigError::InvalidWorldSize);
            }
            if size > Self::MAX_WORLD_SIZE {
                return Err(SimConfigError::WorldSizeTooLarge {
                    max: Self::MAX_WORLD_SIZE,
                    actual: size,
                });
            }
        }
        Ok(())
    }

    fn validate_field(&self) -> Result<(), SimConfigError> {
        for cells in [self.grid_width, self.grid_height] {
            if cells == 0 {
                return Err(SimConfigError::InvalidGridSize);
            }
            if cells > Self::MAX_GRID_SIZE {
                return Err(SimConfigError::GridSizeTooLarge {
                    max: Self::MAX_GRID_SIZE,
                    actual: cells,
                });
            }
        }
        if self.diffusion_rates.is_empty() {
            return Err(SimConfigError::EmptyChannels);
        }
        if let Some(channel) = self
            .diffusion_rates
            .iter()
            .position(|&rate| !unit_interval(rate))
        {
            return Err(SimConfigError::InvalidDiffusionRate { channel });
        }
        if !(self.evaporation.is_finite() && (0.0..1.0).contains(&self.evaporation)) {
            return Err(SimConfigError::InvalidEvaporation);
        }
        if !finite_non_negative(self.conspecific_odor) {
            return Err(SimConfigError::InvalidConspecificOdor);
        }
        Ok(())
    }

    fn validate_population(&self) -> Result<(), SimConfigError> {
        if self.num_foragers == 0 {
            return Err(SimConfigError::InvalidNumForagers);
        }
        if !finite_non_negative(self.prey_speed) {
            return Err(SimConfigError::InvalidPreySpeed);
        }
        if !finite_non_negative(self.prey_radius) {
            return Err(SimConfigError::InvalidPreyRadius);
        }
        if !finite_non_negative(self.prey_turn_jitter_deg) {
            return Err(SimConfigError::InvalidPreyTurnJitter);
        }
        if !finite_non_negative(self.cluster_radius) {
            return Err(SimConfigError::InvalidClusterRadius);
        }
        Ok(())
    }
}

impl ForagerConfig {
    pub fn validate(&self) -> Result<(), SimConfigError> {
        self.validate_body()?;
        self.validate_learning()?;
        self.validate_motivation()?;
        self.validate_encounters()?;
        self.validate_nociception()?;
        Ok(())
    }

    fn validate_body(&self) -> Result<(), SimConfigError> {
        if !(self.initial_size.is_finite()
            && self.initial_size > 0.0
            && self.max_size.is_finite()
            && self.initial_size <= self.max_size
            && finite_non_negative(self.size_growth))
        {
            return Err(SimConfigError::InvalidSize);
        }
        if !finite_non_negative(self.speed) {
            return Err(SimConfigError::InvalidSpeed);
        }
        if !(finite_non_negative(self.turn_gain) && finite_non_negative(self.turn_scale)) {
            return Err(SimConfigError::InvalidTurnGain);
        }
        if !(finite_non_negative(self.sensor_distance_factor)
            && half_angle(self.sensor_half_angle_deg))
        {
            return Err(SimConfigError::InvalidSensorGeometry);
        }
        Ok(())
    }

    fn validate_learning(&self) -> Result<(), SimConfigError> {
        if !finite_non_negative(self.learning_rate) {
            return Err(SimConfigError::InvalidLearningRate);
        }
        if !finite_non_negative(self.forgetting_rate) {
            return Err(SimConfigError::InvalidForgettingRate);
        }
        if !(self.saturation_threshold > 0.0 && self.saturation_threshold < 1.0) {
            return Err(SimConfigError::InvalidSaturationThreshold);
        }
        if !(unit_interval(self.cs_decay_early)
            && unit_interval(self.cs_decay_late)
            && unit_interval(self.reward_input_decay))
        {
            return Err(SimConfigError::InvalidTraceDecay);
        }
        if !finite_non_negative(self.reward_input_magnitude) {
            return Err(SimConfigError::InvalidRewardInput);
        }
        if !(finite_non_negative(self.lateral_inhibition)
            && finite_non_negative(self.nr_spontaneous)
            && finite_non_negative(self.nr_inhibition))
        {
            return Err(SimConfigError::InvalidInhibition);
        }
        Ok(())
    }

    fn validate_motivation(&self) -> Result<(), SimConfigError> {
        if !(finite_non_negative(self.initial_nutrition)
            && finite_non_negative(self.feeding_nutrition))
        {
            return Err(SimConfigError::InvalidNutrition);
        }
        if !(self.nutrition_decay.is_finite() && (0.0..1.0).contains(&self.nutrition_decay)) {
            return Err(SimConfigError::InvalidNutritionDecay);
        }
        if let Some(pinned) = self.pinned_satiation {
            if !(pinned.is_finite() && (0.01..=1.0).contains(&pinned)) {
                return Err(SimConfigError::InvalidPinnedSatiation);
            }
        }
        if !finite_non_negative(self.spontaneous_pain) {
            return Err(SimConfigError::InvalidSpontaneousPain);
        }
        if !self.switch_threshold.is_finite() {
            return Err(SimConfigError::InvalidSwitchThreshold);
        }
        if !(finite_non_negative(self.proboscis_odor_threshold)
            && finite_non_negative(self.proboscis_habituation_multiple))
        {
            return Err(SimConfigError::InvalidProboscisThreshold);
        }
        Ok(())
    }

    fn validate_encounters(&self) -> Result<(), SimConfigError> {
        if !(half_angle(self.capture_half_angle_deg)
            && finite_non_negative(self.capture_radius_factor))
        {
            return Err(SimConfigError::InvalidCaptureGeometry);
        }
        if !(half_angle(self.bite_half_angle_deg) && finite_non_negative(self.bite_radius_factor))
        {
            return Err(SimConfigError::InvalidBiteGeometry);
        }
        if !finite_non_negative(self.bite_magnitude) {
            return Err(SimConfigError::InvalidBiteMagnitude);
        }
        if !(self.guarding_multiple.is_finite() && self.guarding_multiple > 0.0) {
            return Err(SimConfigError::InvalidGuardingMultiple);
        }
        Ok(())
    }

    fn validate_nociception(&self) -> Result<(), SimConfigError> {
        if let Some(index) = self
            .nociceptor_layout
            .iter()
            .position(|site| !(site.angle_deg.is_finite() && finite_non_negative(site.radial_fraction)))
        {
            return Err(SimConfigError::InvalidNociceptorSite { index });
        }
        if !(self.pain_retention.is_finite() && (0.0..1.0).contains(&self.pain_retention)) {
            return Err(SimConfigError::InvalidPainRetention);
        }
        if !(self.pain_range_factor.is_finite() && self.pain_range_factor > 0.0) {
            return Err(SimConfigError::InvalidPainRange);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_default() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_invalid_world_size() {
        let config = SimConfig {
            world_width: -1.0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::InvalidWorldSize));

        let config = SimConfig {
            world_height: SimConfig::MAX_WORLD_SIZE + 1.0,
            ..SimConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimConfigError::WorldSizeTooLarge { .. })
        ));
    }

    #[test]
    fn validate_rejects_zero_grid() {
        let config = SimConfig {
            grid_height: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::InvalidGridSize));
    }

    #[test]
    fn validate_rejects_negative_rates() {
        let config = SimConfig {
            diffusion_rates: vec![0.5, -0.1, 0.5, 0.5],
            ..SimConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SimConfigError::InvalidDiffusionRate { channel: 1 })
        );

        let config = SimConfig {
            evaporation: 1.0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::InvalidEvaporation));

        let mut config = SimConfig::default();
        config.forager.forgetting_rate = -0.08;
        assert_eq!(config.validate(), Err(SimConfigError::InvalidForgettingRate));
    }

    #[test]
    fn validate_rejects_empty_channels() {
        let config = SimConfig {
            diffusion_rates: Vec::new(),
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::EmptyChannels));
    }

    #[test]
    fn validate_rejects_out_of_range_pinned_satiation() {
        let mut config = SimConfig::default();
        config.forager.pinned_satiation = Some(0.0);
        assert_eq!(config.validate(), Err(SimConfigError::InvalidPinnedSatiation));
        config.forager.pinned_satiation = Some(1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_nociceptor_site() {
        let mut config = SimConfig::default();
        config.forager.nociceptor_layout[4].radial_fraction = -1.0;
        assert_eq!(
            config.validate(),
            Err(SimConfigError::InvalidNociceptorSite { index: 4 })
        );
    }

    #[test]
    fn validate_rejects_zero_foragers() {
        let config = SimConfig {
            num_foragers: 0,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Err(SimConfigError::InvalidNumForagers));
    }

    #[test]
    fn deserialize_rejects_unknown_schedule() {
        let invalid_json = r#"{ "schedule": "round_robin" }"#;
        let result = serde_json::from_str::<SimConfig>(invalid_json);
        assert!(
            result.is_err(),
            "unknown schedule should fail during deserialization"
        );
    }

    #[test]
    fn partial_config_json_deserializes_with_defaults() {
        let partial_json = r#"{
            "seed": 7,
            "world_width": 300.0,
            "world_height": 300.0,
            "schedule": "fixed",
            "forager": { "pinned_satiation": 0.5 }
        }"#;
        let cfg: SimConfig =
            serde_json::from_str(partial_json).expect("partial config should parse");
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.schedule, ScheduleOrder::Fixed);
        assert_eq!(cfg.grid_width, 200);
        assert_eq!(cfg.diffusion_rates.len(), ODOR_CHANNELS);
        assert_eq!(cfg.forager.pinned_satiation, Some(0.5));
        assert_eq!(cfg.forager.learning_rate, 0.1);
        assert_eq!(cfg.forager.saturation_threshold, 0.83);
        assert!(cfg.forager.nonnutritive_prey_rewards);
        assert_eq!(cfg.forager.nociceptor_layout, DEFAULT_NOCICEPTOR_LAYOUT);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = SimConfigError::InvalidDiffusionRate { channel: 2 };
        assert!(err.to_string().contains("channel 2"));
        let err = SimConfigError::GridSizeTooLarge {
            max: 2048,
            actual: 4000,
        };
        assert!(err.to_string().contains("4000"));
    }
}
