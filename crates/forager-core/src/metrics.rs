use serde::{Deserialize, Serialize};

use crate::learning::{Association, ReinforcementNeurons};
use crate::nociception::PainReading;

/// Per-kind capture tallies and social contact counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterCounters {
    pub hermi: u32,
    pub flab: u32,
    pub fauxflab: u32,
    pub bites_given: u32,
    pub bites_received: u32,
}

/// Learned state for both pathways of one odor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OdorAssociations {
    pub cs_trace: f64,
    pub positive: Association,
    pub negative: Association,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForagerSnapshot {
    pub id: usize,
    pub position: [f64; 2],
    pub heading_deg: f64,
    pub size: f64,
    pub nutrition: f64,
    pub satiation: f64,
    pub incentive: f64,
    pub reward_positive: f64,
    pub reward_negative: f64,
    pub appetitive_state: f64,
    pub switch: f64,
    pub somatic_map: f64,
    pub turn_angle: f64,
    /// Receptor pain summed per body side.
    pub pain: PainReading,
    /// Processed pain level.
    pub pain_level: f64,
    pub neurons: ReinforcementNeurons,
    pub hermi: OdorAssociations,
    pub flab: OdorAssociations,
    pub habituation_output: f64,
    pub habituation_baseline: f64,
    pub habituation_gain: f64,
    pub proboscis_phase: u8,
    pub encounter_cooldown: u32,
    pub is_biting: bool,
    pub counters: EncounterCounters,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickSummary {
    pub tick: u64,
    /// Total odor mass per channel.
    pub field_totals: Vec<f64>,
    pub foragers: Vec<ForagerSnapshot>,
}

impl TickSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
