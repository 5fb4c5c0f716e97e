use serde::{Deserialize, Serialize};

use crate::config::ForagerConfig;

/// `1 / (1 + exp(-slope * x + bias))`
pub(crate) fn logistic(x: f64, slope: f64, bias: f64) -> f64 {
    1.0 / (1.0 + (-slope * x + bias).exp())
}

/// Odors with learnable associations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Odor {
    Hermi,
    Flab,
}

impl Odor {
    pub const ALL: [Odor; 2] = [Odor::Hermi, Odor::Flab];

    fn index(self) -> usize {
        match self {
            Self::Hermi => 0,
            Self::Flab => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pathway {
    /// Driven by R+; learned appetitive value.
    Positive,
    /// Driven by R-; learned aversive value.
    Negative,
}

impl Pathway {
    pub const ALL: [Pathway; 2] = [Pathway::Positive, Pathway::Negative];

    fn index(self) -> usize {
        match self {
            Self::Positive => 0,
            Self::Negative => 1,
        }
    }
}

/// Learned state of one (odor, pathway) pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Association {
    /// Association strength.
    pub strength: f64,
    /// Dynamic floor for `strength`.
    pub baseline: f64,
    /// Synaptic weight, `sigmoid(10 * strength - 8)`.
    pub weight: f64,
    /// Latched once `weight` crosses the saturation threshold.
    pub saturated: bool,
}

impl Default for Association {
    fn default() -> Self {
        Self {
            strength: 0.0,
            baseline: 0.0,
            weight: weight_of(0.0),
            saturated: false,
        }
    }
}

fn weight_of(strength: f64) -> f64 {
    logistic(strength, 10.0, 8.0)
}

/// Activations of the three reinforcement neurons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementNeurons {
    pub positive: f64,
    pub negative: f64,
    pub non_reward: f64,
}

#[derive(Clone, Copy, Debug)]
struct LearningParams {
    learning_rate: f64,
    forgetting_rate: f64,
    saturation_threshold: f64,
    cs_decay_early: f64,
    cs_decay_late: f64,
    reward_input_decay: f64,
    lateral_inhibition: f64,
    nr_spontaneous: f64,
    nr_inhibition: f64,
}

#[derive(Clone, Debug)]
pub struct LearningCircuit {
    params: LearningParams,
    cs: [f64; 2],
    reward_input: [f64; 2],
    neurons: ReinforcementNeurons,
    associations: [[Association; 2]; 2],
}

impl LearningCircuit {
    pub fn new(config: &ForagerConfig) -> Self {
        Self {
            params: LearningParams {
                learning_rate: config.learning_rate,
                forgetting_rate: config.forgetting_rate,
                saturation_threshold: config.saturation_threshold,
                cs_decay_early: config.cs_decay_early,
                cs_decay_late: config.cs_decay_late,
                reward_input_decay: config.reward_input_decay,
                lateral_inhibition: config.lateral_inhibition,
                nr_spontaneous: config.nr_spontaneous,
                nr_inhibition: config.nr_inhibition,
            },
            cs: [0.0; 2],
            reward_input: [0.0; 2],
            neurons: ReinforcementNeurons::default(),
            associations: [[Association::default(); 2]; 2],
        }
    }

    /// Add reinforcement to a pathway's reward input.
    pub fn reinforce(&mut self, pathway: Pathway, magnitude: f64) {
        self.reward_input[pathway.index()] += magnitude;
    }

    /// Advance one tick with the perceived (bilateral) odor levels, indexed by [`Odor`].
    ///
    /// Returns the pathways that latched saturation during this update.
    pub fn update(&mut self, sensed: [f64; 2]) -> Vec<(Odor, Pathway)> {
        let p = self.params;

        for (trace, &value) in self.cs.iter_mut().zip(&sensed) {
            if value > 0.0 {
                *trace = value;
            }
            *trace *= p.cs_decay_early;
        }

        let prev = self.neurons;
        let drive = |pathway: Pathway| -> f64 {
            Odor::ALL
                .iter()
                .map(|&o| self.association(o, pathway).weight * self.cs[o.index()])
                .sum()
        };
        let positive = logistic(
            drive(Pathway::Positive) + self.reward_input[0] - p.lateral_inhibition * prev.negative,
            10.0,
            8.0,
        );
        let negative = logistic(
            drive(Pathway::Negative) + self.reward_input[1] - p.lateral_inhibition * prev.positive,
            10.0,
            8.0,
        );
        let non_reward = logistic(
            p.nr_spontaneous + self.cs[0] + self.cs[1] - p.nr_inhibition * prev.positive,
            4.0,
            7.0,
        );
        self.neurons = ReinforcementNeurons {
            positive,
            negative,
            non_reward,
        };

        let mut latched = Vec::new();
        for odor in Odor::ALL {
            let cs = self.cs[odor.index()];
            for pathway in Pathway::ALL {
                let (activation, competing) = match pathway {
                    Pathway::Positive => (positive, negative),
                    Pathway::Negative => (negative, positive),
                };
                let assoc = &mut self.associations[odor.index()][pathway.index()];
                let delta = p.learning_rate * cs * activation;
                assoc.strength += (1.0 - assoc.weight) * delta;
                assoc.strength -= p.forgetting_rate;

                let sat = if assoc.saturated { 1.0 } else { 0.0 };
                assoc.baseline = sat * (0.7 - 0.5 * logistic(competing, 5.0, 4.0));
                assoc.strength = assoc.strength.max(assoc.baseline);
                assoc.weight = weight_of(assoc.strength);

                if !assoc.saturated && assoc.weight > p.saturation_threshold {
                    assoc.saturated = true;
                    latched.push((odor, pathway));
                }
            }
        }

        for trace in &mut self.cs {
            *trace *= p.cs_decay_late;
        }
        for input in &mut self.reward_input {
            *input *= p.reward_input_decay;
        }
        latched
    }

    /// Forget everything learned about one odor.
    pub fn reset_odor(&mut self, odor: Odor) {
        self.cs[odor.index()] = 0.0;
        self.associations[odor.index()] = [Association::default(); 2];
    }

    pub fn association(&self, odor: Odor, pathway: Pathway) -> Association {
        self.associations[odor.index()][pathway.index()]
    }

    pub fn weight(&self, odor: Odor, pathway: Pathway) -> f64 {
        self.association(odor, pathway).weight
    }

    pub fn neurons(&self) -> ReinforcementNeurons {
        self.neurons
    }

    pub fn cs_trace(&self, odor: Odor) -> f64 {
        self.cs[odor.index()]
    }

    pub fn reward_input(&self, pathway: Pathway) -> f64 {
        self.reward_input[pathway.index()]
    }
}
