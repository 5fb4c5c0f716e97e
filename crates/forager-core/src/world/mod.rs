use crate::body::Positionable;
use crate::config::{ScheduleOrder, SimConfig, SimConfigError};
use crate::constants::ODOR_CHANNELS;
use crate::encounter::EncounterResolver;
use crate::field::{ChemicalField, FieldError};
use crate::forager::Forager;
use crate::learning::Odor;
use crate::metrics::TickSummary;
use crate::prey::{Prey, PreyKind, Respawn};
use crate::rng::{create_rng, derive_forager_rng};
use crate::spatial::{self, EntityLocation, EntityRef, Torus};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use rstar::RTree;
use std::{error::Error, fmt};
use tracing::{info, trace};

pub struct World {
    config: SimConfig,
    torus: Torus,
    field: ChemicalField,
    prey: Vec<Prey>,
    foragers: Vec<Forager>,
    resolver: EncounterResolver,
    rng: ChaCha12Rng,
    cluster_centers: [[f64; 2]; 3],
    schedule_buffer: Vec<EntityRef>,
    tick: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldInitError {
    Config(SimConfigError),
    Field(FieldError),
    ChannelCountMismatch { expected: usize, actual: usize },
    GeometryChanged,
    PopulationChanged,
}

impl fmt::Display for WorldInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldInitError::Config(e) => write!(f, "{}", e),
            WorldInitError::Field(e) => write!(f, "{}", e),
            WorldInitError::ChannelCountMismatch { expected, actual } => write!(
                f,
                "diffusion_rates.len() ({actual}) must match the odor channel count ({expected})"
            ),
            WorldInitError::GeometryChanged => {
                write!(f, "world extent and odor grid cannot change on a running world")
            }
            WorldInitError::PopulationChanged => {
                write!(f, "population counts cannot change on a running world")
            }
        }
    }
}

impl From<SimConfigError> for WorldInitError {
    fn from(err: SimConfigError) -> Self {
        WorldInitError::Config(err)
    }
}

impl From<FieldError> for WorldInitError {
    fn from(err: FieldError) -> Self {
        WorldInitError::Field(err)
    }
}

impl Error for WorldInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorldInitError::Config(e) => Some(e),
            WorldInitError::Field(e) => Some(e),
            _ => None,
        }
    }
}

impl World {
    pub fn new(config: SimConfig) -> Result<Self, WorldInitError> {
        config.validate()?;
        if config.channel_count() != ODOR_CHANNELS {
            return Err(WorldInitError::ChannelCountMismatch {
                expected: ODOR_CHANNELS,
                actual: config.channel_count(),
            });
        }
        let field = ChemicalField::new(
            config.grid_width,
            config.grid_height,
            config.world_width,
            config.world_height,
            config.diffusion_rates.clone(),
            config.evaporation,
        )?;
        let torus = Torus::new(config.world_width, config.world_height);
        let mut rng = create_rng(config.seed);

        let cluster_centers = std::array::from_fn(|_| random_point(&mut rng, torus));

        let mut prey = Vec::with_capacity(config.total_prey());
        for kind in PreyKind::ALL {
            for _ in 0..population_of(&config, kind) {
                let mut p = Prey::new(prey.len(), kind, [0.0, 0.0], 0.0, config.prey_radius);
                let policy = respawn_policy(&config, &cluster_centers, kind);
                p.respawn(&mut rng, policy, torus);
                prey.push(p);
            }
        }

        let foragers = (0..config.num_foragers)
            .map(|id| {
                let mut frng = derive_forager_rng(config.seed, id);
                let position = random_point(&mut frng, torus);
                let heading = frng.random_range(0.0..360.0);
                let mut forager = Forager::new(id, &config.forager, position, heading, torus);
                forager.apply_live_config(&config.forager, config.immobilize);
                forager
            })
            .collect::<Vec<_>>();

        info!(
            seed = config.seed,
            foragers = foragers.len(),
            prey = prey.len(),
            grid_width = config.grid_width,
            grid_height = config.grid_height,
            "world initialised"
        );

        Ok(Self {
            resolver: EncounterResolver::new(&config.forager, torus),
            schedule_buffer: Vec::with_capacity(prey.len() + foragers.len()),
            config,
            torus,
            field,
            prey,
            foragers,
            rng,
            cluster_centers,
            tick: 0,
        })
    }

    /// Advance the world by one tick: field update, then every entity once.
    pub fn step(&mut self) {
        self.tick = self.tick.saturating_add(1);
        trace!(tick = self.tick, "step");
        self.step_field_phase();

        let tree = self.build_index();
        self.build_schedule();
        let schedule = std::mem::take(&mut self.schedule_buffer);
        for entity in &schedule {
            match *entity {
                EntityRef::Prey(idx) => self.step_prey(idx),
                EntityRef::Forager(idx) => {
                    self.step_forager(idx, &tree);
                    self.step_bite(idx, &tree);
                }
            }
        }
        self.schedule_buffer = schedule;
    }

    /// Run `ticks` steps and summarise the final state.
    pub fn run(&mut self, ticks: u64) -> TickSummary {
        for _ in 0..ticks {
            self.step();
        }
        self.summary()
    }

    pub fn summary(&self) -> TickSummary {
        TickSummary {
            tick: self.tick,
            field_totals: self.field.totals(),
            foragers: self.foragers.iter().map(Forager::snapshot).collect(),
        }
    }

    /// Update the knobs that may change between ticks.
    ///
    /// Only `schedule`, `odor_null`, `immobilize`, `clustering`, `forager.biting`
    /// and `forager.pinned_satiation` are taken from `config`; world extent, grid,
    /// field rates and population counts must match the running world.
    pub fn set_config(&mut self, config: SimConfig) -> Result<(), WorldInitError> {
        config.validate()?;
        let geometry_same = config.world_width == self.config.world_width
            && config.world_height == self.config.world_height
            && config.grid_width == self.config.grid_width
            && config.grid_height == self.config.grid_height
            && config.diffusion_rates == self.config.diffusion_rates
            && config.evaporation == self.config.evaporation;
        if !geometry_same {
            return Err(WorldInitError::GeometryChanged);
        }
        if PreyKind::ALL
            .iter()
            .any(|&k| population_of(&config, k) != population_of(&self.config, k))
            || config.num_foragers != self.config.num_foragers
        {
            return Err(WorldInitError::PopulationChanged);
        }

        self.config.schedule = config.schedule;
        self.config.odor_null = config.odor_null;
        self.config.immobilize = config.immobilize;
        self.config.clustering = config.clustering;
        self.config.forager.biting = config.forager.biting;
        self.config.forager.pinned_satiation = config.forager.pinned_satiation;
        for forager in &mut self.foragers {
            forager.apply_live_config(&self.config.forager, self.config.immobilize);
        }
        Ok(())
    }

    /// Reset every forager's learned state for one odor.
    pub fn zero_associations(&mut self, odor: Odor) {
        for forager in &mut self.foragers {
            forager.reset_odor(odor);
        }
    }

    /// Poke every forager near `point`; returns the number of receptors hit.
    pub fn apply_stimulus(&mut self, point: [f64; 2], magnitude: f64) -> usize {
        let point = self.torus.wrap(point);
        self.foragers
            .iter_mut()
            .map(|f| f.apply_stimulus(point, magnitude))
            .sum()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn field(&self) -> &ChemicalField {
        &self.field
    }

    pub fn prey(&self) -> &[Prey] {
        &self.prey
    }

    pub fn foragers(&self) -> &[Forager] {
        &self.foragers
    }

    pub fn forager_mut(&mut self, idx: usize) -> Option<&mut Forager> {
        self.foragers.get_mut(idx)
    }

    pub fn torus(&self) -> Torus {
        self.torus
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    fn build_schedule(&mut self) {
        self.schedule_buffer.clear();
        self.schedule_buffer
            .extend((0..self.prey.len()).map(EntityRef::Prey));
        self.schedule_buffer
            .extend((0..self.foragers.len()).map(EntityRef::Forager));
        if self.config.schedule == ScheduleOrder::Shuffled {
            self.schedule_buffer.shuffle(&mut self.rng);
        }
    }

    fn respawn_policy_for(&self, kind: PreyKind) -> Respawn {
        respawn_policy(&self.config, &self.cluster_centers, kind)
    }

    fn build_index(&self) -> RTree<EntityLocation> {
        let locations = self
            .prey
            .iter()
            .enumerate()
            .map(|(i, p)| locate(EntityRef::Prey(i), p))
            .chain(
                self.foragers
                    .iter()
                    .enumerate()
                    .map(|(i, f)| locate(EntityRef::Forager(i), f)),
            )
            .collect();
        spatial::build_index(locations)
    }
}

fn locate<T: Positionable>(entity: EntityRef, item: &T) -> EntityLocation {
    EntityLocation {
        entity,
        position: item.position(),
    }
}

fn population_of(config: &SimConfig, kind: PreyKind) -> usize {
    match kind {
        PreyKind::Hermi => config.hermi_population,
        PreyKind::Flab => config.flab_population,
        PreyKind::FauxFlab => config.fauxflab_population,
    }
}

fn respawn_policy(config: &SimConfig, centers: &[[f64; 2]; 3], kind: PreyKind) -> Respawn {
    if config.clustering {
        Respawn::Cluster {
            center: centers[kind.index()],
            radius: config.cluster_radius,
        }
    } else {
        Respawn::Uniform
    }
}

fn random_point<R: Rng>(rng: &mut R, torus: Torus) -> [f64; 2] {
    [
        rng.random_range(0.0..torus.width),
        rng.random_range(0.0..torus.height),
    ]
}

mod phases;
