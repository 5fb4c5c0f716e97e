pub mod body;
pub mod config;
pub mod constants;
pub mod encounter;
pub mod field;
pub mod forager;
pub mod habituation;
pub mod kinematics;
pub mod learning;
pub mod metrics;
pub mod motivation;
pub mod nociception;
pub mod prey;
pub mod rng;
pub mod sensor;
pub mod spatial;
pub mod world;

pub use config::{ForagerConfig, ScheduleOrder, SensorLayout, SimConfig, SimConfigError};
pub use constants::{MAX_WORLD_SIZE, ODOR_CHANNELS};
pub use encounter::Encounter;
pub use field::{ChemicalField, FieldError, FieldSampler};
pub use forager::{Forager, StepOutcome};
pub use learning::{Odor, Pathway};
pub use metrics::{EncounterCounters, ForagerSnapshot, TickSummary};
pub use prey::PreyKind;
pub use world::{World, WorldInitError};
