/// Largest valid world dimension (world units). Prevents overflow in spatial index.
pub const MAX_WORLD_SIZE: f64 = 4096.0;

/// Largest valid odor grid dimension (cells per axis).
pub const MAX_GRID_SIZE: usize = 2048;

/// Number of odor channels a forager senses: betaine, hermi, flab, conspecific.
pub const ODOR_CHANNELS: usize = 4;

pub const CH_BETAINE: usize = 0;
pub const CH_HERMI: usize = 1;
pub const CH_FLAB: usize = 2;
pub const CH_CONSPECIFIC: usize = 3;

/// Raw readings at or below this value compress to zero instead of hitting `log10`.
pub const SENSOR_FLOOR: f64 = 1e-7;

/// Offset added to log-compressed readings so that the floor maps near zero.
pub const SENSOR_LOG_OFFSET: f64 = 7.0;

/// Guard term for inverse-distance falloff and divisions by sensed drive.
pub const FALLOFF_EPSILON: f64 = 1e-6;
