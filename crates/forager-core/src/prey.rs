use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::body::Positionable;
use crate::constants::ODOR_CHANNELS;
use crate::spatial::Torus;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreyKind {
    /// Hermissenda: nutritive, rewarding.
    Hermi,
    /// Flabellina: nutritive, noxious.
    Flab,
    /// Faux-Flabellina: non-nutritive mimic of Flabellina odor.
    FauxFlab,
}

impl PreyKind {
    pub const ALL: [PreyKind; 3] = [PreyKind::Hermi, PreyKind::Flab, PreyKind::FauxFlab];

    /// Amount emitted per channel each tick: betaine, hermi, flab, conspecific.
    pub fn odor_signature(self) -> [f64; ODOR_CHANNELS] {
        match self {
            Self::Hermi => [0.5, 0.5, 0.0, 0.0],
            Self::Flab => [0.5, 0.0, 0.5, 0.0],
            Self::FauxFlab => [0.0, 0.0, 0.5, 0.0],
        }
    }

    pub fn is_nutritive(self) -> bool {
        !matches!(self, Self::FauxFlab)
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Hermi => 0,
            Self::Flab => 1,
            Self::FauxFlab => 2,
        }
    }
}

/// Where a captured prey reappears.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Respawn {
    Uniform,
    Cluster { center: [f64; 2], radius: f64 },
}

#[derive(Clone, Debug)]
pub struct Prey {
    pub id: usize,
    pub kind: PreyKind,
    pub radius: f64,
    position: [f64; 2],
    heading_deg: f64,
}

impl Prey {
    pub fn new(
        id: usize,
        kind: PreyKind,
        position: [f64; 2],
        heading_deg: f64,
        radius: f64,
    ) -> Self {
        Self {
            id,
            kind,
            radius,
            position,
            heading_deg,
        }
    }

    pub fn heading_deg(&self) -> f64 {
        self.heading_deg
    }

    /// Random walk: jitter the heading, then step forward.
    pub fn wander<R: Rng>(&mut self, rng: &mut R, speed: f64, jitter_deg: f64, torus: Torus) {
        if jitter_deg > 0.0 {
            self.heading_deg += rng.random_range(-jitter_deg..=jitter_deg);
        }
        let rad = self.heading_deg.to_radians();
        self.position = torus.wrap([
            self.position[0] + speed * rad.cos(),
            self.position[1] + speed * rad.sin(),
        ]);
    }

    pub fn respawn<R: Rng>(&mut self, rng: &mut R, policy: Respawn, torus: Torus) {
        self.position = match policy {
            Respawn::Uniform => [
                rng.random_range(0.0..torus.width),
                rng.random_range(0.0..torus.height),
            ],
            Respawn::Cluster { center, radius } => {
                let angle = rng.random_range(0.0..std::f64::consts::TAU);
                let dist = radius * rng.random::<f64>().sqrt();
                torus.wrap([
                    center[0] + dist * angle.cos(),
                    center[1] + dist * angle.sin(),
                ])
            }
        };
        self.heading_deg = rng.random_range(0.0..360.0);
    }
}

impl Positionable for Prey {
    fn position(&self) -> [f64; 2] {
        self.position
    }
}
