use serde::{Deserialize, Serialize};

use crate::body::{bearing_offset, Pose};
use crate::config::ForagerConfig;
use crate::prey::PreyKind;
use crate::spatial::Torus;

/// Result of this tick's capture test, consumed by the forager on the same tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encounter {
    #[default]
    None,
    Captured { prey: usize, kind: PreyKind },
}

impl Encounter {
    pub fn kind(&self) -> Option<PreyKind> {
        match self {
            Self::None => None,
            Self::Captured { kind, .. } => Some(*kind),
        }
    }
}

/// Prey seen by the resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreyView {
    pub index: usize,
    pub kind: PreyKind,
    pub position: [f64; 2],
    pub radius: f64,
}

/// Another forager seen by the resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConspecificView {
    pub index: usize,
    pub position: [f64; 2],
}

/// A bite landing on `target`, delivered at `point`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bite {
    pub target: usize,
    pub point: [f64; 2],
    pub distance: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct EncounterResolver {
    capture_half_angle_deg: f64,
    capture_radius_factor: f64,
    bite_half_angle_deg: f64,
    bite_radius_factor: f64,
    torus: Torus,
}

impl EncounterResolver {
    pub fn new(config: &ForagerConfig, torus: Torus) -> Self {
        Self {
            capture_half_angle_deg: config.capture_half_angle_deg,
            capture_radius_factor: config.capture_radius_factor,
            bite_half_angle_deg: config.bite_half_angle_deg,
            bite_radius_factor: config.bite_radius_factor,
            torus,
        }
    }

    /// Nearest prey inside the capture cone and reach.
    pub fn resolve<I>(&self, pose: &Pose, nearby: I) -> Encounter
    where
        I: IntoIterator<Item = PreyView>,
    {
        let reach = self.capture_radius_factor * pose.size;
        nearest_in_cone(
            self.torus,
            pose.position,
            pose.heading_deg,
            self.capture_half_angle_deg,
            nearby
                .into_iter()
                .map(|p| (p, p.position, reach + p.radius)),
        )
        .map_or(Encounter::None, |(prey, _)| Encounter::Captured {
            prey: prey.index,
            kind: prey.kind,
        })
    }

    /// Nearest conspecific whose body lies in front of the biter's head.
    pub fn bite_target<I>(&self, pose: &Pose, nearby: I) -> Option<Bite>
    where
        I: IntoIterator<Item = ConspecificView>,
    {
        let head = self.torus.wrap(pose.head());
        let reach = self.bite_radius_factor * pose.size;
        nearest_in_cone(
            self.torus,
            head,
            pose.heading_deg,
            self.bite_half_angle_deg,
            nearby.into_iter().map(|c| (c, c.position, reach)),
        )
        .map(|(target, distance)| Bite {
            target: target.index,
            point: head,
            distance,
        })
    }

    /// Largest distance at which any prey could be captured, for candidate queries.
    pub fn capture_query_radius(&self, size: f64, max_prey_radius: f64) -> f64 {
        self.capture_radius_factor * size + max_prey_radius
    }

    pub fn bite_query_radius(&self, size: f64) -> f64 {
        (0.5 + self.bite_radius_factor) * size
    }
}

fn nearest_in_cone<T>(
    torus: Torus,
    origin: [f64; 2],
    heading_deg: f64,
    half_angle_deg: f64,
    candidates: impl Iterator<Item = (T, [f64; 2], f64)>,
) -> Option<(T, f64)> {
    let mut best: Option<(T, f64)> = None;
    for (item, position, reach) in candidates {
        let delta = torus.delta(origin, position);
        let distance = delta[0].hypot(delta[1]);
        if distance > reach {
            continue;
        }
        let in_cone =
            distance < 1e-9 || bearing_offset(heading_deg, delta).abs() <= half_angle_deg;
        if !in_cone {
            continue;
        }
        if best.as_ref().map_or(true, |(_, d)| distance < *d) {
            best = Some((item, distance));
        }
    }
    best
}
