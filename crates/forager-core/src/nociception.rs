use serde::{Deserialize, Serialize};

use crate::body::{Pose, Positionable};
use crate::config::NociceptorSite;
use crate::constants::FALLOFF_EPSILON;
use crate::spatial::Torus;

pub const NOCICEPTOR_COUNT: usize = 7;

const LEFT_GROUP: [usize; 3] = [0, 1, 2];
const RIGHT_GROUP: [usize; 3] = [3, 4, 5];
const CAUDAL_GROUP: [usize; 3] = [2, 5, 6];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySide {
    Left,
    Right,
    Caudal,
}

impl BodySide {
    fn receptors(self) -> [usize; 3] {
        match self {
            Self::Left => LEFT_GROUP,
            Self::Right => RIGHT_GROUP,
            Self::Caudal => CAUDAL_GROUP,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Nociceptor {
    pub id: usize,
    site: NociceptorSite,
    position: [f64; 2],
    pain: f64,
}

impl Nociceptor {
    pub fn site(&self) -> NociceptorSite {
        self.site
    }

    pub fn pain(&self) -> f64 {
        self.pain
    }
}

impl Positionable for Nociceptor {
    fn position(&self) -> [f64; 2] {
        self.position
    }
}

/// Pain summed per receptor group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PainReading {
    pub left: f64,
    pub right: f64,
    pub caudal: f64,
}

impl PainReading {
    /// Overall pain: mean of the left and right groups.
    pub fn overall(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    pub fn asymmetry(&self) -> f64 {
        self.left - self.right
    }
}

#[derive(Clone, Debug)]
pub struct NociceptorArray {
    receptors: Vec<Nociceptor>,
    retention: f64,
    range_factor: f64,
}

impl NociceptorArray {
    pub fn new(
        layout: [NociceptorSite; NOCICEPTOR_COUNT],
        retention: f64,
        range_factor: f64,
    ) -> Self {
        let receptors = layout
            .iter()
            .enumerate()
            .map(|(id, &site)| Nociceptor {
                id,
                site,
                position: [0.0, 0.0],
                pain: 0.0,
            })
            .collect();
        Self {
            receptors,
            retention,
            range_factor,
        }
    }

    /// Recompute every receptor's world position from the body pose.
    pub fn place(&mut self, pose: &Pose, torus: Torus) {
        for receptor in &mut self.receptors {
            let point = pose.point_at(
                receptor.site.angle_deg,
                receptor.site.radial_fraction * pose.size,
            );
            receptor.position = torus.wrap(point);
        }
    }

    /// Inject `magnitude / (d + eps)` into every receptor within reach of `point`.
    /// Returns how many receptors were hit.
    pub fn inject(&mut self, point: [f64; 2], magnitude: f64, size: f64, torus: Torus) -> usize {
        let range = self.range_factor * size;
        let mut hit = 0;
        for receptor in &mut self.receptors {
            let d = torus.distance(receptor.position, point);
            if d <= range {
                receptor.pain += magnitude / (d + FALLOFF_EPSILON);
                hit += 1;
            }
        }
        hit
    }

    /// Add `amount` directly to every receptor of one group.
    pub fn inject_side(&mut self, side: BodySide, amount: f64) {
        for idx in side.receptors() {
            self.receptors[idx].pain += amount.max(0.0);
        }
    }

    pub fn read(&self) -> PainReading {
        let sum = |side: BodySide| -> f64 {
            side.receptors()
                .iter()
                .map(|&i| self.receptors[i].pain)
                .sum()
        };
        PainReading {
            left: sum(BodySide::Left),
            right: sum(BodySide::Right),
            caudal: sum(BodySide::Caudal),
        }
    }

    pub fn decay(&mut self) {
        for receptor in &mut self.receptors {
            receptor.pain *= self.retention;
        }
    }

    pub fn receptors(&self) -> &[Nociceptor] {
        &self.receptors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_NOCICEPTOR_LAYOUT;

    fn array() -> NociceptorArray {
        NociceptorArray::new(DEFAULT_NOCICEPTOR_LAYOUT, 0.2, 1.0)
    }

    fn pose() -> Pose {
        Pose {
            position: [50.0, 50.0],
            heading_deg: 0.0,
            size: 16.0,
        }
    }

    #[test]
    fn receptors_follow_the_body() {
        let torus = Torus::new(100.0, 100.0);
        let mut noci = array();
        noci.place(&pose(), torus);
        let left = noci.receptors()[1].position();
        let right = noci.receptors()[4].position();
        let tail = noci.receptors()[6].position();
        assert!(left[1] > 50.0);
        assert!(right[1] < 50.0);
        assert!((tail[0] - 42.0).abs() < 1e-9);

        let turned = Pose {
            heading_deg: 180.0,
            ..pose()
        };
        noci.place(&turned, torus);
        assert!((noci.receptors()[6].position()[0] - 58.0).abs() < 1e-9);
    }

    #[test]
    fn injection_falls_off_with_distance() {
        let torus = Torus::new(100.0, 100.0);
        let mut noci = array();
        noci.place(&pose(), torus);
        let near_left = noci.receptors()[1].position();
        let hit = noci.inject(near_left, 5.0, 16.0, torus);
        assert!(hit >= 1);
        let reading = noci.read();
        assert!(reading.left > reading.right);
        assert!(noci.receptors()[1].pain() > 1e5);
    }

    #[test]
    fn out_of_range_stimulus_does_nothing() {
        let torus = Torus::new(200.0, 200.0);
        let mut noci = array();
        noci.place(&pose(), torus);
        assert_eq!(noci.inject([150.0, 150.0], 5.0, 16.0, torus), 0);
        assert_eq!(noci.read(), PainReading::default());
    }

    #[test]
    fn side_injection_and_decay() {
        let mut noci = array();
        noci.inject_side(BodySide::Left, 1.0);
        let reading = noci.read();
        assert_eq!(reading.left, 3.0);
        assert_eq!(reading.right, 0.0);
        // Receptor 2 is shared between the left and caudal groups.
        assert_eq!(reading.caudal, 1.0);
        assert_eq!(reading.overall(), 1.5);
        noci.decay();
        assert!((noci.read().left - 0.6).abs() < 1e-12);
    }
}
