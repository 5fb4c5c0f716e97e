/// Anything with a location in the world.
pub trait Positionable {
    fn position(&self) -> [f64; 2];
}

/// Position, heading (degrees, counter-clockwise from +x) and body size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: [f64; 2],
    pub heading_deg: f64,
    pub size: f64,
}

impl Pose {
    /// Point `distance` away from the body centre at `offset_deg` relative to the heading.
    /// The result is not wrapped onto the torus.
    pub fn point_at(&self, offset_deg: f64, distance: f64) -> [f64; 2] {
        let angle = (self.heading_deg + offset_deg).to_radians();
        [
            self.position[0] + distance * angle.cos(),
            self.position[1] + distance * angle.sin(),
        ]
    }

    /// Head point used for bites, half a body length ahead.
    pub fn head(&self) -> [f64; 2] {
        self.point_at(0.0, 0.5 * self.size)
    }
}

impl Positionable for Pose {
    fn position(&self) -> [f64; 2] {
        self.position
    }
}

/// Signed angle in degrees from `heading_deg` to the direction of `delta`, in `(-180, 180]`.
pub fn bearing_offset(heading_deg: f64, delta: [f64; 2]) -> f64 {
    let target = delta[1].atan2(delta[0]).to_degrees();
    let diff = (target - heading_deg).rem_euclid(360.0);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}
