use crate::body::Pose;
use crate::spatial::Torus;

/// Wrap an angle in degrees into `[0, 360)`.
pub fn wrap_heading(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Apply a turn command, then move `speed` along the new heading.
///
/// `turn_gain` converts the command into degrees. With `translate == false`
/// the heading still updates but the body stays in place.
pub fn advance(
    pose: Pose,
    turn: f64,
    turn_gain: f64,
    speed: f64,
    translate: bool,
    torus: Torus,
) -> Pose {
    let heading_deg = wrap_heading(pose.heading_deg + turn_gain * turn);
    let position = if translate {
        let rad = heading_deg.to_radians();
        torus.wrap([
            pose.position[0] + speed * rad.cos(),
            pose.position[1] + speed * rad.sin(),
        ])
    } else {
        pose.position
    };
    Pose {
        position,
        heading_deg,
        size: pose.size,
    }
}
