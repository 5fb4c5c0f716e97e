use super::super::World;
use crate::body::Positionable;

impl World {
    /// Emit the prey's odor where it stands, then let it wander.
    pub(in crate::world) fn step_prey(&mut self, idx: usize) {
        let config = &self.config;
        let prey = &mut self.prey[idx];
        if !config.odor_null {
            let [x, y] = prey.position();
            self.field.deposit(x, y, &prey.kind.odor_signature());
        }
        prey.wander(
            &mut self.rng,
            config.prey_speed,
            config.prey_turn_jitter_deg,
            self.torus,
        );
    }
}
