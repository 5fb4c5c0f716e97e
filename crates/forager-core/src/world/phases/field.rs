use super::super::World;

impl World {
    /// Diffuse and evaporate every odor channel once, before any entity acts.
    pub(in crate::world) fn step_field_phase(&mut self) {
        self.field.step();
    }
}
