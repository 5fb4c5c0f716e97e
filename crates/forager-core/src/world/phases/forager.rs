use super::super::World;
use crate::body::Positionable;
use crate::constants::{CH_CONSPECIFIC, ODOR_CHANNELS};
use crate::encounter::PreyView;
use crate::spatial::{self, EntityLocation, EntityRef};
use rstar::RTree;

impl World {
    /// Resolve captures for one forager, run its pipeline, respawn eaten prey and
    /// lay its conspecific trail.
    pub(in crate::world) fn step_forager(&mut self, idx: usize, tree: &RTree<EntityLocation>) {
        let pose = self.foragers[idx].pose();
        // The index was built at tick start; prey may have drifted since.
        let radius = self
            .resolver
            .capture_query_radius(pose.size, self.config.prey_radius)
            + self.config.prey_speed;
        let nearby = spatial::query_neighbors(
            tree,
            pose.position,
            radius,
            Some(EntityRef::Forager(idx)),
            self.torus,
        );
        let prey = &self.prey;
        let views = nearby.into_iter().filter_map(|entity| match entity {
            EntityRef::Prey(i) => Some(PreyView {
                index: i,
                kind: prey[i].kind,
                position: prey[i].position(),
                radius: prey[i].radius,
            }),
            EntityRef::Forager(_) => None,
        });
        let encounter = self.resolver.resolve(&pose, views);

        let outcome = self.foragers[idx].tick(&self.field, encounter);

        if let Some(eaten) = outcome.consumed {
            let policy = self.respawn_policy_for(self.prey[eaten].kind);
            self.prey[eaten].respawn(&mut self.rng, policy, self.torus);
        }
        if !self.config.odor_null {
            let mut trail = [0.0; ODOR_CHANNELS];
            trail[CH_CONSPECIFIC] = self.config.conspecific_odor;
            let [x, y] = outcome.position;
            self.field.deposit(x, y, &trail);
        }
    }
}
