use super::super::World;
use crate::body::Positionable;
use crate::encounter::ConspecificView;
use crate::spatial::{self, EntityLocation, EntityRef};
use rstar::RTree;
use tracing::debug;

impl World {
    /// Let an aroused forager bite the nearest conspecific in front of its head.
    pub(in crate::world) fn step_bite(&mut self, idx: usize, tree: &RTree<EntityLocation>) {
        if !self.foragers[idx].ready_to_bite() {
            return;
        }
        let pose = self.foragers[idx].pose();
        let radius = self.resolver.bite_query_radius(pose.size) + self.config.forager.speed;
        let nearby = spatial::query_neighbors(
            tree,
            pose.position,
            radius,
            Some(EntityRef::Forager(idx)),
            self.torus,
        );
        let foragers = &self.foragers;
        let views = nearby.into_iter().filter_map(|entity| match entity {
            EntityRef::Forager(i) => Some(ConspecificView {
                index: i,
                position: foragers[i].position(),
            }),
            EntityRef::Prey(_) => None,
        });
        let Some(bite) = self.resolver.bite_target(&pose, views) else {
            return;
        };

        self.foragers[idx].record_bite();
        let magnitude = self.config.forager.bite_magnitude;
        self.foragers[bite.target].receive_bite(bite.point, magnitude);
        debug!(
            biter = idx,
            target = bite.target,
            distance = bite.distance,
            "bite"
        );
    }
}
