use crate::registry::SceneRegistry;
use folio_input::Action;
use folio_physics::PhysicsBackend;
use rand::Rng;

/// Applies the reset action to every registered exhibit.
#[derive(Debug, Clone, Copy)]
pub struct ResetController {
    spin_range: f32,
}

impl ResetController {
    pub fn new(spin_range: f32) -> Self {
        Self { spin_range }
    }

    pub fn spin_range(&self) -> f32 {
        self.spin_range
    }

    /// Handle an action. Anything but [`Action::Reset`] is ignored and
    /// returns 0; otherwise returns the number of exhibits reset.
    pub fn handle<P, R>(
        &self,
        action: Action,
        registry: &SceneRegistry,
        physics: &mut P,
        rng: &mut R,
    ) -> usize
    where
        P: PhysicsBackend + ?Sized,
        R: Rng + ?Sized,
    {
        match action {
            Action::Reset => self.reset_all(registry, physics, rng),
            _ => 0,
        }
    }

    /// Reset each exhibit in registry order. Failures are logged and skipped.
    pub fn reset_all<P, R>(&self, registry: &SceneRegistry, physics: &mut P, rng: &mut R) -> usize
    where
        P: PhysicsBackend + ?Sized,
        R: Rng + ?Sized,
    {
        let mut count = 0;
        for exhibit in registry.iter() {
            match exhibit.reset(physics, rng, self.spin_range) {
                Ok(_) => count += 1,
                Err(e) => tracing::warn!(exhibit = exhibit.name(), "reset failed: {e}"),
            }
        }
        tracing::info!(count, "exhibits reset");
        count
    }
}
