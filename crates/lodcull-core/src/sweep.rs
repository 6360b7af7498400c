//! The per-frame cull sweep.

use tracing::{error, trace, warn};

use crate::error::LodError;
use crate::group::GroupId;
use crate::registry::{GroupRegistry, Slot};
use crate::scanner::scan;
use crate::scene::SceneGraph;
use crate::visibility::{apply_state, cull, draw};

/// A state change decided by [`next_transition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Draw,
    Cull,
}

/// Decide whether a group must change state at `distance` from the camera.
///
/// The comparison is strict in both directions, so a group sitting exactly
/// on the threshold keeps its current state.
pub fn next_transition(culled: bool, distance: f32, threshold: f32) -> Option<Transition> {
    if culled {
        (distance < threshold).then_some(Transition::Draw)
    } else {
        (distance > threshold).then_some(Transition::Cull)
    }
}

/// What one sweep did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Groups that went from culled to drawn.
    pub drawn: usize,
    /// Groups that went from drawn to culled.
    pub culled: usize,
    /// Groups whose members were re-scanned after a child count change.
    pub rescanned: usize,
    /// Allocated slots that were never written.
    pub vacant: Vec<GroupId>,
    /// Groups skipped because their owner is gone.
    pub missing_owners: Vec<GroupId>,
}

impl SweepReport {
    /// Number of groups that changed state.
    pub fn transitions(&self) -> usize {
        self.drawn + self.culled
    }
}

impl<S: SceneGraph> GroupRegistry<S> {
    /// Compare every group against the camera and flip the ones that crossed
    /// their threshold. Call once per frame, after setup has finished.
    ///
    /// Fails without touching any group if the camera can't be resolved.
    /// Problems with single groups are logged and listed in the report.
    pub fn sweep(&mut self, scene: &mut S) -> Result<SweepReport, LodError> {
        let Some(camera_position) = self.camera.and_then(|camera| scene.camera_position(camera))
        else {
            error!("LOD sweep skipped: {}", LodError::MissingCamera);
            return Err(LodError::MissingCamera);
        };

        let global = self.config.culling_distance;
        let mut report = SweepReport::default();

        for (index, slot) in self.slots.iter_mut().enumerate() {
            let group = match slot {
                Slot::Occupied(group) => group,
                Slot::Vacant => {
                    let id = GroupId(index as u32);
                    warn!("{}", LodError::UnpopulatedSlot { id });
                    report.vacant.push(id);
                    continue;
                }
                Slot::Removed => continue,
            };

            if group.update_by_count {
                if !scene.contains(group.owner) {
                    warn!("{}", LodError::MissingOwner { id: group.id });
                    report.missing_owners.push(group.id);
                    continue;
                }
                if scene.child_count(group.owner) != group.child_count {
                    trace!(
                        "LOD group {} child count changed ({} -> {}), rescanning",
                        group.id,
                        group.child_count,
                        scene.child_count(group.owner)
                    );
                    group.set_membership(scan(scene, group.id, group.owner, &group.excluded));
                    apply_state(group, scene);
                    report.rescanned += 1;
                }
            }

            let distance = camera_position.distance(group.origin);
            match next_transition(group.culled, distance, group.threshold(global)) {
                Some(Transition::Draw) => {
                    draw(group, scene);
                    report.drawn += 1;
                }
                Some(Transition::Cull) => {
                    cull(group, scene);
                    report.culled += 1;
                }
                None => {}
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_culled_group_draws_inside_threshold() {
        assert_eq!(next_transition(true, 10.0, 150.0), Some(Transition::Draw));
        assert_eq!(next_transition(true, 200.0, 150.0), None);
    }

    #[test]
    fn test_drawn_group_culls_outside_threshold() {
        assert_eq!(next_transition(false, 150.5, 150.0), Some(Transition::Cull));
        assert_eq!(next_transition(false, 0.0, 150.0), None);
    }

    #[test]
    fn test_exact_threshold_never_transitions() {
        assert_eq!(next_transition(true, 150.0, 150.0), None);
        assert_eq!(next_transition(false, 150.0, 150.0), None);
    }

    #[test]
    fn test_zero_threshold_culls_everything_off_origin() {
        assert_eq!(next_transition(false, 0.001, 0.0), Some(Transition::Cull));
        assert_eq!(next_transition(false, 0.0, 0.0), None);
    }
}
