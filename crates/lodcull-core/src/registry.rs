//! Group registry: id assignment, coordinator election and group storage.
//!
//! Registration is two-phase. Every candidate first calls
//! [`GroupRegistry::register`] to draw an id; only once all candidates have
//! done so is the final group count known. The first candidate to call
//! [`GroupRegistry::finalize`] becomes the coordinator: it sizes storage to
//! that count and caches the camera. Every finalize then writes one group.

use std::fmt;

use lodcull_config::CullingConfig;
use tracing::{debug, error, info, warn};

use crate::error::LodError;
use crate::group::{GroupCandidate, GroupId, GroupOf, LodGroup};
use crate::scanner::scan;
use crate::scene::SceneGraph;
use crate::visibility::{apply_state, draw};

/// One storage slot, addressed by [`GroupId`].
#[derive(Clone, Debug)]
pub enum Slot<O, R> {
    /// Allocated by the coordinator, not yet written by its finalize.
    Vacant,
    Occupied(LodGroup<O, R>),
    /// The group was removed; the id stays reserved for this epoch.
    Removed,
}

/// Proof of registration, consumed by [`GroupRegistry::finalize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    id: GroupId,
    epoch: u64,
}

impl Ticket {
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Outcome of a successful finalize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Finalized {
    pub id: GroupId,
    /// This call elected the coordinator.
    pub coordinator: bool,
    /// Initial state of the group.
    pub culled: bool,
}

/// All LOD groups of one scene, indexed by id.
///
/// One registry serves one scene at a time. Storage is sized once per epoch,
/// when the coordinator is elected; [`reset`](Self::reset) starts the next one.
pub struct GroupRegistry<S: SceneGraph> {
    pub(crate) config: CullingConfig,
    pub(crate) slots: Vec<Slot<S::Object, S::Renderer>>,
    pub(crate) camera: Option<S::Camera>,
    issued: u32,
    coordinator: Option<GroupId>,
    epoch: u64,
}

impl<S: SceneGraph> fmt::Debug for GroupRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupRegistry")
            .field("config", &self.config)
            .field("slots", &self.slots.len())
            .field("groups", &self.group_count())
            .field("camera", &self.camera)
            .field("issued", &self.issued)
            .field("coordinator", &self.coordinator)
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl<S: SceneGraph> GroupRegistry<S> {
    /// Create an empty registry at epoch 0.
    pub fn new(config: CullingConfig) -> Result<Self, LodError> {
        check_distance(config.culling_distance)?;
        Ok(Self {
            config,
            slots: Vec::new(),
            camera: None,
            issued: 0,
            coordinator: None,
            epoch: 0,
        })
    }

    /// Draw an id for `candidate`.
    ///
    /// Candidates without children are rejected and do not consume an id.
    /// Once the coordinator has sized storage, later candidates still draw an
    /// id but it lies past the end of storage, so their finalize fails with
    /// [`LodError::OutOfBounds`]. Groups already stored are never touched;
    /// call [`reset`](Self::reset) to start a new epoch.
    pub fn register(
        &mut self,
        scene: &S,
        candidate: &GroupCandidate<S::Object>,
    ) -> Result<Ticket, LodError> {
        if !candidate.enabled {
            debug!("Skipping disabled LOD group candidate {:?}", candidate.owner);
            return Err(LodError::CandidateDisabled {
                owner: format!("{:?}", candidate.owner),
            });
        }

        if scene.child_count(candidate.owner) == 0 {
            let err = LodError::NoChildren {
                owner: format!("{:?}", candidate.owner),
            };
            error!("{err}");
            return Err(err);
        }

        let id = GroupId(self.issued);
        self.issued += 1;
        if self.coordinator.is_some() {
            warn!(
                "{}",
                LodError::LateRegistration {
                    id,
                    capacity: self.slots.len(),
                }
            );
        }
        Ok(Ticket {
            id,
            epoch: self.epoch,
        })
    }

    /// Build and store the group for a registered candidate.
    ///
    /// The members are put into the group's initial state before the group
    /// becomes visible to [`sweep`](Self::sweep).
    pub fn finalize(
        &mut self,
        scene: &mut S,
        candidate: &GroupCandidate<S::Object>,
        ticket: Ticket,
    ) -> Result<Finalized, LodError> {
        let id = ticket.id;
        if ticket.epoch != self.epoch {
            let err = LodError::StaleTicket {
                id,
                ticket_epoch: ticket.epoch,
                epoch: self.epoch,
            };
            warn!("{err}");
            return Err(err);
        }

        let Some(origin) = scene.position(candidate.owner) else {
            let err = LodError::MissingOwner { id };
            error!("{err}");
            return Err(err);
        };

        let coordinator = self.coordinator.is_none();
        if coordinator {
            self.elect(scene, id)?;
        }

        let capacity = self.slots.len();
        let Some(slot) = self.slots.get(id.index()) else {
            let err = LodError::OutOfBounds { id, capacity };
            error!("{err}");
            return Err(err);
        };
        if !matches!(slot, Slot::Vacant) {
            return Err(LodError::SlotOccupied { id });
        }

        let camera_position = self
            .camera
            .and_then(|camera| scene.camera_position(camera))
            .ok_or(LodError::MissingCamera)?;

        let mut group = LodGroup {
            id,
            owner: candidate.owner,
            origin,
            culled: false,
            disable_renderer_only: candidate
                .disable_renderer_only
                .unwrap_or(self.config.disable_renderer_only),
            update_by_count: candidate
                .update_by_count
                .unwrap_or(self.config.update_by_count),
            culling_distance: candidate.culling_distance,
            child_count: 0,
            child_renderers: Vec::new(),
            child_objects: Vec::new(),
            excluded: candidate.excluded.clone(),
        };
        group.set_membership(scan(scene, id, group.owner, &group.excluded));

        let distance = camera_position.distance(origin);
        group.culled = distance > group.threshold(self.config.culling_distance);
        apply_state(&group, scene);

        debug!(
            "LOD group {id} finalized: {} renderers, {} objects, distance {distance:.1}, culled={}",
            group.child_renderers.len(),
            group.child_objects.len(),
            group.culled,
        );

        let culled = group.culled;
        self.slots[id.index()] = Slot::Occupied(group);
        Ok(Finalized {
            id,
            coordinator,
            culled,
        })
    }

    fn elect(&mut self, scene: &S, id: GroupId) -> Result<(), LodError> {
        let Some(camera) = scene.find_main_camera() else {
            error!("LOD group {id} can't become coordinator: {}", LodError::MissingCamera);
            return Err(LodError::MissingCamera);
        };

        self.slots = (0..self.issued).map(|_| Slot::Vacant).collect();
        self.camera = Some(camera);
        self.coordinator = Some(id);
        info!(
            "LOD group {id} is coordinator for epoch {}: {} slots",
            self.epoch,
            self.slots.len()
        );
        Ok(())
    }

    /// Drop every group and start a new epoch.
    ///
    /// Member visibility is left as is; call this when the scene itself is
    /// being torn down.
    pub fn reset(&mut self) {
        debug!("Resetting LOD group registry (epoch {})", self.epoch);
        self.slots.clear();
        self.camera = None;
        self.issued = 0;
        self.coordinator = None;
        self.epoch += 1;
    }

    /// Remove a group, leaving a tombstone so other ids stay valid.
    ///
    /// The group is drawn first, so no member stays hidden.
    pub fn remove(&mut self, scene: &mut S, id: GroupId) -> Result<GroupOf<S>, LodError> {
        let capacity = self.slots.len();
        let slot = self
            .slots
            .get_mut(id.index())
            .ok_or(LodError::OutOfBounds { id, capacity })?;
        if !matches!(slot, Slot::Occupied(_)) {
            return Err(LodError::UnknownGroup { id });
        }
        let Slot::Occupied(mut group) = std::mem::replace(slot, Slot::Removed) else {
            return Err(LodError::UnknownGroup { id });
        };
        draw(&mut group, scene);
        debug!("LOD group {id} removed");
        Ok(group)
    }

    /// Change the global culling distance. Takes effect on the next sweep.
    pub fn set_culling_distance(&mut self, distance: f32) -> Result<(), LodError> {
        check_distance(distance)?;
        self.config.culling_distance = distance;
        Ok(())
    }

    pub fn config(&self) -> &CullingConfig {
        &self.config
    }

    pub fn get(&self, id: GroupId) -> Option<&GroupOf<S>> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied(group)) => Some(group),
            _ => None,
        }
    }

    /// Occupied groups in id order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupOf<S>> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied(group) => Some(group),
            _ => None,
        })
    }

    pub fn slots(&self) -> &[Slot<S::Object, S::Renderer>] {
        &self.slots
    }

    /// Number of allocated slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of occupied slots.
    pub fn group_count(&self) -> usize {
        self.groups().count()
    }

    /// Ids drawn in the current epoch.
    pub fn issued(&self) -> u32 {
        self.issued
    }

    pub fn coordinator(&self) -> Option<GroupId> {
        self.coordinator
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The cached main camera, once a coordinator exists.
    pub fn camera(&self) -> Option<S::Camera> {
        self.camera
    }
}

fn check_distance(distance: f32) -> Result<(), LodError> {
    if distance.is_finite() && distance >= 0.0 {
        Ok(())
    } else {
        Err(LodError::InvalidDistance { distance })
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
