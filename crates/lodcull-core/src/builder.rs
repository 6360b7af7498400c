//! One-pass registry construction from a known set of candidates.

use std::fmt::Debug;
use std::hash::Hash;

use lodcull_config::CullingConfig;
use tracing::info;

use crate::error::LodError;
use crate::group::{GroupCandidate, GroupId};
use crate::registry::GroupRegistry;
use crate::scene::SceneGraph;

/// Outcome of [`RegistryBuilder::build`].
#[derive(Debug)]
pub struct BuildReport<O> {
    /// Stored groups with their owners, in id order.
    pub registered: Vec<(GroupId, O)>,
    /// Candidates that did not end up in the registry, with the reason.
    pub rejected: Vec<(O, LodError)>,
    /// The group that elected itself coordinator.
    pub coordinator: Option<GroupId>,
}

impl<O> BuildReport<O> {
    /// True when candidates registered but no coordinator could be elected,
    /// i.e. the camera was never found.
    pub fn is_degraded(&self) -> bool {
        self.coordinator.is_none()
            && self
                .rejected
                .iter()
                .any(|(_, err)| *err == LodError::MissingCamera)
    }
}

/// Collects every candidate of a scene, then registers and finalizes them
/// in `order_key` order.
///
/// Ids therefore depend only on the keys (ties keep insertion order), not on
/// the order the host happens to run setup hooks in.
#[derive(Debug)]
pub struct RegistryBuilder<O> {
    config: CullingConfig,
    candidates: Vec<GroupCandidate<O>>,
}

impl<O: Copy + Eq + Hash + Debug> RegistryBuilder<O> {
    pub fn new(config: CullingConfig) -> Self {
        Self {
            config,
            candidates: Vec::new(),
        }
    }

    pub fn add(&mut self, candidate: GroupCandidate<O>) -> &mut Self {
        self.candidates.push(candidate);
        self
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Register all candidates, then finalize them.
    ///
    /// Only an invalid config fails the build; per-candidate problems end up
    /// in [`BuildReport::rejected`].
    pub fn build<S>(mut self, scene: &mut S) -> Result<(GroupRegistry<S>, BuildReport<O>), LodError>
    where
        S: SceneGraph<Object = O>,
    {
        let mut registry = GroupRegistry::new(self.config)?;
        self.candidates.sort_by_key(|c| c.order_key);

        let mut report = BuildReport {
            registered: Vec::with_capacity(self.candidates.len()),
            rejected: Vec::new(),
            coordinator: None,
        };

        let mut tickets = Vec::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            match registry.register(scene, candidate) {
                Ok(ticket) => tickets.push((ticket, candidate)),
                Err(err) => report.rejected.push((candidate.owner, err)),
            }
        }

        for (ticket, candidate) in tickets {
            match registry.finalize(scene, candidate, ticket) {
                Ok(finalized) => {
                    if finalized.coordinator {
                        report.coordinator = Some(finalized.id);
                    }
                    report.registered.push((finalized.id, candidate.owner));
                }
                Err(err) => report.rejected.push((candidate.owner, err)),
            }
        }

        info!(
            "Built LOD registry: {} groups, {} rejected",
            report.registered.len(),
            report.rejected.len()
        );
        Ok((registry, report))
    }
}
