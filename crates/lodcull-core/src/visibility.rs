//! Bulk show/hide of a group's members.
//!
//! [`cull`] and [`draw`] are idempotent: a group already in the target state
//! is left alone and no scene call is made. Within a transition only members
//! not yet in the target state are touched.

use crate::group::GroupOf;
use crate::scene::SceneGraph;

/// Hide every member of the group. Returns the number of members changed.
pub fn cull<S: SceneGraph>(group: &mut GroupOf<S>, scene: &mut S) -> usize {
    if group.culled {
        return 0;
    }
    group.culled = true;
    set_members_visible(group, scene, false)
}

/// Show every member of the group. Returns the number of members changed.
pub fn draw<S: SceneGraph>(group: &mut GroupOf<S>, scene: &mut S) -> usize {
    if !group.culled {
        return 0;
    }
    group.culled = false;
    set_members_visible(group, scene, true)
}

/// Force every member into the state implied by `culled`.
///
/// Used when member lists are (re)built, so newly discovered members follow
/// the group's current state.
pub fn apply_state<S: SceneGraph>(group: &GroupOf<S>, scene: &mut S) -> usize {
    set_members_visible(group, scene, !group.culled)
}

/// Whether every existing member's visibility equals `!culled`.
pub fn verify_visibility<S: SceneGraph>(group: &GroupOf<S>, scene: &S) -> bool {
    let visible = !group.culled;
    if group.disable_renderer_only {
        group
            .child_renderers
            .iter()
            .filter_map(|&r| scene.renderer_enabled(r))
            .all(|enabled| enabled == visible)
    } else {
        group
            .child_objects
            .iter()
            .filter_map(|&o| scene.is_active(o))
            .all(|active| active == visible)
    }
}

fn set_members_visible<S: SceneGraph>(group: &GroupOf<S>, scene: &mut S, visible: bool) -> usize {
    let mut touched = 0;
    if group.disable_renderer_only {
        for &renderer in &group.child_renderers {
            if scene.renderer_enabled(renderer) == Some(!visible) {
                scene.set_renderer_enabled(renderer, visible);
                touched += 1;
            }
        }
    } else {
        for &object in &group.child_objects {
            if scene.is_active(object) == Some(!visible) {
                scene.set_active(object, visible);
                touched += 1;
            }
        }
    }
    touched
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rustc_hash::FxHashSet;

    use super::*;
    use crate::group::{GroupId, LodGroup};
    use crate::scanner::scan;
    use crate::test_scene::TestScene;

    fn group(scene: &TestScene, owner: u32, renderer_only: bool) -> GroupOf<TestScene> {
        let mut g = LodGroup {
            id: GroupId(0),
            owner,
            origin: Vec3::ZERO,
            culled: false,
            disable_renderer_only: renderer_only,
            update_by_count: false,
            culling_distance: None,
            child_count: 0,
            child_renderers: Vec::new(),
            child_objects: Vec::new(),
            excluded: FxHashSet::default(),
        };
        g.set_membership(scan(scene, g.id, owner, &g.excluded));
        g
    }

    #[test]
    fn test_cull_hides_renderers() {
        let mut scene = TestScene::new();
        let owner = scene.block(Vec3::ZERO, 3);
        let mut g = group(&scene, owner, true);

        assert_eq!(cull(&mut g, &mut scene), 3);
        assert!(g.is_culled());
        assert!(verify_visibility(&g, &scene));
        // The owner's own renderer is not a member.
        assert_eq!(scene.renderer_enabled(scene.renderer_of(owner)), Some(true));
    }

    #[test]
    fn test_cull_deactivates_objects_when_not_renderer_only() {
        let mut scene = TestScene::new();
        let owner = scene.block(Vec3::ZERO, 2);
        let mut g = group(&scene, owner, false);

        assert_eq!(cull(&mut g, &mut scene), 2);
        for &child in g.child_objects() {
            assert_eq!(scene.is_active(child), Some(false));
        }
        // Renderers are untouched under this policy.
        for &r in g.child_renderers() {
            assert_eq!(scene.renderer_enabled(r), Some(true));
        }
    }

    #[test]
    fn test_cull_twice_has_no_extra_side_effects() {
        let mut scene = TestScene::new();
        let owner = scene.block(Vec3::ZERO, 4);
        let mut g = group(&scene, owner, true);

        cull(&mut g, &mut scene);
        let writes = scene.writes;
        assert_eq!(cull(&mut g, &mut scene), 0);
        assert_eq!(scene.writes, writes);
        assert!(g.is_culled());
    }

    #[test]
    fn test_draw_on_drawn_group_is_noop() {
        let mut scene = TestScene::new();
        let owner = scene.block(Vec3::ZERO, 2);
        let mut g = group(&scene, owner, true);

        assert_eq!(draw(&mut g, &mut scene), 0);
        assert_eq!(scene.writes, 0);
    }

    #[test]
    fn test_cull_then_draw_restores_members() {
        for renderer_only in [true, false] {
            let mut scene = TestScene::new();
            let owner = scene.block(Vec3::ZERO, 3);
            let mut g = group(&scene, owner, renderer_only);

            cull(&mut g, &mut scene);
            assert_eq!(draw(&mut g, &mut scene), 3);
            assert!(!g.is_culled());
            assert!(verify_visibility(&g, &scene));
            for &child in g.child_objects() {
                assert_eq!(scene.is_active(child), Some(true));
                assert_eq!(scene.renderer_enabled(scene.renderer_of(child)), Some(true));
            }
        }
    }

    #[test]
    fn test_only_members_out_of_state_are_touched() {
        let mut scene = TestScene::new();
        let owner = scene.block(Vec3::ZERO, 3);
        let mut g = group(&scene, owner, true);
        let first = g.child_renderers()[0];
        scene.set_renderer_enabled(first, false);
        scene.writes = 0;

        assert_eq!(cull(&mut g, &mut scene), 2);
        assert_eq!(scene.writes, 2);
    }

    #[test]
    fn test_apply_state_follows_culled_flag() {
        let mut scene = TestScene::new();
        let owner = scene.block(Vec3::ZERO, 2);
        let mut g = group(&scene, owner, true);
        g.culled = true;

        assert!(!verify_visibility(&g, &scene));
        assert_eq!(apply_state(&g, &mut scene), 2);
        assert!(verify_visibility(&g, &scene));
    }

    #[test]
    fn test_despawned_members_are_skipped() {
        let mut scene = TestScene::new();
        let owner = scene.block(Vec3::ZERO, 2);
        let mut g = group(&scene, owner, true);
        let gone = g.child_objects()[0];
        scene.despawn(gone);

        assert_eq!(cull(&mut g, &mut scene), 1);
        assert!(verify_visibility(&g, &scene));
    }
}
