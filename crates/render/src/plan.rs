use sceneview_scene::{Scene, ShadingPath, ViewerState};

/// What a draw call renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawTarget {
    Grid,
    /// The light's gizmo cube.
    Light,
    /// Index into [`Scene::objects`].
    Object(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub target: DrawTarget,
    pub shading: ShadingPath,
}

/// Ordered draw calls for one frame: grid and light gizmo unlit, then every
/// object in list order with the shading chosen by `state.is_lit`.
pub fn plan_frame(scene: &Scene, state: &ViewerState) -> Vec<DrawCall> {
    let mut calls = Vec::with_capacity(scene.objects().len() + 2);
    calls.push(DrawCall {
        target: DrawTarget::Grid,
        shading: ShadingPath::Unlit,
    });
    calls.push(DrawCall {
        target: DrawTarget::Light,
        shading: ShadingPath::Unlit,
    });
    let shading = state.object_shading();
    calls.extend((0..scene.objects().len()).map(|i| DrawCall {
        target: DrawTarget::Object(i),
        shading,
    }));
    tracing::trace!(calls = calls.len(), ?shading, "frame planned");
    calls
}

#[cfg(test)]
mod tests {
    use super::*;
    use sceneview_common::{AssetId, Shape};
    use sceneview_scene::Object;

    fn scene_with(n: usize) -> Scene {
        let mut scene = Scene::default();
        for _ in 0..n {
            scene.push_object(Object::new(Shape::Cube, AssetId(0)));
        }
        scene
    }

    #[test]
    fn grid_and_light_come_first() {
        let plan = plan_frame(&scene_with(2), &ViewerState::default());
        assert_eq!(plan.len(), 4);
        assert_eq!(plan[0].target, DrawTarget::Grid);
        assert_eq!(plan[1].target, DrawTarget::Light);
        assert_eq!(plan[2].target, DrawTarget::Object(0));
        assert_eq!(plan[3].target, DrawTarget::Object(1));
    }

    #[test]
    fn lit_flag_switches_every_object_only() {
        let scene = scene_with(3);
        let lit = ViewerState {
            is_lit: true,
            ..ViewerState::default()
        };
        let plan = plan_frame(&scene, &lit);
        assert_eq!(plan[0].shading, ShadingPath::Unlit);
        assert_eq!(plan[1].shading, ShadingPath::Unlit);
        assert!(plan[2..].iter().all(|c| c.shading == ShadingPath::Lit));

        let plan = plan_frame(&scene, &ViewerState::default());
        assert!(plan.iter().all(|c| c.shading == ShadingPath::Unlit));
    }

    #[test]
    fn empty_object_list_still_draws_grid_and_light() {
        let plan = plan_frame(&scene_with(0), &ViewerState::default());
        assert_eq!(plan.len(), 2);
    }
}
