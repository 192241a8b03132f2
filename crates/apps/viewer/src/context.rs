//! Application context: the single owner of all viewer state.
//!
//! Every host callback (pointer, wheel, resize, animation frame) is a method
//! here and runs to completion before the next one, so nothing is shared.

use foundation::math::{Vec2, Vec3};
use gpu::{RenderFrame, Renderer};
use layers::{RegionLayer, RegionLayerReport};
use layers::symbology::RegionStyle;
use runtime::{Event, EventBus, EventKind, Frame, PointerClassifier, PointerSample};
use scene::World;
use scene::camera::{PerspectiveCamera, Viewport};
use scene::controls::OrbitControls;
use scene::picking::resolve;
use scene::registry::RegionRegistry;
use scene::selection::{Selection, SelectionObserver, Transition};

use crate::config::ViewerConfig;
use crate::loader::Datasets;

pub struct AppContext {
    world: World,
    registry: RegionRegistry,
    selection: Selection,
    classifier: PointerClassifier,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    viewport: Viewport,
    renderer: Renderer,
    bus: EventBus,
    frame: Frame,
}

impl AppContext {
    /// An empty scene set up from `config`.
    pub fn new(config: &ViewerConfig, viewport: Viewport) -> Self {
        let mut camera = PerspectiveCamera::new(
            config.camera.fov_deg,
            viewport.aspect(),
            config.camera.near,
            config.camera.far,
        );
        camera.position = config.camera.position();
        camera.look_at(Vec3::ZERO);

        let mut renderer = Renderer::new(viewport.width(), viewport.height(), config.pixel_ratio);
        renderer.background = config.background();

        Self {
            world: World::new(),
            registry: RegionRegistry::new(),
            selection: Selection::new(),
            classifier: PointerClassifier::new(config.tap_thresholds()),
            camera,
            controls: OrbitControls::new(config.damping),
            viewport,
            renderer,
            bus: EventBus::new(),
            frame: Frame::default(),
        }
    }

    /// Builds the region solids from fully loaded datasets.
    pub fn build(
        config: &ViewerConfig,
        viewport: Viewport,
        datasets: &Datasets,
    ) -> (Self, RegionLayerReport) {
        let mut ctx = Self::new(config, viewport);
        let layer = RegionLayer::new(config.projection(), RegionStyle::default(), config.depth);
        let report = layer.build(
            &datasets.features,
            &datasets.roster,
            &mut ctx.world,
            &mut ctx.registry,
        );
        ctx.bus.emit(
            ctx.frame,
            EventKind::Load,
            format!("{} regions, {} solids", report.regions, report.solids),
        );
        (ctx, report)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn registry(&self) -> &RegionRegistry {
        &self.registry
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    /// Hands the recorded events to the host and empties the log.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.bus.drain()
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn pointer_down(&mut self, sample: PointerSample) {
        self.classifier.on_pointer_down(sample);
        self.controls
            .on_pointer_down(sample.position, sample.pointer_id, sample.is_primary);
    }

    pub fn pointer_move(&mut self, sample: PointerSample) {
        self.controls
            .on_pointer_move(sample.position, sample.pointer_id, self.viewport.height());
    }

    /// Completes a gesture. A tap is hit-tested and drives the selection;
    /// the resulting transition is forwarded to `observer`.
    pub fn pointer_up(
        &mut self,
        sample: PointerSample,
        observer: &mut impl SelectionObserver,
    ) -> Option<Transition> {
        self.controls.on_pointer_up(sample.pointer_id);
        let tap = self.classifier.on_pointer_up(sample)?;
        self.bus.emit(
            self.frame,
            EventKind::Tap,
            format!("({}, {})", tap.position.x, tap.position.y),
        );
        Some(self.select_at(tap.position, observer))
    }

    pub fn pointer_cancel(&mut self) {
        self.classifier.on_pointer_cancel();
        self.controls.on_pointer_cancel();
    }

    pub fn wheel(&mut self, delta: f64) {
        self.controls.on_wheel(delta);
    }

    /// Follows the host element's new size: camera aspect and renderer output.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
        if width > 0.0 && height > 0.0 {
            self.camera.set_aspect(width / height);
        }
        self.renderer.set_size(width, height);
        self.bus
            .emit(self.frame, EventKind::Resize, format!("{width}x{height}"));
    }

    /// One animation frame: damped controls update, then one render.
    pub fn tick(&mut self, dt_s: f64) -> RenderFrame {
        self.frame = self.frame.advance(dt_s);
        self.controls.update(&mut self.camera);
        self.renderer.render(&self.world, &self.camera)
    }

    fn select_at(&mut self, page: Vec2, observer: &mut impl SelectionObserver) -> Transition {
        let hit = resolve(
            page.x,
            page.y,
            &self.viewport,
            &self.camera,
            &self.world,
            &self.registry,
        );
        let transition = self
            .selection
            .apply(hit.as_ref(), &mut self.world, &self.registry);
        self.bus.emit(
            self.frame,
            EventKind::Selection,
            format!("{transition:?}"),
        );
        transition.notify(observer);
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::AppContext;
    use crate::config::ViewerConfig;
    use crate::loader::Datasets;
    use crate::panel::DetailPanel;
    use foundation::ids::RegionId;
    use foundation::math::{Vec2, Vec3, mat4_project_point};
    use foundation::time::Time;
    use formats::geojson::RegionFeatures;
    use formats::roster::Roster;
    use runtime::{EventKind, PointerSample};
    use scene::camera::Viewport;
    use scene::selection::{SelectionState, Transition};

    const GEO: &str = r#"{ "type": "FeatureCollection", "features": [
        { "type": "Feature", "properties": { "name": "Colorado" },
          "geometry": { "type": "Polygon",
            "coordinates": [[[-109, 41], [-102, 41], [-102, 37], [-109, 37], [-109, 41]]] } },
        { "type": "Feature", "properties": { "name": "Ohio" },
          "geometry": { "type": "Polygon",
            "coordinates": [[[-84.8, 41.7], [-80.5, 41.7], [-80.5, 38.4], [-84.8, 38.4]]] } }
    ] }"#;

    const ROSTER: &str = r#"{ "states": {
        "Colorado": { "party": "Democrat", "officials": [
            { "name": "Gov C", "position": "Governor", "party": "Democrat" } ] },
        "Ohio": { "party": "Republican", "officials": [] }
    } }"#;

    fn context() -> (AppContext, DetailPanel) {
        let datasets = Datasets {
            features: RegionFeatures::from_geojson_str(GEO).expect("geo"),
            roster: Roster::from_json_str(ROSTER).expect("roster"),
        };
        let (ctx, report) = AppContext::build(
            &ViewerConfig::default(),
            Viewport::full_window(800.0, 600.0),
            &datasets,
        );
        assert_eq!(report.solids, 2);
        (ctx, DetailPanel::new(datasets.roster))
    }

    /// Page position of the top cap center of a region's first solid.
    fn screen_point(ctx: &AppContext, name: &str) -> Vec2 {
        let solid = ctx.registry().solids_for(&RegionId::from(name))[0];
        let b = ctx.world().subtree_bounds(solid).expect("bounds");
        let center = Vec3::new(
            0.5 * (b.min[0] + b.max[0]),
            0.5 * (b.min[1] + b.max[1]),
            b.max[2],
        );
        let ndc = mat4_project_point(ctx.camera().view_proj_matrix(), center).expect("ndc");
        let vp = ctx.viewport();
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * vp.width(),
            (1.0 - ndc.y) * 0.5 * vp.height(),
        )
    }

    fn tap(ctx: &mut AppContext, panel: &mut DetailPanel, at: Vec2, t0_ms: f64) -> Option<Transition> {
        ctx.pointer_down(PointerSample::primary(at, Time::from_millis(t0_ms), 1));
        ctx.pointer_up(
            PointerSample::primary(at + Vec2::new(2.0, 1.0), Time::from_millis(t0_ms + 120.0), 1),
            panel,
        )
    }

    #[test]
    fn tap_selects_region_and_miss_clears() {
        let (mut ctx, mut panel) = context();
        let colorado = screen_point(&ctx, "Colorado");
        let ohio = screen_point(&ctx, "Ohio");

        let t = tap(&mut ctx, &mut panel, colorado, 0.0);
        assert_eq!(t, Some(Transition::Selected(RegionId::from("Colorado"))));
        assert_eq!(panel.view().map(|v| v.title.as_str()), Some("Colorado"));
        assert_eq!(panel.view().map(|v| v.officials.len()), Some(1));

        let t = tap(&mut ctx, &mut panel, ohio, 1000.0);
        assert!(matches!(t, Some(Transition::Switched { .. })));
        assert_eq!(panel.view().map(|v| v.title.as_str()), Some("Ohio"));

        let t = tap(&mut ctx, &mut panel, Vec2::new(5.0, 5.0), 2000.0);
        assert_eq!(t, Some(Transition::Cleared(RegionId::from("Ohio"))));
        assert!(!panel.is_visible());
        assert_eq!(ctx.selection().state(), &SelectionState::Idle);
        assert_eq!(ctx.events().of_kind(EventKind::Selection).count(), 3);
    }

    #[test]
    fn drags_do_not_select() {
        let (mut ctx, mut panel) = context();
        let at = screen_point(&ctx, "Colorado");
        ctx.pointer_down(PointerSample::primary(at, Time::from_millis(0.0), 1));
        ctx.pointer_move(PointerSample::primary(
            at + Vec2::new(40.0, 0.0),
            Time::from_millis(50.0),
            1,
        ));
        let t = ctx.pointer_up(
            PointerSample::primary(at + Vec2::new(40.0, 0.0), Time::from_millis(100.0), 1),
            &mut panel,
        );
        assert!(t.is_none());
        assert!(!panel.is_visible());
        assert!(ctx.selection().current().is_none());
    }

    #[test]
    fn event_log_stays_bounded_and_drains() {
        let (mut ctx, mut panel) = context();
        let colorado = screen_point(&ctx, "Colorado");
        for i in 0..400 {
            tap(&mut ctx, &mut panel, colorado, f64::from(i) * 1000.0);
            ctx.resize(800.0, 600.0);
        }
        let cap = ctx.events().capacity();
        assert_eq!(ctx.events().events().len(), cap);
        assert!(ctx.events().dropped() > 0);

        let drained = ctx.drain_events();
        assert_eq!(drained.len(), cap);
        assert!(ctx.events().events().is_empty());
        assert_eq!(drained.last().map(|e| e.kind), Some(EventKind::Resize));
    }

    #[test]
    fn resize_updates_camera_aspect_and_output() {
        let (mut ctx, _) = context();
        assert_eq!(ctx.camera().aspect(), 800.0 / 600.0);
        ctx.resize(1024.0, 768.0);
        assert_eq!(ctx.camera().aspect(), 1024.0 / 768.0);
        assert_eq!(ctx.renderer().output_size(), (1024, 768));
        let m = ctx.camera().projection_matrix();
        assert!((m[1][1] / m[0][0] - 1024.0 / 768.0).abs() < 1e-12);
    }

    #[test]
    fn tick_renders_solids_then_outlines() {
        let (mut ctx, _) = context();
        let frame = ctx.tick(1.0 / 60.0);
        assert_eq!(frame.commands.len(), 4);
        assert_eq!(frame.commands[3].render_order(), 999);
        assert_eq!(ctx.frame().index, 1);
    }
}
