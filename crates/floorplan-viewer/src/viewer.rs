//! The 3D viewer: keeps a scene in step with the model and draws it.

use std::sync::Arc;

use floorplan_core::{FloorplanEvent, IntersectionPlane, ModelEvent, SharedModel};
use floorplan_renderer::{
    Camera, ExportError, Frame, LightRig, MeshStore, RenderBackend, Scene, Skybox, export_glb,
};
use glam::{Vec2, Vec3};
use uuid::Uuid;

use crate::config::ViewerConfig;
use crate::drag_control::{DragControl, HitTargets, PointerView};
use crate::edge3d::Edge3d;
use crate::events::{DragEvent, ListenerId, ListenerRegistry, ViewerEvent, ViewerEventKind, route};
use crate::floor3d::Floor3d;
use crate::item3d::PhysicalItem;
use crate::mount::MountGeometry;
use crate::options::ViewerOptions;
use crate::orbit_controls::{OrbitControls, PointerButton};

/// Camera height after reframing a new floorplan (cm)
const REFRAME_HEIGHT: f32 = 300.0;

/// Smallest camera offset from the plan centre after reframing (cm)
const REFRAME_MIN_OFFSET: f32 = 500.0;

/// Pointer input in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Vec2, button: PointerButton },
    Move { position: Vec2 },
    Up { position: Vec2, button: PointerButton },
    /// Wheel steps; positive moves the camera closer
    Scroll { steps: f32 },
}

/// Viewport controller of the floorplan editor.
///
/// Owns the render backend, camera, controls and one 3D wrapper per item,
/// room floor and wall edge. Model and floorplan events queued on the
/// shared model are consumed by [`Viewer::tick`], which rebuilds the
/// affected wrappers and draws when something changed.
pub struct Viewer<R: RenderBackend> {
    model: SharedModel,
    options: ViewerOptions,
    backend: R,

    scene: Scene,
    meshes: MeshStore,
    camera: Camera,
    controls: OrbitControls,
    lights: LightRig,
    skybox: Skybox,
    drag_control: DragControl,

    items: Vec<PhysicalItem>,
    floors: Vec<Floor3d>,
    edges: Vec<Edge3d>,
    wall_planes: Vec<IntersectionPlane>,
    floor_planes: Vec<IntersectionPlane>,
    selected: Option<Uuid>,

    listeners: ListenerRegistry,
    enabled: bool,
    needs_update: bool,
    viewport: (u32, u32),
}

impl<R: RenderBackend> Viewer<R> {
    pub fn new(model: SharedModel, backend: R, options: ViewerOptions, geometry: MountGeometry) -> Self {
        let config = ViewerConfig {
            options,
            ..ViewerConfig::new()
        };
        Self::with_config(model, backend, &config, geometry)
    }

    /// Create a viewer with explicit control limits and options
    pub fn with_config(
        model: SharedModel,
        backend: R,
        config: &ViewerConfig,
        geometry: MountGeometry,
    ) -> Self {
        let mut camera = Camera::default();
        let mut controls = OrbitControls::new(&config.controls);
        controls.enable_pan = config.options.click_pan;
        controls.update(&mut camera);

        let mut viewer = Self {
            model,
            options: config.options.clone(),
            backend,
            scene: Scene::new(),
            meshes: MeshStore::new(),
            camera,
            controls,
            lights: LightRig::new(),
            skybox: Skybox::new(),
            drag_control: DragControl::new(config.options.can_move_fixed_items),
            items: Vec::new(),
            floors: Vec::new(),
            edges: Vec::new(),
            wall_planes: Vec::new(),
            floor_planes: Vec::new(),
            selected: None,
            listeners: ListenerRegistry::new(),
            enabled: true,
            needs_update: true,
            viewport: (1, 1),
        };
        viewer.update_window_size(geometry);

        tracing::info!(
            "Viewer created: {}x{} viewport",
            viewer.viewport.0,
            viewer.viewport.1
        );
        viewer
    }

    /// Apply changed options and control limits
    pub fn apply_config(&mut self, config: &ViewerConfig) {
        let target = self.controls.target;
        let enabled = self.controls.enabled;
        self.controls = OrbitControls::new(&config.controls);
        self.controls.target = target;
        self.controls.enabled = enabled;
        self.controls.enable_pan = config.options.click_pan;
        self.controls.update(&mut self.camera);

        self.drag_control
            .set_can_move_fixed_items(config.options.can_move_fixed_items);
        self.options = config.options.clone();
        self.needs_update = true;
    }

    // ========== Frame loop ==========

    /// Consume queued events, then draw if enabled and something changed.
    ///
    /// Returns true when a frame was drawn.
    pub fn tick(&mut self) -> bool {
        self.pump_events();

        if !self.enabled || !self.needs_update {
            return false;
        }
        self.draw();
        self.needs_update = false;
        true
    }

    /// Draw now, regardless of the dirty flag and the enabled state
    pub fn force_render(&mut self) {
        self.draw();
    }

    fn draw(&mut self) {
        self.backend.render(&Frame {
            scene: &self.scene,
            meshes: &self.meshes,
            camera: &self.camera,
            lights: &self.lights,
            skybox: &self.skybox,
        });
    }

    /// Recompute the viewport from the mount geometry
    pub fn update_window_size(&mut self, geometry: MountGeometry) {
        let (width, height) = geometry.viewport_size(self.options.resize);
        self.viewport = (width, height);
        self.camera.update_aspect(width as f32 / height as f32);
        self.backend.resize(width, height);
        self.needs_update = true;
    }

    // ========== Model synchronization ==========

    fn pump_events(&mut self) {
        let (model_events, floorplan_events) = self.model.write().drain_all_events();

        for event in floorplan_events {
            match event {
                FloorplanEvent::NewRoomsAdded => self.add_walls(),
            }
        }

        for event in model_events {
            match event {
                ModelEvent::NewItem(Some(item_id)) => self.add_new_item(item_id),
                ModelEvent::NewItem(None) => tracing::debug!("Ignoring new-item event without an item"),
                ModelEvent::Loaded => self.add_room_items(),
            }
        }
    }

    fn add_new_item(&mut self, item_id: Uuid) {
        let item = self.model.read().item(item_id).cloned();
        let Some(item) = item else {
            tracing::debug!("Ignoring new-item event for unknown item {}", item_id);
            return;
        };
        // A reload in the same tick may already have built the wrapper
        if self.wrapper(item_id).is_none() {
            self.items
                .push(PhysicalItem::new(&item, &mut self.scene, &mut self.meshes));
            self.needs_update = true;
        }
        self.apply_drag_event(DragEvent::ItemSelected { item_id });
    }

    /// Replace every item wrapper with one per model item
    fn add_room_items(&mut self) {
        for item in self.items.drain(..) {
            item.dispose(&mut self.scene, &mut self.meshes);
        }
        self.selected = None;
        self.drag_control.set_selected(None);
        self.drag_control.cancel();
        self.controls.enabled = self.enabled;

        let model = Arc::clone(&self.model);
        let model = model.read();
        for item in model.items() {
            self.items
                .push(PhysicalItem::new(item, &mut self.scene, &mut self.meshes));
        }
        drop(model);

        tracing::info!("Rebuilt {} items", self.items.len());
        self.needs_update = true;
    }

    /// Rebuild floors and wall edges, refit the lights and reframe the camera
    fn add_walls(&mut self) {
        for floor in self.floors.drain(..) {
            floor.dispose(&mut self.scene, &mut self.meshes);
        }
        for edge in self.edges.drain(..) {
            edge.dispose(&mut self.scene, &mut self.meshes);
        }

        let model = Arc::clone(&self.model);
        let model = model.read();
        let plan = model.floorplan();

        for edge in plan.wall_edges() {
            self.edges
                .push(Edge3d::new(&edge, &mut self.scene, &mut self.meshes));
        }
        for room in plan.rooms() {
            let polygon = plan.room_polygon(room);
            self.floors.push(Floor3d::new(
                room.id,
                room.name.as_deref(),
                &polygon,
                &mut self.scene,
                &mut self.meshes,
            ));
        }
        self.wall_planes = plan.wall_planes_for_intersection();
        self.floor_planes = plan.floor_planes_for_intersection();
        let dimensions = plan.dimensions();
        drop(model);

        let center = dimensions.center();
        let size = dimensions.size();
        self.lights.fit_to_floorplan(center, size);

        let offset = (center.z * 4.0)
            .max(size.x.max(size.z))
            .max(REFRAME_MIN_OFFSET);
        self.controls.target = center;
        self.camera.position = Vec3::new(center.x, REFRAME_HEIGHT, center.z + offset);
        self.camera.target = center;
        self.controls.update(&mut self.camera);

        tracing::info!(
            "Rebuilt {} floors and {} wall edges",
            self.floors.len(),
            self.edges.len()
        );
        self.needs_update = true;
    }

    // ========== Input ==========

    /// Feed pointer input to the drag controller, then to the orbit controls
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if !self.enabled {
            return;
        }
        let viewport = Vec2::new(self.viewport.0 as f32, self.viewport.1 as f32);
        let view = PointerView {
            camera: &self.camera,
            viewport,
        };

        match event {
            PointerEvent::Down { position, button } => {
                let events = if button == PointerButton::Primary {
                    let targets = HitTargets {
                        walls: &self.wall_planes,
                        floors: &self.floor_planes,
                        items: &self.items,
                        scene: &self.scene,
                        meshes: &self.meshes,
                    };
                    self.drag_control.pointer_down(position, view, targets)
                } else {
                    Vec::new()
                };
                self.apply_drag_events(events);
                if !self.drag_control.captures_pointer() {
                    self.controls.pointer_down(button, position);
                }
            }
            PointerEvent::Move { position } => {
                let events = self.drag_control.pointer_move(position, view);
                self.apply_drag_events(events);
                self.controls
                    .pointer_move(position, viewport.y, &self.camera);
            }
            PointerEvent::Up { position, button } => {
                let events = if button == PointerButton::Primary {
                    self.drag_control.pointer_up(position)
                } else {
                    Vec::new()
                };
                self.apply_drag_events(events);
                self.controls.pointer_up();
            }
            PointerEvent::Scroll { steps } => self.controls.scroll(steps),
        }

        if self.controls.update(&mut self.camera) {
            self.needs_update = true;
        }
    }

    fn apply_drag_events(&mut self, events: Vec<DragEvent>) {
        for event in events {
            self.apply_drag_event(event);
        }
    }

    /// Apply the state change of a drag event and re-dispatch it
    fn apply_drag_event(&mut self, event: DragEvent) {
        let Some(kind) = route(event.kind()) else {
            tracing::debug!("No route for {:?}", event.kind());
            return;
        };

        let outbound = match event {
            DragEvent::ItemSelected { item_id } => {
                self.select_item(item_id);
                let item = self
                    .model
                    .read()
                    .item(item_id)
                    .cloned()
                    .or_else(|| self.wrapper(item_id).map(|w| w.item().clone()));
                let Some(item) = item else {
                    tracing::debug!("Selected item {} is gone", item_id);
                    return;
                };
                ViewerEvent::ItemSelected {
                    item_id,
                    item: Box::new(item),
                }
            }
            DragEvent::ItemMove { item_id, position } => {
                self.controls.enabled = false;
                self.move_wrapper(item_id, position);
                ViewerEvent::ItemMove { item_id, position }
            }
            DragEvent::ItemMoveFinish { item_id, position } => {
                self.controls.enabled = self.enabled;
                self.move_wrapper(item_id, position);
                if !self.model.write().set_item_position(item_id, position) {
                    tracing::debug!("Moved item {} is not in the model", item_id);
                }
                ViewerEvent::ItemMoveFinish { item_id, position }
            }
            DragEvent::NoItemSelected => {
                self.controls.enabled = self.enabled;
                self.clear_selection();
                ViewerEvent::NoItemSelected
            }
            DragEvent::WallClicked { edge_id } => ViewerEvent::WallClicked {
                edge_id,
                wall_id: edge_id.wall_id,
            },
            DragEvent::RoomClicked { room_id } => ViewerEvent::RoomClicked { room_id },
        };

        debug_assert_eq!(outbound.kind(), kind);
        self.listeners.dispatch(&outbound);
    }

    fn wrapper(&self, item_id: Uuid) -> Option<&PhysicalItem> {
        self.items.iter().find(|i| i.item_id() == item_id)
    }

    fn move_wrapper(&mut self, item_id: Uuid, position: Vec3) {
        if let Some(item) = self.items.iter_mut().find(|i| i.item_id() == item_id) {
            item.set_position(position, &mut self.scene);
            self.needs_update = true;
        }
    }

    fn select_item(&mut self, item_id: Uuid) {
        if self.selected != Some(item_id) {
            self.clear_selection();
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.item_id() == item_id) {
            item.set_selected(true, &mut self.scene);
        }
        self.selected = Some(item_id);
        self.drag_control.set_selected(Some(item_id));
        self.needs_update = true;
        tracing::debug!("Selected item {}", item_id);
    }

    fn clear_selection(&mut self) {
        if let Some(previous) = self.selected.take() {
            if let Some(item) = self.items.iter_mut().find(|i| i.item_id() == previous) {
                item.set_selected(false, &mut self.scene);
            }
            tracing::debug!("Deselected item {}", previous);
        }
        self.drag_control.set_selected(None);
        self.needs_update = true;
    }

    // ========== Public controls ==========

    /// Pause or resume input and drawing
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.controls.enabled = enabled;
        if enabled {
            self.drag_control.activate();
        } else {
            self.drag_control.deactivate();
            self.controls.pointer_up();
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Serialize the scene as binary glTF and announce it
    pub fn export_scene(&mut self) -> Result<Vec<u8>, ExportError> {
        let glb = export_glb(&self.scene, &self.meshes)?;
        self.listeners
            .dispatch(&ViewerEvent::ExportReady { glb: glb.clone() });
        Ok(glb)
    }

    pub fn add_listener(
        &mut self,
        kind: ViewerEventKind,
        listener: impl FnMut(&ViewerEvent) + Send + 'static,
    ) -> ListenerId {
        self.listeners.add(kind, Box::new(listener))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    // ========== Accessors ==========

    pub fn model(&self) -> &SharedModel {
        &self.model
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn backend(&self) -> &R {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut R {
        &mut self.backend
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn meshes(&self) -> &MeshStore {
        &self.meshes
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn skybox(&self) -> &Skybox {
        &self.skybox
    }

    pub fn drag_control(&self) -> &DragControl {
        &self.drag_control
    }

    pub fn items(&self) -> &[PhysicalItem] {
        &self.items
    }

    pub fn floors(&self) -> &[Floor3d] {
        &self.floors
    }

    pub fn edges(&self) -> &[Edge3d] {
        &self.edges
    }

    pub fn selected_item(&self) -> Option<Uuid> {
        self.selected
    }

    /// Whether the next tick will draw
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Viewport size in pixels
    pub fn viewport_size(&self) -> (u32, u32) {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use approx::assert_relative_eq;
    use floorplan_core::{Item, Model};
    use floorplan_renderer::{HeadlessRenderer, ObjectKind};

    use crate::picking::{Ray, intersect_horizontal_plane};

    /// Two 400x300 rooms side by side: 6 corners, 7 walls
    fn two_room_model() -> SharedModel {
        let mut model = Model::new();
        let plan = model.floorplan_mut();
        let a = plan.add_corner(0.0, 0.0);
        let b = plan.add_corner(400.0, 0.0);
        let c = plan.add_corner(800.0, 0.0);
        let d = plan.add_corner(800.0, 300.0);
        let e = plan.add_corner(400.0, 300.0);
        let f = plan.add_corner(0.0, 300.0);
        for (s, t) in [(a, b), (b, c), (c, d), (d, e), (e, f), (f, a), (b, e)] {
            plan.add_wall(s, t).unwrap();
        }
        plan.add_room(Some("Living".into()), vec![a, b, e, f]).unwrap();
        plan.add_room(Some("Kitchen".into()), vec![b, c, d, e]).unwrap();
        model.into_shared()
    }

    fn viewer(model: SharedModel) -> Viewer<HeadlessRenderer> {
        Viewer::new(
            model,
            HeadlessRenderer::new(1, 1),
            ViewerOptions::default(),
            MountGeometry::fill(800.0, 600.0),
        )
    }

    fn record(viewer: &mut Viewer<HeadlessRenderer>, kinds: &[ViewerEventKind]) -> Arc<Mutex<Vec<ViewerEvent>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        for kind in kinds {
            let log = log.clone();
            viewer.add_listener(*kind, move |event| log.lock().unwrap().push(event.clone()));
        }
        log
    }

    fn screen(viewer: &Viewer<HeadlessRenderer>, point: Vec3) -> Vec2 {
        let (w, h) = viewer.viewport_size();
        let (x, y) = viewer
            .camera()
            .world_to_screen(point, w as f32, h as f32)
            .unwrap();
        Vec2::new(x, y)
    }

    #[test]
    fn test_construction_sizes_backend() {
        let geometry = MountGeometry {
            offset_top: 50.0,
            offset_left: 0.0,
            client_width: 640.0,
            client_height: 200.0,
            window_inner_height: 530.0,
        };
        let viewer = Viewer::new(
            Model::new().into_shared(),
            HeadlessRenderer::new(1, 1),
            ViewerOptions::default(),
            geometry,
        );
        assert_eq!(viewer.backend().size(), (640, 480));
        assert_relative_eq!(viewer.camera().aspect, 640.0 / 480.0);
        assert!(viewer.needs_update());
    }

    #[test]
    fn test_tick_draws_only_when_dirty() {
        let mut viewer = viewer(Model::new().into_shared());
        assert!(viewer.tick());
        assert!(!viewer.needs_update());
        assert!(!viewer.tick());
        assert_eq!(viewer.backend().frames_rendered(), 1);
    }

    #[test]
    fn test_loaded_then_new_item_is_selected() {
        let model = Model::new().into_shared();
        let mut viewer = viewer(model.clone());
        model
            .write()
            .load_items((0..3).map(|i| Item::new(format!("item-{i}"))).collect());
        viewer.tick();

        assert_eq!(viewer.items().len(), 3);
        assert_eq!(viewer.selected_item(), None);
        assert!(viewer.items().iter().all(|i| !i.is_selected()));

        let x = model.write().add_item(Item::new("X"));
        viewer.tick();
        assert_eq!(viewer.items().len(), 4);
        assert_eq!(viewer.selected_item(), Some(x));
        assert!(viewer.items().iter().find(|i| i.item_id() == x).unwrap().is_selected());
    }

    #[test]
    fn test_reload_replaces_wrappers() {
        let model = Model::new().into_shared();
        let mut viewer = viewer(model.clone());
        let first = model.write().add_item(Item::new("first"));
        viewer.tick();

        model.write().load_items(vec![Item::new("a"), Item::new("b")]);
        viewer.tick();
        assert_eq!(viewer.items().len(), 2);
        assert!(viewer.items().iter().all(|i| i.item_id() != first));
        assert_eq!(viewer.selected_item(), None);
        assert_eq!(viewer.scene().count_kind(ObjectKind::Item), 2);
    }

    #[test]
    fn test_same_tick_load_and_add_does_not_duplicate() {
        let model = Model::new().into_shared();
        let mut viewer = viewer(model.clone());
        let log = record(&mut viewer, &[ViewerEventKind::ItemSelected]);
        let b = {
            let mut model = model.write();
            model.load_items(vec![Item::new("a")]);
            model.add_item(Item::new("b"))
        };
        viewer.tick();
        assert_eq!(viewer.items().len(), 2);
        assert_eq!(viewer.selected_item(), Some(b));
        assert!(viewer.items().iter().find(|i| i.item_id() == b).unwrap().is_selected());

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert!(matches!(&log[0], ViewerEvent::ItemSelected { item_id, .. } if *item_id == b));
    }

    #[test]
    fn test_invalid_new_item_events_are_ignored() {
        let model = Model::new().into_shared();
        let mut viewer = viewer(model.clone());
        model.write().emit(ModelEvent::NewItem(None));
        model.write().emit(ModelEvent::NewItem(Some(Uuid::new_v4())));
        viewer.tick();
        assert!(viewer.items().is_empty());
        assert!(viewer.meshes().is_empty());
    }

    #[test]
    fn test_selecting_new_item_clears_previous_highlight() {
        let model = Model::new().into_shared();
        let mut viewer = viewer(model.clone());
        let a = model.write().add_item(Item::new("a"));
        viewer.tick();
        let b = model.write().add_item(Item::new("b"));
        viewer.tick();

        assert_eq!(viewer.selected_item(), Some(b));
        let highlighted: Vec<_> = viewer.items().iter().filter(|i| i.is_selected()).collect();
        assert_eq!(highlighted.len(), 1);
        assert_ne!(highlighted[0].item_id(), a);
        assert_eq!(viewer.scene().objects().filter(|o| o.selected).count(), 1);
    }

    #[test]
    fn test_rooms_changed_rebuilds_floors_and_edges() {
        let model = two_room_model();
        let mut viewer = viewer(model.clone());
        viewer.tick();

        assert_eq!(viewer.floors().len(), 2);
        assert_eq!(viewer.edges().len(), 14);
        assert_eq!(viewer.controls().target, Vec3::new(400.0, 0.0, 150.0));
        assert_eq!(viewer.camera().target, Vec3::new(400.0, 0.0, 150.0));
        assert!(viewer.camera().position.z > 150.0);

        let kitchen = model.read().floorplan().rooms()[1].id;
        model.write().floorplan_mut().remove_room(kitchen).unwrap();
        viewer.tick();
        assert_eq!(viewer.floors().len(), 1);
        assert_eq!(viewer.edges().len(), 14);
        assert_eq!(viewer.meshes().len(), 15);
        assert_eq!(viewer.scene().count_kind(ObjectKind::Floor), 1);
    }

    #[test]
    fn test_disposal_restores_mesh_store_size() {
        let model = two_room_model();
        let mut viewer = viewer(model.clone());
        viewer.tick();
        let baseline = viewer.meshes().len();

        model
            .write()
            .load_items(vec![Item::new("a"), Item::new("b"), Item::new("c")]);
        viewer.tick();
        assert_eq!(viewer.meshes().len(), baseline + 3);

        model.write().load_items(Vec::new());
        viewer.tick();
        assert_eq!(viewer.meshes().len(), baseline);
        assert_eq!(viewer.scene().len(), baseline);
    }

    #[test]
    fn test_new_item_notifies_listeners() {
        let model = Model::new().into_shared();
        let mut viewer = viewer(model.clone());
        let log = record(&mut viewer, &[ViewerEventKind::ItemSelected]);

        let id = model.write().add_item(Item::new("lamp"));
        viewer.tick();

        let log = log.lock().unwrap();
        let [ViewerEvent::ItemSelected { item_id, item }] = log.as_slice() else {
            panic!("expected one selection, got {log:?}");
        };
        assert_eq!(*item_id, id);
        assert_eq!(item.name, "lamp");
    }

    #[test]
    fn test_drag_moves_item_and_writes_model() {
        let model = two_room_model();
        let id = model
            .write()
            .add_item(Item::new("table").with_position(Vec3::new(200.0, 0.0, 150.0)));
        let mut viewer = viewer(model.clone());
        viewer.tick();
        let log = record(
            &mut viewer,
            &[
                ViewerEventKind::ItemSelected,
                ViewerEventKind::ItemMove,
                ViewerEventKind::ItemMoveFinish,
            ],
        );

        let down = screen(&viewer, Vec3::new(200.0, 80.0, 150.0));
        viewer.handle_pointer(PointerEvent::Down {
            position: down,
            button: PointerButton::Primary,
        });
        assert!(viewer.drag_control().is_dragging());

        let (w, h) = viewer.viewport_size();
        let ray = Ray::from_screen(viewer.camera(), down, Vec2::new(w as f32, h as f32));
        let grabbed = intersect_horizontal_plane(&ray, 0.0).unwrap();
        let target = screen(&viewer, grabbed + Vec3::new(100.0, 0.0, 0.0));

        viewer.handle_pointer(PointerEvent::Move { position: target });
        assert!(!viewer.controls().enabled);

        viewer.handle_pointer(PointerEvent::Up {
            position: target,
            button: PointerButton::Primary,
        });
        assert!(viewer.controls().enabled);

        let kinds: Vec<_> = log.lock().unwrap().iter().map(ViewerEvent::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ViewerEventKind::ItemSelected,
                ViewerEventKind::ItemMove,
                ViewerEventKind::ItemMoveFinish
            ]
        );

        let moved = model.read().item(id).unwrap().position;
        assert_relative_eq!(moved.x, 300.0, epsilon = 1.0);
        assert_relative_eq!(moved.z, 150.0, epsilon = 1.0);
        assert_eq!(viewer.items()[0].position(), moved);
        assert!(viewer.needs_update());
    }

    #[test]
    fn test_reload_abandons_drag_in_progress() {
        let model = two_room_model();
        let id = model
            .write()
            .add_item(Item::new("table").with_position(Vec3::new(200.0, 0.0, 150.0)));
        let mut viewer = viewer(model.clone());
        viewer.tick();

        let down = screen(&viewer, Vec3::new(200.0, 80.0, 150.0));
        viewer.handle_pointer(PointerEvent::Down {
            position: down,
            button: PointerButton::Primary,
        });
        viewer.handle_pointer(PointerEvent::Move {
            position: down + Vec2::new(30.0, 0.0),
        });
        assert!(viewer.drag_control().is_dragging());
        assert!(!viewer.controls().enabled);

        model.write().load_items(vec![Item::new("other")]);
        viewer.tick();
        assert!(!viewer.drag_control().is_dragging());
        assert!(viewer.controls().enabled);

        let log = record(
            &mut viewer,
            &[ViewerEventKind::ItemMove, ViewerEventKind::ItemMoveFinish],
        );
        let release = down + Vec2::new(60.0, 0.0);
        viewer.handle_pointer(PointerEvent::Move { position: release });
        viewer.handle_pointer(PointerEvent::Up {
            position: release,
            button: PointerButton::Primary,
        });

        assert!(log.lock().unwrap().is_empty());
        assert!(viewer.items().iter().all(|i| i.item_id() != id));
        assert_eq!(viewer.items()[0].item().name, "other");
    }

    #[test]
    fn test_click_on_empty_space_deselects() {
        let model = Model::new().into_shared();
        let mut viewer = viewer(model.clone());
        model.write().add_item(Item::new("far").with_position(Vec3::new(5000.0, 0.0, 5000.0)));
        viewer.tick();
        let log = record(&mut viewer, &[ViewerEventKind::NoItemSelected]);

        let sky = Vec2::new(400.0, 5.0);
        viewer.handle_pointer(PointerEvent::Down {
            position: sky,
            button: PointerButton::Primary,
        });
        viewer.handle_pointer(PointerEvent::Up {
            position: sky,
            button: PointerButton::Primary,
        });

        assert_eq!(viewer.selected_item(), None);
        assert!(viewer.items().iter().all(|i| !i.is_selected()));
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_orbit_drag_marks_dirty() {
        let mut viewer = viewer(two_room_model());
        viewer.tick();
        assert!(!viewer.needs_update());

        viewer.handle_pointer(PointerEvent::Down {
            position: Vec2::new(400.0, 5.0),
            button: PointerButton::Secondary,
        });
        viewer.handle_pointer(PointerEvent::Move {
            position: Vec2::new(450.0, 5.0),
        });
        assert!(viewer.needs_update());
        assert_ne!(viewer.controls().target, Vec3::new(400.0, 0.0, 150.0));
    }

    #[test]
    fn test_disable_then_enable_restores_input() {
        let mut viewer = viewer(two_room_model());
        viewer.tick();

        viewer.set_enabled(false);
        assert!(!viewer.enabled());
        assert!(!viewer.controls().enabled);
        assert!(!viewer.drag_control().is_active());

        viewer.handle_pointer(PointerEvent::Scroll { steps: 3.0 });
        assert!(!viewer.needs_update());
        viewer.update_window_size(MountGeometry::fill(400.0, 300.0));
        assert!(!viewer.tick());

        viewer.set_enabled(true);
        assert!(viewer.controls().enabled);
        assert!(viewer.drag_control().is_active());
        assert!(viewer.tick());
    }

    #[test]
    fn test_force_render_ignores_enabled() {
        let mut viewer = viewer(Model::new().into_shared());
        viewer.tick();
        viewer.set_enabled(false);
        viewer.force_render();
        assert_eq!(viewer.backend().frames_rendered(), 2);
    }

    #[test]
    fn test_resize_updates_camera_and_backend() {
        let mut viewer = viewer(Model::new().into_shared());
        viewer.tick();
        viewer.update_window_size(MountGeometry::fill(1000.0, 500.0));
        assert_eq!(viewer.backend().size(), (1000, 500));
        assert_relative_eq!(viewer.camera().aspect, 2.0);
        assert!(viewer.needs_update());
    }

    #[test]
    fn test_export_dispatches_payload() {
        let mut viewer = viewer(two_room_model());
        assert!(matches!(viewer.export_scene(), Err(ExportError::EmptyScene)));

        viewer.tick();
        let log = record(&mut viewer, &[ViewerEventKind::ExportReady]);
        let glb = viewer.export_scene().unwrap();
        assert_eq!(&glb[0..4], b"glTF");

        let log = log.lock().unwrap();
        let [ViewerEvent::ExportReady { glb: sent }] = log.as_slice() else {
            panic!("expected one export event");
        };
        assert_eq!(sent, &glb);
    }

    #[test]
    fn test_removed_listener_is_not_called() {
        let model = Model::new().into_shared();
        let mut viewer = viewer(model.clone());
        let log = Arc::new(Mutex::new(0));
        let counter = log.clone();
        let id = viewer.add_listener(ViewerEventKind::ItemSelected, move |_| {
            *counter.lock().unwrap() += 1;
        });
        assert!(viewer.remove_listener(id));

        model.write().add_item(Item::new("chair"));
        viewer.tick();
        assert_eq!(*log.lock().unwrap(), 0);
    }
}
