//! Main application

use std::path::Path;
use std::sync::Arc;

use floorplan_core::{Item, Model, SharedModel, load_item_mesh};
use floorplan_renderer::{RendererError, WgpuRenderer};
use floorplan_viewer::{
    MountGeometry, PointerButton, PointerEvent, SharedConfig, Viewer, ViewerConfig, ViewerEvent,
    ViewerEventKind, create_shared_config,
};
use glam::{Vec2, Vec3};
use parking_lot::Mutex;

use crate::demo::demo_model;
use crate::menu::{MenuAction, MenuState, render_menu_bar};
use crate::viewport_state::ViewportState;

/// Scroll distance (points) counted as one wheel step
const SCROLL_STEP: f32 = 50.0;

/// Initial renderer size before the first layout pass
const INITIAL_SIZE: (u32, u32) = (800, 600);

/// Listener events waiting to be shown in the status bar
type EventInbox = Arc<Mutex<Vec<ViewerEvent>>>;

/// Main application state
pub struct FloorplanApp {
    model: SharedModel,
    viewer: Option<Viewer<WgpuRenderer>>,
    render_state: Option<egui_wgpu::RenderState>,
    viewport: ViewportState,
    config: SharedConfig,
    inbox: EventInbox,
    status: String,
    geometry: Option<MountGeometry>,
}

impl FloorplanApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = create_shared_config();
        let model = match demo_model() {
            Ok(model) => model,
            Err(e) => {
                tracing::warn!("Demo design unavailable: {}", e);
                Model::new()
            }
        }
        .into_shared();

        let inbox = EventInbox::default();
        let render_state = cc.wgpu_render_state.clone();

        let (viewer, status) = match render_state.as_ref() {
            Some(render_state) => {
                match create_viewer(model.clone(), render_state, &config, &inbox) {
                    Ok(viewer) => (Some(viewer), "Ready".to_string()),
                    Err(e) => {
                        tracing::error!("Failed to create 3D renderer: {}", e);
                        (None, format!("3D renderer unavailable: {}", e))
                    }
                }
            }
            None => {
                tracing::error!("wgpu render state not available");
                (None, "wgpu render state not available".to_string())
            }
        };

        Self {
            model,
            viewer,
            render_state,
            viewport: ViewportState::new(),
            config,
            inbox,
            status,
            geometry: None,
        }
    }

    fn menu_state(&self) -> MenuState {
        let config = self.config.read();
        MenuState {
            enabled: self.viewer.as_ref().is_some_and(|v| v.enabled()),
            can_move_fixed_items: config.config().options.can_move_fixed_items,
            click_pan: config.config().options.click_pan,
            show_sky: config.config().renderer.show_sky,
        }
    }

    fn handle_action(&mut self, action: MenuAction) {
        match action {
            MenuAction::OpenDesign(path) => {
                let result = self.model.write().load_design_file(&path);
                self.status = match result {
                    Ok(()) => format!("Opened {}", path.display()),
                    Err(e) => format!("Failed to open {}: {}", path.display(), e),
                };
            }
            MenuAction::SaveDesign(path) => {
                let result = self.model.read().save_design_file(&path);
                self.status = match result {
                    Ok(()) => format!("Saved {}", path.display()),
                    Err(e) => format!("Failed to save {}: {}", path.display(), e),
                };
            }
            MenuAction::ExportGlb(path) => self.export_glb(&path),
            MenuAction::AddItem => {
                let mut model = self.model.write();
                let name = format!("Item {}", model.items().len() + 1);
                let position = floor_center(&model);
                model.add_item(Item::new(name).with_position(position));
            }
            MenuAction::AddItemFromMesh(path) => self.add_mesh_item(&path),
            MenuAction::LoadDemo => {
                let json = demo_model()
                    .map_err(|e| e.to_string())
                    .and_then(|demo| demo.save_design().map_err(|e| e.to_string()));
                let result = json.and_then(|json| {
                    self.model.write().load_design(&json).map_err(|e| e.to_string())
                });
                self.status = match result {
                    Ok(()) => "Loaded demo design".to_string(),
                    Err(e) => format!("Failed to load demo: {}", e),
                };
            }
            MenuAction::SetEnabled(enabled) => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.set_enabled(enabled);
                }
            }
            MenuAction::SetMoveFixedItems(value) => {
                self.update_config(|config| config.options.can_move_fixed_items = value);
            }
            MenuAction::SetClickPan(value) => {
                self.update_config(|config| config.options.click_pan = value);
            }
            MenuAction::SetShowSky(value) => {
                self.update_config(|config| config.renderer.show_sky = value);
            }
            MenuAction::ResetSettings => {
                self.update_config(|config| *config = ViewerConfig::new());
            }
        }
    }

    /// Change the persisted settings, push them to the viewer and save
    fn update_config(&mut self, change: impl FnOnce(&mut ViewerConfig)) {
        let mut config = self.config.write();
        let previous_renderer = config.config().renderer.clone();
        change(config.config_mut());

        if let Some(viewer) = &mut self.viewer {
            let renderer = &config.config().renderer;
            if *renderer != previous_renderer {
                viewer.backend_mut().set_config(renderer.clone());
            }
            viewer.apply_config(config.config());
        }
        if let Err(e) = config.save() {
            tracing::warn!("Failed to save settings: {}", e);
            self.status = format!("Failed to save settings: {}", e);
        }
    }

    fn export_glb(&mut self, path: &Path) {
        let Some(viewer) = &mut self.viewer else {
            self.status = "Nothing to export".to_string();
            return;
        };
        let result = viewer
            .export_scene()
            .map_err(|e| e.to_string())
            .and_then(|glb| std::fs::write(path, glb).map_err(|e| e.to_string()));

        if let Err(e) = result {
            tracing::error!("Export failed: {}", e);
            self.status = format!("Export failed: {}", e);
        } else {
            tracing::info!("Exported scene to {:?}", path);
        }
    }

    fn add_mesh_item(&mut self, path: &Path) {
        match load_item_mesh(path) {
            Ok(mesh) => {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "Mesh item".to_string());
                let mut model = self.model.write();
                let mut item = Item::new(name)
                    .with_position(floor_center(&model))
                    .with_mesh(mesh);
                item.mesh_path = Some(path.to_string_lossy().into_owned());
                model.add_item(item);
            }
            Err(e) => {
                tracing::warn!("Failed to load mesh {:?}: {}", path, e);
                self.status = format!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    /// Move listener events into the status line
    fn drain_inbox(&mut self) {
        let events = std::mem::take(&mut *self.inbox.lock());
        if let Some(event) = events.last() {
            self.status = describe_event(event, &self.model.read());
        }
    }

    fn render_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status);
                if let Some(viewer) = &self.viewer {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let (w, h) = viewer.viewport_size();
                        ui.label(format!("{} items | {}x{}", viewer.items().len(), w, h));
                    });
                }
            });
        });
    }

    fn render_items_panel(&self, ctx: &egui::Context) {
        let selected = self.viewer.as_ref().and_then(|v| v.selected_item());

        egui::SidePanel::left("items_panel")
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.heading("Items");
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let model = self.model.read();
                    for item in model.items() {
                        let mut text = egui::RichText::new(&item.name);
                        if Some(item.id) == selected {
                            text = text.strong();
                        }
                        ui.label(text);
                        ui.label(
                            egui::RichText::new(format!(
                                "({:.0}, {:.0}){}",
                                item.position.x,
                                item.position.z,
                                if item.fixed { " fixed" } else { "" }
                            ))
                            .small()
                            .weak(),
                        );
                    }
                });
            });
    }

    fn render_viewport(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let rect = ui.available_rect_before_wrap();
                let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

                let (Some(viewer), Some(render_state)) = (&mut self.viewer, &self.render_state)
                else {
                    ui.centered_and_justified(|ui| ui.label(&self.status));
                    return;
                };

                let pixels_per_point = ctx.pixels_per_point();
                let geometry = mount_geometry(rect, pixels_per_point);
                if self.geometry != Some(geometry) {
                    viewer.update_window_size(geometry);
                    self.geometry = Some(geometry);
                }

                for event in collect_pointer_events(ctx, rect, response.hovered(), pixels_per_point)
                {
                    viewer.handle_pointer(event);
                }

                viewer.tick();

                let texture_id = self.viewport.ensure_texture(viewer.backend(), render_state);
                ui.painter().image(
                    texture_id,
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );

                if viewer.enabled() && viewer.needs_update() {
                    ctx.request_repaint();
                }
            });
    }
}

impl eframe::App for FloorplanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(action) = render_menu_bar(ctx, self.menu_state()) {
            self.handle_action(action);
        }

        self.drain_inbox();
        self.render_status_bar(ctx);
        self.render_items_panel(ctx);
        self.render_viewport(ctx);
    }
}

impl Drop for FloorplanApp {
    fn drop(&mut self) {
        if let Some(render_state) = &self.render_state {
            self.viewport.release(render_state);
        }
    }
}

fn create_viewer(
    model: SharedModel,
    render_state: &egui_wgpu::RenderState,
    config: &SharedConfig,
    inbox: &EventInbox,
) -> Result<Viewer<WgpuRenderer>, RendererError> {
    let config = config.read().config().clone();
    let backend = WgpuRenderer::new(
        render_state.device.clone(),
        render_state.queue.clone(),
        render_state.target_format,
        INITIAL_SIZE.0,
        INITIAL_SIZE.1,
        config.renderer.clone(),
    )?;

    let mut viewer = Viewer::with_config(
        model,
        backend,
        &config,
        MountGeometry::fill(INITIAL_SIZE.0 as f32, INITIAL_SIZE.1 as f32),
    );

    for kind in [
        ViewerEventKind::ItemSelected,
        ViewerEventKind::ItemMoveFinish,
        ViewerEventKind::NoItemSelected,
        ViewerEventKind::WallClicked,
        ViewerEventKind::RoomClicked,
        ViewerEventKind::ExportReady,
    ] {
        let inbox = inbox.clone();
        viewer.add_listener(kind, move |event| inbox.lock().push(event.clone()));
    }

    Ok(viewer)
}

/// Viewer mount geometry of a panel rect, in physical pixels.
///
/// The panel bottom acts as the window bottom so that resizing to the
/// window fills exactly the panel.
fn mount_geometry(rect: egui::Rect, pixels_per_point: f32) -> MountGeometry {
    MountGeometry {
        offset_top: rect.top() * pixels_per_point,
        offset_left: rect.left() * pixels_per_point,
        client_width: rect.width() * pixels_per_point,
        client_height: rect.height() * pixels_per_point,
        window_inner_height: rect.bottom() * pixels_per_point,
    }
}

fn map_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Translate this frame's egui input into viewport pointer events
fn collect_pointer_events(
    ctx: &egui::Context,
    rect: egui::Rect,
    hovered: bool,
    pixels_per_point: f32,
) -> Vec<PointerEvent> {
    let to_viewport = |pos: egui::Pos2| {
        let local = pos - rect.min;
        Vec2::new(local.x, local.y) * pixels_per_point
    };

    ctx.input(|input| {
        let mut events = Vec::new();
        for event in &input.events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => {
                    let Some(button) = map_button(*button) else {
                        continue;
                    };
                    let position = to_viewport(*pos);
                    if !*pressed {
                        events.push(PointerEvent::Up { position, button });
                    } else if rect.contains(*pos) {
                        events.push(PointerEvent::Down { position, button });
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    events.push(PointerEvent::Move {
                        position: to_viewport(*pos),
                    });
                }
                _ => {}
            }
        }

        if hovered && input.raw_scroll_delta.y != 0.0 {
            events.push(PointerEvent::Scroll {
                steps: input.raw_scroll_delta.y / SCROLL_STEP,
            });
        }
        events
    })
}

/// Spawn point for new items: centre of the plan on the floor
fn floor_center(model: &Model) -> Vec3 {
    let center = model.floorplan().dimensions().center();
    Vec3::new(center.x, 0.0, center.z)
}

/// Status line text for a listener event
fn describe_event(event: &ViewerEvent, model: &Model) -> String {
    match event {
        ViewerEvent::ItemSelected { item, .. } => format!("Selected {}", item.name),
        ViewerEvent::ItemMove { position, .. } | ViewerEvent::ItemMoveFinish { position, .. } => {
            format!("Moved to ({:.0}, {:.0})", position.x, position.z)
        }
        ViewerEvent::NoItemSelected => "Selection cleared".to_string(),
        ViewerEvent::WallClicked { wall_id, .. } => {
            let length = model
                .floorplan()
                .wall(*wall_id)
                .and_then(|wall| model.floorplan().wall_endpoints(wall))
                .map(|(start, end)| start.distance(end));
            match length {
                Some(length) => format!("Wall clicked ({:.0} cm)", length),
                None => "Wall clicked".to_string(),
            }
        }
        ViewerEvent::RoomClicked { room_id } => {
            match model.floorplan().room(*room_id).and_then(|r| r.name.as_deref()) {
                Some(name) => format!("Room clicked: {}", name),
                None => "Room clicked".to_string(),
            }
        }
        ViewerEvent::ExportReady { glb } => format!("Exported scene ({} bytes)", glb.len()),
    }
}
