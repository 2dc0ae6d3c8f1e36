//! Menu bar rendering

use std::path::PathBuf;

/// Actions triggered from the menu bar
#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    OpenDesign(PathBuf),
    SaveDesign(PathBuf),
    ExportGlb(PathBuf),
    AddItem,
    AddItemFromMesh(PathBuf),
    LoadDemo,
    SetEnabled(bool),
    SetMoveFixedItems(bool),
    SetClickPan(bool),
    SetShowSky(bool),
    ResetSettings,
}

/// Current toggle states shown in the View menu
#[derive(Debug, Clone, Copy)]
pub struct MenuState {
    pub enabled: bool,
    pub can_move_fixed_items: bool,
    pub click_pan: bool,
    pub show_sky: bool,
}

/// Render the menu bar and return any triggered action
pub fn render_menu_bar(ctx: &egui::Context, state: MenuState) -> Option<MenuAction> {
    let mut menu_action = None;

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Design...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Floorplan design", &["json"])
                        .pick_file()
                    {
                        menu_action = Some(MenuAction::OpenDesign(path));
                    }
                    ui.close_menu();
                }
                if ui.button("Save Design As...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Floorplan design", &["json"])
                        .set_file_name("design.json")
                        .save_file()
                    {
                        menu_action = Some(MenuAction::SaveDesign(path));
                    }
                    ui.close_menu();
                }
                if ui.button("Load Demo").clicked() {
                    menu_action = Some(MenuAction::LoadDemo);
                    ui.close_menu();
                }

                ui.separator();

                if ui.button("Export Scene (GLB)...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("glTF binary", &["glb"])
                        .set_file_name("scene.glb")
                        .save_file()
                    {
                        menu_action = Some(MenuAction::ExportGlb(path));
                    }
                    ui.close_menu();
                }

                ui.separator();

                if ui.button("Exit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    ui.close_menu();
                }
            });

            ui.menu_button("Items", |ui| {
                if ui.button("Add Box Item").clicked() {
                    menu_action = Some(MenuAction::AddItem);
                    ui.close_menu();
                }
                if ui.button("Add Item From Mesh...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Mesh", &["stl", "obj"])
                        .pick_file()
                    {
                        menu_action = Some(MenuAction::AddItemFromMesh(path));
                    }
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                let mut enabled = state.enabled;
                if ui.checkbox(&mut enabled, "Interactive").changed() {
                    menu_action = Some(MenuAction::SetEnabled(enabled));
                }
                let mut move_fixed = state.can_move_fixed_items;
                if ui.checkbox(&mut move_fixed, "Move fixed items").changed() {
                    menu_action = Some(MenuAction::SetMoveFixedItems(move_fixed));
                }
                let mut click_pan = state.click_pan;
                if ui.checkbox(&mut click_pan, "Right-drag pans").changed() {
                    menu_action = Some(MenuAction::SetClickPan(click_pan));
                }
                let mut show_sky = state.show_sky;
                if ui.checkbox(&mut show_sky, "Sky").changed() {
                    menu_action = Some(MenuAction::SetShowSky(show_sky));
                }

                ui.separator();

                if ui.button("Reset Settings").clicked() {
                    menu_action = Some(MenuAction::ResetSettings);
                    ui.close_menu();
                }
            });
        });
    });

    menu_action
}
