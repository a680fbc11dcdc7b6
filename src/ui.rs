// src/ui.rs
use glam::Vec3;
use haunted_walkthrough::engine_lib::movement::MovementPermissions;

pub struct HudState {
    pub variant: &'static str,
    pub position: Vec3,
    pub permissions: MovementPermissions,
    pub cursor_grabbed: bool,
}

fn gate_label(free: bool) -> &'static str {
    if free { "free" } else { "blocked" }
}

pub fn build_ui(ctx: &egui::Context, hud: &HudState) {
    egui::Window::new("Walkthrough")
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(10.0, 10.0))
        .resizable(false)
        .show(ctx, |ui| {
            ui.vertical(|ui| {
                ui.label(format!("Scene: {}", hud.variant));
                ui.label(format!(
                    "Position: ({:.2}, {:.2}, {:.2})",
                    hud.position.x, hud.position.y, hud.position.z
                ));
                ui.separator();

                egui::Grid::new("permissions").num_columns(2).show(ui, |ui| {
                    let p = &hud.permissions;
                    for (name, free) in [("Forward", p.forward), ("Backward", p.backward), ("Left", p.left), ("Right", p.right)] {
                        ui.label(name);
                        ui.label(gate_label(free));
                        ui.end_row();
                    }
                });
                ui.separator();

                ui.label("🎮 Controls:");
                ui.label("   W/A/S/D: Walk");
                ui.label("   Mouse (when grabbed): Look");
                ui.label("   Scroll: Zoom");
                ui.label("   M: Pause/Resume Music");
                if hud.cursor_grabbed {
                    ui.label("   Escape: Release Mouse Cursor");
                } else {
                    ui.label("   Escape or Click: Grab Mouse Cursor");
                }
            });
        });
}
