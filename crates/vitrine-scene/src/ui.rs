//! Control panel, stats overlay and asset notifications using bevy_egui

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use std::collections::HashMap;

use vitrine_core::panel::{self, Binding};
use vitrine_core::settings::{Control, Rgb};
use vitrine_core::{AssetSlot, SettingPath, Settings, Value, FOLDERS};

use crate::loader::PendingLoads;
use crate::types::{Notifications, PendingEffects, UiLayout, ViewerSettings};

/// Edit buffers for text fields; a field is only committed on Enter or
/// focus loss
#[derive(Resource, Default)]
pub struct PanelDrafts(HashMap<SettingPath, String>);

/// Grouped system parameters for the panel system
#[derive(SystemParam)]
pub struct UiParams<'w, 's> {
    pub contexts: EguiContexts<'w, 's>,
    pub settings: ResMut<'w, ViewerSettings>,
    pub effects: ResMut<'w, PendingEffects>,
    pub drafts: ResMut<'w, PanelDrafts>,
    pub notifications: ResMut<'w, Notifications>,
    pub pending: Res<'w, PendingLoads>,
    pub ui_layout: ResMut<'w, UiLayout>,
    pub diagnostics: Res<'w, DiagnosticsStore>,
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PanelDrafts>()
            .add_systems(Update, update_ui_layout)
            // Panel runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
            .add_systems(EguiPrimaryContextPass, panel_system);
    }
}

fn update_ui_layout(windows: Query<&Window>, mut ui_layout: ResMut<UiLayout>) {
    if let Ok(window) = windows.single() {
        let width = window.width();
        let height = window.height();

        // Only update if dimensions changed significantly
        if (ui_layout.screen_width - width).abs() > 1.0 || (ui_layout.screen_height - height).abs() > 1.0 {
            ui_layout.update_for_screen(width, height);
        }
    }
}

/// Value committed when a text field finishes editing.
///
/// Unchanged text still commits, so Enter re-triggers a failed or replaced load.
fn finish_edit(draft: &str, lost_focus: bool) -> Option<Value> {
    lost_focus.then(|| Value::Text(draft.to_string()))
}

/// Draw the widget for one binding, returning a value to commit
fn control_widget(
    ui: &mut egui::Ui,
    settings: &Settings,
    drafts: &mut PanelDrafts,
    binding: &Binding,
) -> Option<Value> {
    let current = settings.get(binding.path);

    match binding.path.control() {
        Control::Slider { min, max, step } => {
            let mut value = current.as_number().unwrap_or(min);
            let response = ui.add(
                egui::Slider::new(&mut value, min..=max)
                    .step_by(step as f64)
                    .text(binding.label),
            );
            response.changed().then_some(Value::Number(value))
        }
        Control::Toggle => {
            let mut value = current.as_bool().unwrap_or(false);
            ui.checkbox(&mut value, binding.label)
                .changed()
                .then_some(Value::Bool(value))
        }
        Control::Choice(options) => {
            let selected = current.as_text().unwrap_or_default().to_string();
            let mut choice = None;
            ui.horizontal(|ui| {
                egui::ComboBox::from_id_salt(binding.path.key())
                    .selected_text(selected.as_str())
                    .show_ui(ui, |ui| {
                        // Re-picking the current option rebuilds too, which clears a texture
                        for option in options.iter() {
                            if ui.selectable_label(selected == *option, *option).clicked() {
                                choice = Some(Value::Text(option.to_string()));
                            }
                        }
                    });
                ui.label(binding.label);
            });
            choice
        }
        Control::Text => {
            let draft = drafts
                .0
                .entry(binding.path)
                .or_insert_with(|| current.as_text().unwrap_or_default().to_string());
            let mut commit = None;
            ui.horizontal(|ui| {
                ui.label(binding.label);
                let response = ui.add(egui::TextEdit::singleline(draft).desired_width(160.0));
                commit = finish_edit(draft, response.lost_focus());
            });
            commit
        }
        Control::Color => {
            let mut rgb = current
                .as_text()
                .and_then(Rgb::from_hex)
                .unwrap_or(Rgb::WHITE)
                .to_array();
            let mut changed = false;
            ui.horizontal(|ui| {
                changed = ui.color_edit_button_srgb(&mut rgb).changed();
                ui.label(binding.label);
            });
            changed.then(|| Value::Text(Rgb::from_array(rgb).to_hex()))
        }
    }
}

fn panel_system(mut params: UiParams) {
    let is_mobile = params.ui_layout.is_mobile;
    let panel_width = params.ui_layout.panel_width();

    // Get the egui context - early return if not available
    let Ok(ctx) = params.contexts.ctx_mut() else { return };

    if is_mobile {
        egui::TopBottomPanel::bottom("mobile_toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let menu_text = if params.ui_layout.show_panel { "☰ Controls" } else { "☰" };
                if ui.button(menu_text).clicked() {
                    params.ui_layout.show_panel = !params.ui_layout.show_panel;
                }
                ui.checkbox(&mut params.ui_layout.show_stats, "Stats");
            });
        });
    }

    let mut commits = Vec::new();

    if params.ui_layout.show_panel {
        egui::SidePanel::right("controls_panel")
            .default_width(panel_width)
            .resizable(!is_mobile)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Controls");
                    let loading = params.pending.is_loading(AssetSlot::Geometry)
                        || params.pending.is_loading(AssetSlot::Material);
                    if loading {
                        ui.spinner();
                    }
                });
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    for folder in FOLDERS {
                        egui::CollapsingHeader::new(folder.title)
                            .default_open(true)
                            .show(ui, |ui| {
                                for binding in folder.bindings {
                                    if let Some(value) =
                                        control_widget(ui, &params.settings, &mut params.drafts, binding)
                                    {
                                        commits.push((binding.path, value));
                                    }
                                    if binding.path == SettingPath::LightPower {
                                        ui.label(
                                            egui::RichText::new(format!(
                                                "intensity {:.2}",
                                                params.settings.light.intensity()
                                            ))
                                            .small()
                                            .color(egui::Color32::GRAY),
                                        );
                                    }
                                }
                            });
                    }

                    if !params.notifications.entries.is_empty() {
                        ui.separator();
                        ui.label(egui::RichText::new("Asset errors").strong());
                        for error in &params.notifications.entries {
                            ui.label(
                                egui::RichText::new(error.to_string())
                                    .small()
                                    .color(egui::Color32::from_rgb(255, 100, 100)),
                            );
                        }
                        if ui.small_button("Clear").clicked() {
                            params.notifications.clear();
                        }
                    }
                });
            });
    }

    if params.ui_layout.show_stats {
        let fps = params
            .diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FPS)
            .and_then(|d| d.smoothed());
        let frame_time = params
            .diagnostics
            .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
            .and_then(|d| d.smoothed());

        egui::Area::new(egui::Id::new("stats_overlay"))
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(8.0, 8.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(match fps {
                        Some(fps) => format!("{:.0} FPS", fps),
                        None => "-- FPS".to_string(),
                    });
                    if let Some(ms) = frame_time {
                        ui.label(egui::RichText::new(format!("{:.1} ms", ms)).small().color(egui::Color32::GRAY));
                    }
                });
            });
    }

    for (path, value) in commits {
        match panel::commit(&mut params.settings.0, path, value) {
            Ok(effect) => params.effects.push(effect),
            Err(e) => tracing::warn!("Rejected {}: {}", path, e),
        }
        // Re-read text fields so the draft shows what was stored
        if path.control() == Control::Text {
            params.drafts.0.remove(&path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::Effect;

    #[test]
    fn test_drafts_start_from_settings() {
        let settings = Settings::default();
        let mut drafts = PanelDrafts::default();
        let binding = panel::binding(SettingPath::BonusText).unwrap();

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                assert!(control_widget(ui, &settings, &mut drafts, binding).is_none());
            });
        });

        assert_eq!(drafts.0.get(&SettingPath::BonusText), Some(&settings.bonus.text));
    }

    #[test]
    fn test_unchanged_texture_url_reloads_on_enter() {
        let mut settings = Settings::default();
        panel::commit(&mut settings, SettingPath::GeometryTextureUrl, Value::Text("img/pink.jpg".into())).unwrap();
        panel::commit(&mut settings, SettingPath::GeometryMaterial, Value::Text("solid".into())).unwrap();

        // Same URL entered again
        let value = finish_edit(&settings.geometry.texture_url.clone(), true).unwrap();
        let effect = panel::commit(&mut settings, SettingPath::GeometryTextureUrl, value).unwrap();
        assert_eq!(effect, Effect::LoadTexture);

        let mut effects = PendingEffects::default();
        effects.push(effect);
        assert_eq!(effects.0, vec![Effect::LoadTexture]);
    }

    #[test]
    fn test_focus_kept_commits_nothing() {
        assert!(finish_edit("Hello", false).is_none());
    }

    #[test]
    fn test_reselecting_material_rebuilds() {
        let mut settings = Settings::default();
        let current = settings.get(SettingPath::GeometryMaterial);
        let effect = panel::commit(&mut settings, SettingPath::GeometryMaterial, current).unwrap();
        assert_eq!(effect, Effect::RebuildMaterial);
    }

    #[test]
    fn test_untouched_widgets_commit_nothing() {
        let settings = Settings::default();
        let mut drafts = PanelDrafts::default();

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                for folder in FOLDERS {
                    for binding in folder.bindings {
                        assert!(control_widget(ui, &settings, &mut drafts, binding).is_none());
                    }
                }
            });
        });
    }
}
