use std::path::Path;

use eframe::egui::{self, Align, Context, Layout};

use crate::chart::PackedTree;
use crate::util::format_compact;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        input: &Path,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("relevance-bubbles");
                    ui.separator();
                    ui.label(format!("{} chart", self.renderer.variant().label()));
                    ui.label(format!("source: {}", input.display()));
                    ui.label(format!("rows: {}", format_compact(self.row_count as f64)));
                    if self.dropped_rows > 0 {
                        ui.label(format!("skipped: {}", self.dropped_rows))
                            .on_hover_text("Rows without a first or second level name.");
                    }
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(packed) = self.renderer.packed() {
                            ui.label(format!("bubbles: {}", packed.nodes().len().saturating_sub(1)));
                        }
                        if let Some(root_view) = self.renderer.node_view(PackedTree::ROOT) {
                            let zoom = root_view.diameter / self.renderer.view().diameter.max(f64::EPSILON);
                            ui.label(format!("zoom: {zoom:.1}×"));
                        }
                    });
                });
                self.draw_breadcrumbs(ui);
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::WHITE))
            .show(ctx, |ui| self.draw_chart(ui));
    }
}
