use eframe::egui::{RichText, Ui};

use crate::app::bubble::Tooltip;
use crate::chart::PackedTree;
use crate::util::truncate_label;

use super::super::ViewModel;

fn draw_tooltip_rows(ui: &mut Ui, tooltip: &Tooltip) {
    ui.label(RichText::new(&tooltip.title).strong());
    for line in tooltip.lines().iter().skip(1) {
        ui.label(line);
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Focus");
        ui.add_space(6.0);

        let focus = self.renderer.focus();
        match self.renderer.describe(focus) {
            Some(tooltip) => draw_tooltip_rows(ui, &tooltip),
            None => {
                ui.label(format!("All {}s", self.renderer.variant().level_kinds()[0].label().to_lowercase()));
                if let Some(root) = self.renderer.node(PackedTree::ROOT) {
                    ui.label(format!(
                        "{}: {}",
                        self.renderer.variant().descendant_count_label(),
                        root.leaf_count
                    ));
                }
            }
        }

        if let Some(node) = self.renderer.node(focus)
            && !node.children.is_empty()
        {
            ui.separator();
            ui.label(RichText::new("Inside").strong());
            let now = ui.input(|input| input.time);
            let mut chosen = None;
            for &child in &node.children {
                let Some(child_node) = self.renderer.node(child) else {
                    continue;
                };
                if ui.link(truncate_label(&child_node.name, 40)).clicked() {
                    chosen = Some(child);
                }
            }
            if let Some(child) = chosen {
                self.renderer.focus_node(child, now);
            }
        }

        ui.separator();
        ui.heading("Hover");
        match self.renderer.tooltip() {
            Some(tooltip) => draw_tooltip_rows(ui, &tooltip),
            None => {
                ui.label("Point at a bubble to inspect it.");
            }
        }
    }

    /// Root-to-focus path; each crumb zooms back out to that level.
    pub(in crate::app) fn draw_breadcrumbs(&mut self, ui: &mut Ui) {
        let Some(packed) = self.renderer.packed() else {
            return;
        };

        let path = packed.path_to(self.renderer.focus());
        let crumbs = path
            .iter()
            .filter_map(|&index| {
                let node = packed.node(index)?;
                let label = if index == PackedTree::ROOT {
                    "All".to_owned()
                } else {
                    truncate_label(&node.name, 28)
                };
                Some((index, label))
            })
            .collect::<Vec<_>>();

        let now = ui.input(|input| input.time);
        let last = crumbs.len().saturating_sub(1);
        let mut chosen = None;
        ui.horizontal_wrapped(|ui| {
            for (position, (index, label)) in crumbs.into_iter().enumerate() {
                if position > 0 {
                    ui.label("›");
                }
                if position == last {
                    ui.label(RichText::new(label).strong());
                } else if ui.link(label).clicked() {
                    chosen = Some(index);
                }
            }
        });

        if let Some(index) = chosen {
            self.renderer.focus_node(index, now);
        }
    }
}
