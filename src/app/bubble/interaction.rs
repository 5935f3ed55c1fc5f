use eframe::egui::Pos2;

use crate::chart::PackedTree;

use super::BubbleRenderer;

impl BubbleRenderer {
    /// Deepest bubble under `point` (surface coordinates), ignoring the root,
    /// kinds the variant excludes and bubbles too small to be drawn.
    pub fn hit_test(&self, point: Pos2) -> Option<usize> {
        let packed = self.packed.as_ref()?;
        let transform = self.transform();
        let (x, y) = transform.screen_to_world(point);

        // Pre-order puts children after their parents, so the last match is the deepest.
        packed
            .nodes()
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, node)| !self.variant.excludes_from_hit_test(node.kind))
            .filter(|(_, node)| transform.radius(node.r) >= self.style.min_radius)
            .filter(|(_, node)| node.contains(x, y))
            .map(|(index, _)| index)
            .last()
    }

    /// Zooms to the bubble under `point`, or back to the root when the click
    /// misses every bubble. Returns true when a transition started.
    pub fn handle_click(&mut self, point: Pos2, now: f64) -> bool {
        if self.packed.is_none() {
            return false;
        }

        let target = self.hit_test(point).unwrap_or(PackedTree::ROOT);
        self.focus_node(target, now)
    }

    /// Returns true when the hovered bubble changed.
    pub fn handle_hover(&mut self, point: Pos2) -> bool {
        let hit = self.hit_test(point);
        if hit == self.hovered {
            return false;
        }
        self.hovered = hit;
        true
    }

    pub fn handle_leave(&mut self) -> bool {
        self.hovered.take().is_some()
    }
}
