use eframe::egui::Color32;

use crate::chart::PackedTree;

use super::super::canvas::Canvas;
use super::super::render_utils::{
    BOUNDARY_RING, HOVER_RING, ViewTransform, depth_alpha, depth_stroke_width, fill_color,
};
use super::BubbleRenderer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    NotDrawable,
    ZeroSize,
    NotPacked,
    EmptyChart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    Drawn { drawn: usize, culled: usize },
    Skipped(SkipReason),
}

impl BubbleRenderer {
    pub(crate) fn transform(&self) -> ViewTransform {
        ViewTransform::new(self.size, self.navigator.view())
    }

    /// Paints one frame: white background, every non-root bubble in pre-order
    /// (parents under children), the faint root boundary, then the hover ring.
    pub fn render(&self, canvas: &mut impl Canvas) -> RenderOutcome {
        if !canvas.is_drawable() {
            return RenderOutcome::Skipped(SkipReason::NotDrawable);
        }
        if !(self.size.x > 0.0 && self.size.y > 0.0) {
            return RenderOutcome::Skipped(SkipReason::ZeroSize);
        }
        let Some(packed) = &self.packed else {
            return RenderOutcome::Skipped(SkipReason::NotPacked);
        };
        if packed.is_empty_chart() {
            return RenderOutcome::Skipped(SkipReason::EmptyChart);
        }

        let transform = self.transform();
        canvas.begin_frame(self.size, self.pixels_per_point);
        canvas.clear(Color32::WHITE);

        let mut drawn = 0;
        let mut culled = 0;
        for node in packed.nodes().iter().skip(1) {
            let radius = transform.radius(node.r);
            if radius < self.style.min_radius {
                culled += 1;
                continue;
            }

            let center = transform.world_to_screen(node.x, node.y);
            canvas.fill_circle(center, radius, fill_color(node.color, depth_alpha(node.depth)));
            canvas.stroke_circle(center, radius, depth_stroke_width(node.depth), Color32::WHITE);
            drawn += 1;
        }

        let root = packed.root();
        canvas.stroke_circle(
            transform.world_to_screen(root.x, root.y),
            transform.radius(root.r),
            1.0,
            BOUNDARY_RING,
        );

        if let Some(node) = self
            .hovered
            .filter(|hovered| *hovered != self.navigator.focus() && *hovered != PackedTree::ROOT)
            .and_then(|hovered| packed.node(hovered))
        {
            canvas.stroke_circle(
                transform.world_to_screen(node.x, node.y),
                transform.radius(node.r),
                1.0,
                HOVER_RING,
            );
        }

        RenderOutcome::Drawn { drawn, culled }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Vec2, pos2};

    use crate::app::canvas::recording::{CanvasOp, RecordingCanvas};
    use crate::chart::{ChartVariant, HierarchyNode};

    use super::super::fixtures::{email_tree, renderer_with};
    use super::super::{BubbleRenderer, ChartStyle};
    use super::*;

    fn render(renderer: &BubbleRenderer) -> (RenderOutcome, RecordingCanvas) {
        let mut canvas = RecordingCanvas::default();
        let outcome = renderer.render(&mut canvas);
        (outcome, canvas)
    }

    #[test]
    fn zero_rows_draw_nothing() {
        let renderer = renderer_with(HierarchyNode::root(), ChartVariant::Strategy, 800.0, 600.0);
        let (outcome, canvas) = render(&renderer);

        assert_eq!(outcome, RenderOutcome::Skipped(SkipReason::EmptyChart));
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn unusable_surfaces_draw_nothing() {
        let renderer = renderer_with(email_tree(), ChartVariant::Strategy, 800.0, 600.0);
        let mut canvas = RecordingCanvas {
            drawable: false,
            ..RecordingCanvas::default()
        };
        assert_eq!(
            renderer.render(&mut canvas),
            RenderOutcome::Skipped(SkipReason::NotDrawable)
        );
        assert!(canvas.ops.is_empty());

        let unsized_renderer = renderer_with(email_tree(), ChartVariant::Strategy, 0.0, 0.0);
        let (outcome, canvas) = render(&unsized_renderer);
        assert_eq!(outcome, RenderOutcome::Skipped(SkipReason::ZeroSize));
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn frame_starts_with_a_white_clear_at_device_scale() {
        let mut renderer = renderer_with(email_tree(), ChartVariant::Strategy, 800.0, 600.0);
        renderer.set_pixels_per_point(2.0);
        let (_, canvas) = render(&renderer);

        assert_eq!(
            canvas.ops[0],
            CanvasOp::BeginFrame {
                size: Vec2::new(800.0, 600.0),
                pixels_per_point: 2.0
            }
        );
        assert_eq!(canvas.ops[1], CanvasOp::Clear(Color32::WHITE));
    }

    #[test]
    fn every_non_root_node_gets_a_fill_and_white_outline() {
        let renderer = renderer_with(email_tree(), ChartVariant::Strategy, 800.0, 600.0);
        let packed = renderer.packed().expect("packed");
        let (outcome, canvas) = render(&renderer);

        let bubbles = packed.nodes().len() - 1;
        assert_eq!(outcome, RenderOutcome::Drawn { drawn: bubbles, culled: 0 });
        assert_eq!(canvas.fills().len(), bubbles);

        let strokes = canvas.strokes();
        // one white outline per bubble plus the root boundary
        assert_eq!(strokes.len(), bubbles + 1);
        let (center, radius, width, color) = strokes[bubbles];
        assert_eq!(color, BOUNDARY_RING);
        assert_eq!(width, 1.0);
        assert_eq!(center, pos2(400.0, 300.0));
        assert!((radius - 300.0).abs() < 1e-3);
    }

    #[test]
    fn colors_follow_own_or_inherited_relevance() {
        let renderer = renderer_with(email_tree(), ChartVariant::Strategy, 800.0, 600.0);
        let (_, canvas) = render(&renderer);
        let palette = ChartStyle::default().palette;

        let fill_for = |name: &str| {
            let index = renderer.find_node(name).expect("node present");
            canvas.fills()[index - 1].2
        };
        let expected = |score: f64, depth: usize| fill_color(palette.color_for(score), depth_alpha(depth));

        assert_eq!(fill_for("Email"), expected(0.9, 1));
        assert_eq!(fill_for("Welcome"), expected(0.4, 2));
        assert_eq!(fill_for("Promo"), expected(0.1, 2));
        assert_eq!(fill_for("Brand"), expected(0.6, 2));
        assert_eq!(fill_for("Core"), expected(0.6, 3));
        assert_eq!(fill_for("Long tail"), expected(0.2, 3));
        assert_ne!(fill_for("Email"), fill_for("Promo"));
    }

    #[test]
    fn hover_ring_skips_the_focused_node() {
        let mut renderer = renderer_with(email_tree(), ChartVariant::Strategy, 800.0, 600.0);
        let email = renderer.find_node("Email").expect("email");
        renderer.hovered = Some(email);

        let (_, canvas) = render(&renderer);
        let last = canvas.strokes().last().copied().expect("strokes");
        assert_eq!(last.3, HOVER_RING);

        renderer.jump_to_node(email);
        renderer.hovered = Some(email);
        let (_, canvas) = render(&renderer);
        let last = canvas.strokes().last().copied().expect("strokes");
        assert_eq!(last.3, BOUNDARY_RING);
    }

    #[test]
    fn focused_node_fills_the_viewport() {
        let mut renderer = renderer_with(email_tree(), ChartVariant::Strategy, 800.0, 600.0);
        let welcome = renderer.find_node("Welcome").expect("welcome");
        renderer.jump_to_node(welcome);

        let (_, canvas) = render(&renderer);
        let (center, radius, _) = canvas.fills()[welcome - 1];

        assert!((center.x - 400.0).abs() < 1e-3);
        assert!((center.y - 300.0).abs() < 1e-3);
        assert!((radius - 300.0).abs() < 1e-2);
    }

    #[test]
    fn sub_pixel_bubbles_are_culled() {
        let style = ChartStyle {
            min_radius: 1000.0,
            ..ChartStyle::default()
        };
        let mut renderer = BubbleRenderer::new(ChartVariant::Strategy, style);
        renderer.resize(800.0, 600.0);
        renderer.set_data(email_tree());
        let bubbles = renderer.packed().expect("packed").nodes().len() - 1;

        let (outcome, canvas) = render(&renderer);

        assert_eq!(outcome, RenderOutcome::Drawn { drawn: 0, culled: bubbles });
        assert!(canvas.fills().is_empty());
    }
}
