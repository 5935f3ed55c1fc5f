use eframe::egui::{Align2, Color32, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, vec2};

use crate::app::bubble::RenderOutcome;
use crate::app::canvas::PainterCanvas;

use super::super::ViewModel;

const TOOLTIP_OFFSET: f32 = 14.0;
const TOOLTIP_MARGIN: f32 = 6.0;

impl ViewModel {
    pub(in crate::app) fn draw_chart(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let painter = ui.painter_at(rect);
        let now = ui.input(|input| input.time);

        self.renderer.set_pixels_per_point(ui.ctx().pixels_per_point());
        self.renderer.resize(rect.width(), rect.height());

        let local = |pos: Pos2| pos - rect.min.to_vec2();
        match response.hover_pos() {
            Some(pointer) => {
                self.renderer.handle_hover(local(pointer));
            }
            None => {
                self.renderer.handle_leave();
            }
        }
        if response.clicked()
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.renderer.handle_click(local(pointer), now);
        }

        if self.renderer.tick(now) {
            ui.ctx().request_repaint();
        }

        let mut canvas = PainterCanvas::new(&painter, rect);
        match self.renderer.render(&mut canvas) {
            RenderOutcome::Drawn { .. } => {}
            RenderOutcome::Skipped(reason) => {
                tracing::trace!(?reason, "chart frame skipped");
                if self.renderer.packed().is_some_and(|packed| packed.is_empty_chart()) {
                    painter.text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        "No rows to display",
                        FontId::proportional(16.0),
                        Color32::from_gray(120),
                    );
                }
            }
        }

        if self.renderer.hovered().is_some() {
            ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
        }

        if let Some(pointer) = response.hover_pos()
            && !self.renderer.is_animating()
            && let Some(tooltip) = self.renderer.tooltip()
        {
            let galley = painter.layout_no_wrap(
                tooltip.lines().join("\n"),
                FontId::proportional(13.0),
                Color32::from_gray(20),
            );
            let mut origin = pointer + vec2(TOOLTIP_OFFSET, TOOLTIP_OFFSET);
            let size = galley.size() + vec2(TOOLTIP_MARGIN, TOOLTIP_MARGIN) * 2.0;
            if origin.x + size.x > rect.max.x {
                origin.x = pointer.x - TOOLTIP_OFFSET - size.x;
            }
            if origin.y + size.y > rect.max.y {
                origin.y = pointer.y - TOOLTIP_OFFSET - size.y;
            }

            let frame = Rect::from_min_size(origin, size);
            painter.rect_filled(frame, 4.0, Color32::from_rgba_unmultiplied(255, 255, 255, 235));
            painter.rect_stroke(
                frame,
                4.0,
                Stroke::new(1.0, Color32::from_gray(180)),
                StrokeKind::Inside,
            );
            painter.galley(
                origin + vec2(TOOLTIP_MARGIN, TOOLTIP_MARGIN),
                galley,
                Color32::from_gray(20),
            );
        }
    }
}
