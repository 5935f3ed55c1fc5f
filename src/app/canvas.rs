use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

/// Drawing surface for the bubble renderer. Coordinates are logical points with
/// the origin at the surface's top-left corner.
pub trait Canvas {
    /// False when the surface has no usable drawing context.
    fn is_drawable(&self) -> bool {
        true
    }

    /// Called once per frame before any drawing; the backing store is
    /// `size * pixels_per_point` physical pixels.
    fn begin_frame(&mut self, size: Vec2, pixels_per_point: f32);

    fn clear(&mut self, color: Color32);

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32);

    fn stroke_circle(&mut self, center: Pos2, radius: f32, width: f32, color: Color32);
}

/// egui painter adapter; egui already scales its own backing store.
pub struct PainterCanvas<'a> {
    painter: &'a Painter,
    rect: Rect,
}

impl<'a> PainterCanvas<'a> {
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        Self { painter, rect }
    }

    fn to_screen(&self, point: Pos2) -> Pos2 {
        self.rect.min + point.to_vec2()
    }
}

impl Canvas for PainterCanvas<'_> {
    fn is_drawable(&self) -> bool {
        self.painter.is_visible()
    }

    fn begin_frame(&mut self, _size: Vec2, _pixels_per_point: f32) {}

    fn clear(&mut self, color: Color32) {
        self.painter.rect_filled(self.rect, 0.0, color);
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        self.painter
            .circle_filled(self.to_screen(center), radius, color);
    }

    fn stroke_circle(&mut self, center: Pos2, radius: f32, width: f32, color: Color32) {
        self.painter
            .circle_stroke(self.to_screen(center), radius, Stroke::new(width, color));
    }
}
