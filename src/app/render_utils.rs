use eframe::egui::{Color32, Pos2, Vec2, pos2};

use crate::chart::Rgb;

use super::zoom::View;

pub(crate) const BOUNDARY_RING: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 20);
pub(crate) const HOVER_RING: Color32 = Color32::BLACK;

/// Maps layout space onto the viewport for a given view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ViewTransform {
    center: Pos2,
    focus: View,
    scale: f64,
}

impl ViewTransform {
    pub(crate) fn new(size: Vec2, focus: View) -> Self {
        let extent = f64::from(size.x.min(size.y));
        Self {
            center: pos2(size.x / 2.0, size.y / 2.0),
            focus,
            scale: focus.scale(extent),
        }
    }

    pub(crate) fn world_to_screen(&self, x: f64, y: f64) -> Pos2 {
        pos2(
            self.center.x + ((x - self.focus.x) * self.scale) as f32,
            self.center.y + ((y - self.focus.y) * self.scale) as f32,
        )
    }

    pub(crate) fn screen_to_world(&self, screen: Pos2) -> (f64, f64) {
        let scale = self.scale.max(f64::MIN_POSITIVE);
        (
            self.focus.x + f64::from(screen.x - self.center.x) / scale,
            self.focus.y + f64::from(screen.y - self.center.y) / scale,
        )
    }

    pub(crate) fn radius(&self, r: f64) -> f32 {
        (r * self.scale) as f32
    }
}

pub(crate) fn depth_alpha(depth: usize) -> f32 {
    match depth {
        0 | 1 => 0.7,
        2 => 0.6,
        _ => 0.5,
    }
}

pub(crate) fn depth_stroke_width(depth: usize) -> f32 {
    match depth {
        0 | 1 => 2.0,
        2 => 1.5,
        _ => 1.0,
    }
}

pub(super) fn fill_color(color: Rgb, alpha: f32) -> Color32 {
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.0, color.1, color.2, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_center_lands_on_viewport_center() {
        let transform = ViewTransform::new(Vec2::new(800.0, 600.0), View::new(120.0, 80.0, 60.0));

        assert_eq!(transform.world_to_screen(120.0, 80.0), pos2(400.0, 300.0));
        assert!((transform.radius(30.0) - 300.0).abs() < 1e-3);
    }

    #[test]
    fn screen_and_world_round_trip() {
        let transform = ViewTransform::new(Vec2::new(400.0, 300.0), View::new(200.0, 150.0, 300.0));
        let (x, y) = transform.screen_to_world(pos2(250.0, 100.0));
        let screen = transform.world_to_screen(x, y);

        assert!((screen.x - 250.0).abs() < 1e-3);
        assert!((screen.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn depth_styles_step_down() {
        assert_eq!(depth_alpha(1), 0.7);
        assert_eq!(depth_alpha(2), 0.6);
        assert_eq!(depth_alpha(3), 0.5);
        assert_eq!(depth_stroke_width(1), 2.0);
        assert_eq!(depth_stroke_width(2), 1.5);
        assert_eq!(depth_stroke_width(5), 1.0);
    }

    #[test]
    fn fill_color_keeps_rgb_and_applies_alpha() {
        let color = fill_color(Rgb(10, 20, 30), 0.5);
        assert_eq!(color.to_srgba_unmultiplied()[3], 128);
    }
}
