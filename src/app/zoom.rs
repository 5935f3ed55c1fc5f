use std::f64::consts::SQRT_2;

pub const DEFAULT_TRANSITION_SECS: f64 = 0.75;

const RHO: f64 = SQRT_2;
const RHO2: f64 = 2.0;
const RHO4: f64 = 4.0;
const EPSILON2: f64 = 1e-12;
const MIN_DIAMETER: f64 = 1e-9;

/// Focused region in layout space: a center and the diameter that fills the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    pub x: f64,
    pub y: f64,
    pub diameter: f64,
}

impl View {
    pub fn new(x: f64, y: f64, diameter: f64) -> Self {
        Self { x, y, diameter }
    }

    /// Pixels per layout unit when this view fills a viewport with the given shorter side.
    pub fn scale(self, extent: f64) -> f64 {
        extent / self.diameter.max(MIN_DIAMETER)
    }
}

pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Smooth pan-and-zoom path between two views (van Wijk & Nuij, ρ = √2).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomInterpolator {
    from: View,
    to: View,
    dx: f64,
    dy: f64,
    length: f64,
    r0: f64,
    straight: bool,
}

impl ZoomInterpolator {
    pub fn new(from: View, to: View) -> Self {
        let w0 = from.diameter.max(MIN_DIAMETER);
        let w1 = to.diameter.max(MIN_DIAMETER);
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let d2 = dx * dx + dy * dy;

        if d2 < EPSILON2 {
            return Self {
                from: View::new(from.x, from.y, w0),
                to,
                dx,
                dy,
                length: (w1 / w0).ln() / RHO,
                r0: 0.0,
                straight: true,
            };
        }

        let d1 = d2.sqrt();
        let b0 = (w1 * w1 - w0 * w0 + RHO4 * d2) / (2.0 * w0 * RHO2 * d1);
        let b1 = (w1 * w1 - w0 * w0 - RHO4 * d2) / (2.0 * w1 * RHO2 * d1);
        let r0 = ((b0 * b0 + 1.0).sqrt() - b0).ln();
        let r1 = ((b1 * b1 + 1.0).sqrt() - b1).ln();

        Self {
            from: View::new(from.x, from.y, w0),
            to,
            dx,
            dy,
            length: (r1 - r0) / RHO,
            r0,
            straight: false,
        }
    }

    pub fn at(&self, t: f64) -> View {
        if t >= 1.0 {
            return self.to;
        }
        let t = t.max(0.0);
        let s = t * self.length;
        let w0 = self.from.diameter;

        if self.straight {
            return View::new(
                self.from.x + t * self.dx,
                self.from.y + t * self.dy,
                w0 * (RHO * s).exp(),
            );
        }

        let d1 = self.dx.hypot(self.dy);
        let cosh_r0 = self.r0.cosh();
        let u = w0 / (RHO2 * d1) * (cosh_r0 * (RHO * s + self.r0).tanh() - self.r0.sinh());
        View::new(
            self.from.x + u * self.dx,
            self.from.y + u * self.dy,
            w0 * cosh_r0 / (RHO * s + self.r0).cosh(),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Transition {
    path: ZoomInterpolator,
    started_at: f64,
    duration: f64,
}

/// Owns the focus node and the current view, and animates between foci.
///
/// Time is passed in explicitly (seconds, monotonic) so callers decide the clock.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomNavigator {
    focus: usize,
    view: View,
    transition: Option<Transition>,
    duration: f64,
}

impl ZoomNavigator {
    pub fn new(focus: usize, view: View, duration: f64) -> Self {
        Self {
            focus,
            view,
            transition: None,
            duration: duration.max(0.0),
        }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Zero-duration jump; any running transition is dropped.
    pub fn jump_to(&mut self, focus: usize, view: View) {
        self.focus = focus;
        self.view = view;
        self.transition = None;
    }

    /// Starts a transition from wherever the view is right now. A transition
    /// already in flight is replaced, so only one ever drives the view.
    pub fn zoom_to(&mut self, focus: usize, target: View, now: f64) {
        self.focus = focus;
        if self.duration <= 0.0 {
            self.view = target;
            self.transition = None;
            return;
        }

        self.transition = Some(Transition {
            path: ZoomInterpolator::new(self.view, target),
            started_at: now,
            duration: self.duration,
        });
    }

    /// Advances the running transition; returns true while more frames are needed.
    pub fn tick(&mut self, now: f64) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };

        let progress = ((now - transition.started_at) / transition.duration).clamp(0.0, 1.0);
        self.view = transition.path.at(ease_cubic_in_out(progress));
        if progress >= 1.0 {
            self.transition = None;
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn approx_view(a: View, b: View) -> bool {
        approx(a.x, b.x) && approx(a.y, b.y) && approx(a.diameter, b.diameter)
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(0.25, 0.0625)]
    #[case(0.5, 0.5)]
    #[case(0.75, 0.9375)]
    #[case(1.0, 1.0)]
    #[case(-1.0, 0.0)]
    #[case(2.0, 1.0)]
    fn cubic_in_out_matches_reference_points(#[case] t: f64, #[case] expected: f64) {
        assert!(approx(ease_cubic_in_out(t), expected));
    }

    #[test]
    fn interpolator_hits_both_endpoints() {
        let from = View::new(300.0, 300.0, 600.0);
        let to = View::new(120.0, 410.0, 80.0);
        let path = ZoomInterpolator::new(from, to);

        assert!(approx_view(path.at(0.0), from));
        assert!(approx_view(path.at(1.0), to));
    }

    #[test]
    fn interpolator_zooms_out_then_in_on_long_pans() {
        let from = View::new(0.0, 0.0, 50.0);
        let to = View::new(1000.0, 0.0, 50.0);
        let path = ZoomInterpolator::new(from, to);

        let midpoint = path.at(0.5);
        assert!(midpoint.diameter > 50.0);
        assert!(approx(midpoint.x, 500.0));
    }

    #[test]
    fn interpolator_scales_in_place_when_centers_match() {
        let from = View::new(10.0, 10.0, 400.0);
        let to = View::new(10.0, 10.0, 100.0);
        let path = ZoomInterpolator::new(from, to);

        let halfway = path.at(0.5);
        assert!(approx(halfway.x, 10.0));
        assert!(approx(halfway.diameter, 200.0));
    }

    #[test]
    fn transition_runs_for_configured_duration() {
        let root = View::new(300.0, 300.0, 600.0);
        let target = View::new(200.0, 250.0, 120.0);
        let mut navigator = ZoomNavigator::new(0, root, DEFAULT_TRANSITION_SECS);

        navigator.zoom_to(4, target, 10.0);
        assert_eq!(navigator.focus(), 4);
        assert!(navigator.is_animating());
        assert!(navigator.tick(10.0));
        assert!(approx_view(navigator.view(), root));

        assert!(navigator.tick(10.4));
        let view = navigator.view();
        assert!(!approx_view(view, root) && !approx_view(view, target));

        assert!(!navigator.tick(10.75));
        assert!(!navigator.is_animating());
        assert_eq!(navigator.view(), target);
        assert!(!navigator.tick(11.0));
    }

    #[test]
    fn new_zoom_replaces_the_running_transition() {
        let root = View::new(300.0, 300.0, 600.0);
        let first = View::new(100.0, 100.0, 60.0);
        let second = View::new(500.0, 500.0, 60.0);
        let mut navigator = ZoomNavigator::new(0, root, DEFAULT_TRANSITION_SECS);

        navigator.zoom_to(1, first, 0.0);
        navigator.tick(0.3);
        let interrupted_at = navigator.view();

        navigator.zoom_to(2, second, 0.3);
        assert!(navigator.tick(0.3));
        assert!(approx_view(navigator.view(), interrupted_at));

        assert!(!navigator.tick(1.2));
        assert_eq!(navigator.focus(), 2);
        assert_eq!(navigator.view(), second);
    }

    #[test]
    fn zero_duration_jumps_without_animating() {
        let mut navigator = ZoomNavigator::new(0, View::new(0.0, 0.0, 10.0), 0.0);
        let target = View::new(3.0, 4.0, 2.0);

        navigator.zoom_to(7, target, 1.0);

        assert!(!navigator.is_animating());
        assert_eq!(navigator.view(), target);
        assert!(!navigator.tick(1.0));
    }

    #[test]
    fn jump_cancels_running_transition() {
        let mut navigator = ZoomNavigator::new(0, View::new(0.0, 0.0, 10.0), 0.75);
        navigator.zoom_to(3, View::new(3.0, 4.0, 2.0), 0.0);

        navigator.jump_to(0, View::new(50.0, 50.0, 100.0));

        assert!(!navigator.is_animating());
        assert_eq!(navigator.focus(), 0);
        assert_eq!(navigator.view(), View::new(50.0, 50.0, 100.0));
    }
}
