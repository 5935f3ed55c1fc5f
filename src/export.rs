use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use eframe::egui::{Color32, Pos2, Vec2};

use crate::app::BubbleRenderer;
use crate::app::bubble::RenderOutcome;
use crate::app::canvas::Canvas;

#[derive(Clone, Debug, PartialEq)]
pub struct ExportOptions {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
    /// Name of the bubble to frame instead of the root.
    pub focus: Option<String>,
}

/// Collects draw calls as SVG elements. The document is sized in physical
/// pixels and a top-level scale maps logical points onto them.
#[derive(Debug, Default)]
pub struct SvgCanvas {
    size: Vec2,
    pixels_per_point: f32,
    body: String,
}

impl SvgCanvas {
    pub fn finish(self, title: &str) -> String {
        let width = (self.size.x * self.pixels_per_point).round();
        let height = (self.size.y * self.pixels_per_point).round();

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
        ));
        svg.push_str(&format!("<title>{}</title>", escape_xml(title)));
        svg.push_str(&format!(
            "<g transform=\"scale({})\">",
            fmt_num(self.pixels_per_point)
        ));
        svg.push_str(&self.body);
        svg.push_str("</g></svg>");
        svg
    }
}

impl Canvas for SvgCanvas {
    fn begin_frame(&mut self, size: Vec2, pixels_per_point: f32) {
        self.size = size;
        self.pixels_per_point = pixels_per_point;
        self.body.clear();
    }

    fn clear(&mut self, color: Color32) {
        let (fill, opacity) = paint(color, "opacity");
        let _ = write!(
            self.body,
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{fill}\"{opacity}/>",
            fmt_num(self.size.x),
            fmt_num(self.size.y),
        );
    }

    fn fill_circle(&mut self, center: Pos2, radius: f32, color: Color32) {
        let (fill, opacity) = paint(color, "fill-opacity");
        let _ = write!(
            self.body,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{fill}\"{opacity}/>",
            fmt_num(center.x),
            fmt_num(center.y),
            fmt_num(radius),
        );
    }

    fn stroke_circle(&mut self, center: Pos2, radius: f32, width: f32, color: Color32) {
        let (stroke, opacity) = paint(color, "stroke-opacity");
        let _ = write!(
            self.body,
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"{}\"{opacity}/>",
            fmt_num(center.x),
            fmt_num(center.y),
            fmt_num(radius),
            fmt_num(width),
        );
    }
}

/// Hex color plus an opacity attribute named `attribute`, omitted when opaque.
fn paint(color: Color32, attribute: &str) -> (String, String) {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let opacity = if a == u8::MAX {
        String::new()
    } else {
        format!(" {attribute}=\"{}\"", fmt_num(f32::from(a) / 255.0))
    };
    (format!("#{r:02x}{g:02x}{b:02x}"), opacity)
}

fn fmt_num(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded}")
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Renders one frame of `renderer` (already holding data) into an SVG document.
pub fn render_svg(renderer: &mut BubbleRenderer, options: &ExportOptions) -> Result<String> {
    if !(options.width > 0.0 && options.height > 0.0) {
        return Err(anyhow!(
            "export size must be positive, got {}x{}",
            options.width,
            options.height
        ));
    }

    renderer.set_pixels_per_point(options.pixel_ratio);
    renderer.resize(options.width, options.height);

    let mut title = format!("{} relevance chart", renderer.variant().label());
    if let Some(name) = &options.focus {
        let index = match renderer.find_nodes(name).as_slice() {
            [] => return Err(anyhow!("no bubble named {name:?}")),
            [index] => *index,
            matches => {
                return Err(anyhow!(
                    "{name:?} matches {} bubbles; give its path instead, e.g. {:?}",
                    matches.len(),
                    bubble_path(renderer, matches[0])
                ));
            }
        };
        renderer.jump_to_node(index);
        title = format!("{title}: {name}");
    }

    let mut canvas = SvgCanvas::default();
    match renderer.render(&mut canvas) {
        RenderOutcome::Drawn { drawn, culled } => {
            tracing::debug!(drawn, culled, "rendered export frame");
        }
        RenderOutcome::Skipped(reason) => {
            tracing::warn!(?reason, "nothing to draw; writing an empty chart");
            canvas.begin_frame(Vec2::new(options.width, options.height), effective_pixel_ratio(options));
            canvas.clear(Color32::WHITE);
        }
    }

    Ok(canvas.finish(&title))
}

fn bubble_path(renderer: &BubbleRenderer, index: usize) -> String {
    let Some(packed) = renderer.packed() else {
        return String::new();
    };
    packed
        .path_to(index)
        .into_iter()
        .skip(1)
        .filter_map(|step| packed.node(step).map(|node| node.name.as_str()))
        .collect::<Vec<_>>()
        .join("/")
}

fn effective_pixel_ratio(options: &ExportOptions) -> f32 {
    if options.pixel_ratio.is_finite() && options.pixel_ratio > 0.0 {
        options.pixel_ratio
    } else {
        1.0
    }
}

pub fn write_output_svg(svg: &str, output: &Path) -> Result<()> {
    std::fs::write(output, svg).with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!("wrote {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::app::bubble::fixtures::{email_tree, renderer_with, row};
    use crate::chart::{ChartVariant, HierarchyNode, aggregate};

    use super::*;

    fn options(focus: Option<&str>) -> ExportOptions {
        ExportOptions {
            width: 400.0,
            height: 300.0,
            pixel_ratio: 2.0,
            focus: focus.map(str::to_owned),
        }
    }

    #[test]
    fn document_is_sized_in_physical_pixels() {
        let mut renderer = renderer_with(email_tree(), ChartVariant::Strategy, 10.0, 10.0);
        let svg = render_svg(&mut renderer, &options(None)).expect("svg");

        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"800\" height=\"600\""));
        assert!(svg.contains("<g transform=\"scale(2)\">"));
        assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"400\" height=\"300\" fill=\"#ffffff\"/>"));
        assert!(svg.ends_with("</g></svg>"));

        let bubbles = renderer.packed().expect("packed").nodes().len() - 1;
        assert_eq!(svg.matches("fill-opacity").count(), bubbles);
    }

    #[test]
    fn focus_frames_the_named_bubble() {
        let mut renderer = renderer_with(email_tree(), ChartVariant::Strategy, 400.0, 300.0);
        let svg = render_svg(&mut renderer, &options(Some("Search"))).expect("svg");

        let search = renderer.find_node("Search").expect("search");
        assert_eq!(renderer.focus(), search);
        assert!(svg.contains("<title>Strategy relevance chart: Search</title>"));
        assert!(svg.contains("cx=\"200\" cy=\"150\" r=\"150\" fill=\"#"));
    }

    #[test]
    fn unknown_focus_is_an_error() {
        let mut renderer = renderer_with(email_tree(), ChartVariant::Strategy, 400.0, 300.0);
        let error = render_svg(&mut renderer, &options(Some("Nope"))).expect_err("missing");

        assert!(error.to_string().contains("Nope"));
    }

    #[test]
    fn repeated_names_need_a_path() {
        let rows = vec![
            row([Some("Search"), Some("Brand"), Some("Core")], [None, None, None]),
            row([Some("Search"), Some("Generic"), Some("Core")], [None, None, None]),
        ];
        let tree = aggregate(&rows, ChartVariant::Strategy).root;
        let mut renderer = renderer_with(tree, ChartVariant::Strategy, 400.0, 300.0);

        let error = render_svg(&mut renderer, &options(Some("Core"))).expect_err("ambiguous");
        let message = error.to_string();
        assert!(message.contains("matches 2 bubbles"), "{message}");
        assert!(message.contains("Search/Brand/Core"), "{message}");

        let svg = render_svg(&mut renderer, &options(Some("Generic/Core"))).expect("path");
        let generic_core = renderer.find_nodes("Search/Generic/Core");
        assert_eq!(generic_core.len(), 1);
        assert_eq!(renderer.focus(), generic_core[0]);
        assert!(svg.contains("<title>Strategy relevance chart: Generic/Core</title>"));
    }

    #[test]
    fn empty_chart_still_writes_a_document() {
        let mut renderer = renderer_with(HierarchyNode::root(), ChartVariant::Social, 400.0, 300.0);
        let svg = render_svg(&mut renderer, &options(None)).expect("svg");

        assert!(svg.contains("fill=\"#ffffff\""));
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn titles_are_escaped() {
        assert_eq!(escape_xml("R&D <core>"), "R&amp;D &lt;core&gt;");
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("chart.svg");

        write_output_svg("<svg/>", &path).expect("write");

        assert_eq!(std::fs::read_to_string(path).expect("read"), "<svg/>");
    }
}
