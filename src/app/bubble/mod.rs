use eframe::egui::Vec2;

use crate::chart::{ChartVariant, HierarchyNode, PackOptions, PackedNode, PackedTree, Palette, pack};

use super::zoom::{DEFAULT_TRANSITION_SECS, View, ZoomNavigator};

mod interaction;
mod tooltip;
mod view;

pub use tooltip::Tooltip;
pub use view::{RenderOutcome, SkipReason};

pub const DEFAULT_MIN_RADIUS: f32 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct ChartStyle {
    pub padding: f64,
    pub transition_secs: f64,
    /// Projected radius below which a node is neither drawn nor hit-tested.
    pub min_radius: f32,
    pub palette: Palette,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            padding: PackOptions::default().padding,
            transition_secs: DEFAULT_TRANSITION_SECS,
            min_radius: DEFAULT_MIN_RADIUS,
            palette: Palette::default(),
        }
    }
}

/// Owns everything the chart needs between frames: the hierarchy, its packed
/// layout, the zoom state and the hover target. The shell forwards pointer and
/// size events and hands it a [`Canvas`](super::canvas::Canvas) to draw on.
pub struct BubbleRenderer {
    variant: ChartVariant,
    style: ChartStyle,
    tree: HierarchyNode,
    packed: Option<PackedTree>,
    size: Vec2,
    pixels_per_point: f32,
    navigator: ZoomNavigator,
    hovered: Option<usize>,
    data_revision: u64,
}

impl BubbleRenderer {
    pub fn new(variant: ChartVariant, style: ChartStyle) -> Self {
        let navigator = ZoomNavigator::new(PackedTree::ROOT, View::new(0.0, 0.0, 1.0), style.transition_secs);
        Self {
            variant,
            style,
            tree: HierarchyNode::root(),
            packed: None,
            size: Vec2::ZERO,
            pixels_per_point: 1.0,
            navigator,
            hovered: None,
            data_revision: 0,
        }
    }

    pub fn variant(&self) -> ChartVariant {
        self.variant
    }

    pub fn packed(&self) -> Option<&PackedTree> {
        self.packed.as_ref()
    }

    pub fn focus(&self) -> usize {
        self.navigator.focus()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn view(&self) -> View {
        self.navigator.view()
    }

    pub fn is_animating(&self) -> bool {
        self.navigator.is_animating()
    }

    pub fn data_revision(&self) -> u64 {
        self.data_revision
    }

    pub fn node(&self, index: usize) -> Option<&PackedNode> {
        self.packed.as_ref()?.node(index)
    }

    /// Replaces the hierarchy, re-packs it and returns to the root view.
    pub fn set_data(&mut self, tree: HierarchyNode) {
        self.tree = tree;
        self.data_revision = self.data_revision.wrapping_add(1);
        self.rebuild();
    }

    /// Re-packs at the new size and snaps back to the root. Returns false when
    /// the size did not change.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let size = Vec2::new(width, height);
        if self.packed.is_some() && size == self.size {
            return false;
        }

        self.size = size;
        self.rebuild();
        true
    }

    pub fn set_pixels_per_point(&mut self, pixels_per_point: f32) {
        if pixels_per_point.is_finite() && pixels_per_point > 0.0 {
            self.pixels_per_point = pixels_per_point;
        }
    }

    /// Advances any running zoom; returns true while another frame is needed.
    pub fn tick(&mut self, now: f64) -> bool {
        self.navigator.tick(now)
    }

    /// The view that frames `index`: its center and twice its radius.
    pub fn node_view(&self, index: usize) -> Option<View> {
        self.node(index)
            .map(|node| View::new(node.x, node.y, node.r * 2.0))
    }

    /// Starts an animated zoom to `index`. Returns false when it is already the focus.
    pub fn focus_node(&mut self, index: usize, now: f64) -> bool {
        if index == self.navigator.focus() {
            return false;
        }
        let Some(target) = self.node_view(index) else {
            return false;
        };

        tracing::debug!(
            node = self.node(index).map(|node| node.name.as_str()).unwrap_or_default(),
            diameter = target.diameter,
            "zooming to node"
        );
        self.navigator.zoom_to(index, target, now);
        true
    }

    /// Focuses `index` immediately, without a transition.
    pub fn jump_to_node(&mut self, index: usize) -> bool {
        let Some(target) = self.node_view(index) else {
            return false;
        };
        self.navigator.jump_to(index, target);
        true
    }

    /// Every bubble named `query`, in pre-order. A query containing `/` is also
    /// tried as a trailing path such as `Search/Brand/Core` when no name matches.
    pub fn find_nodes(&self, query: &str) -> Vec<usize> {
        let Some(packed) = self.packed.as_ref() else {
            return Vec::new();
        };

        let by_name: Vec<usize> = (1..packed.nodes().len())
            .filter(|&index| packed.nodes()[index].name == query)
            .collect();
        if !by_name.is_empty() || !query.contains('/') {
            return by_name;
        }

        let segments: Vec<&str> = query.split('/').map(str::trim).collect();
        (1..packed.nodes().len())
            .filter(|&index| {
                let names: Vec<&str> = packed
                    .path_to(index)
                    .into_iter()
                    .skip(1)
                    .map(|step| packed.nodes()[step].name.as_str())
                    .collect();
                names.ends_with(&segments)
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn find_node(&self, query: &str) -> Option<usize> {
        self.find_nodes(query).first().copied()
    }

    fn rebuild(&mut self) {
        self.hovered = None;

        let options = PackOptions {
            padding: self.style.padding,
        };
        self.packed = pack(
            &self.tree,
            f64::from(self.size.x),
            f64::from(self.size.y),
            &options,
        )
        .map(|mut packed| {
            packed.resolve_colors(&self.style.palette);
            packed
        });

        match self.node_view(PackedTree::ROOT) {
            Some(root_view) => {
                tracing::debug!(
                    nodes = self.packed.as_ref().map_or(0, |packed| packed.nodes().len()),
                    width = self.size.x,
                    height = self.size.y,
                    "packed bubble hierarchy"
                );
                self.navigator.jump_to(PackedTree::ROOT, root_view);
            }
            None => {
                tracing::trace!(width = self.size.x, height = self.size.y, "skipping pack for empty surface");
                self.navigator
                    .jump_to(PackedTree::ROOT, View::new(0.0, 0.0, 1.0));
            }
        }
    }
}
