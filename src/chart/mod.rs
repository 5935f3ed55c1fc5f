mod color;
mod error;
mod hierarchy;
mod pack;
mod rows;
mod source;

pub use color::{Palette, Rgb, normalize_score};
pub use error::PaletteError;
pub use hierarchy::{ChartVariant, HierarchyNode, NodeKind};
pub use pack::{DEFAULT_PADDING, PackOptions, PackedNode, PackedTree, pack};
pub use source::{ChartSource, collect_chart};

#[cfg(test)]
pub(crate) use hierarchy::aggregate;
#[cfg(test)]
pub(crate) use rows::FlatRow;
