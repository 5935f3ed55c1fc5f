use std::path::Path;

use anyhow::{Context, Result};

use super::hierarchy::{ChartVariant, HierarchyNode, aggregate};
use super::rows::load_rows;

/// A loaded hierarchy plus what the header reports about the input.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSource {
    pub root: HierarchyNode,
    pub row_count: usize,
    pub dropped: usize,
}

pub fn collect_chart(path: &Path, variant: ChartVariant) -> Result<ChartSource> {
    let rows = load_rows(path, variant)
        .with_context(|| format!("failed to load {} rows from {}", variant.label(), path.display()))?;

    let aggregation = aggregate(&rows, variant);
    if aggregation.dropped > 0 {
        tracing::debug!(
            dropped = aggregation.dropped,
            "skipped rows without a first or second level name"
        );
    }
    tracing::info!(
        rows = rows.len(),
        nodes = aggregation.root.node_count(),
        "built hierarchy from {}",
        path.display()
    );

    Ok(ChartSource {
        root: aggregation.root,
        row_count: rows.len(),
        dropped: aggregation.dropped,
    })
}
