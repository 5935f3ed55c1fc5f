use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::rows::FlatRow;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ChartVariant {
    /// channel → campaign → cluster
    #[default]
    Strategy,
    /// topic → cluster → keyword
    Social,
}

impl ChartVariant {
    pub fn label(self) -> &'static str {
        match self {
            Self::Strategy => "Strategy",
            Self::Social => "Social",
        }
    }

    pub fn level_kinds(self) -> [NodeKind; 3] {
        match self {
            Self::Strategy => [NodeKind::Channel, NodeKind::Campaign, NodeKind::Cluster],
            Self::Social => [NodeKind::Topic, NodeKind::Cluster, NodeKind::Keyword],
        }
    }

    /// Keywords are too small to be useful click targets, so the social chart skips them.
    pub fn excludes_from_hit_test(self, kind: NodeKind) -> bool {
        kind == NodeKind::Root || (self == Self::Social && kind == NodeKind::Keyword)
    }

    pub fn descendant_count_label(self) -> &'static str {
        match self {
            Self::Strategy => "Clusters",
            Self::Social => "Keywords",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Channel,
    Campaign,
    Topic,
    Cluster,
    Keyword,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Root => "All",
            Self::Channel => "Channel",
            Self::Campaign => "Campaign",
            Self::Topic => "Topic",
            Self::Cluster => "Cluster",
            Self::Keyword => "Keyword",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyNode {
    pub name: String,
    pub kind: NodeKind,
    /// Packing weight; set to 1 on leaves, derived from descendants otherwise.
    pub value: Option<f64>,
    pub relevance: Option<f64>,
    pub coverage: Option<f64>,
    pub volume: Option<f64>,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn root() -> Self {
        Self {
            name: "root".to_owned(),
            kind: NodeKind::Root,
            value: None,
            relevance: None,
            coverage: None,
            volume: None,
            children: Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(HierarchyNode::node_count)
            .sum::<usize>()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Aggregation {
    pub root: HierarchyNode,
    /// Rows skipped for lacking a top- or second-level key.
    pub dropped: usize,
}

#[derive(Default)]
struct Group {
    relevance: Option<f64>,
    coverage: Option<f64>,
    volume: Option<f64>,
    children: BTreeMap<String, Group>,
}

impl Group {
    fn child(&mut self, name: &str, relevance: Option<f64>) -> &mut Group {
        let group = self.children.entry(name.to_owned()).or_default();
        if group.relevance.is_none() {
            group.relevance = relevance;
        }
        group
    }

    fn record_leaf_metrics(&mut self, row: &FlatRow) {
        if self.coverage.is_none() {
            self.coverage = row.coverage;
        }
        if let Some(volume) = row.volume {
            self.volume = Some(self.volume.unwrap_or(0.0) + volume);
        }
    }
}

pub fn aggregate(rows: &[FlatRow], variant: ChartVariant) -> Aggregation {
    let mut top = Group::default();
    let mut dropped = 0usize;

    for row in rows {
        let (Some(first), Some(second)) = (row.levels[0].as_deref(), row.levels[1].as_deref())
        else {
            dropped += 1;
            continue;
        };

        let second_group = top
            .child(first, row.relevance[0])
            .child(second, row.relevance[1]);

        match row.levels[2].as_deref() {
            Some(third) => second_group
                .child(third, row.relevance[2])
                .record_leaf_metrics(row),
            None => second_group.record_leaf_metrics(row),
        }
    }

    let kinds = variant.level_kinds();
    let mut root = HierarchyNode::root();
    root.children = build_children(top.children, &kinds, 0);

    Aggregation { root, dropped }
}

fn build_children(
    groups: BTreeMap<String, Group>,
    kinds: &[NodeKind; 3],
    depth: usize,
) -> Vec<HierarchyNode> {
    let kind = kinds[depth.min(kinds.len() - 1)];
    let mut nodes = groups
        .into_iter()
        .map(|(name, group)| {
            let children = build_children(group.children, kinds, depth + 1);
            HierarchyNode {
                name,
                kind,
                value: children.is_empty().then_some(1.0),
                relevance: group.relevance,
                coverage: group.coverage,
                volume: group.volume,
                children,
            }
        })
        .collect::<Vec<_>>();

    nodes.sort_by(|a, b| compare_names(&a.name, &b.name));
    nodes
}

/// Case-insensitive ordering with a byte-order tiebreak so the result stays total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
