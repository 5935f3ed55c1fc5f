use crate::chart::{NodeKind, PackedNode};
use crate::util::{format_compact, format_percent};

use super::BubbleRenderer;

/// What the hover tooltip and details panel show for one bubble.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub kind: NodeKind,
    pub relevance: Option<String>,
    pub inherited: bool,
    pub coverage: Option<String>,
    pub descendants: Option<(&'static str, usize)>,
    pub volume: Option<String>,
}

impl Tooltip {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone(), format!("Type: {}", self.kind.label())];
        if let Some(relevance) = &self.relevance {
            let suffix = if self.inherited { " (inherited)" } else { "" };
            lines.push(format!("Relevance: {relevance}{suffix}"));
        }
        if let Some(coverage) = &self.coverage {
            lines.push(format!("Coverage: {coverage}"));
        }
        if let Some((label, count)) = self.descendants {
            lines.push(format!("{label}: {count}"));
        }
        if let Some(volume) = &self.volume {
            lines.push(format!("Volume: {volume}"));
        }
        lines
    }
}

impl BubbleRenderer {
    pub fn tooltip(&self) -> Option<Tooltip> {
        self.describe(self.hovered?)
    }

    pub fn describe(&self, index: usize) -> Option<Tooltip> {
        let node = self.node(index)?;
        if node.kind == NodeKind::Root {
            return None;
        }

        Some(Tooltip {
            title: node.name.clone(),
            kind: node.kind,
            relevance: node.effective_relevance.map(format_percent),
            inherited: node.relevance.is_none() && node.effective_relevance.is_some(),
            coverage: node.coverage.map(format_percent),
            descendants: self.descendant_count(node),
            volume: node.volume.map(format_compact),
        })
    }

    fn descendant_count(&self, node: &PackedNode) -> Option<(&'static str, usize)> {
        (!node.is_leaf()).then(|| (self.variant.descendant_count_label(), node.leaf_count))
    }
}

#[cfg(test)]
mod tests {
    use crate::chart::{ChartVariant, FlatRow, aggregate};

    use super::super::fixtures::{email_tree, renderer_with};
    use super::*;

    #[test]
    fn hover_produces_a_tooltip() {
        let mut renderer = renderer_with(email_tree(), ChartVariant::Strategy, 800.0, 600.0);
        assert_eq!(renderer.tooltip(), None);

        let email = renderer.find_node("Email").expect("email");
        renderer.hovered = Some(email);
        let tooltip = renderer.tooltip().expect("tooltip");

        assert_eq!(
            tooltip.lines(),
            vec!["Email", "Type: Channel", "Relevance: 90%", "Clusters: 2"]
        );
    }

    #[test]
    fn inherited_scores_are_marked() {
        let renderer = renderer_with(email_tree(), ChartVariant::Strategy, 800.0, 600.0);
        let brand = renderer.find_node("Brand").expect("brand");
        let tooltip = renderer.describe(brand).expect("tooltip");

        assert!(tooltip.inherited);
        assert_eq!(tooltip.relevance.as_deref(), Some("60%"));
        assert!(tooltip.lines().contains(&"Relevance: 60% (inherited)".to_owned()));
    }

    #[test]
    fn social_leaves_report_coverage_and_volume() {
        let rows = vec![FlatRow {
            levels: [Some("Running".into()), Some("Shoes".into()), Some("trail shoes".into())],
            relevance: [None, None, Some(72.0)],
            coverage: Some(0.35),
            volume: Some(12_300.0),
        }];
        let tree = aggregate(&rows, ChartVariant::Social).root;
        let renderer = renderer_with(tree, ChartVariant::Social, 600.0, 600.0);

        let keyword = renderer.find_node("trail shoes").expect("keyword");
        let tooltip = renderer.describe(keyword).expect("tooltip");
        assert_eq!(
            tooltip.lines(),
            vec!["trail shoes", "Type: Keyword", "Relevance: 72%", "Coverage: 35%", "Volume: 12.3K"]
        );

        let topic = renderer.find_node("Running").expect("topic");
        let tooltip = renderer.describe(topic).expect("tooltip");
        assert_eq!(tooltip.descendants, Some(("Keywords", 1)));
        assert_eq!(tooltip.relevance, None);
    }
}
