use eframe::egui::{self, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::chart::PackedTree;
use crate::util::truncate_label;

use super::super::{SearchCache, ViewModel};

const MAX_SEARCH_RESULTS: usize = 200;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Node indices whose names match `query`, best score first.
pub(in crate::app) fn search_nodes(packed: &PackedTree, query: &str) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = packed
        .nodes()
        .iter()
        .enumerate()
        .skip(1)
        .filter_map(|(index, node)| {
            fuzzy_match_score(&matcher, &node.name, query).map(|score| (score, index))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    scored
        .into_iter()
        .take(MAX_SEARCH_RESULTS)
        .map(|(_, index)| index)
        .collect()
}

impl ViewModel {
    fn cached_search_matches(&mut self) -> &[usize] {
        let query = self.search.trim();
        let revision = self.renderer.data_revision();
        let stale = self
            .search_cache
            .as_ref()
            .is_none_or(|cache| cache.query != query || cache.data_revision != revision);

        if stale {
            let matches = self
                .renderer
                .packed()
                .map(|packed| search_nodes(packed, query))
                .unwrap_or_default();
            self.search_cache = Some(SearchCache {
                query: query.to_owned(),
                data_revision: revision,
                matches,
            });
        }

        self.search_cache
            .as_ref()
            .map(|cache| cache.matches.as_slice())
            .unwrap_or_default()
    }

    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Find");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search by name")
            .on_hover_text("Fuzzy-match bubble names; click a result to zoom to it.");
        ui.text_edit_singleline(&mut self.search);

        let now = ui.input(|input| input.time);
        let matches = self.cached_search_matches().to_vec();
        if self.search.trim().is_empty() {
            ui.add_space(6.0);
            ui.label("Click a bubble to zoom in, or empty space to zoom out.");
            return;
        }
        if matches.is_empty() {
            ui.label("No matching bubbles.");
            return;
        }

        let mut chosen = None;
        egui::ScrollArea::vertical()
            .id_salt("search_results_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for index in matches {
                    let Some(node) = self.renderer.node(index) else {
                        continue;
                    };
                    let label = format!("{} · {}", truncate_label(&node.name, 36), node.kind.label());
                    let selected = self.renderer.focus() == index;
                    if ui.selectable_label(selected, label).clicked() {
                        chosen = Some(index);
                    }
                }
            });

        if let Some(index) = chosen
            && self.renderer.focus_node(index, now)
        {
            ui.ctx().request_repaint();
        }
    }
}
