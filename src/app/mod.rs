use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::chart::{ChartSource, ChartVariant, collect_chart};

pub(crate) mod bubble;
pub(crate) mod canvas;
mod render_utils;
mod ui;
pub(crate) mod zoom;

pub use bubble::{BubbleRenderer, ChartStyle, DEFAULT_MIN_RADIUS};

type LoadResult = Result<ChartSource, String>;

pub struct BubbleApp {
    input: PathBuf,
    variant: ChartVariant,
    style: ChartStyle,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    renderer: BubbleRenderer,
    row_count: usize,
    dropped_rows: usize,
    search: String,
    search_cache: Option<SearchCache>,
}

struct SearchCache {
    query: String,
    data_revision: u64,
    matches: Vec<usize>,
}

impl BubbleApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        input: PathBuf,
        variant: ChartVariant,
        style: ChartStyle,
    ) -> Self {
        let state = Self::start_load(input.clone(), variant);
        Self {
            input,
            variant,
            style,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(input: PathBuf, variant: ChartVariant) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = collect_chart(&input, variant).map_err(|error| format!("{error:#}"));
            if let Err(error) = &result {
                tracing::warn!("{error}");
            }
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(input: PathBuf, variant: ChartVariant) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(input, variant),
        }
    }

    fn ready(&self, source: ChartSource) -> AppState {
        AppState::Ready(Box::new(ViewModel::new(source, self.variant, self.style.clone())))
    }
}

impl eframe::App for BubbleApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading(format!("Loading {} rows...", self.variant.label()));
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                let mut retry = false;
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load chart data");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
                if retry {
                    self.reload_rx = None;
                    self.state = Self::start_load(self.input.clone(), self.variant);
                    return;
                }
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.input, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.input.clone(), self.variant));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(result),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(Err("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = match result {
                Ok(source) => self.ready(source),
                Err(error) => AppState::Error(error),
            };
            ctx.request_repaint();
        }
    }
}

impl ViewModel {
    fn new(source: ChartSource, variant: ChartVariant, style: ChartStyle) -> Self {
        let mut renderer = BubbleRenderer::new(variant, style);
        renderer.set_data(source.root);

        Self {
            renderer,
            row_count: source.row_count,
            dropped_rows: source.dropped,
            search: String::new(),
            search_cache: None,
        }
    }
}
