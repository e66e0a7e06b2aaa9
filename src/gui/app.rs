//! FacultyScope Main Application
//! Main window with control panel and the four analysis views.

use crate::data::{build_dataset, pair_files, MergeCache, UploadedFile};
use crate::gui::control_panel::{ControlPanel, ControlPanelAction, View};
use crate::gui::views::{ComparisonView, OverviewView, ProfileView, RankingsView};
use anyhow::Context;
use egui::{RichText, SidePanel};
use polars::prelude::DataFrame;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use tracing::error;

/// A loaded and merged file pair, ready for the views.
pub struct Dataset {
    pub df: DataFrame,
    pub ece_file: String,
    pub cse_file: String,
}

/// Pipeline result from the background thread
enum LoadResult {
    Progress(String),
    Complete(Box<Dataset>),
    Error(String),
}

/// Main application window.
pub struct FacultyScopeApp {
    control_panel: ControlPanel,
    dataset: Option<Dataset>,
    cache: Arc<Mutex<MergeCache>>,

    // Async pipeline
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,

    overview: OverviewView,
    comparison: ComparisonView,
    rankings: RankingsView,
    profile: ProfileView,
}

impl FacultyScopeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            control_panel: ControlPanel::new(),
            dataset: None,
            cache: Arc::new(Mutex::new(MergeCache::new())),
            load_rx: None,
            is_loading: false,
            overview: OverviewView,
            comparison: ComparisonView::default(),
            rankings: RankingsView::default(),
            profile: ProfileView::default(),
        }
    }

    /// Handle file selection and kick off the pipeline in the background.
    fn handle_browse_files(&mut self) {
        if self.is_loading {
            return;
        }

        let Some(paths) = rfd::FileDialog::new()
            .add_filter("Tabular data", &["csv", "xlsx", "xls"])
            .pick_files()
        else {
            return;
        };

        let mut files = Vec::with_capacity(paths.len());
        for path in &paths {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.to_string_lossy().to_string());
            match std::fs::read(path) {
                Ok(bytes) => files.push(UploadedFile { name, bytes }),
                Err(err) => {
                    self.control_panel
                        .set_status(format!("Error: could not read {name}: {err}"));
                    return;
                }
            }
        }

        self.control_panel.file_names = files.iter().map(|f| f.name.clone()).collect();

        // Department pairing happens before any parsing; an unusable
        // selection never starts a computation.
        let (ece, cse) = match pair_files(&files) {
            Ok(pair) => pair,
            Err(err) => {
                self.control_panel.set_status(format!("Error: {err}"));
                return;
            }
        };
        let ece = ece.clone();
        let cse = cse.clone();

        self.control_panel.set_status("Processing files...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let cache = Arc::clone(&self.cache);

        thread::spawn(move || Self::run_pipeline(tx, ece, cse, cache));
    }

    /// Run the load → normalize → merge pipeline (background thread).
    fn run_pipeline(
        tx: Sender<LoadResult>,
        ece: UploadedFile,
        cse: UploadedFile,
        cache: Arc<Mutex<MergeCache>>,
    ) {
        let _ = tx.send(LoadResult::Progress(format!(
            "Parsing {} and {}...",
            ece.name, cse.name
        )));

        let result = (|| -> anyhow::Result<Dataset> {
            let mut cache = cache
                .lock()
                .map_err(|_| anyhow::anyhow!("merge cache is poisoned"))?;
            let df = build_dataset(&ece, &cse, &mut cache)
                .with_context(|| format!("processing {} + {}", ece.name, cse.name))?;
            Ok(Dataset {
                df,
                ece_file: ece.name.clone(),
                cse_file: cse.name.clone(),
            })
        })();

        match result {
            Ok(dataset) => {
                let _ = tx.send(LoadResult::Complete(Box::new(dataset)));
            }
            Err(err) => {
                error!(error = %err, "pipeline failed");
                let _ = tx.send(LoadResult::Error(format!("{err:#}")));
            }
        }
    }

    /// Check for pipeline results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_status(status);
                    }
                    LoadResult::Complete(dataset) => {
                        self.control_panel.set_status(format!(
                            "Both files identified; {} faculty rows ready",
                            dataset.df.height()
                        ));
                        self.control_panel.has_data = true;
                        self.dataset = Some(*dataset);
                        self.comparison.reset();
                        self.rankings.reset();
                        self.profile.reset();
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(message) => {
                        self.control_panel.set_status(format!("Error: {message}"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }
}

impl eframe::App for FacultyScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);
                    if action == ControlPanelAction::BrowseFiles {
                        self.handle_browse_files();
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(dataset) = &self.dataset else {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new("Waiting for data... upload the ECE and CSE files.")
                            .size(16.0),
                    );
                });
                return;
            };

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.control_panel.view {
                    View::Overview => self.overview.show(ui, &dataset.df),
                    View::Comparison => self.comparison.show(ui, &dataset.df),
                    View::Rankings => self.rankings.show(ui, &dataset.df),
                    View::Profile => self.profile.show(ui, &dataset.df),
                });
        });
    }
}
