use std::path::PathBuf;

use hatvp_dataviz::color::Theme;
use hatvp_dataviz::config::DashboardConfig;
use hatvp_dataviz::data::task::{LoadPoll, LoadTask};
use hatvp_dataviz::data::{Dataset, Row, TopN};
use hatvp_dataviz::views::{ViewKind, ViewParams};

// ---------------------------------------------------------------------------
// Per-view state
// ---------------------------------------------------------------------------

/// Lifecycle of the active view's data.
#[derive(Debug)]
pub enum LoadStatus {
    Loading(LoadTask),
    Loaded(Dataset),
    Failed(String),
}

/// State owned by the mounted view. Dropping it tears the view down, which
/// cancels any outstanding load.
#[derive(Debug)]
pub struct ViewState {
    pub kind: ViewKind,
    pub status: LoadStatus,
    pub params: ViewParams,
    /// Raw text of the top-N input; parsed leniently into `params.top_n`.
    pub top_n_input: String,
    /// Rows derived from the dataset for the current params.
    pub derived: Vec<Row>,
    /// Query failure shown instead of a chart.
    pub query_error: Option<String>,
}

impl ViewState {
    /// Mount a view: start loading its resource.
    pub fn mount(kind: ViewKind, config: &DashboardConfig) -> Self {
        let path = config.resource_path(kind);
        log::info!("loading {}", path.display());
        let top_n = TopN::new(config.default_top_n);
        ViewState {
            kind,
            status: LoadStatus::Loading(LoadTask::spawn(path, kind.schema())),
            params: ViewParams {
                search: String::new(),
                top_n,
            },
            top_n_input: top_n.get().to_string(),
            derived: Vec::new(),
            query_error: None,
        }
    }

    /// Advance a pending load. Returns `true` while still loading.
    pub fn poll(&mut self) -> bool {
        let LoadStatus::Loading(task) = &mut self.status else {
            return false;
        };
        match task.poll() {
            LoadPoll::Pending => true,
            LoadPoll::Ready(Ok(dataset)) => {
                log::info!("loaded {} rows from {}", dataset.len(), dataset.name());
                self.status = LoadStatus::Loaded(dataset);
                self.requery();
                false
            }
            LoadPoll::Ready(Err(e)) => {
                log::warn!("failed to load {}: {e}", self.kind.resource());
                self.status = LoadStatus::Failed(e.to_string());
                false
            }
            LoadPoll::Cancelled => {
                self.status = LoadStatus::Failed("load cancelled".into());
                false
            }
        }
    }

    /// Recompute `derived` after a params change.
    pub fn requery(&mut self) {
        let LoadStatus::Loaded(dataset) = &self.status else {
            return;
        };
        match self.kind.derive(dataset, &self.params) {
            Ok(rows) => {
                self.derived = rows.into_iter().cloned().collect();
                self.query_error = None;
            }
            Err(e) => {
                log::warn!("{}: {e}", self.kind.resource());
                self.derived.clear();
                self.query_error = Some(e.to_string());
            }
        }
    }

    pub fn set_search(&mut self, search: String) {
        if self.params.search != search {
            self.params.search = search;
            self.requery();
        }
    }

    /// Apply the top-N text input, clamping invalid values.
    pub fn commit_top_n(&mut self) {
        let top_n = TopN::from_input(&self.top_n_input);
        self.top_n_input = top_n.get().to_string();
        if self.params.top_n != top_n {
            self.params.top_n = top_n;
            self.requery();
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,
    pub theme: Theme,
    /// The mounted view. Exactly one view is alive at a time.
    pub view: ViewState,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let theme = Theme::from_config(&config.theme);
        let view = ViewState::mount(ViewKind::OrganizationMentions, &config);
        AppState {
            config,
            theme,
            view,
        }
    }

    /// Switch views. The previous view is dropped, cancelling its load.
    pub fn select_view(&mut self, kind: ViewKind) {
        if self.view.kind != kind {
            self.view = ViewState::mount(kind, &self.config);
        }
    }

    /// Remount the active view, reloading its resource.
    pub fn reload(&mut self) {
        self.view = ViewState::mount(self.view.kind, &self.config);
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) {
        log::info!("data directory set to {}", dir.display());
        self.config.data_dir = dir;
        self.reload();
    }
}
