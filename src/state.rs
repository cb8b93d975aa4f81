use std::path::Path;

use chrono::Weekday;
use sales_panda::data::filter::FilterSpec;
use sales_panda::data::loader;
use sales_panda::data::model::{SalesDataset, WEEKDAYS};
use sales_panda::data::report::SalesReport;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Dashboard tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Trend,
    Products,
    Regions,
    Customers,
    Temporal,
    Insights,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Trend,
        Tab::Products,
        Tab::Regions,
        Tab::Customers,
        Tab::Temporal,
        Tab::Insights,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Trend => "📈 Trend",
            Tab::Products => "🏆 Products",
            Tab::Regions => "🌎 Regions",
            Tab::Customers => "👥 Customers",
            Tab::Temporal => "⏰ Temporal",
            Tab::Insights => "📊 Insights",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<SalesDataset>,

    /// Current filter selection, edited by the side panel.
    pub filters: FilterSpec,

    /// Report for `report_filters`, recomputed only when the filters change.
    report: Option<SalesReport>,
    report_filters: Option<FilterSpec>,

    /// Cutoff for the top-N rankings.
    pub top_n: usize,

    /// Prefix for money values.
    pub currency: String,

    /// Stable colour per region.
    pub region_colors: ColorMap,

    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(top_n: usize, currency: impl Into<String>) -> Self {
        Self {
            dataset: None,
            filters: FilterSpec::default(),
            report: None,
            report_filters: None,
            top_n,
            currency: currency.into(),
            region_colors: ColorMap::default(),
            active_tab: Tab::default(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset: select everything and colour regions.
    pub fn set_dataset(&mut self, dataset: SalesDataset) {
        self.filters = FilterSpec::select_all(&dataset);
        self.region_colors = ColorMap::new(&dataset.regions());
        self.report = None;
        self.report_filters = None;

        self.status_message = (dataset.dropped_rows > 0).then(|| {
            format!(
                "{} rows skipped: unparseable order date",
                dataset.dropped_rows
            )
        });
        self.dataset = Some(dataset);
    }

    /// Load a file. On failure the previous dataset is discarded so no stale
    /// dashboard stays on screen.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.dataset = None;
                self.report = None;
                self.report_filters = None;
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Re-read the current dataset from its source file.
    pub fn reload(&mut self) {
        let Some(path) = self.dataset.as_ref().and_then(|ds| ds.source.clone()) else {
            self.status_message = Some("Nothing to reload".to_string());
            return;
        };
        self.load_path(&path);
    }

    /// Write the normalized dataset to `path` as CSV.
    pub fn export_to(&mut self, path: &Path) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        self.status_message = match loader::save_csv(dataset, path) {
            Ok(()) => Some(format!("Exported {} sales to {}", dataset.len(), path.display())),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                Some(format!("Error: {e:#}"))
            }
        };
    }

    /// Report for the current filters, recomputing only if they changed.
    pub fn report(&mut self) -> Option<&SalesReport> {
        let dataset = self.dataset.as_ref()?;
        if self.report.is_none() || self.report_filters.as_ref() != Some(&self.filters) {
            log::debug!("Recomputing report for {:?}", self.filters);
            self.report = Some(SalesReport::compute(dataset, &self.filters, self.top_n));
            self.report_filters = Some(self.filters.clone());
        }
        self.report.as_ref()
    }

    /// Restore the "everything selected" filters.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters = FilterSpec::select_all(ds);
        }
    }

    /// Toggle a single region in the region filter.
    pub fn toggle_region(&mut self, region: &str) {
        let selected = self.filters.regions.get_or_insert_with(Default::default);
        if !selected.remove(region) {
            selected.insert(region.to_string());
        }
    }

    /// Select all regions.
    pub fn select_all_regions(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.regions = Some(ds.regions().into_iter().collect());
        }
    }

    /// Deselect all regions; the dashboard then shows no data.
    pub fn select_no_regions(&mut self) {
        self.filters.regions = Some(Default::default());
    }

    /// Toggle a single weekday in the weekday filter.
    pub fn toggle_weekday(&mut self, day: Weekday) {
        let selected = self.filters.weekdays.get_or_insert_with(Default::default);
        if !selected.remove(&day) {
            selected.insert(day);
        }
    }

    pub fn select_all_weekdays(&mut self) {
        self.filters.weekdays = Some(WEEKDAYS.iter().copied().collect());
    }

    pub fn select_no_weekdays(&mut self) {
        self.filters.weekdays = Some(Default::default());
    }

    pub fn is_region_selected(&self, region: &str) -> bool {
        self.filters
            .regions
            .as_ref()
            .map_or(true, |set| set.contains(region))
    }

    pub fn is_weekday_selected(&self, day: Weekday) -> bool {
        self.filters
            .weekdays
            .as_ref()
            .map_or(true, |set| set.contains(&day))
    }
}
