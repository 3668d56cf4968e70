use std::collections::BTreeSet;

use crate::data::aggregate::{AggregateConfig, Summaries};
use crate::data::filter::{filtered_indices, FilterSpec, RangeFilter};
use crate::data::loader::LoadError;
use crate::data::model::JobDataset;

// ---------------------------------------------------------------------------
// Categorical filter facets
// ---------------------------------------------------------------------------

/// The three categorical filter widgets in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Msa,
    EmploymentType,
    RemoteType,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::Msa, Facet::EmploymentType, Facet::RemoteType];

    pub fn label(&self) -> &'static str {
        match self {
            Facet::Msa => "MSA",
            Facet::EmploymentType => "Employment Type",
            Facet::RemoteType => "Remote Type",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded base table (None when the session-start load failed).
    pub dataset: Option<JobDataset>,

    /// Fatal load failure, rendered as a banner.
    pub load_error: Option<String>,

    /// Current filter selection.
    pub filters: FilterSpec,

    /// Raw slider positions; mapped onto `filters` when they narrow the
    /// dataset's domain.
    pub experience_range: (f64, f64),
    pub salary_range: (f64, f64),

    /// Indices of postings passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Summary tables for the charts (cached, recomputed with the
    /// indices).
    pub summaries: Summaries,

    pub config: AggregateConfig,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state from the session-start load result. A failed load
    /// leaves the app running with an error banner; there is no retry.
    pub fn new(load_result: Result<JobDataset, LoadError>) -> Self {
        let mut state = AppState {
            dataset: None,
            load_error: None,
            filters: FilterSpec::default(),
            experience_range: (0.0, 0.0),
            salary_range: (0.0, 0.0),
            visible_indices: Vec::new(),
            summaries: Summaries::default(),
            config: AggregateConfig::default(),
            status_message: None,
        };
        match load_result {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => state.load_error = Some(e.to_string()),
        }
        state
    }

    /// Ingest the loaded dataset and show everything.
    pub fn set_dataset(&mut self, dataset: JobDataset) {
        self.filters = FilterSpec::default();
        self.experience_range = (0.0, dataset.max_experience);
        self.salary_range = (0.0, dataset.max_salary);
        self.dataset = Some(dataset);
        self.refilter();
    }

    /// Recompute the filtered indices and every summary table. Runs
    /// synchronously after each widget change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.experience =
                active_range(self.experience_range, (0.0, ds.max_experience));
            self.filters.salary = active_range(self.salary_range, (0.0, ds.max_salary));
            self.visible_indices = filtered_indices(ds, &self.filters);
            self.summaries = Summaries::compute(ds, &self.visible_indices, &self.config);
        }
    }

    /// The selectable values for a facet, from the base table.
    pub fn facet_values(&self, facet: Facet) -> BTreeSet<String> {
        match &self.dataset {
            Some(ds) => match facet {
                Facet::Msa => ds.msas.clone(),
                Facet::EmploymentType => ds.employment_types.clone(),
                Facet::RemoteType => ds.remote_types.clone(),
            },
            None => BTreeSet::new(),
        }
    }

    /// The current selection for a facet. Empty means "no restriction".
    pub fn facet_selection(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Msa => &mut self.filters.msas,
            Facet::EmploymentType => &mut self.filters.employment_types,
            Facet::RemoteType => &mut self.filters.remote_types,
        }
    }

    /// Toggle a single value in a facet's selection.
    pub fn toggle_value(&mut self, facet: Facet, value: &str) {
        let selected = self.facet_selection(facet);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select every value in a facet.
    pub fn select_all(&mut self, facet: Facet) {
        let all = self.facet_values(facet);
        *self.facet_selection(facet) = all;
        self.refilter();
    }

    /// Clear a facet's selection, lifting its restriction.
    pub fn select_none(&mut self, facet: Facet) {
        self.facet_selection(facet).clear();
        self.refilter();
    }
}

/// A slider spanning the whole data domain imposes no restriction.
fn active_range(widget: (f64, f64), domain: (f64, f64)) -> Option<RangeFilter> {
    let (lo, hi) = widget;
    if lo <= domain.0 && hi >= domain.1 {
        None
    } else {
        Some(RangeFilter::new(lo, hi))
    }
}
