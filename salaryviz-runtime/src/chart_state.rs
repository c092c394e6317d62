use crate::data::loader::DatasetLoader;
use crate::data::normalize::{normalize_table, NormalizeReport};
use crate::tokio_runtime::TOKIO_RUNTIME;
use salaryviz_common::data::table::SalaryTable;
use salaryviz_common::error::{FieldParseError, Result, ResultWithContext, SalaryVizError};
use salaryviz_core::data::record::{RecordId, SalaryRecord};
use salaryviz_core::encoding::histogram::HistogramEncoding;
use salaryviz_core::encoding::join::{join, JoinDiff, MarkKey};
use salaryviz_core::encoding::{encode_charts, EncodedCharts};
use salaryviz_core::interaction::brush::Brush;
use salaryviz_core::interaction::view::{ViewKind, ViewSwitcher};
use salaryviz_core::interaction::zoom::{ZoomBehavior, ZoomTransform};
use salaryviz_core::spec::chart::ChartConfig;
#[cfg(feature = "fs")]
use std::path::Path;

/// Read and validate a JSON chart configuration file
#[cfg(feature = "fs")]
pub async fn read_chart_config<P: AsRef<Path>>(path: P) -> Result<ChartConfig> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read chart configuration {}", path.display()))?;
    ChartConfig::from_json(&text)
}

/// Result of reloading the dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ReloadSummary {
    /// False when the new table is identical to the previous one
    pub changed: bool,
    /// Mark differences for every view, in `ViewKind::ALL` order
    pub diffs: Vec<(ViewKind, JoinDiff<MarkKey>)>,
}

/// Everything rendered for one loaded dataset, plus the interaction state applied on top of it.
///
/// Owned and mutated by a single caller. Encodings are recomputed from the records only when
/// the data changes. Interactions work on the existing encodings.
#[derive(Debug, Clone)]
pub struct ChartState {
    config: ChartConfig,
    table_hash: u64,
    report: NormalizeReport,
    charts: EncodedCharts,
    views: ViewSwitcher,
    brush: Option<Brush>,
    brushed: Vec<RecordId>,
    zoom: ZoomBehavior,
    zoom_transform: ZoomTransform,
    zoomed_histogram: HistogramEncoding,
}

impl ChartState {
    pub async fn try_new(loader: &dyn DatasetLoader, config: ChartConfig) -> Result<Self> {
        config.validate()?;
        let table = load_table(loader, &config.data_url).await?;
        Self::try_from_table(&table, config)
    }

    /// Blocking variant of [`ChartState::try_new`] for callers outside an async context
    pub fn try_new_blocking(loader: &dyn DatasetLoader, config: ChartConfig) -> Result<Self> {
        TOKIO_RUNTIME.block_on(Self::try_new(loader, config))
    }

    pub fn try_from_table(table: &SalaryTable, config: ChartConfig) -> Result<Self> {
        config.validate()?;
        let report = normalize_table(table, &config.normalize)
            .with_context(|| format!("Failed to normalize {}", config.data_url))?;
        let charts = encode_charts(&config, &report.records)?;
        let zoom = ZoomBehavior::new(config.layout.band_extent());

        log::info!(
            "Chart state ready: {} records, initial view {}",
            report.records.len(),
            config.initial_view
        );

        Ok(Self {
            views: ViewSwitcher::new(config.initial_view),
            table_hash: table.get_hash(),
            zoomed_histogram: charts.histogram.clone(),
            config,
            report,
            charts,
            brush: None,
            brushed: Vec::new(),
            zoom,
            zoom_transform: ZoomTransform::IDENTITY,
        })
    }

    pub fn get_config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn get_records(&self) -> &[SalaryRecord] {
        &self.report.records
    }

    pub fn get_parse_errors(&self) -> &[FieldParseError] {
        &self.report.errors
    }

    pub fn get_report(&self) -> &NormalizeReport {
        &self.report
    }

    /// Encodings without interaction applied
    pub fn get_charts(&self) -> &EncodedCharts {
        &self.charts
    }

    /// Histogram as currently zoomed
    pub fn get_histogram(&self) -> &HistogramEncoding {
        &self.zoomed_histogram
    }

    pub fn get_zoom_transform(&self) -> ZoomTransform {
        self.zoom_transform
    }

    pub fn get_brushed(&self) -> &[RecordId] {
        &self.brushed
    }

    pub fn active_view(&self) -> ViewKind {
        self.views.active()
    }

    pub fn is_visible(&self, view: ViewKind) -> bool {
        self.views.is_visible(view)
    }

    pub fn select_view(&mut self, view: ViewKind) -> bool {
        self.views.select(view)
    }

    /// Switch views in response to one of the `show-*` controls
    pub fn select_control(&mut self, control_id: &str) -> Result<bool> {
        self.views.select_control(control_id)
    }

    /// Set or clear the scatter plot brush and return the highlighted record ids.
    ///
    /// The selection is clipped to the plot area. A selection with no area clears the brush.
    pub fn brush(&mut self, selection: Option<[[f64; 2]; 2]>) -> &[RecordId] {
        self.brush = selection
            .map(|[a, b]| Brush::from_corners(a, b).clamp_to(self.config.layout.band_extent()))
            .filter(|brush| !brush.is_empty());
        self.brushed = self.charts.scatter.apply_brush(self.brush.as_ref());
        log::debug!("Brush selects {} points", self.brushed.len());
        &self.brushed
    }

    /// Zoom the histogram by `factor` around `anchor`, or around the plot center
    pub fn zoom_histogram(&mut self, factor: f64, anchor: Option<[f64; 2]>) -> &HistogramEncoding {
        let anchor = anchor.unwrap_or_else(|| self.zoom.center());
        let transform = self.zoom.scale_by(&self.zoom_transform, factor, anchor);
        self.set_zoom(transform)
    }

    pub fn pan_histogram(&mut self, dx: f64, dy: f64) -> &HistogramEncoding {
        let transform = self.zoom.pan_by(&self.zoom_transform, dx, dy);
        self.set_zoom(transform)
    }

    pub fn reset_zoom(&mut self) -> &HistogramEncoding {
        self.set_zoom(ZoomTransform::IDENTITY)
    }

    fn set_zoom(&mut self, transform: ZoomTransform) -> &HistogramEncoding {
        self.zoom_transform = transform;
        self.zoomed_histogram = self.charts.histogram.zoomed(&transform);
        &self.zoomed_histogram
    }

    /// Load the dataset again and re-encode when it changed.
    ///
    /// Brush and zoom carry over to the new encodings. Record ids are row indices, so marks for
    /// rows present in both versions are updates rather than exit plus enter.
    pub async fn reload(&mut self, loader: &dyn DatasetLoader) -> Result<ReloadSummary> {
        let table = load_table(loader, &self.config.data_url).await?;
        self.reload_table(&table)
    }

    pub fn reload_table(&mut self, table: &SalaryTable) -> Result<ReloadSummary> {
        let table_hash = table.get_hash();
        if table_hash == self.table_hash {
            log::debug!("Dataset unchanged, keeping current encodings");
            let diffs = ViewKind::ALL
                .into_iter()
                .map(|view| {
                    let keys = self.charts.mark_keys(view);
                    (view, join(&keys, &keys))
                })
                .collect();
            return Ok(ReloadSummary {
                changed: false,
                diffs,
            });
        }

        let report = normalize_table(table, &self.config.normalize)
            .with_context(|| format!("Failed to normalize {}", self.config.data_url))?;
        let charts = encode_charts(&self.config, &report.records)?;
        let diffs = ViewKind::ALL
            .into_iter()
            .map(|view| {
                (
                    view,
                    join(&self.charts.mark_keys(view), &charts.mark_keys(view)),
                )
            })
            .collect();

        self.table_hash = table_hash;
        self.report = report;
        self.charts = charts;
        self.brushed = self.charts.scatter.apply_brush(self.brush.as_ref());
        self.set_zoom(self.zoom_transform);

        log::info!("Reloaded dataset: {} records", self.report.records.len());
        Ok(ReloadSummary {
            changed: true,
            diffs,
        })
    }
}

async fn load_table(loader: &dyn DatasetLoader, url: &str) -> Result<SalaryTable> {
    match loader.load(url).await {
        Ok(table) => {
            log::debug!("Loaded {} rows from {url} via {}", table.num_rows(), loader.id());
            #[cfg(feature = "prettyprint")]
            if log::log_enabled!(log::Level::Trace) {
                if let Ok(preview) = table.pretty_format(Some(5)) {
                    log::trace!("First rows of {url}:\n{preview}");
                }
            }
            Ok(table)
        }
        Err(err) => {
            log::error!("Failed to load dataset {url}: {err}");
            Err(if err.is_resource_load() {
                err
            } else {
                SalaryVizError::resource_load(format!("Failed to load dataset {url}: {err}"))
            })
        }
    }
}
