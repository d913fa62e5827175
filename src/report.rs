//! Side by side comparison of exact counting and sketch estimation.

use std::path::Path;
use std::time::{Duration, Instant};

use tabled::settings::{Settings, Style};
use tabled::{Table, Tabled};
use tracing::info;

use crate::config::SketchConfig;
use crate::error::{ConfigurationError, Result};
use crate::exact::exact_count;
use crate::source::RecordSource;

/// Outcome of counting the same elements exactly and with a sketch
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub exact: usize,
    pub estimate: f64,
    pub exact_elapsed: Duration,
    pub sketch_elapsed: Duration,
    /// Malformed records skipped while loading elements
    pub errors: usize,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "")]
    metric: &'static str,
    #[tabled(rename = "Exact count")]
    exact: String,
    #[tabled(rename = "HyperLogLog")]
    hyperloglog: String,
}

impl Comparison {
    /// Relative error of the estimate, zero when there are no elements
    pub fn relative_error(&self) -> f64 {
        if self.exact == 0 {
            return 0.0;
        }
        (self.estimate - self.exact as f64).abs() / self.exact as f64
    }

    /// Render comparison as markdown table
    pub fn to_table(&self) -> String {
        let rows = [
            Row {
                metric: "Distinct elements",
                exact: format!("{:.1}", self.exact as f64),
                hyperloglog: format!("{:.1}", self.estimate),
            },
            Row {
                metric: "Elapsed (sec)",
                exact: format!("{:.4}", self.exact_elapsed.as_secs_f64()),
                hyperloglog: format!("{:.4}", self.sketch_elapsed.as_secs_f64()),
            },
            Row {
                metric: "Relative error",
                exact: format!("{:.4}", 0.0),
                hyperloglog: format!("{:.4}", self.relative_error()),
            },
        ];
        let table_config = Settings::default().with(Style::markdown());
        Table::new(rows).with(table_config).to_string()
    }
}

/// Count `elements` exactly and with a sketch built from `config`, timing both
pub fn compare<E: AsRef<[u8]>>(
    elements: &[E],
    config: &SketchConfig,
) -> std::result::Result<Comparison, ConfigurationError> {
    let mut sketch = config.build()?;

    let start = Instant::now();
    let exact = exact_count(elements);
    let exact_elapsed = start.elapsed();

    let start = Instant::now();
    sketch.extend(elements);
    let estimate = sketch.count();
    let sketch_elapsed = start.elapsed();

    Ok(Comparison {
        exact,
        estimate,
        exact_elapsed,
        sketch_elapsed,
        errors: 0,
    })
}

/// Load `field` of every record in the log at `path` and compare counting methods
pub fn compare_file<P: AsRef<Path>>(
    path: P,
    field: &str,
    config: &SketchConfig,
) -> Result<Comparison> {
    let path = path.as_ref();
    let mut source = RecordSource::open(path, field)?;
    let elements: Vec<String> = source.by_ref().collect();
    info!(
        path = %path.display(),
        records = elements.len(),
        errors = source.errors(),
        "loaded records"
    );

    let mut comparison = compare(&elements, config)?;
    comparison.errors = source.errors();
    info!(
        exact = comparison.exact,
        estimate = comparison.estimate,
        relative_error = comparison.relative_error(),
        "compared counting methods"
    );
    Ok(comparison)
}
