//! Subcommands and their translation into chart requests.

use chrono::{Datelike as _, NaiveDate, Utc};
use clap::Subcommand;
use quake_map_charts::ViewRequest;
use quake_map_dataset::{Dataset, queries};
use quake_map_dataset_models::{
    DateRange, FilterCriteria, MagnitudeRange, MonthSelection, RiskMetric,
};
use quake_map_quake_models::MagnitudeCategory;

use crate::config::DashboardConfig;

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Commands {
    /// Print load statistics plus the available years and countries
    Summary,
    /// World map with impact circles
    Map {
        /// Only events from this year (defaults to `default_year`, else all)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Depth versus magnitude scatter plot
    Scatter {
        /// Case-insensitive substring of the place name
        #[arg(long)]
        country: Option<String>,
        /// Smallest magnitude included
        #[arg(long, requires = "max_mag")]
        min_mag: Option<f64>,
        /// Largest magnitude included
        #[arg(long, requires = "min_mag")]
        max_mag: Option<f64>,
    },
    /// Event counts and average magnitude over time
    Timeseries {
        /// Year to chart (defaults to `default_year`, else the latest year)
        #[arg(long)]
        year: Option<i32>,
        /// `all` for daily-by-month over the whole year, or a month 1-12
        #[arg(long, default_value = "all")]
        month: MonthSelection,
        /// Case-insensitive substring of the place name
        #[arg(long)]
        country: Option<String>,
        /// Magnitude category: `low`, `medium` or `high`
        #[arg(long)]
        category: Option<MagnitudeCategory>,
        /// Show the running total of events
        #[arg(long)]
        cumulative: bool,
        /// Show a trailing moving average of event counts
        #[arg(long)]
        moving_average: bool,
    },
    /// Per-country risk choropleth
    Risk {
        /// `count`, `avg_magnitude` or `max_magnitude`
        #[arg(long, default_value = "count")]
        metric: RiskMetric,
    },
    /// Events of a single country on a zoomed map
    Country {
        /// Country name
        name: String,
        /// First date included (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,
        /// Last date included (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
    },
    /// Felt-radius circle and nearby events for one earthquake
    Epicentre {
        /// Earthquake identifier
        id: String,
        /// Fixed felt radius in km (defaults to the configured formula)
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Magnitude histogram
    Distribution {
        /// Number of bins
        #[arg(long, default_value_t = queries::DEFAULT_HISTOGRAM_BINS)]
        bins: usize,
        /// Only events from this year
        #[arg(long)]
        year: Option<i32>,
        /// Case-insensitive substring of the place name
        #[arg(long)]
        country: Option<String>,
        /// Magnitude category: `low`, `medium` or `high`
        #[arg(long)]
        category: Option<MagnitudeCategory>,
    },
}

/// The chart request for `command`, or `None` for `summary`.
///
/// Years left unset on the command line fall back to the configured
/// `default_year`.
#[must_use]
pub fn build_request(
    command: Commands,
    config: &DashboardConfig,
    dataset: &Dataset,
) -> Option<ViewRequest> {
    let request = match command {
        Commands::Summary => return None,
        Commands::Map { year } => ViewRequest::Map {
            year: year.or(config.default_year),
        },
        Commands::Scatter {
            country,
            min_mag,
            max_mag,
        } => ViewRequest::Scatter {
            country,
            magnitude_range: min_mag.zip(max_mag).map(|(a, b)| MagnitudeRange::new(a, b)),
        },
        Commands::Timeseries {
            year,
            month,
            country,
            category,
            cumulative,
            moving_average,
        } => ViewRequest::TimeSeries {
            year: time_series_year(year, config, dataset),
            month,
            country,
            category,
            cumulative,
            moving_average,
        },
        Commands::Risk { metric } => ViewRequest::RiskMap { metric },
        Commands::Country { name, from, to } => ViewRequest::CountryFocus {
            country: name,
            date_range: from.zip(to).map(|(from, to)| DateRange { from, to }),
        },
        Commands::Epicentre { id, radius } => ViewRequest::Epicentre {
            id,
            radius_km: radius,
        },
        Commands::Distribution {
            bins,
            year,
            country,
            category,
        } => {
            let mut criteria = FilterCriteria::all();
            criteria.year = year;
            if let Some(country) = country {
                criteria = criteria.with_country(&country);
            }
            criteria.category = category;
            ViewRequest::Distribution { criteria, bins }
        }
    };
    Some(request)
}

/// Year charted by the time-series view: the flag, then `default_year`,
/// then the latest year in the data, then the current year.
#[must_use]
pub fn time_series_year(flag: Option<i32>, config: &DashboardConfig, dataset: &Dataset) -> i32 {
    flag.or(config.default_year)
        .or_else(|| queries::available_years(dataset).last().copied())
        .unwrap_or_else(|| Utc::now().year())
}
