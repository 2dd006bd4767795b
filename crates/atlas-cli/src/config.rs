//! Configuration for a command line run.
//!
//! Inputs come from environment variables. Selection tuning lives in the
//! YAML file named by `ATLAS_CONFIG`; everything else here says which
//! payloads to read and what the viewer is looking at.

use std::path::PathBuf;

use atlas_core::temporal::resolve_ms;
use atlas_types::{FuzzyDate, GeoBounds, VisibleWindow};

use crate::error::CliError;

/// Complete run configuration loaded from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// YAML configuration file; defaults apply when unset.
    pub config_path: Option<PathBuf>,
    /// Events payload (pages, a page, or a bare list).
    pub events_path: PathBuf,
    /// Categories payload, if groups should carry category names.
    pub categories_path: Option<PathBuf>,
    /// Visible window; `None` runs the pipeline unwindowed.
    pub window: Option<VisibleWindow>,
    /// Visible map rectangle.
    pub bounds: Option<GeoBounds>,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `ATLAS_EVENTS` -- path to the events JSON payload
    ///
    /// Optional variables:
    /// - `ATLAS_CONFIG` -- path to `atlas-config.yaml`
    /// - `ATLAS_CATEGORIES` -- path to the categories JSON payload
    /// - `ATLAS_WINDOW_START` / `ATLAS_WINDOW_END` -- visible window as
    ///   fuzzy dates (`1940-01-01`, `-0044-03`, ...); set both or neither
    /// - `ATLAS_BOUNDS` -- `south,west,north,east` in degrees
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CliError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let events_path = non_empty("ATLAS_EVENTS")
            .map(PathBuf::from)
            .ok_or(CliError::MissingVar("ATLAS_EVENTS"))?;

        let window = match (
            non_empty("ATLAS_WINDOW_START"),
            non_empty("ATLAS_WINDOW_END"),
        ) {
            (None, None) => None,
            (Some(start), Some(end)) => Some(VisibleWindow::new(
                parse_instant("ATLAS_WINDOW_START", &start)?,
                parse_instant("ATLAS_WINDOW_END", &end)?,
            )),
            (Some(_), None) => return Err(CliError::MissingVar("ATLAS_WINDOW_END")),
            (None, Some(_)) => return Err(CliError::MissingVar("ATLAS_WINDOW_START")),
        };

        let bounds = non_empty("ATLAS_BOUNDS")
            .map(|raw| parse_bounds(&raw))
            .transpose()?;

        Ok(Self {
            config_path: non_empty("ATLAS_CONFIG").map(PathBuf::from),
            events_path,
            categories_path: non_empty("ATLAS_CATEGORIES").map(PathBuf::from),
            window,
            bounds,
        })
    }
}

fn parse_instant(name: &'static str, raw: &str) -> Result<i64, CliError> {
    resolve_ms(&FuzzyDate::new(raw.trim())).ok_or_else(|| CliError::InvalidVar {
        name,
        reason: format!("unrecognized date {raw:?}"),
    })
}

fn parse_bounds(raw: &str) -> Result<GeoBounds, CliError> {
    let invalid = |reason: String| CliError::InvalidVar {
        name: "ATLAS_BOUNDS",
        reason,
    };

    let values = raw
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| invalid(format!("{part:?}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let [south, west, north, east] = values.as_slice() else {
        return Err(invalid(format!(
            "expected south,west,north,east, got {} values",
            values.len()
        )));
    };
    if values.iter().any(|value| !value.is_finite()) {
        return Err(invalid("edges must be finite numbers".to_owned()));
    }
    if south > north {
        return Err(invalid("south edge is above north edge".to_owned()));
    }

    Ok(GeoBounds {
        south: *south,
        west: *west,
        north: *north,
        east: *east,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn minimal_environment() {
        let config = CliConfig::from_lookup(lookup(&[("ATLAS_EVENTS", "events.json")]));
        assert!(config.is_ok(), "{config:?}");
        let Ok(config) = config else { return };
        assert_eq!(config.events_path, PathBuf::from("events.json"));
        assert_eq!(config.config_path, None);
        assert_eq!(config.window, None);
        assert_eq!(config.bounds, None);
    }

    #[test]
    fn events_path_is_required() {
        let config = CliConfig::from_lookup(lookup(&[("ATLAS_EVENTS", "  ")]));
        assert!(matches!(config, Err(CliError::MissingVar("ATLAS_EVENTS"))));
    }

    #[test]
    fn window_accepts_fuzzy_dates_in_either_order() {
        let config = CliConfig::from_lookup(lookup(&[
            ("ATLAS_EVENTS", "events.json"),
            ("ATLAS_WINDOW_START", "1945"),
            ("ATLAS_WINDOW_END", "-0044-03-15"),
        ]));
        let window = config.ok().and_then(|c| c.window);
        assert!(window.is_some());
        assert!(window.is_some_and(|w| w.start_ms < w.end_ms));
    }

    #[test]
    fn half_a_window_is_an_error() {
        let config = CliConfig::from_lookup(lookup(&[
            ("ATLAS_EVENTS", "events.json"),
            ("ATLAS_WINDOW_START", "1940"),
        ]));
        assert!(matches!(config, Err(CliError::MissingVar("ATLAS_WINDOW_END"))));

        let config = CliConfig::from_lookup(lookup(&[
            ("ATLAS_EVENTS", "events.json"),
            ("ATLAS_WINDOW_START", "someday"),
            ("ATLAS_WINDOW_END", "1941"),
        ]));
        assert!(matches!(config, Err(CliError::InvalidVar { name: "ATLAS_WINDOW_START", .. })));
    }

    #[test]
    fn bounds_parse() {
        let config = CliConfig::from_lookup(lookup(&[
            ("ATLAS_EVENTS", "events.json"),
            ("ATLAS_BOUNDS", "35, -10, 60, 30"),
        ]));
        let bounds = config.ok().and_then(|c| c.bounds);
        assert_eq!(
            bounds,
            Some(GeoBounds {
                south: 35.0,
                west: -10.0,
                north: 60.0,
                east: 30.0,
            })
        );
    }

    #[test]
    fn malformed_bounds_are_rejected() {
        for raw in ["1,2,3", "a,b,c,d", "60,-10,35,30", "NaN,-10,60,30", "35,-10,60,inf"] {
            let config = CliConfig::from_lookup(lookup(&[
                ("ATLAS_EVENTS", "events.json"),
                ("ATLAS_BOUNDS", raw),
            ]));
            assert!(
                matches!(config, Err(CliError::InvalidVar { name: "ATLAS_BOUNDS", .. })),
                "{raw}: {config:?}"
            );
        }
    }
}
