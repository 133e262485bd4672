// ==========================================
// Offshore Logistics - Pipeline Rules
// ==========================================
// Scope: category sets and marker vocabularies used by the
// normalizers and metric calculators
// Every field has a default; a partial JSON file only overrides
// the keys it names
// ==========================================

use crate::engine::text_match::{compact, contains_any_phrase, normalize_text};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RulesError {
    #[error("rules file not found: {0}")]
    FileNotFound(String),

    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid rules JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineRules {
    /// Voyage event categories counted as waiting (before weather exclusion)
    pub waiting_categories: Vec<String>,
    /// Voyage event categories counted as non-productive time
    pub npt_categories: Vec<String>,
    /// Tokens marking an event as weather-driven
    pub weather_markers: Vec<String>,
    /// Fluid-type phrases tagged as fuel
    pub fuel_markers: Vec<String>,
    /// Destination phrases that mark a shore base rather than an offshore facility
    pub port_markers: Vec<String>,
    /// Vessel ids of the delivery baseline fleet; empty = every active in-fleet vessel
    pub baseline_fleet: Vec<String>,
    /// Keep-last de-duplication by business key
    pub deduplicate: bool,
}

impl Default for PipelineRules {
    fn default() -> Self {
        Self {
            waiting_categories: strings(&[
                "Waiting on Installation",
                "Waiting on Rig",
                "Waiting on Platform",
                "Standby",
            ]),
            npt_categories: strings(&[
                "Waiting on Installation",
                "Waiting on Rig",
                "Waiting on Platform",
                "Waiting on Weather",
                "Standby",
                "Breakdown",
                "Maintenance",
                "Repair",
            ]),
            weather_markers: strings(&["weather", "wow"]),
            fuel_markers: strings(&["diesel", "fuel", "gas oil", "marine gas oil", "mgo"]),
            port_markers: strings(&["fourchon", "port", "galliano", "dock", "shore base"]),
            baseline_fleet: Vec::new(),
            deduplicate: true,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn in_category_set(category: &str, set: &[String]) -> bool {
    let key = normalize_text(category);
    !key.is_empty() && set.iter().any(|c| normalize_text(c) == key)
}

impl PipelineRules {
    pub fn from_json_str(json: &str) -> Result<Self, RulesError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, RulesError> {
        if !path.exists() {
            return Err(RulesError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn is_waiting_category(&self, category: &str) -> bool {
        in_category_set(category, &self.waiting_categories)
    }

    pub fn is_npt_category(&self, category: &str) -> bool {
        in_category_set(category, &self.npt_categories)
    }

    /// Token-aware: "WOW" matches, "Snowfall" does not.
    pub fn has_weather_marker(&self, text: &str) -> bool {
        contains_any_phrase(text, &self.weather_markers)
    }

    /// Substring match on the compact form, so "Biodiesel" and "FuelOil" are fuel.
    pub fn is_fuel(&self, fluid_type: &str) -> bool {
        let fluid = compact(fluid_type);
        self.fuel_markers.iter().any(|marker| {
            let marker = compact(marker);
            !marker.is_empty() && fluid.contains(&marker)
        })
    }

    pub fn is_port(&self, destination: &str) -> bool {
        contains_any_phrase(destination, &self.port_markers)
    }
}
