// src/render/mod.rs

use anyhow::Result;

use crate::process::PopulationMap;

pub mod svg;
pub mod world;

pub use world::WorldMap;

/// One choropleth to draw: values keyed by lower-case region code.
#[derive(Debug, Clone)]
pub struct Choropleth<'a> {
    pub title: &'a str,
    /// Series label shown in the legend (the report year).
    pub label: String,
    pub values: &'a PopulationMap,
}

/// A map backend: knows which region codes it can draw and renders a
/// choropleth to an SVG document.
pub trait RegionMap {
    fn recognizes(&self, code: &str) -> bool;

    fn render(&self, chart: &Choropleth<'_>) -> Result<String>;
}
