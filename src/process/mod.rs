// src/process/mod.rs

pub mod archive;
pub mod population;
pub mod sheet;

pub use archive::read_member_text;
pub use population::{build_population_map, PopulationMap};
pub use sheet::{parse_sheet, remove_trailing_comma, Sheet};
