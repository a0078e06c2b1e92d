//! Quantity types and their classification criteria.
//!
//! Each quantity type pairs a [`CriteriaEvaluator`], deciding per station
//! whether the section qualifies, with a [`Payload`](crate::engine::range::Payload)
//! carrying the quantity through cutting, merging and reporting.
//!
//! - [`soft_sub`] - soft-subgrade substitution under fill
//! - [`thin_fill`] - thin fill / shallow cut subgrade treatment
//! - [`steep_fill`] - embankments on steep natural ground
//! - [`stair_excavation`] - benching of moderately steep ground under fill
//! - [`road_surface`] - road shoulder soil
//! - [`high_fill`] - high fill / deep cut sections

pub mod ground;
pub mod high_fill;
pub mod road_surface;
pub mod soft_sub;
pub mod stair_excavation;
pub mod steep_fill;
pub mod thin_fill;

#[cfg(test)]
pub mod tests;

pub use high_fill::HighFillDeepCut;
pub use road_surface::RoadSurface;
pub use soft_sub::SoftSubstitution;
pub use stair_excavation::StairExcavation;
pub use steep_fill::SteepFill;
pub use thin_fill::ThinFillShallowCut;

use crate::config::{EngineConfig, MergePolicy};
use crate::engine::QuantityEngine;
use crate::engine::range::Payload;
use crate::engine::report::QuantityReport;
use crate::error::Result;
use crate::geometry::GeometryProvider;
use crate::models::SectionSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quantity types the engine can export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum QuantityKind {
    SoftSub,
    ThinFill,
    SteepFill,
    StairExcavation,
    RoadSurface,
    HighFill,
}

impl QuantityKind {
    pub const ALL: [QuantityKind; 6] = [
        QuantityKind::SoftSub,
        QuantityKind::ThinFill,
        QuantityKind::SteepFill,
        QuantityKind::StairExcavation,
        QuantityKind::RoadSurface,
        QuantityKind::HighFill,
    ];

    /// Name of the report sheet
    pub fn sheet_name(&self) -> &'static str {
        match self {
            QuantityKind::SoftSub => "Soft subgrade substitution",
            QuantityKind::ThinFill => "Thin fill shallow cut",
            QuantityKind::SteepFill => "Steep slope embankment",
            QuantityKind::StairExcavation => "Stair excavation",
            QuantityKind::RoadSurface => "Road shoulder",
            QuantityKind::HighFill => "High fill deep cut",
        }
    }
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sheet_name().to_lowercase())
    }
}

/// Per-station classification for one quantity type
pub trait CriteriaEvaluator {
    type Payload: Payload;

    fn kind(&self) -> QuantityKind;

    /// Mergeability policy applied to adjacent qualifying ranges
    fn merge_policy(&self) -> MergePolicy;

    /// Decide whether `section` qualifies and, if so, the quantity per metre
    /// of alignment attached to its range
    ///
    /// `Ok(None)` means the station does not qualify. Errors raised here are
    /// scoped to this station.
    fn evaluate(
        &self,
        section: &SectionSnapshot,
        geometry: &dyn GeometryProvider,
    ) -> Result<Option<Self::Payload>>;
}

fn run<E: CriteriaEvaluator>(
    evaluator: E,
    config: &EngineConfig,
    sections: &[SectionSnapshot],
    geometry: &dyn GeometryProvider,
    selection: Option<&[f64]>,
) -> Result<QuantityReport> {
    let engine = QuantityEngine::new(evaluator, config)?;
    match selection {
        Some(stations) => engine.export_selected(sections, geometry, stations),
        None => engine.export(sections, geometry),
    }
}

/// Export one quantity type chosen at runtime
pub fn export_quantity(
    kind: QuantityKind,
    config: &EngineConfig,
    sections: &[SectionSnapshot],
    geometry: &dyn GeometryProvider,
    selection: Option<&[f64]>,
) -> Result<QuantityReport> {
    match kind {
        QuantityKind::SoftSub => run(
            SoftSubstitution::from_config(config)?,
            config,
            sections,
            geometry,
            selection,
        ),
        QuantityKind::ThinFill => run(
            ThinFillShallowCut::from_config(config)?,
            config,
            sections,
            geometry,
            selection,
        ),
        QuantityKind::SteepFill => run(
            SteepFill::from_config(config)?,
            config,
            sections,
            geometry,
            selection,
        ),
        QuantityKind::StairExcavation => run(
            StairExcavation::from_config(config)?,
            config,
            sections,
            geometry,
            selection,
        ),
        QuantityKind::RoadSurface => run(
            RoadSurface::from_config(config)?,
            config,
            sections,
            geometry,
            selection,
        ),
        QuantityKind::HighFill => run(
            HighFillDeepCut::from_config(config)?,
            config,
            sections,
            geometry,
            selection,
        ),
    }
}
