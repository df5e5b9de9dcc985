//! Material and disaster catalog.
//!
//! The catalog is static data: per (component, tier) resistance and unit
//! cost, and per disaster base power. A built-in table reproduces the shipped
//! game balance; an external JSON document with the same shape as
//! `data/catalog.json` can replace it. Once a `Catalog` exists every lookup is
//! total.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::{ComponentKind, DisasterKind, MaterialTier};

/// One material option for one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCatalogEntry {
    pub name: String,
    pub resistance: f64,
    pub cost: f64,
}

/// Display label plus the four material options of a component.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentEntry {
    pub label: String,
    /// Indexed by `MaterialTier::index()`.
    pub materials: [MaterialCatalogEntry; 4],
}

/// A disaster and its base power before intensity scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterSpec {
    pub label: String,
    pub power: f64,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog is missing component `{0}`")]
    MissingComponent(&'static str),
    #[error("component `{component}` is missing tier `{tier}`")]
    MissingTier {
        component: &'static str,
        tier: &'static str,
    },
    #[error("catalog is missing disaster `{0}`")]
    MissingDisaster(&'static str),
    #[error("{what} must be a finite non-negative number (got {value})")]
    InvalidValue { what: String, value: f64 },
    #[error("empty tier of `{0}` must have zero resistance and zero cost")]
    NonZeroEmpty(&'static str),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    components: BTreeMap<ComponentKind, ComponentFile>,
    disasters: BTreeMap<DisasterKind, DisasterSpec>,
}

#[derive(Debug, Deserialize)]
struct ComponentFile {
    label: String,
    materials: BTreeMap<MaterialTier, MaterialCatalogEntry>,
}

/// Validated catalog with total lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    /// Indexed by `ComponentKind::index()`.
    components: Vec<ComponentEntry>,
    /// Indexed by `DisasterKind::index()`.
    disasters: Vec<DisasterSpec>,
}

impl Catalog {
    /// The shipped game balance.
    pub fn builtin() -> Self {
        Self {
            components: ComponentKind::ALL.iter().map(|&c| builtin_component(c)).collect(),
            disasters: DisasterKind::ALL.iter().map(|&d| builtin_disaster(d)).collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_file_data(file)
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    fn from_file_data(mut file: CatalogFile) -> Result<Self, CatalogError> {
        let mut components = Vec::with_capacity(ComponentKind::ALL.len());
        for component in ComponentKind::ALL {
            let mut entry = file
                .components
                .remove(&component)
                .ok_or(CatalogError::MissingComponent(component.as_str()))?;
            let mut take = |tier: MaterialTier| -> Result<MaterialCatalogEntry, CatalogError> {
                let material =
                    entry
                        .materials
                        .remove(&tier)
                        .ok_or(CatalogError::MissingTier {
                            component: component.as_str(),
                            tier: tier.as_str(),
                        })?;
                check_value(
                    format!("{}.{}.resistance", component.as_str(), tier.as_str()),
                    material.resistance,
                )?;
                check_value(
                    format!("{}.{}.cost", component.as_str(), tier.as_str()),
                    material.cost,
                )?;
                Ok(material)
            };
            let materials = [
                take(MaterialTier::Empty)?,
                take(MaterialTier::Weak)?,
                take(MaterialTier::Medium)?,
                take(MaterialTier::Strong)?,
            ];
            if materials[0].resistance != 0.0 || materials[0].cost != 0.0 {
                return Err(CatalogError::NonZeroEmpty(component.as_str()));
            }
            components.push(ComponentEntry {
                label: entry.label,
                materials,
            });
        }

        let mut disasters = Vec::with_capacity(DisasterKind::ALL.len());
        for disaster in DisasterKind::ALL {
            let info = file
                .disasters
                .remove(&disaster)
                .ok_or(CatalogError::MissingDisaster(disaster.as_str()))?;
            check_value(format!("{}.power", disaster.as_str()), info.power)?;
            disasters.push(info);
        }

        Ok(Self {
            components,
            disasters,
        })
    }

    pub fn component(&self, component: ComponentKind) -> &ComponentEntry {
        &self.components[component.index()]
    }

    pub fn component_label(&self, component: ComponentKind) -> &str {
        &self.component(component).label
    }

    pub fn material(&self, component: ComponentKind, tier: MaterialTier) -> &MaterialCatalogEntry {
        &self.component(component).materials[tier.index()]
    }

    pub fn resistance(&self, component: ComponentKind, tier: MaterialTier) -> f64 {
        self.material(component, tier).resistance
    }

    pub fn unit_cost(&self, component: ComponentKind, tier: MaterialTier) -> f64 {
        self.material(component, tier).cost
    }

    pub fn disaster(&self, disaster: DisasterKind) -> &DisasterSpec {
        &self.disasters[disaster.index()]
    }

    pub fn disaster_power(&self, disaster: DisasterKind) -> f64 {
        self.disaster(disaster).power
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn check_value(what: String, value: f64) -> Result<(), CatalogError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidValue { what, value })
    }
}

fn entry(name: &str, resistance: f64, cost: f64) -> MaterialCatalogEntry {
    MaterialCatalogEntry {
        name: name.to_string(),
        resistance,
        cost,
    }
}

fn builtin_component(component: ComponentKind) -> ComponentEntry {
    let empty = entry("No Structure", 0.0, 0.0);
    let (label, weak, medium, strong) = match component {
        ComponentKind::Roof => (
            "Roof",
            entry("PVC Tile", 30.0, 164.0),
            entry("Ceramic Tile", 35.0, 200.0),
            entry("Solid Slab", 70.0, 350.0),
        ),
        ComponentKind::Walls => (
            "Walls",
            entry("Drywall", 45.0, 150.0),
            entry("Ceramic Block", 65.0, 250.0),
            entry("Concrete Block", 75.0, 350.0),
        ),
        ComponentKind::Pillars => (
            "Pillars",
            entry("Precast Concrete", 70.0, 180.0),
            entry("Timber Pillar", 75.0, 225.0),
            entry("Reinforced Concrete", 90.0, 300.0),
        ),
        ComponentKind::Beams => (
            "Beams",
            entry("Steel Beam", 30.0, 18.0),
            entry("Reinforced Concrete Beam", 80.0, 150.0),
            entry("Solid Timber Beam", 90.0, 849.0),
        ),
        ComponentKind::Floor => (
            "Floor",
            entry("Ceramic Flooring", 40.0, 24.0),
            entry("Vinyl Flooring", 50.0, 75.0),
            entry("Porcelain Tile", 60.0, 105.0),
        ),
        ComponentKind::Glass => (
            "Glass",
            entry("Open Span", 1.0, 0.0),
            entry("Common Glass", 50.0, 115.0),
            entry("Tempered Glass", 60.0, 750.0),
        ),
        ComponentKind::Foundations => (
            "Foundations",
            entry("Strip Footing", 80.0, 220.0),
            entry("Raft Foundation", 95.0, 230.0),
            entry("Grade Beam", 110.0, 150.0),
        ),
        ComponentKind::LightningRod => (
            "Lightning Protection",
            entry("No Protection", 0.0, 0.0),
            entry("Franklin Rod", 25.0, 30000.0),
            entry("Faraday Cage", 45.0, 55000.0),
        ),
        ComponentKind::WindDampers => (
            "Hurricane Protection",
            entry("No Protection", 0.0, 0.0),
            entry("Laminated Glazing", 20.0, 200.0),
            entry("Wind Dampers", 25.0, 1150.0),
        ),
        ComponentKind::TsunamiBarriers => (
            "Tsunami Protection",
            entry("No Protection", 0.0, 0.0),
            entry("Breakwater Wall", 35.0, 650.0),
            entry("Flood Barriers", 40.0, 1250.0),
        ),
        ComponentKind::SeismicDampers => (
            "Earthquake Protection",
            entry("No Protection", 0.0, 0.0),
            entry("Hydraulic Dampers", 50.0, 900.0),
            entry("Seismic Isolators", 55.0, 1000.0),
        ),
    };
    ComponentEntry {
        label: label.to_string(),
        materials: [empty, weak, medium, strong],
    }
}

fn builtin_disaster(disaster: DisasterKind) -> DisasterSpec {
    let (label, power) = match disaster {
        DisasterKind::Earthquake => ("Earthquake", 135.0),
        DisasterKind::Hurricane => ("Hurricane", 90.0),
        DisasterKind::Tsunami => ("Tsunami", 110.0),
        DisasterKind::LightningStorm => ("Lightning Storm", 120.0),
    };
    DisasterSpec {
        label: label.to_string(),
        power,
    }
}
