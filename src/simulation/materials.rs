//! Material definitions and registry

use std::collections::HashMap;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SandboxError};
use crate::simulation::Reaction;

/// Dense index of a registered material, assigned in load order
pub type MaterialId = u16;

/// Ticks-to-live for fire and ticks-to-detonation for explosives
pub const DEFAULT_TIMER: u32 = 50;

/// Gravity constant for solids that don't specify one
pub const DEFAULT_SOLID_WEIGHT: f32 = 0.1;

/// Gravity constant for liquids that don't specify one
pub const DEFAULT_LIQUID_WEIGHT: f32 = 0.08;

/// Which per-tick movement rule applies to a material
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicalClass {
    /// Falls with gravity, topples off edges (sand, dirt). Weight 0 pins it in place (stone, wood).
    Solid,
    /// Falls with gravity, spreads sideways at random (water, oil, lava)
    Liquid,
    /// Drifts up and sideways at random (smoke, steam)
    Gas,
    /// Burns down a lifetime, ignites flammable neighbors
    Fire,
    /// Counts down and detonates
    Explosive,
}

bitflags! {
    /// Behavior flags orthogonal to the physical class
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct MaterialFlags: u8 {
        /// Turns into fire when fire touches it
        const FLAMMABLE = 1 << 0;
        /// Swaps down through liquids
        const SINKS_IN_LIQUID = 1 << 1;
        /// Molten; vitrifies sinking solids and quenches plain liquids resting on it
        const HOT = 1 << 2;
        /// Dissolves any solid it rests on
        const CORROSIVE = 1 << 3;
        /// Counts down and detonates regardless of class
        const EXPLOSIVE = 1 << 4;
    }
}

/// Definition of a material's properties
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaterialDef {
    pub name: String,

    /// Display grouping only
    #[serde(default)]
    pub category: String,

    /// Base color (RGBA), opaque to the engine
    pub color: [u8; 4],

    pub class: PhysicalClass,

    #[serde(default)]
    pub flags: MaterialFlags,

    /// Gravity added to `vy` each tick. `None` uses the class default.
    #[serde(default)]
    pub weight: Option<f32>,

    /// Ticks a fire particle lives
    #[serde(default = "default_timer")]
    pub initial_lifetime: u32,

    /// Ticks until an explosive particle detonates
    #[serde(default = "default_timer")]
    pub initial_countdown: u32,

    /// Ordered adjacency reactions
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

fn default_timer() -> u32 {
    DEFAULT_TIMER
}

impl Default for MaterialDef {
    fn default() -> Self {
        Self {
            name: "unknown".to_string(),
            category: String::new(),
            color: [255, 0, 255, 255], // Magenta for missing materials
            class: PhysicalClass::Solid,
            flags: MaterialFlags::empty(),
            weight: None,
            initial_lifetime: DEFAULT_TIMER,
            initial_countdown: DEFAULT_TIMER,
            reactions: Vec::new(),
        }
    }
}

impl MaterialDef {
    /// Effective gravity constant
    pub fn weight(&self) -> f32 {
        match (self.weight, self.class) {
            (Some(w), _) => w,
            (None, PhysicalClass::Solid) => DEFAULT_SOLID_WEIGHT,
            (None, PhysicalClass::Liquid) => DEFAULT_LIQUID_WEIGHT,
            (None, _) => 0.0,
        }
    }

    #[inline]
    pub fn has(&self, flags: MaterialFlags) -> bool {
        self.flags.contains(flags)
    }

    /// Whether this material runs a detonation countdown
    #[inline]
    pub fn is_explosive(&self) -> bool {
        self.class == PhysicalClass::Explosive || self.has(MaterialFlags::EXPLOSIVE)
    }
}

/// A reaction with both material names resolved to ids
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedReaction {
    pub with: MaterialId,
    pub result: MaterialId,
}

/// Registry of all materials
pub struct Materials {
    materials: Vec<MaterialDef>,
    by_name: HashMap<String, MaterialId>,
    /// Effective reactions per material, in rule-list order
    reactions: Vec<Vec<ResolvedReaction>>,
}

impl Materials {
    /// Registry with the built-in catalog
    pub fn new() -> Self {
        match Self::load(default_catalog()) {
            Ok(materials) => materials,
            // The built-in catalog has unique names
            Err(_) => Self::empty(),
        }
    }

    pub fn empty() -> Self {
        Self {
            materials: Vec::new(),
            by_name: HashMap::new(),
            reactions: Vec::new(),
        }
    }

    /// Build a registry from a list of definitions.
    ///
    /// Names must be unique and ids must fit a `MaterialId`. Reactions that
    /// name an unregistered material, or that carry no result, are kept on
    /// the definition but never fire.
    pub fn load(defs: Vec<MaterialDef>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(defs.len());
        for (index, def) in defs.iter().enumerate() {
            let id = MaterialId::try_from(index).map_err(|_| SandboxError::TooManyMaterials {
                count: defs.len(),
                max: usize::from(MaterialId::MAX) + 1,
            })?;
            if by_name.insert(def.name.clone(), id).is_some() {
                return Err(SandboxError::DuplicateName(def.name.clone()));
            }
        }

        let reactions = defs
            .iter()
            .map(|def| {
                def.reactions
                    .iter()
                    .filter_map(|rxn| {
                        let with = by_name.get(&rxn.with).copied();
                        let result = rxn.result.as_ref().map(|r| (r, by_name.get(r).copied()));
                        match (with, result) {
                            (Some(with), Some((_, Some(result)))) => {
                                Some(ResolvedReaction { with, result })
                            }
                            (_, Some((name, None))) => {
                                log::warn!(
                                    "{}: reaction with {} produces unknown material {}, ignoring",
                                    def.name,
                                    rxn.with,
                                    name
                                );
                                None
                            }
                            // Explicit "no reaction" entry, or a partner that doesn't exist
                            _ => None,
                        }
                    })
                    .collect()
            })
            .collect();

        log::info!("Loaded {} materials", defs.len());

        Ok(Self {
            materials: defs,
            by_name,
            reactions,
        })
    }

    /// Get material definition by ID.
    ///
    /// Ids only come from this registry, so an out-of-range id is a logic error.
    #[inline]
    pub fn get(&self, id: MaterialId) -> &MaterialDef {
        &self.materials[id as usize]
    }

    /// Look up a material ID by name
    pub fn id_of(&self, name: &str) -> Option<MaterialId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&MaterialDef> {
        self.id_of(name).map(|id| self.get(id))
    }

    /// Get color for a material
    pub fn get_color(&self, id: MaterialId) -> [u8; 4] {
        self.get(id).color
    }

    /// Effective reactions for a material
    #[inline]
    pub fn reactions(&self, id: MaterialId) -> &[ResolvedReaction] {
        &self.reactions[id as usize]
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &MaterialDef)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(id, def)| (id as MaterialId, def))
    }
}

impl Default for Materials {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in material catalog
pub fn default_catalog() -> Vec<MaterialDef> {
    vec![
        // POWDERS
        MaterialDef {
            name: "sand".to_string(),
            category: "powder".to_string(),
            color: [194, 178, 128, 255],
            class: PhysicalClass::Solid,
            flags: MaterialFlags::SINKS_IN_LIQUID,
            weight: Some(0.1),
            ..Default::default()
        },
        MaterialDef {
            name: "dirt".to_string(),
            category: "powder".to_string(),
            color: [101, 67, 33, 255], // Brown
            class: PhysicalClass::Solid,
            flags: MaterialFlags::SINKS_IN_LIQUID,
            weight: Some(0.12),
            ..Default::default()
        },
        // STATIC SOLIDS
        MaterialDef {
            name: "stone".to_string(),
            category: "solid".to_string(),
            color: [128, 128, 128, 255],
            class: PhysicalClass::Solid,
            weight: Some(0.0),
            ..Default::default()
        },
        MaterialDef {
            name: "wood".to_string(),
            category: "solid".to_string(),
            color: [139, 90, 43, 255],
            class: PhysicalClass::Solid,
            flags: MaterialFlags::FLAMMABLE,
            weight: Some(0.0),
            ..Default::default()
        },
        MaterialDef {
            name: "glass".to_string(),
            category: "solid".to_string(),
            color: [200, 220, 255, 150],
            class: PhysicalClass::Solid,
            weight: Some(0.0),
            ..Default::default()
        },
        // LIQUIDS
        MaterialDef {
            name: "water".to_string(),
            category: "liquid".to_string(),
            color: [64, 164, 223, 200],
            class: PhysicalClass::Liquid,
            weight: Some(0.08),
            reactions: vec![
                Reaction::new("fire", Some("steam")),
                // Water and oil don't mix
                Reaction::new("oil", None),
            ],
            ..Default::default()
        },
        MaterialDef {
            name: "oil".to_string(),
            category: "liquid".to_string(),
            color: [50, 40, 30, 255],
            class: PhysicalClass::Liquid,
            flags: MaterialFlags::FLAMMABLE,
            weight: Some(0.07),
            ..Default::default()
        },
        MaterialDef {
            name: "lava".to_string(),
            category: "liquid".to_string(),
            color: [255, 80, 0, 255],
            class: PhysicalClass::Liquid,
            flags: MaterialFlags::HOT,
            weight: Some(0.05), // Very viscous
            ..Default::default()
        },
        MaterialDef {
            name: "acid".to_string(),
            category: "liquid".to_string(),
            color: [0, 255, 0, 200],
            class: PhysicalClass::Liquid,
            flags: MaterialFlags::CORROSIVE,
            weight: Some(0.08),
            ..Default::default()
        },
        // GASES
        MaterialDef {
            name: "smoke".to_string(),
            category: "gas".to_string(),
            color: [60, 60, 60, 150],
            class: PhysicalClass::Gas,
            ..Default::default()
        },
        MaterialDef {
            name: "steam".to_string(),
            category: "gas".to_string(),
            color: [200, 200, 200, 100],
            class: PhysicalClass::Gas,
            ..Default::default()
        },
        // ENERGY
        MaterialDef {
            name: "fire".to_string(),
            category: "energy".to_string(),
            color: [255, 100, 0, 255],
            class: PhysicalClass::Fire,
            initial_lifetime: DEFAULT_TIMER,
            ..Default::default()
        },
        // EXPLOSIVES
        MaterialDef {
            name: "gunpowder".to_string(),
            category: "explosive".to_string(),
            color: [64, 64, 64, 255], // Dark gray
            class: PhysicalClass::Solid,
            flags: MaterialFlags::FLAMMABLE
                | MaterialFlags::EXPLOSIVE
                | MaterialFlags::SINKS_IN_LIQUID,
            weight: Some(0.1),
            initial_countdown: 80,
            ..Default::default()
        },
        MaterialDef {
            name: "tnt".to_string(),
            category: "explosive".to_string(),
            color: [200, 30, 30, 255],
            class: PhysicalClass::Explosive,
            initial_countdown: DEFAULT_TIMER,
            ..Default::default()
        },
    ]
}
