//! Reaction rules
//!
//! Two kinds of rules transform particles on contact:
//! - per-material adjacency reactions (`Reaction`), listed on each material:
//!   when a particle touches a neighbor named `with`, both cells become `result`;
//! - contact rules (`ContactRule`), held in one `ReactionTable` and matched by
//!   class and flags: sand on lava → glass, water on lava → stone, acid on a
//!   solid → the solid dissolves.

use serde::{Deserialize, Serialize};

use crate::simulation::{MaterialDef, MaterialFlags, MaterialId, Materials, PhysicalClass};

/// Adjacency reaction listed on a material.
///
/// A `None` result is an explicit "no reaction" entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub with: String,
    pub result: Option<String>,
}

impl Reaction {
    pub fn new(with: &str, result: Option<&str>) -> Self {
        Self {
            with: with.to_string(),
            result: result.map(str::to_string),
        }
    }
}

/// Which materials a contact rule applies to
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Selector {
    /// Exactly this material
    Named(String),
    /// Any material of `class` carrying every flag in `all` and none in `none`
    Class {
        class: PhysicalClass,
        all: MaterialFlags,
        none: MaterialFlags,
    },
}

impl Selector {
    pub fn class(class: PhysicalClass) -> Self {
        Selector::Class {
            class,
            all: MaterialFlags::empty(),
            none: MaterialFlags::empty(),
        }
    }

    pub fn class_with(class: PhysicalClass, all: MaterialFlags) -> Self {
        Selector::Class {
            class,
            all,
            none: MaterialFlags::empty(),
        }
    }

    pub fn matches(&self, def: &MaterialDef) -> bool {
        match self {
            Selector::Named(name) => def.name == *name,
            Selector::Class { class, all, none } => {
                def.class == *class && def.flags.contains(*all) && !def.flags.intersects(*none)
            }
        }
    }
}

/// Where the other particle sits relative to the subject
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    /// Directly beneath the subject (the subject rests on it)
    Below,
}

impl Contact {
    pub const ALL: [Contact; 1] = [Contact::Below];

    /// (row, col) offset from the subject
    pub fn offset(self) -> (i32, i32) {
        match self {
            Contact::Below => (1, 0),
        }
    }
}

/// What happens when a contact rule fires
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// The subject becomes a fresh particle of this material
    TransformSubject(String),
    /// The other particle's cell is cleared
    ClearOther,
}

/// A class/flag keyed transformation between two touching particles
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactRule {
    /// Human-readable name
    pub name: String,
    pub subject: Selector,
    pub other: Selector,
    pub contact: Contact,
    pub effect: Effect,
}

/// A contact rule's effect with material names resolved
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedEffect {
    TransformSubject(MaterialId),
    ClearOther,
}

/// Registry of contact rules, evaluated in registration order
pub struct ReactionTable {
    rules: Vec<ContactRule>,
}

impl ReactionTable {
    pub fn new() -> Self {
        let mut table = Self { rules: Vec::new() };
        table.register_default_rules();
        table
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    fn register_default_rules(&mut self) {
        // Sinking powder + molten liquid → glass
        self.register(ContactRule {
            name: "vitrify".to_string(),
            subject: Selector::class_with(PhysicalClass::Solid, MaterialFlags::SINKS_IN_LIQUID),
            other: Selector::class_with(PhysicalClass::Liquid, MaterialFlags::HOT),
            contact: Contact::Below,
            effect: Effect::TransformSubject("glass".to_string()),
        });

        // Plain liquid + molten liquid → stone
        self.register(ContactRule {
            name: "quench".to_string(),
            subject: Selector::Class {
                class: PhysicalClass::Liquid,
                all: MaterialFlags::empty(),
                none: MaterialFlags::HOT | MaterialFlags::CORROSIVE | MaterialFlags::FLAMMABLE,
            },
            other: Selector::class_with(PhysicalClass::Liquid, MaterialFlags::HOT),
            contact: Contact::Below,
            effect: Effect::TransformSubject("stone".to_string()),
        });

        // Corrosive liquid eats the solid it rests on
        self.register(ContactRule {
            name: "dissolve".to_string(),
            subject: Selector::class_with(PhysicalClass::Liquid, MaterialFlags::CORROSIVE),
            other: Selector::class(PhysicalClass::Solid),
            contact: Contact::Below,
            effect: Effect::ClearOther,
        });
    }

    /// Register a new rule, evaluated after the existing ones
    pub fn register(&mut self, rule: ContactRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[ContactRule] {
        &self.rules
    }

    /// Find the first rule matching a subject/other pair.
    ///
    /// Rules whose result material isn't registered are skipped.
    pub fn find_rule(
        &self,
        materials: &Materials,
        subject: MaterialId,
        other: MaterialId,
        contact: Contact,
    ) -> Option<(&ContactRule, ResolvedEffect)> {
        let subject_def = materials.get(subject);
        let other_def = materials.get(other);

        self.rules
            .iter()
            .filter(|rule| rule.contact == contact)
            .filter(|rule| rule.subject.matches(subject_def) && rule.other.matches(other_def))
            .find_map(|rule| {
                let effect = match &rule.effect {
                    Effect::TransformSubject(result) => {
                        ResolvedEffect::TransformSubject(materials.id_of(result)?)
                    }
                    Effect::ClearOther => ResolvedEffect::ClearOther,
                };
                Some((rule, effect))
            })
    }
}

impl Default for ReactionTable {
    fn default() -> Self {
        Self::new()
    }
}
