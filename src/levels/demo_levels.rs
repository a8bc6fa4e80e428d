//! Demo level generators
//!
//! Every scene is laid out in fractions of the sandbox size, so it fits any
//! grid. Cells that land outside the grid are skipped.

use std::ops::Range;

use super::LevelDef;
use crate::error::Result;
use crate::world::Sandbox;

/// The built-in demo scenes, in menu order
pub static DEMO_LEVELS: &[LevelDef] = &[
    LevelDef {
        name: "Sand Over Water",
        description: "A block of sand sinks through a water pool",
        build: generate_sand_over_water,
    },
    LevelDef {
        name: "Burning Forest",
        description: "Fire spreads up through columns of wood",
        build: generate_burning_forest,
    },
    LevelDef {
        name: "Lava Meets Water",
        description: "Water rains onto a lava pool and quenches to stone",
        build: generate_lava_meets_water,
    },
    LevelDef {
        name: "Demolition Charge",
        description: "TNT and gunpowder packed inside a stone tower",
        build: generate_demolition_charge,
    },
    LevelDef {
        name: "Acid Bath",
        description: "Acid poured over stone blocks eats them away",
        build: generate_acid_bath,
    },
];

/// Fill the part of a rectangle that lies inside the grid
fn fill_rect(
    sandbox: &mut Sandbox,
    rows: Range<usize>,
    cols: Range<usize>,
    name: &str,
) -> Result<usize> {
    let row_end = rows.end.min(sandbox.rows());
    let col_end = cols.end.min(sandbox.cols());

    let mut placed = 0;
    for row in rows.start..row_end {
        for col in cols.start..col_end {
            sandbox.place_particle(row, col, name)?;
            placed += 1;
        }
    }
    Ok(placed)
}

/// Stone floor along the bottom row
fn stone_floor(sandbox: &mut Sandbox) -> Result<()> {
    let bottom = sandbox.rows().saturating_sub(1);
    fill_rect(sandbox, bottom..bottom + 1, 0..sandbox.cols(), "stone")?;
    Ok(())
}

/// Sand Over Water
/// Water pool in the bottom third, a block of sand hanging over its middle
pub fn generate_sand_over_water(sandbox: &mut Sandbox) -> Result<()> {
    let (rows, cols) = (sandbox.rows(), sandbox.cols());

    stone_floor(sandbox)?;
    fill_rect(
        sandbox,
        rows * 2 / 3..rows.saturating_sub(1),
        0..cols,
        "water",
    )?;
    fill_rect(
        sandbox,
        rows / 10..rows / 4,
        cols * 2 / 5..cols * 3 / 5,
        "sand",
    )?;
    Ok(())
}

/// Burning Forest
/// Wood columns standing on the floor, a line of fire between their roots
pub fn generate_burning_forest(sandbox: &mut Sandbox) -> Result<()> {
    let (rows, cols) = (sandbox.rows(), sandbox.cols());
    let ground = rows.saturating_sub(1);

    stone_floor(sandbox)?;

    // Two-wide trunks every 6 columns
    for trunk in (2..cols).step_by(6) {
        fill_rect(sandbox, rows / 3..ground, trunk..trunk + 2, "wood")?;
    }

    // Oil soaked into the undergrowth
    fill_rect(sandbox, ground.saturating_sub(2)..ground, 0..cols, "oil")?;

    fill_rect(
        sandbox,
        ground.saturating_sub(3)..ground.saturating_sub(2),
        0..cols / 4,
        "fire",
    )?;
    Ok(())
}

/// Lava Meets Water
/// A lava pool on the left, a reservoir of water raining down onto it
pub fn generate_lava_meets_water(sandbox: &mut Sandbox) -> Result<()> {
    let (rows, cols) = (sandbox.rows(), sandbox.cols());

    stone_floor(sandbox)?;
    fill_rect(
        sandbox,
        rows * 3 / 4..rows.saturating_sub(1),
        0..cols / 2,
        "lava",
    )?;
    fill_rect(sandbox, rows / 8..rows / 3, cols / 6..cols * 2 / 3, "water")?;

    // A sand shelf that vitrifies where it lands on lava
    fill_rect(sandbox, rows / 2..rows / 2 + 1, cols / 3..cols / 2, "sand")?;
    Ok(())
}

/// Demolition Charge
/// A hollow stone tower packed with TNT and a gunpowder fuse, sand piled around
pub fn generate_demolition_charge(sandbox: &mut Sandbox) -> Result<()> {
    let (rows, cols) = (sandbox.rows(), sandbox.cols());
    let ground = rows.saturating_sub(1);
    let (left, right) = (cols * 2 / 5, cols * 3 / 5);

    stone_floor(sandbox)?;

    // Tower walls
    fill_rect(sandbox, rows / 3..ground, left..left + 1, "stone")?;
    fill_rect(sandbox, rows / 3..ground, right..right + 1, "stone")?;
    fill_rect(sandbox, rows / 3..rows / 3 + 1, left..right + 1, "stone")?;

    // Charge at the base, gunpowder stacked above it
    fill_rect(
        sandbox,
        ground.saturating_sub(2)..ground,
        left + 1..right,
        "tnt",
    )?;
    fill_rect(
        sandbox,
        rows / 2..ground.saturating_sub(2),
        left + 1..right,
        "gunpowder",
    )?;

    fill_rect(sandbox, ground.saturating_sub(4)..ground, 0..left, "sand")?;
    fill_rect(
        sandbox,
        ground.saturating_sub(4)..ground,
        right + 1..cols,
        "sand",
    )?;
    Ok(())
}

/// Acid Bath
/// Stone blocks in a glass basin, acid poured over them from above
pub fn generate_acid_bath(sandbox: &mut Sandbox) -> Result<()> {
    let (rows, cols) = (sandbox.rows(), sandbox.cols());
    let ground = rows.saturating_sub(1);

    fill_rect(sandbox, ground..ground + 1, 0..cols, "glass")?;
    fill_rect(sandbox, rows / 2..ground, 0..1, "glass")?;
    fill_rect(
        sandbox,
        rows / 2..ground,
        cols.saturating_sub(1)..cols,
        "glass",
    )?;

    for block in (cols / 5..cols.saturating_sub(2)).step_by(cols / 5 + 1) {
        fill_rect(
            sandbox,
            ground.saturating_sub(rows / 6)..ground,
            block..block + 3,
            "stone",
        )?;
    }

    fill_rect(
        sandbox,
        rows / 10..rows / 4,
        1..cols.saturating_sub(1),
        "acid",
    )?;
    Ok(())
}
