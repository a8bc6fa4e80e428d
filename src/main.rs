use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;

use sandtick::levels::LevelManager;
use sandtick::simulation::Materials;
use sandtick::world::GridSnapshot;
use sandtick::{Sandbox, SandboxConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless falling-sand simulation", long_about = None)]
struct Args {
    /// RON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid height in cells
    #[arg(long)]
    rows: Option<usize>,

    /// Grid width in cells
    #[arg(long)]
    cols: Option<usize>,

    /// Number of ticks to run
    #[arg(long)]
    ticks: Option<u64>,

    /// Fixed RNG seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Demo level to load (name or index)
    #[arg(long)]
    level: Option<String>,

    /// List demo levels and exit
    #[arg(long)]
    list_levels: bool,
}

impl Args {
    fn into_config(self) -> anyhow::Result<SandboxConfig> {
        let mut config = match &self.config {
            Some(path) => SandboxConfig::from_file(path)?,
            None => SandboxConfig::default(),
        };

        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if let Some(ticks) = self.ticks {
            config.ticks = ticks;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.level.is_some() {
            config.level = self.level;
        }
        Ok(config)
    }
}

/// Glyphs handed out once every letter of a material's name is taken
const FALLBACK_GLYPHS: &str = "#@%&*+=~^$0123456789";

/// Give every registered material its own glyph.
///
/// Tries the letters of the name in order, then their upper case, then the
/// fallback pool. '.' stays reserved for empty cells.
fn glyph_table(materials: &Materials) -> HashMap<&str, char> {
    let mut taken = vec!['.'];
    let mut table = HashMap::with_capacity(materials.len());

    for (_, def) in materials.iter() {
        let letters = def.name.chars().filter(|c| c.is_alphanumeric());
        let glyph = letters
            .clone()
            .chain(letters.flat_map(char::to_uppercase))
            .chain(FALLBACK_GLYPHS.chars())
            .find(|c| !taken.contains(c))
            .unwrap_or('?');
        taken.push(glyph);
        table.insert(def.name.as_str(), glyph);
    }
    table
}

/// One character per cell from `glyph_table`, '.' for empty
fn render_text(snapshot: &GridSnapshot<'_>, glyphs: &HashMap<&str, char>) -> String {
    let mut out = String::with_capacity((snapshot.cols() + 1) * snapshot.rows());
    for row in 0..snapshot.rows() {
        for col in 0..snapshot.cols() {
            let glyph = snapshot
                .get(row, col)
                .map(|cell| glyphs.get(cell.name).copied().unwrap_or('?'))
                .unwrap_or('.');
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut levels = LevelManager::new();

    if args.list_levels {
        for (index, level) in levels.levels().iter().enumerate() {
            println!("{:>2}  {:<20} {}", index, level.name, level.description);
        }
        return Ok(());
    }

    let config = args.into_config()?;
    log::info!("Starting sandtick with {:?}", config);

    let mut sandbox = Sandbox::from_config(&config);

    if let Some(key) = &config.level {
        let index = levels
            .find(key)
            .ok_or_else(|| anyhow::anyhow!("Unknown level: {} (see --list-levels)", key))?;
        levels.load(index, &mut sandbox)?;
        if let Some(level) = levels.current() {
            log::info!("{}: {}", level.name, level.description);
        }
    }

    let start = std::time::Instant::now();
    let stats = sandbox.run(config.ticks);
    log::info!(
        "Ran {} ticks in {:.2?}: {} particles, {:?}",
        sandbox.tick_count(),
        start.elapsed(),
        sandbox.particle_count(),
        stats
    );

    let glyphs = glyph_table(sandbox.materials());
    print!("{}", render_text(&sandbox.snapshot(), &glyphs));
    Ok(())
}
