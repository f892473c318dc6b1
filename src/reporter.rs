use crate::error::Result;
use crate::finder::Finder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const REPORT_FILE: &str = "report.csv";
pub const INITIAL_GRID_FILE: &str = "initial_grid.txt";
pub const FINAL_GRID_FILE: &str = "final_grid.txt";

/// Metrics of one generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FinderState {
    pub generation: u32,
    pub top_distance: u32,
    pub top_length: usize,
    pub top_fitness: f64,
    pub median_distance: u32,
    pub median_length: usize,
    pub median_fitness: f64,
}

impl FinderState {
    pub fn capture(finder: &Finder) -> Self {
        let population = finder.population();
        let top = population.top_item();
        let median = population.median_item();
        Self {
            generation: finder.generation(),
            top_distance: finder.env().calculate_distance(top),
            top_length: top.len(),
            top_fitness: population.top_fitness(),
            median_distance: finder.env().calculate_distance(median),
            median_length: median.len(),
            median_fitness: population.median_fitness(),
        }
    }
}

/// Collects per-generation metrics for one run and persists them under
/// `<out>/<name>/`.
#[derive(Debug)]
pub struct Reporter {
    dir: PathBuf,
    stats: Vec<FinderState>,
}

impl Reporter {
    pub fn open(finder: &Finder, out: &Path, name: &str) -> Result<Self> {
        let dir = out.join(name);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(INITIAL_GRID_FILE), finder.env().to_string())?;
        Ok(Self {
            dir,
            stats: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stats(&self) -> &[FinderState] {
        &self.stats
    }

    pub fn report(&mut self, finder: &Finder) {
        self.stats.push(FinderState::capture(finder));
    }

    /// Writes the CSV report and the final grid with the best path drawn on it.
    pub fn finish(self, finder: &Finder) -> Result<Vec<FinderState>> {
        let mut writer = csv::Writer::from_path(self.dir.join(REPORT_FILE))?;
        for stat in &self.stats {
            writer.serialize(stat)?;
        }
        writer.flush()?;

        let top = finder.population().top_item();
        fs::write(
            self.dir.join(FINAL_GRID_FILE),
            finder.env().to_table(Some(top), false),
        )?;

        Ok(self.stats)
    }
}

#[derive(Debug)]
pub struct Reader {
    dir: PathBuf,
}

impl Reader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn exists(&self) -> bool {
        self.dir.join(REPORT_FILE).is_file()
    }

    pub fn read(&self) -> Result<Vec<FinderState>> {
        let mut reader = csv::Reader::from_path(self.dir.join(REPORT_FILE))?;
        let mut stats = Vec::new();
        for record in reader.deserialize() {
            stats.push(record?);
        }
        Ok(stats)
    }
}
