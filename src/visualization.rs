use crate::environments::{EnvKind, Size};
use crate::error::{Error, Result};
use crate::reporter::{FinderState, Reader};
use crate::runner::run_name;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stat {
    Length,
    Distance,
    Fitness,
}

impl Stat {
    pub fn name(self) -> &'static str {
        match self {
            Stat::Length => "length",
            Stat::Distance => "distance",
            Stat::Fitness => "fitness",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Stat::Length => "Path Length (Cells)",
            Stat::Distance => "Distance from target (Cells)",
            Stat::Fitness => "Fitness",
        }
    }

    fn top(self, state: &FinderState) -> f64 {
        match self {
            Stat::Length => state.top_length as f64,
            Stat::Distance => state.top_distance as f64,
            Stat::Fitness => state.top_fitness,
        }
    }

    fn median(self, state: &FinderState) -> f64 {
        match self {
            Stat::Length => state.median_length as f64,
            Stat::Distance => state.median_distance as f64,
            Stat::Fitness => state.median_fitness,
        }
    }
}

const STATS: [Stat; 3] = [Stat::Length, Stat::Distance, Stat::Fitness];

/// Draws metric charts for one environment and grid size, one line per
/// population size.
#[derive(Debug)]
pub struct GraphCreator {
    base_path: PathBuf,
    env: EnvKind,
    size: Size,
    output_path: PathBuf,
}

impl GraphCreator {
    pub fn new(base_path: &Path, env: EnvKind, size: Size) -> Result<Self> {
        let output_path = base_path.join("graphs");
        fs::create_dir_all(&output_path)?;
        Ok(Self {
            base_path: base_path.to_path_buf(),
            env,
            size,
            output_path,
        })
    }

    /// Reads every available report and writes the charts. Returns the paths
    /// written, or nothing when no run of this environment was recorded.
    pub fn create_graphs(&self, population_sizes: &[usize]) -> Result<Vec<PathBuf>> {
        let mut population_stats = Vec::new();
        for &population_size in population_sizes {
            let run_dir = self
                .base_path
                .join(run_name(self.env, self.size, population_size));
            let reader = Reader::new(run_dir);
            if reader.exists() {
                population_stats.push((population_size, reader.read()?));
            }
        }

        if population_stats.is_empty() {
            debug!(env = self.env.name(), size = self.size.name(), "no reports to plot");
            return Ok(Vec::new());
        }

        info!(env = self.env.name(), size = self.size.name(), "drawing graphs");
        STATS
            .iter()
            .map(|&stat| self.save_graph(&population_stats, stat))
            .collect()
    }

    fn save_graph(
        &self,
        population_stats: &[(usize, Vec<FinderState>)],
        stat: Stat,
    ) -> Result<PathBuf> {
        let path = self.output_path.join(format!(
            "{}-{}-{}.png",
            self.env.name(),
            self.size.name(),
            stat.name()
        ));

        let max_generation = population_stats
            .iter()
            .flat_map(|(_, stats)| stats.iter().map(|s| s.generation))
            .max()
            .unwrap_or(0);

        {
            let root = BitMapBackend::new(&path, (1120, 960)).into_drawing_area();
            root.fill(&WHITE)?;
            let panels = root.split_evenly((2, 1));

            let halves = [("top", true), ("median", false)];
            for (panel, (label, is_top)) in panels.iter().zip(halves) {
                let pick = |s: &FinderState| if is_top { stat.top(s) } else { stat.median(s) };
                let (y_min, y_max) = value_range(population_stats, pick)
                    .ok_or_else(|| Error::EmptyReport(self.base_path.display().to_string()))?;

                let mut chart = ChartBuilder::on(panel)
                    .caption(
                        format!("{} {} ({label})", self.env.name(), self.size.name()),
                        ("sans-serif", 24),
                    )
                    .margin(10)
                    .x_label_area_size(40)
                    .y_label_area_size(60)
                    .build_cartesian_2d(0u32..max_generation.max(1), y_min..y_max)?;

                chart
                    .configure_mesh()
                    .x_desc("Generation")
                    .y_desc(stat.title())
                    .draw()?;

                for (i, (population_size, stats)) in population_stats.iter().enumerate() {
                    let color = Palette99::pick(i).to_rgba();
                    chart
                        .draw_series(LineSeries::new(
                            stats.iter().map(|s| (s.generation, pick(s))),
                            color.stroke_width(2),
                        ))?
                        .label(format!("{label}_{}: {population_size}", stat.name()))
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
                }

                chart
                    .configure_series_labels()
                    .border_style(&BLACK)
                    .background_style(WHITE.mix(0.8))
                    .draw()?;
            }

            root.present()?;
        }
        debug!(path = %path.display(), "chart saved");
        Ok(path)
    }
}

/// Padded (min, max) of a metric over every recorded generation.
fn value_range<F>(population_stats: &[(usize, Vec<FinderState>)], value: F) -> Option<(f64, f64)>
where
    F: Fn(&FinderState) -> f64,
{
    let values = population_stats
        .iter()
        .flat_map(|(_, stats)| stats.iter().map(&value));
    let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })?;
    let pad = ((max - min) * 0.05).max(0.5);
    Some((min - pad, max + pad))
}
