use crate::error::{Error, InvalidPointError, Result};
use crate::grid::{Grid, GridEnvironment};
use crate::point::Point;
use clap::ValueEnum;

pub const DEFAULT_BLOCK_PERCENTAGE: f64 = 0.2;
pub const DEFAULT_SPACE_PERCENTAGE: f64 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Size {
    Small,
    Medium,
    Large,
}

pub const SIZES: [Size; 3] = [Size::Small, Size::Medium, Size::Large];

impl Size {
    pub fn cells(self) -> usize {
        match self {
            Size::Small => 10,
            Size::Medium => 30,
            Size::Large => 50,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Size::Small => "SMALL",
            Size::Medium => "MEDIUM",
            Size::Large => "LARGE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum EnvKind {
    Empty,
    CenterBlock,
    Peekhole,
    Wall,
    MultiWall,
    MultiwayWall,
}

pub const ENV_KINDS: [EnvKind; 6] = [
    EnvKind::Empty,
    EnvKind::CenterBlock,
    EnvKind::Peekhole,
    EnvKind::Wall,
    EnvKind::MultiWall,
    EnvKind::MultiwayWall,
];

impl EnvKind {
    pub fn name(self) -> &'static str {
        match self {
            EnvKind::Empty => "empty_env",
            EnvKind::CenterBlock => "center_block_env",
            EnvKind::Peekhole => "peekhole_env",
            EnvKind::Wall => "wall_env",
            EnvKind::MultiWall => "multi_wall_env",
            EnvKind::MultiwayWall => "multiway_wall_env",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        ENV_KINDS
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| Error::UnknownEnvironment(name.to_string()))
    }

    pub fn create(self, size: Size) -> Result<GridEnvironment> {
        let n = size.cells();
        let env = match self {
            EnvKind::Empty => empty_env(n),
            EnvKind::CenterBlock => center_block_env(n, DEFAULT_BLOCK_PERCENTAGE),
            EnvKind::Peekhole => peekhole_env(n),
            EnvKind::Wall => wall_env(n, DEFAULT_SPACE_PERCENTAGE),
            EnvKind::MultiWall => multi_wall_env(n, DEFAULT_SPACE_PERCENTAGE),
            EnvKind::MultiwayWall => multiway_wall_env(n, DEFAULT_SPACE_PERCENTAGE),
        }?;
        Ok(env)
    }
}

type PresetResult = std::result::Result<GridEnvironment, InvalidPointError>;

fn corner_to_corner(grid: Grid, n: usize) -> PresetResult {
    let far = n as i32 - 1;
    GridEnvironment::new(grid, Point::new(0, 0), Point::new(far, far))
}

fn along_the_edge(grid: Grid, n: usize) -> PresetResult {
    let far = n as i32 - 1;
    GridEnvironment::new(grid, Point::new(far, 0), Point::new(far, far))
}

/// First blocked column of a wall that leaves `space` of the row open on the left.
/// `space` is clamped to `[0, 1]`.
fn wall_opening(n: usize, space: f64) -> usize {
    (space.clamp(0.0, 1.0) * n as f64).floor() as usize
}

pub fn empty_env(n: usize) -> PresetResult {
    corner_to_corner(Grid::new(n, n), n)
}

/// A square block in the middle covering roughly `percentage` of the grid.
/// `percentage` is clamped to `[0, 1]`.
pub fn center_block_env(n: usize, percentage: f64) -> PresetResult {
    let block_area = (n * n) as f64 * percentage.clamp(0.0, 1.0);
    let half_side = (block_area.sqrt() / 2.0).floor() as usize;
    let mut grid = Grid::new(n, n);
    for y in n / 2 - half_side..n / 2 + half_side {
        for x in n / 2 - half_side..n / 2 + half_side {
            grid.block(x, y);
        }
    }
    corner_to_corner(grid, n)
}

/// A fully blocked middle row with a single open cell at its centre.
pub fn peekhole_env(n: usize) -> PresetResult {
    let mut grid = Grid::new(n, n);
    for x in (0..n).filter(|&x| x != n / 2) {
        grid.block(x, n / 2);
    }
    corner_to_corner(grid, n)
}

/// A wall across the middle row, open on the left.
pub fn wall_env(n: usize, space: f64) -> PresetResult {
    let mut grid = Grid::new(n, n);
    for x in wall_opening(n, space)..n {
        grid.block(x, n / 2);
    }
    along_the_edge(grid, n)
}

/// Three walls at a quarter, half and three quarters of the height, all open on
/// the left.
pub fn multi_wall_env(n: usize, space: f64) -> PresetResult {
    let mut grid = Grid::new(n, n);
    for x in wall_opening(n, space)..n {
        grid.block(x, n / 4);
        grid.block(x, n / 2);
        grid.block(x, 3 * n / 4);
    }
    along_the_edge(grid, n)
}

/// Like [`multi_wall_env`], but the middle wall is open on the right, forcing a
/// zig-zag.
pub fn multiway_wall_env(n: usize, space: f64) -> PresetResult {
    let mut grid = Grid::new(n, n);
    let opening = wall_opening(n, space);
    for x in opening..n {
        grid.block(x, n / 4);
        grid.block(x, 3 * n / 4);
    }
    for x in 0..n - opening {
        grid.block(x, n / 2);
    }
    along_the_edge(grid, n)
}
