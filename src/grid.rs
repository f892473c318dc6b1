use crate::chromosome::Chromosome;
use crate::direction::Direction;
use crate::error::{InvalidPointError, InvalidReason, PointRole};
use crate::point::{distance, Point};
use colored::Colorize;
use petgraph::algo::has_path_connecting;
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub blocked: bool,
}

/// A rectangular occupancy grid. Presets mutate it during setup, before it is
/// wrapped into a [`GridEnvironment`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }

    fn index(&self, point: Point) -> usize {
        point.y as usize * self.width + point.x as usize
    }

    /// Out-of-bounds points are reported as blocked.
    pub fn is_blocked(&self, point: Point) -> bool {
        !self.contains(point) || self.cells[self.index(point)].blocked
    }

    /// Blocks the cell at `(x, y)`. Coordinates outside the grid are ignored.
    pub fn block(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x].blocked = true;
        }
    }

    pub fn cell(&self, point: Point) -> Option<&Cell> {
        if self.contains(point) {
            Some(&self.cells[self.index(point)])
        } else {
            None
        }
    }
}

/// The problem environment: a grid together with the start and target cells.
/// The grid is never mutated after construction.
#[derive(Clone, Debug)]
pub struct GridEnvironment {
    grid: Grid,
    start: Point,
    target: Point,
}

impl GridEnvironment {
    pub fn new(grid: Grid, start: Point, target: Point) -> Result<Self, InvalidPointError> {
        check_point(&grid, start, PointRole::Start)?;
        check_point(&grid, target, PointRole::Target)?;
        Ok(Self {
            grid,
            start,
            target,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn width(&self) -> usize {
        self.grid.width
    }

    pub fn height(&self) -> usize {
        self.grid.height
    }

    pub fn area(&self) -> usize {
        self.grid.width * self.grid.height
    }

    /// Distance from start to target, the length of the shortest possible route on
    /// an empty grid.
    pub fn min_distance(&self) -> u32 {
        distance(self.start, self.target)
    }

    /// True when the point lies inside the grid on an open cell.
    pub fn validate(&self, point: Point) -> bool {
        !self.grid.is_blocked(point)
    }

    /// Moves one cell in `direction`. Moves into walls or off the grid leave the
    /// agent where it is.
    pub fn step(&self, current: Point, direction: Direction) -> Point {
        let (dx, dy) = direction.offset();
        let next = Point::new(current.x + dx, current.y + dy);
        if self.validate(next) {
            next
        } else {
            current
        }
    }

    /// Replays a chromosome from the start cell and returns where the agent stops.
    /// Stops early once the target is reached.
    pub fn simulate_movement(&self, steps: &[Direction]) -> Point {
        let mut current = self.start;
        for &step in steps {
            current = self.step(current, step);
            if current == self.target {
                break;
            }
        }
        current
    }

    pub fn calculate_distance(&self, steps: &[Direction]) -> u32 {
        distance(self.simulate_movement(steps), self.target)
    }

    pub fn reaches_target(&self, steps: &[Direction]) -> bool {
        self.simulate_movement(steps) == self.target
    }

    /// Whether any open route connects start and target. Only used to warn about
    /// layouts the search can never solve.
    pub fn is_solvable(&self) -> bool {
        let mut graph = UnGraph::<Point, ()>::new_undirected();
        let mut nodes: HashMap<Point, NodeIndex> = HashMap::new();

        for y in 0..self.grid.height as i32 {
            for x in 0..self.grid.width as i32 {
                let point = Point::new(x, y);
                if self.validate(point) {
                    nodes.insert(point, graph.add_node(point));
                }
            }
        }

        for (&point, &index) in nodes.iter() {
            for neighbour in [Point::new(point.x + 1, point.y), Point::new(point.x, point.y + 1)] {
                if let Some(&other) = nodes.get(&neighbour) {
                    graph.add_edge(index, other, ());
                }
            }
        }

        match (nodes.get(&self.start), nodes.get(&self.target)) {
            (Some(&start), Some(&target)) => has_path_connecting(&graph, start, target, None),
            _ => false,
        }
    }

    /// Renders the grid as a bordered table, highest row first. When `path` is
    /// given, each visited cell shows the icon of the move taken from it.
    pub fn to_table(&self, path: Option<&Chromosome>, colorize: bool) -> String {
        let width = self.grid.width;
        let height = self.grid.height;
        let mut glyphs: Vec<Vec<char>> = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| {
                        if self.grid.cells[y * width + x].blocked {
                            '*'
                        } else {
                            ' '
                        }
                    })
                    .collect()
            })
            .collect();

        if let Some(path) = path {
            let mut current = self.start;
            for &step in path {
                glyphs[current.y as usize][current.x as usize] = step.icon();
                current = self.step(current, step);
                if current == self.target {
                    break;
                }
            }
        }

        glyphs[self.start.y as usize][self.start.x as usize] = 'S';
        glyphs[self.target.y as usize][self.target.x as usize] = 'T';

        let border = |left: &str, mid: &str, right: &str| {
            let mut line = String::from(left);
            line.push_str(&vec!["───"; width].join(mid));
            line.push_str(right);
            line.push('\n');
            line
        };

        let mut table = border("┌", "┬", "┐");
        for (i, row) in glyphs.iter().rev().enumerate() {
            if i > 0 {
                table.push_str(&border("├", "┼", "┤"));
            }
            table.push('│');
            for &glyph in row {
                table.push(' ');
                table.push_str(&paint(glyph, colorize));
                table.push_str(" │");
            }
            table.push('\n');
        }
        table.push_str(&border("└", "┴", "┘"));
        table
    }
}

impl fmt::Display for GridEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_table(None, false))
    }
}

fn paint(glyph: char, colorize: bool) -> String {
    let text = glyph.to_string();
    if !colorize {
        return text;
    }
    match glyph {
        'S' => text.bold().green().to_string(),
        'T' => text.bold().red().to_string(),
        '*' => text.dimmed().to_string(),
        ' ' => text,
        _ => text.yellow().to_string(),
    }
}

fn check_point(grid: &Grid, point: Point, role: PointRole) -> Result<(), InvalidPointError> {
    let reason = if !grid.contains(point) {
        InvalidReason::OutOfBounds
    } else if grid.is_blocked(point) {
        InvalidReason::Blocked
    } else {
        return Ok(());
    };
    Err(InvalidPointError {
        role,
        point,
        reason,
    })
}
