//! Maze - The grid the maze game is played on
//!
//! Coordinates are `(x, y)` with `x` the column and `y` the row, origin at the
//! top-left corner. The outer ring is always wall.

use serde::{Deserialize, Serialize};

/// A grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Wall,
    Path,
    /// The start cell; walkable
    Player,
    /// The goal cell; walkable
    Exit,
}

impl Cell {
    pub fn is_open(&self) -> bool {
        !matches!(self, Cell::Wall)
    }

    /// One-character rendering
    pub fn glyph(&self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Path => ' ',
            Cell::Player => 'S',
            Cell::Exit => 'E',
        }
    }
}

/// A grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Step `distance` cells in `direction`; `None` when that leaves the
    /// non-negative quadrant
    pub fn offset(&self, direction: Direction, distance: usize) -> Option<Position> {
        let (x, y) = (self.x, self.y);
        match direction {
            Direction::Up => y.checked_sub(distance).map(|y| Position::new(x, y)),
            Direction::Down => y.checked_add(distance).map(|y| Position::new(x, y)),
            Direction::Left => x.checked_sub(distance).map(|x| Position::new(x, y)),
            Direction::Right => x.checked_add(distance).map(|x| Position::new(x, y)),
        }
    }
}

/// One of the four grid directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }
}

/// Square maze grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    size: usize,
    cells: Vec<Vec<Cell>>,
}

impl Maze {
    /// A grid of the given size with every cell set to wall
    pub fn filled(size: usize) -> Self {
        Self {
            size,
            cells: vec![vec![Cell::Wall; size]; size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Where the player starts
    pub fn start(&self) -> Position {
        Position::new(1, 1)
    }

    /// The goal cell
    pub fn exit(&self) -> Position {
        Position::new(self.size - 2, self.size - 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    /// Inside the outer wall ring
    pub fn is_interior(&self, pos: Position) -> bool {
        pos.x > 0 && pos.y > 0 && pos.x < self.size - 1 && pos.y < self.size - 1
    }

    /// The cell at `pos`; out-of-grid positions read as wall
    pub fn cell(&self, pos: Position) -> Cell {
        if !self.contains(pos) {
            return Cell::Wall;
        }
        self.cells[pos.y][pos.x]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        if self.contains(pos) {
            self.cells[pos.y][pos.x] = cell;
        }
    }

    pub fn is_open(&self, pos: Position) -> bool {
        self.cell(pos).is_open()
    }

    /// Open neighbours of `pos`
    pub fn open_neighbours(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::all()
            .into_iter()
            .filter_map(move |d| pos.offset(d, 1))
            .filter(move |p| self.is_open(*p))
    }

    /// Every open cell
    pub fn open_cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).flat_map(move |y| {
            (0..self.size)
                .map(move |x| Position::new(x, y))
                .filter(move |p| self.is_open(*p))
        })
    }

    /// Check the shape of a grid loaded from storage
    pub fn is_well_formed(&self) -> bool {
        self.size >= 5
            && self.size % 2 == 1
            && self.cells.len() == self.size
            && self.cells.iter().all(|row| row.len() == self.size)
            && self.cell(self.start()).is_open()
            && self.cell(self.exit()) == Cell::Exit
    }

    /// Text rendering with the player drawn at `player`
    pub fn render(&self, player: Position) -> String {
        let mut out = String::with_capacity(self.size * (self.size + 1));
        for y in 0..self.size {
            for x in 0..self.size {
                let pos = Position::new(x, y);
                out.push(if pos == player { '@' } else { self.cell(pos).glyph() });
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_grid_is_all_wall() {
        let maze = Maze::filled(7);
        assert_eq!(maze.open_cells().count(), 0);
        assert_eq!(maze.exit(), Position::new(5, 5));
    }

    #[test]
    fn test_out_of_grid_reads_as_wall() {
        let maze = Maze::filled(5);
        assert_eq!(maze.cell(Position::new(9, 0)), Cell::Wall);
        assert_eq!(Position::new(0, 0).offset(Direction::Up, 1), None);
    }

    #[test]
    fn test_interior_excludes_border() {
        let maze = Maze::filled(5);
        assert!(!maze.is_interior(Position::new(0, 2)));
        assert!(!maze.is_interior(Position::new(4, 2)));
        assert!(maze.is_interior(Position::new(3, 3)));
    }

    #[test]
    fn test_render_marks_player() {
        let mut maze = Maze::filled(5);
        maze.set(Position::new(1, 1), Cell::Player);
        maze.set(Position::new(3, 3), Cell::Exit);
        let text = maze.render(Position::new(1, 1));
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[1], "#@###");
        assert_eq!(rows[3], "###E#");
    }
}
