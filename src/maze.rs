use crate::grid::{GridError, MazeGrid};
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dir {
    Up,
    Right,
    Down,
    Left,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (-1, 0),
            Dir::Right => (0, 1),
            Dir::Down => (1, 0),
            Dir::Left => (0, -1),
        }
    }
}

// One cell on the traversal stack, with its own shuffled candidate order.
struct Frame {
    row: usize,
    col: usize,
    dirs: [Dir; 4],
    next: usize,
}

impl Frame {
    fn new(row: usize, col: usize, rng: &mut impl Rng) -> Self {
        let mut dirs = Dir::ALL;
        dirs.shuffle(rng);
        Self {
            row,
            col,
            dirs,
            next: 0,
        }
    }
}

/// Builds a fresh grid, picks the traversal start uniformly at random and
/// carves a perfect maze into it.
pub fn generate(rows: usize, cols: usize, rng: &mut impl Rng) -> Result<MazeGrid, GridError> {
    let mut grid = MazeGrid::new(rows, cols)?;
    let start_row = rng.gen_range(0..rows);
    let start_col = rng.gen_range(0..cols);
    carve(&mut grid, start_row, start_col, rng)?;
    log::info!(
        "MAZE: generated {}x{} grid, {} open passages, start ({}, {})",
        rows,
        cols,
        grid.open_passage_count(),
        start_row,
        start_col
    );
    Ok(grid)
}

/// Randomized depth-first backtracker over `grid`, starting at the given
/// cell. Each stack frame holds its own shuffled direction order; candidates
/// outside the grid or already visited are skipped, every accepted candidate
/// opens the passage between the two cells and is descended into before the
/// current frame continues. The open passages form a spanning tree.
pub fn carve(
    grid: &mut MazeGrid,
    start_row: usize,
    start_col: usize,
    rng: &mut impl Rng,
) -> Result<(), GridError> {
    grid.mark_visited(start_row, start_col)?;
    let mut stack = vec![Frame::new(start_row, start_col, rng)];

    loop {
        let Some(frame) = stack.last_mut() else {
            break;
        };
        if frame.next == frame.dirs.len() {
            stack.pop();
            continue;
        }
        let dir = frame.dirs[frame.next];
        frame.next += 1;
        let (row, col) = (frame.row, frame.col);

        let (dr, dc) = dir.delta();
        let next_row = row as isize + dr;
        let next_col = col as isize + dc;
        if next_row < 0
            || next_col < 0
            || next_row as usize >= grid.rows()
            || next_col as usize >= grid.cols()
        {
            continue;
        }
        let (next_row, next_col) = (next_row as usize, next_col as usize);
        if grid.is_visited(next_row, next_col)? {
            continue;
        }

        match dir {
            Dir::Left => grid.open_vertical(row, col - 1)?,
            Dir::Right => grid.open_vertical(row, col)?,
            Dir::Up => grid.open_horizontal(row - 1, col)?,
            Dir::Down => grid.open_horizontal(row, col)?,
        }
        grid.mark_visited(next_row, next_col)?;
        stack.push(Frame::new(next_row, next_col, rng));
    }
    Ok(())
}
