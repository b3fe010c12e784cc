use crate::grid::MazeGrid;
use crossterm::style::Color;

pub const WALL_THICKNESS: f32 = 1.0;
pub const GOAL_SCALE: f32 = 0.7;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BodyLabel {
    Wall,
    Goal,
    Ball,
}

/// Axis-aligned wall rectangle in world units, with a fill hint for the
/// renderer. Derived once from the passage grid, never mutated afterwards.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct WallSegment {
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GoalBody {
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct BallBody {
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
}

/// The four play-area boundary walls (top, bottom, left, right). Always
/// present, independent of the maze interior.
pub fn outer_walls(width: f32, height: f32) -> [WallSegment; 4] {
    let wall = |cx: f32, cy: f32, w: f32, h: f32| WallSegment {
        center_x: cx,
        center_y: cy,
        width: w,
        height: h,
        color: Color::White,
    };
    [
        wall(width / 2.0, 0.0, width, WALL_THICKNESS),
        wall(width / 2.0, height, width, WALL_THICKNESS),
        wall(0.0, height / 2.0, WALL_THICKNESS, height),
        wall(width, height / 2.0, WALL_THICKNESS, height),
    ]
}

/// One wall segment per closed passage, at the midpoint of the boundary it
/// closes. Pure function of the passage grid and the per-cell unit size.
pub fn project_walls(grid: &MazeGrid, unit_w: f32, unit_h: f32) -> Vec<WallSegment> {
    let mut walls = Vec::new();

    for row in 0..grid.rows().saturating_sub(1) {
        for col in 0..grid.cols() {
            if grid.horizontal_open(row, col) {
                continue;
            }
            walls.push(WallSegment {
                center_x: col as f32 * unit_w + unit_w / 2.0,
                center_y: row as f32 * unit_h + unit_h,
                width: unit_w,
                height: WALL_THICKNESS,
                color: Color::Magenta,
            });
        }
    }

    for row in 0..grid.rows() {
        for col in 0..grid.cols().saturating_sub(1) {
            if grid.vertical_open(row, col) {
                continue;
            }
            walls.push(WallSegment {
                center_x: col as f32 * unit_w + unit_w,
                center_y: row as f32 * unit_h + unit_h / 2.0,
                width: WALL_THICKNESS,
                height: unit_h,
                color: Color::Magenta,
            });
        }
    }

    walls
}

/// Goal rectangle centered in the last cell, at 70% of the cell size.
pub fn goal_body(rows: usize, cols: usize, unit_w: f32, unit_h: f32) -> GoalBody {
    GoalBody {
        center_x: cols as f32 * unit_w - unit_w / 2.0,
        center_y: rows as f32 * unit_h - unit_h / 2.0,
        width: unit_w * GOAL_SCALE,
        height: unit_h * GOAL_SCALE,
    }
}

/// Ball circle centered in cell (0, 0), radius a quarter of the smaller
/// unit dimension.
pub fn ball_body(unit_w: f32, unit_h: f32) -> BallBody {
    BallBody {
        center_x: unit_w / 2.0,
        center_y: unit_h / 2.0,
        radius: unit_w.min(unit_h) / 4.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn fully_closed_grid_emits_every_interior_wall() {
        let grid = MazeGrid::new(4, 6).unwrap();
        let walls = project_walls(&grid, 10.0, 8.0);
        // (rows - 1) * cols horizontal + rows * (cols - 1) vertical.
        assert_eq!(walls.len(), 3 * 6 + 4 * 5);
    }

    #[test]
    fn open_passages_emit_no_wall() {
        let mut grid = MazeGrid::new(4, 6).unwrap();
        grid.open_horizontal(1, 2).unwrap();
        grid.open_vertical(0, 0).unwrap();
        let walls = project_walls(&grid, 10.0, 8.0);
        assert_eq!(walls.len(), 3 * 6 + 4 * 5 - 2);
        // The boundary of the opened horizontal passage stays empty.
        assert!(!walls
            .iter()
            .any(|w| close(w.center_x, 25.0) && close(w.center_y, 16.0)));
    }

    #[test]
    fn generated_maze_keeps_the_complement_of_open_passages() {
        let mut rng = StdRng::seed_from_u64(5);
        let grid = maze::generate(4, 6, &mut rng).unwrap();
        let interior = 3 * 6 + 4 * 5;
        let walls = project_walls(&grid, 10.0, 8.0);
        assert_eq!(walls.len(), interior - grid.open_passage_count());
    }

    #[test]
    fn projection_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(13);
        let grid = maze::generate(5, 5, &mut rng).unwrap();
        assert_eq!(
            project_walls(&grid, 7.5, 6.0),
            project_walls(&grid, 7.5, 6.0)
        );
    }

    #[test]
    fn wall_geometry_sits_on_cell_boundaries() {
        let grid = MazeGrid::new(2, 2).unwrap();
        let walls = project_walls(&grid, 10.0, 8.0);
        // First horizontal wall: below cell (0, 0), wide and thin.
        let horizontal = walls
            .iter()
            .find(|w| close(w.center_x, 5.0) && close(w.center_y, 8.0))
            .unwrap();
        assert!(close(horizontal.width, 10.0));
        assert!(close(horizontal.height, WALL_THICKNESS));
        // First vertical wall: right of cell (0, 0), thin and tall.
        let vertical = walls
            .iter()
            .find(|w| close(w.center_x, 10.0) && close(w.center_y, 4.0))
            .unwrap();
        assert!(close(vertical.width, WALL_THICKNESS));
        assert!(close(vertical.height, 8.0));
    }

    #[test]
    fn outer_walls_frame_the_play_area() {
        let walls = outer_walls(60.0, 32.0);
        assert_eq!(walls.len(), 4);
        assert!(close(walls[0].center_y, 0.0) && close(walls[0].width, 60.0));
        assert!(close(walls[1].center_y, 32.0));
        assert!(close(walls[2].center_x, 0.0) && close(walls[2].height, 32.0));
        assert!(close(walls[3].center_x, 60.0));
    }

    #[test]
    fn goal_and_ball_sit_in_their_cells() {
        let goal = goal_body(4, 6, 10.0, 8.0);
        assert!(close(goal.center_x, 55.0));
        assert!(close(goal.center_y, 28.0));
        assert!(close(goal.width, 7.0));
        assert!(close(goal.height, 5.6));

        let ball = ball_body(10.0, 8.0);
        assert!(close(ball.center_x, 5.0));
        assert!(close(ball.center_y, 4.0));
        assert!(close(ball.radius, 2.0));
    }
}
