use crate::game::{CollisionReport, MovementIntent};
use crate::walls::{BallBody, BodyLabel, GoalBody, WallSegment};
use crossbeam_channel::Sender;

pub const GRAVITY_Y: f32 = 40.0;
const IMPULSE: f32 = 18.0;
const AIR_DRAG: f32 = 0.90;

/// A wall segment as a physics body. Static until the session is won, then
/// relaxed and left to fall under gravity.
pub struct WallBody {
    pub segment: WallSegment,
    pub is_static: bool,
    vy: f32,
}

pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
}

/// Minimal stand-in for the external physics engine: one ball, the wall
/// bodies and the goal region, stepped once per tick by the game loop.
pub struct World {
    pub walls: Vec<WallBody>,
    pub ball: Ball,
    pub goal: GoalBody,
    gravity_y: f32,
    width: f32,
    height: f32,
}

impl World {
    pub fn new(
        walls: Vec<WallSegment>,
        ball: BallBody,
        goal: GoalBody,
        width: f32,
        height: f32,
    ) -> Self {
        Self {
            walls: walls
                .into_iter()
                .map(|segment| WallBody {
                    segment,
                    is_static: true,
                    vy: 0.0,
                })
                .collect(),
            ball: Ball {
                x: ball.center_x,
                y: ball.center_y,
                vx: 0.0,
                vy: 0.0,
                radius: ball.radius,
            },
            goal,
            // The original disables the downward force while playing.
            gravity_y: 0.0,
            width,
            height,
        }
    }

    /// Fixed-magnitude velocity delta on one axis.
    pub fn apply_intent(&mut self, intent: MovementIntent) {
        match intent {
            MovementIntent::Up => self.ball.vy -= IMPULSE,
            MovementIntent::Down => self.ball.vy += IMPULSE,
            MovementIntent::Left => self.ball.vx -= IMPULSE,
            MovementIntent::Right => self.ball.vx += IMPULSE,
        }
    }

    pub fn set_gravity(&mut self, gravity_y: f32) {
        self.gravity_y = gravity_y;
    }

    /// Makes every wall body non-static. They keep their velocity state and
    /// fall on subsequent steps once gravity is restored.
    pub fn relax_walls(&mut self) {
        for wall in &mut self.walls {
            wall.is_static = false;
        }
        log::info!("PHYSICS: relaxed {} wall bodies", self.walls.len());
    }

    pub fn step(&mut self, dt: f32, reports: &Sender<CollisionReport>) {
        self.ball.vx *= AIR_DRAG;
        self.ball.vy *= AIR_DRAG;
        self.ball.vy += self.gravity_y * dt;

        // Axis-separated move, blocked by any static wall.
        let old_x = self.ball.x;
        self.ball.x += self.ball.vx * dt;
        if self.hits_static_wall() {
            self.ball.x = old_x;
            self.ball.vx = 0.0;
        }
        let old_y = self.ball.y;
        self.ball.y += self.ball.vy * dt;
        if self.hits_static_wall() {
            self.ball.y = old_y;
            self.ball.vy = 0.0;
        }

        let r = self.ball.radius;
        self.ball.x = self.ball.x.clamp(r, self.width - r);
        self.ball.y = self.ball.y.clamp(r, self.height - r);

        for wall in &mut self.walls {
            if wall.is_static {
                continue;
            }
            wall.vy += self.gravity_y * dt;
            wall.segment.center_y += wall.vy * dt;
        }

        if self.ball_overlaps_goal() {
            let _ = reports.send(CollisionReport {
                body_a: BodyLabel::Ball,
                body_b: BodyLabel::Goal,
            });
        }
    }

    fn hits_static_wall(&self) -> bool {
        self.walls
            .iter()
            .filter(|w| w.is_static)
            .any(|w| circle_hits_rect(&self.ball, &w.segment))
    }

    fn ball_overlaps_goal(&self) -> bool {
        let half_w = self.goal.width / 2.0;
        let half_h = self.goal.height / 2.0;
        let nearest_x = self
            .ball
            .x
            .clamp(self.goal.center_x - half_w, self.goal.center_x + half_w);
        let nearest_y = self
            .ball
            .y
            .clamp(self.goal.center_y - half_h, self.goal.center_y + half_h);
        let dx = self.ball.x - nearest_x;
        let dy = self.ball.y - nearest_y;
        dx * dx + dy * dy <= self.ball.radius * self.ball.radius
    }
}

fn circle_hits_rect(ball: &Ball, segment: &WallSegment) -> bool {
    let half_w = segment.width / 2.0;
    let half_h = segment.height / 2.0;
    let nearest_x = ball
        .x
        .clamp(segment.center_x - half_w, segment.center_x + half_w);
    let nearest_y = ball
        .y
        .clamp(segment.center_y - half_h, segment.center_y + half_h);
    let dx = ball.x - nearest_x;
    let dy = ball.y - nearest_y;
    dx * dx + dy * dy < ball.radius * ball.radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn ball_at(x: f32, y: f32) -> BallBody {
        BallBody {
            center_x: x,
            center_y: y,
            radius: 1.0,
        }
    }

    fn goal_at(x: f32, y: f32) -> GoalBody {
        GoalBody {
            center_x: x,
            center_y: y,
            width: 4.0,
            height: 4.0,
        }
    }

    fn vertical_wall(x: f32, y: f32, h: f32) -> WallSegment {
        WallSegment {
            center_x: x,
            center_y: y,
            width: 1.0,
            height: h,
            color: crossterm::style::Color::Magenta,
        }
    }

    #[test]
    fn intents_add_velocity_deltas() {
        let mut world = World::new(Vec::new(), ball_at(5.0, 5.0), goal_at(50.0, 50.0), 60.0, 60.0);
        world.apply_intent(MovementIntent::Right);
        world.apply_intent(MovementIntent::Up);
        assert_eq!(world.ball.vx, IMPULSE);
        assert_eq!(world.ball.vy, -IMPULSE);
    }

    #[test]
    fn free_ball_moves_and_drag_slows_it() {
        let (tx, _rx) = unbounded();
        let mut world = World::new(Vec::new(), ball_at(5.0, 5.0), goal_at(50.0, 50.0), 60.0, 60.0);
        world.apply_intent(MovementIntent::Right);
        world.step(0.05, &tx);
        assert!(world.ball.x > 5.0);
        assert!(world.ball.vx < IMPULSE);
        assert_eq!(world.ball.y, 5.0);
    }

    #[test]
    fn static_wall_blocks_the_ball() {
        let (tx, _rx) = unbounded();
        let walls = vec![vertical_wall(10.0, 5.0, 10.0)];
        let mut world = World::new(walls, ball_at(5.0, 5.0), goal_at(50.0, 50.0), 60.0, 60.0);
        world.apply_intent(MovementIntent::Right);
        for _ in 0..100 {
            world.step(0.03, &tx);
        }
        // Never past the wall face at x = 9.5.
        assert!(world.ball.x + world.ball.radius <= 9.5 + 1e-3);
    }

    #[test]
    fn goal_overlap_is_reported() {
        let (tx, rx) = unbounded();
        let mut world = World::new(Vec::new(), ball_at(49.0, 50.0), goal_at(50.0, 50.0), 60.0, 60.0);
        world.step(0.03, &tx);
        let report = rx.try_recv().unwrap();
        assert!(report.involves(BodyLabel::Ball) && report.involves(BodyLabel::Goal));
    }

    #[test]
    fn distant_ball_reports_nothing() {
        let (tx, rx) = unbounded();
        let mut world = World::new(Vec::new(), ball_at(5.0, 5.0), goal_at(50.0, 50.0), 60.0, 60.0);
        world.step(0.03, &tx);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn relaxed_walls_fall_once_gravity_returns() {
        let (tx, _rx) = unbounded();
        let walls = vec![vertical_wall(30.0, 10.0, 8.0)];
        let mut world = World::new(walls, ball_at(5.0, 5.0), goal_at(50.0, 50.0), 60.0, 60.0);

        world.step(0.03, &tx);
        assert_eq!(world.walls[0].segment.center_y, 10.0);

        world.relax_walls();
        world.set_gravity(GRAVITY_Y);
        world.step(0.03, &tx);
        world.step(0.03, &tx);
        assert!(world.walls[0].segment.center_y > 10.0);
        assert!(!world.walls[0].is_static);
    }
}
