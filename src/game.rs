use crate::walls::BodyLabel;
use crossbeam_channel::{unbounded, Receiver, Sender};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MovementIntent {
    Up,
    Down,
    Left,
    Right,
}

/// One collision pair as reported by the physics collaborator. The order of
/// the two labels carries no meaning.
#[derive(Clone, Copy, Debug)]
pub struct CollisionReport {
    pub body_a: BodyLabel,
    pub body_b: BodyLabel,
}

impl CollisionReport {
    pub fn involves(&self, label: BodyLabel) -> bool {
        self.body_a == label || self.body_b == label
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameState {
    Playing,
    Won,
}

/// Side effects requested from the collaborators on the win transition:
/// reveal the win UI, make every wall body non-static, restore the downward
/// force field so the maze collapses.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct WinSignals {
    pub show_win_ui: bool,
    pub relax_walls: bool,
    pub restore_gravity: bool,
}

/// State machine for one maze session. `Playing` until the ball touches the
/// goal, then `Won` for the rest of the session.
pub struct Session {
    state: GameState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: GameState::Playing,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Returns the win signals exactly once, on the Playing -> Won
    /// transition. Reports delivered after the win, and reports whose pair
    /// is not {ball, goal}, are no-ops.
    pub fn handle_collision(&mut self, report: CollisionReport) -> Option<WinSignals> {
        if self.state == GameState::Won {
            return None;
        }
        if !(report.involves(BodyLabel::Ball) && report.involves(BodyLabel::Goal)) {
            return None;
        }
        self.state = GameState::Won;
        log::info!("GAME: ball reached the goal, session won");
        Some(WinSignals {
            show_win_ui: true,
            relax_walls: true,
            restore_gravity: true,
        })
    }
}

/// The two event channels of one session: movement intents from the input
/// collaborator and collision reports from the physics collaborator, both
/// drained by the single-threaded tick handler.
pub struct SessionBus {
    pub intent_tx: Sender<MovementIntent>,
    pub intent_rx: Receiver<MovementIntent>,
    pub collision_tx: Sender<CollisionReport>,
    pub collision_rx: Receiver<CollisionReport>,
}

impl SessionBus {
    pub fn new() -> Self {
        let (intent_tx, intent_rx) = unbounded();
        let (collision_tx, collision_rx) = unbounded();
        Self {
            intent_tx,
            intent_rx,
            collision_tx,
            collision_rx,
        }
    }
}
