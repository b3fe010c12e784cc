use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};
use unicode_width::UnicodeWidthStr;

mod game;
mod grid;
mod maze;
mod physics;
mod walls;

use game::{GameState, MovementIntent, Session, SessionBus};
use physics::{World, GRAVITY_Y};
use walls::{ball_body, goal_body, outer_walls, project_walls};

const DEFAULT_ROWS: usize = 6;
const DEFAULT_COLS: usize = 10;
const DEFAULT_TICK_MS: u64 = 30;
const DEFAULT_RENDER_FPS: u64 = 60;
const CELL_W: usize = 2;
// Smallest acceptable maze cell, in raster cells.
const MIN_UNIT: f32 = 4.0;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Empty,
    Wall,
    Goal,
    Ball,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    color: Color,
}

const EMPTY_CELL: Cell = Cell {
    glyph: Glyph::Empty,
    color: Color::Reset,
};

struct Renderer {
    raster_w: usize,
    raster_h: usize,
    last: Vec<Cell>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new(raster_w: usize, raster_h: usize) -> Self {
        Self {
            raster_w,
            raster_h,
            last: vec![EMPTY_CELL; raster_w * raster_h],
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
        }
    }
}

struct Settings {
    rows: usize,
    cols: usize,
    tick_ms: u64,
    render_fps: u64,
    seed: Option<u64>,
}

fn main() -> io::Result<()> {
    env_logger::init();

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout) -> io::Result<()> {
    let settings = read_settings();
    let mut rng: StdRng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    'session: loop {
        let (term_w, term_h) = terminal::size()?;
        let raster_w = (term_w as usize / CELL_W).saturating_sub(1).max(1);
        let raster_h = (term_h as usize).saturating_sub(2).max(1);
        let width = raster_w as f32;
        let height = raster_h as f32;
        let unit_w = width / settings.cols as f32;
        let unit_h = height / settings.rows as f32;

        if unit_w < MIN_UNIT || unit_h < MIN_UNIT {
            stdout.queue(Clear(ClearType::All))?;
            stdout.queue(MoveTo(0, 0))?;
            stdout.queue(Print(format!(
                "Terminal too small for a {}x{} maze. Resize it or press q.",
                settings.cols, settings.rows
            )))?;
            stdout.flush()?;
            loop {
                if event::poll(Duration::from_millis(100))? {
                    match event::read()? {
                        Event::Key(key) => {
                            if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('q') {
                                return Ok(());
                            }
                        }
                        Event::Resize(_, _) => continue 'session,
                        _ => {}
                    }
                }
            }
        }

        let grid = maze::generate(settings.rows, settings.cols, &mut rng)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

        let mut segments = outer_walls(width, height).to_vec();
        segments.extend(project_walls(&grid, unit_w, unit_h));
        let goal = goal_body(settings.rows, settings.cols, unit_w, unit_h);
        let ball = ball_body(unit_w, unit_h);

        let mut world = World::new(segments, ball, goal, width, height);
        let mut session = Session::new();
        let bus = SessionBus::new();
        let mut renderer = Renderer::new(raster_w, raster_h);
        let mut show_instructions = true;
        let mut win_ui = false;

        let dt = settings.tick_ms as f32 / 1000.0;
        let frame_time = Duration::from_micros(1_000_000 / settings.render_fps.max(1));
        let mut last_tick = Instant::now();

        log::info!(
            "GAME: session started, {}x{} maze on a {}x{} raster",
            settings.cols,
            settings.rows,
            raster_w,
            raster_h
        );

        loop {
            let frame_start = Instant::now();
            while event::poll(Duration::from_millis(0))? {
                match event::read()? {
                    Event::Key(key) => match key.kind {
                        KeyEventKind::Press | KeyEventKind::Repeat => {
                            show_instructions = false;
                            match key.code {
                                KeyCode::Char('q') => return Ok(()),
                                KeyCode::Char('n') if session.state() == GameState::Won => {
                                    log::info!("GAME: starting a new session");
                                    continue 'session;
                                }
                                code => {
                                    if let Some(intent) = intent_for_key(code) {
                                        let _ = bus.intent_tx.send(intent);
                                    }
                                }
                            }
                        }
                        _ => {}
                    },
                    Event::Resize(_, _) => renderer.needs_full = true,
                    _ => {}
                }
            }

            if last_tick.elapsed() >= Duration::from_millis(settings.tick_ms) {
                last_tick = Instant::now();
                // Intents never touch the state machine; they still move the
                // ball, before and after the win.
                while let Ok(intent) = bus.intent_rx.try_recv() {
                    world.apply_intent(intent);
                }
                world.step(dt, &bus.collision_tx);
                while let Ok(report) = bus.collision_rx.try_recv() {
                    if let Some(signals) = session.handle_collision(report) {
                        if signals.show_win_ui {
                            win_ui = true;
                        }
                        if signals.relax_walls {
                            world.relax_walls();
                        }
                        if signals.restore_gravity {
                            world.set_gravity(GRAVITY_Y);
                        }
                    }
                }
            }

            render(stdout, &world, &settings, win_ui, show_instructions, &mut renderer)?;

            let elapsed = frame_start.elapsed();
            if elapsed < frame_time {
                thread::sleep(frame_time - elapsed);
            }
        }
    }
}

fn read_settings() -> Settings {
    let rows = std::env::var("MAZEBALL_ROWS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_ROWS);
    let cols = std::env::var("MAZEBALL_COLS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_COLS);
    let tick_ms = std::env::var("MAZEBALL_TICK_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_TICK_MS);
    let render_fps = std::env::var("MAZEBALL_FPS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RENDER_FPS);
    let seed = std::env::var("MAZEBALL_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok());
    Settings {
        rows,
        cols,
        tick_ms,
        render_fps,
        seed,
    }
}

fn intent_for_key(code: KeyCode) -> Option<MovementIntent> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(MovementIntent::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(MovementIntent::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(MovementIntent::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(MovementIntent::Right),
        _ => None,
    }
}

fn rasterize(world: &World, raster_w: usize, raster_h: usize) -> Vec<Cell> {
    let mut cells = vec![EMPTY_CELL; raster_w * raster_h];

    fill_rect(
        &mut cells,
        raster_w,
        raster_h,
        world.goal.center_x,
        world.goal.center_y,
        world.goal.width,
        world.goal.height,
        Glyph::Goal,
        Color::Green,
    );
    for wall in &world.walls {
        let seg = wall.segment;
        // Relaxed walls that fell past the play area are gone for good.
        if seg.center_y - seg.height / 2.0 > raster_h as f32 {
            continue;
        }
        fill_rect(
            &mut cells,
            raster_w,
            raster_h,
            seg.center_x,
            seg.center_y,
            seg.width,
            seg.height,
            Glyph::Wall,
            seg.color,
        );
    }
    fill_circle(
        &mut cells,
        raster_w,
        raster_h,
        world.ball.x,
        world.ball.y,
        world.ball.radius,
        Glyph::Ball,
        Color::Yellow,
    );
    cells
}

// Shrinks the rectangle by half a raster cell on each side so that a
// unit-thick wall sitting on a cell boundary maps to exactly one cell line.
#[allow(clippy::too_many_arguments)]
fn fill_rect(
    cells: &mut [Cell],
    raster_w: usize,
    raster_h: usize,
    cx: f32,
    cy: f32,
    w: f32,
    h: f32,
    glyph: Glyph,
    color: Color,
) {
    let x0 = (cx - w / 2.0 + 0.5).floor().clamp(0.0, (raster_w - 1) as f32) as usize;
    let x1 = (cx + w / 2.0 - 0.5)
        .floor()
        .clamp(x0 as f32, (raster_w - 1) as f32) as usize;
    let y0 = (cy - h / 2.0 + 0.5).floor().clamp(0.0, (raster_h - 1) as f32) as usize;
    let y1 = (cy + h / 2.0 - 0.5)
        .floor()
        .clamp(y0 as f32, (raster_h - 1) as f32) as usize;
    for y in y0..=y1 {
        for x in x0..=x1 {
            cells[y * raster_w + x] = Cell { glyph, color };
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn fill_circle(
    cells: &mut [Cell],
    raster_w: usize,
    raster_h: usize,
    cx: f32,
    cy: f32,
    radius: f32,
    glyph: Glyph,
    color: Color,
) {
    let x0 = (cx - radius).floor().clamp(0.0, (raster_w - 1) as f32) as usize;
    let x1 = (cx + radius).ceil().clamp(0.0, (raster_w - 1) as f32) as usize;
    let y0 = (cy - radius).floor().clamp(0.0, (raster_h - 1) as f32) as usize;
    let y1 = (cy + radius).ceil().clamp(0.0, (raster_h - 1) as f32) as usize;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            if dx * dx + dy * dy <= radius * radius {
                cells[y * raster_w + x] = Cell { glyph, color };
            }
        }
    }
    // Keep the ball visible even when it is smaller than one raster cell.
    let x = cx.floor().clamp(0.0, (raster_w - 1) as f32) as usize;
    let y = cy.floor().clamp(0.0, (raster_h - 1) as f32) as usize;
    cells[y * raster_w + x] = Cell { glyph, color };
}

fn render(
    stdout: &mut Stdout,
    world: &World,
    settings: &Settings,
    win_ui: bool,
    show_instructions: bool,
    renderer: &mut Renderer,
) -> io::Result<()> {
    let needed_w = (renderer.raster_w * CELL_W) as u16;
    let needed_h = (renderer.raster_h + 2) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + 1;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }

    let hud = if win_ui {
        "YOU WIN!  n for a new maze, q to quit".to_string()
    } else if show_instructions {
        format!(
            "Maze {}x{}  roll the ball to the goal  (arrows/hjkl move, q quits)",
            settings.cols, settings.rows
        )
    } else {
        format!("Maze {}x{}", settings.cols, settings.rows)
    };
    if renderer.needs_full || hud != renderer.last_hud {
        stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - 1))?;
        stdout.queue(SetForegroundColor(Color::White))?;
        stdout.queue(Clear(ClearType::CurrentLine))?;
        stdout.queue(Print(&hud))?;
        stdout.queue(ResetColor)?;
        renderer.last_hud = hud;
    }

    let cells = rasterize(world, renderer.raster_w, renderer.raster_h);
    for y in 0..renderer.raster_h {
        for x in 0..renderer.raster_w {
            let idx = y * renderer.raster_w + x;
            let cell = cells[idx];
            if renderer.needs_full || cell != renderer.last[idx] {
                renderer.last[idx] = cell;
                draw_cell(stdout, renderer, x, y, cell)?;
            }
        }
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn draw_cell(
    stdout: &mut Stdout,
    renderer: &Renderer,
    x: usize,
    y: usize,
    cell: Cell,
) -> io::Result<()> {
    let (text, color) = match cell.glyph {
        Glyph::Empty => ("  ", cell.color),
        Glyph::Wall => ("██", cell.color),
        Glyph::Goal => ("▒▒", cell.color),
        Glyph::Ball => ("🟡", cell.color),
    };
    let x_pos = renderer.origin_x + (x * CELL_W) as u16;
    let y_pos = renderer.origin_y + y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(color))?;
    stdout.queue(Print(text))?;
    let w = UnicodeWidthStr::width(text);
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}
