//! Headless demo runner
//!
//! Plays a level pack with a scripted tilt sweep: a producer thread stands in
//! for the device sensor, the main thread runs the fixed-rate tick loop, and
//! completions land in a best-times table printed at the end.
//!
//! Usage: tilt-maze [levels.json] [max-seconds]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use tilt_maze::consts::{TICK_DT, TICK_HZ};
use tilt_maze::{
    BestTimes, LevelSession, LevelSet, SessionEvent, SessionStatus, TiltFeed, TiltSample, Tuning,
};

/// Built-in pack used when no path is given. The first level is an easy
/// straight drop; the third keeps one legacy-spelled obstacle around.
const SAMPLE_PACK: &str = r#"[
    {
        "id": 1,
        "width": 6,
        "height": 12,
        "startPosition": { "x": 1, "y": 1 },
        "goalPosition": { "x": 1, "y": 3 },
        "themeColor": 255
    },
    {
        "id": 2,
        "width": 6,
        "height": 12,
        "startPosition": { "x": 0, "y": 0 },
        "goalPosition": { "x": 5, "y": 11 },
        "obstacles": [
            { "x": 2, "y": 4, "type": "RECTANGLE" },
            { "x": 3, "y": 4, "type": "RECTANGLE" },
            { "x": 2, "y": 7, "type": "RECTANGLE" },
            { "x": 4, "y": 6, "type": "CIRCLE" },
            { "x": 1, "y": 9, "type": "CIRCLE" }
        ],
        "themeColor": 65280
    },
    {
        "id": 3,
        "width": 10,
        "height": 20,
        "startPosition": { "x": 0, "y": 0 },
        "goalPosition": { "x": 9, "y": 19 },
        "obstacles": [
            { "x": 4, "y": 5, "type": "RECTANGLE" },
            { "x": 5, "y": 5, "type": "RECTANGLE" },
            { "x": 2, "y": 9, "type": "CIRCLE" },
            { "x": 7, "y": 12, "type": "CIRCLE" },
            { "x": 5, "y": 10, "type": "OBSTACLE" },
            { "x": 6, "y": 16, "type": "RECTANGLE" }
        ],
        "themeColor": 16711680
    }
]"#;

const CELL_SIZE: f32 = 100.0;
const DEFAULT_RUN_SECONDS: u64 = 30;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let json = match args.get(1) {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("reading level pack {path}"))?
        }
        None => SAMPLE_PACK.to_string(),
    };
    let max_seconds: u64 = match args.get(2) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("parsing max-seconds {raw}"))?,
        None => DEFAULT_RUN_SECONDS,
    };

    let levels = LevelSet::from_json(&json).context("loading level pack")?;
    log::info!("Tilt Maze demo: {} levels, {max_seconds}s cap", levels.len());

    let mut session = LevelSession::new(levels, Tuning::default(), CELL_SIZE);

    let best = Rc::new(RefCell::new(BestTimes::new()));
    let sink = Rc::clone(&best);
    session.subscribe(move |event| match *event {
        SessionEvent::LevelStarted { id, theme_color } => {
            println!("level {id} started (theme #{theme_color:06x})");
        }
        SessionEvent::LevelCompleted { id, elapsed_ms } => {
            let improved = sink.borrow_mut().record(id, elapsed_ms);
            let tag = if improved { " - new best" } else { "" };
            println!("level {id} completed in {elapsed_ms} ms{tag}");
        }
        SessionEvent::AllLevelsCompleted => println!("all levels completed"),
        SessionEvent::WallBounce => {}
    });

    // sensor stand-in: a slow tilt sweep published at device rate
    let feed = TiltFeed::new();
    let producer = feed.clone();
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);
    let sensor = thread::spawn(move || {
        let mut t = 0.0_f32;
        while !stop_flag.load(Ordering::Relaxed) {
            producer.publish(TiltSample::new((t * 0.7).sin() * 2.0, (t * 0.4).cos() * 2.0));
            t += 0.005;
            thread::sleep(Duration::from_millis(5));
        }
    });

    session.start_first()?;

    // game time is tick-derived, so sleep drift only stretches wall time
    let tick_period = Duration::from_secs_f32(TICK_DT);
    let max_ticks = max_seconds * TICK_HZ as u64;
    for tick in 0..max_ticks {
        let status = session.tick(feed.latest());
        if status == SessionStatus::Finished {
            break;
        }
        if tick % TICK_HZ as u64 == 0 {
            let ball = session.ball();
            log::debug!(
                "t={}s ball at ({:.0}, {:.0}) score {}",
                tick / TICK_HZ as u64,
                ball.pos.x,
                ball.pos.y,
                session.score()
            );
        }
        thread::sleep(tick_period);
    }

    stop.store(true, Ordering::Relaxed);
    let _ = sensor.join();

    if session.status() != SessionStatus::Finished {
        println!("time ran out before the pack was finished");
    }
    let best = best.borrow();
    if best.is_empty() {
        println!("no completions recorded");
    } else {
        println!("best times:");
        for (id, ms) in best.iter() {
            println!("  level {id}: {ms} ms");
        }
    }

    Ok(())
}
