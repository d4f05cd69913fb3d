//! End-to-end session flow: JSON pack in, tilt feed driving the tick loop,
//! events and best times out.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use tilt_maze::{
    BestTimes, LevelSession, LevelSet, SessionEvent, SessionStatus, TiltFeed, TiltSample, Tuning,
};

const CELL_SIZE: f32 = 100.0;

// two open corridors, one vertical and one horizontal; the second keeps a
// legacy-spelled obstacle off the travel row
const PACK: &str = r#"[
    {
        "id": 1,
        "width": 3,
        "height": 5,
        "startPosition": { "x": 1, "y": 0 },
        "goalPosition": { "x": 1, "y": 4 },
        "themeColor": 255
    },
    {
        "id": 2,
        "width": 5,
        "height": 3,
        "startPosition": { "x": 0, "y": 1 },
        "goalPosition": { "x": 4, "y": 1 },
        "obstacles": [
            { "x": 2, "y": 0, "type": "OBSTACLE" }
        ],
        "themeColor": 65280
    }
]"#;

fn goal_center(session: &LevelSession) -> Option<Vec2> {
    let level = session.current_level()?;
    Some(Vec2::new(
        level.goal_position.x as f32 * CELL_SIZE + CELL_SIZE / 2.0,
        level.goal_position.y as f32 * CELL_SIZE + CELL_SIZE / 2.0,
    ))
}

#[test]
fn full_pack_playthrough_records_best_times() {
    let levels = LevelSet::from_json(PACK).unwrap();
    let mut session = LevelSession::new(levels, Tuning::default(), CELL_SIZE);

    let events = Rc::new(RefCell::new(Vec::new()));
    let best = Rc::new(RefCell::new(BestTimes::new()));
    let event_sink = Rc::clone(&events);
    let best_sink = Rc::clone(&best);
    session.subscribe(move |event| {
        if let SessionEvent::LevelCompleted { id, elapsed_ms } = *event {
            best_sink.borrow_mut().record(id, elapsed_ms);
        }
        event_sink.borrow_mut().push(*event);
    });

    session.start_first().unwrap();
    assert_eq!(session.status(), SessionStatus::Running);

    // steer straight at the goal through the sensor feed
    let feed = TiltFeed::new();
    for _ in 0..2000 {
        if let Some(goal) = goal_center(&session) {
            let dir = (goal - session.ball().pos).normalize_or_zero();
            feed.publish(TiltSample::new(dir.x * 2.0, dir.y * 2.0));
        }
        if session.tick(feed.latest()) == SessionStatus::Finished {
            break;
        }
    }
    assert_eq!(session.status(), SessionStatus::Finished);

    let transitions: Vec<SessionEvent> = events
        .borrow()
        .iter()
        .copied()
        .filter(|event| !matches!(event, SessionEvent::WallBounce))
        .collect();
    assert_eq!(transitions.len(), 5);
    assert!(matches!(transitions[0], SessionEvent::LevelStarted { id: 1, theme_color: 255 }));
    assert!(matches!(transitions[1], SessionEvent::LevelCompleted { id: 1, elapsed_ms } if elapsed_ms > 0));
    assert!(matches!(transitions[2], SessionEvent::LevelStarted { id: 2, theme_color: 65280 }));
    assert!(matches!(transitions[3], SessionEvent::LevelCompleted { id: 2, .. }));
    assert_eq!(transitions[4], SessionEvent::AllLevelsCompleted);

    let best = best.borrow();
    assert_eq!(best.len(), 2);
    let SessionEvent::LevelCompleted { elapsed_ms, .. } = transitions[1] else {
        unreachable!()
    };
    assert_eq!(best.best(1), Some(elapsed_ms));
}

#[test]
fn wall_bounces_surface_and_the_ball_stays_inside() {
    let levels = LevelSet::from_json(PACK).unwrap();
    let mut session = LevelSession::new(levels, Tuning::default(), CELL_SIZE);

    let bounces = Rc::new(RefCell::new(0u32));
    let sink = Rc::clone(&bounces);
    session.subscribe(move |event| {
        if matches!(event, SessionEvent::WallBounce) {
            *sink.borrow_mut() += 1;
        }
    });

    session.start_first().unwrap();

    // level 1 is 300px wide; a constant leftward pull slams the wall
    for _ in 0..120 {
        session.tick(TiltSample::new(-3.0, 0.0));
        let ball = session.ball();
        assert!(ball.pos.x - ball.radius >= 0.0);
        assert!(ball.pos.x + ball.radius <= 300.0);
        assert!(ball.pos.y - ball.radius >= 0.0);
        assert!(ball.pos.y + ball.radius <= 500.0);
    }
    assert!(*bounces.borrow() > 0);
}

#[test]
fn restarting_a_finished_run_resets_the_session() {
    let levels = LevelSet::from_json(PACK).unwrap();
    let mut session = LevelSession::new(levels, Tuning::default(), CELL_SIZE);
    session.start_first().unwrap();

    let feed = TiltFeed::new();
    for _ in 0..2000 {
        if let Some(goal) = goal_center(&session) {
            let dir = (goal - session.ball().pos).normalize_or_zero();
            feed.publish(TiltSample::new(dir.x * 2.0, dir.y * 2.0));
        }
        if session.tick(feed.latest()) == SessionStatus::Finished {
            break;
        }
    }
    assert_eq!(session.status(), SessionStatus::Finished);

    session.start_level(1).unwrap();
    assert_eq!(session.status(), SessionStatus::Running);
    assert_eq!(session.elapsed_ticks(), 0);
    assert_eq!(session.ball().pos, Vec2::new(150.0, 50.0));
}
