// Session-level tests: pointer input, timers and result-server traffic
// driven through `Game` with recording fakes.

mod common;

use common::{HostCall, RecordingHost, RecordingSurface, drag, stock_game};
use square_drag::api::AchievementResponse;
use square_drag::{GameBuilder, GameError, GameState, Point, SessionId};

#[test]
fn near_square_drag_scores_and_resets() {
    let mut game = stock_game();
    drag(&mut game, (0.0, 0.0), (100.0, 141.42));

    let scores = game.context().scores();
    assert_eq!(scores.len(), 1);
    assert!((scores[0] - 70.711).abs() < 0.01);
    assert_eq!(game.state(), GameState::Init);
    assert_eq!(game.context().remaining_ms(), 3000);
    assert_eq!(game.drag_start(), None);
    assert_eq!(game.drag_end(), None);
    assert!(!game.is_dragging());

    match &game.host().calls[..] {
        [HostCall::Achievement(ticket, url, sent)] => {
            assert_eq!(url, "/arch/alice");
            assert_eq!(sent, &scores);
            assert_eq!(ticket.session, SessionId(0));
            assert_eq!(ticket.round, 1);
        }
        other => panic!("unexpected host calls {other:?}"),
    }
}

#[test]
fn short_drag_is_retried_without_score() {
    let mut game = stock_game();
    game.pointer_down(Point::new(0.0, 0.0));
    game.advance(200.0);
    game.pointer_move(Point::new(10.0, 10.0));
    game.pointer_up(Point::new(10.0, 10.0));

    assert!(game.context().scores().is_empty());
    assert_eq!(game.state(), GameState::Alert);
    assert_eq!(game.context().message(), "Please try again.");

    game.advance(990.0);
    assert_eq!(game.state(), GameState::Alert);
    game.advance(10.0);
    assert_eq!(game.state(), GameState::Init);
    assert_eq!(game.context().remaining_ms(), 2800);
    // achievement check still goes out on a failed round
    assert_eq!(game.host().achievement_tickets().len(), 1);
}

#[test]
fn vertical_drag_records_zero() {
    let mut game = stock_game();
    drag(&mut game, (0.0, 0.0), (0.0, 150.0));
    assert_eq!(game.context().scores(), vec![0.0]);
    assert_eq!(game.state(), GameState::Init);
}

#[test]
fn full_session_submits_and_goes_to_ranking() {
    let mut game = stock_game();
    for _ in 0..3 {
        drag(&mut game, (0.0, 0.0), (120.0, 120.0));
    }
    assert_eq!(game.state(), GameState::Stop);
    assert_eq!(game.context().rounds_played(), 3);

    let submissions = game.host().submissions();
    assert_eq!(submissions.len(), 1);
    let (ticket, url, scores) = submissions[0].clone();
    assert_eq!(url, "/send_result/alice");
    assert_eq!(scores, vec![100.0, 100.0, 100.0]);

    game.pointer_down(Point::new(5.0, 5.0));
    assert_eq!(game.state(), GameState::Stop);
    assert!(!game.is_dragging());

    game.result_submitted(ticket, true);
    assert_eq!(
        game.host().calls.last(),
        Some(&HostCall::Navigate("/ranking/alice".into()))
    );
}

#[test]
fn failed_submission_alerts_and_goes_home() {
    let mut game = stock_game();
    for _ in 0..3 {
        drag(&mut game, (0.0, 0.0), (120.0, 110.0));
    }
    let (ticket, _, _) = game.host().submissions()[0].clone();
    game.result_submitted(ticket, false);

    let calls = &game.host().calls;
    let tail = &calls[calls.len() - 2..];
    assert_eq!(
        tail,
        [
            HostCall::Alert("Failed to send the result to the server.".into()),
            HostCall::Navigate("/".into()),
        ]
    );
}

#[test]
fn countdown_expiry_shows_time_out_then_restarts() {
    let mut game = stock_game();
    drag(&mut game, (0.0, 0.0), (120.0, 120.0));
    game.pointer_down(Point::new(0.0, 0.0));
    game.pointer_move(Point::new(30.0, 30.0));

    game.advance(2990.0);
    assert_eq!(game.state(), GameState::Play);
    assert_eq!(game.context().remaining_ms(), 10);

    game.advance(10.0);
    assert_eq!(game.state(), GameState::Alert);
    assert_eq!(game.context().message(), "Time out!");

    game.advance(1500.0);
    assert_eq!(game.state(), GameState::Init);
    assert_eq!(game.session(), SessionId(1));
    assert!(game.context().scores().is_empty());
    assert_eq!(game.drag_start(), None);
    assert!(!game.is_dragging());
}

#[test]
fn release_during_time_out_is_ignored() {
    let mut game = stock_game();
    game.pointer_down(Point::new(0.0, 0.0));
    game.advance(3000.0);
    assert_eq!(game.state(), GameState::Alert);

    game.pointer_up(Point::new(200.0, 200.0));
    assert_eq!(game.state(), GameState::Alert);
    assert!(game.host().calls.is_empty());
}

#[test]
fn click_without_drag_stops_and_restarts() {
    let mut game = stock_game();
    game.pointer_down(Point::new(40.0, 40.0));
    game.pointer_up(Point::new(40.0, 40.0));

    assert_eq!(game.state(), GameState::Alert);
    assert_eq!(game.context().message(), "Please drag the mouse.");
    assert!(game.host().calls.is_empty());

    game.advance(1500.0);
    assert_eq!(game.state(), GameState::Alert);
    assert_eq!(game.context().message(), "Restarting the game.");

    game.advance(1500.0);
    assert_eq!(game.state(), GameState::Init);
    assert_eq!(game.session(), SessionId(1));
}

#[test]
fn stray_pointer_events_change_nothing() {
    let mut game = stock_game();
    game.pointer_move(Point::new(3.0, 3.0));
    game.pointer_up(Point::new(3.0, 3.0));
    game.pointer_out();
    assert_eq!(game.state(), GameState::Init);
    assert_eq!(game.drag_end(), None);
    assert!(game.host().calls.is_empty());
}

#[test]
fn pause_freezes_the_round() {
    let mut game = stock_game();
    game.pointer_down(Point::new(0.0, 0.0));
    game.advance(500.0);
    game.pause();
    game.advance(10_000.0);

    assert_eq!(game.state(), GameState::Pause);
    assert_eq!(game.context().remaining_ms(), 2500);
    assert_eq!(game.session(), SessionId(0));

    game.pointer_down(Point::new(0.0, 0.0));
    assert_eq!(game.state(), GameState::Pause);
}

#[test]
fn achievement_notification_needs_title_and_body() {
    let mut game = stock_game();
    drag(&mut game, (0.0, 0.0), (120.0, 120.0));
    let ticket = game.host().achievement_tickets()[0];

    game.achievement_checked(ticket, AchievementResponse::parse(r#"{"title":"Sharp"}"#));
    game.achievement_checked(ticket, None);
    assert!(!game.host().calls.iter().any(|c| matches!(c, HostCall::Notify(..))));

    game.achievement_checked(
        ticket,
        AchievementResponse::parse(r#"{"title":"Sharp","body":"A perfect square"}"#),
    );
    assert_eq!(
        game.host().calls.last(),
        Some(&HostCall::Notify("Sharp".into(), "A perfect square".into()))
    );
}

#[test]
fn responses_from_a_previous_session_are_dropped() {
    let mut game = stock_game();
    drag(&mut game, (0.0, 0.0), (120.0, 120.0));
    let stale = game.host().achievement_tickets()[0];

    game.restart();
    let before = game.host().calls.len();
    game.achievement_checked(
        stale,
        AchievementResponse::parse(r#"{"title":"Late","body":"Too late"}"#),
    );
    game.result_submitted(stale, true);
    assert_eq!(game.host().calls.len(), before);
}

#[test]
fn missing_rule_rejects_the_round() {
    let mut game = GameBuilder::new(RecordingHost::default())
        .calc(|_, _| 1.0)
        .surface(RecordingSurface::default())
        .build()
        .unwrap();
    drag(&mut game, (0.0, 0.0), (200.0, 200.0));
    assert_eq!(game.state(), GameState::Reject);
    assert!(game.context().scores().is_empty());

    game.pointer_down(Point::new(1.0, 1.0));
    assert_eq!(game.state(), GameState::Play);
}

#[test]
fn custom_rounds_and_user() {
    let host = RecordingHost {
        user: "bob".into(),
        calls: Vec::new(),
    };
    let mut game = GameBuilder::new(host)
        .rule(|_, _| true)
        .calc(|p1: Point, p2: Point| p2.x - p1.x)
        .surface(RecordingSurface::default())
        .max_rounds(1)
        .build()
        .unwrap();
    drag(&mut game, (0.0, 0.0), (42.0, 0.0));
    assert_eq!(game.state(), GameState::Stop);
    let submissions = game.host().submissions();
    assert_eq!(submissions[0].1, "/send_result/bob");
    assert_eq!(submissions[0].2, vec![42.0]);
}

#[test]
fn build_without_surface_fails() {
    let result = GameBuilder::<RecordingSurface, _>::new(RecordingHost::default())
        .try_surface(None)
        .build();
    assert!(matches!(result, Err(GameError::Init(_))));
}

#[test]
fn build_rejects_zero_rounds() {
    let result = GameBuilder::new(RecordingHost::default())
        .surface(RecordingSurface::default())
        .max_rounds(0)
        .build();
    assert!(matches!(result, Err(GameError::InvalidConfig(_))));
}

#[test]
fn setup_runs_at_build() {
    let game = stock_game();
    assert_eq!(game.surface().font, "50px consolas");
}
