//! Integration tests for the game engine: start, scoring, completion, cancel.

use pingpong_tracker::{
    Completion, EndOutcome, MemoryStore, NewPlayer, OpenOptions, PlayerId, PlayerSlot,
    SettingsUpdate, Tracker, TrackerError,
};

fn tracker_with_players() -> (Tracker<MemoryStore>, PlayerId, PlayerId) {
    let mut t = Tracker::open(MemoryStore::new(), OpenOptions::default()).unwrap();
    let alice = t
        .create_player(NewPlayer {
            name: "Alice".into(),
            email: None,
        })
        .unwrap();
    let bob = t
        .create_player(NewPlayer {
            name: "Bob".into(),
            email: None,
        })
        .unwrap();
    (t, alice.id, bob.id)
}

#[test]
fn start_creates_zero_zero_game() {
    let (mut t, a, b) = tracker_with_players();
    let game = t.start_game(Some(a.as_str()), Some(b.as_str()), Some(21)).unwrap().clone();
    assert_eq!((game.score1, game.score2), (0, 0));
    assert_eq!(game.points_limit, 21);
    assert!(!game.completed);
    assert_eq!(game.winner, None);
    assert_eq!(game.player1.name, "Alice");
    assert!(t.has_active_game());
    assert_eq!(t.games(), vec![game]);
}

#[test]
fn start_uses_default_game_type_when_no_limit_given() {
    let (mut t, a, b) = tracker_with_players();
    t.update_settings(SettingsUpdate {
        default_game_type: Some(21),
        theme: None,
    })
    .unwrap();
    let game = t.start_game(Some(a.as_str()), Some(b.as_str()), None).unwrap();
    assert_eq!(game.points_limit, 21);
}

#[test]
fn start_rejects_unknown_missing_or_identical_players() {
    let (mut t, a, b) = tracker_with_players();
    let stranger = "k3j2h1abcxyzq9w8e7r6t".to_string();
    assert!(matches!(
        t.start_game(Some(a.as_str()), Some(stranger.as_str()), None),
        Err(TrackerError::InvalidPlayer(_))
    ));
    assert!(matches!(
        t.start_game(None, Some(b.as_str()), None),
        Err(TrackerError::InvalidPlayer(_))
    ));
    assert!(matches!(
        t.start_game(Some("  "), Some(b.as_str()), None),
        Err(TrackerError::InvalidPlayer(_))
    ));
    assert!(matches!(
        t.start_game(Some(a.as_str()), Some(a.as_str()), None),
        Err(TrackerError::InvalidPlayer(_))
    ));
    assert!(!t.has_active_game());
    assert!(t.games().is_empty());
}

#[test]
fn second_start_while_active_is_rejected() {
    let (mut t, a, b) = tracker_with_players();
    let first = t.start_game(Some(a.as_str()), Some(b.as_str()), None).unwrap().id.clone();
    assert!(matches!(
        t.start_game(Some(b.as_str()), Some(a.as_str()), None),
        Err(TrackerError::GameAlreadyActive)
    ));
    assert_eq!(t.current_game().map(|g| g.id.clone()), Some(first));
    assert_eq!(t.games().len(), 1);
}

#[test]
fn start_then_cancel_leaves_log_unchanged() {
    let (mut t, a, b) = tracker_with_players();
    t.start_game(Some(a.as_str()), Some(b.as_str()), None).unwrap();
    t.update_score(PlayerSlot::One, 11).unwrap();
    t.update_score(PlayerSlot::Two, 3).unwrap();
    t.end_game(Completion::Natural).unwrap();
    let before = t.games();

    t.start_game(Some(b.as_str()), Some(a.as_str()), None).unwrap();
    t.update_score(PlayerSlot::One, 4).unwrap();
    assert!(t.cancel_game().unwrap());

    assert!(!t.has_active_game());
    assert_eq!(t.games(), before);
}

#[test]
fn cancel_without_active_game_reports_nothing() {
    let (mut t, _, _) = tracker_with_players();
    assert!(!t.cancel_game().unwrap());
}

#[test]
fn update_score_without_active_game_is_noop() {
    let (mut t, _, _) = tracker_with_players();
    assert!(t.update_score(PlayerSlot::One, 5).unwrap().is_none());
    assert!(t.games().is_empty());
}

#[test]
fn negative_score_clamps_to_zero() {
    let (mut t, a, b) = tracker_with_players();
    t.start_game(Some(a.as_str()), Some(b.as_str()), None).unwrap();
    t.update_score(PlayerSlot::Two, 4).unwrap();
    let game = t.update_score(PlayerSlot::Two, -3).unwrap().unwrap();
    assert_eq!(game.score2, 0);
}

#[test]
fn eleven_nine_is_a_win_for_player_one() {
    let (mut t, a, b) = tracker_with_players();
    t.start_game(Some(a.as_str()), Some(b.as_str()), Some(11)).unwrap();
    t.update_score(PlayerSlot::One, 11).unwrap();
    let game = t.update_score(PlayerSlot::Two, 9).unwrap().unwrap().clone();
    assert_eq!(game.winner, Some(a.clone()));
    assert!(!game.completed, "win detection must not complete the game");

    match t.end_game(Completion::Natural).unwrap() {
        EndOutcome::Completed(done) => {
            assert!(done.completed);
            assert_eq!(done.winner, Some(a.clone()));
        }
        other => panic!("expected completion, got {other:?}"),
    }
    assert!(!t.has_active_game());
}

#[test]
fn winner_is_persisted_with_the_winning_score() {
    let (mut t, a, b) = tracker_with_players();
    let id = t.start_game(Some(a.as_str()), Some(b.as_str()), Some(11)).unwrap().id.clone();
    t.update_score(PlayerSlot::Two, 11).unwrap();
    let stored = t.game(&id).unwrap();
    assert_eq!(stored.winner, Some(b.clone()));
    assert_eq!(stored.score2, 11);
}

#[test]
fn ten_nine_stays_in_progress() {
    let (mut t, a, b) = tracker_with_players();
    t.start_game(Some(a.as_str()), Some(b.as_str()), Some(11)).unwrap();
    t.update_score(PlayerSlot::One, 10).unwrap();
    t.update_score(PlayerSlot::Two, 9).unwrap();
    let before = t.games();

    assert!(matches!(
        t.end_game(Completion::Natural).unwrap(),
        EndOutcome::InProgress(_)
    ));
    assert!(t.has_active_game());
    assert_eq!(t.games(), before);
}

#[test]
fn deuce_needs_a_two_point_lead() {
    let (mut t, a, b) = tracker_with_players();
    t.start_game(Some(a.as_str()), Some(b.as_str()), Some(11)).unwrap();
    t.update_score(PlayerSlot::One, 11).unwrap();
    let game = t.update_score(PlayerSlot::Two, 10).unwrap().unwrap();
    assert_eq!(game.winner, None);
    let game = t.update_score(PlayerSlot::Two, 13).unwrap().unwrap();
    assert_eq!(game.winner, Some(b.clone()));
}

#[test]
fn correcting_a_score_clears_a_stale_winner() {
    let (mut t, a, b) = tracker_with_players();
    t.start_game(Some(a.as_str()), Some(b.as_str()), Some(11)).unwrap();
    t.update_score(PlayerSlot::One, 11).unwrap();
    let game = t.update_score(PlayerSlot::One, 9).unwrap().unwrap();
    assert_eq!(game.winner, None);
}

#[test]
fn forced_end_awards_higher_score() {
    let (mut t, a, b) = tracker_with_players();
    t.start_game(Some(a.as_str()), Some(b.as_str()), Some(11)).unwrap();
    t.update_score(PlayerSlot::One, 4).unwrap();
    t.update_score(PlayerSlot::Two, 7).unwrap();
    match t.end_game(Completion::Force).unwrap() {
        EndOutcome::Completed(done) => assert_eq!(done.winner, Some(b.clone())),
        other => panic!("expected completion, got {other:?}"),
    }
}

#[test]
fn forced_end_on_tie_needs_tie_break() {
    let (mut t, a, b) = tracker_with_players();
    t.start_game(Some(a.as_str()), Some(b.as_str()), Some(11)).unwrap();
    t.update_score(PlayerSlot::One, 6).unwrap();
    t.update_score(PlayerSlot::Two, 6).unwrap();

    assert!(matches!(
        t.end_game(Completion::Force),
        Err(TrackerError::TiedScore)
    ));
    assert!(t.has_active_game());

    match t.end_game(Completion::ForceTieBreak(PlayerSlot::Two)).unwrap() {
        EndOutcome::Completed(done) => assert_eq!(done.winner, Some(b.clone())),
        other => panic!("expected completion, got {other:?}"),
    }
}

#[test]
fn tie_break_does_not_override_the_score() {
    let (mut t, a, b) = tracker_with_players();
    t.start_game(Some(a.as_str()), Some(b.as_str()), Some(11)).unwrap();
    t.update_score(PlayerSlot::One, 5).unwrap();
    match t.end_game(Completion::ForceTieBreak(PlayerSlot::Two)).unwrap() {
        EndOutcome::Completed(done) => assert_eq!(done.winner, Some(a.clone())),
        other => panic!("expected completion, got {other:?}"),
    }
}

#[test]
fn end_without_active_game_is_noop() {
    let (mut t, _, _) = tracker_with_players();
    assert_eq!(
        t.end_game(Completion::Force).unwrap(),
        EndOutcome::NoActiveGame
    );
}

#[test]
fn completion_updates_both_players_stats() {
    let (mut t, a, b) = tracker_with_players();
    t.start_game(Some(a.as_str()), Some(b.as_str()), Some(11)).unwrap();
    t.update_score(PlayerSlot::One, 11).unwrap();
    t.update_score(PlayerSlot::Two, 2).unwrap();
    t.end_game(Completion::Natural).unwrap();

    let alice = t.player(&a).unwrap().stats;
    let bob = t.player(&b).unwrap().stats;
    assert_eq!((alice.games_played, alice.wins, alice.win_percentage), (1, 1, 100));
    assert_eq!((bob.games_played, bob.losses, bob.win_percentage), (1, 1, 0));
}

#[test]
fn completed_games_always_have_a_participant_winner() {
    let (mut t, a, b) = tracker_with_players();
    let rounds = [(11, 4, Completion::Natural), (3, 8, Completion::Force), (5, 5, Completion::ForceTieBreak(PlayerSlot::One))];
    for (s1, s2, completion) in rounds {
        t.start_game(Some(a.as_str()), Some(b.as_str()), Some(11)).unwrap();
        t.update_score(PlayerSlot::One, s1).unwrap();
        t.update_score(PlayerSlot::Two, s2).unwrap();
        t.end_game(completion).unwrap();
    }
    let games = t.games();
    assert_eq!(games.len(), 3);
    for g in games.iter().filter(|g| g.completed) {
        let winner = g.winner.as_deref().unwrap();
        assert!(winner == g.player1.id || winner == g.player2.id);
    }
}

#[test]
fn sample_data_seeds_players_and_completed_games() {
    let t = Tracker::open(
        MemoryStore::new(),
        OpenOptions {
            seed_sample_data: true,
        },
    )
    .unwrap();
    assert_eq!(t.players().len(), 4);
    assert_eq!(t.games().len(), 5);
    assert!(t.games().iter().all(|g| g.completed));
    assert!(!t.has_active_game());
    let alice = t.players().into_iter().find(|p| p.name == "Alice").unwrap();
    assert_eq!((alice.stats.games_played, alice.stats.wins), (3, 2));
}
