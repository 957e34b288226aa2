//! Integration tests for stage submission and cumulative standings.

use league_standings_web::{
    close_stage, fold_cumulative, score_stage, submit_stage_results, Event, EventError,
    EventStatus, Participant, Placement, PlayerId,
};

/// Two-stage event with A, B, C registered and started.
fn league() -> (Event, [PlayerId; 3]) {
    let mut e = Event::with_stage_count("Spring League", 2).unwrap();
    let players = [
        Participant::new("A"),
        Participant::new("B"),
        Participant::new("C"),
    ];
    let ids = [players[0].player_id, players[1].player_id, players[2].player_id];
    for p in players {
        e.register_participant(p).unwrap();
    }
    e.start().unwrap();
    (e, ids)
}

fn points_of(e: &Event, id: PlayerId) -> u32 {
    e.cumulative_standings
        .iter()
        .find(|s| s.player_id == id)
        .map(|s| s.points)
        .unwrap()
}

#[test]
fn two_stage_league_end_to_end() {
    let (mut e, [a, b, c]) = league();

    submit_stage_results(
        &mut e,
        &[
            Placement::new(a, 1, 3, 0),
            Placement::new(b, 2, 2, 1),
            Placement::new(c, 3, 1, 2),
        ],
    )
    .unwrap();

    let stage_one = &e.stages[0].standings;
    assert!(e.stages[0].is_completed);
    assert_eq!((stage_one[0].player_id, stage_one[0].points, stage_one[0].rank), (a, 25, 1));
    assert_eq!((stage_one[1].player_id, stage_one[1].points, stage_one[1].rank), (b, 18, 2));
    assert_eq!((stage_one[2].player_id, stage_one[2].points, stage_one[2].rank), (c, 15, 3));
    assert_eq!(stage_one[0].player_name, "A");

    // After one stage the cumulative view matches the stage, counting stages played.
    assert_eq!(e.cumulative_standings.len(), 3);
    for (cum, st) in e.cumulative_standings.iter().zip(stage_one) {
        assert_eq!(cum.player_id, st.player_id);
        assert_eq!(cum.points, st.points);
        assert_eq!(cum.wins, st.wins);
        assert_eq!(cum.losses, st.losses);
        assert_eq!(cum.rank, st.rank);
        assert_eq!(cum.matches_played, 1);
    }
    assert_eq!(e.current_stage, 1);
    assert_eq!(e.status, EventStatus::Ongoing);

    submit_stage_results(
        &mut e,
        &[
            Placement::new(a, 3, 0, 3),
            Placement::new(b, 1, 3, 0),
            Placement::new(c, 2, 2, 1),
        ],
    )
    .unwrap();

    assert_eq!(points_of(&e, b), 43);
    assert_eq!(points_of(&e, a), 40);
    assert_eq!(points_of(&e, c), 33);
    let order: Vec<_> = e
        .cumulative_standings
        .iter()
        .map(|s| (s.player_id, s.rank))
        .collect();
    assert_eq!(order, vec![(b, 1), (a, 2), (c, 3)]);
    assert!(e.cumulative_standings.iter().all(|s| s.matches_played == 2));
    assert_eq!(e.current_stage, 2);
    assert_eq!(e.status, EventStatus::Completed);
    assert!(e.stages.iter().all(|s| s.is_completed));
}

#[test]
fn never_placed_participant_is_left_out() {
    let (mut e, [a, b, c]) = league();
    let d = Participant::new("D");
    let d_id = d.player_id;
    e.register_participant(d).unwrap();

    submit_stage_results(
        &mut e,
        &[
            Placement::new(a, 1, 3, 0),
            Placement::new(b, 2, 2, 1),
            Placement::new(c, 3, 1, 2),
        ],
    )
    .unwrap();
    submit_stage_results(
        &mut e,
        &[
            Placement::new(a, 3, 0, 3),
            Placement::new(b, 1, 3, 0),
            Placement::new(c, 2, 2, 1),
        ],
    )
    .unwrap();

    assert_eq!(e.cumulative_standings.len(), 3);
    assert!(e.cumulative_standings.iter().all(|s| s.player_id != d_id));
    let ranks: Vec<_> = e.cumulative_standings.iter().map(|s| s.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn duplicate_rank_leaves_event_unchanged() {
    let (mut e, [a, b, _]) = league();
    let before = e.clone();
    let res = submit_stage_results(
        &mut e,
        &[Placement::new(a, 1, 3, 0), Placement::new(b, 1, 2, 1)],
    );
    assert_eq!(res, Err(EventError::DuplicateRank(1)));
    assert_eq!(e, before);
}

#[test]
fn submission_requires_ongoing_event() {
    let mut e = Event::with_stage_count("x", 1).unwrap();
    let p = Participant::new("A");
    let id = p.player_id;
    e.register_participant(p).unwrap();
    assert_eq!(
        submit_stage_results(&mut e, &[Placement::new(id, 1, 1, 0)]),
        Err(EventError::InvalidState)
    );
}

#[test]
fn completed_event_rejects_further_submissions() {
    let mut e = Event::with_stage_count("x", 1).unwrap();
    let a = Participant::new("A");
    let b = Participant::new("B");
    let (a_id, b_id) = (a.player_id, b.player_id);
    e.register_participant(a).unwrap();
    e.register_participant(b).unwrap();
    e.start().unwrap();
    let placements = [Placement::new(a_id, 1, 1, 0), Placement::new(b_id, 2, 0, 1)];
    submit_stage_results(&mut e, &placements).unwrap();
    assert_eq!(e.status, EventStatus::Completed);
    assert_eq!(
        submit_stage_results(&mut e, &placements),
        Err(EventError::InvalidState)
    );
}

#[test]
fn dropped_participant_cannot_be_placed_but_keeps_history() {
    let (mut e, [a, b, c]) = league();
    submit_stage_results(
        &mut e,
        &[
            Placement::new(a, 1, 3, 0),
            Placement::new(b, 2, 2, 1),
            Placement::new(c, 3, 1, 2),
        ],
    )
    .unwrap();
    e.drop_participant(a).unwrap();

    assert_eq!(
        close_stage(&e, &[Placement::new(a, 1, 1, 0)]),
        Err(EventError::ParticipantDropped(a))
    );

    submit_stage_results(
        &mut e,
        &[Placement::new(b, 1, 3, 0), Placement::new(c, 2, 2, 1)],
    )
    .unwrap();
    // A's stage-one points still count after dropping.
    assert_eq!(points_of(&e, a), 25);
    assert_eq!(points_of(&e, b), 43);
    let a_row = e.cumulative_standings.iter().find(|s| s.player_id == a).unwrap();
    assert_eq!(a_row.matches_played, 1);
}

#[test]
fn fold_is_repeatable() {
    let (e, [a, b, c]) = league();
    let results = score_stage(&[
        Placement::new(c, 1, 2, 0),
        Placement::new(a, 2, 1, 1),
        Placement::new(b, 3, 1, 1),
    ])
    .unwrap();
    let first = fold_cumulative(&results, &e.participants, &e.stages, 1).unwrap();
    let second = fold_cumulative(&results, &e.participants, &e.stages, 1).unwrap();
    assert_eq!(first, second);
    assert_eq!(first[0].player_id, c);
}

#[test]
fn close_stage_does_not_touch_event() {
    let (e, [a, b, _]) = league();
    let before = e.clone();
    let outcome = close_stage(&e, &[Placement::new(a, 1, 1, 0), Placement::new(b, 2, 0, 1)])
        .unwrap();
    assert_eq!(e, before);
    assert_eq!(outcome.stage_index, 0);
    assert!(!outcome.completes_event);
    assert_eq!(outcome.stage_standings[0].player_name, "A");
    assert_eq!(outcome.cumulative_standings.len(), 2);
}
