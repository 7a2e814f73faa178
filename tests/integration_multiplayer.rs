use neontype::clock::ManualClock;
use neontype::players::{Player, PlayerPatch};
use neontype::rivals::RivalPack;
use neontype::store::SessionStore;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn patch_wpm(wpm: u32) -> PlayerPatch {
    PlayerPatch {
        wpm: Some(wpm),
        ..Default::default()
    }
}

#[test]
fn leaderboard_orders_by_wpm_and_is_stable() {
    let mut store = SessionStore::new();
    store.join_room("lobby", "Alice");
    let bob = Player::new("Bob");
    let carol = Player::new("Carol");
    let (bob_id, carol_id) = (bob.id.clone(), carol.id.clone());
    store.add_player(bob);
    store.add_player(carol);

    store.update_player(&bob_id, &patch_wpm(40));
    store.update_player(&carol_id, &patch_wpm(40));

    let order: Vec<&str> = store.leaderboard().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(order, ["Bob", "Carol", "Alice"]);

    // roster order itself is untouched
    let roster: Vec<&str> = store.players().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(roster, ["Alice", "Bob", "Carol"]);
}

#[test]
fn unknown_ids_leave_the_roster_alone() {
    let mut store = SessionStore::new();
    store.join_room("lobby", "Alice");
    let before = store.players().to_vec();

    store.update_player("ghost", &patch_wpm(120));
    store.remove_player("ghost");

    assert_eq!(store.players(), before.as_slice());
}

#[test]
fn patches_are_partial_and_clamped() {
    let mut store = SessionStore::new();
    store.join_room("lobby", "Alice");
    let id = store.registry().local_player_id().unwrap().to_string();

    store.update_player(
        &id,
        &PlayerPatch {
            progress: Some(250.0),
            accuracy: Some(140),
            ..Default::default()
        },
    );
    store.update_player(&id, &patch_wpm(55));

    let me = store.registry().get(&id).unwrap();
    assert_eq!(me.name, "Alice");
    assert_eq!(me.wpm, 55);
    assert_eq!(me.accuracy, 100);
    assert_eq!(me.progress, 100.0);
    assert!(!me.is_finished);
}

#[test]
fn rivals_finish_in_pace_order() {
    let clock = ManualClock::new(0);
    let mut store = SessionStore::with_clock(clock.clone());
    store.join_room("lobby", "Alice");
    let pack = RivalPack::spawn(&mut store, 4, &mut StdRng::seed_from_u64(7));
    assert_eq!(store.players().len(), 5);

    store.start_session("x".repeat(100));
    let mut finished_at = Vec::new();
    for step in 1..=60 {
        clock.advance(1_000);
        let elapsed = store.elapsed_ms();
        pack.advance(&mut store, elapsed, 100);
        for rival in pack.rivals() {
            let p = store.registry().get(&rival.player_id).unwrap();
            if p.is_finished && !finished_at.iter().any(|(id, _)| id == &rival.player_id) {
                finished_at.push((rival.player_id.clone(), step));
            }
        }
    }

    // 100 chars at 25+ wpm takes well under a minute
    assert_eq!(finished_at.len(), 4);
    let pace = |id: &str| {
        pack.rivals()
            .iter()
            .find(|r| r.player_id == id)
            .unwrap()
            .target_wpm
    };
    for (a, a_step) in &finished_at {
        for (b, b_step) in &finished_at {
            if a_step < b_step {
                assert!(pace(a) >= pace(b));
            }
        }
    }

    pack.reset(&mut store);
    assert!(store.players().iter().all(|p| p.progress == 0.0 && !p.is_finished));
}
