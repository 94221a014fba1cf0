//! QA tests for every way the day can end.
//!
//! Each scenario starts from a prepared state and drives the session through
//! its menus, the same way a player would.
//! Run with: `cargo test -p apocalypse-core --test qa_endings`

use apocalypse_core::testing::{
    assert_at, assert_ending, assert_has_item, assert_no_ending, TestHarness,
};
use apocalypse_core::world::{Friend, Item};
use apocalypse_core::{Action, Ending, GameConfig, LocationId, Screen};

// =============================================================================
// MISSILE DESTROYED
// =============================================================================

#[test]
fn test_prepared_player_destroys_missile_on_entering_base() {
    let mut harness = TestHarness::new();
    harness
        .at(LocationId::TownSquare)
        .cash(2)
        .knowledge(7)
        .tech_parts(2);

    harness.choose(Action::Go(LocationId::MilitaryBase));
    assert_no_ending(&harness);
    assert!(harness.offers(Action::BribeGuard));

    let turn = harness.choose(Action::BribeGuard);
    assert_eq!(turn.ending, Some(Ending::MissileDestroyed));
    assert!(harness.narrated("--- Ending Achieved: Missile Destroyed ---"));
    assert_eq!(harness.state().cash, 0);
}

#[test]
fn test_laser_control_room_fires_with_enough_knowledge() {
    let mut harness = TestHarness::new();
    harness.at(LocationId::MilitaryBase).cash(2).knowledge(7);

    harness.choose(Action::BribeGuard);
    // Without tech parts the arrival check doesn't fire
    assert_no_ending(&harness);
    assert!(harness.offers(Action::SearchLaserRoom));
    assert!(!harness.offers(Action::RetreatFromBase));

    harness.choose(Action::SearchLaserRoom);
    assert_eq!(harness.state().screen, Screen::LaserControl);

    harness.choose(Action::FireLaser);
    assert_ending(&harness, Ending::MissileDestroyed);
}

#[test]
fn test_laser_without_knowledge_runs_out_the_clock() {
    let mut harness = TestHarness::new();
    harness.at(LocationId::MilitaryBase).cash(2).knowledge(5);

    harness.play(&[
        Action::BribeGuard,
        Action::SearchLaserRoom,
        Action::FireLaser,
    ]);
    assert_ending(&harness, Ending::TimesUp);
}

// =============================================================================
// TOWN EVACUATED
// =============================================================================

#[test]
fn test_convinced_mayor_and_crowd_evacuate_town() {
    let mut harness = TestHarness::new();
    harness
        .at(LocationId::TownHall)
        .knowledge(5)
        .give(Item::RadioWarning);
    harness.state_mut().flags.mob_of_civilians = true;

    harness.choose(Action::DemandMayor);
    assert!(harness.state().flags.mayor_warned);
    // The ending waits until the player is back in the square
    assert_no_ending(&harness);

    harness.choose(Action::Go(LocationId::TownSquare));
    assert_ending(&harness, Ending::TownEvacuated);
}

#[test]
fn test_mayor_without_evidence_throws_player_out() {
    let mut harness = TestHarness::new();
    harness.at(LocationId::TownHall).knowledge(9);

    harness.choose(Action::DemandMayor);
    assert_at(&harness, LocationId::TownSquare);
    assert!(!harness.state().flags.mayor_warned);
    assert_no_ending(&harness);
}

// =============================================================================
// ESCAPES
// =============================================================================

#[test]
fn test_bunker_cache_completes_solo_escape() {
    let mut harness = TestHarness::new();
    harness
        .at(LocationId::OutskirtsRoad)
        .give(Item::BunkerRumor)
        .give(Item::Supplies)
        .give(Item::Supplies)
        .trust(Friend::Ben, 10.0);

    harness.choose(Action::Go(LocationId::NeighborsBunker));
    harness.choose(Action::KnockOnBunker);
    assert!(harness.state().flags.bunker_unlocked);
    assert_no_ending(&harness);

    harness.choose(Action::EnterBunker);
    assert_has_item(&harness, Item::BunkerCacheTaken);
    assert_ending(&harness, Ending::SoloEscape);
}

#[test]
fn test_locked_bunker_stays_shut() {
    let mut harness = TestHarness::new();
    harness.at(LocationId::NeighborsBunker).give(Item::BunkerRumor);

    harness.play(&[Action::KnockOnBunker, Action::EnterBunker]);
    assert!(!harness.state().flags.bunker_unlocked);
    assert!(harness.narrated("The door remains locked."));
    assert_no_ending(&harness);
}

#[test]
fn test_bus_with_committed_friends_is_allies_escape() {
    let mut harness = TestHarness::new();
    harness
        .at(LocationId::BusStop)
        .cash(1)
        .trust(Friend::Alex, 4.0)
        .trust(Friend::Maya, 4.0)
        .trust(Friend::Ben, 4.0);
    harness.state_mut().flags.shared_vision_with_friends = true;

    harness.choose(Action::WaitForBus);
    assert_ending(&harness, Ending::AlliesEscape);
    assert_eq!(harness.state().cash, 0);
}

#[test]
fn test_bus_without_fare_leaves_player_waiting() {
    let mut harness = TestHarness::new();
    harness.at(LocationId::BusStop);

    harness.choose(Action::WaitForBus);
    assert_no_ending(&harness);
    assert_at(&harness, LocationId::BusStop);
}

#[test]
fn test_truck_with_keys_and_gas_drives_away() {
    let mut harness = TestHarness::new();
    harness.at(LocationId::TownSquare).cash(1);

    harness.play(&[
        Action::Go(LocationId::GeneralStore),
        Action::BuySupplies,
        Action::Go(LocationId::TownSquare),
        Action::Go(LocationId::BusStop),
        Action::Go(LocationId::OutskirtsRoad),
        Action::SearchForCar,
        Action::TakeHendersonTruck,
    ]);
    assert_has_item(&harness, Item::TruckKeys);
    assert_has_item(&harness, Item::GasCan);
    assert_no_ending(&harness);

    harness.choose(Action::DriveTruck);
    assert_ending(&harness, Ending::SoloEscape);
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn test_clock_running_out_ends_the_game() {
    let mut harness =
        TestHarness::with_config(GameConfig::default().with_starting_hours(1));

    harness.play(&[Action::UseComputer, Action::SearchLocalNews]);
    assert_ending(&harness, Ending::TimesUp);
    assert!(harness.narrated("Your time has run out."));
    assert!(harness.menu().is_empty());
}

#[test]
fn test_public_scene_gets_player_arrested_at_gate() {
    let mut harness = TestHarness::new();
    harness.at(LocationId::TownSquare).knowledge(9).tech_parts(3);

    harness.choose(Action::WarnOpenly);
    assert!(harness.state().flags.failed_public_warning);

    harness.play(&[Action::Go(LocationId::MilitaryBase), Action::SneakIntoBase]);
    assert_ending(&harness, Ending::Jailed);
}

#[test]
fn test_caught_stealing_is_jailed() {
    let mut harness = TestHarness::unlucky();
    harness.at(LocationId::GeneralStore);

    harness.choose(Action::StealFromStore);
    assert_eq!(harness.state().screen, Screen::StealGasCan);
    harness.choose(Action::ConfirmSteal);
    assert_ending(&harness, Ending::Jailed);
}

#[test]
fn test_first_ending_wins_when_arrest_uses_last_minutes() {
    let mut harness = TestHarness::unlucky();
    harness.at(LocationId::TechStore);
    harness.state_mut().clock.remaining_minutes = 30;

    let turn = harness.choose(Action::StealTechPart);
    assert_eq!(turn.ending, Some(Ending::Jailed));
    assert!(harness.state().clock.is_expired());
    assert_ending(&harness, Ending::Jailed);
}

#[test]
fn test_choices_after_ending_are_rejected() {
    let mut harness = TestHarness::unlucky();
    harness.at(LocationId::SchoolEntrance);
    harness.choose(Action::StealFromSchool);

    assert!(harness.session.is_over());
    assert!(harness.session.choose(1).is_err());
}
