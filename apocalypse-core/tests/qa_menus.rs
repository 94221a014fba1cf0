//! QA tests for menu navigation using the headless API.
//!
//! These tests verify the numbered menus behave like the game's screens:
//! - Option numbering and invalid input
//! - Sub-menus and how they return
//! - Time costs of common actions
//! - Friends, trust and favors
//!
//! Run with: `cargo test -p apocalypse-core --test qa_menus`

use apocalypse_core::locations;
use apocalypse_core::session::SessionError;
use apocalypse_core::testing::{assert_at, assert_minutes_left, TestHarness};
use apocalypse_core::world::{Friend, Item};
use apocalypse_core::{Action, HeadlessConfig, HeadlessGame, LocationId, Screen};

const FULL_DAY: u32 = 24 * 60;

fn new_game() -> HeadlessGame {
    HeadlessGame::new(HeadlessConfig::quick_start("Riley").with_seed(7))
}

// =============================================================================
// NUMBERING AND INPUT
// =============================================================================

#[test]
fn test_bedroom_menu_lines() {
    let game = new_game();
    let lines = game.menu_lines();

    assert_eq!(lines[0], "--- Bedroom ---");
    assert!(lines.contains(&"1. Use computer".to_string()));
    assert!(lines.contains(&"5. Go to living room".to_string()));
    assert!(lines.contains(&"9. Quit".to_string()));
    assert_eq!(game.session().menu().len(), 9);
}

#[test]
fn test_invalid_input_changes_nothing() {
    let mut game = new_game();

    match game.send("0") {
        Err(SessionError::InvalidChoice { max, .. }) => assert_eq!(max, 9),
        other => panic!("expected InvalidChoice, got {:?}", other.map(|r| r.narrative)),
    }
    assert!(game.send("10").is_err());
    assert!(game.send("ten").is_err());
    assert!(game.send("").is_err());

    assert_eq!(game.minutes_remaining(), FULL_DAY);
    assert_eq!(game.session().state().turn, 0);
    assert!(game.transcript().is_empty());
}

#[test]
fn test_walking_is_free() {
    let mut game = new_game();

    let response = game.send("3").expect("go to town");
    assert_eq!(response.location, LocationId::TownSquare);
    assert_eq!(game.minutes_remaining(), FULL_DAY);
    assert_eq!(response.time_left, "24:00");

    // One interaction, eight exits and the four common options
    assert_eq!(game.session().menu().len(), 13);
    assert!(game.menu_lines().contains(&"2. Work at Burger Hut".to_string()));

    assert_eq!(game.transcript().len(), 1);
    assert_eq!(game.transcript()[0].choice, "Go to town");
}

#[test]
fn test_labels_select_options() {
    let mut game = new_game();
    game.send_label("go to SCHOOL").expect("go to school");
    assert_eq!(game.current_location(), LocationId::SchoolEntrance);

    assert!(game.send_label("fly to the moon").is_err());
}

// =============================================================================
// SUB-MENUS
// =============================================================================

#[test]
fn test_computer_searches() {
    let mut game = new_game();

    let response = game.send_label("use computer").expect("use computer");
    assert!(response.narrative.contains("Backpack"));
    assert!(game.has_item(Item::Backpack));
    assert_eq!(game.menu_lines()[0], "--- Computer ---");

    game.send_label("local news").expect("search news");
    assert_eq!(game.minutes_remaining(), FULL_DAY - 60);
    assert_eq!(game.session().state().knowledge, 2);

    game.send_label("stop using").expect("stop");
    assert_eq!(game.minutes_remaining(), FULL_DAY - 90);
    assert_eq!(game.session().state().screen, Screen::Location);
    assert_eq!(game.menu_lines()[0], "--- Bedroom ---");
}

#[test]
fn test_parents_remember_the_warning() {
    let mut game = new_game();

    game.send_label("talk to parents").expect("talk");
    assert_eq!(game.session().state().screen, Screen::TalkParents);

    let response = game.send_label("tell them").expect("tell");
    assert!(response.narrative.contains("feverish"));
    assert!(game.session().state().flags.parents_warned);
    assert_eq!(game.minutes_remaining(), FULL_DAY - 30);

    game.send_label("talk to parents").expect("talk again");
    let lines = game.menu_lines();
    assert!(lines.iter().any(|l| l.contains("Talk about mundane things")));
    assert!(!lines.iter().any(|l| l.contains("nuclear missile vision")));
}

#[test]
fn test_quit_asks_for_confirmation() {
    let mut game = new_game();

    game.send("9").expect("quit");
    assert_eq!(game.session().state().screen, Screen::ConfirmQuit);

    game.send("2").expect("no");
    assert_eq!(game.session().state().screen, Screen::Location);
    assert!(!game.is_over());

    game.send("9").expect("quit");
    let response = game.send("1").expect("yes");
    assert!(response.quit);
    assert!(game.is_over());
    assert!(matches!(game.send("1"), Err(SessionError::GameOver)));
}

#[test]
fn test_help_describes_current_location() {
    let mut harness = TestHarness::new();
    harness.at(LocationId::TechStore);
    harness.choose(Action::Help);

    assert_eq!(
        harness.last_narration(),
        vec![locations::info(LocationId::TechStore).help]
    );
    assert_minutes_left(&harness, FULL_DAY);
}

// =============================================================================
// FRIENDS
// =============================================================================

#[test]
fn test_ben_helps_then_hears_the_vision() {
    let mut game = new_game();
    for label in [
        "go to school",
        "go to newspaper club",
        "talk to friends",
        "talk to ben",
    ] {
        game.send_label(label).expect(label);
    }

    game.send_label("something practical").expect("ask ben");
    assert!(game.has_item(Item::HendersonTruckTip));
    assert_eq!(game.session().state().trust(Friend::Ben), 8.0);
    assert_eq!(game.session().state().screen, Screen::Friends);

    game.send_label("talk to ben").expect("talk to ben");
    game.send_label("tell him about the vision").expect("tell ben");
    assert!(game.has_item(Item::SurvivalChecklist));
    assert!(game.session().state().flags.talked_about_vision(Friend::Ben));

    // Once he knows, the conversation only offers a way out
    game.send_label("talk to ben").expect("talk to ben");
    assert_eq!(game.session().menu().len(), 1);
}

#[test]
fn test_jake_favor_after_class() {
    let mut harness = TestHarness::new();
    harness.at(LocationId::SchoolEntrance);

    harness.choose(Action::AttendClass);
    assert_eq!(harness.state().screen, Screen::AfterClass);
    assert_minutes_left(&harness, FULL_DAY - 120);

    harness.play(&[Action::TalkTo(Friend::Jake), Action::AskForHelp(Friend::Jake)]);
    assert!(harness.state().flags.jake_owed_favor);
    assert_eq!(harness.state().screen, Screen::AfterClass);

    harness.play(&[
        Action::LeaveClass,
        Action::Go(LocationId::NewspaperClub),
        Action::TalkToFriends,
        Action::CollectJakeFavor,
    ]);
    assert_eq!(harness.state().cash, 1);
    assert!(!harness.state().flags.jake_owed_favor);
    assert!(!harness.offers(Action::CollectJakeFavor));
}

#[test]
fn test_class_can_only_be_taken_once() {
    let mut harness = TestHarness::new();
    harness.at(LocationId::SchoolEntrance);
    harness.play(&[Action::AttendClass, Action::LeaveClass, Action::AttendClass]);

    assert_eq!(harness.state().knowledge, 1);
    assert!(harness.narrated("already attended class"));
}

// =============================================================================
// MONEY AND TIME
// =============================================================================

#[test]
fn test_burger_shift_pays_and_returns_to_square() {
    let mut harness = TestHarness::new();
    harness.at(LocationId::BurgerHut);
    harness.choose(Action::WorkShift);

    assert_eq!(harness.state().cash, 1);
    assert_at(&harness, LocationId::TownSquare);
    assert_minutes_left(&harness, FULL_DAY - 240 - 6);
}

#[test]
fn test_pawn_shop_buys_stolen_goods() {
    let mut harness = TestHarness::new();
    harness.at(LocationId::PawnShop);

    harness.choose(Action::OpenPawnCounter);
    assert_eq!(harness.state().screen, Screen::Location);

    harness.give(Item::StolenCalculator);
    harness.choose(Action::OpenPawnCounter);
    assert_eq!(harness.state().screen, Screen::PawnCounter);
    assert!(harness.offers(Action::SellItem(Item::StolenCalculator)));

    harness.choose(Action::SellItem(Item::StolenCalculator));
    assert_eq!(harness.state().cash, 1);
    assert!(!harness.state().has_item(Item::StolenCalculator));
    assert_minutes_left(&harness, FULL_DAY);
}

#[test]
fn test_radio_warning_arrives_with_ten_hours_left() {
    let mut game = HeadlessGame::new(
        HeadlessConfig::quick_start("Riley")
            .with_seed(7)
            .with_starting_hours(11),
    );
    game.send_label("use computer").expect("use computer");
    assert!(!game.has_item(Item::RadioWarning));

    let response = game.send_label("local news").expect("search news");
    assert!(response.narrative.contains("radio station"));
    assert!(game.has_item(Item::RadioWarning));
    assert!(game.session().state().flags.news_warning_issued);
}
