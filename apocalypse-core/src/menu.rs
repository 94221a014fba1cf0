//! Menu dispatcher.
//!
//! Turns the current [`Screen`] and game state into a numbered list of
//! options, each carrying the [`Action`] it triggers. Front ends only render
//! menus and pass the chosen number back to the session.

use crate::config::TuningConfig;
use crate::locations::{self, Interaction, MILITARY_INTERIOR};
use crate::rules::Action;
use crate::world::{Friend, GameState, LocationId, Screen, HIGH_TRUST};

/// A single numbered choice.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuOption {
    pub label: String,
    pub action: Action,
}

impl MenuOption {
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// What the dispatcher presents for one turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    pub title: String,
    /// Lines shown above the options.
    pub prompt: Vec<String>,
    pub options: Vec<MenuOption>,
}

impl Menu {
    /// Look up a 1-based choice.
    pub fn option(&self, choice: usize) -> Option<&MenuOption> {
        choice.checked_sub(1).and_then(|i| self.options.get(i))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// The 1-based number of the first option triggering `action`.
    pub fn position(&self, action: Action) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.action == action)
            .map(|i| i + 1)
    }

    /// Options as `N. label` lines.
    pub fn numbered(&self) -> Vec<String> {
        self.options
            .iter()
            .enumerate()
            .map(|(i, o)| format!("{}. {}", i + 1, o.label))
            .collect()
    }
}

/// Build the menu for the state's current screen.
pub fn build_menu(state: &GameState, tuning: &TuningConfig) -> Menu {
    match state.screen {
        Screen::Location => location_menu(state, tuning),
        Screen::Computer => Menu {
            title: "Computer".to_string(),
            prompt: vec!["What do you want to search for?".to_string()],
            options: vec![
                MenuOption::new(
                    "Search for 'nuclear threat' or 'impending doom'",
                    Action::SearchNuclearThreat,
                ),
                MenuOption::new("Look for unusual local news reports", Action::SearchLocalNews),
                MenuOption::new(
                    "Check for survival guides or emergency bunkers",
                    Action::SearchSurvivalGuides,
                ),
                MenuOption::new("Stop using the computer", Action::StopComputer),
            ],
        },
        Screen::TalkParents => parents_menu(state),
        Screen::Friends => friends_menu(state),
        Screen::TalkFriend(friend) => friend_menu(state, friend),
        Screen::StealGasCan => Menu {
            title: "General Store".to_string(),
            prompt: vec!["You eye a small gas can. Attempt to steal it?".to_string()],
            options: vec![
                MenuOption::new("Yes, try to steal.", Action::ConfirmSteal),
                MenuOption::new("No, it's too risky.", Action::CancelSteal),
            ],
        },
        Screen::SeekTransport => Menu {
            title: "Seeking Transport".to_string(),
            prompt: vec!["You need a way out of town.".to_string()],
            options: vec![
                MenuOption::new(
                    "Look for Mr. Henderson's truck (near Outskirts Road)",
                    Action::TakeHendersonTruck,
                ),
                MenuOption::new("Go to the Bus Stop", Action::HeadToBusStop),
                MenuOption::new("Go back", Action::StopSearching),
            ],
        },
        Screen::AfterClass => Menu {
            title: "After Class".to_string(),
            prompt: vec!["After class, you see Jake lingering by the door.".to_string()],
            options: vec![
                MenuOption::new("Talk to Jake", Action::TalkTo(Friend::Jake)),
                MenuOption::new("Return to school entrance", Action::LeaveClass),
            ],
        },
        Screen::LaserControl => Menu {
            title: "Orbital Defense Control".to_string(),
            prompt: vec![
                "The satellite laser controls are before you.".to_string(),
                "The countdown clock blazes: T-minus 5 minutes to impact!".to_string(),
            ],
            options: vec![
                MenuOption::new(
                    "Calibrate and fire the laser (requires high knowledge)",
                    Action::FireLaser,
                ),
                MenuOption::new("Abort the mission, it's too late", Action::AbortLaser),
            ],
        },
        Screen::PawnCounter => {
            let mut options: Vec<MenuOption> = state
                .inventory
                .sellable()
                .into_iter()
                .map(|item| {
                    MenuOption::new(
                        format!("Sell {item} ({} cash)", tuning.pawn_price),
                        Action::SellItem(item),
                    )
                })
                .collect();
            options.push(MenuOption::new("Cancel", Action::LeavePawnCounter));
            Menu {
                title: "Pawn Shop".to_string(),
                prompt: vec!["Items you can sell:".to_string()],
                options,
            }
        }
        Screen::ConfirmQuit => Menu {
            title: "Quit".to_string(),
            prompt: vec!["Are you sure you want to quit?".to_string()],
            options: vec![
                MenuOption::new("Yes", Action::ConfirmQuit),
                MenuOption::new("No", Action::CancelQuit),
            ],
        },
    }
}

fn location_menu(state: &GameState, tuning: &TuningConfig) -> Menu {
    let info = locations::info(state.location);
    let inside_base =
        state.location == LocationId::MilitaryBase && state.flags.military_base_accessed;

    let (prompt, interactions): (Vec<String>, &[Interaction]) = if inside_base {
        (
            vec![
                "You're deep inside the military base. Your goal: the satellite laser control room."
                    .to_string(),
                "You know the missile launch is imminent. You need to act fast.".to_string(),
            ],
            MILITARY_INTERIOR,
        )
    } else {
        (vec![info.description.to_string()], info.interactions)
    };

    let mut options: Vec<MenuOption> = interactions
        .iter()
        .map(|i| MenuOption::new(interaction_label(i, tuning), i.action))
        .collect();
    if !inside_base {
        options.extend(
            info.exits
                .iter()
                .map(|e| MenuOption::new(e.label, Action::Go(e.to))),
        );
    }
    options.extend([
        MenuOption::new("Show inventory", Action::ShowInventory),
        MenuOption::new("Show status", Action::ShowStatus),
        MenuOption::new("Help", Action::Help),
        MenuOption::new("Quit", Action::Quit),
    ]);

    Menu {
        title: state.location.name().to_string(),
        prompt,
        options,
    }
}

/// Labels that quote a configurable price.
fn interaction_label(interaction: &Interaction, tuning: &TuningConfig) -> String {
    match interaction.action {
        Action::WaitForBus => format!(
            "{} (requires {} cash)",
            interaction.label, tuning.bus_ticket_cost
        ),
        Action::BuyTechPart => format!(
            "{} ({} cash)",
            interaction.label, tuning.tech_part_cost
        ),
        Action::BribeGuard => format!(
            "{} (requires {} cash)",
            interaction.label, tuning.bribe_cost
        ),
        _ => interaction.label.to_string(),
    }
}

fn parents_menu(state: &GameState) -> Menu {
    let (prompt, options) = if state.flags.parents_warned {
        (
            "Your parents glance at you with lingering worry.",
            vec![
                MenuOption::new("Talk about mundane things", Action::KeepSilent),
                MenuOption::new("Go back", Action::LeaveParents),
            ],
        )
    } else {
        (
            "You consider telling them about your vision. It's a huge risk.",
            vec![
                MenuOption::new("Tell them about the nuclear missile vision", Action::TellParents),
                MenuOption::new("Keep silent and talk about something else", Action::KeepSilent),
            ],
        )
    };
    Menu {
        title: "Parents".to_string(),
        prompt: vec![prompt.to_string()],
        options,
    }
}

fn friends_menu(state: &GameState) -> Menu {
    let mut options: Vec<MenuOption> = [Friend::Alex, Friend::Maya, Friend::Ben]
        .into_iter()
        .map(|f| MenuOption::new(format!("Talk to {f}"), Action::TalkTo(f)))
        .collect();
    if state.flags.jake_owed_favor {
        options.push(MenuOption::new("Ask Jake for a favor", Action::CollectJakeFavor));
    }
    options.push(MenuOption::new("Go back", Action::LeaveFriends));
    Menu {
        title: "Newspaper Club".to_string(),
        prompt: vec!["Who do you want to talk to?".to_string()],
        options,
    }
}

fn friend_menu(state: &GameState, friend: Friend) -> Menu {
    let trust = state.trust(friend);
    let talked = state.flags.talked_about_vision(friend);
    let back = MenuOption::new("Go back", Action::EndConversation);

    let (prompt, mut options) = if talked {
        (after_vision_remark(friend, trust), Vec::new())
    } else {
        match friend {
            Friend::Alex => (
                "Alex glances up. 'What's up? Got a new scoop for the paper?'",
                vec![
                    MenuOption::new("Tell him about the nuclear missile vision", Action::TellVision(friend)),
                    MenuOption::new(
                        "Ask for his research help on a hypothetical disaster",
                        Action::AskForHelp(friend),
                    ),
                    MenuOption::new("Talk about newspaper club business", Action::SmallTalk(friend)),
                ],
            ),
            Friend::Maya => (
                "Maya smiles warmly. 'Hi! You look worried. Want to talk about it?'",
                vec![
                    MenuOption::new("Confide in her about the vision", Action::TellVision(friend)),
                    MenuOption::new("Talk about art or other light topics", Action::SmallTalk(friend)),
                ],
            ),
            Friend::Ben => (
                "Ben glances up from his tinkering. 'Hey. Got a problem? Or something for this old radio?'",
                vec![
                    MenuOption::new("Tell him about the vision", Action::TellVision(friend)),
                    MenuOption::new(
                        "Ask him for help with something practical",
                        Action::AskForHelp(friend),
                    ),
                    MenuOption::new("Talk about his radio projects", Action::SmallTalk(friend)),
                ],
            ),
            Friend::Jake if trust < 3.0 => (
                "Jake just glares at you. 'What do you want, loser?' He doesn't seem interested in talking.",
                Vec::new(),
            ),
            Friend::Jake => (
                "Jake leans against the wall. 'What do you want, nerd?' There's a hint of boredom, not outright hostility.",
                vec![
                    MenuOption::new("Tell him about the vision (carefully)", Action::TellVision(friend)),
                    MenuOption::new("Ask for a favor", Action::AskForHelp(friend)),
                    MenuOption::new("Challenge his authority (risky)", Action::ChallengeJake),
                ],
            ),
        }
    };
    options.push(back);

    Menu {
        title: friend.name().to_string(),
        prompt: vec![prompt.to_string()],
        options,
    }
}

fn after_vision_remark(friend: Friend, trust: f32) -> &'static str {
    match friend {
        Friend::Alex if trust >= HIGH_TRUST => {
            "Alex is still processing your warning. 'Nothing official yet. Still, I'm with you. What's our next move?'"
        }
        Friend::Alex if trust >= 2.0 => {
            "Alex seems a bit awkward. He quickly changes the subject, clearly unconvinced."
        }
        Friend::Alex => "Alex avoids eye contact and grunts a non-committal response.",
        Friend::Maya if trust >= HIGH_TRUST => {
            "Maya is anxious but supportive. 'I'm here for you, no matter what happens.'"
        }
        Friend::Maya if trust >= 2.0 => {
            "Maya tries to offer comfort, but her voice is strained."
        }
        Friend::Maya => "Maya avoids eye contact and quickly finds an excuse to leave.",
        Friend::Ben if trust >= HIGH_TRUST => {
            "Ben is focused on solutions. 'Okay, so what's the next practical step?'"
        }
        Friend::Ben if trust >= 2.0 => {
            "Ben gives you a sympathetic look but shifts the conversation to something concrete."
        }
        Friend::Ben => "Ben avoids eye contact and fiddles with his radio.",
        Friend::Jake if trust >= 5.0 => {
            "Jake looks agitated. 'Still nothing concrete? We need to do something, pronto!'"
        }
        Friend::Jake => "Jake avoids eye contact, mumbling something about being busy.",
    }
}
