//! Rules engine with an Action/Effect pipeline.
//!
//! Every menu option carries an [`Action`]. Resolving it:
//! 1. The menu hands the chosen Action to the [`RulesEngine`]
//! 2. The engine checks the action against the current [`GameState`]
//! 3. It produces narration plus a list of [`Effect`]s describing the change
//! 4. The effects are applied to the state by [`apply_effects`]
//!
//! Resolution never mutates the state, so outcomes can be tested in isolation
//! with a deterministic RNG.

use crate::config::TuningConfig;
use crate::ending::{escape_ending, Ending, LASER_KNOWLEDGE};
use crate::locations;
use crate::world::{
    Flag, Friend, GameState, Item, LocationId, NarrativeType, Screen, HIGH_TRUST,
    TRUST_SCALE,
};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Small bookkeeping actions (status, inventory, backing out).
pub const GLANCE_MINUTES: u32 = 6;
/// A conversation or a quick errand.
pub const SHORT_MINUTES: u32 = 30;
/// A longer attempt (research, town hall, the base gate).
pub const HOUR_MINUTES: u32 = 60;
pub const CLASS_MINUTES: u32 = 120;
pub const SHIFT_MINUTES: u32 = 240;

/// Time left at which the radio warning plays.
pub const RADIO_WARNING_AT: u32 = 10 * 60;
/// Time left at which military traffic appears, and base patrols tighten.
pub const MILITARY_ACTIVITY_AT: u32 = 5 * 60;

const MAYOR_KNOWLEDGE: i32 = 5;
const CROWD_AUTHORITY: f32 = 3.0;
const SNEAK_KNOWLEDGE: i32 = 5;
const SNEAK_TECH_PARTS: i32 = 2;
const BLUFF_AUTHORITY: f32 = 5.0;
const BASE_SEARCH_KNOWLEDGE: i32 = 5;
const CONVINCE_AUTHORITY: f32 = 7.0;
const CONVINCE_KNOWLEDGE: i32 = 4;
const TERMINAL_KNOWLEDGE: i32 = 6;
const TERMINAL_TECH_PARTS: i32 = 2;
const ESCAPE_KNOWLEDGE: i32 = 4;
const BUNKER_CODE_TRUST: f32 = 10.0;
const JAKE_RALLY_TRUST: f32 = 5.0;
const JAKE_TALK_TRUST: f32 = 3.0;
const JAKE_CHALLENGE_TRUST: f32 = 2.0;
const WARY_TRUST: f32 = 2.0;
const JAKE_SUPPLY_LIMIT: usize = 2;

// ============================================================================
// Actions
// ============================================================================

/// What a menu option asks the rules engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Walk along an exit. Free.
    Go(LocationId),

    // Common to every location menu
    ShowInventory,
    ShowStatus,
    Help,
    Quit,
    ConfirmQuit,
    CancelQuit,

    // Bedroom computer
    UseComputer,
    SearchNuclearThreat,
    SearchLocalNews,
    SearchSurvivalGuides,
    StopComputer,

    // Parents
    TalkToParents,
    TellParents,
    KeepSilent,
    LeaveParents,

    // Newspaper club
    TalkToFriends,
    TalkTo(Friend),
    CollectJakeFavor,
    LeaveFriends,
    TellVision(Friend),
    /// Alex's research, Ben's practical help, Jake's favor.
    AskForHelp(Friend),
    /// Club business, art, radio projects.
    SmallTalk(Friend),
    ChallengeJake,
    EndConversation,

    // Town square
    WarnOpenly,

    // School
    AttendClass,
    LeaveClass,
    StealFromSchool,

    // General store
    BuySupplies,
    StealFromStore,
    ConfirmSteal,
    CancelSteal,
    TalkToJenkins,
    LeaveStore,

    // Town hall
    DemandMayor,
    ExplainToSecretary,
    LeaveTownHall,

    // Transport
    WaitForBus,
    SearchForCar,
    TakeHendersonTruck,
    HeadToBusStop,
    StopSearching,
    DriveTruck,

    // Tech store
    BuyTechPart,
    StealTechPart,

    // Bunker
    ExamineBunkerDoor,
    KnockOnBunker,
    EnterBunker,

    // Military base gate
    SneakIntoBase,
    BluffIntoBase,
    BribeGuard,
    RetreatFromBase,

    // Military base interior
    SearchLaserRoom,
    ConvincePersonnel,
    HackTerminal,
    EscapeBase,
    FireLaser,
    AbortLaser,

    // Burger hut
    WorkShift,

    // Pawn shop
    OpenPawnCounter,
    SellItem(Item),
    LeavePawnCounter,
}

// ============================================================================
// Effects
// ============================================================================

/// A concrete state change produced by resolving an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// The player moved; the location menu is shown next
    Moved { to: LocationId },

    /// A sub-menu was opened or closed
    ScreenChanged { screen: Screen },

    /// The countdown ran. `silent` suppresses phase and expiry narration.
    TimeAdvanced { minutes: u32, silent: bool },

    KnowledgeChanged { delta: i32 },
    CashChanged { delta: i32 },
    TechPartsChanged { delta: i32 },
    AuthorityChanged { delta: f32 },
    CarGasChanged { delta: i32 },
    TrustChanged { friend: Friend, delta: f32 },

    ItemGained { item: Item },
    ItemLost { item: Item },

    FlagSet { flag: Flag, value: bool },

    /// An ending was reached. Ignored if one is already recorded.
    EndingReached { ending: Ending },

    /// The player confirmed they want to stop playing
    QuitRequested,
}

/// One line of story output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narration {
    pub text: String,
    pub kind: NarrativeType,
}

impl Narration {
    pub fn new(kind: NarrativeType, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// The result of resolving an action.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub narrative: Vec<Narration>,
    pub effects: Vec<Effect>,
}

impl Resolution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn narrate(self, text: impl Into<String>) -> Self {
        self.say(NarrativeType::Narration, text)
    }

    pub fn dialogue(self, text: impl Into<String>) -> Self {
        self.say(NarrativeType::Dialogue, text)
    }

    pub fn gain(self, text: impl Into<String>) -> Self {
        self.say(NarrativeType::Gain, text)
    }

    pub fn warn(self, text: impl Into<String>) -> Self {
        self.say(NarrativeType::Warning, text)
    }

    pub fn say(mut self, kind: NarrativeType, text: impl Into<String>) -> Self {
        self.narrative.push(Narration::new(kind, text));
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    /// Shorthand for a [`Effect::TimeAdvanced`] that narrates phase changes.
    pub fn taking(self, minutes: u32) -> Self {
        self.with_effect(Effect::TimeAdvanced {
            minutes,
            silent: false,
        })
    }

    /// Shorthand for a silent [`Effect::TimeAdvanced`].
    pub fn taking_quietly(self, minutes: u32) -> Self {
        self.with_effect(Effect::TimeAdvanced {
            minutes,
            silent: true,
        })
    }

    pub fn screen(self, screen: Screen) -> Self {
        self.with_effect(Effect::ScreenChanged { screen })
    }

    pub fn move_to(self, to: LocationId) -> Self {
        self.with_effect(Effect::Moved { to })
    }

    pub fn ending(self, ending: Ending) -> Self {
        self.with_effect(Effect::EndingReached { ending })
    }

    pub fn flag(self, flag: Flag) -> Self {
        self.with_effect(Effect::FlagSet { flag, value: true })
    }

    pub fn item(self, item: Item) -> Self {
        self.with_effect(Effect::ItemGained { item })
    }

    pub fn trust(self, friend: Friend, delta: f32) -> Self {
        self.with_effect(Effect::TrustChanged { friend, delta })
    }

    pub fn ends_game(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, Effect::EndingReached { .. }))
    }
}

// ============================================================================
// Rules Engine
// ============================================================================

/// Resolves actions against the game state.
#[derive(Debug, Clone, Default)]
pub struct RulesEngine {
    tuning: TuningConfig,
}

impl RulesEngine {
    pub fn new(tuning: TuningConfig) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &TuningConfig {
        &self.tuning
    }

    /// Resolve an action and produce effects.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        state: &GameState,
        action: Action,
        rng: &mut R,
    ) -> Resolution {
        match action {
            Action::Go(to) => Resolution::new().move_to(to),

            Action::ShowInventory => self.resolve_show_inventory(state),
            Action::ShowStatus => self.resolve_show_status(state),
            Action::Help => Resolution::new().say(
                NarrativeType::System,
                locations::info(state.location).help,
            ),
            Action::Quit => Resolution::new()
                .say(NarrativeType::System, "Are you sure you want to quit?")
                .screen(Screen::ConfirmQuit),
            Action::ConfirmQuit => Resolution::new()
                .say(NarrativeType::System, "Thanks for playing!")
                .with_effect(Effect::QuitRequested),
            Action::CancelQuit => Resolution::new()
                .say(NarrativeType::System, "Returning to the game.")
                .screen(Screen::Location),

            Action::UseComputer => self.resolve_use_computer(state),
            Action::SearchNuclearThreat => Resolution::new()
                .narrate(
                    "You search for global nuclear threats. The results are overwhelming, but \
                     nothing points specifically to your town. It makes the world seem too big, \
                     your vision too small.",
                )
                .gain("You feel a little more prepared. (+1 Knowledge)")
                .with_effect(Effect::KnowledgeChanged { delta: 1 })
                .taking(HOUR_MINUTES),
            Action::SearchLocalNews => Resolution::new()
                .narrate(
                    "You comb through local news archives. You find a few strange reports: \
                     unexplained seismic activity, odd military transport sightings on obscure \
                     backroads.",
                )
                .gain("Your vision wasn't just a dream. (+2 Knowledge)")
                .with_effect(Effect::KnowledgeChanged { delta: 2 })
                .taking(HOUR_MINUTES),
            Action::SearchSurvivalGuides => self.resolve_survival_guides(state, rng),
            Action::StopComputer => Resolution::new()
                .narrate("You close the computer, feeling a mix of dread and growing certainty.")
                .taking_quietly(SHORT_MINUTES)
                .screen(Screen::Location),

            Action::TalkToParents => self.resolve_talk_to_parents(state),
            Action::TellParents => self.resolve_tell_parents(state),
            Action::KeepSilent => self.resolve_keep_silent(state),
            Action::LeaveParents => Resolution::new().screen(Screen::Location),

            Action::TalkToFriends => Resolution::new()
                .narrate("Your friends look up from the layout table.")
                .screen(Screen::Friends),
            Action::TalkTo(friend) => Resolution::new().screen(Screen::TalkFriend(friend)),
            Action::CollectJakeFavor => self.resolve_collect_jake_favor(state),
            Action::LeaveFriends => Resolution::new().screen(Screen::Location),
            Action::TellVision(friend) => self.resolve_tell_vision(state, friend),
            Action::AskForHelp(friend) => self.resolve_ask_for_help(state, friend),
            Action::SmallTalk(friend) => self.resolve_small_talk(state, friend),
            Action::ChallengeJake => self.resolve_challenge_jake(state),
            Action::EndConversation => Resolution::new().screen(back_from_talk(state)),

            Action::WarnOpenly => self.resolve_warn_openly(state),

            Action::AttendClass => self.resolve_attend_class(state),
            Action::LeaveClass => Resolution::new()
                .narrate("You head back to the school entrance.")
                .screen(Screen::Location),
            Action::StealFromSchool => self.resolve_steal_from_school(state, rng),

            Action::BuySupplies => self.resolve_buy_supplies(state),
            Action::StealFromStore => Resolution::new()
                .narrate("You eye a small gas can. Attempt to steal it?")
                .screen(Screen::StealGasCan),
            Action::ConfirmSteal => self.resolve_steal_gas_can(state, rng),
            Action::CancelSteal => Resolution::new()
                .narrate("You decide against stealing. It's not worth the risk.")
                .screen(Screen::Location),
            Action::TalkToJenkins => Resolution::new()
                .narrate(
                    "You try to tell Mr. Jenkins about your vision. He stares at you with a \
                     blank expression.",
                )
                .dialogue("'Kid, just pay for your candy,' he grunts.")
                .warn("You feel less credible in this town.")
                .with_effect(Effect::AuthorityChanged { delta: -0.5 })
                .taking(SHORT_MINUTES),
            Action::LeaveStore => Resolution::new()
                .narrate("You leave the general store.")
                .move_to(LocationId::TownSquare)
                .taking(SHORT_MINUTES),

            Action::DemandMayor => self.resolve_demand_mayor(state),
            Action::ExplainToSecretary => Resolution::new()
                .narrate("You try to calmly explain your vision, the impending doom, the need for action.")
                .dialogue(
                    "Secretary Davies listens, then shakes her head. 'I appreciate your concern, \
                     but the Mayor is very busy. Perhaps you should see a doctor.'",
                )
                .warn("You feel a slight dip in how seriously you're being taken.")
                .with_effect(Effect::AuthorityChanged { delta: -0.5 })
                .taking(HOUR_MINUTES),
            Action::LeaveTownHall => Resolution::new()
                .narrate("You decide it's a dead end for now and leave quietly.")
                .move_to(LocationId::TownSquare)
                .taking(HOUR_MINUTES),

            Action::WaitForBus => self.resolve_wait_for_bus(state),
            Action::SearchForCar => Resolution::new()
                .narrate("You need a way out of town.")
                .screen(Screen::SeekTransport),
            Action::TakeHendersonTruck => self.resolve_take_truck(state),
            Action::HeadToBusStop => Resolution::new()
                .narrate("You make your way to the bus stop, hoping for a quick departure.")
                .move_to(LocationId::BusStop)
                .taking(SHORT_MINUTES),
            Action::StopSearching => Resolution::new()
                .narrate("You decide to rethink your transport options.")
                .taking_quietly(GLANCE_MINUTES)
                .screen(Screen::Location),
            Action::DriveTruck => self.resolve_drive_truck(state),

            Action::BuyTechPart => self.resolve_buy_tech_part(state),
            Action::StealTechPart => self.resolve_steal_tech_part(state, rng),

            Action::ExamineBunkerDoor => Resolution::new()
                .narrate(
                    "Rivets and a keypad, both newer than the hillside around them. Whoever \
                     built this expected to need it.",
                )
                .taking_quietly(SHORT_MINUTES),
            Action::KnockOnBunker => self.resolve_knock_on_bunker(state),
            Action::EnterBunker => self.resolve_enter_bunker(state),

            Action::SneakIntoBase => self.resolve_sneak_into_base(state),
            Action::BluffIntoBase => self.resolve_bluff_into_base(state),
            Action::BribeGuard => self.resolve_bribe_guard(state),
            Action::RetreatFromBase => Resolution::new()
                .narrate("You decide to retreat and return to the Town Square.")
                .move_to(LocationId::TownSquare),

            Action::SearchLaserRoom => self.resolve_search_laser_room(state),
            Action::ConvincePersonnel => self.resolve_convince_personnel(state),
            Action::HackTerminal => self.resolve_hack_terminal(state),
            Action::EscapeBase => self.resolve_escape_base(state),
            Action::FireLaser => self.resolve_fire_laser(state),
            Action::AbortLaser => Resolution::new()
                .narrate("You realize the task is too daunting, or too late. You turn away from the controls.")
                .narrate("The countdown hits zero. The world goes silent, then black.")
                .ending(Ending::TimesUp),

            Action::WorkShift => self.resolve_work_shift(state),

            Action::OpenPawnCounter => {
                if state.inventory.sellable().is_empty() {
                    Resolution::new().narrate("You have nothing the pawn shop wants right now.")
                } else {
                    Resolution::new()
                        .narrate("The owner leans on the counter. 'What've you got?'")
                        .screen(Screen::PawnCounter)
                }
            }
            Action::SellItem(item) => self.resolve_sell_item(state, item),
            Action::LeavePawnCounter => Resolution::new()
                .narrate("You decide not to sell anything.")
                .screen(Screen::Location),
        }
    }

    /// Roll against a theft chance. The backpack makes hiding loot easier.
    fn steal_succeeds<R: Rng + ?Sized>(&self, state: &GameState, rng: &mut R) -> bool {
        let chance = state.steal_chance(
            self.tuning.steal_chance_with_backpack,
            self.tuning.steal_chance_without_backpack,
        );
        rng.gen::<f64>() < chance
    }

    fn resolve_show_inventory(&self, state: &GameState) -> Resolution {
        let mut res = Resolution::new();
        if state.inventory.is_empty() {
            res = res.say(NarrativeType::System, "Your inventory is empty.");
        } else {
            res = res.say(NarrativeType::System, "You are carrying:");
            for item in state.inventory.iter() {
                res = res.say(NarrativeType::System, format!("  - {item}"));
            }
        }
        res.taking_quietly(GLANCE_MINUTES)
    }

    fn resolve_show_status(&self, state: &GameState) -> Resolution {
        status_report(state)
            .into_iter()
            .fold(Resolution::new(), |res, line| {
                res.say(NarrativeType::System, line)
            })
            .taking_quietly(GLANCE_MINUTES)
    }

    // ------------------------------------------------------------------
    // Home
    // ------------------------------------------------------------------

    fn resolve_use_computer(&self, state: &GameState) -> Resolution {
        let mut res = Resolution::new();
        if !state.has_item(Item::Backpack) {
            res = res
                .narrate(
                    "You notice your old Backpack slung over the back of your computer chair. \
                     This will help you carry more supplies!",
                )
                .item(Item::Backpack);
        }
        res.narrate("You sit down at your computer. What do you want to search for?")
            .screen(Screen::Computer)
    }

    fn resolve_survival_guides<R: Rng + ?Sized>(&self, state: &GameState, rng: &mut R) -> Resolution {
        let res = Resolution::new()
            .narrate("You search for guides on surviving an apocalypse and local private bunkers.");
        let found = state.knowledge >= 2 || rng.gen::<f64>() < self.tuning.bunker_rumor_chance;

        let res = if !found {
            res.narrate("You find some generic survival tips, but nothing specific to your town.")
        } else if state.has_item(Item::BunkerRumor) {
            res.narrate("You recall the rumor you already found about a neighbor's bunker. No new details emerge.")
        } else {
            res.narrate(
                "You stumble upon an old, obscure forum post mentioning a well-hidden local \
                 bunker, possibly your neighbor's. It gives vague directions.",
            )
            .gain("You gained a Rumor about a Neighbor's Bunker.")
            .item(Item::BunkerRumor)
        };
        res.taking(HOUR_MINUTES)
    }

    fn resolve_talk_to_parents(&self, state: &GameState) -> Resolution {
        let res = if state.flags.parents_warned {
            Resolution::new()
                .narrate("Your parents are still going about their day. They sometimes glance at you with lingering worry.")
                .narrate("They haven't brought up your 'feverish' vision again.")
        } else {
            Resolution::new()
                .narrate("You consider telling them about your terrifying vision. It's a huge risk.")
        };
        res.screen(Screen::TalkParents)
    }

    fn resolve_tell_parents(&self, state: &GameState) -> Resolution {
        Resolution::new()
            .narrate(format!(
                "{} sits down and explains the vision, pouring out fear and urgency.",
                state.protagonist_name
            ))
            .dialogue(
                "Your mom puts a hand to your forehead. 'Are you feeling alright, sweetie? You \
                 look a little feverish.'",
            )
            .dialogue("Your dad suggests you've been working too hard. They clearly don't believe you.")
            .warn("A wave of sadness washes over you. You couldn't even convince them.")
            .flag(Flag::ParentsWarned)
            .taking_quietly(SHORT_MINUTES)
            .screen(Screen::Location)
    }

    fn resolve_keep_silent(&self, state: &GameState) -> Resolution {
        let res = if state.flags.parents_warned {
            Resolution::new().narrate("You chat about dinner plans and the neighbor's dog. Nobody mentions the vision.")
        } else {
            Resolution::new()
                .dialogue(format!(
                    "{} decides to keep the burden to themselves. 'Just checking in. Everything okay?'",
                    state.protagonist_name
                ))
                .narrate("They nod, oblivious. The conversation drifts to mundane topics.")
        };
        res.taking_quietly(SHORT_MINUTES).screen(Screen::Location)
    }

    // ------------------------------------------------------------------
    // Friends
    // ------------------------------------------------------------------

    fn resolve_tell_vision(&self, state: &GameState, friend: Friend) -> Resolution {
        let trust = state.trust(friend);
        let name = &state.protagonist_name;
        let talked = Flag::TalkedAboutVision(friend);

        let res = match friend {
            Friend::Alex => {
                let res = Resolution::new()
                    .narrate("You recount your terrifying vision in detail. Alex listens intently, but his expression remains analytical.")
                    .flag(Flag::SharedVisionWithFriends)
                    .flag(talked);
                if trust >= HIGH_TRUST {
                    res.dialogue("Alex nods slowly. 'That's wild... but you usually don't make things up. I'll help you look into it.'")
                        .with_effect(Effect::KnowledgeChanged { delta: 1 })
                } else if trust >= WARY_TRUST {
                    res.dialogue(format!("Alex raises an eyebrow. 'That sounds crazy, {name}. Maybe you should get some sleep.'"))
                        .trust(Friend::Alex, -1.0)
                } else {
                    res.dialogue(format!("Alex snorts. 'You're losing it, {name}. Stick to facts, not fantasies.'"))
                        .trust(Friend::Alex, -2.0)
                }
            }
            Friend::Maya => {
                let res = Resolution::new()
                    .narrate(format!("{name} tells Maya everything: the vision, the bomb, the short time left."))
                    .flag(Flag::SharedVisionWithFriends)
                    .flag(talked);
                if trust >= HIGH_TRUST {
                    res.dialogue("Her optimism falters. 'Oh my god... that's terrifying. But I believe you.'")
                        .gain("Your bond with Maya deepens.")
                        .trust(Friend::Maya, 5.0)
                } else if trust >= WARY_TRUST {
                    res.dialogue("Maya's brow furrows. 'That sounds awful. Maybe it was just a really bad dream?'")
                        .trust(Friend::Maya, 1.0)
                } else {
                    res.narrate("Maya looks uncomfortable and quickly changes the subject.")
                }
            }
            Friend::Ben => {
                let res = Resolution::new()
                    .narrate(format!("{name} tells Ben about the missile, emphasizing the practical implications."))
                    .flag(Flag::SharedVisionWithFriends)
                    .flag(talked);
                if trust >= HIGH_TRUST {
                    res.dialogue("Ben's eyes narrow. 'That's heavy... but if it's true, we need supplies. A place to go.'")
                        .gain("Ben starts listing things: water, food, a map, a working vehicle. You gained a Survival Checklist.")
                        .trust(Friend::Ben, 10.0)
                        .with_effect(Effect::KnowledgeChanged { delta: 1 })
                        .item(Item::SurvivalChecklist)
                } else if trust >= WARY_TRUST {
                    res.dialogue(format!("Ben looks uncomfortable. 'I'm not good with hypothetical apocalypses. What's the actual problem, {name}?'"))
                        .trust(Friend::Ben, -1.0)
                } else {
                    res.dialogue(format!("Ben shakes his head. 'Sounds like a bad trip, {name}. You okay?'"))
                        .trust(Friend::Ben, -2.0)
                }
            }
            Friend::Jake => {
                let res = Resolution::new()
                    .narrate("You briefly and gravely tell Jake about the impending doom.")
                    .flag(talked);
                if trust >= JAKE_RALLY_TRUST {
                    res.dialogue("Jake's tough facade cracks. 'You're serious? Fine. If you need muscle, I'm in.'")
                        .gain("Jake could help you rally others.")
                        .trust(Friend::Jake, 10.0)
                        .flag(Flag::MobOfCivilians)
                } else if trust >= JAKE_TALK_TRUST {
                    res.dialogue(format!("Jake laughs, but it sounds forced. 'A bomb? You're crazy, {name}.'"))
                        .trust(Friend::Jake, -1.0)
                } else {
                    res.dialogue("Jake scoffs. 'And I thought I was messed up. Get lost.'")
                        .trust(Friend::Jake, -2.0)
                }
            }
        };
        res.taking_quietly(SHORT_MINUTES).screen(back_from_talk(state))
    }

    fn resolve_ask_for_help(&self, state: &GameState, friend: Friend) -> Resolution {
        let res = match friend {
            Friend::Alex => Resolution::new()
                .narrate("You frame it as a hypothetical for an article: what would a town need if a major disaster hit?")
                .dialogue("Alex brightens. 'An excellent hypothetical! Let me dig out my notes.'")
                .gain("Alex hands you detailed notes on disaster preparedness. You gained Survival Notes. (+2 Knowledge)")
                .with_effect(Effect::KnowledgeChanged { delta: 2 })
                .item(Item::SurvivalNotes),
            Friend::Ben => Resolution::new()
                .narrate("You ask Ben how someone would get out of town, or get serious supplies.")
                .dialogue(
                    "Ben taps his chin. 'I might know where some spare fuel cans are. And old \
                     Mr. Henderson's truck always has the keys in it.'",
                )
                .gain("Your trust with Ben improves. You gained a Tip about Mr. Henderson's Truck.")
                .trust(Friend::Ben, 5.0)
                .item(Item::HendersonTruckTip),
            Friend::Jake => {
                let res = Resolution::new().narrate("You ask Jake to 'handle' a minor obstacle for you.");
                if state.trust(Friend::Jake) >= JAKE_TALK_TRUST {
                    res.dialogue("'Maybe. What's in it for me?' Jake smirks. He's open to helping, for a price.")
                        .flag(Flag::JakeOwedFavor)
                } else {
                    res.dialogue("'Get your own dirty work done.' Jake dismisses you.")
                }
            }
            Friend::Maya => Resolution::new()
                .narrate("Maya squeezes your hand. She doesn't know how to help, but she listens."),
        };
        res.taking_quietly(SHORT_MINUTES).screen(back_from_talk(state))
    }

    fn resolve_small_talk(&self, state: &GameState, friend: Friend) -> Resolution {
        let res = match friend {
            Friend::Alex => Resolution::new()
                .narrate("You chat about the next newspaper issue. It's a mundane, comforting distraction.")
                .gain("You feel slightly more connected with Alex.")
                .trust(Friend::Alex, 0.5),
            Friend::Maya => Resolution::new()
                .narrate("You talk about her sketches and the latest school gossip. Maya seems happy for the distraction.")
                .gain("You feel slightly more connected with Maya.")
                .trust(Friend::Maya, 0.5),
            Friend::Ben => Resolution::new()
                .narrate("Ben passionately explains frequencies and circuits in his latest radio build.")
                .gain("Ben seems to appreciate your interest.")
                .trust(Friend::Ben, 1.0),
            Friend::Jake => Resolution::new().narrate("Jake shrugs you off."),
        };
        res.taking_quietly(SHORT_MINUTES).screen(back_from_talk(state))
    }

    fn resolve_challenge_jake(&self, state: &GameState) -> Resolution {
        let res = Resolution::new()
            .narrate("You challenge Jake's bullying. 'Why don't you pick on someone your own size?'");
        let res = if state.trust(Friend::Jake) <= JAKE_CHALLENGE_TRUST {
            res.dialogue("Jake shoves you hard against the lockers. 'That's it, runt!'")
                .warn("A teacher calls campus police on both of you.")
                .ending(Ending::Jailed)
        } else {
            res.dialogue("Jake seems surprised, a flicker of respect in his eyes. 'Whoa, feisty today. Watch it.'")
                .trust(Friend::Jake, 1.0)
        };
        res.taking_quietly(SHORT_MINUTES).screen(back_from_talk(state))
    }

    fn resolve_collect_jake_favor(&self, state: &GameState) -> Resolution {
        if !state.flags.jake_owed_favor {
            return Resolution::new().narrate("Jake doesn't owe you a favor right now.");
        }
        let res = Resolution::new()
            .dialogue("'Remember that favor you owe me?' Jake grunts. 'Yeah, yeah. What do you need?'");
        let res = if state.cash < 1 {
            res.narrate("Jake disappears for a bit and returns with a single cash unit. 'Don't ask where I got it.'")
                .gain("You gained 1 Cash.")
                .with_effect(Effect::CashChanged { delta: 1 })
        } else if state.inventory.count(Item::Supplies) < JAKE_SUPPLY_LIMIT {
            res.narrate("Jake rolls his eyes, but comes back with a small bag of non-perishables. 'Happy now?'")
                .gain("You gained Supplies.")
                .item(Item::Supplies)
        } else {
            res.narrate("After some time, Jake returns with a scavenged part. 'Took some doing. You owe me.'")
                .gain("You gained a Tech Part.")
                .with_effect(Effect::TechPartsChanged { delta: 1 })
                .item(Item::ScavengedTechPart)
        };
        res.with_effect(Effect::FlagSet {
            flag: Flag::JakeOwedFavor,
            value: false,
        })
        .trust(Friend::Jake, -1.0)
        .narrate("Jake's favor has been used.")
        .taking(SHORT_MINUTES)
    }

    // ------------------------------------------------------------------
    // Town
    // ------------------------------------------------------------------

    fn resolve_warn_openly(&self, state: &GameState) -> Resolution {
        let res = Resolution::new()
            .dialogue("You take a deep breath and scream, 'A BOMB IS COMING! WE NEED TO EVACUATE!'");
        let res = if state.authority >= CROWD_AUTHORITY {
            res.narrate("A few people stop, looking startled. Murmurs spread. The crowd begins to swell.")
                .flag(Flag::MobOfCivilians)
                .with_effect(Effect::AuthorityChanged { delta: 1.0 })
        } else {
            let res = res
                .narrate("People stop, stare, then quickly avert their gaze. Some point and laugh.")
                .warn("You're dismissed as a lunatic, and someone is taking notes.")
                .flag(Flag::FailedPublicWarning);
            if state.trust(Friend::Alex) > 0.0 {
                res.trust(Friend::Alex, -1.0)
            } else {
                res
            }
        };
        res.taking(SHORT_MINUTES)
    }

    fn resolve_demand_mayor(&self, state: &GameState) -> Resolution {
        if state.knowledge >= MAYOR_KNOWLEDGE && state.has_evidence() {
            Resolution::new()
                .narrate(
                    "You present your evidence, explaining it with compelling knowledge. The \
                     mayor is called in, and his face goes pale as he reviews your proof.",
                )
                .dialogue("'This... this is serious. We'll begin evacuation procedures immediately.'")
                .gain("The Mayor is convinced! (+5 Authority)")
                .with_effect(Effect::AuthorityChanged { delta: 5.0 })
                .flag(Flag::MayorWarned)
                .taking(HOUR_MINUTES)
        } else {
            Resolution::new()
                .narrate("You have nothing convincing to show, or lack the knowledge to present it. The mayor is not impressed.")
                .warn("You're quickly escorted out. Your warnings fall on deaf ears.")
                .with_effect(Effect::AuthorityChanged { delta: -1.0 })
                .move_to(LocationId::TownSquare)
                .taking(HOUR_MINUTES)
        }
    }

    fn resolve_buy_supplies(&self, state: &GameState) -> Resolution {
        let cost = self.tuning.store_item_cost;
        let res = if state.cash >= cost {
            let res = Resolution::new()
                .narrate(format!("You buy some supplies for {cost} cash. Mr. Jenkins grunts, taking your money."))
                .with_effect(Effect::CashChanged { delta: -cost })
                .item(Item::CannedFood);
            if state.has_item(Item::GasCan) {
                res.gain("You now have Canned Food.")
            } else {
                res.gain("You now have Canned Food and a Gas Can.")
                    .item(Item::GasCan)
                    .with_effect(Effect::CarGasChanged { delta: 30 })
            }
        } else {
            Resolution::new().warn(format!(
                "You don't have enough cash for anything useful. You have {}, but need {cost}.",
                state.cash
            ))
        };
        res.taking(SHORT_MINUTES)
    }

    fn resolve_steal_gas_can<R: Rng + ?Sized>(&self, state: &GameState, rng: &mut R) -> Resolution {
        let res = if self.steal_succeeds(state, rng) {
            let hiding = if state.has_item(Item::Backpack) { "backpack" } else { "jacket" };
            let res = Resolution::new()
                .narrate(format!(
                    "You slip the gas can into your {hiding} when Mr. Jenkins isn't looking."
                ))
                .gain("You gained a Gas Can!")
                .with_effect(Effect::CarGasChanged { delta: 50 });
            if state.has_item(Item::GasCan) {
                res
            } else {
                res.item(Item::GasCan)
            }
        } else {
            Resolution::new()
                .warn("You fumble, and Mr. Jenkins' eyes snap to you. 'Thief!' He has the police on the phone before you reach the door.")
                .ending(Ending::Jailed)
        };
        res.taking(SHORT_MINUTES).screen(Screen::Location)
    }

    fn resolve_wait_for_bus(&self, state: &GameState) -> Resolution {
        let cost = self.tuning.bus_ticket_cost;
        if state.cash >= cost && !state.clock.is_expired() {
            let ending = escape_ending(state);
            let res = Resolution::new()
                .narrate("The bus wheezes to a stop. You pay the fare and climb aboard.")
                .with_effect(Effect::CashChanged { delta: -cost });
            if ending == Ending::AlliesEscape {
                res.narrate("Alex, Maya and Ben pile in behind you.").ending(ending)
            } else {
                res.ending(ending)
            }
        } else {
            Resolution::new().warn("You don't have enough cash for a bus ticket, or there's no time left.")
        }
    }

    fn resolve_take_truck(&self, state: &GameState) -> Resolution {
        let res = Resolution::new()
            .narrate("You head towards the outskirts, remembering Mr. Henderson's beat-up truck.")
            .move_to(LocationId::OutskirtsRoad)
            .taking(SHORT_MINUTES);
        if state.flags.has_car_keys {
            res.narrate("You're back at Mr. Henderson's truck. You still need gas for it.")
        } else {
            res.narrate("The keys are in the ignition, as always. But the gas tank is almost empty.")
                .gain("You got the Truck Keys! Now you just need gas.")
                .item(Item::TruckKeys)
                .flag(Flag::HasCarKeys)
        }
    }

    fn resolve_drive_truck(&self, state: &GameState) -> Resolution {
        if !state.has_item(Item::TruckKeys) {
            return Resolution::new()
                .narrate("You don't have the keys to anything that runs.")
                .taking_quietly(GLANCE_MINUTES);
        }
        if state.car_gas < self.tuning.truck_gas_needed {
            return Resolution::new()
                .narrate("The engine coughs and dies. The tank needs more gas before it'll get you anywhere.")
                .taking_quietly(GLANCE_MINUTES);
        }
        let ending = escape_ending(state);
        let res = Resolution::new()
            .narrate("The old truck roars to life. You pull onto the highway and don't look back.");
        if ending == Ending::AlliesEscape {
            res.narrate("Your friends are crammed in the cab beside you.").ending(ending)
        } else {
            res.ending(ending)
        }
    }

    fn resolve_buy_tech_part(&self, state: &GameState) -> Resolution {
        let cost = self.tuning.tech_part_cost;
        if state.cash >= cost {
            Resolution::new()
                .gain(format!("You bought a Circuit Board for {cost} cash. (+1 Tech Part)"))
                .with_effect(Effect::CashChanged { delta: -cost })
                .with_effect(Effect::TechPartsChanged { delta: 1 })
                .item(Item::CircuitBoard)
                .taking(SHORT_MINUTES)
        } else {
            Resolution::new()
                .warn(format!(
                    "You don't have enough cash for tech parts. You have {}, but need {cost}.",
                    state.cash
                ))
                .taking_quietly(GLANCE_MINUTES)
        }
    }

    fn resolve_steal_tech_part<R: Rng + ?Sized>(&self, state: &GameState, rng: &mut R) -> Resolution {
        let res = if self.steal_succeeds(state, rng) {
            Resolution::new()
                .narrate("You pocket a tech part and walk out, heart pounding.")
                .gain("You gained a Tech Part!")
                .with_effect(Effect::TechPartsChanged { delta: 1 })
        } else {
            Resolution::new()
                .warn("You get caught trying to steal! The store owner calls the police.")
                .ending(Ending::Jailed)
        };
        res.taking(SHORT_MINUTES)
    }

    fn resolve_work_shift(&self, state: &GameState) -> Resolution {
        let pay = self.tuning.shift_pay;
        let res = if state.time_remaining() >= SHIFT_MINUTES {
            Resolution::new()
                .narrate("You spend four grueling hours flipping burgers and dealing with customers.")
                .with_effect(Effect::CashChanged { delta: pay })
                .taking(SHIFT_MINUTES)
                .gain(format!("You earned {pay} cash!"))
        } else {
            Resolution::new()
                .warn("You don't have enough time left for a full shift.")
                .narrate("You leave the Burger Hut feeling frustrated.")
        };
        res.move_to(LocationId::TownSquare).taking_quietly(GLANCE_MINUTES)
    }

    fn resolve_sell_item(&self, state: &GameState, item: Item) -> Resolution {
        if !item.is_sellable() || !state.has_item(item) {
            return Resolution::new()
                .narrate("The owner shakes his head. 'Not interested.'")
                .screen(Screen::Location);
        }
        let price = self.tuning.pawn_price;
        Resolution::new()
            .gain(format!("You sell the {item} for {price} cash."))
            .with_effect(Effect::ItemLost { item })
            .with_effect(Effect::CashChanged { delta: price })
            .screen(Screen::Location)
    }

    // ------------------------------------------------------------------
    // School
    // ------------------------------------------------------------------

    fn resolve_attend_class(&self, state: &GameState) -> Resolution {
        if state.flags.has_attended_class {
            return Resolution::new()
                .narrate("You've already attended class today. There's nothing new to learn from another lecture.")
                .taking_quietly(GLANCE_MINUTES);
        }
        Resolution::new()
            .narrate("You attend a class. It's hard to focus with the weight of the vision.")
            .gain("You feel slightly more informed, but less calm. (+1 Knowledge)")
            .with_effect(Effect::KnowledgeChanged { delta: 1 })
            .taking(CLASS_MINUTES)
            .flag(Flag::HasAttendedClass)
            .narrate("After class, you see Jake lingering by the door.")
            .screen(Screen::AfterClass)
    }

    fn resolve_steal_from_school<R: Rng + ?Sized>(&self, state: &GameState, rng: &mut R) -> Resolution {
        let res = if self.steal_succeeds(state, rng) {
            let suffix = if state.has_item(Item::Backpack) {
                " Your backpack helps you hide it."
            } else {
                ""
            };
            Resolution::new()
                .narrate(format!(
                    "You swipe a calculator from a teacher's desk without being noticed.{suffix}"
                ))
                .gain("You gained a Stolen Calculator!")
                .item(Item::StolenCalculator)
        } else {
            Resolution::new()
                .warn("You get caught trying to steal! The principal is called, and soon the police arrive.")
                .ending(Ending::Jailed)
        };
        res.taking(SHORT_MINUTES)
    }

    // ------------------------------------------------------------------
    // Bunker
    // ------------------------------------------------------------------

    fn resolve_knock_on_bunker(&self, state: &GameState) -> Resolution {
        let res = if state.flags.bunker_unlocked {
            Resolution::new().narrate("The bunker door is already open. You can now enter.")
        } else if state.has_item(Item::BunkerRumor) && state.trust(Friend::Ben) >= BUNKER_CODE_TRUST {
            Resolution::new()
                .narrate("You knock, then try the code Ben worked out from the forum post. There's a click and a hiss as the heavy door swings open.")
                .gain("The Neighbor's Bunker is now unlocked!")
                .flag(Flag::BunkerUnlocked)
        } else {
            Resolution::new()
                .narrate("You knock heavily, but only silence answers. The door remains locked.")
        };
        res.taking(SHORT_MINUTES)
    }

    fn resolve_enter_bunker(&self, state: &GameState) -> Resolution {
        let res = if !state.flags.bunker_unlocked {
            Resolution::new().narrate("The bunker door is locked tight. You can't enter yet.")
        } else if state.has_item(Item::BunkerCacheTaken) {
            Resolution::new()
                .narrate("You step inside the cool, damp air of the bunker.")
                .narrate("You've already taken the main supplies from here.")
        } else {
            Resolution::new()
                .narrate("You step inside the cool, damp air of the bunker. It's surprisingly well-stocked.")
                .gain("You find a cache of Supplies and some advanced Tech Parts. (+2 Tech Parts)")
                .item(Item::BunkerCacheTaken)
                .item(Item::Supplies)
                .with_effect(Effect::TechPartsChanged { delta: 2 })
        };
        res.taking(HOUR_MINUTES)
    }

    // ------------------------------------------------------------------
    // Military base
    // ------------------------------------------------------------------

    fn caught_at_gate(&self) -> Resolution {
        Resolution::new()
            .warn(
                "Your chaotic public warnings have been noted. As you approach the base, you're \
                 recognized and apprehended.",
            )
            .ending(Ending::Jailed)
            .taking(HOUR_MINUTES)
    }

    fn let_inside(res: Resolution) -> Resolution {
        res.flag(Flag::MilitaryBaseAccessed)
            .narrate("You're deep inside the military base. Your goal: the satellite laser control room.")
    }

    fn resolve_sneak_into_base(&self, state: &GameState) -> Resolution {
        if state.flags.failed_public_warning {
            return self.caught_at_gate();
        }
        if state.knowledge >= SNEAK_KNOWLEDGE && state.tech_parts >= SNEAK_TECH_PARTS {
            Self::let_inside(Resolution::new().narrate(
                "You avoid the patrols, using your knowledge and tech skills to bypass the security systems.",
            ))
            .taking(HOUR_MINUTES)
        } else {
            Resolution::new()
                .narrate("You try to sneak in, but lack the skills or equipment.")
                .warn("A guard spots you and you are forced to retreat!")
                .move_to(LocationId::TownSquare)
                .taking(HOUR_MINUTES)
        }
    }

    fn resolve_bluff_into_base(&self, state: &GameState) -> Resolution {
        if state.flags.failed_public_warning {
            return self.caught_at_gate();
        }
        if state.authority >= BLUFF_AUTHORITY {
            Self::let_inside(Resolution::new().narrate(
                "You approach the gate and lean on the Mayor's name. The guard hesitates, then lets you in.",
            ))
            .taking(HOUR_MINUTES)
        } else {
            Resolution::new()
                .narrate("You try to bluff your way in, but the guard is unconvinced.")
                .dialogue("'Beat it, kid. Civilians aren't allowed here.'")
                .taking(HOUR_MINUTES)
        }
    }

    fn resolve_bribe_guard(&self, state: &GameState) -> Resolution {
        let cost = self.tuning.bribe_cost;
        if state.cash >= cost {
            Self::let_inside(
                Resolution::new()
                    .narrate("You discreetly offer the guard some cash. He glances around, pockets it, and lets you in.")
                    .with_effect(Effect::CashChanged { delta: -cost }),
            )
            .taking(HOUR_MINUTES)
        } else {
            Resolution::new()
                .narrate(format!(
                    "You don't have enough cash to bribe the guard (needs {cost}). He scoffs and tells you to leave."
                ))
                .taking(HOUR_MINUTES)
        }
    }

    fn resolve_search_laser_room(&self, state: &GameState) -> Resolution {
        let res = Resolution::new()
            .narrate("You navigate the corridors, looking for signs to a 'Laser Control' room.");
        if state.knowledge >= BASE_SEARCH_KNOWLEDGE {
            return res
                .narrate("Your research pays off. You find a heavily secured door marked 'Orbital Defense Control'.")
                .taking(SHORT_MINUTES)
                .screen(Screen::LaserControl);
        }

        let res = res
            .warn("The base is a maze. You get lost, wasting precious time. Footsteps echo nearby.")
            .taking(HOUR_MINUTES);
        let left = state.time_remaining().saturating_sub(HOUR_MINUTES);
        let res = if left > 0 && left <= MILITARY_ACTIVITY_AT {
            res.warn("A patrol spots you! 'Intruder alert!'").ending(Ending::Jailed)
        } else {
            res
        };
        res.taking(SHORT_MINUTES)
    }

    fn resolve_convince_personnel(&self, state: &GameState) -> Resolution {
        let res = Resolution::new().narrate("You encounter a lone technician.");
        if state.authority >= CONVINCE_AUTHORITY && state.knowledge >= CONVINCE_KNOWLEDGE {
            res.dialogue("You explain the situation, backing it up with data. 'My God... you're right! I'll help you!'")
                .taking(SHORT_MINUTES)
                .screen(Screen::LaserControl)
        } else {
            res.warn("The technician just stares, then presses an alarm button. 'Intruder!'")
                .ending(Ending::Jailed)
                .taking(SHORT_MINUTES)
        }
    }

    fn resolve_hack_terminal(&self, state: &GameState) -> Resolution {
        let res = Resolution::new().narrate("You find an unsecured computer terminal.");
        if state.knowledge >= TERMINAL_KNOWLEDGE && state.tech_parts >= TERMINAL_TECH_PARTS {
            res.narrate("You hack into the system with your parts and skills. Missile trajectory data and laser controls are yours!")
                .taking(SHORT_MINUTES)
                .screen(Screen::LaserControl)
        } else {
            res.warn("The terminal is locked, and you trigger an alert trying to bypass it.")
                .ending(Ending::Jailed)
                .taking(SHORT_MINUTES)
        }
    }

    fn resolve_escape_base(&self, state: &GameState) -> Resolution {
        let res = Resolution::new().narrate("You try to sneak out of the military base.");
        if state.knowledge >= ESCAPE_KNOWLEDGE && state.has_item(Item::Backpack) {
            res.narrate("Using your knowledge of the base layout, you find a hidden exit.")
                .narrate("You made it out! But the missile is still a threat.")
                .move_to(LocationId::OutskirtsRoad)
                .taking(SHORT_MINUTES)
        } else {
            res.warn("You trigger another alarm. There's no escape. You're surrounded.")
                .ending(Ending::Jailed)
                .taking(SHORT_MINUTES)
        }
    }

    fn resolve_fire_laser(&self, state: &GameState) -> Resolution {
        if state.knowledge >= LASER_KNOWLEDGE {
            Resolution::new()
                .narrate("With trembling hands, you input the coordinates and arm the laser. A brilliant beam shoots into the sky.")
                .narrate("Moments later, a distant explosion lights up the horizon, followed by absolute silence.")
                .ending(Ending::MissileDestroyed)
        } else {
            Resolution::new()
                .narrate("You try to operate the complex controls, but they make no sense.")
                .warn("The countdown hits zero. You failed.")
                .ending(Ending::TimesUp)
        }
    }
}

/// Where "Go back" leads from a friend conversation.
fn back_from_talk(state: &GameState) -> Screen {
    match state.screen {
        Screen::TalkFriend(Friend::Jake) => Screen::AfterClass,
        _ => Screen::Friends,
    }
}

/// Lines for the status screen.
pub fn status_report(state: &GameState) -> Vec<String> {
    let yes_no = |b: bool| if b { "Yes" } else { "No" };
    let mut lines = vec![
        format!("Location: {}", state.location),
        format!(
            "Time Remaining: {} ({})",
            state.clock.display(),
            state.clock.phase
        ),
        format!("Knowledge: {}", state.knowledge),
        format!("Tech Parts: {}", state.tech_parts),
        format!("Cash: {}", state.cash),
        format!("Authority: {}", state.authority),
        format!("Has Backpack: {}", yes_no(state.has_item(Item::Backpack))),
        format!("Has Car Keys: {}", yes_no(state.flags.has_car_keys)),
        format!("Car Gas: {}%", state.car_gas),
        format!("Bunker Unlocked: {}", yes_no(state.flags.bunker_unlocked)),
        "Friends:".to_string(),
    ];
    for friend in Friend::ALL {
        lines.push(format!(
            "  {} ({}): {} / {}",
            friend,
            friend.role(),
            state.trust(friend),
            TRUST_SCALE
        ));
    }
    lines
}

// ============================================================================
// Applying Effects
// ============================================================================

/// Apply a list of effects to the state.
///
/// Returns narration produced by the world itself while applying them: day
/// phase changes, timed events and the clock running out.
pub fn apply_effects(state: &mut GameState, effects: &[Effect]) -> Vec<Narration> {
    let mut narration = Vec::new();
    for effect in effects {
        apply_effect(state, effect, &mut narration);
    }
    narration
}

/// Apply a single effect.
pub fn apply_effect(state: &mut GameState, effect: &Effect, narration: &mut Vec<Narration>) {
    match effect {
        Effect::Moved { to } => {
            state.location = *to;
            state.screen = Screen::Location;
        }
        Effect::ScreenChanged { screen } => {
            state.screen = *screen;
        }
        Effect::TimeAdvanced { minutes, silent } => {
            advance_time(state, *minutes, *silent, narration);
        }
        Effect::KnowledgeChanged { delta } => {
            state.knowledge += delta;
        }
        Effect::CashChanged { delta } => {
            state.cash += delta;
        }
        Effect::TechPartsChanged { delta } => {
            state.tech_parts += delta;
        }
        Effect::AuthorityChanged { delta } => {
            state.authority += delta;
        }
        Effect::CarGasChanged { delta } => {
            state.car_gas += delta;
        }
        Effect::TrustChanged { friend, delta } => {
            state.trust.adjust(*friend, *delta);
        }
        Effect::ItemGained { item } => {
            state.inventory.add(*item);
        }
        Effect::ItemLost { item } => {
            state.inventory.remove(*item);
        }
        Effect::FlagSet { flag, value } => {
            state.flags.set(*flag, *value);
        }
        Effect::EndingReached { ending } => {
            state.set_ending(*ending);
        }
        Effect::QuitRequested => {}
    }
}

/// Run the countdown and fire any timed events.
fn advance_time(state: &mut GameState, minutes: u32, silent: bool, out: &mut Vec<Narration>) {
    let tick = state.clock.advance_minutes(minutes);

    if state.clock.is_expired() {
        if tick.expired {
            state.set_ending(Ending::TimesUp);
            if !silent {
                out.push(Narration::new(
                    NarrativeType::Clock,
                    "--- The clock strikes zero. Your time has run out. ---",
                ));
            }
        }
        return;
    }

    if let Some(phase) = tick.phase_changed {
        if !silent {
            out.push(Narration::new(
                NarrativeType::Clock,
                format!("--- The day progresses. It is now {phase}. ---"),
            ));
            out.push(Narration::new(
                NarrativeType::Clock,
                format!(
                    "You have approximately {:.1} hours left.",
                    state.clock.hours_remaining()
                ),
            ));
        }
    }

    let remaining = state.time_remaining();
    if remaining <= RADIO_WARNING_AT && !state.flags.news_warning_issued {
        state.flags.news_warning_issued = true;
        out.push(Narration::new(
            NarrativeType::Warning,
            "A local radio station interrupts its programming with a garbled message about \
             'unusual atmospheric disturbances'. It's enough to send a chill down your spine.",
        ));
        if !state.has_item(Item::RadioWarning) {
            state.inventory.add(Item::RadioWarning);
            out.push(Narration::new(
                NarrativeType::Gain,
                "You gained a Radio Warning as evidence!",
            ));
        }
    }
    if remaining <= MILITARY_ACTIVITY_AT && !state.flags.military_activity_noticed {
        state.flags.military_activity_noticed = true;
        out.push(Narration::new(
            NarrativeType::Warning,
            "Humvees and supply trucks rumble through the streets. Something is definitely happening.",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{DayPhase, Trust};
    use rand::rngs::mock::StepRng;

    fn lucky() -> StepRng {
        StepRng::new(0, 0)
    }

    fn unlucky() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn play(state: &mut GameState, action: Action, rng: &mut StepRng) -> Resolution {
        let engine = RulesEngine::default();
        let res = engine.resolve(state, action, rng);
        apply_effects(state, &res.effects);
        res
    }

    #[test]
    fn test_moving_is_free() {
        let mut state = GameState::new("Sam", 24);
        play(&mut state, Action::Go(LocationId::TownSquare), &mut lucky());
        assert_eq!(state.location, LocationId::TownSquare);
        assert_eq!(state.time_remaining(), 24 * 60);
    }

    #[test]
    fn test_computer_grants_backpack_once() {
        let mut state = GameState::new("Sam", 24);
        play(&mut state, Action::UseComputer, &mut lucky());
        play(&mut state, Action::StopComputer, &mut lucky());
        play(&mut state, Action::UseComputer, &mut lucky());
        assert_eq!(state.inventory.count(Item::Backpack), 1);
        assert_eq!(state.screen, Screen::Computer);
    }

    #[test]
    fn test_local_news_costs_an_hour() {
        let mut state = GameState::new("Sam", 24);
        play(&mut state, Action::SearchLocalNews, &mut lucky());
        assert_eq!(state.knowledge, 2);
        assert_eq!(state.time_remaining(), 23 * 60);
    }

    #[test]
    fn test_survival_guides_roll_without_knowledge() {
        let mut state = GameState::new("Sam", 24);
        play(&mut state, Action::SearchSurvivalGuides, &mut unlucky());
        assert!(!state.has_item(Item::BunkerRumor));
        play(&mut state, Action::SearchSurvivalGuides, &mut lucky());
        assert!(state.has_item(Item::BunkerRumor));
    }

    #[test]
    fn test_survival_guides_certain_with_knowledge() {
        let mut state = GameState::new("Sam", 24);
        state.knowledge = 2;
        play(&mut state, Action::SearchSurvivalGuides, &mut unlucky());
        assert!(state.has_item(Item::BunkerRumor));
        play(&mut state, Action::SearchSurvivalGuides, &mut unlucky());
        assert_eq!(state.inventory.count(Item::BunkerRumor), 1);
    }

    #[test]
    fn test_tell_ben_with_high_trust() {
        let mut state = GameState::new("Sam", 24);
        state.trust.ben = 4.0;
        state.screen = Screen::TalkFriend(Friend::Ben);
        play(&mut state, Action::TellVision(Friend::Ben), &mut lucky());
        assert_eq!(state.trust.ben, 14.0);
        assert_eq!(state.knowledge, 1);
        assert!(state.has_item(Item::SurvivalChecklist));
        assert!(state.flags.shared_vision_with_friends);
        assert!(state.flags.talked_to_ben_about_vision);
        assert_eq!(state.screen, Screen::Friends);
        assert_eq!(state.time_remaining(), 24 * 60 - 30);
    }

    #[test]
    fn test_tell_alex_with_default_trust_costs_trust() {
        let mut state = GameState::new("Sam", 24);
        play(&mut state, Action::TellVision(Friend::Alex), &mut lucky());
        assert_eq!(state.trust.alex, 2.0);
        assert_eq!(state.knowledge, 0);
    }

    #[test]
    fn test_maya_low_trust_changes_nothing() {
        let mut state = GameState::new("Sam", 24);
        state.trust.maya = 1.0;
        play(&mut state, Action::TellVision(Friend::Maya), &mut lucky());
        assert_eq!(state.trust.maya, 1.0);
        assert!(state.flags.talked_to_maya_about_vision);
    }

    #[test]
    fn test_jake_rallies_crowd_at_high_trust() {
        let mut state = GameState::new("Sam", 24);
        state.trust.jake = 5.0;
        play(&mut state, Action::TellVision(Friend::Jake), &mut lucky());
        assert!(state.flags.mob_of_civilians);
        assert_eq!(state.trust.jake, 15.0);
        // Jake doesn't count towards the allies predicate.
        assert!(!state.flags.shared_vision_with_friends);
    }

    #[test]
    fn test_challenging_jake_at_low_trust_jails() {
        let mut state = GameState::new("Sam", 24);
        state.trust.jake = 2.0;
        play(&mut state, Action::ChallengeJake, &mut lucky());
        assert_eq!(state.ending, Some(Ending::Jailed));
    }

    #[test]
    fn test_jake_conversation_returns_to_after_class() {
        let mut state = GameState::new("Sam", 24);
        state.screen = Screen::TalkFriend(Friend::Jake);
        play(&mut state, Action::ChallengeJake, &mut lucky());
        assert_eq!(state.screen, Screen::AfterClass);
    }

    #[test]
    fn test_jake_favor_order() {
        let mut state = GameState::new("Sam", 24);
        state.flags.jake_owed_favor = true;
        play(&mut state, Action::CollectJakeFavor, &mut lucky());
        assert_eq!(state.cash, 1);
        assert!(!state.flags.jake_owed_favor);
        assert_eq!(state.trust.jake, 2.0);

        state.flags.jake_owed_favor = true;
        play(&mut state, Action::CollectJakeFavor, &mut lucky());
        assert_eq!(state.inventory.count(Item::Supplies), 1);

        state.inventory.add(Item::Supplies);
        state.flags.jake_owed_favor = true;
        play(&mut state, Action::CollectJakeFavor, &mut lucky());
        assert_eq!(state.tech_parts, 1);
        assert!(state.has_item(Item::ScavengedTechPart));
    }

    #[test]
    fn test_jake_favor_without_debt_does_nothing() {
        let mut state = GameState::new("Sam", 24);
        let res = play(&mut state, Action::CollectJakeFavor, &mut lucky());
        assert!(res.effects.is_empty());
        assert_eq!(state.cash, 0);
    }

    #[test]
    fn test_failed_warning_marks_player() {
        let mut state = GameState::new("Sam", 24);
        play(&mut state, Action::WarnOpenly, &mut lucky());
        assert!(state.flags.failed_public_warning);
        assert_eq!(state.trust.alex, 2.0);
        assert!(!state.flags.mob_of_civilians);
    }

    #[test]
    fn test_warning_with_authority_gathers_crowd() {
        let mut state = GameState::new("Sam", 24);
        state.authority = 3.0;
        play(&mut state, Action::WarnOpenly, &mut lucky());
        assert!(state.flags.mob_of_civilians);
        assert_eq!(state.authority, 4.0);
    }

    #[test]
    fn test_mayor_needs_evidence() {
        let mut state = GameState::new("Sam", 24);
        state.location = LocationId::TownHall;
        state.knowledge = 5;
        play(&mut state, Action::DemandMayor, &mut lucky());
        assert!(!state.flags.mayor_warned);
        assert_eq!(state.location, LocationId::TownSquare);
        assert_eq!(state.authority, -1.0);

        state.location = LocationId::TownHall;
        state.inventory.add(Item::SurvivalNotes);
        play(&mut state, Action::DemandMayor, &mut lucky());
        assert!(state.flags.mayor_warned);
        assert_eq!(state.authority, 4.0);
        assert_eq!(state.location, LocationId::TownHall);
    }

    #[test]
    fn test_first_gas_can_purchase_adds_gas() {
        let mut state = GameState::new("Sam", 24);
        state.cash = 2;
        play(&mut state, Action::BuySupplies, &mut lucky());
        play(&mut state, Action::BuySupplies, &mut lucky());
        assert_eq!(state.cash, 0);
        assert_eq!(state.car_gas, 30);
        assert_eq!(state.inventory.count(Item::CannedFood), 2);
        assert_eq!(state.inventory.count(Item::GasCan), 1);
    }

    #[test]
    fn test_stealing_gas_can() {
        let mut state = GameState::new("Sam", 24);
        state.screen = Screen::StealGasCan;
        play(&mut state, Action::ConfirmSteal, &mut lucky());
        assert_eq!(state.car_gas, 50);
        assert!(state.has_item(Item::GasCan));
        assert_eq!(state.screen, Screen::Location);

        let mut state = GameState::new("Sam", 24);
        play(&mut state, Action::ConfirmSteal, &mut unlucky());
        assert_eq!(state.ending, Some(Ending::Jailed));
    }

    #[test]
    fn test_shift_needs_four_hours() {
        let mut state = GameState::new("Sam", 4);
        state.location = LocationId::BurgerHut;
        play(&mut state, Action::WorkShift, &mut lucky());
        assert_eq!(state.cash, 1);
        assert_eq!(state.location, LocationId::TownSquare);
        // The shift used up the day; the trailing glance can't run it below zero.
        assert_eq!(state.ending, Some(Ending::TimesUp));

        let mut state = GameState::new("Sam", 3);
        play(&mut state, Action::WorkShift, &mut lucky());
        assert_eq!(state.cash, 0);
        assert_eq!(state.time_remaining(), 3 * 60 - 6);
    }

    #[test]
    fn test_class_only_once() {
        let mut state = GameState::new("Sam", 24);
        play(&mut state, Action::AttendClass, &mut lucky());
        assert_eq!(state.knowledge, 1);
        assert_eq!(state.screen, Screen::AfterClass);
        assert_eq!(state.time_remaining(), 22 * 60);

        play(&mut state, Action::AttendClass, &mut lucky());
        assert_eq!(state.knowledge, 1);
        assert_eq!(state.time_remaining(), 22 * 60 - 6);
    }

    #[test]
    fn test_bus_picks_escape() {
        let mut state = GameState::new("Sam", 24);
        let res = play(&mut state, Action::WaitForBus, &mut lucky());
        assert!(!res.ends_game());

        state.cash = 1;
        play(&mut state, Action::WaitForBus, &mut lucky());
        assert_eq!(state.ending, Some(Ending::SoloEscape));
        assert_eq!(state.cash, 0);
    }

    #[test]
    fn test_truck_needs_keys_and_gas() {
        let mut state = GameState::new("Sam", 24);
        state.location = LocationId::OutskirtsRoad;
        play(&mut state, Action::DriveTruck, &mut lucky());
        assert!(state.ending.is_none());

        play(&mut state, Action::TakeHendersonTruck, &mut lucky());
        assert!(state.flags.has_car_keys);
        play(&mut state, Action::DriveTruck, &mut lucky());
        assert!(state.ending.is_none());

        state.car_gas = 30;
        state.flags.shared_vision_with_friends = true;
        state.trust = Trust::uniform(4.0);
        play(&mut state, Action::DriveTruck, &mut lucky());
        assert_eq!(state.ending, Some(Ending::AlliesEscape));
    }

    #[test]
    fn test_knock_unlocks_with_rumor_and_ben() {
        let mut state = GameState::new("Sam", 24);
        play(&mut state, Action::KnockOnBunker, &mut lucky());
        assert!(!state.flags.bunker_unlocked);

        state.inventory.add(Item::BunkerRumor);
        state.trust.ben = 10.0;
        play(&mut state, Action::KnockOnBunker, &mut lucky());
        assert!(state.flags.bunker_unlocked);

        play(&mut state, Action::EnterBunker, &mut lucky());
        play(&mut state, Action::EnterBunker, &mut lucky());
        assert_eq!(state.inventory.count(Item::Supplies), 1);
        assert_eq!(state.tech_parts, 2);
    }

    #[test]
    fn test_gate_remembers_public_scene() {
        let mut state = GameState::new("Sam", 24);
        state.flags.failed_public_warning = true;
        state.authority = 10.0;
        play(&mut state, Action::BluffIntoBase, &mut lucky());
        assert_eq!(state.ending, Some(Ending::Jailed));
    }

    #[test]
    fn test_bribe_gets_inside() {
        let mut state = GameState::new("Sam", 24);
        state.location = LocationId::MilitaryBase;
        state.cash = 2;
        play(&mut state, Action::BribeGuard, &mut lucky());
        assert!(state.flags.military_base_accessed);
        assert_eq!(state.cash, 0);
        assert_eq!(state.time_remaining(), 23 * 60);
    }

    #[test]
    fn test_failed_sneak_forces_retreat() {
        let mut state = GameState::new("Sam", 24);
        state.location = LocationId::MilitaryBase;
        play(&mut state, Action::SneakIntoBase, &mut lucky());
        assert!(!state.flags.military_base_accessed);
        assert_eq!(state.location, LocationId::TownSquare);
    }

    #[test]
    fn test_lost_in_base_late_is_caught() {
        let mut state = GameState::new("Sam", 6);
        state.location = LocationId::MilitaryBase;
        state.flags.military_base_accessed = true;
        play(&mut state, Action::SearchLaserRoom, &mut lucky());
        assert_eq!(state.ending, Some(Ending::Jailed));
    }

    #[test]
    fn test_search_finds_laser_control() {
        let mut state = GameState::new("Sam", 24);
        state.location = LocationId::MilitaryBase;
        state.flags.military_base_accessed = true;
        state.knowledge = 5;
        play(&mut state, Action::SearchLaserRoom, &mut lucky());
        assert_eq!(state.screen, Screen::LaserControl);

        play(&mut state, Action::FireLaser, &mut lucky());
        assert_eq!(state.ending, Some(Ending::TimesUp));
    }

    fn inside_base() -> GameState {
        let mut state = GameState::new("Sam", 24);
        state.location = LocationId::MilitaryBase;
        state.flags.military_base_accessed = true;
        state
    }

    #[test]
    fn test_technician_convinced_by_authority_and_data() {
        let mut state = inside_base();
        state.authority = 7.0;
        state.knowledge = 4;
        play(&mut state, Action::ConvincePersonnel, &mut unlucky());
        assert_eq!(state.screen, Screen::LaserControl);
        assert_eq!(state.ending, None);
        assert_eq!(state.time_remaining(), 24 * 60 - 30);
    }

    #[test]
    fn test_technician_raises_alarm() {
        let mut state = inside_base();
        state.authority = 7.0;
        state.knowledge = 3;
        play(&mut state, Action::ConvincePersonnel, &mut lucky());
        assert_eq!(state.ending, Some(Ending::Jailed));

        let mut state = inside_base();
        state.authority = 6.5;
        state.knowledge = 9;
        play(&mut state, Action::ConvincePersonnel, &mut lucky());
        assert_eq!(state.ending, Some(Ending::Jailed));
    }

    #[test]
    fn test_terminal_hack_needs_knowledge_and_parts() {
        let mut state = inside_base();
        state.knowledge = 6;
        state.tech_parts = 2;
        play(&mut state, Action::HackTerminal, &mut unlucky());
        assert_eq!(state.screen, Screen::LaserControl);
        assert_eq!(state.ending, None);
        assert_eq!(state.tech_parts, 2);

        let mut state = inside_base();
        state.knowledge = 6;
        state.tech_parts = 1;
        play(&mut state, Action::HackTerminal, &mut lucky());
        assert_eq!(state.ending, Some(Ending::Jailed));

        let mut state = inside_base();
        state.knowledge = 5;
        state.tech_parts = 4;
        play(&mut state, Action::HackTerminal, &mut lucky());
        assert_eq!(state.ending, Some(Ending::Jailed));
    }

    #[test]
    fn test_fire_laser_with_knowledge() {
        let mut state = GameState::new("Sam", 24);
        state.knowledge = 7;
        play(&mut state, Action::FireLaser, &mut lucky());
        assert_eq!(state.ending, Some(Ending::MissileDestroyed));
    }

    #[test]
    fn test_escape_needs_backpack() {
        let mut state = GameState::new("Sam", 24);
        state.knowledge = 4;
        play(&mut state, Action::EscapeBase, &mut lucky());
        assert_eq!(state.ending, Some(Ending::Jailed));

        let mut state = GameState::new("Sam", 24);
        state.knowledge = 4;
        state.inventory.add(Item::Backpack);
        play(&mut state, Action::EscapeBase, &mut lucky());
        assert_eq!(state.location, LocationId::OutskirtsRoad);
        assert!(state.ending.is_none());
    }

    #[test]
    fn test_pawn_sells_only_sellable() {
        let mut state = GameState::new("Sam", 24);
        state.inventory.add(Item::StolenCalculator);
        state.inventory.add(Item::Backpack);
        play(&mut state, Action::SellItem(Item::Backpack), &mut lucky());
        assert_eq!(state.cash, 0);
        play(&mut state, Action::SellItem(Item::StolenCalculator), &mut lucky());
        assert_eq!(state.cash, 1);
        assert!(!state.has_item(Item::StolenCalculator));
    }

    #[test]
    fn test_radio_warning_fires_once() {
        let mut state = GameState::new("Sam", 11);
        let narration = apply_effects(
            &mut state,
            &[Effect::TimeAdvanced {
                minutes: 60,
                silent: true,
            }],
        );
        assert!(state.has_item(Item::RadioWarning));
        assert!(state.flags.news_warning_issued);
        assert!(narration.iter().any(|n| n.text.contains("radio")));

        let narration = apply_effects(
            &mut state,
            &[Effect::TimeAdvanced {
                minutes: 60,
                silent: false,
            }],
        );
        assert!(!narration.iter().any(|n| n.text.contains("radio")));
        assert_eq!(state.inventory.count(Item::RadioWarning), 1);
    }

    #[test]
    fn test_military_traffic_appears_once_at_five_hours() {
        let tick = |state: &mut GameState| {
            apply_effects(
                state,
                &[Effect::TimeAdvanced {
                    minutes: 60,
                    silent: true,
                }],
            )
        };

        let mut state = GameState::new("Sam", 7);
        let narration = tick(&mut state);
        assert!(!state.flags.military_activity_noticed);
        assert!(!narration.iter().any(|n| n.text.contains("Humvees")));

        let narration = tick(&mut state);
        assert_eq!(state.time_remaining(), MILITARY_ACTIVITY_AT);
        assert!(state.flags.military_activity_noticed);
        assert!(narration.iter().any(|n| n.text.contains("Humvees")));

        let narration = tick(&mut state);
        assert!(!narration.iter().any(|n| n.text.contains("Humvees")));
    }

    #[test]
    fn test_silent_time_hides_phase_change() {
        let mut state = GameState::new("Sam", 13);
        let narration = apply_effects(
            &mut state,
            &[Effect::TimeAdvanced {
                minutes: 60,
                silent: true,
            }],
        );
        assert_eq!(state.clock.phase, DayPhase::Afternoon);
        assert!(narration.is_empty());

        let mut state = GameState::new("Sam", 13);
        let narration = apply_effects(
            &mut state,
            &[Effect::TimeAdvanced {
                minutes: 60,
                silent: false,
            }],
        );
        assert!(narration.iter().any(|n| n.text.contains("Afternoon")));
    }

    #[test]
    fn test_clock_expiry_does_not_override_ending() {
        let mut state = GameState::new("Sam", 1);
        apply_effects(
            &mut state,
            &[
                Effect::EndingReached {
                    ending: Ending::Jailed,
                },
                Effect::TimeAdvanced {
                    minutes: 60,
                    silent: false,
                },
            ],
        );
        assert_eq!(state.ending, Some(Ending::Jailed));
    }

    #[test]
    fn test_status_report_lists_friends() {
        let state = GameState::new("Sam", 24);
        let lines = status_report(&state);
        assert!(lines.iter().any(|l| l.contains("Ben (Pragmatist): 3 / 10")));
        assert!(lines.iter().any(|l| l.starts_with("Time Remaining: 24:00")));
    }
}
