//! Endings and the predicates that select them.
//!
//! Most endings are set directly by an action (getting caught, boarding the
//! bus, firing the laser). Three are instead detected when the player
//! arrives somewhere with the right state; [`check_arrival`] covers those.

use crate::world::{GameState, Item, LocationId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supplies needed to ride out the blast in the bunker.
pub const BUNKER_SUPPLIES_NEEDED: usize = 3;

/// Knowledge needed to operate the orbital laser.
pub const LASER_KNOWLEDGE: i32 = 7;

/// Tech parts needed to rig the laser controls on arrival.
pub const LASER_TECH_PARTS: i32 = 2;

/// A terminal narrative outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ending {
    TimesUp,
    Jailed,
    AlliesEscape,
    SoloEscape,
    TownEvacuated,
    MissileDestroyed,
}

impl Ending {
    pub const ALL: [Ending; 6] = [
        Ending::TimesUp,
        Ending::Jailed,
        Ending::AlliesEscape,
        Ending::SoloEscape,
        Ending::TownEvacuated,
        Ending::MissileDestroyed,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Ending::TimesUp => "Time's Up",
            Ending::Jailed => "Jailed",
            Ending::AlliesEscape => "Allies Escape",
            Ending::SoloEscape => "Solo Escape",
            Ending::TownEvacuated => "Town Evacuated",
            Ending::MissileDestroyed => "Missile Destroyed",
        }
    }

    /// Whether the player survives this ending.
    pub fn is_survival(&self) -> bool {
        !matches!(self, Ending::TimesUp | Ending::Jailed)
    }

    pub fn epilogue(&self) -> &'static [&'static str] {
        match self {
            Ending::TimesUp => &[
                "The sky darkens. A distant rumble grows louder, then deafening.",
                "There's nowhere left to run. The vision was true.",
                "The end.",
            ],
            Ending::Jailed => &[
                "The cold cell bars are your last sight. Your desperate warnings are met with mockery.",
                "The distant, growing rumble is all the proof you needed. Your efforts end here, in despair.",
                "The end.",
            ],
            Ending::AlliesEscape => &[
                "Against all odds, you convinced your friends. Together, you got out before the blast.",
                "The world outside might be ending, but you face it with those you love.",
                "This is just the beginning of your struggle for survival, together.",
            ],
            Ending::SoloEscape => &[
                "You made it out. You are safe from the initial blast.",
                "The silence is deafening. You're alive, but utterly alone.",
                "This new world is a desolate place, but you have a chance to carve out a new existence.",
            ],
            Ending::TownEvacuated => &[
                "Through sheer force of will and undeniable evidence, you rallied the town. The Mayor finally acted.",
                "The town is empty, but its people are safe, scattered but alive, thanks to you.",
                "You watch the last bus disappear over the horizon. Your town is gone, but its spirit lives on.",
            ],
            Ending::MissileDestroyed => &[
                "You infiltrated the base, outwitted the security, and operated the satellite laser.",
                "The missile is gone. The world is safe, oblivious to how close it came to oblivion.",
                "Your vision was a warning, and you answered it.",
            ],
        }
    }
}

impl fmt::Display for Ending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Pick between the two escape endings.
pub fn escape_ending(state: &GameState) -> Ending {
    if state.allies_ready() {
        Ending::AlliesEscape
    } else {
        Ending::SoloEscape
    }
}

/// Evaluate the ending predicates tied to the player's current location.
///
/// Called whenever the dispatcher is about to show a location menu. All
/// arrival endings need time left on the clock.
pub fn check_arrival(state: &GameState) -> Option<Ending> {
    if state.ending.is_some() || state.clock.is_expired() {
        return None;
    }

    match state.location {
        LocationId::TownSquare
            if state.flags.mayor_warned && state.flags.mob_of_civilians =>
        {
            Some(Ending::TownEvacuated)
        }
        LocationId::MilitaryBase
            if state.flags.military_base_accessed
                && state.knowledge >= LASER_KNOWLEDGE
                && state.tech_parts >= LASER_TECH_PARTS =>
        {
            Some(Ending::MissileDestroyed)
        }
        LocationId::NeighborsBunker
            if state.flags.bunker_unlocked
                && state.inventory.count(Item::Supplies) >= BUNKER_SUPPLIES_NEEDED =>
        {
            Some(escape_ending(state))
        }
        _ => None,
    }
}
