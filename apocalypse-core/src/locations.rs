//! The location graph.
//!
//! Static content: what each place looks like, where you can go from it and
//! what you can do there. Moving along an exit is free; interactions are
//! resolved by the rules engine.

use crate::rules::Action;
use crate::world::LocationId;

/// A labelled edge to another location.
#[derive(Debug, Clone, Copy)]
pub struct Exit {
    pub label: &'static str,
    pub to: LocationId,
}

/// A labelled action available at a location.
#[derive(Debug, Clone, Copy)]
pub struct Interaction {
    pub label: &'static str,
    pub action: Action,
}

/// A static graph node.
#[derive(Debug)]
pub struct LocationInfo {
    pub id: LocationId,
    pub description: &'static str,
    pub interactions: &'static [Interaction],
    pub exits: &'static [Exit],
    pub help: &'static str,
}

const fn exit(label: &'static str, to: LocationId) -> Exit {
    Exit { label, to }
}

const fn act(label: &'static str, action: Action) -> Interaction {
    Interaction { label, action }
}

static BEDROOM: LocationInfo = LocationInfo {
    id: LocationId::Bedroom,
    description: "Your small, cluttered bedroom in your West Virginia home. The morning light \
        filters through the window. The terrifying vision still burns in your mind.",
    interactions: &[
        act("Use computer", Action::UseComputer),
        act("Talk to parents", Action::TalkToParents),
    ],
    exits: &[
        exit("Go to town", LocationId::TownSquare),
        exit("Go to school", LocationId::SchoolEntrance),
        exit("Go to living room", LocationId::LivingRoom),
    ],
    help: "You are at home. You can go to town, go to school, use your computer, or talk to your parents.",
};

static LIVING_ROOM: LocationInfo = LocationInfo {
    id: LocationId::LivingRoom,
    description: "The cozy, slightly worn living room. Your parents are here, engaged in their \
        morning routine.",
    interactions: &[act("Talk to parents", Action::TalkToParents)],
    exits: &[
        exit("Go to bedroom", LocationId::Bedroom),
        exit("Go to front door", LocationId::FrontDoor),
    ],
    help: "Talk to your parents or move between rooms.",
};

static FRONT_DOOR: LocationInfo = LocationInfo {
    id: LocationId::FrontDoor,
    description: "The front door leading outside. The world beyond awaits, oblivious to the \
        ticking clock.",
    interactions: &[],
    exits: &[
        exit("Go to town (Town Square)", LocationId::TownSquare),
        exit("Go to school (School Entrance)", LocationId::SchoolEntrance),
        exit("Go to bedroom", LocationId::Bedroom),
        exit("Go to living room", LocationId::LivingRoom),
    ],
    help: "Leave the house for school or town, or go back inside.",
};

static TOWN_SQUARE: LocationInfo = LocationInfo {
    id: LocationId::TownSquare,
    description: "The heart of your small town. A few people are already out and about. The day \
        feels like any other, but you know time is running out.",
    interactions: &[act("Warn people openly", Action::WarnOpenly)],
    exits: &[
        exit("Work at Burger Hut", LocationId::BurgerHut),
        exit("Go to front door (Home)", LocationId::FrontDoor),
        exit("Go to bus stop", LocationId::BusStop),
        exit("Go to town hall", LocationId::TownHall),
        exit("Go to tech store", LocationId::TechStore),
        exit("Go to military base", LocationId::MilitaryBase),
        exit("Go to general store", LocationId::GeneralStore),
        exit("Go to pawn shop", LocationId::PawnShop),
    ],
    help: "Warn people, work for cash, or move to other key locations.",
};

static SCHOOL_ENTRANCE: LocationInfo = LocationInfo {
    id: LocationId::SchoolEntrance,
    description: "The main entrance to your high school. The morning buzz of students is absent, \
        replaced by an eerie quiet.",
    interactions: &[
        act("Go to class", Action::AttendClass),
        act("Steal from school", Action::StealFromSchool),
    ],
    exits: &[
        exit("Go to newspaper club", LocationId::NewspaperClub),
        exit("Go home", LocationId::FrontDoor),
        exit("Go to town square", LocationId::TownSquare),
    ],
    help: "Attend class, steal, visit the newspaper club, or leave school.",
};

static NEWSPAPER_CLUB: LocationInfo = LocationInfo {
    id: LocationId::NewspaperClub,
    description: "The dusty, cramped room where the school newspaper club meets. The air smells \
        of old paper and ink. Your friends are here.",
    interactions: &[act("Talk to friends", Action::TalkToFriends)],
    exits: &[exit("Go to school entrance", LocationId::SchoolEntrance)],
    help: "Chat with your friends or leave the club.",
};

static GENERAL_STORE: LocationInfo = LocationInfo {
    id: LocationId::GeneralStore,
    description: "Shelves of canned goods and camping gear crowd the narrow aisles. Mr. Jenkins, \
        the proprietor, watches you from behind the counter.",
    interactions: &[
        act("Try to buy supplies (food, gas)", Action::BuySupplies),
        act("Attempt to steal supplies", Action::StealFromStore),
        act("Talk to Mr. Jenkins about the situation", Action::TalkToJenkins),
        act("Leave the store", Action::LeaveStore),
    ],
    exits: &[exit("Go to town square", LocationId::TownSquare)],
    help: "Shop for supplies or return to town.",
};

static TOWN_HALL: LocationInfo = LocationInfo {
    id: LocationId::TownHall,
    description: "The town hall, a stately but quiet building. Secretary Davies sits behind a \
        formidable desk.",
    interactions: &[
        act("Demand to see the Mayor and show proof", Action::DemandMayor),
        act("Try to explain the urgency to the secretary", Action::ExplainToSecretary),
        act("Leave politely", Action::LeaveTownHall),
    ],
    exits: &[exit("Go to town square", LocationId::TownSquare)],
    help: "Try to get help from town officials or leave.",
};

static BUS_STOP: LocationInfo = LocationInfo {
    id: LocationId::BusStop,
    description: "A small, weathered shelter with a faded bus schedule. The road stretches out \
        towards the next town.",
    interactions: &[act("Wait for bus", Action::WaitForBus)],
    exits: &[
        exit("Go to town square", LocationId::TownSquare),
        exit("Walk to the outskirts road", LocationId::OutskirtsRoad),
    ],
    help: "Wait for the bus to escape or return to town.",
};

static TECH_STORE: LocationInfo = LocationInfo {
    id: LocationId::TechStore,
    description: "A small, modern storefront with a few outdated computers on display. It's \
        usually empty.",
    interactions: &[
        act("Buy tech parts", Action::BuyTechPart),
        act("Steal from tech store", Action::StealTechPart),
    ],
    exits: &[exit("Go to town square", LocationId::TownSquare)],
    help: "Buy or steal tech parts, or return to town square.",
};

static MILITARY_BASE: LocationInfo = LocationInfo {
    id: LocationId::MilitaryBase,
    description: "A high fence topped with barbed wire surrounds a sprawling complex. Guards \
        patrol the perimeter. A chilling sense of finality hangs in the air.",
    interactions: &[
        act("Sneak past the guards (requires knowledge and tech parts)", Action::SneakIntoBase),
        act("Bluff your way in (requires authority)", Action::BluffIntoBase),
        act("Bribe the guard", Action::BribeGuard),
        act("Retreat to Town Square", Action::RetreatFromBase),
    ],
    exits: &[],
    help: "Try to enter the military base or return to town.",
};

/// Interactions once the player is past the fence.
pub static MILITARY_INTERIOR: &[Interaction] = &[
    act("Search for the Laser Control Room", Action::SearchLaserRoom),
    act("Look for military personnel to convince", Action::ConvincePersonnel),
    act("Attempt to use a computer terminal", Action::HackTerminal),
    act("Give up and try to escape the base", Action::EscapeBase),
];

static OUTSKIRTS_ROAD: LocationInfo = LocationInfo {
    id: LocationId::OutskirtsRoad,
    description: "You're on the main road leading out of town. The familiar houses slowly give \
        way to dense forest and rolling hills.",
    interactions: &[
        act("Search for a car (Mr. Henderson's truck)", Action::SearchForCar),
        act("Drive Mr. Henderson's truck out of town", Action::DriveTruck),
    ],
    exits: &[
        exit("Go to town square", LocationId::TownSquare),
        exit("Go to neighbor's bunker", LocationId::NeighborsBunker),
    ],
    help: "Search for transport, check the bunker, or return to town.",
};

static NEIGHBORS_BUNKER: LocationInfo = LocationInfo {
    id: LocationId::NeighborsBunker,
    description: "A heavily reinforced steel door, almost invisible against the overgrown \
        hillside. It looks impenetrable.",
    interactions: &[
        act("Examine door", Action::ExamineBunkerDoor),
        act("Knock on door", Action::KnockOnBunker),
        act("Enter (if unlocked)", Action::EnterBunker),
    ],
    exits: &[exit("Go to outskirts road", LocationId::OutskirtsRoad)],
    help: "Try to get into the bunker or go back to the road.",
};

static BURGER_HUT: LocationInfo = LocationInfo {
    id: LocationId::BurgerHut,
    description: "The smell of old fryer oil hangs over the cramped counter. The manager waves \
        you towards an apron; they're always short-staffed.",
    interactions: &[act("Work a shift", Action::WorkShift)],
    exits: &[exit("Go to town square", LocationId::TownSquare)],
    help: "Earn some cash or head back to the town square.",
};

static PAWN_SHOP: LocationInfo = LocationInfo {
    id: LocationId::PawnShop,
    description: "Dusty guitars and tarnished jewelry fill the windows. The owner doesn't ask \
        where things come from.",
    interactions: &[act("Sell items", Action::OpenPawnCounter)],
    exits: &[exit("Return to town square", LocationId::TownSquare)],
    help: "Sell anything the owner wants, or return to the town square.",
};

/// Look up the static data for a location.
pub fn info(id: LocationId) -> &'static LocationInfo {
    match id {
        LocationId::Bedroom => &BEDROOM,
        LocationId::LivingRoom => &LIVING_ROOM,
        LocationId::FrontDoor => &FRONT_DOOR,
        LocationId::TownSquare => &TOWN_SQUARE,
        LocationId::SchoolEntrance => &SCHOOL_ENTRANCE,
        LocationId::NewspaperClub => &NEWSPAPER_CLUB,
        LocationId::GeneralStore => &GENERAL_STORE,
        LocationId::TownHall => &TOWN_HALL,
        LocationId::BusStop => &BUS_STOP,
        LocationId::TechStore => &TECH_STORE,
        LocationId::MilitaryBase => &MILITARY_BASE,
        LocationId::OutskirtsRoad => &OUTSKIRTS_ROAD,
        LocationId::NeighborsBunker => &NEIGHBORS_BUNKER,
        LocationId::BurgerHut => &BURGER_HUT,
        LocationId::PawnShop => &PAWN_SHOP,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_info_matches_id() {
        for id in LocationId::ALL {
            assert_eq!(info(id).id, id);
            assert!(!info(id).description.is_empty());
            assert!(!info(id).help.is_empty());
        }
    }

    #[test]
    fn test_every_location_reachable_from_bedroom() {
        let mut seen = HashSet::new();
        let mut queue = vec![LocationId::Bedroom];
        while let Some(id) = queue.pop() {
            if !seen.insert(id) {
                continue;
            }
            queue.extend(info(id).exits.iter().map(|e| e.to));
        }
        for id in LocationId::ALL {
            assert!(seen.contains(&id), "{id} is unreachable");
        }
    }

    #[test]
    fn test_every_location_has_a_way_out() {
        for id in LocationId::ALL {
            let node = info(id);
            let leaves = !node.exits.is_empty()
                || node
                    .interactions
                    .iter()
                    .any(|i| matches!(i.action, Action::RetreatFromBase));
            assert!(leaves, "{id} is a dead end");
        }
    }
}
