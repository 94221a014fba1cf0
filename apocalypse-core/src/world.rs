//! Game state types.
//!
//! Contains the closed sets the story is built from (locations, friends,
//! items, day phases) and the [`GameState`] record that every action reads
//! and every effect mutates.

use crate::ending::Ending;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Locations
// ============================================================================

/// Every place the player can stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationId {
    Bedroom,
    LivingRoom,
    FrontDoor,
    TownSquare,
    SchoolEntrance,
    NewspaperClub,
    GeneralStore,
    TownHall,
    BusStop,
    TechStore,
    MilitaryBase,
    OutskirtsRoad,
    NeighborsBunker,
    BurgerHut,
    PawnShop,
}

impl LocationId {
    pub const ALL: [LocationId; 15] = [
        LocationId::Bedroom,
        LocationId::LivingRoom,
        LocationId::FrontDoor,
        LocationId::TownSquare,
        LocationId::SchoolEntrance,
        LocationId::NewspaperClub,
        LocationId::GeneralStore,
        LocationId::TownHall,
        LocationId::BusStop,
        LocationId::TechStore,
        LocationId::MilitaryBase,
        LocationId::OutskirtsRoad,
        LocationId::NeighborsBunker,
        LocationId::BurgerHut,
        LocationId::PawnShop,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LocationId::Bedroom => "Bedroom",
            LocationId::LivingRoom => "Living Room",
            LocationId::FrontDoor => "Front Door",
            LocationId::TownSquare => "Town Square",
            LocationId::SchoolEntrance => "School Entrance",
            LocationId::NewspaperClub => "Newspaper Club",
            LocationId::GeneralStore => "General Store",
            LocationId::TownHall => "Town Hall",
            LocationId::BusStop => "Bus Stop",
            LocationId::TechStore => "Tech Store",
            LocationId::MilitaryBase => "Military Base",
            LocationId::OutskirtsRoad => "Outskirts Road",
            LocationId::NeighborsBunker => "Neighbor's Bunker",
            LocationId::BurgerHut => "Burger Hut",
            LocationId::PawnShop => "Pawn Shop",
        }
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Friends & Trust
// ============================================================================

/// The four classmates whose trust the player can earn or lose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Friend {
    Alex,
    Maya,
    Ben,
    Jake,
}

impl Friend {
    pub const ALL: [Friend; 4] = [Friend::Alex, Friend::Maya, Friend::Ben, Friend::Jake];

    pub fn name(&self) -> &'static str {
        match self {
            Friend::Alex => "Alex",
            Friend::Maya => "Maya",
            Friend::Ben => "Ben",
            Friend::Jake => "Jake",
        }
    }

    /// Short personality tag shown in the status panel.
    pub fn role(&self) -> &'static str {
        match self {
            Friend::Alex => "Skeptic",
            Friend::Maya => "Optimist",
            Friend::Ben => "Pragmatist",
            Friend::Jake => "Bully",
        }
    }
}

impl fmt::Display for Friend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Trust score at which a friend counts as a committed ally.
pub const HIGH_TRUST: f32 = 4.0;

/// Displayed upper bound for trust scores. Scores may exceed it.
pub const TRUST_SCALE: f32 = 10.0;

/// Per-friend trust scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trust {
    pub alex: f32,
    pub maya: f32,
    pub ben: f32,
    pub jake: f32,
}

impl Trust {
    pub fn uniform(value: f32) -> Self {
        Self {
            alex: value,
            maya: value,
            ben: value,
            jake: value,
        }
    }

    pub fn get(&self, friend: Friend) -> f32 {
        match friend {
            Friend::Alex => self.alex,
            Friend::Maya => self.maya,
            Friend::Ben => self.ben,
            Friend::Jake => self.jake,
        }
    }

    pub fn get_mut(&mut self, friend: Friend) -> &mut f32 {
        match friend {
            Friend::Alex => &mut self.alex,
            Friend::Maya => &mut self.maya,
            Friend::Ben => &mut self.ben,
            Friend::Jake => &mut self.jake,
        }
    }

    pub fn adjust(&mut self, friend: Friend, delta: f32) {
        *self.get_mut(friend) += delta;
    }
}

impl Default for Trust {
    fn default() -> Self {
        Self::uniform(3.0)
    }
}

// ============================================================================
// Items
// ============================================================================

/// Things the player can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Item {
    Backpack,
    SurvivalNotes,
    SurvivalChecklist,
    HendersonTruckTip,
    RadioWarning,
    BunkerRumor,
    TruckKeys,
    CannedFood,
    GasCan,
    Supplies,
    CircuitBoard,
    StolenCalculator,
    ScavengedTechPart,
    BunkerCacheTaken,
}

impl Item {
    pub fn name(&self) -> &'static str {
        match self {
            Item::Backpack => "Backpack",
            Item::SurvivalNotes => "Survival Notes",
            Item::SurvivalChecklist => "Survival Checklist",
            Item::HendersonTruckTip => "Tip about Mr. Henderson's Truck",
            Item::RadioWarning => "Radio Warning",
            Item::BunkerRumor => "Rumor about a Neighbor's Bunker",
            Item::TruckKeys => "Truck Keys",
            Item::CannedFood => "Canned Food",
            Item::GasCan => "Gas Can",
            Item::Supplies => "Supplies",
            Item::CircuitBoard => "Circuit Board",
            Item::StolenCalculator => "Stolen Calculator",
            Item::ScavengedTechPart => "Scavenged Tech Part",
            Item::BunkerCacheTaken => "Bunker Cache (taken)",
        }
    }

    /// Whether the pawn shop will buy this item.
    pub fn is_sellable(&self) -> bool {
        matches!(self, Item::StolenCalculator | Item::GasCan)
    }

    /// Whether the item counts as proof when talking to the Mayor.
    pub fn is_evidence(&self) -> bool {
        matches!(
            self,
            Item::SurvivalNotes | Item::RadioWarning | Item::BunkerRumor
        )
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The player's belongings, in pickup order. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<Item>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, item: Item) -> bool {
        self.items.contains(&item)
    }

    pub fn count(&self, item: Item) -> usize {
        self.items.iter().filter(|i| **i == item).count()
    }

    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Remove one instance of `item`. Returns false if none was carried.
    pub fn remove(&mut self, item: Item) -> bool {
        match self.items.iter().position(|i| *i == item) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Items the pawn shop would buy, in inventory order.
    pub fn sellable(&self) -> Vec<Item> {
        self.items.iter().copied().filter(Item::is_sellable).collect()
    }
}

// ============================================================================
// Flags
// ============================================================================

/// Story flags. All start false.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    pub parents_warned: bool,
    pub shared_vision_with_friends: bool,
    pub talked_to_alex_about_vision: bool,
    pub talked_to_maya_about_vision: bool,
    pub talked_to_ben_about_vision: bool,
    pub talked_to_jake_about_vision: bool,
    pub jake_owed_favor: bool,
    pub mob_of_civilians: bool,
    pub mayor_warned: bool,
    pub failed_public_warning: bool,
    pub has_attended_class: bool,
    pub has_car_keys: bool,
    pub bunker_unlocked: bool,
    pub military_base_accessed: bool,
    pub news_warning_issued: bool,
    pub military_activity_noticed: bool,
}

/// Names a single flag so effects can set it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    ParentsWarned,
    SharedVisionWithFriends,
    TalkedAboutVision(Friend),
    JakeOwedFavor,
    MobOfCivilians,
    MayorWarned,
    FailedPublicWarning,
    HasAttendedClass,
    HasCarKeys,
    BunkerUnlocked,
    MilitaryBaseAccessed,
    NewsWarningIssued,
    MilitaryActivityNoticed,
}

impl Flags {
    pub fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::ParentsWarned => self.parents_warned,
            Flag::SharedVisionWithFriends => self.shared_vision_with_friends,
            Flag::TalkedAboutVision(friend) => self.talked_about_vision(friend),
            Flag::JakeOwedFavor => self.jake_owed_favor,
            Flag::MobOfCivilians => self.mob_of_civilians,
            Flag::MayorWarned => self.mayor_warned,
            Flag::FailedPublicWarning => self.failed_public_warning,
            Flag::HasAttendedClass => self.has_attended_class,
            Flag::HasCarKeys => self.has_car_keys,
            Flag::BunkerUnlocked => self.bunker_unlocked,
            Flag::MilitaryBaseAccessed => self.military_base_accessed,
            Flag::NewsWarningIssued => self.news_warning_issued,
            Flag::MilitaryActivityNoticed => self.military_activity_noticed,
        }
    }

    pub fn set(&mut self, flag: Flag, value: bool) {
        let slot = match flag {
            Flag::ParentsWarned => &mut self.parents_warned,
            Flag::SharedVisionWithFriends => &mut self.shared_vision_with_friends,
            Flag::TalkedAboutVision(Friend::Alex) => &mut self.talked_to_alex_about_vision,
            Flag::TalkedAboutVision(Friend::Maya) => &mut self.talked_to_maya_about_vision,
            Flag::TalkedAboutVision(Friend::Ben) => &mut self.talked_to_ben_about_vision,
            Flag::TalkedAboutVision(Friend::Jake) => &mut self.talked_to_jake_about_vision,
            Flag::JakeOwedFavor => &mut self.jake_owed_favor,
            Flag::MobOfCivilians => &mut self.mob_of_civilians,
            Flag::MayorWarned => &mut self.mayor_warned,
            Flag::FailedPublicWarning => &mut self.failed_public_warning,
            Flag::HasAttendedClass => &mut self.has_attended_class,
            Flag::HasCarKeys => &mut self.has_car_keys,
            Flag::BunkerUnlocked => &mut self.bunker_unlocked,
            Flag::MilitaryBaseAccessed => &mut self.military_base_accessed,
            Flag::NewsWarningIssued => &mut self.news_warning_issued,
            Flag::MilitaryActivityNoticed => &mut self.military_activity_noticed,
        };
        *slot = value;
    }

    pub fn talked_about_vision(&self, friend: Friend) -> bool {
        match friend {
            Friend::Alex => self.talked_to_alex_about_vision,
            Friend::Maya => self.talked_to_maya_about_vision,
            Friend::Ben => self.talked_to_ben_about_vision,
            Friend::Jake => self.talked_to_jake_about_vision,
        }
    }
}

// ============================================================================
// Time
// ============================================================================

/// Broad part of the day, derived from how much time is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DayPhase {
    #[default]
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPhase {
    pub fn for_remaining(minutes: u32) -> Self {
        match minutes {
            m if m > 12 * 60 => DayPhase::Morning,
            m if m > 6 * 60 => DayPhase::Afternoon,
            m if m > 60 => DayPhase::Evening,
            _ => DayPhase::Night,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DayPhase::Morning => "Morning",
            DayPhase::Afternoon => "Afternoon",
            DayPhase::Evening => "Evening",
            DayPhase::Night => "Night",
        }
    }
}

impl fmt::Display for DayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What happened when the clock moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTick {
    /// The clock reached zero on this tick.
    pub expired: bool,
    /// The day phase changed to this value.
    pub phase_changed: Option<DayPhase>,
}

/// The countdown to impact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    pub budget_minutes: u32,
    pub remaining_minutes: u32,
    pub phase: DayPhase,
}

impl GameClock {
    pub fn new(hours: u32) -> Self {
        let minutes = hours.saturating_mul(60);
        Self {
            budget_minutes: minutes,
            remaining_minutes: minutes,
            phase: DayPhase::for_remaining(minutes),
        }
    }

    pub fn advance_minutes(&mut self, minutes: u32) -> ClockTick {
        let was_running = self.remaining_minutes > 0;
        self.remaining_minutes = self.remaining_minutes.saturating_sub(minutes);

        let new_phase = DayPhase::for_remaining(self.remaining_minutes);
        let phase_changed = (new_phase != self.phase).then_some(new_phase);
        self.phase = new_phase;

        ClockTick {
            expired: was_running && self.remaining_minutes == 0,
            phase_changed,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_minutes == 0
    }

    pub fn hours_remaining(&self) -> f32 {
        self.remaining_minutes as f32 / 60.0
    }

    /// Remaining time as `H:MM`.
    pub fn display(&self) -> String {
        format!(
            "{}:{:02}",
            self.remaining_minutes / 60,
            self.remaining_minutes % 60
        )
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(24)
    }
}

// ============================================================================
// Screens
// ============================================================================

/// The menu the dispatcher is currently presenting.
///
/// `Location` shows the current location's own menu; every other variant is
/// a sub-menu opened by an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Location,
    Computer,
    TalkParents,
    Friends,
    TalkFriend(Friend),
    StealGasCan,
    SeekTransport,
    AfterClass,
    LaserControl,
    PawnCounter,
    ConfirmQuit,
}

// ============================================================================
// Narrative
// ============================================================================

/// Entry in the narrative history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeEntry {
    pub content: String,
    pub entry_type: NarrativeType,
    pub minutes_remaining: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NarrativeType {
    Narration,
    PlayerChoice,
    Dialogue,
    Gain,
    Warning,
    Clock,
    Ending,
    System,
}

// ============================================================================
// Game State
// ============================================================================

/// The complete game state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub session_id: Uuid,
    pub protagonist_name: String,

    pub location: LocationId,
    #[serde(default)]
    pub screen: Screen,
    pub inventory: Inventory,

    // Counters
    pub knowledge: i32,
    pub cash: i32,
    pub tech_parts: i32,
    pub authority: f32,
    pub car_gas: i32,

    pub trust: Trust,
    pub flags: Flags,
    pub clock: GameClock,

    pub ending: Option<Ending>,
    pub turn: u32,

    #[serde(default)]
    pub narrative_history: Vec<NarrativeEntry>,
}

impl GameState {
    pub fn new(protagonist_name: impl Into<String>, starting_hours: u32) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            protagonist_name: protagonist_name.into(),
            location: LocationId::Bedroom,
            screen: Screen::Location,
            inventory: Inventory::new(),
            knowledge: 0,
            cash: 0,
            tech_parts: 0,
            authority: 0.0,
            car_gas: 0,
            trust: Trust::default(),
            flags: Flags::default(),
            clock: GameClock::new(starting_hours),
            ending: None,
            turn: 0,
            narrative_history: Vec::new(),
        }
    }

    pub fn time_remaining(&self) -> u32 {
        self.clock.remaining_minutes
    }

    pub fn has_item(&self, item: Item) -> bool {
        self.inventory.has(item)
    }

    pub fn trust(&self, friend: Friend) -> f32 {
        self.trust.get(friend)
    }

    pub fn has_evidence(&self) -> bool {
        self.inventory.iter().any(Item::is_evidence)
    }

    /// Whether Alex, Maya and Ben know about the vision and back the player.
    pub fn allies_ready(&self) -> bool {
        self.flags.shared_vision_with_friends
            && [Friend::Alex, Friend::Maya, Friend::Ben]
                .iter()
                .all(|f| self.trust(*f) >= HIGH_TRUST)
    }

    /// Chance that a theft goes unnoticed; a backpack helps hide the loot.
    pub fn steal_chance(&self, with_backpack: f64, without_backpack: f64) -> f64 {
        if self.has_item(Item::Backpack) {
            with_backpack
        } else {
            without_backpack
        }
    }

    /// Record the ending unless one was already reached.
    ///
    /// Returns true if this call decided the game.
    pub fn set_ending(&mut self, ending: Ending) -> bool {
        if self.ending.is_some() {
            return false;
        }
        self.ending = Some(ending);
        true
    }

    pub fn add_narrative(&mut self, content: String, entry_type: NarrativeType) {
        self.narrative_history.push(NarrativeEntry {
            content,
            entry_type,
            minutes_remaining: self.clock.remaining_minutes,
        });
    }

    /// Check the state for combinations no sequence of actions can produce.
    ///
    /// Returns one message per problem; an empty list means the state is sound.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.clock.remaining_minutes > self.clock.budget_minutes {
            errors.push(format!(
                "time remaining ({} min) exceeds the day's budget ({} min)",
                self.clock.remaining_minutes, self.clock.budget_minutes
            ));
        }
        if self.clock.phase != DayPhase::for_remaining(self.clock.remaining_minutes) {
            errors.push(format!(
                "day phase {} does not match {} remaining",
                self.clock.phase,
                self.clock.display()
            ));
        }
        for (name, value) in [
            ("knowledge", self.knowledge),
            ("cash", self.cash),
            ("tech parts", self.tech_parts),
            ("car gas", self.car_gas),
        ] {
            if value < 0 {
                errors.push(format!("{name} is negative ({value})"));
            }
        }
        if self.screen == Screen::LaserControl
            && !(self.location == LocationId::MilitaryBase && self.flags.military_base_accessed)
        {
            errors.push("at the laser controls without getting inside the base".to_string());
        }
        if self.flags.bunker_unlocked && !self.has_item(Item::BunkerRumor) {
            errors.push("bunker unlocked without knowing the rumor".to_string());
        }
        if self.flags.has_car_keys != self.has_item(Item::TruckKeys) {
            errors.push("car key flag disagrees with inventory".to_string());
        }
        if self.clock.is_expired() && self.ending.is_none() {
            errors.push("clock expired but no ending was recorded".to_string());
        }

        errors
    }
}
