//! World data model: items, scenes, exits and their runtime fields.
//!
//! Definitions are created once from loader output and never destroyed; only
//! the runtime parts (`location`, `state`, `flags`, scene membership and the
//! visited flag) change during a session.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Location keyword used by world data for items that start in the player's hands.
pub const INVENTORY_LOCATION: &str = "inventory";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
    Up,
    Down,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
    In,
    Out,
}

impl Direction {
    pub const ALL: [Direction; 12] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
        Direction::Northeast,
        Direction::Northwest,
        Direction::Southeast,
        Direction::Southwest,
        Direction::In,
        Direction::Out,
    ];

    /// Parse a direction word or its abbreviation (`n`, `ne`, `u`, ...).
    pub fn parse(word: &str) -> Option<Self> {
        let dir = match word.trim().to_lowercase().as_str() {
            "n" | "north" => Direction::North,
            "s" | "south" => Direction::South,
            "e" | "east" => Direction::East,
            "w" | "west" => Direction::West,
            "u" | "up" | "upward" | "upwards" => Direction::Up,
            "d" | "down" | "downward" | "downwards" => Direction::Down,
            "ne" | "northeast" => Direction::Northeast,
            "nw" | "northwest" => Direction::Northwest,
            "se" | "southeast" => Direction::Southeast,
            "sw" | "southwest" => Direction::Southwest,
            "in" | "inside" | "enter" => Direction::In,
            "out" | "outside" | "exit" => Direction::Out,
            _ => return None,
        };
        Some(dir)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Northeast => "northeast",
            Direction::Northwest => "northwest",
            Direction::Southeast => "southeast",
            Direction::Southwest => "southwest",
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    Tool,
    Weapon,
    Treasure,
    Container,
    Food,
    LightSource,
    #[serde(other)]
    Other,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Tool => "TOOL",
            ItemType::Weapon => "WEAPON",
            ItemType::Treasure => "TREASURE",
            ItemType::Container => "CONTAINER",
            ItemType::Food => "FOOD",
            ItemType::LightSource => "LIGHT_SOURCE",
            ItemType::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemSize {
    Tiny,
    #[default]
    Small,
    Medium,
    Large,
    Huge,
}

impl ItemSize {
    /// Map a numeric bulk value from world data onto a size class.
    pub fn from_bulk(bulk: u32) -> Self {
        match bulk {
            0..=5 => ItemSize::Tiny,
            6..=10 => ItemSize::Small,
            11..=20 => ItemSize::Medium,
            21..=40 => ItemSize::Large,
            _ => ItemSize::Huge,
        }
    }

    /// Space this item occupies inside a container with a capacity.
    pub fn capacity_units(&self) -> u32 {
        match self {
            ItemSize::Tiny => 1,
            ItemSize::Small => 2,
            ItemSize::Medium => 4,
            ItemSize::Large => 8,
            ItemSize::Huge => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Lighting {
    #[default]
    Daylight,
    Lit,
    Dark,
}

/// Where an item currently is. Items never placed by world data sit in `Nowhere`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum ItemLocation {
    Scene(String),
    Inventory,
    Container(String),
    #[default]
    Nowhere,
}

impl ItemLocation {
    /// Short form used in log lines and invariant reports.
    pub fn describe(&self) -> String {
        match self {
            ItemLocation::Scene(id) => format!("scene:{}", id),
            ItemLocation::Inventory => INVENTORY_LOCATION.to_string(),
            ItemLocation::Container(id) => format!("container:{}", id),
            ItemLocation::Nowhere => "nowhere".to_string(),
        }
    }
}

/// A scripted response attached to an item, e.g. `turn on` for a lamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Interaction {
    pub command: String,
    pub message: String,
    #[serde(default, alias = "condition", deserialize_with = "one_or_many")]
    pub conditions: Vec<String>,
    #[serde(default, alias = "effect", deserialize_with = "one_or_many")]
    pub effects: Vec<String>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
        None => Vec::new(),
    })
}

/// What has to be true before a locked item can be opened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRequirement {
    /// Item id that must be carried.
    #[serde(default)]
    pub key: Option<String>,
    /// Game flag that must be set.
    #[serde(default)]
    pub flag: Option<String>,
}

/// Well-known item properties plus an extension map for anything else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ItemProperties {
    #[serde(default)]
    pub container: bool,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub deposit_values: BTreeMap<String, u32>,
    #[serde(default)]
    pub treasure_points: Option<u32>,
    #[serde(default)]
    pub read_text: Option<String>,
    #[serde(default)]
    pub unlock: Option<UnlockRequirement>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemProperties {
    /// Read an unknown key without failing when it is absent.
    pub fn extra_bool(&self, key: &str) -> Option<bool> {
        self.extra.get(key).and_then(Value::as_bool)
    }
}

/// Mutable per-item state. `open` and `locked` are typed; anything else a
/// world defines (`lit`, `broken`, ...) lands in `extra`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemState {
    pub open: bool,
    pub locked: bool,
    pub contents: Vec<String>,
    pub extra: BTreeMap<String, Value>,
}

impl ItemState {
    pub fn get_bool(&self, key: &str) -> bool {
        match key {
            "open" | "isOpen" => self.open,
            "locked" | "isLocked" => self.locked,
            other => self
                .extra
                .get(other)
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        match key {
            "open" | "isOpen" => self.open = value,
            "locked" | "isLocked" => self.locked = value,
            other => {
                self.extra.insert(other.to_string(), Value::Bool(value));
            }
        }
    }
}

/// Things an item can do, derived from its type, tags and properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Portable,
    Container,
    Openable,
    Readable,
    LightSource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub examine_text: Option<String>,
    pub portable: bool,
    pub visible: bool,
    pub weight: u32,
    pub size: ItemSize,
    pub item_type: ItemType,
    pub tags: Vec<String>,
    pub properties: ItemProperties,
    pub interactions: Vec<Interaction>,
    /// Where world data asked for the item to start.
    pub initial_location: Option<String>,
    pub location: ItemLocation,
    pub state: ItemState,
    pub flags: BTreeMap<String, bool>,
}

impl Item {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            aliases: Vec::new(),
            description: format!("You see {}.", name),
            examine_text: None,
            portable: false,
            visible: true,
            weight: 0,
            size: ItemSize::default(),
            item_type: ItemType::Tool,
            tags: Vec::new(),
            properties: ItemProperties::default(),
            interactions: Vec::new(),
            initial_location: None,
            location: ItemLocation::Nowhere,
            state: ItemState::default(),
            flags: BTreeMap::new(),
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_examine_text(mut self, text: &str) -> Self {
        self.examine_text = Some(text.to_string());
        self
    }

    pub fn portable(mut self, weight: u32) -> Self {
        self.portable = true;
        self.weight = weight;
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_size(mut self, size: ItemSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_type(mut self, item_type: ItemType) -> Self {
        self.item_type = item_type;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Mark as a container, optionally starting open.
    pub fn container(mut self, open: bool) -> Self {
        self.properties.container = true;
        self.state.open = open;
        if self.item_type == ItemType::Tool {
            self.item_type = ItemType::Container;
        }
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.properties.capacity = Some(capacity);
        self
    }

    pub fn locked(mut self, unlock: UnlockRequirement) -> Self {
        self.state.locked = true;
        self.properties.unlock = Some(unlock);
        self
    }

    pub fn treasure(mut self, points: u32) -> Self {
        self.item_type = ItemType::Treasure;
        self.properties.treasure_points = Some(points);
        self
    }

    pub fn with_deposit_value(mut self, container_id: &str, points: u32) -> Self {
        self.properties
            .deposit_values
            .insert(container_id.to_string(), points);
        self
    }

    pub fn with_read_text(mut self, text: &str) -> Self {
        self.properties.read_text = Some(text.to_string());
        self
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interactions.push(interaction);
        self
    }

    pub fn starting_in(mut self, location: &str) -> Self {
        self.initial_location = Some(location.to_string());
        self
    }

    pub fn is_container(&self) -> bool {
        self.has(Capability::Container)
    }

    pub fn is_portable(&self) -> bool {
        self.has(Capability::Portable)
    }

    pub fn is_readable(&self) -> bool {
        self.has(Capability::Readable)
    }

    pub fn is_openable(&self) -> bool {
        self.has(Capability::Openable)
    }

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Portable => self.portable,
            Capability::Container => {
                self.properties.container || self.item_type == ItemType::Container
            }
            Capability::Openable => {
                self.has(Capability::Container) || self.has_tag("openable")
            }
            Capability::Readable => {
                self.properties.read_text.is_some() || self.interaction_for("read").is_some()
            }
            Capability::LightSource => {
                self.item_type == ItemType::LightSource || self.has_tag("light_source")
            }
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn is_treasure(&self) -> bool {
        self.item_type == ItemType::Treasure
            || self.properties.treasure_points.is_some()
            || !self.properties.deposit_values.is_empty()
    }

    /// First interaction registered for a command, ignoring conditions.
    pub fn interaction_for(&self, command: &str) -> Option<&Interaction> {
        self.interactions
            .iter()
            .find(|i| i.command.eq_ignore_ascii_case(command))
    }

    /// Highest deposit value this item can ever earn.
    pub fn max_deposit_value(&self) -> u32 {
        self.properties
            .deposit_values
            .values()
            .copied()
            .chain(self.properties.treasure_points)
            .max()
            .unwrap_or(0)
    }

    /// Lowercased name, id and aliases used for target matching.
    pub fn match_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.id.as_str())
            .chain(std::iter::once(self.name.as_str()))
            .chain(self.aliases.iter().map(String::as_str))
    }
}

/// Predicate guarding an exit. Evaluation lives in the scene service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitCondition {
    Flag(String),
    NotFlag(String),
    LightLoad,
    HeavyLoad,
    ItemOpen(String),
    All(Vec<ExitCondition>),
    /// Passage that is never open; exists for its failure message.
    Never,
}

impl ExitCondition {
    /// Parse the textual form used in scene data:
    /// `light_load`, `heavy_load`, `open:<item>`, `<flag>`, `!<flag>`,
    /// and conjunctions joined with `&&`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.contains("&&") {
            return ExitCondition::All(raw.split("&&").map(ExitCondition::parse).collect());
        }
        match raw {
            "light_load" | "lightLoad" => ExitCondition::LightLoad,
            "heavy_load" | "heavyLoad" => ExitCondition::HeavyLoad,
            _ => {
                if let Some(item) = raw.strip_prefix("open:") {
                    ExitCondition::ItemOpen(item.trim().to_string())
                } else if let Some(flag) = raw.strip_prefix('!') {
                    ExitCondition::NotFlag(flag.trim().to_string())
                } else {
                    ExitCondition::Flag(raw.to_string())
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exit {
    pub target: String,
    pub condition: Option<ExitCondition>,
    pub failure_message: Option<String>,
}

impl Exit {
    pub fn to(target: &str) -> Self {
        Self {
            target: target.to_string(),
            condition: None,
            failure_message: None,
        }
    }

    pub fn when(mut self, condition: ExitCondition, failure_message: &str) -> Self {
        self.condition = Some(condition);
        self.failure_message = Some(failure_message.to_string());
        self
    }
}

/// An item reference in a scene's membership list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneItem {
    pub item_id: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: String,
    pub title: String,
    pub description: String,
    pub first_visit_description: Option<String>,
    pub atmosphere: Vec<String>,
    pub lighting: Lighting,
    pub region: Option<String>,
    pub tags: Vec<String>,
    pub exits: BTreeMap<Direction, Exit>,
    pub items: Vec<SceneItem>,
    /// Monster ids placed here by world data; the combat collaborator owns them.
    pub monsters: Vec<String>,
    pub first_visit_points: u32,
    pub visited: bool,
}

impl Scene {
    pub fn new(id: &str, title: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            first_visit_description: None,
            atmosphere: Vec::new(),
            lighting: Lighting::default(),
            region: None,
            tags: Vec::new(),
            exits: BTreeMap::new(),
            items: Vec::new(),
            monsters: Vec::new(),
            first_visit_points: 0,
            visited: false,
        }
    }

    pub fn with_exit(mut self, direction: Direction, exit: Exit) -> Self {
        self.exits.insert(direction, exit);
        self
    }

    pub fn with_item(mut self, item_id: &str) -> Self {
        self.items.push(SceneItem {
            item_id: item_id.to_string(),
            visible: true,
        });
        self
    }

    pub fn with_first_visit(mut self, description: &str, points: u32) -> Self {
        self.first_visit_description = Some(description.to_string());
        self.first_visit_points = points;
        self
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.first_visit_points = points;
        self
    }

    pub fn with_atmosphere(mut self, line: &str) -> Self {
        self.atmosphere.push(line.to_string());
        self
    }

    pub fn with_lighting(mut self, lighting: Lighting) -> Self {
        self.lighting = lighting;
        self
    }

    pub fn with_monster(mut self, monster_id: &str) -> Self {
        self.monsters.push(monster_id.to_string());
        self
    }

    pub fn contains_item(&self, item_id: &str) -> bool {
        self.items.iter().any(|i| i.item_id == item_id)
    }
}

/// Everything the loader hands the engine at session start.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub items: Vec<Item>,
    pub scenes: Vec<Scene>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_scene(mut self, scene: Scene) -> Self {
        self.scenes.push(scene);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!(Direction::parse("N"), Some(Direction::North));
        assert_eq!(Direction::parse("southwest"), Some(Direction::Southwest));
        assert_eq!(Direction::parse("u"), Some(Direction::Up));
        assert_eq!(Direction::parse("sideways"), None);
    }

    #[test]
    fn test_size_from_bulk() {
        assert_eq!(ItemSize::from_bulk(5), ItemSize::Tiny);
        assert_eq!(ItemSize::from_bulk(6), ItemSize::Small);
        assert_eq!(ItemSize::from_bulk(20), ItemSize::Medium);
        assert_eq!(ItemSize::from_bulk(40), ItemSize::Large);
        assert_eq!(ItemSize::from_bulk(41), ItemSize::Huge);
    }

    #[test]
    fn test_exit_condition_parsing() {
        assert_eq!(ExitCondition::parse("light_load"), ExitCondition::LightLoad);
        assert_eq!(
            ExitCondition::parse("!troll_alive"),
            ExitCondition::NotFlag("troll_alive".to_string())
        );
        assert_eq!(
            ExitCondition::parse("open:trap_door"),
            ExitCondition::ItemOpen("trap_door".to_string())
        );
        assert_eq!(
            ExitCondition::parse("rug_moved && light_load"),
            ExitCondition::All(vec![
                ExitCondition::Flag("rug_moved".to_string()),
                ExitCondition::LightLoad,
            ])
        );
    }

    #[test]
    fn test_capabilities() {
        let case = Item::new("trophy_case", "trophy case").container(false);
        assert!(case.is_container());
        assert!(case.is_openable());
        assert!(!case.is_portable());

        let leaflet = Item::new("leaflet", "leaflet")
            .portable(1)
            .with_read_text("WELCOME TO ZORK!");
        assert!(leaflet.is_readable());
        assert!(leaflet.is_portable());
        assert!(!leaflet.is_container());
    }

    #[test]
    fn test_state_typed_and_extra_keys() {
        let mut state = ItemState::default();
        state.set_bool("isOpen", true);
        assert!(state.open);
        state.set_bool("lit", true);
        assert!(state.get_bool("lit"));
        assert!(!state.get_bool("broken"));
    }

    #[test]
    fn test_max_deposit_value() {
        let coin = Item::new("coin", "gold coin")
            .treasure(10)
            .with_deposit_value("trophy_case", 22);
        assert_eq!(coin.max_deposit_value(), 22);
        assert_eq!(Item::new("rock", "rock").max_deposit_value(), 0);
    }
}
