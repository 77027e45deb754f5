//! World data loading from the JSON tree under `data_dir`.
//!
//! Layout:
//! ```text
//! items/index.json            {"categories": {"tools": ["tools/lamp.json", ...]}, "total": n}
//! items/<category>/<id>.json  one item record (camelCase keys)
//! scenes/index.json           {"scenes": ["west_of_house.json", ...]}
//! scenes/<id>.json            one scene record
//! ```
//!
//! Successful item, category and type lookups are cached. Failures never
//! are, so a missing file is looked for again on the next call.

use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::game::errors::GameError;
use crate::game::types::{
    Direction, Exit, ExitCondition, Interaction, Item, ItemLocation, ItemProperties, ItemSize,
    ItemState, ItemType, Lighting, Scene, SceneItem, World,
};

/// Source of world definitions consumed by the engine.
pub trait WorldLoader: Send + Sync {
    fn load_item(&self, id: &str) -> Result<Item, GameError>;
    fn items_by_category(&self, category: &str) -> Result<Vec<Item>, GameError>;
    fn items_by_type(&self, item_type: ItemType) -> Result<Vec<Item>, GameError>;
    fn load_all_items(&self) -> Result<Vec<Item>, GameError>;
    fn load_all_scenes(&self) -> Result<Vec<Scene>, GameError>;
}

impl World {
    /// Pull every item and scene out of a loader.
    pub fn load(loader: &dyn WorldLoader) -> Result<World, GameError> {
        let items = loader.load_all_items()?;
        let scenes = loader.load_all_scenes()?;
        debug!("Loaded world: {} items, {} scenes", items.len(), scenes.len());
        Ok(World { items, scenes })
    }
}

// ============================================================================
// On-disk records
// ============================================================================

#[derive(Debug, Deserialize)]
struct ItemIndex {
    #[serde(default)]
    categories: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SceneIndex {
    #[serde(default)]
    scenes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SizeRecord {
    Class(ItemSize),
    Bulk(u32),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRecord {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    examine_text: Option<String>,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default, rename = "type")]
    item_type: Option<ItemType>,
    #[serde(default)]
    portable: bool,
    #[serde(default = "default_visible")]
    visible: bool,
    #[serde(default)]
    weight: f64,
    #[serde(default)]
    size: Option<SizeRecord>,
    #[serde(default)]
    initial_state: Map<String, Value>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    properties: ItemProperties,
    #[serde(default)]
    interactions: Vec<Interaction>,
    #[serde(default)]
    initial_location: Option<String>,
}

fn default_visible() -> bool {
    true
}

impl ItemRecord {
    fn into_item(self) -> Item {
        let size = match self.size {
            Some(SizeRecord::Class(size)) => size,
            Some(SizeRecord::Bulk(bulk)) => ItemSize::from_bulk(bulk),
            None => ItemSize::default(),
        };

        let mut state = ItemState::default();
        for (key, value) in self.initial_state {
            match (key.as_str(), value) {
                ("contents", Value::Array(ids)) => {
                    state.contents = ids
                        .into_iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect();
                }
                (_, Value::Bool(flag)) => state.set_bool(&key, flag),
                (_, other) => {
                    state.extra.insert(key, other);
                }
            }
        }

        let mut item = Item::new(&self.id, &self.name);
        if !self.description.is_empty() {
            item.description = self.description;
        }
        item.examine_text = self.examine_text;
        item.aliases = self.aliases;
        item.item_type = self.item_type.unwrap_or(ItemType::Tool);
        item.portable = self.portable;
        item.visible = self.visible;
        item.weight = whole_weight(&self.id, self.weight);
        item.size = size;
        item.state = state;
        item.tags = self.tags;
        item.properties = self.properties;
        item.interactions = self.interactions;
        item.initial_location = self.initial_location;
        item.location = ItemLocation::Nowhere;
        item
    }
}

/// Weights are whole units. Fractional values round to the nearest unit and
/// negative ones clamp to zero, with a warning either way.
fn whole_weight(item_id: &str, raw: f64) -> u32 {
    if raw < 0.0 {
        warn!("Item {} has negative weight {}; using 0", item_id, raw);
        return 0;
    }
    let rounded = raw.round();
    if rounded != raw {
        warn!("Item {} weight {} is not a whole number; rounding to {}", item_id, raw, rounded);
    }
    rounded as u32
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExitRecord {
    Target(String),
    Detailed {
        #[serde(default)]
        to: Option<String>,
        #[serde(default)]
        condition: Option<String>,
        #[serde(default, rename = "failureMessage")]
        failure_message: Option<String>,
        #[serde(default)]
        blocked: bool,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SceneItemRecord {
    Id(String),
    Entry {
        #[serde(rename = "itemId")]
        item_id: String,
        #[serde(default = "default_visible")]
        visible: bool,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneRecord {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    first_visit_description: Option<String>,
    #[serde(default)]
    exits: BTreeMap<String, ExitRecord>,
    #[serde(default)]
    items: Vec<SceneItemRecord>,
    #[serde(default)]
    monsters: Vec<String>,
    #[serde(default)]
    lighting: Lighting,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    atmosphere: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    first_visit_points: u32,
}

const DEFAULT_BLOCKED: &str = "You can't go that way.";

impl SceneRecord {
    fn into_scene(self) -> Scene {
        let mut scene = Scene::new(&self.id, &self.title, &self.description);
        scene.first_visit_description = self.first_visit_description;
        scene.lighting = self.lighting;
        scene.region = self.region;
        scene.atmosphere = self.atmosphere;
        scene.tags = self.tags;
        scene.monsters = self.monsters;
        scene.first_visit_points = self.first_visit_points;

        for (key, record) in self.exits {
            let Some(direction) = Direction::parse(&key) else {
                warn!("Scene {} has exit with unknown direction '{}'", self.id, key);
                continue;
            };
            let exit = match record {
                ExitRecord::Target(target) => Exit::to(&target),
                ExitRecord::Detailed {
                    to,
                    condition,
                    failure_message,
                    blocked,
                } => {
                    let message = failure_message.unwrap_or_else(|| DEFAULT_BLOCKED.to_string());
                    match to {
                        Some(target) if !blocked => Exit {
                            target,
                            condition: condition.as_deref().map(ExitCondition::parse),
                            failure_message: Some(message),
                        },
                        _ => Exit::to(&self.id).when(ExitCondition::Never, &message),
                    }
                }
            };
            scene.exits.insert(direction, exit);
        }

        scene.items = self
            .items
            .into_iter()
            .map(|record| match record {
                SceneItemRecord::Id(item_id) => SceneItem {
                    item_id,
                    visible: true,
                },
                SceneItemRecord::Entry { item_id, visible } => SceneItem { item_id, visible },
            })
            .collect();
        scene
    }
}

// ============================================================================
// JSON loader
// ============================================================================

#[derive(Debug, Default)]
struct LoaderCache {
    items: HashMap<String, Item>,
    categories: HashMap<String, Vec<Item>>,
    types: HashMap<ItemType, Vec<Item>>,
}

pub struct JsonWorldLoader {
    root: PathBuf,
    cache: RwLock<LoaderCache>,
}

impl JsonWorldLoader {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            cache: RwLock::new(LoaderCache::default()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<T, GameError> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| GameError::InvalidData(format!("Failed to parse {}: {}", path.display(), e)))
    }

    fn item_index(&self) -> Result<ItemIndex, GameError> {
        self.read_json(&self.root.join("items").join("index.json"))
    }

    fn load_item_file(&self, relative: &str) -> Result<Item, GameError> {
        let record: ItemRecord = self.read_json(&self.root.join("items").join(relative))?;
        Ok(record.into_item())
    }

    fn cached<T>(&self, read: impl FnOnce(&LoaderCache) -> Option<T>) -> Option<T> {
        self.cache.read().ok().and_then(|cache| read(&cache))
    }

    fn remember(&self, write: impl FnOnce(&mut LoaderCache)) {
        if let Ok(mut cache) = self.cache.write() {
            write(&mut cache);
        }
    }

    /// Drop everything cached so far.
    pub fn clear_cache(&self) {
        self.remember(|cache| *cache = LoaderCache::default());
    }
}

fn file_stem(relative: &str) -> &str {
    let name = relative.rsplit('/').next().unwrap_or(relative);
    name.strip_suffix(".json").unwrap_or(name)
}

impl WorldLoader for JsonWorldLoader {
    fn load_item(&self, id: &str) -> Result<Item, GameError> {
        if let Some(item) = self.cached(|cache| cache.items.get(id).cloned()) {
            debug!("Item cache hit: {}", id);
            return Ok(item);
        }

        let index = self.item_index()?;
        let relative = index
            .categories
            .values()
            .flatten()
            .find(|path| file_stem(path) == id)
            .ok_or_else(|| GameError::ItemNotFound(id.to_string()))?;

        let item = match self.load_item_file(relative) {
            Ok(item) => item,
            Err(GameError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GameError::ItemNotFound(id.to_string()));
            }
            Err(e) => return Err(e),
        };
        self.remember(|cache| {
            cache.items.insert(id.to_string(), item.clone());
        });
        Ok(item)
    }

    fn items_by_category(&self, category: &str) -> Result<Vec<Item>, GameError> {
        if let Some(items) = self.cached(|cache| cache.categories.get(category).cloned()) {
            debug!("Category cache hit: {}", category);
            return Ok(items);
        }

        let index = self.item_index()?;
        let Some(paths) = index.categories.get(category) else {
            return Ok(Vec::new());
        };
        let items = paths
            .iter()
            .map(|path| self.load_item(file_stem(path)))
            .collect::<Result<Vec<_>, _>>()?;

        self.remember(|cache| {
            cache.categories.insert(category.to_string(), items.clone());
        });
        Ok(items)
    }

    fn items_by_type(&self, item_type: ItemType) -> Result<Vec<Item>, GameError> {
        if let Some(items) = self.cached(|cache| cache.types.get(&item_type).cloned()) {
            debug!("Type cache hit: {}", item_type.as_str());
            return Ok(items);
        }

        let items: Vec<Item> = self
            .load_all_items()?
            .into_iter()
            .filter(|item| item.item_type == item_type)
            .collect();
        self.remember(|cache| {
            cache.types.insert(item_type, items.clone());
        });
        Ok(items)
    }

    fn load_all_items(&self) -> Result<Vec<Item>, GameError> {
        let index = self.item_index()?;
        index
            .categories
            .values()
            .flatten()
            .map(|path| self.load_item(file_stem(path)))
            .collect()
    }

    fn load_all_scenes(&self) -> Result<Vec<Scene>, GameError> {
        let dir = self.root.join("scenes");
        let index: SceneIndex = self.read_json(&dir.join("index.json"))?;
        index
            .scenes
            .iter()
            .map(|entry| {
                let file = if entry.ends_with(".json") {
                    entry.clone()
                } else {
                    format!("{}.json", entry)
                };
                let record: SceneRecord = self.read_json(&dir.join(file))?;
                Ok(record.into_scene())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, contents).expect("write");
    }

    fn sample_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path();
        write(
            root,
            "items/index.json",
            r#"{"categories": {"tools": ["tools/lamp.json"], "treasures": ["treasures/coin.json"]}, "total": 2}"#,
        );
        write(
            root,
            "items/tools/lamp.json",
            r#"{"id": "lamp", "name": "brass lamp", "type": "LIGHT_SOURCE", "portable": true,
                "weight": 5, "size": 8, "aliases": ["lantern"], "initialLocation": "west_of_house",
                "initialState": {"lit": false}}"#,
        );
        write(
            root,
            "items/treasures/coin.json",
            r#"{"id": "coin", "name": "gold coin", "type": "TREASURE", "portable": true,
                "weight": 1, "size": "TINY", "properties": {"depositValues": {"trophy_case": 22}, "value": 3}}"#,
        );
        write(root, "scenes/index.json", r#"{"scenes": ["west_of_house.json", "north_of_house"]}"#);
        write(
            root,
            "scenes/west_of_house.json",
            r#"{"id": "west_of_house", "title": "West of House", "description": "A white house.",
                "exits": {"north": "north_of_house",
                          "east": {"to": null, "blocked": true, "failureMessage": "The door is boarded."},
                          "up": {"to": "attic", "condition": "light_load", "failureMessage": "Too heavy."}},
                "items": ["coin", {"itemId": "mailbox", "visible": false}],
                "lighting": "daylight", "firstVisitPoints": 3}"#,
        );
        write(
            root,
            "scenes/north_of_house.json",
            r#"{"id": "north_of_house", "title": "North of House", "description": "North side."}"#,
        );
        dir
    }

    #[test]
    fn test_item_record_conversion() {
        let dir = sample_tree();
        let loader = JsonWorldLoader::new(dir.path());
        let lamp = loader.load_item("lamp").expect("lamp");
        assert_eq!(lamp.item_type, ItemType::LightSource);
        assert_eq!(lamp.size, ItemSize::Small);
        assert_eq!(lamp.initial_location.as_deref(), Some("west_of_house"));
        assert!(!lamp.state.get_bool("lit"));

        let coin = loader.load_item("coin").expect("coin");
        assert_eq!(coin.size, ItemSize::Tiny);
        assert_eq!(coin.properties.deposit_values.get("trophy_case"), Some(&22));
        assert_eq!(coin.properties.extra.get("value"), Some(&Value::from(3)));
    }

    #[test]
    fn test_missing_item_error_names_id() {
        let dir = sample_tree();
        let loader = JsonWorldLoader::new(dir.path());
        let err = loader.load_item("Nonexistent_Thing").unwrap_err();
        assert!(matches!(err, GameError::ItemNotFound(_)));
        assert!(err.to_string().contains("Nonexistent_Thing"));
    }

    #[test]
    fn test_failed_lookups_are_not_cached() {
        let dir = sample_tree();
        let loader = JsonWorldLoader::new(dir.path());
        write(
            dir.path(),
            "items/index.json",
            r#"{"categories": {"tools": ["tools/lamp.json", "tools/rope.json"]}}"#,
        );
        assert!(loader.load_item("rope").is_err());

        write(dir.path(), "items/tools/rope.json", r#"{"id": "rope", "name": "rope"}"#);
        assert_eq!(loader.load_item("rope").expect("rope now exists").name, "rope");
    }

    #[test]
    fn test_fractional_weights_round_to_whole_units() {
        assert_eq!(whole_weight("feather", 0.4), 0);
        assert_eq!(whole_weight("brick", 5.4), 5);
        assert_eq!(whole_weight("anvil", 29.5), 30);
        assert_eq!(whole_weight("balloon", -2.0), 0);
        assert_eq!(whole_weight("lamp", 5.0), 5);

        let dir = sample_tree();
        write(
            dir.path(),
            "items/index.json",
            r#"{"categories": {"tools": ["tools/feather.json"]}}"#,
        );
        write(
            dir.path(),
            "items/tools/feather.json",
            r#"{"id": "feather", "name": "feather", "portable": true, "weight": 0.4}"#,
        );
        let loader = JsonWorldLoader::new(dir.path());
        assert_eq!(loader.load_item("feather").expect("feather").weight, 0);
    }

    #[test]
    fn test_repeat_calls_are_equal() {
        let dir = sample_tree();
        let loader = JsonWorldLoader::new(dir.path());
        let first = loader.items_by_type(ItemType::Treasure).expect("first");
        let second = loader.items_by_type(ItemType::Treasure).expect("second");
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);

        assert_eq!(
            loader.items_by_category("tools").expect("tools"),
            loader.items_by_category("tools").expect("tools again")
        );
        assert!(loader.items_by_category("weapons").expect("none").is_empty());
    }

    #[test]
    fn test_scene_conversion() {
        let dir = sample_tree();
        let loader = JsonWorldLoader::new(dir.path());
        let scenes = loader.load_all_scenes().expect("scenes");
        assert_eq!(scenes.len(), 2);

        let west = &scenes[0];
        assert_eq!(west.first_visit_points, 3);
        assert_eq!(west.exits[&Direction::North].target, "north_of_house");
        assert_eq!(west.exits[&Direction::East].condition, Some(ExitCondition::Never));
        assert_eq!(
            west.exits[&Direction::East].failure_message.as_deref(),
            Some("The door is boarded.")
        );
        assert_eq!(west.exits[&Direction::Up].condition, Some(ExitCondition::LightLoad));
        assert_eq!(west.items.len(), 2);
        assert!(!west.items[1].visible);
    }

    #[test]
    fn test_world_load() {
        let dir = sample_tree();
        let loader = JsonWorldLoader::new(dir.path());
        let world = World::load(&loader).expect("world");
        assert_eq!(world.items.len(), 2);
        assert_eq!(world.scenes.len(), 2);
    }

    #[test]
    fn test_missing_index_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loader = JsonWorldLoader::new(dir.path());
        assert!(matches!(loader.load_all_items(), Err(GameError::Io(_))));
    }
}
