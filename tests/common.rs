//! Test utilities & fixtures.
//!
//! `world()` builds a small in-code world around the white house:
//!
//! ```text
//! west_of_house --north--> north_of_house --east (window open)--> kitchen
//! kitchen --west--> living_room --down (rug moved)--> cellar
//! kitchen --up (light load)--> attic
//! ```
//!
//! Treasures: `coin` in the attic (22 points in the trophy case) and
//! `diamond` in the cellar (10 treasure points). First visits: kitchen 10,
//! cellar 25.

use std::path::{Path, PathBuf};

use zorkcore::config::GameConfig;
use zorkcore::game::{
    CommandProcessor, Direction, Exit, ExitCondition, Interaction, Item, ItemLocation, ItemType,
    Lighting, Scene, World,
};

#[allow(dead_code)]
pub const CHIMNEY_MESSAGE: &str = "The chimney is too narrow for you and all of your baggage.";

#[allow(dead_code)]
pub fn world() -> World {
    World::new()
        .with_scene(
            Scene::new("west_of_house", "West of House", "You are standing in an open field west of a white house.")
                .with_first_visit(
                    "Welcome! You are standing in an open field west of a white house, with a boarded front door.",
                    0,
                )
                .with_exit(Direction::North, Exit::to("north_of_house"))
                .with_exit(
                    Direction::East,
                    Exit::to("west_of_house").when(ExitCondition::Never, "The door is boarded and you can't remove the boards."),
                )
                .with_item("mailbox")
                .with_atmosphere("A breeze rustles the grass."),
        )
        .with_scene(
            Scene::new("north_of_house", "North of House", "You are facing the north side of a white house.")
                .with_exit(Direction::South, Exit::to("west_of_house"))
                .with_exit(
                    Direction::East,
                    Exit::to("kitchen").when(ExitCondition::ItemOpen("window".to_string()), "The window is closed."),
                )
                .with_item("window"),
        )
        .with_scene(
            Scene::new("kitchen", "Kitchen", "You are in the kitchen of the white house.")
                .with_points(10)
                .with_exit(Direction::West, Exit::to("living_room"))
                .with_exit(Direction::Out, Exit::to("north_of_house"))
                .with_exit(
                    Direction::Up,
                    Exit::to("attic").when(ExitCondition::LightLoad, CHIMNEY_MESSAGE),
                )
                .with_item("sack")
                .with_item("anvil"),
        )
        .with_scene(
            Scene::new("living_room", "Living Room", "You are in the living room.")
                .with_exit(Direction::East, Exit::to("kitchen"))
                .with_exit(
                    Direction::Down,
                    Exit::to("cellar").when(
                        ExitCondition::Flag("rug_moved".to_string()),
                        "You can't go that way.",
                    ),
                )
                .with_item("trophy_case")
                .with_item("lamp")
                .with_item("rug")
                .with_item("sword"),
        )
        .with_scene(
            Scene::new("cellar", "Cellar", "You are in a dark and damp cellar.")
                .with_points(25)
                .with_lighting(Lighting::Dark)
                .with_monster("troll")
                .with_exit(Direction::Up, Exit::to("living_room"))
                .with_item("diamond"),
        )
        .with_scene(
            Scene::new("attic", "Attic", "This is the attic.")
                .with_exit(Direction::Down, Exit::to("kitchen"))
                .with_item("coin")
                .with_item("rope"),
        )
        .with_item(Item::new("mailbox", "small mailbox").with_alias("mailbox").container(false))
        .with_item(
            Item::new("leaflet", "leaflet")
                .with_alias("mail")
                .portable(1)
                .with_read_text("WELCOME TO ZORK!")
                .starting_in("mailbox"),
        )
        .with_item({
            let mut window = Item::new("window", "kitchen window").with_alias("window");
            window.tags.push("openable".to_string());
            window
        })
        .with_item(
            Item::new("sack", "brown sack")
                .with_alias("sack")
                .portable(3)
                .container(true),
        )
        .with_item(Item::new("garlic", "clove of garlic").with_alias("garlic").portable(1).starting_in("sack"))
        .with_item(Item::new("anvil", "iron anvil").with_alias("anvil").portable(30))
        .with_item(Item::new("trophy_case", "trophy case").container(false))
        .with_item(
            Item::new("lamp", "brass lantern")
                .with_alias("lamp")
                .with_alias("lantern")
                .portable(5)
                .with_type(ItemType::LightSource)
                .with_interaction(Interaction {
                    command: "turn on".to_string(),
                    message: "The brass lantern is now on.".to_string(),
                    conditions: vec!["!state.lit".to_string()],
                    effects: vec!["state.lit = true".to_string()],
                })
                .with_interaction(Interaction {
                    command: "examine".to_string(),
                    message: "The lamp is glowing brightly.".to_string(),
                    conditions: vec!["state.lit".to_string()],
                    effects: vec![],
                }),
        )
        .with_item(
            Item::new("rug", "oriental rug")
                .with_alias("rug")
                .with_alias("carpet")
                .with_interaction(Interaction {
                    command: "move".to_string(),
                    message: "With a great effort, the rug is moved to one side, revealing a trap door.".to_string(),
                    conditions: vec!["!rug_moved".to_string()],
                    effects: vec!["flag.rug_moved = true".to_string()],
                }),
        )
        .with_item(Item::new("sword", "elvish sword").with_alias("sword").portable(10).with_type(ItemType::Weapon))
        .with_item(
            Item::new("coin", "gold coin")
                .with_alias("coin")
                .portable(1)
                .treasure(10)
                .with_deposit_value("trophy_case", 22),
        )
        .with_item(Item::new("rope", "rope").portable(4))
        .with_item(Item::new("diamond", "huge diamond").with_alias("diamond").portable(2).treasure(10))
}

/// Fresh game at the west of the house.
#[allow(dead_code)]
pub fn game() -> CommandProcessor {
    CommandProcessor::from_world(world(), &GameConfig::default()).expect("fixture world")
}

/// Fresh game with the player placed in `scene_id`.
#[allow(dead_code)]
pub fn game_in(scene_id: &str) -> CommandProcessor {
    let mut game = game();
    game.state_mut().set_current_scene(scene_id).expect("scene");
    game
}

/// Put an item straight into the player's hands.
#[allow(dead_code)]
pub fn give(game: &mut CommandProcessor, item_id: &str) {
    game.state_mut()
        .relocate(item_id, ItemLocation::Inventory)
        .expect("give item");
}

/// JSON copy of a slice of the same world, for loader tests.
#[allow(dead_code)]
pub fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("world")
}
