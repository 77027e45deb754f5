//! Command processor: the single entry point that turns a line of player
//! text into a state transition and a [`CommandResult`].
//!
//! Flow per command: parse, resolve targets against what the player can
//! reach, run every precondition, mutate the state, ask the scoring service
//! for points, then count the move. Nothing here panics on bad input; every
//! player mistake becomes a failed result.

use log::{debug, error};
use serde::Serialize;

use crate::config::GameConfig;
use crate::game::collaborators::{Combat, MemoryPersistence, NoCombat, Persistence};
use crate::game::errors::GameError;
use crate::game::interactions::{active_interaction, apply_effects, find_interaction};
use crate::game::inventory::InventoryService;
use crate::game::items::{ItemFailure, ItemService};
use crate::game::parser::{parse, Command, ParseError};
use crate::game::resolver::{normalize_phrase, phrase_names_item, VisibleSet};
use crate::game::scene::{MoveOutcome, SceneService};
use crate::game::scoring::ScoringService;
use crate::game::state::GameState;
use crate::game::types::{Direction, Interaction, World};
use crate::logutil::{escape_log, summarize_result};

/// Outcome of one processed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    pub score_change: i32,
    pub counts_as_move: bool,
}

impl CommandResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            score_change: 0,
            counts_as_move: false,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            score_change: 0,
            counts_as_move: false,
        }
    }

    fn with_score(mut self, points: i32) -> Self {
        self.score_change = points;
        self
    }

    fn as_move(mut self) -> Self {
        self.counts_as_move = true;
        self
    }
}

type Handled = Result<CommandResult, GameError>;

/// Turn a refused item operation into a failed result; internal errors
/// keep propagating.
fn refused(failure: ItemFailure) -> Handled {
    match failure {
        ItemFailure::Refused(refusal) => {
            debug!("Refused ({:?}): {}", refusal.kind, refusal.message);
            Ok(CommandResult::fail(refusal.message))
        }
        ItemFailure::Internal(err) => Err(err),
    }
}

fn not_found(phrase: &str) -> CommandResult {
    CommandResult::fail(format!(
        "Not found: there is no \"{}\" here.",
        normalize_phrase(phrase)
    ))
}

fn not_carried(phrase: &str) -> CommandResult {
    CommandResult::fail(format!(
        "Not found: you don't have any \"{}\".",
        normalize_phrase(phrase)
    ))
}

fn join_names(state: &GameState, ids: &[String]) -> String {
    ids.iter()
        .filter_map(|id| state.item(id).map(|item| item.name.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct CommandProcessor {
    state: GameState,
    scenes: SceneService,
    items: ItemService,
    inventory: InventoryService,
    scoring: ScoringService,
    persistence: Box<dyn Persistence>,
    combat: Box<dyn Combat>,
}

impl CommandProcessor {
    pub fn new(state: GameState, config: &GameConfig) -> Self {
        let inventory = InventoryService::from_config(config);
        Self {
            state,
            scenes: SceneService::new(inventory.clone()),
            items: ItemService::new(),
            inventory,
            scoring: ScoringService::from_config(config),
            persistence: Box::new(MemoryPersistence::new()),
            combat: Box::new(NoCombat),
        }
    }

    /// Build fresh state from loaded world data.
    pub fn from_world(world: World, config: &GameConfig) -> Result<Self, GameError> {
        let state = GameState::new(world, &config.starting_scene)?;
        Ok(Self::new(state, config))
    }

    pub fn with_collaborators(
        mut self,
        persistence: Box<dyn Persistence>,
        combat: Box<dyn Combat>,
    ) -> Self {
        self.persistence = persistence;
        self.combat = combat;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for harnesses that set up scenarios.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn inventory_service(&self) -> &InventoryService {
        &self.inventory
    }

    pub fn scene_service(&self) -> &SceneService {
        &self.scenes
    }

    pub fn item_service(&self) -> &ItemService {
        &self.items
    }

    pub fn scoring_service(&self) -> &ScoringService {
        &self.scoring
    }

    /// Process one line of player input.
    pub fn process(&mut self, text: &str) -> CommandResult {
        debug!("Processing '{}' in {}", escape_log(text), self.state.current_scene_id());

        let result = match parse(text) {
            Ok(command) => self.dispatch(command),
            Err(ParseError::UnknownVerb { verb, phrase }) => {
                debug!("Unknown verb '{}'; trying interactions", escape_log(&verb));
                self.handle_interaction(&phrase)
            }
            Err(err) => CommandResult::fail(err.to_string()),
        };

        if result.counts_as_move {
            self.state.increment_moves();
        }

        debug_assert!(
            self.state.check_invariants().is_empty(),
            "state invariants broken after '{}': {:?}",
            text,
            self.state.check_invariants()
        );
        debug!("Result: {}", summarize_result(&result));
        result
    }

    fn dispatch(&mut self, command: Command) -> CommandResult {
        let verb = command.verb();
        let handled = match command {
            Command::Look => self.handle_look(),
            Command::Examine(target) => self.handle_examine(&target),
            Command::Take(target) => self.handle_take(&target),
            Command::TakeFrom { item, container } => self.handle_take_from(&item, &container),
            Command::Drop(target) => self.handle_drop(&target),
            Command::Put { item, container } => self.handle_put(&item, &container),
            Command::Open(target) => self.handle_open(&target),
            Command::Close(target) => self.handle_close(&target),
            Command::Read(target) => self.handle_read(&target),
            Command::Inventory => Ok(CommandResult::ok(self.inventory.format_inventory(&self.state))),
            Command::Go(direction) => self.handle_go(direction),
            Command::Score => Ok(self.handle_score()),
            Command::Save => Ok(self.handle_save()),
            Command::Restore => Ok(self.handle_restore()),
            Command::Attack { target, weapon } => self.handle_attack(&target, weapon.as_deref()),
            Command::Interact(phrase) => Ok(self.handle_interaction(&phrase)),
        };

        handled.unwrap_or_else(|err| {
            error!("Internal error while handling {}: {}", verb, err);
            CommandResult::fail(format!("Something went wrong: {}", err))
        })
    }

    // ------------------------------------------------------------------
    // Scene description
    // ------------------------------------------------------------------

    /// Describe the current scene, awarding the first-visit bonus and marking
    /// it visited when this is the first time.
    fn enter_scene(&mut self) -> Result<(String, i32), GameError> {
        let scene_id = self.state.current_scene_id().to_string();
        let description = self.scenes.get_scene_description(&self.state, &scene_id)?;

        let mut points = 0;
        if !self.state.is_visited(&scene_id) {
            points = self.scoring.on_first_visit(&mut self.state, &scene_id);
            self.state.mark_visited(&scene_id)?;
        }
        Ok((self.describe_scene(&scene_id, description), points))
    }

    fn describe_scene(&self, scene_id: &str, description: String) -> String {
        let state = &self.state;
        let Some(scene) = state.scene(scene_id) else {
            return description;
        };
        let mut lines = vec![scene.title.clone(), description];

        let visible = self.scenes.visible_scene_items(state, scene_id);
        if !visible.is_empty() {
            lines.push(format!("You see: {}.", join_names(state, &visible)));
        }
        for id in &visible {
            let Some(item) = state.item(id) else {
                continue;
            };
            if item.is_container() && item.state.open && !item.state.contents.is_empty() {
                lines.push(format!(
                    "The {} contains: {}.",
                    item.name,
                    join_names(state, &item.state.contents)
                ));
            }
        }

        let monsters = self.combat.monsters_in_scene(state, scene_id);
        if !monsters.is_empty() {
            lines.push(format!("Also here: {}.", monsters.join(", ")));
        }

        let exits: Vec<&str> = self
            .scenes
            .get_exits(state, scene_id)
            .iter()
            .map(|(direction, _)| direction.as_str())
            .collect();
        if exits.is_empty() {
            lines.push("There are no obvious exits.".to_string());
        } else {
            lines.push(format!("Exits: {}.", exits.join(", ")));
        }

        if !scene.atmosphere.is_empty() {
            let pick = state.moves() as usize % scene.atmosphere.len();
            lines.push(scene.atmosphere[pick].clone());
        }
        lines.join("\n")
    }

    /// Handle LOOK command - describe the current scene
    fn handle_look(&mut self) -> Handled {
        let (message, points) = self.enter_scene()?;
        Ok(CommandResult::ok(message).with_score(points))
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Handle EXAMINE command - show an item's details
    fn handle_examine(&mut self, phrase: &str) -> Handled {
        let visible = VisibleSet::gather(&self.state);
        let Some(item_id) = visible.resolve(&self.state, phrase) else {
            return Ok(not_found(phrase));
        };
        let item = self
            .state
            .item(&item_id)
            .ok_or_else(|| GameError::ItemNotFound(item_id.clone()))?;

        let mut text = match active_interaction(&self.state, item, "examine") {
            Some(interaction) => interaction.message.clone(),
            None => item
                .examine_text
                .clone()
                .unwrap_or_else(|| item.description.clone()),
        };

        if item.is_container() {
            let detail = if !item.state.open {
                format!("The {} is closed.", item.name)
            } else if item.state.contents.is_empty() {
                format!("The {} is empty.", item.name)
            } else {
                format!(
                    "The {} contains: {}.",
                    item.name,
                    join_names(&self.state, &item.state.contents)
                )
            };
            text.push('\n');
            text.push_str(&detail);
        }
        Ok(CommandResult::ok(text))
    }

    /// Handle READ command - show written text
    fn handle_read(&mut self, phrase: &str) -> Handled {
        let visible = VisibleSet::gather(&self.state);
        let Some(item_id) = visible.resolve(&self.state, phrase) else {
            return Ok(not_found(phrase));
        };
        let item = self
            .state
            .item(&item_id)
            .ok_or_else(|| GameError::ItemNotFound(item_id.clone()))?;

        if let Some(interaction) = active_interaction(&self.state, item, "read") {
            return Ok(CommandResult::ok(interaction.message.clone()));
        }
        match &item.properties.read_text {
            Some(text) => Ok(CommandResult::ok(text.clone())),
            None => Ok(CommandResult::fail(format!(
                "There's nothing written on the {}.",
                item.name
            ))),
        }
    }

    fn handle_score(&self) -> CommandResult {
        CommandResult::ok(format!(
            "Your score is {} (out of {} points), in {} moves.",
            self.state.score(),
            self.state.max_score(),
            self.state.moves()
        ))
    }

    // ------------------------------------------------------------------
    // Item handling
    // ------------------------------------------------------------------

    /// Handle TAKE command - pick up a reachable item
    fn handle_take(&mut self, phrase: &str) -> Handled {
        let visible = VisibleSet::gather(&self.state);
        let Some(item_id) = visible.resolve(&self.state, phrase) else {
            return Ok(not_found(phrase));
        };

        let custom = self
            .state
            .item(&item_id)
            .and_then(|item| active_interaction(&self.state, item, "take"))
            .cloned();

        if let Err(failure) = self.items.take(&mut self.state, &item_id, &visible) {
            return refused(failure);
        }
        let points = self.scoring.on_take(&mut self.state, &item_id);

        let message = match custom {
            Some(interaction) => {
                apply_effects(&mut self.state, &item_id, &interaction);
                interaction.message
            }
            None => "Taken.".to_string(),
        };
        Ok(CommandResult::ok(message).with_score(points).as_move())
    }

    /// Handle TAKE ... FROM command - remove an item from a container
    fn handle_take_from(&mut self, item_phrase: &str, container_phrase: &str) -> Handled {
        let visible = VisibleSet::gather(&self.state);
        let Some(container_id) = visible.resolve(&self.state, container_phrase) else {
            return Ok(not_found(container_phrase));
        };
        let container = self
            .state
            .item(&container_id)
            .ok_or_else(|| GameError::ItemNotFound(container_id.clone()))?;

        if !container.is_container() {
            return Ok(CommandResult::fail(format!(
                "The {} can't hold anything.",
                container.name
            )));
        }
        if !container.state.open {
            return Ok(CommandResult::fail(format!("The {} is closed.", container.name)));
        }

        let found = container
            .state
            .contents
            .iter()
            .find(|id| {
                self.state
                    .item(id)
                    .map(|item| phrase_names_item(item, item_phrase))
                    .unwrap_or(false)
            })
            .cloned();
        let Some(item_id) = found else {
            return Ok(CommandResult::fail(format!(
                "There is no \"{}\" in the {}.",
                normalize_phrase(item_phrase),
                container.name
            )));
        };

        if let Err(failure) = self.items.take_from(&mut self.state, &item_id, &container_id) {
            return refused(failure);
        }
        let points = self.scoring.on_take(&mut self.state, &item_id);
        Ok(CommandResult::ok("Taken.").with_score(points).as_move())
    }

    /// Find a carried item by phrase.
    fn carried(&self, phrase: &str) -> Option<String> {
        self.state
            .inventory()
            .iter()
            .find(|id| {
                self.state
                    .item(id)
                    .map(|item| phrase_names_item(item, phrase))
                    .unwrap_or(false)
            })
            .cloned()
    }

    /// Message for an item the player named but is not holding.
    fn not_holding(&self, phrase: &str) -> CommandResult {
        let visible = VisibleSet::gather(&self.state);
        match visible
            .resolve(&self.state, phrase)
            .and_then(|id| self.state.item(&id))
        {
            Some(item) => CommandResult::fail(format!("You don't have the {}.", item.name)),
            None => not_carried(phrase),
        }
    }

    /// Handle DROP command - leave a carried item in the scene
    fn handle_drop(&mut self, phrase: &str) -> Handled {
        let Some(item_id) = self.carried(phrase) else {
            return Ok(self.not_holding(phrase));
        };
        if let Err(failure) = self.items.drop(&mut self.state, &item_id) {
            return refused(failure);
        }
        Ok(CommandResult::ok("Dropped.").as_move())
    }

    /// Handle PUT command - place a carried item in a container
    fn handle_put(&mut self, item_phrase: &str, container_phrase: &str) -> Handled {
        let Some(item_id) = self.carried(item_phrase) else {
            return Ok(self.not_holding(item_phrase));
        };
        let visible = VisibleSet::gather(&self.state);
        let Some(container_id) = visible.resolve(&self.state, container_phrase) else {
            return Ok(not_found(container_phrase));
        };

        if let Err(failure) = self.items.put(&mut self.state, &item_id, &container_id) {
            return refused(failure);
        }
        let points = self.scoring.on_deposit(&mut self.state, &item_id, &container_id);

        let message = match (self.state.item(&item_id), self.state.item(&container_id)) {
            (Some(item), Some(container)) => {
                format!("You put the {} in the {}.", item.name, container.name)
            }
            _ => "Done.".to_string(),
        };
        Ok(CommandResult::ok(message).with_score(points).as_move())
    }

    /// Handle OPEN command - open a container or other openable item
    fn handle_open(&mut self, phrase: &str) -> Handled {
        let visible = VisibleSet::gather(&self.state);
        let Some(item_id) = visible.resolve(&self.state, phrase) else {
            return Ok(not_found(phrase));
        };
        let item = self
            .state
            .item(&item_id)
            .ok_or_else(|| GameError::ItemNotFound(item_id.clone()))?;
        let custom = active_interaction(&self.state, item, "open").cloned();

        if !item.is_openable() {
            return Ok(match custom {
                Some(interaction) => self.run_interaction(&item_id, interaction),
                None => CommandResult::fail(format!("You can't open the {}.", item.name)),
            });
        }

        let opened = match self.items.open(&mut self.state, &item_id) {
            Ok(opened) => opened,
            Err(failure) => return refused(failure),
        };

        let message = match custom {
            Some(interaction) => {
                apply_effects(&mut self.state, &item_id, &interaction);
                interaction.message
            }
            None if opened.revealed.is_empty() => "Opened.".to_string(),
            None => {
                let name = self
                    .state
                    .item(&item_id)
                    .map(|item| item.name.clone())
                    .unwrap_or_default();
                format!(
                    "Opening the {} reveals: {}.",
                    name,
                    join_names(&self.state, &opened.revealed)
                )
            }
        };
        Ok(CommandResult::ok(message).as_move())
    }

    /// Handle CLOSE command
    fn handle_close(&mut self, phrase: &str) -> Handled {
        let visible = VisibleSet::gather(&self.state);
        let Some(item_id) = visible.resolve(&self.state, phrase) else {
            return Ok(not_found(phrase));
        };
        let item = self
            .state
            .item(&item_id)
            .ok_or_else(|| GameError::ItemNotFound(item_id.clone()))?;
        let custom = active_interaction(&self.state, item, "close").cloned();

        if !item.is_openable() {
            return Ok(match custom {
                Some(interaction) => self.run_interaction(&item_id, interaction),
                None => CommandResult::fail(format!("You can't close the {}.", item.name)),
            });
        }

        if let Err(failure) = self.items.close(&mut self.state, &item_id) {
            return refused(failure);
        }
        let message = match custom {
            Some(interaction) => {
                apply_effects(&mut self.state, &item_id, &interaction);
                interaction.message
            }
            None => "Closed.".to_string(),
        };
        Ok(CommandResult::ok(message).as_move())
    }

    // ------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------

    /// Handle movement - every attempt costs a move, blocked or not
    fn handle_go(&mut self, direction: Direction) -> Handled {
        let result = match self.scenes.move_player(&mut self.state, direction)? {
            MoveOutcome::Moved { .. } => {
                let (message, points) = self.enter_scene()?;
                CommandResult::ok(message).with_score(points)
            }
            MoveOutcome::Blocked { message } => CommandResult::fail(message),
            MoveOutcome::NoExit { .. } => CommandResult::fail("You can't go that way."),
        };
        Ok(result.as_move())
    }

    // ------------------------------------------------------------------
    // Collaborators
    // ------------------------------------------------------------------

    fn handle_save(&mut self) -> CommandResult {
        self.persistence.save_game(&self.state);
        CommandResult::ok("Game saved.")
    }

    fn handle_restore(&mut self) -> CommandResult {
        match self.persistence.restore_game() {
            Some(saved) => {
                self.state = saved;
                CommandResult::ok("Game restored.")
            }
            None => CommandResult::fail(format!("Cannot restore: {}.", GameError::NoSavedGame)),
        }
    }

    /// Handle ATTACK command - delegate to the combat collaborator
    fn handle_attack(&mut self, target: &str, weapon: Option<&str>) -> Handled {
        let weapon_id = match weapon {
            Some(phrase) => match self.carried(phrase) {
                Some(id) => Some(id),
                None => return Ok(self.not_holding(phrase)),
            },
            None => None,
        };
        let target = normalize_phrase(target);
        let outcome = self
            .combat
            .attack(&mut self.state, &target, weapon_id.as_deref());
        if outcome.resolved {
            Ok(CommandResult::ok(outcome.message).as_move())
        } else {
            Ok(CommandResult::fail(outcome.message))
        }
    }

    // ------------------------------------------------------------------
    // Interactions
    // ------------------------------------------------------------------

    fn run_interaction(&mut self, item_id: &str, interaction: Interaction) -> CommandResult {
        apply_effects(&mut self.state, item_id, &interaction);
        CommandResult::ok(interaction.message).as_move()
    }

    /// Match a phrase outside the grammar (`turn on lamp`) against item
    /// interactions. No match is an unknown command.
    fn handle_interaction(&mut self, phrase: &str) -> CommandResult {
        let visible = VisibleSet::gather(&self.state);
        match find_interaction(&self.state, &visible, phrase) {
            Some(found) => self.run_interaction(&found.item_id, found.interaction),
            None => CommandResult::fail(format!("Unknown command: '{}'", phrase)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Exit, ExitCondition, Item, Scene};

    fn processor() -> CommandProcessor {
        let world = World::new()
            .with_scene(
                Scene::new("living_room", "Living Room", "You are in the living room.")
                    .with_points(5)
                    .with_exit(Direction::East, Exit::to("kitchen"))
                    .with_exit(
                        Direction::Down,
                        Exit::to("cellar").when(ExitCondition::Flag("rug_moved".to_string()), "The floor is solid."),
                    )
                    .with_item("trophy_case")
                    .with_item("rug")
                    .with_atmosphere("A clock ticks."),
            )
            .with_scene(Scene::new("kitchen", "Kitchen", "A kitchen.").with_points(10))
            .with_scene(Scene::new("cellar", "Cellar", "A cellar."))
            .with_item(Item::new("trophy_case", "trophy case").container(false))
            .with_item(
                Item::new("coin", "gold coin")
                    .with_alias("coin")
                    .portable(1)
                    .treasure(10)
                    .with_deposit_value("trophy_case", 22)
                    .starting_in("inventory"),
            )
            .with_item(Item::new("rug", "oriental rug").with_alias("rug").with_interaction(Interaction {
                command: "move".to_string(),
                message: "You move the rug, revealing a trap door.".to_string(),
                conditions: vec!["!rug_moved".to_string()],
                effects: vec!["flag.rug_moved = true".to_string()],
            }));
        CommandProcessor::from_world(world, &GameConfig::default().with_starting_scene("living_room"))
            .expect("processor")
    }

    #[test]
    fn test_put_coin_in_open_case_scores_once() {
        let mut game = processor();
        assert!(game.process("open trophy case").success);

        let result = game.process("put coin in trophy case");
        assert!(result.success, "{}", result.message);
        assert_eq!(result.score_change, 22);
        assert!(result.counts_as_move);
        assert_eq!(game.state().contents_of("trophy_case"), ["coin".to_string()]);
        assert!(!game.state().is_in_inventory("coin"));

        assert!(game.process("take coin from trophy case").success);
        let again = game.process("put coin in case");
        assert!(!again.success, "'case' is not an alias");
        let again = game.process("put coin in trophy_case");
        assert_eq!(again.score_change, 0);
        assert_eq!(game.state().score(), 22);
    }

    #[test]
    fn test_put_into_closed_case_fails() {
        let mut game = processor();
        let result = game.process("put coin in trophy case");
        assert!(!result.success);
        assert!(result.message.to_lowercase().contains("closed"));
        assert!(!result.counts_as_move);
        assert!(game.state().is_in_inventory("coin"));
        assert_eq!(game.state().moves(), 0);
    }

    #[test]
    fn test_not_found_echoes_target() {
        let mut game = processor();
        let result = game.process("take Nonexistent_Item_XYZ");
        assert!(!result.success);
        let lower = result.message.to_lowercase();
        assert!(lower.contains("nonexistent_item_xyz"));
        assert!(lower.contains("not found"));
    }

    #[test]
    fn test_first_look_awards_bonus_once() {
        let mut game = processor();
        let first = game.process("look");
        assert_eq!(first.score_change, 5);
        assert!(!first.counts_as_move);
        assert!(first.message.contains("Exits: east."));
        assert!(first.message.contains("A clock ticks."));
        assert_eq!(game.process("l").score_change, 0);
        assert!(game.state().is_visited("living_room"));
    }

    #[test]
    fn test_movement_counts_every_attempt() {
        let mut game = processor();
        let blocked = game.process("down");
        assert!(!blocked.success);
        assert_eq!(blocked.message, "The floor is solid.");
        assert!(blocked.counts_as_move);

        let nowhere = game.process("go west");
        assert!(!nowhere.success);
        assert!(nowhere.counts_as_move);

        let moved = game.process("e");
        assert!(moved.success);
        assert_eq!(moved.score_change, 10);
        assert_eq!(game.state().current_scene_id(), "kitchen");
        assert_eq!(game.state().moves(), 3);

        let bad = game.process("go");
        assert!(!bad.counts_as_move);
        assert_eq!(game.state().moves(), 3);
    }

    #[test]
    fn test_interaction_opens_exit() {
        let mut game = processor();
        let result = game.process("move rug");
        assert!(result.success);
        assert!(result.counts_as_move);
        assert!(game.state().flag("rug_moved"));
        assert!(game.process("down").success);
        assert_eq!(game.state().current_scene_id(), "cellar");
    }

    #[test]
    fn test_unknown_verb() {
        let mut game = processor();
        let result = game.process("xyzzy");
        assert!(!result.success);
        assert!(result.message.contains("Unknown command"));
        assert!(!result.counts_as_move);
    }

    #[test]
    fn test_save_and_restore() {
        let mut game = processor();
        assert!(!game.process("restore").success);
        assert!(game.process("save").success);
        game.process("drop coin");
        assert!(!game.state().is_in_inventory("coin"));
        assert!(game.process("restore").success);
        assert!(game.state().is_in_inventory("coin"));
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = serde_json::to_value(CommandResult::ok("Taken.").as_move()).expect("json");
        assert_eq!(json["countsAsMove"], true);
        assert_eq!(json["scoreChange"], 0);
    }
}
