//! Item and container operations.
//!
//! Each operation checks every precondition first and only then relocates
//! or flips state, so a refusal never leaves a partial change behind.
//!
//! Container state machine: `{closed, open} x {empty, non-empty}`.
//! - `open`: closed -> open; refused when already open or still locked
//! - `close`: open -> closed; refused when already closed
//! - `put`: only while open, subject to capacity
//! - `take_from`: only while open, and only for items actually inside

use log::debug;

use crate::game::errors::{FailureKind, GameError, Refusal};
use crate::game::resolver::VisibleSet;
use crate::game::state::GameState;
use crate::game::types::{Item, ItemLocation};

/// Outcome of a successful operation, or why it was refused.
pub type ItemResult<T> = Result<T, ItemFailure>;

#[derive(Debug)]
pub enum ItemFailure {
    Refused(Refusal),
    Internal(GameError),
}

impl From<GameError> for ItemFailure {
    fn from(err: GameError) -> Self {
        ItemFailure::Internal(err)
    }
}

impl From<Refusal> for ItemFailure {
    fn from(refusal: Refusal) -> Self {
        ItemFailure::Refused(refusal)
    }
}

fn refuse<T>(kind: FailureKind, message: impl Into<String>) -> ItemResult<T> {
    Err(ItemFailure::Refused(Refusal::new(kind, message)))
}

/// What opening a container exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opened {
    pub revealed: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ItemService;

impl ItemService {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a phrase against the items the player can reach right now.
    pub fn resolve(&self, state: &GameState, phrase: &str, visible: &VisibleSet) -> Option<String> {
        visible.resolve(state, phrase)
    }

    fn item<'a>(&self, state: &'a GameState, item_id: &str) -> ItemResult<&'a Item> {
        state
            .item(item_id)
            .ok_or_else(|| ItemFailure::Internal(GameError::ItemNotFound(item_id.to_string())))
    }

    /// Pick up a reachable item. Weight never blocks taking.
    pub fn take(&self, state: &mut GameState, item_id: &str, visible: &VisibleSet) -> ItemResult<()> {
        let item = self.item(state, item_id)?;
        if state.is_in_inventory(item_id) {
            return refuse(
                FailureKind::AlreadyCarrying,
                format!("You already have the {}.", item.name),
            );
        }
        if !visible.contains(item_id) {
            return refuse(
                FailureKind::NotFound,
                format!("Not found: there is no \"{}\" here.", item.name),
            );
        }
        if !item.is_portable() {
            return refuse(
                FailureKind::NotPortable,
                format!("You can't take the {}. It is fixed in place.", item.name),
            );
        }
        if let ItemLocation::Container(container_id) = &item.location {
            self.ensure_open(state, container_id)?;
        }

        state.relocate(item_id, ItemLocation::Inventory)?;
        debug!("Took {}", item_id);
        Ok(())
    }

    /// Take an item out of a specific container.
    pub fn take_from(&self, state: &mut GameState, item_id: &str, container_id: &str) -> ItemResult<()> {
        let container = self.item(state, container_id)?;
        if !container.is_container() {
            return refuse(
                FailureKind::NotContainer,
                format!("The {} can't hold anything.", container.name),
            );
        }
        self.ensure_open(state, container_id)?;

        let item = self.item(state, item_id)?;
        if item.location != ItemLocation::Container(container_id.to_string()) {
            return refuse(
                FailureKind::NotInContainer,
                format!("The {} is not in the {}.", item.name, container.name),
            );
        }
        if !item.is_portable() {
            return refuse(
                FailureKind::NotPortable,
                format!("You can't take the {}. It is fixed in place.", item.name),
            );
        }

        state.relocate(item_id, ItemLocation::Inventory)?;
        debug!("Took {} from {}", item_id, container_id);
        Ok(())
    }

    /// Drop a carried item into the current scene.
    pub fn drop(&self, state: &mut GameState, item_id: &str) -> ItemResult<()> {
        let item = self.item(state, item_id)?;
        if !state.is_in_inventory(item_id) {
            return refuse(
                FailureKind::NotCarrying,
                format!("You don't have the {}.", item.name),
            );
        }
        let scene_id = state.current_scene_id().to_string();
        state.relocate(item_id, ItemLocation::Scene(scene_id))?;
        debug!("Dropped {}", item_id);
        Ok(())
    }

    /// Put a carried item into an open container.
    pub fn put(&self, state: &mut GameState, item_id: &str, container_id: &str) -> ItemResult<()> {
        let item = self.item(state, item_id)?;
        let container = self.item(state, container_id)?;
        if !state.is_in_inventory(item_id) {
            return refuse(
                FailureKind::NotCarrying,
                format!("You don't have the {}.", item.name),
            );
        }
        if !container.is_container() {
            return refuse(
                FailureKind::NotContainer,
                format!("You can't put things in the {}.", container.name),
            );
        }
        if state.encloses(item_id, container_id) {
            return refuse(
                FailureKind::Unsupported,
                format!("You can't put the {} inside itself.", item.name),
            );
        }
        self.ensure_open(state, container_id)?;
        if let Some(capacity) = container.properties.capacity {
            let used = self.used_capacity(state, container_id);
            if used + item.size.capacity_units() > capacity {
                return refuse(
                    FailureKind::NoRoom,
                    format!("There's no room in the {} for the {}.", container.name, item.name),
                );
            }
        }

        state.relocate(item_id, ItemLocation::Container(container_id.to_string()))?;
        debug!("Put {} in {}", item_id, container_id);
        Ok(())
    }

    /// Open a container or other openable item, unlocking it first when the
    /// unlock requirement is met.
    pub fn open(&self, state: &mut GameState, item_id: &str) -> ItemResult<Opened> {
        let item = self.item(state, item_id)?;
        if !item.is_openable() {
            return refuse(
                FailureKind::NotOpenable,
                format!("You can't open the {}.", item.name),
            );
        }
        if item.state.open {
            return refuse(
                FailureKind::AlreadyOpen,
                format!("The {} is already open.", item.name),
            );
        }
        if item.state.locked && !self.can_unlock(state, item) {
            return refuse(FailureKind::Locked, format!("The {} is locked.", item.name));
        }

        let revealed = item.state.contents.clone();
        if let Some(item) = state.item_mut(item_id) {
            item.state.locked = false;
            item.state.open = true;
        }
        debug!("Opened {} revealing {:?}", item_id, revealed);
        Ok(Opened { revealed })
    }

    pub fn close(&self, state: &mut GameState, item_id: &str) -> ItemResult<()> {
        let item = self.item(state, item_id)?;
        if !item.is_openable() {
            return refuse(
                FailureKind::NotOpenable,
                format!("You can't close the {}.", item.name),
            );
        }
        if !item.state.open {
            return refuse(
                FailureKind::AlreadyClosed,
                format!("The {} is already closed.", item.name),
            );
        }
        if let Some(item) = state.item_mut(item_id) {
            item.state.open = false;
        }
        debug!("Closed {}", item_id);
        Ok(())
    }

    /// Contents of a container; empty for unknown ids and empty containers.
    pub fn get_container_contents(&self, state: &GameState, container_id: &str) -> Vec<String> {
        state.contents_of(container_id).to_vec()
    }

    /// Unlock predicate: the key item is carried and/or the flag is set.
    /// A locked item with no requirement cannot be unlocked by the player.
    pub fn can_unlock(&self, state: &GameState, item: &Item) -> bool {
        match &item.properties.unlock {
            None => false,
            Some(requirement) => {
                let key_ok = requirement
                    .key
                    .as_ref()
                    .map(|key| state.is_in_inventory(key))
                    .unwrap_or(true);
                let flag_ok = requirement
                    .flag
                    .as_ref()
                    .map(|flag| state.flag(flag))
                    .unwrap_or(true);
                let has_any = requirement.key.is_some() || requirement.flag.is_some();
                has_any && key_ok && flag_ok
            }
        }
    }

    fn ensure_open(&self, state: &GameState, container_id: &str) -> ItemResult<()> {
        let container = self.item(state, container_id)?;
        if container.state.open {
            Ok(())
        } else {
            refuse(
                FailureKind::ClosedContainer,
                format!("The {} is closed.", container.name),
            )
        }
    }

    fn used_capacity(&self, state: &GameState, container_id: &str) -> u32 {
        state
            .contents_of(container_id)
            .iter()
            .filter_map(|id| state.item(id))
            .map(|item| item.size.capacity_units())
            .sum()
    }
}
