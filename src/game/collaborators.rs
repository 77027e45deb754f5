//! Persistence and combat collaborators.
//!
//! The command processor only calls through these traits. The defaults keep
//! one save slot in memory and let monsters stand around unharmed.

use log::debug;

use crate::game::state::GameState;

pub trait Persistence: Send {
    fn save_game(&mut self, state: &GameState);
    fn restore_game(&self) -> Option<GameState>;
    fn has_saved_game(&self) -> bool;
}

/// Single in-memory save slot.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    slot: Option<GameState>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Persistence for MemoryPersistence {
    fn save_game(&mut self, state: &GameState) {
        debug!(
            "Saving snapshot at {} (score {}, moves {})",
            state.current_scene_id(),
            state.score(),
            state.moves()
        );
        self.slot = Some(state.clone());
    }

    fn restore_game(&self) -> Option<GameState> {
        self.slot.clone()
    }

    fn has_saved_game(&self) -> bool {
        self.slot.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatOutcome {
    pub message: String,
    /// Whether the attack changed anything and should cost a move.
    pub resolved: bool,
}

pub trait Combat: Send {
    fn attack(&mut self, state: &mut GameState, target: &str, weapon: Option<&str>) -> CombatOutcome;
    fn monsters_in_scene(&self, state: &GameState, scene_id: &str) -> Vec<String>;
}

/// Combat stand-in: reports the monsters scene data places, never resolves
/// a fight.
#[derive(Debug, Default, Clone)]
pub struct NoCombat;

impl Combat for NoCombat {
    fn attack(&mut self, state: &mut GameState, target: &str, _weapon: Option<&str>) -> CombatOutcome {
        let scene_id = state.current_scene_id().to_string();
        let present = self
            .monsters_in_scene(state, &scene_id)
            .iter()
            .any(|monster| monster.replace('_', " ") == target.replace('_', " "));
        let message = if present {
            format!("The {} shrugs off your attack.", target)
        } else {
            format!("There is no {} here to fight.", target)
        };
        CombatOutcome {
            message,
            resolved: false,
        }
    }

    fn monsters_in_scene(&self, state: &GameState, scene_id: &str) -> Vec<String> {
        state
            .scene(scene_id)
            .map(|scene| scene.monsters.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::types::{Scene, World};

    #[test]
    fn test_memory_persistence_round_trip() {
        let world = World::new().with_scene(Scene::new("hall", "Hall", "A hall."));
        let mut state = GameState::new(world, "hall").expect("state");
        let mut store = MemoryPersistence::new();
        assert!(!store.has_saved_game());
        assert!(store.restore_game().is_none());

        state.increment_moves();
        store.save_game(&state);
        state.increment_moves();

        let restored = store.restore_game().expect("saved");
        assert_eq!(restored.moves(), 1);
        assert!(store.has_saved_game());
    }

    #[test]
    fn test_no_combat() {
        let world = World::new()
            .with_scene(Scene::new("hall", "Hall", "A hall."))
            .with_scene(Scene::new("troll_room", "Troll Room", "Bloodstains.").with_monster("troll"));
        let mut state = GameState::new(world, "hall").expect("state");
        let mut combat = NoCombat;

        let outcome = combat.attack(&mut state, "troll", None);
        assert!(!outcome.resolved);
        assert_eq!(outcome.message, "There is no troll here to fight.");
        assert!(combat.monsters_in_scene(&state, "hall").is_empty());
        assert_eq!(combat.monsters_in_scene(&state, "troll_room"), vec!["troll".to_string()]);

        state.set_current_scene("troll_room").expect("scene");
        let outcome = combat.attack(&mut state, "troll", Some("sword"));
        assert!(!outcome.resolved);
        assert_eq!(outcome.message, "The troll shrugs off your attack.");
    }
}
