//! Data-driven item interactions.
//!
//! Condition terms (all must hold):
//! - `state.<key>` / `!state.<key>`: item state boolean
//! - `flag.<name>` / `!flag.<name>`, or a bare `<name>` / `!<name>`: game flag
//!
//! Effect terms: `state.<key> = true|false`, `flag.<name> = true|false`.
//! Effects only touch item state and game flags, never score or location.

use log::{debug, warn};

use crate::game::resolver::{normalize_phrase, phrase_names_item, VisibleSet};
use crate::game::state::GameState;
use crate::game::types::{Interaction, Item};

/// Evaluate one condition term for `item`.
pub fn condition_holds(state: &GameState, item: &Item, term: &str) -> bool {
    let term = term.trim();
    let (negated, body) = match term.strip_prefix('!') {
        Some(rest) => (true, rest.trim()),
        None => (false, term),
    };
    let value = if let Some(key) = body.strip_prefix("state.") {
        item.state.get_bool(key)
    } else if let Some(name) = body.strip_prefix("flag.") {
        state.flag(name)
    } else {
        state.flag(body)
    };
    value != negated
}

pub fn conditions_hold(state: &GameState, item: &Item, interaction: &Interaction) -> bool {
    interaction
        .conditions
        .iter()
        .all(|term| condition_holds(state, item, term))
}

/// Apply an interaction's effects to `item_id`.
pub fn apply_effects(state: &mut GameState, item_id: &str, interaction: &Interaction) {
    for effect in &interaction.effects {
        let Some((target, value)) = effect.split_once('=') else {
            warn!("Ignoring malformed effect '{}' on {}", effect, item_id);
            continue;
        };
        let value = match value.trim() {
            "true" => true,
            "false" => false,
            other => {
                warn!("Ignoring effect '{}' on {}: '{}' is not a boolean", effect, item_id, other);
                continue;
            }
        };
        let target = target.trim();
        if let Some(key) = target.strip_prefix("state.") {
            if let Some(item) = state.item_mut(item_id) {
                item.state.set_bool(key, value);
            }
        } else {
            let name = target.strip_prefix("flag.").unwrap_or(target);
            state.set_flag(name, value);
        }
        debug!("Effect on {}: {} = {}", item_id, target, value);
    }
}

/// First interaction on `item` registered for `command` whose conditions hold.
pub fn active_interaction<'a>(state: &GameState, item: &'a Item, command: &str) -> Option<&'a Interaction> {
    let wanted = normalize_phrase(command);
    item.interactions
        .iter()
        .filter(|i| normalize_phrase(&i.command) == wanted)
        .find(|i| conditions_hold(state, item, i))
}

/// A verb phrase matched to an interaction on a reachable item.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionMatch {
    pub item_id: String,
    pub interaction: Interaction,
}

/// Match a free-form phrase like `turn on lamp` against the interactions of
/// every reachable item. The phrase must be `<command> <item name>`.
pub fn find_interaction(state: &GameState, visible: &VisibleSet, phrase: &str) -> Option<InteractionMatch> {
    let phrase = normalize_phrase(phrase);
    for id in visible.ids() {
        let Some(item) = state.item(id) else {
            continue;
        };
        for interaction in &item.interactions {
            let command = normalize_phrase(&interaction.command);
            if command.is_empty() {
                continue;
            }
            let Some(rest) = phrase.strip_prefix(command.as_str()) else {
                continue;
            };
            let Some(target) = rest.strip_prefix(' ') else {
                continue;
            };
            if phrase_names_item(item, target) && conditions_hold(state, item, interaction) {
                return Some(InteractionMatch {
                    item_id: id.to_string(),
                    interaction: interaction.clone(),
                });
            }
        }
    }
    None
}
