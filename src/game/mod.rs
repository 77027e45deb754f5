//! Game engine: world data model, game state store, the five services and
//! the command processor that drives them.
//!
//! Services never call back into the processor; the processor owns the
//! [`GameState`] and passes it into every service call.

pub mod collaborators;
pub mod commands;
pub mod errors;
pub mod interactions;
pub mod inventory;
pub mod items;
pub mod loader;
pub mod parser;
pub mod resolver;
pub mod scene;
pub mod scoring;
pub mod session;
pub mod state;
pub mod types;

pub use collaborators::{Combat, CombatOutcome, MemoryPersistence, NoCombat, Persistence};
pub use commands::{CommandProcessor, CommandResult};
pub use errors::{FailureKind, GameError, Refusal};
pub use inventory::{calculate_total_weight, InventoryService};
pub use items::{ItemFailure, ItemService, Opened};
pub use loader::{JsonWorldLoader, WorldLoader};
pub use parser::{parse, tokenize, Command, ParseError};
pub use resolver::{normalize_phrase, Reach, VisibleSet};
pub use scene::{MoveOutcome, SceneService};
pub use scoring::{treasure_deposited_flag, treasure_found_flag, ScoringService};
pub use session::GameSession;
pub use state::GameState;
pub use types::*;
