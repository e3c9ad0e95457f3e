//! Conversion of qualifier-tagged provider match events into SPADL-style
//! on-ball actions.

pub mod classify;
pub mod config;
pub mod convert;
pub mod coords;
pub mod event;
pub mod extract;
pub mod pipeline;
pub mod qualifiers;
pub mod repair;
pub mod spadl;
pub mod store;

pub use config::SpadlConfig;
pub use convert::{convert_game, convert_to_actions};
pub use event::{Game, RawEvent};
pub use qualifiers::{Qualifier, QualifierCodes, QualifierSet};
pub use spadl::{Action, ActionResult, ActionType, BodyPart};
