//! Automated participants: the bot contract, a random reference bot, and
//! the driver that feeds bot actions into the session queue.

pub mod driver;
pub mod greedy;
pub mod random;
pub mod trait_def;

pub use driver::{spawn_bot, Pacing};
pub use greedy::GreedyBot;
pub use random::RandomBot;
pub use trait_def::{BotError, BotPlayer, BotView};
