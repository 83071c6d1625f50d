//! Q-learning agent: state discretization lives in [`crate::types`], the
//! value table in [`q_table`], and the decision/update logic in [`bot`].

pub mod bot;
pub mod q_table;

pub use bot::{Bot, BotConfig, Transition};
pub use q_table::{ActionValues, QTable};
