mod matcher;
mod rule;

pub use matcher::{ActionInstance, find_action, identify_actions};
pub use rule::{ActionRule, Predicate, RuleSet};
