//! Live poll tallies.

use serde::Serialize;
use std::collections::HashMap;

use super::Poll;
use crate::domain::foundation::PollOptionId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionTally {
    pub option_id: PollOptionId,
    pub text: String,
    pub order_index: i32,
    pub count: u64,
}

/// A poll with per-option counts as of the read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollTally {
    pub poll: Poll,
    pub options: Vec<OptionTally>,
    pub total_responses: u64,
}

impl PollTally {
    /// Pairs each option with its counted response rows. Options with no
    /// rows get zero.
    pub fn count(poll: Poll, counts: &HashMap<PollOptionId, u64>) -> Self {
        let options: Vec<OptionTally> = poll
            .options
            .iter()
            .map(|option| OptionTally {
                option_id: option.id,
                text: option.text.clone(),
                order_index: option.order_index,
                count: counts.get(&option.id).copied().unwrap_or(0),
            })
            .collect();
        let total_responses = options.iter().map(|o| o.count).sum();

        Self {
            poll,
            options,
            total_responses,
        }
    }
}
