//! Request and response bodies for poll endpoints.

use serde::{Deserialize, Serialize};

use crate::application::PollView;
use crate::domain::foundation::PollOptionId;
use crate::domain::poll::OptionDraft;

/// An option given either as plain text or with an explicit order.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OptionRequest {
    Text(String),
    Detailed {
        text: String,
        #[serde(default)]
        order_index: Option<i32>,
    },
}

impl From<OptionRequest> for OptionDraft {
    fn from(option: OptionRequest) -> Self {
        match option {
            OptionRequest::Text(text) => OptionDraft {
                text,
                order_index: None,
            },
            OptionRequest::Detailed { text, order_index } => OptionDraft { text, order_index },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePollRequest {
    pub question: String,
    pub options: Vec<OptionRequest>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub is_multiple_choice: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RespondRequest {
    pub option_id: PollOptionId,
}

#[derive(Debug, Clone, Serialize)]
pub struct PollListResponse {
    pub polls: Vec<PollView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_accept_text_or_objects() {
        let req: CreatePollRequest = serde_json::from_str(
            r#"{"question":"Pick","options":["A",{"text":"B","order_index":5}]}"#,
        )
        .unwrap();
        let drafts: Vec<OptionDraft> = req.options.into_iter().map(Into::into).collect();

        assert_eq!(drafts[0], OptionDraft { text: "A".to_string(), order_index: None });
        assert_eq!(drafts[1], OptionDraft { text: "B".to_string(), order_index: Some(5) });
        assert!(!req.is_multiple_choice);
    }
}
