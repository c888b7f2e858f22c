//! Question types

use serde::{Deserialize, Serialize};

/// How a question is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    /// Free-text answer
    SimpleText,
    /// One of `possible_answers`
    MultipleChoice,
    /// Rating from one to five
    FiveStars,
}

/// A single survey question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Server-assigned id, absent until created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    /// Owning survey
    pub survey_id: i32,
    /// Question wording
    pub text: String,
    /// Answer kind; the backend assumes free text when absent
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,
    /// Newline-separated choices for multiple choice questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub possible_answers: Option<String>,
}

impl Question {
    /// New unsaved free-text question
    pub fn new(survey_id: i32, text: impl Into<String>) -> Self {
        Self {
            id: None,
            survey_id,
            text: text.into(),
            question_type: None,
            possible_answers: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_minimal_question() {
        let question: Question =
            serde_json::from_str(r#"{"id":42,"surveyId":7,"text":"Q?"}"#).unwrap();
        assert_eq!(
            question,
            Question { id: Some(42), ..Question::new(7, "Q?") }
        );
    }

    #[test]
    fn test_question_type_uses_type_key() {
        let question = Question {
            question_type: Some(QuestionType::FiveStars),
            ..Question::new(1, "Rate us")
        };
        let value = serde_json::to_value(&question).unwrap();
        assert_eq!(value["type"], "FiveStars");
        assert!(value.get("id").is_none());
    }
}
