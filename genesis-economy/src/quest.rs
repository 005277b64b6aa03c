//! Quest request/response types exchanged with the narrative generator.
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crisis::{CrisisAssessment, CrisisCondition, Sentiment};
use crate::economy::EconomySnapshot;
use crate::error::CollaboratorError;

/// What the remedy does to the money supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestKind {
    #[serde(rename = "Gold Sink", alias = "gold_sink", alias = "GoldSink")]
    GoldSink,
    #[serde(rename = "Stimulus", alias = "stimulus")]
    Stimulus,
}

impl QuestKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GoldSink => "Gold Sink",
            Self::Stimulus => "Stimulus",
        }
    }
}

impl fmt::Display for QuestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured input for the narrative generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuestRequest {
    pub condition: CrisisCondition,
    pub severity: u8,
    pub inflation_rate: f64,
    pub money_supply: f64,
    pub sentiment: Sentiment,
}

impl QuestRequest {
    #[must_use]
    pub const fn from_assessment(snapshot: &EconomySnapshot, assessment: &CrisisAssessment) -> Self {
        Self {
            condition: assessment.condition,
            severity: assessment.severity,
            inflation_rate: snapshot.inflation_rate,
            money_supply: snapshot.money_supply,
            sentiment: assessment.sentiment,
        }
    }

    /// Remedy that fits the condition: deflation needs a stimulus, every
    /// other crisis drains gold.
    #[must_use]
    pub const fn expected_kind(&self) -> QuestKind {
        if self.condition.calls_for_gold_sink() {
            QuestKind::GoldSink
        } else {
            QuestKind::Stimulus
        }
    }

    /// Instruction text handed to an external text model.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "You are the 'Grand Archivist' for a fantasy MMORPG.\n\
             The game economy is currently in this state:\n\
             \n\
             - Condition: {condition} (Severity: {severity}/10)\n\
             - Inflation Rate: {inflation:.2}%\n\
             - Money Supply: {supply:.0} Gold\n\
             - Player Sentiment: {sentiment}\n\
             \n\
             Generate a 'World Event Quest' that fixes this economic problem.\n\
             - If inflation is high, create a \"Gold Sink\" (donations, expensive purchases).\n\
             - If inflation is low, create a \"Stimulus\" (increased loot, royal grants).\n\
             The situation calls for a \"{kind}\".\n\
             \n\
             Return ONLY a raw JSON object, no markdown and no extra text, with these fields:\n\
             {{\"title\": \"Quest Name\", \
             \"flavor_text\": \"Lore explaining why this is happening.\", \
             \"objective\": \"What players must do.\", \
             \"reward\": \"What players receive.\", \
             \"type\": \"Gold Sink\" or \"Stimulus\"}}\n",
            condition = self.condition,
            severity = self.severity,
            inflation = self.inflation_rate,
            supply = self.money_supply,
            sentiment = self.sentiment,
            kind = self.expected_kind(),
        )
    }
}

/// Narrative content describing an in-world remedy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub title: String,
    pub flavor_text: String,
    pub objective: String,
    pub reward: String,
    #[serde(rename = "type")]
    pub kind: QuestKind,
}

/// A quest stamped with the moment it was generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestRecord {
    #[serde(flatten)]
    pub quest: Quest,
    pub generated_at: DateTime<Utc>,
}

impl QuestRecord {
    #[must_use]
    pub const fn new(quest: Quest, generated_at: DateTime<Utc>) -> Self {
        Self {
            quest,
            generated_at,
        }
    }

    #[must_use]
    pub fn stamp_now(quest: Quest) -> Self {
        Self::new(quest, Utc::now())
    }
}

/// Decode a raw model reply, tolerating Markdown code fences around the JSON.
///
/// # Errors
///
/// Returns [`CollaboratorError::MalformedResponse`] when the cleaned text is
/// not a quest object or the quest has an empty title.
pub fn parse_quest_response(raw: &str) -> Result<Quest, CollaboratorError> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    let quest: Quest = serde_json::from_str(cleaned.trim())
        .map_err(|err| CollaboratorError::MalformedResponse(err.to_string()))?;
    if quest.title.trim().is_empty() {
        return Err(CollaboratorError::MalformedResponse(
            "quest title is empty".to_string(),
        ));
    }
    Ok(quest)
}
