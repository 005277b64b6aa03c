use std::convert::Infallible;
use std::path::PathBuf;

use genesis_economy::{
    CollaboratorError, CrisisCondition, NarrativeGenerator, Quest, QuestRequest,
    parse_quest_response,
};

const LOG_PROMPT: &str = "archivist.prompt";

/// Offline archivist that fills fixed quest templates from the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateArchivist;

impl TemplateArchivist {
    fn write(request: &QuestRequest) -> Quest {
        let stake = u32::from(request.severity.max(1)) * 100;
        let (title, flavor_text, objective, reward) = match request.condition {
            CrisisCondition::HyperInflation => (
                "The Great Coin Melt",
                "Coins pour from every chest and bread costs a fortune. The Royal Forge will melt \
                 donated gold into the new crown.",
                format!("Donate {stake} Gold to the Royal Forge"),
                "Title: The Philanthropist",
            ),
            CrisisCondition::DeflationarySpiral => (
                "The King's Bounty",
                "Merchants hoard every coin and the markets have gone quiet. The crown opens its \
                 vaults to anyone who clears the roads.",
                format!("Slay {stake} bandits along the trade roads"),
                "A share of the royal treasury",
            ),
            CrisisCondition::ResourceFamine => (
                "Granary of Last Resort",
                "Blight took the harvest. The Granary sells sealed seed stores at ruinous prices.",
                format!("Buy {stake} Gold worth of sealed seed from the Granary"),
                "Title: Keeper of the Harvest",
            ),
            CrisisCondition::TradeWar => (
                "The Tariff Accord",
                "Rival guilds have walled off their markets. Envoys need gold to buy back the \
                 peace.",
                format!("Fund the envoys with {stake} Gold"),
                "Guild seal and toll-free passage",
            ),
            CrisisCondition::Stable => (
                "A Festival of Coin",
                "The markets are calm, but the council wants a celebration.",
                format!("Spend {stake} Gold at the festival stalls"),
                "Festival lantern cosmetic",
            ),
        };
        Quest {
            title: title.to_string(),
            flavor_text: flavor_text.to_string(),
            objective,
            reward: reward.to_string(),
            kind: request.expected_kind(),
        }
    }
}

impl NarrativeGenerator for TemplateArchivist {
    type Error = Infallible;

    fn generate(&self, request: &QuestRequest) -> Result<Quest, Self::Error> {
        Ok(Self::write(request))
    }
}

/// Replays a canned model reply from disk through the response parser.
///
/// The prompt the model would have received is logged at debug level.
#[derive(Debug, Clone)]
pub struct ResponseFileArchivist {
    path: PathBuf,
}

impl ResponseFileArchivist {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NarrativeGenerator for ResponseFileArchivist {
    type Error = CollaboratorError;

    fn generate(&self, request: &QuestRequest) -> Result<Quest, Self::Error> {
        log::debug!(target: LOG_PROMPT, "{}", request.prompt());
        let raw = std::fs::read_to_string(&self.path).map_err(|err| {
            CollaboratorError::Generation(format!("failed to read {}: {err}", self.path.display()))
        })?;
        let quest = parse_quest_response(&raw)?;
        if quest.kind != request.expected_kind() {
            log::warn!(
                "reply offers a {} for a {} crisis",
                quest.kind,
                request.condition
            );
        }
        Ok(quest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genesis_economy::{QuestKind, Sentiment};

    fn request(condition: CrisisCondition, severity: u8) -> QuestRequest {
        QuestRequest {
            condition,
            severity,
            inflation_rate: 9.0,
            money_supply: 1_090_000.0,
            sentiment: Sentiment::Panic,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "genesis-archivist-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn template_scales_stake_with_severity() {
        let quest = TemplateArchivist
            .generate(&request(CrisisCondition::HyperInflation, 8))
            .unwrap();
        assert_eq!(quest.title, "The Great Coin Melt");
        assert_eq!(quest.objective, "Donate 800 Gold to the Royal Forge");
        assert_eq!(quest.kind, QuestKind::GoldSink);
    }

    #[test]
    fn template_kind_matches_condition() {
        for condition in CrisisCondition::FORCEABLE {
            let request = request(condition, 5);
            let quest = TemplateArchivist.generate(&request).unwrap();
            assert_eq!(quest.kind, request.expected_kind());
        }
        let stimulus = TemplateArchivist
            .generate(&request(CrisisCondition::DeflationarySpiral, 7))
            .unwrap();
        assert_eq!(stimulus.kind, QuestKind::Stimulus);
    }

    #[test]
    fn response_file_is_parsed() {
        let path = temp_path("reply");
        std::fs::write(
            &path,
            "```json\n{\"title\":\"Tax of Tides\",\"flavor_text\":\"f\",\"objective\":\"o\",\
             \"reward\":\"r\",\"type\":\"Gold Sink\"}\n```",
        )
        .unwrap();
        let quest = ResponseFileArchivist::new(&path)
            .generate(&request(CrisisCondition::HyperInflation, 8))
            .unwrap();
        assert_eq!(quest.title, "Tax of Tides");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_response_file_is_a_generation_error() {
        let err = ResponseFileArchivist::new(temp_path("missing"))
            .generate(&request(CrisisCondition::TradeWar, 9))
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::Generation(_)));
    }

    #[test]
    fn garbage_response_is_malformed() {
        let path = temp_path("garbage");
        std::fs::write(&path, "The archivist shrugs.").unwrap();
        let err = ResponseFileArchivist::new(&path)
            .generate(&request(CrisisCondition::TradeWar, 9))
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::MalformedResponse(_)));
        let _ = std::fs::remove_file(path);
    }
}
