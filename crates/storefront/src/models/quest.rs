//! Quest domain types and the per-user seed template.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;

use ecoquest_core::{QuestId, QuestKind, QuestStatus};

/// One user's copy of a quest.
///
/// Serializes with a derived `completed` flag alongside `status`; the flag
/// is ignored when reading a quest back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: QuestId,
    pub title: String,
    pub description: String,
    pub coin_reward: u32,
    #[serde(rename = "type")]
    pub kind: QuestKind,
    /// Units of progress needed; `None` for one-shot quests.
    #[serde(default)]
    pub required_amount: Option<u32>,
    #[serde(default)]
    pub current_amount: u32,
    #[serde(default)]
    pub status: QuestStatus,
}

impl Serialize for Quest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Quest", 9)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("description", &self.description)?;
        state.serialize_field("coinReward", &self.coin_reward)?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("requiredAmount", &self.required_amount)?;
        state.serialize_field("currentAmount", &self.current_amount)?;
        state.serialize_field("status", &self.status)?;
        state.serialize_field("completed", &self.is_completed())?;
        state.end()
    }
}

impl Quest {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == QuestStatus::Completed
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == QuestStatus::Active
    }

    /// Whether enough progress has been recorded to complete the quest.
    #[must_use]
    pub fn requirement_met(&self) -> bool {
        self.required_amount
            .is_none_or(|required| self.current_amount >= required)
    }
}

/// Static definition a user's quests are seeded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestTemplate {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub coin_reward: u32,
    pub kind: QuestKind,
    pub required_amount: Option<u32>,
}

impl QuestTemplate {
    /// A fresh, available quest from this template.
    #[must_use]
    pub fn instantiate(&self) -> Quest {
        Quest {
            id: QuestId::from(self.id),
            title: self.title.to_owned(),
            description: self.description.to_owned(),
            coin_reward: self.coin_reward,
            kind: self.kind,
            required_amount: self.required_amount,
            current_amount: 0,
            status: QuestStatus::Available,
        }
    }
}

/// Quests every user starts with.
pub const QUEST_TEMPLATES: [QuestTemplate; 5] = [
    QuestTemplate {
        id: "q1",
        title: "Dispose Waste Properly",
        description: "Dispose of waste in the correct bin",
        coin_reward: 5,
        kind: QuestKind::Dispose,
        required_amount: Some(1),
    },
    QuestTemplate {
        id: "q2",
        title: "Recycle Plastic",
        description: "Recycle 3 plastic items",
        coin_reward: 10,
        kind: QuestKind::Recycle,
        required_amount: Some(3),
    },
    QuestTemplate {
        id: "q3",
        title: "Recycle Paper",
        description: "Recycle 5 paper items",
        coin_reward: 15,
        kind: QuestKind::Recycle,
        required_amount: Some(5),
    },
    QuestTemplate {
        id: "q4",
        title: "Purchase Eco-Friendly Product",
        description: "Buy an eco-friendly product from our store",
        coin_reward: 20,
        kind: QuestKind::Purchase,
        required_amount: None,
    },
    QuestTemplate {
        id: "q5",
        title: "Daily Login",
        description: "Log in to the app daily",
        coin_reward: 2,
        kind: QuestKind::Daily,
        required_amount: None,
    },
];

/// Fresh quests for a new user.
#[must_use]
pub fn seed_quests() -> Vec<Quest> {
    QUEST_TEMPLATES.iter().map(QuestTemplate::instantiate).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_seed_quests_start_available() {
        let quests = seed_quests();
        assert_eq!(quests.len(), QUEST_TEMPLATES.len());
        assert!(quests.iter().all(|q| q.status == QuestStatus::Available));
        assert!(quests.iter().all(|q| q.current_amount == 0));
    }

    #[test]
    fn test_requirement_met() {
        let mut quest = QUEST_TEMPLATES[1].instantiate();
        assert!(!quest.requirement_met());
        quest.current_amount = 3;
        assert!(quest.requirement_met());

        let one_shot = QUEST_TEMPLATES[3].instantiate();
        assert!(one_shot.requirement_met());
    }

    #[test]
    fn test_serialized_quest_carries_completed_flag() {
        let mut quest = QUEST_TEMPLATES[1].instantiate();
        let value = serde_json::to_value(&quest).unwrap();
        assert_eq!(value["completed"], json!(false));
        assert_eq!(value["type"], "recycle");
        assert_eq!(value["coinReward"], 10);

        quest.current_amount = 3;
        quest.status = QuestStatus::Completed;
        let value = serde_json::to_value(&quest).unwrap();
        assert_eq!(value["completed"], json!(true));
        assert_eq!(value["status"], "completed");

        // The flag is derived, so reading it back is lossless
        let back: Quest = serde_json::from_value(value).unwrap();
        assert_eq!(back, quest);
    }

    #[test]
    fn test_one_shot_quest_serializes_null_requirement() {
        let value = serde_json::to_value(QUEST_TEMPLATES[4].instantiate()).unwrap();
        assert_eq!(value["requiredAmount"], json!(null));
        assert_eq!(value["currentAmount"], 0);
    }
}
