//! Quest service.
//!
//! Each user has their own copy of the quest template under
//! `quests_{userId}`. Quest rewards are paid into the owning user's coin
//! balance through [`AuthService::credit_coins`], before the completion is
//! saved. Every transition runs under the store's mutation lock, so a quest
//! pays out at most once.
//!
//! # State Machine
//!
//! ```text
//! Available --start--> Active --progress / complete--> Completed
//! ```
//!
//! Daily quests go back to `Available` once per calendar day, gated by the
//! date stored under `lastQuestReset_{userId}`.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use ecoquest_core::{QuestId, QuestKind, QuestStatus, UserId};

use crate::models::{Quest, seed_quests};
use crate::services::auth::{AuthError, AuthService};
use crate::store::{KeyValueStore, StoreError, keys, load_json, save_json};

/// Errors from quest operations.
#[derive(Debug, Error)]
pub enum QuestError {
    /// No quest with this ID.
    #[error("quest {0} not found")]
    NotFound(QuestId),

    /// The quest must be started first.
    #[error("quest {0} is not active")]
    NotActive(QuestId),

    /// The quest was already completed.
    #[error("quest {0} is already completed")]
    AlreadyCompleted(QuestId),

    /// The quest's required amount has not been reached.
    #[error("quest {0} needs more progress")]
    ProgressIncomplete(QuestId),

    /// The quest has no progress counter.
    #[error("quest {0} does not track progress")]
    NoRequirement(QuestId),

    /// Progress must be at least one unit.
    #[error("progress amount must be at least 1")]
    InvalidAmount,

    /// Paying the reward failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Store read/write error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result of a quest mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestUpdate {
    pub quest: Quest,
    /// Coins paid out by this call; zero unless the quest just completed.
    pub coins_awarded: u32,
}

/// Quest service for one user.
pub struct QuestService<'a> {
    store: &'a dyn KeyValueStore,
    user_id: UserId,
}

impl<'a> QuestService<'a> {
    /// Create a quest service for a user.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore, user_id: UserId) -> Self {
        Self { store, user_id }
    }

    /// All of the user's quests, seeded from the template on first use.
    ///
    /// A missing or unreadable quest list falls back to the template.
    #[must_use]
    pub fn quests(&self) -> Vec<Quest> {
        load_json(self.store, &keys::quests(&self.user_id)).unwrap_or_else(seed_quests)
    }

    /// Quests in progress.
    #[must_use]
    pub fn active(&self) -> Vec<Quest> {
        self.with_status(QuestStatus::Active)
    }

    /// Quests already completed.
    #[must_use]
    pub fn completed(&self) -> Vec<Quest> {
        self.with_status(QuestStatus::Completed)
    }

    /// Quests not yet started.
    #[must_use]
    pub fn available(&self) -> Vec<Quest> {
        self.with_status(QuestStatus::Available)
    }

    fn with_status(&self, status: QuestStatus) -> Vec<Quest> {
        self.quests()
            .into_iter()
            .filter(|q| q.status == status)
            .collect()
    }

    /// Start an available quest. Starting an active quest is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::NotFound` for an unknown quest.
    /// Returns `QuestError::AlreadyCompleted` if the quest is completed.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub fn start(&self, id: &QuestId) -> Result<Quest, QuestError> {
        let _lock = self.store.lock();
        let mut quests = self.quests();
        let quest = find_mut(&mut quests, id)?;

        match quest.status {
            QuestStatus::Completed => return Err(QuestError::AlreadyCompleted(id.clone())),
            QuestStatus::Active => return Ok(quest.clone()),
            QuestStatus::Available => quest.status = QuestStatus::Active,
        }

        let started = quest.clone();
        self.save(&quests)?;
        tracing::info!(quest_id = %id, "Quest started");
        Ok(started)
    }

    /// Record progress on an active quest.
    ///
    /// Reaching the required amount clamps the progress to it, completes the
    /// quest and pays the reward.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::NotActive` unless the quest is active.
    /// Returns `QuestError::NoRequirement` if the quest has no required amount.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub fn record_progress(&self, id: &QuestId, amount: u32) -> Result<QuestUpdate, QuestError> {
        if amount == 0 {
            return Err(QuestError::InvalidAmount);
        }

        let _lock = self.store.lock();
        let mut quests = self.quests();
        let quest = find_mut(&mut quests, id)?;
        ensure_active(quest)?;
        let Some(required) = quest.required_amount else {
            return Err(QuestError::NoRequirement(id.clone()));
        };

        let progress = quest.current_amount.saturating_add(amount);
        let completes = progress >= required;
        if completes {
            quest.current_amount = required;
            quest.status = QuestStatus::Completed;
        } else {
            quest.current_amount = progress;
        }

        let quest = quest.clone();
        let coins_awarded = if completes { self.reward(&quest)? } else { 0 };
        self.save(&quests)?;

        Ok(QuestUpdate {
            quest,
            coins_awarded,
        })
    }

    /// Complete an active quest and pay its reward.
    ///
    /// Completing twice is rejected without paying again.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::AlreadyCompleted` if the quest is completed.
    /// Returns `QuestError::NotActive` if the quest has not been started.
    /// Returns `QuestError::ProgressIncomplete` if the required amount is unmet.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub fn complete(&self, id: &QuestId) -> Result<QuestUpdate, QuestError> {
        let _lock = self.store.lock();
        let mut quests = self.quests();
        let quest = find_mut(&mut quests, id)?;
        ensure_active(quest)?;
        if !quest.requirement_met() {
            return Err(QuestError::ProgressIncomplete(id.clone()));
        }

        quest.status = QuestStatus::Completed;
        let quest = quest.clone();
        let coins_awarded = self.reward(&quest)?;
        self.save(&quests)?;

        Ok(QuestUpdate {
            quest,
            coins_awarded,
        })
    }

    /// Complete every active purchase quest, as after a checkout.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::Store` or `QuestError::Auth` if saving or paying
    /// fails. Nothing is marked completed unless every reward was paid.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub fn complete_purchase_quests(&self) -> Result<Vec<QuestUpdate>, QuestError> {
        let _lock = self.store.lock();
        let mut quests = self.quests();
        let mut finished = Vec::new();
        for quest in &mut quests {
            if quest.kind == QuestKind::Purchase && quest.is_active() {
                quest.status = QuestStatus::Completed;
                finished.push(quest.clone());
            }
        }
        if finished.is_empty() {
            return Ok(Vec::new());
        }

        let updates = finished
            .into_iter()
            .map(|quest| {
                let coins_awarded = self.reward(&quest)?;
                Ok(QuestUpdate {
                    quest,
                    coins_awarded,
                })
            })
            .collect::<Result<Vec<_>, QuestError>>()?;
        self.save(&quests)?;
        Ok(updates)
    }

    /// Reset daily quests if they were last reset before `today`.
    ///
    /// Returns whether a reset happened. Calling again on the same day is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `QuestError::Store` if the quests or reset date cannot be saved.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub fn reset_daily(&self, today: NaiveDate) -> Result<bool, QuestError> {
        let _lock = self.store.lock();
        let reset_key = keys::last_quest_reset(&self.user_id);
        let last_reset: Option<NaiveDate> = load_json(self.store, &reset_key);
        if last_reset == Some(today) {
            return Ok(false);
        }

        let mut quests = self.quests();
        for quest in quests.iter_mut().filter(|q| q.kind == QuestKind::Daily) {
            quest.status = QuestStatus::Available;
            quest.current_amount = 0;
        }
        self.save(&quests)?;
        save_json(self.store, &reset_key, &today)?;

        tracing::info!(%today, "Daily quests reset");
        Ok(true)
    }

    fn save(&self, quests: &[Quest]) -> Result<(), StoreError> {
        save_json(self.store, &keys::quests(&self.user_id), quests)
    }

    fn reward(&self, quest: &Quest) -> Result<u32, QuestError> {
        AuthService::new(self.store).credit_coins(&self.user_id, quest.coin_reward)?;
        tracing::info!(quest_id = %quest.id, coins = quest.coin_reward, "Quest completed");
        Ok(quest.coin_reward)
    }
}

fn find_mut<'q>(quests: &'q mut [Quest], id: &QuestId) -> Result<&'q mut Quest, QuestError> {
    quests
        .iter_mut()
        .find(|q| &q.id == id)
        .ok_or_else(|| QuestError::NotFound(id.clone()))
}

fn ensure_active(quest: &Quest) -> Result<(), QuestError> {
    match quest.status {
        QuestStatus::Active => Ok(()),
        QuestStatus::Completed => Err(QuestError::AlreadyCompleted(quest.id.clone())),
        QuestStatus::Available => Err(QuestError::NotActive(quest.id.clone())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use secrecy::SecretString;

    use super::*;
    use crate::store::MemoryStore;

    fn setup(store: &MemoryStore) -> QuestService<'_> {
        let user = AuthService::new(store)
            .register("ranger", "ranger@forest.example", &SecretString::from("pw".to_owned()))
            .unwrap();
        QuestService::new(store, user.id)
    }

    fn coins(store: &MemoryStore) -> u32 {
        AuthService::new(store).require_user().unwrap().coins
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_new_user_gets_template() {
        let store = MemoryStore::new();
        let quests = setup(&store);
        assert_eq!(quests.available().len(), 5);
        assert!(quests.active().is_empty());
        assert!(quests.completed().is_empty());
    }

    #[test]
    fn test_start_is_idempotent() {
        let store = MemoryStore::new();
        let quests = setup(&store);
        let id = QuestId::from("q2");

        assert_eq!(quests.start(&id).unwrap().status, QuestStatus::Active);
        assert_eq!(quests.start(&id).unwrap().status, QuestStatus::Active);
        assert_eq!(quests.active().len(), 1);
    }

    #[test]
    fn test_progress_completes_and_clamps() {
        let store = MemoryStore::new();
        let quests = setup(&store);
        let id = QuestId::from("q2");
        quests.start(&id).unwrap();

        let update = quests.record_progress(&id, 2).unwrap();
        assert_eq!(update.quest.current_amount, 2);
        assert_eq!(update.coins_awarded, 0);

        let update = quests.record_progress(&id, 5).unwrap();
        assert_eq!(update.quest.current_amount, 3);
        assert_eq!(update.quest.status, QuestStatus::Completed);
        assert_eq!(update.coins_awarded, 10);
        assert_eq!(coins(&store), 10);
    }

    #[test]
    fn test_progress_requires_active_quest_with_requirement() {
        let store = MemoryStore::new();
        let quests = setup(&store);

        assert!(matches!(
            quests.record_progress(&QuestId::from("q2"), 1),
            Err(QuestError::NotActive(_))
        ));

        quests.start(&QuestId::from("q4")).unwrap();
        assert!(matches!(
            quests.record_progress(&QuestId::from("q4"), 1),
            Err(QuestError::NoRequirement(_))
        ));
    }

    #[test]
    fn test_completion_pays_once() {
        let store = MemoryStore::new();
        let quests = setup(&store);
        let id = QuestId::from("q4");
        quests.start(&id).unwrap();

        assert_eq!(quests.complete(&id).unwrap().coins_awarded, 20);
        assert!(matches!(
            quests.complete(&id),
            Err(QuestError::AlreadyCompleted(_))
        ));
        assert_eq!(coins(&store), 20);
        assert!(matches!(quests.start(&id), Err(QuestError::AlreadyCompleted(_))));
    }

    #[test]
    fn test_concurrent_completion_pays_once() {
        let store = MemoryStore::new();
        let quests = setup(&store);
        let id = QuestId::from("q4");
        quests.start(&id).unwrap();

        let barrier = Barrier::new(4);
        let paid = thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        quests.complete(&id).is_ok()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|ok| *ok)
                .count()
        });

        assert_eq!(paid, 1);
        assert_eq!(coins(&store), 20);
    }

    #[test]
    fn test_reward_goes_to_quest_owner() {
        let store = MemoryStore::new();
        let auth = AuthService::new(&store);
        let alice = auth
            .register("alice", "alice@forest.example", &SecretString::from("pw".to_owned()))
            .unwrap();
        auth.register("bob", "bob@forest.example", &SecretString::from("pw".to_owned()))
            .unwrap();

        let quests = QuestService::new(&store, alice.id);
        let id = QuestId::from("q4");
        quests.start(&id).unwrap();
        quests.complete(&id).unwrap();

        assert_eq!(coins(&store), 0);
        auth.logout().unwrap();
        let alice = auth
            .login("alice@forest.example", &SecretString::from("pw".to_owned()))
            .unwrap();
        assert_eq!(alice.coins, 20);
    }

    #[test]
    fn test_failed_payout_leaves_quest_active() {
        let store = MemoryStore::new();
        let quests = QuestService::new(&store, UserId::from("ghost"));
        let id = QuestId::from("q4");
        quests.start(&id).unwrap();

        assert!(matches!(
            quests.complete(&id),
            Err(QuestError::Auth(AuthError::UserNotFound(_)))
        ));
        assert_eq!(quests.active().len(), 1);
        assert!(quests.completed().is_empty());
    }

    #[test]
    fn test_complete_needs_requirement() {
        let store = MemoryStore::new();
        let quests = setup(&store);
        let id = QuestId::from("q3");
        quests.start(&id).unwrap();
        quests.record_progress(&id, 4).unwrap();

        assert!(matches!(
            quests.complete(&id),
            Err(QuestError::ProgressIncomplete(_))
        ));
    }

    #[test]
    fn test_unknown_quest() {
        let store = MemoryStore::new();
        let quests = setup(&store);
        assert!(matches!(
            quests.start(&QuestId::from("q99")),
            Err(QuestError::NotFound(_))
        ));
    }

    #[test]
    fn test_daily_reset_once_per_day() {
        let store = MemoryStore::new();
        let quests = setup(&store);
        let daily = QuestId::from("q5");
        let plastic = QuestId::from("q2");

        assert!(quests.reset_daily(day(14)).unwrap());
        quests.start(&daily).unwrap();
        quests.complete(&daily).unwrap();
        quests.start(&plastic).unwrap();

        assert!(!quests.reset_daily(day(14)).unwrap());
        assert_eq!(quests.completed().len(), 1);

        assert!(quests.reset_daily(day(15)).unwrap());
        let all = quests.quests();
        let q5 = all.iter().find(|q| q.id == daily).unwrap();
        assert_eq!(q5.status, QuestStatus::Available);
        let q2 = all.iter().find(|q| q.id == plastic).unwrap();
        assert_eq!(q2.status, QuestStatus::Active);
    }

    #[test]
    fn test_purchase_quests_complete_on_checkout() {
        let store = MemoryStore::new();
        let quests = setup(&store);
        assert!(quests.complete_purchase_quests().unwrap().is_empty());

        quests.start(&QuestId::from("q4")).unwrap();
        let updates = quests.complete_purchase_quests().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(coins(&store), 20);
        assert!(quests.complete_purchase_quests().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_quests_fall_back_to_template() {
        let store = MemoryStore::new();
        let quests = setup(&store);
        store
            .set(&keys::quests(&quests.user_id), "nope".to_owned())
            .unwrap();
        assert_eq!(quests.quests(), seed_quests());
    }
}
