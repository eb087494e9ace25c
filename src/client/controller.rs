use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

use crate::dates;

use super::api::ApiClient;
use super::identity::InstallationStore;
use super::state::{DayLog, GoalProgress, MacroTotals, NutritionGoals};

/// Polling cadence: day-rollover check once a minute, re-sync every 30s.
pub const ROLLOVER_CHECK_INTERVAL: Duration = Duration::from_secs(60);
pub const SYNC_INTERVAL: Duration = Duration::from_secs(30);

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load entries. Please refresh the page.";

/// Drives the day's log over HTTP: initial load, periodic re-sync, rollover
/// reset, and the two user-initiated operations. All calls are sequential
/// fire-and-forget requests over the same in-memory state; whichever list
/// response lands last wins, and the next sync corrects any transient skew.
pub struct Controller {
    api: ApiClient,
    store: InstallationStore,
    user_id: String,
    goals: NutritionGoals,
    pub log: DayLog,
}

impl Controller {
    pub fn new(
        api: ApiClient,
        store: InstallationStore,
        goals: NutritionGoals,
    ) -> anyhow::Result<Self> {
        let user_id = store.user_id()?;
        let log = DayLog::new(dates::current_date_string());
        Ok(Self {
            api,
            store,
            user_id,
            goals,
            log,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub async fn start(&mut self) {
        if let Err(e) = self.store.note_date(&self.log.date) {
            warn!(error = %e, "could not persist last seen date");
        }
        self.refresh().await;
    }

    /// Wholesale replacement with the server's response; no merging.
    pub async fn refresh(&mut self) {
        self.log.loading = true;
        match self.api.list_entries(&self.user_id, &self.log.date).await {
            Ok(entries) => {
                self.log.entries = entries;
                self.log.error = None;
            }
            Err(e) => {
                warn!(error = %e, "list request failed");
                self.log.error = Some(LOAD_FAILED_MESSAGE.to_string());
            }
        }
        self.log.loading = false;
    }

    /// Append only after the server confirms; on failure the state is left
    /// untouched apart from the error banner.
    pub async fn add_food(&mut self, food: &str) {
        if self.log.loading || food.trim().is_empty() {
            return;
        }
        self.log.loading = true;
        self.log.error = None;
        match self
            .api
            .log_food(food, &self.user_id, Some(&self.log.date))
            .await
        {
            Ok(entry) => self.log.entries.push(entry),
            Err(e) => self.log.error = Some(e.to_string()),
        }
        self.log.loading = false;
    }

    pub async fn remove(&mut self, id: Uuid) {
        if self.log.loading {
            return;
        }
        self.log.loading = true;
        self.log.error = None;
        match self.api.delete_entry(id, &self.user_id).await {
            Ok(()) => self.log.entries.retain(|e| e.id != id),
            Err(e) => self.log.error = Some(e.to_string()),
        }
        self.log.loading = false;
    }

    pub async fn check_rollover(&mut self) {
        let today = dates::current_date_string();
        if self.roll_to(&today) {
            self.refresh().await;
        }
    }

    /// Client-local reset when the civil date changes; nothing is purged
    /// server side. Returns whether a reload is needed.
    fn roll_to(&mut self, today: &str) -> bool {
        if let Err(e) = self.store.note_date(today) {
            warn!(error = %e, "could not persist last seen date");
        }
        if today == self.log.date {
            return false;
        }
        self.log.date = today.to_string();
        self.log.entries.clear();
        self.log.error = None;
        true
    }

    pub fn totals(&self) -> MacroTotals {
        self.log.totals()
    }

    pub fn progress(&self) -> GoalProgress {
        self.log.totals().progress(&self.goals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::repo::FoodEntry;
    use crate::nutrition::MacroEstimate;

    fn controller(dir: &std::path::Path) -> Controller {
        Controller::new(
            ApiClient::new("http://localhost:0"),
            InstallationStore::at(dir),
            NutritionGoals::default(),
        )
        .expect("controller with writable store")
    }

    fn entry(date: &str) -> FoodEntry {
        FoodEntry::new(
            "u1",
            "1 banana",
            date.into(),
            MacroEstimate {
                calories: 95.0,
                protein: 0.5,
                carbs: 25.0,
                fats: 0.3,
            },
        )
    }

    #[test]
    fn same_day_is_not_a_rollover() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut c = controller(dir.path());
        let today = c.log.date.clone();
        c.log.entries.push(entry(&today));

        assert!(!c.roll_to(&today));
        assert_eq!(c.log.entries.len(), 1);
        assert_eq!(c.log.date, today);
    }

    #[test]
    fn date_change_clears_the_log() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut c = controller(dir.path());
        c.log.entries.push(entry(&c.log.date.clone()));
        c.log.error = Some("stale".into());

        assert!(c.roll_to("2099-01-01"));
        assert!(c.log.entries.is_empty());
        assert!(c.log.error.is_none());
        assert_eq!(c.log.date, "2099-01-01");
    }

    #[test]
    fn identity_comes_from_the_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let c = controller(dir.path());
        let again = controller(dir.path());
        assert_eq!(c.user_id(), again.user_id());
    }

    #[tokio::test]
    async fn add_food_ignores_blank_input() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut c = controller(dir.path());
        c.add_food("   ").await;
        assert!(c.log.entries.is_empty());
        assert!(c.log.error.is_none());
    }
}
