//! Reply history persistence and management.
//!
//! Items live under one key of the local [`KvStore`] as a JSON array,
//! newest first, capped at a configurable length.

use chrono::{DateTime, Duration as ChronoDuration, Local, TimeZone};
use replykit_core::config::DEFAULT_MAX_HISTORY;
use replykit_core::{HistoryItem, Result, SceneType};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::kv::KvStore;

/// Storage key of the history list.
pub const HISTORY_KEY: &str = "reply_history";

/// Storage for generated replies
#[derive(Debug, Clone)]
pub struct HistoryStore {
    /// Backing key-value store
    kv: KvStore,
    /// Maximum number of items kept
    max_items: usize,
}

/// Items bucketed by age relative to local midnight.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryGroups {
    /// Created since local midnight.
    pub today: Vec<HistoryItem>,
    /// Created during the previous day.
    pub yesterday: Vec<HistoryItem>,
    /// Created during the seven days before today.
    pub this_week: Vec<HistoryItem>,
    /// Anything older.
    pub earlier: Vec<HistoryItem>,
}

impl HistoryGroups {
    /// Non-empty groups with their display titles, newest first.
    pub fn labeled(&self) -> Vec<(&'static str, &[HistoryItem])> {
        [
            ("今天", self.today.as_slice()),
            ("昨天", self.yesterday.as_slice()),
            ("本周", self.this_week.as_slice()),
            ("更早", self.earlier.as_slice()),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .collect()
    }
}

/// Counters shown on the profile view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryStats {
    /// Number of stored items.
    pub total: usize,
    /// Number of favorite items.
    pub favorites: usize,
    /// Items per scene.
    pub by_scene: BTreeMap<String, usize>,
}

impl HistoryStore {
    /// Creates a history store on top of `kv` with the default cap.
    pub fn new(kv: KvStore) -> Self {
        Self {
            kv,
            max_items: DEFAULT_MAX_HISTORY,
        }
    }

    /// Sets the maximum number of items kept.
    #[must_use]
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    /// Returns all items, newest first.
    ///
    /// Unreadable storage is logged and treated as an empty history.
    pub fn list(&self) -> Vec<HistoryItem> {
        match self.kv.get::<Vec<HistoryItem>>(HISTORY_KEY) {
            Ok(items) => items.unwrap_or_default(),
            Err(err) => {
                warn!("Failed to load history: {err}");
                Vec::new()
            }
        }
    }

    /// Inserts `item` at the front and drops the oldest items beyond the cap.
    ///
    /// # Errors
    /// Returns an error if the history cannot be written
    pub fn add(&self, item: HistoryItem) -> Result<()> {
        let mut items = self.list();
        debug!("Saving history item {}", item.id);
        items.insert(0, item);
        items.truncate(self.max_items);
        self.kv.set(HISTORY_KEY, &items)
    }

    /// Removes every item with `id`.
    ///
    /// # Errors
    /// Returns an error if the history cannot be written
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut items = self.list();
        items.retain(|item| item.id != id);
        self.kv.set(HISTORY_KEY, &items)
    }

    /// Flips the favorite flag of `id` and returns the new value.
    ///
    /// Unknown ids return `false` without writing.
    ///
    /// # Errors
    /// Returns an error if the history cannot be written
    pub fn toggle_favorite(&self, id: &str) -> Result<bool> {
        let mut items = self.list();
        let Some(item) = items.iter_mut().find(|item| item.id == id) else {
            return Ok(false);
        };
        item.is_favorite = !item.is_favorite;
        let favorite = item.is_favorite;
        self.kv.set(HISTORY_KEY, &items)?;
        Ok(favorite)
    }

    /// Returns favorite items, newest first.
    pub fn favorites(&self) -> Vec<HistoryItem> {
        self.list()
            .into_iter()
            .filter(|item| item.is_favorite)
            .collect()
    }

    /// Empties the history.
    ///
    /// # Errors
    /// Returns an error if the history cannot be written
    pub fn clear(&self) -> Result<()> {
        self.kv.set(HISTORY_KEY, &Vec::<HistoryItem>::new())
    }

    /// Looks up one item.
    pub fn get(&self, id: &str) -> Option<HistoryItem> {
        self.list().into_iter().find(|item| item.id == id)
    }

    /// Totals for the profile view.
    pub fn stats(&self) -> HistoryStats {
        let items = self.list();
        let mut by_scene = BTreeMap::new();
        for item in &items {
            *by_scene.entry(item.scene.to_string()).or_insert(0) += 1;
        }
        HistoryStats {
            total: items.len(),
            favorites: items.iter().filter(|item| item.is_favorite).count(),
            by_scene,
        }
    }
}

/// Keeps the items of `scene`; `All` keeps everything.
pub fn filter_by_scene(items: Vec<HistoryItem>, scene: SceneType) -> Vec<HistoryItem> {
    if scene == SceneType::All {
        return items;
    }
    items.into_iter().filter(|item| item.scene == scene).collect()
}

/// Buckets `items` by age relative to the local midnight of `now`.
pub fn group_by_age<Tz: TimeZone>(items: Vec<HistoryItem>, now: &DateTime<Tz>) -> HistoryGroups {
    let midnight = now
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(now.timezone()).earliest())
        .map_or_else(|| now.timestamp_millis(), |start| start.timestamp_millis());
    let day = ChronoDuration::days(1).num_milliseconds();
    let yesterday = midnight - day;
    let this_week = midnight - 7 * day;

    let mut groups = HistoryGroups::default();
    for item in items {
        if item.timestamp >= midnight {
            groups.today.push(item);
        } else if item.timestamp >= yesterday {
            groups.yesterday.push(item);
        } else if item.timestamp >= this_week {
            groups.this_week.push(item);
        } else {
            groups.earlier.push(item);
        }
    }
    groups
}

/// Buckets `items` relative to the current local time.
pub fn group_by_age_now(items: Vec<HistoryItem>) -> HistoryGroups {
    group_by_age(items, &Local::now())
}
