/// Save data: the player profile, the level registry, and settings.
///
/// ## Documents
///
///   `player`   `{ "introCompleted": bool }`
///   `levels`   `{ "items": [ { "id": "be", "progress": 1.0, "unlocked": true }, ... ] }`
///   `settings` `{ "musicVolume": 1.0, "sfxVolume": 1.0 }`
///
/// ## Failure policy
///
/// A document that is missing or fails to parse is treated as absent and
/// the caller gets defaults. Write and delete failures are logged and
/// swallowed: nothing in here can stop the game flow.

use serde::{Deserialize, Serialize};

use super::store::{Store, StoreError};
use crate::domain::letter::LetterId;
use crate::domain::level::{LevelRecord, LevelRegistry};

pub const PLAYER_KEY: &str = "player";
pub const LEVELS_KEY: &str = "levels";
pub const SETTINGS_KEY: &str = "settings";

/// Read and decode a document. Corrupt or unreadable counts as absent.
fn read_doc<T: for<'de> Deserialize<'de>>(store: &dyn Store, key: &str) -> Option<T> {
    let text = match store.read(key) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("reading {key} failed, using defaults: {e}");
            return None;
        }
    };
    if text.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(&text) {
        Ok(doc) => Some(doc),
        Err(e) => {
            log::warn!("{key} is corrupt, using defaults: {e}");
            None
        }
    }
}

/// Encode and write a document. Returns false (after logging) on failure.
fn write_doc<T: Serialize>(store: &mut dyn Store, key: &str, doc: &T) -> bool {
    let result = serde_json::to_string(doc)
        .map_err(|e| StoreError::Serialize { key: key.to_string(), message: e.to_string() })
        .and_then(|text| store.write(key, &text));
    match result {
        Ok(()) => true,
        Err(e) => {
            log::warn!("saving {key} failed: {e}");
            false
        }
    }
}

fn delete_doc(store: &mut dyn Store, key: &str) {
    if let Err(e) = store.delete(key) {
        log::warn!("deleting {key} failed (ignored): {e}");
    }
}

// ══════════════════════════════════════════════════════════════
// Player profile
// ══════════════════════════════════════════════════════════════

pub mod player {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PlayerProfile {
        #[serde(default)]
        pub intro_completed: bool,
    }

    pub fn load_or_default(store: &dyn Store) -> PlayerProfile {
        read_doc(store, PLAYER_KEY).unwrap_or_default()
    }

    pub fn save(store: &mut dyn Store, profile: &PlayerProfile) {
        write_doc(store, PLAYER_KEY, profile);
    }

    pub fn delete_all(store: &mut dyn Store) {
        delete_doc(store, PLAYER_KEY);
    }
}

// ══════════════════════════════════════════════════════════════
// Level registry
// ══════════════════════════════════════════════════════════════

pub mod levels {
    use super::*;

    #[derive(Serialize, Deserialize, Debug, Default)]
    struct LevelDoc {
        #[serde(default)]
        items: Vec<LevelItem>,
    }

    #[derive(Serialize, Deserialize, Debug)]
    struct LevelItem {
        id: String,
        #[serde(default)]
        progress: f32,
        #[serde(default)]
        unlocked: bool,
    }

    fn to_doc(registry: &LevelRegistry) -> LevelDoc {
        LevelDoc {
            items: registry
                .iter()
                .map(|r| LevelItem {
                    id: r.id.key().to_string(),
                    progress: r.progress,
                    unlocked: r.unlocked,
                })
                .collect(),
        }
    }

    /// Load the stored set and repair it into exactly one record per letter.
    ///
    /// Letters missing from storage get locked defaults, unknown ids are
    /// dropped. If anything had to change the repaired set is written back.
    pub fn load_or_create_complete_set(store: &mut dyn Store) -> LevelRegistry {
        let loaded: Option<LevelDoc> = read_doc(store, LEVELS_KEY);
        let stored_was_present = loaded.is_some();
        let items = loaded.map(|d| d.items).unwrap_or_default();

        let mut dropped = 0usize;
        let records: Vec<LevelRecord> = items
            .into_iter()
            .filter_map(|item| match LetterId::from_key(&item.id) {
                Some(id) => Some(LevelRecord { id, progress: item.progress, unlocked: item.unlocked }),
                None => {
                    dropped += 1;
                    None
                }
            })
            .collect();

        let (registry, repaired) = LevelRegistry::from_records(records);

        if repaired || dropped > 0 || !stored_was_present {
            if dropped > 0 {
                log::info!("dropped {dropped} unknown level record(s)");
            }
            log::info!("level set repaired, writing back {} records", registry.len());
            save(store, &registry);
        }

        registry
    }

    pub fn save(store: &mut dyn Store, registry: &LevelRegistry) {
        write_doc(store, LEVELS_KEY, &to_doc(registry));
    }

    /// Open the first letter and persist. Safe to call any number of times.
    pub fn ensure_first_unlocked(store: &mut dyn Store, registry: &mut LevelRegistry) {
        if registry.ensure_first_unlocked() {
            log::info!("first level unlocked");
        }
        save(store, registry);
    }

    pub fn delete_all(store: &mut dyn Store) {
        delete_doc(store, LEVELS_KEY);
    }
}

// ══════════════════════════════════════════════════════════════
// Settings (music / sfx volume)
// ══════════════════════════════════════════════════════════════

pub mod settings {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Settings {
        #[serde(default = "full_volume")]
        pub music_volume: f32,
        #[serde(default = "full_volume")]
        pub sfx_volume: f32,
    }

    fn full_volume() -> f32 { 1.0 }

    impl Default for Settings {
        fn default() -> Self {
            Settings { music_volume: 1.0, sfx_volume: 1.0 }
        }
    }

    impl Settings {
        pub fn clamped(self) -> Self {
            let clamp = |v: f32| if v.is_nan() { 1.0 } else { v.clamp(0.0, 1.0) };
            Settings {
                music_volume: clamp(self.music_volume),
                sfx_volume: clamp(self.sfx_volume),
            }
        }
    }

    pub fn load_or_default(store: &dyn Store) -> Settings {
        read_doc::<Settings>(store, SETTINGS_KEY)
            .unwrap_or_default()
            .clamped()
    }

    pub fn save(store: &mut dyn Store, settings: &Settings) {
        write_doc(store, SETTINGS_KEY, &settings.clamped());
    }
}
