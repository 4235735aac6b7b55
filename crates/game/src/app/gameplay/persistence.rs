//! Save record stored under a single key.
//!
//! The record is flat JSON, `{"player":{"x","y","w","h","speed"},"day"}`, with no
//! version field. Loading merges field by field: anything missing keeps its live value
//! and unknown fields are ignored. Numbers must be finite and fit the renderer's `f32`
//! range, otherwise the whole record is rejected.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use skybound_engine::{KeyValueStore, StorageError};
use thiserror::Error;

use super::clock::DayClock;
use super::world::{Player, WorldPoint};

pub(crate) const SAVE_KEY: &str = "skyboundSave";

#[derive(Debug, Error)]
pub(crate) enum PersistenceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("encode save record: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("parse save record at {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct SavedPlayer {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "bounded_number")]
    pub(crate) x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "bounded_number")]
    pub(crate) y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "bounded_number")]
    pub(crate) w: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "bounded_number")]
    pub(crate) h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "bounded_number")]
    pub(crate) speed: Option<f64>,
}

fn bounded_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    match value {
        Some(number) if !number.is_finite() || number.abs() > f64::from(f32::MAX) => Err(
            D::Error::custom(format!("number {number} is outside the supported range")),
        ),
        _ => Ok(value),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct SaveRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) player: Option<SavedPlayer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) day: Option<u32>,
}

impl SaveRecord {
    pub(crate) fn capture(player: &Player, clock: &DayClock) -> Self {
        Self {
            player: Some(SavedPlayer {
                x: Some(player.position.x),
                y: Some(player.position.y),
                w: Some(player.size.x),
                h: Some(player.size.y),
                speed: Some(player.speed),
            }),
            day: Some(clock.day()),
        }
    }

    /// Overwrites only the fields present in the record.
    pub(crate) fn apply(&self, player: &mut Player, clock: &mut DayClock) {
        if let Some(saved) = self.player {
            let WorldPoint { x, y } = player.position;
            player.position = WorldPoint::new(saved.x.unwrap_or(x), saved.y.unwrap_or(y));
            let WorldPoint { x: w, y: h } = player.size;
            player.size = WorldPoint::new(saved.w.unwrap_or(w), saved.h.unwrap_or(h));
            player.speed = saved.speed.unwrap_or(player.speed);
        }
        if let Some(day) = self.day {
            clock.restore(day);
        }
    }
}

pub(crate) fn save(
    store: &mut dyn KeyValueStore,
    player: &Player,
    clock: &DayClock,
) -> Result<(), PersistenceError> {
    let record = SaveRecord::capture(player, clock);
    let json = serde_json::to_string(&record).map_err(PersistenceError::Encode)?;
    store.set(SAVE_KEY, &json)?;
    Ok(())
}

/// `Ok(None)` when nothing has been saved yet.
pub(crate) fn load(store: &dyn KeyValueStore) -> Result<Option<SaveRecord>, PersistenceError> {
    let Some(raw) = store.get(SAVE_KEY)? else {
        return Ok(None);
    };
    parse_save_record(&raw).map(Some)
}

fn parse_save_record(raw: &str) -> Result<SaveRecord, PersistenceError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let record = serde_path_to_error::deserialize::<_, SaveRecord>(&mut deserializer).map_err(
        |error| {
            let path = error.path().to_string();
            PersistenceError::Decode {
                path,
                source: error.into_inner(),
            }
        },
    )?;
    deserializer
        .end()
        .map_err(|source| PersistenceError::Decode {
            path: ".".to_string(),
            source,
        })?;
    Ok(record)
}
