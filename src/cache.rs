/// Time-bounded caches for externally-fetched widget data
///
/// Records live in the local partition, one key per resource. A record
/// is valid only while fresh; missing, undecodable, and expired records
/// all read back as absent so callers cannot distinguish staleness.
/// Stale records are never deleted on read, only overwritten by the next
/// successful fetch.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::store::{JsonMap, SettingsStore, StorageArea, StoreError};

pub const WEATHER_CACHE_KEY: &str = "weatherCache";
pub const WALLPAPER_CACHE_KEY: &str = "wallpaperCache";
pub const QUOTE_CACHE_KEY: &str = "quoteCache";

pub const WEATHER_CACHE_WINDOW_MS: f64 = 30.0 * 60.0 * 1000.0;
pub const WALLPAPER_CACHE_WINDOW_MS: f64 = 60.0 * 60.0 * 1000.0;

/// A payload stamped with its creation time (epoch milliseconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TimedRecord<T> {
    #[serde(flatten)]
    payload: T,
    timestamp: f64,
}

/// A payload valid until the viewer's local calendar date changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DailyRecord<T> {
    #[serde(flatten)]
    payload: T,
    date: DateStamp,
}

/// A local calendar date. The caller derives it from the host clock so
/// freshness follows the viewer's time zone, not UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateStamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateStamp {
    pub fn new(year: i32, month: u32, day: u32) -> DateStamp {
        DateStamp { year, month, day }
    }

    /// Monotonic-enough day index, used to pick the quote of the day.
    pub fn ordinal(&self) -> usize {
        (self.year.unsigned_abs() as usize) * 372 + (self.month as usize) * 31 + self.day as usize
    }
}

/// Read a window-bounded cache record. Absent on miss, decode failure,
/// store failure, or expiry.
pub async fn read_timed<T: DeserializeOwned>(
    store: &impl SettingsStore,
    key: &str,
    max_age_ms: f64,
    now_ms: f64,
) -> Option<T> {
    let mut raw = store.get(StorageArea::Local, &[key]).await.ok()?;
    let value = raw.remove(key)?;
    let record: TimedRecord<T> = serde_json::from_value(value).ok()?;
    (now_ms - record.timestamp < max_age_ms).then_some(record.payload)
}

/// Stamp the current time and overwrite the record unconditionally.
pub async fn write_timed<T: Serialize>(
    store: &impl SettingsStore,
    key: &str,
    payload: &T,
    now_ms: f64,
) -> Result<(), StoreError> {
    let record = serde_json::to_value(TimedRecord {
        payload,
        timestamp: now_ms,
    })?;
    let mut entries = JsonMap::new();
    entries.insert(key.to_string(), record);
    store.set(StorageArea::Local, entries).await
}

/// Read a calendar-day cache record; absent once the local date moves on.
pub async fn read_daily<T: DeserializeOwned>(
    store: &impl SettingsStore,
    key: &str,
    today: DateStamp,
) -> Option<T> {
    let mut raw = store.get(StorageArea::Local, &[key]).await.ok()?;
    let value = raw.remove(key)?;
    let record: DailyRecord<T> = serde_json::from_value(value).ok()?;
    (record.date == today).then_some(record.payload)
}

pub async fn write_daily<T: Serialize>(
    store: &impl SettingsStore,
    key: &str,
    payload: &T,
    today: DateStamp,
) -> Result<(), StoreError> {
    let record = serde_json::to_value(DailyRecord {
        payload,
        date: today,
    })?;
    let mut entries = JsonMap::new();
    entries.insert(key.to_string(), record);
    store.set(StorageArea::Local, entries).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use futures::executor::block_on;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Payload {
        value: String,
    }

    fn payload(value: &str) -> Payload {
        Payload {
            value: value.to_string(),
        }
    }

    #[test]
    fn test_record_fresh_just_inside_window() {
        let store = MemoryStore::new();
        let written_at = 1_700_000_000_000.0;
        block_on(write_timed(&store, WEATHER_CACHE_KEY, &payload("sunny"), written_at)).unwrap();

        let just_inside = written_at + WEATHER_CACHE_WINDOW_MS - 1_000.0; // T+29m59s
        let read: Option<Payload> = block_on(read_timed(
            &store,
            WEATHER_CACHE_KEY,
            WEATHER_CACHE_WINDOW_MS,
            just_inside,
        ));

        assert_eq!(read, Some(payload("sunny")));
    }

    #[test]
    fn test_record_absent_just_past_window() {
        let store = MemoryStore::new();
        let written_at = 1_700_000_000_000.0;
        block_on(write_timed(&store, WEATHER_CACHE_KEY, &payload("sunny"), written_at)).unwrap();

        let just_past = written_at + WEATHER_CACHE_WINDOW_MS + 1_000.0; // T+30m01s
        let read: Option<Payload> = block_on(read_timed(
            &store,
            WEATHER_CACHE_KEY,
            WEATHER_CACHE_WINDOW_MS,
            just_past,
        ));

        assert_eq!(read, None);
    }

    #[test]
    fn test_stale_record_is_not_deleted_by_read() {
        let store = MemoryStore::new();
        let written_at = 0.0;
        block_on(write_timed(&store, WALLPAPER_CACHE_KEY, &payload("img"), written_at)).unwrap();

        let _: Option<Payload> = block_on(read_timed(
            &store,
            WALLPAPER_CACHE_KEY,
            WALLPAPER_CACHE_WINDOW_MS,
            written_at + WALLPAPER_CACHE_WINDOW_MS * 2.0,
        ));

        let raw = block_on(store.get(StorageArea::Local, &[WALLPAPER_CACHE_KEY])).unwrap();
        assert!(raw.contains_key(WALLPAPER_CACHE_KEY));
    }

    #[test]
    fn test_never_set_and_expired_read_identically() {
        let store = MemoryStore::new();

        let missing: Option<Payload> =
            block_on(read_timed(&store, WEATHER_CACHE_KEY, WEATHER_CACHE_WINDOW_MS, 0.0));

        block_on(write_timed(&store, WEATHER_CACHE_KEY, &payload("old"), 0.0)).unwrap();
        let expired: Option<Payload> = block_on(read_timed(
            &store,
            WEATHER_CACHE_KEY,
            WEATHER_CACHE_WINDOW_MS,
            WEATHER_CACHE_WINDOW_MS * 2.0,
        ));

        assert_eq!(missing, expired);
    }

    #[test]
    fn test_undecodable_record_reads_as_absent() {
        let store = MemoryStore::new();
        let mut entries = JsonMap::new();
        entries.insert(WEATHER_CACHE_KEY.into(), json!("not a record"));
        block_on(store.set(StorageArea::Local, entries)).unwrap();

        let read: Option<Payload> =
            block_on(read_timed(&store, WEATHER_CACHE_KEY, WEATHER_CACHE_WINDOW_MS, 0.0));

        assert_eq!(read, None);
    }

    #[test]
    fn test_write_overwrites_wholesale() {
        let store = MemoryStore::new();
        block_on(write_timed(&store, WEATHER_CACHE_KEY, &payload("old"), 0.0)).unwrap();
        block_on(write_timed(&store, WEATHER_CACHE_KEY, &payload("new"), 1_000.0)).unwrap();

        let read: Option<Payload> =
            block_on(read_timed(&store, WEATHER_CACHE_KEY, WEATHER_CACHE_WINDOW_MS, 2_000.0));

        assert_eq!(read, Some(payload("new")));
    }

    #[test]
    fn test_timed_record_layout_is_flat() {
        let store = MemoryStore::new();
        block_on(write_timed(&store, WEATHER_CACHE_KEY, &payload("sunny"), 5.0)).unwrap();

        let raw = block_on(store.get(StorageArea::Local, &[WEATHER_CACHE_KEY])).unwrap();
        assert_eq!(
            raw[WEATHER_CACHE_KEY],
            json!({"value": "sunny", "timestamp": 5.0})
        );
    }

    #[test]
    fn test_daily_record_valid_same_day_only() {
        let store = MemoryStore::new();
        let today = DateStamp::new(2026, 8, 30);
        block_on(write_daily(&store, QUOTE_CACHE_KEY, &payload("quote"), today)).unwrap();

        let same_day: Option<Payload> = block_on(read_daily(&store, QUOTE_CACHE_KEY, today));
        let next_day: Option<Payload> =
            block_on(read_daily(&store, QUOTE_CACHE_KEY, DateStamp::new(2026, 8, 31)));

        assert_eq!(same_day, Some(payload("quote")));
        assert_eq!(next_day, None);
    }
}
