use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed sport taxonomy; the static strings are the Russian labels used both
/// in the JSON output and in the digest.
#[derive(
    strum::IntoStaticStr, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash,
)]
pub enum SportTag {
    #[strum(serialize = "футбол")]
    #[serde(rename = "футбол")]
    Football,
    #[strum(serialize = "теннис")]
    #[serde(rename = "теннис")]
    Tennis,
    #[strum(serialize = "хоккей")]
    #[serde(rename = "хоккей")]
    Hockey,
    #[strum(serialize = "баскетбол")]
    #[serde(rename = "баскетбол")]
    Basketball,
    #[strum(serialize = "велоспорт")]
    #[serde(rename = "велоспорт")]
    Cycling,
    #[strum(serialize = "гольф")]
    #[serde(rename = "гольф")]
    Golf,
    #[strum(serialize = "регби")]
    #[serde(rename = "регби")]
    Rugby,
    #[strum(serialize = "гандбол")]
    #[serde(rename = "гандбол")]
    Handball,
    #[strum(serialize = "бокс")]
    #[serde(rename = "бокс")]
    Boxing,
    #[strum(serialize = "другое")]
    #[serde(rename = "другое")]
    Other,
}

// JSON field names (`link`, `data`, `img`) are the wire format the downstream
// bot already consumes and are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEvent {
    pub category: SportTag,
    pub name: String,
    #[serde(rename = "link")]
    pub embed: String,
    #[serde(rename = "data", with = "record_date")]
    pub event_date: NaiveDate,
    pub time: String,
    #[serde(rename = "img")]
    pub image: Option<String>,
    pub premium: String,
    pub active: i32,
}

/// One listing-page fragment reduced to owned text, so nothing borrowed from
/// the parsed document crosses an await point.
#[derive(Debug, Clone)]
pub struct PostSummary {
    pub link: Option<String>,
    pub title: String,
    pub category_label: Option<String>,
    pub image: Option<String>,
}

/// Best-effort detail-page extraction; the two fields are independent.
#[derive(Debug, Clone, Default)]
pub struct StreamInfo {
    pub time_text: Option<String>,
    pub embed: Option<String>,
}

/// Why one fragment produced no record. Skips are absorbed per item and only
/// ever surface in the logs.
#[derive(Debug, Clone, PartialEq)]
pub enum Skip {
    NoLink,
    NoDate { title: String },
    OtherDate { title: String, date: NaiveDate },
    MissingEmbed { title: String },
    MissingTime { title: String },
    EmptyTitle { title: String },
}

mod record_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y.%m.%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;

        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> StreamEvent {
        StreamEvent {
            category: SportTag::Hockey,
            name: "КХЛ ЦСКА — Динамо".to_string(),
            embed: r#"<iframe src="https://example.com/embed/42"></iframe>"#.to_string(),
            event_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            time: "19:30".to_string(),
            image: Some("https://srrb.ru/img/42.jpg".to_string()),
            premium: String::new(),
            active: 0,
        }
    }

    #[test_log::test]
    fn record_round_trips_through_json() {
        let event = sample_event();

        let json = serde_json::to_string(&event).unwrap();
        let back: StreamEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(back, event);
    }

    #[test_log::test]
    fn record_uses_the_consumer_field_names() {
        let json = serde_json::to_string(&sample_event()).unwrap();

        assert!(json.contains(r#""category":"хоккей""#), "{json}");
        assert!(json.contains(r#""link":"#), "{json}");
        assert!(json.contains(r#""data":"2025.03.10""#), "{json}");
        assert!(json.contains(r#""img":"#), "{json}");
    }

    #[test_log::test]
    fn missing_image_round_trips_as_null() {
        let mut event = sample_event();
        event.image = None;

        let json = serde_json::to_string(&event).unwrap();
        let back: StreamEvent = serde_json::from_str(&json).unwrap();

        assert!(json.contains(r#""img":null"#), "{json}");
        assert_eq!(back.image, None);
    }
}
