use crate::config::model::CategoryTable;
use crate::srrb::model::{SportTag, StreamEvent};
use itertools::Itertools;
use std::collections::HashMap;
use voca_rs::case::capitalize;

const EMPTY_MESSAGE: &str = "🏟️ На сегодня спортивных трансляций не найдено 🏟️";
const ON_AIR_HEADER: &str = "📅 Сегодня в эфире:";
const CHANNEL_HANDLE: &str = "📺 @Live_Strim_bot";
const CALL_TO_ACTION: &str = "📌 Не пропустите интересные матчи!";
const HASHTAGS: &str = "#спорт #трансляции #спортивныйкалендарь";

/**
Renders the channel post: events grouped by category in the table's display
order, each group sorted by time. Both sides of the time are zero-padded, so
a plain string sort is a chronological one.
*/
pub fn build_digest(events: &[StreamEvent], table: &CategoryTable, date_label: &str) -> String {
    if events.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let groups: HashMap<SportTag, Vec<&StreamEvent>> = events
        .iter()
        .map(|event| (event.category, event))
        .into_group_map();

    let mut lines = vec![
        format!("🏟️ Спортивные трансляции на {} 🏟️", date_label),
        String::new(),
        ON_AIR_HEADER.to_string(),
        String::new(),
    ];

    for (tag, group) in groups
        .into_iter()
        .sorted_by_key(|(tag, _)| table.rank(*tag))
    {
        let label: &'static str = tag.into();
        lines.push(format!("{} {}", table.emoji(tag), capitalize(label, true)));

        for event in group.into_iter().sorted_by(|a, b| a.time.cmp(&b.time)) {
            lines.push(format!("⏰ {} - {}", event.time, event.name));
        }

        lines.push(String::new());
    }

    lines.push(CHANNEL_HANDLE.to_string());
    lines.push(String::new());
    lines.push(CALL_TO_ACTION.to_string());
    lines.push(HASHTAGS.to_string());

    lines.join("\n")
}
