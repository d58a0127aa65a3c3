use super::model::{PostSummary, StreamInfo};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};

const POST_SELECTOR: &str = "article.post";
const ANCHOR_SELECTOR: &str = "a";
const IMAGE_SELECTOR: &str = "img[src]";
const CATEGORY_LABEL_SELECTOR: &str = ".cat-links a";

const CONTENT_SELECTOR: &str = "div.entry-content";
const PARAGRAPH_SELECTOR: &str = "p";
const EMBED_SELECTOR: &str = "iframe[src]";

/// Phrases that mark a paragraph as carrying the broadcast time.
const BROADCAST_KEYWORDS: &[&str] = &["прямой эфир", "начало", "трансляция", "мск"];

/// Dropped from titles during cleanup, by exact token match.
const FILLER_WORDS: &[&str] = &["Смотреть", "онлайн", "трансляция", "эфир", "в", "мск", "—"];

// Genitive stems; `[а-яё]*` in the pattern absorbs whatever case ending the
// title uses ("января", "январём", ...). May needs both forms spelled out.
const MONTH_STEMS: [&str; 12] = [
    "январ", "феврал", "март", "апрел", "ма[йя]", "июн", "июл", "август", "сентябр", "октябр",
    "ноябр", "декабр",
];

lazy_static! {
    static ref NUMERIC_DATE: Regex =
        Regex::new(r"(\d{2})\.(\d{2})\.(\d{4})").expect("Failed to create numeric date regex");
    static ref MONTH_DATES: Vec<(u32, Regex)> = MONTH_STEMS
        .iter()
        .enumerate()
        .map(|(index, stem)| {
            let pattern = format!(r"(?i)(\d{{1,2}})\s+{stem}[а-яё]*\s+(\d{{4}})");

            (
                index as u32 + 1,
                Regex::new(&pattern).expect("Failed to create month date regex"),
            )
        })
        .collect();
    static ref TIME: Regex = Regex::new(r"(\d{1,2}:\d{2})").expect("Failed to create time regex");
    static ref TITLE_TIME: Regex =
        Regex::new(r"в\s+(\d{1,2}:\d{2})").expect("Failed to create title time regex");
    static ref TIME_TOKEN: Regex =
        Regex::new(r"^\d{1,2}:\d{2}$").expect("Failed to create time token regex");
}

/**
Pulls a calendar date out of a freeform title. The strict `DD.MM.YYYY` form
wins over the spelled-out month form; whichever pattern matches first decides,
and an unconstructible combination (e.g. 31.02) is simply "not found".
*/
pub fn extract_date(title: &str) -> Option<NaiveDate> {
    if let Some(caps) = NUMERIC_DATE.captures(title) {
        let day = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;

        return NaiveDate::from_ymd_opt(year, month, day);
    }

    for (month, pattern) in MONTH_DATES.iter() {
        if let Some(caps) = pattern.captures(title) {
            let day = caps[1].parse().ok()?;
            let year = caps[2].parse().ok()?;

            return NaiveDate::from_ymd_opt(year, *month, day);
        }
    }

    None
}

/// First `HH:MM` found in the text, zero-padded.
pub fn extract_time(text: &str) -> Option<String> {
    TIME.captures(text).map(|caps| pad_time(&caps[1]))
}

/// Time announced in the title itself ("... в 19:30 мск"); preferred over the
/// detail page when present.
pub fn time_from_title(title: &str) -> Option<String> {
    TITLE_TIME.captures(title).map(|caps| pad_time(&caps[1]))
}

fn pad_time(time: &str) -> String {
    format!("{time:0>5}")
}

/// Strips filler vocabulary plus the already-extracted date and time tokens,
/// keeping the remaining words in order.
pub fn clean_title(title: &str, date: NaiveDate, time: &str) -> String {
    let date_token = date.format("%d.%m.%Y").to_string();

    title
        .split_whitespace()
        .filter(|word| !FILLER_WORDS.contains(word))
        .filter(|word| *word != date_token)
        .filter(|word| *word != time && !TIME_TOKEN.is_match(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reduces every event fragment on the listing page to owned text. Fragments
/// with missing pieces are still returned; deciding what to do with them is
/// the processor's call.
pub fn parse_listing(html: &str) -> Vec<PostSummary> {
    let document = Html::parse_document(html);
    let post = Selector::parse(POST_SELECTOR).expect("Failed to parse post selector");
    let anchor = Selector::parse(ANCHOR_SELECTOR).expect("Failed to parse anchor selector");
    let image = Selector::parse(IMAGE_SELECTOR).expect("Failed to parse image selector");
    let category_label =
        Selector::parse(CATEGORY_LABEL_SELECTOR).expect("Failed to parse category selector");

    document
        .select(&post)
        .map(|fragment| {
            let (link, title) = match fragment.select(&anchor).next() {
                Some(anchor) => (
                    anchor
                        .value()
                        .attr("href")
                        .filter(|href| !href.is_empty())
                        .map(str::to_string),
                    anchor.text().collect::<String>().trim().to_string(),
                ),
                None => (None, String::new()),
            };

            PostSummary {
                link,
                title,
                category_label: fragment
                    .select(&category_label)
                    .next()
                    .map(|label| label.text().collect::<String>().trim().to_string())
                    .filter(|label| !label.is_empty()),
                image: fragment
                    .select(&image)
                    .next()
                    .and_then(|image| image.value().attr("src"))
                    .filter(|src| !src.is_empty())
                    .map(str::to_string),
            }
        })
        .collect()
}

/**
Extracts the broadcast time text and the embeddable player from a detail page.
The two lookups are independent; either can come back empty without affecting
the other.
*/
pub fn parse_stream_info(html: &str) -> StreamInfo {
    let document = Html::parse_document(html);
    let content = Selector::parse(CONTENT_SELECTOR).expect("Failed to parse content selector");
    let paragraph =
        Selector::parse(PARAGRAPH_SELECTOR).expect("Failed to parse paragraph selector");
    let embed = Selector::parse(EMBED_SELECTOR).expect("Failed to parse embed selector");

    let time_text = document.select(&content).next().and_then(|content| {
        content
            .select(&paragraph)
            .find(|paragraph| {
                let text = paragraph.text().collect::<String>().to_lowercase();

                BROADCAST_KEYWORDS
                    .iter()
                    .any(|keyword| text.contains(keyword))
            })
            .map(|paragraph| paragraph.text().collect::<String>().trim().to_string())
    });

    let embed = document
        .select(&embed)
        .find(|frame| {
            frame
                .value()
                .attr("src")
                .is_some_and(|src| !src.is_empty())
        })
        .map(|frame| frame.html());

    StreamInfo { time_text, embed }
}
