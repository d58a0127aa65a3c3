use crate::srrb::model::SportTag;
use std::time::Duration;

const LISTING_URL: &str = "https://srrb.ru/category/translyacii-sportivnyx-sobytij";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.9";

#[derive(Debug)]
pub struct Config {
    pub listing_url: &'static str,
    pub user_agent: &'static str,
    pub accept_language: &'static str,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub max_workers: usize,
    pub include_next_day: bool,
    pub accept_invalid_certs: bool,
    pub records_file: &'static str,
    pub digest_file: &'static str,
    pub categories: CategoryTable,
}

impl Config {
    /**
    The whole configuration is compiled in; there are no flags and no
    environment overrides.
    */
    pub fn builtin() -> Self {
        Self {
            listing_url: LISTING_URL,
            user_agent: USER_AGENT,
            accept_language: ACCEPT_LANGUAGE,
            request_timeout: Duration::from_secs(15),
            max_retries: 3,
            max_workers: 4,
            include_next_day: false,
            accept_invalid_certs: false,
            records_file: "strimeList.json",
            digest_file: "telegram_post.txt",
            categories: CategoryTable::builtin(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CategorySpec {
    pub tag: SportTag,
    pub emoji: &'static str,
    /// Matched as case-insensitive substrings, in table order.
    pub keywords: &'static [&'static str],
    /// Position in the digest; lower renders first.
    pub rank: usize,
}

#[derive(Debug)]
pub struct CategoryTable {
    entries: Vec<CategorySpec>,
}

impl CategoryTable {
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                CategorySpec {
                    tag: SportTag::Hockey,
                    emoji: "🏒",
                    keywords: &["ВХЛ", "ХК", "МХЛ", "КХЛ", "ЖХЛ", "хоккей"],
                    rank: 2,
                },
                CategorySpec {
                    tag: SportTag::Basketball,
                    emoji: "🏀",
                    keywords: &["Баскетбол", "НБА", "Евролига"],
                    rank: 3,
                },
                CategorySpec {
                    tag: SportTag::Tennis,
                    emoji: "🎾",
                    keywords: &["ATP", "Теннис", "WTA", "US Open", "Ролан Гаррос"],
                    rank: 1,
                },
                CategorySpec {
                    tag: SportTag::Rugby,
                    emoji: "🏉",
                    keywords: &["Регби", "Про Д2"],
                    rank: 6,
                },
                CategorySpec {
                    tag: SportTag::Football,
                    emoji: "⚽️",
                    keywords: &["Футбол", "Лига чемпионов", "Премьер-лига"],
                    rank: 0,
                },
                CategorySpec {
                    tag: SportTag::Cycling,
                    emoji: "🚴",
                    keywords: &["Велоспорт"],
                    rank: 4,
                },
                CategorySpec {
                    tag: SportTag::Handball,
                    emoji: "🤾",
                    keywords: &["Гандбол"],
                    rank: 7,
                },
                CategorySpec {
                    tag: SportTag::Boxing,
                    emoji: "🥊",
                    keywords: &["боксу"],
                    rank: 8,
                },
                CategorySpec {
                    tag: SportTag::Golf,
                    emoji: "🏓",
                    keywords: &[],
                    rank: 5,
                },
                CategorySpec {
                    tag: SportTag::Other,
                    emoji: "🏟️",
                    keywords: &[],
                    rank: 9,
                },
            ],
        }
    }

    /**
    Returns the first tag one of whose keywords occurs in any of the given
    fields, or the catch-all tag. Matching is substring-based on purpose:
    a keyword hiding inside a longer unrelated word still counts.
    */
    pub fn classify(&self, fields: &[&str]) -> SportTag {
        let fields: Vec<String> = fields.iter().map(|f| f.to_lowercase()).collect();

        for entry in &self.entries {
            for keyword in entry.keywords {
                let keyword = keyword.to_lowercase();

                if fields.iter().any(|field| field.contains(&keyword)) {
                    return entry.tag;
                }
            }
        }

        SportTag::Other
    }

    pub fn rank(&self, tag: SportTag) -> usize {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.rank)
            .unwrap_or(self.entries.len())
    }

    pub fn emoji(&self, tag: SportTag) -> &'static str {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.emoji)
            .unwrap_or("🏟️")
    }
}
