use crate::config::model::Config;
use crate::srrb::api::{ListingError, SrrbAPI};
use crate::srrb::dto;
use crate::srrb::model::{PostSummary, Skip, StreamEvent, StreamInfo};
use chrono::{Local, NaiveDate};
use futures::{stream, Future, StreamExt};
use tracing::{debug, info, warn};

/// The date scope of one run, fixed at startup.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_date: NaiveDate,
    target_dates: Vec<NaiveDate>,
}

impl RunContext {
    pub fn new(run_date: NaiveDate, include_next_day: bool) -> Self {
        let mut target_dates = vec![run_date];

        if include_next_day {
            if let Some(next_day) = run_date.succ_opt() {
                target_dates.push(next_day);
            }
        }

        Self {
            run_date,
            target_dates,
        }
    }

    pub fn for_today(config: &Config) -> Self {
        Self::new(Local::now().date_naive(), config.include_next_day)
    }

    pub fn is_target(&self, date: NaiveDate) -> bool {
        self.target_dates.contains(&date)
    }

    pub fn date_label(&self) -> String {
        self.run_date.format("%d.%m.%Y").to_string()
    }
}

/**
Fetches the listing page and resolves every in-scope event on it into a
record, fanning the per-event work out over a bounded pool of workers.
*/
pub async fn collect_streams(
    srrb: &SrrbAPI,
    config: &Config,
    ctx: &RunContext,
) -> Result<Vec<StreamEvent>, ListingError> {
    let posts = srrb.get_listing().await?;

    if posts.is_empty() {
        warn!("No posts found on the listing page");
        return Ok(Vec::new());
    }

    info!("Found {} posts to process", posts.len());

    Ok(fan_out(posts, config.max_workers, |post| {
        process_post(srrb, config, ctx, post)
    })
    .await)
}

/// Runs `process` over all items with at most `workers` in flight, waits for
/// every item, and keeps the successes. Skips are absorbed here; one item can
/// never take another down with it.
pub async fn fan_out<T, F, Fut>(items: Vec<T>, workers: usize, process: F) -> Vec<StreamEvent>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<StreamEvent, Skip>>,
{
    stream::iter(items)
        .map(process)
        .buffer_unordered(workers)
        .filter_map(|outcome| async move {
            match outcome {
                Ok(event) => Some(event),
                Err(skip) => {
                    debug!("Skipping post: {:?}", skip);
                    None
                }
            }
        })
        .collect()
        .await
}

/// Resolves one listing fragment into a record, or a reason not to.
pub async fn process_post(
    srrb: &SrrbAPI,
    config: &Config,
    ctx: &RunContext,
    post: PostSummary,
) -> Result<StreamEvent, Skip> {
    let link = post.link.as_deref().ok_or(Skip::NoLink)?;

    let event_date = dto::extract_date(&post.title).ok_or_else(|| Skip::NoDate {
        title: post.title.clone(),
    })?;

    if !ctx.is_target(event_date) {
        return Err(Skip::OtherDate {
            title: post.title.clone(),
            date: event_date,
        });
    }

    let info = srrb.get_stream_info(link).await;

    assemble_event(config, post, event_date, info)
}

/**
The pure tail of event processing: everything after the detail page has been
fetched. The broadcast time announced in the title wins over the one on the
detail page, but a detail page with no time text at all disqualifies the
event either way.
*/
pub fn assemble_event(
    config: &Config,
    post: PostSummary,
    event_date: NaiveDate,
    info: StreamInfo,
) -> Result<StreamEvent, Skip> {
    let embed = info.embed.ok_or_else(|| Skip::MissingEmbed {
        title: post.title.clone(),
    })?;

    let time_text = info.time_text.ok_or_else(|| Skip::MissingTime {
        title: post.title.clone(),
    })?;

    let time = dto::time_from_title(&post.title)
        .or_else(|| dto::extract_time(&time_text))
        .ok_or_else(|| Skip::MissingTime {
            title: post.title.clone(),
        })?;

    let name = dto::clean_title(&post.title, event_date, &time);

    if name.is_empty() {
        return Err(Skip::EmptyTitle { title: post.title });
    }

    let mut fields = vec![name.as_str()];
    if let Some(label) = post.category_label.as_deref() {
        fields.push(label);
    }
    let category = config.categories.classify(&fields);

    Ok(StreamEvent {
        category,
        name,
        embed,
        event_date,
        time,
        image: post.image,
        premium: String::new(),
        active: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srrb::model::SportTag;

    fn post(title: &str) -> PostSummary {
        PostSummary {
            link: Some("https://srrb.ru/match".to_string()),
            title: title.to_string(),
            category_label: None,
            image: None,
        }
    }

    fn info(time_text: &str, embed: &str) -> StreamInfo {
        StreamInfo {
            time_text: Some(time_text.to_string()),
            embed: Some(embed.to_string()),
        }
    }

    fn target_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test_log::test]
    fn assembles_a_full_record() {
        let config = Config::builtin();

        let event = assemble_event(
            &config,
            post("Смотреть Хоккей. КХЛ ЦСКА — Динамо 10.03.2025 онлайн"),
            target_date(),
            info(
                "Начало трансляции в 19:30 мск",
                r#"<iframe src="https://player.example/42"></iframe>"#,
            ),
        )
        .unwrap();

        assert_eq!(event.category, SportTag::Hockey);
        assert_eq!(event.name, "Хоккей. КХЛ ЦСКА Динамо");
        assert_eq!(event.time, "19:30");
        assert_eq!(event.event_date, target_date());
        assert_eq!(event.premium, "");
        assert_eq!(event.active, 0);
    }

    #[test_log::test]
    fn title_time_beats_detail_page_time() {
        let config = Config::builtin();

        let event = assemble_event(
            &config,
            post("Футбол. ЦСКА — Зенит 10.03.2025 в 20:45"),
            target_date(),
            info(
                "Начало в 19:30 мск",
                r#"<iframe src="https://player.example/1"></iframe>"#,
            ),
        )
        .unwrap();

        assert_eq!(event.time, "20:45");
    }

    #[test_log::test]
    fn missing_embed_or_time_text_is_a_skip() {
        let config = Config::builtin();

        let no_embed = assemble_event(
            &config,
            post("Футбол 10.03.2025"),
            target_date(),
            StreamInfo {
                time_text: Some("Начало в 19:30".to_string()),
                embed: None,
            },
        );
        assert!(matches!(no_embed, Err(Skip::MissingEmbed { .. })));

        let no_time_text = assemble_event(
            &config,
            post("Футбол 10.03.2025 в 19:30"),
            target_date(),
            StreamInfo {
                time_text: None,
                embed: Some("<iframe src=\"https://player.example/1\"></iframe>".to_string()),
            },
        );
        assert!(matches!(no_time_text, Err(Skip::MissingTime { .. })));

        let unparseable_time = assemble_event(
            &config,
            post("Футбол 10.03.2025"),
            target_date(),
            info(
                "Прямой эфир сегодня",
                r#"<iframe src="https://player.example/1"></iframe>"#,
            ),
        );
        assert!(matches!(unparseable_time, Err(Skip::MissingTime { .. })));
    }

    #[test_log::test]
    fn cleanup_leaving_nothing_is_a_skip() {
        let config = Config::builtin();

        let result = assemble_event(
            &config,
            post("Смотреть онлайн 10.03.2025"),
            target_date(),
            info(
                "Начало в 19:30",
                r#"<iframe src="https://player.example/1"></iframe>"#,
            ),
        );

        assert!(matches!(result, Err(Skip::EmptyTitle { .. })));
    }

    #[test_log::test]
    fn page_category_label_feeds_classification() {
        let config = Config::builtin();
        let mut labelled = post("ЦСКА — Зенит 10.03.2025");
        labelled.category_label = Some("баскетбол".to_string());

        let event = assemble_event(
            &config,
            labelled,
            target_date(),
            info(
                "Начало в 12:00",
                r#"<iframe src="https://player.example/1"></iframe>"#,
            ),
        )
        .unwrap();

        assert_eq!(event.category, SportTag::Basketball);
    }

    #[test_log::test(tokio::test)]
    async fn fan_out_absorbs_failures_without_cascading() {
        let config = Config::builtin();
        let date = target_date();

        let items: Vec<u32> = (0..10).collect();
        let events = fan_out(items, 4, |index| {
            let config = &config;
            async move {
                if index % 2 == 0 {
                    return Err(Skip::NoLink);
                }

                assemble_event(
                    config,
                    post(&format!("Гандбол. Матч {index} 10.03.2025")),
                    date,
                    info(
                        "Начало в 15:00",
                        r#"<iframe src="https://player.example/1"></iframe>"#,
                    ),
                )
            }
        })
        .await;

        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|event| event.category == SportTag::Handball));
    }

    #[test_log::test]
    fn out_of_scope_dates_skip_before_any_fetch() {
        let ctx = RunContext::new(target_date(), false);

        assert!(!ctx.is_target(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()));
        assert!(ctx.is_target(target_date()));
    }

    #[test_log::test]
    fn including_next_day_widens_the_target_window() {
        let ctx = RunContext::new(target_date(), true);

        assert!(ctx.is_target(NaiveDate::from_ymd_opt(2025, 3, 11).unwrap()));
        assert!(!ctx.is_target(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()));
    }
}
