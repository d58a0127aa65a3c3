use sportefir::api::{collect_streams, RunContext};
use sportefir::config::model::Config;
use sportefir::srrb::api::SrrbAPI;
use sportefir::srrb::model::StreamEvent;
use sportefir::telegram::digest::build_digest;
use std::fs;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _guard = sportefir::tracing::setup_logging();

    let config = Config::builtin();
    let ctx = RunContext::for_today(&config);
    let srrb = SrrbAPI::new(&config);

    info!("Starting the stream parser for {}", ctx.date_label());

    let events = match collect_streams(&srrb, &config, &ctx).await {
        Ok(events) => events,
        Err(err) => {
            // The run ends quietly: log output and missing files are the
            // only failure signals, the exit code stays zero.
            error!("Failed to load the listing page: {:?}", err);
            return;
        }
    };

    if events.is_empty() {
        info!("No streams found for {}", ctx.date_label());
        return;
    }

    let digest = build_digest(&events, &config.categories, &ctx.date_label());

    write_outputs(&config, &events, &digest);

    info!("Saved {} streams for {}", events.len(), ctx.date_label());

    println!("\n{}", "=".repeat(50));
    println!("{digest}");
    println!("{}\n", "=".repeat(50));
}

fn write_outputs(config: &Config, events: &[StreamEvent], digest: &str) {
    let records =
        serde_json::to_string_pretty(events).expect("Stream records are always serializable");

    if let Err(err) = fs::write(config.records_file, records) {
        error!("Failed to write {}: {}", config.records_file, err);
    }

    if let Err(err) = fs::write(config.digest_file, digest) {
        error!("Failed to write {}: {}", config.digest_file, err);
    }
}
