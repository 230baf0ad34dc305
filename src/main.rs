use douyin_harvester::config::Config;
use douyin_harvester::crawler::CrawlCoordinator;
use log::info;
use std::error::Error;
use std::io::{self, Write};
use std::path::Path;

/// The per-target video cap is supplied interactively, so test runs can
/// keep the data volume small.
fn prompt_video_cap() -> Result<usize, Box<dyn Error>> {
    print!("Videos to capture per creator: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let cap = line
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid video count: {}", e))?;

    Ok(cap)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = Config::load(Path::new("config.toml"))?;
    if config.targets.is_empty() {
        return Err("no targets configured in config.toml".into());
    }

    let max_videos = prompt_video_cap()?;

    // The coordinator owns the browser; dropping it on any exit path,
    // including the error returns below, releases the browser process.
    let coordinator = CrawlCoordinator::new(config)?;
    coordinator.run(max_videos);

    info!("crawl finished");
    Ok(())
}
