use anyhow::{anyhow, Result};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

use crate::constants::PROJECT_NAME;

pub fn setup_logger(level: &str) -> Result<()> {
    let level: LevelFilter = level
        .parse()
        .map_err(|_| anyhow!("invalid log level {level:?}"))?;

    let colors = ColoredLevelConfig {
        trace: Color::Cyan,
        debug: Color::Magenta,
        info: Color::Green,
        warn: Color::Red,
        error: Color::BrightRed,
        ..ColoredLevelConfig::new()
    };

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{}[{}] {}",
                chrono::Local::now().format("[%H:%M:%S]"),
                colors.color(record.level()),
                message
            ))
        })
        .chain(std::io::stderr())
        .level(LevelFilter::Error)
        .level_for(PROJECT_NAME, level)
        .apply()?;

    Ok(())
}
