//! Logging via `log` + `log4rs`: stderr console output plus an optional
//! rolling log file. Third-party crates are silenced unless opted in.

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::rolling_file::policy::compound::{roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy};
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Config;
use std::path::PathBuf;

const LOG_LINE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{h({l})}] {t} - {m}{n}";
const LOG_FILE_NAME: &str = "covault.log";
const LOG_FILE_MAX_SIZE: u64 = 10 * 1024 * 1024;
const LOG_FILE_MAX_ROLLS: u32 = 5;
const CONSOLE_APPENDER: &str = "stderr";
const FILE_APPENDER: &str = "log_file";
const WHITELISTED_CRATES: &[&str] = &["covault_core"];

/// Initialize the global logger. Repeated calls are ignored.
///
/// `filters` accepts a bare level for this crate (`"info"`, `"debug"`),
/// `module=level` overrides, and `root=level` to opt third-party crates in.
pub fn init_logger(log_dir: Option<&str>, filters: &str) {
    let (app_level, root_level, module_levels) = parse_filters(filters);

    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN)))
        .build();
    let mut builder = Config::builder().appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(console)));
    let mut appender_names = vec![CONSOLE_APPENDER.to_string()];

    if let Some(dir) = log_dir.map(str::trim).filter(|s| !s.is_empty()) {
        let log_path = PathBuf::from(dir).join(LOG_FILE_NAME);
        let archive_pattern = PathBuf::from(dir).join(format!("{LOG_FILE_NAME}.{{}}.gz"));
        let roll_result = FixedWindowRoller::builder()
            .base(1)
            .build(archive_pattern.to_str().unwrap_or("covault.log.{}.gz"), LOG_FILE_MAX_ROLLS);
        let file_appender = roll_result.ok().and_then(|roller| {
            let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(LOG_FILE_MAX_SIZE)), Box::new(roller));
            RollingFileAppender::builder()
                .encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN)))
                .build(log_path, Box::new(policy))
                .ok()
        });
        match file_appender {
            Some(appender) => {
                builder = builder.appender(Appender::builder().build(FILE_APPENDER, Box::new(appender)));
                appender_names.push(FILE_APPENDER.to_string());
            }
            None => eprintln!("covault: failed to open log file in {dir}, continuing with console only"),
        }
    }

    for crate_name in WHITELISTED_CRATES {
        if !module_levels.iter().any(|(m, _)| m == crate_name) {
            builder = builder
                .logger(Logger::builder().appenders(appender_names.clone()).additive(false).build(*crate_name, app_level));
        }
    }
    for (module, level) in &module_levels {
        builder =
            builder.logger(Logger::builder().appenders(appender_names.clone()).additive(false).build(module, *level));
    }

    if let Ok(config) = builder.build(Root::builder().appenders(appender_names).build(root_level)) {
        let _ = log4rs::init_config(config);
    }
}

fn parse_filters(filters: &str) -> (LevelFilter, LevelFilter, Vec<(String, LevelFilter)>) {
    let mut app_level = LevelFilter::Info;
    let mut root_level = LevelFilter::Off;
    let mut module_levels = Vec::new();
    for part in filters.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match part.split_once('=') {
            None => {
                if let Ok(level) = part.parse() {
                    app_level = level;
                }
            }
            Some((module, level_str)) => {
                let (module, level_str) = (module.trim(), level_str.trim());
                let Ok(level) = level_str.parse() else { continue };
                if module == "root" {
                    root_level = level;
                } else if !module.is_empty() {
                    module_levels.push((module.to_string(), level));
                }
            }
        }
    }
    (app_level, root_level, module_levels)
}
