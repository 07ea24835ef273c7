// sprite_gl
// copyright sprite_gl contributors 2024~2026

//! Log module provides file-based logging via log4rs, reference
//! https://docs.rs/log4rs

use log::LevelFilter;
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
};

/// init logs system
#[allow(unused)]
pub fn init_log(level: LevelFilter, file_path: &str) {
    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {l} {t} {m}{n}\n",
        )))
        .build(file_path)
        .unwrap();
    let config = Config::builder()
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(level)))
                .build("logfile", Box::new(logfile)),
        )
        .build(Root::builder().appender("logfile").build(level))
        .unwrap();
    let _handle = log4rs::init_config(config).unwrap();
}
