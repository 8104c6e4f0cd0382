mod args;
mod config;
mod entry;
mod error;
mod logger;
mod processor;
mod reader;
mod report;
mod stats;
mod template;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
