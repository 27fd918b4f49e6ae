//! appwatch - live desktop entry registry
//!
//! Watches every XDG `applications` directory and logs entries as they are
//! added, changed or removed. Runs until killed.

mod config;

use appwatch_base::{LinkBase, LinkBaseUpdate};
use config::Config;
use log::info;
use std::error::Error;
use std::time::Duration;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = Config::default_path();
    let config = Config::load(&config_path);
    let locale = config.locale();
    let environments = config.environments();

    info!(
        "Starting appwatch (config {:?}, locale {}, environments {:?})",
        config_path, locale, environments
    );

    let mut base = LinkBase::new(config.xdg_paths(), &locale, environments)?;

    info!(
        "Tracking {} desktop entries in {} categories",
        base.identifiers().count(),
        base.category_tags().count()
    );

    base.set_update_func(|base, update, link| {
        let action = match update {
            LinkBaseUpdate::Added => "added",
            LinkBaseUpdate::Removed => "removed",
        };
        info!(
            "{} {:?} from {} ({} identifiers)",
            action,
            link.name,
            link.source_path().display(),
            base.identifiers().count()
        );
    });

    let interval = Duration::from_millis(config.poll_interval_ms);
    loop {
        base.dispatch(Some(interval));
    }
}
