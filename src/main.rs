//! Mini Focus Frontend Entry Point

use leptos::prelude::*;
use mini_focus::app::App;
use mini_focus::config::AppConfig;
use mini_focus::logging;

fn main() {
    console_error_panic_hook::set_once();

    let (config, warnings) = AppConfig::from_env();
    logging::init(config.log_level);
    for warning in warnings {
        tracing::warn!("{}", warning);
    }
    tracing::info!("Mini Focus starting, api base {}", config.api_base);

    mount_to_body(move || view! { <App config=config /> });
}
