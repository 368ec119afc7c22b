use anyhow::Context;
use clap::Parser;
use tea_doctor::api::{DetectionClient, WeatherProviderClient};
use tea_doctor::cli::{Cli, Commands};
use tea_doctor::config::Config;
use tea_doctor::history::{render_screen, HistoryController, LoadState};
use tea_doctor::weather::{render_weather, WeatherScreen, WeatherService};
use tea_doctor::{interactive, logging, progress};
use tea_doctor_common::{feature_list, known_categories, GeoLocation, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load().context("failed to load configuration")?;

    match cli.command {
        Commands::History { category, url, filter, interactive, email, user_id } => {
            let client = DetectionClient::new(&config)?;
            let session = user_id.map(|id| Session::new(id, email));

            let spinner = progress::spinner("Loading detection history...");
            let result = HistoryController::initialize(&category, &url, &client).await;
            spinner.finish_and_clear();
            let mut controller = result?;

            controller.set_filter(filter.as_deref());

            if interactive {
                interactive::run_interactive_history(&mut controller, &client, session.as_ref())
                    .await?;
            } else {
                println!("{}", render_screen(&controller.view(), session.as_ref()));
            }

            exit_on_failure(controller.state());
        }

        Commands::Weather { lat, long, user_id, email, day_offset, place, interactive } => {
            let detection = DetectionClient::new(&config)?;
            let provider = WeatherProviderClient::new(&config)?;
            let service = WeatherService::new(detection, provider);

            let location = GeoLocation::new(lat, long)?;
            let today = chrono::Local::now().date_naive();
            let session = Session::new(user_id, email);
            let mut screen = WeatherScreen::new(Some(location), Some(session), today);
            screen.shift_days(day_offset);

            let spinner = progress::spinner("Loading weather...");
            let result = screen.load(&service).await.map(|_| ());
            spinner.finish_and_clear();
            result?;

            if interactive {
                interactive::run_interactive_weather(&mut screen, &service, &place).await?;
            } else {
                println!("{}", render_weather(&screen, &place));
            }

            exit_on_failure(screen.state());
        }

        Commands::Features { category } => {
            for feature in feature_list(&category) {
                println!("{}", feature);
            }
        }

        Commands::Categories => {
            for name in known_categories() {
                println!("{}", name);
            }
        }

        Commands::Config { set_api_url, set_weather_key, show } => {
            let path = Config::config_path()?;
            let mut config = Config::read_from(&path)?;
            let changed = set_api_url.is_some() || set_weather_key.is_some();

            if let Some(url) = set_api_url {
                config.set_api_base_url(url)?;
                println!("✔ API URL set");
            }
            if let Some(key) = set_weather_key {
                config.weather_api_key = Some(key);
                println!("✔ Weather API key set");
            }
            if changed {
                config.save_to(&path)?;
            }

            if show || !changed {
                println!("Configuration ({}):", path.display());
                println!("  API URL: {}", config.api_base_url);
                println!("  Weather host: {}", config.weather_api_host);
                println!(
                    "  Weather API key: {}",
                    if config.weather_api_key.is_some() { "set" } else { "not set" }
                );
                println!("  Timeout: {}s", config.timeout_seconds);
                println!(
                    "  Retries: {} (backoff {}ms)",
                    config.max_retries, config.retry_backoff_ms
                );
            }
        }
    }

    Ok(())
}

/// 最終状態が `Failed` なら終了コード 2 で終わる
fn exit_on_failure(state: &LoadState) {
    let code = state.exit_code();
    if code != 0 {
        std::process::exit(code);
    }
}
