use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skycast::render::render_screen;
use skycast::{
    ConfiguredSensor, DisplayUnit, SkycastConfig, WeatherScreen, build_provider, logging,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

/// Current conditions and a five-day forecast for any city
#[derive(Parser, Debug)]
#[command(name = "skycast", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true, env = "SKYCAST_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Display unit: celsius or fahrenheit
    #[arg(short, long, global = true)]
    units: Option<DisplayUnit>,

    /// Device latitude used by `locate`
    #[arg(long, global = true, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// Device longitude used by `locate`
    #[arg(long, global = true, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the weather for the configured default city
    Show,
    /// Search a city name or a "lat,lon" pair
    Search {
        /// City name or coordinates
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show the weather at the device position
    Locate,
    /// Keep the screen open and read actions from stdin
    Interactive,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = SkycastConfig::load_from_path(cli.config.clone())?;
    if let Some(unit) = cli.units {
        config.display.units = unit;
    }
    if let (Some(lat), Some(lon)) = (cli.lat, cli.lon) {
        config.location.latitude = Some(lat);
        config.location.longitude = Some(lon);
        config.validate()?;
    }

    logging::init(&config.logging, cli.verbose)?;
    debug!("Loaded configuration: {:?}", config.weather.provider);

    let provider = build_provider(&config).context("Failed to set up weather provider")?;
    let sensor = Arc::new(ConfiguredSensor::from_config(&config.location));
    let mut screen = WeatherScreen::new(
        provider,
        sensor,
        config.display.default_city.clone(),
        config.display.units,
    );

    match cli.command.unwrap_or(Command::Show) {
        Command::Show => {
            screen.open();
            Ok(finish(&mut screen).await)
        }
        Command::Search { query } => {
            if !screen.search(&query.join(" ")) {
                eprintln!("Enter a city name to search.");
                return Ok(ExitCode::FAILURE);
            }
            Ok(finish(&mut screen).await)
        }
        Command::Locate => {
            screen.locate();
            Ok(finish(&mut screen).await)
        }
        Command::Interactive => {
            run_interactive(&mut screen).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Wait for the fetch, print the screen and turn a notice into a failing exit code
async fn finish(screen: &mut WeatherScreen) -> ExitCode {
    screen.settled().await;
    let state = screen.state();
    print!("{}", render_screen(&state));

    if state.notice.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

const HELP: &str = "Type a city to search, or one of :locate :units :refresh :help :quit";

async fn run_interactive(screen: &mut WeatherScreen) -> Result<()> {
    screen.open();
    redraw(screen).await;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let input = line.trim();
        // Notices are shown once
        screen.dismiss_notice();

        match input {
            ":q" | ":quit" | ":exit" => break,
            ":help" => {
                println!("{HELP}");
                continue;
            }
            ":locate" => screen.locate(),
            ":units" => {
                let unit = screen.toggle_units();
                info!("Switched to {}", unit);
            }
            ":refresh" => {
                screen.refresh();
            }
            query => {
                if !screen.search(query) {
                    continue;
                }
            }
        }

        redraw(screen).await;
    }

    Ok(())
}

async fn redraw(screen: &mut WeatherScreen) {
    screen.settled().await;
    println!("{}", render_screen(&screen.state()));
}
