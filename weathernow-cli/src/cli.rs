use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use std::sync::Arc;

use weathernow_core::{
    Config, FavoritesStore, OpenWeatherClient, Session, UserProfile,
    client::icon_url,
    forecast::aggregate,
    store::file::FileStore,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathernow", version, about = "City weather and favorites in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Sign in and optionally record profile details.
    Login {
        /// Opaque user id your favorites are stored under.
        user_id: String,
    },

    /// Sign out the current user.
    Logout,

    /// Show current conditions for a city.
    Current {
        /// City name; defaults to the profile city when omitted.
        city: Option<String>,
    },

    /// Show the aggregated 5-day forecast for a city.
    Forecast {
        /// City name.
        city: String,
    },

    /// Manage the signed-in user's favorite cities.
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    /// List favorites in the order they were added.
    List,

    /// Add a city; re-adding under any casing is a no-op.
    Add { city: String },

    /// Remove a city, matching case-insensitively.
    Remove { city: String },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Login { user_id } => login(&user_id),
            Command::Logout => logout(),
            Command::Current { city } => current(city).await,
            Command::Forecast { city } => forecast(&city).await,
            Command::Favorites { action } => favorites(action).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key cannot be empty");
    }

    config.api_key = Some(api_key.to_string());
    config.save()?;

    println!("API key saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn login(user_id: &str) -> Result<()> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        bail!("User id cannot be empty");
    }

    let mut config = Config::load()?;

    println!("Profile details (leave blank to skip):");
    let first_name = prompt_profile_field("First name:")?;
    let last_name = prompt_profile_field("Last name:")?;
    let city = prompt_profile_field("Home city:")?;
    let email = prompt_profile_field("Email:")?;

    let mut session = Session::new(user_id);
    if !(first_name.is_empty() && last_name.is_empty() && city.is_empty() && email.is_empty()) {
        session = session.with_profile(UserProfile {
            first_name,
            last_name,
            city,
            email,
        });
    }

    config.session = Some(session);
    config.save()?;

    println!("Signed in as {user_id}.");
    Ok(())
}

fn logout() -> Result<()> {
    let mut config = Config::load()?;

    match config.session.take() {
        Some(session) => {
            config.save()?;
            println!("Signed out {}.", session.user_id);
        }
        None => println!("No user is signed in."),
    }

    Ok(())
}

async fn current(city: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let client = OpenWeatherClient::new(config.require_api_key()?.to_string());

    let Some(city) = city.or_else(|| profile_city(&config)) else {
        bail!(
            "No city given and the profile has none to fall back on.\n\
             Hint: pass a city name, e.g. `weathernow current London`."
        );
    };

    let conditions = client.current(&city).await?;

    println!("{}", conditions.city);
    println!("  {:.1} °C, {}", conditions.temp_c, conditions.description);
    println!("  {}", icon_url(&conditions.icon));

    if let Some(user_id) = config.user_id() {
        let favorites = favorites_store()?;
        if favorites.is_favorite(user_id, &conditions.city).await {
            println!("  Saved in favorites");
        }
    }

    Ok(())
}

async fn forecast(city: &str) -> Result<()> {
    let config = Config::load()?;
    let client = OpenWeatherClient::new(config.require_api_key()?.to_string());

    let samples = client.forecast(city).await?;
    let days = aggregate(&samples);

    println!("5-day forecast for {city}:");
    for day in &days {
        println!(
            "  {:<4} {:>4}° to {:>4}°   [{}]",
            day.day_label, day.min_temp_c, day.max_temp_c, day.icon
        );
    }

    Ok(())
}

async fn favorites(action: FavoritesAction) -> Result<()> {
    let config = Config::load()?;
    let Some(user_id) = config.user_id() else {
        bail!(
            "No user is signed in.\n\
             Hint: run `weathernow login <user-id>` first."
        );
    };

    let favorites = favorites_store()?;

    match action {
        FavoritesAction::List => {
            let cities = favorites.list(user_id).await;
            if cities.is_empty() {
                println!("No favorites yet.");
            } else {
                for city in cities {
                    println!("{city}");
                }
            }
        }
        FavoritesAction::Add { city } => {
            if favorites.is_favorite(user_id, &city).await {
                println!("{city} is already in favorites.");
            } else {
                favorites.add(user_id, &city).await?;
                println!("Added {city} to favorites.");
            }
        }
        FavoritesAction::Remove { city } => {
            if favorites.is_favorite(user_id, &city).await {
                favorites.remove(user_id, &city).await?;
                println!("Removed {city} from favorites.");
            } else {
                println!("{city} is not in favorites.");
            }
        }
    }

    Ok(())
}

/// Favorites backed by the store file under the platform data directory.
fn favorites_store() -> Result<FavoritesStore> {
    let path = Config::store_file_path()?;
    Ok(FavoritesStore::new(Arc::new(FileStore::new(path))))
}

fn profile_city(config: &Config) -> Option<String> {
    config
        .session
        .as_ref()
        .and_then(|s| s.default_city())
        .map(str::to_string)
}

fn prompt_profile_field(label: &str) -> Result<String> {
    let value = Text::new(label)
        .prompt()
        .context("Failed to read profile details")?;
    Ok(value.trim().to_string())
}
