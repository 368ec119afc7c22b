use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tea-doctor")]
#[command(about = "Tea plant health client: detection history and weather disease risk", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show detection history for a category
    History {
        /// Disease category (e.g. "Blister Blight", "Stem and Branch")
        #[arg(short, long)]
        category: String,

        /// History path on the detection service (GET /detection/{url})
        #[arg(short, long)]
        url: String,

        /// Only show records whose label contains this feature
        #[arg(short, long)]
        filter: Option<String>,

        /// Pick feature filters interactively
        #[arg(short, long)]
        interactive: bool,

        /// Signed-in user's email (shown in the greeting)
        #[arg(long)]
        email: Option<String>,

        /// Signed-in user's id
        #[arg(long)]
        user_id: Option<String>,
    },

    /// Show the weather class for a location
    Weather {
        /// Latitude
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude
        #[arg(long, allow_hyphen_values = true)]
        long: f64,

        /// Signed-in user's id
        #[arg(long)]
        user_id: String,

        /// Signed-in user's email
        #[arg(long)]
        email: Option<String>,

        /// Days from today (negative for past days)
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        day_offset: i64,

        /// Place name shown in the heading
        #[arg(long, default_value = "Rathganga")]
        place: String,

        /// Step through days interactively
        #[arg(short, long)]
        interactive: bool,
    },

    /// List the selectable features of a category
    Features {
        /// Category name
        #[arg(required = true)]
        category: String,
    },

    /// List known categories
    Categories,

    /// Show or edit configuration
    Config {
        /// Detection service base URL
        #[arg(long)]
        set_api_url: Option<String>,

        /// Weather provider (RapidAPI) key
        #[arg(long)]
        set_weather_key: Option<String>,

        /// Show configuration
        #[arg(long)]
        show: bool,
    },
}
