use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Store the NASA API key in the config file
    SetKey {
        /// API key from https://api.nasa.gov/
        key: String,
    },
    /// Change the wallpaper directory
    SetDir {
        /// Directory for downloaded pictures (~ is expanded)
        dir: String,
    },
    /// Write a commented default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}
