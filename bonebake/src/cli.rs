//! Root CLI structure for bonebake

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bonebake")]
#[command(about = "Inspect scenes and bake skeletal animation bone matrices", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scene description operations
    Scene {
        #[command(subcommand)]
        command: crate::commands::scene::SceneCommands,
    },

    /// Animation plan operations
    Anim {
        #[command(subcommand)]
        command: crate::commands::anim::AnimCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
