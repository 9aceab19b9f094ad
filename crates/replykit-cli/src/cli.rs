use clap::{Parser, Subcommand};
use replykit_core::{RelationType, ReplyIntensity, SceneType};
use std::path::PathBuf;

/// Command-line arguments for the reply assistant
#[derive(Parser)]
#[command(name = "replykit")]
#[command(about = "Smart reply assistant: three styled replies for any message", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Data folder for history, config and logs")]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Generate formal, friendly and humorous replies")]
    Generate {
        #[arg(help = "The message you want to reply to")]
        text: String,

        #[arg(short, long, help = "Scene (work, emotion, social, all); detected when omitted")]
        scene: Option<SceneType>,

        #[arg(short, long, help = "Intensity (gentle, moderate, direct)")]
        intensity: Option<ReplyIntensity>,

        #[arg(short, long, help = "Relation (superior, peer, subordinate)")]
        relation: Option<RelationType>,
    },

    #[command(about = "Detect the scene of a message")]
    Detect {
        #[arg(help = "The message to classify")]
        text: String,
    },

    #[command(about = "List quick prompt tags")]
    Tags {
        #[arg(short, long, help = "Only show tags of this scene")]
        scene: Option<SceneType>,
    },

    #[command(about = "Show daily communication tips")]
    Daily,

    #[command(subcommand, about = "Browse and manage reply history")]
    History(HistoryCommand),

    #[command(about = "Draw a suggestion template capsule")]
    Capsule,
}

/// History subcommands
#[derive(Subcommand)]
pub enum HistoryCommand {
    #[command(about = "List history grouped by age")]
    List {
        #[arg(short, long, help = "Only show items of this scene")]
        scene: Option<SceneType>,

        #[arg(short, long, help = "Only show favorites")]
        favorites: bool,
    },

    #[command(about = "Show one history item with its replies")]
    Show {
        /// Item id
        id: String,
    },

    #[command(about = "Delete one history item")]
    Delete {
        /// Item id
        id: String,
    },

    #[command(about = "Toggle the favorite flag of an item")]
    Favorite {
        /// Item id
        id: String,
    },

    #[command(about = "Remove all history")]
    Clear,

    #[command(about = "Show history statistics")]
    Stats,
}
