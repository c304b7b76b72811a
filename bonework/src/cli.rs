//! Root CLI structure for bonework

use bonework_skeleton::{LoadOptions, MAX_SKINNING_BONES, RootCorrection};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bonework")]
#[command(about = "Inspect skeletons and sample animation poses", long_about = None)]
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

    /// Convert Z-up root animation to Y-up while loading
    #[arg(long, global = true)]
    pub z_up: bool,

    /// Reject skeletons with more bones than this
    #[arg(long, global = true, default_value_t = MAX_SKINNING_BONES, conflicts_with = "no_bone_limit")]
    pub max_bones: usize,

    /// Accept skeletons of any size
    #[arg(long, global = true)]
    pub no_bone_limit: bool,
}

impl Cli {
    /// Loader settings selected by the global flags
    pub fn load_options(&self) -> LoadOptions {
        let correction = if self.z_up {
            RootCorrection::ZUpToYUp
        } else {
            RootCorrection::None
        };
        let max_bones = (!self.no_bone_limit).then_some(self.max_bones);

        LoadOptions::default()
            .with_root_correction(correction)
            .with_max_bones(max_bones)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display bone, animation and frame counts
    Info {
        /// Path to the JSON import file
        file: PathBuf,
    },

    /// Display the bone hierarchy as a tree
    Tree {
        /// Path to the JSON import file
        file: PathBuf,

        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Sample a pose and print the resolved bone matrices
    Pose(PoseArgs),

    /// Load a skeleton and report whether it is valid
    Validate {
        /// Path to the JSON import file
        file: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct PoseArgs {
    /// Path to the JSON import file
    pub file: PathBuf,

    /// Animation to sample, the bind pose when omitted
    #[arg(short, long)]
    pub animation: Option<String>,

    /// Playback time in seconds
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub time: f32,

    /// Blend with the following frame
    #[arg(short, long)]
    pub smooth: bool,

    /// Only print this bone's world and attachment matrices
    #[arg(short, long)]
    pub bone: Option<String>,

    /// Print JSON instead of tables
    #[arg(long)]
    pub json: bool,
}
