//! # Larder CLI Module
//!
//! ## Available Commands
//!
//! Catalog queries (answered from the synchronized snapshot):
//! - `serve` - Start the HTTP server
//! - `search` - Recipes using an ingredient, at any depth
//! - `show` - Recipe detail
//! - `status` - Snapshot provenance and row counts
//!
//! Catalog administration (on a local snapshot file):
//! - `init`, `add-recipe`, `add-ingredient`, `link-ingredient`,
//!   `link-subrecipe`, `list`

mod commands;

use crate::config::Config;
use clap::{Parser, Subcommand};
use larder_core::{ChangeDetection, LarderError};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Larder - recipe catalog with nested recipes
///
/// Answers which ingredients a recipe needs (through every sub-recipe) and
/// which recipes need an ingredient, from a locally cached snapshot.
#[derive(Parser, Debug)]
#[command(name = "larder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Authoritative snapshot URL or file path
    #[arg(short, long, global = true)]
    pub source: Option<String>,

    /// redb file for the cached snapshot
    #[arg(long, global = true)]
    pub cache: Option<PathBuf>,

    /// Change detection policy (byte-length, content-hash)
    #[arg(long, global = true)]
    pub change_detection: Option<ChangeDetection>,

    /// Use the cached snapshot without revalidating it
    #[arg(long, global = true)]
    pub offline: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Find recipes that use an ingredient, directly or through sub-recipes
    Search {
        /// Ingredient name or fragment (case-insensitive)
        term: String,
    },

    /// Show a recipe with all the ingredients it needs
    Show {
        /// Recipe ID
        id: u64,
    },

    /// Show snapshot status
    Status,

    /// Create an empty catalog file
    Init {
        #[arg(short, long, default_value = "recipes.db")]
        file: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Add a recipe
    AddRecipe {
        #[arg(short, long, default_value = "recipes.db")]
        file: PathBuf,

        name: String,
    },

    /// Add an ingredient
    AddIngredient {
        #[arg(short, long, default_value = "recipes.db")]
        file: PathBuf,

        name: String,
    },

    /// Link an ingredient to a recipe
    LinkIngredient {
        #[arg(short, long, default_value = "recipes.db")]
        file: PathBuf,

        /// Recipe ID
        recipe: u64,

        /// Ingredient ID
        ingredient: u64,
    },

    /// Make one recipe a sub-recipe of another
    LinkSubrecipe {
        #[arg(short, long, default_value = "recipes.db")]
        file: PathBuf,

        /// Parent recipe ID
        parent: u64,

        /// Child recipe ID
        child: u64,
    },

    /// List recipes, ingredients and links
    List {
        #[arg(short, long, default_value = "recipes.db")]
        file: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Resolve configuration: file, then environment, then CLI flags.
pub fn resolve_config(cli: &Cli) -> Result<Config, LarderError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(source) = &cli.source {
        config.source = Some(source.clone());
    }
    if let Some(cache) = &cli.cache {
        config.cache_path = cache.clone();
    }
    if let Some(policy) = cli.change_detection {
        config.change_detection = policy;
    }
    Ok(config)
}

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), LarderError> {
    let json_mode = cli.json_mode;
    let offline = cli.offline;

    match cli.command {
        Some(Commands::Init { file, force }) => cmd_init(&file, force),
        Some(Commands::AddRecipe { file, name }) => cmd_add_recipe(&file, &name, json_mode),
        Some(Commands::AddIngredient { file, name }) => {
            cmd_add_ingredient(&file, &name, json_mode)
        }
        Some(Commands::LinkIngredient {
            file,
            recipe,
            ingredient,
        }) => cmd_link_ingredient(&file, recipe, ingredient),
        Some(Commands::LinkSubrecipe {
            file,
            parent,
            child,
        }) => cmd_link_subrecipe(&file, parent, child),
        Some(Commands::List { file }) => cmd_list(&file, json_mode),
        ref command => {
            let mut config = resolve_config(&cli)?;
            match command {
                Some(Commands::Serve { host, port }) => {
                    if let Some(host) = host {
                        config.http.host = host.clone();
                    }
                    if let Some(port) = port {
                        config.http.port = *port;
                    }
                    cmd_serve(&config, offline).await
                }
                Some(Commands::Search { term }) => {
                    cmd_search(&config, offline, json_mode, term).await
                }
                Some(Commands::Show { id }) => cmd_show(&config, offline, json_mode, *id).await,
                _ => cmd_status(&config, offline, json_mode).await,
            }
        }
    }
}
