mod commands;
mod config;
mod constants;

use crate::commands::NewPrompt;
use crate::config::load_config;
use clap::{ArgAction, Parser, Subcommand};
use plab_core::file_storage::FileStorageError;
use plab_core::library::LibraryError;
use plab_core::wildcards::WildcardError;

#[derive(Parser, Debug)]
#[command(version,
display_name = "plab",
bin_name = "plab",
about="A local prompt library with wildcard maintenance",
long_about="Stores named prompts, indexes their expanded tags for autocomplete \
and maintains a directory of wildcard files", )]
struct Args {
    #[arg(short = 'p', long, global = true)]
    storage_path: Option<String>,

    #[arg(short = 'w', long, global = true)]
    wildcards_dir: Option<String>,

    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Print the tag variants of a prompt
    Expand {
        prompt: String,
        #[arg(long)]
        json: bool,
    },
    Add {
        #[arg(short = 'n', long)]
        name: String,
        #[arg(short = 'c', long)]
        content: String,
        #[arg(short = 'd', long)]
        description: Option<String>,
        #[arg(short = 'i', long)]
        image_path: Option<String>,
        #[arg(short = 'o', long)]
        overwrite: bool,
    },
    Get {
        #[arg(short = 'n', long)]
        name: String,
        #[arg(short = 'c', long)]
        copy: bool,
    },
    List {
        #[arg(short = 's', long)]
        search: Option<String>,
        #[arg(long)]
        json: bool,
    },
    Delete {
        #[arg(short = 'n', long)]
        name: String,
    },
    Favorite {
        #[arg(short = 'n', long)]
        name: String,
        #[arg(long)]
        unset: bool,
    },
    /// Autocomplete a tag from the word index
    Complete {
        query: String,
    },
    Wildcards {
        #[command(subcommand)]
        cmd: WildcardCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
enum WildcardCommands {
    Tree {
        #[arg(long)]
        json: bool,
    },
    Show {
        path: String,
    },
    Write {
        path: String,
        content: String,
    },
    Create {
        path: String,
    },
    Delete {
        path: String,
    },
    /// Move files with repeated content into the duplicates folder
    Dedupe {
        #[arg(long)]
        json: bool,
    },
    /// Remove empty and non-txt files, empty folders and the duplicates folder
    Cleanup {
        #[arg(long, required = true)]
        yes: bool,
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let args = Args::parse();
    setup_logging(args.quiet, args.verbose);
    log::debug!("CLI args parsed: {:?}", args);

    let exit_code = match run(args) {
        Ok(()) => exitcode::OK,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    };
    std::process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config().with_overrides(args.storage_path, args.wildcards_dir);

    match args.cmd {
        Commands::Expand { prompt, json } => commands::handle_expand(&prompt, json),
        Commands::Add { name, content, description, image_path, overwrite } => {
            let new = NewPrompt { name, content, description, image_path, overwrite };
            commands::handle_add(&config.library(), new)
        }
        Commands::Get { name, copy } => commands::handle_get(&config.library(), &name, copy),
        Commands::List { search, json } => {
            commands::handle_list(&config.library(), search.as_deref(), json)
        }
        Commands::Delete { name } => commands::handle_delete(&config.library(), &name),
        Commands::Favorite { name, unset } => {
            commands::handle_favorite(&config.library(), &name, !unset)
        }
        Commands::Complete { query } => commands::handle_complete(&config.library(), &query),
        Commands::Wildcards { cmd } => {
            let wildcards = config.wildcards();
            match cmd {
                WildcardCommands::Tree { json } => commands::handle_tree(&wildcards, json),
                WildcardCommands::Show { path } => commands::handle_show(&wildcards, &path),
                WildcardCommands::Write { path, content } => {
                    commands::handle_write(&wildcards, &path, &content)
                }
                WildcardCommands::Create { path } => commands::handle_create(&wildcards, &path),
                WildcardCommands::Delete { path } => commands::handle_remove(&wildcards, &path),
                WildcardCommands::Dedupe { json } => commands::handle_dedupe(&wildcards, json),
                WildcardCommands::Cleanup { yes: _, json } => {
                    commands::handle_cleanup(&wildcards, json)
                }
            }
        }
    }
}

fn exit_code_for(err: &anyhow::Error) -> exitcode::ExitCode {
    if let Some(e) = err.downcast_ref::<WildcardError>() {
        return match e {
            WildcardError::InvalidPath(_) => exitcode::DATAERR,
            WildcardError::NotFound(_) => exitcode::NOINPUT,
            WildcardError::Conflict(_) => exitcode::CANTCREAT,
            WildcardError::Io { .. } | WildcardError::BatchAborted { .. } => exitcode::IOERR,
        };
    }

    if let Some(e) = err.downcast_ref::<LibraryError<FileStorageError>>() {
        return match e {
            LibraryError::AlreadyExists(_) => exitcode::CANTCREAT,
            LibraryError::NotFound(_) => exitcode::NOINPUT,
            LibraryError::Storage(FileStorageError::InvalidPromptName(_)) => exitcode::DATAERR,
            LibraryError::Storage(FileStorageError::InvalidBasePath(_)) => exitcode::CONFIG,
            LibraryError::Storage(_) => exitcode::IOERR,
        };
    }

    exitcode::SOFTWARE
}
