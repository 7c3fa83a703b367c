pub mod inspect;
pub mod modify;

use std::process::ExitCode;

use clap::{Args, Subcommand};
use gmsfs_fs::{DebugLog, Gmsfs};
use log::debug;

use crate::printer::{OutputFormat, Printer};
use inspect::{
    AgeArgs, CatArgs, ExistsArgs, FindArgs, GlobArgs, LsArgs, PathArg, StatArgs,
};
use modify::{AppendArgs, CopyArgs, CopyDirArgs, MkdirArgs, MoveArgs, RemoveArgs};

/// Common error type for command handlers
pub type CommandResult<T> = anyhow::Result<T>;

/// The facade every command runs against.
pub type Fs = Gmsfs<DebugLog>;

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Output results as NDJSON (one JSON value per line)
    #[arg(long, global = true)]
    pub json: bool,

    /// Write the failure log even when GMSFS.Debug is absent
    #[arg(long, global = true)]
    pub debug_log: bool,
}

impl GlobalArgs {
    pub fn facade(&self) -> Fs {
        let sink = if self.debug_log {
            DebugLog::always(".")
        } else {
            DebugLog::sentinel()
        };
        Gmsfs::with_sink(sink)
    }

    pub fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show metadata for one path.
    ///
    /// Example:
    ///   gmsfs stat ./Cargo.toml
    ///   gmsfs stat --contents ./crates
    Stat(StatArgs),

    /// List a directory, marking subdirectories with '*'.
    Ls(LsArgs),

    /// List everything below a directory, depth first.
    Tree(PathArg),

    /// Exit 0 when the path exists, 1 otherwise.
    Exists(ExistsArgs),

    /// Print a file's size in bytes.
    Size(PathArg),

    /// Print seconds since a file was last modified.
    Age(AgeArgs),

    /// Print a file's contents.
    Cat(CatArgs),

    /// Print paths matching a shell pattern.
    ///
    /// Example:
    ///   gmsfs glob 'logs/*.log'
    Glob(GlobArgs),

    /// Print entries of one directory whose names match a pattern.
    Find(FindArgs),

    /// Copy one file, keeping its permissions.
    Cp(CopyArgs),

    /// Copy a directory tree into a new destination.
    ///
    /// Example:
    ///   gmsfs cpdir ./assets ./backup/assets
    ///   gmsfs cpdir --glob '*.png' ./assets ./thumbs
    Cpdir(CopyDirArgs),

    /// Rename or move a path.
    Mv(MoveArgs),

    /// Remove a path.
    Rm(RemoveArgs),

    /// Create a directory.
    Mkdir(MkdirArgs),

    /// Append text to a file, creating it if needed.
    Append(AppendArgs),
}

pub fn run(global: &GlobalArgs, command: Command) -> ExitCode {
    let gfs = global.facade();
    let mut out = Printer::stdout(global.format());
    debug!("[run] {command:?}");

    let result = match command {
        Command::Stat(args) => inspect::stat(&gfs, &mut out, args),
        Command::Ls(args) => inspect::ls(&gfs, &mut out, args),
        Command::Tree(args) => inspect::tree(&gfs, &mut out, args),
        Command::Exists(args) => inspect::exists(&gfs, &mut out, args),
        Command::Size(args) => inspect::size(&gfs, &mut out, args),
        Command::Age(args) => inspect::age(&gfs, &mut out, args),
        Command::Cat(args) => inspect::cat(&gfs, args),
        Command::Glob(args) => inspect::glob(&gfs, &mut out, args),
        Command::Find(args) => inspect::find(&gfs, &mut out, args),
        Command::Cp(args) => modify::cp(&gfs, args),
        Command::Cpdir(args) => modify::cpdir(&gfs, args),
        Command::Mv(args) => modify::mv(&gfs, args),
        Command::Rm(args) => modify::rm(&gfs, args),
        Command::Mkdir(args) => modify::mkdir(&gfs, args),
        Command::Append(args) => modify::append(&gfs, args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[error] {e:#}");
            ExitCode::from(2)
        }
    }
}
