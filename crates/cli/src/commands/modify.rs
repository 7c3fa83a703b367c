use std::{path::PathBuf, process::ExitCode};

use clap::Args;

use crate::commands::{CommandResult, Fs};

#[derive(Debug, Args)]
pub struct CopyArgs {
    pub src: PathBuf,
    pub dst: PathBuf,
}

#[derive(Debug, Args)]
pub struct CopyDirArgs {
    /// Source directory
    pub src: PathBuf,

    /// Destination; must not exist unless --glob is given
    pub dst: PathBuf,

    /// Copy only top-level entries whose names match this pattern
    #[arg(long, value_name = "PATTERN")]
    pub glob: Option<String>,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    pub path: PathBuf,

    /// Remove directories and their contents; a missing path is not an error
    #[arg(long, short = 'r')]
    pub recursive: bool,
}

#[derive(Debug, Args)]
pub struct MkdirArgs {
    pub path: PathBuf,

    /// Create parents as needed; an existing path is not an error
    #[arg(long, short = 'p')]
    pub parents: bool,

    /// Permission bits in octal
    #[arg(long, short = 'm', default_value = "755", value_parser = parse_mode)]
    pub mode: u32,
}

#[derive(Debug, Args)]
pub struct AppendArgs {
    pub path: PathBuf,

    /// Text appended verbatim
    pub text: String,

    /// Terminate the text with a newline
    #[arg(long, short = 'n')]
    pub newline: bool,
}

fn parse_mode(s: &str) -> Result<u32, String> {
    u32::from_str_radix(s.trim_start_matches("0o"), 8)
        .ok()
        .filter(|m| *m <= 0o7777)
        .ok_or_else(|| format!("invalid octal mode: {s}"))
}

pub fn cp(gfs: &Fs, args: CopyArgs) -> CommandResult<ExitCode> {
    gfs.copy_file(&args.src, &args.dst)?;
    Ok(ExitCode::SUCCESS)
}

pub fn cpdir(gfs: &Fs, args: CopyDirArgs) -> CommandResult<ExitCode> {
    match &args.glob {
        Some(pattern) => gfs.copy_dir_files_glob(&args.src, &args.dst, pattern)?,
        None => gfs.copy_dir(&args.src, &args.dst)?,
    }
    Ok(ExitCode::SUCCESS)
}

pub fn mv(gfs: &Fs, args: MoveArgs) -> CommandResult<ExitCode> {
    gfs.rename(&args.from, &args.to)?;
    Ok(ExitCode::SUCCESS)
}

pub fn rm(gfs: &Fs, args: RemoveArgs) -> CommandResult<ExitCode> {
    if args.recursive {
        gfs.remove_all(&args.path)?;
    } else {
        gfs.remove(&args.path)?;
    }
    Ok(ExitCode::SUCCESS)
}

pub fn mkdir(gfs: &Fs, args: MkdirArgs) -> CommandResult<ExitCode> {
    if args.parents {
        gfs.mkdir_all(&args.path, args.mode)?;
    } else {
        gfs.mkdir(&args.path, args.mode)?;
    }
    Ok(ExitCode::SUCCESS)
}

pub fn append(gfs: &Fs, args: AppendArgs) -> CommandResult<ExitCode> {
    let mut text = args.text;
    if args.newline {
        text.push('\n');
    }
    gfs.append_str(&args.path, &text)?;
    Ok(ExitCode::SUCCESS)
}
