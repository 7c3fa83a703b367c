use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::Args;

use crate::commands::{CommandResult, Fs};
use crate::printer::Printer;

#[derive(Debug, Args)]
pub struct PathArg {
    /// Target path
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct StatArgs {
    /// Path to stat
    pub path: PathBuf,

    /// Also list a directory's immediate children
    #[arg(long, short = 'c')]
    pub contents: bool,
}

#[derive(Debug, Args)]
pub struct LsArgs {
    /// Directory to list
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Print a metadata row per entry instead of bare names
    #[arg(long, short = 'l')]
    pub long: bool,
}

#[derive(Debug, Args)]
pub struct ExistsArgs {
    /// Path to probe
    pub path: PathBuf,

    /// Fail on errors other than "not found" instead of answering no
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct AgeArgs {
    /// File to inspect
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct CatArgs {
    /// File to print
    pub path: PathBuf,
}

#[derive(Debug, Args)]
pub struct GlobArgs {
    /// Shell pattern, e.g. 'logs/*.log'
    pub pattern: String,
}

#[derive(Debug, Args)]
pub struct FindArgs {
    /// Directory whose immediate entries are matched
    pub dir: PathBuf,

    /// Shell pattern matched against entry names
    pub pattern: String,
}

pub fn stat<W: Write>(gfs: &Fs, out: &mut Printer<W>, args: StatArgs) -> CommandResult<ExitCode> {
    let info = if args.contents {
        gfs.stat_with_contents(&args.path)?
    } else {
        gfs.stat(&args.path)?
    };

    out.info(&info)?;
    Ok(ExitCode::SUCCESS)
}

pub fn ls<W: Write>(gfs: &Fs, out: &mut Printer<W>, args: LsArgs) -> CommandResult<ExitCode> {
    if args.long {
        out.infos(&gfs.read_dir(&args.path)?)?;
    } else {
        out.names(&gfs.list_fs(&args.path))?;
    }
    Ok(ExitCode::SUCCESS)
}

pub fn tree<W: Write>(gfs: &Fs, out: &mut Printer<W>, args: PathArg) -> CommandResult<ExitCode> {
    out.names(&gfs.recurse_fs(&args.path))?;
    Ok(ExitCode::SUCCESS)
}

pub fn exists<W: Write>(
    gfs: &Fs,
    out: &mut Printer<W>,
    args: ExistsArgs,
) -> CommandResult<ExitCode> {
    let found = if args.strict {
        gfs.try_exists(&args.path)?
    } else {
        gfs.file_exists(&args.path)
    };

    out.scalar(&found)?;
    Ok(if found {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

pub fn size<W: Write>(gfs: &Fs, out: &mut Printer<W>, args: PathArg) -> CommandResult<ExitCode> {
    out.scalar(&gfs.file_size(&args.path)?)?;
    Ok(ExitCode::SUCCESS)
}

pub fn age<W: Write>(gfs: &Fs, out: &mut Printer<W>, args: AgeArgs) -> CommandResult<ExitCode> {
    let age = gfs.file_age(&args.path)?;
    out.scalar(&age.num_seconds())?;
    Ok(ExitCode::SUCCESS)
}

pub fn cat(gfs: &Fs, args: CatArgs) -> CommandResult<ExitCode> {
    let bytes = gfs.read_file(&args.path)?;
    io::stdout()
        .lock()
        .write_all(&bytes)
        .context("Failed to write to stdout")?;
    Ok(ExitCode::SUCCESS)
}

pub fn glob<W: Write>(gfs: &Fs, out: &mut Printer<W>, args: GlobArgs) -> CommandResult<ExitCode> {
    out.paths(&gfs.glob(&args.pattern)?)?;
    Ok(ExitCode::SUCCESS)
}

pub fn find<W: Write>(gfs: &Fs, out: &mut Printer<W>, args: FindArgs) -> CommandResult<ExitCode> {
    out.paths(&gfs.find_files_in_dir(&args.dir, &args.pattern)?)?;
    Ok(ExitCode::SUCCESS)
}
