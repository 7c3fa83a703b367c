use std::{
    fmt::Display,
    io::{self, Write},
    path::PathBuf,
};

use gmsfs_fs::FileInfo;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable columns.
    #[default]
    Human,
    /// NDJSON (newline-delimited JSON) for machine consumption.
    Json,
}

/// Writes command results in the selected format.
pub struct Printer<W: Write> {
    out: W,
    format: OutputFormat,
}

impl Printer<io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Printer::new(io::stdout(), format)
    }
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        let line = serde_json::to_string(value).map_err(io::Error::other)?;
        writeln!(self.out, "{line}")
    }

    /// One metadata record, with its contents when present.
    pub fn info(&mut self, info: &FileInfo) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.json(info),
            OutputFormat::Human => {
                writeln!(self.out, "{}", info_row(info))?;
                for child in &info.contents {
                    writeln!(self.out, "  {}", info_row(child))?;
                }
                Ok(())
            }
        }
    }

    pub fn infos(&mut self, infos: &[FileInfo]) -> io::Result<()> {
        infos.iter().try_for_each(|i| self.info(i))
    }

    pub fn names(&mut self, names: &[String]) -> io::Result<()> {
        names.iter().try_for_each(|n| self.scalar(n))
    }

    pub fn paths(&mut self, paths: &[PathBuf]) -> io::Result<()> {
        paths
            .iter()
            .try_for_each(|p| self.scalar(&p.to_string_lossy()))
    }

    /// A single value: bare in human mode, a JSON scalar otherwise.
    pub fn scalar<T: Display + Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.json(value),
            OutputFormat::Human => writeln!(self.out, "{value}"),
        }
    }
}

fn info_row(info: &FileInfo) -> String {
    let kind = if info.is_dir { 'd' } else { '-' };
    format!(
        "{kind} {:04o} {:>12} {} {}",
        info.permissions(),
        info.size,
        info.last_modified.format("%Y-%m-%d %H:%M:%S"),
        info.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn sample(name: &str, is_dir: bool) -> FileInfo {
        FileInfo {
            exists: true,
            size: 42,
            mode: 0o100644,
            last_modified: DateTime::<Utc>::from_timestamp(86_400, 0)
                .expect("valid timestamp"),
            is_dir,
            name: name.into(),
            contents: Vec::new(),
        }
    }

    fn render<F>(format: OutputFormat, f: F) -> String
    where
        F: FnOnce(&mut Printer<Vec<u8>>) -> io::Result<()>,
    {
        let mut printer = Printer::new(Vec::new(), format);
        f(&mut printer).expect("print");
        String::from_utf8(printer.into_inner()).expect("utf8 output")
    }

    #[test]
    fn human_info_row_has_kind_mode_size_time_and_name() {
        let out = render(OutputFormat::Human, |p| p.info(&sample("a.txt", false)));
        assert_eq!(out, "- 0644           42 1970-01-02 00:00:00 a.txt\n");
    }

    #[test]
    fn human_info_indents_contents() {
        let mut dir = sample("docs", true);
        dir.contents.push(sample("x", false));

        let out = render(OutputFormat::Human, |p| p.info(&dir));
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("d "));
        assert!(lines[1].starts_with("  - "));
        assert!(lines[1].ends_with(" x"));
    }

    #[test]
    fn json_output_is_one_object_per_line() {
        let infos = [sample("a", false), sample("b", true)];
        let out = render(OutputFormat::Json, |p| p.infos(&infos));

        let names: Vec<String> = out
            .lines()
            .map(|l| {
                let v: serde_json::Value = serde_json::from_str(l).expect("valid json");
                v["name"].as_str().expect("name").to_owned()
            })
            .collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn scalars_and_names() {
        let names = vec!["*dir".to_owned(), "file".to_owned()];
        assert_eq!(render(OutputFormat::Human, |p| p.names(&names)), "*dir\nfile\n");
        assert_eq!(
            render(OutputFormat::Json, |p| p.names(&names)),
            "\"*dir\"\n\"file\"\n"
        );
        assert_eq!(render(OutputFormat::Json, |p| p.scalar(&7u64)), "7\n");
    }
}
