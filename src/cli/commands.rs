// CLI command implementations
//
// Every command walks its files in order. A failure on one file is reported
// and counted; the batch always continues with the next file.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

use pathtag::{justify_width, zero_pad, AudioFile, FieldKind, GenerateOptions, Pattern, TagMap};

use super::config::{RenameArgs, TagArgs};
use super::confirm::Confirmer;
use super::output::OutputFormatter;

/// Per-run tally of files
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

impl Summary {
    fn record(&mut self, file: &Path, result: Result<()>, formatter: &OutputFormatter) {
        match result {
            Ok(()) => self.succeeded += 1,
            Err(e) => {
                formatter.print_error(&format!("{}: {:#}", file.display(), e));
                self.failed += 1;
            }
        }
    }
}

fn is_glob(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}

/// Expand file arguments; glob patterns are expanded, other arguments are
/// taken literally. Fails if any argument names nothing.
pub fn expand_files(args: &[String], formatter: &OutputFormatter) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut missing = 0;

    for arg in args {
        if is_glob(arg) {
            let before = files.len();
            for entry in glob::glob(arg).with_context(|| format!("invalid glob pattern: {arg}"))? {
                match entry {
                    Ok(path) if path.is_file() => files.push(path),
                    Ok(_) => {}
                    Err(e) => formatter.print_error(&format!("Error reading path: {}", e)),
                }
            }
            if files.len() == before {
                formatter.print_error(&format!("{arg}: no such file"));
                missing += 1;
            }
        } else {
            let path = PathBuf::from(arg);
            if path.exists() {
                files.push(path);
            } else {
                formatter.print_error(&format!("{arg}: no such file"));
                missing += 1;
            }
        }
    }

    if missing > 0 {
        bail!("{missing} file argument(s) not found");
    }
    Ok(files)
}

fn compile_pattern(source: &str) -> Pattern {
    let pattern = Pattern::compile(source);
    for warning in pattern.warnings() {
        warn!(pattern = source, "{warning}");
    }
    pattern
}

fn open(file: &Path) -> Result<AudioFile> {
    let audio = AudioFile::open(file).context("can't open")?;
    debug!(file = %file.display(), format = %audio.format(), "opened");
    Ok(audio)
}

/// Print tags of files
pub fn command_show(files: &[String], formatter: &OutputFormatter) -> Result<Summary> {
    let files = expand_files(files, formatter)?;
    let mut summary = Summary::default();
    let mut stdout = std::io::stdout();

    for file in &files {
        let result = open(file)
            .and_then(|audio| formatter.output_tags(&file.display().to_string(), &audio.tags(), &mut stdout));
        summary.record(file, result, formatter);
    }

    Ok(summary)
}

/// Edit tags of files, optionally extracting them from their paths
pub fn command_tag(args: &TagArgs, formatter: &OutputFormatter) -> Result<Summary> {
    let files = expand_files(&args.files, formatter)?;
    let pattern = args.pattern.as_deref().map(compile_pattern);
    let mut confirmer = Confirmer::new(args.write);
    let mut summary = Summary::default();

    for (index, file) in files.iter().enumerate() {
        let position = index + 1;
        let result = tag_file(args, pattern.as_ref(), position, files.len(), file, formatter, &mut confirmer);
        summary.record(file, result, formatter);
    }

    Ok(summary)
}

/// Compute the edited tags of one file
fn edit_tags(
    args: &TagArgs,
    pattern: Option<&Pattern>,
    position: usize,
    total: usize,
    file: &Path,
    original: &TagMap,
    formatter: &OutputFormatter,
) -> TagMap {
    let mut tags = original.clone();

    if args.clear {
        tags.clear();
    }
    for edit in args.edits() {
        if !edit.apply(&mut tags) {
            debug!(key = edit.key(), "edit left tags unchanged");
        }
    }

    if let Some(pattern) = pattern {
        // resolve "..", "." and relative paths so the pattern sees real directories
        let resolved = fs::canonicalize(file).unwrap_or_else(|_| file.to_path_buf());
        match pattern.match_path(&resolved.to_string_lossy()) {
            Ok(values) => {
                for (kind, value) in values {
                    if kind == FieldKind::Junk {
                        continue;
                    }
                    formatter.print_info(&format!("from filename: {kind}={value}"));
                    tags.set(kind.name(), [value]);
                }
            }
            Err(e) => formatter.print_error(&format!("{}: does not match pattern: {e}", file.display())),
        }
    }

    if args.justify {
        let track = tags
            .first(FieldKind::Tracknumber.name())
            .map(str::to_string)
            .unwrap_or_else(|| position.to_string());
        tags.set(FieldKind::Tracknumber.name(), [zero_pad(&track, justify_width(total))]);
    }

    // position in the batch, then the tracknumber the file came with
    if args.index {
        let mut idx = vec![position.to_string()];
        idx.extend(original.get("tracknumber").unwrap_or_default().iter().cloned());
        tags.set("idx", idx);
    }

    tags
}

fn tag_file(
    args: &TagArgs,
    pattern: Option<&Pattern>,
    position: usize,
    total: usize,
    file: &Path,
    formatter: &OutputFormatter,
    confirmer: &mut Confirmer,
) -> Result<()> {
    let mut audio = open(file)?;
    let original = audio.tags();

    if !args.has_edits() {
        return formatter.output_tags(&file.display().to_string(), &original, &mut std::io::stdout());
    }

    formatter.print_info(&format!("processing {}", file.display()));
    let tags = edit_tags(args, pattern, position, total, file, &original, formatter);

    let changed = tags.changed_keys(&original);
    if changed.is_empty() {
        formatter.print_info("no changes");
        return Ok(());
    }
    for key in &changed {
        formatter.print_change(key, tags.get(key));
    }

    if !confirmer.approve()? {
        debug!(file = %file.display(), "changes not written");
        return Ok(());
    }

    audio.set_tags(&tags);
    audio.save().context("failed to save")?;
    formatter.print_success(&format!("saved {}", file.display()));
    Ok(())
}

/// Rename files from their tags
pub fn command_rename(args: &RenameArgs, formatter: &OutputFormatter) -> Result<Summary> {
    let files = expand_files(&args.files, formatter)?;
    let pattern = compile_pattern(&args.pattern);

    let mut options = GenerateOptions::new();
    if args.justify {
        options = options.with_justify(files.len());
    }
    if let Some(filter) = &args.filter {
        options = options.with_strip(filter);
    }
    if let Some(remap) = &args.map {
        options = options.with_remap(remap.clone());
    }

    let column = files
        .iter()
        .map(|file| file_name(file).chars().count())
        .max()
        .unwrap_or(0)
        + 2;

    let mut confirmer = Confirmer::new(args.write);
    let mut summary = Summary::default();
    for file in &files {
        let result = rename_file(&pattern, &options, file, column, formatter, &mut confirmer);
        summary.record(file, result, formatter);
    }

    Ok(summary)
}

fn file_name(file: &Path) -> String {
    file.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Target path for a generated name, relative to the source's directory.
///
/// Fails if the name is empty or would leave that directory.
pub fn rename_target(file: &Path, name: &str) -> Result<PathBuf> {
    let relative = Path::new(name);
    if name.is_empty() || !relative.components().all(|c| matches!(c, Component::Normal(_))) {
        bail!("generated name {name:?} leaves the directory of {}", file.display());
    }
    Ok(file.parent().unwrap_or_else(|| Path::new("")).join(relative))
}

fn rename_file(
    pattern: &Pattern,
    options: &GenerateOptions,
    file: &Path,
    column: usize,
    formatter: &OutputFormatter,
    confirmer: &mut Confirmer,
) -> Result<()> {
    let audio = open(file)?;
    let name = pattern.generate(&audio.tags(), options)?;
    let target = rename_target(file, &name)?;

    formatter.print_rename(&file_name(file), &name, column);
    if target == file {
        formatter.print_info("already named");
        return Ok(());
    }
    if target.exists() {
        bail!("{} already exists", target.display());
    }

    if !confirmer.approve()? {
        return Ok(());
    }

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::rename(file, &target).with_context(|| format!("failed to rename to {}", target.display()))?;
    debug!(from = %file.display(), to = %target.display(), "renamed");
    Ok(())
}
