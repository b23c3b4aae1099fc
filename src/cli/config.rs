// CLI configuration
use clap::{Args, Parser, Subcommand};

use pathtag::{Remap, TagEdit};

pub use super::output::OutputFormat;

/// pathtag - tag audio files from their paths, rename them from their tags
#[derive(Parser, Debug)]
#[command(name = "pathtag")]
#[command(about = "Tag audio files from their paths and rename them from their tags", long_about = None)]
#[command(version)]
pub struct Config {
    /// Output format for printed tags
    #[arg(short, long, value_enum, default_value = "key-value", global = true)]
    pub format: OutputFormat,

    /// Quiet mode (suppress progress messages)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging; RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tags of audio file(s)
    Show {
        /// Files or glob patterns
        #[arg(value_name = "FILE", required = true)]
        files: Vec<String>,
    },

    /// Edit tags, optionally extracting them from each file's path
    Tag(TagArgs),

    /// Rename files from their tags
    Rename(RenameArgs),
}

/// Whether changes are written, previewed or confirmed
#[derive(Args, Debug, Clone, Copy)]
pub struct WriteArgs {
    /// Only show what would change
    #[arg(short = 'n', long)]
    pub noact: bool,

    /// Prompt before writing each file
    #[arg(short, long)]
    pub confirm: bool,
}

#[derive(Args, Debug)]
pub struct TagArgs {
    /// Set a tag, replacing its values
    #[arg(short = 't', long = "tag", value_name = "TAG=VALUE", value_parser = TagEdit::parse_set)]
    pub set: Vec<TagEdit>,

    /// Add a value to a tag, keeping existing values
    #[arg(short, long, value_name = "TAG=VALUE", value_parser = TagEdit::parse_add)]
    pub add: Vec<TagEdit>,

    /// Remove a whole tag, or a single value
    #[arg(short, long, value_name = "TAG[=VALUE]", value_parser = TagEdit::parse_remove)]
    pub remove: Vec<TagEdit>,

    /// Remove all tags
    #[arg(long)]
    pub clear: bool,

    /// Extract tags from the path, e.g. '%a/%l/%n - %t.flac'
    #[arg(short, long, visible_alias = "fn2tag", value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Zero-justify track numbers (file position when missing)
    #[arg(short, long)]
    pub justify: bool,

    /// Record each file's position in the batch as the idx tag
    #[arg(short, long)]
    pub index: bool,

    #[command(flatten)]
    pub write: WriteArgs,

    /// Files or glob patterns
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<String>,
}

impl TagArgs {
    /// Whether any option changes tags; otherwise the tags are printed
    pub fn has_edits(&self) -> bool {
        self.clear
            || self.justify
            || self.index
            || self.pattern.is_some()
            || !self.set.is_empty()
            || !self.add.is_empty()
            || !self.remove.is_empty()
    }

    /// Edits in the order they are applied: removals, sets, then additions
    pub fn edits(&self) -> impl Iterator<Item = &TagEdit> {
        self.remove.iter().chain(&self.set).chain(&self.add)
    }
}

#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Filename pattern, e.g. '%n - %t.flac'
    #[arg(short, long, visible_alias = "tag2fn", value_name = "PATTERN")]
    pub pattern: String,

    /// Zero-justify track numbers to the batch width
    #[arg(short, long)]
    pub justify: bool,

    /// Characters to remove from tag values
    #[arg(short = 's', long = "filter", value_name = "CHARS")]
    pub filter: Option<String>,

    /// Replace every FROM with TO in the new name
    #[arg(short, long, value_name = "\"FROM TO\"")]
    pub map: Option<Remap>,

    #[command(flatten)]
    pub write: WriteArgs,

    /// Files or glob patterns
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition() {
        Config::command().debug_assert();
    }

    #[test]
    fn test_parse_tag_command() {
        let config = Config::try_parse_from([
            "pathtag", "tag", "-p", "%n - %t.flac", "-t", "artist=Phish", "-a", "genre=Jam",
            "-r", "comment", "-j", "-n", "a.flac", "b.flac",
        ])
        .unwrap();
        let Commands::Tag(args) = config.command else {
            panic!("expected tag command");
        };
        assert_eq!(args.pattern.as_deref(), Some("%n - %t.flac"));
        assert_eq!(args.edits().count(), 3);
        assert_eq!(args.edits().next().map(TagEdit::key), Some("comment"));
        assert!(args.justify && args.write.noact && !args.write.confirm);
        assert_eq!(args.files, ["a.flac", "b.flac"]);
        assert!(args.has_edits());
    }

    #[test]
    fn test_fn2tag_alias() {
        let config = Config::try_parse_from(["pathtag", "tag", "--fn2tag", "%t", "a.flac"]).unwrap();
        let Commands::Tag(args) = config.command else {
            panic!("expected tag command");
        };
        assert_eq!(args.pattern.as_deref(), Some("%t"));
    }

    #[test]
    fn test_tag_without_edits() {
        let config = Config::try_parse_from(["pathtag", "-q", "tag", "a.flac"]).unwrap();
        assert!(config.quiet);
        let Commands::Tag(args) = config.command else {
            panic!("expected tag command");
        };
        assert!(!args.has_edits());
    }

    #[test]
    fn test_parse_rename_command() {
        let config = Config::try_parse_from([
            "pathtag", "rename", "--tag2fn", "%n %t.flac", "-s", "!?", "-m", "_ -", "-c", "x.flac",
        ])
        .unwrap();
        let Commands::Rename(args) = config.command else {
            panic!("expected rename command");
        };
        assert_eq!(args.pattern, "%n %t.flac");
        assert_eq!(args.filter.as_deref(), Some("!?"));
        assert_eq!(args.map, Some(Remap::new("_", "-")));
        assert!(args.write.confirm);
    }

    #[test]
    fn test_invalid_arguments_rejected() {
        assert!(Config::try_parse_from(["pathtag", "tag", "-t", "artist", "a.flac"]).is_err());
        assert!(Config::try_parse_from(["pathtag", "rename", "-p", "%t", "-m", "_", "a.flac"]).is_err());
        assert!(Config::try_parse_from(["pathtag", "show"]).is_err());
    }
}
