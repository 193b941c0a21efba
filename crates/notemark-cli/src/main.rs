mod outline;

use anyhow::{Context, Result, anyhow};
use notemark_config::Config;
use notemark_engine::{LinkedNote, NoteMapper, Parser, ParserConfig, PosCache, Position};
use relative_path::RelativePathBuf;
use std::{
    env,
    path::{Path, PathBuf},
    process,
};

const USAGE: &str = "<note.md> [--cursor LINE:COLUMN] [--note-path /Folder/Note/]";

#[derive(Debug, PartialEq, Eq)]
struct Args {
    note: PathBuf,
    cursor: Option<Position>,
    note_path: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut note = None;
    let mut cursor = None;
    let mut note_path = None;
    let mut rest = args.iter();
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--cursor" => {
                let value = rest.next().ok_or_else(|| anyhow!("--cursor needs LINE:COLUMN"))?;
                cursor = Some(parse_position(value)?);
            }
            "--note-path" => {
                let value = rest.next().ok_or_else(|| anyhow!("--note-path needs a folder"))?;
                note_path = Some(value.clone());
            }
            flag if flag.starts_with("--") => return Err(anyhow!("unknown option {flag}")),
            path if note.is_none() => note = Some(PathBuf::from(path)),
            extra => return Err(anyhow!("unexpected argument {extra}")),
        }
    }
    Ok(Args {
        note: note.ok_or_else(|| anyhow!("no note given"))?,
        cursor,
        note_path,
    })
}

/// Parses a zero-based `LINE:COLUMN` pair.
fn parse_position(value: &str) -> Result<Position> {
    let (line, column) = value
        .split_once(':')
        .ok_or_else(|| anyhow!("expected LINE:COLUMN, got {value}"))?;
    let line = line.trim().parse().with_context(|| format!("bad line in {value}"))?;
    let column = column.trim().parse().with_context(|| format!("bad column in {value}"))?;
    Ok(Position::new(line, column))
}

/// Storage-relative folder of `note` inside `notes_root`, as note links
/// expect it: `/Folder/Sub/`, or `/` at the root.
fn note_folder(note: &Path, notes_root: &Path) -> Option<String> {
    let relative = note.strip_prefix(notes_root).ok()?;
    let folder = RelativePathBuf::from_path(relative.parent()?).ok()?;
    if folder.as_str().is_empty() {
        Some("/".to_string())
    } else {
        Some(format!("/{folder}/"))
    }
}

#[derive(Default)]
struct PrintMapper {
    lines: Vec<String>,
}

impl NoteMapper for PrintMapper {
    fn map(&mut self, links: Vec<LinkedNote>, headings: Vec<String>) {
        self.lines = outline::mapping_lines(&links, &headings);
    }
}

fn load_parser_config(note: &Path, note_path: Option<String>) -> Result<ParserConfig> {
    let config_path = Config::config_path();
    let (mut parser_config, notes_root) = match Config::load()? {
        Some(config) => {
            log::info!("Loaded config from {}", config_path.display());
            (config.parser_config(&config_path)?, Some(config.notes_path))
        }
        None => {
            log::info!("No config file at {}, using defaults", config_path.display());
            (ParserConfig::default(), None)
        }
    };

    let folder = note_path.or_else(|| {
        let note = note.canonicalize().ok()?;
        let root = notes_root?.canonicalize().ok()?;
        note_folder(&note, &root)
    });
    if let Some(folder) = folder {
        log::debug!("note folder: {folder}");
        parser_config.note_path = folder;
    }
    if let Some(file_name) = note.file_name().and_then(|n| n.to_str()) {
        parser_config.note_file_name = file_name.to_string();
    }
    Ok(parser_config)
}

fn run(args: Args) -> Result<()> {
    let text = std::fs::read_to_string(&args.note)
        .with_context(|| format!("Failed to read note {}", args.note.display()))?;
    let parser = Parser::new(load_parser_config(&args.note, args.note_path)?);

    let mut mapper = PrintMapper::default();
    let doc = parser
        .parse_and_map(&text, &mut mapper)
        .with_context(|| format!("Failed to parse {}", args.note.display()))?;

    for line in outline::document_lines(&doc.blocks) {
        println!("{line}");
    }
    if !mapper.lines.is_empty() {
        println!();
        for line in &mapper.lines {
            println!("{line}");
        }
    }
    if let Some(cursor) = args.cursor {
        let delims = PosCache::build(&doc).delims_surrounding(cursor, None);
        println!();
        println!("delimiters at {}:{}", cursor.line, cursor.column);
        for line in outline::delim_lines(&delims) {
            println!("  {line}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("notemark-cli", String::as_str);
    let parsed = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Usage: {program} {USAGE}");
            process::exit(1);
        }
    };
    run(parsed)
}
