//! lexstyle - print a file with lexer-driven syntax highlighting

mod terminal;

use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use lexstyle::config::Config;
use lexstyle::error::{Error, Result};
use lexstyle::logging;
use lexstyle::syntax::{
    viewport, BuiltinCatalog, DocumentMode, Highlighter, LexerCatalog,
    LexerHighlighter, LexerRegistry,
};
use lexstyle::{Document, TextBuffer, Window};
use terminal::{ColorChoice, Terminal};

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    file: Option<PathBuf>,
    cursor: usize,
    columns: Option<u16>,
    rows: Option<u16>,
    color: ColorChoice,
    lexer: Option<String>,
    list_lexers: bool,
    help: bool,
    version: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_args(env::args().skip(1))?;

    if options.help {
        print_usage();
        return Ok(());
    }
    if options.version {
        print_version();
        return Ok(());
    }

    let config = Config::load()?;
    let _logging = logging::init(&config);

    // Auto-detected modes pick up the configured token map
    let registry = LexerRegistry::with_mapping(config.style_mapping());
    for descriptor in BuiltinCatalog.lexers()? {
        registry.register(descriptor)?;
    }
    if LexerRegistry::install_global(registry).is_err() {
        tracing::warn!("global lexer registry already installed");
    }
    let registry = LexerRegistry::global();

    if options.list_lexers {
        for line in lexer_listing(registry) {
            println!("{}", line);
        }
        return Ok(());
    }

    let path = options
        .file
        .ok_or_else(|| Error::Message("no input file (try --help)".to_string()))?;
    let mut doc = TextBuffer::from_file(&path)?;
    doc.set_point(options.cursor);

    let mut mode = DocumentMode::for_file(registry, doc.name());
    if let Some(id) = &options.lexer {
        let lexer = registry
            .by_id(id)
            .ok_or_else(|| Error::UnknownLexer(id.clone()))?;
        mode.set_lexer(lexer);
    }

    let (term_cols, term_rows) = terminal::size();
    let columns = options.columns.unwrap_or(term_cols);
    let rows = options.rows.unwrap_or(term_rows);
    let colors = options.color.enabled();
    let mut window = Window::new(columns, rows).with_colors(colors);

    let settings = config.highlight_settings();
    let mut highlighter =
        LexerHighlighter::new(mode, Arc::new(config.face_registry()), settings);
    highlighter.highlight(&doc, &mut window);

    let mut term = Terminal::new(colors);
    match viewport::select(&doc, doc.point(), columns, rows, settings.size_limit) {
        Ok(view) => term.render(view.text, view.base_offset, &window)?,
        Err(reason) => {
            tracing::debug!(?reason, "printing undecodable document unstyled");
            let bytes = doc.bytes(doc.point_min()..doc.point_max());
            term.write_str(&String::from_utf8_lossy(bytes))?;
            term.flush()?;
        }
    }

    Ok(())
}

/// One line per lexer: its id and file patterns
fn lexer_listing(registry: &LexerRegistry) -> Vec<String> {
    registry
        .ids()
        .into_iter()
        .map(|id| {
            let patterns = registry
                .by_id(&id)
                .map(|d| d.patterns().iter().map(|p| p.as_str().to_string()).collect::<Vec<_>>())
                .unwrap_or_default();
            format!("{:<10} {}", id, patterns.join(" "))
        })
        .collect()
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options> {
    let mut options = Options::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => options.help = true,
            "--version" | "-V" => options.version = true,
            "--list-lexers" => options.list_lexers = true,
            "--cursor" => options.cursor = parse_number(&arg, args.next())?,
            "--columns" => options.columns = Some(parse_number(&arg, args.next())?),
            "--rows" => options.rows = Some(parse_number(&arg, args.next())?),
            "--color" => options.color = required(&arg, args.next())?.parse()?,
            "--lexer" => options.lexer = Some(required(&arg, args.next())?),
            _ if arg.starts_with('-') => {
                return Err(Error::Message(format!("unknown option '{}'", arg)));
            }
            _ if options.file.is_some() => {
                return Err(Error::Message(format!("unexpected argument '{}'", arg)));
            }
            _ => options.file = Some(PathBuf::from(&arg)),
        }
    }

    Ok(options)
}

fn required(flag: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| Error::Message(format!("{} requires a value", flag)))
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T> {
    let value = required(flag, value)?;
    value
        .parse()
        .map_err(|_| Error::Message(format!("{} expects a number, got '{}'", flag, value)))
}

fn print_usage() {
    println!("lexstyle {} - lexer-driven syntax highlighting", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: lexstyle [OPTIONS] FILE");
    println!();
    println!("Options:");
    println!("  --cursor N         Cursor byte offset (default 0)");
    println!("  --columns N        Viewport width (default: terminal width)");
    println!("  --rows N           Viewport height (default: terminal height)");
    println!("  --color WHEN       auto, always or never (default auto)");
    println!("  --lexer ID         Use this lexer instead of detecting one");
    println!("  --list-lexers      List known lexers and their file patterns");
    println!("  -h, --help         Show this help message");
    println!("  -V, --version      Show version information");
    println!();
    println!("Settings are read from ~/.lexstyle.toml; set LEXSTYLE_DEBUG=1 to log");
    println!("to {}", logging::log_file().display());
}

fn print_version() {
    println!("lexstyle {}", env!("CARGO_PKG_VERSION"));
}
