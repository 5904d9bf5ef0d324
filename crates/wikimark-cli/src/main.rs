//! Wikimark CLI - Render wiki markup to HTML, AST JSON or summaries
//!
//! Usage:
//!   wmcli [OPTIONS] [COMMAND] <FILE|->
//!
//! Commands:
//!   html      Render to HTML
//!   ast       Print the AST projection as JSON
//!
//! Without a command the document is rendered in the config's `format`
//! (HTML by default).
//!   toc       Print the table of contents
//!   stats     Show document statistics

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use serde::Serialize;
use wikimark_core::{Block, Config, Format, Markdown};

fn main() {
    let args: Vec<String> = env::args().collect();

    match run(&args) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let options = parse_args(args)?;
    init_logging(options.verbose);

    let config = match &options.config {
        Some(path) => Config::load_from_path(path).map_err(|e| e.to_string())?,
        None => Config::default(),
    };
    log::debug!("using config {:?}", config);

    let input = read_input(&options.file)?;

    match options.command {
        Some(Command::Toc) => cmd_toc(&config, &input, options.json),
        Some(Command::Stats) => cmd_stats(&config, &input, options.json),
        command => cmd_render(&config, render_format(command, &config), &input),
    }
}

#[derive(Debug)]
struct Options {
    /// `None` when no command word was given.
    command: Option<Command>,
    file: String,
    config: Option<String>,
    json: bool,
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Html,
    Ast,
    Toc,
    Stats,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut command = None;
    let mut config = None;
    let mut verbose = 0;
    let mut json = false;
    let mut file = None;

    let mut i = 1;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "-V" | "--version" => {
                println!("wmcli {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "-v" | "--verbose" => verbose += 1,
            "--json" => json = true,
            "-c" | "--config" => {
                i += 1;
                let path = args
                    .get(i)
                    .ok_or_else(|| format!("{} requires a path", arg))?;
                config = Some(path.clone());
            }
            "html" => command = Some(Command::Html),
            "ast" => command = Some(Command::Ast),
            "toc" => command = Some(Command::Toc),
            "stats" => command = Some(Command::Stats),
            "-" => file = Some(arg.clone()),
            _ if arg.starts_with('-') => {
                return Err(format!("unknown option: {}", arg));
            }
            _ => {
                if file.is_some() {
                    return Err("multiple files specified".to_string());
                }
                file = Some(arg.clone());
            }
        }
        i += 1;
    }

    let file = file.ok_or_else(|| "no input file specified".to_string())?;

    Ok(Options {
        command,
        file,
        config,
        json,
        verbose,
    })
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .init();
}

fn read_input(file: &str) -> Result<String, String> {
    if file == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        return Ok(input);
    }
    fs::read_to_string(file).map_err(|e| format!("failed to read '{}': {}", file, e))
}

fn print_help() {
    eprintln!(
        r#"wmcli - wiki markup renderer

USAGE:
    wmcli [OPTIONS] [COMMAND] <FILE|->

COMMANDS:
    html        Render to HTML
    ast         Print the AST projection as JSON
    (none)      Render in the config's format (HTML by default)
    toc         Print the table of contents
    stats       Show document statistics

OPTIONS:
    -c, --config <PATH>  Load engine settings from a TOML file
        --json           Print toc/stats as JSON
    -v, --verbose        Raise the log level (repeat for more)
    -h, --help           Print help information
    -V, --version        Print version information

EXAMPLES:
    wmcli page.md               Render a page to HTML
    wmcli ast page.md           Dump the node tree
    cat page.md | wmcli toc -   List headings from stdin
    wmcli -c wiki.toml page.md  Render with a custom plugin set
"#
    );
}

/// An explicit `html` or `ast` command wins over the config's `format`.
fn render_format(command: Option<Command>, config: &Config) -> Format {
    match command {
        Some(Command::Html) => Format::Html,
        Some(Command::Ast) => Format::Ast,
        _ => config.format,
    }
}

fn build_engine(config: &Config, format: Format) -> Result<Markdown, String> {
    let config = Config {
        format,
        ..config.clone()
    };
    Markdown::from_config(&config).map_err(|e| e.to_string())
}

// =============================================================================
// Render Commands
// =============================================================================

fn cmd_render(config: &Config, format: Format, input: &str) -> Result<(), String> {
    let md = build_engine(config, format)?;
    let rendered = md.render(input).map_err(|e| e.to_string())?;

    match rendered.as_ast() {
        Some(nodes) => {
            let json = serde_json::to_string_pretty(nodes).map_err(|e| e.to_string())?;
            println!("{}", json);
        }
        None => print!("{}", rendered.into_string()),
    }
    Ok(())
}

// =============================================================================
// Toc Command
// =============================================================================

fn cmd_toc(config: &Config, input: &str, json: bool) -> Result<(), String> {
    let md = build_engine(config, Format::Html)?;
    let toc = md.toc(input).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&toc).map_err(|e| e.to_string())?;
        println!("{}", out);
        return Ok(());
    }

    for entry in &toc {
        let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
        println!("{}- {} (#{})", indent, entry.text, entry.anchor);
    }
    Ok(())
}

// =============================================================================
// Stats Command
// =============================================================================

fn cmd_stats(config: &Config, input: &str, json: bool) -> Result<(), String> {
    let md = build_engine(config, Format::Html)?;
    let mut state = md.new_state();
    let blocks = md.parse(input, &mut state).map_err(|e| e.to_string())?;

    let mut stats = DocumentStats {
        chars: input.chars().count(),
        words: input.split_whitespace().count(),
        lines: input.lines().count(),
        footnote_definitions: state.footnote_definitions().len(),
        ..DocumentStats::default()
    };
    stats.count_blocks(&blocks);

    if json {
        let out = serde_json::to_string_pretty(&stats).map_err(|e| e.to_string())?;
        println!("{}", out);
        return Ok(());
    }

    println!("Document Statistics");
    println!("-------------------");
    println!("Plugins:      {}", plugin_list(&md));
    println!();
    println!("Content:");
    println!("  Total blocks:   {}", stats.total_blocks);
    println!("  Headings:       {}", stats.headings);
    println!("  Paragraphs:     {}", stats.paragraphs);
    println!("  Code blocks:    {}", stats.code_blocks);
    println!("  Lists:          {}", stats.lists);
    println!("  Task items:     {}", stats.task_items);
    println!("  Callouts:       {}", stats.callouts);
    println!("  Spoilers:       {}", stats.spoilers);
    println!("  Folds:          {}", stats.folds);
    println!("  Math blocks:    {}", stats.math_blocks);
    println!("  Footnotes:      {}", stats.footnote_definitions);
    println!();
    println!("Size:");
    println!("  Characters:     {}", stats.chars);
    println!("  Words (est.):   {}", stats.words);
    println!("  Lines:          {}", stats.lines);

    Ok(())
}

fn plugin_list(md: &Markdown) -> String {
    let names: Vec<&str> = md.plugins().iter().map(|p| p.name()).collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

#[derive(Debug, Default, Serialize)]
struct DocumentStats {
    total_blocks: usize,
    headings: usize,
    paragraphs: usize,
    code_blocks: usize,
    lists: usize,
    task_items: usize,
    callouts: usize,
    spoilers: usize,
    folds: usize,
    math_blocks: usize,
    footnote_definitions: usize,
    chars: usize,
    words: usize,
    lines: usize,
}

impl DocumentStats {
    fn count_blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.total_blocks += 1;
            match block {
                Block::Heading(_) => self.headings += 1,
                Block::Paragraph(_) | Block::BlockText(_) => self.paragraphs += 1,
                Block::CodeBlock(_) => self.code_blocks += 1,
                Block::List(_) => self.lists += 1,
                Block::TaskListItem(_) => self.task_items += 1,
                Block::FancyBlock(_) => self.callouts += 1,
                Block::SpoilerBlock(_) => self.spoilers += 1,
                Block::FoldBlock(_) => self.folds += 1,
                Block::MathBlock(_) => self.math_blocks += 1,
                _ => {}
            }
            if let Some(children) = block.children() {
                self.count_blocks(children);
            }
        }
    }
}
