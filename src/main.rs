use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use similar::{ChangeTag, TextDiff};

use markline::{Config, ContentUpdate, Dialect, ParseError};

mod cli;
use cli::{Cli, Commands};

fn read_all(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn start_dir_for(input_path: Option<&Path>) -> io::Result<PathBuf> {
    if let Some(p) = input_path {
        Ok(p.parent().unwrap_or(Path::new(".")).to_path_buf())
    } else {
        std::env::current_dir()
    }
}

fn load_config(explicit: Option<&Path>, file: Option<&Path>) -> io::Result<Config> {
    let start_dir = start_dir_for(file)?;
    let (cfg, cfg_path) = markline::config::load(explicit, &start_dir)?;
    if let Some(path) = &cfg_path {
        log::debug!("Using config from: {}", path.display());
    } else {
        log::debug!("Using default config");
    }
    Ok(cfg)
}

fn print_diff(label: &str, expected: &str, actual: &str) {
    let diff = TextDiff::from_lines(expected, actual);

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            println!("---");
        }
        println!("Diff in {}:{}:", label, group[0].old_range().start + 1);

        for op in group {
            for change in diff.iter_changes(op) {
                let (sign, style) = match change.tag() {
                    ChangeTag::Delete => ("-", "\x1b[31m"),
                    ChangeTag::Insert => ("+", "\x1b[32m"),
                    ChangeTag::Equal => (" ", "\x1b[0m"),
                };

                print!("{}{}{}", style, sign, change.value());

                if change.tag() != ChangeTag::Equal {
                    print!("\x1b[0m");
                }
            }
        }
    }
}

fn report(err: ParseError) -> ! {
    match &err {
        ParseError::UnparsableLine {
            line_number, text, ..
        } => eprintln!("Error: line {} cannot be parsed: {:?}", line_number, text),
        _ => eprintln!("Error: {}", err),
    }
    std::process::exit(1);
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { file } => {
            let cfg = load_config(cli.config.as_deref(), file.as_deref())?;
            let input = read_all(file.as_ref())?;
            let doc = Dialect::new(cfg)
                .parse_complete_text(&input)
                .unwrap_or_else(|err| report(err));
            print!("{}", doc.dump());
            Ok(())
        }
        Commands::Update {
            file,
            offset,
            length,
            text,
            check,
        } => {
            let cfg = load_config(cli.config.as_deref(), Some(&file))?;
            let input = read_all(Some(&file))?;
            let dialect = Dialect::new(cfg);
            let doc = dialect
                .parse_complete_text(&input)
                .unwrap_or_else(|err| report(err));

            let update = ContentUpdate::new(offset, length, text);
            let (doc, incremental) = dialect
                .update_or_reparse(doc, &update)
                .unwrap_or_else(|err| report(err));
            if incremental {
                println!("incremental");
            } else {
                println!("full reparse");
            }
            let dump = doc.dump();
            print!("{}", dump);

            if check {
                let fresh = dialect
                    .parse_complete_text(&doc.text())
                    .unwrap_or_else(|err| report(err));
                let expected = fresh.dump();
                if expected != dump {
                    print_diff(&file.display().to_string(), &expected, &dump);
                    std::process::exit(1);
                }
                println!("Matches a full reparse");
            }
            Ok(())
        }
    }
}
