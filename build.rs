use std::env;
use std::fs;
use std::io::Result;
use std::path::{Path, PathBuf};

use clap::{Command, CommandFactory};
use clap_complete::{Shell, generate_to};
use clap_mangen::Man;

#[path = "src/cli.rs"]
mod cli;

const BIN: &str = "markline";

fn write_man_page(cmd: Command, dir: &Path, name: &str) -> Result<()> {
    let mut page = Vec::new();
    Man::new(cmd).title(name).render(&mut page)?;
    fs::write(dir.join(format!("{}.1", name)), page)
}

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=build.rs");

    let Some(out_dir) = env::var_os("OUT_DIR").map(PathBuf::from) else {
        return Ok(());
    };
    let mut cmd = cli::Cli::command();

    for shell in [Shell::Bash, Shell::Fish, Shell::Zsh, Shell::PowerShell] {
        generate_to(shell, &mut cmd, BIN, &out_dir)?;
    }

    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;
    for sub in cmd.get_subcommands() {
        write_man_page(sub.clone(), &man_dir, &format!("{}-{}", BIN, sub.get_name()))?;
    }
    write_man_page(cmd, &man_dir, BIN)
}
