//! Build script rendering the `depthframe` manual pages.
//!
//! One page is written for the top-level command and one per subcommand
//! (`depthframe-listen.1`, `depthframe-emit.1`) under `$OUT_DIR/man`.

use std::{env, fs, path::PathBuf};

use clap::{Command, CommandFactory};
use clap_mangen::Man;

#[path = "src/cli.rs"]
mod cli;

fn render(cmd: Command, title: &str, dir: &std::path::Path) -> std::io::Result<()> {
    let mut page = Vec::new();
    Man::new(cmd).title(title).render(&mut page)?;
    fs::write(dir.join(format!("{title}.1")), page)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");

    let man_dir = PathBuf::from(env::var("OUT_DIR")?).join("man");
    fs::create_dir_all(&man_dir)?;

    let cmd = cli::Cli::command();
    for sub in cmd.get_subcommands() {
        let title = format!("depthframe-{}", sub.get_name());
        render(sub.clone(), &title, &man_dir)?;
    }
    render(cmd, "depthframe", &man_dir)?;

    Ok(())
}
