use clap::{Command, CommandFactory};
use clap_complete::{generate_to, Shell};
use clap_mangen::Man;
use rubrik_cdm_rs::cli::Args;
use std::fs;
use std::path::Path;

const BIN: &str = "rubrik-cdm";

fn render_page(cmd: &Command, file_name: &str, man_dir: &Path) -> std::io::Result<()> {
    let mut buffer: Vec<u8> = Vec::new();
    Man::new(cmd.clone()).render(&mut buffer)?;
    fs::write(man_dir.join(format!("{}.1", file_name)), buffer)
}

/// Writes `rubrik-cdm.1`, one `rubrik-cdm-<subcommand>.1` per operation, and
/// bash/zsh/fish completions under `assets/`.
fn main() -> std::io::Result<()> {
    let out_dir = Path::new("assets");
    let man_dir = out_dir.join("man");
    let comp_dir = out_dir.join("completions");

    fs::create_dir_all(&man_dir)?;
    fs::create_dir_all(&comp_dir)?;

    let mut cmd = Args::command().name(BIN);
    cmd.build();

    render_page(&cmd, BIN, &man_dir)?;
    let mut pages = 1;
    for sub in cmd.get_subcommands().filter(|s| s.get_name() != "completions") {
        let page = format!("{}-{}", BIN, sub.get_name());
        let sub = sub.clone().name(page.clone());
        render_page(&sub, &page, &man_dir)?;
        pages += 1;
    }
    println!("{} man pages generated in {}", pages, man_dir.display());

    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        generate_to(shell, &mut cmd, BIN, &comp_dir)?;
    }
    println!("Completions generated in {}", comp_dir.display());

    Ok(())
}
