// src/main.rs

use anyhow::Result;

fn main() -> Result<()> {
    diffseek::commands::run_cli()
}
