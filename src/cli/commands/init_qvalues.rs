//! Init-qvalues command - write a fresh seeded value table

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::{
    adapters::JsonRepository,
    agent::QTable,
    ports::QTableRepository,
};

#[derive(Parser, Debug)]
#[command(about = "Write a fresh seeded value table")]
pub struct InitQvaluesArgs {
    /// Path of the value table to create
    #[arg(long, default_value = "data/qvalues.json")]
    pub qvalues: PathBuf,

    /// Overwrite an existing file
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

pub fn execute(args: InitQvaluesArgs) -> Result<()> {
    if args.qvalues.exists() && !args.force {
        return Err(anyhow!(
            "{} already exists (use --force to overwrite)",
            args.qvalues.display()
        ));
    }

    let table = QTable::seeded(0.7, 1.0);
    JsonRepository::new().save(&table, &args.qvalues)?;

    println!("✓ Seeded value table written to {}", args.qvalues.display());
    Ok(())
}
