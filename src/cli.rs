use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict Y-haplogroups from ancestral/derived marker-call tables
    Predict {
        /// Marker-call table for one sample, or a directory scanned for .out tables
        input: PathBuf,

        /// Directory with Intermediates.txt and per-root <ROOT>_int.txt tables
        #[arg(short = 't', long = "tables")]
        tables: PathBuf,

        /// Output file for the prediction report
        #[arg(short = 'o', long = "output", default_value = "hg_prediction.txt")]
        output_file: PathBuf,
    },
}
