use crate::haplogroup;
use std::path::PathBuf;

pub fn run(input: PathBuf, tables: PathBuf, output_file: PathBuf) -> anyhow::Result<()> {
    haplogroup::predict_haplogroups(&input, &tables, &output_file)
}
