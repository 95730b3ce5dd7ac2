use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let out_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.schema.json"));
    chatterm_core::config::schema::write_config_schema(&out_path)?;
    Ok(())
}
