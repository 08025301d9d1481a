use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("barmon version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
