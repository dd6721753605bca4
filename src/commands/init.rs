use anyhow::Result;
use std::path::Path;

use license_gate::init;

pub fn handle_init(workspace: &Path, force: bool, quiet: bool) -> Result<()> {
    let path = init::generate_config(workspace, force)?;

    if !quiet {
        println!("✅ Wrote default policy to {}", path.display());
    }

    Ok(())
}
