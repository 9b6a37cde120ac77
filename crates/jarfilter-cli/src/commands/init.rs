//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# jarfilter configuration
#
# Each [[filter]] applies to archives whose directory contains `group`
# and whose file name starts with `artifact`. Entries whose names start
# with an exclude `path` are dropped, unless they start with `path` + one
# of its `keep` suffixes. Exclude paths must not overlap each other.

[[filter]]
group = "org.lwjgl"
artifact = "lwjgl"

# Drop every Linux native except x86_64
[[filter.exclude]]
path = "linux/"
keep = ["x64/"]

# Drop all Windows natives
[[filter.exclude]]
path = "windows/"

# [[filter]]
# group = "com.github.jnr"
# artifact = "jffi"
# exclude = [{ path = "jni/", keep = ["x86_64-Linux/"] }]
"#;

/// Runs the init command.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join("jarfilter.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;

    println!("Created jarfilter.toml");
    println!("\nNext steps:");
    println!("  1. Edit jarfilter.toml to declare your filters");
    println!("  2. Run: jarfilter check");
    println!("  3. Run: jarfilter filter --out-dir <DIR> <ARCHIVES>...");

    Ok(())
}
