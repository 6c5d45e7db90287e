use std::process::Command;

fn main() {
    if std::env::var("SPEEDO_VERSION").is_err() {
        let version = "$Format:%(describe)$"; // Replaced by git-archive.
        let version = if version.starts_with('$') {
            match Command::new("git").args(["describe", "--tags"]).output() {
                Ok(o) if o.status.success() => {
                    String::from_utf8_lossy(&o.stdout).trim().to_string()
                }
                _ => std::env::var("CARGO_PKG_VERSION").unwrap_or_default(),
            }
        } else {
            version.to_string()
        };

        let version = version.strip_prefix('v').unwrap_or(&version);
        println!("cargo:rustc-env=SPEEDO_VERSION={version}");
    }

    println!("cargo:rerun-if-env-changed=SPEEDO_VERSION");
}
