// Build script for neurodxctl - embeds the version shown by `--version`

fn main() {
    // Tagged release builds export the git tag (e.g. "v0.4.1") as
    // NEURODX_VERSION; local builds report the workspace version.
    let version = std::env::var("NEURODX_VERSION")
        .map(|tag| tag.trim_start_matches('v').to_string())
        .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=NEURODX_VERSION={}", version);

    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=NEURODX_VERSION");
}
