fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let git = |args: &[&str]| {
        std::process::Command::new("git")
            .args(args)
            .output()
            .ok()
            .filter(|o| o.status.success())
    };

    let on_tag = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();
    let hash = git(&["rev-parse", "--short", "HEAD"])
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|h| !h.is_empty());

    let version = match (on_tag, hash) {
        (true, _) => std::env::var("CARGO_PKG_VERSION").unwrap_or_default(),
        (false, Some(hash)) => format!("dev@{hash}"),
        (false, None) => "dev@unknown".to_string(),
    };
    println!("cargo:rustc-env=MDOCSET_VERSION={version}");
}
