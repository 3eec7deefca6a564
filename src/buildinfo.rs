// https://doc.rust-lang.org/cargo/reference/environment-variables.html#environment-variables-cargo-sets-for-crates

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn git_hash() -> &'static str {
    option_env!("GIT_HASH").unwrap_or("unknown")
}

pub fn version_full() -> String {
    format!("{} ({})", version(), git_hash())
}

pub fn repository() -> &'static str {
    env!("CARGO_PKG_REPOSITORY")
}
