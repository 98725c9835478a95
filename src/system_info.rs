use git_version::git_version;

// include -modified if the working tree has uncommitted changes
const COMMIT: &str = git_version!(
    args = ["--abbrev=10", "--always", "--dirty=-modified"],
    fallback = "unknown"
);

/// Human-readable build summary, including the configured model if any.
pub fn get_system_info(model: Option<&str>) -> String {
    let profile = if cfg!(debug_assertions) {
        "Dev"
    } else {
        "Release"
    };
    let model = match model {
        Some(model) => format!("Model: {model}"),
        None => "Model: formatting disabled".to_string(),
    };

    format!(
        "{} {}\nCommit: {}\n{}\n{} build",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        COMMIT,
        model,
        profile
    )
}
