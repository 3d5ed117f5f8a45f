use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    /// `${VAR}`, `$VAR` or `%VAR%`
    static ref ENV_VAR: Regex = Regex::new(
        r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)|%([A-Za-z_][A-Za-z0-9_()]*)%"
    ).unwrap();
}

/// Expand environment variables in `input`.
///
/// Handles Unix (`$VAR`, `${VAR}`) and Windows (`%VAR%`) styles in a
/// single pass. Unknown variables are left verbatim.
pub fn expand_env_vars(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

/// Expand variables using `lookup` instead of the process environment.
pub fn expand_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if !input.contains('$') && !input.contains('%') {
        return input.to_string();
    }

    ENV_VAR
        .replace_all(input, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| m.as_str())
                .unwrap_or_default();
            lookup(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Normalize path separators for the current OS
pub fn normalize_path_for_os(path: &str) -> String {
    if cfg!(windows) {
        path.replace('/', "\\")
    } else {
        path.replace('\\', "/")
    }
}
