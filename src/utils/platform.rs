//! Platform-specific helpers.

/// Whether this build targets Windows.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Shell and flag used to run a command line, `("sh", "-c")` on Unix and
/// `("cmd", "/C")` on Windows.
#[must_use]
pub const fn get_shell_command() -> (&'static str, &'static str) {
    if is_windows() {
        ("cmd", "/C")
    } else {
        ("sh", "-c")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_shell_command() {
        let (shell, flag) = get_shell_command();
        if cfg!(windows) {
            assert_eq!((shell, flag), ("cmd", "/C"));
        } else {
            assert_eq!((shell, flag), ("sh", "-c"));
        }
    }
}
