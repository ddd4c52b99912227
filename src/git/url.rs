//! URL normalization for git operations

use std::borrow::Cow;

/// Convert SCP-style SSH URLs (`git@host:path`) to `ssh://git@host/path`,
/// which libgit2 handles more reliably.
pub fn normalize_ssh_url(url: &str) -> Cow<'_, str> {
    if !url.starts_with("git@") {
        return Cow::Borrowed(url);
    }

    match url.split_once(':') {
        Some((host, path)) => {
            let path = path.strip_prefix('/').unwrap_or(path);
            Cow::Owned(format!("ssh://{host}/{path}"))
        }
        None => Cow::Borrowed(url),
    }
}
