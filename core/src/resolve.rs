//! Depth-first lookup of a command path in the command tree.

use crate::command::Command;

/// Outcome of walking a token sequence down the tree.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    /// Deepest command reached.
    pub command: &'a Command,
    /// Number of tokens matched as command names or aliases.
    pub depth: usize,
    /// First token that matched no child, if resolution stopped early.
    pub unmatched: Option<&'a str>,
}

impl Resolution<'_> {
    /// Returns `true` when no token was left unmatched.
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_none()
    }
}

/// Resolves `tokens` against the children of `root`.
///
/// Walking stops when the tokens run out or the current command has no
/// children. A token that matches no child stops the walk and is reported as
/// unmatched.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, resolve};
///
/// let root = Command::new("git")
///     .with_subcommand(Command::new("remote").with_subcommand(Command::new("add")));
///
/// let found = resolve(&root, &["remote", "add", "origin"]);
/// assert_eq!(found.command.name, "add");
/// assert_eq!(found.depth, 2);
/// assert!(found.is_complete());
///
/// let missing = resolve(&root, &["remot"]);
/// assert_eq!(missing.command.name, "git");
/// assert_eq!(missing.unmatched, Some("remot"));
/// ```
pub fn resolve<'a, S: AsRef<str>>(root: &'a Command, tokens: &'a [S]) -> Resolution<'a> {
    walk(root, tokens, 0)
}

/// Canonical names of the commands `tokens` walk through from `root`, aliases
/// replaced by the names they stand for. Stops at the first unmatched token.
pub fn resolved_path<'a, S: AsRef<str>>(root: &'a Command, tokens: &[S]) -> Vec<&'a str> {
    let mut names = Vec::new();
    let mut current = root;
    for token in tokens {
        let Some(child) = current.find_subcommand(token.as_ref()) else {
            break;
        };
        names.push(child.name.as_str());
        current = child;
    }
    names
}

fn walk<'a, S: AsRef<str>>(current: &'a Command, tokens: &'a [S], depth: usize) -> Resolution<'a> {
    let Some((head, rest)) = tokens.split_first() else {
        return Resolution {
            command: current,
            depth,
            unmatched: None,
        };
    };
    if current.subcommands.is_empty() {
        return Resolution {
            command: current,
            depth,
            unmatched: None,
        };
    }

    let head = head.as_ref();
    match current.find_subcommand(head) {
        Some(child) => walk(child, rest, depth + 1),
        None => Resolution {
            command: current,
            depth,
            unmatched: Some(head),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Command {
        Command::new("uwe")
            .with_subcommand(Command::new("run").with_aliases(["r", "rnu", "nur"]))
            .with_subcommand(
                Command::new("remote")
                    .with_alias("rm")
                    .with_subcommand(Command::new("add").with_alias("a"))
                    .with_subcommand(Command::new("remove")),
            )
    }

    #[test]
    fn test_empty_tokens_return_root() {
        let root = tree();
        let empty: [&str; 0] = [];
        let found = resolve(&root, &empty);
        assert_eq!(found.command.name, "uwe");
        assert_eq!(found.depth, 0);
        assert!(found.is_complete());
    }

    #[test]
    fn test_every_alias_resolves() {
        let root = tree();
        for token in ["run", "r", "rnu", "nur"] {
            let tokens = [token];
            let found = resolve(&root, &tokens);
            assert_eq!(found.command.name, "run", "{token}");
            assert!(found.is_complete());
        }
    }

    #[test]
    fn test_alias_chain_reaches_leaf() {
        let root = tree();
        let found = resolve(&root, &["rm", "a"]);
        assert_eq!(found.command.name, "add");
        assert_eq!(found.depth, 2);
        assert!(found.is_complete());
    }

    #[test]
    fn test_resolved_path_uses_canonical_names() {
        let root = tree();
        assert_eq!(resolved_path(&root, &["rm", "a"]), vec!["remote", "add"]);
        assert_eq!(resolved_path(&root, &["rm", "zz", "a"]), vec!["remote"]);
    }

    #[test]
    fn test_unknown_first_segment() {
        let root = tree();
        let found = resolve(&root, &["nazan-cute-uwu", "run"]);
        assert_eq!(found.command.name, "uwe");
        assert_eq!(found.depth, 0);
        assert_eq!(found.unmatched, Some("nazan-cute-uwu"));
    }

    #[test]
    fn test_unknown_nested_segment() {
        let root = tree();
        let found = resolve(&root, &["remote", "rename"]);
        assert_eq!(found.command.name, "remote");
        assert_eq!(found.unmatched, Some("rename"));
    }

    #[test]
    fn test_leaf_stops_and_leaves_rest() {
        let root = tree();
        let tokens = vec!["run".to_string(), "file.txt".to_string()];
        let found = resolve(&root, &tokens);
        assert_eq!(found.command.name, "run");
        assert_eq!(found.depth, 1);
        assert!(found.is_complete());
    }
}
