// Copyright 2026 The parley authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Fixed command registry and resolution.
//!
//! The grammar is a static table of [`CommandSpec`] entries: exact-match
//! commands first, then prefix-match commands in table order. First match
//! wins. Resolution only identifies the command and splits out the
//! original-case arguments; behavior lives in the dispatcher.

/// How a command keyword is matched against the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The whole command part must equal the keyword.
    Exact,
    /// The command part must start with the keyword.
    Prefix,
}

/// Argument shape a command expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    None,
    Query,
    File,
    FileQuery,
    FileLineContent,
}

/// One entry in the fixed command grammar.
#[derive(Debug)]
pub struct CommandSpec {
    pub keyword: &'static str,
    pub match_kind: MatchKind,
    pub arity: Arity,
    pub description: &'static str,
}

/// The full command grammar, in match-priority order.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        keyword: "@help",
        match_kind: MatchKind::Exact,
        arity: Arity::None,
        description: "Show this command reference",
    },
    CommandSpec {
        keyword: "@list",
        match_kind: MatchKind::Exact,
        arity: Arity::None,
        description: "List models available on the server",
    },
    CommandSpec {
        keyword: "@clear",
        match_kind: MatchKind::Exact,
        arity: Arity::None,
        description: "Clear the conversation history",
    },
    CommandSpec {
        keyword: "@info",
        match_kind: MatchKind::Exact,
        arity: Arity::None,
        description: "Show the current model",
    },
    CommandSpec {
        keyword: "@workspace",
        match_kind: MatchKind::Prefix,
        arity: Arity::Query,
        description: "Ask a question about the whole workspace (@workspace: <query>)",
    },
    CommandSpec {
        keyword: "@model ",
        match_kind: MatchKind::Prefix,
        arity: Arity::Query,
        description: "Switch to another model (@model <name>)",
    },
    CommandSpec {
        keyword: "@read ",
        match_kind: MatchKind::Prefix,
        arity: Arity::FileQuery,
        description: "Ask a question about one file (@read <file>: <query>)",
    },
    CommandSpec {
        keyword: "@understand ",
        match_kind: MatchKind::Prefix,
        arity: Arity::File,
        description: "Ask the model for a structured analysis of a file",
    },
    CommandSpec {
        keyword: "@analyze ",
        match_kind: MatchKind::Prefix,
        arity: Arity::File,
        description: "Show line statistics and diagnostics for a file",
    },
    CommandSpec {
        keyword: "@search ",
        match_kind: MatchKind::Prefix,
        arity: Arity::Query,
        description: "Search all workspace files for a substring",
    },
    CommandSpec {
        keyword: "@edit ",
        match_kind: MatchKind::Prefix,
        arity: Arity::FileLineContent,
        description: "Replace one line (@edit <file> <line> <content>)",
    },
    CommandSpec {
        keyword: "@explain ",
        match_kind: MatchKind::Prefix,
        arity: Arity::File,
        description: "Show a heuristic structure report for a file",
    },
    CommandSpec {
        keyword: "@refactor ",
        match_kind: MatchKind::Prefix,
        arity: Arity::File,
        description: "Show heuristic refactoring suggestions for a file",
    },
    CommandSpec {
        keyword: "@deps ",
        match_kind: MatchKind::Prefix,
        arity: Arity::File,
        description: "Show imports, unused imports, and manifest dependencies",
    },
];

/// A resolved command: the matched spec plus original-case argument text.
#[derive(Debug)]
pub struct ResolvedCommand<'a> {
    pub spec: &'static CommandSpec,
    /// Text after the keyword within the command part, original case, trimmed.
    pub args: &'a str,
    /// Text after the first colon, original case, trimmed. Empty if absent.
    pub query: &'a str,
}

/// Resolve an input line against the registry.
///
/// The command keyword is matched ASCII-case-insensitively; arguments and
/// query are taken from the original-case string. Everything after the first
/// colon is the query part, rejoined if further colons exist.
pub fn resolve(input: &str) -> Option<ResolvedCommand<'_>> {
    let trimmed = input.trim();

    let (command_part, query) = match trimmed.split_once(':') {
        Some((before, after)) => (before.trim_end(), after.trim()),
        None => (trimmed, ""),
    };

    for spec in COMMANDS {
        let matched = match spec.match_kind {
            MatchKind::Exact => command_part.eq_ignore_ascii_case(spec.keyword),
            // get() rejects inputs where the keyword length is not a char
            // boundary, so the slice below is always valid
            MatchKind::Prefix => command_part
                .get(..spec.keyword.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(spec.keyword)),
        };
        if matched {
            let args = match spec.match_kind {
                MatchKind::Exact => "",
                MatchKind::Prefix => command_part[spec.keyword.len()..].trim(),
            };
            return Some(ResolvedCommand { spec, args, query });
        }
    }
    None
}

/// The static command-name list shown in suggestion mode.
pub fn command_names() -> Vec<&'static str> {
    COMMANDS.iter().map(|spec| spec.keyword.trim_end()).collect()
}

/// The static `@help` reference text.
pub fn reference_text() -> String {
    let mut lines = vec!["Available commands:".to_string()];
    for spec in COMMANDS {
        lines.push(format!("  {} - {}", spec.keyword.trim_end(), spec.description));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_commands_resolve() {
        for keyword in ["@help", "@list", "@clear", "@info"] {
            let resolved = resolve(keyword).unwrap();
            assert_eq!(resolved.spec.keyword, keyword);
            assert_eq!(resolved.spec.match_kind, MatchKind::Exact);
        }
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let resolved = resolve("@HELP").unwrap();
        assert_eq!(resolved.spec.keyword, "@help");
    }

    #[test]
    fn test_prefix_commands_resolve() {
        let cases = [
            ("@model llama3.2", "@model ", "llama3.2"),
            ("@read src/app.js: what does this do", "@read ", "src/app.js"),
            ("@understand src/app.js", "@understand ", "src/app.js"),
            ("@analyze lib.js", "@analyze ", "lib.js"),
            ("@search TODO", "@search ", "TODO"),
            ("@edit a.js 3 const x = 1;", "@edit ", "a.js 3 const x = 1;"),
            ("@explain a.js", "@explain ", "a.js"),
            ("@refactor a.js", "@refactor ", "a.js"),
            ("@deps a.js", "@deps ", "a.js"),
        ];
        for (input, keyword, args) in cases {
            let resolved = resolve(input).unwrap();
            assert_eq!(resolved.spec.keyword, keyword, "input: {input}");
            assert_eq!(resolved.args, args, "input: {input}");
        }
    }

    #[test]
    fn test_workspace_query_split() {
        let resolved = resolve("@workspace: list the top-level folders").unwrap();
        assert_eq!(resolved.spec.keyword, "@workspace");
        assert_eq!(resolved.query, "list the top-level folders");
    }

    #[test]
    fn test_read_keeps_argument_case() {
        let resolved = resolve("@READ Src/App.js: What Does This Do?").unwrap();
        assert_eq!(resolved.spec.keyword, "@read ");
        assert_eq!(resolved.args, "Src/App.js");
        assert_eq!(resolved.query, "What Does This Do?");
    }

    #[test]
    fn test_query_rejoins_further_colons() {
        let resolved = resolve("@workspace: explain src/main.rs: the entry point").unwrap();
        assert_eq!(resolved.query, "explain src/main.rs: the entry point");
    }

    #[test]
    fn test_unknown_command() {
        assert!(resolve("@bogus something").is_none());
        assert!(resolve("@model").is_none()); // prefix requires the space
    }

    #[test]
    fn test_multibyte_input_at_keyword_boundary() {
        // "é" straddles the byte length of "@deps "; must not match or panic
        assert!(resolve("@deps\u{e9}").is_none());

        let resolved = resolve("@DEPS caf\u{e9}.js").unwrap();
        assert_eq!(resolved.spec.keyword, "@deps ");
        assert_eq!(resolved.args, "caf\u{e9}.js");
    }

    #[test]
    fn test_registry_arities() {
        let expected = [
            ("@help", Arity::None),
            ("@list", Arity::None),
            ("@clear", Arity::None),
            ("@info", Arity::None),
            ("@workspace", Arity::Query),
            ("@model ", Arity::Query),
            ("@read ", Arity::FileQuery),
            ("@understand ", Arity::File),
            ("@analyze ", Arity::File),
            ("@search ", Arity::Query),
            ("@edit ", Arity::FileLineContent),
            ("@explain ", Arity::File),
            ("@refactor ", Arity::File),
            ("@deps ", Arity::File),
        ];
        assert_eq!(COMMANDS.len(), expected.len());
        for (keyword, arity) in expected {
            let spec = COMMANDS
                .iter()
                .find(|s| s.keyword == keyword)
                .unwrap_or_else(|| panic!("missing entry for {keyword}"));
            assert_eq!(spec.arity, arity, "arity of {keyword}");
        }
    }

    #[test]
    fn test_command_names_cover_registry() {
        let names = command_names();
        assert_eq!(names.len(), COMMANDS.len());
        assert!(names.contains(&"@workspace"));
        assert!(names.contains(&"@model"));
    }

    #[test]
    fn test_reference_text_lists_every_command() {
        let text = reference_text();
        for spec in COMMANDS {
            assert!(text.contains(spec.keyword.trim_end()));
        }
    }
}
