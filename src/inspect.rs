// Copyright 2026 The parley authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Heuristic code inspector.
//!
//! Pure functions over file text: line statistics, naive cyclomatic
//! complexity, line-scan function/class extraction, duplicate-window
//! detection, naming checks, and import analysis.
//!
//! None of this is a real parser. Function and class boundaries are found by
//! line scanning, so nested constructs and closing braces are not detected -
//! an extracted body runs until the next signature line or end of file. The
//! imprecision is intentional: downstream reports depend on these exact
//! boundaries. A real parser could be supplied behind the same interface.

use once_cell::sync::Lazy;
use regex::Regex;

/// Complexity above which a whole file is flagged.
pub const HIGH_COMPLEXITY_THRESHOLD: u32 = 10;

/// Complexity above which a single function is flagged.
pub const COMPLEX_FUNCTION_THRESHOLD: u32 = 5;

/// Line count above which a function is considered long.
pub const LONG_FUNCTION_LINES: usize = 20;

/// Window size for duplicate detection.
pub const DUPLICATE_WINDOW: usize = 5;

/// Branching tokens counted by [`complexity`], checked in this order.
const BRANCH_TOKENS: &[&str] = &["if", "else", "for", "while", "switch", "catch", "&&", "||"];

static FUNCTION_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:async\s+)?function\b\s*([A-Za-z_$][\w$]*)?").unwrap());
static FUNCTION_EXPR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:async\s+)?([A-Za-z_$][\w$]*)\s*=\s*function").unwrap());
static CLASS_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^class\b\s*([A-Za-z_$][\w$]*)?").unwrap());

static VAR_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)").unwrap());
static FUNC_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bfunction\s+([A-Za-z_$][\w$]*)").unwrap());
static CLASS_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bclass\s+([A-Za-z_$][\w$]*)").unwrap());

static CAMEL_CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-zA-Z0-9]*$").unwrap());
static PASCAL_CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").unwrap());

static IMPORT_BINDINGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"import\s+(?:\*\s+as\s+([A-Za-z_$][\w$]*)|\{([^}]*)\}|([A-Za-z_$][\w$]*))")
        .unwrap()
});
static IMPORT_MODULE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"['"]([^'"]+)['"]"#).unwrap());

/// Line counts for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStats {
    pub total_lines: usize,
    pub non_empty_lines: usize,
}

/// A function found by the line scan.
#[derive(Debug, Clone)]
pub struct FunctionInfo {
    pub name: String,
    pub body: String,
    pub line_count: usize,
}

/// A class found by the line scan.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub name: String,
    pub body: String,
}

/// Bounds of the earlier window of a duplicated pair, 1-based inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateWindow {
    pub start_line: usize,
    pub end_line: usize,
}

/// Count total and non-empty lines.
pub fn statistics(text: &str) -> FileStats {
    let total_lines = text.lines().count();
    let non_empty_lines = text.lines().filter(|l| !l.trim().is_empty()).count();
    FileStats {
        total_lines,
        non_empty_lines,
    }
}

/// Naive cyclomatic complexity: 1 plus one increment per line whose trimmed
/// text contains any branching token. The tokens are checked in a fixed order
/// and the first hit moves the scan to the next line, so a line counts at
/// most once no matter how many tokens it contains.
pub fn complexity(text: &str) -> u32 {
    let mut score = 1;
    for line in text.lines() {
        let trimmed = line.trim();
        if BRANCH_TOKENS.iter().any(|token| trimmed.contains(token)) {
            score += 1;
        }
    }
    score
}

/// Extract functions by line scan. A function starts at a line matching
/// `^(async )?function NAME` or `^(async )?NAME = function`; its body runs
/// until the next start line or end of file.
pub fn extract_functions(text: &str) -> Vec<FunctionInfo> {
    let lines: Vec<&str> = text.lines().collect();
    let mut functions = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in &lines {
        if let Some(name) = function_start(line) {
            if let Some((name, body)) = current.take() {
                functions.push(finish_function(name, body));
            }
            current = Some((name, vec![line]));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((name, body)) = current {
        functions.push(finish_function(name, body));
    }

    functions
}

fn function_start(line: &str) -> Option<String> {
    for re in [&*FUNCTION_DECL, &*FUNCTION_EXPR] {
        if let Some(caps) = re.captures(line) {
            let name = caps
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "anonymous".to_string());
            return Some(name);
        }
    }
    None
}

fn finish_function(name: String, body: Vec<&str>) -> FunctionInfo {
    FunctionInfo {
        name,
        line_count: body.len(),
        body: body.join("\n"),
    }
}

/// Extract classes by line scan, keyed on `^class NAME`.
pub fn extract_classes(text: &str) -> Vec<ClassInfo> {
    let mut classes: Vec<(String, Vec<&str>)> = Vec::new();

    for line in text.lines() {
        if let Some(caps) = CLASS_DECL.captures(line) {
            let name = caps
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "anonymous".to_string());
            classes.push((name, vec![line]));
        } else if let Some((_, body)) = classes.last_mut() {
            body.push(line);
        }
    }

    classes
        .into_iter()
        .map(|(name, body)| ClassInfo {
            name,
            body: body.join("\n"),
        })
        .collect()
}

/// Find pairs of non-overlapping windows with byte-identical joined text and
/// report the earlier window's bounds, one report per distinct earlier window.
///
/// O(n^2) in line count by design; acceptable for the file sizes this tool
/// inspects.
pub fn find_duplicate_windows(text: &str, window: usize) -> Vec<DuplicateWindow> {
    let lines: Vec<&str> = text.lines().collect();
    if window == 0 || lines.len() < window * 2 {
        return Vec::new();
    }

    let mut duplicates = Vec::new();
    for i in 0..=(lines.len() - window) {
        let earlier = lines[i..i + window].join("\n");
        for j in (i + window)..=(lines.len() - window) {
            if earlier == lines[j..j + window].join("\n") {
                duplicates.push(DuplicateWindow {
                    start_line: i + 1,
                    end_line: i + window,
                });
                break;
            }
        }
    }
    duplicates
}

/// Flag declarations whose names break the expected convention: camelCase for
/// `const`/`let`/`var` and `function`, PascalCase for `class`. One finding per
/// violating line, 1-based line numbers.
pub fn check_naming(text: &str) -> Vec<String> {
    let mut findings = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;

        if let Some(name) = VAR_NAME.captures(line).and_then(|c| c.get(1)) {
            if !CAMEL_CASE.is_match(name.as_str()) {
                findings.push(format!(
                    "Line {line_no}: variable '{}' should be camelCase",
                    name.as_str()
                ));
                continue;
            }
        }
        if let Some(name) = FUNC_NAME.captures(line).and_then(|c| c.get(1)) {
            if !CAMEL_CASE.is_match(name.as_str()) {
                findings.push(format!(
                    "Line {line_no}: function '{}' should be camelCase",
                    name.as_str()
                ));
                continue;
            }
        }
        if let Some(name) = CLASS_NAME.captures(line).and_then(|c| c.get(1)) {
            if !PASCAL_CASE.is_match(name.as_str()) {
                findings.push(format!(
                    "Line {line_no}: class '{}' should be PascalCase",
                    name.as_str()
                ));
            }
        }
    }

    findings
}

/// Collect raw import lines, order preserved.
pub fn extract_imports(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.trim_start().starts_with("import"))
        .map(|line| line.to_string())
        .collect()
}

/// Subset of `imports` whose resolved binding (or module name, for bare
/// imports) does not occur anywhere outside the import lines.
pub fn find_unused_imports(text: &str, imports: &[String]) -> Vec<String> {
    let rest: String = text
        .lines()
        .filter(|line| !line.trim_start().starts_with("import"))
        .collect::<Vec<_>>()
        .join("\n");

    imports
        .iter()
        .filter(|import| {
            let names = import_bindings(import);
            !names.iter().any(|name| rest.contains(name.as_str()))
        })
        .cloned()
        .collect()
}

/// Resolve the names an import line introduces. Falls back to the quoted
/// module name for side-effect imports.
fn import_bindings(import: &str) -> Vec<String> {
    if let Some(caps) = IMPORT_BINDINGS.captures(import) {
        if let Some(ns) = caps.get(1) {
            return vec![ns.as_str().to_string()];
        }
        if let Some(named) = caps.get(2) {
            return named
                .as_str()
                .split(',')
                .filter_map(|part| {
                    // "orig as alias" binds the alias
                    part.split_whitespace().last().map(str::to_string)
                })
                .filter(|n| !n.is_empty())
                .collect();
        }
        if let Some(default) = caps.get(3) {
            return vec![default.as_str().to_string()];
        }
    }
    IMPORT_MODULE
        .captures(import)
        .and_then(|c| c.get(1))
        .map(|m| vec![m.as_str().to_string()])
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics() {
        let stats = statistics("a\n\nb\n  \nc");
        assert_eq!(stats.total_lines, 5);
        assert_eq!(stats.non_empty_lines, 3);
    }

    #[test]
    fn test_statistics_empty() {
        let stats = statistics("");
        assert_eq!(stats.total_lines, 0);
        assert_eq!(stats.non_empty_lines, 0);
    }

    #[test]
    fn test_complexity_empty_is_one() {
        assert_eq!(complexity(""), 1);
    }

    #[test]
    fn test_complexity_one_increment_per_line() {
        assert_eq!(complexity("if (x) {}\nelse {}\n"), 3);
    }

    #[test]
    fn test_complexity_combined_tokens_count_once() {
        // "if" and "&&" on one line still increment once
        assert_eq!(complexity("if (a && b) {}"), 2);
    }

    #[test]
    fn test_complexity_plain_code() {
        assert_eq!(complexity("const x = 1;\nreturn x;\n"), 1);
    }

    #[test]
    fn test_extract_functions_boundaries() {
        let text = "function first() {\n  return 1;\n}\nfunction second() {\n  return 2;\n}";
        let functions = extract_functions(text);
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].name, "first");
        // Line scan: body runs until the next signature, closing brace included
        assert_eq!(functions[0].line_count, 3);
        assert_eq!(functions[1].name, "second");
        assert_eq!(functions[1].line_count, 3);
    }

    #[test]
    fn test_extract_functions_expression_form() {
        let functions = extract_functions("handler = function(e) {\n  return e;\n}");
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].name, "handler");
    }

    #[test]
    fn test_extract_functions_async_and_anonymous() {
        let functions = extract_functions("async function () {\n  await go();\n}");
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].name, "anonymous");
    }

    #[test]
    fn test_extract_classes() {
        let classes = extract_classes("class Widget {\n  render() {}\n}\nclass Panel {}");
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].name, "Widget");
        assert_eq!(classes[1].name, "Panel");
    }

    #[test]
    fn test_duplicate_windows_exact_pair() {
        let block = "a\nb\nc\nd\ne";
        let text = format!("{block}\n{block}");
        let duplicates = find_duplicate_windows(&text, 5);
        assert_eq!(
            duplicates,
            vec![DuplicateWindow {
                start_line: 1,
                end_line: 5
            }]
        );
    }

    #[test]
    fn test_duplicate_windows_none_in_short_text() {
        assert!(find_duplicate_windows("a\nb\nc", 5).is_empty());
    }

    #[test]
    fn test_duplicate_windows_no_duplicates() {
        let text = (0..12).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        assert!(find_duplicate_windows(&text, 5).is_empty());
    }

    #[test]
    fn test_check_naming_variable() {
        let findings = check_naming("const My_var = 1;\nconst good = 2;");
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("Line 1"));
        assert!(findings[0].contains("My_var"));
    }

    #[test]
    fn test_check_naming_class() {
        let findings = check_naming("class widget {}");
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contains("PascalCase"));
    }

    #[test]
    fn test_check_naming_one_finding_per_line() {
        let findings = check_naming("const Bad_one = function Bad_two() {};");
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_extract_imports_order_preserved() {
        let text = "import a from 'a';\nconst x = 1;\nimport b from 'b';\nimport c from 'c';";
        let imports = extract_imports(text);
        assert_eq!(imports.len(), 3);
        assert!(imports[0].contains("'a'"));
        assert!(imports[1].contains("'b'"));
        assert!(imports[2].contains("'c'"));
    }

    #[test]
    fn test_find_unused_imports() {
        let text = "import used from 'used';\nimport unused from 'unused';\nused();\n";
        let imports = extract_imports(text);
        let unused = find_unused_imports(text, &imports);
        assert_eq!(unused.len(), 1);
        assert!(unused[0].contains("unused"));
    }

    #[test]
    fn test_find_unused_imports_named_bindings() {
        let text = "import { alpha, beta } from 'mod';\nalpha();\n";
        let imports = extract_imports(text);
        // beta is unused but alpha is used, so the line counts as used
        assert!(find_unused_imports(text, &imports).is_empty());
    }

    #[test]
    fn test_import_bindings_namespace_and_alias() {
        assert_eq!(import_bindings("import * as fs from 'fs';"), vec!["fs"]);
        assert_eq!(
            import_bindings("import { join as pathJoin } from 'path';"),
            vec!["pathJoin"]
        );
    }
}
