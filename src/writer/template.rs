//! Template scanning
//!
//! Placeholders: `#T` takes the next positional argument, `#{name}` a named
//! one, and `##` is a literal `#`. A `#` followed by anything else is left
//! alone, so attributes like `#[derive(Debug)]` need no escaping.

use logos::Logos;

use crate::error::CodegenError;

use super::TemplateArg;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    #[token("##")]
    Hash,
    #[token("#T")]
    Positional,
    #[regex(r"#\{[^}]*\}")]
    Named,
    #[regex(r"#\{[^}]*")]
    Unterminated,
    #[token("#")]
    Pound,
    #[regex(r"[^#]+")]
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'t> {
    Literal(&'t str),
    Hash,
    Positional,
    Named(&'t str),
}

/// Split one template line into literal text and placeholders
pub(crate) fn segments(line: &str) -> Result<Vec<Segment<'_>>, CodegenError> {
    let mut out = Vec::new();

    for (token, span) in Token::lexer(line).spanned() {
        let slice = &line[span];
        let segment = match token {
            Ok(Token::Hash) => Segment::Hash,
            Ok(Token::Positional) => Segment::Positional,
            Ok(Token::Named) => {
                let name = &slice[2..slice.len() - 1];
                if name.is_empty() {
                    return Err(CodegenError::template(format!("empty placeholder in `{}`", line)));
                }
                Segment::Named(name)
            }
            Ok(Token::Unterminated) => {
                return Err(CodegenError::template(format!(
                    "unterminated placeholder in `{}`",
                    line
                )))
            }
            Ok(Token::Pound) | Ok(Token::Literal) => Segment::Literal(slice),
            Err(()) => {
                return Err(CodegenError::template(format!(
                    "unreadable template text `{}` in `{}`",
                    slice, line
                )))
            }
        };
        out.push(segment);
    }
    Ok(out)
}

/// Strip surrounding blank lines and the common indentation
///
/// Whitespace-only lines come back empty.
pub(crate) fn dedent(template: &str) -> Vec<&str> {
    let lines: Vec<&str> = template.lines().collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    let (first, last) = match (first, last) {
        (Some(f), Some(l)) => (f, l),
        _ => return Vec::new(),
    };
    let body = &lines[first..=last];

    let margin = body
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    body.iter()
        .map(|l| {
            if l.trim().is_empty() {
                ""
            } else {
                l[margin..].trim_end()
            }
        })
        .collect()
}

/// Arguments of one template invocation
pub(crate) enum Args<'x, 'a> {
    Positional {
        args: &'x [TemplateArg<'a>],
        next: usize,
    },
    Named {
        args: &'x [(&'x str, TemplateArg<'a>)],
        used: Vec<bool>,
    },
}

impl<'x, 'a> Args<'x, 'a> {
    pub(crate) fn positional(args: &'x [TemplateArg<'a>]) -> Self {
        Args::Positional { args, next: 0 }
    }

    pub(crate) fn named(args: &'x [(&'x str, TemplateArg<'a>)]) -> Self {
        Args::Named {
            args,
            used: vec![false; args.len()],
        }
    }

    pub(crate) fn next_positional(&mut self) -> Result<&'x TemplateArg<'a>, CodegenError> {
        match self {
            Args::Positional { args, next } => {
                let args: &'x [TemplateArg<'a>] = *args;
                let arg = args.get(*next).ok_or_else(|| {
                    CodegenError::template(format!(
                        "template expects more than {} positional argument(s)",
                        args.len()
                    ))
                })?;
                *next += 1;
                Ok(arg)
            }
            Args::Named { .. } => Err(CodegenError::template(
                "positional placeholder `#T` in a template with named arguments",
            )),
        }
    }

    pub(crate) fn lookup(&mut self, name: &str) -> Result<&'x TemplateArg<'a>, CodegenError> {
        match self {
            Args::Named { args, used } => {
                let args: &'x [(&'x str, TemplateArg<'a>)] = *args;
                let index = args
                    .iter()
                    .position(|(n, _)| *n == name)
                    .ok_or_else(|| CodegenError::template(format!("no argument named `{}`", name)))?;
                used[index] = true;
                Ok(&args[index].1)
            }
            Args::Positional { .. } => Err(CodegenError::template(format!(
                "named placeholder `#{{{}}}` in a template with positional arguments",
                name
            ))),
        }
    }

    /// Every argument must have been consumed
    pub(crate) fn finish(&self) -> Result<(), CodegenError> {
        match self {
            Args::Positional { args, next } if *next < args.len() => Err(CodegenError::template(
                format!("{} positional argument(s) unused", args.len() - next),
            )),
            Args::Named { args, used } => {
                let unused: Vec<&str> = args
                    .iter()
                    .zip(used)
                    .filter(|(_, u)| !**u)
                    .map(|((n, _), _)| *n)
                    .collect();
                if unused.is_empty() {
                    Ok(())
                } else {
                    Err(CodegenError::template(format!(
                        "unused named argument(s): {}",
                        unused.join(", ")
                    )))
                }
            }
            Args::Positional { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_segments() {
        let segs = segments("let x: #T = #{Default}::default(); // ##1").unwrap();
        assert_eq!(
            segs,
            vec![
                Segment::Literal("let x: "),
                Segment::Positional,
                Segment::Literal(" = "),
                Segment::Named("Default"),
                Segment::Literal("::default(); // "),
                Segment::Hash,
                Segment::Literal("1"),
            ]
        );
    }

    #[test]
    fn test_attribute_is_literal() {
        let segs = segments("#[derive(Debug)]").unwrap();
        assert_eq!(segs, vec![Segment::Literal("#"), Segment::Literal("[derive(Debug)]")]);
    }

    #[test]
    fn test_unterminated_placeholder() {
        assert!(segments("#{oops").is_err());
        assert!(segments("#{}").is_err());
    }

    #[test]
    fn test_dedent() {
        let lines = dedent(
            "
            fn a() {
                b();

            }
            ",
        );
        assert_eq!(lines, vec!["fn a() {", "    b();", "", "}"]);
    }

    #[test]
    fn test_dedent_blank() {
        assert!(dedent("   \n  \n").is_empty());
    }

    #[test]
    fn test_dedent_keeps_unicode_whitespace() {
        let lines = dedent("\u{2003}a\n  \u{2003}b");
        assert_eq!(lines, vec!["\u{2003}a", "  \u{2003}b"]);

        let lines = dedent("    x\n    \u{2003}y");
        assert_eq!(lines, vec!["x", "\u{2003}y"]);
    }

    #[test]
    fn test_unicode_literal_runs() {
        let segs = segments("// café #T").unwrap();
        assert_eq!(segs, vec![Segment::Literal("// café "), Segment::Positional]);
    }
}
