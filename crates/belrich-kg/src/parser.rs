//! A small BEL term and statement parser.
//!
//! Handles the subset of BEL 2 that curation sheets contain: abundance
//! functions with namespaced concepts (optionally `NS:id ! name`), variants
//! (`pmod`, `var`, `frag`, `gmod`), list abundances, reactions and the
//! `act`/`deg`/`tloc`/`sec`/`surf` modifiers. Nested statements are rejected.
//!
//! The chumsky grammar only builds an untyped call tree; BEL functions,
//! variants and modifiers are resolved from that tree afterwards.

use belrich_common::{BelrichError, Result};
use chumsky::extra;
use chumsky::prelude::*;

use crate::model::{quote_if_needed, BelNode, BelTerm, Function, Modifier, Relation, Variant};

/// A parsed `subject relation object` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BelStatement {
    pub subject: BelTerm,
    pub relation: Relation,
    pub object: BelTerm,
}

/// Parse a full BEL statement.
pub fn parse_statement(line: &str) -> Result<BelStatement> {
    let (subject, (relation, rel_pos), object) = statement()
        .parse(line)
        .into_result()
        .map_err(|errs| syntax_error(line, errs))?;

    let relation = Relation::parse(&relation)
        .ok_or_else(|| syntax(line, rel_pos, format!("unknown relation `{relation}`")))?;

    Ok(BelStatement {
        subject: term_from_expr(&subject, line)?,
        relation,
        object: term_from_expr(&object, line)?,
    })
}

/// Parse a single BEL term, possibly wrapped in a modifier.
pub fn parse_term(text: &str) -> Result<BelTerm> {
    let expr = expr()
        .padded()
        .then_ignore(end())
        .parse(text)
        .into_result()
        .map_err(|errs| syntax_error(text, errs))?;
    term_from_expr(&expr, text)
}

// ── Expression layer ────────────────────────────────────────────────────────

type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Positions are byte offsets into the parsed line.
#[derive(Debug, Clone)]
enum Expr {
    Call {
        name: String,
        args: Vec<Expr>,
        pos: usize,
    },
    Value {
        namespace: Option<String>,
        name: String,
        identifier: Option<String>,
        pos: usize,
    },
}

impl Expr {
    fn pos(&self) -> usize {
        match self {
            Expr::Call { pos, .. } | Expr::Value { pos, .. } => *pos,
        }
    }

    /// Render a call argument back to BEL.
    fn render(&self) -> String {
        match self {
            Expr::Call { name, args, .. } => {
                let args: Vec<String> = args.iter().map(Expr::render).collect();
                format!("{}({})", name, args.join(", "))
            }
            Expr::Value { namespace, name, identifier, .. } => {
                let name = quote_if_needed(name);
                match (namespace, identifier) {
                    (Some(ns), Some(id)) => format!("{}:{} ! {}", ns, quote_if_needed(id), name),
                    (Some(ns), None) => format!("{ns}:{name}"),
                    _ => name.into_owned(),
                }
            }
        }
    }
}

/// An unquoted name: anything up to whitespace or BEL punctuation.
fn bare<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    any()
        .filter(|c: &char| !c.is_whitespace() && !matches!(c, ',' | '(' | ')' | '"' | ':' | '!'))
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| s.to_string())
        .labelled("name")
}

/// A double-quoted string with backslash escapes.
fn quoted<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    just('"')
        .ignore_then(
            just('\\')
                .ignore_then(any())
                .or(none_of("\\\""))
                .repeated()
                .collect::<String>(),
        )
        .then_ignore(just('"'))
        .labelled("quoted string")
}

fn token<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    quoted().or(bare())
}

/// A function call, a `NS:value [! name]` concept or a plain value.
fn expr<'src>() -> impl Parser<'src, &'src str, Expr, Extra<'src>> + Clone {
    recursive(|expr| {
        let call = bare()
            .then(
                expr.padded()
                    .separated_by(just(','))
                    .collect::<Vec<_>>()
                    .delimited_by(just('('), just(')')),
            )
            .map_with(|(name, args), e| Expr::Call {
                name,
                args,
                pos: e.span().start,
            })
            .labelled("BEL function");

        let concept = bare()
            .then_ignore(just(':'))
            .then(token().padded())
            .then(just('!').ignore_then(token().padded()).or_not())
            .map_with(|((namespace, value), name), e| {
                let pos = e.span().start;
                match name {
                    Some(name) => Expr::Value {
                        namespace: Some(namespace),
                        name,
                        identifier: Some(value),
                        pos,
                    },
                    None => Expr::Value {
                        namespace: Some(namespace),
                        name: value,
                        identifier: None,
                        pos,
                    },
                }
            })
            .labelled("namespaced concept");

        let plain = token().map_with(|name, e| Expr::Value {
            namespace: None,
            name,
            identifier: None,
            pos: e.span().start,
        });

        choice((call, concept, plain))
    })
}

/// A relation is any run of non-whitespace; it is resolved after parsing.
fn relation_word<'src>() -> impl Parser<'src, &'src str, (String, usize), Extra<'src>> + Clone {
    any::<&'src str, Extra<'src>>()
        .filter(|c: &char| !c.is_whitespace())
        .repeated()
        .at_least(1)
        .to_slice()
        .map_with(|s: &str, e| (s.to_string(), e.span().start))
        .labelled("relation")
}

/// `subject relation object`. A parenthesized object (a nested statement)
/// does not parse as a term and is rejected here.
fn statement<'src>() -> impl Parser<'src, &'src str, (Expr, (String, usize), Expr), Extra<'src>> {
    expr()
        .padded()
        .then(relation_word())
        .then(expr().padded())
        .then_ignore(end())
        .map(|((subject, relation), object)| (subject, relation, object))
}

fn syntax_error(line: &str, errors: Vec<Rich<'_, char>>) -> BelrichError {
    let Some(error) = errors.into_iter().next() else {
        return syntax(line, 0, "invalid BEL");
    };
    let found = error
        .found()
        .map_or_else(|| "end of input".to_string(), |c| format!("`{c}`"));
    syntax(line, error.span().start, format!("{} (found {found})", error.reason()))
}

// ── Interpretation ──────────────────────────────────────────────────────────

fn term_from_expr(expr: &Expr, line: &str) -> Result<BelTerm> {
    let Expr::Call { name, args, pos } = expr else {
        return node_from_expr(expr, line).map(BelTerm::new);
    };

    let modifier = match name.as_str() {
        "act" | "activity" => {
            let effect = match args.get(1) {
                Some(Expr::Call { name, args: inner, .. })
                    if name == "ma" || name == "molecularActivity" =>
                {
                    inner.first().map(Expr::render)
                }
                Some(other) => return Err(syntax(line, other.pos(), "expected ma(...)")),
                None => None,
            };
            Modifier::Activity(effect)
        }
        "deg" | "degradation" => Modifier::Degradation,
        "sec" | "cellSecretion" => Modifier::Secretion,
        "surf" | "cellSurfaceExpression" => Modifier::SurfaceExpression,
        "tloc" | "translocation" => {
            let location = |i: usize| -> Result<String> {
                match args.get(i) {
                    Some(Expr::Call { args: inner, .. }) => inner
                        .first()
                        .map(Expr::render)
                        .ok_or_else(|| syntax(line, *pos, "empty location")),
                    Some(value) => Ok(value.render()),
                    None => Err(syntax(line, *pos, "translocation needs fromLoc and toLoc")),
                }
            };
            Modifier::Translocation { from: location(1)?, to: location(2)? }
        }
        _ => return node_from_expr(expr, line).map(BelTerm::new),
    };

    let inner = args
        .first()
        .ok_or_else(|| syntax(line, *pos, format!("`{name}` needs an abundance")))?;
    let node = node_from_expr(inner, line)?;
    Ok(BelTerm::with_modifier(node, Some(modifier)))
}

fn node_from_expr(expr: &Expr, line: &str) -> Result<BelNode> {
    let (name, args, pos) = match expr {
        Expr::Call { name, args, pos } => (name, args, *pos),
        Expr::Value { pos, .. } => return Err(syntax(line, *pos, "expected a BEL function")),
    };

    let function = Function::from_name(name)
        .ok_or_else(|| syntax(line, pos, format!("unknown function `{name}`")))?;

    match function {
        Function::Reaction => {
            let mut reactants = Vec::new();
            let mut products = Vec::new();
            for arg in args {
                match arg {
                    Expr::Call { name, args: inner, .. } if name == "reactants" => {
                        for e in inner {
                            reactants.push(node_from_expr(e, line)?);
                        }
                    }
                    Expr::Call { name, args: inner, .. } if name == "products" => {
                        for e in inner {
                            products.push(node_from_expr(e, line)?);
                        }
                    }
                    other => return Err(syntax(line, other.pos(), "expected reactants(...) or products(...)")),
                }
            }
            Ok(BelNode::reaction(reactants, products))
        }
        Function::Complex | Function::Composite if matches!(args.first(), Some(Expr::Call { .. })) => {
            let members = args
                .iter()
                .map(|e| node_from_expr(e, line))
                .collect::<Result<Vec<_>>>()?;
            Ok(BelNode::list(function, members))
        }
        _ => {
            let Some(Expr::Value { namespace: Some(ns), name, identifier, .. }) = args.first() else {
                return Err(syntax(line, pos, "expected a namespaced concept"));
            };
            let mut node = BelNode::new(function, ns.clone(), name.clone());
            node.identifier = identifier.clone();

            let mut variants = Vec::new();
            for arg in &args[1..] {
                match arg {
                    Expr::Call { name, args: inner, .. } => match name.as_str() {
                        "pmod" | "proteinModification" => {
                            let rendered: Vec<String> = inner.iter().map(Expr::render).collect();
                            variants.push(Variant::raw(format!("pmod({})", rendered.join(", "))));
                        }
                        "var" | "variant" => {
                            let hgvs = inner.first().map(value_text).unwrap_or_default();
                            variants.push(Variant::hgvs(&hgvs));
                        }
                        "frag" | "fragment" | "gmod" | "geneModification" | "fus" | "fusion" => {
                            variants.push(Variant::raw(arg.render()));
                        }
                        // Locations are edge context, not node identity.
                        "loc" | "location" => {}
                        other => {
                            return Err(syntax(line, arg.pos(), format!("unknown variant `{other}`")));
                        }
                    },
                    Expr::Value { pos, .. } => {
                        return Err(syntax(line, *pos, "unexpected value after concept"));
                    }
                }
            }
            Ok(node.with_variants(variants))
        }
    }
}

fn value_text(expr: &Expr) -> String {
    match expr {
        Expr::Value { name, .. } => name.clone(),
        other => other.render(),
    }
}

fn syntax(line: &str, position: usize, message: impl Into<String>) -> BelrichError {
    BelrichError::bel_syntax(line, position, message)
}
