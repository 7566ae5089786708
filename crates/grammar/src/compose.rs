// Copyright (c) 2025 sqlgen contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Grammar composition
//!
//! A [`Grammar`] is the per-session, immutable description of what the parser
//! accepts for one dialect. It is built by folding the dialect's extends
//! chain from the ANSI base outward: each layer installs its keywords, rules,
//! operators and placeholder styles into a [`GrammarBuilder`], and a rule
//! redefinition in a descendant **replaces** the ancestor's definition while
//! purely additive rules are appended.
//!
//! The composed grammar is an explicit value passed to the parser by
//! reference. There is no process-global parser singleton and no reset
//! protocol: two sessions with different dialects can coexist in one process
//! because each owns its own `Grammar`.

use crate::token::PlaceholderStyle;
use sqlgen_ir::{BinaryOp, Dialect};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Identifies a grammar rule that dialect layers can install or override
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum RuleId {
    /// WITH clauses (common table expressions)
    CteClause,
    /// LIMIT / OFFSET on SELECT
    LimitClause,
    /// `INSERT ... ON CONFLICT [(cols)] DO ...`
    UpsertOnConflict,
    /// `INSERT ... ON DUPLICATE KEY UPDATE ...`
    UpsertOnDuplicateKey,
    /// `OVER (...)` window invocations
    WindowClause,
    /// `RETURNING` on INSERT/UPDATE/DELETE
    ReturningClause,
    /// `NULLS FIRST` / `NULLS LAST` in ORDER BY
    NullsOrdering,
    /// `UPDATE ... FROM`
    UpdateFrom,
    /// `ALTER TABLE ... RENAME COLUMN`
    AlterRenameColumn,
    /// `ALTER TABLE ... DROP COLUMN`
    AlterDropColumn,
    /// JSON path operators `->` / `->>` in expressions
    JsonPathOperators,
}

/// Definition of a rule: a later layer installing the same [`RuleId`]
/// replaces the earlier definition outright
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleDef {
    Enabled,
    /// A descendant may retract an ancestor rule
    Disabled,
}

/// An infix operator entry in the composed operator table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatorDef {
    /// Token sigil (`"+"`, `"->"`) or uppercased word (`"AND"`, `"LIKE"`)
    pub sigil: &'static str,
    pub op: BinaryOp,
    /// Binding power; higher binds tighter
    pub precedence: u8,
}

/// Mutable accumulator for one dialect layer at a time
#[derive(Debug, Default)]
pub struct GrammarBuilder {
    keywords: HashSet<String>,
    rules: BTreeMap<RuleId, RuleDef>,
    operators: Vec<OperatorDef>,
    placeholders: BTreeSet<PlaceholderStyle>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add reserved words (idempotent)
    pub fn add_keywords(&mut self, words: &[&str]) -> &mut Self {
        for w in words {
            self.keywords.insert(w.to_ascii_uppercase());
        }
        self
    }

    /// Install a rule, replacing any ancestor definition of the same rule
    pub fn install_rule(&mut self, id: RuleId, def: RuleDef) -> &mut Self {
        self.rules.insert(id, def);
        self
    }

    /// Install an infix operator, replacing any ancestor entry with the same
    /// sigil
    pub fn install_operator(&mut self, def: OperatorDef) -> &mut Self {
        if let Some(existing) = self.operators.iter_mut().find(|o| o.sigil == def.sigil) {
            *existing = def;
        } else {
            self.operators.push(def);
        }
        self
    }

    /// Allow a placeholder style
    pub fn add_placeholder(&mut self, style: PlaceholderStyle) -> &mut Self {
        self.placeholders.insert(style);
        self
    }

    fn finish(self, dialect: Dialect) -> Grammar {
        Grammar {
            dialect,
            keywords: self.keywords,
            rules: self.rules,
            operators: self.operators,
            placeholders: self.placeholders,
        }
    }
}

/// The composed, immutable grammar for one dialect
#[derive(Debug, Clone)]
pub struct Grammar {
    dialect: Dialect,
    keywords: HashSet<String>,
    rules: BTreeMap<RuleId, RuleDef>,
    operators: Vec<OperatorDef>,
    placeholders: BTreeSet<PlaceholderStyle>,
}

impl Grammar {
    /// Compose the grammar for `dialect` by folding its extends chain from
    /// the ANSI base outward
    pub fn compose(dialect: Dialect) -> Grammar {
        let mut builder = GrammarBuilder::new();
        let chain: Vec<Dialect> = dialect.chain().collect();
        for layer in chain.into_iter().rev() {
            install_layer(&mut builder, layer);
        }
        builder.finish(dialect)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Whether `word` (any case) is a reserved word under this grammar
    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(&word.to_ascii_uppercase())
    }

    /// Whether a rule is installed and enabled
    pub fn supports(&self, id: RuleId) -> bool {
        matches!(self.rules.get(&id), Some(RuleDef::Enabled))
    }

    /// Look up an infix operator by sigil or uppercased word
    pub fn operator(&self, sigil: &str) -> Option<&OperatorDef> {
        self.operators.iter().find(|o| o.sigil == sigil)
    }

    /// Whether a placeholder style is legal under this grammar
    pub fn allows_placeholder(&self, style: PlaceholderStyle) -> bool {
        self.placeholders.contains(&style)
    }

    /// Installed rules, for monotonic-extension checks
    pub fn rules(&self) -> &BTreeMap<RuleId, RuleDef> {
        &self.rules
    }
}

/// Install one dialect layer into the builder.
///
/// Only the layer's own additions/overrides appear here; ancestor rules are
/// already installed because composition folds the chain base-first.
fn install_layer(builder: &mut GrammarBuilder, layer: Dialect) {
    use sqlgen_ir::SqliteVersion as V;
    match layer {
        Dialect::Ansi => install_ansi(builder),
        Dialect::Sqlite(V::V3_18) => {
            builder
                .add_keywords(&["GLOB", "REGEXP", "ROWID", "WITHOUT"])
                .add_placeholder(PlaceholderStyle::QuestionNumbered);
        }
        Dialect::Sqlite(V::V3_24) => {
            builder
                .add_keywords(&["CONFLICT", "DO", "NOTHING"])
                .install_rule(RuleId::UpsertOnConflict, RuleDef::Enabled);
        }
        Dialect::Sqlite(V::V3_25) => {
            builder
                .add_keywords(&["OVER", "PARTITION", "WINDOW", "FILTER"])
                .install_rule(RuleId::WindowClause, RuleDef::Enabled)
                .install_rule(RuleId::AlterRenameColumn, RuleDef::Enabled);
        }
        Dialect::Sqlite(V::V3_30) => {
            builder
                .add_keywords(&["NULLS", "FIRST", "LAST"])
                .install_rule(RuleId::NullsOrdering, RuleDef::Enabled);
        }
        Dialect::Sqlite(V::V3_33) => {
            builder.install_rule(RuleId::UpdateFrom, RuleDef::Enabled);
        }
        Dialect::Sqlite(V::V3_35) => {
            builder
                .add_keywords(&["RETURNING"])
                .install_rule(RuleId::ReturningClause, RuleDef::Enabled)
                .install_rule(RuleId::AlterDropColumn, RuleDef::Enabled);
        }
        Dialect::Sqlite(V::V3_38) => {
            builder
                .install_rule(RuleId::JsonPathOperators, RuleDef::Enabled)
                .install_operator(OperatorDef {
                    sigil: "->",
                    op: BinaryOp::JsonExtract,
                    precedence: 8,
                })
                .install_operator(OperatorDef {
                    sigil: "->>",
                    op: BinaryOp::JsonExtractText,
                    precedence: 8,
                });
        }
        Dialect::MySql => {
            builder
                .add_keywords(&["DUPLICATE", "OVER", "PARTITION", "WINDOW", "STRAIGHT_JOIN"])
                .install_rule(RuleId::UpsertOnDuplicateKey, RuleDef::Enabled)
                .install_rule(RuleId::WindowClause, RuleDef::Enabled)
                .install_rule(RuleId::AlterRenameColumn, RuleDef::Enabled)
                .install_rule(RuleId::AlterDropColumn, RuleDef::Enabled)
                .install_rule(RuleId::JsonPathOperators, RuleDef::Enabled)
                .install_operator(OperatorDef {
                    sigil: "->",
                    op: BinaryOp::JsonExtract,
                    precedence: 8,
                })
                .install_operator(OperatorDef {
                    sigil: "->>",
                    op: BinaryOp::JsonExtractText,
                    precedence: 8,
                });
        }
        Dialect::PostgreSql => {
            builder
                .add_keywords(&[
                    "CONFLICT", "DO", "NOTHING", "RETURNING", "OVER", "PARTITION", "WINDOW",
                    "NULLS", "FIRST", "LAST", "ILIKE", "LATERAL",
                ])
                .add_placeholder(PlaceholderStyle::DollarNumbered)
                .install_rule(RuleId::UpsertOnConflict, RuleDef::Enabled)
                .install_rule(RuleId::WindowClause, RuleDef::Enabled)
                .install_rule(RuleId::ReturningClause, RuleDef::Enabled)
                .install_rule(RuleId::NullsOrdering, RuleDef::Enabled)
                .install_rule(RuleId::UpdateFrom, RuleDef::Enabled)
                .install_rule(RuleId::AlterRenameColumn, RuleDef::Enabled)
                .install_rule(RuleId::AlterDropColumn, RuleDef::Enabled)
                .install_rule(RuleId::JsonPathOperators, RuleDef::Enabled)
                .install_operator(OperatorDef {
                    sigil: "->",
                    op: BinaryOp::JsonExtract,
                    precedence: 8,
                })
                .install_operator(OperatorDef {
                    sigil: "->>",
                    op: BinaryOp::JsonExtractText,
                    precedence: 8,
                });
        }
        Dialect::Hsql => {
            builder
                .add_keywords(&["OVER", "PARTITION", "WINDOW", "NULLS", "FIRST", "LAST"])
                .install_rule(RuleId::WindowClause, RuleDef::Enabled)
                .install_rule(RuleId::NullsOrdering, RuleDef::Enabled)
                .install_rule(RuleId::AlterRenameColumn, RuleDef::Enabled)
                .install_rule(RuleId::AlterDropColumn, RuleDef::Enabled);
        }
        // Dialect is non_exhaustive; unknown layers contribute nothing
        _ => {}
    }
}

fn install_ansi(builder: &mut GrammarBuilder) {
    builder.add_keywords(&[
        "ALL", "ALTER", "AND", "AS", "ASC", "BEGIN", "BETWEEN", "BY", "CASE", "CAST", "CHECK",
        "COLLATE", "COLUMN", "CONSTRAINT", "CREATE", "CROSS", "CURRENT_DATE", "CURRENT_TIME",
        "CURRENT_TIMESTAMP", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "EACH", "ELSE",
        "END", "EXCEPT", "EXISTS", "FALSE", "FOR", "FOREIGN", "FROM", "FULL", "GROUP", "HAVING",
        "IF", "IN", "INDEX", "INNER", "INSERT", "INTERSECT", "INTO", "IS", "JOIN", "KEY", "LEFT",
        "LIKE", "LIMIT", "NATURAL", "NOT", "NULL", "OF", "OFFSET", "ON", "OR", "ORDER", "OUTER",
        "PRIMARY", "REFERENCES", "RIGHT", "ROW", "SELECT", "SET", "TABLE", "THEN", "TRIGGER",
        "TRUE", "UNION", "UNIQUE", "UPDATE", "USING", "VALUES", "VIEW", "WHEN", "WHERE", "WITH",
        "RECURSIVE", "BEFORE", "AFTER", "TO", "RENAME", "ADD",
    ]);
    builder
        .add_placeholder(PlaceholderStyle::Question)
        .add_placeholder(PlaceholderStyle::ColonNamed)
        .add_placeholder(PlaceholderStyle::AtNamed);
    builder
        .install_rule(RuleId::CteClause, RuleDef::Enabled)
        .install_rule(RuleId::LimitClause, RuleDef::Enabled);
    for def in [
        OperatorDef {
            sigil: "*",
            op: BinaryOp::Mul,
            precedence: 7,
        },
        OperatorDef {
            sigil: "/",
            op: BinaryOp::Div,
            precedence: 7,
        },
        OperatorDef {
            sigil: "%",
            op: BinaryOp::Mod,
            precedence: 7,
        },
        OperatorDef {
            sigil: "+",
            op: BinaryOp::Add,
            precedence: 6,
        },
        OperatorDef {
            sigil: "-",
            op: BinaryOp::Sub,
            precedence: 6,
        },
        OperatorDef {
            sigil: "||",
            op: BinaryOp::Concat,
            precedence: 5,
        },
        OperatorDef {
            sigil: "<",
            op: BinaryOp::Lt,
            precedence: 4,
        },
        OperatorDef {
            sigil: "<=",
            op: BinaryOp::LtEq,
            precedence: 4,
        },
        OperatorDef {
            sigil: ">",
            op: BinaryOp::Gt,
            precedence: 4,
        },
        OperatorDef {
            sigil: ">=",
            op: BinaryOp::GtEq,
            precedence: 4,
        },
        OperatorDef {
            sigil: "=",
            op: BinaryOp::Eq,
            precedence: 3,
        },
        OperatorDef {
            sigil: "<>",
            op: BinaryOp::NotEq,
            precedence: 3,
        },
        OperatorDef {
            sigil: "LIKE",
            op: BinaryOp::Like,
            precedence: 3,
        },
        OperatorDef {
            sigil: "AND",
            op: BinaryOp::And,
            precedence: 2,
        },
        OperatorDef {
            sigil: "OR",
            op: BinaryOp::Or,
            precedence: 1,
        },
    ] {
        builder.install_operator(def);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_ir::SqliteVersion;

    #[test]
    fn test_descendant_grammar_is_superset_of_parent() {
        // Monotonic extension: every rule enabled in the parent stays enabled
        // in the descendant unless explicitly overridden (no dialect here
        // overrides to Disabled).
        let mut dialect = Dialect::Sqlite(SqliteVersion::V3_38);
        while let Some(parent) = dialect.parent() {
            let child_grammar = Grammar::compose(dialect);
            let parent_grammar = Grammar::compose(parent);
            for (rule, def) in parent_grammar.rules() {
                if *def == RuleDef::Enabled {
                    assert!(
                        child_grammar.supports(*rule),
                        "{dialect:?} lost rule {rule:?} present in {parent:?}"
                    );
                }
            }
            for op in &parent_grammar.operators {
                assert!(child_grammar.operator(op.sigil).is_some());
            }
            dialect = parent;
        }
    }

    #[test]
    fn test_rule_override_replaces() {
        let mut builder = GrammarBuilder::new();
        builder.install_rule(RuleId::WindowClause, RuleDef::Enabled);
        builder.install_rule(RuleId::WindowClause, RuleDef::Disabled);
        let grammar = builder.finish(Dialect::Ansi);
        assert!(!grammar.supports(RuleId::WindowClause));
    }

    #[test]
    fn test_operator_override_replaces() {
        let mut builder = GrammarBuilder::new();
        builder.install_operator(OperatorDef {
            sigil: "->",
            op: BinaryOp::Sub,
            precedence: 1,
        });
        builder.install_operator(OperatorDef {
            sigil: "->",
            op: BinaryOp::JsonExtract,
            precedence: 8,
        });
        let grammar = builder.finish(Dialect::Ansi);
        let op = grammar.operator("->").unwrap();
        assert_eq!(op.op, BinaryOp::JsonExtract);
        assert_eq!(op.precedence, 8);
    }

    #[test]
    fn test_ansi_has_no_upsert_or_json() {
        let grammar = Grammar::compose(Dialect::Ansi);
        assert!(!grammar.supports(RuleId::UpsertOnConflict));
        assert!(!grammar.supports(RuleId::JsonPathOperators));
        assert!(grammar.operator("->").is_none());
        assert!(grammar.supports(RuleId::CteClause));
    }

    #[test]
    fn test_sqlite_versions_accumulate_rules() {
        let g18 = Grammar::compose(Dialect::Sqlite(SqliteVersion::V3_18));
        let g24 = Grammar::compose(Dialect::Sqlite(SqliteVersion::V3_24));
        let g38 = Grammar::compose(Dialect::Sqlite(SqliteVersion::V3_38));

        assert!(!g18.supports(RuleId::UpsertOnConflict));
        assert!(g24.supports(RuleId::UpsertOnConflict));
        assert!(!g24.supports(RuleId::JsonPathOperators));
        assert!(g38.supports(RuleId::UpsertOnConflict));
        assert!(g38.supports(RuleId::WindowClause));
        assert!(g38.supports(RuleId::JsonPathOperators));
    }

    #[test]
    fn test_placeholder_styles_per_dialect() {
        let sqlite = Grammar::compose(Dialect::Sqlite(SqliteVersion::V3_18));
        assert!(sqlite.allows_placeholder(PlaceholderStyle::Question));
        assert!(sqlite.allows_placeholder(PlaceholderStyle::QuestionNumbered));

        let ansi = Grammar::compose(Dialect::Ansi);
        assert!(!ansi.allows_placeholder(PlaceholderStyle::QuestionNumbered));
        assert!(!ansi.allows_placeholder(PlaceholderStyle::DollarNumbered));

        let pg = Grammar::compose(Dialect::PostgreSql);
        assert!(pg.allows_placeholder(PlaceholderStyle::DollarNumbered));
    }

    #[test]
    fn test_independent_grammars_coexist() {
        // No global parser state: composing one grammar must not disturb
        // another already-composed grammar.
        let mysql = Grammar::compose(Dialect::MySql);
        let ansi = Grammar::compose(Dialect::Ansi);
        assert!(mysql.supports(RuleId::UpsertOnDuplicateKey));
        assert!(!ansi.supports(RuleId::UpsertOnDuplicateKey));
        assert_eq!(mysql.dialect(), Dialect::MySql);
        assert_eq!(ansi.dialect(), Dialect::Ansi);
    }
}
