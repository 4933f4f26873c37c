//! Search filter builder.
//!
//! Turns the optional search parameters into a list of structured
//! [`Predicate`]s plus a mechanical WHERE-clause renderer. User input is only
//! ever bound as a parameter, never spliced into SQL text.

use std::str::FromStr;

use super::dto::SearchFilters;

/// Comparison operators accepted by the numeric filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Ge,
    Le,
    Eq,
    Gt,
    Lt,
}

impl CmpOp {
    /// Splits a leading operator token off `raw`. Two-character tokens are
    /// tried first so `>=4` is not read as `>` followed by `=4`.
    fn strip(raw: &str) -> Option<(CmpOp, &str)> {
        const TOKENS: [(&str, CmpOp); 5] = [
            (">=", CmpOp::Ge),
            ("<=", CmpOp::Le),
            ("=", CmpOp::Eq),
            (">", CmpOp::Gt),
            ("<", CmpOp::Lt),
        ];
        TOKENS
            .iter()
            .find_map(|(token, op)| raw.strip_prefix(token).map(|rest| (*op, rest)))
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            CmpOp::Ge => ">=",
            CmpOp::Le => "<=",
            CmpOp::Eq => "=",
            CmpOp::Gt => ">",
            CmpOp::Lt => "<",
        }
    }
}

/// A parsed `<operator><number>` filter value, e.g. `>=4.5`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison<T> {
    pub op: CmpOp,
    pub operand: T,
}

impl<T: FromStr> Comparison<T> {
    /// Returns `None` when `raw` is not `<operator><number>`. Callers treat
    /// that as "ignore this filter", not as a client error.
    pub fn parse(raw: &str) -> Option<Self> {
        let (op, rest) = CmpOp::strip(raw.trim())?;
        let operand = rest.trim().parse().ok()?;
        Some(Self { op, operand })
    }
}

/// A value bound in place of one `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Text(String),
    Int(i64),
    Real(f64),
}

/// One comparison clause contributed by a single filter field.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    lhs: &'static str,
    op: &'static str,
    value: Operand,
}

const CALORIES_EXPR: &str = "CAST(json_extract(nutrients, '$.calories') AS INTEGER)";

impl Predicate {
    /// Case-insensitive substring match: lower-cases both sides and wraps the
    /// input in `%` wildcards. `lhs` must already be the lowered column.
    fn like(lhs: &'static str, input: &str) -> Self {
        Self {
            lhs,
            op: "LIKE",
            value: Operand::Text(format!("%{}%", input.to_lowercase())),
        }
    }

    fn compare(lhs: &'static str, op: CmpOp, value: Operand) -> Self {
        Self {
            lhs,
            op: op.as_sql(),
            value,
        }
    }

    fn render(&self) -> String {
        format!("{} {} ?", self.lhs, self.op)
    }

    pub fn value(&self) -> &Operand {
        &self.value
    }
}

/// Builds the predicate list for a search request. Absent, empty, or
/// unparseable parameters contribute no predicate.
pub fn build(filters: &SearchFilters) -> Vec<Predicate> {
    let mut predicates = Vec::new();

    if let Some(title) = non_empty(&filters.title) {
        predicates.push(Predicate::like("LOWER(title)", title));
    }
    if let Some(cuisine) = non_empty(&filters.cuisine) {
        predicates.push(Predicate::like("LOWER(cuisine)", cuisine));
    }
    if let Some(raw) = non_empty(&filters.rating) {
        if let Some(cmp) = Comparison::<f64>::parse(raw) {
            predicates.push(Predicate::compare("rating", cmp.op, Operand::Real(cmp.operand)));
        }
    }
    if let Some(raw) = non_empty(&filters.total_time) {
        if let Some(cmp) = Comparison::<i64>::parse(raw) {
            predicates.push(Predicate::compare(
                "total_time",
                cmp.op,
                Operand::Int(cmp.operand),
            ));
        }
    }
    if let Some(raw) = non_empty(&filters.calories) {
        if let Some(cmp) = Comparison::<i64>::parse(raw) {
            predicates.push(Predicate::compare(
                CALORIES_EXPR,
                cmp.op,
                Operand::Int(cmp.operand),
            ));
        }
    }

    predicates
}

/// Renders the WHERE clause for `predicates`, or an empty string when there
/// are none. Bind order is predicate order.
pub fn where_clause(predicates: &[Predicate]) -> String {
    if predicates.is_empty() {
        return String::new();
    }
    let fragments: Vec<String> = predicates.iter().map(Predicate::render).collect();
    format!(" WHERE {}", fragments.join(" AND "))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters() -> SearchFilters {
        SearchFilters::default()
    }

    #[test]
    fn parse_recognizes_two_char_operators_first() {
        let cmp = Comparison::<f64>::parse(">=4.5").expect("should parse");
        assert_eq!(cmp.op, CmpOp::Ge);
        assert_eq!(cmp.operand, 4.5);

        let cmp = Comparison::<i64>::parse("<=120").expect("should parse");
        assert_eq!(cmp.op, CmpOp::Le);
        assert_eq!(cmp.operand, 120);
    }

    #[test]
    fn parse_recognizes_single_char_operators() {
        assert_eq!(
            Comparison::<i64>::parse("=30"),
            Some(Comparison {
                op: CmpOp::Eq,
                operand: 30
            })
        );
        assert_eq!(
            Comparison::<f64>::parse(">4").map(|c| c.op),
            Some(CmpOp::Gt)
        );
        assert_eq!(
            Comparison::<i64>::parse("<300").map(|c| c.op),
            Some(CmpOp::Lt)
        );
    }

    #[test]
    fn parse_rejects_malformed_values() {
        assert_eq!(Comparison::<f64>::parse("banana"), None);
        assert_eq!(Comparison::<f64>::parse("4.5"), None);
        assert_eq!(Comparison::<f64>::parse(""), None);
        assert_eq!(Comparison::<i64>::parse(">=twelve"), None);
        assert_eq!(Comparison::<i64>::parse(">="), None);
    }

    #[test]
    fn parse_tolerates_surrounding_whitespace() {
        let cmp = Comparison::<i64>::parse(" >= 45 ").expect("should parse");
        assert_eq!(cmp.op, CmpOp::Ge);
        assert_eq!(cmp.operand, 45);
    }

    #[test]
    fn build_with_no_filters_is_empty() {
        assert!(build(&filters()).is_empty());
        assert_eq!(where_clause(&[]), "");
    }

    #[test]
    fn build_title_produces_lowercased_like() {
        let predicates = build(&SearchFilters {
            title: Some("Choc".into()),
            ..filters()
        });
        assert_eq!(predicates.len(), 1);
        assert_eq!(predicates[0].render(), "LOWER(title) LIKE ?");
        assert_eq!(predicates[0].value(), &Operand::Text("%choc%".into()));
    }

    #[test]
    fn build_ignores_empty_and_unparseable_fields() {
        let predicates = build(&SearchFilters {
            title: Some("   ".into()),
            cuisine: Some(String::new()),
            rating: Some("banana".into()),
            total_time: Some("4".into()),
            calories: None,
        });
        assert!(predicates.is_empty());
    }

    #[test]
    fn build_calories_compares_json_extraction() {
        let predicates = build(&SearchFilters {
            calories: Some("<300".into()),
            ..filters()
        });
        assert_eq!(
            predicates[0].render(),
            "CAST(json_extract(nutrients, '$.calories') AS INTEGER) < ?"
        );
        assert_eq!(predicates[0].value(), &Operand::Int(300));
    }

    #[test]
    fn where_clause_joins_predicates_with_and() {
        let predicates = build(&SearchFilters {
            title: Some("pie".into()),
            cuisine: Some("French".into()),
            rating: Some(">=4".into()),
            total_time: Some("<=60".into()),
            calories: Some("<300".into()),
        });
        assert_eq!(predicates.len(), 5);
        let clause = where_clause(&predicates);
        assert!(clause.starts_with(" WHERE "));
        assert_eq!(clause.matches(" AND ").count(), 4);
        assert_eq!(clause.matches('?').count(), 5);
        assert_eq!(
            clause,
            " WHERE LOWER(title) LIKE ? AND LOWER(cuisine) LIKE ? AND rating >= ? \
             AND total_time <= ? AND \
             CAST(json_extract(nutrients, '$.calories') AS INTEGER) < ?"
        );
    }
}
