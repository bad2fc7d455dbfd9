use std::sync::OnceLock;

use regex::Regex;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// PostgreSQL reports the offending key in the error detail
/// (`Key (id)=(1) already exists.`) and the relation in the primary message.
/// Callers pass both joined by a newline.
pub struct ConstraintParser;

struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    relation_name: Regex,
    table_name: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("valid key pattern"),
            column_name: Regex::new(r#"column "([^"]+)""#).expect("valid column pattern"),
            relation_name: Regex::new(r#"relation "([^"]+)""#).expect("valid relation pattern"),
            table_name: Regex::new(r#"table "([^"]+)""#).expect("valid table pattern"),
        }
    }
}

static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Extracts `(entity, field, value)` from a unique violation.
    ///
    /// The entity comes from the constraint name (`jobs_pkey` -> `jobs`) and
    /// falls back to the relation named in the message.
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let (field, value) = Self::extract_key_value(message)?;
        let entity = constraint_name
            .and_then(|c| Self::entity_from_constraint(c, &field))
            .or_else(|| Self::extract_relation(message))?;
        Some((entity, field, value))
    }

    /// Extracts `(entity, field)` from a not-null violation.
    pub fn parse_not_null_violation(
        message: &str,
        _constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        let patterns = Self::patterns();
        let field = patterns
            .column_name
            .captures(message)
            .map(|c| c[1].to_string())?;
        let entity = Self::extract_relation(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Extracts `(referenced_entity, field, value)` from a foreign key violation.
    pub fn parse_foreign_key_violation(
        message: &str,
        _constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let (field, value) = Self::extract_key_value(message)?;
        // The detail line names the referenced table; the primary message names
        // the referencing one, so take the last match.
        let entity = Self::patterns()
            .table_name
            .captures_iter(message)
            .last()
            .map(|c| c[1].to_string())?;
        Some((entity, field, value))
    }

    /// Extracts `(entity, field)` from a check violation such as
    /// `jobs_salary_check`.
    pub fn parse_check_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        let entity = Self::extract_relation(message)?;
        let field = constraint_name
            .and_then(|c| c.strip_prefix(&format!("{}_", entity)))
            .and_then(|rest| rest.strip_suffix("_check"))
            .unwrap_or("value")
            .to_string();
        Some((entity, field))
    }

    fn extract_key_value(message: &str) -> Option<(String, String)> {
        Self::patterns()
            .key_value
            .captures(message)
            .map(|c| (c[1].to_string(), c[2].to_string()))
    }

    fn extract_relation(message: &str) -> Option<String> {
        let patterns = Self::patterns();
        patterns
            .relation_name
            .captures(message)
            .or_else(|| patterns.table_name.captures(message))
            .map(|c| c[1].to_string())
    }

    /// `jobs_pkey` / `jobs_title_key` -> `jobs`
    fn entity_from_constraint(constraint: &str, field: &str) -> Option<String> {
        constraint
            .strip_suffix("_pkey")
            .or_else(|| constraint.strip_suffix(&format!("_{}_key", field)))
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_primary_key_violation() {
        let message = "duplicate key value violates unique constraint \"jobs_pkey\"\nKey (id)=(1) already exists.";
        let result = ConstraintParser::parse_unique_violation(message, Some("jobs_pkey"));
        assert_eq!(
            result,
            Some(("jobs".to_string(), "id".to_string(), "1".to_string()))
        );
    }

    #[test]
    fn test_parse_unique_violation_without_constraint_name() {
        let message = "duplicate key value violates unique constraint on relation \"jobs\"\nKey (title)=(Engineer) already exists.";
        let result = ConstraintParser::parse_unique_violation(message, None);
        assert_eq!(
            result,
            Some(("jobs".to_string(), "title".to_string(), "Engineer".to_string()))
        );
    }

    #[test]
    fn test_parse_unique_violation_without_key_detail() {
        let message = "duplicate key value violates unique constraint \"jobs_pkey\"";
        assert_eq!(ConstraintParser::parse_unique_violation(message, Some("jobs_pkey")), None);
    }

    #[test]
    fn test_parse_not_null_violation() {
        let message =
            "null value in column \"title\" of relation \"jobs\" violates not-null constraint";
        let result = ConstraintParser::parse_not_null_violation(message, None);
        assert_eq!(result, Some(("jobs".to_string(), "title".to_string())));
    }

    #[test]
    fn test_parse_foreign_key_violation() {
        let message = "insert or update on table \"jobs\" violates foreign key constraint \"jobs_company_handle_fkey\"\nKey (company_handle)=(acme) is not present in table \"companies\".";
        let result = ConstraintParser::parse_foreign_key_violation(message, None);
        assert_eq!(
            result,
            Some((
                "companies".to_string(),
                "company_handle".to_string(),
                "acme".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_check_violation() {
        let message = "new row for relation \"jobs\" violates check constraint \"jobs_equity_check\"";
        let result = ConstraintParser::parse_check_violation(message, Some("jobs_equity_check"));
        assert_eq!(result, Some(("jobs".to_string(), "equity".to_string())));
    }
}
