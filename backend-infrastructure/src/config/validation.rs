use anyhow::{anyhow, Result};

use backend_domain::{is_sql_identifier, TableSpec};

pub fn validate_sql_identifier(value: &str, field: &str) -> Result<()> {
    if !is_sql_identifier(value) {
        return Err(anyhow!(
            "{} must be a plain SQL identifier (letters, digits, underscore), got '{}'",
            field,
            value
        ));
    }
    Ok(())
}

pub fn validate_table_spec(spec: &TableSpec, field: &str) -> Result<()> {
    validate_sql_identifier(&spec.table, &format!("{}.table", field))?;
    validate_sql_identifier(&spec.filter_column, &format!("{}.filter_column", field))?;
    validate_sql_identifier(&spec.order_column, &format!("{}.order_column", field))?;
    if spec.columns.is_empty() {
        return Err(anyhow!("{}.columns must not be empty", field));
    }
    if spec.columns.len() == 1 && spec.columns[0] == "*" {
        return Ok(());
    }
    for column in &spec.columns {
        validate_sql_identifier(column, &format!("{}.columns", field))?;
    }
    Ok(())
}

/// Splits a comma separated column list, dropping blanks.
pub fn split_columns(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|column| !column.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(columns: &str) -> TableSpec {
        TableSpec {
            table: "litebans_bans".to_string(),
            columns: split_columns(columns),
            filter_column: "uuid".to_string(),
            order_column: "id".to_string(),
            resolve_identifier: true,
        }
    }

    #[test]
    fn column_list_is_split_and_trimmed() {
        assert_eq!(
            split_columns(" id, name ,,reason "),
            vec!["id", "name", "reason"]
        );
    }

    #[test]
    fn table_spec_accepts_plain_names_and_star() {
        assert!(validate_table_spec(&spec("id,name,reason,banned_by_name,time,until,active"), "bans").is_ok());
        assert!(validate_table_spec(&spec("*"), "bans").is_ok());
    }

    #[test]
    fn table_spec_rejects_injection_attempts() {
        let err = validate_table_spec(&spec("id,name`) FROM users; --"), "bans")
            .expect_err("reject column");
        assert!(err.to_string().contains("bans.columns"));

        assert!(validate_table_spec(&spec(""), "bans").is_err());
        assert!(validate_table_spec(&spec("id,*"), "bans").is_err());

        let mut bad_table = spec("id");
        bad_table.table = "bans; DROP TABLE bans".to_string();
        assert!(validate_table_spec(&bad_table, "bans").is_err());
    }
}
