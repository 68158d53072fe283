//! Setup and teardown scripts for a whole challenge

use crate::models::ChallengeDefinition;
use super::ddl::{table_statements, SqlStatement};

/// Statements that materialize every table of a challenge.
///
/// Tables come in [`ChallengeDefinition::all_tables`] order; each table's
/// `CREATE TABLE` is followed by all of its inserts. Tables that cannot be
/// generated contribute nothing.
pub fn setup_script(challenge: &ChallengeDefinition) -> Vec<SqlStatement> {
    challenge
        .all_tables()
        .into_iter()
        .flat_map(table_statements)
        .collect()
}

/// Statements dropping every table the setup script creates, in reverse order
pub fn teardown_script(challenge: &ChallengeDefinition) -> Vec<SqlStatement> {
    let mut drops: Vec<SqlStatement> = setup_script(challenge)
        .iter()
        .filter_map(SqlStatement::reverse)
        .collect();
    drops.reverse();
    drops
}

/// Render statements as one script, one terminated statement per line
pub fn render_script(statements: &[SqlStatement]) -> String {
    let mut script = String::new();
    for statement in statements {
        script.push_str(&statement.sql);
        script.push_str(";\n");
    }
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, TableSpec};
    use crate::schema::StatementKind;

    fn challenge() -> ChallengeDefinition {
        let mut students = TableSpec::with_columns("students", &["id", "name"]);
        students.push_row(vec![Cell::Integer(1), Cell::text("Maria")]);
        students.push_row(vec![Cell::Integer(2), Cell::text("Jose")]);

        let mut courses = TableSpec::with_columns("courses", &["id", "title"]);
        courses.push_row(vec![Cell::Integer(10), Cell::text("SQL")]);

        ChallengeDefinition {
            title: "Join".to_string(),
            sample_table: students,
            additional_tables: vec![TableSpec::default(), courses],
            ..Default::default()
        }
    }

    #[test]
    fn test_setup_order() {
        let script = setup_script(&challenge());
        let kinds: Vec<(bool, &str)> = script
            .iter()
            .map(|s| match &s.kind {
                StatementKind::CreateTable { table } => (true, table.as_str()),
                StatementKind::Insert { table, .. } => (false, table.as_str()),
                StatementKind::DropTable { table } => panic!("unexpected drop of {}", table),
            })
            .collect();

        assert_eq!(
            kinds,
            vec![
                (true, "students"),
                (false, "students"),
                (false, "students"),
                (true, "courses"),
                (false, "courses"),
            ]
        );
    }

    #[test]
    fn test_teardown_reverses_creates() {
        let drops = teardown_script(&challenge());
        let sql: Vec<&str> = drops.iter().map(|s| s.sql.as_str()).collect();
        assert_eq!(sql, vec!["DROP TABLE IF EXISTS courses", "DROP TABLE IF EXISTS students"]);
    }

    #[test]
    fn test_render_script() {
        let script = render_script(&setup_script(&challenge())[..2]);
        assert_eq!(
            script,
            "CREATE TABLE IF NOT EXISTS students (id INTEGER, name TEXT);\n\
             INSERT INTO students (id, name) VALUES (1, 'Maria');\n"
        );
        assert_eq!(render_script(&[]), "");
    }

    #[test]
    fn test_empty_challenge_has_no_script() {
        let empty = ChallengeDefinition::default();
        assert!(setup_script(&empty).is_empty());
        assert!(teardown_script(&empty).is_empty());
    }
}
