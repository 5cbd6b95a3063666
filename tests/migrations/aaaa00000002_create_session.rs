use schemaline::migrate::Executor;
use schemaline::r#type::INTEGER;
use schemaline::schema::{Column, ForeignKeyConstraint, ForeignKeyReferentialAction, Schema, Table};
use schemaline::Result;

const REVISION: &str = "aaaa00000002";
const DOWN_REVISION: Option<&str> = Some("aaaa00000001");

fn description() -> &'static str {
    "Create session table"
}

fn pre_up(schema: &Schema) -> Result<Schema> {
    let mut table = Table::new("session");
    table.add_column(Column::new("id", INTEGER)?);
    table.add_column(Column::new("account_id", INTEGER)?.set_notnull(true));
    table.set_primary_key(&["id"], None)?;
    table.add_foreign_key(
        ForeignKeyConstraint::new(
            &["account_id"],
            &["id"],
            "account",
            None,
            Some(ForeignKeyReferentialAction::Cascade),
        )
        .with_name("fk_session_account"),
    )?;

    let mut schema = schema.clone();
    schema.add_table(table)?;
    if let Some(session) = schema.get_table("session") {
        schema.validate_foreign_keys_of(session)?;
    }

    Ok(schema)
}

fn pre_down(schema: &Schema) -> Result<Schema> {
    let mut schema = schema.clone();
    schema.drop_table("session");

    Ok(schema)
}

fn up(_: &mut Executor, _: &Schema) -> Result<()> {
    Ok(())
}

fn down(_: &mut Executor, _: &Schema) -> Result<()> {
    Ok(())
}
