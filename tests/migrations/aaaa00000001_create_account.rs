use schemaline::migrate::Executor;
use schemaline::r#type::{INTEGER, STRING};
use schemaline::schema::{Column, Schema, Table};
use schemaline::Result;

const REVISION: &str = "aaaa00000001";
const DOWN_REVISION: Option<&str> = None;

fn description() -> &'static str {
    "Create account table"
}

fn pre_up(schema: &Schema) -> Result<Schema> {
    let mut table = Table::new("account");
    table.add_column(Column::new("id", INTEGER)?);
    table.add_column(Column::new("name", STRING)?.set_length(120).set_notnull(true));
    table.set_primary_key(&["id"], None)?;

    let mut schema = schema.clone();
    schema.add_table(table)?;

    Ok(schema)
}

fn pre_down(schema: &Schema) -> Result<Schema> {
    let mut schema = schema.clone();
    schema.drop_table("account");

    Ok(schema)
}

fn up(_: &mut Executor, _: &Schema) -> Result<()> {
    Ok(())
}

fn down(_: &mut Executor, _: &Schema) -> Result<()> {
    Ok(())
}
