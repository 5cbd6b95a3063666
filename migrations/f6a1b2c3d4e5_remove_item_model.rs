use schemaline::migrate::Executor;
use schemaline::r#type::{GUID, STRING};
use schemaline::schema::{
    Column, ForeignKeyConstraint, ForeignKeyReferentialAction, Schema, Table,
};
use schemaline::Result;

const REVISION: &str = "f6a1b2c3d4e5";
const DOWN_REVISION: Option<&str> = Some("1a31ce608336");

fn description() -> &'static str {
    "Remove Item model and drop item table"
}

/// The `item` table as it existed before this revision.
fn item_table() -> Result<Table> {
    let mut table = Table::new("item");
    table.add_column(
        Column::new("title", STRING)?
            .set_length(255)
            .set_notnull(true),
    );
    table.add_column(
        Column::new("description", STRING)?
            .set_length(255)
            .set_notnull(false),
    );
    table.add_column(Column::new("id", GUID)?.set_notnull(true));
    table.add_column(Column::new("owner_id", GUID)?.set_notnull(true));
    table.set_primary_key(&["id"], None)?;
    table.add_foreign_key(ForeignKeyConstraint::new(
        &["owner_id"],
        &["id"],
        "user",
        None,
        Some(ForeignKeyReferentialAction::Cascade),
    ))?;

    Ok(table)
}

fn pre_up(schema: &Schema) -> Result<Schema> {
    // dropping an absent table leaves the schema untouched
    let mut schema = schema.clone();
    schema.drop_table("item");

    Ok(schema)
}

fn pre_down(schema: &Schema) -> Result<Schema> {
    let mut schema = schema.clone();
    schema.add_table(item_table()?)?;
    if let Some(item) = schema.get_table("item") {
        schema.validate_foreign_keys_of(item)?;
    }

    Ok(schema)
}

fn up(_: &mut Executor, _: &Schema) -> Result<()> {
    Ok(())
}

fn down(_: &mut Executor, _: &Schema) -> Result<()> {
    Ok(())
}
