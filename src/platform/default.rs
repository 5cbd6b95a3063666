use super::{CreateFlags, DatabasePlatform};
use crate::r#type::{BigintType, IntegerType, TypeManager};
use crate::schema::{
    Asset, ColumnData, ForeignKeyConstraint, ForeignKeyReferentialAction, Identifier, Index, Table,
    TableOptions,
};
use crate::{Error, Result, Value};
use itertools::Itertools;
use std::any::TypeId;

pub fn get_string_type_declaration_sql<T: DatabasePlatform + ?Sized>(
    this: &T,
    column: &ColumnData,
) -> Result<String> {
    let fixed = column.fixed.unwrap_or(false);
    this.get_varchar_type_declaration_sql_snippet(column.length, fixed)
}

pub fn get_guid_type_declaration_sql<T: DatabasePlatform + ?Sized>(
    this: &T,
    column: &ColumnData,
) -> Result<String> {
    let mut column = column.clone();
    let _ = column.length.insert(36);
    let _ = column.fixed.insert(true);

    this.get_string_type_declaration_sql(&column)
}

pub fn get_identifier_quote_character() -> char {
    '"'
}

pub fn get_date_time_format_string() -> &'static str {
    "%Y-%m-%d %H:%M:%S"
}

pub fn get_max_identifier_length() -> usize {
    63
}

pub fn quote_identifier<T: DatabasePlatform + ?Sized>(this: &T, identifier: &str) -> String {
    identifier
        .split('.')
        .map(|w| this.quote_single_identifier(w))
        .collect::<Vec<String>>()
        .join(".")
}

pub fn quote_single_identifier<T: DatabasePlatform + ?Sized>(this: &T, str: &str) -> String {
    let c = this.get_identifier_quote_character();
    format!("{}{}{}", c, str.replace(c, &c.to_string().repeat(2)), c)
}

pub fn quote_string_literal(str: &str) -> String {
    format!("'{}'", str.replace('\'', "''"))
}

pub fn get_drop_table_sql<T: DatabasePlatform + ?Sized>(
    this: &T,
    table_name: &Identifier,
) -> Result<String> {
    Ok(format!("DROP TABLE {}", table_name.get_quoted_name(this)))
}

pub fn get_drop_tables_sql<T: DatabasePlatform + ?Sized>(
    this: &T,
    tables: &[Table],
) -> Result<Vec<String>> {
    let mut sql = vec![];
    for table in tables {
        sql.push(this.get_drop_table_sql(table.get_table_name())?);
    }

    Ok(sql)
}

pub fn get_create_table_sql<T: DatabasePlatform + ?Sized>(
    this: &T,
    table: &Table,
    create_flags: Option<CreateFlags>,
) -> Result<Vec<String>> {
    let create_flags = create_flags.unwrap_or(CreateFlags::CREATE_INDEXES);
    if table.is_empty() {
        return Err(Error::no_columns_specified_for_table(
            table.get_table_name(),
        ));
    }

    let mut options = TableOptions::default();
    if let Some(primary) = table.get_primary_key() {
        options.primary = Some((primary.get_quoted_columns(this), primary.clone()));
    }

    if create_flags.contains(CreateFlags::CREATE_INDEXES) {
        for index in table.get_indices() {
            if !index.is_primary() {
                options.indexes.push(index.clone());
            }
        }
    }

    if create_flags.contains(CreateFlags::CREATE_FOREIGN_KEYS) {
        for fk_constraint in table.get_foreign_keys() {
            options.foreign_keys.push(fk_constraint.clone());
        }
    }

    let mut columns = vec![];
    for column in table.get_columns() {
        let mut column_data = column.generate_column_data(this);
        if let Some(p) = &options.primary {
            if p.0.iter().any(|n| n.eq(&column_data.name)) {
                column_data.primary = true;
            }
        }

        columns.push(column_data);
    }

    this._get_create_table_sql(table.get_table_name(), columns.as_slice(), &options)
}

pub fn get_create_tables_sql<T: DatabasePlatform + ?Sized>(
    this: &T,
    tables: &[Table],
) -> Result<Vec<String>> {
    let mut sql = vec![];
    for table in tables {
        let mut other_sql = this.get_create_table_sql(table, Some(CreateFlags::CREATE_INDEXES))?;
        sql.append(&mut other_sql);
    }

    for table in tables {
        for fk in table.get_foreign_keys() {
            sql.push(this.get_create_foreign_key_sql(fk, table.get_table_name())?)
        }
    }

    Ok(sql)
}

/// Renders `CREATE TABLE` with the primary key inline, followed by the index
/// statements and `ALTER TABLE` statements for the foreign keys.
pub fn _get_create_table_sql<T: DatabasePlatform + ?Sized>(
    this: &T,
    name: &Identifier,
    columns: &[ColumnData],
    options: &TableOptions,
) -> Result<Vec<String>> {
    let mut column_list_sql = this.get_column_declaration_list_sql(columns)?;
    column_list_sql += &get_primary_key_declaration_sql(options);

    let mut sql = vec![format!(
        "CREATE TABLE {} ({})",
        name.get_quoted_name(this),
        column_list_sql
    )];

    for index in &options.indexes {
        sql.push(this.get_create_index_sql(index, name)?);
    }

    for fk in &options.foreign_keys {
        sql.push(this.get_create_foreign_key_sql(fk, name)?);
    }

    Ok(sql)
}

pub fn get_primary_key_declaration_sql(options: &TableOptions) -> String {
    match &options.primary {
        Some((columns, _)) if !columns.is_empty() => {
            format!(", PRIMARY KEY ({})", columns.iter().unique().join(", "))
        }
        _ => "".to_string(),
    }
}

pub fn get_create_index_sql<T: DatabasePlatform + ?Sized>(
    this: &T,
    index: &Index,
    table: &Identifier,
) -> Result<String> {
    if index.get_columns().is_empty() {
        return Err(Error::platform_feature_unsupported(format!(
            r#"Index "{}" has no columns"#,
            index.get_name()
        )));
    }

    Ok(format!(
        "CREATE {}INDEX {} ON {} ({})",
        if index.is_unique() { "UNIQUE " } else { "" },
        index.get_quoted_name(this),
        table.get_quoted_name(this),
        index.get_quoted_columns(this).join(", "),
    ))
}

pub fn get_create_foreign_key_sql<T: DatabasePlatform + ?Sized>(
    this: &T,
    foreign_key: &ForeignKeyConstraint,
    table: &Identifier,
) -> Result<String> {
    let table = table.get_quoted_name(this);
    Ok(format!(
        "ALTER TABLE {} ADD {}",
        table,
        this.get_foreign_key_declaration_sql(foreign_key)?
    ))
}

pub fn get_column_declaration_list_sql<T: DatabasePlatform + ?Sized>(
    this: &T,
    columns: &[ColumnData],
) -> Result<String> {
    let mut declarations = vec![];
    for column in columns {
        declarations.push(this.get_column_declaration_sql(&column.name, column)?)
    }

    Ok(declarations.join(", "))
}

pub fn get_column_declaration_sql<T: DatabasePlatform + ?Sized>(
    this: &T,
    name: &str,
    column: &ColumnData,
) -> Result<String> {
    let default = this.get_default_value_declaration_sql(column)?;
    let not_null = if column.notnull { " NOT NULL" } else { "" };
    let type_decl = TypeManager::get_instance()
        .get_type(column.r#type)?
        .get_sql_declaration(column, this.as_dyn())?;

    Ok(format!("{} {}{}{}", name, type_decl, default, not_null))
}

pub fn get_default_value_declaration_sql<T: DatabasePlatform + ?Sized>(
    this: &T,
    column: &ColumnData,
) -> Result<String> {
    let default = &column.default;
    if default.is_null() {
        return Ok((if column.notnull { "" } else { " DEFAULT NULL" }).to_string());
    }

    if column.r#type == TypeId::of::<IntegerType>() || column.r#type == TypeId::of::<BigintType>() {
        if let Value::Int(_) | Value::Boolean(_) = default {
            return Ok(format!(" DEFAULT {}", default.as_i64().unwrap_or_default()));
        }
    }

    Ok(format!(
        " DEFAULT {}",
        this.quote_string_literal(&default.to_string())
    ))
}

pub fn get_foreign_key_declaration_sql<T: DatabasePlatform + ?Sized>(
    this: &T,
    foreign_key: &ForeignKeyConstraint,
) -> Result<String> {
    Ok(format!(
        "{}{}",
        this.get_foreign_key_base_declaration_sql(foreign_key)?,
        this.get_advanced_foreign_key_options_sql(foreign_key)?,
    ))
}

pub fn get_advanced_foreign_key_options_sql<T: DatabasePlatform + ?Sized>(
    this: &T,
    foreign_key: &ForeignKeyConstraint,
) -> Result<String> {
    let mut query = "".to_string();

    if let Some(opt) = &foreign_key.on_update {
        query += &*format!(
            " ON UPDATE {}",
            this.get_foreign_key_referential_action_sql(opt)?
        )
    }

    if let Some(opt) = &foreign_key.on_delete {
        query += &*format!(
            " ON DELETE {}",
            this.get_foreign_key_referential_action_sql(opt)?
        )
    }

    Ok(query)
}

/// Appends `[NOT] DEFERRABLE INITIALLY {DEFERRED|IMMEDIATE}` as read from the
/// `deferrable` and `deferred` options of the constraint.
pub fn get_deferrable_foreign_key_options_sql(foreign_key: &ForeignKeyConstraint) -> String {
    let is_set = |option: &str| {
        foreign_key
            .get_option(option)
            .and_then(Value::as_i64)
            .unwrap_or_default()
            != 0
    };

    format!(
        "{} DEFERRABLE INITIALLY {}",
        if is_set("deferrable") { "" } else { " NOT" },
        if is_set("deferred") { "DEFERRED" } else { "IMMEDIATE" }
    )
}

pub fn get_foreign_key_referential_action_sql(
    action: &ForeignKeyReferentialAction,
) -> Result<String> {
    let act = match action {
        ForeignKeyReferentialAction::Cascade => "CASCADE",
        ForeignKeyReferentialAction::SetNull => "SET NULL",
        ForeignKeyReferentialAction::NoAction => "NO ACTION",
        ForeignKeyReferentialAction::Restrict => "RESTRICT",
        ForeignKeyReferentialAction::SetDefault => "SET DEFAULT",
    };

    Ok(act.to_string())
}

pub fn get_foreign_key_base_declaration_sql<T: DatabasePlatform + ?Sized>(
    this: &T,
    foreign_key: &ForeignKeyConstraint,
) -> Result<String> {
    let sql = if foreign_key.get_name().is_empty() {
        "".to_string()
    } else {
        format!("CONSTRAINT {} ", foreign_key.get_quoted_name(this))
    };

    if foreign_key.get_local_columns().is_empty() {
        return Err(Error::foreign_key_definition_invalid("local"));
    }

    if foreign_key.get_foreign_columns().is_empty() {
        return Err(Error::foreign_key_definition_invalid("foreign"));
    }

    if foreign_key.get_foreign_table().is_empty() {
        return Err(Error::foreign_key_definition_invalid("foreign_table"));
    }

    Ok(format!(
        "{}FOREIGN KEY ({}) REFERENCES {} ({})",
        sql,
        foreign_key.get_quoted_local_columns(this).join(", "),
        foreign_key.get_quoted_foreign_table_name(this),
        foreign_key.get_quoted_foreign_columns(this).join(", "),
    ))
}

pub fn create_save_point(savepoint: &str) -> String {
    format!("SAVEPOINT {}", savepoint)
}

pub fn release_save_point(savepoint: &str) -> String {
    format!("RELEASE SAVEPOINT {}", savepoint)
}

pub fn rollback_save_point(savepoint: &str) -> String {
    format!("ROLLBACK TO SAVEPOINT {}", savepoint)
}
