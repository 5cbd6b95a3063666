use crate::Result;
use crate::platform::DatabasePlatform;
use crate::schema::{Asset, Table};

/// Differences between two schemas: tables to create and tables to drop.
#[derive(Clone, Debug, Default)]
pub struct SchemaDiff {
    created_tables: Vec<Table>,
    dropped_tables: Vec<Table>,
}

impl SchemaDiff {
    pub fn new(created_tables: Vec<Table>, dropped_tables: Vec<Table>) -> Self {
        Self {
            created_tables,
            dropped_tables,
        }
    }

    pub fn get_created_tables(&self) -> &[Table] {
        &self.created_tables
    }

    pub fn get_dropped_tables(&self) -> &[Table] {
        &self.dropped_tables
    }

    pub fn is_empty(&self) -> bool {
        self.created_tables.is_empty() && self.dropped_tables.is_empty()
    }

    /// Returns the statements migrating the old schema to the new one.
    ///
    /// Referencing tables are dropped before the tables they reference, and
    /// referenced tables are created before the tables referencing them.
    pub fn to_sql<P: DatabasePlatform + ?Sized>(&self, platform: &P) -> Result<Vec<String>> {
        let mut sql = vec![];

        let mut dropped = sort_by_dependencies(&self.dropped_tables);
        dropped.reverse();
        sql.append(&mut platform.get_drop_tables_sql(&dropped)?);

        let created = sort_by_dependencies(&self.created_tables);
        sql.append(&mut platform.get_create_tables_sql(&created)?);

        Ok(sql)
    }
}

/// Orders tables so that every table comes after the tables it references.
/// Tables in a reference cycle keep their original relative order.
fn sort_by_dependencies(tables: &[Table]) -> Vec<Table> {
    let names: Vec<String> = tables.iter().map(|t| t.get_name().to_lowercase()).collect();
    let mut sorted: Vec<Table> = Vec::with_capacity(tables.len());
    let mut emitted = vec![false; tables.len()];

    loop {
        let mut progress = false;
        for (i, table) in tables.iter().enumerate() {
            if emitted[i] {
                continue;
            }

            let ready = table.get_referenced_table_names().iter().all(|referenced| {
                referenced.eq_ignore_ascii_case(&names[i])
                    || names
                        .iter()
                        .position(|n| n.eq_ignore_ascii_case(referenced))
                        .is_none_or(|p| emitted[p])
            });

            if ready {
                emitted[i] = true;
                sorted.push(table.clone());
                progress = true;
            }
        }

        if !progress {
            break;
        }
    }

    for (i, table) in tables.iter().enumerate() {
        if !emitted[i] {
            sorted.push(table.clone());
        }
    }

    sorted
}
