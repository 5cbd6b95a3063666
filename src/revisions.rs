//! Migration steps shipped with this crate, compiled from the `migrations` directory.
//!
//! The chain starts from `1a31ce608336`, the revision that created the `item`
//! table. That revision lives with the application history and is not part of
//! this set, so its absence is tolerated.

use crate::migrator;

migrator!(pub MIGRATOR, "migrations");

#[cfg(test)]
mod tests {
    use super::MIGRATOR;
    use super::revision_f6a1b2c3d4e5 as remove_item;
    use crate::error::ErrorKind;
    use crate::migrate::Direction;
    use crate::r#type::{GuidType, StringType};
    use crate::schema::{Asset, Column, ForeignKeyReferentialAction, Schema, Table};
    use crate::tests::FunctionalTestsHelper;
    use crate::Value;
    use std::any::TypeId;

    async fn introspect(helper: &FunctionalTestsHelper) -> Schema {
        helper
            .get_schema_manager()
            .introspect_schema()
            .await
            .unwrap()
    }

    /// Brings the database to the state preceding the removal of `item`.
    async fn create_item_state(helper: &FunctionalTestsHelper) {
        helper.create_user_table().await.unwrap();
        MIGRATOR.upgrade(&helper.connection).await.unwrap();
        MIGRATOR.downgrade_to(&helper.connection, None).await.unwrap();
    }

    #[test]
    fn exposes_revision_metadata() {
        let revisions = MIGRATOR.revisions().unwrap();
        assert_eq!(revisions.len(), 1);

        let migration = revisions[0];
        assert_eq!(migration.revision, "f6a1b2c3d4e5");
        assert_eq!(migration.down_revision, Some("1a31ce608336"));
        assert_eq!(
            (migration.description)(),
            "Remove Item model and drop item table"
        );
        assert_eq!(migration.checksum.len(), 48);
        assert_eq!(MIGRATOR.head().unwrap(), Some("f6a1b2c3d4e5"));
    }

    #[tokio::test]
    async fn upgrade_drops_the_item_table() {
        let helper = FunctionalTestsHelper::default().await;
        create_item_state(&helper).await;
        assert!(helper.table_exists("item").await);
        assert_eq!(MIGRATOR.current(&helper.connection).await.unwrap(), None);

        MIGRATOR.upgrade(&helper.connection).await.unwrap();
        assert!(!helper.table_exists("item").await);
        assert!(helper.table_exists("user").await);
        assert_eq!(
            MIGRATOR.current(&helper.connection).await.unwrap(),
            Some("f6a1b2c3d4e5")
        );
    }

    #[tokio::test]
    async fn upgrade_without_item_table_touches_nothing_else() {
        let helper = FunctionalTestsHelper::default().await;
        helper.create_user_table().await.unwrap();
        let mut note = Table::new("note");
        note.add_column(Column::new("body", crate::r#type::TEXT).unwrap());
        helper
            .get_schema_manager()
            .create_table(&note)
            .await
            .unwrap();

        MIGRATOR.upgrade(&helper.connection).await.unwrap();
        assert_eq!(
            helper.table_names().await,
            vec!["note", "schemaline_versions", "user"]
        );

        // already applied: nothing left to run
        MIGRATOR.upgrade(&helper.connection).await.unwrap();
        assert_eq!(
            MIGRATOR.current(&helper.connection).await.unwrap(),
            Some("f6a1b2c3d4e5")
        );
    }

    #[tokio::test]
    async fn downgrade_recreates_the_item_table() {
        let helper = FunctionalTestsHelper::default().await;
        create_item_state(&helper).await;

        let item = helper
            .get_schema_manager()
            .introspect_table("item")
            .await
            .unwrap();

        let columns = item.get_columns();
        assert_eq!(
            columns
                .iter()
                .map(|c| c.get_name().into_owned())
                .collect::<Vec<_>>(),
            vec!["title", "description", "id", "owner_id"]
        );

        assert_eq!(columns[0].get_type(), TypeId::of::<StringType>());
        assert_eq!(columns[0].get_length(), Some(255));
        assert!(columns[0].is_notnull());
        assert_eq!(columns[1].get_type(), TypeId::of::<StringType>());
        assert_eq!(columns[1].get_length(), Some(255));
        assert!(!columns[1].is_notnull());
        assert_eq!(columns[2].get_type(), TypeId::of::<GuidType>());
        assert!(columns[2].is_notnull());
        assert_eq!(columns[3].get_type(), TypeId::of::<GuidType>());
        assert!(columns[3].is_notnull());

        let primary = item.get_primary_key().unwrap();
        assert_eq!(primary.get_columns(), vec!["id".to_string()]);

        let foreign_keys = item.get_foreign_keys();
        assert_eq!(foreign_keys.len(), 1);
        assert_eq!(foreign_keys[0].get_unquoted_local_columns(), vec!["owner_id".to_string()]);
        assert_eq!(foreign_keys[0].get_unqualified_foreign_table_name(), "user");
        assert_eq!(foreign_keys[0].get_unquoted_foreign_columns(), vec!["id".to_string()]);
        assert_eq!(
            foreign_keys[0].on_delete,
            Some(ForeignKeyReferentialAction::Cascade)
        );

        let declared = remove_item::item_table().unwrap();
        assert_eq!(declared.get_columns(), item.get_columns());
        assert_eq!(declared.get_foreign_keys(), item.get_foreign_keys());
    }

    #[tokio::test]
    async fn round_trip_restores_the_schema() {
        let helper = FunctionalTestsHelper::default().await;
        helper.create_user_table().await.unwrap();
        MIGRATOR.upgrade(&helper.connection).await.unwrap();
        let upgraded = introspect(&helper).await;

        MIGRATOR.downgrade_to(&helper.connection, None).await.unwrap();
        let downgraded = introspect(&helper).await;
        assert!(downgraded.has_table("item"));

        MIGRATOR.upgrade(&helper.connection).await.unwrap();
        assert_eq!(introspect(&helper).await, upgraded);

        MIGRATOR.downgrade_to(&helper.connection, None).await.unwrap();
        assert_eq!(introspect(&helper).await, downgraded);
    }

    #[tokio::test]
    async fn recreated_item_enforces_its_owner() {
        let helper = FunctionalTestsHelper::default().await;
        create_item_state(&helper).await;

        let owner = uuid::Uuid::new_v4();
        helper.insert_user(owner, "owner@example.com").await.unwrap();

        helper
            .connection
            .insert(
                "item",
                vec![
                    ("title", Value::from("Hammer")),
                    ("description", Value::NULL),
                    ("id", Value::Uuid(uuid::Uuid::new_v4())),
                    ("owner_id", Value::Uuid(owner)),
                ],
            )
            .await
            .unwrap();

        let error = helper
            .connection
            .insert(
                "item",
                vec![
                    ("title", Value::from("Orphan")),
                    ("id", Value::Uuid(uuid::Uuid::new_v4())),
                    ("owner_id", Value::Uuid(uuid::Uuid::new_v4())),
                ],
            )
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ConstraintViolation);

        let error = helper
            .connection
            .insert(
                "item",
                vec![
                    ("id", Value::Uuid(uuid::Uuid::new_v4())),
                    ("owner_id", Value::Uuid(owner)),
                ],
            )
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ConstraintViolation);

        assert_eq!(helper.count_rows("item").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn deleting_an_owner_cascades_to_its_items() {
        let helper = FunctionalTestsHelper::default().await;
        create_item_state(&helper).await;

        let owner = uuid::Uuid::new_v4();
        let other = uuid::Uuid::new_v4();
        helper.insert_user(owner, "owner@example.com").await.unwrap();
        helper.insert_user(other, "other@example.com").await.unwrap();

        for (title, owner_id) in [("Saw", owner), ("Drill", owner), ("Pliers", other)] {
            helper
                .connection
                .insert(
                    "item",
                    vec![
                        ("title", Value::from(title)),
                        ("id", Value::Uuid(uuid::Uuid::new_v4())),
                        ("owner_id", Value::Uuid(owner_id)),
                    ],
                )
                .await
                .unwrap();
        }

        helper
            .connection
            .delete("user", vec![("id", Value::Uuid(owner))])
            .await
            .unwrap();
        assert_eq!(helper.count_rows("item").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn downgrade_fails_when_item_already_exists() {
        let helper = FunctionalTestsHelper::default().await;
        helper.create_user_table().await.unwrap();
        MIGRATOR.upgrade(&helper.connection).await.unwrap();

        let mut item = Table::new("item");
        item.add_column(Column::new("id", crate::r#type::INTEGER).unwrap());
        helper
            .get_schema_manager()
            .create_table(&item)
            .await
            .unwrap();

        let error = MIGRATOR
            .downgrade_to(&helper.connection, None)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TableAlreadyExists);

        assert!(!helper.connection.is_transaction_active());
        assert_eq!(
            MIGRATOR.current(&helper.connection).await.unwrap(),
            Some("f6a1b2c3d4e5")
        );
        let columns = helper
            .get_schema_manager()
            .list_table_columns("item")
            .await
            .unwrap();
        assert_eq!(columns.len(), 1);
    }

    #[tokio::test]
    async fn downgrade_requires_the_user_table() {
        let helper = FunctionalTestsHelper::default().await;
        MIGRATOR.upgrade(&helper.connection).await.unwrap();

        let error = MIGRATOR
            .downgrade_to(&helper.connection, None)
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ForeignKeyTargetMissing);
        assert!(!helper.table_exists("item").await);
        assert_eq!(
            MIGRATOR.current(&helper.connection).await.unwrap(),
            Some("f6a1b2c3d4e5")
        );
    }

    fn user_schema(helper: &FunctionalTestsHelper) -> Schema {
        Schema::new(vec![helper.get_user_table().unwrap()])
    }

    #[tokio::test]
    async fn renders_sqlite_statements() {
        let helper = FunctionalTestsHelper::default().await;
        let platform = helper.platform.as_dyn();
        let schema = user_schema(&helper);

        let sql = MIGRATOR
            .render_sql(platform, &schema, Direction::Down, None)
            .unwrap();
        assert_eq!(sql.len(), 1);
        assert!(sql[0].starts_with(
            "CREATE TABLE item (title VARCHAR(255) NOT NULL, description VARCHAR(255) DEFAULT NULL, id CHAR(36) NOT NULL, owner_id CHAR(36) NOT NULL, PRIMARY KEY (id), CONSTRAINT FK_"
        ));
        assert!(sql[0].ends_with(
            " FOREIGN KEY (owner_id) REFERENCES user (id) ON DELETE CASCADE NOT DEFERRABLE INITIALLY IMMEDIATE)"
        ));

        let mut with_item = schema.clone();
        with_item.add_table(remove_item::item_table().unwrap()).unwrap();
        let sql = MIGRATOR
            .render_sql(platform, &with_item, Direction::Up, None)
            .unwrap();
        assert_eq!(sql, vec!["DROP TABLE item".to_string()]);

        let sql = MIGRATOR
            .render_sql(platform, &schema, Direction::Up, None)
            .unwrap();
        assert!(sql.is_empty());
    }

    #[cfg(feature = "postgres")]
    #[tokio::test]
    async fn renders_postgresql_statements() {
        use crate::platform::PostgreSQLPlatform;

        let helper = FunctionalTestsHelper::default().await;
        let platform = PostgreSQLPlatform::new();
        let schema = user_schema(&helper);

        let sql = MIGRATOR
            .render_sql(&platform, &schema, Direction::Down, None)
            .unwrap();
        assert_eq!(sql.len(), 2);
        assert_eq!(
            sql[0],
            "CREATE TABLE item (title VARCHAR(255) NOT NULL, description VARCHAR(255) DEFAULT NULL, id UUID NOT NULL, owner_id UUID NOT NULL, PRIMARY KEY (id))"
        );
        assert!(sql[1].starts_with("ALTER TABLE item ADD CONSTRAINT FK_"));
        assert!(sql[1].ends_with(
            r#" FOREIGN KEY (owner_id) REFERENCES "user" (id) ON DELETE CASCADE NOT DEFERRABLE INITIALLY IMMEDIATE"#
        ));
    }
}
