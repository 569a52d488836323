//! SQLite schema definitions for the game database.
//!
//! One table description array drives both the `CREATE TABLE` DDL and the
//! `/api/schema` introspection payload, so the two cannot drift apart.

#[macro_export]
macro_rules! game_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            // unused_mut is allowed because the variable is only mutated
            // when optional field assignments are passed to the macro
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
                foreign_key: None,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

use anyhow::Result;
use rusqlite::{params, Connection};

#[derive(Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Real,
}

pub struct ForeignKey {
    pub foreign_table: &'static str,
    pub foreign_column: &'static str,
}

pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
    pub foreign_key: Option<&'static ForeignKey>,
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl Table {
    /// Generate and run the `CREATE TABLE IF NOT EXISTS` statement.
    pub fn create_if_not_exists(&self, conn: &Connection) -> Result<()> {
        let mut create_sql = format!("CREATE TABLE IF NOT EXISTS {} (", self.name);
        for (column_index, column) in self.columns.iter().enumerate() {
            if column_index > 0 {
                create_sql.push_str(", ");
            }
            create_sql.push_str(&format!(
                "{} {}",
                column.name,
                match column.sql_type {
                    SqlType::Text => "TEXT",
                    SqlType::Integer => "INTEGER",
                    SqlType::Real => "REAL",
                }
            ));
            if column.is_primary_key {
                create_sql.push_str(" PRIMARY KEY AUTOINCREMENT");
            }
            if column.non_null {
                create_sql.push_str(" NOT NULL");
            }
        }
        for column in self.columns.iter() {
            if let Some(foreign_key) = column.foreign_key {
                create_sql.push_str(&format!(
                    ", FOREIGN KEY ({}) REFERENCES {}({})",
                    column.name, foreign_key.foreign_table, foreign_key.foreign_column
                ));
            }
        }
        create_sql.push_str(");");
        conn.execute(&create_sql, params![])?;
        Ok(())
    }
}

const ARTISTS_FK: ForeignKey = ForeignKey {
    foreign_table: "Artists",
    foreign_column: "id",
};

const ALBUMS_FK: ForeignKey = ForeignKey {
    foreign_table: "Albums",
    foreign_column: "id",
};

const VENUES_FK: ForeignKey = ForeignKey {
    foreign_table: "Venues",
    foreign_column: "id",
};

const ARTISTS_TABLE: Table = Table {
    name: "Artists",
    columns: &[
        game_column!("id", &SqlType::Integer, is_primary_key = true),
        game_column!("name", &SqlType::Text, non_null = true),
        game_column!("genre", &SqlType::Text),
        game_column!("formed_year", &SqlType::Integer),
        game_column!("bio", &SqlType::Text),
    ],
};

const ALBUMS_TABLE: Table = Table {
    name: "Albums",
    columns: &[
        game_column!("id", &SqlType::Integer, is_primary_key = true),
        game_column!("title", &SqlType::Text, non_null = true),
        game_column!("artist_id", &SqlType::Integer, foreign_key = Some(&ARTISTS_FK)),
        game_column!("release_year", &SqlType::Integer),
        game_column!("label", &SqlType::Text),
    ],
};

const SONGS_TABLE: Table = Table {
    name: "Songs",
    columns: &[
        game_column!("id", &SqlType::Integer, is_primary_key = true),
        game_column!("title", &SqlType::Text, non_null = true),
        game_column!("album_id", &SqlType::Integer, foreign_key = Some(&ALBUMS_FK)),
        game_column!("track_number", &SqlType::Integer),
        game_column!("duration", &SqlType::Integer),
    ],
};

const VENUES_TABLE: Table = Table {
    name: "Venues",
    columns: &[
        game_column!("id", &SqlType::Integer, is_primary_key = true),
        game_column!("name", &SqlType::Text, non_null = true),
        game_column!("city", &SqlType::Text),
        game_column!("country", &SqlType::Text),
        game_column!("capacity", &SqlType::Integer),
    ],
};

const CONCERTS_TABLE: Table = Table {
    name: "Concerts",
    columns: &[
        game_column!("id", &SqlType::Integer, is_primary_key = true),
        game_column!("artist_id", &SqlType::Integer, foreign_key = Some(&ARTISTS_FK)),
        game_column!("venue_id", &SqlType::Integer, foreign_key = Some(&VENUES_FK)),
        game_column!("concert_date", &SqlType::Text),
        game_column!("ticket_price", &SqlType::Real),
        game_column!("tickets_sold", &SqlType::Integer),
    ],
};

const SALES_TABLE: Table = Table {
    name: "Sales",
    columns: &[
        game_column!("id", &SqlType::Integer, is_primary_key = true),
        game_column!("album_id", &SqlType::Integer, foreign_key = Some(&ALBUMS_FK)),
        game_column!("week_starting", &SqlType::Text),
        game_column!("units_sold", &SqlType::Integer),
        game_column!("revenue", &SqlType::Real),
        game_column!("country", &SqlType::Text),
    ],
};

/// The six game tables, in seeding dependency order: parents before the
/// tables whose foreign keys reference them.
pub const GAME_TABLES: &[Table] = &[
    ARTISTS_TABLE,
    ALBUMS_TABLE,
    SONGS_TABLE,
    VENUES_TABLE,
    CONCERTS_TABLE,
    SALES_TABLE,
];

/// Table name -> ordered column names, for the schema introspection
/// endpoint. Derived from the same descriptions as the DDL.
pub fn schema_map() -> Vec<(&'static str, Vec<&'static str>)> {
    GAME_TABLES
        .iter()
        .map(|table| {
            (
                table.name,
                table.columns.iter().map(|column| column.name).collect(),
            )
        })
        .collect()
}
