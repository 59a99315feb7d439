use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::TableRepository;
use crate::domain::table::Table;
use crate::schema::dining_tables;

use super::models::{NewTableRow, TableRow};

pub struct DieselTableRepository {
    pool: DbPool,
}

impl DieselTableRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl TableRepository for DieselTableRepository {
    fn list(&self) -> Result<Vec<Table>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = dining_tables::table
            .select(TableRow::as_select())
            .order(dining_tables::number.asc())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(Table::from).collect())
    }

    fn get_or_create(&self, number: i32) -> Result<(Table, bool), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let inserted = diesel::insert_into(dining_tables::table)
                .values(&NewTableRow { number })
                .on_conflict(dining_tables::number)
                .do_nothing()
                .returning(TableRow::as_returning())
                .get_result(conn)
                .optional()?;

            if let Some(row) = inserted {
                log::info!("Created table #{} (id {})", row.number, row.id);
                return Ok((row.into(), true));
            }

            let existing = dining_tables::table
                .filter(dining_tables::number.eq(number))
                .select(TableRow::as_select())
                .first(conn)?;
            Ok((existing.into(), false))
        })
    }

    fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        // Orders go with the table through ON DELETE CASCADE.
        let deleted = diesel::delete(dining_tables::table.find(id)).execute(&mut conn)?;
        if deleted > 0 {
            log::info!("Deleted table id {} and its orders", id);
        }
        Ok(deleted > 0)
    }
}
