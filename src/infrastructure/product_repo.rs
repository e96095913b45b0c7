use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::pagination::{ListResult, PageRequest};
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, Product};
use crate::schema::products;

use super::models::{NewProductRow, ProductRow};

pub struct DieselProductRepository {
    pool: DbPool,
}

impl DieselProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl ProductRepository for DieselProductRepository {
    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(products::table)
            .values(&NewProductRow {
                id: product.id,
                name: product.name,
                price: product.price,
                stock: product.stock,
                active: product.active,
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)?;
        Ok(row.into())
    }

    fn list_active(&self, page: PageRequest) -> Result<ListResult<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = products::table
                .filter(products::active.eq(true))
                .count()
                .get_result(conn)?;

            let rows = products::table
                .filter(products::active.eq(true))
                .select(ProductRow::as_select())
                .order((products::name.asc(), products::id.asc()))
                .limit(page.limit)
                .offset(page.offset())
                .load(conn)?;

            Ok(ListResult {
                items: rows.into_iter().map(Product::from).collect(),
                total,
            })
        })
    }
}
