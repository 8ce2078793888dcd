use chrono::Utc;
use rusqlite::{params, types::Value, Connection};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{CreateProduct, Product, ProductQuery, SortKey, UpdateProduct};

use super::from_row::{query_all, query_one, PRODUCT_COLS};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

/// Builder for dynamic UPDATE statements with optional fields.
/// Combines multiple field updates into a single query.
struct UpdateBuilder {
    table: &'static str,
    product_id: String,
    fields: Vec<(&'static str, Value)>,
}

impl UpdateBuilder {
    fn new(table: &'static str, product_id: &str) -> Self {
        Self {
            table,
            product_id: product_id.to_string(),
            fields: Vec::new(),
        }
    }

    fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.fields.push((column, value.into()));
        self
    }

    fn set_opt<V: Into<Value>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    /// Set a column to an explicit value (including NULL).
    /// Use this for Option<T> where Some(v) = set to v, None = set to NULL.
    fn set_nullable<V: Into<Value>>(mut self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.fields.push((column, v.into())),
            None => self.fields.push((column, Value::Null)),
        }
        self
    }

    /// Execute the update. Returns false if there was nothing to set or no
    /// row matched. Always bumps `updated_at`.
    fn execute(mut self, conn: &Connection) -> Result<bool> {
        if self.fields.is_empty() {
            return Ok(false);
        }
        self.fields.push(("updated_at", now().into()));

        let sets: Vec<String> = self
            .fields
            .iter()
            .map(|(col, _)| format!("{} = ?", col))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE product_id = ?",
            self.table,
            sets.join(", ")
        );

        let mut params: Vec<&dyn rusqlite::ToSql> = self
            .fields
            .iter()
            .map(|(_, v)| v as &dyn rusqlite::ToSql)
            .collect();
        params.push(&self.product_id);

        let changed = conn.execute(&sql, params.as_slice())?;
        Ok(changed > 0)
    }
}

pub fn create_product(conn: &Connection, input: &CreateProduct) -> Result<Product> {
    let exists: bool = conn
        .query_row(
            "SELECT 1 FROM products WHERE product_id = ?1",
            params![&input.product_id],
            |_| Ok(true),
        )
        .unwrap_or(false);
    if exists {
        return Err(AppError::Validation(format!(
            "productId '{}' already exists",
            input.product_id
        )));
    }

    let id = gen_id();
    let now = now();
    let images_json = serde_json::to_string(&input.images)?;

    conn.execute(
        "INSERT INTO products (id, product_id, name, brand, category, description, price, launch_date, images, visit_count, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10, ?11)",
        params![
            &id,
            &input.product_id,
            &input.name,
            &input.brand,
            &input.category,
            &input.description,
            input.price,
            input.launch_date,
            &images_json,
            now,
            now
        ],
    )?;

    Ok(Product {
        id,
        product_id: input.product_id.clone(),
        name: input.name.clone(),
        brand: input.brand.clone(),
        category: input.category.clone(),
        description: input.description.clone(),
        price: input.price,
        launch_date: input.launch_date,
        images: input.images.clone(),
        visit_count: 0,
        last_visited: None,
        created_at: now,
        updated_at: now,
    })
}

pub fn get_product(conn: &Connection, product_id: &str) -> Result<Option<Product>> {
    query_one(
        conn,
        &format!("SELECT {} FROM products WHERE product_id = ?1", PRODUCT_COLS),
        &[&product_id],
    )
}

pub fn list_products(conn: &Connection, query: &ProductQuery) -> Result<Vec<Product>> {
    let order = match query.sort {
        Some(SortKey::PriceAsc) => "price ASC",
        Some(SortKey::PriceDesc) => "price DESC",
        Some(SortKey::Newest) => "launch_date DESC",
        Some(SortKey::Popular) => "visit_count DESC",
        None => "created_at DESC",
    };

    match query.category {
        Some(ref category) => query_all(
            conn,
            &format!(
                "SELECT {} FROM products WHERE category = ?1 ORDER BY {}",
                PRODUCT_COLS, order
            ),
            &[category],
        ),
        None => query_all(
            conn,
            &format!("SELECT {} FROM products ORDER BY {}", PRODUCT_COLS, order),
            &[],
        ),
    }
}

/// Apply a partial update. Returns the merged product, or None if not found.
pub fn update_product(
    conn: &Connection,
    product_id: &str,
    input: &UpdateProduct,
) -> Result<Option<Product>> {
    if get_product(conn, product_id)?.is_none() {
        return Ok(None);
    }

    let images_json = input
        .images
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let mut builder = UpdateBuilder::new("products", product_id)
        .set_opt("name", input.name.clone())
        .set_opt("brand", input.brand.clone())
        .set_opt("category", input.category.clone())
        .set_opt("description", input.description.clone())
        .set_opt("price", input.price)
        .set_opt("images", images_json);

    // launch_date: Option<Option<NaiveDate>> - present-with-null clears the date
    if let Some(ref launch_date) = input.launch_date {
        builder = builder.set_nullable(
            "launch_date",
            launch_date.map(|d| d.format("%Y-%m-%d").to_string()),
        );
    }

    builder.execute(conn)?;
    get_product(conn, product_id)
}

pub fn delete_product(conn: &Connection, product_id: &str) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM products WHERE product_id = ?1",
        params![product_id],
    )?;
    Ok(deleted > 0)
}

/// Record a detail-page visit: bump the counter and stamp the read time.
/// Returns false if the product no longer exists.
pub fn record_visit(conn: &Connection, product_id: &str, at: i64) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE products SET visit_count = visit_count + 1, last_visited = ?2 WHERE product_id = ?1",
        params![product_id, at],
    )?;
    Ok(changed > 0)
}

pub fn count_products(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
    Ok(count)
}
