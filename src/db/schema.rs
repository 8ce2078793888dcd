use rusqlite::Connection;

/// Initialize the storefront database schema.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- Products (the sole catalog entity)
        -- product_id: externally assigned key used by the API; id is internal only.
        -- images: JSON array of hosted URLs in display order.
        CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            product_id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            brand TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            price REAL NOT NULL CHECK (price >= 0),
            launch_date TEXT,
            images TEXT NOT NULL DEFAULT '[]',
            visit_count INTEGER NOT NULL DEFAULT 0,
            last_visited INTEGER,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_products_category ON products(category);
        CREATE INDEX IF NOT EXISTS idx_products_launch ON products(launch_date);
        "#,
    )?;
    Ok(())
}
