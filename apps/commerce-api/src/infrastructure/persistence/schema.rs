//! SQLite schema, applied idempotently on connect.

/// DDL statements in dependency order.
pub(super) const STATEMENTS: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS users (
        id          TEXT PRIMARY KEY,
        email       TEXT NOT NULL UNIQUE,
        first_name  TEXT NOT NULL,
        last_name   TEXT NOT NULL,
        address     TEXT NOT NULL,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS user_preferences (
        user_id       TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
        receive_email INTEGER NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS products (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL,
        description TEXT NOT NULL,
        category    TEXT NOT NULL,
        price       TEXT NOT NULL,
        stock       INTEGER NOT NULL CHECK (stock >= 0),
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS saved_products (
        user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        product_id  TEXT NOT NULL REFERENCES products(id) ON DELETE CASCADE,
        PRIMARY KEY (user_id, product_id)
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS orders (
        id          TEXT PRIMARY KEY,
        user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        status      TEXT NOT NULL,
        created_at  TEXT NOT NULL,
        updated_at  TEXT NOT NULL
    )
    ",
    // product_id has no foreign key: items outlive deleted products.
    r"
    CREATE TABLE IF NOT EXISTS order_items (
        id          TEXT PRIMARY KEY,
        order_id    TEXT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
        position    INTEGER NOT NULL,
        product_id  TEXT NOT NULL,
        quantity    INTEGER NOT NULL CHECK (quantity > 0),
        unit_price  TEXT NOT NULL
    )
    ",
    "CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items(order_id, position)",
    "CREATE INDEX IF NOT EXISTS idx_orders_created ON orders(created_at)",
    "CREATE INDEX IF NOT EXISTS idx_products_category ON products(category)",
];
