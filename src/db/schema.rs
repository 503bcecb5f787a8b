pub const SCHEMA: &str = r#"
-- recipes table
CREATE TABLE IF NOT EXISTS recipes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id INTEGER NOT NULL UNIQUE,
    title TEXT NOT NULL,
    image TEXT NOT NULL,
    instructions TEXT NOT NULL DEFAULT '',
    cached INTEGER NOT NULL DEFAULT 1,
    meal_type TEXT,
    diet TEXT,
    prep_time INTEGER,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_recipes_external_id ON recipes(external_id);
CREATE INDEX IF NOT EXISTS idx_recipes_title ON recipes(title);

-- recipe_ingredients table
CREATE TABLE IF NOT EXISTS recipe_ingredients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
    description TEXT NOT NULL,
    quantity TEXT,
    unit TEXT
);

CREATE INDEX IF NOT EXISTS idx_recipe_ingredients_recipe_id ON recipe_ingredients(recipe_id);

-- similar_recipes table (directed edges, snapshot of the other recipe)
CREATE TABLE IF NOT EXISTS similar_recipes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
    similar_external_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    image TEXT,
    UNIQUE(recipe_id, similar_external_id)
);

CREATE INDEX IF NOT EXISTS idx_similar_recipes_recipe_id ON similar_recipes(recipe_id);

-- ingredients table
CREATE TABLE IF NOT EXISTS ingredients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    image TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_ingredients_external_id ON ingredients(external_id);
"#;
