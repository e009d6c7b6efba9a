//! Static entity catalog: the five inventory record types declared as data.
//! One generic CRUD path is parameterized by these descriptors; adding an
//! entity means adding a descriptor here, not new handlers.

use std::collections::HashMap;

/// Declared kind of a column's values. Drives validation, SQL casts, and DDL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    Date,
}

impl FieldKind {
    /// PostgreSQL type used both in DDL and as a bind-parameter cast.
    pub fn pg_type(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer => "bigint",
            FieldKind::Float => "float8",
            FieldKind::Date => "date",
        }
    }
}

/// Default literal applied by the database when a create omits the column.
#[derive(Clone, Copy, Debug)]
pub enum DefaultValue {
    Text(&'static str),
    Integer(i64),
    Float(f64),
}

impl DefaultValue {
    /// SQL literal for a DEFAULT clause.
    pub fn sql_literal(&self) -> String {
        match self {
            DefaultValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            DefaultValue::Integer(n) => n.to_string(),
            DefaultValue::Float(f) => format!("{:?}", f),
        }
    }
}

/// Extra shape constraint beyond the field kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Email,
}

#[derive(Clone, Debug)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<DefaultValue>,
    pub format: Option<Format>,
    /// When false the column is ignored by partial updates (e.g. product sku).
    pub updatable: bool,
}

fn col(name: &'static str, kind: FieldKind) -> ColumnDef {
    ColumnDef {
        name,
        kind,
        required: false,
        default: None,
        format: None,
        updatable: true,
    }
}

impl ColumnDef {
    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn default_text(mut self, v: &'static str) -> Self {
        self.default = Some(DefaultValue::Text(v));
        self
    }

    fn default_int(mut self, v: i64) -> Self {
        self.default = Some(DefaultValue::Integer(v));
        self
    }

    fn default_float(mut self, v: f64) -> Self {
        self.default = Some(DefaultValue::Float(v));
        self
    }

    fn email(mut self) -> Self {
        self.format = Some(Format::Email);
        self
    }

    fn frozen(mut self) -> Self {
        self.updatable = false;
        self
    }
}

/// A column that must be globally unique, with the label used in conflict
/// messages ("SKU already exists").
#[derive(Clone, Copy, Debug)]
pub struct UniqueField {
    pub column: &'static str,
    pub label: &'static str,
}

#[derive(Clone, Debug)]
pub struct EntityDef {
    /// Display name used in error messages ("Product not found").
    pub name: &'static str,
    /// URL path segment ("products").
    pub path: &'static str,
    pub table: &'static str,
    /// Data columns; the surrogate `id` is implicit and store-assigned.
    pub columns: Vec<ColumnDef>,
    pub unique: Option<UniqueField>,
}

impl EntityDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// The full entity catalog with path-segment lookup.
#[derive(Debug)]
pub struct Catalog {
    entities: Vec<EntityDef>,
    by_path: HashMap<&'static str, usize>,
}

impl Catalog {
    pub fn entity_by_path(&self, path: &str) -> Option<&EntityDef> {
        self.by_path.get(path).map(|&i| &self.entities[i])
    }

    pub fn entities(&self) -> &[EntityDef] {
        &self.entities
    }
}

/// Build the inventory catalog: products, warehouses, categories, customers, staff.
pub fn catalog() -> Catalog {
    let entities = vec![
        EntityDef {
            name: "Product",
            path: "products",
            table: "products",
            columns: vec![
                col("name", FieldKind::Text).required(),
                col("sku", FieldKind::Text).required().frozen(),
                col("category", FieldKind::Text).required(),
                col("stock", FieldKind::Integer).required().default_int(0),
                col("min_stock", FieldKind::Integer).required().default_int(0),
                col("price", FieldKind::Float).required(),
                col("status", FieldKind::Text).default_text("In Stock"),
                col("image_url", FieldKind::Text).default_text(""),
                col("description", FieldKind::Text).default_text(""),
            ],
            unique: Some(UniqueField {
                column: "sku",
                label: "SKU",
            }),
        },
        EntityDef {
            name: "Warehouse",
            path: "warehouses",
            table: "warehouses",
            columns: vec![
                col("name", FieldKind::Text).required(),
                col("location", FieldKind::Text).required(),
                col("capacity", FieldKind::Integer).required(),
                col("current_stock", FieldKind::Integer).default_int(0),
                col("manager", FieldKind::Text),
                col("status", FieldKind::Text).default_text("Active"),
            ],
            unique: None,
        },
        EntityDef {
            name: "Category",
            path: "categories",
            table: "categories",
            columns: vec![
                col("name", FieldKind::Text).required(),
                col("description", FieldKind::Text),
                col("icon", FieldKind::Text),
                col("status", FieldKind::Text).default_text("Active"),
            ],
            unique: None,
        },
        EntityDef {
            name: "Customer",
            path: "customers",
            table: "customers",
            columns: vec![
                col("name", FieldKind::Text).required(),
                col("email", FieldKind::Text).required().email(),
                col("phone", FieldKind::Text).required(),
                col("address", FieldKind::Text),
                col("customer_type", FieldKind::Text).default_text("Regular"),
                col("total_orders", FieldKind::Integer).default_int(0),
                col("total_spent", FieldKind::Float).default_float(0.0),
                col("status", FieldKind::Text).default_text("Active"),
            ],
            unique: Some(UniqueField {
                column: "email",
                label: "Email",
            }),
        },
        EntityDef {
            name: "Staff",
            path: "staff",
            table: "staff",
            columns: vec![
                col("name", FieldKind::Text).required(),
                col("email", FieldKind::Text).required().email(),
                col("phone", FieldKind::Text).required(),
                col("role", FieldKind::Text).required(),
                col("department", FieldKind::Text).required(),
                col("salary", FieldKind::Float).required(),
                col("join_date", FieldKind::Date).required(),
                col("status", FieldKind::Text).default_text("Active"),
            ],
            unique: Some(UniqueField {
                column: "email",
                label: "Email",
            }),
        },
    ];
    let by_path = entities
        .iter()
        .enumerate()
        .map(|(i, e)| (e.path, i))
        .collect();
    Catalog { entities, by_path }
}
