//! Embedded schema, applied idempotently at startup so a single binary can
//! deploy without an external migration tool.

pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS pdus (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    ip_address TEXT NOT NULL UNIQUE,
    mac_address TEXT UNIQUE,
    total_outlets INTEGER NOT NULL,
    model TEXT NOT NULL,
    serial TEXT NOT NULL,
    username TEXT NOT NULL,
    password TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS kvms (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    ip_address TEXT NOT NULL UNIQUE,
    mac_address TEXT UNIQUE,
    total_ports INTEGER NOT NULL,
    model TEXT NOT NULL,
    serial TEXT NOT NULL,
    username TEXT NOT NULL,
    password TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS initiators (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    mac_address TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL UNIQUE,
    mode TEXT NOT NULL,
    ip_address TEXT,
    pdu_id INTEGER REFERENCES pdus(id) ON DELETE SET NULL,
    pdu_port INTEGER,
    kvm_id INTEGER REFERENCES kvms(id) ON DELETE SET NULL,
    kvm_port INTEGER,
    last_initiated TEXT
);

CREATE TABLE IF NOT EXISTS targets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    boot INTEGER NOT NULL DEFAULT 0,
    active INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL DEFAULT 'OFFLINE',
    initiator_id INTEGER UNIQUE REFERENCES initiators(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS logical_units (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    vendor_id TEXT NOT NULL,
    product_id TEXT NOT NULL,
    product_rev TEXT NOT NULL,
    vg_name TEXT NOT NULL,
    size_gib REAL NOT NULL,
    use_flag INTEGER NOT NULL DEFAULT 1,
    status INTEGER NOT NULL DEFAULT 0,
    boot_count INTEGER NOT NULL DEFAULT 0,
    last_attached TEXT,
    target_id INTEGER REFERENCES targets(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS snapshots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    size_gib REAL NOT NULL,
    active INTEGER NOT NULL DEFAULT 0,
    description TEXT NOT NULL DEFAULT '',
    logical_unit_id INTEGER NOT NULL REFERENCES logical_units(id) ON DELETE CASCADE,
    UNIQUE(name, logical_unit_id)
);
"#;
