// Transaction Network - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod color;
pub mod config;
pub mod events;
pub mod graph;
pub mod layout;
pub mod ledger;
pub mod pipeline;
pub mod scene;
pub mod temporal;

// Re-export commonly used types
pub use color::{gradient, Rgb};
pub use config::{NetworkConfig, SceneStyle};
pub use events::{render_event, render_event_text, InteractionKind};
pub use graph::{AccountNode, NetworkGraph, TransactionEdge};
pub use layout::{
    centric_layout, select_engine, Layout, LayoutEngine, LayoutKind, NodePosition, Point, Rings,
    ShellLayout, SpringLayout,
};
pub use ledger::{
    load_accounts, load_accounts_csv, load_transactions, load_transactions_csv, AccountDirectory,
    AccountRecord, CsvDataSource, DataSource, InMemoryDataSource, TransactionRecord,
};
pub use pipeline::{build_scene, NetworkPipeline};
pub use scene::{
    Annotation, SceneBuilder, SceneLayout, ScenePayload, SceneSummary, Trace, TraceKind,
};
pub use temporal::{filter_by_years, parse_transaction_date, FilteredLedger, YearRange};
