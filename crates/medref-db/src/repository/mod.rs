//! # Repository Module
//!
//! Database repository implementations for MedRef.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.medicines().fetch_for_export(&filters, false)              │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  MedicineRepository                                                    │
//! │  ├── fetch_for_export(&self, filters, with_ingredients)                │
//! │  ├── search(&self, query, manufacturer, category, limit)               │
//! │  ├── get_by_id(&self, id)                                              │
//! │  └── insert(&self, record)                                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (mock the repository)                                  │
//! │  • SQL is isolated in one place                                        │
//! │  • Can swap database implementations                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`medicine::MedicineRepository`] - Export rows, search, detail, filter options

pub mod medicine;
