//! JSON HTTP API over the search core.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! myco-search serve
//!
//! # Custom port and catalog
//! myco-search serve --port 3000 --catalog my_fungi.json
//!
//! # Bind to all interfaces
//! myco-search serve --address 0.0.0.0
//! ```
//!
//! ## API Endpoints
//!
//! - `POST /api/align` - `{ sequence1, sequence2 }` → `{ score, alignment1, alignment2 }`
//! - `POST /api/its-lookup` - `{ sequence }` → species record, 404 if unknown
//! - `GET /api/search?q=&limit=` - merged fuzzy name and ITS suggestions
//! - `GET /api/species/{id}` - full species record
//! - `GET /api/catalog` - list all species in the catalog

pub mod server;
