//! Bidirectional type-schema compiler.
//!
//! Forward: analyzer [`Metadata`] and route manifests to an OpenAPI 3.1
//! [`Document`]. Reverse: any OpenAPI document to TypeScript declarations and
//! a typed fetch client.

pub mod config;
pub mod error;
pub mod generators;
pub mod metadata;
pub mod openapi;
pub mod operation_processor;
pub mod output;
pub mod parsers;
pub mod schema_processor;

pub use error::{Error, Result};
pub use generators::{GeneratedFile, Generator, GeneratorRegistry, TypeScriptGenerator};
pub use metadata::{Metadata, TypeKind, TypeRegistry};
pub use openapi::{validate_document, Document, Schema, Violation};
pub use operation_processor::{assemble_document, DocumentOptions, RouteManifest};
pub use parsers::{InputParser, OpenApiParser, ParsedDocument, ParserRegistry};
pub use schema_processor::SchemaProcessor;
