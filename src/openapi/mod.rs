//! OpenAPI document model shared by both compilers.

mod document;
mod schema;
pub mod validate;

pub use document::{
    Components, Document, HttpMethod, Info, MediaType, Operation, Parameter, ParameterLocation,
    PathItem, RequestBody, Response, Server, Tag, OPENAPI_VERSION,
};
pub use schema::{
    component_ref, AdditionalProperties, Discriminator, Schema, SchemaType, COMPONENTS_PREFIX,
};
pub use validate::{validate_document, Violation};
