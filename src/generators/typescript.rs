use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;
use tera::{Context, Tera};
use tracing::{debug, info};

use super::builtins::{apply_renames, collision_renames, referenced_names};
use super::fingerprint::FingerprintIndex;
use super::naming::{camel_case, pascal_case};
use super::render::TypeRenderer;
use super::signature::{dedupe_function_names, OperationSignature, ResponseKind};
use super::{GeneratedFile, Generator};
use crate::config::GenerationConfig;
use crate::error::{Error, Result};
use crate::parsers::ParsedDocument;

const TEMPLATES: [(&str, &str); 6] = [
    (
        "types.ts.tera",
        include_str!("../../templates/typescript/types.ts.tera"),
    ),
    (
        "runtime.ts.tera",
        include_str!("../../templates/typescript/runtime.ts.tera"),
    ),
    (
        "sse.ts.tera",
        include_str!("../../templates/typescript/sse.ts.tera"),
    ),
    (
        "form-data.ts.tera",
        include_str!("../../templates/typescript/form-data.ts.tera"),
    ),
    (
        "controller.ts.tera",
        include_str!("../../templates/typescript/controller.ts.tera"),
    ),
    (
        "index.ts.tera",
        include_str!("../../templates/typescript/index.ts.tera"),
    ),
];

/// Support files a controller may not be named after.
const SUPPORT_FILES: [&str; 5] = ["types", "runtime", "sse", "form-data", "index"];

pub struct TypeScriptGenerator;

/// Reverse-compiled document: declarations and call signatures with built-in
/// collisions already renamed.
#[derive(Debug, Clone)]
pub struct CompiledClient {
    pub document: ParsedDocument,
    pub declarations: Vec<String>,
    pub signatures: Vec<OperationSignature>,
    pub renames: IndexMap<String, String>,
}

/// Render every component and operation of `document`.
pub fn compile(document: &ParsedDocument) -> CompiledClient {
    let renames = collision_renames(document.components.keys());

    let index = FingerprintIndex::build(&document.components);
    let renderer = TypeRenderer::new(&index, &renames);
    let mut signatures: Vec<OperationSignature> = document
        .operations
        .iter()
        .map(|operation| OperationSignature::build(operation, &renderer))
        .collect();
    dedupe_function_names(&mut signatures);

    let mut document = document.clone();
    apply_renames(&mut document, &mut signatures, &renames);

    let index = FingerprintIndex::build(&document.components);
    let renderer = TypeRenderer::new(&index, &renames);
    let declarations = document
        .components
        .iter()
        .map(|(name, component)| renderer.declaration(name, component))
        .collect();

    debug!(
        components = document.components.len(),
        fingerprints = index.len(),
        operations = signatures.len(),
        "Compiled client."
    );

    CompiledClient {
        document,
        declarations,
        signatures,
        renames,
    }
}

#[derive(Serialize)]
struct ControllerEntry {
    namespace: String,
    file: String,
}

impl TypeScriptGenerator {
    fn load_templates(config: &GenerationConfig) -> Result<Tera> {
        match &config.template {
            Some(dir) => {
                let glob = format!("{}/**/*.tera", dir.display());
                Tera::new(&glob).map_err(|source| Error::Template { name: glob, source })
            }
            None => {
                let mut tera = Tera::default();
                tera.add_raw_templates(TEMPLATES)
                    .map_err(|source| Error::Template {
                        name: "typescript".to_string(),
                        source,
                    })?;
                Ok(tera)
            }
        }
    }

    fn render(tera: &Tera, name: &str, context: &Context) -> Result<String> {
        tera.render(name, context).map_err(|source| Error::Template {
            name: name.to_string(),
            source,
        })
    }
}

impl Generator for TypeScriptGenerator {
    fn name(&self) -> &str {
        "typescript"
    }

    fn file_extension(&self) -> &str {
        "ts"
    }

    fn generate_from_ir(
        &self,
        document: &ParsedDocument,
        config: &GenerationConfig,
    ) -> Result<Vec<GeneratedFile>> {
        let tera = Self::load_templates(config)?;
        let compiled = compile(document);

        let mut context = Context::new();
        context.insert("api_title", &compiled.document.info.title);
        context.insert("api_version", &compiled.document.info.version);
        let base_url = config
            .string_option("baseUrl")
            .map(str::to_string)
            .or_else(|| compiled.document.info.base_url.clone())
            .unwrap_or_default();
        context.insert("base_url", &base_url);
        context.insert("declarations", &compiled.declarations);

        let mut files = Vec::new();
        for (filename, template) in [
            ("types.ts", "types.ts.tera"),
            ("runtime.ts", "runtime.ts.tera"),
            ("sse.ts", "sse.ts.tera"),
            ("form-data.ts", "form-data.ts.tera"),
        ] {
            files.push(GeneratedFile {
                filename: filename.to_string(),
                content: Self::render(&tera, template, &context)?,
            });
        }

        let mut controllers: IndexMap<String, Vec<&OperationSignature>> = IndexMap::new();
        for signature in &compiled.signatures {
            controllers
                .entry(signature.controller.clone())
                .or_default()
                .push(signature);
        }

        let mut entries = Vec::new();
        for (controller, operations) in &controllers {
            let stem = if SUPPORT_FILES.contains(&controller.as_str()) {
                format!("{controller}-client")
            } else {
                controller.clone()
            };

            let mut imports = BTreeSet::new();
            for operation in operations {
                let types = [
                    operation.input_type.as_deref(),
                    operation.event_type.as_deref(),
                    Some(operation.response_type.as_str()),
                ];
                for text in types.into_iter().flatten() {
                    imports.extend(
                        referenced_names(text)
                            .filter(|name| compiled.document.components.contains_key(*name))
                            .map(str::to_string),
                    );
                }
            }

            let mut controller_context = context.clone();
            controller_context.insert("operations", operations);
            controller_context.insert("imports", &imports);
            controller_context.insert("controller_pascal", &pascal_case(controller));
            controller_context.insert(
                "uses_events",
                &operations
                    .iter()
                    .any(|op| op.response_kind == ResponseKind::Events),
            );

            files.push(GeneratedFile {
                filename: format!("{stem}.{}", self.file_extension()),
                content: Self::render(&tera, "controller.ts.tera", &controller_context)?,
            });
            entries.push(ControllerEntry {
                namespace: camel_case(controller),
                file: stem,
            });
        }

        context.insert("controllers", &entries);
        files.push(GeneratedFile {
            filename: "index.ts".to_string(),
            content: Self::render(&tera, "index.ts.tera", &context)?,
        });

        info!(
            files = files.len(),
            components = compiled.declarations.len(),
            operations = compiled.signatures.len(),
            renamed = compiled.renames.len(),
            "Generated TypeScript client."
        );
        Ok(files)
    }

    fn validate_config(&self, config: &GenerationConfig) -> Result<()> {
        match config.options.get("baseUrl") {
            Some(value) if value.as_str().is_none() => Err(Error::InvalidOption {
                generator: self.name().to_string(),
                message: "baseUrl must be a string".to_string(),
            }),
            _ => Ok(()),
        }
    }
}
